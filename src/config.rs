use log::LevelFilter;

use crate::error::OstError;

/// Configuration for an interactive [`crate::Menu`] session. Parsed from
/// command line arguments:
///
/// * `--name=<name>`, identify the [`crate::Ost`] instance.
/// * `--log=<level>`, one of off, error, warn, info, debug, trace.
/// * `--quiet`, skip dumping the tree after every command.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub name: String,
    pub log_level: LevelFilter,
    pub show_tree: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            name: "ost".to_string(),
            log_level: LevelFilter::Warn,
            show_tree: true,
        }
    }
}

impl Config {
    /// Build configuration from `args`, program name excluded.
    pub fn from_args<I, S>(args: I) -> Result<Config, OstError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config: Config = Default::default();
        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some(("--name", name)) if !name.is_empty() => {
                    config.name = name.to_string();
                }
                Some(("--log", level)) => {
                    config.log_level = level.parse().map_err(|_| {
                        let msg = format!("bad log level {:?}", level);
                        OstError::InvalidArgument(msg)
                    })?;
                }
                None if arg == "--quiet" => config.show_tree = false,
                _ => return Err(OstError::InvalidArgument(arg.to_string())),
            }
        }
        Ok(config)
    }
}
