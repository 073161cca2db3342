use std::{env, io, process};

use log::error;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use ost_index::{Config, Menu, Ost};

const USAGE: &str = "usage: ost [--name=<name>] [--log=<level>] [--quiet]";

fn main() {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}\n{}", err, USAGE);
            process::exit(2);
        }
    };

    let log_config = simplelog::Config::default();
    let (mode, color) = (TerminalMode::Stderr, ColorChoice::Auto);
    if let Err(err) = TermLogger::init(config.log_level, log_config, mode, color) {
        eprintln!("logger: {}", err);
    }

    let mut ost = Ost::new(&config.name);
    let (stdin, stdout) = (io::stdin(), io::stdout());
    let mut menu = Menu::new(stdin.lock(), stdout.lock(), config.show_tree);
    if let Err(err) = menu.run(&mut ost) {
        error!("{}: session aborted, {}", ost.id(), err);
        process::exit(1);
    }
}
