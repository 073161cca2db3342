use std::{
    collections::VecDeque,
    convert::TryFrom,
    io::{self, BufRead, Write},
};

use log::{debug, info};

use crate::ost::{Key, Ost};

const MENU: &str = "Enter the operation that you want to perform:
1) Insert a key
2) Delete a key
3) Find the rank of a key
4) Find the k'th smallest key
5) Quit
";

// A single numeric argument read from the session.
enum Input {
    Number(i64),
    Invalid(String),
    End,
}

/// Menu drives an interactive session over an [`Ost`] instance. Reads
/// whitespace separated operation codes and arguments from `input`,
/// writes prompts and results to `output`.
pub struct Menu<R, W>
where
    R: BufRead,
    W: Write,
{
    input: R,
    output: W,
    tokens: VecDeque<String>,
    show_tree: bool,
}

impl<R, W> Menu<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Create a new session. If `show_tree` is true, keys are dumped in
    /// preorder after every command.
    pub fn new(input: R, output: W, show_tree: bool) -> Menu<R, W> {
        Menu {
            input,
            output,
            tokens: VecDeque::new(),
            show_tree,
        }
    }

    /// Run the session until quit or end of input. Only I/O failures on
    /// `input` or `output` are returned as error.
    pub fn run(&mut self, ost: &mut Ost) -> io::Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let op = match self.next_token()? {
                Some(op) => op,
                None => break,
            };
            writeln!(self.output)?;
            debug!("{}: operation {:?}", ost.id(), op);

            let input = match op.as_str() {
                "1" => {
                    let input = self.read_number("Enter the key that you want to insert: ")?;
                    if let Input::Number(key) = input {
                        ost.insert(key);
                        writeln!(self.output, "Key inserted successfully!")?;
                    }
                    Some(input)
                }
                "2" => {
                    let input = self.read_number("Enter the key that you want to delete: ")?;
                    if let Input::Number(key) = input {
                        ost.delete(&key);
                        writeln!(self.output, "Key deleted successfully!")?;
                    }
                    Some(input)
                }
                "3" => {
                    let prompt = "Enter the key whose rank you want to find: ";
                    let input = self.read_number(prompt)?;
                    if let Input::Number(key) = input {
                        self.rank_of_key(ost, key)?;
                    }
                    Some(input)
                }
                "4" => {
                    let input = self.read_number("Enter the rank: ")?;
                    if let Input::Number(rank) = input {
                        self.find_by_rank(ost, rank)?;
                    }
                    Some(input)
                }
                "5" => break,
                _ => {
                    writeln!(self.output, "Invalid Operation!")?;
                    None
                }
            };
            match input {
                Some(Input::End) => break,
                Some(Input::Invalid(token)) => {
                    debug!("{}: invalid input {:?}", ost.id(), token);
                    writeln!(self.output, "Invalid input!")?;
                }
                _ => (),
            }

            if self.show_tree {
                writeln!(self.output, "\nCurrent status of the tree: ")?;
                let keys: Vec<String> = ost.preorder().iter().map(Key::to_string).collect();
                writeln!(self.output, "{}", keys.join(" "))?;
            }
            writeln!(self.output)?;
        }

        info!("{}: session done with {} keys", ost.id(), ost.len());
        self.output.flush()
    }

    fn rank_of_key(&mut self, ost: &Ost, key: Key) -> io::Result<()> {
        match ost.rank_of_key(&key) {
            Some(rank) => writeln!(self.output, "The rank of {} is {}", key, rank),
            None => writeln!(self.output, "Key not found in the tree!"),
        }
    }

    fn find_by_rank(&mut self, ost: &Ost, rank: i64) -> io::Result<()> {
        // negative ranks can't address any key.
        let key = usize::try_from(rank).ok().and_then(|r| ost.find_by_rank(r));
        match key {
            Some(key) => writeln!(self.output, "The key with rank {} is {}", rank, key),
            None => {
                let msg = "No node with the given rank exists in the tree!";
                writeln!(self.output, "{}", msg)
            }
        }
    }

    fn read_number(&mut self, prompt: &str) -> io::Result<Input> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let input = match self.next_token()? {
            None => Input::End,
            Some(token) => match token.parse::<i64>() {
                Ok(n) => Input::Number(n),
                Err(_) => Input::Invalid(token),
            },
        };
        Ok(input)
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.tokens
                .extend(line.split_whitespace().map(ToString::to_string));
        }
        Ok(self.tokens.pop_front())
    }

    /// Consume the session and return the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}
