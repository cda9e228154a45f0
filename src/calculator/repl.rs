//! Interactive terminal session on top of `rustyline`.
use crate::calculator::dispatcher::Dispatcher;
use crate::calculator::form::LineSource;
use crate::calculator::operations::Operation;
use log::error;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};

pub const TITLE: &str = "Ultimate Algebra Calculator";
const PROMPT: &str = "calc> ";

pub const NOTATION_GUIDE: &str = "Notation Guide:
 - Use * for multiplication (2*x)
 - Use ** or ^ for exponents (x**2 or x^2)
 - Use sqrt() for square roots
 - For fractions: (numerator)/(denominator)";

const COMMANDS: &str = "Commands:
 ops            list operations
 use <n|name>   select an operation
 run            fill in the form of the selected operation and run it (an empty line does the same)
 history [all]  recent calculations, or all of them as a table
 help           this text
 quit, exit     leave the calculator";

/// Line editor with its own input history.
pub struct EditorLines {
    editor: DefaultEditor,
}

impl EditorLines {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(EditorLines {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorLines {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Some(line)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
            Err(err) => {
                error!("cannot read input: {:?}", err);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ops,
    Use(String),
    Run,
    History { all: bool },
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match (word.to_lowercase().as_str(), rest) {
        ("" | "run", "") => Command::Run,
        ("ops", "") => Command::Ops,
        ("use", selector) if !selector.is_empty() => Command::Use(selector.to_string()),
        ("history", "") => Command::History { all: false },
        ("history", "all") => Command::History { all: true },
        ("help" | "?", "") => Command::Help,
        ("quit" | "exit", "") => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn banner(dispatcher: &Dispatcher) -> String {
    format!(
        "{}\nSolve, simplify, factor, and expand algebraic expressions with complete step-by-step solutions.\n\n{}\n\nSelected: {}. Type 'help' for commands.",
        TITLE,
        Operation::menu(),
        dispatcher.session().selection()
    )
}

/// Reads commands from `src` until `quit` or the end of input, writing all output to `out`.
pub fn run_session(dispatcher: &mut Dispatcher, src: &mut dyn LineSource, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", banner(dispatcher))?;
    while let Some(line) = src.read_line(PROMPT) {
        let text = match parse_command(&line) {
            Command::Quit => break,
            Command::Run => dispatcher.run_selected(src),
            Command::Ops => Operation::menu(),
            Command::Use(selector) => match Operation::from_selector(&selector) {
                Some(operation) => {
                    dispatcher.select(operation);
                    format!("Selected: {}", operation)
                }
                None => format!("Unknown operation '{}'\n{}", selector, Operation::menu()),
            },
            Command::History { all } => dispatcher.history_view(all),
            Command::Help => format!("{}\n\n{}", COMMANDS, NOTATION_GUIDE),
            Command::Unknown(text) => format!("Unknown command '{}'. Type 'help' for commands.", text),
        };
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

pub fn run_repl(dispatcher: &mut Dispatcher) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = EditorLines::new()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_session(dispatcher, &mut lines, &mut out)?;
    Ok(())
}
