//! Pause-and-inspect support for a running interpreter.
//!
//! The console itself (prompting, reading lines) belongs to the caller.
//! This module parses its commands and applies them:
//!
//! | Command | Effect                                  |
//! |---------|-----------------------------------------|
//! | `h`     | print the command list                  |
//! | `a`     | abort the run                           |
//! | `n`     | execute the next operation              |
//! | `r`     | clear the pause token and resume        |
//! | `g N`   | print cell `N` (zero-based)             |
//! | `s N X` | set cell `N` to `X`                     |

use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::str::FromStr;

use tracing::{debug, info};

use crate::core::BfResult;
use crate::vm::{Interpreter, RunStatus, StepOutcome};

pub const HELP: &str = "\
h     ; Prints this helpful list
a     ; Aborts the interpreter
n     ; Runs the next instruction
r     ; Resumes normal execution
g N   ; Prints the value of the Nth tape cell( zero-based )
s N X ; Gives a new value to the Nth tape cell( zero-based )
";

/// A console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    Help,
    Abort,
    Next,
    Resume,
    Get(i64),
    Set(i64, u64),
}

impl FromStr for DebugCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".into());
        };
        let command = match verb {
            "h" => DebugCommand::Help,
            "a" => DebugCommand::Abort,
            "n" => DebugCommand::Next,
            "r" => DebugCommand::Resume,
            "g" => DebugCommand::Get(number(words.next(), "cell index")?),
            "s" => DebugCommand::Set(
                number(words.next(), "cell index")?,
                number(words.next(), "cell value")?,
            ),
            other => return Err(format!("unknown command '{}' (h for help)", other)),
        };
        match words.next() {
            Some(extra) => Err(format!("unexpected argument '{}'", extra)),
            None => Ok(command),
        }
    }
}

fn number<T: FromStr>(word: Option<&str>, what: &str) -> Result<T, String> {
    let word = word.ok_or_else(|| format!("missing {}", what))?;
    word.parse().map_err(|_| format!("invalid {} '{}'", what, word))
}

/// What applying a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text for the console; the interpreter is still paused.
    Message(String),
    Stepped(StepOutcome),
    Resumed,
    Aborted,
}

/// Applies console commands to a paused interpreter.
pub struct Inspector<'a> {
    vm: &'a mut Interpreter,
}

impl<'a> Inspector<'a> {
    pub fn new(vm: &'a mut Interpreter) -> Self {
        Self { vm }
    }

    /// The status block shown before each prompt.
    pub fn preview(&mut self) -> BfResult<String> {
        let next = self.vm.peek_next()?;
        let machine = self.vm.machine();
        let mut text = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(text, "-----------------");
        let _ = writeln!(text, "Current IP      : {}", machine.pc);
        let _ = writeln!(text, "Current Pointer : {}", machine.cursor);
        let _ = writeln!(text, "Current Storage : {}", machine.storage);
        match next {
            Some(operation) => {
                let _ = writeln!(text, "Next instruction: {}", operation);
            }
            None => {
                let _ = writeln!(text, "Next instruction: (end of program)");
            }
        }
        Ok(text)
    }

    pub fn apply(&mut self, command: DebugCommand) -> BfResult<Reply> {
        debug!(?command, pc = self.vm.machine().pc, "debug command");
        match command {
            DebugCommand::Help => Ok(Reply::Message(HELP.to_string())),
            DebugCommand::Abort => Ok(Reply::Aborted),
            DebugCommand::Next => Ok(Reply::Stepped(self.vm.step()?)),
            DebugCommand::Resume => {
                if let Some(token) = self.vm.pause_token() {
                    token.resume();
                }
                Ok(Reply::Resumed)
            }
            DebugCommand::Get(index) => {
                let value = self.vm.cell(index)?;
                Ok(Reply::Message(format!("Cell at #{}:\n        {}\n", index, value)))
            }
            DebugCommand::Set(index, value) => {
                self.vm.set_cell(index, value)?;
                Ok(Reply::Message(String::new()))
            }
        }
    }

    /// Prompt until a command leaves the console: a step, resume or abort.
    ///
    /// End of the command stream counts as abort. Unparseable lines are
    /// reported and prompted again. Lines are read a byte at a time, so the
    /// console may share a stream with the program's own input.
    pub fn session<R: Read, W: Write>(&mut self, mut input: R, mut out: W) -> BfResult<Reply> {
        loop {
            out.write_all(self.preview()?.as_bytes())?;
            loop {
                write!(out, "What to do ( h ): ")?;
                out.flush()?;
                let Some(line) = read_line(&mut input)? else {
                    return Ok(Reply::Aborted);
                };
                match line.parse::<DebugCommand>() {
                    Ok(command) => match self.apply(command)? {
                        Reply::Message(text) => {
                            out.write_all(text.as_bytes())?;
                            break;
                        }
                        reply => return Ok(reply),
                    },
                    Err(message) => writeln!(out, "{}", message)?,
                }
            }
        }
    }
}

/// One line without its newline; `None` once the stream is exhausted.
fn read_line<R: Read>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) if line.is_empty() => return Ok(None),
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) => line.push(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Run `vm`, opening a console session each time it pauses.
///
/// Returns `Halted` once the program ends, or `Paused` if the console
/// aborted it.
pub fn debug_run<R: Read, W: Write>(
    vm: &mut Interpreter,
    mut input: R,
    mut out: W,
) -> BfResult<RunStatus> {
    loop {
        if vm.run()? == RunStatus::Halted {
            return Ok(RunStatus::Halted);
        }
        let reply = Inspector::new(vm).session(&mut input, &mut out)?;
        match reply {
            Reply::Aborted => {
                info!(pc = vm.machine().pc, "aborted from the console");
                return Ok(RunStatus::Paused);
            }
            Reply::Stepped(StepOutcome::Halted) => return Ok(RunStatus::Halted),
            Reply::Stepped(StepOutcome::Running) | Reply::Resumed | Reply::Message(_) => {}
        }
    }
}
