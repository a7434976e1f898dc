//! Console seam
//!
//! All prompts and narration lines go through the `Console` trait so
//! the stage protocol can be exercised by tests with scripted input.

use std::io::{self, BufRead, Write};

/// Line-oriented console I/O
pub trait Console: Send {
    /// Print one line of narration or feedback
    fn print(&mut self, text: &str);

    /// Print a prompt (no trailing newline) and block for one input
    /// line. The returned line has its trailing newline removed.
    fn prompt(&mut self, prompt: &str) -> io::Result<String>;
}

/// Real stdin/stdout console used by the binary
pub struct StdConsole;

impl Console for StdConsole {
    fn print(&mut self, text: &str) {
        println!("{}", text);
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed",
            ));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}

/// Scripted console for tests: canned answers in, transcript out
///
/// Exposed from the library (not behind `cfg(test)`) so integration
/// tests can drive full sessions.
pub struct ScriptedConsole {
    answers: std::collections::VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }
}

impl Console for ScriptedConsole {
    fn print(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<String> {
        self.transcript.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console_replays_answers_in_order() {
        let mut console = ScriptedConsole::new(["1", "꽃"]);
        assert_eq!(console.prompt("Answer : ").unwrap(), "1");
        assert_eq!(console.prompt("Answer : ").unwrap(), "꽃");
        assert!(console.prompt("Answer : ").is_err());
    }
}
