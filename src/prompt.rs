use std::io::{self, BufRead, Write};

use crate::errors::GenError;

/// Operator interaction needed while writing files.
pub trait Prompt {
    /// Yes/no question; an empty answer takes `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, GenError>;

    fn ask(&mut self, question: &str) -> Result<String, GenError>;

    /// The operator must type `expected` exactly for the answer to count.
    fn confirm_by_typing(&mut self, question: &str, expected: &str) -> Result<bool, GenError> {
        let answer = self.ask(question)?;
        Ok(answer.trim() == expected)
    }
}

/// Reads answers line by line from `input`, writes questions to `output`.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String, GenError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(GenError::Prompt("input closed".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, GenError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        write!(self.output, "{} {} ", question, hint)?;
        self.output.flush()?;

        loop {
            let answer = self.read_line()?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => {
                    write!(self.output, "Please answer yes or no {} ", hint)?;
                    self.output.flush()?;
                }
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<String, GenError> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;
        self.read_line()
    }
}

/// Answers every question without asking, for unattended runs.
///
/// With `answer_yes` every confirmation is accepted, including typed
/// confirmations. Otherwise each question takes its default and typed
/// confirmations fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyPrompt {
    pub answer_yes: bool,
}

impl Prompt for PolicyPrompt {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, GenError> {
        let answer = self.answer_yes || default;
        log::debug!("{} -> {}", question, if answer { "yes" } else { "no" });
        Ok(answer)
    }

    fn ask(&mut self, question: &str) -> Result<String, GenError> {
        Err(GenError::Prompt(format!(
            "cannot answer `{}` without interaction",
            question
        )))
    }

    fn confirm_by_typing(&mut self, _question: &str, _expected: &str) -> Result<bool, GenError> {
        Ok(self.answer_yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> ConsolePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_confirm_takes_default_on_empty_answer() {
        let mut prompt = console("\n");
        assert!(!prompt.confirm("Create?", false).unwrap());

        let mut prompt = console("\n");
        assert!(prompt.confirm("Create?", true).unwrap());
    }

    #[test]
    fn test_confirm_repeats_until_valid_answer() {
        let mut prompt = console("maybe\nYes\n");
        assert!(prompt.confirm("Create?", false).unwrap());

        let written = String::from_utf8(prompt.output).unwrap();
        assert!(written.starts_with("Create? [y/N] "));
        assert!(written.contains("Please answer yes or no"));
    }

    #[test]
    fn test_confirm_by_typing() {
        let mut prompt = console("Users\n");
        assert!(prompt.confirm_by_typing("Type the model name:", "Users").unwrap());

        let mut prompt = console("users\n");
        assert!(!prompt.confirm_by_typing("Type the model name:", "Users").unwrap());
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut prompt = console("");
        assert!(matches!(prompt.ask("Name?"), Err(GenError::Prompt(_))));
    }

    #[test]
    fn test_policy_prompt() {
        let mut yes = PolicyPrompt { answer_yes: true };
        assert!(yes.confirm("Create?", false).unwrap());
        assert!(yes.confirm_by_typing("Type:", "Users").unwrap());

        let mut defaults = PolicyPrompt::default();
        assert!(!defaults.confirm("Create?", false).unwrap());
        assert!(defaults.confirm("Continue?", true).unwrap());
        assert!(!defaults.confirm_by_typing("Type:", "Users").unwrap());
    }
}
