//! Terminal prompts

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sheetsync_core::traits::Prompt;
use sheetsync_core::{Result, SyncError};
use std::path::PathBuf;

/// Line-oriented prompt on stdin/stdout. End of input or Ctrl-C counts as
/// cancelling the current question.
pub struct ConsolePrompt {
    editor: DefaultEditor,
}

impl ConsolePrompt {
    /// Start a line editor on the terminal
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Prompt` if the terminal cannot be initialised
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| SyncError::prompt(format!("cannot start line editor: {e}")))?;
        Ok(Self { editor })
    }

    fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(SyncError::prompt(format!("cannot read input: {e}"))),
        }
    }
}

impl Prompt for ConsolePrompt {
    fn choose_path(&mut self, title: &str) -> Result<Option<PathBuf>> {
        println!("\n[{}]", title.bold());
        let Some(line) = self.read("path:> ")? else {
            return Ok(None);
        };
        // Paths dropped onto a terminal arrive quoted.
        let path = line.trim_matches(|c| c == '"' || c == '\'');
        if path.is_empty() {
            return Ok(None);
        }
        std::path::absolute(path)
            .map(Some)
            .map_err(|e| SyncError::io(path, e))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        println!("\n[{}]", question.bold());
        loop {
            let Some(answer) = self.read("y/n:> ")? else {
                return Ok(false);
            };
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("{}", "Please answer y or n".yellow()),
            }
        }
    }

    fn choose(&mut self, title: &str, options: &[&str]) -> Result<Option<usize>> {
        loop {
            println!("\n[{}]", title.bold());
            for (i, option) in options.iter().enumerate() {
                println!("{}. {option}", (i + 1).to_string().cyan());
            }
            let Some(line) = self.read("command:> ")? else {
                return Ok(None);
            };
            match line.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => println!("{}", format!("Enter a number from 1 to {}", options.len()).yellow()),
            }
        }
    }
}

/// Non-interactive prompt for scripted runs: every confirmation gets the
/// same answer and path or menu questions are cancelled.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn choose_path(&mut self, _title: &str) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }

    fn choose(&mut self, _title: &str, _options: &[&str]) -> Result<Option<usize>> {
        Ok(None)
    }
}
