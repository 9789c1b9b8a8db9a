//! Operator-facing terminal output.
//!
//! Status lines go to stderr so that generated text on stdout can be piped.

use std::io::{self, BufRead, Write};

use crate::error::Result;

pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red
}

pub fn display_success(message: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", message); // Green
}

pub fn display_status(message: &str) {
    eprintln!("\x1b[33m→\x1b[0m {}", message); // Yellow
}

pub fn display_warning(message: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m  {}", message);
}

pub fn display_hint(message: &str) {
    eprintln!("\x1b[2m{}\x1b[0m", message); // Dim
}

/// Print generated text under a heading, to stdout.
pub fn display_preview(heading: &str, text: &str) {
    println!("\n\x1b[1m{}\x1b[0m\n", heading);
    println!("{}", text);
}

pub fn display_pr_preview(title: &str, source: &str, target: &str, description: &str) {
    println!("\n\x1b[33m━━━ PR Preview ━━━\x1b[0m\n");
    println!("\x1b[1mTitle:\x1b[0m {}", title);
    println!("\x1b[1mBranch:\x1b[0m {} → {}", source, target);
    println!("\n\x1b[1mDescription:\x1b[0m");
    println!("{}", description);
    println!("\n\x1b[33m━━━━━━━━━━━━━━━━━\x1b[0m\n");
}

pub fn display_change_summary(commit_messages: &[String], pr_numbers: &[u64]) {
    eprintln!(
        "\n\x1b[1mFound {} commits referencing {} PRs\x1b[0m",
        commit_messages.len(),
        pr_numbers.len()
    );
    for (i, message) in commit_messages.iter().take(10).enumerate() {
        let short: String = message.chars().take(72).collect();
        eprintln!("  {}. {}", i + 1, short);
    }
    if commit_messages.len() > 10 {
        eprintln!("  ... and {} more commits", commit_messages.len() - 10);
    }
}

/// Yes/no questions put to the operator.
pub trait Prompter: Send + Sync {
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Reads answers from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        eprint!("\x1b[33m?\x1b[0m {} \x1b[90m({})\x1b[0m ", message, hint);
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(parse_answer(&input, default))
    }
}

/// Empty input takes the default; anything but `y`/`yes` is a no.
pub fn parse_answer(input: &str, default: bool) -> bool {
    let answer = input.trim().to_lowercase();
    if answer.is_empty() {
        return default;
    }
    answer == "y" || answer == "yes"
}
