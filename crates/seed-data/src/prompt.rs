//! Interactive prompts for the seed binaries.
//!
//! Parsing is separated from terminal IO: the `parse_*` functions are
//! pure and unit-tested, the `ask_*` functions loop over stdin until a
//! parse succeeds. Destructive actions only proceed on an explicit `yes`;
//! hitting enter, or anything else, cancels.

use std::io::{self, BufRead, Write};

/// Deletion scope chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeScope {
    All,
    Count(usize),
}

/// Parses a positive record count.
pub fn parse_count(input: &str) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(count) if count > 0 => Some(count),
        _ => None,
    }
}

/// Parses a non-negative inter-chunk delay in seconds.
pub fn parse_delay(input: &str) -> Option<u64> {
    input.trim().parse::<u64>().ok()
}

/// Parses `all` or a positive count.
pub fn parse_purge_scope(input: &str) -> Option<PurgeScope> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Some(PurgeScope::All);
    }
    parse_count(trimmed).map(PurgeScope::Count)
}

/// True only for an explicit `yes`, in any letter case.
pub fn confirmed(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}

fn read_line(question: &str) -> io::Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Asks for a positive count, re-prompting until one is given.
pub fn ask_count(question: &str) -> io::Result<usize> {
    loop {
        let line = read_line(question)?;
        match parse_count(&line) {
            Some(count) => return Ok(count),
            None => println!("Invalid input. Please enter a positive whole number."),
        }
    }
}

/// Asks for a count, falling back to `default` on empty input.
pub fn ask_count_or_default(question: &str, default: usize) -> io::Result<usize> {
    loop {
        let line = read_line(question)?;
        if line.trim().is_empty() {
            return Ok(default);
        }
        match parse_count(&line) {
            Some(count) => return Ok(count),
            None => println!("Invalid input. Please enter a positive whole number."),
        }
    }
}

/// Asks for the inter-chunk delay, falling back to `default` (with a
/// notice) on empty or invalid input.
pub fn ask_delay_secs(default: u64) -> io::Result<u64> {
    let line = read_line(&format!(
        "Enter delay in seconds between batches (default is {default}): "
    ))?;
    match parse_delay(&line) {
        Some(delay) => Ok(delay),
        None => {
            println!("Invalid or no input. Using default delay of {default} seconds.");
            Ok(default)
        }
    }
}

/// Asks whether to purge everything or a specific amount.
pub fn ask_purge_scope() -> io::Result<PurgeScope> {
    loop {
        let line = read_line(
            "Do you want to delete all matching items or a specific amount? (Enter 'all' or a number): ",
        )?;
        match parse_purge_scope(&line) {
            Some(scope) => return Ok(scope),
            None => println!("Invalid choice. Please enter 'all' or a positive whole number."),
        }
    }
}

/// Asks a yes/no question; anything but an explicit `yes` is a no.
pub fn ask_confirmation(question: &str) -> io::Result<bool> {
    let line = read_line(question)?;
    Ok(confirmed(&line))
}
