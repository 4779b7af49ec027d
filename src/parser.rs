//! Line grammars for extracting timing measurements from trial output
//!
//! Supports two grammars:
//! - Token: gtest `[       OK ] Fixture.Test (123 ms)` result lines
//! - Pattern: fixture-prefixed `...OperationsFixture.Fib50 (4567 ns)...` lines

use anyhow::Result;
use regex::Regex;

/// One timing measurement extracted from a single output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Benchmark case name, without its fixture prefix
    pub test_id: String,
    /// Raw elapsed magnitude in whatever unit the source line encodes
    pub elapsed: u64,
}

/// A line grammar active for one collection session
#[derive(Debug, Clone)]
pub enum LineGrammar {
    /// Whitespace-token grammar over gtest result lines
    Token,
    /// Compiled pattern anchored on a fixture-name prefix
    Pattern(Regex),
}

impl LineGrammar {
    /// The token grammar
    pub fn token() -> Self {
        Self::Token
    }

    /// Build the pattern grammar for a fixture-name prefix
    pub fn pattern(fixture: &str) -> Result<Self> {
        let re = Regex::new(&format!(r"{}\.(\S+) \((\d+) ", regex::escape(fixture)))?;
        Ok(Self::Pattern(re))
    }

    /// Classify one line of output; `None` for anything unrelated.
    ///
    /// Pure and infallible: malformed numbers inside an otherwise-matching
    /// line are a non-match, not an error.
    pub fn parse_line(&self, line: &str) -> Option<Measurement> {
        match self {
            Self::Token => parse_token_line(line),
            Self::Pattern(re) => parse_pattern_line(re, line),
        }
    }
}

/// Token grammar: token[1] must be the `OK` success marker, token[3] is the
/// dotted test name, token[4] carries the elapsed value behind a one-char
/// unit marker (e.g. `(123`).
fn parse_token_line(line: &str) -> Option<Measurement> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 || parts[1] != "OK" {
        return None;
    }
    // Name after the first dot; a dotless token is used whole.
    let test_id = match parts[3].split_once('.') {
        Some((_, suffix)) => suffix,
        None => parts[3],
    };
    let mut value = parts[4].chars();
    let marker = value.next()?;
    if marker.is_ascii_digit() {
        // A digit here is the value itself, not a unit marker.
        return None;
    }
    let elapsed = value.as_str().parse().ok()?;
    Some(Measurement {
        test_id: test_id.to_string(),
        elapsed,
    })
}

fn parse_pattern_line(re: &Regex, line: &str) -> Option<Measurement> {
    let caps = re.captures(line)?;
    let test_id = caps.get(1)?.as_str().to_string();
    let elapsed = caps.get(2)?.as_str().parse().ok()?;
    Some(Measurement { test_id, elapsed })
}
