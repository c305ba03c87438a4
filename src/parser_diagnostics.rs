//! Structured parse diagnostics.
//!
//! Two caller-visible error kinds, kept deliberately separate: a
//! [`SyntaxError`] describes bad input and is always recoverable by the
//! caller, while an [`UnsupportedConstructError`] flags a grammar corner
//! the parser recognizes but has no semantic action for. Violations of
//! internal tree-building invariants are a third kind and panic instead
//! (see [`crate::builder::set_once`]).

use serde::Serialize;
use thiserror::Error;

use crate::ast::Loc;

/// What a failed alternative was looking for at some offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Expectation {
    /// Verbatim text, e.g. a keyword or punctuator.
    Literal { text: String },
    /// A character class, described like `[0-9a-f]`.
    Class { desc: String, inverted: bool },
    /// Any character at all.
    Any,
    /// End of input.
    EndOfInput,
    /// Free-text description, e.g. `identifier`.
    Other { desc: String },
}

impl Expectation {
    pub fn other(desc: &str) -> Expectation {
        Expectation::Other {
            desc: desc.to_owned(),
        }
    }

    fn render(&self) -> String {
        match self {
            Expectation::Literal { text } => format!("\"{}\"", escape(text)),
            Expectation::Class { desc, inverted } => {
                if *inverted {
                    format!("not {}", desc)
                } else {
                    desc.clone()
                }
            }
            Expectation::Any => "any character".to_owned(),
            Expectation::EndOfInput => "end of input".to_owned(),
            Expectation::Other { desc } => desc.clone(),
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Expected-vs-found mismatch, reported at the furthest offset any
/// alternative reached.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub expected: Vec<Expectation>,
    /// The offending character, or `None` at end of input.
    pub found: Option<char>,
    pub location: Loc,
}

impl SyntaxError {
    /// Builds the error message from raw failure state: descriptors are
    /// rendered, deduplicated, sorted, and joined.
    pub fn from_failure(expected: Vec<Expectation>, found: Option<char>, location: Loc) -> Self {
        let mut descs = expected.iter().map(|e| e.render()).collect::<Vec<_>>();
        descs.sort();
        descs.dedup();
        let expected_desc = match descs.len() {
            0 => "nothing".to_owned(),
            1 => descs[0].clone(),
            2 => format!("{} or {}", descs[0], descs[1]),
            n => format!("{}, or {}", descs[..n - 1].join(", "), descs[n - 1]),
        };
        let found_desc = match found {
            Some(ch) => format!("\"{}\"", escape(&ch.to_string())),
            None => "end of input".to_owned(),
        };
        let message = format!("Expected {} but {} found.", expected_desc, found_desc);
        SyntaxError {
            message,
            expected,
            found,
            location,
        }
    }
}

/// A construct the grammar recognizes but the tree builder deliberately
/// does not implement yet. Programmer-facing, unlike [`SyntaxError`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("unsupported construct: {construct}")]
pub struct UnsupportedConstructError {
    pub construct: String,
    pub location: Loc,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstructError),
}

impl ParseError {
    pub fn location(&self) -> Loc {
        match self {
            ParseError::Syntax(e) => e.location,
            ParseError::Unsupported(e) => e.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_single_expectation() {
        let e = SyntaxError::from_failure(
            vec![Expectation::Literal { text: ";".into() }],
            Some('}'),
            Loc::default(),
        );
        assert_eq!(e.message, "Expected \";\" but \"}\" found.");
    }

    #[test]
    fn test_message_sorts_and_dedups() {
        let e = SyntaxError::from_failure(
            vec![
                Expectation::other("identifier"),
                Expectation::Literal { text: "class".into() },
                Expectation::other("identifier"),
                Expectation::Any,
            ],
            None,
            Loc::default(),
        );
        assert_eq!(
            e.message,
            "Expected \"class\", any character, or identifier but end of input found."
        );
    }

    #[test]
    fn test_message_two_expectations() {
        let e = SyntaxError::from_failure(
            vec![
                Expectation::Class {
                    desc: "[0-9]".into(),
                    inverted: false,
                },
                Expectation::EndOfInput,
            ],
            Some('_'),
            Loc::default(),
        );
        assert_eq!(e.message, "Expected [0-9] or end of input but \"_\" found.");
    }

    #[test]
    fn test_inverted_class_rendering() {
        let e = SyntaxError::from_failure(
            vec![Expectation::Class {
                desc: "[*/]".into(),
                inverted: true,
            }],
            Some('/'),
            Loc::default(),
        );
        assert_eq!(e.message, "Expected not [*/] but \"/\" found.");
    }
}
