//! The parsing engine: a scannerless recursive-descent (PEG) parser.
//!
//! One non-terminal is one method on [`Parser`]. A rule either returns
//! its constructed value or the [`Fail`] sentinel with the cursor
//! restored; `?` is the sequencing combinator, [`alt!`] is ordered
//! choice, and the predicate helpers probe without consuming. There is
//! no memoization: re-derivation after backtracking is accepted so that
//! every attempted alternative's failure stays visible to the
//! furthest-failure tracker.

use bstr::{BString, ByteSlice};

use crate::ast::{Block, CompilationUnit, Expr, Loc, Stmt};
use crate::parser_diagnostics::{
    Expectation, ParseError, SyntaxError, UnsupportedConstructError,
};
use crate::pos::SourceLocator;

mod decl;
mod expr;
mod lexical;
mod stmt;
mod types;

/// Parses a whole compilation unit. The parse succeeds only if the
/// grammar consumed the entire input; a strict-prefix match is reported
/// as a syntax error at the furthest failure, not at the stop point.
pub fn parse(source: &[u8]) -> Result<CompilationUnit, ParseError> {
    let mut parser = Parser::new(source);
    let result = parser.attempt(|p| {
        p.spacing()?;
        p.compilation_unit()
    });
    parser.finish(result)
}

/// Entry point for isolated expression-grammar testing.
pub fn parse_expression(source: &[u8]) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(source);
    let result = parser.attempt(|p| {
        p.spacing()?;
        p.expression()
    });
    parser.finish(result)
}

/// Entry point for isolated statement-grammar testing.
pub fn parse_statement(source: &[u8]) -> Result<Stmt, ParseError> {
    let mut parser = Parser::new(source);
    let result = parser.attempt(|p| {
        p.spacing()?;
        let statement = p.block_statement()?;
        p.spacing()?;
        Ok(statement)
    });
    parser.finish(result)
}

/// Entry point for isolated block-grammar testing.
pub fn parse_block(source: &[u8]) -> Result<Block, ParseError> {
    let mut parser = Parser::new(source);
    let result = parser.attempt(|p| {
        p.spacing()?;
        let block = p.block()?;
        p.spacing()?;
        Ok(block)
    });
    parser.finish(result)
}

/// Soft-failure sentinel. Carries no data: the interesting failure
/// state lives in the parser's furthest-failure tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fail;

pub(crate) type PResult<T> = Result<T, Fail>;

/// Ordered choice: tries each alternative in textual order against the
/// same start position and commits to the first success. Stops early
/// when a stub action has flagged the parse as unsupported.
macro_rules! alt {
    ($p:expr, $($f:expr),+ $(,)?) => {{
        'alt: {
            $(
                match $p.attempt($f) {
                    Ok(value) => break 'alt Ok(value),
                    Err(fail) if $p.halted() => break 'alt Err(fail),
                    Err(_) => {}
                }
            )+
            Err(crate::parsing::Fail)
        }
    }};
}
pub(crate) use alt;

/// All mutable parse state. One instance per parse call, so concurrent
/// parses of different inputs never share anything.
#[derive(Debug)]
pub(crate) struct Parser {
    pub(crate) source: BString,
    pub(crate) pos: usize,
    /// End offset of the most recent token, before trailing spacing.
    pub(crate) token_end: usize,
    pub(crate) locator: SourceLocator,
    /// Rightmost offset any alternative has failed at.
    furthest_pos: usize,
    /// Everything that was expected at `furthest_pos`.
    furthest_expected: Vec<Expectation>,
    /// Non-zero while probing inside a lookahead predicate; failures in
    /// a probe are not reported to the tracker.
    silent: u32,
    /// Set by stub actions for recognized-but-unimplemented constructs;
    /// aborts the parse instead of backtracking.
    unsupported: Option<UnsupportedConstructError>,
}

impl Parser {
    pub(crate) fn new(source: &[u8]) -> Parser {
        Parser {
            source: source.into(),
            pos: 0,
            token_end: 0,
            locator: SourceLocator::new(),
            furthest_pos: 0,
            furthest_expected: Vec::new(),
            silent: 0,
            unsupported: None,
        }
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// Runs `f`, restoring the cursor if it fails.
    pub(crate) fn attempt<T, F>(&mut self, f: F) -> PResult<T>
    where
        F: FnOnce(&mut Self) -> PResult<T>,
    {
        let pos = self.pos;
        let token_end = self.token_end;
        let result = f(self);
        if result.is_err() {
            self.pos = pos;
            self.token_end = token_end;
        }
        result
    }

    /// Optional: maps a failed sub-parse to `None` without aborting.
    pub(crate) fn opt<T, F>(&mut self, f: F) -> PResult<Option<T>>
    where
        F: FnOnce(&mut Self) -> PResult<T>,
    {
        match self.attempt(f) {
            Ok(value) => Ok(Some(value)),
            Err(fail) if self.halted() => Err(fail),
            Err(_) => Ok(None),
        }
    }

    /// Zero-or-more: collects successes until the sub-parse fails.
    pub(crate) fn many<T, F>(&mut self, mut f: F) -> PResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> PResult<T>,
    {
        let mut items = Vec::new();
        loop {
            match self.attempt(&mut f) {
                Ok(value) => items.push(value),
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => return Ok(items),
            }
        }
    }

    /// One-or-more.
    pub(crate) fn many1<T, F>(&mut self, mut f: F) -> PResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> PResult<T>,
    {
        let first = f(self)?;
        let mut rest = self.many(f)?;
        rest.insert(0, first);
        Ok(rest)
    }

    /// And-predicate: succeeds iff `f` matches here, consuming nothing
    /// and reporting nothing.
    pub(crate) fn peek<T, F>(&mut self, f: F) -> PResult<T>
    where
        F: FnOnce(&mut Self) -> PResult<T>,
    {
        let pos = self.pos;
        let token_end = self.token_end;
        self.silent += 1;
        let result = f(self);
        self.silent -= 1;
        self.pos = pos;
        self.token_end = token_end;
        result
    }

    /// Not-predicate: succeeds iff `f` fails here, consuming nothing
    /// and reporting nothing.
    pub(crate) fn not_ahead<T, F>(&mut self, f: F) -> PResult<()>
    where
        F: FnOnce(&mut Self) -> PResult<T>,
    {
        match self.peek(f) {
            Ok(_) => Err(Fail),
            Err(fail) if self.halted() => Err(fail),
            Err(_) => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Failure tracking
    // ------------------------------------------------------------------

    /// Records a failure at the cursor and returns the sentinel.
    /// Earlier failures are ignored, ties accumulate expectations, and
    /// a further failure resets the tracker.
    pub(crate) fn fail(&mut self, expectation: Expectation) -> Fail {
        self.fail_at(self.pos, expectation)
    }

    pub(crate) fn fail_at(&mut self, at: usize, expectation: Expectation) -> Fail {
        if self.silent == 0 {
            if at > self.furthest_pos {
                self.furthest_pos = at;
                self.furthest_expected.clear();
            }
            if at == self.furthest_pos {
                self.furthest_expected.push(expectation);
            }
        }
        Fail
    }

    /// Stub action for a recognized-but-unimplemented construct: flags
    /// the parse so no alternative can paper over it.
    pub(crate) fn unsupported(&mut self, construct: &str, start: usize) -> Fail {
        if self.unsupported.is_none() {
            let location = self.loc_from(start);
            self.unsupported = Some(UnsupportedConstructError {
                construct: construct.to_owned(),
                location,
            });
        }
        Fail
    }

    pub(crate) fn halted(&self) -> bool {
        self.unsupported.is_some()
    }

    // ------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------

    /// Extent from `start` to the end of the most recent token.
    pub(crate) fn loc_from(&mut self, start: usize) -> Loc {
        let end = self.token_end.max(start);
        Loc {
            start: self.locator.pos_at(&self.source, start),
            end: self.locator.pos_at(&self.source, end),
        }
    }

    /// Zero-width extent at `at`.
    pub(crate) fn loc_here(&mut self, at: usize) -> Loc {
        let pos = self.locator.pos_at(&self.source, at);
        Loc { start: pos, end: pos }
    }

    // ------------------------------------------------------------------
    // Driver
    // ------------------------------------------------------------------

    /// Converts the final rule outcome into the public result: success
    /// requires full input consumption, and any failure is rendered
    /// from the furthest-failure state.
    pub(crate) fn finish<T>(&mut self, result: PResult<T>) -> Result<T, ParseError> {
        if let Some(unsupported) = self.unsupported.take() {
            return Err(ParseError::Unsupported(unsupported));
        }
        if let Ok(value) = result {
            if self.pos >= self.source.len() {
                return Ok(value);
            }
            // The start rule matched a strict prefix.
            self.fail(Expectation::EndOfInput);
        }
        let offset = self.furthest_pos;
        let found = self.source[offset..].chars().next();
        let location = match found {
            Some(ch) => {
                let start = self.locator.pos_at(&self.source, offset);
                let end = self.locator.pos_at(&self.source, offset + ch.len_utf8());
                Loc { start, end }
            }
            None => self.loc_here(offset),
        };
        let expected = std::mem::take(&mut self.furthest_expected);
        Err(ParseError::Syntax(SyntaxError::from_failure(
            expected, found, location,
        )))
    }
}
