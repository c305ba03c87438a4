//! Lexical primitives: the character-level matchers every grammar rule
//! bottoms out in.
//!
//! There is no token stream; rules match text directly. Most tokens
//! consume trailing [`Parser::spacing`] (whitespace and comments). The
//! three statement-boundary tokens (`;`, `{`, `}` via
//! [`Parser::sym_line`]) consume only horizontal whitespace and at most
//! one line terminator, so comment lines and blank lines survive for
//! the statement stream to capture as explicit markers.

use bstr::{BStr, ByteSlice};
use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::ast::{Loc, SimpleName};
use crate::parser_diagnostics::Expectation;
use crate::parsing::{PResult, Parser};

/// Reserved words, which an identifier must not collide with; checked
/// with a negative lookahead before the identifier rule commits.
static KEYWORDS: Lazy<HashSet<&BStr>> = Lazy::new(|| {
    [
        "abstract",
        "assert",
        "boolean",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "class",
        "const",
        "continue",
        "default",
        "do",
        "double",
        "else",
        "enum",
        "extends",
        "false",
        "final",
        "finally",
        "float",
        "for",
        "goto",
        "if",
        "implements",
        "import",
        "instanceof",
        "int",
        "interface",
        "long",
        "native",
        "new",
        "null",
        "package",
        "private",
        "protected",
        "public",
        "return",
        "short",
        "static",
        "strictfp",
        "super",
        "switch",
        "synchronized",
        "this",
        "throw",
        "throws",
        "transient",
        "true",
        "try",
        "void",
        "volatile",
        "while",
    ]
    .into_iter()
    .map(|k| <&BStr>::from(k.as_bytes()))
    .collect()
});

fn is_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$' || byte >= 0x80
}

fn is_letter_or_digit(byte: u8) -> bool {
    is_letter(byte) || byte.is_ascii_digit()
}

/// A comment or blank line captured at statement or member position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SourceMarker {
    EndOfLine { comment: String, loc: Loc },
    Traditional { comment: String, loc: Loc },
    JavaDoc { comment: String, loc: Loc },
    Blank { loc: Loc },
}

impl Parser {
    // ------------------------------------------------------------------
    // Raw matchers
    // ------------------------------------------------------------------

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub(crate) fn byte(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    /// Matches `text` verbatim without recording or trailing spacing.
    fn match_str(&mut self, text: &str) -> bool {
        if self.source[self.pos..].starts_with(text.as_bytes()) {
            self.pos += text.len();
            self.token_end = self.pos;
            true
        } else {
            false
        }
    }

    /// Single byte satisfying `pred`, reported as the class `desc`.
    fn class(&mut self, pred: fn(u8) -> bool, desc: &str) -> PResult<u8> {
        match self.byte() {
            Some(byte) if pred(byte) => {
                self.pos += 1;
                self.token_end = self.pos;
                Ok(byte)
            }
            _ => Err(self.fail(Expectation::Class {
                desc: desc.to_owned(),
                inverted: false,
            })),
        }
    }

    fn any_char(&mut self) -> PResult<u8> {
        match self.byte() {
            Some(byte) => {
                self.pos += 1;
                self.token_end = self.pos;
                Ok(byte)
            }
            None => Err(self.fail(Expectation::Any)),
        }
    }

    /// Verbatim text with failure reporting, no trailing spacing.
    pub(crate) fn literal(&mut self, text: &str) -> PResult<()> {
        if self.match_str(text) {
            Ok(())
        } else {
            Err(self.fail(Expectation::Literal {
                text: text.to_owned(),
            }))
        }
    }

    // ------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------

    /// Punctuator followed by full spacing.
    pub(crate) fn sym(&mut self, text: &str) -> PResult<()> {
        self.literal(text)?;
        self.spacing()
    }

    /// Punctuator that must not be followed by any byte in `excl`;
    /// keeps `<` from eating the head of `<=` and the like.
    pub(crate) fn sym_not(&mut self, text: &str, excl: &[u8]) -> PResult<()> {
        let start = self.pos;
        if !self.match_str(text) {
            return Err(self.fail(Expectation::Literal {
                text: text.to_owned(),
            }));
        }
        if let Some(byte) = self.byte() {
            if excl.contains(&byte) {
                self.pos = start;
                return Err(self.fail(Expectation::Literal {
                    text: text.to_owned(),
                }));
            }
        }
        self.spacing()
    }

    /// Statement-boundary punctuator: consumes trailing indent and at
    /// most one line terminator, leaving further lines to the stream.
    pub(crate) fn sym_line(&mut self, text: &str) -> PResult<()> {
        self.literal(text)?;
        let token_end = self.token_end;
        self.indent();
        let _ = self.attempt(Self::eol);
        // The line terminator is trailing trivia, not token text.
        self.token_end = token_end;
        Ok(())
    }

    /// Keyword: the exact word not followed by an identifier character,
    /// with trailing spacing.
    pub(crate) fn word(&mut self, keyword: &str) -> PResult<()> {
        let start = self.pos;
        if !self.match_str(keyword) {
            return Err(self.fail(Expectation::Literal {
                text: keyword.to_owned(),
            }));
        }
        if self.byte().map_or(false, is_letter_or_digit) {
            self.pos = start;
            return Err(self.fail(Expectation::Literal {
                text: keyword.to_owned(),
            }));
        }
        self.spacing()
    }

    /// Identifier: a letter run that is not a reserved word.
    pub(crate) fn ident(&mut self) -> PResult<SimpleName> {
        let start = self.pos;
        if !self.byte().map_or(false, is_letter) {
            return Err(self.fail(Expectation::other("identifier")));
        }
        while self.byte().map_or(false, is_letter_or_digit) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        if KEYWORDS.contains(<&BStr>::from(text)) {
            self.pos = start;
            return Err(self.fail(Expectation::other("identifier")));
        }
        let identifier = text.to_str_lossy().into_owned();
        self.token_end = self.pos;
        self.spacing()?;
        let loc = self.loc_from(start);
        Ok(SimpleName { identifier, loc })
    }

    // ------------------------------------------------------------------
    // Whitespace and comments
    // ------------------------------------------------------------------

    /// Horizontal whitespace only.
    pub(crate) fn indent(&mut self) {
        while matches!(self.byte(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    /// One line terminator.
    pub(crate) fn eol(&mut self) -> PResult<()> {
        if self.match_str("\r\n") || self.match_str("\n") || self.match_str("\r") {
            Ok(())
        } else {
            Err(self.fail(Expectation::other("end of line")))
        }
    }

    /// Whitespace and comments; the trailing separator after most
    /// tokens. Never fails. Comment scanning reuses the raw matchers,
    /// so the preceding token's end is restored afterwards: trivia is
    /// never part of a token extent.
    pub(crate) fn spacing(&mut self) -> PResult<()> {
        let token_end = self.token_end;
        loop {
            match self.byte() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') | Some(b'\x0C') => {
                    self.pos += 1;
                }
                Some(b'/') if self.byte_at(1) == Some(b'*') => {
                    if self.attempt(|p| p.block_comment_body().map(|_| ())).is_err() {
                        break;
                    }
                }
                Some(b'/') if self.byte_at(1) == Some(b'/') => {
                    self.pos += 2;
                    while !self.at_end() && !matches!(self.byte(), Some(b'\n') | Some(b'\r')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        self.token_end = token_end;
        Ok(())
    }

    /// `/* ... */` body scan starting at `/*`; the body excludes the
    /// terminator via negative lookahead. Returns the trimmed body.
    fn block_comment_body(&mut self) -> PResult<String> {
        self.literal("/*")?;
        let body_start = self.pos;
        loop {
            if self.attempt(|p| p.literal("*/")).is_ok() {
                let body = self.source[body_start..self.pos - 2]
                    .to_str_lossy()
                    .trim()
                    .to_owned();
                return Ok(body);
            }
            self.not_ahead(|p| p.literal("*/"))?;
            self.any_char()?;
        }
    }

    // ------------------------------------------------------------------
    // Statement-position markers
    // ------------------------------------------------------------------

    /// One comment line or blank line at statement/member position.
    pub(crate) fn source_marker(&mut self) -> PResult<SourceMarker> {
        self.indent();
        let start = self.pos;
        match (self.byte(), self.byte_at(1)) {
            (Some(b'/'), Some(b'/')) => {
                self.pos += 2;
                let body_start = self.pos;
                while !self.at_end() && !matches!(self.byte(), Some(b'\n') | Some(b'\r')) {
                    self.pos += 1;
                }
                let comment = self.source[body_start..self.pos]
                    .to_str_lossy()
                    .trim()
                    .to_owned();
                self.token_end = self.pos;
                let loc = self.loc_from(start);
                let _ = self.attempt(Self::eol);
                Ok(SourceMarker::EndOfLine { comment, loc })
            }
            (Some(b'/'), Some(b'*')) => {
                let doc = self.byte_at(2) == Some(b'*') && self.byte_at(3) != Some(b'/');
                let comment = self.block_comment_body()?;
                let loc = self.loc_from(start);
                self.indent();
                let _ = self.attempt(Self::eol);
                if doc {
                    let comment = comment.trim_start_matches('*').trim().to_owned();
                    Ok(SourceMarker::JavaDoc { comment, loc })
                } else {
                    Ok(SourceMarker::Traditional { comment, loc })
                }
            }
            _ => {
                self.eol()?;
                let loc = self.loc_here(start);
                Ok(SourceMarker::Blank { loc })
            }
        }
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    /// Integer or floating-point literal; returns the raw token text.
    /// Float forms are tried first so `1.5` is never split at the dot.
    pub(crate) fn number_token(&mut self) -> PResult<(String, Loc)> {
        let start = self.pos;
        let result = crate::parsing::alt!(
            self,
            Self::hex_float,
            Self::decimal_float,
            Self::integer_numeral,
        );
        result?;
        let token = self.source[start..self.pos].to_str_lossy().into_owned();
        self.token_end = self.pos;
        self.spacing()?;
        let loc = self.loc_from(start);
        Ok((token, loc))
    }

    /// `0x` hex significand with a mandatory binary exponent.
    fn hex_float(&mut self) -> PResult<()> {
        if !(self.match_str("0x") || self.match_str("0X")) {
            return Err(self.fail(Expectation::Literal { text: "0x".into() }));
        }
        let digits = self.opt(Self::hex_digits)?;
        if self.attempt(|p| p.literal(".")).is_ok() {
            let frac = self.opt(Self::hex_digits)?;
            if digits.is_none() && frac.is_none() {
                return Err(self.fail(Expectation::Class {
                    desc: "[0-9a-fA-F]".into(),
                    inverted: false,
                }));
            }
        } else if digits.is_none() {
            return Err(self.fail(Expectation::Class {
                desc: "[0-9a-fA-F]".into(),
                inverted: false,
            }));
        }
        self.class(|b| b == b'p' || b == b'P', "[pP]")?;
        let _ = self.attempt(|p| p.class(|b| b == b'+' || b == b'-', "[+-]"));
        self.digits()?;
        let _ = self.attempt(Self::float_suffix);
        Ok(())
    }

    fn decimal_float(&mut self) -> PResult<()> {
        crate::parsing::alt!(
            self,
            |p: &mut Self| {
                p.digits()?;
                p.literal(".")?;
                let _ = p.opt(Self::digits)?;
                let _ = p.opt(Self::exponent)?;
                let _ = p.attempt(Self::float_suffix);
                Ok(())
            },
            |p: &mut Self| {
                p.literal(".")?;
                p.digits()?;
                let _ = p.opt(Self::exponent)?;
                let _ = p.attempt(Self::float_suffix);
                Ok(())
            },
            |p: &mut Self| {
                p.digits()?;
                p.exponent()?;
                let _ = p.attempt(Self::float_suffix);
                Ok(())
            },
            |p: &mut Self| {
                p.digits()?;
                p.float_suffix()
            },
        )
    }

    fn exponent(&mut self) -> PResult<()> {
        self.class(|b| b == b'e' || b == b'E', "[eE]")?;
        let _ = self.attempt(|p| p.class(|b| b == b'+' || b == b'-', "[+-]"));
        self.digits()
    }

    fn float_suffix(&mut self) -> PResult<()> {
        self.class(
            |b| matches!(b, b'f' | b'F' | b'd' | b'D'),
            "[fFdD]",
        )
        .map(|_| ())
    }

    /// Hex, binary, octal, or decimal integer with optional `l` suffix.
    fn integer_numeral(&mut self) -> PResult<()> {
        crate::parsing::alt!(
            self,
            |p: &mut Self| {
                if !(p.match_str("0x") || p.match_str("0X")) {
                    return Err(p.fail(Expectation::Literal { text: "0x".into() }));
                }
                p.hex_digits()
            },
            |p: &mut Self| {
                if !(p.match_str("0b") || p.match_str("0B")) {
                    return Err(p.fail(Expectation::Literal { text: "0b".into() }));
                }
                p.separated_digits(|b| matches!(b, b'0' | b'1'), "[01]")
            },
            |p: &mut Self| {
                p.literal("0")?;
                p.many1(|p| {
                    while p.byte() == Some(b'_') {
                        p.pos += 1;
                    }
                    p.class(|b| (b'0'..=b'7').contains(&b), "[0-7]")
                })
                .map(|_| ())
            },
            // A decimal numeral is `0` or starts with a nonzero digit;
            // `09` is not a number.
            |p: &mut Self| {
                p.class(|b| (b'1'..=b'9').contains(&b), "[1-9]")?;
                let _ = p.opt(|p| {
                    while p.byte() == Some(b'_') {
                        p.pos += 1;
                    }
                    p.digits()
                })?;
                Ok(())
            },
            |p: &mut Self| p.literal("0"),
        )?;
        let _ = self.attempt(|p| p.class(|b| b == b'l' || b == b'L', "[lL]"));
        Ok(())
    }

    /// `digit ('_'* digit)*`: separators may only sit between digits, so
    /// a trailing `_` is left unconsumed for the caller to choke on.
    fn digits(&mut self) -> PResult<()> {
        self.separated_digits(|b| b.is_ascii_digit(), "[0-9]")
    }

    fn hex_digits(&mut self) -> PResult<()> {
        self.separated_digits(|b| b.is_ascii_hexdigit(), "[0-9a-fA-F]")
    }

    fn separated_digits(&mut self, pred: fn(u8) -> bool, desc: &str) -> PResult<()> {
        self.class(pred, desc)?;
        loop {
            let more = self.attempt(|p| {
                while p.byte() == Some(b'_') {
                    p.pos += 1;
                }
                p.class(pred, desc)
            });
            if more.is_err() {
                self.token_end = self.pos;
                return Ok(());
            }
        }
    }

    /// `'x'` with the full escape grammar; returns the raw spelling
    /// including quotes.
    pub(crate) fn char_token(&mut self) -> PResult<(String, Loc)> {
        let start = self.pos;
        self.literal("'")?;
        if self.attempt(Self::escape).is_err() {
            self.not_ahead(|p| p.class(|b| matches!(b, b'\'' | b'\\' | b'\n' | b'\r'), "[\\'\\\\]"))?;
            // One full character, not one byte: the literal may hold a
            // multi-byte UTF-8 sequence.
            match bstr::decode_utf8(&self.source[self.pos..]) {
                (_, 0) => return Err(self.fail(Expectation::Any)),
                (_, len) => {
                    self.pos += len;
                    self.token_end = self.pos;
                }
            }
        }
        self.literal("'")?;
        let token = self.source[start..self.pos].to_str_lossy().into_owned();
        self.token_end = self.pos;
        self.spacing()?;
        let loc = self.loc_from(start);
        Ok((token, loc))
    }

    /// `"..."` with the full escape grammar; returns the raw spelling
    /// including quotes.
    pub(crate) fn string_token(&mut self) -> PResult<(String, Loc)> {
        let start = self.pos;
        self.literal("\"")?;
        loop {
            if self.attempt(Self::escape).is_ok() {
                continue;
            }
            match self.byte() {
                Some(b'"') | Some(b'\n') | Some(b'\r') | None => break,
                Some(b'\\') => break,
                Some(_) => {
                    self.pos += 1;
                }
            }
        }
        self.literal("\"")?;
        let token = self.source[start..self.pos].to_str_lossy().into_owned();
        self.token_end = self.pos;
        self.spacing()?;
        let loc = self.loc_from(start);
        Ok((token, loc))
    }

    /// `\b \t \n \f \r \" \' \\`, octal `\0`–`\377`, or `\uXXXX` with
    /// any number of `u`s.
    fn escape(&mut self) -> PResult<()> {
        self.literal("\\")?;
        crate::parsing::alt!(
            self,
            |p: &mut Self| p
                .class(|b| matches!(b, b'b' | b't' | b'n' | b'f' | b'r' | b'"' | b'\'' | b'\\'), "[btnfr\"'\\\\]")
                .map(|_| ()),
            Self::unicode_escape,
            Self::octal_escape,
        )
    }

    fn unicode_escape(&mut self) -> PResult<()> {
        self.class(|b| b == b'u', "[u]")?;
        while self.byte() == Some(b'u') {
            self.pos += 1;
        }
        for _ in 0..4 {
            self.class(|b| b.is_ascii_hexdigit(), "[0-9a-fA-F]")?;
        }
        Ok(())
    }

    fn octal_escape(&mut self) -> PResult<()> {
        crate::parsing::alt!(
            self,
            |p: &mut Self| {
                p.class(|b| (b'0'..=b'3').contains(&b), "[0-3]")?;
                p.class(|b| (b'0'..=b'7').contains(&b), "[0-7]")?;
                p.class(|b| (b'0'..=b'7').contains(&b), "[0-7]")?;
                Ok(())
            },
            |p: &mut Self| {
                p.class(|b| (b'0'..=b'7').contains(&b), "[0-7]")?;
                p.class(|b| (b'0'..=b'7').contains(&b), "[0-7]")?;
                Ok(())
            },
            |p: &mut Self| p.class(|b| (b'0'..=b'7').contains(&b), "[0-7]").map(|_| ()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(source: &str) -> Parser {
        Parser::new(source.as_bytes())
    }

    #[test]
    fn test_ident_accepts_plain_name() {
        let mut p = parser("foo bar");
        let name = p.ident().unwrap();
        assert_eq!(name.identifier, "foo");
        // Trailing spacing is consumed, the next token starts cleanly.
        assert_eq!(p.pos, 4);
    }

    #[test]
    fn test_ident_rejects_keyword() {
        let mut p = parser("class X");
        assert!(p.ident().is_err());
        assert_eq!(p.pos, 0);
    }

    #[test]
    fn test_ident_accepts_keyword_prefix() {
        let mut p = parser("classic");
        let name = p.ident().unwrap();
        assert_eq!(name.identifier, "classic");
    }

    #[test]
    fn test_word_requires_boundary() {
        let mut p = parser("classic");
        assert!(p.word("class").is_err());
        assert_eq!(p.pos, 0);
    }

    #[test]
    fn test_number_with_separators() {
        let mut p = parser("1_000_000 ");
        let (token, _) = p.number_token().unwrap();
        assert_eq!(token, "1_000_000");
    }

    #[test]
    fn test_hex_number_with_separators() {
        let mut p = parser("0x1F_FF;");
        let (token, _) = p.number_token().unwrap();
        assert_eq!(token, "0x1F_FF");
    }

    #[test]
    fn test_trailing_underscore_stays_unconsumed() {
        let mut p = parser("1_");
        let (token, _) = p.number_token().unwrap();
        assert_eq!(token, "1");
        assert_eq!(p.byte(), Some(b'_'));
    }

    #[test]
    fn test_float_forms() {
        for (src, want) in [
            ("1.5d", "1.5d"),
            (".5f", ".5f"),
            ("1e10", "1e10"),
            ("2f", "2f"),
            ("0x1.8p3", "0x1.8p3"),
        ] {
            let mut p = parser(src);
            let (token, _) = p.number_token().unwrap();
            assert_eq!(token, want, "source {:?}", src);
        }
    }

    #[test]
    fn test_integer_suffix() {
        let mut p = parser("42L");
        let (token, _) = p.number_token().unwrap();
        assert_eq!(token, "42L");
    }

    #[test]
    fn test_decimal_rejects_leading_zero() {
        let mut p = parser("09");
        let (token, _) = p.number_token().unwrap();
        assert_eq!(token, "0");
        // The `9` stays behind for the caller to choke on.
        assert_eq!(p.byte(), Some(b'9'));
        assert!(crate::parsing::parse_expression(b"09").is_err());
    }

    #[test]
    fn test_char_literal_multibyte() {
        for src in ["'é'", "'λ'", "'你'"] {
            let mut p = parser(src);
            let (token, _) = p.char_token().unwrap();
            assert_eq!(token, src);
            assert!(p.at_end());
        }
    }

    #[test]
    fn test_char_escapes() {
        for src in ["'a'", "'\\n'", "'\\''", "'\\\\'", "'\\101'", "'\\u0041'", "'\\uu0041'"] {
            let mut p = parser(src);
            let (token, _) = p.char_token().unwrap();
            assert_eq!(token, src);
        }
    }

    #[test]
    fn test_string_with_escapes() {
        let mut p = parser(r#""a\tb\"c" x"#);
        let (token, _) = p.string_token().unwrap();
        assert_eq!(token, r#""a\tb\"c""#);
    }

    #[test]
    fn test_string_rejects_bad_escape() {
        let mut p = parser(r#""a\q""#);
        assert!(p.string_token().is_err());
    }

    #[test]
    fn test_spacing_eats_comments() {
        let mut p = parser("  /* note */ // tail\n  x");
        p.spacing().unwrap();
        assert_eq!(p.byte(), Some(b'x'));
    }

    #[test]
    fn test_unterminated_block_comment_not_consumed() {
        let mut p = parser("/* open");
        p.spacing().unwrap();
        assert_eq!(p.pos, 0);
    }

    #[test]
    fn test_source_marker_forms() {
        let mut p = parser("// c1\n");
        match p.source_marker().unwrap() {
            SourceMarker::EndOfLine { comment, .. } => assert_eq!(comment, "c1"),
            other => panic!("unexpected marker {:?}", other),
        }

        let mut p = parser("/* c2 */\n");
        match p.source_marker().unwrap() {
            SourceMarker::Traditional { comment, .. } => assert_eq!(comment, "c2"),
            other => panic!("unexpected marker {:?}", other),
        }

        let mut p = parser("/** doc */\n");
        match p.source_marker().unwrap() {
            SourceMarker::JavaDoc { comment, .. } => assert_eq!(comment, "doc"),
            other => panic!("unexpected marker {:?}", other),
        }

        let mut p = parser("   \nx");
        match p.source_marker().unwrap() {
            SourceMarker::Blank { .. } => {}
            other => panic!("unexpected marker {:?}", other),
        }
        assert_eq!(p.byte(), Some(b'x'));
    }

    #[test]
    fn test_source_marker_rejects_code_line() {
        let mut p = parser("int x;");
        assert!(p.source_marker().is_err());
        assert_eq!(p.pos, 0);
    }
}
