//! Offset to line/column translation.
//!
//! Each parser activation owns one [`SourceLocator`]. A lookup walks
//! forward from the nearest previously computed offset, counting line
//! terminators, and memoizes its result, so the total walking work over
//! a whole parse stays linear in the input length no matter how many
//! times locations are queried, and in whatever order.

use std::collections::BTreeMap;

use crate::ast::Pos;

#[derive(Debug, Clone)]
pub struct SourceLocator {
    /// Memo of computed positions, keyed by offset.
    cache: BTreeMap<usize, Pos>,
}

impl SourceLocator {
    pub fn new() -> Self {
        let mut cache = BTreeMap::new();
        cache.insert(
            0,
            Pos {
                offset: 0,
                line: 1,
                column: 1,
            },
        );
        SourceLocator { cache }
    }

    /// Position of `offset` within `source`. `offset` may equal
    /// `source.len()` (the end-of-input position).
    pub fn pos_at(&mut self, source: &[u8], offset: usize) -> Pos {
        debug_assert!(offset <= source.len());
        if let Some(pos) = self.cache.get(&offset) {
            return *pos;
        }
        // Offset 0 is pre-seeded, so a predecessor always exists.
        let mut pos = match self.cache.range(..offset).next_back() {
            Some((_, pos)) => *pos,
            None => Pos {
                offset: 0,
                line: 1,
                column: 1,
            },
        };
        while pos.offset < offset {
            let ch = source[pos.offset];
            if ch == b'\n' {
                pos.line += 1;
                pos.column = 1;
            } else if !is_utf8_continuation(ch) {
                pos.column += 1;
            }
            pos.offset += 1;
        }
        self.cache.insert(offset, pos);
        pos
    }
}

impl Default for SourceLocator {
    fn default() -> Self {
        SourceLocator::new()
    }
}

fn is_utf8_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        let source = b"class A {}";
        let mut locator = SourceLocator::new();
        let pos = locator.pos_at(source, 6);
        assert_eq!((pos.line, pos.column), (1, 7));
    }

    #[test]
    fn test_line_breaks() {
        let source = b"a\nbc\n\nd";
        let mut locator = SourceLocator::new();
        assert_eq!(locator.pos_at(source, 0).line, 1);
        let pos = locator.pos_at(source, 2);
        assert_eq!((pos.line, pos.column), (2, 1));
        let pos = locator.pos_at(source, 6);
        assert_eq!((pos.line, pos.column), (4, 1));
        let pos = locator.pos_at(source, 7);
        assert_eq!((pos.line, pos.column), (4, 2));
    }

    #[test]
    fn test_out_of_order_queries() {
        let source = b"one\ntwo\nthree\n";
        let mut locator = SourceLocator::new();
        let late = locator.pos_at(source, 10);
        let early = locator.pos_at(source, 5);
        assert_eq!((late.line, late.column), (3, 3));
        assert_eq!((early.line, early.column), (2, 2));
        // Re-querying hits the memo and agrees with the first answer.
        assert_eq!(locator.pos_at(source, 10), late);
    }

    #[test]
    fn test_multibyte_column() {
        // "λx" : the lambda takes two bytes but one column.
        let source = "λx".as_bytes();
        let mut locator = SourceLocator::new();
        let pos = locator.pos_at(source, 2);
        assert_eq!((pos.line, pos.column), (1, 2));
    }
}
