//! Forward-only character cursor over a decorated name.
//!
//! This module provides the [`crate::demangle::Cursor`] type, the positional reader every
//! grammar production of the decoder is built on. It wraps the immutable input string and
//! a read position that only ever moves forward; the decorated-name grammar never needs
//! to backtrack.
//!
//! # Architecture
//!
//! Unlike a bounds-checked binary reader, reading past the end of the input is not an
//! error here. Exhaustion yields `None`, and every production treats absence as an
//! implicit terminator. This is what keeps decoding total on truncated input.
//!
//! ## Navigation Methods
//! - [`crate::demangle::Cursor::peek`] - Look at the current character
//! - [`crate::demangle::Cursor::peek_at`] - Look ahead without advancing
//! - [`crate::demangle::Cursor::advance`] - Consume one character
//! - [`crate::demangle::Cursor::consume`] - Consume a literal prefix if present
//! - [`crate::demangle::Cursor::at_end`] - Check for exhaustion
//!
//! ## Token Methods
//! - [`crate::demangle::Cursor::read_until`] - Read an `@`-terminated identifier
//! - [`crate::demangle::Cursor::read_number`] - Read an encoded integer
//!
//! # Usage Examples
//!
//! ```rust
//! use undname::demangle::Cursor;
//!
//! let mut cursor = Cursor::new("Foo@Bar@@");
//! assert_eq!(cursor.read_until('@'), "Foo");
//! assert_eq!(cursor.peek(), Some('B'));
//! assert!(cursor.consume("Bar@"));
//! assert_eq!(cursor.advance(), Some('@'));
//! assert!(cursor.at_end());
//! assert_eq!(cursor.advance(), None);
//! ```

/// A forward-only reader over a decorated symbol.
///
/// The cursor hands out characters, never bytes, so identifiers sliced out of the input
/// always fall on character boundaries even when the input is not plain ASCII.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// The symbol being decoded
    data: &'a str,
    /// Current byte position within the symbol
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new [`Cursor`] positioned at the start of `data`.
    ///
    /// # Arguments
    /// * `data` - The decorated symbol to read from
    #[must_use]
    pub fn new(data: &'a str) -> Self {
        Cursor { data, position: 0 }
    }

    /// Returns `true` once every character has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Returns the current byte position.
    ///
    /// Productions compare positions before and after a sub-decode to guarantee forward
    /// progress in their loops.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the unread remainder of the input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use undname::demangle::Cursor;
    /// let mut cursor = Cursor::new("?Foo@@");
    /// cursor.advance();
    /// assert_eq!(cursor.rest(), "Foo@@");
    /// ```
    #[must_use]
    pub fn rest(&self) -> &'a str {
        self.data.get(self.position..).unwrap_or_default()
    }

    /// Returns the input consumed between `start` and the current position.
    ///
    /// Nested symbols use this to keep their own decorated text.
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.data.get(start..self.position).unwrap_or_default()
    }

    /// Peek at the current character without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek `n` characters ahead of the current position without advancing.
    ///
    /// `peek_at(0)` is equivalent to [`Cursor::peek`].
    #[must_use]
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume and return the current character.
    ///
    /// Returns `None` at the end of input; the position is left untouched in that case.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Consume `prefix` if the remaining input starts with it.
    ///
    /// Returns `true` if the prefix was present and consumed.
    pub fn consume(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.position += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consume the current character if it equals `c`.
    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.position += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume a single decimal digit and return its value.
    pub fn consume_digit(&mut self) -> Option<usize> {
        let digit = self.peek()?.to_digit(10)?;
        self.position += 1;
        Some(digit as usize)
    }

    /// Consume everything that is left.
    pub fn skip_to_end(&mut self) {
        self.position = self.data.len();
    }

    /// Read up to (not including) `terminator` and consume the terminator.
    ///
    /// If the terminator never appears, the rest of the input is returned and the cursor
    /// ends up exhausted: the end of input acts as an implicit terminator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use undname::demangle::Cursor;
    /// let mut cursor = Cursor::new("Truncated");
    /// assert_eq!(cursor.read_until('@'), "Truncated");
    /// assert!(cursor.at_end());
    /// ```
    pub fn read_until(&mut self, terminator: char) -> &'a str {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(end) => {
                self.position += end + terminator.len_utf8();
                &rest[..end]
            }
            None => {
                self.position = self.data.len();
                rest
            }
        }
    }

    /// Read an encoded integer.
    ///
    /// ```text
    /// <number> ::= [?] <digit>          # 0-9 encode 1..10
    ///          ::= [?] <hex-digit>+ @   # A-P encode nibbles 0..15
    /// ```
    ///
    /// A leading `?` negates the value. Returns `None` (leaving the cursor after whatever
    /// was consumed) if no digits follow; a missing `@` is treated as implicit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use undname::demangle::Cursor;
    /// assert_eq!(Cursor::new("0").read_number(), Some(1));
    /// assert_eq!(Cursor::new("9").read_number(), Some(10));
    /// assert_eq!(Cursor::new("A@").read_number(), Some(0));
    /// assert_eq!(Cursor::new("BA@").read_number(), Some(16));
    /// assert_eq!(Cursor::new("?2").read_number(), Some(-3));
    /// ```
    pub fn read_number(&mut self) -> Option<i64> {
        let negative = self.consume_char('?');

        if let Some(digit) = self.consume_digit() {
            let value = digit as i64 + 1;
            return Some(if negative { -value } else { value });
        }

        let mut value: i64 = 0;
        let mut seen = false;
        while let Some(c @ 'A'..='P') = self.peek() {
            self.advance();
            value = value.wrapping_shl(4) | (c as i64 - 'A' as i64);
            seen = true;
        }
        self.consume_char('@');

        if seen {
            Some(if negative { value.wrapping_neg() } else { value })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut cursor = Cursor::new("AB");
        assert_eq!(cursor.peek(), Some('A'));
        assert_eq!(cursor.peek_at(1), Some('B'));
        assert_eq!(cursor.peek_at(2), None);
        assert_eq!(cursor.advance(), Some('A'));
        assert_eq!(cursor.advance(), Some('B'));
        assert!(cursor.at_end());
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn test_empty_input() {
        let mut cursor = Cursor::new("");
        assert!(cursor.at_end());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.read_until('@'), "");
        assert_eq!(cursor.read_number(), None);
    }

    #[test]
    fn test_consume() {
        let mut cursor = Cursor::new("?$Foo");
        assert!(!cursor.consume("?A"));
        assert!(cursor.consume("?$"));
        assert_eq!(cursor.rest(), "Foo");
        assert!(!cursor.consume_char('X'));
        assert!(cursor.consume_char('F'));
    }

    #[test]
    fn test_read_until() {
        let mut cursor = Cursor::new("Foo@Bar@@");
        assert_eq!(cursor.read_until('@'), "Foo");
        assert_eq!(cursor.read_until('@'), "Bar");
        assert_eq!(cursor.read_until('@'), "");
        assert!(cursor.at_end());
    }

    #[test]
    fn test_slice_from() {
        let mut cursor = Cursor::new("PEAH");
        let start = cursor.pos();
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.slice_from(start), "PE");
    }

    #[test]
    fn test_read_number() {
        assert_eq!(Cursor::new("0").read_number(), Some(1));
        assert_eq!(Cursor::new("A@").read_number(), Some(0));
        assert_eq!(Cursor::new("P@").read_number(), Some(15));
        assert_eq!(Cursor::new("BAA@").read_number(), Some(256));
        assert_eq!(Cursor::new("?A@").read_number(), Some(0));
        assert_eq!(Cursor::new("?BA@").read_number(), Some(-16));
        // Missing terminator is implicit
        assert_eq!(Cursor::new("BA").read_number(), Some(16));
        assert_eq!(Cursor::new("Z").read_number(), None);
    }

    #[test]
    fn test_non_ascii_input() {
        let mut cursor = Cursor::new("?é@");
        assert_eq!(cursor.advance(), Some('?'));
        assert_eq!(cursor.read_until('@'), "é");
        assert!(cursor.at_end());
    }
}
