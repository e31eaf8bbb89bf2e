//! Backreference (substitution) tables.
//!
//! Decorated names avoid repeating text by referring to earlier fragments with a single
//! digit. Two independent tables exist per decode:
//!
//! - [`NameTable`] - previously decoded name components (identifiers, template instances)
//! - [`TypeTable`] - previously decoded parameter types
//!
//! Both are ordered, append-only and hold at most [`MAX_BACKREFS`] entries, in order of
//! first appearance. The type table is scoped: the return type and the parameter list of a
//! function each get their own table, and template argument lists get fresh tables of
//! both kinds. The scoping itself is done by the parser swapping tables in and out; see
//! [`crate::demangle::SymbolParser`].

use crate::{
    demangle::types::{NameComponent, TypeNode},
    Error, Result,
};

/// Number of slots addressable by a single backreference digit.
pub const MAX_BACKREFS: usize = 10;

/// An ordered, append-only table of fragments addressable by digit.
///
/// # Examples
///
/// ```rust
/// use undname::demangle::BackrefTable;
///
/// let mut table = BackrefTable::default();
/// table.record("Foo".to_string());
/// table.record("Bar".to_string());
/// table.record("Foo".to_string()); // already present, not recorded again
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.resolve(1)?, "Bar");
/// assert!(table.resolve(2).is_err());
/// # Ok::<(), undname::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackrefTable<T> {
    entries: Vec<T>,
}

impl<T> Default for BackrefTable<T> {
    fn default() -> Self {
        BackrefTable {
            entries: Vec::with_capacity(MAX_BACKREFS),
        }
    }
}

impl<T: PartialEq> BackrefTable<T> {
    /// Append `value` to the table.
    ///
    /// Values already present are not recorded twice, and once all [`MAX_BACKREFS`]
    /// slots are taken further values are dropped.
    pub fn record(&mut self, value: T) {
        if self.entries.len() < MAX_BACKREFS && !self.entries.contains(&value) {
            self.entries.push(value);
        }
    }

    /// Look up the entry for backreference digit `index`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownBackref`] if nothing has been recorded at `index` yet.
    pub fn resolve(&self, index: usize) -> Result<&T> {
        self.entries.get(index).ok_or(Error::UnknownBackref {
            index,
            len: self.entries.len(),
        })
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Table of previously decoded name components.
pub type NameTable = BackrefTable<NameComponent>;

/// Table of previously decoded parameter types.
pub type TypeTable = BackrefTable<TypeNode>;
