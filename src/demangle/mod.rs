//! Microsoft C++ decorated name decoding.
//!
//! This module implements a single-pass recursive-descent decoder for the decoration
//! scheme the Microsoft C++ compiler uses for linker symbols. Decoded symbols are returned
//! as a structured [`DecodedSymbol`] and render to the same text as the `undname` tool.
//!
//! # Architecture
//!
//! The decoder is layered bottom-up, each layer built on the ones before it:
//!
//! - [`Cursor`] - forward-only reader over the input
//! - [`BackrefTable`] - the name and type substitution tables ([`NameTable`], [`TypeTable`])
//! - Qualified names and templates - `@`-terminated component chains, `?$` instantiations
//! - Types - primitives, pointers, references, named types and function pointers
//! - [`SymbolParser`] - special members, access and calling convention, return type and
//!   parameter list, assembled into a [`DeclKind`]
//! - Rendering - [`std::fmt::Display`] for every node
//!
//! Decoding is total. Codes the decoder does not handle become `Unsupported` nodes
//! carrying `UNK(<code>)`, unresolvable backreferences keep their digit, and the end of
//! input acts as a terminator wherever one is expected. Nesting is capped at
//! [`MAX_RECURSION_DEPTH`].
//!
//! # Examples
//!
//! ```rust
//! use undname::demangle::{decode, DeclKind};
//!
//! let symbol = decode("?Foo@@YAHH@Z");
//! assert_eq!(symbol.to_string(), "int __cdecl Foo(int)");
//! assert!(matches!(symbol.decl, DeclKind::Function(_)));
//!
//! let ctor = decode("??0Bar@@QEAA@XZ");
//! assert_eq!(ctor.qualified_name.to_string(), "Bar::Bar");
//! ```
//!
//! # References
//!
//! - Microsoft C++ name decoration, as emitted by MSVC for x64 targets
//! - `undname.exe` output format for rendered declarations

mod cursor;
mod names;
mod parser;
mod render;
mod tables;
mod typecodes;
mod types;

pub use cursor::Cursor;
pub use parser::{SymbolParser, MAX_RECURSION_DEPTH};
pub use tables::{BackrefTable, NameTable, TypeTable, MAX_BACKREFS};
pub use types::*;

/// Decode a decorated symbol
///
/// Input that does not start with `?` is not a decorated name and is passed through
/// verbatim as [`DeclKind::Undecorated`].
///
/// ## Arguments
/// * 'symbol' - The decorated name
#[must_use]
pub fn decode(symbol: &str) -> DecodedSymbol {
    SymbolParser::new(symbol).parse()
}

/// Decode a standalone type code, such as `PEBD` or `?$Foo@H@@`
///
/// ## Arguments
/// * 'code' - The encoded type
///
/// # Examples
///
/// ```rust
/// use undname::demangle::{decode_type, TypeNode};
/// assert_eq!(decode_type("H"), TypeNode::Int);
/// assert_eq!(decode_type("PEBD").to_string(), "char const * __ptr64");
/// ```
#[must_use]
pub fn decode_type(code: &str) -> TypeNode {
    SymbolParser::new(code).decode_type()
}
