// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # undname
//!
//! A clean-room decoder for Microsoft C++ decorated symbol names. Built in pure Rust,
//! `undname` turns linker symbols such as `?GetValue@CClass@@QEBAHXZ` into structured
//! declarations and renders them exactly like the Microsoft `undname` tool does, without
//! requiring Windows or the compiler's debug databases.
//!
//! ## Features
//!
//! - **🔍 Structured output** - Functions, constructors, operators, data and vftables as typed values
//! - **🛡️ Total decoding** - Arbitrary input never panics; unsupported codes degrade to placeholders
//! - **⚡ Parallel batches** - Decode export tables of any size with [`decode_all`]
//! - **🧩 Tooling support** - Symbol classification and a golden-fixture regression harness
//!
//! ## Quick Start
//!
//! ### Using the Prelude
//!
//! ```rust
//! use undname::prelude::*;
//!
//! let symbol = decode("?Serialize@CObject@@UEAAXAEAVCArchive@@@Z");
//! assert_eq!(
//!     symbol.to_string(),
//!     "public: virtual void __cdecl CObject::Serialize(class CArchive & __ptr64) __ptr64"
//! );
//! assert_eq!(classify(&symbol), SymbolCategory::VirtualMethod);
//! ```
//!
//! ### Inspecting a Declaration
//!
//! ```rust
//! use undname::demangle::{decode, DeclKind, TypeNode};
//!
//! let symbol = decode("?Foo@@YAHH@Z");
//! if let DeclKind::Function(sig) = &symbol.decl {
//!     assert_eq!(sig.ret, Some(TypeNode::Int));
//!     assert_eq!(sig.params, vec![TypeNode::Int]);
//! }
//! ```
//!
//! ## Error Handling
//!
//! Decoding itself never fails. The [`Error`] type covers the building blocks underneath
//! (backreference lookups, the recursion guard) and the fixture loader:
//!
//! ```rust,no_run
//! use undname::{fixtures, Error};
//!
//! match fixtures::load_fixtures("tests/fixtures/mfc.txt".as_ref()) {
//!     Ok(cases) => println!("{} cases", cases.len()),
//!     Err(Error::FileError(io_err)) => eprintln!("I/O error: {}", io_err),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and functions.
///
/// # Example
///
/// ```rust
/// use undname::prelude::*;
///
/// let symbol = decode("??0Bar@@QEAA@XZ");
/// assert!(matches!(symbol.decl, DeclKind::Constructor { .. }));
/// ```
pub mod prelude;

/// Decoding of Microsoft C++ decorated names
///
/// This module contains the decoder proper: the input cursor, the two substitution tables,
/// the name, template and type grammars, the signature assembler and the renderer.
///
/// # Key Types
///
/// - [`demangle::DecodedSymbol`] - The result of decoding one symbol
/// - [`demangle::DeclKind`] - What the symbol declares
/// - [`demangle::TypeNode`] - A decoded type
/// - [`demangle::SymbolParser`] - The decoder state for one symbol
///
/// # Main Functions
///
/// - [`demangle::decode`] - Decode a full symbol
/// - [`demangle::decode_type`] - Decode a standalone type code
pub mod demangle;

/// Symbol classification and grouping by owning class
pub mod classify;

/// Golden fixture parsing and the regression harness
///
/// Fixtures are text files pairing a decorated symbol with its expected rendering, in the
/// format produced by the reference undecorator:
///
/// ```text
/// ?Foo@@YAHH@Z
///  is :- "int __cdecl Foo(int)"
/// ```
pub mod fixtures;

/// `undname` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `undname` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

pub use classify::{classify, SymbolCategory};
pub use demangle::{decode, DecodedSymbol};

use rayon::prelude::*;

/// Decode a batch of symbols in parallel
///
/// The output is in input order. Each symbol is decoded independently, exactly as
/// [`decode`] would.
///
/// ## Arguments
/// * 'symbols' - The decorated names to decode
///
/// # Examples
///
/// ```rust
/// let decoded = undname::decode_all(&["?Foo@@YAHH@Z", "main"]);
/// assert_eq!(decoded[0].to_string(), "int __cdecl Foo(int)");
/// assert_eq!(decoded[1].to_string(), "main");
/// ```
pub fn decode_all<S: AsRef<str> + Sync>(symbols: &[S]) -> Vec<DecodedSymbol> {
    log::trace!("decoding batch of {} symbols", symbols.len());
    symbols.par_iter().map(|s| decode(s.as_ref())).collect()
}
