//! # undname Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and functions
//! of the undname library. Import this module to get quick access to the essentials for
//! decoding and classifying decorated symbols.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all undname operations
pub use crate::Error;

/// The result type used throughout undname
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Decode one symbol, or a batch in parallel
pub use crate::{decode, decode_all};

/// Decode a standalone type code
pub use crate::demangle::decode_type;

// ================================================================================================
// Decoded Structure
// ================================================================================================

/// The decoded symbol and what it declares
pub use crate::demangle::{DeclKind, DecodedSymbol, OperatorName, Signature};

/// Names and types
pub use crate::demangle::{
    CallingConvention, Cv, Indirection, NameComponent, QualifiedName, Scope, TemplateArg,
    TypeNode,
};

// ================================================================================================
// Tooling
// ================================================================================================

/// Symbol classification
pub use crate::classify::{classify, group_by_class, CategoryCounts, SymbolCategory};

/// Golden fixtures
pub use crate::fixtures::{load_fixtures, parse_fixtures, verify, FixtureCase, FixtureReport};
