//! Golden fixtures and the regression harness.
//!
//! A fixture file pairs decorated symbols with the rendering a trusted undecorator
//! produced for them. Three spellings of an expectation are understood:
//!
//! ```text
//! # plain pairs
//! ?Foo@@YAHH@Z
//!  is :- "int __cdecl Foo(int)"
//!
//! ?n@@3HA
//! undname: int n
//!
//! # output of the reference tool, banner and all
//! Microsoft (R) C++ Name Undecorator
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! Undecoration of :- "??0Bar@@QEAA@XZ"
//! is :- "public: __cdecl Bar::Bar(void) __ptr64"
//! ```
//!
//! Blank lines, `#` comments and the banner are skipped. [`verify`] replays a parsed
//! corpus through the decoder in parallel and reports every case whose rendering differs.

use std::path::Path;

use rayon::prelude::*;

use crate::{decode, Error, Result};

/// One decorated symbol and its expected rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCase {
    /// The decorated symbol
    pub symbol: String,
    /// The expected rendering
    pub expected: String,
    /// 1-based line of the expectation within the fixture text
    pub line: usize,
}

/// A fixture case whose rendering did not match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The decorated symbol
    pub symbol: String,
    /// The expected rendering
    pub expected: String,
    /// What the decoder rendered
    pub actual: String,
    /// 1-based line of the expectation within the fixture text
    pub line: usize,
}

/// Outcome of replaying a fixture corpus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureReport {
    /// Number of cases replayed
    pub total: usize,
    /// The failing cases, in corpus order
    pub mismatches: Vec<Mismatch>,
}

impl FixtureReport {
    /// Number of cases that rendered as expected
    #[must_use]
    pub fn passed(&self) -> usize {
        self.total - self.mismatches.len()
    }

    /// Returns `true` if every case rendered as expected
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty()
    }
}

const BANNER_PREFIXES: [&str; 2] = ["Microsoft (R)", "Copyright (C)"];

/// Strip one pair of surrounding double quotes, if present
fn unquote(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

/// Parse fixture text into cases
///
/// ## Arguments
/// * 'text' - The contents of a fixture file
///
/// # Errors
/// Returns [`Error::Malformed`] if an expectation appears without a preceding symbol.
pub fn parse_fixtures(text: &str) -> Result<Vec<FixtureCase>> {
    let mut cases = Vec::new();
    let mut pending: Option<String> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.starts_with('#')
            || BANNER_PREFIXES.iter().any(|banner| line.starts_with(banner))
        {
            continue;
        }

        if let Some(symbol) = line.strip_prefix("Undecoration of :-") {
            pending = Some(unquote(symbol).to_string());
            continue;
        }

        let expected = match line.strip_prefix("is :-") {
            Some(rest) => Some(unquote(rest)),
            None => line.strip_prefix("undname:").map(unquote),
        };

        match expected {
            Some(expected) => {
                let Some(symbol) = pending.take() else {
                    return Err(malformed_error!(
                        "Expectation on line {} has no preceding symbol",
                        index + 1
                    ));
                };
                cases.push(FixtureCase {
                    symbol,
                    expected: expected.to_string(),
                    line: index + 1,
                });
            }
            None => {
                if let Some(orphan) = pending.replace(line.to_string()) {
                    log::debug!("fixture symbol {orphan} has no expectation, skipped");
                }
            }
        }
    }

    if let Some(orphan) = pending {
        log::debug!("fixture symbol {orphan} has no expectation, skipped");
    }

    Ok(cases)
}

/// Load and parse a fixture file
///
/// ## Arguments
/// * 'path' - Path of the fixture file
///
/// # Errors
/// Returns [`Error::FileError`] if the file cannot be read, [`Error::Malformed`] if it
/// cannot be parsed and [`Error::Empty`] if it holds no cases at all.
pub fn load_fixtures(path: &Path) -> Result<Vec<FixtureCase>> {
    let text = std::fs::read_to_string(path)?;
    let cases = parse_fixtures(&text)?;
    if cases.is_empty() {
        return Err(Error::Empty);
    }

    log::debug!("loaded {} fixture cases from {}", cases.len(), path.display());
    Ok(cases)
}

/// Replay fixture cases through the decoder
///
/// Cases are decoded in parallel; the mismatches come back in corpus order.
#[must_use]
pub fn verify(cases: &[FixtureCase]) -> FixtureReport {
    let mismatches = cases
        .par_iter()
        .filter_map(|case| {
            let actual = decode(&case.symbol).to_string();
            (actual != case.expected).then(|| Mismatch {
                symbol: case.symbol.clone(),
                expected: case.expected.clone(),
                actual,
                line: case.line,
            })
        })
        .collect();

    FixtureReport {
        total: cases.len(),
        mismatches,
    }
}
