use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decoding itself is total: [`crate::decode`] never returns an error, it threads
/// placeholders into the decoded structure instead. The variants below surface from the
/// lower-level building blocks ([`crate::demangle::BackrefTable`], the depth guard of the
/// [`crate::demangle::SymbolParser`]) and from the golden fixture loader in
/// [`crate::fixtures`].
///
/// # Error Categories
///
/// ## Grammar Errors
/// - [`Error::UnknownBackref`] - A backreference digit points past the end of its table
/// - [`Error::RecursionLimit`] - Maximum nesting depth exceeded
///
/// ## Fixture Errors
/// - [`Error::Malformed`] - Structurally broken fixture file
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Empty`] - Empty fixture corpus
///
/// # Examples
///
/// ```rust
/// use undname::{fixtures::parse_fixtures, Error};
///
/// match parse_fixtures("is :- \"int x\"\n") {
///     Ok(cases) => println!("{} cases", cases.len()),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed fixture: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A backreference digit does not resolve to a recorded entry.
    ///
    /// The name and type substitution tables only hold what has been decoded so far in
    /// the current scope. A digit that points past the end of the table indicates
    /// truncated or malformed input. The decoder recovers from this error by keeping the
    /// raw digit text.
    ///
    /// # Fields
    ///
    /// * `index` - The requested table slot
    /// * `len` - The number of entries recorded at the time of the lookup
    #[error("Backreference {index} is out of range - table holds {len} entries")]
    UnknownBackref {
        /// The requested table slot
        index: usize,
        /// The number of entries recorded at the time of the lookup
        len: usize,
    },

    /// Recursion limit reached.
    ///
    /// Templates and function pointers nest arbitrarily deep in the grammar. To keep stack
    /// usage bounded on adversarial input a maximum nesting depth is enforced. The decoder
    /// recovers from this error by emitting an `Unsupported` placeholder.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The fixture data is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    ///
    /// Returned when a fixture corpus contains no cases at all.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading fixture files.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
