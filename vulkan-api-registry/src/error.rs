//! Error types for reading the registry document.

/// Errors raised while loading the registry or building its tables.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The registry could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] xml::reader::Error),

    /// The event stream ended before the enclosing element was closed.
    #[error("unexpected end of document")]
    UnexpectedEOF,

    /// The document has no root element.
    #[error("document has no root element")]
    NoRootElement,

    /// Two platforms share the same name.
    #[error("duplicate platform `{name}`")]
    DuplicatePlatform {
        /// The repeated platform name.
        name: String,
    },
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
