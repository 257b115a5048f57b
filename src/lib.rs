pub mod ast;
pub mod bindings;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "codegen")]
pub mod codegen;
#[cfg(feature = "codegen")]
pub mod generator;
mod parse;
pub mod writer;

pub const WADL_MIME_TYPE: &str = "application/vnd.sun.wadl+xml";

pub use parse::{parse, parse_bytes, parse_file, parse_string, Error as ParseError};

use url::Url;

/// A description location after resolution.
///
/// Bare paths and `file:` URLs become [`Location::Local`]; every other
/// scheme is carried through untouched as [`Location::Remote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// An absolute `file:` URL on the local filesystem.
    Local(Url),
    /// A location with a non-`file` scheme. Retrieval is not supported;
    /// the engine rejects these when asked to process them.
    Remote(Url),
}

impl Location {
    pub fn url(&self) -> &Url {
        match self {
            Location::Local(url) => url,
            Location::Remote(url) => url,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Failure kinds surfaced by a generation run.
#[derive(Debug)]
pub enum Error {
    /// The description could not be read or is not well-formed WADL.
    InvalidWadl(ParseError),
    /// The description location is not a parseable URL.
    Location(url::ParseError),
    /// A customization file or binding argument was rejected.
    Binding(bindings::Error),
    Io(std::io::Error),
    /// Two generated items ended up with the same name.
    NameCollision(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidWadl(err) => write!(f, "invalid WADL description: {}", err),
            Error::Location(err) => write!(f, "malformed description location: {}", err),
            Error::Binding(err) => write!(f, "schema binding failed: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::NameCollision(name) => {
                write!(f, "generated name `{}` is defined more than once", name)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidWadl(err) => Some(err),
            Error::Location(err) => Some(err),
            Error::Binding(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::NameCollision(_) => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::InvalidWadl(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Location(err)
    }
}

impl From<bindings::Error> for Error {
    fn from(err: bindings::Error) -> Self {
        Error::Binding(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
