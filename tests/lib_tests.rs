use std::error::Error as StdError;
use url::Url;
use wadlgen::{bindings, Error, Location, ParseError};

#[test]
fn test_error_display_per_kind() {
    let invalid = Error::InvalidWadl(ParseError::Invalid("bad document".to_string()));
    assert!(format!("{}", invalid).contains("invalid WADL description"));

    let location = Error::Location(url::ParseError::EmptyHost);
    assert!(format!("{}", location).contains("malformed description location"));

    let binding = Error::Binding(bindings::Error::UnknownArgument("-npa".to_string()));
    assert!(format!("{}", binding).contains("schema binding failed"));

    let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
    assert!(format!("{}", io).contains("gone"));

    let collision = Error::NameCollision("UserList".to_string());
    assert!(format!("{}", collision).contains("UserList"));
}

#[test]
fn test_error_source_chain() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = Error::Io(io_error);
    assert!(StdError::source(&error).is_some());

    let collision = Error::NameCollision("Users".to_string());
    assert!(StdError::source(&collision).is_none());

    let nested = Error::InvalidWadl(ParseError::Invalid("broken".to_string()));
    let source = StdError::source(&nested).unwrap();
    assert!(format!("{}", source).contains("broken"));
}

#[test]
fn test_error_from_conversions() {
    let error: Error = std::io::Error::new(std::io::ErrorKind::InvalidData, "io").into();
    assert!(matches!(error, Error::Io(_)));

    let error: Error = url::ParseError::EmptyHost.into();
    assert!(matches!(error, Error::Location(_)));

    let error: Error = ParseError::Invalid("x".to_string()).into();
    assert!(matches!(error, Error::InvalidWadl(_)));

    let error: Error = bindings::Error::UnknownArgument("-x".to_string()).into();
    assert!(matches!(error, Error::Binding(_)));
}

#[test]
fn test_location_accessors() {
    let url = Url::parse("http://example.com/app.wadl").unwrap();
    let remote = Location::Remote(url.clone());
    assert_eq!(remote.url(), &url);
    assert_eq!(format!("{}", remote), "http://example.com/app.wadl");

    let file = Url::parse("file:///tmp/app.wadl").unwrap();
    let local = Location::Local(file.clone());
    assert_eq!(local.url(), &file);
}
