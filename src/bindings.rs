//! Schema-binding customizations.
//!
//! A customization file is a small XML document of overrides applied to
//! generated names and derives:
//!
//! ```xml
//! <bindings>
//!     <rename from="user-list" to="UserCollection"/>
//!     <derive trait="PartialEq"/>
//!     <suppress id="legacy-report"/>
//! </bindings>
//! ```
//!
//! Pass-through binding arguments (`-xjcArgument` on the command line) are
//! interpreted here as well.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use xmltree::Element;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Xml(xmltree::ParseError),
    Invalid(String),
    UnknownArgument(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<xmltree::ParseError> for Error {
    fn from(e: xmltree::ParseError) -> Self {
        Error::Xml(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Xml(e) => write!(f, "XML error: {}", e),
            Error::Invalid(e) => write!(f, "invalid customization: {}", e),
            Error::UnknownArgument(arg) => write!(f, "unknown binding argument: {}", arg),
        }
    }
}

impl std::error::Error for Error {}

/// Accumulated customizations, merged across files in command-line order.
#[derive(Debug, Default, Clone)]
pub struct Customizations {
    renames: HashMap<String, String>,
    derives: Vec<String>,
    suppressed: HashSet<String>,
    suppress_docs: bool,
}

impl Customizations {
    /// The replacement name for a WADL id, if one was configured.
    pub fn rename_for(&self, id: &str) -> Option<&str> {
        self.renames.get(id).map(|s| s.as_str())
    }

    pub fn renames(&self) -> &HashMap<String, String> {
        &self.renames
    }

    /// Extra derives for generated structs, in insertion order.
    pub fn derives(&self) -> &[String] {
        &self.derives
    }

    pub fn is_suppressed(&self, id: &str) -> bool {
        self.suppressed.contains(id)
    }

    pub fn suppress_docs(&self) -> bool {
        self.suppress_docs
    }

    /// Fold another set of customizations into this one. Renames from
    /// `other` win on conflict; derives keep first-seen order.
    pub fn merge(&mut self, other: Customizations) {
        self.renames.extend(other.renames);
        for derive in other.derives {
            self.add_derive(&derive);
        }
        self.suppressed.extend(other.suppressed);
        self.suppress_docs |= other.suppress_docs;
    }

    /// Interpret pass-through binding arguments.
    pub fn apply_arguments(&mut self, args: &[String]) -> Result<(), Error> {
        for arg in args {
            if let Some(trait_name) = arg.strip_prefix("-derive=") {
                if trait_name.is_empty() {
                    return Err(Error::Invalid("-derive= needs a trait name".to_string()));
                }
                self.add_derive(trait_name);
            } else if arg == "-no-docs" {
                self.suppress_docs = true;
            } else {
                return Err(Error::UnknownArgument(arg.clone()));
            }
        }
        Ok(())
    }

    fn add_derive(&mut self, name: &str) {
        if !self.derives.iter().any(|d| d == name) {
            self.derives.push(name.to_string());
        }
    }
}

fn require_attr(element: &Element, name: &str) -> Result<String, Error> {
    element.attributes.get(name).cloned().ok_or_else(|| {
        Error::Invalid(format!(
            "<{}> is missing the `{}` attribute",
            element.name, name
        ))
    })
}

pub fn parse<R: Read>(reader: R) -> Result<Customizations, Error> {
    let root = Element::parse(reader)?;
    if root.name != "bindings" {
        return Err(Error::Invalid(format!(
            "expected <bindings> root, found <{}>",
            root.name
        )));
    }

    let mut customizations = Customizations::default();
    for node in &root.children {
        if let Some(element) = node.as_element() {
            match element.name.as_str() {
                "rename" => {
                    let from = require_attr(element, "from")?;
                    let to = require_attr(element, "to")?;
                    customizations.renames.insert(from, to);
                }
                "derive" => {
                    let trait_name = require_attr(element, "trait")?;
                    customizations.add_derive(&trait_name);
                }
                "suppress" => {
                    let id = require_attr(element, "id")?;
                    customizations.suppressed.insert(id);
                }
                other => log::warn!("ignoring unknown binding element <{}>", other),
            }
        }
    }

    Ok(customizations)
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Customizations, Error> {
    let file = std::fs::File::open(path)?;
    parse(file)
}

#[test]
fn test_apply_arguments_rejects_unknown() {
    let mut customizations = Customizations::default();
    let args = vec!["-derive=PartialEq".to_string(), "-npa".to_string()];
    match customizations.apply_arguments(&args) {
        Err(Error::UnknownArgument(arg)) => assert_eq!(arg, "-npa"),
        other => panic!("expected UnknownArgument, got {:?}", other),
    }
    // Arguments before the unknown one have already been applied.
    assert_eq!(customizations.derives(), ["PartialEq".to_string()]);
}
