use url::Url;

pub type Id = String;

/// Transmission style of a WADL `param` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    Plain,
    Matrix,
    Query,
    Header,
    Template,
}

impl std::str::FromStr for ParamStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(ParamStyle::Plain),
            "matrix" => Ok(ParamStyle::Matrix),
            "query" => Ok(ParamStyle::Query),
            "header" => Ok(ParamStyle::Header),
            "template" => Ok(ParamStyle::Template),
            other => Err(format!("unknown param style: {}", other)),
        }
    }
}

/// A parsed WADL application document.
#[derive(Debug, Default)]
pub struct Application {
    /// Documentation attached to the application element.
    pub docs: Vec<Doc>,

    /// Grammar references (XML Schema and friends).
    pub grammars: Vec<Grammar>,

    /// Resource groups, each with an optional base URL.
    pub resources: Vec<Resources>,

    /// Representations defined at the application level.
    pub representations: Vec<RepresentationDef>,
}

impl Application {
    pub fn get_representation_by_id(&self, id: &str) -> Option<&RepresentationDef> {
        self.representations
            .iter()
            .find(|def| def.id.as_deref() == Some(id))
    }

    /// Top-level resources across all groups, paired with their base URL.
    pub fn iter_resources(&self) -> impl Iterator<Item = (Option<&Url>, &Resource)> {
        self.resources
            .iter()
            .flat_map(|group| group.resources.iter().map(move |r| (group.base.as_ref(), r)))
    }
}

impl std::str::FromStr for Application {
    type Err = crate::parse::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_string(s)
    }
}

/// A `resources` group.
#[derive(Debug, Default)]
pub struct Resources {
    /// The base URL resource paths are resolved against.
    pub base: Option<Url>,

    pub resources: Vec<Resource>,
}

/// A grammar reference. Kept verbatim; hrefs are frequently relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub href: String,
}

#[derive(Debug)]
pub struct Resource {
    pub id: Option<Id>,

    /// Path relative to the enclosing base URL.
    pub path: Option<String>,

    /// Media type used for URI-based queries.
    pub query_type: mime::Mime,

    pub docs: Vec<Doc>,

    /// Params declared on the resource itself (template, matrix, ...).
    pub params: Vec<Param>,

    pub methods: Vec<Method>,

    pub subresources: Vec<Resource>,
}

impl Resource {
    /// Resolve the resource path against the enclosing base URL.
    pub fn url(&self, base: Option<&Url>) -> Option<Url> {
        let path = self.path.as_deref()?;
        match base {
            Some(base) => base.join(path).ok(),
            None => Url::parse(path).ok(),
        }
    }
}

#[derive(Debug)]
pub struct Method {
    pub id: Option<Id>,

    /// The HTTP verb, as written in the document.
    pub verb: String,

    pub docs: Vec<Doc>,

    pub request: Request,

    pub responses: Vec<Response>,
}

#[derive(Debug, Default)]
pub struct Request {
    pub docs: Vec<Doc>,
    pub params: Vec<Param>,
    pub representations: Vec<Representation>,
}

#[derive(Debug, Default)]
pub struct Response {
    pub status: Option<u16>,
    pub docs: Vec<Doc>,
    pub params: Vec<Param>,
    pub representations: Vec<Representation>,
}

/// A representation, either defined in place or referenced by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Representation {
    Reference(Id),
    Definition(RepresentationDef),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepresentationDef {
    pub id: Option<Id>,
    pub media_type: Option<mime::Mime>,
    pub element: Option<String>,
    pub docs: Vec<Doc>,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub style: ParamStyle,

    /// The declared XML Schema type, if any.
    pub xsd_type: Option<String>,

    /// Enumerated values, in document order.
    pub options: Vec<String>,

    pub required: bool,
    pub repeating: bool,
    pub fixed: Option<String>,
    pub default: Option<String>,
    pub doc: Option<Doc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc {
    pub title: Option<String>,

    pub lang: Option<String>,

    pub content: String,

    /// Namespace of the doc payload, e.g. XHTML.
    pub xmlns: Option<Url>,
}

impl Doc {
    pub fn new(content: String) -> Doc {
        Doc {
            title: None,
            lang: None,
            content,
            xmlns: None,
        }
    }
}
