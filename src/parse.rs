use crate::ast::*;
use std::io::Read;
use url::Url;
use xmltree::{Element, XMLNode};

#[allow(unused)]
pub const WADL_NS: &str = "http://wadl.dev.java.net/2009/02";

const DEFAULT_QUERY_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Xml(xmltree::ParseError),
    Url(url::ParseError),
    Mime(mime::FromStrError),
    /// Structurally broken WADL: missing attributes, unknown styles, ...
    Invalid(String),
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

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Url(e)
    }
}

impl From<mime::FromStrError> for Error {
    fn from(e: mime::FromStrError) -> Self {
        Error::Mime(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Xml(e) => write!(f, "XML error: {}", e),
            Error::Url(e) => write!(f, "URL error: {}", e),
            Error::Mime(e) => write!(f, "MIME error: {}", e),
            Error::Invalid(e) => write!(f, "invalid WADL: {}", e),
        }
    }
}

impl std::error::Error for Error {}

fn attr(element: &Element, name: &str) -> Option<String> {
    element.attributes.get(name).cloned()
}

fn require_attr(element: &Element, name: &str) -> Result<String, Error> {
    attr(element, name).ok_or_else(|| {
        Error::Invalid(format!(
            "<{}> is missing the `{}` attribute",
            element.name, name
        ))
    })
}

fn bool_attr(element: &Element, name: &str) -> bool {
    attr(element, name).map(|s| s == "true").unwrap_or(false)
}

fn child_elements<'a>(
    element: &'a Element,
    name: &'static str,
) -> impl Iterator<Item = &'a Element> {
    element
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .filter(move |child| child.name == name)
}

fn parse_docs(element: &Element) -> Vec<Doc> {
    let mut docs = Vec::new();

    for doc in child_elements(element, "doc") {
        let mut content = Vec::new();
        for node in &doc.children {
            match node {
                XMLNode::Text(text) => content.extend_from_slice(text.as_bytes()),
                XMLNode::Element(child) => {
                    // Inline markup (XHTML and the like) is kept as-is.
                    if child.write(&mut content).is_err() {
                        log::warn!("dropping unwritable doc content in <{}>", element.name);
                    }
                }
                _ => {}
            }
        }

        docs.push(Doc {
            title: attr(doc, "title"),
            lang: attr(doc, "lang"),
            content: String::from_utf8_lossy(&content).into_owned(),
            xmlns: doc
                .namespaces
                .as_ref()
                .and_then(|ns| ns.get(""))
                .and_then(|uri| Url::parse(uri).ok()),
        })
    }

    docs
}

fn parse_param(element: &Element) -> Result<Param, Error> {
    let name = require_attr(element, "name")?;
    let style = require_attr(element, "style")?
        .parse::<ParamStyle>()
        .map_err(Error::Invalid)?;

    let options = child_elements(element, "option")
        .map(|option| require_attr(option, "value"))
        .collect::<Result<Vec<_>, _>>()?;

    let doc = parse_docs(element).into_iter().next();

    Ok(Param {
        name,
        style,
        xsd_type: attr(element, "type"),
        options,
        required: bool_attr(element, "required"),
        repeating: bool_attr(element, "repeating"),
        fixed: attr(element, "fixed"),
        default: attr(element, "default"),
        doc,
    })
}

fn parse_params(element: &Element) -> Result<Vec<Param>, Error> {
    child_elements(element, "param").map(parse_param).collect()
}

fn parse_representation_def(element: &Element) -> Result<RepresentationDef, Error> {
    let media_type = attr(element, "mediaType")
        .map(|s| s.parse::<mime::Mime>())
        .transpose()?;

    Ok(RepresentationDef {
        id: attr(element, "id"),
        media_type,
        element: attr(element, "element"),
        docs: parse_docs(element),
        params: parse_params(element)?,
    })
}

fn parse_representations(element: &Element) -> Result<Vec<Representation>, Error> {
    let mut representations = Vec::new();

    for representation in child_elements(element, "representation") {
        if let Some(href) = attr(representation, "href") {
            match href.strip_prefix('#') {
                Some(id) => representations.push(Representation::Reference(id.to_string())),
                None => log::warn!("skipping representation href without fragment: {}", href),
            }
        } else {
            representations.push(Representation::Definition(parse_representation_def(
                representation,
            )?));
        }
    }

    Ok(representations)
}

fn parse_request(element: &Element) -> Result<Request, Error> {
    match child_elements(element, "request").next() {
        Some(request) => Ok(Request {
            docs: parse_docs(request),
            params: parse_params(request)?,
            representations: parse_representations(request)?,
        }),
        None => Ok(Request::default()),
    }
}

fn parse_responses(element: &Element) -> Result<Vec<Response>, Error> {
    let mut responses = Vec::new();

    for response in child_elements(element, "response") {
        let status = attr(response, "status")
            .map(|s| {
                s.parse::<u16>()
                    .map_err(|_| Error::Invalid(format!("invalid response status: {}", s)))
            })
            .transpose()?;

        responses.push(Response {
            status,
            docs: parse_docs(response),
            params: parse_params(response)?,
            representations: parse_representations(response)?,
        });
    }

    Ok(responses)
}

fn parse_method(element: &Element) -> Result<Method, Error> {
    Ok(Method {
        id: attr(element, "id"),
        verb: require_attr(element, "name")?,
        docs: parse_docs(element),
        request: parse_request(element)?,
        responses: parse_responses(element)?,
    })
}

fn parse_resource(element: &Element) -> Result<Resource, Error> {
    let query_type = attr(element, "queryType")
        .unwrap_or_else(|| DEFAULT_QUERY_TYPE.to_string())
        .parse::<mime::Mime>()?;

    Ok(Resource {
        id: attr(element, "id"),
        path: attr(element, "path"),
        query_type,
        docs: parse_docs(element),
        params: parse_params(element)?,
        methods: child_elements(element, "method")
            .map(parse_method)
            .collect::<Result<Vec<_>, _>>()?,
        subresources: child_elements(element, "resource")
            .map(parse_resource)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn parse_grammars(element: &Element) -> Result<Vec<Grammar>, Error> {
    let mut grammars = Vec::new();

    for grammars_element in child_elements(element, "grammars") {
        for include in child_elements(grammars_element, "include") {
            grammars.push(Grammar {
                href: require_attr(include, "href")?,
            });
        }
    }

    Ok(grammars)
}

pub fn parse<R: Read>(reader: R) -> Result<Application, Error> {
    let root = Element::parse(reader)?;
    if root.name != "application" {
        log::warn!("document root is <{}>, expected <application>", root.name);
    }

    let mut resources = Vec::new();
    for group in child_elements(&root, "resources") {
        resources.push(Resources {
            base: attr(group, "base").map(|s| Url::parse(&s)).transpose()?,
            resources: child_elements(group, "resource")
                .map(parse_resource)
                .collect::<Result<Vec<_>, _>>()?,
        });
    }

    let representations = child_elements(&root, "representation")
        .map(parse_representation_def)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Application {
        docs: parse_docs(&root),
        grammars: parse_grammars(&root)?,
        resources,
        representations,
    })
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Application, Error> {
    parse(bytes)
}

pub fn parse_string(s: &str) -> Result<Application, Error> {
    parse_bytes(s.as_bytes())
}

pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> Result<Application, Error> {
    let file = std::fs::File::open(path)?;
    parse(file)
}

#[test]
fn test_parse_param_options_order() {
    let xml = r#"
        <param name="format" style="query">
            <option value="json"/>
            <option value="xml"/>
            <option value="csv"/>
        </param>
    "#;
    let element = Element::parse(xml.as_bytes()).unwrap();
    let param = parse_param(&element).unwrap();
    assert_eq!(param.options, vec!["json", "xml", "csv"]);
}

#[test]
fn test_parse_param_missing_style() {
    let xml = r#"<param name="format"/>"#;
    let element = Element::parse(xml.as_bytes()).unwrap();
    match parse_param(&element) {
        Err(Error::Invalid(msg)) => assert!(msg.contains("style")),
        other => panic!("expected Invalid error, got {:?}", other),
    }
}
