//! Rust client-code generation from a parsed WADL application.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::ast::*;
use crate::bindings::Customizations;
use crate::Error;

/// Name of the generation style used when none is requested.
pub const STYLE_DEFAULT: &str = "blocking";

/// Client-code conventions the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Synchronous clients built on `reqwest::blocking`.
    #[default]
    Blocking,
    /// `async` clients built on plain `reqwest`.
    Async,
}

impl Style {
    /// Resolve a style name from the command line. Unknown names fall back
    /// to [`STYLE_DEFAULT`] with a warning.
    pub fn from_name(name: &str) -> Style {
        match name {
            "blocking" => Style::Blocking,
            "async" => Style::Async,
            other => {
                log::warn!(
                    "unknown generation style `{}`, falling back to `{}`",
                    other,
                    STYLE_DEFAULT
                );
                Style::default()
            }
        }
    }

    fn client_type(self) -> &'static str {
        match self {
            Style::Blocking => "reqwest::blocking::Client",
            Style::Async => "reqwest::Client",
        }
    }

    fn response_type(self) -> &'static str {
        match self {
            Style::Blocking => "reqwest::blocking::Response",
            Style::Async => "reqwest::Response",
        }
    }
}

/// Settings for a single generation run.
#[derive(Debug, Default)]
pub struct Config {
    /// Dot-separated package the generated modules live in.
    pub package: String,

    /// Emit one sub-module per top-level resource instead of a single file.
    pub auto_package: bool,

    pub style: Style,

    pub customizations: Customizations,
}

/// A generated source file, addressed relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub source: String,
}

/// Generated top-level names; a second claim on the same name is the
/// collision failure.
#[derive(Debug, Default)]
struct Names(HashSet<String>);

impl Names {
    fn claim(&mut self, name: &str) -> Result<(), Error> {
        if self.0.insert(name.to_string()) {
            Ok(())
        } else {
            Err(Error::NameCollision(name.to_string()))
        }
    }
}

/// Convert a WADL identifier to a Rust type name.
pub fn type_name(name: &str) -> String {
    let mut out = String::new();
    let mut upper_next = true;
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Convert a WADL identifier to a Rust field or function name.
pub fn field_name(name: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = true;
        }
    }
    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while",
];

/// Make an identifier usable in generated code. `self`, `Self`, `crate` and
/// `super` cannot be raw identifiers and get a trailing underscore instead.
fn escape_keyword(name: String) -> String {
    match name.as_str() {
        "self" | "Self" | "crate" | "super" => format!("{}_", name),
        n if KEYWORDS.contains(&n) => format!("r#{}", name),
        _ => name,
    }
}

fn format_doc(doc: &Doc) -> String {
    match doc.xmlns.as_ref().map(|u| u.as_str()) {
        Some("http://www.w3.org/1999/xhtml") => html2md::parse_html(&doc.content),
        Some(xmlns) => {
            log::warn!("unknown doc namespace: {}", xmlns);
            doc.content.clone()
        }
        None => doc.content.clone(),
    }
}

fn generate_docs(docs: &[Doc], indent: usize, config: &Config) -> Vec<String> {
    let mut lines = Vec::new();
    if config.customizations.suppress_docs() {
        return lines;
    }
    let pad = " ".repeat(indent * 4);
    for doc in docs {
        if let Some(title) = &doc.title {
            lines.push(format!("{}/// # {}\n", pad, title));
            lines.push(format!("{}///\n", pad));
        }
        for line in format_doc(doc).lines() {
            let line = line.trim_end();
            if line.is_empty() {
                lines.push(format!("{}///\n", pad));
            } else {
                lines.push(format!("{}/// {}\n", pad, line));
            }
        }
    }
    lines
}

fn derive_line(customizations: &Customizations) -> String {
    let mut derives = vec![
        "Debug".to_string(),
        "Clone".to_string(),
        "serde::Serialize".to_string(),
        "serde::Deserialize".to_string(),
    ];
    for derive in customizations.derives() {
        if !derives.iter().any(|d| d == derive) {
            derives.push(derive.clone());
        }
    }
    format!("#[derive({})]\n", derives.join(", "))
}

fn field_type(param: &Param) -> String {
    let base = if !param.options.is_empty() {
        "String".to_string()
    } else {
        match param.xsd_type.as_deref() {
            Some("xsd:string") | Some("string") | None => "String".to_string(),
            Some("xsd:int") | Some("xsd:integer") | Some("xsd:long") | Some("int") => {
                "i64".to_string()
            }
            Some("xsd:boolean") | Some("boolean") => "bool".to_string(),
            Some("xsd:double") | Some("xsd:float") | Some("xsd:decimal") => "f64".to_string(),
            Some("xsd:date") => "chrono::NaiveDate".to_string(),
            Some("xsd:dateTime") => "chrono::DateTime<chrono::Utc>".to_string(),
            Some(other) => {
                log::warn!(
                    "unknown type `{}` for parameter {}, treating as a string",
                    other,
                    param.name
                );
                "String".to_string()
            }
        }
    };

    if param.repeating {
        format!("Vec<{}>", base)
    } else if !param.required {
        format!("Option<{}>", base)
    } else {
        base
    }
}

fn scalar_arg_type(param: &Param) -> &'static str {
    if !param.options.is_empty() {
        return "&str";
    }
    match param.xsd_type.as_deref() {
        Some("xsd:int") | Some("xsd:integer") | Some("xsd:long") | Some("int") => "i64",
        Some("xsd:boolean") | Some("boolean") => "bool",
        Some("xsd:double") | Some("xsd:float") | Some("xsd:decimal") => "f64",
        _ => "&str",
    }
}

fn arg_type(param: &Param) -> String {
    let base = scalar_arg_type(param);
    if param.repeating {
        format!("&[{}]", base)
    } else if !param.required {
        format!("Option<{}>", base)
    } else {
        base.to_string()
    }
}

/// Expression handing a parameter value to `append_pair`.
fn pair_value(param: &Param, expr: &str) -> String {
    if scalar_arg_type(param) == "&str" {
        expr.to_string()
    } else {
        format!("&{}.to_string()", expr)
    }
}

fn header_value(param: &Param, expr: &str) -> String {
    if scalar_arg_type(param) == "&str" {
        expr.to_string()
    } else {
        format!("{}.to_string()", expr)
    }
}

fn method_expr(verb: &str) -> String {
    const KNOWN: &[&str] = &[
        "GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH", "TRACE", "CONNECT",
    ];
    let upper = verb.to_uppercase();
    if KNOWN.contains(&upper.as_str()) {
        format!("reqwest::Method::{}", upper)
    } else {
        format!(
            "reqwest::Method::from_bytes(b{:?}).expect(\"valid HTTP method\")",
            upper
        )
    }
}

fn generate_representation(
    def: &RepresentationDef,
    names: &mut Names,
    config: &Config,
) -> Result<Vec<String>, Error> {
    let id = match &def.id {
        Some(id) => id,
        None => return Ok(Vec::new()),
    };
    if config.customizations.is_suppressed(id) {
        log::debug!("suppressing representation `{}`", id);
        return Ok(Vec::new());
    }
    if def.media_type != Some(mime::APPLICATION_JSON) {
        log::debug!("skipping non-JSON representation `{}`", id);
        return Ok(Vec::new());
    }

    let name = match config.customizations.rename_for(id) {
        Some(renamed) => renamed.to_string(),
        None => type_name(id),
    };
    names.claim(&name)?;

    let mut lines = generate_docs(&def.docs, 0, config);
    lines.push(derive_line(&config.customizations));
    lines.push(format!("pub struct {} {{\n", name));

    for param in def.params.iter().filter(|p| p.style == ParamStyle::Plain) {
        if let Some(doc) = &param.doc {
            lines.extend(generate_docs(std::slice::from_ref(doc), 1, config));
        }
        let field = field_name(&param.name);
        if field != param.name {
            lines.push(format!("    #[serde(rename = {:?})]\n", param.name));
        }
        lines.push(format!(
            "    pub {}: {},\n",
            escape_keyword(field),
            field_type(param)
        ));
    }

    lines.push("}\n".to_string());
    lines.push("\n".to_string());
    Ok(lines)
}

fn resource_type_name(resource: &Resource, customizations: &Customizations) -> String {
    if let Some(id) = &resource.id {
        if let Some(renamed) = customizations.rename_for(id) {
            return renamed.to_string();
        }
        type_name(id)
    } else if let Some(path) = &resource.path {
        type_name(path)
    } else {
        "Root".to_string()
    }
}

fn generate_method(
    method: &Method,
    resource: &Resource,
    taken: &mut Names,
    config: &Config,
) -> Result<Vec<String>, Error> {
    let base = method.id.as_deref().unwrap_or(&method.verb);
    let fn_name = escape_keyword(field_name(base));
    taken.claim(&fn_name)?;

    let query: Vec<&Param> = resource
        .params
        .iter()
        .chain(method.request.params.iter())
        .filter(|p| p.style == ParamStyle::Query)
        .collect();
    let headers: Vec<&Param> = resource
        .params
        .iter()
        .chain(method.request.params.iter())
        .filter(|p| p.style == ParamStyle::Header)
        .collect();

    let mut args = String::new();
    for param in query.iter().chain(headers.iter()) {
        if param.fixed.is_some() {
            continue;
        }
        args.push_str(&format!(
            ", {}: {}",
            escape_keyword(field_name(&param.name)),
            arg_type(param)
        ));
    }

    let mut lines = generate_docs(&method.docs, 1, config);
    let fn_kw = match config.style {
        Style::Blocking => "fn",
        Style::Async => "async fn",
    };
    lines.push(format!(
        "    pub {} {}(&self, client: &{}{}) -> Result<{}, reqwest::Error> {{\n",
        fn_kw,
        fn_name,
        config.style.client_type(),
        args,
        config.style.response_type()
    ));

    let url_binding = if query.is_empty() { "let url" } else { "let mut url" };
    lines.push(format!("        {} = self.url.clone();\n", url_binding));

    for param in &query {
        if let Some(fixed) = &param.fixed {
            lines.push(format!(
                "        url.query_pairs_mut().append_pair({:?}, {:?});\n",
                param.name, fixed
            ));
            continue;
        }
        let ident = escape_keyword(field_name(&param.name));
        if param.repeating {
            lines.push(format!("        for value in {} {{\n", ident));
            lines.push(format!(
                "            url.query_pairs_mut().append_pair({:?}, {});\n",
                param.name,
                pair_value(param, "value")
            ));
            lines.push("        }\n".to_string());
        } else if !param.required {
            lines.push(format!("        if let Some(value) = {} {{\n", ident));
            lines.push(format!(
                "            url.query_pairs_mut().append_pair({:?}, {});\n",
                param.name,
                pair_value(param, "value")
            ));
            lines.push("        }\n".to_string());
        } else {
            lines.push(format!(
                "        url.query_pairs_mut().append_pair({:?}, {});\n",
                param.name,
                pair_value(param, &ident)
            ));
        }
    }

    let request_binding = if headers.is_empty() {
        "let request"
    } else {
        "let mut request"
    };
    lines.push(format!(
        "        {} = client.request({}, url);\n",
        request_binding,
        method_expr(&method.verb)
    ));

    for param in &headers {
        if let Some(fixed) = &param.fixed {
            lines.push(format!(
                "        request = request.header({:?}, {:?});\n",
                param.name, fixed
            ));
            continue;
        }
        let ident = escape_keyword(field_name(&param.name));
        if param.repeating {
            lines.push(format!("        for value in {} {{\n", ident));
            lines.push(format!(
                "            request = request.header({:?}, {});\n",
                param.name,
                header_value(param, "value")
            ));
            lines.push("        }\n".to_string());
        } else if !param.required {
            lines.push(format!("        if let Some(value) = {} {{\n", ident));
            lines.push(format!(
                "            request = request.header({:?}, {});\n",
                param.name,
                header_value(param, "value")
            ));
            lines.push("        }\n".to_string());
        } else {
            lines.push(format!(
                "        request = request.header({:?}, {});\n",
                param.name,
                header_value(param, &ident)
            ));
        }
    }

    match config.style {
        Style::Blocking => lines.push("        request.send()\n".to_string()),
        Style::Async => lines.push("        request.send().await\n".to_string()),
    }
    lines.push("    }\n".to_string());
    lines.push("\n".to_string());
    Ok(lines)
}

fn generate_resource(
    resource: &Resource,
    base: Option<&url::Url>,
    names: &mut Names,
    config: &Config,
) -> Result<Vec<String>, Error> {
    let name = resource_type_name(resource, &config.customizations);
    names.claim(&name)?;
    let url = resource.url(base);

    let mut lines = generate_docs(&resource.docs, 0, config);
    lines.push(format!("pub struct {} {{\n", name));
    lines.push("    pub url: url::Url,\n".to_string());
    lines.push("}\n".to_string());
    lines.push("\n".to_string());

    // A resource whose URL is pinned by the description gets a Default impl.
    if let Some(url) = &url {
        lines.push(format!("impl Default for {} {{\n", name));
        lines.push("    fn default() -> Self {\n".to_string());
        lines.push(format!(
            "        {} {{ url: url::Url::parse({:?}).expect(\"valid resource URL\") }}\n",
            name,
            url.as_str()
        ));
        lines.push("    }\n".to_string());
        lines.push("}\n".to_string());
        lines.push("\n".to_string());
    }

    lines.push(format!("impl {} {{\n", name));
    let mut methods = Names::default();
    methods.claim("new")?;
    lines.push("    pub fn new(url: url::Url) -> Self {\n".to_string());
    lines.push(format!("        {} {{ url }}\n", name));
    lines.push("    }\n".to_string());
    lines.push("\n".to_string());

    for method in &resource.methods {
        lines.extend(generate_method(method, resource, &mut methods, config)?);
    }

    // Strip the blank line left after the last item in the impl block.
    if lines.last().map(|l| l.as_str()) == Some("\n") {
        lines.pop();
    }
    lines.push("}\n".to_string());
    lines.push("\n".to_string());

    for subresource in &resource.subresources {
        lines.extend(generate_resource(subresource, url.as_ref(), names, config)?);
    }

    Ok(lines)
}

fn module_name_for(resource: &Resource) -> String {
    if let Some(id) = &resource.id {
        field_name(id)
    } else if let Some(path) = &resource.path {
        field_name(path)
    } else {
        "root".to_string()
    }
}

fn package_dir(package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(field_name)
        .collect()
}

fn header_lines(app: &Application, config: &Config) -> Vec<String> {
    let mut lines = vec!["//! Client bindings generated by wadlgen.\n".to_string()];
    if !config.customizations.suppress_docs() {
        for doc in &app.docs {
            lines.push("//!\n".to_string());
            for line in format_doc(doc).lines() {
                let line = line.trim_end();
                if line.is_empty() {
                    lines.push("//!\n".to_string());
                } else {
                    lines.push(format!("//! {}\n", line));
                }
            }
        }
    }
    lines.push("\n".to_string());
    lines
}

/// Generate the source files for an application.
pub fn generate(app: &Application, config: &Config) -> Result<Vec<GeneratedFile>, Error> {
    let dir = package_dir(&config.package);
    let mut names = Names::default();

    let mut representations = Vec::new();
    for def in &app.representations {
        representations.extend(generate_representation(def, &mut names, config)?);
    }

    let mut files = Vec::new();
    if config.auto_package {
        let mut modules = Names::default();
        let mut decls = Vec::new();
        for group in &app.resources {
            for resource in &group.resources {
                let module = module_name_for(resource);
                modules.claim(&module)?;
                let mut lines =
                    vec!["//! Client bindings generated by wadlgen.\n\n".to_string()];
                lines.extend(generate_resource(resource, group.base.as_ref(), &mut names, config)?);
                decls.push(format!("pub mod {};\n", escape_keyword(module.clone())));
                files.push(GeneratedFile {
                    path: dir.join(format!("{}.rs", module)),
                    source: lines.concat(),
                });
            }
        }

        let mut lines = header_lines(app, config);
        lines.extend(decls);
        if !representations.is_empty() {
            lines.push("\n".to_string());
            lines.extend(representations);
        }
        files.insert(
            0,
            GeneratedFile {
                path: dir.join("mod.rs"),
                source: lines.concat(),
            },
        );
    } else {
        let mut lines = header_lines(app, config);
        lines.extend(representations);
        for group in &app.resources {
            for resource in &group.resources {
                lines.extend(generate_resource(resource, group.base.as_ref(), &mut names, config)?);
            }
        }
        files.push(GeneratedFile {
            path: dir.join("mod.rs"),
            source: lines.concat(),
        });
    }

    Ok(files)
}

#[test]
fn test_type_name() {
    assert_eq!(type_name("user-list"), "UserList");
    assert_eq!(type_name("user_list_v2"), "UserListV2");
    assert_eq!(type_name("users/{id}"), "UsersId");
    assert_eq!(type_name("2fa"), "_2fa");
}

#[test]
fn test_field_name() {
    assert_eq!(field_name("UserList"), "user_list");
    assert_eq!(field_name("content-type"), "content_type");
    assert_eq!(field_name("GET"), "get");
    assert_eq!(field_name("XMLParser"), "xmlparser");
}

#[test]
fn test_escape_keyword() {
    assert_eq!(escape_keyword("type".to_string()), "r#type");
    assert_eq!(escape_keyword("self".to_string()), "self_");
    assert_eq!(escape_keyword("format".to_string()), "format");
}
