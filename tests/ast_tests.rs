use url::Url;
use wadlgen::ast::*;

fn empty_resource() -> Resource {
    Resource {
        id: None,
        path: None,
        query_type: mime::APPLICATION_WWW_FORM_URLENCODED,
        docs: vec![],
        params: vec![],
        methods: vec![],
        subresources: vec![],
    }
}

#[test]
fn test_application_get_representation_by_id() {
    let app = Application {
        docs: vec![],
        grammars: vec![],
        resources: vec![],
        representations: vec![
            RepresentationDef {
                id: Some("user".to_string()),
                media_type: Some(mime::APPLICATION_JSON),
                ..Default::default()
            },
            RepresentationDef {
                id: None,
                media_type: Some(mime::APPLICATION_JSON),
                ..Default::default()
            },
        ],
    };

    assert!(app.get_representation_by_id("user").is_some());
    assert!(app.get_representation_by_id("nonexistent").is_none());
}

#[test]
fn test_application_iter_resources() {
    let base = Url::parse("http://example.com/api/").unwrap();
    let mut users = empty_resource();
    users.id = Some("users".to_string());
    users.path = Some("users".to_string());

    let app = Application {
        docs: vec![],
        grammars: vec![],
        resources: vec![Resources {
            base: Some(base.clone()),
            resources: vec![users],
        }],
        representations: vec![],
    };

    let found: Vec<_> = app.iter_resources().collect();
    assert_eq!(found.len(), 1);
    let (group_base, resource) = &found[0];
    assert_eq!(*group_base, Some(&base));
    assert_eq!(resource.id.as_deref(), Some("users"));
}

#[test]
fn test_resource_url_joins_base() {
    let base = Url::parse("http://example.com/api/").unwrap();
    let mut resource = empty_resource();
    resource.path = Some("users/{id}".to_string());

    let url = resource.url(Some(&base)).unwrap();
    assert_eq!(url.as_str(), "http://example.com/api/users/%7Bid%7D");
}

#[test]
fn test_resource_url_without_base() {
    let mut resource = empty_resource();
    resource.path = Some("http://example.com/users".to_string());
    assert!(resource.url(None).is_some());

    resource.path = Some("users".to_string());
    // A relative path without a base cannot be resolved.
    assert!(resource.url(None).is_none());

    resource.path = None;
    assert!(resource.url(Some(&Url::parse("http://example.com/").unwrap())).is_none());
}

#[test]
fn test_param_style_from_str() {
    assert_eq!("query".parse::<ParamStyle>().unwrap(), ParamStyle::Query);
    assert_eq!("plain".parse::<ParamStyle>().unwrap(), ParamStyle::Plain);
    assert_eq!("header".parse::<ParamStyle>().unwrap(), ParamStyle::Header);
    assert!("bogus".parse::<ParamStyle>().is_err());
}

#[test]
fn test_application_from_str() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
    <application xmlns="http://wadl.dev.java.net/2009/02">
        <resources base="http://example.com/api/">
            <resource path="users"/>
        </resources>
    </application>"#;

    let app: Application = xml.parse().unwrap();
    assert_eq!(app.resources.len(), 1);
    assert_eq!(app.resources[0].resources.len(), 1);
}
