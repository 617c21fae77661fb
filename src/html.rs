use html5ever::{namespace_url, ns, LocalName, QualName};

/// Namespace declared on the root of every emitted HTMLBook document.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Name of an element in the HTML namespace.
pub fn element(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

/// Name of an attribute without a namespace.
pub fn attribute(local: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(local))
}

/// The level of a heading tag, `h1` through `h6`.
pub fn heading_level(local: &str) -> Option<u8> {
    match local {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// The heading tag for `level`, clamped to `h1..=h6`.
pub fn heading(level: u8) -> &'static str {
    match level {
        0 | 1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}

/// Does `url` point outside of the book?
pub fn is_external(url: &str) -> bool {
    url.starts_with("//") || url.starts_with("data:") || url.contains("://")
}
