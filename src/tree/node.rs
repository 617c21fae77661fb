use std::fmt;

use html5ever::{tendril::StrTendril, Attribute, QualName};
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::html;

/// A node in the tree.
#[derive(Clone)]
pub enum Node {
    /// The document root.
    Document,

    /// An HTML comment.
    Comment(StrTendril),

    /// A run of text.
    Text(StrTendril),

    /// An element.
    Element(Element),
}

/// An HTML element.
#[derive(Clone)]
pub struct Element {
    /// The element name. Passes retag elements by replacing it.
    pub name: QualName,
    /// The element attributes.
    pub attrs: Attributes,
    /// The HTMLBook role assigned to the element, emitted as `data-type`.
    pub data_type: Option<DataType>,
    markers: Vec<Marker>,
}

#[derive(Clone, Default)]
pub struct Attributes {
    pub id: Option<StrTendril>,
    classes: StrTendril,
    pub rest: IndexMap<QualName, StrTendril>,
}

/// Markup produced by Jupyter Book (and Sphinx underneath it) that the passes look for.
///
/// Markers are read off an element's classes once, when the element is created or its classes
/// change, so passes never match on class strings themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// `div.section`, the pre-HTML5 section container.
    Section,
    Figure,
    Caption,
    CaptionNumber,
    SectionNumber,
    HeaderLink,
    InternalReference,
    ImageReference,
    FootnoteReference,
    /// The `hr.footnotes` rule above the footnote list.
    FootnoteRule,
    FootnoteList,
    CitationList,
    Admonition,
    AdmonitionTitle,
    Math,
    Highlight,
    PythonHighlight,
    CellInput,
    CellOutput,
    HideInput,
    HideOutput,
    HideCell,
    Hidden,
    ToggleDetails,
    Example,
    Sidebar,
    SidebarTitle,
    /// A reference Sphinx could not resolve, left as `span.xref`.
    PendingReference,
    Literal,
    PreformattedText,
}

impl Marker {
    fn from_class(class: &str) -> Option<Self> {
        let marker = match class {
            "section" => Self::Section,
            "figure" => Self::Figure,
            "caption" => Self::Caption,
            "caption-number" => Self::CaptionNumber,
            "section-number" => Self::SectionNumber,
            "headerlink" => Self::HeaderLink,
            "internal" => Self::InternalReference,
            "image-reference" => Self::ImageReference,
            "footnote-reference" => Self::FootnoteReference,
            "footnotes" => Self::FootnoteRule,
            "footnote" => Self::FootnoteList,
            "citation" => Self::CitationList,
            "admonition" => Self::Admonition,
            "admonition-title" => Self::AdmonitionTitle,
            "math" => Self::Math,
            "highlight" => Self::Highlight,
            "highlight-ipython3" | "highlight-ipython" | "highlight-python3"
            | "highlight-python" => Self::PythonHighlight,
            "cell_input" => Self::CellInput,
            "cell_output" => Self::CellOutput,
            "tag_hide-input" => Self::HideInput,
            "tag_hide-output" => Self::HideOutput,
            "tag_hide-cell" => Self::HideCell,
            "hide" => Self::Hidden,
            "toggle-details" => Self::ToggleDetails,
            "tag_example" => Self::Example,
            "sidebar" => Self::Sidebar,
            "sidebar-title" => Self::SidebarTitle,
            "xref" => Self::PendingReference,
            "literal" => Self::Literal,
            "pre" => Self::PreformattedText,
            _ => return None,
        };
        Some(marker)
    }
}

/// HTMLBook `data-type` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Division(Division),
    /// `sect1` through `sect5`.
    Section(u8),
    Admonition(Admonition),
    Xref,
    Footnote,
    Tex,
    Equation,
    ProgramListing,
    Example,
    Sidebar,
    GlossaryList,
    GlossTerm,
    GlossDef,
}

/// Top-level book divisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Division {
    Chapter,
    Preface,
    Afterword,
    Appendix,
    Glossary,
    Part,
    Colophon,
    HalfTitlePage,
    TitlePage,
    CopyrightPage,
    Dedication,
    Acknowledgments,
    Conclusion,
    Foreword,
    Introduction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admonition {
    Note,
    Warning,
    Tip,
    Caution,
    Important,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Division(division) => division.as_str(),
            Self::Section(level) => match level {
                0 | 1 => "sect1",
                2 => "sect2",
                3 => "sect3",
                4 => "sect4",
                _ => "sect5",
            },
            Self::Admonition(admonition) => admonition.as_str(),
            Self::Xref => "xref",
            Self::Footnote => "footnote",
            Self::Tex => "tex",
            Self::Equation => "equation",
            Self::ProgramListing => "programlisting",
            Self::Example => "example",
            Self::Sidebar => "sidebar",
            Self::GlossaryList => "glossary",
            Self::GlossTerm => "glossterm",
            Self::GlossDef => "glossdef",
        }
    }
}

impl Division {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Preface => "preface",
            Self::Afterword => "afterword",
            Self::Appendix => "appendix",
            Self::Glossary => "glossary",
            Self::Part => "part",
            Self::Colophon => "colophon",
            Self::HalfTitlePage => "halftitlepage",
            Self::TitlePage => "titlepage",
            Self::CopyrightPage => "copyright-page",
            Self::Dedication => "dedication",
            Self::Acknowledgments => "acknowledgments",
            Self::Conclusion => "conclusion",
            Self::Foreword => "foreword",
            Self::Introduction => "introduction",
        }
    }

    /// Divisions that may be named directly by a file name.
    pub fn from_name(name: &str) -> Option<Self> {
        let division = match name {
            "colophon" => Self::Colophon,
            "halftitlepage" => Self::HalfTitlePage,
            "titlepage" => Self::TitlePage,
            "copyright-page" => Self::CopyrightPage,
            "dedication" => Self::Dedication,
            "acknowledgments" => Self::Acknowledgments,
            "afterword" => Self::Afterword,
            "conclusion" => Self::Conclusion,
            "foreword" => Self::Foreword,
            "introduction" => Self::Introduction,
            "preface" => Self::Preface,
            _ => return None,
        };
        Some(division)
    }
}

impl Admonition {
    pub const ALL: [Self; 5] = [
        Self::Note,
        Self::Warning,
        Self::Tip,
        Self::Caution,
        Self::Important,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Tip => "tip",
            Self::Caution => "caution",
            Self::Important => "important",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

static ID: Lazy<QualName> = Lazy::new(|| html::attribute("id"));
static CLASS: Lazy<QualName> = Lazy::new(|| html::attribute("class"));
static DATA_TYPE: Lazy<QualName> = Lazy::new(|| html::attribute("data-type"));

impl Element {
    /// Creates an element in the HTML namespace with no attributes.
    pub fn new(name: &str) -> Self {
        Self {
            name: html::element(name),
            attrs: Attributes::default(),
            data_type: None,
            markers: Vec::new(),
        }
    }

    /// Creates an element from the parser's view of it.
    pub fn parsed(name: QualName, attributes: Vec<Attribute>) -> Self {
        let mut attrs = Attributes::default();
        for attr in attributes {
            match &*attr.name.local {
                "id" => attrs.id = Some(attr.value),
                "class" => attrs.classes = attr.value,
                _ => {
                    attrs.rest.insert(attr.name, attr.value);
                }
            }
        }
        let mut element = Self {
            name,
            attrs,
            data_type: None,
            markers: Vec::new(),
        };
        element.recognize_markers();
        element
    }

    fn recognize_markers(&mut self) {
        self.markers = self
            .attrs
            .classes
            .split_ascii_whitespace()
            .filter_map(Marker::from_class)
            .collect();
    }

    /// Is this an element with the given local name?
    pub fn is(&self, name: &str) -> bool {
        &*self.name.local == name
    }

    pub fn rename(&mut self, name: &str) {
        self.name = html::element(name);
    }

    pub fn heading_level(&self) -> Option<u8> {
        html::heading_level(&self.name.local)
    }

    pub fn has(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs.classes.split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn set_classes(&mut self, classes: &str) {
        self.attrs.classes = StrTendril::from_slice(classes);
        self.recognize_markers();
    }

    pub fn clear_classes(&mut self) {
        self.set_classes("");
    }

    /// Removes every class for which `remove` returns `true`.
    pub fn remove_classes(&mut self, mut remove: impl FnMut(&str) -> bool) {
        let kept = self
            .classes()
            .filter(|class| !remove(*class))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_classes(&kept);
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs.id.as_deref()
    }

    pub fn set_id(&mut self, id: &str) {
        self.attrs.id = Some(StrTendril::from_slice(id));
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.rest.get(&html::attribute(name)).map(|value| &**value)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs
            .rest
            .insert(html::attribute(name), StrTendril::from_slice(value));
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<StrTendril> {
        self.attrs.rest.shift_remove(&html::attribute(name))
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.remove_attr("data-type");
        self.data_type = Some(data_type);
    }

    /// Attributes in output order: `id`, `class`, `data-type`, then the rest in source order.
    pub fn attributes(&self) -> impl Iterator<Item = (&QualName, &str)> {
        let id = self.attrs.id.as_deref().map(|id| (&*ID, id));
        let classes = Some(&*self.attrs.classes)
            .filter(|classes| !classes.is_empty())
            .map(|classes| (&*CLASS, classes));
        let data_type = self.data_type.map(|ty| (&*DATA_TYPE, ty.as_str()));
        id.into_iter()
            .chain(classes)
            .chain(data_type)
            .chain(self.attrs.rest.iter().map(|(name, value)| (name, &**value)))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Document => write!(f, "Document"),
            Node::Comment(comment) => write!(f, "<!-- {comment:?} -->"),
            Node::Text(text) => write!(f, "{text:?}"),
            Node::Element(element) => write!(f, "{element:?}"),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name.local)?;
        for (name, value) in self.attributes() {
            write!(f, " {}={value:?}", name.local)?;
        }
        write!(f, ">")
    }
}
