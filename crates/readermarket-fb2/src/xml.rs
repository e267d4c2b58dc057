//! Typed XML tree for FB2 documents
//!
//! The FB2 parser needs two things a streaming reader does not give it
//! directly: random access to a section's children and the serialized
//! markup of a paragraph's children. This module builds a small owned tree
//! from `quick-xml` events and classifies every element by its local name.
//!
//! Well-formedness is checked while the tree is built, so a successfully
//! returned tree is always complete.

use crate::error::{Fb2Error, Result};
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

/// Recognized FB2 element kinds
///
/// Resolved from the local name, so `<fb:section>` and `<section>` are the
/// same kind. Anything the parser does not act on is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<title-info>`
    TitleInfo,
    /// `<book-title>`
    BookTitle,
    /// `<author>`
    Author,
    /// `<first-name>`
    FirstName,
    /// `<last-name>`
    LastName,
    /// `<annotation>`
    Annotation,
    /// `<genre>`
    Genre,
    /// `<lang>`
    Lang,
    /// `<date>`
    Date,
    /// `<body>`
    Body,
    /// `<section>`
    Section,
    /// `<title>`
    Title,
    /// `<p>`
    Paragraph,
    /// `<epigraph>`
    Epigraph,
    /// `<poem>`
    Poem,
    /// `<cite>`
    Cite,
    /// `<empty-line>`
    EmptyLine,
    /// Any other element
    Other,
}

impl ElementKind {
    /// Classifies an element by its local (unprefixed) name.
    #[must_use]
    pub fn from_local_name(name: &str) -> Self {
        match name {
            "title-info" => Self::TitleInfo,
            "book-title" => Self::BookTitle,
            "author" => Self::Author,
            "first-name" => Self::FirstName,
            "last-name" => Self::LastName,
            "annotation" => Self::Annotation,
            "genre" => Self::Genre,
            "lang" => Self::Lang,
            "date" => Self::Date,
            "body" => Self::Body,
            "section" => Self::Section,
            "title" => Self::Title,
            "p" => Self::Paragraph,
            "epigraph" => Self::Epigraph,
            "poem" => Self::Poem,
            "cite" => Self::Cite,
            "empty-line" => Self::EmptyLine,
            _ => Self::Other,
        }
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Element with its own children
    Element(XmlElement),
    /// Unescaped character data (text or CDATA)
    Text(String),
}

/// An element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name as written in the source (may carry a prefix)
    pub name: String,
    /// Kind resolved from the local name
    pub kind: ElementKind,
    /// Attributes in source order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            kind: ElementKind::from_local_name(&local),
            attributes,
            children: Vec::new(),
        })
    }

    /// Returns the value of the attribute with the given qualified or local name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name || local_part(key) == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct element children in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct element children of the given kind.
    pub fn children_of(&self, kind: ElementKind) -> impl Iterator<Item = &XmlElement> {
        self.elements().filter(move |el| el.kind == kind)
    }

    /// First direct child of the given kind.
    #[must_use]
    pub fn child(&self, kind: ElementKind) -> Option<&XmlElement> {
        self.children_of(kind).next()
    }

    /// All descendant elements in document order (pre-order, self excluded).
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.elements().collect::<Vec<_>>().into_iter()],
        }
    }

    /// First descendant of the given kind in document order.
    #[must_use]
    pub fn find(&self, kind: ElementKind) -> Option<&XmlElement> {
        self.descendants().find(|el| el.kind == kind)
    }

    /// Like [`find`](Self::find), but matches this element as well.
    #[must_use]
    pub fn find_in_tree(&self, kind: ElementKind) -> Option<&XmlElement> {
        if self.kind == kind {
            Some(self)
        } else {
            self.find(kind)
        }
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }

    /// Serialized markup of the children, without the element's own tags.
    #[must_use]
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_node(&mut out, node);
        }
        out
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::vec::IntoIter<&'a XmlElement>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(el) => {
                    self.stack
                        .push(el.elements().collect::<Vec<_>>().into_iter());
                    return Some(el);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn write_node(out: &mut String, node: &XmlNode) {
    match node {
        XmlNode::Text(text) => out.push_str(&partial_escape(text)),
        XmlNode::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in &el.attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
            if el.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &el.children {
                    write_node(out, child);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
        }
    }
}

/// Parse markup into a tree and return its root element
///
/// # Errors
/// * `Fb2Error::MalformedInput` if the markup is not well-formed: reader
///   errors (mismatched end tags, bad or duplicate attributes, undefined
///   entities), stray end tags, unclosed elements, a missing root element,
///   several root elements, text outside the root, or an XML declaration or
///   DOCTYPE after the first element.
///
/// Line endings are normalized to `\n` before parsing.
pub fn parse_document(raw: &str) -> Result<XmlElement> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let raw = normalize_line_endings(raw);
    let mut reader = Reader::from_str(&raw);
    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Fb2Error::MalformedInput(format!(
                "{e} (at byte {})",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(start) => {
                ensure_single_root(root.as_ref(), open.is_empty())?;
                open.push(XmlElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(root.as_ref(), open.is_empty())?;
                let el = XmlElement::from_start(&start)?;
                attach(&mut open, &mut root, el);
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let Some(el) = open.pop() else {
                    return Err(Fb2Error::MalformedInput(format!(
                        "unexpected closing tag </{name}>"
                    )));
                };
                if el.name != name {
                    return Err(Fb2Error::MalformedInput(format!(
                        "expected </{}>, found </{name}>",
                        el.name
                    )));
                }
                attach(&mut open, &mut root, el);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut open, &text)?;
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata);
                push_text(&mut open, &text)?;
            }
            Event::Decl(_) | Event::DocType(_) if root.is_some() || !open.is_empty() => {
                return Err(Fb2Error::MalformedInput(format!(
                    "XML declaration or DOCTYPE after the first element (at byte {})",
                    reader.buffer_position()
                )));
            }
            Event::Eof => break,
            // comments, processing instructions, prolog declarations
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(Fb2Error::MalformedInput(format!(
            "unclosed element <{}> at end of input",
            unclosed.name
        )));
    }

    root.ok_or_else(|| Fb2Error::MalformedInput("no root element".to_string()))
}

/// `\r\n` and lone `\r` become `\n`.
fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

fn ensure_single_root(root: Option<&XmlElement>, at_top_level: bool) -> Result<()> {
    if at_top_level {
        if let Some(existing) = root {
            return Err(Fb2Error::MalformedInput(format!(
                "extra content after root element <{}>",
                existing.name
            )));
        }
    }
    Ok(())
}

fn attach(open: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) {
    match open.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(el)),
        None => *root = Some(el),
    }
}

fn push_text(open: &mut [XmlElement], text: &str) -> Result<()> {
    match open.last_mut() {
        Some(parent) => {
            if let Some(XmlNode::Text(prev)) = parent.children.last_mut() {
                prev.push_str(text);
            } else {
                parent.children.push(XmlNode::Text(text.to_string()));
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Fb2Error::MalformedInput(format!(
            "text outside root element: {:?}",
            text.trim()
        ))),
    }
}
