//! An owned element tree built from `xml-rs` events.

use std::io::Read;

use xml::attribute::OwnedAttribute;
use xml::reader::Result as XmlResult;
use xml::reader::{EventReader, XmlEvent};

use crate::xml_iter::XmlIteratorExtensions;
use crate::{ParseError, ParseResult};

#[derive(Debug, Clone)]
pub enum Content {
    Comment(String),
    Text(String),
    Child(Node),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub attributes: Vec<OwnedAttribute>,
    pub contents: Vec<Content>,
}

impl Node {
    fn new(name: String, attributes: Vec<OwnedAttribute>) -> Node {
        Node {
            name,
            attributes,
            contents: Vec::new(),
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.local_name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Attribute value, or the empty string when the attribute is absent.
    pub fn attribute_or_empty(&self, name: &str) -> &str {
        self.get_attribute(name).unwrap_or("")
    }

    /// Element children in document order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.contents.iter().filter_map(|c| match c {
            Content::Child(n) => Some(n),
            _ => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children().filter(move |c| c.name == name)
    }

    pub fn get_child(&self, name: &str) -> Option<&Node> {
        self.children().find(|c| c.name == name)
    }

    /// Text of this node and all of its descendants, concatenated in document order.
    pub fn concat_text(&self) -> String {
        let mut ret = String::new();
        self.push_text(&mut ret);
        ret
    }

    fn push_text(&self, out: &mut String) {
        for c in &self.contents {
            match c {
                Content::Text(s) => out.push_str(s),
                Content::Child(n) => n.push_text(out),
                Content::Comment(_) => {}
            }
        }
    }

    /// Builds a node from the events following its start tag, consuming up to and
    /// including the matching end tag.
    pub fn parse<It: Iterator<Item = XmlResult<XmlEvent>>>(
        events: It,
        name: String,
        attributes: Vec<OwnedAttribute>,
    ) -> ParseResult<Node> {
        let mut events = events.xml_contents();
        let mut node_stack: Vec<Node> = vec![Node::new(name, attributes)];
        for e in events.by_ref() {
            match e? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    node_stack.push(Node::new(name.local_name, attributes));
                }
                XmlEvent::EndElement { .. } => {
                    let child = node_stack.pop().ok_or(ParseError::UnexpectedEOF)?;
                    let node = node_stack.last_mut().ok_or(ParseError::UnexpectedEOF)?;
                    node.contents.push(Content::Child(child));
                }
                XmlEvent::Characters(s) | XmlEvent::Whitespace(s) | XmlEvent::CData(s) => {
                    if let Some(node) = node_stack.last_mut() {
                        node.contents.push(Content::Text(s));
                    }
                }
                XmlEvent::Comment(s) => {
                    if let Some(node) = node_stack.last_mut() {
                        node.contents.push(Content::Comment(s));
                    }
                }
                _ => {}
            }
        }
        match node_stack.pop() {
            Some(node) if node_stack.is_empty() && events.is_outside_scope() => Ok(node),
            _ => Err(ParseError::UnexpectedEOF),
        }
    }
}

/// Reads events up to the root element and returns the whole tree beneath it.
pub fn read_root<It: Iterator<Item = XmlResult<XmlEvent>>>(mut events: It) -> ParseResult<Node> {
    loop {
        match events.next() {
            Some(Ok(XmlEvent::StartElement {
                name, attributes, ..
            })) => {
                return Node::parse(&mut events, name.local_name, attributes);
            }
            Some(Ok(XmlEvent::EndDocument)) | None => return Err(ParseError::NoRootElement),
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

pub fn read_document<R: Read>(source: R) -> ParseResult<Node> {
    read_root(EventReader::new(source).into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let root = read_document(
            r#"<registry><!-- c --><commands><command><proto><type>void</type> <name>vkFoo</name></proto></command></commands></registry>"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(root.name, "registry");
        let proto = root
            .get_child("commands")
            .and_then(|c| c.get_child("command"))
            .and_then(|c| c.get_child("proto"))
            .unwrap();
        assert_eq!(proto.concat_text(), "void vkFoo");
        assert_eq!(proto.get_child("name").unwrap().concat_text(), "vkFoo");
        assert_eq!(root.children().count(), 1);
    }

    #[test]
    fn attributes_default_to_empty() {
        let root = read_document(r#"<platform name="xlib" protect="VK_USE_PLATFORM_XLIB_KHR"/>"#.as_bytes()).unwrap();
        assert_eq!(root.get_attribute("name"), Some("xlib"));
        assert_eq!(root.attribute_or_empty("protect"), "VK_USE_PLATFORM_XLIB_KHR");
        assert_eq!(root.attribute_or_empty("comment"), "");
    }

    #[test]
    fn children_named_keeps_document_order() {
        let root = read_document(r#"<r><a n="1"/><b/><a n="2"/></r>"#.as_bytes()).unwrap();
        let names: Vec<&str> = root.children_named("a").map(|a| a.attribute_or_empty("n")).collect();
        assert_eq!(names, vec!["1", "2"]);
    }

    #[test]
    fn malformed_document_is_an_xml_error() {
        let err = read_document("<registry><platforms></registry>".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
    }

    #[test]
    fn empty_document_has_no_root() {
        let err = read_document("".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Xml(_) | ParseError::NoRootElement));
    }

    #[test]
    fn truncated_event_stream_is_unexpected_eof() {
        let events: Vec<XmlResult<XmlEvent>> = vec![Ok(XmlEvent::Characters("text".into()))];
        let err = Node::parse(events.into_iter(), "registry".into(), Vec::new()).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEOF));
    }
}
