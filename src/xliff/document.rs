/*!
 * Minimal XML element tree over quick-xml.
 *
 * The tree keeps text, attribute values and inline markup exactly as they appear
 * in the source (no entity decoding), so a parse/serialize round trip only
 * normalizes whitespace inside tags.
 */

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::errors::DocumentError;

const BOM: char = '\u{feff}';

/// A node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with its attributes and children
    Element(Element),
    /// Character data, kept escaped as in the source
    Text(String),
    /// Comments, CDATA, processing instructions, declarations; written back verbatim
    Raw(String),
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_to(out),
            Node::Text(text) | Node::Raw(text) => out.push_str(text),
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

/// An XML element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value of an attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any previous value in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// First direct child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Serialized children, exactly as they will be written
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_to(&mut out);
        }
        out
    }

    /// Replace all children with the given markup, stored verbatim
    pub fn set_inner_markup(&mut self, markup: &str) {
        self.children.clear();
        if !markup.is_empty() {
            self.children.push(Node::Text(markup.to_string()));
        }
    }

    /// Append an element as the last child, ahead of trailing indentation
    pub fn append_element(&mut self, element: Element) {
        let position = self
            .children
            .iter()
            .rposition(|node| !node.is_whitespace())
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let indent = self.children[..position]
            .iter()
            .rev()
            .find(|node| node.is_whitespace())
            .cloned();

        let mut inserted = vec![Node::Element(element)];
        if let Some(indent) = indent {
            inserted.insert(0, indent);
        }
        self.children.splice(position..position, inserted);
    }

    /// Insert an element right after the first child named `sibling`, or last if absent
    pub fn insert_after(&mut self, sibling: &str, element: Element) {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.name == sibling));
        match position {
            Some(idx) => {
                // Reuse the sibling's indentation so the new element lines up with it
                let mut inserted = vec![Node::Element(element)];
                if let Some(indent) = idx.checked_sub(1).and_then(|prev| self.children.get(prev)) {
                    if indent.is_whitespace() {
                        inserted.insert(0, indent.clone());
                    }
                }
                self.children.splice(idx + 1..idx + 1, inserted);
            }
            None => self.children.push(Node::Element(element)),
        }
    }

    fn child_element(&self, idx: usize) -> Option<&Element> {
        match self.children.get(idx) {
            Some(Node::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn child_element_mut(&mut self, idx: usize) -> Option<&mut Element> {
        match self.children.get_mut(idx) {
            Some(Node::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn collect_paths(&self, tag: &str, prefix: &mut Vec<usize>, out: &mut Vec<NodePath>) {
        for (idx, child) in self.children.iter().enumerate() {
            if let Node::Element(element) = child {
                prefix.push(idx);
                if element.name == tag {
                    out.push(NodePath(prefix.clone()));
                }
                element.collect_paths(tag, prefix, out);
                prefix.pop();
            }
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
        if self.children.is_empty() && self.self_closing {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn from_start(
        start: &BytesStart,
        self_closing: bool,
        position: u64,
    ) -> Result<Self, DocumentError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut element = Element::new(name);
        element.self_closing = self_closing;

        for attr in start.attributes().with_checks(false) {
            let attr = attr.map_err(|e| DocumentError::Parse {
                position,
                message: e.to_string(),
            })?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = std::str::from_utf8(&attr.value)?.to_string();
            element.attributes.push((key, value));
        }
        Ok(element)
    }
}

/// Location of an element as child indices from the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath(Vec<usize>);

/// A parsed XML document
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    bom: bool,
}

impl XmlDocument {
    /// Parse a document, keeping all markup verbatim
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let (content, bom) = match content.strip_prefix(BOM) {
            Some(rest) => (rest, true),
            None => (content, false),
        };

        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut roots: Vec<Node> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| DocumentError::Parse {
                position: reader.error_position() as u64,
                message: e.to_string(),
            })?;
            let end = reader.buffer_position() as usize;
            let raw = &content[start..end];

            let node = match event {
                Event::Eof => break,
                Event::Start(ref e) => {
                    stack.push(Element::from_start(e, false, start as u64)?);
                    continue;
                }
                Event::End(_) => match stack.pop() {
                    Some(element) => Node::Element(element),
                    None => {
                        return Err(DocumentError::Parse {
                            position: start as u64,
                            message: "unexpected closing tag".to_string(),
                        });
                    }
                },
                Event::Empty(ref e) => Node::Element(Element::from_start(e, true, start as u64)?),
                Event::Text(_) => Node::Text(raw.to_string()),
                _ => Node::Raw(raw.to_string()),
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError::Parse {
                position: content.len() as u64,
                message: format!("unclosed element <{}>", open.name),
            });
        }

        Ok(Self { nodes: roots, bom })
    }

    /// Paths of all elements with the given tag, in document order
    pub fn find_all(&self, tag: &str) -> Vec<NodePath> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Element(element) = node {
                prefix.push(idx);
                if element.name == tag {
                    out.push(NodePath(prefix.clone()));
                }
                element.collect_paths(tag, &mut prefix, &mut out);
                prefix.pop();
            }
        }
        out
    }

    /// First element with the given tag
    pub fn first(&self, tag: &str) -> Option<&Element> {
        self.find_all(tag).first().and_then(|path| self.get(path))
    }

    pub fn first_mut(&mut self, tag: &str) -> Option<&mut Element> {
        let path = self.find_all(tag).into_iter().next()?;
        self.get_mut(&path)
    }

    pub fn get(&self, path: &NodePath) -> Option<&Element> {
        let (first, rest) = path.0.split_first()?;
        let mut element = match self.nodes.get(*first) {
            Some(Node::Element(element)) => element,
            _ => return None,
        };
        for idx in rest {
            element = element.child_element(*idx)?;
        }
        Some(element)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        let (first, rest) = path.0.split_first()?;
        let mut element = match self.nodes.get_mut(*first) {
            Some(Node::Element(element)) => element,
            _ => return None,
        };
        for idx in rest {
            element = element.child_element_mut(*idx)?;
        }
        Some(element)
    }

    /// Detach the element at `path`
    ///
    /// Paths that come after the removed element in document order are invalidated,
    /// so callers removing several elements must go from last to first.
    pub fn remove(&mut self, path: &NodePath) -> Option<Element> {
        let (last, parent) = path.0.split_last()?;
        let siblings = if parent.is_empty() {
            &mut self.nodes
        } else {
            &mut self.get_mut(&NodePath(parent.to_vec()))?.children
        };
        if !matches!(siblings.get(*last), Some(Node::Element(_))) {
            return None;
        }

        // Drop the indentation that preceded the element along with it
        let removed = siblings.remove(*last);
        if *last > 0
            && siblings[*last - 1].is_whitespace()
            && siblings.get(*last).is_some_and(Node::is_whitespace)
        {
            siblings.remove(*last - 1);
        }

        match removed {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Serialize the document back to text
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }
        for node in &self.nodes {
            node.write_to(&mut out);
        }
        out
    }
}
