/*!
 * XLIFF view over the element tree: translation units and the locale document.
 */

use crate::errors::DocumentError;

use super::document::{Element, NodePath, XmlDocument};

pub const TRANS_UNIT: &str = "trans-unit";
const SOURCE: &str = "source";
const TARGET: &str = "target";
const BODY: &str = "body";
const FILE: &str = "file";
const STATE: &str = "state";
const XML_LANG: &str = "xml:lang";
const TRANSLATED: &str = "translated";

/// Translation state of a unit's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetState {
    #[default]
    Untranslated,
    Translated,
}

impl TargetState {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some(TRANSLATED) => Self::Translated,
            _ => Self::Untranslated,
        }
    }
}

/// One translatable string and its rendering in the locale file
///
/// This is an owned snapshot; changes reach the document through
/// [`XliffDocument::apply_unit`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationUnit {
    /// Position among the document's units
    pub index: usize,
    pub id: String,
    /// Inner markup of `<source>`
    pub source_text: String,
    /// Inner markup of `<target>`, empty when absent
    pub target_text: String,
    pub target_state: TargetState,
    /// `state` marker carried by `<source>`, honoured by strict state checks
    pub source_state: TargetState,
    /// `xml:lang` of `<target>`
    pub target_language: Option<String>,
}

impl TranslationUnit {
    /// Build a unit with just an id and source text
    pub fn new(id: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_text: source_text.into(),
            ..Default::default()
        }
    }

    fn from_element(index: usize, element: &Element) -> Self {
        let source = element.child(SOURCE);
        let target = element.child(TARGET);
        Self {
            index,
            id: element.attr("id").unwrap_or_default().to_string(),
            source_text: source.map(Element::inner_markup).unwrap_or_default(),
            target_text: target.map(Element::inner_markup).unwrap_or_default(),
            target_state: TargetState::from_attr(target.and_then(|t| t.attr(STATE))),
            source_state: TargetState::from_attr(source.and_then(|s| s.attr(STATE))),
            target_language: target.and_then(|t| t.attr(XML_LANG)).map(str::to_string),
        }
    }

    /// Mark the unit as translated into `locale`
    pub fn set_translated(&mut self, text: String, locale: &str) {
        self.target_text = text;
        self.target_state = TargetState::Translated;
        self.target_language = Some(locale.to_string());
    }
}

/// A parsed XLIFF file: the set of translation units plus file level metadata
#[derive(Debug, Clone)]
pub struct XliffDocument {
    xml: XmlDocument,
    unit_paths: Vec<NodePath>,
}

impl XliffDocument {
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let xml = XmlDocument::parse(content)?;
        let unit_paths = xml.find_all(TRANS_UNIT);
        Ok(Self { xml, unit_paths })
    }

    pub fn len(&self) -> usize {
        self.unit_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unit_paths.is_empty()
    }

    /// Unit ids in document order
    pub fn unit_ids(&self) -> Vec<String> {
        self.unit_elements()
            .map(|element| element.attr("id").unwrap_or_default().to_string())
            .collect()
    }

    /// Snapshots of every unit in document order
    pub fn units(&self) -> Vec<TranslationUnit> {
        self.unit_elements()
            .enumerate()
            .map(|(index, element)| TranslationUnit::from_element(index, element))
            .collect()
    }

    /// First unit element carrying `id`
    pub fn unit_element(&self, id: &str) -> Option<&Element> {
        self.unit_elements().find(|element| element.attr("id") == Some(id))
    }

    /// `target-language` of the `<file>` element
    pub fn target_language(&self) -> Option<&str> {
        self.xml.first(FILE).and_then(|file| file.attr("target-language"))
    }

    pub fn set_target_language(&mut self, locale: &str) -> Result<(), DocumentError> {
        let file = self
            .xml
            .first_mut(FILE)
            .ok_or_else(|| DocumentError::MissingElement(FILE.to_string()))?;
        file.set_attr("target-language", locale);
        Ok(())
    }

    /// Remove units by position, leaving the others in place
    pub fn remove_units(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for idx in sorted.into_iter().rev() {
            if let Some(path) = self.unit_paths.get(idx) {
                self.xml.remove(path);
            }
        }
        self.refresh();
    }

    /// Append copies of canonical units as fresh, untranslated units
    pub fn append_fresh_units<'a>(
        &mut self,
        units: impl IntoIterator<Item = &'a Element>,
    ) -> Result<usize, DocumentError> {
        let mut appended = 0;
        for unit in units {
            let body = self
                .xml
                .first_mut(BODY)
                .ok_or_else(|| DocumentError::MissingElement(BODY.to_string()))?;
            body.append_element(fresh_copy(unit));
            appended += 1;
        }
        if appended > 0 {
            self.refresh();
        }
        Ok(appended)
    }

    /// Write a unit snapshot's target back into the document
    ///
    /// Returns whether the document changed.
    pub fn apply_unit(&mut self, unit: &TranslationUnit) -> Result<bool, DocumentError> {
        let element = self
            .unit_paths
            .get(unit.index)
            .and_then(|path| self.xml.get_mut(path))
            .ok_or_else(|| DocumentError::MissingElement(format!("{}#{}", TRANS_UNIT, unit.id)))?;

        let current = TranslationUnit::from_element(unit.index, element);
        if current.target_text == unit.target_text
            && current.target_state == unit.target_state
            && current.target_language == unit.target_language
        {
            return Ok(false);
        }

        if element.child(TARGET).is_none() {
            element.insert_after(SOURCE, Element::new(TARGET));
        }
        let Some(target) = element.child_mut(TARGET) else {
            return Err(DocumentError::MissingElement(TARGET.to_string()));
        };

        if let Some(lang) = &unit.target_language {
            target.set_attr(XML_LANG, lang);
        }
        if unit.target_state == TargetState::Translated {
            target.set_attr(STATE, TRANSLATED);
        }
        target.set_inner_markup(&unit.target_text);
        Ok(true)
    }

    pub fn to_xml_string(&self) -> String {
        self.xml.to_xml_string()
    }

    fn unit_elements(&self) -> impl Iterator<Item = &Element> {
        self.unit_paths.iter().filter_map(|path| self.xml.get(path))
    }

    fn refresh(&mut self) {
        self.unit_paths = self.xml.find_all(TRANS_UNIT);
    }
}

/// Copy of a canonical unit with an empty, untranslated target
fn fresh_copy(unit: &Element) -> Element {
    let mut copy = unit.clone();
    if let Some(target) = copy.child_mut(TARGET) {
        target.set_inner_markup("");
        target.remove_attr(STATE);
        target.remove_attr(XML_LANG);
    }
    copy
}
