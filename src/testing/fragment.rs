//! Fragment builder: persisted widget XML for tests.

use crate::document::{Document, DocumentError, ElementData, ElementId, DISPLAY_TAG, WIDGET_TAG};

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// A `<widget>` or `<display>` element under construction.
///
/// # Examples
///
/// ```
/// use display_model::testing::Fragment;
///
/// let xml = Fragment::widget("led")
///     .version("1.0")
///     .property("bit", "2")
///     .to_xml();
/// assert_eq!(xml, r#"<widget type="led" version="1.0"><bit>2</bit></widget>"#);
/// ```
#[derive(Debug, Clone)]
pub struct Fragment {
    data: ElementData,
    children: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Text { tag: String, text: String },
    Element(Fragment),
}

impl Fragment {
    /// A current-format widget fragment (`type` attribute).
    pub fn widget(type_id: &str) -> Self {
        Self::element(ElementData::new(WIDGET_TAG).with_attribute("type", type_id))
    }

    /// A legacy widget fragment (`typeId` attribute).
    pub fn legacy(type_id: &str) -> Self {
        Self::element(ElementData::new(WIDGET_TAG).with_attribute("typeId", type_id))
    }

    /// A display root.
    pub fn display() -> Self {
        Self::element(ElementData::new(DISPLAY_TAG))
    }

    /// Any element, for nested property values such as `<color>`.
    pub fn element(data: ElementData) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    /// Set the `version` attribute (builder).
    pub fn version(mut self, version: &str) -> Self {
        self.data.set_attribute("version", version);
        self
    }

    /// Set the `name` child (builder).
    pub fn name(self, name: &str) -> Self {
        self.property("name", name)
    }

    /// Append a `<tag>text</tag>` child (builder).
    pub fn property(mut self, tag: &str, text: &str) -> Self {
        self.children.push(Node::Text {
            tag: tag.to_string(),
            text: text.to_string(),
        });
        self
    }

    /// Append `<tag><color red=".." green=".." blue=".."/></tag>` (builder).
    pub fn color(self, tag: &str, red: u8, green: u8, blue: u8) -> Self {
        let color = ElementData::new("color")
            .with_attribute("red", red.to_string())
            .with_attribute("green", green.to_string())
            .with_attribute("blue", blue.to_string());
        self.child(Fragment::element(ElementData::new(tag)).child(Fragment::element(color)))
    }

    /// Append `<macros>` with the given entries (builder).
    pub fn macros(self, entries: &[(&str, &str)]) -> Self {
        let macros = entries.iter().fold(
            Fragment::element(ElementData::new("macros")),
            |macros, (name, value)| macros.property(name, value),
        );
        self.child(macros)
    }

    /// Append a nested element, widget or otherwise (builder).
    pub fn child(mut self, child: Fragment) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Build the element tree.
    pub fn into_document(self) -> (Document, ElementId) {
        let mut document = Document::new();
        let root = document.insert(self.data.clone());
        self.append_children(&mut document, root);
        (document, root)
    }

    fn append_children(self, document: &mut Document, parent: ElementId) {
        for child in self.children {
            match child {
                Node::Text { tag, text } => {
                    document.insert_child(parent, ElementData::new(tag).with_text(text));
                }
                Node::Element(fragment) => {
                    let element = document.insert_child(parent, fragment.data.clone());
                    fragment.append_children(document, element);
                }
            }
        }
    }

    /// Compact XML text.
    pub fn to_xml(&self) -> String {
        self.try_to_xml().unwrap_or_default()
    }

    fn try_to_xml(&self) -> Result<String, DocumentError> {
        let (document, root) = self.clone().into_document();
        document.to_xml(root, None)
    }
}
