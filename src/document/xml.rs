//! XML text <-> [`Document`] conversion over quick-xml.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::node::{ElementData, ElementId};
use super::tree::Document;
use super::DocumentError;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

impl Document {
    /// Parse XML text into a document. Text content is kept exactly,
    /// except whitespace-only text in elements that also hold elements,
    /// which is indentation. Comments, processing instructions and the
    /// declaration are ignored.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(text);

        let mut doc = Document::new();
        let mut stack: Vec<ElementId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let data = element_data(&start)?;
                    let id = doc.open(stack.last().copied(), data)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    let data = element_data(&start)?;
                    doc.open(stack.last().copied(), data)?;
                }
                Event::End(_) => {
                    if let Some(id) = stack.pop() {
                        doc.drop_layout_text(id);
                    }
                }
                Event::Text(text) => {
                    let content = text.unescape()?;
                    doc.append_text(stack.last().copied(), &content);
                }
                Event::CData(data) => {
                    let content = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    doc.append_text(stack.last().copied(), &content);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            return Err(DocumentError::Unclosed(doc.tag(open).to_string()));
        }
        if doc.root().is_none() {
            return Err(DocumentError::MissingRoot);
        }
        Ok(doc)
    }

    fn open(
        &mut self,
        parent: Option<ElementId>,
        data: ElementData,
    ) -> Result<ElementId, DocumentError> {
        match parent {
            Some(parent) => Ok(self.insert_child(parent, data)),
            None if self.root().is_some() => Err(DocumentError::MultipleRoots(data.tag)),
            None => Ok(self.insert(data)),
        }
    }

    fn drop_layout_text(&mut self, id: ElementId) {
        if self.children(id).is_empty() {
            return;
        }
        if let Some(data) = self.get_mut(id) {
            if data.text.trim().is_empty() {
                data.text.clear();
            }
        }
    }

    fn append_text(&mut self, target: Option<ElementId>, content: &str) {
        if let Some(data) = target.and_then(|id| self.get_mut(id)) {
            data.text.push_str(content);
        }
    }
}

fn element_data(start: &BytesStart<'_>) -> Result<ElementData, DocumentError> {
    let mut data = ElementData::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        data.attributes.push((key, value));
    }
    Ok(data)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

impl Document {
    /// Serialize the subtree at `id`. With `indent` set, nested elements go on
    /// their own lines indented by that many spaces per level.
    pub fn to_xml(&self, id: ElementId, indent: Option<usize>) -> Result<String, DocumentError> {
        let mut writer = match indent {
            Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
            None => Writer::new(Vec::new()),
        };
        self.write_element(&mut writer, id)?;
        String::from_utf8(writer.into_inner()).map_err(|e| DocumentError::Encoding(e.to_string()))
    }

    fn write_element<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        id: ElementId,
    ) -> Result<(), DocumentError> {
        let Some(data) = self.get(id) else {
            return Ok(());
        };

        let mut start = BytesStart::new(data.tag.as_str());
        for (key, value) in &data.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let kids = self.children(id);
        if kids.is_empty() && data.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if !data.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&data.text)))?;
        }
        for &child in kids {
            self.write_element(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(data.tag.as_str())))?;
        Ok(())
    }
}
