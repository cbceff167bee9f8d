use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::Cursor;

use crate::core::CfdiError;

fn xml_io(e: std::io::Error) -> CfdiError {
    CfdiError::Xml(format!("XML write error: {e}"))
}

/// Indented XML writer over an in-memory buffer.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, CfdiError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, CfdiError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| CfdiError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element<'a>(
        &mut self,
        name: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<&mut Self, CfdiError> {
        let elem = element(name, attrs);
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// Write a childless element as `<name .../>`.
    pub fn empty_element<'a>(
        &mut self,
        name: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<&mut Self, CfdiError> {
        let elem = element(name, attrs);
        self.writer
            .write_event(Event::Empty(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, CfdiError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }
}

fn element<'a>(
    name: &str,
    attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> BytesStart<'static> {
    let mut elem = BytesStart::new(name.to_string());
    for (k, v) in attrs {
        elem.push_attribute((k, v));
    }
    elem
}
