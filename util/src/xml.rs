use std::io::Write;

pub use quick_xml::{events, Error, Result, Writer};

use events::{BytesDecl, BytesStart, BytesText, Event};

/// Streaming element writer that remembers which elements are still open,
/// so callers only ever name an element once.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    open: Vec<BytesStart<'static>>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            open: Vec::new(),
        }
    }

    pub fn with_indent(inner: W, indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', indent),
            open: Vec::new(),
        }
    }

    pub fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new(b"1.0", Some(b"utf-8"), None)))?;
        Ok(())
    }

    pub fn start<I, K, V>(&mut self, name: &str, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let start = element(name, attributes);
        self.writer.write_event(Event::Start(start.to_borrowed()))?;
        self.open.push(start);
        Ok(())
    }

    pub fn empty<I, K, V>(&mut self, name: &str, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.writer
            .write_event(Event::Empty(element(name, attributes)))?;
        Ok(())
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::from_plain_str(text)))?;
        Ok(())
    }

    pub fn end(&mut self) -> Result<()> {
        let start = self.open.pop().ok_or_else(|| {
            Error::UnexpectedToken("end of element with no element open".to_owned())
        })?;

        self.writer.write_event(Event::End(start.to_end()))?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

fn element<I, K, V>(name: &str, attributes: I) -> BytesStart<'static>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut start = BytesStart::owned_name(name);
    for (key, value) in attributes {
        start.push_attribute((key.as_ref(), value.as_ref()));
    }

    start
}

/// Attribute list for elements that carry none.
pub const NO_ATTRIBUTES: [(&str, &str); 0] = [];
