//! Document writer.

use std::io::Write;

use crate::q3d::ExportError;

/// XML declaration emitted as the first line of every document.
pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Indentation-tracking writer of tagged nodes.
///
/// Every call emits exactly one line, indented with one tab per open node.
/// Attribute values are written as given.
#[derive(Debug)]
pub struct DocumentWriter<W> {
    /// Output sink.
    sink: W,
    /// Tags of the currently open nodes.
    open: Vec<&'static str>,
}

impl<W: Write> DocumentWriter<W> {
    /// Creates a new `DocumentWriter`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            open: Vec::new(),
        }
    }

    /// Returns the current indentation depth.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Writes a line at the current depth.
    pub fn write_raw(&mut self, text: &str) -> Result<(), ExportError> {
        for _ in 0..self.depth() {
            self.sink.write_all(b"\t")?;
        }
        self.sink.write_all(text.as_bytes())?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    /// Writes an opening tag, and increases the depth if the node is not self-closing.
    pub fn open_node(
        &mut self,
        tag: &'static str,
        attributes: &[(&str, String)],
        self_closing: bool,
    ) -> Result<(), ExportError> {
        let mut line = String::with_capacity(tag.len() + 2);
        line.push('<');
        line.push_str(tag);
        for (key, value) in attributes {
            line.push(' ');
            line.push_str(key);
            line.push_str("=\"");
            line.push_str(value);
            line.push('"');
        }
        line.push_str(if self_closing { "/>" } else { ">" });
        self.write_raw(&line)?;

        if !self_closing {
            self.open.push(tag);
        }
        Ok(())
    }

    /// Writes a self-closing node.
    pub fn leaf(&mut self, tag: &'static str, attributes: &[(&str, String)]) -> Result<(), ExportError> {
        self.open_node(tag, attributes, true)
    }

    /// Decreases the depth and writes the closing tag.
    pub fn close_node(&mut self, tag: &'static str) -> Result<(), ExportError> {
        match self.open.pop() {
            Some(open) if open == tag => {}
            found => {
                return Err(ExportError::UnbalancedClose {
                    tag,
                    open: found,
                })
            }
        }
        self.write_raw(&format!("</{}>", tag))
    }

    /// Flushes the sink and returns it.
    ///
    /// Fails if any node is still open.
    pub fn finish(mut self) -> Result<W, ExportError> {
        if !self.open.is_empty() {
            return Err(ExportError::UnclosedNodes {
                open: self.open.iter().map(|tag| (*tag).to_owned()).collect(),
            });
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}
