//! Event-driven walk over `word/document.xml`.

use super::ExtractionError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Collect the text of each paragraph that is a direct child of `w:body`.
///
/// Runs contribute `w:t` text, `w:tab`/`w:ptab` as `\t`, line breaks (`w:br` without a page or
/// column type, `w:cr`) as `\n`, and `w:noBreakHyphen` as `-`. Paragraphs nested in tables or
/// text boxes are not body paragraphs and their text is skipped.
pub(super) fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut walker = BodyWalker::default();

    loop {
        match reader.read_event()? {
            Event::Start(element) => walker.open(&element),
            Event::Empty(element) => {
                walker.open(&element);
                walker.close();
            }
            Event::End(_) => walker.close(),
            Event::Text(text) => {
                if walker.in_text_run() {
                    let unescaped = text.unescape()?;
                    walker.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if walker.in_text_run() {
                    let raw = data.into_inner();
                    walker.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    walker.finish()
}

#[derive(Default)]
struct BodyWalker {
    /// Local names of the currently open elements.
    stack: Vec<Vec<u8>>,
    saw_body: bool,
    /// Stack depth at which the current body paragraph was opened.
    paragraph_depth: Option<usize>,
    current: String,
    paragraphs: Vec<String>,
}

impl BodyWalker {
    fn open(&mut self, element: &BytesStart<'_>) {
        let name = element.local_name().as_ref().to_vec();

        match name.as_slice() {
            b"body" => self.saw_body = true,
            b"p" if self.parent_is_body() => {
                self.paragraph_depth = Some(self.stack.len());
                self.current.clear();
            }
            b"tab" | b"ptab" if self.in_own_run() => self.current.push('\t'),
            b"cr" if self.in_own_run() => self.current.push('\n'),
            b"br" if self.in_own_run() && is_line_break(element) => self.current.push('\n'),
            b"noBreakHyphen" if self.in_own_run() => self.current.push('-'),
            _ => {}
        }

        self.stack.push(name);
    }

    fn close(&mut self) {
        self.stack.pop();
        if self.paragraph_depth == Some(self.stack.len()) {
            self.paragraph_depth = None;
            self.paragraphs.push(std::mem::take(&mut self.current));
        }
    }

    fn parent_is_body(&self) -> bool {
        self.stack.last().is_some_and(|name| name == b"body")
    }

    /// True while inside the current body paragraph and not inside a nested paragraph.
    fn in_own_paragraph(&self) -> bool {
        match self.paragraph_depth {
            Some(depth) => !self.stack[depth + 1..].iter().any(|name| name == b"p"),
            None => false,
        }
    }

    fn in_own_run(&self) -> bool {
        self.in_own_paragraph() && self.stack.last().is_some_and(|name| name == b"r")
    }

    fn in_text_run(&self) -> bool {
        self.in_own_paragraph() && self.stack.last().is_some_and(|name| name == b"t")
    }

    fn push_str(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn finish(self) -> Result<Vec<String>, ExtractionError> {
        if !self.stack.is_empty() {
            return Err(ExtractionError::Structure(format!(
                "document ended with {} unclosed element(s)",
                self.stack.len()
            )));
        }
        if !self.saw_body {
            return Err(ExtractionError::Structure(
                "document has no body element".into(),
            ));
        }
        Ok(self.paragraphs)
    }
}

/// `w:br` breaks lines unless typed as a page or column break.
fn is_line_break(element: &BytesStart<'_>) -> bool {
    !element.attributes().flatten().any(|attribute| {
        attribute.key.local_name().as_ref() == b"type"
            && matches!(attribute.value.as_ref(), b"page" | b"column")
    })
}
