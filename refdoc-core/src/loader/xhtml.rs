//! XHTML backend
//!
//! Builds a [`Tree`] from generator output using quick-xml's pull parser.
//! Accepts both XHTML and the HTML5 flavor: void elements such as
//! `<meta charset="utf-8">` need no end tag, attributes may be unquoted,
//! and `<script>`/`<style>` bodies are raw text. Tags, attributes and
//! character data are kept as written so an untouched tree serializes back
//! to its source.

use super::MarkupBackend;
use crate::document::{is_void_element, Element, NodeId, NodeKind, Tree};
use crate::error::LoadError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Default, Clone)]
pub struct XhtmlBackend;

impl XhtmlBackend {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupBackend for XhtmlBackend {
    fn parse(&self, text: &str) -> Result<Tree, LoadError> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(false);
        // End names are matched against `open` below; quick-xml's own check
        // would expect an end tag for every void element.
        reader.check_end_names(false);

        let mut tree = Tree::new();
        // Open elements, innermost last
        let mut open: Vec<(NodeId, String)> = Vec::new();

        loop {
            let parent = open.last().map(|(id, _)| *id).unwrap_or(tree.root());
            let event = reader
                .read_event()
                .map_err(|e| malformed(reader.buffer_position(), e))?;

            match event {
                Event::Start(start) => {
                    let element = element_from(&reader, &start, false)?;
                    let name = element.name.clone();
                    let void = element.is_void();
                    let id = tree.append(parent, NodeKind::Element(element));
                    if void {
                        continue;
                    }
                    if is_raw_text_element(&name) {
                        let end = start.to_end();
                        let body = reader
                            .read_text(end.name())
                            .map_err(|e| malformed(reader.buffer_position(), e))?;
                        if !body.is_empty() {
                            tree.append(id, NodeKind::Text(body.into_owned()));
                        }
                        continue;
                    }
                    open.push((id, name));
                }
                Event::Empty(start) => {
                    let element = element_from(&reader, &start, true)?;
                    tree.append(parent, NodeKind::Element(element));
                }
                Event::End(end) => {
                    let name = decode(&reader, end.name().as_ref())?;
                    if is_void_element(&name) {
                        // `<br></br>`: the void element is already closed,
                        // keep its end tag as written
                        tree.append(parent, NodeKind::Markup(format!("</{name}>")));
                        continue;
                    }
                    match open.pop() {
                        Some((_, expected)) if expected == name => {}
                        Some((_, expected)) => {
                            return Err(malformed(
                                reader.buffer_position(),
                                format!("expected </{expected}>, found </{name}>"),
                            ));
                        }
                        None => {
                            return Err(malformed(
                                reader.buffer_position(),
                                format!("unexpected </{name}>"),
                            ));
                        }
                    }
                }
                Event::Text(text) => {
                    let text = decode(&reader, &text)?;
                    tree.append(parent, NodeKind::Text(text));
                }
                Event::CData(data) => {
                    let data = decode(&reader, &data)?;
                    tree.append(parent, NodeKind::Markup(format!("<![CDATA[{data}]]>")));
                }
                Event::Comment(comment) => {
                    let comment = decode(&reader, &comment)?;
                    tree.append(parent, NodeKind::Markup(format!("<!--{comment}-->")));
                }
                Event::Decl(decl) => {
                    let decl = decode(&reader, &decl)?;
                    tree.append(parent, NodeKind::Markup(format!("<?{decl}?>")));
                }
                Event::PI(pi) => {
                    let pi = decode(&reader, &pi)?;
                    tree.append(parent, NodeKind::Markup(format!("<?{pi}?>")));
                }
                Event::DocType(doctype) => {
                    let doctype = decode(&reader, &doctype)?;
                    tree.append(parent, NodeKind::Markup(format!("<!DOCTYPE {doctype}>")));
                }
                Event::Eof => break,
            }
        }

        if let Some((_, name)) = open.pop() {
            return Err(malformed(
                reader.buffer_position(),
                format!("unclosed element <{name}>"),
            ));
        }

        Ok(tree)
    }

    fn name(&self) -> &str {
        "quick-xml"
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

fn element_from(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    self_closing: bool,
) -> Result<Element, LoadError> {
    let raw: &[u8] = start;
    let name_len = start.name().as_ref().len();
    let name = decode(reader, &raw[..name_len])?;
    let raw_attributes = decode(reader, &raw[name_len..])?;

    let mut classes = Vec::new();
    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| malformed(reader.buffer_position(), e))?;
        if attr.key.as_ref() == b"class" {
            let value = decode(reader, &attr.value)?;
            classes.extend(value.split_whitespace().map(str::to_string));
        }
    }

    Ok(Element {
        name,
        raw_attributes,
        classes,
        self_closing,
    })
}

fn is_raw_text_element(name: &str) -> bool {
    name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style")
}

fn decode(reader: &Reader<&[u8]>, bytes: &[u8]) -> Result<String, LoadError> {
    reader
        .decoder()
        .decode(bytes)
        .map(|text| text.into_owned())
        .map_err(|e| malformed(reader.buffer_position(), e))
}

fn malformed(position: usize, message: impl ToString) -> LoadError {
    LoadError::MalformedMarkup {
        position,
        message: message.to_string(),
    }
}
