//! Top-level block scanner for single-file components.
//!
//! Only the block structure is recovered here (tags, attributes, content
//! ranges). Parsing the block contents belongs to the per-language services.

/// A top-level block such as `<template>` or `<style scoped>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock {
    /// Tag name, e.g. `template`.
    pub tag: String,
    /// Attributes in source order; valueless attributes map to `None`.
    pub attrs: Vec<(String, Option<String>)>,
    /// Value of the `lang` attribute.
    pub lang: Option<String>,
    /// Byte offset of the `<` that opens the block.
    pub loc_start: u32,
    /// Byte offset just past the closing tag.
    pub loc_end: u32,
    /// Byte offset where the content starts.
    pub start: u32,
    /// Byte offset where the content ends.
    pub end: u32,
    /// The block content.
    pub content: String,
}

impl SfcBlock {
    /// Returns `true` if the attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    /// Returns `true` if `offset` lies within the content (end inclusive).
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end
    }
}

/// The blocks of a single-file component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sfc {
    pub template: Option<SfcBlock>,
    pub script: Option<SfcBlock>,
    pub script_setup: Option<SfcBlock>,
    pub styles: Vec<SfcBlock>,
    pub custom_blocks: Vec<SfcBlock>,
}

impl Sfc {
    /// All blocks in source order.
    pub fn blocks(&self) -> Vec<&SfcBlock> {
        let mut blocks: Vec<&SfcBlock> = self
            .template
            .iter()
            .chain(self.script.iter())
            .chain(self.script_setup.iter())
            .chain(self.styles.iter())
            .chain(self.custom_blocks.iter())
            .collect();
        blocks.sort_by_key(|b| b.loc_start);
        blocks
    }

    /// The block whose content contains `offset`.
    pub fn block_at(&self, offset: u32) -> Option<&SfcBlock> {
        self.blocks().into_iter().find(|b| b.contains(offset))
    }
}

/// Scans the top-level blocks of a component file.
///
/// Malformed input never fails: an unterminated block extends to the end of
/// the file, and stray text between blocks is ignored.
pub fn parse_sfc(source: &str) -> Sfc {
    let mut sfc = Sfc::default();
    let bytes = source.as_bytes();
    let mut pos = 0usize;

    while let Some(rel) = source[pos..].find('<') {
        let open = pos + rel;

        if source[open..].starts_with("<!--") {
            pos = match source[open..].find("-->") {
                Some(end) => open + end + 3,
                None => break,
            };
            continue;
        }

        let name_start = open + 1;
        let name_len = source[name_start..]
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
            .count();
        if name_len == 0 {
            pos = name_start;
            continue;
        }
        let tag = &source[name_start..name_start + name_len];

        let Some(tag_close_rel) = find_tag_end(&bytes[name_start + name_len..]) else {
            break;
        };
        let tag_close = name_start + name_len + tag_close_rel;
        let self_closing = tag_close > 0 && bytes[tag_close - 1] == b'/';
        let attr_end = if self_closing { tag_close - 1 } else { tag_close };
        let attrs = parse_attrs(&source[name_start + name_len..attr_end]);
        let content_start = tag_close + 1;

        let (content_end, loc_end) = if self_closing {
            (content_start, content_start)
        } else {
            find_closing(source, tag, content_start)
        };

        let lang = attrs
            .iter()
            .find(|(n, _)| n == "lang")
            .and_then(|(_, v)| v.clone());
        let block = SfcBlock {
            tag: tag.to_string(),
            attrs,
            lang,
            loc_start: open as u32,
            loc_end: loc_end as u32,
            start: content_start as u32,
            end: content_end as u32,
            content: source[content_start..content_end].to_string(),
        };

        match block.tag.as_str() {
            "template" if sfc.template.is_none() => sfc.template = Some(block),
            "script" if block.has_attr("setup") => sfc.script_setup = Some(block),
            "script" => sfc.script = Some(block),
            "style" => sfc.styles.push(block),
            _ => sfc.custom_blocks.push(block),
        }

        pos = loc_end.max(open + 1);
    }

    sfc
}

/// Offset of the `>` ending a start tag, skipping quoted attribute values.
fn find_tag_end(bytes: &[u8]) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Finds the closing tag matching `tag`, honoring nested tags of the same name.
///
/// Returns `(content_end, loc_end)`.
fn find_closing(source: &str, tag: &str, from: usize) -> (usize, usize) {
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}");
    let raw_text = tag == "script" || tag == "style";
    let mut depth = 0usize;
    let mut pos = from;

    loop {
        let next_close = source[pos..].find(&close_pat).map(|i| pos + i);
        let next_open = if raw_text {
            None
        } else {
            source[pos..].find(&open_pat).map(|i| pos + i)
        };

        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c && is_tag_boundary(source, o + open_pat.len()) => {
                depth += 1;
                pos = o + open_pat.len();
            }
            (_, Some(c)) => {
                if depth == 0 {
                    let end = source[c..].find('>').map(|i| c + i + 1).unwrap_or(source.len());
                    return (c, end);
                }
                depth -= 1;
                pos = c + close_pat.len();
            }
            (_, None) => return (source.len(), source.len()),
        }
    }
}

fn is_tag_boundary(source: &str, at: usize) -> bool {
    source[at..]
        .chars()
        .next()
        .is_none_or(|c| c.is_whitespace() || c == '>' || c == '/')
}

fn parse_attrs(raw: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut rest = raw.trim_start();

    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..name_len].to_string();
        rest = rest[name_len..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remaining) = match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(q).unwrap_or(body.len());
                    (&body[..end], body.get(end + 1..).unwrap_or(""))
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            rest = remaining.trim_start();
            Some(value.to_string())
        } else {
            None
        };

        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    attrs
}
