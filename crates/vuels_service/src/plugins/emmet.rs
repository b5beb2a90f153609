//! Abbreviation expansion (`ul>li.item*3`) in HTML and component templates.

use async_trait::async_trait;
use vuels_language::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, CompletionTextEdit, InsertTextFormat,
    Position, Range, TextEdit,
};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::{HTML_ELEMENTS, TagContext, html_tag_context, is_tag_char, template_at};

pub const NAME: &str = "emmet";

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(EmmetFeatures)
    })
}

struct EmmetFeatures;

#[derive(Debug, Default, PartialEq, Eq)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    count: usize,
    children: Vec<Element>,
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl Parser<'_> {
    fn name(&mut self) -> String {
        let mut name = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !(is_tag_char(ch) || ch == '$') {
                break;
            }
            name.push(ch);
            self.chars.next();
        }
        name
    }

    fn siblings(&mut self) -> Option<Vec<Element>> {
        let mut elements = vec![self.element()?];
        while self.chars.next_if_eq(&'+').is_some() {
            elements.push(self.element()?);
        }
        Some(elements)
    }

    fn element(&mut self) -> Option<Element> {
        let mut element = Element {
            tag: self.name(),
            count: 1,
            ..Default::default()
        };
        loop {
            match self.chars.peek() {
                Some('.') => {
                    self.chars.next();
                    element.classes.push(self.name());
                }
                Some('#') => {
                    self.chars.next();
                    element.id = Some(self.name());
                }
                _ => break,
            }
        }
        if element.tag.is_empty() {
            if element.classes.is_empty() && element.id.is_none() {
                return None;
            }
            element.tag = "div".to_string();
        }
        if element.classes.iter().any(String::is_empty) || element.id.as_deref() == Some("") {
            return None;
        }
        if self.chars.next_if_eq(&'*').is_some() {
            let digits: String = std::iter::from_fn(|| self.chars.next_if(char::is_ascii_digit))
                .collect();
            element.count = digits.parse().ok().filter(|n| *n > 0)?;
        }
        if self.chars.next_if_eq(&'>').is_some() {
            element.children = self.siblings()?;
        }
        Some(element)
    }
}

fn parse(abbreviation: &str) -> Option<Vec<Element>> {
    let mut parser = Parser {
        chars: abbreviation.chars().peekable(),
    };
    let elements = parser.siblings()?;
    parser.chars.next().is_none().then_some(elements)
}

fn render(elements: &[Element], depth: usize, stop: &mut usize, lines: &mut Vec<String>) {
    let indent = "\t".repeat(depth);
    for element in elements {
        for index in 1..=element.count {
            let numbered = |s: &str| s.replace('$', &index.to_string());
            let mut open = format!("<{}", element.tag);
            if let Some(id) = &element.id {
                open.push_str(&format!(" id=\"{}\"", numbered(id)));
            }
            if !element.classes.is_empty() {
                let classes: Vec<String> = element.classes.iter().map(|c| numbered(c)).collect();
                open.push_str(&format!(" class=\"{}\"", classes.join(" ")));
            }
            open.push('>');

            if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                lines.push(format!("{indent}{open}"));
            } else if element.children.is_empty() {
                *stop += 1;
                lines.push(format!("{indent}{open}${{{stop}}}</{}>", element.tag));
            } else {
                lines.push(format!("{indent}{open}"));
                render(&element.children, depth + 1, stop, lines);
                lines.push(format!("{indent}</{}>", element.tag));
            }
        }
    }
}

/// Expands `abbreviation` into a snippet, or `None` if it is not one.
pub fn expand(abbreviation: &str) -> Option<String> {
    let elements = parse(abbreviation)?;
    let mut lines = Vec::new();
    render(&elements, 0, &mut 0, &mut lines);
    Some(lines.join("\n"))
}

/// The abbreviation typed right before `offset`, with its start.
fn abbreviation_at(text: &str, block_start: usize, offset: usize) -> Option<(usize, &str)> {
    let before = &text[block_start..offset];
    if before.rfind("{{").map(|i| i + 2) > before.rfind("}}").map(|i| i + 2) {
        return None;
    }
    let mut start = before
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + 1);
    let token = &before[start..];
    if let Some(lt) = token.rfind('<') {
        start += lt + token[lt..].find('>')? + 1;
    }
    let abbreviation = &before[start..];
    let first = abbreviation.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '.' || first == '#') {
        return None;
    }
    let has_operator = abbreviation.contains(['.', '#', '>', '+', '*']);
    if !has_operator && !HTML_ELEMENTS.contains(&abbreviation) {
        return None;
    }
    Some((block_start + start, abbreviation))
}

#[async_trait]
impl PluginFeatures for EmmetFeatures {
    async fn provide_completion_items(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<CompletionList>> {
        let (block_start, offset) = match document.language_id.as_str() {
            "html" => (0, document.offset_at(position)),
            _ => match template_at(document, position) {
                Some((template, offset)) if template.lang.is_none() => {
                    (template.start as usize, offset)
                }
                _ => return Ok(None),
            },
        };
        let text = &document.text;
        if html_tag_context(text, block_start, offset) != TagContext::Content {
            return Ok(None);
        }
        let Some((start, abbreviation)) = abbreviation_at(text, block_start, offset) else {
            return Ok(None);
        };
        let (Some(snippet), Some(start)) = (expand(abbreviation), document.position_at(start))
        else {
            return Ok(None);
        };

        let item = CompletionItem {
            label: abbreviation.to_string(),
            kind: Some(CompletionItemKind::SNIPPET),
            detail: Some("Emmet Abbreviation".to_string()),
            insert_text_format: Some(InsertTextFormat::SNIPPET),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range: Range::new(start, position),
                new_text: snippet,
            })),
            ..Default::default()
        };
        Ok(Some(CompletionList {
            is_incomplete: true,
            items: vec![item],
        }))
    }
}
