//! Component and attribute name casing.

use std::path::Path;

/// `my-component` -> `myComponent`
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    if upper_next {
        out.push('-');
    }
    out
}

/// `myComponent` -> `MyComponent`
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `MyComponent` -> `my-component`
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_is_word = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_is_word {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
        prev_is_word = ch.is_alphanumeric() || ch == '_';
    }
    out
}

/// Name a component is known by, derived from its file: `my-button.vue` -> `MyButton`.
pub fn component_name_from_path(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    capitalize(&camelize(stem))
}

/// Spellings under which a template tag may be registered.
pub fn tag_name_variants(tag: &str) -> [String; 3] {
    let camel = camelize(tag);
    let pascal = capitalize(&camel);
    [tag.to_string(), camel, pascal]
}
