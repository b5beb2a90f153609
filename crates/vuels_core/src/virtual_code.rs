//! Generated script code for component files.

use std::any::Any;
use std::sync::Arc;

use tracing::trace;
use vuels_language::lsp_types::Url;
use vuels_language::{CodeInformation, GeneratedCode, LanguagePlugin, Mapping, VirtualCode};

use crate::casing::component_name_from_path;
use crate::{Sfc, SfcBlock, VueCompilerOptions, parse_sfc};

/// Binding holding every component usable in the template.
pub const COMPONENTS_BINDING: &str = "__VLS_components";
/// Binding holding the template context (`this` of the template).
pub const CONTEXT_BINDING: &str = "__VLS_ctx";
/// Binding holding the intrinsic element types.
pub const ELEMENTS_BINDING: &str = "__VLS_elements";
/// Prefix of every generated identifier.
pub const INTERNAL_PREFIX: &str = "__VLS_";

const VIRTUAL_CODE_ID: &str = "script_ts";

const PRELUDE: &str = "\
declare const __VLS_ctx: __VLS_Context;
declare const __VLS_components: __VLS_Components;
declare const __VLS_elements: __VLS_IntrinsicElements;
";

/// Template-only ranges: they feed the type checker but are not reported on.
const TEMPLATE_TAG_INFO: CodeInformation = CodeInformation {
    verification: false,
    completion: true,
    semantic: true,
    navigation: true,
};

/// A tag name used in the template, with every offset it appears at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTag {
    pub name: String,
    /// Source offsets of the name in start and end tags, in source order.
    pub offsets: Vec<u32>,
}

impl TemplateTag {
    /// Returns `true` for tags resolved through the component table.
    pub fn is_component(&self) -> bool {
        is_component_tag(&self.name)
    }

    fn contains(&self, offset: u32) -> bool {
        let len = self.name.len() as u32;
        self.offsets.iter().any(|&o| offset >= o && offset <= o + len)
    }
}

/// A component file and the script code generated for it.
#[derive(Debug, Clone)]
pub struct VueVirtualCode {
    pub file_name: String,
    pub sfc: Sfc,
    pub template_tags: Vec<TemplateTag>,
    pub root: VirtualCode,
}

impl VueVirtualCode {
    /// Parses a component file and generates its script code.
    pub fn new(file_name: impl Into<String>, source: &str) -> Self {
        let file_name = file_name.into();
        let sfc = parse_sfc(source);
        let template_tags = sfc
            .template
            .as_ref()
            .map(collect_template_tags)
            .unwrap_or_default();
        let root = generate(&sfc, &template_tags);

        trace!(
            "Generated {} bytes of script code for {} ({} mappings)",
            root.snapshot.len(),
            file_name,
            root.mappings.len()
        );

        Self {
            file_name,
            sfc,
            template_tags,
            root,
        }
    }

    /// The template tag whose name covers `offset`.
    pub fn tag_at(&self, offset: u32) -> Option<&TemplateTag> {
        self.template_tags.iter().find(|t| t.contains(offset))
    }

    /// Name the component is known by in other templates.
    pub fn component_name(&self) -> String {
        component_name_from_path(&self.file_name)
    }
}

impl GeneratedCode for VueVirtualCode {
    fn root(&self) -> &VirtualCode {
        &self.root
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Produces [`VueVirtualCode`] for files with a component extension.
#[derive(Debug, Clone, Default)]
pub struct VueLanguagePlugin {
    options: VueCompilerOptions,
}

impl VueLanguagePlugin {
    pub fn new(options: VueCompilerOptions) -> Self {
        Self { options }
    }
}

impl LanguagePlugin for VueLanguagePlugin {
    fn language_id(&self, uri: &Url) -> Option<String> {
        self.options
            .is_component_file(uri.path())
            .then(|| "vue".to_string())
    }

    fn create_virtual_code(
        &self,
        uri: &Url,
        language_id: &str,
        snapshot: &Arc<str>,
    ) -> Option<Arc<dyn GeneratedCode>> {
        if language_id != "vue" {
            return None;
        }
        let file_name = match uri.to_file_path() {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(_) => uri.path().to_string(),
        };
        Some(Arc::new(VueVirtualCode::new(file_name, snapshot)))
    }
}

fn is_component_tag(name: &str) -> bool {
    if matches!(name, "template" | "slot" | "component") {
        return false;
    }
    name.contains('-') || name.starts_with(|c: char| c.is_ascii_uppercase())
}

fn collect_template_tags(template: &SfcBlock) -> Vec<TemplateTag> {
    let content = template.content.as_str();
    let mut tags: Vec<TemplateTag> = Vec::new();
    let mut pos = 0usize;

    while let Some(rel) = content[pos..].find('<') {
        let open = pos + rel;
        if content[open..].starts_with("<!--") {
            pos = content[open..]
                .find("-->")
                .map_or(content.len(), |end| open + end + 3);
            continue;
        }

        let name_start = if content[open + 1..].starts_with('/') {
            open + 2
        } else {
            open + 1
        };
        let name_len = content[name_start..]
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
            .count();
        pos = name_start + name_len;
        if name_len == 0 || !content.as_bytes()[name_start].is_ascii_alphabetic() {
            continue;
        }

        let name = &content[name_start..name_start + name_len];
        let offset = template.start + name_start as u32;
        match tags.iter_mut().find(|t| t.name == name) {
            Some(tag) => tag.offsets.push(offset),
            None => tags.push(TemplateTag {
                name: name.to_string(),
                offsets: vec![offset],
            }),
        }
    }

    tags
}

struct Generator {
    code: String,
    mappings: Vec<Mapping>,
}

impl Generator {
    fn push(&mut self, text: &str) {
        self.code.push_str(text);
    }

    fn push_mapped(&mut self, text: &str, source_offset: u32, data: CodeInformation) {
        self.mappings.push(
            Mapping::new(source_offset, self.code.len() as u32, text.len() as u32).with_data(data),
        );
        self.code.push_str(text);
    }
}

fn generate(sfc: &Sfc, template_tags: &[TemplateTag]) -> VirtualCode {
    let mut g = Generator {
        code: String::new(),
        mappings: Vec::new(),
    };

    for block in [&sfc.script, &sfc.script_setup].into_iter().flatten() {
        g.push_mapped(&block.content, block.start, CodeInformation::ALL);
        g.push("\n");
    }

    g.push(PRELUDE);

    if let Some(template) = &sfc.template {
        for tag in template_tags {
            let binding = if tag.is_component() {
                COMPONENTS_BINDING
            } else {
                ELEMENTS_BINDING
            };
            for &offset in &tag.offsets {
                g.push(binding);
                g.push("['");
                g.push_mapped(&tag.name, offset, TEMPLATE_TAG_INFO);
                g.push("'];\n");
            }
        }

        let content = template.content.as_str();
        let mut pos = 0usize;
        while let Some(rel) = content[pos..].find("{{") {
            let start = pos + rel + 2;
            let Some(len) = content[start..].find("}}") else {
                break;
            };
            g.push("(");
            g.push_mapped(
                &content[start..start + len],
                template.start + start as u32,
                CodeInformation::ALL,
            );
            g.push(");\n");
            pos = start + len + 2;
        }
    }

    VirtualCode::new(VIRTUAL_CODE_ID, "typescript", g.code, g.mappings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const APP: &str = r#"<script setup lang="ts">
import MyButton from './my-button.vue'
const count = 1
</script>

<template>
  <div>
    <my-button>{{ count }}</my-button>
    <!-- <Ignored /> -->
  </div>
</template>
"#;

    fn app() -> VueVirtualCode {
        VueVirtualCode::new("/work/src/App.vue", APP)
    }

    #[test]
    fn test_collects_tags_in_order() {
        let code = app();
        let names: Vec<&str> = code.template_tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["div", "my-button"]);
    }

    #[test]
    fn test_tag_offsets_cover_start_and_end_tags() {
        let code = app();
        let button = code.template_tags.iter().find(|t| t.name == "my-button").unwrap();
        assert_eq!(button.offsets.len(), 2);
        for &offset in &button.offsets {
            assert_eq!(&APP[offset as usize..offset as usize + 9], "my-button");
        }
        assert!(button.is_component());
    }

    #[test]
    fn test_tag_at() {
        let code = app();
        let offset = APP.find("<my-button>").unwrap() as u32 + 3;
        assert_eq!(code.tag_at(offset).map(|t| t.name.as_str()), Some("my-button"));
        let count = APP.find("const count").unwrap() as u32;
        assert!(code.tag_at(count).is_none());
    }

    #[test]
    fn test_script_setup_maps_back_to_source() {
        let code = app();
        let source = APP.find("const count").unwrap() as u32;
        let (generated, mapping) = code.root.to_generated_offsets(source).next().unwrap();
        assert!(mapping.data.verification);
        assert!(code.root.snapshot[generated as usize..].starts_with("const count"));
        assert_eq!(code.root.to_source_offset(generated).map(|(o, _)| o), Some(source));
    }

    #[test]
    fn test_component_tags_use_component_table() {
        let code = app();
        let snapshot = &code.root.snapshot;
        assert!(snapshot.contains("__VLS_components['my-button'];"));
        assert!(snapshot.contains("__VLS_elements['div'];"));
        assert!(snapshot.contains("( count );"));
        assert!(!snapshot.contains("Ignored"));
    }

    #[test]
    fn test_template_tags_are_not_verified() {
        let code = app();
        let offset = APP.find("<my-button>").unwrap() as u32 + 1;
        let (_, mapping) = code.root.to_generated_offsets(offset).next().unwrap();
        assert!(!mapping.data.verification);
        assert!(mapping.data.navigation);
    }

    #[test]
    fn test_component_name() {
        assert_eq!(app().component_name(), "App");
        assert_eq!(VueVirtualCode::new("/w/my-button.vue", "").component_name(), "MyButton");
    }

    #[test]
    fn test_language_plugin_claims_component_files() {
        let plugin = VueLanguagePlugin::default();
        let vue = Url::parse("file:///work/App.vue").unwrap();
        let ts = Url::parse("file:///work/main.ts").unwrap();
        assert_eq!(plugin.language_id(&vue).as_deref(), Some("vue"));
        assert!(plugin.language_id(&ts).is_none());

        let snapshot: Arc<str> = Arc::from(APP);
        let generated = plugin.create_virtual_code(&vue, "vue", &snapshot).unwrap();
        let code = generated.as_any().downcast_ref::<VueVirtualCode>().unwrap();
        assert_eq!(code.file_name, "/work/App.vue");
        assert!(plugin.create_virtual_code(&ts, "typescript", &snapshot).is_none());
    }
}
