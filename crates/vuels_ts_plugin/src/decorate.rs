//! Component-aware extension of the scripting language service.
//!
//! [`decorate_language_service_for_vue`] swaps the service held by a
//! [`SharedLanguageService`] slot for a [`VueLanguageService`] wrapping it.
//! Holders of the slot keep their handle; only the answers change.
//!
//! Inside the engine's host process (`is_ts_plugin`) callers speak component
//! source coordinates, so the wrapper translates positions into generated
//! code and spans back out. Embedded callers already speak generated
//! coordinates.

use std::sync::Arc;

use tracing::{debug, trace};
use vuels_core::{INTERNAL_PREFIX, TemplateTag, VueCompilerOptions, VueVirtualCode};
use vuels_language::{CodeInformation, FileIdMapper, LanguageRegistry};
use vuels_typescript::{
    CompletionInfo, DefinitionInfo, PropertyAccess, QuickInfo, ReferenceEntry, ResolvedType,
    ScriptDiagnostic, ScriptEngine, ScriptLanguageService, SharedLanguageService, TextSpan,
    TypeSegment,
};

use crate::component::{generated_ranges, resolve_component};

/// Decoration tag; a slot is decorated for components at most once.
pub const DECORATION_TAG: &str = "vue";

/// Extends the service in `language_service` with component semantics.
///
/// The registry must support the scripting engine. Returns `false` if the
/// slot was already decorated.
pub fn decorate_language_service_for_vue(
    language: &Arc<LanguageRegistry>,
    language_service: &SharedLanguageService,
    vue_options: &VueCompilerOptions,
    typescript: &Arc<dyn ScriptEngine>,
    is_ts_plugin: bool,
    get_file_id: &FileIdMapper,
) -> bool {
    let decorated = language_service.decorate(DECORATION_TAG, |inner| {
        Arc::new(VueLanguageService {
            inner,
            language: language.clone(),
            vue_options: vue_options.clone(),
            is_ts_plugin,
            get_file_id: get_file_id.clone(),
        })
    });
    if decorated {
        debug!(
            "Decorated {} language service for component files (host process: {})",
            typescript.name(),
            is_ts_plugin
        );
    }
    decorated
}

/// A language service that also understands component files.
pub struct VueLanguageService {
    inner: Arc<dyn ScriptLanguageService>,
    language: Arc<LanguageRegistry>,
    vue_options: VueCompilerOptions,
    is_ts_plugin: bool,
    get_file_id: FileIdMapper,
}

impl VueLanguageService {
    /// Runs `f` if `file_name` is a registered component file.
    fn component<R>(&self, file_name: &str, f: impl FnOnce(&VueVirtualCode) -> R) -> Option<R> {
        if !self.vue_options.is_component_file(file_name) {
            return None;
        }
        let uri = (self.get_file_id)(file_name).ok()?;
        let script = self.language.get(&uri)?;
        let code = script.generated_as::<VueVirtualCode>()?;
        Some(f(code))
    }

    /// Offsets to ask the inner service at for a caller position.
    fn inner_positions(
        &self,
        code: &VueVirtualCode,
        position: u32,
        filter: impl Fn(&CodeInformation) -> bool,
    ) -> Vec<u32> {
        if !self.is_ts_plugin {
            return vec![position];
        }
        code.root
            .to_generated_offsets(position)
            .filter(|(_, mapping)| filter(&mapping.data))
            .map(|(offset, _)| offset)
            .collect()
    }

    /// Converts a generated span to the caller's coordinates.
    fn caller_span(
        &self,
        code: &VueVirtualCode,
        span: TextSpan,
        filter: impl Fn(&CodeInformation) -> bool,
    ) -> Option<TextSpan> {
        let (start, length, data) = code.root.to_source_span(span.start, span.length)?;
        if !filter(&data) {
            return None;
        }
        Some(if self.is_ts_plugin {
            TextSpan::new(start, length)
        } else {
            span
        })
    }

    /// Start of a component file in the caller's coordinates.
    fn file_start(&self, code: &VueVirtualCode) -> TextSpan {
        if self.is_ts_plugin {
            return TextSpan::default();
        }
        code.root
            .mappings
            .iter()
            .min_by_key(|m| m.source_offset)
            .map_or(TextSpan::default(), |m| TextSpan::new(m.generated_offset, 0))
    }

    /// Where a navigation target should point, or `None` to drop it.
    ///
    /// Targets in generated-only code of another component file point at
    /// that file's start instead.
    fn navigation_target(
        &self,
        from_file: &str,
        file_name: &str,
        span: TextSpan,
    ) -> Option<TextSpan> {
        self.component(file_name, |code| match self.caller_span(code, span, |d| d.navigation) {
            Some(span) => Some(span),
            None if file_name != from_file => Some(self.file_start(code)),
            None => None,
        })
        .unwrap_or(Some(span))
    }

    fn component_quick_info(
        &self,
        file_name: &str,
        code: &VueVirtualCode,
        tag: &TemplateTag,
        source: u32,
    ) -> Option<QuickInfo> {
        let (name, ty) = resolve_component(self.inner.as_ref(), file_name, &tag.name)?;
        let len = tag.name.len() as u32;
        let occurrence = tag
            .offsets
            .iter()
            .copied()
            .find(|&o| source >= o && source <= o + len)?;
        let span = if self.is_ts_plugin {
            TextSpan::new(occurrence, len)
        } else {
            let (generated, _) = code.root.to_generated_offsets(occurrence).next()?;
            TextSpan::new(generated, len)
        };
        Some(QuickInfo {
            kind: "component".to_string(),
            display: name,
            documentation: ty.display,
            span,
        })
    }
}

impl ScriptLanguageService for VueLanguageService {
    fn quick_info_at_position(&self, file_name: &str, position: u32) -> Option<QuickInfo> {
        let handled = self.component(file_name, |code| {
            trace!("Component quick info at {}:{}", file_name, position);
            let source = if self.is_ts_plugin {
                Some(position)
            } else {
                code.root.to_source_offset(position).map(|(offset, _)| offset)
            };
            if let Some(source) = source
                && let Some(tag) = code.tag_at(source)
                && tag.is_component()
                && let Some(info) = self.component_quick_info(file_name, code, tag, source)
            {
                return Some(info);
            }

            self.inner_positions(code, position, |d| d.semantic)
                .into_iter()
                .find_map(|offset| {
                    let mut info = self.inner.quick_info_at_position(file_name, offset)?;
                    if self.is_ts_plugin {
                        info.span = self
                            .caller_span(code, info.span, |_| true)
                            .unwrap_or(TextSpan::new(position, 0));
                    }
                    Some(info)
                })
        });
        match handled {
            Some(info) => info,
            None => self.inner.quick_info_at_position(file_name, position),
        }
    }

    fn completions_at_position(&self, file_name: &str, position: u32) -> Option<CompletionInfo> {
        let handled = self.component(file_name, |code| {
            trace!("Component completion at {}:{}", file_name, position);
            self.inner_positions(code, position, |d| d.completion)
                .into_iter()
                .find_map(|offset| self.inner.completions_at_position(file_name, offset))
        });
        let mut info = match handled {
            Some(info) => info,
            None => self.inner.completions_at_position(file_name, position),
        }?;
        info.entries
            .retain(|entry| !entry.name.starts_with(INTERNAL_PREFIX));
        Some(info)
    }

    fn definition_at_position(&self, file_name: &str, position: u32) -> Vec<DefinitionInfo> {
        let definitions = self
            .component(file_name, |code| {
                trace!("Component definition at {}:{}", file_name, position);
                self.inner_positions(code, position, |d| d.navigation)
                    .into_iter()
                    .flat_map(|offset| self.inner.definition_at_position(file_name, offset))
                    .collect()
            })
            .unwrap_or_else(|| self.inner.definition_at_position(file_name, position));

        let mut result: Vec<DefinitionInfo> = Vec::with_capacity(definitions.len());
        for mut definition in definitions {
            let target = self.navigation_target(file_name, &definition.file_name, definition.span);
            let Some(span) = target else {
                continue;
            };
            definition.span = span;
            if !result
                .iter()
                .any(|d| d.file_name == definition.file_name && d.span == definition.span)
            {
                result.push(definition);
            }
        }
        result
    }

    fn references(&self, file_name: &str, position: u32) -> Vec<ReferenceEntry> {
        let references = self
            .component(file_name, |code| {
                trace!("Component references at {}:{}", file_name, position);
                self.inner_positions(code, position, |d| d.navigation)
                    .into_iter()
                    .flat_map(|offset| self.inner.references(file_name, offset))
                    .collect()
            })
            .unwrap_or_else(|| self.inner.references(file_name, position));

        let mut result: Vec<ReferenceEntry> = Vec::with_capacity(references.len());
        for mut reference in references {
            let target = self.navigation_target(file_name, &reference.file_name, reference.span);
            let Some(span) = target else {
                continue;
            };
            reference.span = span;
            if !result
                .iter()
                .any(|r| r.file_name == reference.file_name && r.span == reference.span)
            {
                result.push(reference);
            }
        }
        result
    }

    fn semantic_diagnostics(&self, file_name: &str) -> Vec<ScriptDiagnostic> {
        let diagnostics = self.inner.semantic_diagnostics(file_name);
        self.component(file_name, |code| {
            trace!("Component diagnostics for {}", file_name);
            diagnostics
                .iter()
                .filter_map(|diagnostic| {
                    let span = self.caller_span(code, diagnostic.span, |d| d.verification)?;
                    Some(ScriptDiagnostic {
                        span,
                        ..diagnostic.clone()
                    })
                })
                .collect()
        })
        .unwrap_or(diagnostics)
    }

    fn properties_at_position(&self, file_name: &str, position: u32) -> Vec<String> {
        let handled = self.component(file_name, |code| {
            trace!("Component properties at {}:{}", file_name, position);
            self.inner_positions(code, position, |d| d.completion)
                .into_iter()
                .map(|offset| self.inner.properties_at_position(file_name, offset))
                .find(|properties| !properties.is_empty())
                .unwrap_or_default()
        });
        match handled {
            Some(properties) => properties,
            None => self.inner.properties_at_position(file_name, position),
        }
    }

    fn type_at(
        &self,
        file_name: &str,
        root: &str,
        path: &[TypeSegment<'_>],
    ) -> Option<ResolvedType> {
        self.inner.type_at(file_name, root, path)
    }

    fn property_accesses(
        &self,
        file_name: &str,
        object: &str,
        start: u32,
        end: u32,
    ) -> Vec<PropertyAccess> {
        if !self.is_ts_plugin {
            return self.inner.property_accesses(file_name, object, start, end);
        }
        self.component(file_name, |code| {
            generated_ranges(&code.root, start, end)
                .into_iter()
                .flat_map(|(from, to)| self.inner.property_accesses(file_name, object, from, to))
                .collect()
        })
        .unwrap_or_else(|| self.inner.property_accesses(file_name, object, start, end))
    }
}
