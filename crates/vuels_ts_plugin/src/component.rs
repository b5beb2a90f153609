//! Component lookups shared by the decoration and the request handlers.

use vuels_core::COMPONENTS_BINDING;
use vuels_core::casing::tag_name_variants;
use vuels_language::VirtualCode;
use vuels_typescript::{ResolvedType, ScriptLanguageService, TypeSegment};

/// Resolves the component a template tag refers to.
///
/// Tries the tag as written, then its camelCase and PascalCase spellings.
/// Returns the name the component is registered under and its type.
pub(crate) fn resolve_component(
    service: &dyn ScriptLanguageService,
    file_name: &str,
    tag: &str,
) -> Option<(String, ResolvedType)> {
    tag_name_variants(tag).into_iter().find_map(|name| {
        let ty = service.type_at(
            file_name,
            COMPONENTS_BINDING,
            &[TypeSegment::Property(&name)],
        )?;
        Some((name, ty))
    })
}

/// Resolves a type below a registered component.
pub(crate) fn component_member_type(
    service: &dyn ScriptLanguageService,
    file_name: &str,
    component: &str,
    path: &[TypeSegment<'_>],
) -> Option<ResolvedType> {
    let mut full = Vec::with_capacity(path.len() + 1);
    full.push(TypeSegment::Property(component));
    full.extend_from_slice(path);
    service.type_at(file_name, COMPONENTS_BINDING, &full)
}

/// Generated ranges covering the source range `start..end`.
pub(crate) fn generated_ranges(code: &VirtualCode, start: u32, end: u32) -> Vec<(u32, u32)> {
    code.mappings
        .iter()
        .filter_map(|m| {
            let from = start.max(m.source_offset);
            let to = end.min(m.source_offset + m.length);
            (from < to).then(|| {
                (
                    m.generated_offset + (from - m.source_offset),
                    m.generated_offset + (to - m.source_offset),
                )
            })
        })
        .collect()
}
