use vuels_core::CONTEXT_BINDING;
use vuels_typescript::{PropertyAccess, ScriptLanguageService};

use super::ExtractPropCandidate;
use crate::component::generated_ranges;
use crate::{RequestContext, RequestResult};

/// Template context properties used within `template_code_range`.
///
/// Each property appears once; it is a `model` candidate if any access in
/// the range writes to it.
pub fn collect_extract_props(
    context: &RequestContext,
    file_name: &str,
    template_code_range: (u32, u32),
) -> RequestResult<Option<Vec<ExtractPropCandidate>>> {
    let (start, end) = template_code_range;
    context.resolve_component(file_name, |code, service| {
        let accesses: Vec<PropertyAccess> = if context.is_ts_plugin {
            service.property_accesses(file_name, CONTEXT_BINDING, start, end)
        } else {
            generated_ranges(&code.root, start, end)
                .into_iter()
                .flat_map(|(from, to)| {
                    service.property_accesses(file_name, CONTEXT_BINDING, from, to)
                })
                .collect()
        };

        let mut candidates: Vec<ExtractPropCandidate> = Vec::new();
        for access in accesses {
            match candidates.iter_mut().find(|c| c.name == access.name) {
                Some(existing) => existing.model |= access.written,
                None => candidates.push(ExtractPropCandidate {
                    name: access.name,
                    type_text: access.type_text,
                    model: access.written,
                }),
            }
        }
        Some(candidates)
    })
}
