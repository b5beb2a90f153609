use vuels_core::{COMPONENTS_BINDING, ELEMENTS_BINDING, INTERNAL_PREFIX};
use vuels_typescript::{ScriptLanguageService, TypeSegment};

use super::ComponentProp;
use crate::component::{component_member_type, resolve_component};
use crate::{RequestContext, RequestResult};

/// Names of the components usable in the file's template.
pub fn get_component_names(
    context: &RequestContext,
    file_name: &str,
) -> RequestResult<Option<Vec<String>>> {
    context.resolve_component(file_name, |_code, service| {
        let Some(components) = service.type_at(file_name, COMPONENTS_BINDING, &[]) else {
            return Some(Vec::new());
        };
        let mut names: Vec<String> = Vec::with_capacity(components.members.len());
        for member in components.members {
            if !member.name.starts_with(INTERNAL_PREFIX) && !names.contains(&member.name) {
                names.push(member.name);
            }
        }
        Some(names)
    })
}

/// Props declared by the component under `tag`.
///
/// Class-style components expose their props as the instance `$props`;
/// functional components as their first parameter.
pub fn get_component_props(
    context: &RequestContext,
    file_name: &str,
    tag: &str,
    required_only: bool,
) -> RequestResult<Option<Vec<ComponentProp>>> {
    context.resolve_component(file_name, |_code, service| {
        let (name, _) = resolve_component(service, file_name, tag)?;
        let props = component_member_type(
            service,
            file_name,
            &name,
            &[TypeSegment::Instance, TypeSegment::Property("$props")],
        )
        .or_else(|| {
            component_member_type(service, file_name, &name, &[TypeSegment::Parameter(0)])
        })?;

        Some(
            props
                .members
                .into_iter()
                .filter(|m| !m.name.starts_with("__"))
                .filter(|m| !required_only || !m.optional)
                .map(|m| ComponentProp {
                    required: !m.optional,
                    name: m.name,
                    documentation: m.documentation,
                })
                .collect(),
        )
    })
}

/// Events the component under `tag` emits.
pub fn get_component_events(
    context: &RequestContext,
    file_name: &str,
    tag: &str,
) -> RequestResult<Option<Vec<String>>> {
    context.resolve_component(file_name, |_code, service| {
        let (name, _) = resolve_component(service, file_name, tag)?;
        let events = component_member_type(
            service,
            file_name,
            &name,
            &[
                TypeSegment::Instance,
                TypeSegment::Property("$emit"),
                TypeSegment::Parameter(0),
            ],
        );
        Some(events.map(|ty| ty.string_literals).unwrap_or_default())
    })
}

/// Attributes accepted by the intrinsic element `tag`.
pub fn get_element_attrs(
    context: &RequestContext,
    file_name: &str,
    tag: &str,
) -> RequestResult<Option<Vec<String>>> {
    context.resolve_component(file_name, |_code, service| {
        let element =
            service.type_at(file_name, ELEMENTS_BINDING, &[TypeSegment::Property(tag)])?;
        Some(element.members.into_iter().map(|m| m.name).collect())
    })
}
