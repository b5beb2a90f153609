use vuels_core::{CONTEXT_BINDING, INTERNAL_PREFIX};
use vuels_typescript::ScriptLanguageService;

use crate::{RequestContext, RequestResult};

/// Names in scope of the file's template expressions.
pub fn get_template_context_props(
    context: &RequestContext,
    file_name: &str,
) -> RequestResult<Option<Vec<String>>> {
    context.resolve_component(file_name, |_code, service| {
        let ctx = service.type_at(file_name, CONTEXT_BINDING, &[])?;
        Some(
            ctx.members
                .into_iter()
                .map(|m| m.name)
                .filter(|name| !name.starts_with(INTERNAL_PREFIX))
                .collect(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::fixtures::{APP, context};
    use vuels_typescript::test_utils::FakeLanguageService;
    use vuels_typescript::{ResolvedType, TypeMember};

    #[test]
    fn test_context_members() {
        let fake = FakeLanguageService::new().with_type(
            APP,
            CONTEXT_BINDING,
            ResolvedType {
                members: vec![
                    TypeMember::new("count", "Ref<number>"),
                    TypeMember::new("__VLS_props", "{}"),
                    TypeMember::new("$attrs", "Record<string, unknown>"),
                ],
                ..Default::default()
            },
        );
        let props = get_template_context_props(&context(fake, false), APP).unwrap();
        assert_eq!(props, Some(vec!["count".to_string(), "$attrs".to_string()]));
    }

    #[test]
    fn test_unresolved_context_is_none() {
        let props = get_template_context_props(&context(FakeLanguageService::new(), false), APP);
        assert_eq!(props.unwrap(), None);
    }
}
