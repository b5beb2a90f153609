use vuels_typescript::ScriptLanguageService;

use crate::{RequestContext, RequestResult};

/// Type summary at `position`: the display text, then documentation after
/// a blank line.
pub fn get_quick_info_at_position(
    context: &RequestContext,
    file_name: &str,
    position: u32,
) -> RequestResult<Option<String>> {
    context.resolve(file_name, |code, service| {
        let info = match code {
            Some(code) if !context.is_ts_plugin => code
                .root
                .to_generated_offsets(position)
                .filter(|(_, mapping)| mapping.data.semantic)
                .find_map(|(offset, _)| service.quick_info_at_position(file_name, offset))?,
            _ => service.quick_info_at_position(file_name, position)?,
        };
        let mut text = info.display;
        if !info.documentation.is_empty() {
            text.push_str("\n\n");
            text.push_str(&info.documentation);
        }
        Some(text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::fixtures::{APP, context, context_with, generated_of, offset_of, registry};
    use vuels_typescript::test_utils::FakeLanguageService;
    use vuels_typescript::{QuickInfo, TextSpan};

    fn info(display: &str, documentation: &str) -> QuickInfo {
        QuickInfo {
            kind: "const".to_string(),
            display: display.to_string(),
            documentation: documentation.to_string(),
            span: TextSpan::default(),
        }
    }

    #[test]
    fn test_quick_info_in_template_expression() {
        let language = registry();
        let source = offset_of("{{ count }}", 4);
        let generated = generated_of(&language, source);
        let fake = FakeLanguageService::new().with_quick_info(
            APP,
            TextSpan::new(generated, 0),
            info("const count: Ref<number>", "Click counter."),
        );

        let text = get_quick_info_at_position(&context_with(language, fake, false), APP, source);
        assert_eq!(
            text.unwrap().as_deref(),
            Some("const count: Ref<number>\n\nClick counter.")
        );
    }

    #[test]
    fn test_quick_info_in_plain_script() {
        let fake = FakeLanguageService::new().with_quick_info(
            "/work/main.ts",
            TextSpan::new(0, 5),
            info("const app: App", ""),
        );
        let text = get_quick_info_at_position(&context(fake, false), "/work/main.ts", 2);
        assert_eq!(text.unwrap().as_deref(), Some("const app: App"));
    }

    #[test]
    fn test_position_outside_mappings_is_none() {
        let fake = FakeLanguageService::new();
        let text = get_quick_info_at_position(&context(fake, false), APP, 0);
        assert_eq!(text.unwrap(), None);
    }
}
