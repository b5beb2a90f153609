use vuels_typescript::ScriptLanguageService;

use crate::{RequestContext, RequestResult};

/// Properties of the value at `position`, for completion after `.`.
///
/// Outside the host process the position is mapped into generated code and
/// every mapped offset that allows completion is tried in turn.
pub fn get_properties_at_location(
    context: &RequestContext,
    file_name: &str,
    position: u32,
) -> RequestResult<Option<Vec<String>>> {
    context.resolve(file_name, |code, service| {
        let properties = match code {
            Some(code) if !context.is_ts_plugin => code
                .root
                .to_generated_offsets(position)
                .filter(|(_, mapping)| mapping.data.completion)
                .map(|(offset, _)| service.properties_at_position(file_name, offset))
                .find(|properties| !properties.is_empty())?,
            _ => service.properties_at_position(file_name, position),
        };
        (!properties.is_empty()).then_some(properties)
    })
}
