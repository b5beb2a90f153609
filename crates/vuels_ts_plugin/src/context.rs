//! The bundle every request handler reads from.

use std::fmt;
use std::sync::Arc;

use vuels_core::{VueCompilerOptions, VueVirtualCode};
use vuels_language::lsp_types::Url;
use vuels_language::{FileIdMapper, LanguageRegistry};
use vuels_typescript::{ScriptEngine, SharedLanguageService};

use crate::{RequestError, RequestResult};

/// Immutable references shared by the request handlers of one client.
///
/// Built once per client; never mutated afterwards.
pub struct RequestContext {
    pub typescript: Arc<dyn ScriptEngine>,
    pub language: Arc<LanguageRegistry>,
    /// The live language service, if one was published.
    pub language_service: Option<SharedLanguageService>,
    pub vue_options: VueCompilerOptions,
    /// `true` when running inside the engine's host process, where the
    /// language service accepts source positions.
    pub is_ts_plugin: bool,
    pub get_file_id: FileIdMapper,
}

impl RequestContext {
    /// Maps an engine file name to its document identifier.
    pub fn file_id(&self, file_name: &str) -> RequestResult<Url> {
        (self.get_file_id)(file_name).map_err(|_| RequestError::invalid_file_name(file_name))
    }

    /// Runs `f` with the file's component code (if any) and the language service.
    ///
    /// Fails only when the file name cannot be mapped. Answers `None` when no
    /// language service is available or `f` finds nothing.
    pub(crate) fn resolve<R>(
        &self,
        file_name: &str,
        f: impl FnOnce(Option<&VueVirtualCode>, &SharedLanguageService) -> Option<R>,
    ) -> RequestResult<Option<R>> {
        let uri = self.file_id(file_name)?;
        let Some(service) = &self.language_service else {
            return Ok(None);
        };
        let script = self.language.get(&uri);
        let code = script.as_ref().and_then(|s| s.generated_as::<VueVirtualCode>());
        Ok(f(code, service))
    }

    /// Like [`resolve`](Self::resolve), for requests that only make sense in
    /// component files.
    pub(crate) fn resolve_component<R>(
        &self,
        file_name: &str,
        f: impl FnOnce(&VueVirtualCode, &SharedLanguageService) -> Option<R>,
    ) -> RequestResult<Option<R>> {
        self.resolve(file_name, |code, service| f(code?, service))
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("typescript", &self.typescript.name())
            .field("language", &self.language)
            .field("language_service", &self.language_service)
            .field("vue_options", &self.vue_options)
            .field("is_ts_plugin", &self.is_ts_plugin)
            .finish_non_exhaustive()
    }
}
