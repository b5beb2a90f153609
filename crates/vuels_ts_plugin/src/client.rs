//! The client bridge: component requests as uniform async operations.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::requests::{self, ComponentProp, ExtractPropCandidate};
use crate::{RequestContext, RequestResult};

/// Component-semantic requests, answered in-process or by a host process.
#[async_trait]
pub trait TsPluginClient: Send + Sync {
    async fn collect_extract_props(
        &self,
        file_name: &str,
        template_code_range: (u32, u32),
    ) -> RequestResult<Option<Vec<ExtractPropCandidate>>>;

    async fn get_properties_at_location(
        &self,
        file_name: &str,
        position: u32,
    ) -> RequestResult<Option<Vec<String>>>;

    async fn get_component_events(
        &self,
        file_name: &str,
        tag: &str,
    ) -> RequestResult<Option<Vec<String>>>;

    async fn get_component_names(&self, file_name: &str) -> RequestResult<Option<Vec<String>>>;

    async fn get_component_props(
        &self,
        file_name: &str,
        tag: &str,
        required_only: bool,
    ) -> RequestResult<Option<Vec<ComponentProp>>>;

    async fn get_element_attrs(
        &self,
        file_name: &str,
        tag: &str,
    ) -> RequestResult<Option<Vec<String>>>;

    async fn get_template_context_props(
        &self,
        file_name: &str,
    ) -> RequestResult<Option<Vec<String>>>;

    async fn get_quick_info_at_position(
        &self,
        file_name: &str,
        position: u32,
    ) -> RequestResult<Option<String>>;
}

/// A request handler taking its arguments as one tuple.
pub type Handler<A, R> = fn(&RequestContext, A) -> RequestResult<R>;

/// Runs `handler` against `context`. The result is returned untouched.
pub async fn dispatch<A, R>(
    context: &RequestContext,
    handler: Handler<A, R>,
    args: A,
) -> RequestResult<R> {
    handler(context, args)
}

/// The handler bound to each operation.
#[derive(Clone, Copy)]
pub struct Handlers {
    pub collect_extract_props: Handler<(String, (u32, u32)), Option<Vec<ExtractPropCandidate>>>,
    pub get_properties_at_location: Handler<(String, u32), Option<Vec<String>>>,
    pub get_component_events: Handler<(String, String), Option<Vec<String>>>,
    pub get_component_names: Handler<(String,), Option<Vec<String>>>,
    pub get_component_props: Handler<(String, String, bool), Option<Vec<ComponentProp>>>,
    pub get_element_attrs: Handler<(String, String), Option<Vec<String>>>,
    pub get_template_context_props: Handler<(String,), Option<Vec<String>>>,
    pub get_quick_info_at_position: Handler<(String, u32), Option<String>>,
}

impl Default for Handlers {
    fn default() -> Self {
        Self {
            collect_extract_props: |ctx, (file_name, range)| {
                requests::collect_extract_props(ctx, &file_name, range)
            },
            get_properties_at_location: |ctx, (file_name, position)| {
                requests::get_properties_at_location(ctx, &file_name, position)
            },
            get_component_events: |ctx, (file_name, tag)| {
                requests::get_component_events(ctx, &file_name, &tag)
            },
            get_component_names: |ctx, (file_name,)| requests::get_component_names(ctx, &file_name),
            get_component_props: |ctx, (file_name, tag, required_only)| {
                requests::get_component_props(ctx, &file_name, &tag, required_only)
            },
            get_element_attrs: |ctx, (file_name, tag)| {
                requests::get_element_attrs(ctx, &file_name, &tag)
            },
            get_template_context_props: |ctx, (file_name,)| {
                requests::get_template_context_props(ctx, &file_name)
            },
            get_quick_info_at_position: |ctx, (file_name, position)| {
                requests::get_quick_info_at_position(ctx, &file_name, position)
            },
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers").finish_non_exhaustive()
    }
}

/// A client answering in-process, bound to one [`RequestContext`].
#[derive(Debug, Clone)]
pub struct EmbeddedClient {
    context: Arc<RequestContext>,
    handlers: Handlers,
}

impl EmbeddedClient {
    pub fn new(context: RequestContext) -> Self {
        Self::with_handlers(context, Handlers::default())
    }

    /// Binds custom handlers, e.g. stubs in tests.
    pub fn with_handlers(context: RequestContext, handlers: Handlers) -> Self {
        Self {
            context: Arc::new(context),
            handlers,
        }
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

#[async_trait]
impl TsPluginClient for EmbeddedClient {
    async fn collect_extract_props(
        &self,
        file_name: &str,
        template_code_range: (u32, u32),
    ) -> RequestResult<Option<Vec<ExtractPropCandidate>>> {
        let args = (file_name.to_string(), template_code_range);
        dispatch(&self.context, self.handlers.collect_extract_props, args).await
    }

    async fn get_properties_at_location(
        &self,
        file_name: &str,
        position: u32,
    ) -> RequestResult<Option<Vec<String>>> {
        let args = (file_name.to_string(), position);
        dispatch(&self.context, self.handlers.get_properties_at_location, args).await
    }

    async fn get_component_events(
        &self,
        file_name: &str,
        tag: &str,
    ) -> RequestResult<Option<Vec<String>>> {
        let args = (file_name.to_string(), tag.to_string());
        dispatch(&self.context, self.handlers.get_component_events, args).await
    }

    async fn get_component_names(&self, file_name: &str) -> RequestResult<Option<Vec<String>>> {
        let args = (file_name.to_string(),);
        dispatch(&self.context, self.handlers.get_component_names, args).await
    }

    async fn get_component_props(
        &self,
        file_name: &str,
        tag: &str,
        required_only: bool,
    ) -> RequestResult<Option<Vec<ComponentProp>>> {
        let args = (file_name.to_string(), tag.to_string(), required_only);
        dispatch(&self.context, self.handlers.get_component_props, args).await
    }

    async fn get_element_attrs(
        &self,
        file_name: &str,
        tag: &str,
    ) -> RequestResult<Option<Vec<String>>> {
        let args = (file_name.to_string(), tag.to_string());
        dispatch(&self.context, self.handlers.get_element_attrs, args).await
    }

    async fn get_template_context_props(
        &self,
        file_name: &str,
    ) -> RequestResult<Option<Vec<String>>> {
        let args = (file_name.to_string(),);
        dispatch(&self.context, self.handlers.get_template_context_props, args).await
    }

    async fn get_quick_info_at_position(
        &self,
        file_name: &str,
        position: u32,
    ) -> RequestResult<Option<String>> {
        let args = (file_name.to_string(), position);
        dispatch(&self.context, self.handlers.get_quick_info_at_position, args).await
    }
}
