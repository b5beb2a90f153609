//! Out-of-process bridge for hybrid mode.
//!
//! In hybrid mode semantic analysis lives in the engine's host process. The
//! host runs [`serve_connection`] with a context whose language service was
//! decorated for source positions; the language server talks to it through
//! a [`RemoteClient`]. Messages are newline-delimited JSON; every reply
//! carries the id of the request it answers.
//!
//! The host process itself is not part of this workspace: it embeds the
//! scripting engine and calls [`create_host_context`] and
//! [`serve_connection`] for each accepted connection.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use vuels_core::VueCompilerOptions;
use vuels_language::{
    LanguageRegistry, ServiceEnvironment, ServiceError, ServiceResult, TypeScriptEnvironment,
};
use vuels_typescript::{ScriptEngine, ScriptLanguageService, SharedLanguageService};

use crate::client::TsPluginClient;
use crate::decorate::decorate_language_service_for_vue;
use crate::requests::{self, ComponentProp, ExtractPropCandidate};
use crate::{RequestContext, RequestError, RequestResult};

/// A request sent to the host process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "command",
    content = "args",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Request {
    CollectExtractProps {
        file_name: String,
        template_code_range: (u32, u32),
    },
    GetPropertiesAtLocation {
        file_name: String,
        position: u32,
    },
    GetComponentEvents {
        file_name: String,
        tag: String,
    },
    GetComponentNames {
        file_name: String,
    },
    GetComponentProps {
        file_name: String,
        tag: String,
        required_only: bool,
    },
    GetElementAttrs {
        file_name: String,
        tag: String,
    },
    GetTemplateContextProps {
        file_name: String,
    },
    GetQuickInfoAtPosition {
        file_name: String,
        position: u32,
    },
}

/// A request on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub id: u64,
    pub request: Request,
}

/// The host's answer to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    Result(serde_json::Value),
    Error(String),
}

/// A reply on the wire.
///
/// `id` is `None` only when the host could not read the id of a malformed
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub id: Option<u64>,
    pub response: Response,
}

fn to_response<T: Serialize>(result: RequestResult<T>) -> Response {
    let value = result.and_then(|value| Ok(serde_json::to_value(value)?));
    match value {
        Ok(value) => Response::Result(value),
        Err(e) => Response::Error(e.to_string()),
    }
}

/// Answers one request with the in-process handlers.
pub fn handle_request(context: &RequestContext, request: Request) -> Response {
    match request {
        Request::CollectExtractProps {
            file_name,
            template_code_range,
        } => to_response(requests::collect_extract_props(
            context,
            &file_name,
            template_code_range,
        )),
        Request::GetPropertiesAtLocation {
            file_name,
            position,
        } => to_response(requests::get_properties_at_location(
            context, &file_name, position,
        )),
        Request::GetComponentEvents { file_name, tag } => {
            to_response(requests::get_component_events(context, &file_name, &tag))
        }
        Request::GetComponentNames { file_name } => {
            to_response(requests::get_component_names(context, &file_name))
        }
        Request::GetComponentProps {
            file_name,
            tag,
            required_only,
        } => to_response(requests::get_component_props(
            context,
            &file_name,
            &tag,
            required_only,
        )),
        Request::GetElementAttrs { file_name, tag } => {
            to_response(requests::get_element_attrs(context, &file_name, &tag))
        }
        Request::GetTemplateContextProps { file_name } => {
            to_response(requests::get_template_context_props(context, &file_name))
        }
        Request::GetQuickInfoAtPosition {
            file_name,
            position,
        } => to_response(requests::get_quick_info_at_position(
            context, &file_name, position,
        )),
    }
}

/// Builds the request context of the host process.
///
/// Creates the engine's language service and decorates it for source
/// positions.
pub fn create_host_context(
    typescript: Arc<dyn ScriptEngine>,
    language: Arc<LanguageRegistry>,
    env: &ServiceEnvironment,
    vue_options: VueCompilerOptions,
) -> ServiceResult<RequestContext> {
    let service = typescript.create_language_service(&language, env)?;
    let shared = SharedLanguageService::new(service);
    let get_file_id = env
        .typescript
        .clone()
        .unwrap_or_else(TypeScriptEnvironment::file_urls)
        .file_name_to_uri;

    decorate_language_service_for_vue(
        &language,
        &shared,
        &vue_options,
        &typescript,
        true,
        &get_file_id,
    );

    Ok(RequestContext {
        typescript,
        language,
        language_service: Some(shared),
        vue_options,
        is_ts_plugin: true,
        get_file_id,
    })
}

/// Serves requests on one connection until the peer closes it.
pub async fn serve_connection<S>(stream: S, context: Arc<RequestContext>) -> RequestResult<()>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<RequestMessage>(&line) {
            Ok(RequestMessage { id, request }) => {
                trace!("Host request {}: {:?}", id, request);
                ResponseMessage {
                    id: Some(id),
                    response: handle_request(&context, request),
                }
            }
            Err(e) => {
                warn!("Malformed host request: {}", e);
                ResponseMessage {
                    id: serde_json::from_str::<serde_json::Value>(&line)
                        .ok()
                        .and_then(|value| value.get("id")?.as_u64()),
                    response: Response::Error(format!("Malformed request: {e}")),
                }
            }
        };

        let mut payload = serde_json::to_vec(&reply)?;
        payload.push(b'\n');
        writer.write_all(&payload).await?;
        writer.flush().await?;
    }

    debug!("Host connection closed");
    Ok(())
}

/// Requests waiting for their reply, keyed by id. `None` once the
/// connection is closed.
type Pending = Mutex<Option<HashMap<u64, oneshot::Sender<Response>>>>;

/// A client whose requests are answered by the host process.
///
/// Requests may overlap. A reader task routes each reply to the request with
/// the same id; the reply to a dropped request is discarded. Must be created
/// inside a tokio runtime.
pub struct RemoteClient {
    outgoing: mpsc::UnboundedSender<Vec<u8>>,
    pending: Arc<Pending>,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
}

impl RemoteClient {
    pub fn new<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        let pending: Arc<Pending> = Arc::new(Mutex::new(Some(HashMap::new())));
        let (outgoing, requests) = mpsc::unbounded_channel();

        tokio::spawn(write_requests(writer, requests, pending.clone()));
        let reader = tokio::spawn(read_replies(reader, pending.clone()));

        Self {
            outgoing,
            pending,
            next_id: AtomicU64::new(1),
            reader,
        }
    }

    /// Connects to a host process listening on TCP.
    pub async fn connect(addr: impl ToSocketAddrs) -> RequestResult<Self> {
        let stream = TcpStream::connect(addr).await?;
        debug!("Connected to host process at {}", stream.peer_addr()?);
        Ok(Self::new(stream))
    }

    async fn request<T: DeserializeOwned>(&self, request: Request) -> RequestResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut payload = serde_json::to_vec(&RequestMessage { id, request })?;
        payload.push(b'\n');

        let (sender, receiver) = oneshot::channel();
        match self.pending.lock().as_mut() {
            Some(pending) => {
                pending.insert(id, sender);
            }
            None => return Err(RequestError::Disconnected),
        }
        let _waiting = Waiting {
            pending: &self.pending,
            id,
        };
        self.outgoing
            .send(payload)
            .map_err(|_| RequestError::Disconnected)?;

        match receiver.await.map_err(|_| RequestError::Disconnected)? {
            Response::Result(value) => Ok(serde_json::from_value(value)?),
            Response::Error(message) => Err(RequestError::remote(message)),
        }
    }
}

impl Drop for RemoteClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Unregisters a request when its future completes or is dropped.
struct Waiting<'a> {
    pending: &'a Pending,
    id: u64,
}

impl Drop for Waiting<'_> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.lock().as_mut() {
            pending.remove(&self.id);
        }
    }
}

async fn write_requests<W>(
    mut writer: W,
    mut requests: mpsc::UnboundedReceiver<Vec<u8>>,
    pending: Arc<Pending>,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(payload) = requests.recv().await {
        let written = async {
            writer.write_all(&payload).await?;
            writer.flush().await
        };
        if let Err(e) = written.await {
            warn!("Failed to write to host process: {}", e);
            pending.lock().take();
            return;
        }
    }
    let _ = writer.shutdown().await;
}

async fn read_replies<R>(reader: R, pending: Arc<Pending>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read from host process: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ResponseMessage>(&line) {
            Ok(ResponseMessage {
                id: Some(id),
                response,
            }) => {
                let waiting = pending.lock().as_mut().and_then(|p| p.remove(&id));
                match waiting {
                    Some(sender) => {
                        let _ = sender.send(response);
                    }
                    None => trace!("Discarding reply to cancelled request {}", id),
                }
            }
            Ok(ResponseMessage { id: None, response }) => {
                warn!("Host reply without request id: {:?}", response);
            }
            Err(e) => warn!("Malformed host reply: {}", e),
        }
    }
    debug!("Host connection closed");
    pending.lock().take();
}

#[async_trait]
impl TsPluginClient for RemoteClient {
    async fn collect_extract_props(
        &self,
        file_name: &str,
        template_code_range: (u32, u32),
    ) -> RequestResult<Option<Vec<ExtractPropCandidate>>> {
        self.request(Request::CollectExtractProps {
            file_name: file_name.to_string(),
            template_code_range,
        })
        .await
    }

    async fn get_properties_at_location(
        &self,
        file_name: &str,
        position: u32,
    ) -> RequestResult<Option<Vec<String>>> {
        self.request(Request::GetPropertiesAtLocation {
            file_name: file_name.to_string(),
            position,
        })
        .await
    }

    async fn get_component_events(
        &self,
        file_name: &str,
        tag: &str,
    ) -> RequestResult<Option<Vec<String>>> {
        self.request(Request::GetComponentEvents {
            file_name: file_name.to_string(),
            tag: tag.to_string(),
        })
        .await
    }

    async fn get_component_names(&self, file_name: &str) -> RequestResult<Option<Vec<String>>> {
        self.request(Request::GetComponentNames {
            file_name: file_name.to_string(),
        })
        .await
    }

    async fn get_component_props(
        &self,
        file_name: &str,
        tag: &str,
        required_only: bool,
    ) -> RequestResult<Option<Vec<ComponentProp>>> {
        self.request(Request::GetComponentProps {
            file_name: file_name.to_string(),
            tag: tag.to_string(),
            required_only,
        })
        .await
    }

    async fn get_element_attrs(
        &self,
        file_name: &str,
        tag: &str,
    ) -> RequestResult<Option<Vec<String>>> {
        self.request(Request::GetElementAttrs {
            file_name: file_name.to_string(),
            tag: tag.to_string(),
        })
        .await
    }

    async fn get_template_context_props(
        &self,
        file_name: &str,
    ) -> RequestResult<Option<Vec<String>>> {
        self.request(Request::GetTemplateContextProps {
            file_name: file_name.to_string(),
        })
        .await
    }

    async fn get_quick_info_at_position(
        &self,
        file_name: &str,
        position: u32,
    ) -> RequestResult<Option<String>> {
        self.request(Request::GetQuickInfoAtPosition {
            file_name: file_name.to_string(),
            position,
        })
        .await
    }
}

/// Engine stand-in on the language-server side of hybrid mode.
///
/// Semantic analysis is served by the host process, so no local language
/// service can be created.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProcessEngine;

impl ScriptEngine for HostProcessEngine {
    fn name(&self) -> &str {
        "typescript"
    }

    fn version(&self) -> &str {
        "host-process"
    }

    fn create_language_service(
        &self,
        _language: &Arc<LanguageRegistry>,
        _env: &ServiceEnvironment,
    ) -> ServiceResult<Arc<dyn ScriptLanguageService>> {
        Err(ServiceError::unavailable(
            "semantic analysis is served by the host process",
        ))
    }
}
