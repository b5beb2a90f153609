//! LSP command implementation

use std::sync::Arc;

use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{info, warn};
use vuels_language::ServiceContext;
use vuels_lsp::ServerOptions;
use vuels_ts_plugin::TsPluginClient;
use vuels_ts_plugin::remote::{HostProcessEngine, RemoteClient};

use crate::utils::create_tokio_runtime;

pub fn run_lsp(hybrid: bool, ts_host: Option<&str>) -> Result<()> {
    create_tokio_runtime()?.block_on(async {
        let options = ServerOptions::new(Arc::new(HostProcessEngine));
        let options = match ts_host {
            Some(addr) if hybrid => {
                let client: Arc<dyn TsPluginClient> = Arc::new(
                    RemoteClient::connect(addr)
                        .await
                        .into_diagnostic()
                        .wrap_err_with(|| format!("Failed to connect to TypeScript host {addr}"))?,
                );
                info!("Connected to TypeScript host at {}", addr);
                options.hybrid(Arc::new(move |_context: &ServiceContext| Some(client.clone())))
            }
            Some(addr) => {
                warn!("Ignoring --ts-host {} outside hybrid mode", addr);
                options
            }
            None => options,
        };
        vuels_lsp::run(options).await;
        Ok::<_, miette::Report>(())
    })
}
