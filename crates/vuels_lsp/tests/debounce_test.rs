mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};
use tracing_subscriber::prelude::*;
use vuels_lsp::Backend;

struct LogCounter(Arc<Mutex<usize>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if visitor.0.contains("Validating document") {
            *self.0.lock().unwrap() += 1;
        }
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            use std::fmt::Write;
            let _ = write!(self.0, "{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }
}

#[tokio::test]
async fn test_did_change_validation_frequency() {
    let counter = Arc::new(Mutex::new(0));
    let log_layer = LogCounter(counter.clone());
    let subscriber = tracing_subscriber::registry().with(log_layer);

    // Try to set global default. If it fails, we might miss logs.
    let _ = tracing::subscriber::set_global_default(subscriber);

    let options = common::server_options();
    let (service, _) = LspService::new(move |client| Backend::new(client, options.clone()));
    let uri = Url::parse("file:///tmp/App.vue").unwrap();

    let _ = service
        .inner()
        .initialize(InitializeParams::default())
        .await;
    service.inner().initialized(InitializedParams {}).await;

    // Send 5 rapid changes
    for i in 1..=5 {
        service
            .inner()
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version: i,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: format!("<template>\n  <p>{i}</p>\n</template>\n"),
                }],
            })
            .await;

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    tokio::time::sleep(Duration::from_millis(500)).await;

    let count = *counter.lock().unwrap();
    assert!(
        (1..=2).contains(&count),
        "Expected debouncing to collapse validations (actual: {})",
        count
    );
    assert_eq!(
        service.inner().session().unwrap().context().language().len(),
        1
    );
}
