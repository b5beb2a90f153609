mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};
use vuels_lsp::Backend;

const PAGE: &str = "<template>\n  <h1>Docs</h1>\n</template>\n";

fn write_config(root: &std::path::Path, extensions: &str) -> Url {
    let path = root.join("tsconfig.json");
    let config = format!(r#"{{ "vueCompilerOptions": {{ "extensions": {extensions} }} }}"#);
    std::fs::write(&path, config).unwrap();
    Url::from_file_path(path).unwrap()
}

fn config_changed(config: &Url) -> DidChangeWatchedFilesParams {
    DidChangeWatchedFilesParams {
        changes: vec![FileEvent::new(config.clone(), FileChangeType::CHANGED)],
    }
}

async fn start(root: &std::path::Path) -> LspService<Backend> {
    let options = common::server_options();
    let (service, _) = LspService::new(move |client| Backend::new(client, options.clone()));
    #[allow(deprecated)]
    let params = InitializeParams {
        root_uri: Some(Url::from_file_path(root).unwrap()),
        ..Default::default()
    };
    service.inner().initialize(params).await.unwrap();
    service.inner().initialized(InitializedParams {}).await;
    service
}

async fn open(service: &LspService<Backend>, uri: &Url, language_id: &str, text: &str) {
    service
        .inner()
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem::new(
                uri.clone(),
                language_id.to_string(),
                1,
                text.to_string(),
            ),
        })
        .await;
}

#[tokio::test]
async fn test_added_extension_applies_after_config_change() {
    let root = tempfile::tempdir().unwrap();
    let config = write_config(root.path(), r#"[".vue"]"#);
    let service = start(root.path()).await;

    let page = Url::from_file_path(root.path().join("Page.md")).unwrap();
    open(&service, &page, "markdown", PAGE).await;

    let before = service.inner().session().unwrap();
    let script = before.context().language().get(&page).unwrap();
    assert_eq!(script.language_id, "markdown");
    assert!(script.generated.is_none());

    write_config(root.path(), r#"[".vue", ".md"]"#);
    service
        .inner()
        .did_change_watched_files(config_changed(&config))
        .await;

    let after = service.inner().session().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    let script = after.context().language().get(&page).unwrap();
    assert_eq!(script.language_id, "vue");
    assert!(script.generated.is_some());
    assert_eq!(&*script.snapshot, PAGE);
}

#[tokio::test]
async fn test_removed_extension_applies_after_config_change() {
    let root = tempfile::tempdir().unwrap();
    let config = write_config(root.path(), r#"[".vue", ".md"]"#);
    let service = start(root.path()).await;

    let page = Url::from_file_path(root.path().join("Page.md")).unwrap();
    open(&service, &page, "markdown", PAGE).await;
    let script = service.inner().session().unwrap().context().language().get(&page).unwrap();
    assert_eq!(script.language_id, "vue");

    write_config(root.path(), r#"[".vue"]"#);
    service
        .inner()
        .did_change_watched_files(config_changed(&config))
        .await;

    let script = service.inner().session().unwrap().context().language().get(&page).unwrap();
    assert_eq!(script.language_id, "markdown");
    assert!(script.generated.is_none());
}

#[tokio::test]
async fn test_unrelated_file_change_keeps_session() {
    let root = tempfile::tempdir().unwrap();
    write_config(root.path(), r#"[".vue"]"#);
    let service = start(root.path()).await;
    let before = service.inner().session().unwrap();

    let readme = Url::from_file_path(root.path().join("README.md")).unwrap();
    service
        .inner()
        .did_change_watched_files(config_changed(&readme))
        .await;

    assert!(Arc::ptr_eq(&before, &service.inner().session().unwrap()));
}
