//! Editor bridge
//!
//! Receives commands, save events, configuration changes and hover
//! requests from the editor and routes them to the triggers and the
//! keyword table. Compile output goes back through a [`ReportSink`].

use super::document::DocumentManager;
use super::sink::ClientSink;
use crate::config::{ConfigError, ConfigLayers, ConfigOverrides, ExtensionConfig};
use crate::hover::{self, HoverInfo};
use crate::sink::ReportSink;
use crate::triggers;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

/// Command id of the explicit compile action
pub const COMPILE_COMMAND: &str = "z.compile";

const SERVER_NAME: &str = "z-editor";

pub struct ZServer {
    client: Client,
    documents: DocumentManager,
    sink: Arc<dyn ReportSink>,
    layers: RwLock<ConfigLayers>,
    /// Settings file given up front; workspace discovery is skipped
    pinned_file: bool,
    workspace_root: RwLock<Option<PathBuf>>,
}

impl ZServer {
    pub fn new(client: Client) -> Self {
        let sink = Arc::new(ClientSink::new(client.clone()));
        Self::with_sink(client, sink)
    }

    /// Report compile output somewhere other than the client
    pub fn with_sink(client: Client, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            client,
            documents: DocumentManager::new(),
            sink,
            layers: RwLock::new(ConfigLayers::default()),
            pinned_file: false,
            workspace_root: RwLock::new(None),
        }
    }

    /// Command-line values that win over every other settings source
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        self.update_layers(|layers| layers.overrides = overrides);
        self
    }

    /// Use this settings file instead of looking for one in the workspace
    pub fn with_settings_file(mut self, config: ExtensionConfig) -> Self {
        self.update_layers(|layers| layers.file = Some(config));
        self.pinned_file = true;
        self
    }

    pub fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    will_save: None,
                    will_save_wait_until: None,
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                },
            )),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![COMPILE_COMMAND.to_string()],
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            ..ServerCapabilities::default()
        }
    }

    /// Snapshot of the current settings, taken once per trigger
    pub fn config(&self) -> ExtensionConfig {
        self.layers
            .read()
            .map(|layers| layers.resolve_lossy())
            .unwrap_or_default()
    }

    fn update_layers(&self, update: impl FnOnce(&mut ConfigLayers)) {
        if let Ok(mut layers) = self.layers.write() {
            update(&mut layers);
        }
    }

    /// Replace the editor settings layer if the result is usable
    fn apply_editor_settings(
        &self,
        settings: Value,
    ) -> std::result::Result<ExtensionConfig, ConfigError> {
        let mut candidate = self
            .layers
            .read()
            .map(|layers| layers.clone())
            .unwrap_or_default();
        candidate.editor = Some(settings);
        let config = candidate.resolve()?;

        if let Ok(mut layers) = self.layers.write() {
            layers.editor = candidate.editor;
        }
        Ok(config)
    }

    pub fn documents(&self) -> &DocumentManager {
        &self.documents
    }

    /// Workspace root announced by the editor, if any
    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root
            .read()
            .ok()
            .and_then(|root| root.clone())
    }

    async fn compile(&self, arguments: &[Value]) {
        let uri = arguments
            .first()
            .and_then(Value::as_str)
            .and_then(|s| Url::parse(s).ok());
        let active = uri.as_ref().and_then(|uri| self.documents.source_document(uri));

        if let (Some(uri), Some(doc)) = (&uri, &active) {
            if doc.is_z() && self.documents.is_dirty(uri) {
                self.sink
                    .append_line(&format!(
                        "{} has unsaved changes; compiling the saved file",
                        doc.path.display()
                    ))
                    .await;
            }
        }

        let config = self.config();
        if let Some(task) =
            triggers::run_compile_command(active.as_ref(), &config, self.sink.clone()).await
        {
            task.detach(self.sink.clone());
        }
    }
}

fn to_lsp_hover(info: &HoverInfo) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: info.markdown(),
        }),
        range: info.range.map(|r| Range {
            start: Position {
                line: r.line - 1,
                character: r.start_col - 1,
            },
            end: Position {
                line: r.line - 1,
                character: r.end_col - 1,
            },
        }),
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for ZServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("{} initializing", SERVER_NAME);

        let root = params.root_uri.and_then(|uri| uri.to_file_path().ok());

        if !self.pinned_file {
            if let Some(file) = root.as_deref().and_then(ExtensionConfig::load_workspace) {
                self.update_layers(|layers| layers.file = Some(file));
            }
        }

        if let Some(options) = params.initialization_options {
            if let Err(e) = self.apply_editor_settings(options) {
                tracing::warn!("Ignoring initialization options: {}", e);
            }
        }
        tracing::debug!(config = ?self.config(), "Resolved settings");

        if let Ok(mut current) = self.workspace_root.write() {
            *current = root;
        }

        Ok(InitializeResult {
            capabilities: Self::capabilities(),
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        match self.workspace_root() {
            Some(root) => tracing::info!("{} initialized in {}", SERVER_NAME, root.display()),
            None => tracing::info!("{} initialized", SERVER_NAME),
        }
        self.client
            .log_message(MessageType::INFO, format!("{} ready", SERVER_NAME))
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("{} shutting down", SERVER_NAME);
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.documents
            .open(doc.uri.clone(), doc.language_id, doc.text, doc.version);
        tracing::debug!(
            "Document opened: {} ({} open)",
            doc.uri,
            self.documents.count()
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        if !self.documents.is_open(&uri) {
            tracing::warn!("Change for a document that is not open: {}", uri);
            return;
        }

        if let Some(change) = params.content_changes.into_iter().next() {
            self.documents.update(&uri, change.text, version);
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.saved(&uri, params.text);
        if let Some(state) = self.documents.get(&uri) {
            tracing::debug!("Document saved: {} (version {})", uri, state.version);
        }

        let Some(doc) = self.documents.source_document(&uri) else {
            return;
        };

        let config = self.config();
        if let Some(task) = triggers::on_document_saved(&doc, &config, self.sink.clone()).await {
            tracing::debug!("Compile on save: {}", doc.path.display());
            task.detach(self.sink.clone());
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.close(&uri);
        tracing::debug!(
            "Document closed: {} ({} open)",
            uri,
            self.documents.count()
        );
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match self.apply_editor_settings(params.settings) {
            Ok(config) => {
                tracing::info!(?config, "Settings updated");
            }
            Err(e) => {
                tracing::warn!("Ignoring settings update: {}", e);
            }
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != COMPILE_COMMAND {
            return Err(Error::invalid_params(format!(
                "Unknown command: {}",
                params.command
            )));
        }

        self.compile(&params.arguments).await;
        Ok(None)
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(content) = self.documents.get_content(uri) else {
            return Ok(None);
        };

        Ok(
            hover::hover_at(
                &content,
                position.line.saturating_add(1),
                position.character.saturating_add(1),
            )
                .map(|info| to_lsp_hover(&info)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, Notification};
    use serde_json::json;
    use std::time::Duration;
    use tower_lsp::LspService;

    fn service_with_sink(sink: Arc<MemorySink>) -> LspService<ZServer> {
        let (service, _) = LspService::new(move |client| ZServer::with_sink(client, sink));
        service
    }

    fn uri(path: &str) -> Url {
        Url::from_file_path(path).unwrap()
    }

    fn open_params(uri: Url, language_id: &str, text: &str) -> DidOpenTextDocumentParams {
        DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri,
                language_id: language_id.to_string(),
                version: 1,
                text: text.to_string(),
            },
        }
    }

    fn hover_params(uri: Url, line: u32, character: u32) -> HoverParams {
        HoverParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri },
                position: Position { line, character },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        }
    }

    fn compile_params(arguments: Vec<Value>) -> ExecuteCommandParams {
        ExecuteCommandParams {
            command: COMPILE_COMMAND.to_string(),
            arguments,
            work_done_progress_params: WorkDoneProgressParams::default(),
        }
    }

    fn save_params(uri: Url) -> DidSaveTextDocumentParams {
        DidSaveTextDocumentParams {
            text_document: TextDocumentIdentifier { uri },
            text: None,
        }
    }

    async fn wait_for_notification(sink: &MemorySink) -> Vec<Notification> {
        for _ in 0..250 {
            let notifications = sink.notifications();
            if !notifications.is_empty() {
                return notifications;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        sink.notifications()
    }

    #[test]
    fn test_capabilities() {
        let caps = ZServer::capabilities();
        assert!(caps.hover_provider.is_some());
        let commands = caps.execute_command_provider.unwrap().commands;
        assert_eq!(commands, vec!["z.compile"]);
        assert!(caps.completion_provider.is_none());
    }

    #[tokio::test]
    async fn test_hover_known_keyword() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();
        let doc = uri("/work/main.z");

        server
            .did_open(open_params(doc.clone(), "z", "class Point {\n  int x;\n}"))
            .await;

        let hover = server.hover(hover_params(doc, 1, 3)).await.unwrap().unwrap();
        match hover.contents {
            HoverContents::Markup(markup) => {
                assert_eq!(markup.kind, MarkupKind::Markdown);
                assert!(markup.value.contains("```z\nint\n```"));
                assert!(markup.value.contains("Integer type"));
            }
            other => panic!("unexpected hover contents: {:?}", other),
        }
        let range = hover.range.unwrap();
        assert_eq!(range.start, Position { line: 1, character: 2 });
        assert_eq!(range.end, Position { line: 1, character: 5 });
    }

    #[tokio::test]
    async fn test_hover_unknown_word() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();
        let doc = uri("/work/main.z");

        server
            .did_open(open_params(doc.clone(), "z", "foobar123 = 1;"))
            .await;

        assert!(server.hover(hover_params(doc, 0, 2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hover_closed_document() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();

        let hover = server
            .hover(hover_params(uri("/work/main.z"), 0, 0))
            .await
            .unwrap();
        assert!(hover.is_none());
    }

    #[tokio::test]
    async fn test_compile_without_document() {
        let sink = Arc::new(MemorySink::new());
        let service = service_with_sink(sink.clone());

        let result = service.inner().execute_command(compile_params(vec![])).await;

        assert!(matches!(result, Ok(None)));
        assert_eq!(sink.notifications(), vec![Notification::error("No active editor")]);
    }

    #[tokio::test]
    async fn test_compile_wrong_language() {
        let sink = Arc::new(MemorySink::new());
        let service = service_with_sink(sink.clone());
        let server = service.inner();
        let doc = uri("/work/notes.md");

        server.did_open(open_params(doc.clone(), "markdown", "# notes")).await;
        server
            .execute_command(compile_params(vec![json!(doc.as_str())]))
            .await
            .unwrap();

        assert_eq!(
            sink.notifications(),
            vec![Notification::error("Current file is not a Z file")]
        );
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let params = ExecuteCommandParams {
            command: "z.unknown".to_string(),
            arguments: vec![],
            work_done_progress_params: WorkDoneProgressParams::default(),
        };

        assert!(service.inner().execute_command(params).await.is_err());
    }

    #[tokio::test]
    async fn test_save_without_auto_compile() {
        let sink = Arc::new(MemorySink::new());
        let service = service_with_sink(sink.clone());
        let server = service.inner();
        let doc = uri("/work/main.z");

        server.did_open(open_params(doc.clone(), "z", "int x;")).await;
        server.did_save(save_params(doc)).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_configuration_change() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();

        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "z": { "compilerPath": "zc", "autoCompileOnSave": true } }),
            })
            .await;

        let config = server.config();
        assert_eq!(config.compiler_path, "zc");
        assert!(config.auto_compile_on_save);

        // Invalid settings keep the previous snapshot
        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "autoCompileOnSave": "sometimes" }),
            })
            .await;
        assert_eq!(server.config().compiler_path, "zc");
    }

    #[tokio::test]
    async fn test_initialize_reads_options() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();

        let params = InitializeParams {
            initialization_options: Some(json!({ "compilerPath": "zc" })),
            ..InitializeParams::default()
        };
        let result = server.initialize(params).await.unwrap();

        assert_eq!(result.server_info.unwrap().name, "z-editor");
        assert_eq!(server.config().compiler_path, "zc");
    }

    #[tokio::test]
    async fn test_initialize_reads_workspace_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".z-editor.yaml"),
            "compilerPath: workspace-zc\n",
        )
        .unwrap();

        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();

        #[allow(deprecated)]
        let params = InitializeParams {
            root_uri: Some(Url::from_directory_path(dir.path()).unwrap()),
            ..InitializeParams::default()
        };
        server.initialize(params).await.unwrap();

        assert_eq!(server.config().compiler_path, "workspace-zc");
        assert_eq!(server.workspace_root().unwrap(), dir.path());
    }

    fn root_params(root: &std::path::Path, options: Option<Value>) -> InitializeParams {
        #[allow(deprecated)]
        InitializeParams {
            root_uri: Some(Url::from_directory_path(root).unwrap()),
            initialization_options: options,
            ..InitializeParams::default()
        }
    }

    #[tokio::test]
    async fn test_initialize_keeps_seeded_config() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".z-editor.yaml"),
            "compilerPath: workspace-zc\ncompilerArgs: [-O]\n",
        )
        .unwrap();

        let (service, _) = LspService::new(|client| {
            ZServer::with_sink(client, Arc::new(MemorySink::new())).with_overrides(
                ConfigOverrides {
                    compiler_path: Some("seeded-zc".to_string()),
                    ..ConfigOverrides::default()
                },
            )
        });
        let server = service.inner();

        server
            .initialize(root_params(dir.path(), Some(json!({}))))
            .await
            .unwrap();

        let config = server.config();
        assert_eq!(config.compiler_path, "seeded-zc");
        assert_eq!(config.compiler_args, vec!["-O"]);
    }

    #[tokio::test]
    async fn test_initialize_layers_cli_over_editor_over_workspace() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".z-editor.yaml"),
            "compilerPath: workspace-zc\ncompilerArgs: [--ws]\n",
        )
        .unwrap();

        let (service, _) = LspService::new(|client| {
            ZServer::with_sink(client, Arc::new(MemorySink::new())).with_overrides(
                ConfigOverrides {
                    auto_compile_on_save: Some(true),
                    ..ConfigOverrides::default()
                },
            )
        });
        let server = service.inner();

        let options = json!({ "z": { "compilerPath": "editor-zc", "autoCompileOnSave": false } });
        server
            .initialize(root_params(dir.path(), Some(options)))
            .await
            .unwrap();

        let config = server.config();
        assert_eq!(config.compiler_path, "editor-zc");
        assert_eq!(config.compiler_args, vec!["--ws"]);
        assert!(config.auto_compile_on_save);
    }

    #[tokio::test]
    async fn test_configuration_change_merges_onto_workspace_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(".z-editor.yaml"), "compilerPath: workspace-zc\n").unwrap();

        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();
        server.initialize(root_params(dir.path(), None)).await.unwrap();

        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "autoCompileOnSave": true }),
            })
            .await;

        let config = server.config();
        assert_eq!(config.compiler_path, "workspace-zc");
        assert!(config.auto_compile_on_save);
    }

    #[tokio::test]
    async fn test_settings_file_skips_workspace_discovery() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(".z-editor.yaml"), "compilerPath: workspace-zc\n").unwrap();

        let (service, _) = LspService::new(|client| {
            ZServer::with_sink(client, Arc::new(MemorySink::new()))
                .with_settings_file(ExtensionConfig::default().with_compiler("pinned-zc"))
        });
        let server = service.inner();
        server
            .initialize(root_params(dir.path(), Some(json!({}))))
            .await
            .unwrap();

        assert_eq!(server.config().compiler_path, "pinned-zc");
    }

    #[tokio::test]
    async fn test_save_with_empty_compiler_reports_error() {
        let sink = Arc::new(MemorySink::new());
        let service = service_with_sink(sink.clone());
        let server = service.inner();
        let doc = uri("/work/main.z");

        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "compilerPath": "", "autoCompileOnSave": true }),
            })
            .await;
        server.did_open(open_params(doc.clone(), "z", "int x;")).await;
        server.did_save(save_params(doc)).await;

        assert_eq!(
            sink.notifications(),
            vec![Notification::error("No compiler configured")]
        );
        assert!(sink.lines().is_empty());
    }

    /// Records notifications but dies on the first log line
    #[derive(Default)]
    struct BrokenLogSink {
        inner: MemorySink,
    }

    #[tower_lsp::async_trait]
    impl ReportSink for BrokenLogSink {
        async fn append_line(&self, _line: &str) {
            panic!("log unavailable");
        }

        async fn notify(&self, notification: Notification) {
            self.inner.notify(notification).await;
        }
    }

    #[tokio::test]
    async fn test_compile_task_failure_is_reported() {
        let sink = Arc::new(BrokenLogSink::default());
        let sink_for_server = sink.clone();
        let (service, _) =
            LspService::new(move |client| ZServer::with_sink(client, sink_for_server));
        let server = service.inner();
        let doc = uri("/work/main.z");

        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "compilerPath": "zc" }),
            })
            .await;
        server.did_open(open_params(doc.clone(), "z", "int x;")).await;
        server
            .execute_command(compile_params(vec![json!(doc.as_str())]))
            .await
            .unwrap();

        let notifications = wait_for_notification(&sink.inner).await;
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].message.starts_with("Compilation failed:"));
    }

    #[tokio::test]
    async fn test_hover_position_at_limit() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();
        let doc = uri("/work/main.z");

        server.did_open(open_params(doc.clone(), "z", "int x;")).await;

        let far_line = server.hover(hover_params(doc.clone(), u32::MAX, 0)).await.unwrap();
        assert!(far_line.is_none());
        let far_column = server.hover(hover_params(doc, 0, u32::MAX)).await.unwrap();
        assert!(far_column.is_none());
    }

    #[tokio::test]
    async fn test_change_for_unopened_document_is_ignored() {
        let service = service_with_sink(Arc::new(MemorySink::new()));
        let server = service.inner();
        let doc = uri("/work/main.z");

        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: doc.clone(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "int x;".to_string(),
                }],
            })
            .await;

        assert!(!server.documents().is_open(&doc));
        assert_eq!(server.documents().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_with_auto_compile() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("main.z");
        std::fs::write(&path, "string s;").unwrap();

        let sink = Arc::new(MemorySink::new());
        let service = service_with_sink(sink.clone());
        let server = service.inner();
        let doc = Url::from_file_path(&path).unwrap();

        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "compilerPath": "cat", "autoCompileOnSave": true }),
            })
            .await;
        server.did_open(open_params(doc.clone(), "z", "string s;")).await;
        server.did_save(save_params(doc)).await;

        let notifications = wait_for_notification(&sink).await;
        assert_eq!(notifications.len(), 1);
        assert!(sink.log_contains("string s;"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compile_command_notes_unsaved_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("main.z");
        std::fs::write(&path, "int saved;").unwrap();

        let sink = Arc::new(MemorySink::new());
        let service = service_with_sink(sink.clone());
        let server = service.inner();
        let doc = Url::from_file_path(&path).unwrap();

        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "compilerPath": "cat" }),
            })
            .await;
        server.did_open(open_params(doc.clone(), "z", "int saved;")).await;
        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: doc.clone(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "int edited;".to_string(),
                }],
            })
            .await;
        server
            .execute_command(compile_params(vec![json!(doc.as_str())]))
            .await
            .unwrap();

        let notifications = wait_for_notification(&sink).await;
        assert_eq!(notifications.len(), 1);
        assert!(sink.log_contains("unsaved changes"));
        assert!(sink.log_contains("int saved;"));
    }
}
