//! Compile triggers
//!
//! The explicit compile command and the save hook. Both check their
//! preconditions before handing off to [`compile::dispatch`].

use crate::compile::{self, CompileRequest, CompileTask, RequestError};
use crate::config::ExtensionConfig;
use crate::sink::{Notification, ReportSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Language identifier editors use for Z files
pub const LANGUAGE_ID: &str = "z";

/// File extensions treated as Z source
pub const FILE_EXTENSIONS: &[&str] = &[".z"];

/// Precondition failure, reported before any process is launched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    #[error("No active editor")]
    NoActiveEditor,

    #[error("Current file is not a Z file")]
    NotZFile(PathBuf),

    #[error(transparent)]
    Request(#[from] RequestError),
}

/// A document the user is working on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// Language id reported by the editor, if any
    pub language_id: Option<String>,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, language_id: Option<String>) -> Self {
        Self {
            path: path.into(),
            language_id,
        }
    }

    /// Document known only by its path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(path, None)
    }

    /// Whether this is a Z file.
    ///
    /// The editor's language id wins; without one the extension decides.
    pub fn is_z(&self) -> bool {
        match &self.language_id {
            Some(id) => id == LANGUAGE_ID,
            None => has_z_extension(&self.path),
        }
    }
}

/// Whether `path` ends in one of [`FILE_EXTENSIONS`]
pub fn has_z_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FILE_EXTENSIONS
                .iter()
                .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Compile command: compile the active document.
pub fn compile_document(
    active: Option<&SourceDocument>,
    config: &ExtensionConfig,
    sink: Arc<dyn ReportSink>,
) -> Result<CompileTask, TriggerError> {
    let document = active.ok_or(TriggerError::NoActiveEditor)?;
    if !document.is_z() {
        return Err(TriggerError::NotZFile(document.path.clone()));
    }

    let request = CompileRequest::new(&document.path, config)?;
    Ok(compile::dispatch(request, sink))
}

/// Same as [`compile_document`], but a precondition failure is shown as an
/// error notification instead of being returned.
pub async fn run_compile_command(
    active: Option<&SourceDocument>,
    config: &ExtensionConfig,
    sink: Arc<dyn ReportSink>,
) -> Option<CompileTask> {
    match compile_document(active, config, sink.clone()) {
        Ok(task) => Some(task),
        Err(e) => {
            tracing::debug!("Compile command rejected: {}", e);
            sink.notify(Notification::error(e.to_string())).await;
            None
        }
    }
}

/// Save hook: compile a saved Z document when compile-on-save is enabled.
///
/// Returns `None`, without touching the sink, when the document is not a
/// Z file or the setting is off. An unusable configuration is shown as an
/// error notification.
pub async fn on_document_saved(
    document: &SourceDocument,
    config: &ExtensionConfig,
    sink: Arc<dyn ReportSink>,
) -> Option<CompileTask> {
    if !document.is_z() || !config.auto_compile_on_save {
        return None;
    }

    match CompileRequest::new(&document.path, config) {
        Ok(request) => Some(compile::dispatch(request, sink)),
        Err(e) => {
            let e = TriggerError::from(e);
            tracing::warn!("Skipping compile on save for {}: {}", document.path.display(), e);
            sink.notify(Notification::error(e.to_string())).await;
            None
        }
    }
}
