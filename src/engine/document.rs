//! Open documents tracked by the editor bridge

use crate::triggers::SourceDocument;
use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

/// Manages open documents in the editor session
#[derive(Debug, Default)]
pub struct DocumentManager {
    /// Open documents keyed by URI
    documents: DashMap<Url, DocumentState>,
}

/// State of an open document
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Latest full text known to the bridge
    pub content: String,
    /// Version number from the last open or change
    pub version: i32,
    /// Language id announced by the editor on open
    pub language_id: String,
    /// Edited since it was opened or last saved
    pub dirty: bool,
}

impl DocumentManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Track a newly opened document, replacing any previous state
    pub fn open(&self, uri: Url, language_id: String, content: String, version: i32) {
        self.documents.insert(
            uri,
            DocumentState {
                content,
                version,
                language_id,
                dirty: false,
            },
        );
    }

    /// Full content replacement; marks the document as having unsaved edits
    pub fn update(&self, uri: &Url, content: String, version: i32) {
        if let Some(mut doc) = self.documents.get_mut(uri) {
            doc.content = content;
            doc.version = version;
            doc.dirty = true;
        }
    }

    /// Record a save; `content` is present when the editor includes it
    pub fn saved(&self, uri: &Url, content: Option<String>) {
        if let Some(mut doc) = self.documents.get_mut(uri) {
            if let Some(content) = content {
                doc.content = content;
            }
            doc.dirty = false;
        }
    }

    /// Forget a closed document
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Current text of an open document
    pub fn get_content(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.content.clone())
    }

    /// Snapshot of an open document's state
    pub fn get(&self, uri: &Url) -> Option<DocumentState> {
        self.documents.get(uri).map(|doc| doc.clone())
    }

    /// Whether the document is being tracked
    pub fn is_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Whether the document has edits not yet saved
    pub fn is_dirty(&self, uri: &Url) -> bool {
        self.documents.get(uri).is_some_and(|doc| doc.dirty)
    }

    /// Number of open documents
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    /// Trigger-side view of a document.
    ///
    /// `None` for URIs that are not local files. Documents that are not
    /// open fall back to extension-based language detection.
    pub fn source_document(&self, uri: &Url) -> Option<SourceDocument> {
        let path = uri.to_file_path().ok()?;
        let language_id = self.documents.get(uri).map(|doc| doc.language_id.clone());
        Some(SourceDocument::new(path, language_id))
    }
}
