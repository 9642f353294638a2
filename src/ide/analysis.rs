//! AnalysisHost and Analysis: document state and request entry points.
//!
//! The `AnalysisHost` owns the registry, schema and configuration for one
//! session and publishes an immutable [`DocumentAnalysis`] per document
//! version. Requests go through an `Analysis` and always read one published
//! pass; a newer version replaces it instead of mutating it.
//!
//! ## Usage
//!
//! ```ignore
//! let host = AnalysisHost::new(registry, schema, AnalysisConfig::default());
//!
//! let doc = host.set_document("page.antlers.html", text, 1);
//!
//! let analysis = host.analysis();
//! let cancel = CancellationToken::new();
//! let items = analysis.completions(doc, 1, line, col, &cancel)?;
//! let hover = analysis.hover(doc, 1, line, col, &cancel)?;
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::base::LineCol;
use crate::hir::{
    AnalysisConfig, Diagnostic, DocumentAnalysis, SchemaProvider, ScopeBuilder, ScopeId,
};
use crate::syntax::RawToken;

use super::completion::CompletionResponse;
use super::diagnostics::collect_diagnostics;
use super::hover::HoverResult;
use super::registry::CapabilityRegistry;
use super::request::SuggestionRequest;

/// Identifier of an open document within one host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u32);

/// Why a request produced no answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request cancelled")]
    Cancelled,

    #[error("document version {requested} is stale (current: {current})")]
    StaleVersion { requested: u64, current: u64 },

    #[error("unknown document {0:?}")]
    UnknownDocument(DocumentId),

    #[error("position {line}:{column} is outside the document")]
    PositionOutOfRange { line: u32, column: u32 },
}

#[derive(Default)]
struct DocumentTable {
    ids: FxHashMap<SmolStr, DocumentId>,
    documents: FxHashMap<DocumentId, Arc<DocumentAnalysis>>,
    next_id: u32,
}

impl DocumentTable {
    fn id_for(&mut self, path: &str) -> DocumentId {
        if let Some(id) = self.ids.get(path) {
            return *id;
        }
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.ids.insert(SmolStr::from(path), id);
        id
    }
}

/// Owns all state for one analysis session.
///
/// Documents are analysed on `set_document` and published atomically; the
/// registry and schema are fixed for the lifetime of the host.
pub struct AnalysisHost {
    registry: Arc<CapabilityRegistry>,
    schema: Arc<dyn SchemaProvider>,
    config: Arc<AnalysisConfig>,
    documents: Arc<RwLock<DocumentTable>>,
}

impl AnalysisHost {
    pub fn new(
        registry: CapabilityRegistry,
        schema: Arc<dyn SchemaProvider>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            schema,
            config: Arc::new(config),
            documents: Arc::default(),
        }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse `text` and publish it as `version` of the document at `path`.
    ///
    /// An older version than the one already published is analysed but not
    /// published.
    pub fn set_document(&self, path: &str, text: &str, version: u64) -> DocumentId {
        let analysis = self.builder().analyze(text, version);
        self.publish(path, analysis)
    }

    /// Like [`AnalysisHost::set_document`] with tokens from an upstream parser.
    pub fn set_document_tokens(
        &self,
        path: &str,
        text: &str,
        tokens: impl IntoIterator<Item = RawToken>,
        version: u64,
    ) -> DocumentId {
        let analysis = self.builder().analyze_tokens(text, tokens, version);
        self.publish(path, analysis)
    }

    pub fn remove_document(&self, path: &str) -> bool {
        let mut table = self.documents.write();
        let Some(id) = table.ids.remove(path) else {
            return false;
        };
        table.documents.remove(&id);
        true
    }

    pub fn document_id(&self, path: &str) -> Option<DocumentId> {
        self.documents.read().ids.get(path).copied()
    }

    /// The published pass for a document.
    pub fn document(&self, id: DocumentId) -> Option<Arc<DocumentAnalysis>> {
        self.documents.read().documents.get(&id).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().documents.len()
    }

    /// Get a handle for answering requests.
    pub fn analysis(&self) -> Analysis {
        Analysis {
            registry: self.registry.clone(),
            schema: self.schema.clone(),
            config: self.config.clone(),
            documents: self.documents.clone(),
        }
    }

    fn builder(&self) -> ScopeBuilder<'_> {
        ScopeBuilder::new(self.registry.catalog(), &*self.schema, &self.config)
    }

    fn publish(&self, path: &str, analysis: DocumentAnalysis) -> DocumentId {
        let mut table = self.documents.write();
        let id = table.id_for(path);
        let current = table.documents.get(&id).map(|d| d.version);
        if current.is_some_and(|v| v > analysis.version) {
            debug!(path, version = analysis.version, ?current, "older version not published");
            return id;
        }
        table.documents.insert(id, Arc::new(analysis));
        id
    }
}

/// Answers requests against published document versions.
///
/// Each request reads exactly one published pass. If a newer version is
/// published while a request is being assembled, the request is dropped as
/// stale before any handler runs.
#[derive(Clone)]
pub struct Analysis {
    registry: Arc<CapabilityRegistry>,
    schema: Arc<dyn SchemaProvider>,
    config: Arc<AnalysisConfig>,
    documents: Arc<RwLock<DocumentTable>>,
}

impl Analysis {
    /// Scope in effect at a position.
    pub fn scope_at(
        &self,
        id: DocumentId,
        version: u64,
        line: u32,
        column: u32,
        cancel: &CancellationToken,
    ) -> Result<ScopeId, RequestError> {
        let document = self.document(id, version, cancel)?;
        let offset = offset_of(&document, line, column)?;
        Ok(document.scope_at(offset))
    }

    /// Get completions at a position.
    pub fn completions(
        &self,
        id: DocumentId,
        version: u64,
        line: u32,
        column: u32,
        cancel: &CancellationToken,
    ) -> Result<CompletionResponse, RequestError> {
        let document = self.document(id, version, cancel)?;
        let offset = offset_of(&document, line, column)?;
        let request = self.request(&document, offset);
        self.ensure_live(id, version, cancel)?;
        self.registry.complete(&request, cancel)
    }

    /// Get hover information at a position.
    pub fn hover(
        &self,
        id: DocumentId,
        version: u64,
        line: u32,
        column: u32,
        cancel: &CancellationToken,
    ) -> Result<Option<HoverResult>, RequestError> {
        let document = self.document(id, version, cancel)?;
        let offset = offset_of(&document, line, column)?;
        let request = self.request(&document, offset);
        self.ensure_live(id, version, cancel)?;
        self.registry.hover(&request, cancel)
    }

    /// Structural diagnostics plus everything the diagnostics handlers report.
    pub fn diagnostics(
        &self,
        id: DocumentId,
        version: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, RequestError> {
        let document = self.document(id, version, cancel)?;
        self.ensure_live(id, version, cancel)?;
        collect_diagnostics(&self.registry, &document, &self.config, cancel)
    }

    fn request<'a>(&'a self, document: &'a DocumentAnalysis, offset: u32) -> SuggestionRequest<'a> {
        SuggestionRequest::new(
            document,
            self.registry.catalog(),
            &*self.schema,
            &self.config,
            offset,
        )
    }

    /// The published pass for `version`.
    fn document(
        &self,
        id: DocumentId,
        version: u64,
        cancel: &CancellationToken,
    ) -> Result<Arc<DocumentAnalysis>, RequestError> {
        if cancel.is_cancelled() {
            debug!(document = id.0, version, "request cancelled before assembly");
            return Err(RequestError::Cancelled);
        }
        let document = self
            .documents
            .read()
            .documents
            .get(&id)
            .cloned()
            .ok_or(RequestError::UnknownDocument(id))?;
        if document.version != version {
            debug!(document = id.0, version, current = document.version, "stale request");
            return Err(RequestError::StaleVersion {
                requested: version,
                current: document.version,
            });
        }
        Ok(document)
    }

    /// Fail if the request was cancelled or its version replaced meanwhile.
    fn ensure_live(
        &self,
        id: DocumentId,
        version: u64,
        cancel: &CancellationToken,
    ) -> Result<(), RequestError> {
        self.document(id, version, cancel).map(|_| ())
    }
}

fn offset_of(document: &DocumentAnalysis, line: u32, column: u32) -> Result<u32, RequestError> {
    document
        .lines
        .offset(&document.text, LineCol { line, col: column })
        .map(u32::from)
        .ok_or(RequestError::PositionOutOfRange { line, column })
}
