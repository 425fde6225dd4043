// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editing session — the single owner of the annotation store and the session
// state (selected document, current page, link draft, export in flight).
//
// Every user control maps to one method here; nothing else mutates the store.

use std::sync::Arc;

use linkstamp_core::error::{LinkstampError, Result};
use linkstamp_core::integrity::short_fingerprint;
use linkstamp_core::types::{Annotation, SessionId};
use linkstamp_core::AnnotationStore;
use linkstamp_document::{ExportComposer, ExportSummary, PdfReader};
use tracing::{debug, info, warn};

/// A document picked by the user, with what is known about it.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    name: String,
    bytes: Arc<[u8]>,
    /// `None` when the bytes could not be parsed; export will then fail.
    page_count: Option<u32>,
    fingerprint: String,
}

impl SourceDocument {
    /// Wrap `bytes`, parsing them once to learn the page count.
    ///
    /// Unparsable input is still accepted, with an unknown page count.
    pub fn inspect(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let fingerprint = short_fingerprint(&bytes);
        let page_count = match PdfReader::from_bytes(&bytes) {
            Ok(reader) => Some(u32::try_from(reader.page_count()).unwrap_or(u32::MAX)),
            Err(err) => {
                warn!(file = %name, %fingerprint, error = %err, "selected file is not a readable PDF");
                None
            }
        };

        Self {
            name,
            bytes: bytes.into(),
            page_count,
            fingerprint,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Snapshot of everything an export needs, detached from the session so the
/// session stays usable while the export runs.
#[derive(Debug, Clone)]
pub struct ExportJob {
    composer: ExportComposer,
    document_name: String,
    source: Arc<[u8]>,
    annotations: Vec<Annotation>,
}

impl ExportJob {
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Compose the annotated document.
    pub fn run(&self) -> Result<(Vec<u8>, ExportSummary)> {
        self.composer
            .compose_with_summary(&self.source, &self.annotations)
    }
}

/// State of one editing session.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    source: Option<SourceDocument>,
    current_page: u32,
    link_draft: String,
    store: AnnotationStore,
    export_in_flight: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let id = SessionId::new();
        debug!(session = %id, "session created");
        Self {
            id,
            source: None,
            current_page: 1,
            link_draft: String::new(),
            store: AnnotationStore::new(),
            export_in_flight: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    // -- Document selection -------------------------------------------------

    /// Replace the selected document.
    ///
    /// The previous document is dropped wholesale. Annotations are kept, and
    /// the current page is clamped into the new document's range.
    pub fn select_file(&mut self, document: SourceDocument) {
        info!(
            session = %self.id,
            file = %document.name,
            fingerprint = %document.fingerprint,
            pages = ?document.page_count,
            "document selected"
        );
        self.source = Some(document);
        self.current_page = self.clamp_page(self.current_page);
    }

    pub fn source(&self) -> Option<&SourceDocument> {
        self.source.as_ref()
    }

    /// Page count of the selected document, when known.
    pub fn total_pages(&self) -> Option<u32> {
        self.source.as_ref().and_then(SourceDocument::page_count)
    }

    // -- Annotations --------------------------------------------------------

    pub fn set_link_text(&mut self, text: impl Into<String>) {
        self.link_draft = text.into();
    }

    pub fn link_text(&self) -> &str {
        &self.link_draft
    }

    /// Attach the link draft to the current page.
    ///
    /// A blank draft is ignored and `false` returned. On success the draft is
    /// cleared.
    pub fn add_annotation(&mut self) -> bool {
        let added = self.store.add(&self.link_draft, self.current_page);
        if added {
            self.link_draft.clear();
        }
        added
    }

    /// Annotations attached to the current page, in insertion order.
    pub fn current_annotations(&self) -> impl Iterator<Item = &Annotation> + '_ {
        self.store.for_page(self.current_page)
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    // -- Navigation ---------------------------------------------------------

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Highest page navigation may reach. Without a known, non-empty page
    /// count only page 1 is reachable.
    fn last_page(&self) -> u32 {
        match self.total_pages() {
            Some(total) if total >= 1 => total,
            _ => 1,
        }
    }

    fn clamp_page(&self, page: u32) -> u32 {
        page.clamp(1, self.last_page())
    }

    /// Jump to `page`, clamped into `[1, total_pages]`. Returns the page
    /// actually selected.
    pub fn set_current_page(&mut self, page: u32) -> u32 {
        let clamped = self.clamp_page(page);
        if clamped != page {
            debug!(requested = page, clamped, "page request clamped");
        }
        self.current_page = clamped;
        clamped
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// Move back one page. Returns `false` at the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Move forward one page. Returns `false` at the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    // -- Export -------------------------------------------------------------

    /// Start an export of the selected document with every annotation.
    ///
    /// Returns `Ok(None)` when no document is selected. Fails with
    /// [`LinkstampError::ExportInProgress`] while a previous export has not
    /// been finished with [`Session::finish_export`].
    pub fn begin_export(&mut self, composer: &ExportComposer) -> Result<Option<ExportJob>> {
        if self.export_in_flight {
            warn!(session = %self.id, "export rejected, another export is in flight");
            return Err(LinkstampError::ExportInProgress);
        }
        let Some(source) = self.source.as_ref() else {
            debug!(session = %self.id, reason = %LinkstampError::NoFileSelected, "export ignored");
            return Ok(None);
        };

        self.export_in_flight = true;
        info!(
            session = %self.id,
            file = %source.name,
            annotations = self.store.len(),
            "export started"
        );

        Ok(Some(ExportJob {
            composer: composer.clone(),
            document_name: source.name.clone(),
            source: Arc::clone(&source.bytes),
            annotations: self.store.all().to_vec(),
        }))
    }

    /// Mark the in-flight export as done, whatever its outcome.
    pub fn finish_export(&mut self) {
        self.export_in_flight = false;
    }

    pub fn is_exporting(&self) -> bool {
        self.export_in_flight
    }

    /// "Page X of Y" line, with `?` for an unknown page count.
    pub fn status_line(&self) -> String {
        let total = match self.total_pages() {
            Some(total) => total.to_string(),
            None => "?".into(),
        };
        let document = self.source.as_ref().map_or("no document", |doc| doc.name());
        format!(
            "Page {} of {} ({}, {} annotation(s) in total)",
            self.current_page,
            total,
            document,
            self.store.len()
        )
    }
}
