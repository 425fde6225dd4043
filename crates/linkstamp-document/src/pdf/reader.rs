// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect existing PDF documents using the `lopdf`
// crate: page count, the text runs a page's content shows, and the URI
// targets of its link annotations.

use std::path::{Path, PathBuf};

use linkstamp_core::error::{LinkstampError, Result};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

use super::objects::{dict_of, resolve};
use super::winansi;

/// Read-only view of a parsed PDF.
///
/// The session uses it to learn page counts; export checks use it to look at
/// what the composer wrote.
pub struct PdfReader {
    document: Document,
    /// Where the bytes came from, when read from disk.
    origin: Option<PathBuf>,
}

impl PdfReader {
    /// Parse the PDF at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let origin = path.as_ref().to_path_buf();
        let document = Document::load(&origin).map_err(|err| {
            LinkstampError::DocumentParse(format!("{}: {}", origin.display(), err))
        })?;
        Ok(Self::parsed(document, Some(origin)))
    }

    /// Parse a PDF held in memory.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes)
            .map_err(|err| LinkstampError::DocumentParse(err.to_string()))?;
        Ok(Self::parsed(document, None))
    }

    fn parsed(document: Document, origin: Option<PathBuf>) -> Self {
        debug!(
            pages = document.get_pages().len(),
            version = %document.version,
            "document parsed"
        );
        Self { document, origin }
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// File the reader was opened from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Strings shown by `Tj` operators on a page (1-indexed), in content order.
    ///
    /// Bytes are decoded as WinAnsi, the encoding the composer writes.
    pub fn page_text_runs(&self, page_number: u32) -> Result<Vec<String>> {
        let content = self.page_content(page_number)?;
        Ok(content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(winansi::decode(bytes)),
                _ => None,
            })
            .collect())
    }

    /// Every content-stream operator on a page (1-indexed), in order.
    pub fn page_operators(&self, page_number: u32) -> Result<Vec<String>> {
        let content = self.page_content(page_number)?;
        Ok(content
            .operations
            .into_iter()
            .map(|op| op.operator)
            .collect())
    }

    /// URI targets of the /Link annotations on a page (1-indexed), in /Annots order.
    pub fn page_link_uris(&self, page_number: u32) -> Result<Vec<String>> {
        let page_id = self.page_id(page_number)?;
        let page = dict_of(&self.document, page_id)?;

        let annots = match page.get(b"Annots") {
            Ok(annots) => resolve(&self.document, annots)?,
            Err(_) => return Ok(Vec::new()),
        };
        let Object::Array(items) = annots else {
            return Ok(Vec::new());
        };

        let mut uris = Vec::new();
        for item in items {
            let Ok(annotation) = resolve(&self.document, item)?.as_dict() else {
                continue;
            };
            if let Some(uri) = self.link_uri(annotation)? {
                uris.push(uri);
            }
        }
        Ok(uris)
    }

    fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        self.document
            .get_pages()
            .get(&page_number)
            .copied()
            .ok_or(LinkstampError::InvalidPageNumber(page_number))
    }

    fn page_content(&self, page_number: u32) -> Result<Content> {
        let page_id = self.page_id(page_number)?;
        let bytes = self.document.get_page_content(page_id).map_err(|err| {
            LinkstampError::DocumentParse(format!(
                "cannot read content of page {}: {}",
                page_number, err
            ))
        })?;
        Content::decode(&bytes).map_err(|err| {
            LinkstampError::DocumentParse(format!(
                "cannot decode content of page {}: {}",
                page_number, err
            ))
        })
    }

    fn link_uri(&self, annotation: &Dictionary) -> Result<Option<String>> {
        match annotation.get(b"Subtype") {
            Ok(Object::Name(name)) if name == b"Link" => {}
            _ => return Ok(None),
        }
        let action = match annotation.get(b"A") {
            Ok(action) => resolve(&self.document, action)?,
            Err(_) => return Ok(None),
        };
        let uri = action
            .as_dict()
            .ok()
            .and_then(|action| action.get(b"URI").ok())
            .map(|uri| resolve(&self.document, uri))
            .transpose()?;
        Ok(match uri {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
    }
}
