// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// linkstamp-document — PDF handling for Linkstamp.
//
// Provides document inspection (page count, text runs, link targets) and the
// export composer that stamps link annotations onto the pages of a PDF.

pub mod pdf;

// Re-export the primary structs so callers can use `linkstamp_document::PdfReader` etc.
pub use pdf::composer::{ExportComposer, ExportSummary};
pub use pdf::reader::PdfReader;
