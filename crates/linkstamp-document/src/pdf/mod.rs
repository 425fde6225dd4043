// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — inspecting existing PDFs and composing annotated exports.

pub mod composer;
pub mod reader;

mod objects;
mod winansi;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use composer::{ExportComposer, ExportSummary};
pub use reader::PdfReader;
