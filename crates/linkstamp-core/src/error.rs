// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Linkstamp.

use thiserror::Error;

/// Top-level error type for all Linkstamp operations.
#[derive(Debug, Error)]
pub enum LinkstampError {
    // -- Validation (handled locally as silent no-ops) --
    #[error("no document selected")]
    NoFileSelected,

    #[error("annotation link is empty")]
    EmptyAnnotationInput,

    #[error("invalid page number {0} (pages start at 1)")]
    InvalidPageNumber(u32),

    // -- Document errors --
    #[error("failed to parse PDF: {0}")]
    DocumentParse(String),

    #[error("failed to write PDF: {0}")]
    DocumentSerialize(String),

    // -- Session --
    #[error("an export is already in progress")]
    ExportInProgress,

    #[error("background task failed: {0}")]
    BackgroundTask(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LinkstampError>;
