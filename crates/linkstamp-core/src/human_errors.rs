// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the interactive shell.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::LinkstampError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing happened; the action was ignored.
    Ignored,
    /// User must do something first (pick a file, wait for an export).
    ActionRequired,
    /// Cannot be fixed by retrying: the file itself is the problem.
    Permanent,
    /// Something went wrong outside the document (disk, permissions).
    Environment,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `LinkstampError` into a `HumanError`.
pub fn humanize_error(err: &LinkstampError) -> HumanError {
    match err {
        LinkstampError::NoFileSelected => HumanError {
            message: "No PDF is open.".into(),
            suggestion: "Open a PDF with `open <path>` first.".into(),
            severity: Severity::ActionRequired,
        },

        LinkstampError::EmptyAnnotationInput => HumanError {
            message: "The link is empty.".into(),
            suggestion: "Type a link with `link <url>` before adding it.".into(),
            severity: Severity::Ignored,
        },

        LinkstampError::InvalidPageNumber(page) => HumanError {
            message: format!("Page {page} does not exist."),
            suggestion: "Page numbers start at 1.".into(),
            severity: Severity::Ignored,
        },

        LinkstampError::DocumentParse(_) => HumanError {
            message: "This file could not be read as a PDF.".into(),
            suggestion: "The file may be damaged or not a PDF at all. Try opening it in a PDF viewer, or pick a different file.".into(),
            severity: Severity::Permanent,
        },

        LinkstampError::DocumentSerialize(_) => HumanError {
            message: "The annotated PDF could not be written.".into(),
            suggestion: "Nothing was saved. The source PDF may use features that cannot be rewritten; try a different file.".into(),
            severity: Severity::Permanent,
        },

        LinkstampError::ExportInProgress => HumanError {
            message: "An export is already running.".into(),
            suggestion: "Wait for it to finish, then export again.".into(),
            severity: Severity::ActionRequired,
        },

        LinkstampError::BackgroundTask(_) => HumanError {
            message: "A background task stopped unexpectedly.".into(),
            suggestion: "Try again. If it keeps failing, run with RUST_LOG=debug and check the log.".into(),
            severity: Severity::Permanent,
        },

        LinkstampError::InvalidCommand(detail) => HumanError {
            message: "That command wasn't understood.".into(),
            suggestion: format!("Type `help` to see the available commands. ({detail})"),
            severity: Severity::ActionRequired,
        },

        LinkstampError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied.".into(),
                suggestion: "Check the file and folder permissions, or choose another output folder with --out-dir.".into(),
                severity: Severity::Environment,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                severity: Severity::Environment,
            },
        },

        LinkstampError::Serialization(_) => HumanError {
            message: "The settings file could not be read or written.".into(),
            suggestion: "Check config.json for typos, or delete it to go back to the defaults.".into(),
            severity: Severity::Environment,
        },
    }
}
