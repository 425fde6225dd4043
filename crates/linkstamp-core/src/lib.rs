// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Linkstamp — Core types, the annotation store, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod integrity;
pub mod store;
pub mod types;

pub use config::{AppConfig, ExportScope, OverlayStyle};
pub use error::LinkstampError;
pub use store::AnnotationStore;
pub use types::*;
