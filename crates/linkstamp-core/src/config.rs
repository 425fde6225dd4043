// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name every export is delivered under.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "edited_pdf.pdf";

/// Which pages an annotation is written onto during export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    /// Every annotation is written onto every page, whatever page it was
    /// attached to. This is the established export behaviour.
    #[default]
    EveryPage,
    /// An annotation is written only onto the page it was attached to.
    AttachedPage,
}

/// Placement and appearance of the text written for each annotation.
///
/// Coordinates are PDF user-space points from the bottom-left corner of the
/// page. Colours are RGB in the 0.0–1.0 range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Literal text drawn before the link.
    pub caption: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    /// Horizontal distance from the caption origin to the link origin.
    pub link_offset: f32,
    pub caption_color: [f32; 3],
    pub link_color: [f32; 3],
    /// Draw a thin rule under the link text.
    pub underline: bool,
    /// Attach a `/Link` annotation with a URI action over the link text.
    pub clickable_links: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            caption: "Explore here".into(),
            x: 20.0,
            y: 20.0,
            font_size: 12.0,
            link_offset: 100.0,
            caption_color: [0.0, 0.0, 0.0],
            link_color: [0.0, 0.0, 1.0],
            underline: true,
            clickable_links: true,
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the file each export is written to.
    pub export_file_name: String,
    /// Directory exports are delivered into. `None` means the platform
    /// download directory.
    pub download_dir: Option<PathBuf>,
    pub export_scope: ExportScope,
    pub overlay: OverlayStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_file_name: DEFAULT_EXPORT_FILE_NAME.into(),
            download_dir: None,
            export_scope: ExportScope::default(),
            overlay: OverlayStyle::default(),
        }
    }
}
