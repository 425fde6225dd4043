// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Linkstamp.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LinkstampError, Result};

/// Unique identifier for an editing session, used as a log correlation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hyperlink attached to a page.
///
/// Immutable once created. The link text is stored exactly as entered; it is
/// only required to contain something other than whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    link: String,
    page_number: u32,
}

impl Annotation {
    /// Validate and build an annotation.
    ///
    /// Fails with [`LinkstampError::EmptyAnnotationInput`] for a blank link and
    /// [`LinkstampError::InvalidPageNumber`] for page 0.
    pub fn new(link: impl Into<String>, page_number: u32) -> Result<Self> {
        let link = link.into();
        if link.trim().is_empty() {
            return Err(LinkstampError::EmptyAnnotationInput);
        }
        if page_number == 0 {
            return Err(LinkstampError::InvalidPageNumber(page_number));
        }
        Ok(Self { link, page_number })
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    /// 1-indexed page the annotation was attached to.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p.{} {}", self.page_number, self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_link_is_rejected() {
        for link in ["", "   ", "\t\n"] {
            let result = Annotation::new(link, 1);
            assert!(matches!(result, Err(LinkstampError::EmptyAnnotationInput)));
        }
    }

    #[test]
    fn page_zero_is_rejected() {
        let result = Annotation::new("http://a", 0);
        assert!(matches!(result, Err(LinkstampError::InvalidPageNumber(0))));
    }

    #[test]
    fn link_is_kept_verbatim() {
        let annotation = Annotation::new(" http://a ", 3).expect("valid");
        assert_eq!(annotation.link(), " http://a ");
        assert_eq!(annotation.page_number(), 3);
    }
}
