// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotation store — the in-memory, insertion-ordered list of every link
// annotation created during a session.
//
// `for_page` filters on every call; there is no per-page index to keep in sync.

use tracing::debug;

use crate::types::Annotation;

/// Ordered collection of annotations. Insertion order is draw order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `{link, page_number}`.
    ///
    /// Returns `false` without touching the store when the link is blank or
    /// the page number is 0.
    pub fn add(&mut self, link: &str, page_number: u32) -> bool {
        match Annotation::new(link, page_number) {
            Ok(annotation) => {
                debug!(page_number, total = self.annotations.len() + 1, "annotation added");
                self.annotations.push(annotation);
                true
            }
            Err(err) => {
                debug!(page_number, reason = %err, "annotation ignored");
                false
            }
        }
    }

    /// Annotations attached to `page_number`, in insertion order.
    pub fn for_page(&self, page_number: u32) -> impl Iterator<Item = &Annotation> + '_ {
        self.annotations
            .iter()
            .filter(move |annotation| annotation.page_number() == page_number)
    }

    /// Every annotation, in insertion order.
    pub fn all(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links_on(store: &AnnotationStore, page: u32) -> Vec<String> {
        store.for_page(page).map(|a| a.link().to_owned()).collect()
    }

    #[test]
    fn for_page_returns_matching_subset_in_order() {
        let mut store = AnnotationStore::new();
        let adds = [
            ("http://a", 1),
            ("http://b", 2),
            ("http://c", 1),
            ("http://d", 3),
            ("http://e", 1),
        ];
        for (link, page) in adds {
            assert!(store.add(link, page));
        }

        assert_eq!(links_on(&store, 1), ["http://a", "http://c", "http://e"]);
        assert_eq!(links_on(&store, 2), ["http://b"]);
        assert_eq!(links_on(&store, 3), ["http://d"]);
        assert!(links_on(&store, 4).is_empty());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn blank_links_never_change_the_view() {
        let mut store = AnnotationStore::new();
        store.add("http://a", 1);
        let before: Vec<_> = (1..=3).map(|p| links_on(&store, p)).collect();

        assert!(!store.add("", 1));
        assert!(!store.add("   ", 2));
        assert!(!store.add("\t", 3));

        let after: Vec<_> = (1..=3).map(|p| links_on(&store, p)).collect();
        assert_eq!(before, after);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut store = AnnotationStore::new();
        store.add("http://a", 2);
        store.add("http://a", 2);
        assert_eq!(links_on(&store, 2), ["http://a", "http://a"]);
    }

    #[test]
    fn page_zero_is_ignored() {
        let mut store = AnnotationStore::new();
        assert!(!store.add("http://a", 0));
        assert!(store.is_empty());
    }

    #[test]
    fn all_preserves_insertion_order_across_pages() {
        let mut store = AnnotationStore::new();
        store.add("http://b", 2);
        store.add("http://a", 1);
        let pages: Vec<u32> = store.all().iter().map(Annotation::page_number).collect();
        assert_eq!(pages, [2, 1]);
    }
}
