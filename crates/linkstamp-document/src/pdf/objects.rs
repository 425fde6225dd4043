// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Object-graph helpers over `lopdf`: resolving page dictionaries, resources,
// content arrays, and annotation arrays.
//
// Structural problems found while walking the graph (a page that is not a
// dictionary, an /Annots entry that is not an array) are reported as
// `DocumentParse`: the source document is malformed.

use linkstamp_core::error::{LinkstampError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Limit on /Parent hops when looking for inherited page attributes.
const MAX_TREE_DEPTH: usize = 32;

pub(crate) fn dict_of(document: &Document, id: ObjectId) -> Result<&Dictionary> {
    document
        .get_object(id)
        .and_then(Object::as_dict)
        .map_err(|err| {
            LinkstampError::DocumentParse(format!("object {:?} is not a dictionary: {}", id, err))
        })
}

pub(crate) fn dict_of_mut(document: &mut Document, id: ObjectId) -> Result<&mut Dictionary> {
    document
        .get_object_mut(id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| {
            LinkstampError::DocumentParse(format!("object {:?} is not a dictionary: {}", id, err))
        })
}

/// Follow a single level of indirection.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).map_err(|err| {
            LinkstampError::DocumentParse(format!("dangling reference {:?}: {}", id, err))
        }),
        other => Ok(other),
    }
}

/// Resource dictionary that applies to a page.
///
/// Returns the object ID when the page itself points at an indirect resource
/// dictionary, so edits can be written back there. Inline and inherited
/// resources come back with `None` and must be stored inline on the page.
pub(crate) fn page_resources(
    document: &Document,
    page_id: ObjectId,
) -> Result<(Option<ObjectId>, Dictionary)> {
    let mut node_id = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let node = dict_of(document, node_id)?;
        match node.get(b"Resources") {
            Ok(Object::Reference(id)) => {
                let resources = dict_of(document, *id)?.clone();
                let owner = (node_id == page_id).then_some(*id);
                return Ok((owner, resources));
            }
            Ok(Object::Dictionary(dict)) => return Ok((None, dict.clone())),
            _ => {}
        }
        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => node_id = *parent,
            _ => break,
        }
    }
    Ok((None, Dictionary::new()))
}

/// Current /Contents entries of a page as a flat list of objects.
pub(crate) fn page_content_entries(document: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = dict_of(document, page_id)?;
    let contents = match page.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Array(items) => Ok(items.clone()),
        Object::Reference(id) => match resolve(document, contents)? {
            // An indirect array of streams is flattened into the page.
            Object::Array(items) => Ok(items.clone()),
            _ => Ok(vec![Object::Reference(*id)]),
        },
        Object::Null => Ok(Vec::new()),
        _ => Err(LinkstampError::DocumentParse(format!(
            "page {:?} has /Contents that is neither a stream nor an array",
            page_id
        ))),
    }
}

/// Append an annotation reference to a page's /Annots array.
pub(crate) fn push_annotation(
    document: &mut Document,
    page_id: ObjectId,
    annotation_id: ObjectId,
) -> Result<()> {
    let existing = dict_of(document, page_id)?.get(b"Annots").ok().cloned();

    match existing {
        Some(Object::Reference(array_id)) => match document.get_object_mut(array_id) {
            Ok(Object::Array(items)) => items.push(Object::Reference(annotation_id)),
            _ => {
                return Err(LinkstampError::DocumentParse(format!(
                    "/Annots of page {:?} does not reference an array",
                    page_id
                )));
            }
        },
        Some(Object::Array(mut items)) => {
            items.push(Object::Reference(annotation_id));
            dict_of_mut(document, page_id)?.set("Annots", Object::Array(items));
        }
        _ => {
            dict_of_mut(document, page_id)?.set(
                "Annots",
                Object::Array(vec![Object::Reference(annotation_id)]),
            );
        }
    }
    Ok(())
}
