// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export composer — stamps link annotations onto the pages of an existing PDF
// using `lopdf`.
//
// For every (page, annotation) pair two text runs are written at fixed
// coordinates: the caption in the caption colour and the link text in the link
// colour, optionally underlined and covered by a clickable /Link annotation.
//
// With `ExportScope::EveryPage` (the default) every annotation lands on every
// page, whatever page it was attached to. That coupling is the established
// export behaviour and is kept; `ExportScope::AttachedPage` is the opt-in
// alternative.

use linkstamp_core::config::{ExportScope, OverlayStyle};
use linkstamp_core::error::{LinkstampError, Result};
use linkstamp_core::types::Annotation;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument, warn};

use super::objects::{dict_of, dict_of_mut, page_content_entries, page_resources, push_annotation};
use super::winansi;

/// Prefix for the font resource name registered on each page.
const FONT_RESOURCE_PREFIX: &str = "LsHelv";

/// Stroke width of the rule drawn under link text, in points.
const UNDERLINE_WIDTH: f32 = 0.75;

/// Distance between the text baseline and the underline, in points.
const UNDERLINE_DROP: f32 = 1.5;

/// What a composition wrote, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Pages in the exported document.
    pub pages: usize,
    /// Pages that received at least one annotation.
    pub stamped_pages: usize,
    /// Text runs written across all pages (two per page/annotation pair).
    pub text_runs: usize,
    /// /Link annotations attached across all pages.
    pub links: usize,
    /// Characters written as `?` because Helvetica cannot encode them.
    pub replaced_chars: usize,
}

/// Produces annotated copies of PDF documents.
///
/// The composer never mutates its input: each call parses the source bytes
/// into a fresh document model and serialises a new byte vector.
#[derive(Debug, Clone, Default)]
pub struct ExportComposer {
    style: OverlayStyle,
    scope: ExportScope,
}

impl ExportComposer {
    pub fn new(style: OverlayStyle, scope: ExportScope) -> Self {
        Self { style, scope }
    }

    /// Compose an annotated copy of `source` and return its bytes.
    ///
    /// Fails with [`LinkstampError::DocumentParse`] when `source` is not a PDF
    /// and [`LinkstampError::DocumentSerialize`] when the result cannot be
    /// written. Nothing is returned on failure.
    pub fn compose(&self, source: &[u8], annotations: &[Annotation]) -> Result<Vec<u8>> {
        self.compose_with_summary(source, annotations)
            .map(|(bytes, _)| bytes)
    }

    /// Like [`ExportComposer::compose`], also reporting what was written.
    #[instrument(skip_all, fields(source_bytes = source.len(), annotations = annotations.len(), scope = ?self.scope))]
    pub fn compose_with_summary(
        &self,
        source: &[u8],
        annotations: &[Annotation],
    ) -> Result<(Vec<u8>, ExportSummary)> {
        let mut document = Document::load_mem(source).map_err(|err| {
            LinkstampError::DocumentParse(format!("failed to load source PDF: {}", err))
        })?;

        // lopdf pages are keyed by 1-indexed page number, in document order.
        let pages = document.get_pages();
        let mut summary = ExportSummary {
            pages: pages.len(),
            ..ExportSummary::default()
        };

        let mut shared_font: Option<ObjectId> = None;

        for (&page_number, &page_id) in &pages {
            let stamped: Vec<&Annotation> = annotations
                .iter()
                .filter(|annotation| self.writes_onto(annotation, page_number))
                .collect();
            if stamped.is_empty() {
                continue;
            }

            let font_id = *shared_font.get_or_insert_with(|| document.add_object(helvetica_font()));
            let font_name = register_font(&mut document, page_id, font_id)?;

            let mut overlay = Vec::with_capacity(stamped.len() * 16);
            overlay.push(Operation::new("q", vec![]));
            for annotation in &stamped {
                let placed = self.place(annotation);
                summary.replaced_chars += placed.replaced;
                self.push_runs(&mut overlay, &font_name, &placed);
                summary.text_runs += 2;

                if self.style.clickable_links {
                    let link_id = document.add_object(link_annotation(&placed));
                    push_annotation(&mut document, page_id, link_id)?;
                    summary.links += 1;
                }
            }
            overlay.push(Operation::new("Q", vec![]));

            let encoded = Content {
                operations: overlay,
            }
            .encode()
            .map_err(|err| {
                LinkstampError::DocumentSerialize(format!(
                    "failed to encode overlay for page {}: {}",
                    page_number, err
                ))
            })?;
            append_isolated(&mut document, page_id, encoded)?;

            summary.stamped_pages += 1;
            debug!(page_number, annotations = stamped.len(), "page stamped");
        }

        if summary.replaced_chars > 0 {
            warn!(
                replaced = summary.replaced_chars,
                "characters outside WinAnsi were written as '?'"
            );
        }

        let mut output = Vec::new();
        document.save_to(&mut output).map_err(|err| {
            LinkstampError::DocumentSerialize(format!("failed to serialise annotated PDF: {}", err))
        })?;

        info!(
            pages = summary.pages,
            stamped_pages = summary.stamped_pages,
            text_runs = summary.text_runs,
            links = summary.links,
            output_bytes = output.len(),
            "export composed"
        );

        Ok((output, summary))
    }

    fn writes_onto(&self, annotation: &Annotation, page_number: u32) -> bool {
        match self.scope {
            ExportScope::EveryPage => true,
            ExportScope::AttachedPage => annotation.page_number() == page_number,
        }
    }

    /// Resolve where the caption and link of `annotation` go.
    fn place(&self, annotation: &Annotation) -> PlacedAnnotation {
        let caption = winansi::encode(&self.style.caption);
        let link = winansi::encode(annotation.link());
        let link_x = self.style.x + self.style.link_offset;
        let link_width = winansi::estimated_width(link.bytes.len(), self.style.font_size);

        PlacedAnnotation {
            replaced: caption.replaced + link.replaced,
            caption: caption.bytes,
            link: link.bytes,
            uri: annotation.link().to_owned(),
            link_rect: [
                link_x,
                self.style.y - UNDERLINE_DROP * 2.0,
                link_x + link_width,
                self.style.y + self.style.font_size,
            ],
        }
    }

    fn push_runs(&self, ops: &mut Vec<Operation>, font_name: &[u8], placed: &PlacedAnnotation) {
        let style = &self.style;
        let size = style.font_size;
        let link_x = style.x + style.link_offset;

        push_text_run(ops, font_name, size, style.caption_color, style.x, style.y, &placed.caption);
        push_text_run(ops, font_name, size, style.link_color, link_x, style.y, &placed.link);

        if style.underline && !placed.link.is_empty() {
            let [r, g, b] = style.link_color;
            let rule_y = style.y - UNDERLINE_DROP;
            ops.push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
            ops.push(Operation::new("w", vec![UNDERLINE_WIDTH.into()]));
            ops.push(Operation::new("m", vec![link_x.into(), rule_y.into()]));
            ops.push(Operation::new("l", vec![placed.link_rect[2].into(), rule_y.into()]));
            ops.push(Operation::new("S", vec![]));
        }
    }
}

/// Caption and link of one annotation, encoded and positioned.
struct PlacedAnnotation {
    caption: Vec<u8>,
    link: Vec<u8>,
    uri: String,
    /// Clickable area of the link run: [llx, lly, urx, ury].
    link_rect: [f32; 4],
    replaced: usize,
}

fn push_text_run(
    ops: &mut Vec<Operation>,
    font_name: &[u8],
    size: f32,
    [r, g, b]: [f32; 3],
    x: f32,
    y: f32,
    text: &[u8],
) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font_name.to_vec()), size.into()],
    ));
    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text.to_vec())]));
    ops.push(Operation::new("ET", vec![]));
}

/// Standard 14 Helvetica, no embedding required.
fn helvetica_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    }
}

fn link_annotation(placed: &PlacedAnnotation) -> Dictionary {
    let [llx, lly, urx, ury] = placed.link_rect;
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![llx.into(), lly.into(), urx.into(), ury.into()],
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => dictionary! {
            "Type" => "Action",
            "S" => "URI",
            "URI" => Object::string_literal(placed.uri.as_bytes().to_vec()),
        },
    }
}

/// Register `font_id` in the page's font resources and return the name it is
/// reachable under from the page's content.
///
/// An existing entry pointing at `font_id` is reused; a name already taken by
/// another font is never overwritten.
fn register_font(document: &mut Document, page_id: ObjectId, font_id: ObjectId) -> Result<Vec<u8>> {
    let (resources_id, mut resources) = page_resources(document, page_id)?;

    let (fonts_id, mut fonts) = match resources.get(b"Font") {
        Ok(Object::Reference(id)) => (Some(*id), dict_of(document, *id)?.clone()),
        Ok(Object::Dictionary(dict)) => (None, dict.clone()),
        _ => (None, Dictionary::new()),
    };

    let name = free_font_name(&fonts, font_id);
    fonts.set(name.clone(), Object::Reference(font_id));

    match fonts_id {
        Some(id) => {
            document.objects.insert(id, Object::Dictionary(fonts));
        }
        None => resources.set("Font", Object::Dictionary(fonts)),
    }
    match resources_id {
        Some(id) => {
            document.objects.insert(id, Object::Dictionary(resources));
        }
        None => dict_of_mut(document, page_id)?.set("Resources", Object::Dictionary(resources)),
    }

    Ok(name)
}

fn free_font_name(fonts: &Dictionary, font_id: ObjectId) -> Vec<u8> {
    let mut suffix = 0u32;
    loop {
        let candidate = if suffix == 0 {
            FONT_RESOURCE_PREFIX.as_bytes().to_vec()
        } else {
            format!("{}{}", FONT_RESOURCE_PREFIX, suffix).into_bytes()
        };
        match fonts.get(&candidate) {
            Err(_) => return candidate,
            Ok(Object::Reference(id)) if *id == font_id => return candidate,
            Ok(_) => suffix += 1,
        }
    }
}

/// Append `overlay` to the page's content, wrapping the existing content in a
/// `q`/`Q` pair so graphics state it leaves behind does not move the overlay.
fn append_isolated(document: &mut Document, page_id: ObjectId, overlay: Vec<u8>) -> Result<()> {
    let existing = page_content_entries(document, page_id)?;
    let mut contents = Vec::with_capacity(existing.len() + 3);

    if !existing.is_empty() {
        let save_id = document.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let restore_id = document.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        contents.push(Object::Reference(restore_id));
    }

    let overlay_id = document.add_object(Stream::new(Dictionary::new(), overlay));
    contents.push(Object::Reference(overlay_id));

    dict_of_mut(document, page_id)?.set("Contents", Object::Array(contents));
    Ok(())
}
