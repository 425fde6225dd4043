// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Small PDFs built in memory for tests. Enabled for dependent crates by the
// `test-fixtures` feature.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem};

fn media_box() -> Object {
    vec![0.into(), 0.into(), 612.into(), 792.into()].into()
}

fn text_stream(text: &str) -> Stream {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    Stream::new(Dictionary::new(), content.encode().expect("encode fixture content"))
}

fn helvetica_resources(doc: &mut Document) -> Dictionary {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    }
}

/// Assemble a page tree from page dictionaries and serialise the document.
fn finish(mut doc: Document, pages_id: ObjectId, mut pages: Vec<Dictionary>, tree_extra: Dictionary) -> Vec<u8> {
    let mut kids = Vec::with_capacity(pages.len());
    for mut page in pages.drain(..) {
        page.set("Type", "Page");
        page.set("Parent", Object::Reference(pages_id));
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut tree = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "MediaBox" => media_box(),
    };
    for (key, value) in tree_extra.iter() {
        tree.set(key.clone(), value.clone());
    }
    doc.objects.insert(pages_id, Object::Dictionary(tree));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("save fixture");
    output
}

/// `count` empty pages with no content and no resources.
pub fn blank_pdf(count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let pages = (0..count).map(|_| Dictionary::new()).collect();
    finish(doc, pages_id, pages, Dictionary::new())
}

/// One page per entry, each showing its text with font resource `F1`.
pub fn text_pdf(texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = helvetica_resources(&mut doc);
    let resources_id = doc.add_object(resources);

    let pages = texts
        .iter()
        .map(|text| {
            let content_id = doc.add_object(text_stream(text));
            dictionary! {
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            }
        })
        .collect();
    finish(doc, pages_id, pages, Dictionary::new())
}

/// One page that already carries a URI link annotation.
pub fn pdf_with_link(uri: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![10.into(), 10.into(), 50.into(), 20.into()],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(uri),
        },
    });
    let page = dictionary! {
        "Annots" => vec![Object::Reference(link_id)],
    };
    finish(doc, pages_id, vec![page], Dictionary::new())
}

/// One page whose font resources are inherited from the page tree node.
pub fn inherited_resources_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = helvetica_resources(&mut doc);
    let content_id = doc.add_object(text_stream("inherited"));
    let page = dictionary! {
        "Contents" => Object::Reference(content_id),
    };
    let tree_extra = dictionary! { "Resources" => resources };
    finish(doc, pages_id, vec![page], tree_extra)
}

/// A document generated by `printpdf`, one page per line of text.
pub fn generated_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = PdfDocument::new("Linkstamp fixture");
    let pages = lines
        .iter()
        .map(|line| {
            let ops = vec![
                Op::StartTextSection,
                Op::SetTextCursor {
                    pos: Point {
                        x: Pt(72.0),
                        y: Pt(720.0),
                    },
                },
                Op::SetFontSizeBuiltinFont {
                    size: Pt(11.0),
                    font: BuiltinFont::Helvetica,
                },
                Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text((*line).to_owned())],
                    font: BuiltinFont::Helvetica,
                },
                Op::EndTextSection,
            ];
            PdfPage::new(Mm(210.0), Mm(297.0), ops)
        })
        .collect();
    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}
