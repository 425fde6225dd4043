// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for export composition in the linkstamp-document crate.
// Stamps growing annotation lists onto a 20-page generated document.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem};

use linkstamp_core::Annotation;
use linkstamp_document::ExportComposer;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn sample_document(pages: usize) -> Vec<u8> {
    let mut doc = PdfDocument::new("Linkstamp bench");
    let pages = (1..=pages)
        .map(|page| {
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
                    items: vec![TextItem::Text(format!("Page {page}"))],
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

fn annotations(count: u32) -> Vec<Annotation> {
    (1..=count)
        .map(|i| Annotation::new(format!("https://example.org/ref/{i}"), i % 20 + 1))
        .collect::<Result<_, _>>()
        .expect("valid annotations")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_compose(c: &mut Criterion) {
    let source = sample_document(20);
    let composer = ExportComposer::default();

    let mut group = c.benchmark_group("compose (20 pages)");
    for count in [1u32, 10, 50] {
        let list = annotations(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &list, |b, list| {
            b.iter(|| {
                let bytes = composer
                    .compose(black_box(&source), black_box(list))
                    .expect("compose");
                black_box(bytes);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);
