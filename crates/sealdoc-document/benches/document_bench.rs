// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the sealdoc-document crate: page layout, page
// rendering, and stamping a rendered page.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};

use sealdoc_core::{DocumentRequest, LabelSet, PaperSize, Rectangle};
use sealdoc_document::{FontSource, LayoutEngine, PdfWriter, composite_bytes};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A request with a dozen wrapped paragraphs, Latin-1 only so the builtin
/// font can render it.
fn request() -> DocumentRequest {
    let paragraph = "The committee has reviewed the application and agrees to proceed \
                     with the proposal under the conditions set out below. "
        .repeat(3);
    DocumentRequest {
        document_number: "2024-001".into(),
        title: "Notice".into(),
        recipient_name: "Zhang".into(),
        recipient_honorific: "Mr.".into(),
        body: vec![paragraph; 12].join("\n"),
        handler_name: "Li".into(),
        contact_phone: "555-0100".into(),
        stamp_image: None,
        output_dir: std::env::temp_dir(),
    }
}

/// 200x200 red ring with a transparent background.
fn stamp_png() -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(200, 200, Rgba([0, 0, 0, 0]));
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let (dx, dy) = (x as f64 - 100.0, y as f64 - 100.0);
        let r = (dx * dx + dy * dy).sqrt();
        if (80.0..95.0).contains(&r) {
            *pixel = Rgba([210, 30, 30, 255]);
        }
    }
    let mut buffer = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode stamp");
    buffer.into_inner()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_layout_and_render(c: &mut Criterion) {
    let font = FontSource::builtin();
    let request = request();

    c.bench_function("layout (12 paragraphs)", |b| {
        b.iter(|| {
            let plan = LayoutEngine::new(&font, LabelSet::English).plan(black_box(&request));
            black_box(plan.anchor);
        });
    });

    let plan = LayoutEngine::new(&font, LabelSet::English).plan(&request);
    c.bench_function("render page (12 paragraphs)", |b| {
        b.iter(|| {
            let bytes = PdfWriter::new(PaperSize::A4)
                .render(black_box(&plan.program), &font)
                .expect("render");
            black_box(bytes);
        });
    });
}

fn bench_stamp(c: &mut Criterion) {
    let font = FontSource::builtin();
    let plan = LayoutEngine::new(&font, LabelSet::English).plan(&request());
    let source = PdfWriter::a4().render(&plan.program, &font).expect("render");
    let stamp = stamp_png();

    c.bench_function("composite stamp (200x200 RGBA)", |b| {
        b.iter(|| {
            let bytes = composite_bytes(
                black_box(&source),
                1,
                Rectangle::new(150.0, 200.0, 40.0),
                black_box(&stamp),
            )
            .expect("composite");
            black_box(bytes);
        });
    });
}

criterion_group!(benches, bench_layout_and_render, bench_stamp);
criterion_main!(benches);
