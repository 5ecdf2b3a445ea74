//! Benchmarks for mask synthesis and compositing
//!
//! Both transforms are pure, per-pixel CPU work; these benches track the
//! cost of the hard, feathered-graded, and feathered-binary paths over a
//! realistically sized frame.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbaImage};
use person_cutout::{composite, EdgeSmoothing, MaskColor, MaskSynthesizer, SegmentationMap};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;

fn binary_map() -> SegmentationMap {
    let labels: Vec<bool> = (0..WIDTH * HEIGHT)
        .map(|i| (i % WIDTH) < WIDTH / 2)
        .collect();
    SegmentationMap::from_labels(&labels, (WIDTH, HEIGHT)).unwrap()
}

fn graded_map() -> SegmentationMap {
    let data: Vec<u8> = (0..WIDTH * HEIGHT)
        .map(|i| ((i % WIDTH) * 255 / WIDTH) as u8)
        .collect();
    SegmentationMap::new(data, (WIDTH, HEIGHT)).unwrap()
}

fn source_image() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        WIDTH,
        HEIGHT,
        image::Rgba([180, 120, 90, 255]),
    ))
}

fn bench_mask_synthesis(c: &mut Criterion) {
    let binary = binary_map();
    let graded = graded_map();
    let fg = MaskColor::opaque_white();
    let bg = MaskColor::transparent_black();

    c.bench_function("synthesize_hard_512", |b| {
        let synthesizer = MaskSynthesizer::new(fg, bg, EdgeSmoothing::Disabled);
        b.iter(|| synthesizer.synthesize(black_box(&binary), WIDTH, HEIGHT).unwrap());
    });

    c.bench_function("synthesize_feathered_graded_512", |b| {
        let synthesizer = MaskSynthesizer::new(fg, bg, EdgeSmoothing::Feathered { radius: 2 });
        b.iter(|| synthesizer.synthesize(black_box(&graded), WIDTH, HEIGHT).unwrap());
    });

    c.bench_function("synthesize_feathered_binary_512", |b| {
        let synthesizer = MaskSynthesizer::new(fg, bg, EdgeSmoothing::Feathered { radius: 2 });
        b.iter(|| synthesizer.synthesize(black_box(&binary), WIDTH, HEIGHT).unwrap());
    });
}

fn bench_composite(c: &mut Criterion) {
    let source = source_image();
    let synthesizer = MaskSynthesizer::new(
        MaskColor::opaque_white(),
        MaskColor::transparent_black(),
        EdgeSmoothing::Disabled,
    );
    let mask = synthesizer.synthesize(&binary_map(), WIDTH, HEIGHT).unwrap();

    c.bench_function("composite_512", |b| {
        b.iter(|| composite(black_box(&source), black_box(&mask)).unwrap());
    });
}

criterion_group!(benches, bench_mask_synthesis, bench_composite);
criterion_main!(benches);
