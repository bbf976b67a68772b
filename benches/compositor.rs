// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use iris_lens::domain::frame::Frame;
use iris_lens::domain::landmark::{EyeSide, Landmark, LandmarkSet, REFINED_POINT_COUNT};
use iris_lens::domain::render::{Density, EnlargementFactor, TextureId};
use iris_lens::domain::texture::Texture;
use iris_lens::infrastructure::render_composite;
use iris_lens::media::Overlay;
use std::f32::consts::TAU;
use std::hint::black_box;

/// A face roughly filling a 720p frame, eyes a third of the way down.
fn face() -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.8, 0.0); REFINED_POINT_COUNT];
    for (side, cx) in [(EyeSide::Left, 0.42), (EyeSide::Right, 0.58)] {
        let contour = side.eyelid_contour();
        for (i, &index) in contour.iter().enumerate() {
            let angle = TAU * i as f32 / contour.len() as f32;
            points[index] = Landmark::new(cx + 0.04 * angle.cos(), 0.4 + 0.02 * angle.sin(), 0.0);
        }
        for (i, index) in side.iris_range().enumerate() {
            let angle = TAU * i as f32 / 5.0;
            points[index] = Landmark::new(cx + 0.012 * angle.cos(), 0.4 + 0.021 * angle.sin(), 0.0);
        }
    }
    LandmarkSet::new(points)
}

fn compositor_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");

    let frame = Frame::filled(1280, 720, [120, 100, 90, 255]);
    let face = face();
    let texture = Texture::from_straight_rgba(
        TextureId::new("bench"),
        "Bench",
        256,
        256,
        [40, 90, 160, 255].repeat(256 * 256),
    )
    .expect("texture");
    let overlay = Overlay::new(
        Some(&texture),
        Density::Medium.opacity(),
        EnlargementFactor::default(),
    );

    group.bench_function("render_720p_with_face", |b| {
        b.iter(|| black_box(render_composite(&frame, Some(&face), &overlay)));
    });

    group.bench_function("render_720p_without_face", |b| {
        b.iter(|| black_box(render_composite(&frame, None, &overlay)));
    });

    group.finish();
}

criterion_group!(benches, compositor_benchmark);
criterion_main!(benches);
