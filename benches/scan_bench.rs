use borderscan::{EdgeBorderScanner, IntensityGrid, ScanOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// 2000x1500 page: 120-pixel uniform frame around checkerboard content
fn framed_page() -> IntensityGrid {
    let (width, height, frame) = (2000u32, 1500u32, 120u32);
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let inside = x >= frame && x < width - frame && y >= frame && y < height - frame;
            if !inside {
                245
            } else if (x + y) % 2 == 0 {
                0
            } else {
                255
            }
        })
        .collect();
    IntensityGrid::from_raw(width, height, data).unwrap()
}

fn bench_scan(c: &mut Criterion) {
    let grid = framed_page();
    let scanner = EdgeBorderScanner::new(ScanOptions::default());

    c.bench_function("detect_framed_page", |b| {
        b.iter(|| scanner.detect(black_box(&grid)))
    });
    c.bench_function("removal_depths_framed_page", |b| {
        b.iter(|| scanner.removal_depths(black_box(&grid)))
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
