use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use wallmark_core::{calculate_luminance, Bitmap, PixelLayout};

/// A gradient wallpaper with rows padded like a decoded image
fn wallpaper(width: usize, height: usize) -> Vec<u8> {
    let stride = width * 4 + 16;
    let mut data = vec![0u8; stride * height];
    for y in 0..height {
        for x in 0..width {
            let px = y * stride + x * 4;
            data[px] = (x % 256) as u8;
            data[px + 1] = (y % 256) as u8;
            data[px + 2] = ((x + y) % 256) as u8;
            data[px + 3] = 0xff;
        }
    }
    data
}

fn bench_luminance(c: &mut Criterion) {
    let mut group = c.benchmark_group("luminance");
    for (name, width, height) in [("small_256x32", 256, 32), ("fhd_1920x1080", 1920, 1080)] {
        let data = wallpaper(width, height);
        let bitmap = Bitmap::new(width, height, width * 4 + 16, PixelLayout::Rgba, &data).unwrap();
        group.bench_function(name, |b| b.iter(|| black_box(calculate_luminance(&bitmap))));
    }
    group.finish();
}

criterion_group!(luminance_benches, bench_luminance);
criterion_main!(luminance_benches);
