use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use silhouette_image::Image;
use silhouette_overlay::{dilate_mask, run_overlay_image, OverlayParams, ResourceLimits};

fn bench_dilate_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dilate Mask");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for sigma in [0.0, 4.0].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let parameter_string = format!("{}x{}x{}", width, height, sigma);

            // a filled rectangle in the middle of the mask
            let mut mask = Image::<bool, 1>::from_size_val([*width, *height].into(), false).unwrap();
            for y in height / 4..3 * height / 4 {
                for x in width / 4..3 * width / 4 {
                    mask.as_slice_mut()[y * width + x] = true;
                }
            }

            group.bench_with_input(
                BenchmarkId::new("dilate_mask_disk4", &parameter_string),
                &mask,
                |b, i| b.iter(|| black_box(dilate_mask(i, 4, 1, *sigma))),
            );
        }
    }
    group.finish();
}

fn bench_run_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("Run Overlay");

    for (width, height) in [(128, 128), (256, 224)].iter() {
        let parameter_string = format!("{}x{}", width, height);

        let data = (0..width * height * 3)
            .map(|i| ((i / 3) % 251) as u8)
            .collect();
        let source = Image::<u8, 3>::new([*width, *height].into(), data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("run_overlay_default", &parameter_string),
            &source,
            |b, i| {
                b.iter(|| {
                    black_box(run_overlay_image(
                        i.clone(),
                        &OverlayParams::default(),
                        &ResourceLimits::default(),
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_dilate_mask, bench_run_overlay);
criterion_main!(benches);
