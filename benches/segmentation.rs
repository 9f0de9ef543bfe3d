use criterion::{Criterion, black_box, criterion_group, criterion_main};
use depth_planes::normals::NormalEstimator;
use depth_planes::projection::project_parallel;
use depth_planes::tools::two_wall_depth;
use depth_planes::{
    AcceleratedSegmenter, CpuSegmenter, Intrinsics, PlaneSegmenter, SegmentationConfig,
};

mod common;

fn bench_segmenters_vga(c: &mut Criterion) {
    let cloud = project_parallel(&two_wall_depth(640, 480, 6000, 12000), &Intrinsics::default());
    let normals = NormalEstimator::default().compute(&cloud);

    let cpu = CpuSegmenter::new(SegmentationConfig::default());
    c.bench_function("region_growing_640x480", |b| {
        b.iter(|| cpu.segment(black_box(&cloud), black_box(&normals)))
    });

    let accelerated = AcceleratedSegmenter::default();
    c.bench_function("label_propagation_640x480", |b| {
        b.iter(|| accelerated.label(black_box(&cloud), black_box(&normals)))
    });
}

fn bench_labeled_frame_vga(c: &mut Criterion) {
    let depth = two_wall_depth(640, 480, 6000, 12000);
    c.bench_function("segment_planes_labeled_640x480", |b| {
        b.iter(|| {
            let mut frame = depth_planes::Frame::from_depth_image(
                black_box(&depth),
                &Intrinsics::default(),
            );
            frame.segment_planes_labeled()
        })
    });
}

fn bench_dataset_frames(c: &mut Criterion) {
    let frames = common::load_dataset_frames();
    if frames.is_empty() {
        return;
    }
    let mut group = c.benchmark_group("dataset");
    group.sample_size(10);
    group.bench_function("segment_planes", |b| {
        b.iter(|| {
            for (_, frame) in &frames {
                let mut frame = frame.clone();
                black_box(frame.segment_planes(0.02, 3.0, 0.001).ok());
            }
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_segmenters_vga,
    bench_labeled_frame_vga,
    bench_dataset_frames
);
criterion_main!(benches);
