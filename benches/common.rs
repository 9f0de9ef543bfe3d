#![allow(dead_code)]

use depth_planes::tools::{bench_limit_from_env, dataset_iter, dataset_root_from_env};
use depth_planes::{Frame, Intrinsics};
use std::path::PathBuf;

pub fn collect_dataset_images() -> (PathBuf, Vec<PathBuf>) {
    let root = dataset_root_from_env();
    let limit = bench_limit_from_env();

    let images: Vec<PathBuf> = dataset_iter(&root, limit).collect();
    (root, images)
}

/// Frames for every decodable image in the dataset
pub fn load_dataset_frames() -> Vec<(PathBuf, Frame)> {
    let (root, images) = collect_dataset_images();
    if images.is_empty() {
        eprintln!("No depth images under {}, skipping dataset benches", root.display());
    }
    images
        .into_iter()
        .filter_map(|path| {
            Frame::from_depth_file(&path, &Intrinsics::default())
                .ok()
                .map(|frame| (path, frame))
        })
        .collect()
}
