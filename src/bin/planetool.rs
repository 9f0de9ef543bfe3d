use clap::{Args, Parser, Subcommand};
use depth_planes::projection::load_depth_image;
use depth_planes::segmentation::PALETTE;
use depth_planes::tools::{
    bench_limit_from_env, color_histogram, dataset_iter, dataset_root_from_env, depth_stats,
    describe_region,
};
use depth_planes::{AcceleratedSegmenter, CpuSegmenter, Frame, Intrinsics, SegmentationConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "planetool", version, about = "Depth-frame plane segmentation tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Copy)]
struct CameraArgs {
    #[arg(long, default_value_t = 525.0)]
    fx: f32,
    #[arg(long, default_value_t = 525.0)]
    fy: f32,
    #[arg(long, default_value_t = 319.5)]
    cx: f32,
    #[arg(long, default_value_t = 239.5)]
    cy: f32,
}

#[derive(Args, Clone, Copy)]
struct ThresholdArgs {
    /// Plane offset tolerance between neighbors, in meters
    #[arg(long, default_value_t = 0.02)]
    distance: f32,
    /// Normal angle tolerance between neighbors, in degrees
    #[arg(long, default_value_t = 3.0)]
    angle: f32,
    /// Accepted but not enforced
    #[arg(long, default_value_t = 0.001)]
    curvature: f32,
}

#[derive(Subcommand)]
enum Command {
    /// Region-growing segmentation of a single depth image
    Segment {
        #[arg(long)]
        depth: PathBuf,
        #[command(flatten)]
        camera: CameraArgs,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
    /// Label propagation on a single depth image; prints points per color
    Label {
        #[arg(long)]
        depth: PathBuf,
        #[command(flatten)]
        camera: CameraArgs,
    },
    /// Print raw depth statistics
    Stats {
        #[arg(long)]
        depth: PathBuf,
    },
    /// Time both segmenters over a directory of depth images
    DatasetBench {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        camera: CameraArgs,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Segment {
            depth,
            camera,
            thresholds,
        } => segment_cmd(&depth, camera, thresholds),
        Command::Label { depth, camera } => label_cmd(&depth, camera),
        Command::Stats { depth } => stats_cmd(&depth),
        Command::DatasetBench {
            root,
            limit,
            camera,
        } => dataset_bench_cmd(root, limit, camera),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn intrinsics(camera: CameraArgs) -> depth_planes::Result<Intrinsics> {
    Intrinsics::new(camera.fx, camera.fy, camera.cx, camera.cy)
}

fn segment_cmd(depth: &Path, camera: CameraArgs, t: ThresholdArgs) -> depth_planes::Result<()> {
    let mut frame = Frame::from_depth_file(depth, &intrinsics(camera)?)?;
    println!("Depth: {} ({}x{})", depth.display(), frame.width(), frame.height());

    let start = Instant::now();
    let regions = frame.plane_regions(t.distance, t.angle, t.curvature)?;
    println!("Found {} planes in {:?}", regions.len(), start.elapsed());
    for (i, region) in regions.iter().enumerate() {
        println!("  {}", describe_region(i, region));
    }
    Ok(())
}

fn label_cmd(depth: &Path, camera: CameraArgs) -> depth_planes::Result<()> {
    let mut frame = Frame::from_depth_file(depth, &intrinsics(camera)?)?;
    println!("Depth: {} ({}x{})", depth.display(), frame.width(), frame.height());

    let start = Instant::now();
    let colored = frame.segment_planes_labeled()?;
    println!("Labeled {} points in {:?}", colored.len(), start.elapsed());
    for (rgb, count) in PALETTE.iter().zip(color_histogram(&colored)) {
        println!("  ({:3}, {:3}, {:3}): {}", rgb[0], rgb[1], rgb[2], count);
    }
    Ok(())
}

fn stats_cmd(depth: &Path) -> depth_planes::Result<()> {
    let image = load_depth_image(depth)?;
    let stats = depth_stats(&image);
    println!("Depth: {} ({}x{})", depth.display(), image.width(), image.height());
    println!(
        "Range: {}-{} ticks, mean: {:.1}, missing: {}/{}",
        stats.min, stats.max, stats.mean, stats.zero_count, stats.total
    );
    Ok(())
}

fn dataset_bench_cmd(
    root: Option<PathBuf>,
    limit: Option<usize>,
    camera: CameraArgs,
) -> depth_planes::Result<()> {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let k = intrinsics(camera)?;
    let cpu = CpuSegmenter::new(SegmentationConfig::default());
    let accelerated = AcceleratedSegmenter::default();

    let mut frames = 0usize;
    let mut cpu_total = 0.0f64;
    let mut accelerated_total = 0.0f64;
    for path in dataset_iter(&root, limit) {
        let mut frame = match Frame::from_depth_file(&path, &k) {
            Ok(frame) => frame,
            Err(err) => {
                eprintln!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };

        let start = Instant::now();
        let planes = frame.segment(&cpu)?.region_count();
        let cpu_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let components = frame.segment(&accelerated)?.region_count();
        let accelerated_ms = start.elapsed().as_secs_f64() * 1000.0;

        println!(
            "{}: cpu {} planes {:.2}ms, accelerated {} planes {:.2}ms",
            path.display(),
            planes,
            cpu_ms,
            components,
            accelerated_ms
        );
        frames += 1;
        cpu_total += cpu_ms;
        accelerated_total += accelerated_ms;
    }

    if frames == 0 {
        println!("No depth images found under {}", root.display());
        return Ok(());
    }
    println!(
        "Frames: {}  avg cpu: {:.2}ms  avg accelerated: {:.2}ms",
        frames,
        cpu_total / frames as f64,
        accelerated_total / frames as f64
    );
    Ok(())
}
