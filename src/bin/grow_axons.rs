//! Axon growth utility
//!
//! Grows a forest of axon trees on a UV sphere, flattens it into point and
//! tube buffers, and runs the traveling lights for a number of frames.
//!
//! Usage:
//!     grow_axons [OPTIONS]
//!
//! Options:
//!     -c, --config <FILE>     Growth parameters as JSON (default: built-in)
//!     --seed <SEED>           RNG seed (default: 12345)
//!     -f, --frames <N>        Light frames to simulate at 60 Hz (default: 600)
//!     -l, --lights <N>        Number of traveling lights (default: 3)
//!     --parallel              Grow trees on the rayon thread pool
//!     -o, --output <FILE>     Write a JSON summary
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use neurite::core::{Result, logging};
use neurite::flatten::{PointCloud, TubeMesh, as_bytes, forest_lines};
use neurite::growth::{AxonForest, GrowthParams};
use neurite::light::{LightConfig, LightField, LightSample};
use neurite::mesh::SurfaceMesh;

const FRAME_DT: f32 = 1.0 / 60.0;

fn print_help() {
    eprintln!("grow_axons - Axon growth utility");
    eprintln!();
    eprintln!("Usage: grow_axons [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -c, --config <FILE>     Growth parameters as JSON (default: built-in)");
    eprintln!("    --seed <SEED>           RNG seed (default: 12345)");
    eprintln!("    -f, --frames <N>        Light frames to simulate at 60 Hz (default: 600)");
    eprintln!("    -l, --lights <N>        Number of traveling lights (default: 3)");
    eprintln!("    --parallel              Grow trees on the rayon thread pool");
    eprintln!("    -o, --output <FILE>     Write a JSON summary");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    grow_axons --seed 42 --lights 5 -o summary.json");
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    seed: u64,
    frames: u32,
    lights: usize,
    parallel: bool,
    output: Option<PathBuf>,
}

fn parse_args() -> std::result::Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut parsed = Args {
        config: None,
        seed: 12345,
        frames: 600,
        lights: 3,
        parallel: false,
        output: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                parsed.config = Some(PathBuf::from(value(&args, &mut i, "--config")?));
            }
            "--seed" => {
                let v = value(&args, &mut i, "--seed")?;
                parsed.seed = v.parse().map_err(|_| format!("Invalid seed: {}", v))?;
            }
            "-f" | "--frames" => {
                let v = value(&args, &mut i, "--frames")?;
                parsed.frames = v.parse().map_err(|_| format!("Invalid frame count: {}", v))?;
            }
            "-l" | "--lights" => {
                let v = value(&args, &mut i, "--lights")?;
                parsed.lights = v.parse().map_err(|_| format!("Invalid light count: {}", v))?;
            }
            "--parallel" => parsed.parallel = true,
            "-o" | "--output" => {
                parsed.output = Some(PathBuf::from(value(&args, &mut i, "--output")?));
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(parsed)
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> std::result::Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", flag))
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    params: GrowthParams,
    tree_count: usize,
    node_count: usize,
    edge_count: usize,
    point_count: usize,
    tube_vertex_count: usize,
    line_count: usize,
    frames: u32,
    final_lights: Vec<LightSample>,
}

fn run(args: &Args) -> Result<Summary> {
    let params = match &args.config {
        Some(path) => GrowthParams::load(path)?,
        None => GrowthParams::default(),
    };
    let mesh = SurfaceMesh::uv_sphere(1.0, 48, 24)?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let start = Instant::now();
    let forest = if args.parallel {
        AxonForest::grow_parallel(&mesh, &params, args.seed)?
    } else {
        AxonForest::grow(&mesh, &params, &mut rng)?
    };
    log::info!("Growth took {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);

    let start = Instant::now();
    let points = PointCloud::from_forest(&forest, &mesh, &params, &mut rng)?;
    let tube = TubeMesh::from_forest(&forest, &mesh, &params, &mut rng)?;
    let lines = forest_lines(&forest);
    log::info!(
        "Flattened {} points, {} tube vertices in {:.2}ms",
        points.len(),
        tube.vertex_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    let point_bytes = as_bytes(&points.vertices()).len();
    let tube_bytes = as_bytes(&tube.vertices()).len();
    log::debug!("Vertex buffers: {} bytes points, {} bytes tube", point_bytes, tube_bytes);

    let mut field = LightField::new(&forest, args.lights, LightConfig::default())?;
    for _ in 0..args.frames {
        field.update(FRAME_DT, &mut rng);
    }
    let final_lights = field.samples();
    log::info!(
        "Simulated {} frames: {} lights visible, {} idle",
        args.frames,
        final_lights.len(),
        field.idle_count()
    );

    Ok(Summary {
        seed: args.seed,
        tree_count: forest.len(),
        node_count: forest.node_count(),
        edge_count: forest.edge_count(),
        point_count: points.len(),
        tube_vertex_count: tube.vertex_count(),
        line_count: lines.len(),
        frames: args.frames,
        final_lights,
        params,
    })
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Axon Growth Summary");
    println!("===================");
    println!("  Trees: {}", summary.tree_count);
    println!("  Nodes: {} ({} edges)", summary.node_count, summary.edge_count);
    println!("  Points: {}", summary.point_count);
    println!("  Tube vertices: {}", summary.tube_vertex_count);
    println!("  Visible lights after {} frames: {}", summary.frames, summary.final_lights.len());

    if let Some(path) = &args.output {
        let written = serde_json::to_string_pretty(&summary)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error writing {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("  Output: {}", path.display());
    }
}
