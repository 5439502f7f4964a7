//! Portfolio backdrop CLI - Run an animation headless and print statistics.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use portfolio_backdrop::{
    compute::SimRng,
    controller::{ManualScheduler, RenderLoop},
    registry,
    render::RecordingSurface,
    schema::BackdropConfig,
};

struct Args {
    animation: String,
    frames: u64,
    width: f32,
    height: f32,
    seed: Option<u64>,
    clicks: u64,
    config: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            animation: registry::default_entry().id.to_string(),
            frames: 600,
            width: 1280.0,
            height: 720.0,
            seed: None,
            clicks: 0,
            config: None,
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [options]");
    eprintln!();
    eprintln!("Run a backdrop animation against an in-memory surface.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --animation ID  Registry id to run (default: first registered)");
    eprintln!("  --frames N      Display frames to simulate (default: 600)");
    eprintln!("  --width W       Surface width in pixels (default: 1280)");
    eprintln!("  --height H      Surface height in pixels (default: 720)");
    eprintln!("  --seed S        Fixed RNG seed");
    eprintln!("  --clicks N      Random clicks spread over the run (default: 0)");
    eprintln!("  --config FILE   JSON configuration overrides");
    eprintln!("  --example       Print the default configuration and exit");
    eprintln!("  --list          List registered animations and exit");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    fn value<'a>(
        iter: &mut impl Iterator<Item = &'a String>,
        flag: &str,
    ) -> Result<&'a String, String> {
        iter.next().ok_or_else(|| format!("Missing value for {flag}"))
    }
    fn number<T: std::str::FromStr>(raw: &str, flag: &str) -> Result<T, String> {
        raw.parse().map_err(|_| format!("Invalid value for {flag}: {raw}"))
    }

    let mut parsed = Args::default();
    let mut iter = args.iter().skip(1);
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--animation" => parsed.animation = value(&mut iter, flag)?.clone(),
            "--frames" => parsed.frames = number(value(&mut iter, flag)?, flag)?,
            "--width" => parsed.width = number(value(&mut iter, flag)?, flag)?,
            "--height" => parsed.height = number(value(&mut iter, flag)?, flag)?,
            "--seed" => parsed.seed = Some(number(value(&mut iter, flag)?, flag)?),
            "--clicks" => parsed.clicks = number(value(&mut iter, flag)?, flag)?,
            "--config" => parsed.config = Some(PathBuf::from(value(&mut iter, flag)?)),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(parsed)
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--example") => {
            print_example_config();
            return;
        }
        Some("--list") => {
            for entry in registry::entries() {
                println!("{:<20} {}", entry.id, entry.display_name);
            }
            return;
        }
        Some("--help" | "-h") => {
            print_usage(&args[0]);
            return;
        }
        _ => {}
    }

    let opts = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        print_usage(&args[0]);
        std::process::exit(1);
    });

    let mut config = match &opts.config {
        Some(path) => BackdropConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }),
        None => BackdropConfig::default(),
    };
    if opts.seed.is_some() {
        config.rng_seed = opts.seed;
    }

    if registry::find(&opts.animation).is_none() {
        eprintln!(
            "Unknown animation {:?}; use --list to see the registered ids",
            opts.animation
        );
        std::process::exit(1);
    }

    let mut click_rng = match config.rng_seed {
        Some(seed) => SimRng::new(seed ^ 0x5eed),
        None => SimRng::random(),
    };

    println!("Portfolio Backdrop");
    println!("==================");
    println!("Animation: {}", opts.animation);
    println!("Surface: {}x{}", opts.width, opts.height);
    println!("Frames: {}", opts.frames);
    println!("Clicks: {}", opts.clicks);
    if let Some(seed) = config.rng_seed {
        println!("Seed: {seed}");
    }
    println!();

    let mut surface = RecordingSurface::new(opts.width, opts.height);
    let mut looper = RenderLoop::new(ManualScheduler::new(), config);
    looper.switch_to(&opts.animation);
    looper.mount(opts.width, opts.height);

    let population = |looper: &RenderLoop<ManualScheduler>| {
        looper.simulation().map_or(0, |s| s.population())
    };
    println!("Initial population: {}", population(&looper));
    println!();

    let click_every = if opts.clicks == 0 {
        u64::MAX
    } else {
        (opts.frames / opts.clicks).max(1)
    };
    let mut clicks_sent = 0;

    println!("Running animation...");
    let start = Instant::now();
    let mut total_shapes = 0usize;

    for i in 0..opts.frames {
        if !looper.scheduler_mut().take() {
            log::warn!("no frame requested after frame {i}");
            break;
        }
        looper.on_frame(&mut surface);
        total_shapes += surface.shape_count();

        if clicks_sent < opts.clicks && (i + 1) % click_every == 0 {
            let x = click_rng.uniform(0.0, opts.width);
            let y = click_rng.uniform(0.0, opts.height);
            looper.click(x, y, (0.0, 0.0));
            clicks_sent += 1;
        }

        // Print progress every 10%
        if (i + 1) % (opts.frames / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Frame {}/{}: population={}, shapes={}, {:.1} frames/s",
                i + 1,
                opts.frames,
                population(&looper),
                surface.shape_count(),
                (i + 1) as f32 / elapsed
            );
        }
    }

    let elapsed = start.elapsed();
    let frames_run = looper.scheduler().requests().saturating_sub(1);

    println!();
    println!("Final population: {}", population(&looper));
    println!("Clicks delivered: {clicks_sent}");
    println!(
        "Shapes drawn: {} ({:.1} per frame)",
        total_shapes,
        total_shapes as f64 / frames_run.max(1) as f64
    );
    println!(
        "Time: {:.2}s ({:.1} frames/s)",
        elapsed.as_secs_f32(),
        frames_run as f32 / elapsed.as_secs_f32()
    );

    looper.unmount();
}

fn print_example_config() {
    let config = BackdropConfig::default();

    println!("Example configuration (backdrop.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing config: {e}");
            std::process::exit(1);
        }
    }
}
