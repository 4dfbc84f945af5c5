use anyhow::{Context, Result};
use binary_snake::eval::{self, Summary};
use binary_snake::{AppConfig, BinaryNetwork, EpisodeReport, FileStore, FrameRender, SnakeGame};
use clap::Parser;
use pixels::{Pixels, SurfaceTexture};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

#[derive(Debug, Parser)]
#[command(name = "binary-snake", about = "Play snake episodes with a binary-weighted policy")]
struct Cli {
    /// JSON configuration file; missing fields fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of headless episodes, seeded `seed..seed + episodes`.
    #[arg(long, default_value_t = 1)]
    episodes: u64,
    /// Overrides `episode.seed` from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "weights")]
    weights_dir: PathBuf,
    /// Restore the network saved under this name instead of drawing a fresh one.
    #[arg(long)]
    restore: Option<String>,
    #[arg(long)]
    save: Option<String>,
    /// Watch a single episode in a window instead of running headless.
    #[arg(long)]
    window: bool,
}

#[derive(Serialize)]
struct SeededReport<'a> {
    seed: u64,
    #[serde(flatten)]
    report: &'a EpisodeReport,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.episode.seed = seed;
    }
    config.episode.validate()?;

    let mut store = FileStore::new(&cli.weights_dir);
    let shape = config.network.shape();
    let brain = match &cli.restore {
        Some(name) => BinaryNetwork::restore(&shape, config.network.activation, &store, name)
            .with_context(|| format!("restoring `{name}` from {}", store.dir().display()))?,
        None => {
            let mut rng = StdRng::seed_from_u64(config.network.seed);
            BinaryNetwork::random(&shape, config.network.activation, &mut rng)?
        }
    };
    if let Some(name) = &cli.save {
        brain.save(&mut store, name)?;
        info!(path = %store.path_for(name).display(), "saved network");
    }

    if cli.window {
        return run_window(config, brain);
    }

    let seeds: Vec<u64> = (0..cli.episodes).map(|i| config.episode.seed + i).collect();
    let reports = eval::evaluate(&brain, &config.episode, &seeds)?;
    for (&seed, report) in seeds.iter().zip(&reports) {
        println!("{}", serde_json::to_string(&SeededReport { seed, report })?);
    }
    let summary = Summary::of(&reports);
    info!(
        episodes = summary.episodes,
        mean_score = summary.mean_score,
        best_score = summary.best_score,
        mean_steps = summary.mean_steps,
        "evaluation finished"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run_window(config: AppConfig, brain: BinaryNetwork) -> Result<()> {
    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();

    let mut seed = config.episode.seed;
    let mut game = SnakeGame::new(&config.episode)?;
    let frame_render = FrameRender::new(config.window.cell_px, game.snake().landscape().size());
    let (width, height) = frame_render.pixel_size();

    let window = WindowBuilder::new()
        .with_title("binary snake")
        .with_inner_size(LogicalSize::new(width, height))
        .with_resizable(false)
        .build(&event_loop)?;

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(width, height, surface_texture)?
    };

    let tick = Duration::from_millis(config.window.tick_ms);
    let mut last_update = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Event::RedrawRequested(_) = event {
            frame_render.draw_into(pixels.frame_mut(), game.snake().landscape());
            if let Err(e) = pixels.render() {
                error!(error = %e, "render failed");
                *control_flow = ControlFlow::Exit;
                return;
            }
        }

        if input.update(&event) {
            if input.key_pressed(VirtualKeyCode::Escape) || input.close_requested() || input.destroyed() {
                *control_flow = ControlFlow::Exit;
                return;
            }

            // next seed, same network
            if input.key_pressed(VirtualKeyCode::R) {
                seed += 1;
                match SnakeGame::new(&config.episode.with_seed(seed)) {
                    Ok(g) => game = g,
                    Err(e) => {
                        error!(error = %e, "cannot restart episode");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                }
            }

            if !game.is_finished() && last_update.elapsed() >= tick {
                match game.step(&brain) {
                    Ok(Some(termination)) => {
                        info!(seed, score = game.score(), steps = game.num_steps(), ?termination, "episode over, R for next")
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!(error = %e, "episode aborted");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                }
                last_update = Instant::now();
            }

            window.request_redraw();
        }
    });
}
