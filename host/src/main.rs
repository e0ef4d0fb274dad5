use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use host::config::{parse_u32_maybe_hex, GameOverrides, HostConfig};
use host::demo;
use host::render::{JsonLinesRenderer, LogRenderer, Renderer};
use host::runner::run_session;
use host::source::{write_recording, RecordingSource};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "archery")]
#[command(about = "Pinch-and-release archery over recorded hand-tracking sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the game loop over a recorded session
    Play {
        #[arg(long)]
        input: PathBuf,
        /// Write one JSON render snapshot per frame
        #[arg(long)]
        render_out: Option<PathBuf>,
        /// Target RNG seed, decimal or 0x-prefixed hex
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        calibration_frames: Option<u32>,
        /// Arrow speed in pixels per frame
        #[arg(long)]
        speed: Option<f32>,
    },
    /// Synthesize a scripted recording: calibrate, then aim and release
    Demo {
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 5)]
        shots: u32,
        #[arg(long)]
        seed: Option<String>,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let Cli { command } = Cli::parse();
    let host = HostConfig::from_env()?;

    match command {
        Commands::Play {
            input,
            render_out,
            seed,
            calibration_frames,
            speed,
        } => {
            let host = host.with_overrides(GameOverrides {
                seed: seed.as_deref().map(parse_seed).transpose()?,
                calibration_frames,
                arrow_speed_px: speed,
            })?;
            let mut source = RecordingSource::open(&input)?;
            let mut renderer: Box<dyn Renderer> = match &render_out {
                Some(path) => Box::new(JsonLinesRenderer::create(path)?),
                None => Box::new(LogRenderer),
            };

            let summary = run_session(&mut source, renderer.as_mut(), host.game)
                .with_context(|| format!("session over {} failed", input.display()))?;

            println!("input={}", input.display());
            if let Some(path) = render_out {
                println!("render_out={}", path.display());
            }
            println!("frames={}", summary.frames);
            println!("score={}", summary.score);
            println!("shots={}", summary.stats.shots);
            println!("hits={}", summary.stats.hits);
            println!("misses={}", summary.stats.misses);
            println!("timed_relocations={}", summary.stats.timed_relocations);
            println!("threshold={:.2}", summary.calibration.threshold);
            println!("final_rng_state=0x{:08x}", summary.final_rng_state);
            println!("quit={}", summary.quit);
        }
        Commands::Demo {
            output,
            shots,
            seed,
        } => {
            let host = host.with_overrides(GameOverrides {
                seed: seed.as_deref().map(parse_seed).transpose()?,
                ..GameOverrides::default()
            })?;
            let artifact = demo::generate(host.game, shots)?;
            write_recording(&output, &artifact.recording)?;

            let metrics = &artifact.metrics;
            println!("output={}", output.display());
            println!("seed=0x{:08x}", metrics.seed);
            println!("frames={}", metrics.frame_count);
            println!("shots={}", metrics.shots);
            println!("hits={}", metrics.hits);
            println!("threshold={:.2}", metrics.calibrated_threshold);
            println!("final_rng_state=0x{:08x}", metrics.final_rng_state);
        }
        Commands::Config => {
            println!(
                "{}",
                serde_json::to_string_pretty(&host).context("failed to serialize config")?
            );
        }
    }

    Ok(())
}

fn parse_seed(value: &str) -> Result<u32> {
    parse_u32_maybe_hex(value.trim()).ok_or_else(|| anyhow!("invalid seed '{value}'"))
}
