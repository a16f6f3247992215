use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use form_coach::testing::{shallow_squat_frames, squat_rep_frames};
use form_coach::{sample_and_score, AppConfig, Exercise, PoseFrame, TrackingSession};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

#[derive(Parser, Debug)]
#[command(
    name = "form_coach_cli",
    about = "Offline scoring and replay harness for recorded pose sessions"
)]
struct Cli {
    /// Optional JSON config overriding tracker thresholds and sampling
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a recorded session and emit the analysis report as JSON
    Analyze {
        /// Recorded pose stream (JSON array of frames)
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "squat")]
        exercise: Exercise,
        #[arg(long, default_value_t = 30)]
        native_fps: u32,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay a recorded session through the live tracker, streaming feedback
    Track {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "squat")]
        exercise: Exercise,
    },
    /// Write a synthetic squat session for harness testing
    Generate {
        #[arg(long, default_value_t = 3)]
        reps: usize,
        /// Bottom knee angle; above 100 produces a depth issue on analysis
        #[arg(long)]
        shallow: Option<f32>,
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    // keep stdout clean for JSON output
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .map(AppConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Analyze {
            input,
            exercise,
            native_fps,
            output,
        } => run_analyze(&config, &input, exercise, native_fps, output),
        Commands::Track { input, exercise } => run_track(&config, &input, exercise),
        Commands::Generate {
            reps,
            shallow,
            output,
        } => run_generate(reps, shallow, &output),
    }
}

fn load_frames(path: &PathBuf) -> Result<Vec<PoseFrame>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let frames: Vec<PoseFrame> =
        serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(frames)
}

fn run_analyze(
    config: &AppConfig,
    input: &PathBuf,
    exercise: Exercise,
    native_fps: u32,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let frames = load_frames(input)?;
    let report = sample_and_score(&frames, native_fps, exercise, config)
        .with_context(|| format!("scoring {}", input.display()))?;

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = output {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(ExitCode::from(0))
}

fn run_track(config: &AppConfig, input: &PathBuf, exercise: Exercise) -> Result<ExitCode> {
    let frames = load_frames(input)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut session = TrackingSession::new(exercise, config);
        let mut events = BroadcastStream::new(session.subscribe());

        let feeder = tokio::task::spawn_blocking(move || {
            for frame in &frames {
                session.process_frame(frame);
            }
            // dropping the session closes the stream
            session.progress()
        });

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(lagged) => eprintln!("Warning: feedback stream lagged: {lagged}"),
            }
        }

        let progress = feeder.await?;
        println!("{}", serde_json::to_string(&progress)?);
        Ok(ExitCode::from(0))
    })
}

fn run_generate(reps: usize, shallow: Option<f32>, output: &PathBuf) -> Result<ExitCode> {
    let frames = match shallow {
        Some(bottom_knee) => shallow_squat_frames(reps, bottom_knee),
        None => squat_rep_frames(reps, 3),
    };
    let json = serde_json::to_string_pretty(&frames)?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {} frames to {}", frames.len(), output.display());
    Ok(ExitCode::from(0))
}
