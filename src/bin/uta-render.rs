//! uta-render - render a UTAU or OpenUtau sequence to WAV
//!
//! ```text
//! uta-render --ust song.ust --out song.wav --voicebank voices/teto
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uta::export::BitDepth;
use uta::voicebank::Voicebank;
use uta::{Session, SessionConfig};

#[derive(Parser)]
#[command(name = "uta-render")]
#[command(about = "Render a UTAU sequence (.ust or .ustx) to WAV")]
#[command(version)]
struct Cli {
    /// Input .ust or .ustx file
    #[arg(long)]
    ust: PathBuf,

    /// Output .wav file
    #[arg(short, long)]
    out: PathBuf,

    /// Voicebank directory or oto.ini (default timing when omitted)
    #[arg(long)]
    voicebank: Option<PathBuf>,

    /// Session TOML file with [render] and [export] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Master gain (linear)
    #[arg(long)]
    gain: Option<f32>,

    /// Worker cap (0 = hardware concurrency)
    #[arg(long)]
    workers: Option<usize>,

    /// Tempo in BPM, overriding the UST
    #[arg(long)]
    tempo: Option<f64>,

    /// Sample format: 16, 24 or 32f
    #[arg(long)]
    bit_depth: Option<String>,

    /// Skip peak normalization
    #[arg(long)]
    no_normalize: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Session file values with command-line overrides applied.
    fn session_config(&self) -> uta::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };

        if let Some(rate) = self.sample_rate {
            config.render.sample_rate = rate;
        }
        if let Some(gain) = self.gain {
            config.render.master_gain = gain;
        }
        if let Some(workers) = self.workers {
            config.render.max_workers = workers;
        }
        if let Some(bpm) = self.tempo {
            config = config.with_tempo(bpm);
        }
        if let Some(depth) = &self.bit_depth {
            // reject typos before rendering
            depth.parse::<BitDepth>()?;
            config.export.bit_depth = depth.clone();
        }
        if self.no_normalize {
            config.export.normalize = false;
        }

        config.render.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> uta::Result<()> {
    let config = cli.session_config()?;

    let bank = match &cli.voicebank {
        Some(path) => {
            let bank = Voicebank::load(path)?;
            tracing::info!(
                aliases = bank.len(),
                singer = bank.name().unwrap_or("unknown"),
                "loaded voicebank"
            );
            bank
        }
        None => {
            tracing::warn!("no voicebank given, using default timing");
            Voicebank::new()
        }
    };

    let session = Session::new(config);
    let result = session.render_ust_file(&cli.ust, &bank)?;
    let summary = session.export(&result, &cli.out)?;

    println!(
        "Rendered {:.2}s to {} ({} workers, {:.1} ms, gain {:.2})",
        result.duration_seconds(),
        cli.out.display(),
        result.worker_count,
        result.elapsed.as_secs_f64() * 1000.0,
        summary.gain
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
