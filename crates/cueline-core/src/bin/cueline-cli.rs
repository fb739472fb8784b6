use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cueline_core::{
    Engine, SortKey, UsageConfig,
    diagnostics::init_tracing,
    time::frames_to_timecode,
};

#[derive(Debug, Parser)]
#[command(name = "cueline-cli")]
#[command(about = "Headless region-usage extraction from Pro Tools text exports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse an export and print or write the usage listing.
    Extract {
        input: PathBuf,

        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        include_frames: bool,

        #[arg(long)]
        ignore_fade: bool,

        /// Drop regions shorter than this many frames (0 disables).
        #[arg(long, default_value_t = 0)]
        min_length: u64,

        #[arg(long)]
        strip_extension: bool,

        #[arg(long)]
        strip_new: bool,

        #[arg(long)]
        combine_similar: bool,

        #[arg(long, value_enum, default_value = "time")]
        sort: SortArg,

        /// Emit the usage entries as JSON instead of the plain listing.
        #[arg(long)]
        json: bool,
    },
    /// Print session header facts and boundaries.
    Info { input: PathBuf },
}

#[derive(Debug, Clone, ValueEnum)]
enum SortArg {
    Name,
    Time,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => Self::ByName,
            SortArg::Time => Self::ByFirstFrame,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _telemetry = init_tracing(&cli.log_dir)?;

    match cli.command {
        Commands::Extract {
            input,
            output,
            include_frames,
            ignore_fade,
            min_length,
            strip_extension,
            strip_new,
            combine_similar,
            sort,
            json,
        } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read export: {}", input.display()))?;
            let file_name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());

            let config = UsageConfig {
                ignore_fade,
                ignore_shorter_than: min_length,
                strip_extension_suffix: strip_extension,
                strip_new_suffix: strip_new,
                combine_similar,
                sort_key: sort.into(),
                ..UsageConfig::default()
            };

            let engine = Engine::load(&text, &file_name, config)?;
            let report = if json {
                serde_json::to_string_pretty(engine.usages())
                    .context("failed to encode usage listing as json")?
            } else {
                format!(
                    "{}\n\n{}",
                    engine.report_title(),
                    engine.render_listing(include_frames)?
                )
            };

            match output {
                Some(path) => {
                    fs::write(&path, report)
                        .with_context(|| format!("failed to write report: {}", path.display()))?;
                    tracing::info!(path = %path.display(), "report written");
                }
                None => print!("{report}"),
            }
        }
        Commands::Info { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read export: {}", input.display()))?;
            let file_name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());

            let engine = Engine::load(&text, &file_name, UsageConfig::default())?;
            let session = engine.session();
            println!("title:        {}", session.title);
            println!("frame rate:   {} fps", session.frame_rate);
            println!("sample rate:  {} Hz", session.sample_rate);
            println!("tracks:       {}", session.tracks.len());
            println!("regions:      {}", session.region_count());
            println!(
                "boundaries:   {} .. {}",
                frames_to_timecode(session.start_frame, session.frame_rate, true)?,
                frames_to_timecode(session.stop_frame, session.frame_rate, true)?,
            );
            if session.skipped_lines > 0 {
                println!("skipped:      {} unrecognized lines", session.skipped_lines);
            }
        }
    }

    Ok(())
}
