//! TTSVid main entry point
//!
//! Collects the narration form from the command line, validates it before
//! any engine is started, then synthesizes every quote and writes a single
//! WAV file.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use ttsvid::audio::WavEncoding;
use ttsvid::config::Config;
use ttsvid::form::{FormData, FormInput, QuotesSource};
use ttsvid::narrate::{generate, OutputSettings};
use ttsvid::speech::{create_engine, Backend, Device};
use ttsvid::TtsvidError;

#[derive(Parser)]
#[command(name = "ttsvid", version)]
#[command(about = "Narrate a list of quotes in a cloned presenter voice", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.ttsvid.cfg)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs to ttsvid.log
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all quotes
    Generate(FormArgs),
    /// Generate the first few quotes
    Preview {
        #[command(flatten)]
        form: FormArgs,
        /// Number of quotes to generate
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(Args)]
struct FormArgs {
    /// Presenter voice sample used to clone the speaking voice
    #[arg(long)]
    voice: Option<PathBuf>,

    /// Quotes, one per line
    #[arg(long, conflicts_with = "quotes_file")]
    quotes: Option<String>,

    /// Text file with one quote per line
    #[arg(long)]
    quotes_file: Option<PathBuf>,

    /// Seconds of silence between quotes (0-5)
    #[arg(long, allow_hyphen_values = true)]
    pause: Option<i64>,

    /// Output WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    engine: Option<Backend>,

    #[arg(long, value_enum)]
    device: Option<Device>,

    /// Language code passed to the engine
    #[arg(long)]
    language: Option<String>,

    #[arg(long, value_enum)]
    encoding: Option<WavEncoding>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    if cli.debug {
        // Debug mode: write to ttsvid.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("ttsvid.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open ttsvid.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "TTSVid version {} starting (debug mode, logging to ttsvid.log)",
            ttsvid::VERSION
        );
    } else {
        // Normal mode: progress on stderr, overridable with RUST_LOG
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    info!("Configuration loaded from {:?}", config.path());

    let (args, preview) = match cli.command {
        Commands::Generate(args) => (args, None),
        Commands::Preview { form, count } => (form, Some(count.unwrap_or(config.preview_size()))),
    };

    let input = FormInput {
        presenter_voice: args.voice.clone().unwrap_or_default(),
        quotes: match (&args.quotes, &args.quotes_file) {
            (_, Some(file)) => QuotesSource::File(file.clone()),
            (text, None) => QuotesSource::Text(text.clone().unwrap_or_default()),
        },
        pause_seconds: args.pause.unwrap_or_else(|| config.pause_seconds()),
    };

    // Nothing is synthesized until the whole form is valid
    let checked = input.validate().and_then(|form| match preview {
        Some(count) => {
            info!("Preview: generating the first {} quote(s)", count);
            form.preview(count)
        }
        None => Ok(form),
    });
    let form: FormData = match checked {
        Ok(form) => form,
        Err(TtsvidError::Validation(problems)) => {
            eprintln!("Error:");
            for problem in problems {
                eprintln!("  {}", problem);
            }
            process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let mut settings = config
        .engine_settings()
        .context("invalid engine configuration")?;
    if let Some(backend) = args.engine {
        settings.backend = backend;
    }
    if let Some(device) = args.device {
        settings.device = device;
    }
    if let Some(language) = args.language {
        settings.language = language;
    }

    let output = OutputSettings {
        path: args.output.unwrap_or_else(|| config.output_path()),
        encoding: match args.encoding {
            Some(encoding) => encoding,
            None => config.encoding().context("invalid output configuration")?,
        },
    };

    let mut engine = create_engine(&settings).context("failed to start speech engine")?;
    let report = generate(engine.as_mut(), &form, &settings.language, &output)?;

    println!("Audio generated to '{}'", report.output.display());
    Ok(())
}
