//! tonegraph - render, export, audition and bake catalogue tones
//!
//! Run with: cargo run -- list

mod play;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tonegraph::{
    io::{
        export::{quantize_i8, quantized_range, write_raw_file, write_wav},
        record::{record, RecordSettings, TRACKER_SAMPLE_RATE},
        tracker::{default_manifest, BakePipeline, ManifestEntry},
    },
    voices::{self, ToneDef},
};

#[derive(Parser)]
#[command(name = "tonegraph")]
#[command(about = "Render synthesized tones and bake them into tracker modules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tone catalogue
    List,

    /// Record a tone to a file
    Render {
        /// Tone name (see `list`)
        tone: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Wav)]
        format: Format,

        #[command(flatten)]
        note: NoteArgs,
    },

    /// Record a tone and play it on the default output device
    Play {
        tone: String,

        #[command(flatten)]
        note: NoteArgs,
    },

    /// Render tones into the sample slots of a tracker module
    Bake {
        /// Input module
        module: PathBuf,

        /// Output module
        #[arg(short, long)]
        output: PathBuf,

        /// `SLOT=TONE` or `SLOT=TONE:BYTES`; the built-in manifest when omitted
        #[arg(short, long = "entry")]
        entries: Vec<String>,

        /// Render sample rate
        #[arg(long, default_value_t = TRACKER_SAMPLE_RATE)]
        sample_rate: f32,

        /// Noise seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Signed 8-bit raw samples
    Raw,
    /// 16-bit PCM WAV
    Wav,
}

#[derive(clap::Args)]
struct NoteArgs {
    /// Sample rate; the tracker rate for `render`, the device rate for `play`
    #[arg(long)]
    sample_rate: Option<f32>,

    /// Note frequency in Hz (the tone's own when omitted)
    #[arg(long)]
    frequency: Option<f32>,

    /// Recording length in seconds (the tone's own when omitted)
    #[arg(long)]
    duration: Option<f64>,

    /// Noise seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl NoteArgs {
    fn settings(&self, tone: &ToneDef, sample_rate: f32) -> RecordSettings {
        RecordSettings {
            sample_rate: self.sample_rate.unwrap_or(sample_rate),
            duration: self.duration.unwrap_or(tone.duration),
            frequency: self.frequency.unwrap_or(tone.frequency),
            release_after: tone.release_after,
            seed: self.seed,
        }
    }
}

fn find_tone(name: &str) -> Result<ToneDef> {
    voices::find(name).ok_or_else(|| eyre!("no tone named `{name}`; try `tonegraph list`"))
}

/// `SLOT=TONE[:BYTES]`, slot in decimal or `0x` hex.
fn parse_entry(entry: &str) -> Result<ManifestEntry> {
    let (slot, rest) = entry
        .split_once('=')
        .ok_or_else(|| eyre!("entry `{entry}` is not SLOT=TONE"))?;
    let slot = match slot.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => slot.parse(),
    }
    .wrap_err_with(|| format!("bad slot in `{entry}`"))?;

    let (name, samples) = match rest.split_once(':') {
        Some((name, bytes)) => (name, Some(bytes.parse().wrap_err_with(|| format!("bad length in `{entry}`"))?)),
        None => (rest, None),
    };

    Ok(ManifestEntry {
        samples,
        ..ManifestEntry::new(slot, find_tone(name)?)
    })
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for tone in voices::catalogue() {
                let release = tone
                    .release_after
                    .map_or_else(|| "held".to_string(), |t| format!("off at {t}s"));
                println!("{:<12} {:>8.2} Hz  {:>5}s  {}", tone.name, tone.frequency, tone.duration, release);
            }
        }

        Commands::Render {
            tone,
            output,
            format,
            note,
        } => {
            let tone = find_tone(&tone)?;
            let settings = note.settings(&tone, TRACKER_SAMPLE_RATE);
            let samples = record(&tone.build, &settings)?;

            match format {
                Format::Raw => {
                    let quantized = quantize_i8(&samples);
                    write_raw_file(&output, &quantized)?;
                    let (low, high) = quantized_range(&quantized);
                    println!("{}: {} samples, range {low}..={high}", output.display(), quantized.len());
                }
                Format::Wav => {
                    write_wav(&output, &samples, settings.sample_rate.round() as u32)?;
                    println!("{}: {} samples at {} Hz", output.display(), samples.len(), settings.sample_rate);
                }
            }
        }

        Commands::Play { tone, note } => {
            let tone = find_tone(&tone)?;
            play::play(&tone, &note)?;
        }

        Commands::Bake {
            module,
            output,
            entries,
            sample_rate,
            seed,
        } => {
            let manifest = if entries.is_empty() {
                default_manifest()?
            } else {
                entries.iter().map(|e| parse_entry(e)).collect::<Result<Vec<_>>>()?
            };

            let input = std::fs::read(&module).wrap_err_with(|| format!("reading {}", module.display()))?;
            let baked = BakePipeline::new(manifest)
                .with_sample_rate(sample_rate)
                .with_seed(seed)
                .bake(&input)?;
            std::fs::write(&output, &baked).wrap_err_with(|| format!("writing {}", output.display()))?;
            println!("{}: {} bytes ({:+})", output.display(), baked.len(), baked.len() as i64 - input.len() as i64);
        }
    }

    Ok(())
}
