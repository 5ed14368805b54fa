use anyhow::{Context, Result};
use clap::Parser;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use qdsp::config::{Backend, DspConfig, Normalization, SampleRate};
use qdsp::fixed_point::{NumericFormat, QFormat};
use qdsp::resample::Resampler;
use qdsp::sample::Sample;

/// Frames handed to the resampler per call
const BLOCK_FRAMES: usize = 4096;

#[derive(Parser, Debug)]
#[command(name = "resample_wav")]
#[command(about = "Resample a WAV file with a polyphase FIR resampler", long_about = None)]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file
    output: PathBuf,

    /// Output sample rate (e.g., "48000", "44.1khz", "32k")
    #[arg(short = 'r', long)]
    output_rate: Option<SampleRate>,

    /// Taps per polyphase branch
    #[arg(short = 't', long)]
    taps_per_phase: Option<usize>,

    /// Vector kernel implementation
    #[arg(short = 'b', long, value_enum)]
    backend: Option<Backend>,

    /// Arithmetic used for resampling: float or q15
    #[arg(short = 'f', long, value_enum, default_value = "float")]
    format: ArithmeticFormat,

    /// Prototype gain normalization
    #[arg(short = 'n', long, value_enum)]
    normalization: Option<Normalization>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write a JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum ArithmeticFormat {
    Float,
    Q15,
}

#[derive(Debug, Serialize)]
struct Report {
    input_file: String,
    output_file: String,
    input_rate: u32,
    output_rate: u32,
    interpolation: usize,
    decimation: usize,
    taps_per_phase: usize,
    channels: u16,
    input_frames: usize,
    output_frames: usize,
    format: ArithmeticFormat,
    backend: String,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(log_level).init();

    let mut config = match &args.config {
        Some(path) => load_toml_config(path)?,
        None => DspConfig::default(),
    };

    let (channels, spec) = read_wav(&args.input)?;
    config.resampler.input_rate = SampleRate::from_hz(spec.sample_rate)
        .context("Input file has a zero sample rate")?;
    if let Some(rate) = args.output_rate {
        config.resampler.output_rate = rate;
    }
    if let Some(taps) = args.taps_per_phase {
        config.resampler.taps_per_phase = taps;
    }
    if let Some(backend) = args.backend {
        config.kernel.backend = backend;
    }
    if let Some(normalization) = args.normalization {
        config.resampler.normalization = normalization;
    }

    let format = match args.format {
        ArithmeticFormat::Float => NumericFormat::Float,
        ArithmeticFormat::Q15 => {
            if config.resampler.normalization != Normalization::Headroom {
                warn!("Q1.15 resampling needs headroom normalization, overriding");
                config.resampler.normalization = Normalization::Headroom;
            }
            NumericFormat::Fixed(QFormat::Q1_15)
        }
    };

    info!(
        "Resampling {} ({} channels) from {} to {}",
        args.input.display(),
        spec.channels,
        config.resampler.input_rate,
        config.resampler.output_rate
    );

    let start = Instant::now();
    let (output, ratio) = match args.format {
        ArithmeticFormat::Float => resample_channels::<f32>(&channels, &config, format)?,
        ArithmeticFormat::Q15 => resample_channels::<i16>(&channels, &config, format)?,
    };
    let elapsed = start.elapsed();

    write_wav(
        &args.output,
        &output,
        config.resampler.output_rate.as_hz(),
        args.format,
    )?;

    let input_frames = channels.first().map_or(0, Vec::len);
    let output_frames = output.first().map_or(0, Vec::len);
    info!(
        "Wrote {} frames to {} in {:.1} ms",
        output_frames,
        args.output.display(),
        elapsed.as_secs_f64() * 1000.0
    );

    if let Some(path) = &args.report {
        let report = Report {
            input_file: args.input.display().to_string(),
            output_file: args.output.display().to_string(),
            input_rate: config.resampler.input_rate.as_hz(),
            output_rate: config.resampler.output_rate.as_hz(),
            interpolation: ratio.0,
            decimation: ratio.1,
            taps_per_phase: config.resampler.taps_per_phase,
            channels: spec.channels,
            input_frames,
            output_frames,
            format: args.format,
            backend: config.kernel.backend.resolve().to_string(),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(path, json).context("Failed to write report")?;
    }

    Ok(())
}

fn load_toml_config(path: &Path) -> Result<DspConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

/// Read a WAV file into one normalized `f64` vector per channel.
fn read_wav(path: &Path) -> Result<(Vec<Vec<f64>>, WavSpec)> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .context("Failed to read WAV samples")?,
        SampleFormat::Int => {
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<_, _>>()
                .context("Failed to read WAV samples")?
        }
    };

    let num_channels = usize::from(spec.channels).max(1);
    let mut channels = vec![Vec::with_capacity(interleaved.len() / num_channels); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    Ok((channels, spec))
}

/// Resample every channel with its own resampler, returning real-valued
/// output and the `(L, M)` ratio used.
fn resample_channels<S: Sample>(
    channels: &[Vec<f64>],
    config: &DspConfig,
    format: NumericFormat,
) -> Result<(Vec<Vec<f64>>, (usize, usize))> {
    let frac_bits = S::frac_bits(format)?;
    let mut ratio = (1, 1);
    let mut output = Vec::with_capacity(channels.len());

    for channel in channels {
        let mut resampler: Resampler<S> =
            Resampler::from_config(config, format).context("Failed to build resampler")?;
        ratio = (resampler.interpolation(), resampler.decimation());

        let mut out = Vec::with_capacity(resampler.max_output_len(channel.len()));
        let mut block_out = vec![S::ZERO; resampler.max_output_len(BLOCK_FRAMES)];
        let mut block_in = Vec::with_capacity(BLOCK_FRAMES);
        for block in channel.chunks(BLOCK_FRAMES) {
            block_in.clear();
            block_in.extend(block.iter().map(|&x| S::from_real(x, frac_bits)));
            let n = resampler.process(&block_in, &mut block_out)?;
            out.extend(block_out[..n].iter().map(|s| s.to_real(frac_bits)));
        }
        output.push(out);
    }
    Ok((output, ratio))
}

fn write_wav(
    path: &Path,
    channels: &[Vec<f64>],
    sample_rate: u32,
    format: ArithmeticFormat,
) -> Result<()> {
    let spec = match format {
        ArithmeticFormat::Float => WavSpec {
            channels: channels.len() as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        },
        ArithmeticFormat::Q15 => WavSpec {
            channels: channels.len() as u16,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;

    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            match format {
                ArithmeticFormat::Float => writer.write_sample(channel[i] as f32)?,
                ArithmeticFormat::Q15 => writer.write_sample(i16::from_real(channel[i], 15))?,
            }
        }
    }
    writer.finalize().context("Failed to finalize WAV file")?;
    Ok(())
}
