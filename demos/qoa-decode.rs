use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Decodes a QOA file and prints information about it.
#[derive(Parser, Debug)]
#[command(name = "qoa-decode")]
struct Args {
    /// QOA file to decode
    input: PathBuf,

    /// Write the decoded samples to this WAV file
    #[arg(long)]
    wav: Option<PathBuf>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let audio = qoa_decoder::decode(BufReader::new(file))
        .with_context(|| format!("failed to decode {}", args.input.display()))?;

    println!("channels:    {}", audio.channels);
    println!("sample rate: {} Hz", audio.sample_rate);
    println!("samples:     {} per channel", audio.frames());
    println!("duration:    {:.3} s", audio.duration_secs());

    if let Some(path) = args.wav {
        let spec = hound::WavSpec {
            channels: u16::from(audio.channels),
            sample_rate: audio.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("failed to create {}", path.display()))?;
        for sample in &audio.samples {
            writer.write_sample(*sample)?;
        }
        writer.finalize()?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
