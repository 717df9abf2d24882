//! nraudio CLI: convert one audio file into another.
//!
//! Usage:
//!   nr-cli input.wav output.wav
//!   nr-cli input.wav output.wav --bits 8 --quality best
//!
//! Set `RUST_LOG=debug` for codec details.

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use nraudio::{transcode, BitDepth, CodecRegistry, Quality, TranscodeOptions};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: nr-cli <input> <output> [--quality best|good|acceptable|fastest] [--bits 8|16]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (input, output, options) = parse_args(&args)?;

    let registry = CodecRegistry::default();
    let report = transcode(&registry, Path::new(input), Path::new(output), options)
        .with_context(|| format!("Failed to convert {} to {}", input, output))?;

    println!("Input:    {}", report.input_format);
    println!("Output:   {}", report.output_format);
    println!("Frames:   {}", report.frame_count);
    println!("Duration: {:.3}s", report.duration);
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(&str, &str, TranscodeOptions)> {
    let mut positional = Vec::new();
    let mut options = TranscodeOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--quality" => {
                let value = iter.next().context("--quality needs a value")?;
                options.quality = value.parse::<Quality>().map_err(anyhow::Error::msg)?;
            }
            "--bits" => {
                let value = iter.next().context("--bits needs a value")?;
                let bits: u16 = value.parse().with_context(|| format!("bad bit depth '{}'", value))?;
                options.bit_depth = Some(BitDepth::try_from(bits)?);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            path => positional.push(path),
        }
    }

    match positional.as_slice() {
        [input, output] => Ok((*input, *output, options)),
        _ => bail!(USAGE),
    }
}
