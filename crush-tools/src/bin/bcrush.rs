// Copyright 2025 the crushpack authors
// CRUSH compression command-line tool
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

use anyhow::{Context, Result};
use clap::Parser;
use crushpack::{Reader, Writer, DEFAULT_BLOCK_SIZE, DEFAULT_LEVEL};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "bcrush")]
#[command(about = "CRUSH compression tool", long_about = None)]
#[command(version)]
struct Args {
    /// Input file
    infile: PathBuf,

    /// Output file
    outfile: PathBuf,

    /// Compress faster (default)
    #[arg(short = '5', group = "level")]
    level5: bool,

    #[arg(short = '6', group = "level", hide = true)]
    level6: bool,

    #[arg(short = '7', group = "level", hide = true)]
    level7: bool,

    #[arg(short = '8', group = "level", hide = true)]
    level8: bool,

    /// Compress better
    #[arg(short = '9', group = "level")]
    level9: bool,

    /// Optimal but very slow compression
    #[arg(long, group = "level")]
    optimal: bool,

    /// Decompress
    #[arg(short, long)]
    decompress: bool,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn level(&self) -> u32 {
        if self.optimal {
            10
        } else if self.level9 {
            9
        } else if self.level8 {
            8
        } else if self.level7 {
            7
        } else if self.level6 {
            6
        } else {
            DEFAULT_LEVEL
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.decompress {
        decompress_file(&args)
    } else {
        compress_file(&args)
    }
}

fn open_files(args: &Args) -> Result<(File, u64, File)> {
    let input = File::open(&args.infile)
        .with_context(|| format!("unable to open input file '{}'", args.infile.display()))?;
    let input_size = fs::metadata(&args.infile)?.len();

    let output = File::create(&args.outfile)
        .with_context(|| format!("unable to open output file '{}'", args.outfile.display()))?;

    Ok((input, input_size, output))
}

fn progress_bar(len: u64, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
            .ok()?
            .progress_chars("#>-"),
    );
    Some(pb)
}

fn ratio(out_size: u64, in_size: u64) -> f64 {
    if in_size == 0 {
        return 0.0;
    }
    out_size as f64 * 100.0 / in_size as f64
}

fn compress_file(args: &Args) -> Result<()> {
    let (mut input, input_size, output) = open_files(args)?;
    let pb = progress_bar(input_size, args.verbose);

    let start = Instant::now();

    let mut writer = Writer::with_options(io::BufWriter::new(output), args.level(), DEFAULT_BLOCK_SIZE);

    let mut buffer = vec![0u8; 128 * 1024];
    loop {
        let n = input.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buffer[..n])
            .context("an error occured while compressing")?;
        if let Some(ref pb) = pb {
            pb.inc(n as u64);
        }
    }
    writer.flush().context("an error occured while compressing")?;
    drop(writer);

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if args.verbose {
        let output_size = fs::metadata(&args.outfile)?.len();
        eprintln!(
            "in {} out {} ratio {:.0}% time {:.2}",
            input_size,
            output_size,
            ratio(output_size, input_size),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn decompress_file(args: &Args) -> Result<()> {
    let (input, input_size, output) = open_files(args)?;
    let mut output = io::BufWriter::new(output);

    let pb = if args.verbose {
        Some(ProgressBar::new_spinner())
    } else {
        None
    };

    let start = Instant::now();

    let mut reader = Reader::new(io::BufReader::new(input));

    let mut buffer = vec![0u8; 128 * 1024];
    let mut output_size = 0u64;
    loop {
        let n = reader
            .read(&mut buffer)
            .context("an error occured while decompressing")?;
        if n == 0 {
            break;
        }
        output.write_all(&buffer[..n])?;
        output_size += n as u64;
        if let Some(ref pb) = pb {
            pb.inc(n as u64);
        }
    }
    output.flush()?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if args.verbose {
        eprintln!(
            "in {} out {} ratio {:.0}% time {:.2}",
            input_size,
            output_size,
            ratio(input_size, output_size),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
