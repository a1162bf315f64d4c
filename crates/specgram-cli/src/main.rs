//! specgram - spectral periodogram and energy-bin tools for I/Q captures
//!
//! Three subcommands map onto the classic sensing workflow:
//!
//! - `stft`: overlapped FFT magnitude frames from a recorded capture
//! - `energy`: binned energy (sum of squared magnitudes) from a capture
//! - `live`: the SDR-streaming variant of `stft`; this build only carries
//!   the configuration surface, not a device driver

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use specgram_core::config::{EnergyConfig, PlanStrategy, SdrConfig, StftConfig, WaitStrategy};
use specgram_core::source::FileSource;
use specgram_core::window::WindowTable;
use specgram_core::{energy, pipeline};

#[derive(Parser)]
#[command(name = "specgram", version, about = "Overlapped STFT and energy binning for raw I/Q sample streams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute overlapped FFT magnitude frames from a recorded capture
    Stft(StftArgs),
    /// Sum squared sample magnitudes into fixed-size energy bins
    Energy(EnergyArgs),
    /// Stream frames from an SDR receiver instead of a file
    Live(LiveArgs),
}

#[derive(ValueEnum, Clone, Copy)]
enum PlanArg {
    Estimate,
    Measure,
    Exhaustive,
}

impl From<PlanArg> for PlanStrategy {
    fn from(arg: PlanArg) -> Self {
        match arg {
            PlanArg::Estimate => PlanStrategy::Estimate,
            PlanArg::Measure => PlanStrategy::Measure,
            PlanArg::Exhaustive => PlanStrategy::Exhaustive,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum WaitArg {
    Block,
    Spin,
}

impl From<WaitArg> for WaitStrategy {
    fn from(arg: WaitArg) -> Self {
        match arg {
            WaitArg::Block => WaitStrategy::Block,
            WaitArg::Spin => WaitStrategy::Spin,
        }
    }
}

#[derive(Args)]
struct StftArgs {
    /// Input capture: interleaved little-endian f32 I/Q, no header
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    #[command(flatten)]
    stft: StftCommon,
}

/// The STFT knobs shared by the file and live variants
#[derive(Args)]
struct StftCommon {
    /// Output file of magnitude frames (little-endian f32)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// FFT size
    #[arg(short = 's', long = "size")]
    size: usize,

    /// Overlap factor: a frame every size/overlap samples
    #[arg(short = 'l', long = "overlap", default_value_t = 1)]
    overlap: usize,

    /// Window coefficient file (raw f32); omitted means a uniform window
    #[arg(short = 'w', long = "window")]
    window: Option<PathBuf>,

    /// Worker thread count
    #[arg(short = 'c', long = "workers", default_value_t = 1)]
    workers: usize,

    /// FFT plan construction strategy
    #[arg(long = "plan", value_enum, default_value_t = PlanArg::Exhaustive)]
    plan: PlanArg,

    /// Wait strategy for the worker hand-offs
    #[arg(long = "wait", value_enum, default_value_t = WaitArg::Block)]
    wait: WaitArg,
}

#[derive(Args)]
struct EnergyArgs {
    /// Input capture: interleaved little-endian f32 I/Q, no header
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output file of energy bins (little-endian f64)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Samples summed per energy bin
    #[arg(short = 's', long = "bin-size")]
    bin_size: usize,
}

#[derive(Args)]
struct LiveArgs {
    #[command(flatten)]
    stft: StftCommon,

    /// Receiver address string, passed to the driver
    #[arg(short = 'a', long = "address")]
    address: String,

    /// Center frequency in Hz
    #[arg(short = 'f', long = "frequency")]
    center_hz: f64,

    /// Sample rate in Hz
    #[arg(short = 'r', long = "rate")]
    sample_rate_hz: f64,

    /// RX gain in dB
    #[arg(short = 'g', long = "gain", default_value_t = 0.0)]
    gain_db: f64,

    /// Capture duration in seconds
    #[arg(short = 't', long = "time")]
    seconds: f64,
}

impl StftCommon {
    fn config(&self) -> StftConfig {
        StftConfig {
            fft_size: self.size,
            overlap: self.overlap,
            workers: self.workers,
            plan: self.plan.into(),
            wait: self.wait.into(),
        }
    }

    fn window(&self) -> Result<WindowTable> {
        match &self.window {
            Some(path) => WindowTable::from_file(path, self.size)
                .with_context(|| format!("failed to load window file {:?}", path)),
            None => Ok(WindowTable::ones(self.size)),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Stft(args) => run_stft(args),
        Command::Energy(args) => run_energy(args),
        Command::Live(args) => run_live(args),
    }
}

fn run_stft(args: StftArgs) -> Result<()> {
    let config = args.stft.config();
    config.validate()?;
    let window = args.stft.window()?;

    let mut source = FileSource::open(&args.input)
        .with_context(|| format!("cannot open input file {:?}", args.input))?;
    let output = File::create(&args.stft.output)
        .with_context(|| format!("cannot create output file {:?}", args.stft.output))?;

    log::info!(
        "stft: size {}, hop {}, {} workers",
        config.fft_size,
        config.hop(),
        config.workers
    );
    let stats = pipeline::run(&config, window, &mut source, BufWriter::new(output))?;
    log::info!(
        "wrote {} frames from {} samples",
        stats.frames,
        stats.samples_in
    );
    Ok(())
}

fn run_energy(args: EnergyArgs) -> Result<()> {
    let config = EnergyConfig {
        bin_size: args.bin_size,
    };
    config.validate()?;

    let input = File::open(&args.input)
        .with_context(|| format!("cannot open input file {:?}", args.input))?;
    let output = File::create(&args.output)
        .with_context(|| format!("cannot create output file {:?}", args.output))?;

    let stats = energy::run(
        BufReader::new(input),
        BufWriter::new(output),
        &config,
    )?;
    log::info!(
        "wrote {} bins from {} samples",
        stats.bins,
        stats.samples_in
    );
    Ok(())
}

fn run_live(args: LiveArgs) -> Result<()> {
    let config = args.stft.config();
    config.validate()?;
    let _window = args.stft.window()?;

    let sdr = SdrConfig {
        address: args.address,
        center_hz: args.center_hz,
        sample_rate_hz: args.sample_rate_hz,
        gain_db: args.gain_db,
        seconds: args.seconds,
    };
    log::info!(
        "live: {} at {:.0} Hz, {:.0} S/s, {:.1} dB, cap {} samples",
        sdr.address,
        sdr.center_hz,
        sdr.sample_rate_hz,
        sdr.gain_db,
        sdr.max_samples()
    );

    // the receiver driver is deliberately out of tree; see
    // specgram_core::source::IqReceiver for the seam a driver plugs into
    bail!("this build carries no SDR driver; record a capture and use `specgram stft`");
}
