use std::path::PathBuf;

use conveyor_logic::{layout::Layout, simulator::Simulator};
use mimalloc::MiMalloc;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, StructOpt)]
#[structopt(name = "conveyor-logic", about = "Runs a sorting circuit against random products")]
struct Opt {
    /// Layout file (json)
    #[structopt(parse(from_os_str))]
    layout: PathBuf,

    /// Number of frames to simulate
    #[structopt(long, default_value = "1000")]
    frames: usize,

    /// Overrides the layout's frame duration
    #[structopt(long)]
    frame_ms: Option<u64>,

    /// A new product reaches the sensors every N frames (at least 2)
    #[structopt(long, default_value = "20")]
    product_every: usize,

    #[structopt(long, default_value = "0")]
    seed: u64,

    /// -v for debug, -vv for trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut layout = Layout::from_path(&opt.layout)?;
    if let Some(frame_ms) = opt.frame_ms {
        layout.config.frame_duration_ms = frame_ms;
    }

    let circuit = layout.build()?;
    if circuit.has_feedback_loop() {
        tracing::warn!("layout contains a feedback loop");
    }

    let mut sim = Simulator::new(circuit, opt.seed, opt.product_every)?;
    let report = sim.run(opt.frames);

    println!(
        "{} frames ({:.2}s simulated), {} products, {} kicked, {} kick triggers",
        report.frames,
        sim.circuit().elapsed(),
        report.products.len(),
        report.kicked(),
        report.kicks
    );

    for actuator in sim.circuit().actuators() {
        println!("  {:?}: {} kicks", actuator.id, actuator.kicks());
    }

    Ok(())
}
