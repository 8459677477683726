use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use unveil::sections::LaunchSlot;

#[derive(Parser, Debug)]
#[command(name = "unveil", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a page spec and print its choreography plan.
    Inspect(InspectArgs),
    /// Run the page headlessly on a fixed-step clock and dump the events.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input page spec JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input page spec JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Seconds of page time to simulate.
    #[arg(long, default_value_t = 12.0)]
    duration: f64,

    /// Ticks per simulated second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Scroll script: comma-separated `time:position` pairs, e.g.
    /// `4:0,5:900,7:2200`.
    #[arg(long)]
    scroll: Option<String>,

    /// Write the event log as JSON here instead of summarizing.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_spec_json(path: &Path) -> anyhow::Result<unveil::PageSpec> {
    let f = File::open(path).with_context(|| format!("open page spec '{}'", path.display()))?;
    let r = BufReader::new(f);
    let spec: unveil::PageSpec =
        serde_json::from_reader(r).with_context(|| "parse page spec JSON")?;
    Ok(spec)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let spec = read_spec_json(&args.in_path)?;
    spec.validate()?;
    let plans = unveil::sections::page_plans(&spec)?;

    println!(
        "page: {} for viewport height {}",
        spec.content.profile.name, spec.viewport_height
    );
    let mut elements = 0usize;
    let mut reveals = 0usize;
    for (section, plan) in &plans {
        elements += plan.elements.len();
        reveals += plan.reveals.len();
        println!(
            "  {section}: {} elements, {} sequences, {} reveals",
            plan.elements.len(),
            plan.sequences.len(),
            plan.reveals.len()
        );
    }
    println!("sequences:");
    for (_, plan) in &plans {
        for (slot, seq) in &plan.sequences {
            let when = match slot {
                LaunchSlot::AtBegin => "at begin".to_string(),
                LaunchSlot::AtPageReady => format!("+{:.2}s after ready", seq.delay_s),
            };
            let span = match seq.total_duration_s() {
                Some(d) => format!("{d:.2}s"),
                None => "loops".to_string(),
            };
            println!("  {:<18} {span:>8}  {when}", seq.name);
        }
    }
    println!("{elements} elements, {reveals} scroll reveals");
    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct SimEvent {
    t_s: f64,
    event: unveil::PageEvent,
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if !(args.duration.is_finite() && args.duration >= 0.0) {
        anyhow::bail!("duration must be a non-negative number of seconds");
    }
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("fps must be > 0");
    }
    let scroll_script = match &args.scroll {
        Some(script) => parse_scroll_script(script)?,
        None => Vec::new(),
    };

    let spec = read_spec_json(&args.in_path)?;
    let mut page = unveil::Page::new(spec)?;

    let mut log = Vec::new();
    for event in page.begin(0.0)? {
        log.push(SimEvent { t_s: 0.0, event });
    }

    let frames = (args.duration * args.fps).ceil() as u64;
    let mut next_scroll = 0usize;
    for frame in 0..=frames {
        let t = frame as f64 / args.fps;
        while next_scroll < scroll_script.len() && scroll_script[next_scroll].0 <= t {
            let (_, position) = scroll_script[next_scroll];
            for event in page.publish_scroll(position, t) {
                log.push(SimEvent { t_s: t, event });
            }
            next_scroll += 1;
        }
        for event in page.tick(t) {
            log.push(SimEvent { t_s: t, event });
        }
    }

    eprintln!(
        "simulated {frames} frames over {:.2}s, final phase {:?}, {} events",
        args.duration,
        page.phase(),
        log.len()
    );

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(out)
                .with_context(|| format!("write event log '{}'", out.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(f), &log)
                .with_context(|| "encode event log JSON")?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            for entry in &log {
                println!("{:>8.3}s  {:?}", entry.t_s, entry.event);
            }
        }
    }
    Ok(())
}

fn parse_scroll_script(script: &str) -> anyhow::Result<Vec<(f64, f64)>> {
    let mut points = Vec::new();
    for pair in script.split(',') {
        let (t, y) = pair
            .split_once(':')
            .with_context(|| format!("scroll point '{pair}' is not 'time:position'"))?;
        let t: f64 = t
            .trim()
            .parse()
            .with_context(|| format!("scroll time '{t}' is not a number"))?;
        let y: f64 = y
            .trim()
            .parse()
            .with_context(|| format!("scroll position '{y}' is not a number"))?;
        points.push((t, y));
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(points)
}
