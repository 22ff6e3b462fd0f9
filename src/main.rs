use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use varint_bench_plot::chart::{render_bar_chart, render_line_chart, ChartConfig};
use varint_bench_plot::speedup::SpeedupTable;
use varint_bench_plot::summary::{print_speedups, print_summary};
use varint_bench_plot::{AggregatedSeries, LayoutConfig, RenderPlan, Report};

#[derive(Parser)]
#[command(name = "varint-bench-plot")]
#[command(about = "Plot varint benchmark results from Google Benchmark JSON output")]
struct Cli {
    /// Input JSON file from the benchmark run
    #[arg(short, long, default_value = "results.json")]
    input: PathBuf,

    /// Output filename prefix
    #[arg(short, long, default_value = "varint_throughput_distributions")]
    output: String,

    /// Skip line chart generation
    #[arg(long)]
    no_line: bool,

    /// Skip bar chart generation
    #[arg(long)]
    no_bar: bool,

    /// Print speedups relative to this algorithm
    #[arg(short, long)]
    baseline: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!("Loading benchmark data from: {}", cli.input.display());
    let report = Report::load(&cli.input)?;

    let (series, stats) = AggregatedSeries::from_records(&report.benchmarks);
    let plan = RenderPlan::new(&series, &LayoutConfig::default());

    print_summary(&report.context, &series, &plan, &stats);

    if plan.is_empty() {
        println!("No data to plot");
        println!("Done.");
        return Ok(());
    }

    if let Some(baseline) = &cli.baseline {
        match SpeedupTable::compute(&series, &plan, baseline) {
            Some(table) => print_speedups(&table),
            None => println!("Baseline '{}' not found; skipping speedups", baseline),
        }
    }

    let config = ChartConfig::default();

    if !cli.no_line {
        render_line_chart(&series, &plan, &report.context, &config, &cli.output)?;
    }

    if !cli.no_bar {
        render_bar_chart(&series, &plan, &report.context, &config, &cli.output)?;
    }

    println!("Done.");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("VARINT_PLOT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
