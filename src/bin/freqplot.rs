use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use freqplot::{FrequencyModel, Histogram, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "freqplot",
    version,
    about = "Bin numeric values and render a histogram as PNG or SVG"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read values from CSV, bin them and write the histogram image.
    Plot(PlotArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum TableFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// CSV file with a header row.
    #[arg(short, long)]
    input: PathBuf,
    /// Column holding the values (default: first column).
    #[arg(short, long)]
    column: Option<String>,
    /// Width of every class.
    #[arg(short = 'r', long)]
    class_range: f64,
    /// Output image (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// JSON config map applied before the flags below.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Draw the frequency polygon.
    #[arg(long, default_value_t = false)]
    fp: bool,
    /// Draw the cumulative relative frequency polygon.
    #[arg(long, default_value_t = false)]
    crfp: bool,
    /// Print each frequency above its bar.
    #[arg(long, default_value_t = false)]
    frequency: bool,
    /// Hide the bars.
    #[arg(long, default_value_t = false)]
    no_bar: bool,
    /// Leave the canvas background transparent.
    #[arg(long, default_value_t = false)]
    transparent: bool,
    #[arg(long)]
    label_x: Option<String>,
    #[arg(long)]
    label_y: Option<String>,
    #[arg(long)]
    caption: Option<String>,
    /// Also save the binned table (format inferred by --table-format or extension).
    #[arg(long)]
    table: Option<PathBuf>,
    #[arg(long, value_enum)]
    table_format: Option<TableFormat>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config map to apply on top of the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plot(args) => cmd_plot(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    let values = storage::load_values(&args.input, args.column.as_deref())?;
    let mut hist = Histogram::new();
    hist.ft
        .set_class_range(args.class_range)?
        .set_values(&values)?;

    if let Some(path) = args.config.as_ref() {
        hist.config_file(path)?;
    }
    if args.width.is_some() || args.height.is_some() {
        let (w, h) = hist.size();
        hist.resize(args.width.unwrap_or(w), args.height.unwrap_or(h))?;
    }
    if args.fp {
        hist.fp_on();
    }
    if args.crfp {
        hist.crfp_on();
    }
    if args.frequency {
        hist.frequency_on();
    }
    if args.no_bar {
        hist.bar_off();
    }
    if args.transparent {
        hist.transparent();
    }
    if let Some(label) = args.label_x {
        hist.label_x(label);
    }
    if let Some(label) = args.label_y {
        hist.label_y(label);
    }
    if let Some(caption) = args.caption {
        hist.caption(caption);
    }

    if let Some(path) = args.table.as_ref() {
        let table = hist.ft.parse();
        let fmt = match args.table_format {
            Some(TableFormat::Csv) => "csv",
            Some(TableFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_table_csv(&table, path)?,
            "json" => storage::save_table_json(&table, path)?,
            other => anyhow::bail!("unsupported table format: {}", other),
        }
        eprintln!("Saved {} classes to {}", table.classes.len(), path.display());
    }

    hist.create(&args.out)
        .with_context(|| format!("rendering {}", args.out.display()))?;
    eprintln!("Wrote histogram to {}", args.out.display());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> Result<()> {
    let mut hist = Histogram::new();
    if let Some(path) = args.config.as_ref() {
        hist.config_file(path)?;
    }
    println!("{}", serde_json::to_string_pretty(&hist.config_snapshot())?);
    Ok(())
}
