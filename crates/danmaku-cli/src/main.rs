use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::CanvasSettings;

#[derive(Parser, Debug)]
#[command(name = "danmaku-ass", version, about = "Convert danmaku and subtitles to ASS")]
struct Cli {
    /// Log every skipped and dropped comment.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a danmaku XML (or JSON record list) as ASS.
    Danmaku(DanmakuArgs),
    /// Convert an SRT file to ASS.
    Srt(ShimArgs),
    /// Convert caption JSON to ASS.
    Caption(ShimArgs),
}

#[derive(Args, Debug)]
struct DanmakuArgs {
    /// Input danmaku file (`.xml`, or `.json` for a record list).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output ASS path.
    #[arg(long)]
    out: PathBuf,

    /// TOML file with canvas settings; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stage width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Stage height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Font name.
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels.
    #[arg(long)]
    font_size: Option<f64>,

    /// Text opacity, 0.0 to 1.0.
    #[arg(long)]
    opacity: Option<f64>,

    /// Seconds a scrolling comment is on screen.
    #[arg(long)]
    scroll: Option<f64>,

    /// Seconds a fixed comment is on screen.
    #[arg(long)]
    still: Option<f64>,

    /// Pixels to keep free at the bottom.
    #[arg(long)]
    reserve: Option<u32>,

    /// Drop comments instead of overlapping them when the stage is full.
    #[arg(long)]
    reduced: bool,

    /// Regex; matching comments are removed. Repeatable.
    #[arg(long = "filter")]
    filters: Vec<String>,
}

impl DanmakuArgs {
    fn settings(&self) -> CanvasSettings {
        CanvasSettings {
            width: self.width,
            height: self.height,
            font_name: self.font.clone(),
            font_size: self.font_size,
            opacity: self.opacity,
            duration_scroll: self.scroll,
            duration_still: self.still,
            reserve_blank: self.reserve,
            style_name: None,
            reduced: self.reduced.then_some(true),
            filters: self.filters.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct ShimArgs {
    /// Input file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output ASS path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Danmaku(args) => cmd_danmaku(&args),
        Command::Srt(args) => cmd_srt(&args),
        Command::Caption(args) => cmd_caption(&args),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "danmaku_ass=info,danmaku_core=info,danmaku_formats=info"
    } else {
        "danmaku_ass=error,danmaku_core=error,danmaku_formats=error"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_danmaku(args: &DanmakuArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("danmaku", input = %args.in_path.display()).entered();
    let file_settings = match &args.config {
        Some(path) => CanvasSettings::from_file(path)?,
        None => CanvasSettings::default(),
    };
    let config = file_settings.merge(args.settings()).into_canvas()?;
    let converter = danmaku_core::Danmaku2Ass::new(config)?;

    let input = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read danmaku '{}'", args.in_path.display()))?;
    let is_json = args
        .in_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let conversion = if is_json {
        converter.convert_json(&input)?
    } else {
        converter.convert_xml(&input)?
    };
    conversion
        .write_to(&args.out)
        .with_context(|| format!("write ass '{}'", args.out.display()))?;

    let summary = &conversion.summary;
    tracing::info!(output = %args.out.display(), events = summary.events, "ass written");
    println!(
        "wrote {}: {} events, {} skipped, {} dropped, {} overlaid, {} filtered",
        args.out.display(),
        summary.events,
        summary.skipped.len(),
        summary.dropped.len(),
        summary.overlaid,
        summary.filtered
    );
    Ok(())
}

fn cmd_srt(args: &ShimArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("srt", input = %args.in_path.display()).entered();
    let result = danmaku_formats::export_ass_from_srt(&args.in_path, &args.out)
        .with_context(|| format!("convert srt '{}'", args.in_path.display()))?;
    print_shim_result(args, &result);
    Ok(())
}

fn cmd_caption(args: &ShimArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("caption", input = %args.in_path.display()).entered();
    let result = danmaku_formats::export_ass_from_json(&args.in_path, &args.out)
        .with_context(|| format!("convert caption '{}'", args.in_path.display()))?;
    print_shim_result(args, &result);
    Ok(())
}

fn print_shim_result(args: &ShimArgs, result: &danmaku_formats::FormatResult) {
    tracing::info!(output = %args.out.display(), events = result.entries, "ass written");
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "wrote {}: {} events, {} skipped",
        args.out.display(),
        result.entries,
        result.warnings.len()
    );
}
