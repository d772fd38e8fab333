use anyhow::Result;
use clap::{CommandFactory, Parser};
use crossterm::{
    style::{Color, Stylize},
    tty::IsTty,
};
use fontello_svg::{
    ColorMap, DownloadEvent, ExportEvent, ExportPlan, FileFormat, HttpFetcher, SvgUrlTemplate,
};
use fontello_svg_common::{
    paths::{display_relative, resolve_from_cwd},
    FILTER_SPEC,
};
use std::{io, path::PathBuf, process::ExitCode, sync::Arc};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::error;

/// Downloads the SVG files of the glyphs in a Fontello configuration.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    override_usage = "fontello-svg --config <config file> --out <dir> [options]"
)]
struct Args {
    /// Set the Fontello configuration file (required)
    #[arg(short, long, value_name = "config file")]
    config: Option<PathBuf>,

    /// Set the export directory (required)
    #[arg(short, long, value_name = "dir")]
    out: Option<PathBuf>,

    /// Transform the SVG paths to the specified colors.
    /// Syntax: --fill-colors "black:rgb(0,0,0) | red:rgb(255,0,0)"
    #[arg(short, long, value_name = "colors", value_parser = parse_color_map)]
    fill_colors: Option<ColorMap>,

    /// Set a CSS path for SVG backgrounds
    #[arg(short = 'p', long, value_name = "path")]
    css_path: Option<String>,

    /// Where to write the CSS file, instead of index.css in the export directory
    #[arg(long, value_name = "file")]
    css_file: Option<PathBuf>,

    /// Override the default filename. Values: {0} - collection, {1} - name, {2} - color.
    /// Syntax: "{0}-{1}-{2}.svg" | "{0}-Custom-{1}.svg"
    #[arg(long, value_name = "format")]
    file_format: Option<String>,

    /// Override the URL glyphs are downloaded from. Values: {0} - repository, {1} - name
    #[arg(long, value_name = "url")]
    svg_url: Option<String>,

    /// Do not create the CSS file
    #[arg(long)]
    no_css: bool,

    /// Do not skip existing files
    #[arg(long)]
    no_skip: bool,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

/// Parses colors given as `"label:value | label:value"`.
fn parse_color_map(arg: &str) -> Result<ColorMap, String> {
    let mut colors = ColorMap::new();
    for pair in arg.split('|') {
        let Some((label, value)) = pair.split_once(':') else {
            return Err(format!("expected `label:value`, found `{}`", pair.trim()));
        };
        let label = label.trim();
        if label.is_empty() {
            return Err(format!("missing color label in `{}`", pair.trim()));
        }
        colors.insert(label, value.trim());
    }
    Ok(colors)
}

/// Whether progress lines on stdout get colored prefixes.
fn should_colorize() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stdout().is_tty()
}

fn tag(text: &str, color: Color, colorize: bool) -> String {
    if colorize {
        text.with(color).to_string()
    } else {
        text.to_string()
    }
}

fn log(msg: impl std::fmt::Display) {
    println!("  {msg}");
}

async fn print_events(
    mut events: UnboundedReceiver<ExportEvent>,
    verbose: bool,
    colorize: bool,
) {
    let saved = tag("[saved]", Color::Green, colorize);
    let skipped = tag("[skipped]", Color::Grey, colorize);
    let error = tag("[error]", Color::Red, colorize);

    while let Some(event) = events.recv().await {
        match event {
            ExportEvent::Skipped(glyph) => {
                if verbose {
                    log(format_args!(
                        "{skipped} existing SVG: {}-{}",
                        glyph.name(),
                        glyph.collection()
                    ));
                }
            }
            ExportEvent::Download(DownloadEvent::FetchError { url, .. }) => {
                log(format_args!("{error} download failed: {url}"))
            }
            ExportEvent::Download(DownloadEvent::WriteError { path, reason })
            | ExportEvent::CssError { path, reason } => log(format_args!(
                "{error} write failed: {} ({reason})",
                display_relative(&path)
            )),
            ExportEvent::Download(DownloadEvent::SvgWrite { path })
            | ExportEvent::CssWrite(path) => {
                log(format_args!("{saved} {}", display_relative(&path)))
            }
        }
    }
}

async fn run(args: Args, config: PathBuf, out: PathBuf, colorize: bool) -> Result<()> {
    let mut plan = ExportPlan::new(resolve_from_cwd(&config)?, resolve_from_cwd(&out)?);
    plan.skip_existing(!args.no_skip);
    if let Some(colors) = args.fill_colors {
        plan.colors(colors);
    }
    if let Some(file_format) = args.file_format {
        plan.file_format(FileFormat::new(file_format));
    }
    if let Some(svg_url) = args.svg_url {
        plan.svg_url(SvgUrlTemplate::new(svg_url));
    }
    if args.no_css {
        plan.no_css();
    } else {
        if let Some(css_path) = args.css_path {
            plan.css_url_prefix(css_path);
        }
        if let Some(css_file) = args.css_file {
            plan.css_file(resolve_from_cwd(&css_file)?);
        }
    }

    let fetcher = Arc::new(HttpFetcher::new()?);
    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_events(rx, args.verbose, colorize));
    let report = plan.run(fetcher, tx).await;
    printer.await?;
    report?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let colorize = should_colorize();

    let (Some(config), Some(out)) = (args.config.clone(), args.out.clone()) else {
        println!();
        let message = "  Error: missing required parameters (--config, --out)";
        println!("{}", tag(message, Color::Red, colorize));
        println!();
        let _ = Args::command().print_help();
        return ExitCode::FAILURE;
    };

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose { FILTER_SPEC } else { "info" })
        .with_writer(io::stderr)
        .init();

    match run(args, config, out, colorize).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
