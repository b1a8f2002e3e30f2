//! CLI binary for pdf2tiff.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConverterConfig`, runs the batch, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2tiff::{BatchProgressCallback, BatchReport, Converter, ConverterConfig, ProgressCallback};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn paint(code: u8, s: &str) -> String {
    format!("\x1b[{code}m{s}\x1b[0m")
}

// ── Progress bar ─────────────────────────────────────────────────────────────

/// Draws one bar over the matched PDFs on stderr and prints a line above it
/// for every file that fails.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        let name = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.bar.set_message(name);
    }

    fn on_file_complete(&self, _index: usize, _total: usize, _output: &Path) {
        self.bar.inc(1);
    }

    fn on_file_error(&self, _index: usize, _total: usize, input: &Path, error: &str) {
        self.bar
            .println(format!("{} {}: {}", paint(31, "failed"), input.display(), error));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _total_files: usize, _success_count: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Defaults: 300 DPI, 79 pt header
  pdf2tiff data/raw data/tiff

  # Lower resolution, taller header
  pdf2tiff --dpi 200 --header-points 96 data/raw data/tiff

  # Machine-readable report
  pdf2tiff --json data/raw data/tiff > report.json

HEADER MATH:
  header_pixels = floor(header_points × dpi / 72)
  79 pt at 300 DPI → 329 px removed from the top of every page.

ENVIRONMENT VARIABLES:
  PDF2TIFF_DPI            Default for --dpi
  PDF2TIFF_HEADER_POINTS  Default for --header-points
  PDFIUM_LIB_PATH         Path to an existing libpdfium (file or directory)
  RUST_LOG                Overrides the log filter

PDFIUM:
  Without --pdfium-lib, libpdfium is looked up next to the executable, then in
  the current directory, then among system libraries.
  Pre-built binaries: https://github.com/bblanchon/pdfium-binaries/releases
"#;

/// Convert every PDF in a directory to a header-cropped TIFF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tiff",
    version,
    about = "Convert every PDF in a directory to a header-cropped, LZW-compressed TIFF",
    long_about = "Render page 1 of every *.pdf in INPUT_DIR at the requested DPI, remove a \
fixed-height header band from the top, and write OUTPUT_DIR/<name>.tiff with LZW compression. \
Files that fail are reported and skipped.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the *.pdf files (not searched recursively).
    input_dir: PathBuf,

    /// Directory receiving the .tiff files; created if missing.
    output_dir: PathBuf,

    /// Rendering resolution in dots per inch.
    #[arg(long, env = "PDF2TIFF_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Height of the header band to remove, in points (1/72 inch).
    #[arg(long, env = "PDF2TIFF_HEADER_POINTS", default_value_t = 79.0)]
    header_points: f64,

    /// Path to libpdfium, or a directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "PDF2TIFF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TIFF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TIFF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TIFF_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar already reports every file, so library logs are
    // silenced while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if show_progress {
        "off"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;
    let converter = Converter::new(config).context("Failed to load the PDF engine")?;

    // ── Run batch ────────────────────────────────────────────────────────
    let report = converter.run().context("Batch conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
        return Ok(());
    }

    print_failures(&mut io::stdout().lock(), &report).context("Failed to write to stdout")?;

    if !cli.quiet {
        print_summary(&report, &cli.output_dir);
    }

    Ok(())
}

/// Map CLI args to `ConverterConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConverterConfig> {
    let mut builder = ConverterConfig::builder(&cli.input_dir, &cli.output_dir)
        .dpi(cli.dpi)
        .header_points(cli.header_points);

    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// One `Error converting <path>: <error>` line per failed input.
fn print_failures(out: &mut impl Write, report: &BatchReport) -> io::Result<()> {
    for (path, error) in report.failures() {
        writeln!(out, "Error converting {}: {}", path.display(), error)?;
    }
    Ok(())
}

fn print_summary(report: &BatchReport, output_dir: &Path) {
    let line = format!(
        "{}/{} converted in {}ms -> {}",
        report.succeeded(),
        report.total(),
        report.duration_ms,
        output_dir.display()
    );
    if report.failed() == 0 {
        eprintln!("{}", paint(32, &line));
    } else {
        eprintln!("{} ({} failed)", line, paint(31, &report.failed().to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["pdf2tiff", "in", "out"]).unwrap();
        assert_eq!(cli.dpi, 300);
        assert_eq!(cli.header_points, 79.0);
        assert_eq!(cli.input_dir, PathBuf::from("in"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));

        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.header_pixels(), 329);
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::try_parse_from([
            "pdf2tiff",
            "--dpi",
            "150",
            "--header-points",
            "36",
            "--pdfium-lib",
            "/opt/pdfium",
            "in",
            "out",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.dpi, 150);
        assert_eq!(config.header_pixels(), 75);
        assert_eq!(config.pdfium_lib_path, Some(PathBuf::from("/opt/pdfium")));
    }

    #[test]
    fn failures_print_one_line_each() {
        use pdf2tiff::FileOutcome;

        let report = BatchReport {
            outcomes: vec![
                FileOutcome {
                    input: PathBuf::from("in/a.pdf"),
                    output: Some(PathBuf::from("out/a.tiff")),
                    error: None,
                    error_kind: None,
                },
                FileOutcome {
                    input: PathBuf::from("in/b.pdf"),
                    output: None,
                    error: Some("cannot open document 'in/b.pdf': FormatError".into()),
                    error_kind: Some("document_open"),
                },
            ],
            duration_ms: 3,
        };

        let mut out = Vec::new();
        print_failures(&mut out, &report).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error converting in/b.pdf: cannot open document 'in/b.pdf': FormatError\n"
        );
    }

    #[test]
    fn no_failures_print_nothing() {
        let mut out = Vec::new();
        print_failures(&mut out, &BatchReport::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_dpi_rejected_by_parser() {
        assert!(Cli::try_parse_from(["pdf2tiff", "--dpi", "0", "in", "out"]).is_err());
    }

    #[test]
    fn negative_header_rejected_by_builder() {
        let cli =
            Cli::try_parse_from(["pdf2tiff", "--header-points=-5", "in", "out"]).unwrap();
        assert!(build_config(&cli, None).is_err());
    }
}
