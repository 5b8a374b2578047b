//! CLI binary for vtt2pdf.
//!
//! Two modes over the same library:
//! - with INPUTS, a one-shot batch driven by flags (scriptable, `--json`);
//! - without, the interactive session: prompts for files and a folder,
//!   converts, offers another round, then offers to delete the originals.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use vtt2pdf::config::{DEFAULT_CAPTION_HOST, DEFAULT_LANGUAGE};
use vtt2pdf::pipeline::input::delete_original;
use vtt2pdf::{
    collect_inputs, convert_batch, inspect, run_session, ConversionConfig,
    ConversionProgressCallback, HtmlSource, Interaction, PageSize, ProgressCallback,
    Vtt2PdfError,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch, one log line per file.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-file wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Converting");

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(&index)
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_files} file(s)…"))
        ));
    }

    fn on_file_start(&self, index: usize, _total: usize, input: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(index, Instant::now());
        self.bar.set_message(input.to_string());
    }

    fn on_file_complete(&self, index: usize, total: usize, output: &str, pages: usize) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}  {}",
            green("✓"),
            index,
            total,
            output,
            dim(&format!("{pages} pages")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, input: &str, error: &str) {
        let secs = self.elapsed_secs(index);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // keep the log to one line
        let first_line = error.lines().next().unwrap_or(error);
        let msg: String = if first_line.chars().count() > 80 {
            format!("{}\u{2026}", first_line.chars().take(79).collect::<String>())
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}  {}",
            red("✗"),
            index,
            total,
            input,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} file(s) converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} file(s) converted  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

// ── Terminal interaction for the session ─────────────────────────────────────

/// Prompts on stderr, answers from stdin.
struct TerminalInteraction {
    stdin: io::Stdin,
}

impl TerminalInteraction {
    fn new() -> Self {
        Self { stdin: io::stdin() }
    }

    /// `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        eprint!("{prompt}");
        let _ = io::stderr().flush();
        let mut line = String::new();
        match self.stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Interaction for TerminalInteraction {
    fn instruct(&mut self, message: &str) {
        eprintln!("{} {}", cyan("◆"), bold(message));
    }

    /// One path per line, blank line to finish. Folders expand to their HTML files.
    fn select_inputs(&mut self) -> Vec<PathBuf> {
        let mut raw = Vec::new();
        loop {
            let prompt = if raw.is_empty() {
                format!("  {} ", dim("file or folder (blank to cancel):"))
            } else {
                format!("  {} ", dim("another (blank when done):"))
            };
            match self.read_line(&prompt) {
                Some(line) if !line.is_empty() => raw.push(PathBuf::from(line)),
                _ => break,
            }
        }

        let collected = collect_inputs(&raw);
        for skipped in &collected.skipped {
            eprintln!("  {} skipping {} (not HTML)", cyan("⚠"), skipped.display());
        }
        collected.files
    }

    fn select_output_dir(&mut self) -> Option<PathBuf> {
        let prompt = format!("  {} ", dim("folder (blank to cancel):"));
        self.read_line(&prompt)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
    }

    fn show_error(&mut self, title: &str, message: &str) {
        eprintln!("{} {}: {}", red("✗"), bold(title), message);
    }

    fn show_info(&mut self, title: &str, message: &str) {
        eprintln!("{} {}: {}", green("✔"), bold(title), message);
    }

    fn confirm(&mut self, title: &str, question: &str) -> bool {
        let prompt = format!("{} {} {} ", bold(title), question, dim("[y/N]"));
        matches!(
            self.read_line(&prompt).map(|s| s.to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        )
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive session (prompts for files and a folder)
  vtt2pdf

  # Convert two saved pages into ./transcripts
  vtt2pdf lesson-01.html lesson-02.html -o transcripts

  # Convert every page in a folder, A4, shorter paragraphs
  vtt2pdf ~/Downloads/course --page-size a4 --max-paragraph-len 350 -o pdfs

  # Show title and video token without downloading anything
  vtt2pdf --inspect-only lesson-01.html

  # Machine-readable batch report; remove pages that converted
  vtt2pdf --json --delete-originals saved/*.html -o pdfs > report.json

ENVIRONMENT VARIABLES:
  Every flag can be set as VTT2PDF_<FLAG>, e.g. VTT2PDF_OUTPUT_DIR,
  VTT2PDF_PAGE_SIZE, VTT2PDF_TIMEOUT. RUST_LOG overrides the log filter.
"#;

/// Convert saved video pages into paragraph-formatted PDF transcripts.
#[derive(Parser, Debug)]
#[command(
    name = "vtt2pdf",
    version,
    about = "Convert saved video pages into PDF transcripts of their captions",
    long_about = "Reads HTML pages that embed a hosted video player, downloads each video's \
WebVTT caption track, and writes one paragraph-formatted PDF per page, titled after the page. \
Run without inputs for an interactive session.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML files or folders of HTML files. Omit for the interactive session.
    inputs: Vec<PathBuf>,

    /// Folder to write PDFs into.
    #[arg(short = 'o', long = "output-dir", env = "VTT2PDF_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Longest paragraph in characters (single sentences may exceed it).
    #[arg(long, env = "VTT2PDF_MAX_PARAGRAPH_LEN", default_value_t = 500)]
    max_paragraph_len: usize,

    /// Body text wrap width in columns.
    #[arg(long, env = "VTT2PDF_WRAP_WIDTH", default_value_t = 80)]
    wrap_width: usize,

    /// Title wrap width in columns.
    #[arg(long, env = "VTT2PDF_TITLE_WRAP_WIDTH", default_value_t = 55)]
    title_wrap_width: usize,

    /// Paper size.
    #[arg(long, env = "VTT2PDF_PAGE_SIZE", value_enum, default_value = "letter")]
    page_size: PageSizeArg,

    /// Host of the embedded player and its caption endpoint.
    #[arg(long, env = "VTT2PDF_HOST", default_value = DEFAULT_CAPTION_HOST)]
    host: String,

    /// Caption language code.
    #[arg(long, env = "VTT2PDF_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Caption download timeout in seconds.
    #[arg(long, env = "VTT2PDF_TIMEOUT")]
    timeout: Option<u64>,

    /// Delete each HTML file whose PDF was written.
    #[arg(long, env = "VTT2PDF_DELETE_ORIGINALS")]
    delete_originals: bool,

    /// Print title and video token only, no download.
    #[arg(long)]
    inspect_only: bool,

    /// Print a JSON report on stdout.
    #[arg(long, env = "VTT2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "VTT2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "VTT2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "VTT2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    Letter,
    A4,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::A4 => PageSize::A4,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.inputs.is_empty();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO logs would interleave with the progress bar and the prompts;
    // both already tell the user what is happening.
    let show_progress = !interactive && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress || interactive || cli.json {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Interactive session ──────────────────────────────────────────────
    if interactive {
        let config = build_config(&cli, None)?;
        let mut ui = TerminalInteraction::new();
        let summary = run_session(&mut ui, &config).await;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
            );
        }
        return Ok(());
    }

    let collected = collect_inputs(&cli.inputs);
    for skipped in &collected.skipped {
        tracing::warn!("Skipping {} (not an HTML file or folder)", skipped.display());
    }
    if collected.files.is_empty() {
        anyhow::bail!("No HTML files found in the given inputs");
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let (sources, failures) = inspect_all(&collected.files, &config).await;
        for (path, e) in &failures {
            eprintln!("{} {}: {}", red("✗"), path.display(), e);
        }
        if sources.is_empty() {
            anyhow::bail!("None of the {} file(s) could be inspected", collected.files.len());
        }

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&sources).context("Failed to serialise sources")?
            );
        } else {
            for source in &sources {
                println!("File:         {}", source.path.display());
                println!("Title:        {}", source.title);
                println!(
                    "Video token:  {}",
                    source.video_token.as_deref().unwrap_or("(not found)")
                );
                if let Some(ref token) = source.video_token {
                    let out = vtt2pdf::output_path_for(&source.title, token, &cli.output_dir, &config);
                    println!("Output:       {}", out.display());
                }
                println!();
            }
        }
        return Ok(());
    }

    // ── Batch conversion ─────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    let summary = convert_batch(&collected.files, &cli.output_dir, &config)
        .await
        .context("Conversion failed")?;

    let mut deleted = 0usize;
    if cli.delete_originals {
        for path in summary.converted_inputs() {
            match delete_original(path) {
                Ok(()) => deleted += 1,
                Err(e) => tracing::error!("{}", e),
            }
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet {
        if !show_progress {
            for file in &summary.files {
                match (&file.output, &file.error) {
                    (Some(out), _) => eprintln!(
                        "{} {}  →  {}",
                        green("✓"),
                        file.input.display(),
                        out.output_path.display()
                    ),
                    (None, Some(err)) => {
                        eprintln!("{} {}  {}", red("✗"), file.input.display(), err)
                    }
                    (None, None) => {}
                }
            }
        }
        eprintln!(
            "{}  {}/{} files  {}ms  →  {}",
            if summary.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            summary.converted,
            summary.files.len(),
            summary.total_duration_ms,
            bold(&cli.output_dir.display().to_string()),
        );
        if cli.delete_originals {
            eprintln!("   {}", dim(&format!("{deleted} original(s) deleted")));
        }
    }

    if summary.converted == 0 {
        anyhow::bail!("All {} file(s) failed to convert", summary.failed);
    }

    Ok(())
}

/// Inspect every page, keeping the ones that could be read and the errors
/// for the rest.
async fn inspect_all(
    paths: &[PathBuf],
    config: &ConversionConfig,
) -> (Vec<HtmlSource>, Vec<(PathBuf, Vtt2PdfError)>) {
    let mut sources = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();
    for path in paths {
        match inspect(path, config).await {
            Ok(source) => sources.push(source),
            Err(e) => failures.push((path.clone(), e)),
        }
    }
    (sources, failures)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .max_paragraph_len(cli.max_paragraph_len)
        .body_wrap_width(cli.wrap_width)
        .title_wrap_width(cli.title_wrap_width)
        .page_size(cli.page_size.into())
        .caption_host(cli.host.clone())
        .language(cli.language.clone());

    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
