//! CLI binary for text-helper.
//!
//! A thin shim over the library crate: maps flags to `SessionConfig`, loads
//! one document, runs `--op` commands in order, then prints, saves or drops
//! into an interactive loop.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use text_helper::{
    write_artifact, Command, Direction, DocumentKind, DocumentLoader, Mode, Reply,
    SessionConfig, SessionController, TextStats,
};
use tracing_subscriber::EnvFilter;

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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Read a file (page 1)
  texthelper notes.txt

  # Read page 3 of a PDF
  texthelper --page 3 book.pdf

  # Transform and save
  texthelper --mode append --op upper --op 'replace WORLD EARTH' notes.txt -o out/

  # Append a signature block when saving
  texthelper --mode append --append 'Reviewed.\nThanks' notes.txt -o notes_final.txt

  # Stats as JSON
  texthelper --json notes.txt

  # Interactive session
  texthelper -i notes.txt

COMMANDS (for --op and interactive mode):
  open <path>, mode read|append, next, prev,
  upper, lower, strip, capitalize, title,
  replace <old> <new>, count <sub>, edit <text>,
  show, preview, stats, save [extra], help, quit

  Quote arguments containing spaces: replace "old text" "new text"
  Escapes inside arguments: \n \t \" \\

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Override log filtering (e.g. text_helper=debug)
"#;

/// Read, transform and save plain-text files; read PDFs page by page.
#[derive(Parser, Debug)]
#[command(
    name = "texthelper",
    version,
    about = "Read, transform and save plain-text files; read PDFs page by page",
    long_about = "A plain-text editor and Kindle-style reader for the terminal. \
.txt files can be transformed and saved in append mode; .pdf files are read-only \
and need the pdfium library at runtime.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// A .txt or .pdf file to open.
    input: Option<PathBuf>,

    /// Open mode.
    #[arg(long, env = "TEXTHELPER_MODE", value_enum, default_value = "read")]
    mode: ModeArg,

    /// Command to run after loading (repeatable, applied in order).
    #[arg(long = "op", value_name = "COMMAND")]
    ops: Vec<String>,

    /// Extra text appended on save (`\n` is a newline).
    #[arg(long = "append", value_name = "TEXT", default_value = "")]
    extra: String,

    /// Save the result to this file or directory (requires --mode append).
    #[arg(short, long, env = "TEXTHELPER_OUTPUT")]
    output: Option<PathBuf>,

    /// Page to show first (1-indexed).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Print a JSON summary of the session instead of the page text.
    #[arg(long, env = "TEXTHELPER_JSON")]
    json: bool,

    /// Run an interactive command loop on stdin.
    #[arg(short, long)]
    interactive: bool,

    /// Lines shown by the preview.
    #[arg(long, env = "TEXTHELPER_PREVIEW_LINES", default_value_t = 20)]
    preview_lines: usize,

    /// Suffix added to the file stem when saving.
    #[arg(long, env = "TEXTHELPER_SUFFIX", default_value = "_edited")]
    suffix: String,

    /// Largest accepted input, in MiB.
    #[arg(long, env = "TEXTHELPER_MAX_UPLOAD_MB", default_value_t = 200)]
    max_upload_mb: usize,

    /// Disable PDF support (skip binding pdfium).
    #[arg(long, env = "TEXTHELPER_NO_PDF")]
    no_pdf: bool,

    /// Path to libpdfium (file or directory).
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Disable the spinner shown while a PDF is read.
    #[arg(long, env = "TEXTHELPER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TEXTHELPER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and document text.
    #[arg(short, long, env = "TEXTHELPER_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Read,
    Append,
}

impl From<ModeArg> for Mode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Read => Mode::Read,
            ModeArg::Append => Mode::Append,
        }
    }
}

/// JSON view of the session for `--json`.
#[derive(Serialize)]
struct Summary<'a> {
    file_name: &'a str,
    kind: DocumentKind,
    mode: Mode,
    page: usize,
    pages: usize,
    stats: TextStats,
    last_count: Option<usize>,
    text: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let (loader, pdf_unavailable) = DocumentLoader::from_config(&config);
    if let Some(reason) = &pdf_unavailable {
        if cli.interactive && !cli.quiet {
            eprintln!("{} PDF support unavailable: {}", dim("note:"), reason);
        }
    }
    let mut controller = SessionController::new(config, loader);

    // ── Load input ───────────────────────────────────────────────────────
    if let Some(ref path) = cli.input {
        open_with_spinner(&mut controller, path, &cli)?;
        controller
            .set_mode(cli.mode.into())
            .context("Failed to set mode")?;
        for _ in 1..cli.page {
            controller.navigate(Direction::Next);
        }
    } else if !cli.interactive {
        anyhow::bail!("No input file given (pass a file, or use --interactive)");
    }

    // ── Batch commands ───────────────────────────────────────────────────
    for op in &cli.ops {
        let cmd: Command = op
            .parse()
            .with_context(|| format!("Invalid --op '{op}'"))?;
        let reply = cmd
            .execute(&mut controller)
            .with_context(|| format!("--op '{op}' failed"))?;
        handle_reply(reply, &cli)?;
    }

    // ── Interactive loop ─────────────────────────────────────────────────
    if cli.interactive {
        return run_interactive(&mut controller, &cli);
    }

    // ── Final output ─────────────────────────────────────────────────────
    if let Some(ref output) = cli.output {
        let artifact = controller
            .export(&unescape(&cli.extra))
            .context("Cannot save")?;
        let path = write_artifact(&artifact, output).context("Save failed")?;
        if !cli.quiet {
            eprintln!("{} Saved {}", green("✔"), bold(&path.display().to_string()));
        }
    } else if cli.json {
        print_summary(&controller)?;
    } else {
        let reply = Command::Show.execute(&mut controller)?;
        handle_reply(reply, &cli)?;
        if !cli.quiet {
            if let Some(stats) = controller.stats() {
                eprintln!(
                    "{}",
                    dim(&format!(
                        "Lines: {}    Words: {}    Characters: {}",
                        stats.lines, stats.words, stats.characters
                    ))
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `SessionConfig`.
fn build_config(cli: &Cli) -> Result<SessionConfig> {
    let mut builder = SessionConfig::builder()
        .preview_lines(cli.preview_lines)
        .export_suffix(cli.suffix.clone())
        .max_upload_bytes(cli.max_upload_mb.saturating_mul(1024 * 1024))
        .enable_pdf(!cli.no_pdf);

    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_library_path(path.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Load `path`, showing a spinner while a PDF is extracted.
fn open_with_spinner(controller: &mut SessionController, path: &Path, cli: &Cli) -> Result<()> {
    let is_pdf = DocumentKind::from_file_name(&path.to_string_lossy())
        == Some(DocumentKind::Paginated);
    let spinner = (is_pdf && !cli.quiet && !cli.no_progress && !cli.json).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Reading");
        bar.set_message(path.display().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let result = Command::Open(path.to_path_buf()).execute(controller);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let reply = result.with_context(|| format!("Failed to open {}", path.display()))?;
    handle_reply(reply, cli)?;
    Ok(())
}

/// Print or act on a command reply. Returns true when the loop should end.
fn handle_reply(reply: Reply, cli: &Cli) -> Result<bool> {
    match reply {
        Reply::Message(msg) => {
            if !cli.quiet {
                eprintln!("{msg}");
            }
        }
        Reply::Text(text) => {
            write_text(&mut io::stdout().lock(), &text).context("Failed to write to stdout")?;
        }
        Reply::Artifact(artifact) => {
            let target = cli.output.clone().unwrap_or_else(|| PathBuf::from("."));
            let path = write_artifact(&artifact, &target).context("Save failed")?;
            if !cli.quiet {
                eprintln!("{} Saved {}", green("✔"), bold(&path.display().to_string()));
            }
        }
        Reply::Quit => return Ok(true),
    }
    Ok(false)
}

/// Write document text, ending it with a newline if it lacks one.
fn write_text(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn run_interactive(controller: &mut SessionController, cli: &Cli) -> Result<()> {
    let stdin = io::stdin();
    if !cli.quiet {
        eprintln!("{}", dim("Type 'help' for commands, 'quit' to leave."));
    }

    loop {
        eprint!("{} ", bold(">"));
        io::stderr().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read stdin")? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        // Errors are reported and the loop carries on; nothing here is fatal.
        let outcome = line
            .trim()
            .parse::<Command>()
            .and_then(|cmd| cmd.execute(controller));
        match outcome {
            Ok(reply) => {
                if handle_reply(reply, cli)? {
                    break;
                }
            }
            Err(e) => eprintln!("{} {}", red("✗"), e),
        }
    }
    Ok(())
}

fn print_summary(controller: &SessionController) -> Result<()> {
    let document = controller
        .document()
        .context("No document loaded")?;
    let summary = Summary {
        file_name: document.file_name(),
        kind: document.kind(),
        mode: controller.mode().unwrap_or_default(),
        page: controller.page_index().unwrap_or(0) + 1,
        pages: document.page_count(),
        stats: controller.stats().unwrap_or_default(),
        last_count: controller.last_count(),
        text: controller.current_page_text().unwrap_or_default(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
    );
    Ok(())
}

/// Expand the same escapes the command language accepts.
fn unescape(s: &str) -> String {
    text_helper::command::tokenize(&format!("\"{}\"", s.replace('"', "\\\"")))
        .ok()
        .and_then(|mut t| t.pop())
        .unwrap_or_else(|| s.to_string())
}
