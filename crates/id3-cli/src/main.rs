/// `id3scan`: list, validate, and read the ID3v2 tags embedded in audio
/// files.
///
/// # Command overview
///
/// ```text
/// id3scan <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print every tag and frame found in a file
///   validate   Check that every tag in a file is well formed
///   text       Print the decoded text of one frame
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log skipped candidates and decoded tags to stderr
///   --debug          Also log per-frame decoding and buffer growth
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                           |
/// |------|---------------------------------------------------|
/// | 0    | Success                                           |
/// | 1    | Error (I/O failure, malformed tag, missing frame) |
///
/// All error details and logs are written to stderr so stdout can be piped
/// cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use id3_decoder::FrameId;

mod cmd_inspect;
mod cmd_text;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// ID3v2 tag scanner.
///
/// Finds ID3v2.3 and ID3v2.4 tags anywhere in a file and decodes their
/// frames.
#[derive(Parser)]
#[command(name = "id3scan", version, about = "ID3v2 tag scanner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log skipped candidates and decoded tags to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every decoded frame and buffer resize to stderr.
    #[arg(long, global = true)]
    debug: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print every tag and frame found in a file.
    Inspect(InspectArgs),
    /// Check that every tag in a file is well formed.
    Validate(ValidateArgs),
    /// Print the decoded text of the last frame with the given id.
    Text(TextArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `id3scan inspect`.
///
/// ```text
/// ┌─────────────┬───────────────────────────────────────────────────────┐
/// │ Flag        │ Effect                                                │
/// ├─────────────┼───────────────────────────────────────────────────────┤
/// │ --text      │ Decode each frame payload as text                     │
/// │ --hex       │ Include a 16-byte-per-line hex dump of each payload   │
/// │ --frame ID  │ Show only frames with this id (e.g. TIT2, COMM)       │
/// │ --json      │ Print a JSON report instead of text                   │
/// └─────────────┴───────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the audio file to inspect.
    pub file: PathBuf,

    /// Decode frame payloads as text.
    #[arg(long)]
    pub text: bool,

    /// Show a hex dump of frame payloads.
    #[arg(long)]
    pub hex: bool,

    /// Show only frames with this id.
    #[arg(long)]
    pub frame: Option<FrameId>,

    /// Print a JSON report.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `id3scan validate`.
///
/// Scans the whole file and reports either success checkmarks or a
/// diagnostic for the first malformed tag. Exits with code 1 on failure.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the audio file to validate.
    pub file: PathBuf,
}

/// Arguments for `id3scan text`.
#[derive(clap::Args)]
pub struct TextArgs {
    /// Path to the audio file to read.
    pub file: PathBuf,

    /// Frame id, e.g. `TIT2`. Three-character legacy ids are accepted.
    pub id: FrameId,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Text(args) => cmd_text::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool, debug: bool) {
    if verbose || debug {
        let level = if debug { "trace" } else { "debug" };
        tracing_subscriber::fmt()
            .with_env_filter(level)
            .with_writer(std::io::stderr)
            .init();
    }
}
