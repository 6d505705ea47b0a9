use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use markdown_pdf_config::{Config, LoadOptions};
use markdown_pdf_core::{default_output_path, MarkdownPdf};
use markdown_pdf_flow::parse;

#[derive(Parser)]
#[command(name = "markdown-pdf", version, about, long_about = None)]
pub struct Cli {
    /// Path to markdown file, or `-` to read stdin
    #[arg(value_name = "FILE", default_value = "resume.md")]
    input: PathBuf,

    /// Where to write the PDF (defaults to FILE with a .pdf extension)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Config file that takes precedence over discovered .markdown-pdf.toml files
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the render blocks as JSON instead of writing a PDF
    #[arg(long)]
    blocks: bool,

    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let reading_stdin = cli.input == Path::new("-");

    if cli.blocks {
        let text = read_input(&cli.input, reading_stdin)?;
        let json = serde_json::to_string_pretty(&parse(&text))?;
        emit(&json)?;
        return Ok(0);
    }

    let output = match (&cli.output, reading_stdin) {
        (Some(path), _) => path.clone(),
        (None, false) => default_output_path(&cli.input),
        (None, true) => bail!("--output is required when reading from stdin"),
    };

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options).context("Unable to load configuration")?;
    log::debug!(
        "configuration layers: {:?}",
        config
            .sources
            .layers
            .iter()
            .map(|layer| layer.kind)
            .collect::<Vec<_>>()
    );

    let mut engine = MarkdownPdf::with_pdf(config);
    let conversion = if reading_stdin {
        let text = read_input(&cli.input, true)?;
        engine.convert_text(&text, &output)
    } else {
        engine.convert_file(&cli.input, &output)
    }
    .with_context(|| format!("Unable to convert {}", cli.input.display()))?;

    log::info!("{}", conversion.stats);
    emit(&format!("PDF generated: {}", conversion.output.display()))?;
    Ok(0)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_input(path: &Path, reading_stdin: bool) -> Result<String> {
    if reading_stdin {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read markdown from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read {}", path.display()))
    }
}

fn emit(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match writeln!(handle, "{text}").and_then(|_| handle.flush()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("Failed to write to stdout"),
    }
}
