use anyhow::{Context, Result, bail};
use blockindent_config::Config;
use blockindent_engine::{
    AffectedRange, Argument, FixedIndenter, Host, LineIndenter, Presenter, PythonIndenter,
    PythonLineClassifier, Session, io,
};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "blockindent")]
#[command(
    about = "Reindent a line of Python source and carry the change over its block",
    long_about = None
)]
struct Args {
    /// Source file to reindent
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Line to reindent (1-based)
    #[arg(short = 'l', long = "line", value_name = "LINE")]
    line: usize,

    /// Put the line at this many columns instead of computing its indentation
    #[arg(short = 'i', long = "indent", value_name = "COLUMNS")]
    indent: Option<usize>,

    /// Visit exactly N lines starting at LINE instead of detecting the block
    #[arg(
        short = 'n',
        long = "count",
        value_name = "N",
        allow_negative_numbers = true,
        conflicts_with = "unbounded"
    )]
    count: Option<i64>,

    /// Detect the block with both blank-line limits lifted
    #[arg(short = 'u', long = "unbounded")]
    unbounded: bool,

    /// Press the command K times; presses without --count/--unbounded cycle
    #[arg(short = 'r', long = "repeat", value_name = "K", default_value_t = 1)]
    repeat: usize,

    /// Config file (default: ~/.config/blockindent/config.toml)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the result back to FILE instead of printing it
    #[arg(long = "in-place")]
    in_place: bool,
}

impl Args {
    fn argument(&self) -> Argument {
        match (self.count, self.unbounded) {
            (Some(count), _) => Argument::Count(count),
            (None, true) => Argument::Unbounded,
            (None, false) => Argument::Absent,
        }
    }
}

/// Reports the affected lines on the log instead of highlighting them
struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, range: &AffectedRange, duration: Duration) {
        log::info!(
            "Reindented lines {}-{} (highlight {:.1}s)",
            range.start + 1,
            range.end,
            duration.as_secs_f64()
        );
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            let path = Config::expand_path(path).unwrap_or_else(|| path.to_path_buf());
            if !path.exists() {
                bail!("Config file {} does not exist", path.display());
            }
            Config::load_from_path(&path)?
        }
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_default())
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    log::debug!("Using {:?}", config.reindent);

    let buffer = io::read_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let line_count = buffer.line_count();
    if args.line == 0 || args.line > line_count {
        bail!(
            "Line {} is outside {} (1..={line_count})",
            args.line,
            args.file.display()
        );
    }
    let cursor_line = args.line - 1;

    let classifier = PythonLineClassifier::new();
    let mut indenter: Box<dyn LineIndenter> = match args.indent {
        Some(columns) => Box::new(FixedIndenter::new(
            buffer.indent_style().indentation_for_columns(columns),
        )),
        None => Box::new(PythonIndenter::new()),
    };
    let mut presenter = LogPresenter;

    let mut session = Session::new(buffer, config.reindent);
    for press in 1..=args.repeat.max(1) {
        let mut host = Host {
            classifier: &classifier,
            indenter: indenter.as_mut(),
            presenter: &mut presenter,
        };
        let range = session.indent_and_extend(cursor_line, args.argument(), &mut host)?;
        log::debug!(
            "Press {press}: {:?} mode, {} line(s) affected",
            session.cycle_state().mode(),
            range.len()
        );
    }

    let buffer = session.into_buffer();
    if args.in_place {
        io::write_file(&args.file, &buffer)
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
    } else {
        std::io::stdout()
            .write_all(&buffer.to_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
