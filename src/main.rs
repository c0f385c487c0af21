//! tilo - Interactive Terminal Log Viewer
//!
//! Views a log file (or stdin) with colorized output, search and selection. When stdin or
//! stdout is not a terminal the colorized lines are printed instead.

use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tilo::app::spawn_input_thread;
use tilo::clipboard::SystemClipboard;
use tilo::file_handler::{load_and_follow, load_lines, InputSource, LineStore};
use tilo::render::TerminalUI;
use tilo::{Application, Config, Highlighter, Viewer, ViewerOptions};
use tokio::sync::mpsc::{self, Receiver};

#[derive(Parser, Debug)]
#[command(name = "tilo", version = tilo::VERSION)]
#[command(about = "An interactive terminal log viewer with regex colorization")]
struct Args {
    /// Log file to view; `-` or nothing reads stdin
    path: Option<String>,

    /// Configuration file (default: discovered under the config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colorization
    #[arg(long)]
    plain: bool,

    /// Keep reading lines appended to the file
    #[arg(short = 'f', long)]
    follow: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let (lines, follow) = read_input(&args).await?;
    if lines.is_empty() && follow.is_none() {
        bail!("no input");
    }

    let config = Config::load(args.config.as_deref())?;
    let highlighter = Highlighter::new(config.rules()?, args.plain);

    if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
        return print_non_interactive(lines, follow, &highlighter).await;
    }

    let options = ViewerOptions {
        line_numbers: config.line_numbers,
        ..ViewerOptions::default()
    };
    let viewer = Viewer::new(LineStore::new(lines), options);
    let mut app = Application::new(
        viewer,
        highlighter,
        Box::new(TerminalUI::new()),
        Box::new(SystemClipboard::new()),
    )
    .with_status_position(config.status_position());

    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = Arc::new(AtomicBool::new(false));
    // Left detached: it is parked in a blocking read when the session ends.
    let _input_thread = spawn_input_thread(io::stdin(), tx, Arc::clone(&shutdown));

    let result = app.run(rx, follow).await;
    shutdown.store(true, Ordering::SeqCst);
    result?;

    Ok(())
}

async fn read_input(args: &Args) -> Result<(Vec<String>, Option<Receiver<Vec<String>>>)> {
    let source = InputSource::from_arg(args.path.as_deref());
    match source {
        InputSource::Stdin => {
            if args.follow {
                bail!("follow requires a file path");
            }
            if args.path.is_none() && io::stdin().is_terminal() {
                bail!("no input provided");
            }
            Ok((load_lines(&source).await?, None))
        }
        InputSource::File(ref path) if args.follow => {
            let (lines, rx) = load_and_follow(path).await?;
            Ok((lines, Some(rx)))
        }
        InputSource::File(_) => Ok((load_lines(&source).await?, None)),
    }
}

async fn print_non_interactive(
    lines: Vec<String>,
    follow: Option<Receiver<Vec<String>>>,
    highlighter: &Highlighter,
) -> Result<()> {
    let result = async {
        write_lines(&lines, highlighter)?;
        if let Some(mut rx) = follow {
            while let Some(batch) = rx.recv().await {
                write_lines(&batch, highlighter)?;
            }
        }
        Ok::<(), io::Error>(())
    }
    .await;

    match result {
        // The reader went away (e.g. `tilo app.log | head`).
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

fn write_lines(lines: &[String], highlighter: &Highlighter) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{}", highlighter.apply(line))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_version_constant() {
        assert!(!tilo::VERSION.is_empty());
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();

        let args = Args::try_parse_from(["tilo", "-f", "--plain", "app.log"]).unwrap();
        assert!(args.follow);
        assert!(args.plain);
        assert_eq!(args.path.as_deref(), Some("app.log"));
        assert!(args.config.is_none());
    }

    #[tokio::test]
    async fn follow_on_stdin_is_rejected() {
        let args = Args::try_parse_from(["tilo", "-f", "-"]).unwrap();
        let err = read_input(&args).await.unwrap_err();
        assert_eq!(err.to_string(), "follow requires a file path");
    }
}
