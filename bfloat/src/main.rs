mod cli;

use std::error::Error;
use std::path::{Path, PathBuf};

use bfloat::engine::{CancelToken, ChannelIo};
use bfloat::{parser, EngineConfig, Library, Machine, Outcome};
use cli::{CliArgs, Command, USAGE};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::Level;

/// Byte delivered to `,` once stdin is exhausted.
const EOF_BYTE: u8 = 0;

#[tokio::main]
async fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("bfloat: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    init_logging(args.verbosity);

    let result = match &args.command {
        Command::Help => {
            println!("bfloat - command line brainfloat\n\n{USAGE}");
            Ok(())
        }
        Command::Run(path) => run(path, &args).await,
        Command::Compile(dir) => compile(dir, &args),
    };

    if let Err(e) = result {
        eprintln!("bfloat: {e}");
        std::process::exit(1);
    }
    // The stdin reader may still be parked in a blocking read; don't wait
    // for it during runtime shutdown.
    std::process::exit(0);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

// ── run ───────────────────────────────────────────────────────────────────────

async fn run(path: &Path, args: &CliArgs) -> Result<(), Box<dyn Error>> {
    let source = load_source(path)?;
    let program = parser::parse(&source)?;
    let outcome = execute(&program, args.engine_config()).await;
    if outcome == Outcome::Cancelled {
        tracing::info!("execution stopped");
    }
    Ok(())
}

/// Raw `.bf`/`.b` files run as written; directories are built first.
fn load_source(path: &Path) -> Result<String, Box<dyn Error>> {
    if path.is_dir() {
        return Ok(Library::load_dir(path)?.build()?);
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("bf" | "b") => {
            Ok(std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?)
        }
        ext => Err(format!(
            "don't know how to run file with extension '{}'",
            ext.unwrap_or("")
        )
        .into()),
    }
}

async fn execute(program: &bfloat::Program, config: EngineConfig) -> Outcome {
    let cancel = CancelToken::new();

    let (tx, rx) = mpsc::channel::<u8>(256);
    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buf = [0u8; 256];
        loop {
            let n = match stdin.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!("stdin: {e}");
                    break;
                }
            };
            for &b in &buf[..n] {
                if tx.send(b).await.is_err() {
                    return;
                }
            }
        }
    });

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let mut io = ChannelIo::new(rx, cancel, std::io::stdout(), std::io::stderr())
        .with_eof_byte(Some(EOF_BYTE));
    Machine::new(config).run(program, &mut io).await
}

// ── compile ───────────────────────────────────────────────────────────────────

fn compile(dir: &Path, args: &CliArgs) -> Result<(), Box<dyn Error>> {
    if !dir.is_dir() {
        return Err(format!("{} is not a macro directory", dir.display()).into());
    }
    let compiled = Library::load_dir(dir)?.build()?;
    let dest = args.output.clone().unwrap_or_else(|| default_output(dir));
    std::fs::write(&dest, compiled).map_err(|e| format!("{}: {e}", dest.display()))?;
    tracing::debug!(dest = %dest.display(), "wrote compiled program");
    Ok(())
}

/// `path/to/dir` → `path/to/dir.bf`
fn default_output(dir: &Path) -> PathBuf {
    // `components()` drops a trailing separator: `src/` → `src.bf`.
    let mut name = dir.components().as_path().as_os_str().to_owned();
    name.push(".bf");
    PathBuf::from(name)
}
