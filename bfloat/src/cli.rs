//! Command-line argument parsing.
//!
//! Usage:
//!   bfloat [options] run <file.bf | file.b | dir>
//!   bfloat [options] compile <dir> [-o <out>]

use std::path::PathBuf;
use std::time::Duration;

use bfloat::config::{yield_interval_from_millis, CellLimit, EngineConfig};

pub const USAGE: &str = "\
usage:
  bfloat [options] run <path>       run a .bf/.b file or a macro directory
  bfloat [options] compile <dir>    compile a macro directory to <dir>.bf

options:
  -h, --help          show this help
  --cell-size=<n>     wrap cells at n, or never if n=-1 (default 256)
  --yield-ms=<n>      yield to the host every n ms, or never if n=-1
  -o <file>           output file for `compile`
  -v, -vv             debug / trace logging on stderr";

// ── Public types ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CliArgs {
    pub command: Command,
    pub cell_limit: CellLimit,
    pub yield_interval: Option<Duration>,
    /// Output path for `compile` (`-o`).
    pub output: Option<PathBuf>,
    /// Number of `-v` flags.
    pub verbosity: u8,
}

impl CliArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_cell_limit(self.cell_limit)
            .with_yield_interval(self.yield_interval)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub enum Command {
    #[default]
    Help,
    Run(PathBuf),
    Compile(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut help = false;
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (name, value) = match long.split_once('=') {
                Some((n, v)) => (n, Some(v)),
                None => (long, None),
            };
            match name {
                "help" => help = true,
                "cell-size" => {
                    let n = parse_number(name, value)?;
                    args.cell_limit = CellLimit::from_size(n)?;
                }
                "yield-ms" => {
                    let n = parse_number(name, value)?;
                    args.yield_interval = yield_interval_from_millis(n)?;
                }
                _ => return Err(format!("unexpected argument {arg}")),
            }
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'h' => help = true,
                'v' => args.verbosity = args.verbosity.saturating_add(1),

                // -o<file> or -o <file>
                'o' => {
                    let file = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-o requires a file argument".to_owned());
                    };
                    args.output = Some(PathBuf::from(file));
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    if help {
        args.command = Command::Help;
        return Ok(args);
    }

    let mut positional = positional.into_iter();
    let mode = positional.next().ok_or("expected more arguments")?;
    let path = positional
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("not enough arguments; `{mode}` expects a path"))?;
    if positional.next().is_some() {
        return Err("too many arguments".to_owned());
    }

    args.command = match mode.as_str() {
        "run" => Command::Run(path),
        "compile" => Command::Compile(path),
        other => return Err(format!("invalid mode {other}")),
    };
    if args.output.is_some() && !matches!(args.command, Command::Compile(_)) {
        return Err(format!("-o is only valid with `compile`, not `{mode}`"));
    }
    Ok(args)
}

/// Parse the numeric value of `--name=<n>`.
fn parse_number(name: &str, value: Option<&str>) -> Result<i64, String> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        Some(_) => return Err(format!("expected something after '--{name}='")),
        None => return Err(format!("expected '=' after '--{name}'")),
    };
    value
        .parse()
        .map_err(|_| format!("invalid number for --{name}: {value}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
