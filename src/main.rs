//! `bfk`: run or compile a program in any dialect of the family.
//!
//! Usage:
//!   bfk hello.b
//!   bfk --dialect extended --cell-size 2 prog.eb
//!   bfk --compile --output prog.c prog.b
//!   bfk --debug prog.b
//!
//! Settings come from the built-in defaults, then `--config <json>`, then
//! the flags below. Logs go to stderr (`RUST_LOG` overrides the filter).

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brainfunk::{
    debug_run, BfError, BfResult, DialectKind, Engine, EofPolicy, MachineConfig, PauseToken, Ports,
    RunStatus,
};

#[derive(Parser, Debug)]
#[command(name = "bfk", version, about = "Interpreter and C emitter for the Brainfuck family")]
struct Args {
    /// Program source
    input: PathBuf,

    /// Dialect: vanilla, compressed, selfmod, extended, extended2, love, jump, bcd,
    /// bitchanger, loller, extloller, stacked, dollar
    #[arg(long)]
    dialect: Option<DialectKind>,

    /// Cell size in bytes (1, 2, 4 or 8)
    #[arg(long)]
    cell_size: Option<usize>,

    /// Number of cells on the tape
    #[arg(long, allow_negative_numbers = true)]
    cell_count: Option<i64>,

    /// Wrap the pointer around the tape ends
    #[arg(long)]
    wrap_pointer: bool,

    /// Grow the tape on demand
    #[arg(long)]
    dynamic_tape: bool,

    /// What input stores at end of input: minus-one, zero, unchanged, abort
    #[arg(long, allow_hyphen_values = true)]
    eof: Option<EofPolicy>,

    /// Initial memory, read from a file in the escape grammar
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Abort after this many operations
    #[arg(long)]
    max_steps: Option<u64>,

    /// Emit C instead of running
    #[arg(long)]
    compile: bool,

    /// Where --compile writes the C source
    #[arg(long, short, default_value = "a.out.c")]
    output: PathBuf,

    /// Start paused in the debug console (commands on stdin, console on stderr)
    #[arg(long, conflicts_with = "compile")]
    debug: bool,
}

impl Args {
    /// Layer the flags over the configuration file over the defaults.
    fn settings(&self) -> BfResult<MachineConfig> {
        let mut config = match &self.config {
            Some(path) => MachineConfig::from_file(path)?,
            None => MachineConfig::default(),
        };
        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
        }
        if let Some(width) = self.cell_size {
            config.cell_width = width;
        }
        if let Some(count) = self.cell_count {
            config.cell_count = count;
        }
        if self.wrap_pointer {
            config.wrap = true;
        }
        if self.dynamic_tape {
            config.dynamic = true;
        }
        if let Some(eof) = self.eof {
            config.eof = eof;
        }
        if let Some(path) = &self.data {
            config.data = Some(fs::read_to_string(path)?);
        }
        if self.max_steps.is_some() {
            config.max_steps = self.max_steps;
        }
        Ok(config)
    }
}

fn run(args: &Args) -> BfResult<()> {
    let engine = Engine::new(args.settings()?)?;
    let text = fs::read(&args.input).map_err(|e| BfError::Config {
        message: format!("cannot read {}: {}", args.input.display(), e),
    })?;
    let source = engine.source(&text)?;

    if args.compile {
        let c = engine.compile(source)?;
        fs::write(&args.output, c)?;
        info!(output = %args.output.display(), "wrote C source");
        return Ok(());
    }

    if args.debug {
        let token = PauseToken::new();
        token.pause();
        let mut vm = engine
            .interpreter(source, Ports::stdio())?
            .with_pause_token(token);
        if debug_run(&mut vm, io::stdin(), io::stderr())? == RunStatus::Paused {
            info!("run aborted");
        }
        return Ok(());
    }

    engine.run(source, Ports::stdio())?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bfk=info,brainfunk=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Program output may end mid-line
            let _ = io::stdout().flush();
            eprintln!("\nerror[{}]: {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}
