//! StagScribe CLI
//!
//! Usage:
//!   stagscribe [OPTIONS] <COMMAND>
//!
//! Commands:
//!   lint     Validate a scene file
//!   convert  Convert a scene file to SVG
//!   parse    Print the resolved scene tree

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};

use stagscribe::config::Settings;
use stagscribe::{
    convert_with_config, has_errors, lint, parse, resolve, DebugModes, RenderConfig, RenderError,
};

#[derive(Parser, Debug)]
#[command(name = "stagscribe")]
#[command(about = "A human-readable scene language that compiles to SVG")]
#[command(version)]
struct Cli {
    /// Settings file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a scene file
    Lint {
        file: PathBuf,
    },

    /// Convert a scene file to SVG
    Convert {
        file: PathBuf,

        /// Output SVG file (prints to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render even when lint reports errors
        #[arg(long)]
        skip_lint: bool,

        /// Debug overlays: all, labels, colors, grid, boxes, markers (comma-separated)
        #[arg(long)]
        debug: Option<DebugModes>,
    },

    /// Print the resolved scene tree
    Parse {
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(command:? = cli.command; "Parsed arguments");

    let config = match &cli.config {
        Some(path) => Settings::load(path).and_then(|s| s.render_config()),
        None => Ok(RenderConfig::default()),
    };
    let config = config.unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        process::exit(1);
    });

    let code = match &cli.command {
        Command::Lint { file } => run_lint(file),
        Command::Convert {
            file,
            output,
            skip_lint,
            debug,
        } => {
            let mut config = config.with_strict(!skip_lint);
            if let Some(modes) = debug {
                config.svg.debug = *modes;
            }
            run_convert(file, output.as_deref(), &config)
        }
        Command::Parse { file } => run_parse(file),
    };
    process::exit(code);
}

fn read_source(file: &Path) -> String {
    fs::read_to_string(file).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", file.display(), e);
        process::exit(1);
    })
}

fn run_lint(file: &Path) -> i32 {
    let source = read_source(file);
    let scene = match parse(&source)
        .map_err(RenderError::from)
        .and_then(|doc| resolve(&doc).map_err(RenderError::from))
    {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Parse error: {}", e.format(&source, &file.display().to_string()));
            return 1;
        }
    };

    let diagnostics = lint::check(&scene);
    if diagnostics.is_empty() {
        println!("{}: OK", file.display());
        return 0;
    }
    for d in &diagnostics {
        println!("{}: {}", file.display(), d);
    }
    i32::from(has_errors(&diagnostics))
}

fn run_convert(file: &Path, output: Option<&Path>, config: &RenderConfig) -> i32 {
    let source = read_source(file);
    let conversion = match convert_with_config(&source, config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.format(&source, &file.display().to_string()));
            return 1;
        }
    };

    for d in &conversion.diagnostics {
        eprintln!("{}: {}", file.display(), d);
    }

    match output {
        Some(path) => {
            let written = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| fs::write(path, &conversion.svg));
            if let Err(e) = written {
                eprintln!("Error writing '{}': {}", path.display(), e);
                return 1;
            }
            info!(path = path.display().to_string().as_str(); "Wrote SVG");
            println!("Written to {}", path.display());
        }
        None => println!("{}", conversion.svg),
    }
    0
}

fn run_parse(file: &Path) -> i32 {
    let source = read_source(file);
    let scene = parse(&source)
        .map_err(RenderError::from)
        .and_then(|doc| resolve(&doc).map_err(RenderError::from));
    match scene {
        Ok(scene) => {
            print!("{}", scene);
            0
        }
        Err(e) => {
            eprintln!("Parse error: {}", e.format(&source, &file.display().to_string()));
            1
        }
    }
}
