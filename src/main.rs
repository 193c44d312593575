//! Collage Editor CLI
//!
//! Usage:
//!   collage-editor templates
//!   collage-editor compose --template <NAME> --image <URI>... [OPTIONS]
//!
//! Compose options:
//!   -m, --margin <M>          Gutter between photos (0-10)
//!   -r, --radius <R>          Corner radius (0-20)
//!   -b, --background <COLOR>  Hex color or swatch name
//!   --swap <I:J>              Swap placeholders by index, repeatable
//!   -c, --config <FILE>       Editor configuration (TOML format)
//!   --log-level <LEVEL>       off, error, warn, info, debug or trace

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use log::{debug, error, info, LevelFilter};

use collage_editor::{compose, layout_report, Composition, EditorConfig, Rgba, TemplateRegistry};

#[derive(Parser, Debug)]
#[command(name = "collage-editor")]
#[command(about = "Lay out photos in collage templates")]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the bundled templates
    Templates,

    /// Lay out photos in a template and print the resulting geometry
    Compose {
        /// Template name
        #[arg(short, long)]
        template: String,

        /// Image reference, once per placeholder
        #[arg(short, long = "image", required = true)]
        images: Vec<String>,

        #[arg(short, long)]
        margin: Option<f64>,

        #[arg(short, long)]
        radius: Option<f64>,

        /// Hex color (#rgb, #rrggbb, #rrggbbaa) or swatch name
        #[arg(short, long)]
        background: Option<Rgba>,

        /// Swap two placeholders by index, e.g. 0:2
        #[arg(long = "swap", value_parser = parse_swap)]
        swaps: Vec<(usize, usize)>,

        /// Editor configuration file (TOML format)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn parse_swap(value: &str) -> Result<(usize, usize), String> {
    let (a, b) = value
        .split_once(':')
        .ok_or_else(|| format!("expected I:J, got '{}'", value))?;
    let index = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid index '{}': {}", s, e))
    };
    Ok((index(a)?, index(b)?))
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

    info!(log_level:?; "Starting collage editor");
    debug!(command:? = cli.command; "Parsed arguments");

    match cli.command {
        Command::Templates => print_templates(),
        Command::Compose {
            template,
            images,
            margin,
            radius,
            background,
            swaps,
            config,
        } => {
            let config = match &config {
                Some(path) => match EditorConfig::from_file(path) {
                    Ok(c) => c,
                    Err(e) => {
                        error!(path:? = path; "Failed to load config");
                        eprintln!("Error loading config '{}': {}", path.display(), e);
                        process::exit(1);
                    }
                },
                None => EditorConfig::default(),
            };

            let mut composition = Composition::new(template, images);
            composition.margin = margin;
            composition.corner_radius = radius;
            composition.background = background;
            composition.swaps = swaps;

            let report = compose(&composition, config).and_then(|editor| layout_report(&editor));
            match report {
                Ok(report) => print!("{}", report),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

fn print_templates() {
    for template in TemplateRegistry::all() {
        println!(
            "{:<16} {} placeholders  {}  {}",
            template.name, template.placeholder_count, template.document, template.icon
        );
    }
}
