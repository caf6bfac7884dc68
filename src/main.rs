use clap::{Parser, Subcommand, ValueEnum};
use skillcheck::config::Config;
use skillcheck::report::ValidationReport;
use skillcheck::skillpack::index::{discover, PackageIndex};
use skillcheck::skillpack::validator::validate;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skillcheck", about = "Structural validator for skill packages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more skill package directories
    Validate {
        /// Package directories (or roots, with --recursive)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Treat each path as a root whose subdirectories are packages
        #[arg(short, long)]
        recursive: bool,

        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Also print passed checks
        #[arg(short, long)]
        verbose: bool,

        /// Threshold overrides (default chain: ~/.skillcheck.toml, then ./.skillcheck.toml)
        #[arg(long, env = "SKILLCHECK_CONFIG")]
        config: Option<PathBuf>,
    },
    /// List the skill packages under a root directory
    List {
        /// Directory whose subdirectories are packages
        root: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Validate {
            paths,
            recursive,
            format,
            verbose,
            config,
        } => run_validate(paths, recursive, format, verbose, config.as_deref()),
        Commands::List { root } => run_list(&root),
    };
    std::process::exit(code);
}

/// Exit codes: 0 = accepted, 1 = hard failures, 2 = environment error.
fn run_validate(
    paths: Vec<PathBuf>,
    recursive: bool,
    format: Format,
    verbose: bool,
    config_path: Option<&std::path::Path>,
) -> i32 {
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("skillcheck: cannot load config: {e:#}");
            return 2;
        }
    };

    let mut targets = Vec::new();
    if recursive {
        for root in &paths {
            match discover(root) {
                Ok(mut found) => targets.append(&mut found),
                Err(e) => {
                    eprintln!("skillcheck: {e}");
                    return 2;
                }
            }
        }
    } else {
        targets = paths;
    }
    targets.sort();
    targets.dedup();

    let mut reports: Vec<ValidationReport> = Vec::new();
    for target in &targets {
        match validate(target, &config) {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("skillcheck: {e}");
                return 2;
            }
        }
    }

    match format {
        Format::Text => {
            let multiple = reports.len() > 1;
            for (i, report) in reports.iter().enumerate() {
                if multiple {
                    if i > 0 {
                        println!();
                    }
                    println!("{}:", report.package.display());
                }
                println!("{}", report.render_text(verbose));
            }
        }
        Format::Json => match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("skillcheck: cannot serialize report: {e}");
                return 2;
            }
        },
    }

    if reports.iter().all(|r| r.accepted()) {
        0
    } else {
        1
    }
}

fn run_list(root: &std::path::Path) -> i32 {
    match PackageIndex::scan(root) {
        Ok(index) => {
            let listing = index.render_listing();
            if !listing.is_empty() {
                println!("{listing}");
            }
            println!("{} skill packages", index.count());
            0
        }
        Err(e) => {
            eprintln!("skillcheck: {e}");
            2
        }
    }
}
