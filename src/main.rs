//! gitview - print the working-tree status of a git repository
//!
//! Opens the repository around PATH (default: the current directory), runs
//! one refresh and prints the files grouped by category.

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use tracing::{debug, error, info};

use gitview::{handle_startup_error, Category, Config, Repository, RepositoryEvent};

/// Command line arguments
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Directory to inspect
    path: Option<PathBuf>,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> anyhow::Result<Self> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut app_args = AppArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("Missing config file path")?;
                    app_args.config_path = Some(PathBuf::from(path));
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("gitview v{}", gitview::VERSION);
                    process::exit(0);
                }
                option if option.starts_with('-') => {
                    bail!("Unknown option: {}", option);
                }
                _ => {
                    if app_args.path.is_some() {
                        bail!("Only one PATH may be given");
                    }
                    app_args.path = Some(PathBuf::from(arg));
                }
            }
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("gitview - working-tree status of a git repository");
    println!();
    println!("USAGE:");
    println!("    gitview [OPTIONS] [PATH]");
    println!();
    println!("ARGS:");
    println!("    <PATH>                 Directory inside the repository (default: .)");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("    -d, --debug            Enable debug logging");
    println!("    -h, --help             Print this help message");
    println!("    -V, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    gitview looks for configuration files in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $GITVIEW_CONFIG");
    println!("    3. <config dir>/gitview/config.toml (or .json)");
    println!("    4. ~/.gitview.toml (or .json)");
    println!("    5. ./.gitview.toml (or .json)");
    println!("    6. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    GITVIEW_CONFIG         Path to configuration file");
    println!("    GITVIEW_DEBUG          Enable debug logging (1 or true)");
    println!("    RUST_LOG               Set logging level (error, warn, info, debug, trace)");
}

/// Filter used when `RUST_LOG` is not set
fn default_log_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn init_logging(debug: bool) {
    let debug = debug
        || env::var("GITVIEW_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let env_filter =
        env::var("RUST_LOG").unwrap_or_else(|_| default_log_level(debug).to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from(env_filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_configuration(args: &AppArgs) -> gitview::Result<Config> {
    match &args.config_path {
        Some(path) => gitview::init_with_config(path),
        None => gitview::init(),
    }
}

/// Two-level tree: category headings, then one line per file
fn render_tree(repository: &Repository) -> String {
    let mut out = format!("{}\n", repository.root().display());

    let categories: Vec<Category> = repository.snapshot().non_empty_categories().collect();
    if categories.is_empty() {
        out.push_str("└── nothing to commit, working tree clean\n");
        return out;
    }

    for (i, category) in categories.iter().enumerate() {
        let last_category = i + 1 == categories.len();
        let (branch, indent) = if last_category {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let files = repository.files(*category);
        out.push_str(&format!("{}{} ({})\n", branch, category.heading(), files.len()));

        for (j, record) in files.iter().enumerate() {
            let leaf = if j + 1 == files.len() { "└── " } else { "├── " };
            out.push_str(&format!("{}{}{}\n", indent, leaf, record));
        }
    }
    out
}

async fn run(args: AppArgs, config: Config) -> anyhow::Result<i32> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let mut repository = Repository::open_with_config(&path, &config)?;
    if !repository.is_refreshing() {
        repository.refresh();
    }

    match repository.next_event().await {
        Some(RepositoryEvent::Refreshed) => {
            print!("{}", render_tree(&repository));
            Ok(0)
        }
        Some(RepositoryEvent::Error { exit_code, message }) => {
            error!("git exited with {}", exit_code);
            eprintln!("gitview: {}", message);
            Ok(1)
        }
        None => bail!("refresh ended without a result"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("gitview: {}", e);
        print_help();
        process::exit(2);
    });

    init_logging(args.debug);
    info!("Starting gitview v{}", gitview::VERSION);
    debug!("Arguments: {:?}", args);

    let config = match load_configuration(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", handle_startup_error(&e));
            process::exit(1);
        }
    };

    let code = match run(args, config).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<gitview::Error>() {
            Some(err) => {
                eprintln!("{}", handle_startup_error(err));
                1
            }
            None => return Err(e),
        },
    };

    process::exit(code);
}
