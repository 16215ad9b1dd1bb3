//! Command line front end for building and publishing the RxJS docset.

use std::{env, io, path::PathBuf, process};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use librxdash::{DEFAULT_PRODUCT, DocsetBuilder, Publisher};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log verbosity, overridden per module by RUST_LOG
    #[arg(long, value_enum, default_value = "info", env = "RXDASH_LOG_LEVEL", global = true)]
    log_level: LogLevel,

    /// Action to run.
    #[command(subcommand)]
    command: Command,
}

/// Top-level actions.
#[derive(Subcommand)]
enum Command {
    /// Render the documentation site, index it, and package the docset
    Build(BuildArgs),
    /// Archive a built docset and record it in the distribution catalog
    Publish(PublishArgs),
}

/// Options shared by both commands.
#[derive(Args)]
struct CommonArgs {
    /// RxJS checkout containing docs_app
    rxjs_dir: PathBuf,

    /// Product name, used for the docset folder and archive
    #[arg(long, default_value = DEFAULT_PRODUCT, env = "RXDASH_PRODUCT")]
    product: String,

    /// Templates directory (page.html, Info.plist, icons, docset.json)
    #[arg(long, env = "RXDASH_TEMPLATES")]
    templates: Option<PathBuf>,

    /// Docset folder, defaults to <product>.docset
    #[arg(long, env = "RXDASH_DOCSET_DIR")]
    docset_dir: Option<PathBuf>,
}

/// Arguments of `rxdash build`.
#[derive(Args)]
struct BuildArgs {
    /// Paths and product.
    #[command(flatten)]
    common: CommonArgs,

    /// Static assets copied into the site
    #[arg(long, env = "RXDASH_ASSETS")]
    assets: Option<PathBuf>,

    /// Rendered site directory
    #[arg(long, env = "RXDASH_OUTPUT")]
    output: Option<PathBuf>,

    /// Run npm install in docs_app when node_modules is missing
    #[arg(long, default_value_t = false, env = "RXDASH_INSTALL_DEPS")]
    install_deps: bool,

    /// Navigation urls left out of the index (replaces the defaults)
    #[arg(long, value_delimiter = ',', env = "RXDASH_EXCLUDE")]
    exclude: Vec<String>,
}

/// Arguments of `rxdash publish`.
#[derive(Args)]
struct PublishArgs {
    /// Paths and product.
    #[command(flatten)]
    common: CommonArgs,

    /// Docset folder in a Dash-User-Contributions checkout
    #[arg(long, env = "RXDASH_DEST")]
    dest: Option<PathBuf>,

    /// Publish as this version instead of the one in navigation.json
    #[arg(long, value_name = "VERSION", env = "RXDASH_RELEASE")]
    release: Option<String>,

    /// Author name recorded in docset.json
    #[arg(long, env = "RXDASH_AUTHOR_NAME")]
    author_name: Option<String>,

    /// Author link recorded in docset.json
    #[arg(long, env = "RXDASH_AUTHOR_LINK")]
    author_link: Option<String>,
}

/// Verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Stage progress.
    Info,
    /// Skipped entries and file operations.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    fn to_filter_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Logs go to stderr so stdout only carries the command summary.
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run `rxdash build`.
fn run_build(args: BuildArgs) -> Result<()> {
    let work_dir = env::current_dir().context("cannot determine working directory")?;
    debug!(work_dir = %work_dir.display(), "building");
    let report = DocsetBuilder::new(&args.common.rxjs_dir, work_dir)
        .with_product(args.common.product)
        .with_templates(args.common.templates)
        .with_docset(args.common.docset_dir)
        .with_assets(args.assets)
        .with_output(args.output)
        .with_install_deps(args.install_deps)
        .with_excluded_urls(args.exclude)
        .build()
        .with_context(|| format!("build from {} failed", args.common.rxjs_dir.display()))?;

    println!(
        "{}: {} pages, {} index entries",
        report.docset.display(),
        report.pages.total(),
        report.index.len()
    );
    Ok(())
}

/// Run `rxdash publish`.
fn run_publish(args: PublishArgs) -> Result<()> {
    let work_dir = env::current_dir().context("cannot determine working directory")?;
    let dest = args.dest.unwrap_or_else(|| {
        PathBuf::from("../Dash-User-Contributions/docsets").join(&args.common.product)
    });
    let dest = work_dir.join(dest);
    let report = Publisher::new(&args.common.rxjs_dir, work_dir, &dest)
        .with_product(args.common.product)
        .with_templates(args.common.templates)
        .with_docset(args.common.docset_dir)
        .with_version(args.release)
        .with_author(args.author_name, args.author_link)
        .publish()
        .with_context(|| format!("publish to {} failed", dest.display()))?;

    let status = if report.current { "current" } else { "archived" };
    println!(
        "published {} ({status}); catalog version {}",
        report.version, report.catalog.version
    );
    for version in &report.pruned {
        println!("removed versions/{version}");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let result = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Publish(args) => run_publish(args),
    };

    if let Err(e) = result {
        eprintln!("{e:#}");
        process::exit(1);
    }
}
