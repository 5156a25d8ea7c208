use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use schemagen_document::{ConvertOptions, convert};

/// Generate the merged OpenAPI schema for kedge spec files.
#[derive(Debug, Parser)]
#[command(name = "schemagen")]
#[command(about = "Generate OpenAPI schema for Kedge")]
struct Cli {
    /// Location of the Kedge spec file.
    #[arg(short = 'k', long = "kedgespec", default_value = "types.go")]
    kedgespec: PathBuf,

    /// Location of an upstream schema file; repeat for several, later files
    /// overwrite earlier ones on key collision.
    #[arg(short = 's', long = "schema", default_value = "swagger.json")]
    schema: Vec<PathBuf>,

    /// Keep only the workload controller definitions in the output.
    #[arg(long)]
    controller_only: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ConvertOptions {
        declaration_path: cli.kedgespec,
        schema_paths: cli.schema,
        controller_only: cli.controller_only,
    };
    match convert(&options) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Installs the fmt subscriber on stderr; stdout carries the document.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}
