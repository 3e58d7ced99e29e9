use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use setssl::material::MaterialPaths;
use setssl::session::Session;
use setssl::{Options, Outcome};

/// Install an SSL certificate on the Sakura rental server control panel
#[derive(Parser, Debug)]
#[command(name = "setssl", version, long_about = None)]
struct Cli {
    /// JSON file with `domain` and `password` of the control panel
    #[arg(short, long)]
    config: PathBuf,

    /// SNI domain to install the certificate for
    #[arg(short, long)]
    target: String,

    /// Private key
    #[arg(long)]
    secret: PathBuf,

    /// Certificate issued by the CA
    #[arg(long)]
    cacert1: PathBuf,

    /// Intermediate certificate
    #[arg(long)]
    cacert2: PathBuf,

    #[arg(long)]
    verbose: bool,

    /// Skip keys already installed for the target, and record new ones
    #[arg(long)]
    history: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let Cli { config, target, secret, cacert1, cacert2, verbose, history } = Cli::parse();
    init_tracing(verbose);

    let opts = Options {
        config,
        target,
        material: MaterialPaths { secret, cacert1, cacert2 },
        verbose,
        history,
    };
    let result = setssl::run(&opts, |_| Session::new());
    if let Err(err) = &result {
        error!("{err}");
    }
    let (notice, code) = report(&result, verbose);
    if let Some(notice) = notice {
        println!("{notice}");
    }
    ExitCode::from(code)
}

/// Operator line for stdout and the process exit code of a run.
fn report(result: &setssl::Result<Outcome>, verbose: bool) -> (Option<&'static str>, u8) {
    match result {
        Ok(outcome) => (outcome.notice().filter(|_| verbose), 0),
        Err(err) => (err.notice(verbose), err.exit_code()),
    }
}
