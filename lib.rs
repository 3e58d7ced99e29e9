pub mod config;
pub mod error;
pub mod history;
pub mod material;
pub mod portal;
pub mod session;
pub mod token;
pub mod workflow;

use std::path::PathBuf;

use tracing::info;

pub use error::{Error, Result};

use config::{parse_json, Config};
use material::{Material, MaterialPaths};
use portal::Endpoints;
use session::Transport;
use workflow::Installer;

pub struct Options {
    pub config: PathBuf,
    pub target: String,
    pub material: MaterialPaths,
    pub verbose: bool,
    pub history: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Installed,
    /// The same key was already installed for the target; nothing was sent.
    AlreadyInstalled,
}

impl Outcome {
    /// Verbose-mode message for the operator. A completed install reports
    /// itself from the workflow.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Outcome::Installed => None,
            Outcome::AlreadyInstalled => Some("使用済みのキーです"),
        }
    }
}

/// Checks inputs and history, then logs in and installs through the
/// transport that `connect` builds. `connect` is not called for a key that
/// is already in the history.
pub fn run<T, F>(opts: &Options, connect: F) -> Result<Outcome>
where
    T: Transport,
    F: FnOnce(&Config) -> T,
{
    let material = Material::load(&opts.material)?;
    info!(sni = %opts.target, fingerprint = %material.fingerprint, "loaded key");

    if let Some(history) = &opts.history {
        if history::is_in_history(history, &opts.target, &material.fingerprint)? {
            info!(sni = %opts.target, "key already installed");
            return Ok(Outcome::AlreadyInstalled);
        }
    }

    let config: Config = parse_json(&opts.config)?;
    let urls = Endpoints::new(&config.portal()?, &opts.target)?;

    let mut installer = Installer::new(connect(&config), opts.verbose);
    installer.login(&urls.login, &config.domain, &config.password)?;
    installer.install(&urls, &material)?;

    if let Some(history) = &opts.history {
        history::append(history, &opts.target, &material.fingerprint)?;
    }
    Ok(Outcome::Installed)
}
