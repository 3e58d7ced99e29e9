use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// MD5 hex digest of the private key bytes, the history key of an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Fingerprint(format!("{:x}", md5::compute(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct MaterialPaths {
    pub secret: PathBuf,
    pub cacert1: PathBuf,
    pub cacert2: PathBuf,
}

/// Key and certificates, read once before anything touches the network.
pub struct Material {
    pub secret: Vec<u8>,
    pub cacert1: String,
    pub cacert2: String,
    pub fingerprint: Fingerprint,
}

fn require(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingInput { path: path.to_owned() })
    }
}

impl Material {
    pub fn load(paths: &MaterialPaths) -> Result<Self> {
        let MaterialPaths { secret, cacert1, cacert2 } = paths;
        require(secret)?;
        require(cacert1)?;
        require(cacert2)?;
        let read_text = |path: &Path| std::fs::read_to_string(path).map_err(|source| Error::io(path, source));
        let secret = std::fs::read(secret).map_err(|source| Error::io(secret, source))?;
        let fingerprint = Fingerprint::of(&secret);
        Ok(Material {
            cacert1: read_text(cacert1.as_path())?,
            cacert2: read_text(cacert2.as_path())?,
            secret,
            fingerprint,
        })
    }
}
