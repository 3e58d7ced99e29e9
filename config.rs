use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_PORTAL: &str = "https://secure.sakura.ad.jp/rscontrol/";

#[derive(serde::Deserialize)]
pub struct Config {
    pub domain: String,
    pub password: String,
    #[serde(default)]
    pub portal: Option<url::Url>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("domain", &self.domain)
            .field("password", &"<redacted>")
            .field("portal", &self.portal)
            .finish()
    }
}

impl Config {
    /// Base URL of the panel. Always ends in `/` so relative pages join
    /// below it rather than replacing its last segment.
    pub fn portal(&self) -> Result<url::Url> {
        let mut portal = match &self.portal {
            Some(portal) => portal.clone(),
            None => DEFAULT_PORTAL.parse()?,
        };
        if !portal.path().ends_with('/') {
            let path = format!("{}/", portal.path());
            portal.set_path(&path);
        }
        Ok(portal)
    }
}

pub fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let f = std::fs::File::open(path).map_err(|source| Error::io(path, source))?;
    serde_json::from_reader(std::io::BufReader::new(f)).map_err(|source| Error::Config {
        path: path.to_owned(),
        source,
    })
}
