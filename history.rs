//! Append-only ledger of `target<TAB>fingerprint` lines.
//!
//! There is no locking. Two runs sharing one history file may race; the tool
//! is meant for a single operator.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::material::Fingerprint;

pub fn is_in_history(path: &Path, target: &str, fingerprint: &Fingerprint) -> Result<bool> {
    let f = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(source) => return Err(Error::io(path, source)),
    };
    for line in std::io::BufReader::new(f).lines() {
        let line = line.map_err(|source| Error::io(path, source))?;
        let items: Vec<&str> = line.split_whitespace().collect();
        if let [t, fp] = items[..] {
            if t == target && fp == fingerprint.as_str() {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

pub fn append(path: &Path, target: &str, fingerprint: &Fingerprint) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::io(path, source))?;
    writeln!(f, "{target}\t{fingerprint}").map_err(|source| Error::io(path, source))
}
