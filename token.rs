use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, PageReason, Result, Step};

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"name="Token" value="([^"]*)""#).expect("regex"));

/// Anti-CSRF token scraped from a form. Page-scoped: each response replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn find_token(body: &str) -> Option<Token> {
    RE_TOKEN.captures(body).map(|caps| Token(caps[1].to_owned()))
}

pub fn extract_token(body: &str, step: Step) -> Result<Token> {
    find_token(body).ok_or_else(|| Error::unexpected(step, PageReason::TokenMissing))
}
