use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

pub const TIMEOUT: Duration = Duration::from_secs(180);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Stateful connection to the control panel. Implementations keep cookies
/// across calls and return the response body of every request.
pub trait Transport {
    fn get(&mut self, url: &str) -> Result<String>;
    fn post(&mut self, url: &str, fields: &[(&str, &str)]) -> Result<String>;
    fn post_multipart(&mut self, url: &str, fields: &[(&str, &str)], file: FilePart<'_>) -> Result<String>;
    /// Sent as `Referer` on every later request.
    fn set_referer(&mut self, url: &str);
}

pub struct Session {
    agent: ureq::Agent,
    referer: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build();
        Session { agent, referer: None }
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        debug!(method, url, "request");
        let request = self.agent.request(method, url);
        match &self.referer {
            Some(referer) => request.set("Referer", referer),
            None => request,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// an error status still carries a page worth classifying. The body is
// decoded with the charset named in Content-Type.
fn read_body(url: &str, res: Result<ureq::Response, ureq::Error>) -> Result<String> {
    let res = match res {
        Ok(res) => res,
        Err(ureq::Error::Status(status, res)) => {
            debug!(url, status, "error status");
            res
        }
        Err(err) => {
            return Err(Error::Transport { url: url.to_owned(), source: Box::new(err) });
        }
    };
    res.into_string().map_err(|source| Error::ReadBody { url: url.to_owned(), source })
}

impl Transport for Session {
    fn get(&mut self, url: &str) -> Result<String> {
        read_body(url, self.request("GET", url).call())
    }

    fn post(&mut self, url: &str, fields: &[(&str, &str)]) -> Result<String> {
        read_body(url, self.request("POST", url).send_form(fields))
    }

    fn post_multipart(&mut self, url: &str, fields: &[(&str, &str)], file: FilePart<'_>) -> Result<String> {
        let mut form = Multipart::new();
        for (name, value) in fields {
            form.text(name, value);
        }
        form.file(file.field, file.file_name, file.bytes);
        let (content_type, body) = form.finish();
        read_body(url, self.request("POST", url).set("Content-Type", &content_type).send_bytes(&body))
    }

    fn set_referer(&mut self, url: &str) {
        self.referer = Some(url.to_owned());
    }
}

/// `multipart/form-data` body builder.
pub struct Multipart {
    boundary: String,
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::with_boundary(format!("----setssl{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: String) -> Self {
        Multipart { boundary, body: Vec::new() }
    }

    fn head(&mut self, disposition: &str) {
        let head = format!("--{}\r\nContent-Disposition: form-data; {disposition}\r\n", self.boundary);
        self.body.extend_from_slice(head.as_bytes());
    }

    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.head(&format!("name=\"{name}\""));
        self.body.extend_from_slice(b"\r\n");
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(&mut self, name: &str, file_name: &str, bytes: &[u8]) -> &mut Self {
        self.head(&format!("name=\"{name}\"; filename=\"{file_name}\""));
        self.body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the `Content-Type` header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (format!("multipart/form-data; boundary={}", self.boundary), self.body)
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}
