use std::fmt;

const BODY_EXCERPT_LIMIT: usize = 300;

/// Protocol-level failure talking to Radarr, Sonarr or Tautulli
#[derive(Debug)]
pub struct SourceError {
    service: &'static str,
    message: String,
}

impl SourceError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }

    /// Non-2xx response; keeps a short excerpt of the body
    pub fn status(service: &'static str, status: u16, body: &str) -> Self {
        let excerpt: String = body.trim().chars().take(BODY_EXCERPT_LIMIT).collect();
        Self::new(service, format!("status {}: {}", status, excerpt))
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.service, self.message)
    }
}

impl std::error::Error for SourceError {}
