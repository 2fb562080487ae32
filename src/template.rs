//! PADT response template loading and placeholder substitution.
//!
//! The template is re-read from disk on every request so the file can be
//! edited while the stub is running. When it cannot be read, the embedded
//! [`DEFAULT_TEMPLATE`] is served instead. Templates are handled as raw
//! bytes, so documents in any ASCII-compatible encoding are served as-is.

use std::io;
use std::path::Path;

use strum::{AsRefStr, Display};
use tracing::warn;
use uuid::Uuid;

use crate::metrics;

/// Token replaced with a fresh party id in every response.
pub const PLACEHOLDER: &str = "${PartyID}";

/// Response served when the configured file is unreadable.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/padt_response.xml");

/// Where a template's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TemplateSource {
    /// Read from the configured file.
    File,
    /// Embedded default.
    Fallback,
}

/// A response template, ready to render.
#[derive(Debug, Clone)]
pub struct Template {
    body: Vec<u8>,
    source: TemplateSource,
}

impl Template {
    /// The embedded default template.
    pub fn fallback() -> Self {
        Self {
            body: DEFAULT_TEMPLATE.as_bytes().to_vec(),
            source: TemplateSource::Fallback,
        }
    }

    /// Read a template file verbatim.
    pub async fn from_file(path: &Path) -> io::Result<Self> {
        let body = tokio::fs::read(path).await?;
        Ok(Self {
            body,
            source: TemplateSource::File,
        })
    }

    /// Read a template file, falling back to the embedded default.
    pub async fn load_or_fallback(path: &Path) -> Self {
        match Self::from_file(path).await {
            Ok(template) => template,
            Err(e) => Self::fallback_for(path, &e),
        }
    }

    /// Log why `path` could not be used and return the embedded default.
    fn fallback_for(path: &Path, error: &io::Error) -> Self {
        warn!(
            path = %path.display(),
            error = %error,
            "Unable to read response file, serving built-in default"
        );
        metrics::inc_template_fallbacks();
        Self::fallback()
    }

    /// Where this template came from.
    pub fn source(&self) -> TemplateSource {
        self.source
    }

    /// Raw template bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Substitute every placeholder with `party_id`.
    pub fn render(&self, party_id: &Uuid) -> Vec<u8> {
        replace_all(
            &self.body,
            PLACEHOLDER.as_bytes(),
            party_id.hyphenated().to_string().as_bytes(),
        )
    }

    /// Render with a newly generated random party id.
    pub fn render_fresh(&self) -> (Vec<u8>, Uuid) {
        let party_id = Uuid::new_v4();
        (self.render(&party_id), party_id)
    }
}

fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;

    while let Some(at) = rest.windows(needle.len()).position(|w| w == needle) {
        out.extend_from_slice(&rest[..at]);
        out.extend_from_slice(replacement);
        rest = &rest[at + needle.len()..];
    }

    out.extend_from_slice(rest);
    out
}
