//! The shareable address and the host capabilities that consume it.

use anyhow::Result;
use thiserror::Error;

use crate::config::QrConfig;

/// Base address plus the current token, rendered as `base#token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLocation {
    base: String,
    token: Option<String>,
}

impl ShareLocation {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            token: None,
        }
    }

    /// Splits an address at its first `#`. An empty fragment counts as none.
    pub fn parse(href: &str) -> Self {
        match href.split_once('#') {
            Some((base, fragment)) => Self {
                base: base.to_string(),
                token: (!fragment.is_empty()).then(|| fragment.to_string()),
            },
            None => Self::new(href),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn href(&self) -> String {
        match &self.token {
            Some(token) => format!("{}#{}", self.base, token),
            None => self.base.clone(),
        }
    }
}

/// Accepts either a full address or a bare token.
pub fn token_from_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.contains('#') {
        ShareLocation::parse(input).token().map(str::to_string)
    } else if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    }
}

/// What the host clipboard handed over on paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardContent {
    PlainText(String),
    /// Anything without a plain-text flavour, identified by MIME type.
    Other(String),
}

/// Host clipboard write access.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    H,
}

/// Symbol settings. Error correction is always `L` and the quiet zone is
/// always zero so the longest possible address fits; only the cell size is
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    pub error_correction: ErrorCorrection,
    pub cell_size: u32,
    pub margin: u32,
}

impl From<&QrConfig> for QrOptions {
    fn from(config: &QrConfig) -> Self {
        Self {
            error_correction: ErrorCorrection::L,
            cell_size: config.cell_size,
            margin: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// The payload does not fit any symbol version at this error correction.
    #[error("payload of {payload_len} bytes exceeds QR capacity")]
    CapacityExceeded { payload_len: usize },
}

/// QR symbol generator supplied by the host.
pub trait QrEncoder {
    /// Returns the symbol as SVG markup.
    fn render_svg(&self, payload: &str, options: QrOptions) -> Result<String, QrError>;
}

/// Platform print action.
pub trait Printer {
    fn print(&mut self, href: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_without_token_is_base() {
        let mut location = ShareLocation::new("http://localhost:8080/");
        assert_eq!(location.href(), "http://localhost:8080/");

        location.set_token(Some("AwA=".to_string()));
        assert_eq!(location.href(), "http://localhost:8080/#AwA=");
    }

    #[test]
    fn test_parse() {
        let mut location = ShareLocation::parse("https://example.org/pad#abc+/=");
        assert_eq!(location.token(), Some("abc+/="));
        location.set_token(None);
        assert_eq!(location.href(), "https://example.org/pad");

        let location = ShareLocation::parse("https://example.org/pad#");
        assert_eq!(location.token(), None);

        let location = ShareLocation::parse("https://example.org/pad");
        assert_eq!(location.token(), None);
        assert_eq!(location.href(), "https://example.org/pad");
    }

    #[test]
    fn test_qr_options_pin_level_and_margin() {
        let options = QrOptions::from(&QrConfig { cell_size: 5 });
        assert_eq!(options.error_correction, ErrorCorrection::L);
        assert_eq!(options.cell_size, 5);
        assert_eq!(options.margin, 0);
    }

    #[test]
    fn test_qr_error_message() {
        let err = QrError::CapacityExceeded { payload_len: 3000 };
        assert_eq!(err.to_string(), "payload of 3000 bytes exceeds QR capacity");
    }

    #[test]
    fn test_token_from_input() {
        assert_eq!(token_from_input("http://x/#tok"), Some("tok".to_string()));
        assert_eq!(token_from_input("  tok \n"), Some("tok".to_string()));
        assert_eq!(token_from_input("http://x/#"), None);
        assert_eq!(token_from_input(""), None);
    }
}
