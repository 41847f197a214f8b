//! Link configuration
//!
//! Loaded from a TOML file. Every section and key is optional:
//!
//! ```toml
//! [port]
//! path = "/dev/ttyUSB0"
//! baudrate = 115200
//!
//! [framing]
//! grammar = "sentence"   # or "brace"
//! checksum = "xor"       # or "none"
//!
//! [debug]
//! lock = false
//! trace = true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use streamframe_hal::UartConfig;
use streamframe_protocol::{AcceptAll, ChecksumPolicy, ParsedSentence, XorChecksum};

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read
    Io { path: PathBuf, message: String },
    /// TOML parsing failed
    Parse(String),
    /// A value parsed but is out of range
    InvalidValue { key: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            }
            ConfigError::Parse(message) => write!(f, "invalid config: {message}"),
            ConfigError::InvalidValue { key, reason } => write!(f, "invalid `{key}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which grammar to frame the stream with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// `{...}` JSON messages
    Brace,
    /// `$...*CC` sentences
    #[default]
    Sentence,
}

impl FromStr for Grammar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brace" => Ok(Grammar::Brace),
            "sentence" => Ok(Grammar::Sentence),
            other => Err(format!("unknown grammar `{other}` (expected brace or sentence)")),
        }
    }
}

/// Checksum verification for sentences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumMode {
    /// Accept every sentence
    #[default]
    None,
    /// XOR checksum over the sentence body
    Xor,
}

impl FromStr for ChecksumMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ChecksumMode::None),
            "xor" => Ok(ChecksumMode::Xor),
            other => Err(format!("unknown checksum `{other}` (expected none or xor)")),
        }
    }
}

impl ChecksumPolicy for ChecksumMode {
    fn accept(&self, sentence: &ParsedSentence) -> bool {
        match self {
            ChecksumMode::None => AcceptAll.accept(sentence),
            ChecksumMode::Xor => XorChecksum.accept(sentence),
        }
    }
}

/// `[port]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortConfig {
    /// Device to read when no input is given on the command line
    pub path: String,
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            path: "COM1".to_string(),
            baudrate: 115200,
        }
    }
}

impl PortConfig {
    /// UART settings for this port (8N1)
    pub fn uart_config(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baudrate,
        }
    }
}

/// `[framing]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramingConfig {
    /// Grammar the stream is framed with
    pub grammar: Grammar,
    /// Checksum applied to sentences; ignored for brace framing
    pub checksum: ChecksumMode,
}

/// `[debug]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    /// Guard the framer with a mutex
    pub lock: bool,
    /// Log every framed message
    pub trace: bool,
}

/// Complete link configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Transport settings
    pub port: PortConfig,
    /// Grammar and checksum
    pub framing: FramingConfig,
    /// Diagnostic wrappers around the framer
    pub debug: DebugConfig,
}

impl LinkConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&input)
    }

    /// Check values that parse but cannot work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "port.path",
                reason: "must not be empty",
            });
        }
        if self.port.baudrate == 0 {
            return Err(ConfigError::InvalidValue {
                key: "port.baudrate",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LinkConfig::from_toml_str("").unwrap();
        assert_eq!(config, LinkConfig::default());
        assert_eq!(config.port.path, "COM1");
        assert_eq!(config.port.baudrate, 115200);
        assert_eq!(config.framing.grammar, Grammar::Sentence);
        assert_eq!(config.framing.checksum, ChecksumMode::None);
        assert!(!config.debug.lock);
    }

    #[test]
    fn test_full_config() {
        let config = LinkConfig::from_toml_str(
            r#"
            # telemetry radio
            [port]
            path = "/dev/ttyUSB0"
            baudrate = 57600

            [framing]
            grammar = "brace"
            checksum = "xor"

            [debug]
            lock = true
            trace = true
            "#,
        )
        .unwrap();

        assert_eq!(config.port.path, "/dev/ttyUSB0");
        assert_eq!(config.port.uart_config().baudrate, 57600);
        assert_eq!(config.framing.grammar, Grammar::Brace);
        assert_eq!(config.framing.checksum, ChecksumMode::Xor);
        assert!(config.debug.lock);
        assert!(config.debug.trace);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = LinkConfig::from_toml_str("[port]\nbaudrate = 9600\n").unwrap();
        assert_eq!(config.port.baudrate, 9600);
        assert_eq!(config.port.path, "COM1");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = LinkConfig::from_toml_str("[port]\nbaud = 9600\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_grammar_rejected() {
        let err = LinkConfig::from_toml_str("[framing]\ngrammar = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_baudrate_rejected() {
        let err = LinkConfig::from_toml_str("[port]\nbaudrate = 0\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "port.baudrate",
                reason: "must be greater than zero"
            }
        );
    }

    #[test]
    fn test_missing_file() {
        let err = LinkConfig::load("/nonexistent/streamframe.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_checksum_mode_policy() {
        let good = ParsedSentence::parse("$GTIMU,100,2.5*5A");
        let bad = ParsedSentence::parse("$GTIMU,100,2.5*00");

        assert!(ChecksumMode::None.accept(&bad));
        assert!(ChecksumMode::Xor.accept(&good));
        assert!(!ChecksumMode::Xor.accept(&bad));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("brace".parse::<Grammar>(), Ok(Grammar::Brace));
        assert_eq!("xor".parse::<ChecksumMode>(), Ok(ChecksumMode::Xor));
        assert!("crc16".parse::<ChecksumMode>().is_err());
    }
}
