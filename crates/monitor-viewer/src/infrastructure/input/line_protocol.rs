//! The stdin line protocol.
//!
//! One command per line:
//!
//! ```text
//! down <key>     press and hold
//! up <key>       release
//! tap <key>      press then release
//! ```
//!
//! `<key>` is a key name (`KeyA`, `Return`, `ArrowUp`, case-insensitive), a
//! single letter or digit, or an X11 KeySym in hex (`0xff0d`).  Blank lines
//! and lines starting with `#` are ignored.

use monitor_core::{HostKey, KeyMapper, KeyTransition};
use thiserror::Error;

/// Error type for a malformed protocol line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?} (expected down, up, or tap)")]
    UnknownCommand(String),
    #[error("missing key after {0:?}")]
    MissingKey(String),
    #[error("unexpected trailing input {0:?}")]
    TrailingInput(String),
    #[error("unknown key {0:?}")]
    UnknownKey(String),
}

/// Parses one protocol line into the transitions it describes.
///
/// # Errors
///
/// Returns a [`CommandError`] describing the first problem in the line.
pub fn parse_command(line: &str) -> Result<Vec<KeyTransition>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Vec::new());
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let token = words
        .next()
        .ok_or_else(|| CommandError::MissingKey(command.to_string()))?;
    if let Some(extra) = words.next() {
        return Err(CommandError::TrailingInput(extra.to_string()));
    }

    match command.to_ascii_lowercase().as_str() {
        "down" => Ok(vec![KeyTransition::down(parse_key(token)?)]),
        "up" => Ok(vec![KeyTransition::up(parse_key(token)?)]),
        "tap" => {
            let key = parse_key(token)?;
            Ok(vec![KeyTransition::down(key), KeyTransition::up(key)])
        }
        _ => Err(CommandError::UnknownCommand(command.to_string())),
    }
}

/// Resolves a key token: hex KeySym or key name.
pub fn parse_key(token: &str) -> Result<HostKey, CommandError> {
    let unknown = || CommandError::UnknownKey(token.to_string());

    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"));
    let key = match hex {
        Some(digits) => {
            let keysym = u32::from_str_radix(digits, 16).map_err(|_| unknown())?;
            KeyMapper::x11_keysym_to_host(keysym)
        }
        None => KeyMapper::host_from_name(token).ok_or_else(unknown)?,
    };

    if key == HostKey::Unknown {
        return Err(unknown());
    }
    Ok(key)
}
