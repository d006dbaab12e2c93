//! Simple TOML parser for staff configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `staff.toml`. It does NOT support the full TOML grammar and never
//! allocates.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - `[staff]` and `[playback]` section headers
//! - Comments (# ...)
//!
//! Keys before the first header belong to `[staff]`.

use heapless::String;

use super::types::{OperatingMode, StaffConfig, MAX_PATH_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Staff,
    Playback,
}

/// Parse TOML configuration into StaffConfig
///
/// Missing keys keep their [`StaffConfig::default`] values.
pub fn parse_config(input: &str) -> Result<StaffConfig, ConfigError> {
    let mut config = StaffConfig::default();
    let mut section = Section::Staff;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "staff" => Ok(Section::Staff),
        "playback" => Ok(Section::Playback),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    strip_separators(value)
        .parse()
        .map_err(|_| ConfigError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn parse_mode(value: &str) -> Result<OperatingMode, ConfigError> {
    let value = parse_string(value);
    OperatingMode::from_name(value)
        .or_else(|| value.parse().ok().and_then(OperatingMode::from_u8))
        .ok_or(ConfigError::InvalidValue)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut StaffConfig,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Staff, "mode") => config.mode = parse_mode(value)?,
        (Section::Staff, "brightness") => config.brightness = parse_int(value)?,
        (Section::Staff, "color_correction") => config.color_correction = parse_bool(value)?,
        (Section::Playback, "manifest") => {
            let path = parse_string(value);
            if path.is_empty() {
                return Err(ConfigError::InvalidValue);
            }
            config.manifest =
                String::<MAX_PATH_LEN>::try_from(path).map_err(|_| ConfigError::InvalidValue)?;
        }
        (Section::Playback, "default_duration_ms") => {
            config.default_duration_ms = parse_int(value)?
        }
        (Section::Playback, "line_period_us") => {
            let period: u32 = parse_int(value)?;
            if period == 0 {
                return Err(ConfigError::InvalidValue);
            }
            config.line_period_us = period;
        }
        (Section::Playback, "auto_advance") => config.auto_advance = parse_bool(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

/// Remove TOML digit separators (`10_000`)
fn strip_separators(value: &str) -> String<16> {
    let mut out = String::new();
    for c in value.chars().filter(|c| *c != '_') {
        if out.push(c).is_err() {
            // Too long to be a valid integer; make sure parsing fails
            out.clear();
            let _ = out.push('x');
            break;
        }
    }
    out
}
