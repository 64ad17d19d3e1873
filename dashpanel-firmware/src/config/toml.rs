//! Simple TOML parser for the panel configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `panel.toml`. It does NOT support the full TOML language.
//!
//! Supported features:
//! - Key = value pairs (integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Strings, arrays and inline tables
//! - Dotted keys and nested sections

use super::BoardConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is not `key = value`
    InvalidLine,
    /// Key not known in its section
    UnknownKey,
    /// Value has the wrong type or does not fit
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Panel,
    Can,
}

/// Parse TOML configuration into a BoardConfig
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<BoardConfig, ParseError> {
    let mut config = BoardConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "panel" => Ok(Section::Panel),
        "can" => Ok(Section::Can),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    config: &mut BoardConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    let panel = &mut config.panel;
    match (section, key) {
        (Section::Panel, "intensity") => panel.intensity = parse_int(value)?,
        (Section::Panel, "frame_gap_ms") => panel.frame_gap_ms = parse_int(value)?,
        (Section::Panel, "lamp_test_hold_ms") => panel.lamp_test_hold_ms = parse_int(value)?,
        (Section::Panel, "resync_heartbeats") => panel.resync_heartbeats = parse_int(value)?,
        (Section::Panel, "heartbeat_period_ms") => panel.heartbeat_period_ms = parse_int(value)?,
        (Section::Panel, "boot_demo") => panel.boot_demo = parse_bool(value)?,
        (Section::Can, "crystal_mhz") => config.can_crystal_mhz = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# test panel
[panel]
intensity = 12        # bright
frame_gap_ms = 40
lamp_test_hold_ms = 1500
resync_heartbeats = 6
heartbeat_period_ms = 500
boot_demo = false

[can]
crystal_mhz = 16
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.panel.intensity, 12);
        assert_eq!(config.panel.frame_gap_ms, 40);
        assert_eq!(config.panel.lamp_test_hold_ms, 1500);
        assert_eq!(config.panel.resync_heartbeats, 6);
        assert_eq!(config.panel.heartbeat_period_ms, 500);
        assert!(!config.panel.boot_demo);
        assert_eq!(config.can_crystal_mhz, 16);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_config("[panel]\nintensity = 3\n").unwrap();
        assert_eq!(config.panel.intensity, 3);
        assert_eq!(config.panel.frame_gap_ms, 30);
        assert_eq!(config.can_crystal_mhz, 20);

        assert_eq!(parse_config(""), Ok(BoardConfig::default()));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            parse_config("[display]\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(
            parse_config("[panel]\nbrightness = 3\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("intensity = 3\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("[panel]\nintensity = 300\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[panel]\nboot_demo = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[panel]\nintensity\n"), Err(ParseError::InvalidLine));
    }

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(include_str!("../../panel.toml")).unwrap();
        assert_eq!(config.panel.validate(), Ok(()));
    }
}
