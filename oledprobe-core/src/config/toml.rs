//! Minimal TOML parser for `probe.toml`
//!
//! Handles only the subset the probe configuration needs. It does NOT
//! support the full TOML spec.
//!
//! Supported features:
//! - `[bus]`, `[device]` and `[monitor]` section headers
//! - Key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers, with `_` separators
//! - Comments (# ...), including trailing comments
//!
//! Keys that are absent keep their [`ProbeConfig::default`] value.

use oledprobe_hal::BusMode;

use super::types::{ProbeConfig, ValidationError};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in the current section (or outside any section)
    UnknownKey,
    /// Value of the wrong type, or out of range for its key
    InvalidValue,
    /// Line is not `key = value`
    InvalidLine,
    /// String does not fit its fixed-capacity field
    TooLong,
}

/// Parse or validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Text could not be parsed
    Parse(ParseError),
    /// Parsed values are inconsistent
    Invalid(ValidationError),
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

impl From<ValidationError> for LoadError {
    fn from(e: ValidationError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Device,
    Monitor,
}

/// A parsed right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    Int(i64),
    Bool(bool),
    Str(&'a str),
}

/// Parse and validate in one step
pub fn load_config(input: &str) -> Result<ProbeConfig, LoadError> {
    let config = parse_config(input)?;
    config.validate()?;
    Ok(config)
}

/// Parse TOML text into a [`ProbeConfig`] (not validated)
pub fn parse_config(input: &str) -> Result<ProbeConfig, ParseError> {
    let mut config = ProbeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(line[1..line.len() - 1].trim())?;
            continue;
        }

        let (key, raw) = line.split_once('=').ok_or(ParseError::InvalidLine)?;
        let key = key.trim();
        let value = parse_value(raw.trim())?;

        apply(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(name: &str) -> Result<Section, ParseError> {
    match name {
        "bus" => Ok(Section::Bus),
        "device" => Ok(Section::Device),
        "monitor" => Ok(Section::Monitor),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply(
    config: &mut ProbeConfig,
    section: Section,
    key: &str,
    value: Value<'_>,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Bus, "mode") => {
            config.bus.mode = match as_str(value)? {
                "master" => BusMode::Master,
                "slave" => BusMode::Slave,
                _ => return Err(ParseError::InvalidValue),
            }
        }
        (Section::Bus, "sda_pin") => config.bus.sda_pin = as_u8(value)?,
        (Section::Bus, "scl_pin") => config.bus.scl_pin = as_u8(value)?,
        (Section::Bus, "pullups") => {
            let enabled = as_bool(value)?;
            config.bus.sda_pullup = enabled;
            config.bus.scl_pullup = enabled;
        }
        (Section::Bus, "sda_pullup") => config.bus.sda_pullup = as_bool(value)?,
        (Section::Bus, "scl_pullup") => config.bus.scl_pullup = as_bool(value)?,
        (Section::Bus, "frequency_hz") => config.bus.frequency = as_u32(value)?,

        (Section::Device, "address") => config.device.address = as_u8(value)?,
        (Section::Device, "control_byte") => config.device.control_byte = as_u8(value)?,
        (Section::Device, "timeout_ms") => config.device.timeout_ms = as_u32(value)?,

        (Section::Monitor, "task_name") => {
            config.monitor.task_name.clear();
            config
                .monitor
                .task_name
                .push_str(as_str(value)?)
                .map_err(|_| ParseError::TooLong)?;
        }
        (Section::Monitor, "interval_ms") => config.monitor.interval_ms = as_u32(value)?,

        _ => return Err(ParseError::UnknownKey),
    }

    Ok(())
}

/// Cut a trailing `# comment`, ignoring `#` inside quotes
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_value(raw: &str) -> Result<Value<'_>, ParseError> {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Ok(Value::Str(&raw[1..raw.len() - 1]));
    }

    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    parse_int(raw).map(Value::Int).ok_or(ParseError::InvalidValue)
}

/// Parse a decimal or `0x` hex integer, allowing `_` between digits
fn parse_int(raw: &str) -> Option<i64> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let (radix, digits) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }

    let mut value: i64 = 0;
    for ch in digits.chars() {
        if ch == '_' {
            continue;
        }
        let digit = ch.to_digit(radix)?;
        value = value.checked_mul(radix as i64)?.checked_add(digit as i64)?;
    }

    Some(if negative { -value } else { value })
}

fn as_u8(value: Value<'_>) -> Result<u8, ParseError> {
    match value {
        Value::Int(n) => u8::try_from(n).map_err(|_| ParseError::InvalidValue),
        _ => Err(ParseError::InvalidValue),
    }
}

fn as_u32(value: Value<'_>) -> Result<u32, ParseError> {
    match value {
        Value::Int(n) => u32::try_from(n).map_err(|_| ParseError::InvalidValue),
        _ => Err(ParseError::InvalidValue),
    }
}

fn as_bool(value: Value<'_>) -> Result<bool, ParseError> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(ParseError::InvalidValue),
    }
}

fn as_str(value: Value<'_>) -> Result<&str, ParseError> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(ParseError::InvalidValue),
    }
}
