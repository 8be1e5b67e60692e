//! Build script for oledprobe-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates probe.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Linker scripts for cortex-m-rt and defmt
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}

/// Validate probe.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=probe.toml");

    let config_path = Path::new("probe.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: probe.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds probe.toml at compile time.                 ║\n\
            ║  Please create one in the oledprobe-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read probe.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in probe.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_bus(&config, &mut errors);
    validate_device(&config, &mut errors);
    validate_monitor(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid probe configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=probe.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only [bus], [device] and [monitor] are understood by the firmware parser
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };

    for (name, value) in table {
        match name.as_str() {
            "bus" | "device" | "monitor" => {
                if !value.is_table() {
                    errors.push(format!("[{}] must be a table", name));
                }
            }
            _ => errors.push(format!("unknown section [{}] or top-level key", name)),
        }
    }
}

/// Look up an integer key, reporting a type error if present but wrong
fn int_key(
    config: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(n)) => Some(*n),
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => None,
    }
}

fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) {
    let sda = int_key(config, "bus", "sda_pin", errors).unwrap_or(4);
    let scl = int_key(config, "bus", "scl_pin", errors).unwrap_or(5);

    for (key, pin) in [("sda_pin", sda), ("scl_pin", scl)] {
        if !(0..30).contains(&pin) {
            errors.push(format!("[bus] {} must be GPIO 0-29", key));
        }
    }
    if sda == scl {
        errors.push("[bus] sda_pin and scl_pin must differ".to_string());
    }

    if let Some(freq) = int_key(config, "bus", "frequency_hz", errors) {
        if freq <= 0 || freq > 1_000_000 {
            errors.push("[bus] frequency_hz must be 1-1000000".to_string());
        }
    }

    for key in ["pullups", "sda_pullup", "scl_pullup"] {
        if let Some(value) = config.get("bus").and_then(|s| s.get(key)) {
            if !value.is_bool() {
                errors.push(format!("[bus] {} must be true or false", key));
            }
        }
    }

    if let Some(mode) = config.get("bus").and_then(|s| s.get("mode")) {
        if mode.as_str() != Some("master") {
            errors.push("[bus] mode must be 'master'".to_string());
        }
    }
}

fn validate_device(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(addr) = int_key(config, "device", "address", errors) {
        if !(0..=0x7F).contains(&addr) {
            errors.push("[device] address must be a 7-bit value (0x00-0x7F)".to_string());
        }
    }

    if let Some(control) = int_key(config, "device", "control_byte", errors) {
        if !(0..=0xFF).contains(&control) {
            errors.push("[device] control_byte must be 0x00-0xFF".to_string());
        }
    }

    if let Some(timeout) = int_key(config, "device", "timeout_ms", errors) {
        if timeout <= 0 || timeout > u32::MAX as i64 {
            errors.push("[device] timeout_ms must be positive".to_string());
        }
    }
}

fn validate_monitor(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(interval) = int_key(config, "monitor", "interval_ms", errors) {
        if interval <= 0 || interval > u32::MAX as i64 {
            errors.push("[monitor] interval_ms must be positive".to_string());
        }
    }

    match config.get("monitor").and_then(|s| s.get("task_name")) {
        Some(toml::Value::String(name)) => {
            if name.is_empty() || name.len() > 16 {
                errors.push("[monitor] task_name must be 1-16 characters".to_string());
            }
        }
        Some(_) => errors.push("[monitor] task_name must be a string".to_string()),
        None => {}
    }
}
