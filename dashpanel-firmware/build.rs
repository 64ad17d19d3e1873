//! Build script for dashpanel-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Integer keys of `[panel]` with their accepted range
const PANEL_RANGES: [(&str, i64, i64); 5] = [
    ("intensity", 1, 15),
    ("frame_gap_ms", 0, 1_000),
    ("lamp_test_hold_ms", 0, 60_000),
    ("resync_heartbeats", 1, 255),
    ("heartbeat_period_ms", 1, 60_000),
];

const PANEL_BOOLS: [&str; 1] = ["boot_demo"];

const CRYSTALS_MHZ: [i64; 2] = [20, 16];

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

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a panel.toml configuration file.            ║\n\
            ║  Please create one in the dashpanel-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
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
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
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
    validate_panel(&config, &mut errors);
    validate_can(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid panel.toml                                       ║\n\
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

    println!("cargo:warning=panel.toml validated successfully");
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

/// Only `[panel]` and `[can]` are understood, and `[panel]` is required
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    if !matches!(root.get("panel"), Some(toml::Value::Table(_))) {
        errors.push("Missing [panel] section".to_string());
    }

    for (name, value) in root {
        match (name.as_str(), value) {
            ("panel" | "can", toml::Value::Table(_)) => {}
            ("panel" | "can", _) => errors.push(format!("[{}] must be a table", name)),
            _ => errors.push(format!("Unknown section or key '{}'", name)),
        }
    }
}

fn validate_panel(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(panel) = config.get("panel").and_then(|p| p.as_table()) else {
        return;
    };

    for (key, value) in panel {
        if let Some(&(_, min, max)) = PANEL_RANGES.iter().find(|(k, _, _)| k == key) {
            match value.as_integer() {
                Some(n) if (min..=max).contains(&n) => {}
                _ => errors.push(format!("[panel] {} must be an integer {}-{}", key, min, max)),
            }
        } else if PANEL_BOOLS.contains(&key.as_str()) {
            if value.as_bool().is_none() {
                errors.push(format!("[panel] {} must be true or false", key));
            }
        } else {
            errors.push(format!("[panel] unknown key '{}'", key));
        }
    }
}

fn validate_can(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(can) = config.get("can").and_then(|c| c.as_table()) else {
        return;
    };

    for (key, value) in can {
        match key.as_str() {
            "crystal_mhz" => {
                if !value
                    .as_integer()
                    .is_some_and(|mhz| CRYSTALS_MHZ.contains(&mhz))
                {
                    errors.push("[can] crystal_mhz must be 20 or 16".to_string());
                }
            }
            _ => errors.push(format!("[can] unknown key '{}'", key)),
        }
    }
}
