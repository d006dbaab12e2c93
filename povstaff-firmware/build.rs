//! Build script for povstaff-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates staff.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const MODES: [&str; 3] = ["show", "debug", "upload"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate staff.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=staff.toml");

    let config_path = Path::new("staff.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: staff.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds staff.toml as its default configuration.    ║\n\
            ║  Please create one in the povstaff-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read staff.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in staff.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_staff(&config, &mut errors);
    validate_playback(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in staff.toml                      ║\n\
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

    println!("cargo:warning=staff.toml validated successfully");
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

fn section<'a>(config: &'a toml::Value, name: &str, errors: &mut Vec<String>) -> Option<&'a toml::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => None,
    }
}

fn check_keys(table: &toml::Table, name: &str, known: &[&str], errors: &mut Vec<String>) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", name, key));
        }
    }
}

fn check_int(table: &toml::Table, name: &str, key: &str, range: (i64, i64), errors: &mut Vec<String>) {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if *v < range.0 || *v > range.1 => {
            errors.push(format!("[{}] {} must be {}-{}", name, key, range.0, range.1));
        }
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push(format!("[{}] {} must be an integer", name, key)),
    }
}

fn check_bool(table: &toml::Table, name: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(value) = table.get(key) {
        if !value.is_bool() {
            errors.push(format!("[{}] {} must be true or false", name, key));
        }
    }
}

/// Validate the [staff] section
fn validate_staff(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(staff) = section(config, "staff", errors) else {
        return;
    };
    check_keys(staff, "staff", &["mode", "brightness", "color_correction"], errors);

    match staff.get("mode") {
        Some(toml::Value::String(mode)) if !MODES.contains(&mode.as_str()) => {
            errors.push("[staff] mode must be 'show', 'debug' or 'upload'".to_string());
        }
        Some(toml::Value::Integer(code)) if !(0..=2).contains(code) => {
            errors.push("[staff] mode code must be 0-2".to_string());
        }
        Some(toml::Value::String(_)) | Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push("[staff] mode must be a string".to_string()),
    }

    check_int(staff, "staff", "brightness", (0, 255), errors);
    check_bool(staff, "staff", "color_correction", errors);
}

/// Validate the [playback] section
fn validate_playback(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(playback) = section(config, "playback", errors) else {
        return;
    };
    check_keys(
        playback,
        "playback",
        &["manifest", "default_duration_ms", "line_period_us", "auto_advance"],
        errors,
    );

    match playback.get("manifest") {
        Some(toml::Value::String(path)) if path.is_empty() || path.len() > 32 => {
            errors.push("[playback] manifest must be 1-32 characters".to_string());
        }
        Some(toml::Value::String(_)) | None => {}
        Some(_) => errors.push("[playback] manifest must be a string".to_string()),
    }

    check_int(playback, "playback", "default_duration_ms", (0, u32::MAX as i64), errors);
    check_int(playback, "playback", "line_period_us", (1, u32::MAX as i64), errors);
    check_bool(playback, "playback", "auto_advance", errors);
}
