//! Config command handler
//!
//! Manages the persistent gradetally settings: runtime logging, the default
//! grading scheme, and the directory generated reports land in.

use crate::args::ConfigSubcommand;
use gradetally::config::Config;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Keys the config surface understands, with a short description each
const KNOWN_KEYS: &[(&str, &str)] = &[
    ("level", "log level: error, warn, info, or debug"),
    ("file", "log file path; empty logs to the console only"),
    ("verbose", "verbose output: true or false"),
    ("scheme", "grading scheme TOML path; empty uses the standard scheme"),
    ("reports_dir", "directory generated reports are written to"),
];

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => print_all(config),
        Some(ConfigSubcommand::Get { key: Some(key) }) => print_one(config, &key),
        Some(ConfigSubcommand::Set { key, value }) => set_and_save(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset_and_save(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset_with_confirmation(),
    }
}

/// One line per known key: name, padded, then its description
fn key_help() -> String {
    let mut help = String::new();
    for (key, description) in KNOWN_KEYS {
        let _ = writeln!(help, "  {key:<12} {description}");
    }
    help
}

/// Comma-separated key names, for error messages
fn key_summary() -> String {
    let names: Vec<&str> = KNOWN_KEYS.iter().map(|(key, _)| *key).collect();
    names.join(", ")
}

/// Print all configuration values plus the key reference
fn print_all(config: &Config) {
    println!("\n=== Configuration ===\n");
    print!("{config}");
    println!("\nKeys:");
    print!("{}", key_help());
}

/// Print one configuration value
fn print_one(config: &Config, key: &str) {
    match config.get(key) {
        Some(value) => println!("{value}"),
        None => {
            eprintln!("Unknown config key: '{key}'");
            eprintln!("Valid keys: {}", key_summary());
        }
    }
}

/// Persist the config, exiting on failure
fn save_or_exit(config: &Config) {
    if let Err(e) = config.save() {
        eprintln!("Failed to save config: {e}");
        std::process::exit(1);
    }
}

/// Set a configuration value and persist it
fn set_and_save(config: &mut Config, key: &str, value: &str) {
    // `level` takes any string in the config model; reject typos here so a
    // bad value never reaches the file and silently falls back to warn
    if key == "level" && !matches!(value, "error" | "warn" | "info" | "debug") {
        eprintln!("Invalid log level '{value}'; expected error, warn, info, or debug");
        std::process::exit(1);
    }

    if let Err(e) = config.set(key, value) {
        eprintln!("{e}");
        eprintln!("Valid keys: {}", key_summary());
        std::process::exit(1);
    }

    save_or_exit(config);
    println!("✓ Set {key} = {value}");
}

/// Reset a single value to its default and persist the result
fn unset_and_save(config: &mut Config, defaults: &Config, key: &str) {
    if let Err(e) = config.unset(key, defaults) {
        eprintln!("{e}");
        eprintln!("Valid keys: {}", key_summary());
        std::process::exit(1);
    }

    save_or_exit(config);
    println!("✓ Reset {key} to default");
}

/// Delete the config file after a y/n confirmation
fn reset_with_confirmation() {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if response.trim().eq_ignore_ascii_case("y") || response.trim().eq_ignore_ascii_case("yes") {
        if let Err(e) = Config::reset() {
            eprintln!("Failed to remove config file: {e}");
            std::process::exit(1);
        }
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_is_readable() {
        let config = Config::from_defaults();
        for (key, _) in KNOWN_KEYS {
            assert!(
                config.get(key).is_some(),
                "listed key '{key}' should resolve through Config::get"
            );
        }
    }

    #[test]
    fn listed_keys_are_settable() {
        let mut config = Config::from_defaults();
        config.set("scheme", "./x.toml").expect("set scheme");
        config.set("reports_dir", "./out").expect("set reports_dir");
        assert_eq!(config.get("scheme").unwrap(), "./x.toml");
        assert_eq!(config.get("reports_dir").unwrap(), "./out");
    }

    #[test]
    fn key_help_names_the_grading_keys() {
        let help = key_help();
        assert!(help.contains("scheme"));
        assert!(help.contains("reports_dir"));
        assert!(help.contains("standard scheme"));

        let summary = key_summary();
        assert_eq!(summary, "level, file, verbose, scheme, reports_dir");
    }
}
