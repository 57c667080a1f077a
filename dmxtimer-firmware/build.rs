//! Build script for dmxtimer-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates timer.toml and compiles it into the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use dmxtimer_core::config::{ConfigError, TimerSettings};

fn main() {
    setup_linker();
    let settings = load_settings();
    generate_settings(&settings);
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and validate timer.toml
fn load_settings() -> TimerSettings {
    println!("cargo:rerun-if-changed=timer.toml");

    let path = Path::new("timer.toml");
    if !path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: timer.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a timer.toml settings file.               ║\n\
            ║  Please create one in the dmxtimer-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read timer.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Unknown keys and wrong types are rejected here
    let settings: TimerSettings = match toml::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid timer.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = settings.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Out-of-range value in timer.toml                         ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  • {:<62} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            describe(e)
        );
    }

    println!("cargo:warning=timer.toml validated successfully");
    settings
}

fn describe(e: ConfigError) -> &'static str {
    match e {
        ConfigError::ChannelOutOfRange => "defaults.channel must be 1-512",
        ConfigError::MinutesOutOfRange => "defaults.wait_minutes must be 0-59",
        ConfigError::SecondsOutOfRange => "defaults.wait_seconds must be 0-59",
        ConfigError::DurationOutOfRange => "defaults.active_seconds must be 0-59",
        ConfigError::IntensityOutOfRange => "defaults.intensity must be 1-255",
        ConfigError::FrameRateOutOfRange => "frame_rate_hz must be 1-44",
        ConfigError::DebounceOutOfRange => "debounce_ms must be 10-1000",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                let head: String = line.chars().take(61).collect();
                format!("{}...", head)
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `$OUT_DIR/settings.rs` holding the validated settings as a const
fn generate_settings(settings: &TimerSettings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let d = &settings.defaults;

    let source = format!(
        "pub const SETTINGS: TimerSettings = TimerSettings {{\n\
         \x20   defaults: Defaults {{\n\
         \x20       channel: {},\n\
         \x20       wait_minutes: {},\n\
         \x20       wait_seconds: {},\n\
         \x20       active_seconds: {},\n\
         \x20       intensity: {},\n\
         \x20   }},\n\
         \x20   debounce_ms: {},\n\
         \x20   idle_timeout_s: {},\n\
         \x20   frame_rate_hz: {},\n\
         \x20   repeat: RepeatMode::{:?},\n\
         }};\n",
        d.channel,
        d.wait_minutes,
        d.wait_seconds,
        d.active_seconds,
        d.intensity,
        settings.debounce_ms,
        settings.idle_timeout_s,
        settings.frame_rate_hz,
        settings.repeat,
    );

    fs::write(out_dir.join("settings.rs"), source).unwrap();
}
