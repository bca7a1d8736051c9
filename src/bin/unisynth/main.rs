//! unisynth - plays a short chord progression through the default output
//!
//! Run with: cargo run -- [settings.toml] [preset]
//!
//! The settings file is optional; a preset name (see `unisynth::presets`)
//! overrides its patch. Set RUST_LOG=debug for more detail.

mod app;

use std::{env, path::Path};

use app::Demo;
use color_eyre::eyre::{eyre, WrapErr};
use unisynth::{presets, Settings};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut settings = Settings::default();
    let mut preset = None;
    for arg in &args {
        if Path::new(arg).extension().is_some_and(|ext| ext == "toml") {
            settings = Settings::load(arg).wrap_err_with(|| format!("loading {arg}"))?;
        } else {
            let patch = presets::by_name(arg).ok_or_else(|| {
                eyre!(
                    "unknown preset '{arg}', expected one of: {}",
                    presets::NAMES.join(", ")
                )
            })?;
            preset = Some(arg.clone());
            settings.patch = patch;
        }
    }
    if let Some(name) = &preset {
        tracing::info!(preset = %name, "using factory preset");
    }

    // i - VI - III - VII in A minor
    Demo::new(settings)
        .bpm(96.0)
        .chord(&[57, 60, 64], 2.0)
        .chord(&[53, 57, 60], 2.0)
        .chord(&[48, 52, 55], 2.0)
        .chord(&[55, 59, 62], 2.0)
        .chord(&[45, 57, 60, 64], 4.0)
        .run()
}
