//! Factory patches.
//!
//! Each preset is a complete [`SynthParams`] snapshot. Use these as starting
//! points, or study them to see how the three parts, unison and envelope
//! combine into different timbres.
//!
//! # Example
//!
//! ```
//! use unisynth::presets;
//!
//! let pad = presets::hollow_pad();
//! assert_eq!(presets::by_name("Hollow Pad"), Some(pad));
//! ```

use crate::synth::SynthParams;

mod hollow_pad;
mod init;
mod organ;
mod pluck;
mod supersaw;

pub use hollow_pad::hollow_pad;
pub use init::init;
pub use organ::organ;
pub use pluck::pluck;
pub use supersaw::supersaw;

/// Lookup names of every factory preset.
pub const NAMES: [&str; 5] = ["init", "supersaw", "organ", "pluck", "hollow_pad"];

/// Find a preset by name. Case, spaces and dashes are ignored, so
/// `"Hollow Pad"`, `"hollow-pad"` and `"hollow_pad"` all match.
pub fn by_name(name: &str) -> Option<SynthParams> {
    let key: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    match key.as_str() {
        "init" => Some(init()),
        "supersaw" => Some(supersaw()),
        "organ" => Some(organ()),
        "pluck" => Some(pluck()),
        "hollow_pad" => Some(hollow_pad()),
        _ => None,
    }
}
