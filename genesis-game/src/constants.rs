//! Centralized tuning constants for the discovery engine.
//!
//! The combination table itself lives in `assets/creation.json`; the values
//! here shape how the engine walks it.

/// localStorage key the browser build has always used for its single slot.
pub const DEFAULT_SAVE_SLOT: &str = "godCreatorSave";

/// Elements every session starts with. Auto-save only fires above this.
pub const PRIMORDIAL_COUNT: usize = 4;

pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 7;

pub(crate) const PAIR_SEPARATOR: char = '+';

/// Completion requires every one of these to be discovered.
pub const MAJOR_ELEMENTS: [&str; 11] = [
    "light", "heaven", "sea", "tree", "sun", "moon", "fish", "bird", "man", "woman", "sabbath",
];

pub const DEFAULT_VOLUME: f32 = 0.7;
