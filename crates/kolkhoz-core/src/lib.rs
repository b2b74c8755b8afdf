#![deny(warnings)]
pub mod game;
pub mod model;

/// Work hours needed to complete a job.
pub const THRESHOLD: u32 = 40;

/// Years in a full game (the Five-Year Plan).
pub const MAX_YEARS: u32 = 5;
