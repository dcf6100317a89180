// src/utils/constants.rs

/// Targets scored per parallel work unit. Fixed so that merge order, and with
/// it tie order in the candidate lists, does not depend on the thread count.
pub const SCAN_CHUNK_SIZE: usize = 2048;

/// Source items between progress log lines.
pub const PROGRESS_LOG_INTERVAL: usize = 1000;

/// Decimal places for every score written to a file.
pub const SCORE_DECIMALS: usize = 4;
