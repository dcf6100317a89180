// src/utils/progress_bars/progress_callback.rs - Progress callbacks for long-running stages

use indicatif::ProgressBar;
use log::debug;
use std::sync::Arc;

use crate::utils::get_memory_usage;
use crate::utils::progress_bars::progress_config::ProgressConfig;

/// Type alias for progress callback functions.
/// Takes the phase name, items done so far and the total.
pub type ProgressCallback = Arc<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Convenience macro for reporting progress from inside a stage
#[macro_export]
macro_rules! update_detailed_progress {
    ($callback:expr, $phase:expr, $current:expr, $total:expr) => {
        if let Some(ref cb) = $callback {
            cb($phase, $current, $total);
        }
    };
}

/// Callback that drives an indicatif bar. Memory usage is appended to the
/// message when the configuration asks for it.
pub fn create_bar_callback(pb: ProgressBar, config: &ProgressConfig) -> ProgressCallback {
    let show_memory = config.should_show_memory();
    Arc::new(move |phase: &str, current: usize, total: usize| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
        if show_memory {
            pb.set_message(format!("{} (mem: {} MB)", phase, get_memory_usage()));
        } else {
            pb.set_message(phase.to_string());
        }
        if current >= total {
            pb.finish_with_message(format!("{} complete", phase));
        }
    })
}

/// Helper to create a callback that only writes debug logs, for runs without a terminal
pub fn create_simple_callback(stage_name: &str) -> ProgressCallback {
    let stage_name = stage_name.to_string();
    Arc::new(move |phase: &str, current: usize, total: usize| {
        debug!("[{}] Progress: {} {}/{}", stage_name, phase, current, total);
    })
}

/// Picks the bar-backed callback when progress is enabled.
pub fn create_stage_callback(config: &ProgressConfig, stage_name: &str, emoji: &str) -> ProgressCallback {
    match config.create_progress_bar(0, emoji) {
        Some(pb) => create_bar_callback(pb, config),
        None => create_simple_callback(stage_name),
    }
}
