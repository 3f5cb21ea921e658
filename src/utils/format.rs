//! Formatting utilities for catalog display values.

/// Format a frame count compactly (e.g., "950", "45K", "1.2M").
///
/// Thousands are truncated, millions keep one decimal.
pub fn format_frames(frames: u64) -> String {
    if frames >= 1_000_000 {
        format!("{:.1}M", frames as f64 / 1_000_000.0)
    } else if frames >= 1_000 {
        format!("{}K", frames / 1_000)
    } else {
        frames.to_string()
    }
}

/// Episode/frame summary shown as a meta tag (e.g., "120 ep, 45K fr").
pub fn format_episode_stats(episodes: u64, frames: u64) -> String {
    format!("{} ep, {} fr", episodes, format_frames(frames))
}

/// Suffix for lists shown by their first element (e.g., "+2"), empty for one.
pub fn format_more(len: usize) -> String {
    if len > 1 {
        format!("+{}", len - 1)
    } else {
        String::new()
    }
}
