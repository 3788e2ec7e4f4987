// src/util/size_format.rs
// Human-readable byte counts for heap sizes, budgets and usage
// Units are powers of 1024 with two-letter suffixes
// RELEVANT FILES: src/report.rs, src/util/flag_format.rs

/// Bytes per kilobyte (1024).
pub const KIB: u64 = 1024;

/// Bytes per megabyte (1024²).
pub const MIB: u64 = 1024 * 1024;

/// Bytes per gigabyte (1024³).
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Format a byte count using the largest unit among B, KB, MB and GB that
/// keeps the magnitude at or above one.
///
/// Scaled magnitudes are computed in `f32` and rounded to two decimal places,
/// with trailing zeros dropped: `1536` renders as `"1.5 KB"`, `1024` as `"1 KB"`.
pub fn format_size(size: u64) -> String {
    if size < KIB {
        format!("{} B", size)
    } else if size < MIB {
        format!("{} KB", format_magnitude(size as f32 / KIB as f32))
    } else if size < GIB {
        format!("{} MB", format_magnitude(size as f32 / MIB as f32))
    } else {
        format!("{} GB", format_magnitude(size as f32 / GIB as f32))
    }
}

fn format_magnitude(value: f32) -> String {
    let fixed = format!("{:.2}", value);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
