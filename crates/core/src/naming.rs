use std::path::PathBuf;

use crate::backend::ImageFormat;

const MIN_PAD: usize = 3;

/// Digits needed to zero-pad every index of a `count`-frame run.
///
/// Never less than three, so runs of up to 1000 frames are named
/// `000`…`999`. Longer runs widen uniformly and still sort in order.
pub fn pad_width(count: usize) -> usize {
    let last = count.saturating_sub(1);
    let digits = last.checked_ilog10().map_or(1, |d| d as usize + 1);
    digits.max(MIN_PAD)
}

/// `prefix` followed by `index` zero-padded to `width` digits.
pub fn frame_stem(prefix: &str, index: usize, width: usize) -> String {
    format!("{prefix}{index:0width$}")
}

/// Output path for frame `index` of a `count`-frame run.
pub fn frame_path(prefix: &str, index: usize, count: usize, format: ImageFormat) -> PathBuf {
    let stem = frame_stem(prefix, index, pad_width(count));
    PathBuf::from(format!("{stem}.{}", format.extension()))
}
