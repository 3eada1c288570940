//! Output file naming.

/// Extension given to compressed files, dot included.
pub const HUFF_EXTENSION: &str = ".huff";

/// Replace the last extension of `input` with `.huff`, or append it.
///
/// Only the final path component is considered, so `dir.v1/data` becomes
/// `dir.v1/data.huff`.
pub fn huff_file_name(input: &str) -> String {
    let name_start = input.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let stem_end = input[name_start..]
        .rfind('.')
        .map_or(input.len(), |i| name_start + i);
    format!("{}{}", &input[..stem_end], HUFF_EXTENSION)
}
