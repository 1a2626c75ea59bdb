/// Default number of lines kept in a listing preview.
pub const PREVIEW_LINES: usize = 10;
/// Default number of columns kept per preview line.
pub const PREVIEW_COLUMNS: usize = 100;

/// Truncate `full_content` to a bounded preview for listing records.
///
/// Keeps at most the first `preview_lines` lines. A retained line is kept
/// verbatim when it fits in `preview_columns` characters; a longer line is
/// cut to the first `preview_columns` characters with a literal `...`
/// appended. A line of exactly `preview_columns` characters is not
/// truncated.
///
/// Pure and deterministic: the same input always yields the same preview.
pub fn generate_preview(full_content: &str, preview_lines: usize, preview_columns: usize) -> String {
    full_content
        .split('\n')
        .take(preview_lines)
        .map(|line| {
            if line.chars().count() <= preview_columns {
                line.to_string()
            } else {
                let mut truncated: String = line.chars().take(preview_columns).collect();
                truncated.push_str("...");
                truncated
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
