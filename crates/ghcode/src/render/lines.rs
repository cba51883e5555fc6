//! Line-range extraction.

use crate::reference::LineRange;

/// Return the inclusive, 1-indexed `range` of lines from `code`.
///
/// Line terminators are kept, so the result is a contiguous slice of the
/// input. Out-of-range requests clamp instead of failing: the end index is
/// capped at the last line, and a start line past the end of the file falls
/// back to the first line.
///
/// # Examples
///
/// ```
/// use ghcode::render::extract_lines;
/// use ghcode::reference::LineRange;
///
/// let code = "one\ntwo\nthree\n";
/// assert_eq!(extract_lines(code, LineRange { start: 2, end: None }), "two\n");
/// assert_eq!(extract_lines(code, LineRange { start: 2, end: Some(9) }), "two\nthree\n");
/// ```
pub fn extract_lines(code: &str, range: LineRange) -> &str {
    // Byte offset at which each line starts.
    let starts: Vec<usize> = std::iter::once(0)
        .chain(
            code.split_inclusive('\n')
                .scan(0, |offset, line| {
                    *offset += line.len();
                    Some(*offset)
                }),
        )
        .collect();
    // `starts` has one entry more than there are lines (the final offset).
    let line_count = starts.len() - 1;
    if line_count == 0 {
        return "";
    }
    let last_index = line_count - 1;

    let start_index = usize::try_from(range.start.saturating_sub(1)).unwrap_or(usize::MAX);
    let start_index = if start_index > last_index { 0 } else { start_index };
    let end_index = usize::try_from(range.last().saturating_sub(1))
        .unwrap_or(usize::MAX)
        .clamp(start_index, last_index);

    &code[starts[start_index]..starts[end_index + 1]]
}
