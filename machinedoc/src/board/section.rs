//! Locating `## <Name>` sections in a markdown document.

use std::ops::Range;

/// Byte range of the section named `name`.
///
/// The section starts at the first line that is exactly `## <name>` and ends
/// right before the newline that precedes the next `## ` line, or at the end
/// of the document. Everything outside the range is left alone by
/// [`replace_section`].
pub fn find_section(doc: &str, name: &str) -> Option<Range<usize>> {
    let header = format!("## {}", name);
    let mut start = None;
    let mut offset = 0;

    for line in doc.split_inclusive('\n') {
        let content = line.trim_end_matches(|c| c == '\n' || c == '\r');
        match start {
            None if content == header => start = Some(offset),
            Some(start) if content.starts_with("## ") => return Some(start..offset - 1),
            _ => {}
        }
        offset += line.len();
    }

    start.map(|start| start..doc.len())
}

/// Replace `range` of `doc` with `replacement`.
pub fn replace_section(doc: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(doc.len() - range.len() + replacement.len());
    out.push_str(&doc[..range.start]);
    out.push_str(replacement);
    out.push_str(&doc[range.end..]);
    out
}
