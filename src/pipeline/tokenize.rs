//! Line tokenization against the keyword table.

use super::table::KeywordTable;

/// Split `line` on runs of whitespace and record every token that exactly
/// matches a keyword. Returns how many tokens matched.
///
/// Matching is case-sensitive whole-token equality: a token that merely
/// contains a keyword contributes nothing. Safe to call from any number of
/// consumers; the table's counters are the only shared state touched.
pub fn tokenize_line(line: &str, table: &KeywordTable) -> usize {
    line.split_whitespace()
        .filter(|token| table.record(token))
        .count()
}
