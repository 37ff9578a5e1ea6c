use std::cmp::Ordering;

use super::types::CanonicalRow;

/// Orders rows newest-first. Undated rows go last; ties fall back to the
/// numeric part of the id (`p10` before `p2`) and then to the id itself, both
/// descending.
pub fn sort_newest_first(rows: &mut [CanonicalRow]) {
    rows.sort_by(compare_newest_first);
}

pub fn compare_newest_first(a: &CanonicalRow, b: &CanonicalRow) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| id_number(&b.id).total_cmp(&id_number(&a.id)))
        .then_with(|| b.id.cmp(&a.id))
}

/// Digits of the id read as one number; ids without digits count as zero.
fn id_number(id: &str) -> f64 {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<f64>().unwrap_or(0.0)
}
