/// Count occurrences and return the `n` most frequent values
///
/// Ordering is by descending count; equal counts keep first-seen order.
pub fn top_by_count<'a, I>(values: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tally: Vec<(String, usize)> = Vec::new();

    for value in values {
        match tally.iter_mut().find(|(seen, _)| seen == value) {
            Some((_, count)) => *count += 1,
            None => tally.push((value.to_string(), 1)),
        }
    }

    // sort_by is stable, so ties stay in insertion order
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally.truncate(n);
    tally
}

/// Values at the 10th and 90th percentile indexes of the sorted input
///
/// Indexes are `floor(len * 0.1)` and `floor(len * 0.9)`. Returns `None`
/// for an empty slice.
pub fn percentile_bounds(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let len = sorted.len();
    let low = ((len as f64 * 0.1).floor() as usize).min(len - 1);
    let high = ((len as f64 * 0.9).floor() as usize).min(len - 1);

    Some((sorted[low], sorted[high]))
}
