/// Entries of `history` containing `query`, compared case-insensitively.
///
/// Original order is kept and every surviving entry carries its index in
/// `history`. An empty query matches everything.
pub fn filter_history<'a>(history: &'a [String], query: &str) -> Vec<(usize, &'a str)> {
    if query.is_empty() {
        return history
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.as_str()))
            .collect();
    }

    let needle = query.to_lowercase();
    history
        .iter()
        .enumerate()
        .filter(|(_, s)| s.to_lowercase().contains(&needle))
        .map(|(i, s)| (i, s.as_str()))
        .collect()
}
