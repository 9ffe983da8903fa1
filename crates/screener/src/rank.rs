// In crates/screener/src/rank.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Sorts by `key` and keeps the first `cap` items. The sort is stable, so equal
/// keys keep their input order in both directions.
pub fn rank_by<T, K: Ord>(mut items: Vec<T>, order: Order, cap: usize, key: impl Fn(&T) -> K) -> Vec<T> {
    match order {
        Order::Ascending => items.sort_by(|a, b| key(a).cmp(&key(b))),
        Order::Descending => items.sort_by(|a, b| key(b).cmp(&key(a))),
    }
    items.truncate(cap);
    items
}
