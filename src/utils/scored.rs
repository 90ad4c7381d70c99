use std::cmp::Ordering;

/// Priority-queue entry that makes [`std::collections::BinaryHeap`] pop the smallest score first.
///
/// Equal scores are popped in ascending `key` order, so the key doubles as the tie-break rule:
/// algorithms use a node index or an insertion counter depending on which order they guarantee.
#[derive(Debug, Clone, Copy)]
pub struct MinScored<K> {
    pub score: f64,
    pub key: K,
}

impl<K> MinScored<K> {
    pub fn new(score: f64, key: K) -> Self {
        Self { score, key }
    }
}

impl<K: Ord> PartialEq for MinScored<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord> Eq for MinScored<K> {}

impl<K: Ord> PartialOrd for MinScored<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for MinScored<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.key.cmp(&self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::collections::BinaryHeap;

    #[test]
    fn pops_smallest_then_lowest_key() {
        let mut heap: BinaryHeap<_> = [(3.0, 0), (1.0, 5), (1.0, 2), (2.0, 1)]
            .into_iter()
            .map(|(s, k)| MinScored::new(s, k))
            .collect();

        let order = std::iter::from_fn(|| heap.pop()).map(|e| e.key).collect_vec();
        assert_eq!(order, vec![2, 5, 1, 0]);
    }
}
