//! k-subsets and k-permutations of an ordered sequence.
//!
//! Both enumerations are lazy and emit their results in lexicographic order of positions, so a
//! search over them is deterministic for a fixed input order.

use itertools::Itertools;

/// All `k`-element subsets of `items`, each in input order
pub fn combinations<T: Clone>(items: &[T], k: usize) -> impl Iterator<Item = Vec<T>> + '_ {
    items.iter().cloned().combinations(k)
}

/// All orderings of `k` distinct elements of `items`
pub fn permutations<T: Clone>(items: &[T], k: usize) -> impl Iterator<Item = Vec<T>> + '_ {
    items.iter().cloned().permutations(k)
}

/// Computes `n choose k`, or `None` if the value exceeds `cap`
pub fn binomial_capped(n: u64, k: u64, cap: u128) -> Option<u128> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut result: u128 = 1;
    for i in 0..k {
        result = result.checked_mul(n - i)? / (i + 1);
        if result > cap {
            return None;
        }
    }

    Some(result)
}

/// Number of ordered `k`-arrangements of `n` elements, or `None` if the value exceeds `cap`
pub fn arrangements_capped(n: u64, k: u64, cap: u128) -> Option<u128> {
    if k > n {
        return Some(0);
    }

    let mut result: u128 = 1;
    for i in 0..k as u128 {
        result = result.checked_mul(n as u128 - i)?;
        if result > cap {
            return None;
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::integer::binomial;

    #[test]
    fn subsets_in_order() {
        let subsets = combinations(&["A", "B", "C"], 2).collect_vec();
        assert_eq!(subsets, vec![vec!["A", "B"], vec!["A", "C"], vec!["B", "C"]]);

        assert_eq!(combinations(&[1, 2, 3], 0).count(), 1);
        assert_eq!(combinations(&[1, 2, 3], 4).count(), 0);
    }

    #[test]
    fn permutation_counts() {
        assert_eq!(permutations(&[1, 2, 3, 4], 2).count(), 12);
        assert_eq!(permutations(&[1, 2, 3], 3).next(), Some(vec![1, 2, 3]));
        assert_eq!(arrangements_capped(4, 2, 1000), Some(12));
        assert_eq!(arrangements_capped(30, 4, 1000), None);
    }

    #[test]
    fn capped_binomials_match() {
        for n in 0..40u64 {
            for k in 0..=n {
                assert_eq!(
                    binomial_capped(n, k, u128::MAX),
                    Some(binomial(n as u128, k as u128))
                );
            }
        }

        assert_eq!(binomial_capped(3, 5, 10), Some(0));
        assert_eq!(binomial_capped(50, 25, 1_000_000), None);
    }
}
