use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

/// Elements of `first` that are absent from `second`.
///
/// Membership is a hash lookup, so the cost is linear in `first`.
pub fn difference<'a, T, I, S>(first: I, second: &HashSet<T, S>) -> Vec<T>
where
    T: Eq + Hash + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
    S: BuildHasher,
{
    first
        .into_iter()
        .filter(|element| !second.contains(*element))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_missing_elements() {
        let first: HashSet<u32> = [1, 2, 3, 4].into_iter().collect();
        let second: HashSet<u32> = [2, 4, 9].into_iter().collect();

        let mut diff = difference(&first, &second);
        diff.sort_unstable();
        assert_eq!(diff, vec![1, 3]);
    }

    #[test]
    fn empty_sides() {
        let empty: HashSet<u32> = HashSet::new();
        let some: HashSet<u32> = [7].into_iter().collect();

        assert!(difference(&empty, &some).is_empty());
        assert_eq!(difference(&some, &empty), vec![7]);
        assert!(difference(&some, &some).is_empty());
    }
}
