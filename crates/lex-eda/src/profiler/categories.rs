//! Frequency counting for categorical columns.

use crate::types::CategoryCount;
use std::collections::HashMap;

/// Count each distinct non-missing value.
///
/// The result is sorted by count descending. Ties keep the order in which the
/// values first appear in the column.
pub fn value_counts(values: &[Option<String>]) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for value in values.iter().flatten() {
        match index.get(value.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value.as_str(), counts.len());
                counts.push(CategoryCount {
                    value: value.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-occurrence order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_counts_sorted_descending() {
        let values = owned(&[Some("a"), Some("b"), Some("b"), Some("c"), Some("b"), Some("c")]);
        let counts = value_counts(&values);

        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("b", 3), ("c", 2), ("a", 1)]);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let values = owned(&[Some("z"), Some("y"), Some("x"), Some("y"), Some("z")]);
        let counts = value_counts(&values);

        let order: Vec<&str> = counts.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let values = owned(&[None, Some("a"), None]);
        let counts = value_counts(&values);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 1);
    }
}
