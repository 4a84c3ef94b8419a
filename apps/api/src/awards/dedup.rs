use std::collections::HashSet;

use crate::awards::models::{AwardCandidate, AwardRecord};

/// Anything with a name and an optional year can be deduplicated.
pub trait DedupKey {
    fn dedup_name(&self) -> &str;
    fn dedup_year(&self) -> Option<i32>;

    /// Lowercased trimmed name plus year.
    fn dedup_key(&self) -> String {
        let year = self.dedup_year().map(|y| y.to_string()).unwrap_or_default();
        format!("{}__{}", self.dedup_name().trim().to_lowercase(), year)
    }
}

impl DedupKey for AwardCandidate {
    fn dedup_name(&self) -> &str {
        &self.name
    }

    fn dedup_year(&self) -> Option<i32> {
        self.year
    }
}

impl DedupKey for AwardRecord {
    fn dedup_name(&self) -> &str {
        &self.name
    }

    fn dedup_year(&self) -> Option<i32> {
        Some(self.year)
    }
}

/// Keeps the first occurrence of each key, in input order.
pub fn dedupe<T: DedupKey>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, description: &str, year: Option<i32>) -> AwardCandidate {
        AwardCandidate {
            name: name.to_string(),
            description: description.to_string(),
            organization: "NCAA".to_string(),
            year,
            category: None,
            significance: None,
            source_url: None,
            image_url: None,
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let deduped = dedupe(vec![
            candidate("All-American", "first", Some(2008)),
            candidate("  all-american ", "second", Some(2008)),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].description, "first");
    }

    #[test]
    fn test_different_years_are_distinct() {
        let deduped = dedupe(vec![
            candidate("All-American", "a", Some(2008)),
            candidate("All-American", "b", Some(2009)),
            candidate("All-American", "c", None),
        ]);
        assert_eq!(deduped.len(), 3);
    }

    #[test]
    fn test_order_is_stable() {
        let deduped = dedupe(vec![
            candidate("MVP", "a", Some(2010)),
            candidate("Rookie of the Year", "b", Some(2009)),
            candidate("MVP", "c", Some(2010)),
            candidate("Team Captain", "d", Some(2011)),
        ]);
        let names: Vec<_> = deduped.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["MVP", "Rookie of the Year", "Team Captain"]);
    }

    #[test]
    fn test_missing_year_keys_on_empty_suffix() {
        assert_eq!(candidate(" MVP ", "", None).dedup_key(), "mvp__");
        assert_eq!(candidate("MVP", "", Some(2010)).dedup_key(), "mvp__2010");
    }
}
