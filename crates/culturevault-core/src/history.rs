//! Recency history for selected place names: most recent first, no
//! duplicates, bounded length.

/// Push `name` onto the front of `history`, dropping any earlier occurrence
/// of the same name and truncating to `cap` entries. `history` is expected
/// most-recent-first and the result keeps that order.
pub fn push_recent(history: &[String], name: &str, cap: usize) -> Vec<String> {
    let mut updated = Vec::with_capacity(history.len() + 1);
    updated.push(name.to_string());
    updated.extend(history.iter().filter(|h| h.as_str() != name).cloned());
    updated.truncate(cap);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_newest_entry_lands_first() {
        let history = entries(&["Tokyo", "Paris"]);
        assert_eq!(push_recent(&history, "Kyoto", 10), entries(&["Kyoto", "Tokyo", "Paris"]));
    }

    #[test]
    fn test_reselecting_moves_to_front_without_duplicate() {
        let mut history = Vec::new();
        for name in ["Kyoto", "Tokyo", "Kyoto"] {
            history = push_recent(&history, name, 10);
        }
        assert_eq!(history, entries(&["Kyoto", "Tokyo"]));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = Vec::new();
        for i in 0..11 {
            history = push_recent(&history, &format!("Place {i}"), 10);
        }
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], "Place 10");
        assert!(!history.contains(&"Place 0".to_string()), "oldest entry should be evicted");
    }

    #[test]
    fn test_cap_zero_keeps_nothing() {
        assert!(push_recent(&[], "Kyoto", 0).is_empty());
    }
}
