// src/search.rs

//! Case-insensitive substring search over loaded entries.

use crate::models::MemorialEntry;

/// Entries whose text fields contain `query`, in their original order.
///
/// The query is trimmed and matched case-insensitively against the name,
/// city, location, and bio of each entry, including their localized
/// variants. An empty query matches everything.
pub fn filter_entries<'a>(entries: &'a [MemorialEntry], query: &str) -> Vec<&'a MemorialEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }

    entries
        .iter()
        .filter(|entry| searchable_fields(entry).any(|f| f.to_lowercase().contains(&needle)))
        .collect()
}

fn searchable_fields(entry: &MemorialEntry) -> impl Iterator<Item = &str> {
    [
        Some(entry.name.as_str()),
        entry.name_fa.as_deref(),
        Some(entry.city.as_str()),
        entry.city_fa.as_deref(),
        Some(entry.location.as_str()),
        entry.location_fa.as_deref(),
        Some(entry.bio.as_str()),
        entry.bio_fa.as_deref(),
    ]
    .into_iter()
    .flatten()
}

/// A live search over a fixed set of entries.
///
/// `on_results` is called with the matches once on construction (empty
/// query) and again after every [`SearchSession::set_query`].
pub struct SearchSession<F>
where
    F: FnMut(&[&MemorialEntry]),
{
    entries: Vec<MemorialEntry>,
    query: String,
    on_results: F,
}

impl<F> SearchSession<F>
where
    F: FnMut(&[&MemorialEntry]),
{
    pub fn new(entries: Vec<MemorialEntry>, on_results: F) -> Self {
        let mut session = Self {
            entries,
            query: String::new(),
            on_results,
        };
        session.publish();
        session
    }

    /// Replace the query and publish the new matches.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.publish();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matches for the current query.
    pub fn results(&self) -> Vec<&MemorialEntry> {
        filter_entries(&self.entries, &self.query)
    }

    fn publish(&mut self) {
        let matches = filter_entries(&self.entries, &self.query);
        (self.on_results)(&matches);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    fn entry(id: &str, name: &str, city: &str, city_fa: Option<&str>) -> MemorialEntry {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "city": city,
            "city_fa": city_fa,
            "date": "2026-01-08",
            "bio": format!("{} was a student.", name),
        }))
        .unwrap()
    }

    fn entries() -> Vec<MemorialEntry> {
        vec![
            entry("a", "Sara", "Tehran", Some("تهران")),
            entry("b", "Reza", "Shiraz", Some("شیراز")),
            entry("c", "Nika", "Tehran", None),
        ]
    }

    fn ids(matches: &[&MemorialEntry]) -> Vec<String> {
        matches.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_filter_by_city_prefix_case_insensitive() {
        let all = entries();
        assert_eq!(ids(&filter_entries(&all, "teh")), vec!["a", "c"]);
        assert_eq!(ids(&filter_entries(&all, "  TEH ")), vec!["a", "c"]);
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let all = entries();
        assert_eq!(ids(&filter_entries(&all, "")), vec!["a", "b", "c"]);
        assert_eq!(ids(&filter_entries(&all, "   ")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_filter_matches_localized_fields_and_bio() {
        let all = entries();
        assert_eq!(ids(&filter_entries(&all, "شیراز")), vec!["b"]);
        assert_eq!(ids(&filter_entries(&all, "student")).len(), 3);
        assert!(filter_entries(&all, "isfahan").is_empty());
    }

    #[test]
    fn test_session_publishes_on_start_and_each_query() {
        let seen: RefCell<Vec<Vec<String>>> = RefCell::new(Vec::new());

        let mut session = SearchSession::new(entries(), |matches| {
            seen.borrow_mut().push(ids(matches));
        });
        session.set_query("reza");
        session.set_query("");

        assert_eq!(session.query(), "");
        assert_eq!(session.results().len(), 3);
        drop(session);

        assert_eq!(
            seen.into_inner(),
            vec![
                vec!["a".to_string(), "b".into(), "c".into()],
                vec!["b".to_string()],
                vec!["a".to_string(), "b".into(), "c".into()],
            ]
        );
    }
}
