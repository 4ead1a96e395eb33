//! Free-text narrowing of sender rows.
//!
//! A row matches when the query, compared case-insensitively, is a substring
//! of its `from_name` or its `from_email`. No other column is searched. An empty
//! query matches every row. Output order is input order.

use super::model::SenderRow;

/// Lowercased search needle, computed once per query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderQuery {
    needle: String,
}

impl SenderQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, row: &SenderRow) -> bool {
        self.is_empty()
            || row.from_name.to_lowercase().contains(&self.needle)
            || row.from_email.to_lowercase().contains(&self.needle)
    }
}

impl From<Option<&str>> for SenderQuery {
    fn from(text: Option<&str>) -> Self {
        text.map(Self::new).unwrap_or_default()
    }
}

/// Rows of `rows` matching `query`, in their original order.
pub fn filter_rows<'a>(rows: &'a [SenderRow], query: &str) -> Vec<&'a SenderRow> {
    let query = SenderQuery::new(query);
    rows.iter().filter(|row| query.matches(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::senders::model::{SenderId, SenderRecord};
    use chrono::Utc;
    use serde_json::json;

    fn row(id: i64, name: &str, email: &str) -> SenderRow {
        SenderRecord::from(json!({ "id": id, "fromName": name, "fromEmail": email }))
            .normalize_in(&Utc)
    }

    fn rows() -> Vec<SenderRow> {
        vec![
            row(1, "Bob", "bob@acme.io"),
            row(2, "Carol", "carol@Example.COM"),
            row(3, "Dave", "news@bobcat.dev"),
        ]
    }

    fn ids(rows: &[&SenderRow]) -> Vec<SenderId> {
        rows.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let rows = rows();
        let all = filter_rows(&rows, "");
        assert_eq!(
            ids(&all),
            vec![SenderId::Number(1), SenderId::Number(2), SenderId::Number(3)]
        );
    }

    #[test]
    fn bob_and_carol_scenario() {
        let rows = vec![row(1, "Bob", "b@x.com"), row(2, "Carol", "c@x.com")];
        let visible = filter_rows(&rows, "bo");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].from_name, "Bob");
    }

    #[test]
    fn matches_name_or_email() {
        let rows = rows();
        // "bob" hits row 1 by name and row 3 by email.
        assert_eq!(
            ids(&filter_rows(&rows, "bob")),
            vec![SenderId::Number(1), SenderId::Number(3)]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rows = rows();
        assert_eq!(filter_rows(&rows, "EXAMPLE"), filter_rows(&rows, "example"));
        assert_eq!(ids(&filter_rows(&rows, "eXaMpLe")), vec![SenderId::Number(2)]);
    }

    #[test]
    fn other_columns_are_not_searched() {
        let rows = vec![
            SenderRecord::from(json!({
                "fromName": "Alice",
                "fromEmail": "a@x.com",
                "replyToEmail": "zebra@x.com",
                "userName": "zebra"
            }))
            .normalize_in(&Utc),
        ];
        assert!(filter_rows(&rows, "zebra").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let rows = rows();
        for query in ["", "bo", "CAROL", "nothing"] {
            let once: Vec<SenderRow> = filter_rows(&rows, query).into_iter().cloned().collect();
            let twice: Vec<SenderRow> = filter_rows(&once, query).into_iter().cloned().collect();
            assert_eq!(once, twice, "query = {query:?}");
        }
    }

    #[test]
    fn absent_query_matches_all() {
        let rows = rows();
        let query = SenderQuery::from(None);
        assert!(rows.iter().all(|r| query.matches(r)));
    }

    #[test]
    fn placeholder_text_is_searchable() {
        let rows = vec![SenderRecord::default().normalize_in(&Utc)];
        assert_eq!(filter_rows(&rows, "n/a").len(), 1);
    }
}
