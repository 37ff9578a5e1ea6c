use super::feed::fetcher::FeedError;
use super::feed::order::sort_newest_first;
use super::feed::present::{render_cards, FeedCard};
use super::feed::types::CanonicalRow;

pub const LOADING_TEXT: &str = "Lädt…";
pub const ERROR_HEADING: &str = "Fehler beim Laden";

/// Load and refresh state for a feed screen.
#[derive(Debug, Clone, Default)]
pub struct FeedView {
    items: Vec<CanonicalRow>,
    loading: bool,
    error: Option<String>,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a load as started. Returns `false` while another load is still
    /// in flight, in which case the caller must not start a fetch.
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// Applies a finished load. Failures keep the previously shown items.
    pub fn finish_load(&mut self, result: Result<Vec<CanonicalRow>, FeedError>) {
        match result {
            Ok(mut rows) => {
                sort_newest_first(&mut rows);
                self.items = rows;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }

    pub fn items(&self) -> &[CanonicalRow] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn cards(&self) -> Vec<FeedCard> {
        self.items.iter().map(FeedCard::from_row).collect()
    }

    pub fn render(&self) -> String {
        if self.loading {
            return format!("{LOADING_TEXT}\n");
        }
        if let Some(error) = &self.error {
            return format!("{ERROR_HEADING}\n{error}\n");
        }
        render_cards(&self.cards())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::normalize::normalize_row_in;
    use crate::core::feed::types::RawRow;
    use chrono::Utc;

    fn rows() -> Vec<CanonicalRow> {
        ["p1", "p3", "p2"]
            .into_iter()
            .map(|id| normalize_row_in(&RawRow::new().with("id", id).with("type", "news"), &Utc))
            .collect()
    }

    #[test]
    fn second_load_is_refused_while_in_flight() {
        let mut view = FeedView::new();
        assert!(view.begin_load());
        assert!(!view.begin_load());
        assert_eq!(view.render(), "Lädt…\n");

        view.finish_load(Ok(rows()));
        assert!(!view.is_loading());
        assert!(view.begin_load());
    }

    #[test]
    fn successful_load_sorts_items() {
        let mut view = FeedView::new();
        view.begin_load();
        view.finish_load(Ok(rows()));

        let ids: Vec<&str> = view.items().iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p2", "p1"]);
        assert!(view.render().starts_with("[News] p3\n"));
    }

    #[test]
    fn failed_load_keeps_previous_items() {
        let mut view = FeedView::new();
        view.begin_load();
        view.finish_load(Ok(rows()));

        view.begin_load();
        view.finish_load(Err(FeedError::Http(503)));

        assert_eq!(view.items().len(), 3);
        assert_eq!(view.error(), Some("Feed API HTTP 503"));
        assert_eq!(view.render(), "Fehler beim Laden\nFeed API HTTP 503\n");

        assert!(view.begin_load());
        assert_eq!(view.error(), None);
    }

    #[test]
    fn empty_feed_renders_placeholder() {
        let mut view = FeedView::new();
        view.begin_load();
        view.finish_load(Ok(Vec::new()));
        assert_eq!(view.render(), "Keine Einträge\n");
    }
}
