use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::search::gazetteer::{Completion, Gazetteer, PlaceKind};

/// Autocomplete service over the place index. Result batches are pushed
/// through a channel rather than returned, so a batch can land after the
/// caller has already moved on — the same shape as the platform
/// delegate callback this stands in for.
pub struct SearchCompleter {
    gazetteer: Arc<Gazetteer>,
    result_kind: Option<PlaceKind>,
    query_fragment: String,
    results_tx: UnboundedSender<Vec<Completion>>,
}

impl SearchCompleter {
    pub fn new(gazetteer: Arc<Gazetteer>) -> (Self, UnboundedReceiver<Vec<Completion>>) {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        (
            Self {
                gazetteer,
                result_kind: None,
                query_fragment: String::new(),
                results_tx,
            },
            results_rx,
        )
    }

    /// Restricts results to points of interest, dropping plain addresses.
    pub fn point_of_interest_only(mut self) -> Self {
        self.result_kind = Some(PlaceKind::PointOfInterest);
        self
    }

    pub fn query_fragment(&self) -> &str {
        &self.query_fragment
    }

    /// Updates the fragment and pushes a fresh result batch. No batch is
    /// pushed for an unchanged fragment.
    pub fn set_query_fragment(&mut self, fragment: &str) {
        if self.query_fragment == fragment {
            return;
        }
        self.query_fragment = fragment.to_string();

        let results = self.gazetteer.lookup(fragment, self.result_kind);
        // The receiver side may already be gone during shutdown.
        let _ = self.results_tx.send(results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_changes_push_result_batches() {
        let (completer, mut results_rx) = SearchCompleter::new(Arc::new(Gazetteer::builtin()));
        let mut completer = completer.point_of_interest_only();

        completer.set_query_fragment("Tokyo Tower");
        let batch = results_rx.try_recv().unwrap();
        assert_eq!(batch[0].title, "Tokyo Tower");
    }

    #[test]
    fn unchanged_fragment_pushes_nothing() {
        let (mut completer, mut results_rx) =
            SearchCompleter::new(Arc::new(Gazetteer::builtin()));
        completer.set_query_fragment("Tokyo");
        results_rx.try_recv().unwrap();

        completer.set_query_fragment("Tokyo");
        assert!(results_rx.try_recv().is_err());
    }

    #[test]
    fn address_results_are_filtered_out() {
        let (completer, mut results_rx) = SearchCompleter::new(Arc::new(Gazetteer::builtin()));
        let mut completer = completer.point_of_interest_only();

        completer.set_query_fragment("Shibakoen");
        let batch = results_rx.try_recv().unwrap();
        assert!(batch.is_empty());
    }
}
