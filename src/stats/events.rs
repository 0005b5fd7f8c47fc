//! Search event statistics.
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::HashMap;
use std::ops::Add;

/// Things that can happen to a frame of the search.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum SearchEvent {
    /// A frame was popped from the work stack.
    Visited,
    /// A new spanning tree was recorded.
    TreeFound,
    /// A spanning tree was reached that had already been recorded.
    Duplicate,
    /// No valid edge was drawn within the retry budget.
    Exhausted,
    /// Every remaining edge was already fixed.
    NoCandidates,
    /// The frame was past the depth ceiling.
    DepthLimit,
}

const EVENTS: [SearchEvent; 6] = [
    SearchEvent::Visited,
    SearchEvent::TreeFound,
    SearchEvent::Duplicate,
    SearchEvent::Exhausted,
    SearchEvent::NoCandidates,
    SearchEvent::DepthLimit,
];

impl SearchEvent {
    fn key(self) -> &'static str {
        match self {
            SearchEvent::Visited => "visited",
            SearchEvent::TreeFound => "tree_found",
            SearchEvent::Duplicate => "duplicate",
            SearchEvent::Exhausted => "exhausted",
            SearchEvent::NoCandidates => "no_candidates",
            SearchEvent::DepthLimit => "depth_limit",
        }
    }
}

/// Event counts over a search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchCounts {
    counts: HashMap<SearchEvent, usize>,
}

impl Add for SearchCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let mut union = self.counts;
        for (&event, count) in other.counts.iter() {
            *union.entry(event).or_insert(0) += count;
        }
        SearchCounts { counts: union }
    }
}

impl SearchCounts {
    /// Increments the count of an event.
    pub fn inc(&mut self, event: SearchEvent) {
        *self.counts.entry(event).or_insert(0) += 1;
    }

    /// Returns the count of an event.
    pub fn get(&self, event: SearchEvent) -> usize {
        self.counts.get(&event).map_or(0, |&c| c)
    }

    /// Number of branches that ended without a new tree.
    pub fn dead_ends(&self) -> usize {
        self.get(SearchEvent::Duplicate)
            + self.get(SearchEvent::Exhausted)
            + self.get(SearchEvent::NoCandidates)
            + self.get(SearchEvent::DepthLimit)
    }
}

impl Serialize for SearchCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SearchCounts", EVENTS.len())?;
        for &event in EVENTS.iter() {
            state.serialize_field(event.key(), &self.get(event))?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inc_and_get() {
        let mut counts = SearchCounts::default();
        counts.inc(SearchEvent::Exhausted);
        counts.inc(SearchEvent::Exhausted);
        counts.inc(SearchEvent::Duplicate);
        assert_eq!(counts.get(SearchEvent::Exhausted), 2);
        assert_eq!(counts.get(SearchEvent::TreeFound), 0);
        assert_eq!(counts.dead_ends(), 3);
    }

    #[test]
    fn add_merges() {
        let mut a = SearchCounts::default();
        a.inc(SearchEvent::TreeFound);
        let mut b = SearchCounts::default();
        b.inc(SearchEvent::TreeFound);
        b.inc(SearchEvent::DepthLimit);
        let sum = a + b;
        assert_eq!(sum.get(SearchEvent::TreeFound), 2);
        assert_eq!(sum.get(SearchEvent::DepthLimit), 1);
    }

    #[test]
    fn serializes_every_event() {
        let mut counts = SearchCounts::default();
        counts.inc(SearchEvent::Visited);
        assert_eq!(
            serde_json::to_value(&counts).unwrap(),
            json!({
                "visited": 1,
                "tree_found": 0,
                "duplicate": 0,
                "exhausted": 0,
                "no_candidates": 0,
                "depth_limit": 0
            })
        );
    }
}
