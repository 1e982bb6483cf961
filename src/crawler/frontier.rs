//! Crawl frontier: the visit queue plus the already-visited set
//!
//! The frontier keeps three disjoint sets of canonical URLs:
//! - `pending`: queued, not yet handed out (FIFO, with a membership set)
//! - `in_flight`: handed out by `dequeue_one`, fetch not yet completed
//! - `visited`: fetch completed (success or terminal failure); never shrinks
//!
//! A URL is enqueued only when it is in none of the three, so no URL is ever
//! handed out twice in one run.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Frontier of one crawl run
#[derive(Debug, Default)]
pub struct Frontier {
    /// FIFO order of pending URLs
    queue: VecDeque<Url>,

    /// Membership set mirroring `queue`
    pending: HashSet<String>,

    in_flight: HashSet<String>,

    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` unless it is already pending, in flight or visited
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.pending.contains(key) || self.in_flight.contains(key)
        {
            return false;
        }

        self.pending.insert(key.to_string());
        self.queue.push_back(url);
        true
    }

    /// Removes the oldest pending URL and marks it in flight
    ///
    /// Returns None when nothing is pending.
    pub fn dequeue_one(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.pending.remove(url.as_str());
        self.in_flight.insert(url.as_str().to_string());
        Some(url)
    }

    /// Records that the fetch of `url` completed; idempotent
    pub fn mark_visited(&mut self, url: &Url) {
        let key = url.as_str();
        self.in_flight.remove(key);
        if self.pending.remove(key) {
            self.queue.retain(|queued| queued.as_str() != key);
        }
        self.visited.insert(key.to_string());
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns true if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns true if nothing is pending and nothing is in flight
    pub fn is_quiescent(&self) -> bool {
        self.queue.is_empty() && self.in_flight.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_new_frontier() {
        let frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert!(frontier.is_quiescent());
        assert_eq!(frontier.pending_len(), 0);
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let mut frontier = Frontier::new();
        assert!(frontier.enqueue(url("/a")));
        assert!(!frontier.enqueue(url("/a")));
        assert_eq!(frontier.pending_len(), 1);
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.enqueue(url("/a"));
        frontier.enqueue(url("/b"));
        frontier.enqueue(url("/c"));

        assert_eq!(frontier.dequeue_one(), Some(url("/a")));
        assert_eq!(frontier.dequeue_one(), Some(url("/b")));
        assert_eq!(frontier.dequeue_one(), Some(url("/c")));
        assert_eq!(frontier.dequeue_one(), None);
    }

    #[test]
    fn test_in_flight_blocks_enqueue() {
        let mut frontier = Frontier::new();
        frontier.enqueue(url("/a"));
        let a = frontier.dequeue_one().unwrap();

        assert!(!frontier.enqueue(url("/a")));
        assert!(frontier.is_empty());
        assert!(!frontier.is_quiescent());
        assert_eq!(frontier.in_flight_len(), 1);

        frontier.mark_visited(&a);
        assert!(frontier.is_quiescent());
    }

    #[test]
    fn test_visited_blocks_enqueue() {
        let mut frontier = Frontier::new();
        frontier.enqueue(url("/a"));
        let a = frontier.dequeue_one().unwrap();
        frontier.mark_visited(&a);

        assert!(frontier.is_visited(&a));
        assert!(!frontier.enqueue(url("/a")));
        assert_eq!(frontier.visited_len(), 1);
    }

    #[test]
    fn test_mark_visited_idempotent() {
        let mut frontier = Frontier::new();
        let a = url("/a");
        frontier.mark_visited(&a);
        frontier.mark_visited(&a);
        assert_eq!(frontier.visited_len(), 1);
    }

    #[test]
    fn test_mark_visited_removes_pending() {
        let mut frontier = Frontier::new();
        frontier.enqueue(url("/a"));
        frontier.enqueue(url("/b"));
        frontier.mark_visited(&url("/a"));

        assert_eq!(frontier.pending_len(), 1);
        assert!(!frontier.enqueue(url("/a")));
        assert_eq!(frontier.dequeue_one(), Some(url("/b")));
    }

    #[test]
    fn test_cycle_terminates() {
        // a -> b -> a: every dequeue is followed by re-discovery of the other
        let mut frontier = Frontier::new();
        frontier.enqueue(url("/a"));

        let mut fetched = Vec::new();
        while let Some(next) = frontier.dequeue_one() {
            let other = if next == url("/a") { url("/b") } else { url("/a") };
            frontier.enqueue(other);
            frontier.enqueue(next.clone());
            frontier.mark_visited(&next);
            fetched.push(next);
        }

        assert_eq!(fetched, vec![url("/a"), url("/b")]);
        assert!(frontier.is_quiescent());
    }
}
