// Per-participant draft queues.
//
// A queue is a preference signal, not an ownership claim: any participant may
// queue any undrafted player, and a player drafted by anyone is purged from
// every queue in the same commit.

use serde::{Deserialize, Serialize};

/// One participant's ordered, duplicate-free preference list of player ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftQueue {
    entries: Vec<String>,
}

impl DraftQueue {
    pub fn new() -> Self {
        DraftQueue::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue entries in priority order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.iter().any(|id| id == player_id)
    }

    /// Append a player to the back of the queue. No-op if already present.
    pub fn enqueue(&mut self, player_id: &str) {
        if !self.contains(player_id) {
            self.entries.push(player_id.to_string());
        }
    }

    /// Remove a player from the queue. No-op if absent.
    pub fn dequeue(&mut self, player_id: &str) {
        self.entries.retain(|id| id != player_id);
    }

    /// Replace the queue order wholesale.
    ///
    /// Returns `false` (leaving the queue unchanged) unless `new_order` is a
    /// permutation of the current entries. Entries are duplicate-free, so the
    /// permutation test is an equal-sorted-ids comparison.
    pub fn reorder(&mut self, new_order: Vec<String>) -> bool {
        let mut current: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        let mut proposed: Vec<&str> = new_order.iter().map(String::as_str).collect();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return false;
        }
        self.entries = new_order;
        true
    }

    /// Remove and return the first entry, if any.
    pub fn consume_top(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }
}

/// Purge a drafted player from every participant's queue.
pub fn purge_everywhere(queues: &mut [DraftQueue], player_id: &str) {
    for queue in queues.iter_mut() {
        queue.dequeue(player_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(queue: &DraftQueue) -> Vec<&str> {
        queue.entries().iter().map(String::as_str).collect()
    }

    #[test]
    fn enqueue_appends_in_order() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        q.enqueue("p3");
        assert_eq!(ids(&q), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn enqueue_duplicate_is_a_no_op() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        q.enqueue("p1");
        assert_eq!(ids(&q), vec!["p1", "p2"]);
    }

    #[test]
    fn dequeue_removes_entry() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        q.dequeue("p1");
        assert_eq!(ids(&q), vec!["p2"]);
    }

    #[test]
    fn dequeue_absent_is_a_no_op() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.dequeue("p9");
        assert_eq!(ids(&q), vec!["p1"]);
    }

    #[test]
    fn reorder_accepts_permutation() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        q.enqueue("p3");
        assert!(q.reorder(vec!["p3".into(), "p1".into(), "p2".into()]));
        assert_eq!(ids(&q), vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn reorder_rejects_missing_entry() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        assert!(!q.reorder(vec!["p1".into()]));
        assert_eq!(ids(&q), vec!["p1", "p2"]);
    }

    #[test]
    fn reorder_rejects_foreign_entry() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        assert!(!q.reorder(vec!["p1".into(), "p9".into()]));
        assert_eq!(ids(&q), vec!["p1", "p2"]);
    }

    #[test]
    fn reorder_rejects_duplicated_entry() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        assert!(!q.reorder(vec!["p1".into(), "p1".into()]));
        assert_eq!(ids(&q), vec!["p1", "p2"]);
    }

    #[test]
    fn reorder_empty_to_empty_is_valid() {
        let mut q = DraftQueue::new();
        assert!(q.reorder(vec![]));
        assert!(q.is_empty());
    }

    #[test]
    fn consume_top_pops_front() {
        let mut q = DraftQueue::new();
        q.enqueue("p1");
        q.enqueue("p2");
        assert_eq!(q.consume_top().as_deref(), Some("p1"));
        assert_eq!(q.consume_top().as_deref(), Some("p2"));
        assert_eq!(q.consume_top(), None);
    }

    #[test]
    fn purge_everywhere_hits_all_queues() {
        let mut queues = vec![DraftQueue::new(), DraftQueue::new(), DraftQueue::new()];
        for q in queues.iter_mut() {
            q.enqueue("shared");
            q.enqueue("own");
        }
        purge_everywhere(&mut queues, "shared");
        for q in &queues {
            assert!(!q.contains("shared"));
            assert!(q.contains("own"));
        }
    }
}
