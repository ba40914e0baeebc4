/// Counts completion signals, one per profile index.
///
/// A second signal for the same index is ignored so a misbehaving job can
/// never make the run look finished early.
#[derive(Debug, Clone)]
pub struct CompletionTracker {
    seen: Vec<bool>,
    completed: usize,
}

impl CompletionTracker {
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            seen: vec![false; expected],
            completed: 0,
        }
    }

    /// Records completion of `index`. Returns `false` for duplicates and
    /// out-of-range indices.
    pub fn record(&mut self, index: usize) -> bool {
        match self.seen.get_mut(index) {
            Some(seen) if !*seen => {
                *seen = true;
                self.completed += 1;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed == self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_run_is_complete_immediately() {
        assert!(CompletionTracker::new(0).is_complete());
    }

    #[test]
    fn completes_after_each_index_once() {
        let mut tracker = CompletionTracker::new(3);
        assert!(tracker.record(2));
        assert!(tracker.record(0));
        assert!(!tracker.is_complete());
        assert!(tracker.record(1));
        assert!(tracker.is_complete());
        assert_eq!(tracker.completed(), 3);
    }

    #[test]
    fn duplicates_and_strays_do_not_count() {
        let mut tracker = CompletionTracker::new(2);
        assert!(tracker.record(0));
        assert!(!tracker.record(0));
        assert!(!tracker.record(7));
        assert_eq!(tracker.completed(), 1);
        assert!(!tracker.is_complete());
    }
}
