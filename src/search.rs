/// Results per search page.
pub const PAGE_SIZE: i32 = 10;

/// Number of pages needed for `total` results.
pub fn total_pages(total: i64) -> i64 {
    (total + PAGE_SIZE as i64 - 1) / PAGE_SIZE as i64
}

/// Orders in-flight search queries so the latest issued one always wins.
///
/// Every keystroke issues a new token; a response is only accepted when it
/// carries the most recently issued token, so a slow superseded query can never
/// overwrite a newer result regardless of completion order.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    issued: u64,
}

impl SearchSequencer {
    /// Hand out the token for a new query.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// True when a completed query's result may be applied.
    pub fn accept(&self, token: u64) -> bool {
        token == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
    }

    #[test]
    fn stale_completion_is_rejected() {
        let mut seq = SearchSequencer::default();
        let first = seq.issue();
        let second = seq.issue();

        // the newer query lands first; the older one completes late
        assert!(seq.accept(second));
        assert!(!seq.accept(first));
    }

    #[test]
    fn latest_token_stays_valid_until_superseded() {
        let mut seq = SearchSequencer::default();
        let token = seq.issue();
        assert!(seq.accept(token));
        assert!(seq.accept(token));

        seq.issue();
        assert!(!seq.accept(token));
    }
}
