use tracing::debug;

/// Snapshot state of one backend collection.
///
/// A refresh replaces the whole collection; there is no partial merge. On a
/// failed load the previous rows survive as `Stale` so the view can keep
/// rendering something consistent instead of a half-updated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState<T> {
    /// Nothing fetched yet.
    Empty,
    /// First load outstanding, nothing to show yet.
    Loading,
    /// Last load succeeded; these rows mirror the server's response.
    Ready(Vec<T>),
    /// Last load failed; `last_good` is the previous successful snapshot.
    Stale { error: String, last_good: Vec<T> },
}

/// Ticket for one in-flight load: the session epoch it was issued under and
/// a per-resource sequence number. A completion is applied only when both
/// still match, so a response that raced a logout (or a superseding load)
/// is dropped instead of populating a cache it no longer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag {
    pub epoch: u64,
    pub seq: u64,
}

/// What `complete` did with a finished load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Rows replaced wholesale.
    Applied,
    /// Load failed; previous rows (if any) kept, error carried for display.
    Failed(String),
    /// The response no longer matched the current identity or load; ignored.
    Discarded,
}

/// In-memory snapshot of one backend collection, refreshed on view entry
/// and after a successful mutation.
#[derive(Debug)]
pub struct ResourceCache<T> {
    state: CacheState<T>,
    in_flight: Option<FetchTag>,
    seq: u64,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        ResourceCache {
            state: CacheState::Empty,
            in_flight: None,
            seq: 0,
        }
    }
}

impl<T> ResourceCache<T> {
    pub fn new() -> Self {
        ResourceCache::default()
    }

    pub fn state(&self) -> &CacheState<T> {
        &self.state
    }

    /// The rows a view should render right now: the ready snapshot, or the
    /// last good one while stale, or nothing.
    pub fn rows(&self) -> &[T] {
        match &self.state {
            CacheState::Ready(rows) => rows,
            CacheState::Stale { last_good, .. } => last_good,
            CacheState::Empty | CacheState::Loading => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a load under the given session epoch. Returns the tag the
    /// caller must attach to the request, or `None` if a load is already
    /// outstanding — the policy is that a second trigger is simply not
    /// issued while the first is in flight.
    pub fn begin_load(&mut self, epoch: u64) -> Option<FetchTag> {
        if self.in_flight.is_some() {
            return None;
        }
        self.seq += 1;
        let tag = FetchTag {
            epoch,
            seq: self.seq,
        };
        self.in_flight = Some(tag);
        if matches!(self.state, CacheState::Empty) {
            self.state = CacheState::Loading;
        }
        // Ready/Stale keep their rows while the refresh is outstanding.
        Some(tag)
    }

    /// Apply a finished load. `current_epoch` is the session epoch at
    /// completion time; a tag minted under a different epoch (logout or
    /// login switch happened mid-flight) or superseded by `invalidate` is
    /// discarded without touching the rows.
    pub fn complete(
        &mut self,
        tag: FetchTag,
        current_epoch: u64,
        result: Result<Vec<T>, String>,
    ) -> Completion {
        if self.in_flight != Some(tag) || tag.epoch != current_epoch {
            debug!(
                tag_epoch = tag.epoch,
                current_epoch, "discarding stale fetch completion"
            );
            return Completion::Discarded;
        }
        self.in_flight = None;
        match result {
            Ok(rows) => {
                self.state = CacheState::Ready(rows);
                Completion::Applied
            }
            Err(error) => {
                // Keep the previous snapshot; first-load failures fall back
                // to Empty so the view renders an empty table, not a crash.
                self.state = match std::mem::replace(&mut self.state, CacheState::Empty) {
                    CacheState::Ready(rows) | CacheState::Stale {
                        last_good: rows, ..
                    } => CacheState::Stale {
                        error: error.clone(),
                        last_good: rows,
                    },
                    CacheState::Empty | CacheState::Loading => CacheState::Empty,
                };
                Completion::Failed(error)
            }
        }
    }

    /// Drop everything. Called on logout/login-switch so a new identity can
    /// never observe the previous identity's rows before a fresh load.
    pub fn invalidate(&mut self) {
        self.state = CacheState::Empty;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_lifecycle() {
        let mut cache: ResourceCache<i64> = ResourceCache::new();
        assert_eq!(*cache.state(), CacheState::Empty);

        let tag = cache.begin_load(1).unwrap();
        assert_eq!(*cache.state(), CacheState::Loading);
        assert!(cache.is_loading());
        assert!(cache.rows().is_empty());

        let outcome = cache.complete(tag, 1, Ok(vec![10, 20]));
        assert_eq!(outcome, Completion::Applied);
        assert_eq!(cache.rows(), &[10, 20]);
        assert!(!cache.is_loading());
    }

    #[test]
    fn test_second_trigger_is_not_issued() {
        let mut cache: ResourceCache<i64> = ResourceCache::new();
        let first = cache.begin_load(1);
        assert!(first.is_some());
        assert!(cache.begin_load(1).is_none());

        // After completion a new load can start again
        cache.complete(first.unwrap(), 1, Ok(vec![]));
        assert!(cache.begin_load(1).is_some());
    }

    #[test]
    fn test_refresh_replaces_wholesale() {
        let mut cache: ResourceCache<i64> = ResourceCache::new();
        let tag = cache.begin_load(1).unwrap();
        cache.complete(tag, 1, Ok(vec![1, 2, 3]));

        let tag = cache.begin_load(1).unwrap();
        // Rows stay visible during the refresh
        assert_eq!(cache.rows(), &[1, 2, 3]);
        cache.complete(tag, 1, Ok(vec![4]));
        assert_eq!(cache.rows(), &[4]);
    }

    #[test]
    fn test_failed_first_load_back_to_empty() {
        let mut cache: ResourceCache<i64> = ResourceCache::new();
        let tag = cache.begin_load(1).unwrap();
        let outcome = cache.complete(tag, 1, Err("connection refused".into()));
        assert_eq!(outcome, Completion::Failed("connection refused".into()));
        assert_eq!(*cache.state(), CacheState::Empty);
        assert!(cache.rows().is_empty());
    }

    #[test]
    fn test_failed_refresh_keeps_last_good() {
        let mut cache: ResourceCache<i64> = ResourceCache::new();
        let tag = cache.begin_load(1).unwrap();
        cache.complete(tag, 1, Ok(vec![7]));

        let tag = cache.begin_load(1).unwrap();
        let outcome = cache.complete(tag, 1, Err("timeout".into()));
        assert_eq!(outcome, Completion::Failed("timeout".into()));
        assert_eq!(cache.rows(), &[7]);
        assert!(matches!(cache.state(), CacheState::Stale { error, .. } if error == "timeout"));
    }

    #[test]
    fn test_epoch_mismatch_is_discarded() {
        // The user logged out (epoch bumped) while the fetch was in flight:
        // the late response must not populate the cache the next identity
        // will observe.
        let mut cache: ResourceCache<i64> = ResourceCache::new();
        let tag = cache.begin_load(1).unwrap();
        cache.invalidate(); // logout

        let outcome = cache.complete(tag, 2, Ok(vec![99]));
        assert_eq!(outcome, Completion::Discarded);
        assert_eq!(*cache.state(), CacheState::Empty);
        assert!(cache.rows().is_empty());
    }

    #[test]
    fn test_invalidate_clears_rows_and_in_flight() {
        let mut cache: ResourceCache<i64> = ResourceCache::new();
        let tag = cache.begin_load(1).unwrap();
        cache.complete(tag, 1, Ok(vec![1]));

        cache.invalidate();
        assert_eq!(*cache.state(), CacheState::Empty);
        assert!(!cache.is_loading());

        // A completion for a load begun before invalidate is dropped even
        // if the epoch happens to match (the in-flight slot was cleared).
        let stale = FetchTag { epoch: 1, seq: 1 };
        assert_eq!(cache.complete(stale, 1, Ok(vec![2])), Completion::Discarded);
        assert!(cache.rows().is_empty());
    }

    #[test]
    fn test_server_truth_wins_over_local_guess() {
        // After a successful status update the workflow re-reads tasks; the
        // cache must reflect whatever the server answered, not any
        // client-side guess that preceded it.
        let mut cache: ResourceCache<&'static str> = ResourceCache::new();
        let tag = cache.begin_load(1).unwrap();
        cache.complete(tag, 1, Ok(vec!["id=7 In Progress"]));

        let tag = cache.begin_load(1).unwrap();
        cache.complete(tag, 1, Ok(vec!["id=7 Done"]));
        assert_eq!(cache.rows(), &["id=7 Done"]);
    }
}
