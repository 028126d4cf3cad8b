//! Request identifiers for latest-only async results.
//!
//! `AppState` keeps one tracker per kind of in-flight work: availability
//! lookups and claim writes. The reducer calls `begin` when it emits the
//! effect and `finish_if_active` when the result comes back through the
//! inbox; any other outcome means the result is stale and is dropped.

/// Opaque request id for matching async results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Tracks the latest active request and ignores stale results.
///
/// Ids are never reused for the lifetime of the tracker, so a tracker that
/// outlives remounts of the state it guards still rejects results that were
/// issued before the remount.
#[derive(Debug, Default)]
pub struct LatestOnly {
    next: u64,
    active: Option<RequestId>,
}

impl LatestOnly {
    /// Start a new request and mark it as active.
    pub fn begin(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next = self.next.wrapping_add(1);
        self.active = Some(id);
        id
    }

    /// Cancel any active request.
    ///
    /// Called when the form is remounted or the candidate becomes too short;
    /// a lookup that already left the debounce window then lands as stale.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Returns true if the provided id is still the active request.
    pub fn is_active(&self, id: RequestId) -> bool {
        self.active == Some(id)
    }

    /// Returns true if any request is active.
    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Finish the request if it's still active.
    pub fn finish_if_active(&mut self, id: RequestId) -> bool {
        if self.is_active(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
