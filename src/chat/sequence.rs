use std::cell::Cell;

/// Monotonic request counter for one timer.
///
/// Every fetch takes a ticket from [`issue`](Self::issue). A response is
/// applied through [`accept`](Self::accept) only if its ticket is newer
/// than the last one applied, so overlapping requests resolve
/// last-write-wins by *issue* order rather than by completion order.
/// Responses slower than the timer period still land as long as nothing
/// newer has been applied in the meantime.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: Cell<u64>,
    applied: Cell<u64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        let next = self.latest.get().wrapping_add(1);
        self.latest.set(next);
        next
    }

    /// Strict check: `seq` is the newest ticket handed out.
    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest.get() == seq
    }

    /// Record `seq` as applied if nothing newer was. Returns `false` for a
    /// response that must be discarded.
    pub fn accept(&self, seq: u64) -> bool {
        if seq > self.applied.get() && seq <= self.latest.get() {
            self.applied.set(seq);
            true
        } else {
            false
        }
    }

    pub fn latest(&self) -> u64 {
        self.latest.get()
    }

    pub fn last_applied(&self) -> u64 {
        self.applied.get()
    }

    /// Retire every ticket handed out so far.
    pub fn invalidate(&self) {
        let retired = self.issue();
        self.applied.set(retired);
    }
}
