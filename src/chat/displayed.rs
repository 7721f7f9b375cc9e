//! Client-side bookkeeping of which messages are on screen.
//!
//! The set is append-only: ids are never removed or reordered, and the
//! remembered read flag only ever flips from `false` to `true`.

use std::collections::{HashMap, HashSet};

use crate::models::ChatMessage;

/// What a reconciliation pass has to do to the DOM.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Messages to render and append, in server order.
    pub appended: Vec<ChatMessage>,
    /// Already displayed messages whose receipt marker must be switched on.
    pub newly_read: Vec<u32>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.appended.is_empty() && self.newly_read.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayedMessages {
    order: Vec<u32>,
    read: HashMap<u32, bool>,
}

impl DisplayedMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a message that is already in the DOM (server-rendered).
    /// Returns `false` when the id was known already.
    pub fn seed(&mut self, id: u32, is_read: bool) -> bool {
        if self.read.contains_key(&id) {
            return false;
        }
        self.order.push(id);
        self.read.insert(id, is_read);
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.read.contains_key(&id)
    }

    pub fn is_read(&self, id: u32) -> Option<bool> {
        self.read.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in display order.
    pub fn ids(&self) -> &[u32] {
        &self.order
    }

    /// Diff an authoritative fetch against what is displayed. Nothing is
    /// recorded here: the caller commits each entry once the DOM reflects
    /// it, so a failed write shows up again in the next plan. Messages
    /// missing from `fetched` are left alone, and a `true -> false` read
    /// flag is ignored.
    pub fn plan(&self, fetched: &[ChatMessage]) -> ReconcilePlan {
        let mut plan = ReconcilePlan::default();
        let mut planned = HashSet::new();

        for msg in fetched {
            if !planned.insert(msg.id) {
                continue;
            }
            match self.read.get(&msg.id).copied() {
                None => plan.appended.push(msg.clone()),
                Some(false) if msg.is_read => plan.newly_read.push(msg.id),
                Some(_) => {}
            }
        }

        plan
    }

    /// Record a row that is now in the container.
    pub fn commit_appended(&mut self, id: u32, is_read: bool) {
        self.seed(id, is_read);
    }

    /// Record a receipt marker that is now shown.
    pub fn commit_read(&mut self, id: u32) {
        if let Some(read) = self.read.get_mut(&id) {
            *read = true;
        }
    }

    /// Plan and commit in one go, for callers without a DOM to update.
    pub fn reconcile(&mut self, fetched: &[ChatMessage]) -> ReconcilePlan {
        let plan = self.plan(fetched);
        for msg in &plan.appended {
            self.commit_appended(msg.id, msg.is_read);
        }
        for id in &plan.newly_read {
            self.commit_read(*id);
        }
        plan
    }
}
