use tokio::time::Instant;
use uuid::Uuid;

/// An auto-reply waiting for its delivery time
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReply {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub due: Instant,
    seq: u64,
}

/// Outstanding auto-replies, owned by the store.
///
/// Nothing here sleeps: the owner asks for the next due instant and hands in
/// the current time, which keeps delivery deterministic under a paused clock.
#[derive(Debug, Default)]
pub struct ReplyScheduler {
    pending: Vec<PendingReply>,
    next_seq: u64,
}

impl ReplyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, conversation_id: Uuid, sender_id: Uuid, content: String, due: Instant) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingReply {
            conversation_id,
            sender_id,
            content,
            due,
            seq,
        });
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|r| r.due).min()
    }

    /// Remove and return every reply due at or before `now`, earliest first.
    /// Replies due at the same instant keep scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingReply> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|r| r.due <= now);
        self.pending = rest;
        due.sort_by_key(|r| (r.due, r.seq));
        due
    }

    /// Drop everything outstanding; returns how many replies were cancelled
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> &[PendingReply] {
        &self.pending
    }
}
