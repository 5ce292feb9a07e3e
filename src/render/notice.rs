use std::time::{Duration, Instant};

/// Longest time a notice stays on screen.
pub const MAX_NOTICE_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Short-lived feedback message, e.g. a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Holds notices until their display time runs out.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.min(MAX_NOTICE_TTL),
            next_id: 0,
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    pub fn push_at(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            message: message.into(),
            expires_at: now.checked_add(self.ttl).unwrap_or(now),
        });
        id
    }

    /// Drops expired notices and returns the ones still visible.
    pub fn active(&mut self, now: Instant) -> Vec<Notice> {
        self.notices.retain(|notice| notice.is_active(now));
        self.notices.clone()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
