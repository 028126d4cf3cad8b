use std::time::{Duration, Instant};

/// Most notifications kept at once; older ones are dropped first.
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

/// Stack of active notifications, newest last.
#[derive(Debug)]
pub struct ToastState {
    items: Vec<Toast>,
    lifetime: Option<Duration>,
}

impl ToastState {
    /// `lifetime` of `None` keeps toasts until they are dismissed.
    pub fn new(lifetime: Option<Duration>) -> Self {
        Self {
            items: Vec::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        if self.items.len() == MAX_TOASTS {
            self.items.remove(0);
        }
        self.items.push(Toast {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    /// Dismisses the newest toast. Returns false if there was none.
    pub fn dismiss_latest(&mut self) -> bool {
        self.items.pop().is_some()
    }

    /// Drops toasts older than the configured lifetime.
    pub fn expire(&mut self, now: Instant) {
        if let Some(lifetime) = self.lifetime {
            self.items
                .retain(|toast| now.saturating_duration_since(toast.shown_at) < lifetime);
        }
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_removes_newest_first() {
        let mut toasts = ToastState::new(None);
        toasts.error("first");
        toasts.error("second");

        assert!(toasts.dismiss_latest());
        assert_eq!(toasts.latest().map(|t| t.message.as_str()), Some("first"));
        assert!(toasts.dismiss_latest());
        assert!(!toasts.dismiss_latest());
    }

    #[test]
    fn test_expire_respects_lifetime() {
        let mut toasts = ToastState::new(Some(Duration::from_secs(5)));
        toasts.info("saved");
        let shown_at = toasts.items()[0].shown_at;

        toasts.expire(shown_at + Duration::from_secs(4));
        assert!(!toasts.is_empty());
        toasts.expire(shown_at + Duration::from_secs(5));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_without_lifetime_toasts_stay() {
        let mut toasts = ToastState::new(None);
        toasts.error("sticky");
        let shown_at = toasts.items()[0].shown_at;

        toasts.expire(shown_at + Duration::from_secs(3600));
        assert_eq!(toasts.items().len(), 1);
    }

    #[test]
    fn test_stack_is_bounded() {
        let mut toasts = ToastState::new(None);
        for i in 0..5 {
            toasts.error(format!("toast {i}"));
        }
        let messages: Vec<_> = toasts.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["toast 2", "toast 3", "toast 4"]);
    }
}
