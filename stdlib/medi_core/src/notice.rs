//! Transient notices ("toasts") raised by the panels.
//!
//! A notice only answers whether it should still be on screen. Whatever
//! state it refers to (an undo buffer, a failed request) lives elsewhere
//! and is not affected by the notice hiding itself.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    severity: Severity,
    message: String,
    action: Option<String>,
    raised_at: Instant,
    auto_hide: Option<Duration>,
    dismissed: bool,
}

impl Notice {
    fn raise(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            action: None,
            raised_at: Instant::now(),
            auto_hide: None,
            dismissed: false,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::raise(Severity::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::raise(Severity::Error, message)
    }

    /// Attaches an action label, e.g. `UNDO`.
    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.action = Some(label.into());
        self
    }

    /// Hides the notice once `after` has elapsed since it was raised.
    pub fn with_auto_hide(mut self, after: Duration) -> Self {
        self.auto_hide = Some(after);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn raised_at(&self) -> Instant {
        self.raised_at
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        if self.dismissed {
            return false;
        }
        match self.auto_hide {
            Some(ttl) => now.saturating_duration_since(self.raised_at) < ttl,
            None => true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Some(action) => write!(f, "{} [{action}]", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_hide_window_is_half_open() {
        let notice = Notice::info("Relative removed").with_auto_hide(Duration::from_secs(5));
        let t0 = notice.raised_at();
        assert!(notice.is_visible_at(t0));
        assert!(notice.is_visible_at(t0 + Duration::from_millis(4_999)));
        assert!(!notice.is_visible_at(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn dismissed_notice_is_hidden_immediately() {
        let mut notice = Notice::error("Network error");
        assert!(notice.is_visible());
        notice.dismiss();
        assert!(notice.is_dismissed());
        assert!(!notice.is_visible());
    }

    #[test]
    fn display_includes_action_label() {
        let notice = Notice::info("Relative removed").with_action("UNDO");
        assert_eq!(notice.to_string(), "Relative removed [UNDO]");
        assert_eq!(notice.severity(), Severity::Info);
    }
}
