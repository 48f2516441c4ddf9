//! Transient notifications.
//!
//! Controllers publish [`Notice`]s; the shell owns the receiving end and
//! shows them as snackbars, popups or terminal lines.

use places_core::notice::Notice;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    /// Creates a notifier and the receiver the shell drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Publishes a notice. A closed receiver means nobody is listening,
    /// which is not an error.
    pub fn notify(&self, notice: Notice) {
        if notice.is_error() {
            tracing::warn!("[Notifier] {}", notice.message);
        } else {
            tracing::info!("[Notifier] {}", notice.message);
        }
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::success(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notice::info(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }
}

/// Collects every notice currently queued without waiting.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
