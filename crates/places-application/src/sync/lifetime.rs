use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Liveness of a mounted view.
///
/// Clones share the same state. Once [`ViewLifetime::unmount`] is called,
/// work scoped with [`ViewLifetime::run`] resolves to `None` and its results
/// never reach view state.
#[derive(Debug, Clone, Default)]
pub struct ViewLifetime {
    token: CancellationToken,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Marks the view as gone. Idempotent.
    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// Drives `work` while the view is mounted.
    ///
    /// Returns `None` when the view is unmounted first, or when it was
    /// unmounted by the time `work` finished.
    pub async fn run<F>(&self, work: F) -> Option<F::Output>
    where
        F: Future,
    {
        if !self.is_alive() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = work => self.is_alive().then_some(output),
        }
    }
}
