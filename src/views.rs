//! View invalidation.
//!
//! After a successful mutation the affected dashboard pages are marked
//! stale so their next render re-fetches. Which pages a mutation touches is
//! fixed per action; the constants below are the whole set.

use std::sync::Mutex;
use tracing::debug;

pub const DASHBOARD: &str = "/dashboard";
pub const BUDGET: &str = "/dashboard/budget";
pub const GOALS: &str = "/dashboard/goals";
pub const ALERTS: &str = "/dashboard/alerts";
pub const SUBSCRIPTION: &str = "/dashboard/subscription";

/// Receives the stale page paths after each mutation.
pub trait ViewInvalidator {
    fn invalidate(&self, paths: &[&str]);
}

/// Invalidator for hosts without a render cache: logs and moves on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogInvalidator;

impl ViewInvalidator for LogInvalidator {
    fn invalidate(&self, paths: &[&str]) {
        for path in paths {
            debug!(path, "View invalidated");
        }
    }
}

/// Collects invalidated paths in order; used by tests and embedders that
/// flush a cache at the end of a request.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths invalidated so far, in call order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded paths.
    pub fn take(&self) -> Vec<String> {
        self.paths
            .lock()
            .map(|mut p| std::mem::take(&mut *p))
            .unwrap_or_default()
    }
}

impl ViewInvalidator for RecordingInvalidator {
    fn invalidate(&self, paths: &[&str]) {
        if let Ok(mut recorded) = self.paths.lock() {
            recorded.extend(paths.iter().map(ToString::to_string));
        }
    }
}
