//! Alert actions.

use super::Dashboard;
use crate::error::{Result, Success};
use crate::model::{Alert, AlertFilter, NewAlert};
use crate::views;
use tracing::info;

impl Dashboard<'_> {
    /// List the caller's alerts matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_alerts(&self, filter: AlertFilter) -> Result<Vec<Alert>> {
        let user_id = self.require_user()?;
        self.storage.list_alerts(&user_id, filter)
    }

    /// Number of the caller's alerts not yet read.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_unread_alert_count(&self) -> Result<u32> {
        let user_id = self.require_user()?;
        self.storage.count_unread_alerts(&user_id)
    }

    /// Create an unread alert.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn create_alert(&mut self, input: NewAlert) -> Result<Alert> {
        let user_id = self.require_user()?;
        let alert = Alert::new(&user_id, input);

        self.storage.insert_alert(&alert)?;
        info!(id = %alert.id, kind = alert.kind.as_str(), "Created alert");

        self.invalidate(&[views::DASHBOARD, views::ALERTS]);
        Ok(alert)
    }

    /// Mark an alert read. Idempotent; unknown ids are not an error.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn mark_alert_as_read(&mut self, id: &str) -> Result<Success> {
        let user_id = self.require_user()?;
        let updated = self.storage.mark_alert_read(&user_id, id)?;
        info!(id, updated, "Marked alert read");

        self.invalidate(&[views::ALERTS]);
        Ok(Success::OK)
    }

    /// Mark every alert read. Idempotent.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn mark_all_alerts_as_read(&mut self) -> Result<Success> {
        let user_id = self.require_user()?;
        let updated = self.storage.mark_all_alerts_read(&user_id)?;
        info!(updated, "Marked all alerts read");

        self.invalidate(&[views::ALERTS]);
        Ok(Success::OK)
    }

    /// Delete an alert. Unknown ids are not an error.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn delete_alert(&mut self, id: &str) -> Result<Success> {
        let user_id = self.require_user()?;
        let deleted = self.storage.delete_alert(&user_id, id)?;
        info!(id, deleted, "Deleted alert");

        self.invalidate(&[views::ALERTS]);
        Ok(Success::OK)
    }
}
