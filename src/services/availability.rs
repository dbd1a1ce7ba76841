//! Availability window check.
//!
//! A driver is available for a requested time when none of its existing deliveries fall
//! inside the window around that time. How "inside" is measured is the [`WindowPolicy`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Delivery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Conflict when `|requested - existing| < window`.
    #[default]
    Symmetric,
    /// Conflict when `requested - existing < window`. Any delivery scheduled after the
    /// requested time is a conflict regardless of how far away it is.
    Signed,
}

impl WindowPolicy {
    pub fn conflicts(
        self,
        requested: DateTime<Utc>,
        existing: DateTime<Utc>,
        window: Duration,
    ) -> bool {
        let diff_ms = (requested - existing).num_milliseconds();
        let window_ms = window.as_millis();
        match self {
            WindowPolicy::Symmetric => u128::from(diff_ms.unsigned_abs()) < window_ms,
            WindowPolicy::Signed => i128::from(diff_ms) < window_ms as i128,
        }
    }

    pub fn is_available(
        self,
        requested: DateTime<Utc>,
        deliveries: &[Delivery],
        window: Duration,
    ) -> bool {
        deliveries
            .iter()
            .all(|d| !self.conflicts(requested, d.delivery_time, window))
    }
}
