//! Per-lead delivery state machine
//!
//! ```text
//! Pending ──crm──▶ CrmSent{success: true} ──notification──▶ Notified{success}
//!    │
//!    └────crm──▶ CrmSent{success: false}   (terminal, notification never attempted)
//! ```

use crate::app::models::{DeliveryChannel, DeliveryOutcome};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeadState {
    Pending,
    CrmSent { success: bool },
    Notified { success: bool },
}

impl LeadState {
    /// The step this state is waiting on, or `None` once terminal
    pub fn awaits(&self) -> Option<DeliveryChannel> {
        match self {
            LeadState::Pending => Some(DeliveryChannel::Crm),
            LeadState::CrmSent { success: true } => Some(DeliveryChannel::Notification),
            LeadState::CrmSent { success: false } | LeadState::Notified { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.awaits().is_none()
    }

    /// Next state after `outcome`; `None` if the outcome is for a step this state is not waiting on
    pub fn after(self, outcome: &DeliveryOutcome) -> Option<LeadState> {
        self.after_step(outcome.channel(), outcome.is_success())
    }

    /// Next state once the `channel` step finished with `success`
    pub fn after_step(self, channel: DeliveryChannel, success: bool) -> Option<LeadState> {
        if self.awaits() != Some(channel) {
            return None;
        }
        Some(match channel {
            DeliveryChannel::Crm => LeadState::CrmSent { success },
            DeliveryChannel::Notification => LeadState::Notified { success },
        })
    }

    /// Terminal state in which every step succeeded
    pub fn is_fully_delivered(&self) -> bool {
        matches!(self, LeadState::Notified { success: true })
    }
}

impl fmt::Display for LeadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadState::Pending => f.write_str("PENDING"),
            LeadState::CrmSent { success: true } => f.write_str("CRM_SENT(success)"),
            LeadState::CrmSent { success: false } => f.write_str("CRM_SENT(fail)"),
            LeadState::Notified { success: true } => f.write_str("NOTIFIED(success)"),
            LeadState::Notified { success: false } => f.write_str("NOTIFIED(fail)"),
        }
    }
}
