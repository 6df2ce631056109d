//! # Production State Machine
//!
//! Legal transition graph for the production lifecycle and the single
//! mutation point for a production's status. Callers never assign
//! `status` directly; everything goes through [`transition`].

use chrono::Utc;

use super::states::ProductionStatus;
use crate::error::TransitionError;
use crate::models::Production;

/// Check whether `from -> to` is a legal transition.
///
/// The graph is directed with no back-edges; terminal states have no
/// outgoing edges.
pub fn can_transition(from: ProductionStatus, to: ProductionStatus) -> bool {
    use ProductionStatus::*;
    match from {
        Pending => matches!(to, PendingPayment | New | Preparing | Cancelled),
        PendingPayment => matches!(to, InProgress | Cancelled),
        New => matches!(to, Preparing | Cancelled),
        Preparing => matches!(to, InProgress | Error | Cancelled),
        InProgress => matches!(to, Done | Error | Cancelled),
        Done | Error | Cancelled => false,
    }
}

/// Apply a status transition to a production.
///
/// On an illegal transition the production is left unmodified and a
/// [`TransitionError`] is returned; that error is fatal for the caller's
/// current operation (it indicates a logic or ordering bug upstream, not
/// a transient fault). On a legal transition into a terminal state,
/// `finished_at` is stamped if it has not been set before. The caller is
/// responsible for persisting the result.
pub fn transition(production: &mut Production, to: ProductionStatus) -> Result<(), TransitionError> {
    let from = production.status;
    if !can_transition(from, to) {
        return Err(TransitionError { from, to });
    }

    production.status = to;
    if to.is_terminal() && production.finished_at.is_none() {
        production.finished_at = Some(Utc::now());
    }
    Ok(())
}
