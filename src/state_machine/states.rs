use serde::{Deserialize, Serialize};
use std::fmt;

/// Production lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStatus {
    /// Initial state when a production is created
    Pending,
    /// Production is waiting on an outstanding payment
    PendingPayment,
    /// Freshly registered production, not yet picked up by the kitchen
    New,
    /// Production is being prepared
    Preparing,
    /// Production is actively being worked
    InProgress,
    /// Production finished successfully
    Done,
    /// Production failed
    Error,
    /// Production was cancelled
    Cancelled,
}

impl ProductionStatus {
    /// Every status, in declaration order
    pub const ALL: [ProductionStatus; 8] = [
        Self::Pending,
        Self::PendingPayment,
        Self::New,
        Self::Preparing,
        Self::InProgress,
        Self::Done,
        Self::Error,
        Self::Cancelled,
    ];

    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error | Self::Cancelled)
    }

    /// Check if this is an active state (production is being worked)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Preparing | Self::InProgress)
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::PendingPayment => write!(f, "PENDING_PAYMENT"),
            Self::New => write!(f, "NEW"),
            Self::Preparing => write!(f, "PREPARING"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Done => write!(f, "DONE"),
            Self::Error => write!(f, "ERROR"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for ProductionStatus {
    type Err = String;

    /// Case-insensitive: upstream services have been observed sending
    /// both `"done"` and `"DONE"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PENDING_PAYMENT" => Ok(Self::PendingPayment),
            "NEW" => Ok(Self::New),
            "PREPARING" => Ok(Self::Preparing),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            "ERROR" => Ok(Self::Error),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid production status: {s}")),
        }
    }
}

/// Default state for new productions
impl Default for ProductionStatus {
    fn default() -> Self {
        Self::Pending
    }
}
