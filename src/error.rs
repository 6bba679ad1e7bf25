use thiserror::Error;

use crate::{Cost, RouterId};

/// Why a link was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkFault {
    #[error("cost must be at least 1")]
    NonPositiveCost,

    #[error("a router cannot be linked to itself")]
    SelfLoop,

    #[error("link already carries cost {existing}, refusing cost {requested}")]
    ConflictingCost { existing: Cost, requested: Cost },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvergenceError {
    #[error("unknown router: {0}")]
    UnknownNode(RouterId),

    #[error("invalid link {from} <-> {to}: {reason}")]
    InvalidLink {
        from: RouterId,
        to: RouterId,
        reason: LinkFault,
    },

    #[error("route computation worker failed: {0}")]
    WorkerFailed(String),
}

impl ConvergenceError {
    pub(crate) fn invalid_link(from: &str, to: &str, reason: LinkFault) -> Self {
        ConvergenceError::InvalidLink {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvergenceError>;
