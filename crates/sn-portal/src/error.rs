use sn_core::PortalId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("portal {0} is already registered")]
    Duplicate(PortalId),

    #[error("portal {0} is not registered")]
    Unknown(PortalId),

    #[error("portal {0} cannot be paired with itself")]
    SamePortal(PortalId),
}

pub type PortalResult<T> = Result<T, PortalError>;
