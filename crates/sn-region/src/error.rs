//! Region-map error type.

use thiserror::Error;

use sn_core::RegionId;

/// Errors produced by `sn-region`.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("region {0} not found in map")]
    UnknownRegion(RegionId),

    #[error("region {0} extends outside the map bounds")]
    OutOfBounds(RegionId),

    #[error("regions {a} and {b} overlap")]
    Overlap { a: RegionId, b: RegionId },

    #[error("region {0} is linked to itself")]
    SelfLink(RegionId),

    #[error("region {0} is not a doorway")]
    NotADoorway(RegionId),
}

pub type RegionResult<T> = Result<T, RegionError>;
