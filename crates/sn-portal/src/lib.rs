//! `sn-portal` — portals and what they allow.
//!
//! A [`Portal`] is an identity (id, cell, owning structure) plus a list of
//! independent [`PortalModule`]s.  Each module answers the capability
//! questions for its own concern (access flags, charge-up delay, power);
//! the portal combines them: access is the AND of every module's answer,
//! readiness wait is the MAX of every module's wait.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`module`]  | `PortalModule` trait, `PortalRole`, `PlanTicket`          |
//! | [`modules`] | `AccessFlags`, `DelayedOpen`, `PowerGate`                 |
//! | [`portal`]  | `Portal` aggregate                                        |
//! | [`set`]     | `PortalSet` (live registry, deterministic order)          |
//! | [`error`]   | `PortalError`, `PortalResult<T>`                          |

pub mod error;
pub mod module;
pub mod modules;
pub mod portal;
pub mod set;


pub use error::{PortalError, PortalResult};
pub use module::{PlanTicket, PortalModule, PortalRole};
pub use modules::{AccessFlags, DelayedOpen, DoorPhase, PowerGate};
pub use portal::Portal;
pub use set::PortalSet;
