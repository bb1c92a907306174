//! `PortalSet` — the live registry of portals.
//!
//! Portals are added and removed by their owning structure's spawn/despawn.
//! Plans hold `PortalId`s only and must re-resolve them through the set; a
//! missing id means the portal is gone.  Iteration is in ascending id order
//! so index rebuilds and searches are deterministic.

use std::collections::BTreeMap;

use tracing::warn;

use sn_core::{PortalId, Tick};

use crate::{Portal, PortalError, PortalResult};

#[derive(Debug, Default)]
pub struct PortalSet {
    inner: BTreeMap<PortalId, Portal>,
}

impl PortalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `portal`.  A second portal with the same id is refused and
    /// the registered one is kept.
    pub fn insert(&mut self, portal: Portal) -> PortalResult<()> {
        if self.inner.contains_key(&portal.id) {
            warn!(portal = %portal.id, "duplicate portal registration ignored");
            return Err(PortalError::Duplicate(portal.id));
        }
        self.inner.insert(portal.id, portal);
        Ok(())
    }

    pub fn remove(&mut self, id: PortalId) -> Option<Portal> {
        self.inner.remove(&id)
    }

    pub fn get(&self, id: PortalId) -> Option<&Portal> {
        self.inner.get(&id)
    }

    pub fn get_mut(&mut self, id: PortalId) -> Option<&mut Portal> {
        self.inner.get_mut(&id)
    }

    /// Both portals of a pair, mutably.
    pub fn pair_mut(&mut self, a: PortalId, b: PortalId) -> PortalResult<(&mut Portal, &mut Portal)> {
        if a == b {
            return Err(PortalError::SamePortal(a));
        }
        let mut pa = None;
        let mut pb = None;
        for (id, portal) in self.inner.iter_mut() {
            if *id == a {
                pa = Some(portal);
            } else if *id == b {
                pb = Some(portal);
            }
        }
        match (pa, pb) {
            (Some(pa), Some(pb)) => Ok((pa, pb)),
            (None, _) => Err(PortalError::Unknown(a)),
            (_, None) => Err(PortalError::Unknown(b)),
        }
    }

    pub fn contains(&self, id: PortalId) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Portal> + '_ {
        self.inner.values()
    }

    /// Advance every portal's module timers.
    pub fn tick(&mut self, now: Tick) {
        for portal in self.inner.values_mut() {
            portal.tick(now);
        }
    }
}
