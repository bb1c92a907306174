//! Identifier newtypes.
//!
//! Agents, regions, portals and things are all owned by the host; the engine
//! only holds their ids, re-resolving them every time it needs the object.
//! Ids print as `#n` so messages read "portal #7 removed".

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// The id as a dense `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

typed_id! {
    /// A mobile agent known to the host world.
    AgentId
}

typed_id! {
    /// A node of the host's region graph (a contiguous walkable area).
    RegionId
}

typed_id! {
    /// A registered portal endpoint.
    PortalId
}

typed_id! {
    /// A host-world object that travel can target (a building, an item).
    ThingId
}
