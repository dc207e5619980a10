//! Normalized interface events.

use std::fmt;

use crate::addr::Address;

/// A platform-independent interface change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum InterfaceEvent {
    /// The interface is administratively up and has carrier.
    #[cfg_attr(feature = "serde", serde(rename = "link_up"))]
    LinkUp {
        /// Interface name.
        ifname: String,
    },
    /// The interface lost carrier or was brought down.
    #[cfg_attr(feature = "serde", serde(rename = "link_down"))]
    LinkDown {
        /// Interface name.
        ifname: String,
    },
    /// An address was assigned.
    #[cfg_attr(feature = "serde", serde(rename = "new_addr"))]
    AddressAdded {
        /// Interface name.
        ifname: String,
        /// The address.
        addr: Address,
    },
    /// An address was removed.
    #[cfg_attr(feature = "serde", serde(rename = "del_addr"))]
    AddressRemoved {
        /// Interface name.
        ifname: String,
        /// The address.
        addr: Address,
    },
}

impl InterfaceEvent {
    /// Returns the interface name this event refers to.
    pub fn ifname(&self) -> &str {
        match self {
            Self::LinkUp { ifname }
            | Self::LinkDown { ifname }
            | Self::AddressAdded { ifname, .. }
            | Self::AddressRemoved { ifname, .. } => ifname,
        }
    }

    /// Returns the address for address events.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Self::AddressAdded { addr, .. } | Self::AddressRemoved { addr, .. } => Some(addr),
            Self::LinkUp { .. } | Self::LinkDown { .. } => None,
        }
    }

    /// Returns true for link state events.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::LinkUp { .. } | Self::LinkDown { .. })
    }

    /// Stable name of the event kind.
    ///
    /// Matches the `type` tag used when the event is serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LinkUp { .. } => "link_up",
            Self::LinkDown { .. } => "link_down",
            Self::AddressAdded { .. } => "new_addr",
            Self::AddressRemoved { .. } => "del_addr",
        }
    }
}

impl fmt::Display for InterfaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address() {
            Some(addr) => write!(f, "{} {} {}", self.kind(), self.ifname(), addr),
            None => write!(f, "{} {}", self.kind(), self.ifname()),
        }
    }
}
