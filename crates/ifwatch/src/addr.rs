//! Address codec shared by both decoders.
//!
//! Kernel records carry IPv4 addresses as four raw octets and IPv6 addresses
//! as sixteen bytes holding eight big-endian groups. [`Address`] always holds
//! host-order values, so comparing or printing one never depends on how the
//! wire laid it out.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Size of an IPv4 address on the wire.
pub const IPV4_LEN: usize = 4;

/// Size of an IPv6 address on the wire.
pub const IPV6_LEN: usize = 16;

/// A normalized interface address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// IPv4 octets, most significant first.
    V4([u8; 4]),
    /// IPv6 groups in host byte order.
    V6([u16; 8]),
}

impl Address {
    /// Decode the first four bytes as an IPv4 address.
    pub fn from_ipv4_bytes(data: &[u8]) -> Option<Self> {
        let octets: [u8; IPV4_LEN] = data.get(..IPV4_LEN)?.try_into().ok()?;
        Some(Self::V4(octets))
    }

    /// Decode the first sixteen bytes as eight big-endian IPv6 groups.
    pub fn from_ipv6_bytes(data: &[u8]) -> Option<Self> {
        let bytes = data.get(..IPV6_LEN)?;
        let mut groups = [0u16; 8];
        for (group, pair) in groups.iter_mut().zip(bytes.chunks_exact(2)) {
            *group = u16::from_be_bytes([pair[0], pair[1]]);
        }
        Some(Self::V6(groups))
    }

    /// Encode back to wire bytes (network order).
    pub fn octets(&self) -> Vec<u8> {
        match self {
            Self::V4(octets) => octets.to_vec(),
            Self::V6(groups) => groups.iter().flat_map(|g| g.to_be_bytes()).collect(),
        }
    }

    /// Check if this is an IPv4 address.
    pub fn is_ipv4(&self) -> bool {
        matches!(self, Self::V4(_))
    }

    /// Check if this is an IPv6 address.
    pub fn is_ipv6(&self) -> bool {
        matches!(self, Self::V6(_))
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> Self {
        match addr {
            Address::V4(o) => IpAddr::V4(Ipv4Addr::from(o)),
            Address::V6(g) => IpAddr::V6(Ipv6Addr::new(
                g[0], g[1], g[2], g[3], g[4], g[5], g[6], g[7],
            )),
        }
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Self::V4(v4.octets()),
            IpAddr::V6(v6) => Self::V6(v6.segments()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        IpAddr::from(*self).fmt(f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
