//! Darwin network kernel event structures and constants.

use winnow::prelude::*;
use winnow::token::take;

use crate::addr::{Address, IPV4_LEN, IPV6_LEN};
use crate::ifname::IFNAMSIZ;
use crate::parse::{FromWire, PResult, cut, parse_string_from_bytes, parse_u32_ne, skip};

/// Apple's vendor code.
pub const KEV_VENDOR_APPLE: u32 = 1;

/// Network event class.
pub const KEV_NETWORK_CLASS: u32 = 1;

/// Network event subclasses.
pub const KEV_INET_SUBCLASS: u32 = 1;
pub const KEV_DL_SUBCLASS: u32 = 2;
pub const KEV_INET6_SUBCLASS: u32 = 6;

/// Data link event codes (KEV_DL_*).
pub mod dl {
    pub const SIFMTU: u32 = 3;
    pub const LINK_OFF: u32 = 12;
    pub const LINK_ON: u32 = 13;
}

/// IPv4 event codes (KEV_INET_*).
pub mod inet {
    pub const NEW_ADDR: u32 = 1;
    pub const CHANGED_ADDR: u32 = 2;
    pub const ADDR_DELETED: u32 = 3;
}

/// IPv6 event codes (KEV_INET6_*).
pub mod inet6 {
    pub const NEW_USER_ADDR: u32 = 1;
    pub const CHANGED_ADDR: u32 = 2;
    pub const ADDR_DELETED: u32 = 3;
    pub const NEW_LL_ADDR: u32 = 4;
}

/// Interface identity carried by network events (struct net_event_data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetEventData {
    /// Interface family (IFNET_FAMILY_*).
    pub if_family: u32,
    /// Unit number, e.g. the 0 of "en0".
    pub if_unit: u32,
    /// Base name, e.g. the "en" of "en0".
    pub if_name: String,
}

impl NetEventData {
    /// Full interface name: base name followed by unit.
    pub fn ifname(&self) -> String {
        format!("{}{}", self.if_name, self.if_unit)
    }
}

impl FromWire for NetEventData {
    const SIZE: usize = 8 + IFNAMSIZ;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let if_family = parse_u32_ne(input)?;
        let if_unit = parse_u32_ne(input)?;
        let name: &[u8] = take(IFNAMSIZ).parse_next(input)?;
        Ok(Self {
            if_family,
            if_unit,
            if_name: parse_string_from_bytes(name),
        })
    }
}

/// IPv4 address event payload (leading part of struct kev_in_data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KevInData {
    /// The address the event is about (`ia_addr`).
    pub addr: Address,
    /// The interface.
    pub link_data: NetEventData,
}

/// Bytes between `ia_addr` and `link_data`: net, netmask, subnet,
/// subnetmask, netbroadcast, dstaddr.
const KEV_IN_DATA_GAP: usize = 24;

impl FromWire for KevInData {
    const SIZE: usize = IPV4_LEN + KEV_IN_DATA_GAP + NetEventData::SIZE;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let raw: &[u8] = take(IPV4_LEN).parse_next(input)?;
        let addr = Address::from_ipv4_bytes(raw).ok_or_else(cut)?;
        skip(input, KEV_IN_DATA_GAP)?;
        let link_data = NetEventData::parse(input)?;
        Ok(Self { addr, link_data })
    }
}

/// IPv6 address event payload (leading part of struct kev_in6_data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KevIn6Data {
    /// The interface.
    pub link_data: NetEventData,
    /// `ia_addr.sin6_addr`, in host-order groups.
    pub addr: Address,
}

/// sin6_len, sin6_family, sin6_port, sin6_flowinfo.
const SOCKADDR_IN6_ADDR_OFFSET: usize = 8;

impl FromWire for KevIn6Data {
    const SIZE: usize = NetEventData::SIZE + SOCKADDR_IN6_ADDR_OFFSET + IPV6_LEN;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let link_data = NetEventData::parse(input)?;
        skip(input, SOCKADDR_IN6_ADDR_OFFSET)?;
        let raw: &[u8] = take(IPV6_LEN).parse_next(input)?;
        let addr = Address::from_ipv6_bytes(raw).ok_or_else(cut)?;
        Ok(Self { link_data, addr })
    }
}
