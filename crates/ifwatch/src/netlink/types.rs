//! Fixed-size rtnetlink payload structures and constants.

use crate::parse::{FromWire, PResult, parse_i32_ne, parse_u8, parse_u16_ne, parse_u32_ne};

/// Address families carried in `ifa_family`.
pub const AF_INET: u8 = 2;
pub const AF_INET6: u8 = 10;

/// Interface address message (struct ifaddrmsg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfAddrMsg {
    /// Address family (AF_INET, AF_INET6).
    pub ifa_family: u8,
    /// Prefix length.
    pub ifa_prefixlen: u8,
    /// Address flags (IFA_F_*), low 8 bits only.
    pub ifa_flags: u8,
    /// Address scope.
    pub ifa_scope: u8,
    /// Interface index.
    pub ifa_index: u32,
}

impl FromWire for IfAddrMsg {
    const SIZE: usize = 8;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            ifa_family: parse_u8(input)?,
            ifa_prefixlen: parse_u8(input)?,
            ifa_flags: parse_u8(input)?,
            ifa_scope: parse_u8(input)?,
            ifa_index: parse_u32_ne(input)?,
        })
    }
}

/// Interface info message (struct ifinfomsg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfInfoMsg {
    /// Address family (usually AF_UNSPEC).
    pub ifi_family: u8,
    /// Device type (ARPHRD_*).
    pub ifi_type: u16,
    /// Interface index.
    pub ifi_index: i32,
    /// Device flags (IFF_*).
    pub ifi_flags: u32,
    /// Change mask.
    pub ifi_change: u32,
}

impl FromWire for IfInfoMsg {
    const SIZE: usize = 16;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        let ifi_family = parse_u8(input)?;
        let _pad = parse_u8(input)?;
        Ok(Self {
            ifi_family,
            ifi_type: parse_u16_ne(input)?,
            ifi_index: parse_i32_ne(input)?,
            ifi_flags: parse_u32_ne(input)?,
            ifi_change: parse_u32_ne(input)?,
        })
    }
}

/// Interface address attributes (IFA_*).
pub mod ifa {
    pub const ADDRESS: u16 = 1;
    pub const LOCAL: u16 = 2;
    pub const LABEL: u16 = 3;
    pub const FLAGS: u16 = 8;
}

/// Address flags (IFA_F_*).
pub mod ifa_flags {
    pub const TENTATIVE: u32 = 0x40;
}

/// Link attributes (IFLA_*).
pub mod ifla {
    pub const IFNAME: u16 = 3;
}

/// Interface flags (IFF_*).
pub mod iff {
    pub const UP: u32 = 0x1;
    pub const RUNNING: u32 = 0x40;
}

/// `ifi_change` value the kernel uses when replaying full link state.
pub const IFI_CHANGE_ALL: u32 = 0xFFFF_FFFF;
