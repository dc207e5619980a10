//! Multicast group subscription for rtnetlink sockets.

use std::io;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::filter::parse_spec;

/// rtnetlink multicast groups relevant to interface monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RtnetlinkGroup {
    /// Link state (RTNLGRP_LINK).
    Link = 1,
    /// Neighbor table (RTNLGRP_NEIGH).
    Neigh = 3,
    /// IPv4 addresses (RTNLGRP_IPV4_IFADDR).
    Ipv4Addr = 5,
    /// IPv4 routes (RTNLGRP_IPV4_ROUTE).
    Ipv4Route = 7,
    /// IPv6 addresses (RTNLGRP_IPV6_IFADDR).
    Ipv6Addr = 9,
    /// IPv6 routes (RTNLGRP_IPV6_ROUTE).
    Ipv6Route = 11,
}

impl RtnetlinkGroup {
    /// Bit of this group in a `nl_groups` mask (RTMGRP_*).
    pub fn mask(self) -> u32 {
        1 << (self as u32 - 1)
    }
}

/// Group subscription applied when binding a netlink socket.
///
/// # Example
///
/// ```ignore
/// use ifwatch::netlink::GroupFilter;
///
/// let filter = GroupFilter::new().link().ipv4_addr().ipv6_addr();
/// ifwatch::configure_filter(fd, &filter)?;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupFilter {
    /// Multicast group bitmask (`nl_groups`).
    pub groups: u32,
    /// Port id to bind; `None` uses the process id.
    pub port: Option<u32>,
}

impl GroupFilter {
    /// Create an empty filter (no groups).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter from a raw group mask.
    pub fn with_mask(groups: u32) -> Self {
        Self { groups, port: None }
    }

    /// Create a filter subscribed to the given groups.
    pub fn from_groups(groups: &[RtnetlinkGroup]) -> Self {
        groups.iter().fold(Self::new(), |f, g| f.group(*g))
    }

    /// Subscribe to a group.
    pub fn group(mut self, group: RtnetlinkGroup) -> Self {
        self.groups |= group.mask();
        self
    }

    /// Subscribe to link events.
    pub fn link(self) -> Self {
        self.group(RtnetlinkGroup::Link)
    }

    /// Subscribe to IPv4 address events.
    pub fn ipv4_addr(self) -> Self {
        self.group(RtnetlinkGroup::Ipv4Addr)
    }

    /// Subscribe to IPv6 address events.
    pub fn ipv6_addr(self) -> Self {
        self.group(RtnetlinkGroup::Ipv6Addr)
    }

    /// Bind to an explicit port id instead of the process id (0 lets the
    /// kernel pick one).
    pub fn port(mut self, port: u32) -> Self {
        self.port = Some(port);
        self
    }

    /// Check if a group is selected.
    pub fn contains(&self, group: RtnetlinkGroup) -> bool {
        self.groups & group.mask() != 0
    }

    /// Bind `socket` with this subscription.
    pub fn apply<B: NetlinkBind + ?Sized>(&self, socket: &mut B) -> Result<()> {
        let pid = self.port.unwrap_or_else(std::process::id);
        socket
            .bind_groups(pid, self.groups)
            .map_err(Error::from_io)?;
        tracing::debug!(pid, groups = self.groups, "netlink filter bound");
        Ok(())
    }
}

impl FromStr for GroupFilter {
    type Err = Error;

    /// Parse `groups=<mask>`.
    fn from_str(s: &str) -> Result<Self> {
        let mut filter = Self::new();
        for entry in parse_spec(s)? {
            if let ("groups", Some(mask)) = (entry.key, entry.value) {
                filter.groups = mask;
            }
        }
        Ok(filter)
    }
}

/// The one kernel call a netlink filter needs.
pub trait NetlinkBind {
    /// Bind to `AF_NETLINK` with port id `pid` and multicast mask `groups`.
    fn bind_groups(&mut self, pid: u32, groups: u32) -> io::Result<()>;
}

#[cfg(target_os = "linux")]
impl NetlinkBind for netlink_sys::Socket {
    fn bind_groups(&mut self, pid: u32, groups: u32) -> io::Result<()> {
        self.bind(&netlink_sys::SocketAddr::new(pid, groups))
    }
}

/// Bind the caller's open netlink socket `fd` with `filter`.
///
/// The descriptor stays owned by the caller. Calls on the same descriptor
/// must not race each other.
#[cfg(target_os = "linux")]
pub fn configure_filter(fd: std::os::fd::RawFd, filter: &GroupFilter) -> Result<()> {
    use std::mem::ManuallyDrop;
    use std::os::fd::FromRawFd;

    if fd < 0 {
        return Err(Error::InvalidArgument(format!("invalid socket handle {}", fd)));
    }

    // SAFETY: fd is a non-negative descriptor the caller owns. ManuallyDrop
    // keeps the wrapper from closing it.
    let mut socket = ManuallyDrop::new(unsafe { netlink_sys::Socket::from_raw_fd(fd) });
    filter.apply(&mut *socket)
}
