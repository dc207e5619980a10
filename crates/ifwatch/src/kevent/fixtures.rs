//! Kernel event fixtures for testing.

use super::message::KEV_MSG_HEADER_SIZE;
use crate::ifname::IFNAMSIZ;

/// Build a complete kernel event message around `payload`.
pub fn message(vendor: u32, class: u32, subclass: u32, code: u32, payload: &[u8]) -> Vec<u8> {
    let total = (KEV_MSG_HEADER_SIZE + payload.len()) as u32;
    let mut buf = Vec::with_capacity(total as usize);
    for field in [total, vendor, class, subclass, 77, code] {
        buf.extend(&field.to_ne_bytes());
    }
    buf.extend(payload);
    buf
}

/// Encode a net_event_data.
pub fn net_event_data(name: &str, unit: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + IFNAMSIZ);
    buf.extend(&6u32.to_ne_bytes()); // IFNET_FAMILY_ETHERNET
    buf.extend(&unit.to_ne_bytes());
    let mut if_name = [0u8; IFNAMSIZ];
    if_name[..name.len()].copy_from_slice(name.as_bytes());
    buf.extend(&if_name);
    buf
}

/// Encode a full kev_in_data.
pub fn in_data(addr: [u8; 4], name: &str, unit: u32) -> Vec<u8> {
    let mut buf = addr.to_vec();
    buf.extend(&[0xffu8, 0xff, 0xff, 0x00]); // ia_net
    buf.extend(&[0xffu8, 0xff, 0xff, 0x00]); // ia_netmask
    buf.extend(&[0u8; 16]); // ia_subnet, ia_subnetmask, ia_netbroadcast, ia_dstaddr
    buf.extend(net_event_data(name, unit));
    buf
}

/// Encode a kev_in6_data, including the trailing fields the kernel sends.
pub fn in6_data(addr: &[u8; 16], name: &str, unit: u32) -> Vec<u8> {
    let mut buf = net_event_data(name, unit);
    buf.push(28); // sin6_len
    buf.push(30); // sin6_family = AF_INET6
    buf.extend(&[0u8; 2]); // sin6_port
    buf.extend(&[0u8; 4]); // sin6_flowinfo
    buf.extend(addr);
    buf.extend(&unit.to_ne_bytes()); // sin6_scope_id
    buf.extend(&[0u8; 56]); // ia_net, ia_dstaddr (truncated view)
    buf
}
