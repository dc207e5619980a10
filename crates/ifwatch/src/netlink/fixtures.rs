//! Netlink record fixtures for testing.
//!
//! Builders produce records exactly as the kernel lays them out, so decoder
//! tests run without a netlink socket.

use super::message::{NLMSG_HDRLEN, NlMsgType};
use super::types::{AF_INET, AF_INET6, ifa};
use crate::parse::align4;

/// 2001:db8::1 in wire order.
pub const DOC_V6: [u8; 16] = [
    0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// Wrap `payload` in a netlink header and pad it to the next record boundary.
pub fn record(msg_type: u16, payload: &[u8]) -> Vec<u8> {
    let len = NLMSG_HDRLEN + payload.len();
    let mut buf = Vec::with_capacity(align4(len));
    buf.extend(&(len as u32).to_ne_bytes());
    buf.extend(&msg_type.to_ne_bytes());
    buf.extend(&0u16.to_ne_bytes()); // flags
    buf.extend(&0u32.to_ne_bytes()); // seq
    buf.extend(&0u32.to_ne_bytes()); // pid
    buf.extend(payload);
    buf.resize(align4(len), 0);
    buf
}

/// Encode one rtattr, padded.
pub fn attr(attr_type: u16, data: &[u8]) -> Vec<u8> {
    let len = 4 + data.len();
    let mut buf = Vec::with_capacity(align4(len));
    buf.extend(&(len as u16).to_ne_bytes());
    buf.extend(&attr_type.to_ne_bytes());
    buf.extend(data);
    buf.resize(align4(len), 0);
    buf
}

/// Encode an ifaddrmsg header.
pub fn ifaddrmsg(family: u8, flags: u8, index: u32) -> Vec<u8> {
    let prefixlen = if family == AF_INET6 { 64 } else { 24 };
    let mut buf = vec![family, prefixlen, flags, 0];
    buf.extend(&index.to_ne_bytes());
    buf
}

/// Encode an ifinfomsg header.
pub fn ifinfomsg(index: i32, flags: u32, change: u32) -> Vec<u8> {
    let mut buf = vec![0u8, 0];
    buf.extend(&1u16.to_ne_bytes()); // ARPHRD_ETHER
    buf.extend(&index.to_ne_bytes());
    buf.extend(&flags.to_ne_bytes());
    buf.extend(&change.to_ne_bytes());
    buf
}

/// RTM_NEWADDR for an IPv4 address, optionally labelled.
pub fn new_addr_v4(index: u32, octets: [u8; 4], label: Option<&str>) -> Vec<u8> {
    let mut payload = ifaddrmsg(AF_INET, 0x80, index);
    payload.extend(attr(ifa::ADDRESS, &octets));
    payload.extend(attr(ifa::LOCAL, &octets));
    if let Some(label) = label {
        let mut name = label.as_bytes().to_vec();
        name.push(0);
        payload.extend(attr(ifa::LABEL, &name));
    }
    record(NlMsgType::RTM_NEWADDR, &payload)
}

/// Address record for an IPv6 address.
pub fn addr_v6(msg_type: u16, index: u32, flags: u8, addr: &[u8; 16]) -> Vec<u8> {
    let mut payload = ifaddrmsg(AF_INET6, flags, index);
    payload.extend(attr(ifa::ADDRESS, addr));
    record(msg_type, &payload)
}

/// Link record with the given state and change masks.
pub fn link(msg_type: u16, index: i32, flags: u32, change: u32) -> Vec<u8> {
    record(msg_type, &ifinfomsg(index, flags, change))
}

/// Address payload for IPv4 loopback address 127.0.0.1/8.
/// Captured from: ip monitor address
pub fn addr_loopback_v4() -> Vec<u8> {
    vec![
        // ifaddrmsg: family=AF_INET, prefixlen=8, flags=0x80 (IFA_F_PERMANENT), scope=RT_SCOPE_HOST, index=1
        0x02, // family = AF_INET
        0x08, // prefixlen = 8
        0x80, // flags = IFA_F_PERMANENT
        0xfe, // scope = RT_SCOPE_HOST (254)
        0x01, 0x00, 0x00, 0x00, // index = 1
        // IFA_ADDRESS = 127.0.0.1
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0x7f, 0x00, 0x00, 0x01, // 127.0.0.1
        // IFA_LOCAL = 127.0.0.1
        0x08, 0x00, // len = 8
        0x02, 0x00, // type = IFA_LOCAL (2)
        0x7f, 0x00, 0x00, 0x01, // 127.0.0.1
        // IFA_LABEL = "lo"
        0x07, 0x00, // len = 7
        0x03, 0x00, // type = IFA_LABEL (3)
        b'l', b'o', 0x00, 0x00, // "lo\0" + padding
    ]
}
