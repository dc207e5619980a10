//! rtnetlink notification decoder.

use tracing::{debug, trace};

use super::attr::AttrIter;
use super::message::{MessageIter, NetlinkRecord, NlMsgHdr, NlMsgType};
use super::types::{AF_INET, AF_INET6, IFI_CHANGE_ALL, IfAddrMsg, IfInfoMsg, ifa, ifa_flags, iff};
use crate::Decoder;
use crate::addr::Address;
use crate::error::Result;
use crate::event::InterfaceEvent;
use crate::ifname::{IndexResolver, SystemResolver};
use crate::parse::{FromWire, align4, parse_string_from_bytes};

/// Decodes rtnetlink link and address notifications.
///
/// Decoding never fails: records that are malformed, uninteresting, or whose
/// interface cannot be named are skipped, and events come out in the order
/// their records appear in the buffer.
///
/// # Example
///
/// ```ignore
/// use ifwatch::Decoder;
/// use ifwatch::netlink::NetlinkDecoder;
///
/// let decoder = NetlinkDecoder::new();
/// for event in decoder.decode(&datagram)? {
///     println!("{event}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetlinkDecoder<R = SystemResolver> {
    resolver: R,
}

impl NetlinkDecoder {
    /// Create a decoder that resolves names with `if_indextoname`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: IndexResolver> NetlinkDecoder<R> {
    /// Create a decoder with a custom index resolver.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Lazily decode the events in `buf`, in arrival order.
    pub fn events<'a>(&'a self, buf: &'a [u8]) -> impl Iterator<Item = InterfaceEvent> + 'a {
        MessageIter::new(buf).filter_map(move |record| self.decode_record(&record))
    }

    /// Decode a single framed record.
    pub fn decode_record(&self, record: &NetlinkRecord<'_>) -> Option<InterfaceEvent> {
        let header = &record.header;
        if header.is_addr() {
            self.decode_addr(header, record.payload)
        } else if header.is_link() {
            self.decode_link(header, record.payload)
        } else {
            trace!(msg_type = header.nlmsg_type, "ignoring netlink record");
            None
        }
    }

    fn decode_addr(&self, header: &NlMsgHdr, payload: &[u8]) -> Option<InterfaceEvent> {
        let msg = match IfAddrMsg::from_prefix(payload) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, "skipping short address record");
                return None;
            }
        };

        let mut label = None;
        let mut addr = None;
        let mut flags = None;

        let attrs = payload.get(align4(IfAddrMsg::SIZE)..).unwrap_or_default();
        for (kind, data) in AttrIter::new(attrs) {
            match kind {
                ifa::LABEL => {
                    let name = parse_string_from_bytes(data);
                    if !name.is_empty() {
                        label = Some(name);
                    }
                }
                ifa::LOCAL | ifa::ADDRESS => {
                    let parsed = match msg.ifa_family {
                        AF_INET => Address::from_ipv4_bytes(data),
                        AF_INET6 => Address::from_ipv6_bytes(data),
                        _ => None,
                    };
                    if parsed.is_some() {
                        addr = parsed;
                    }
                }
                ifa::FLAGS => {
                    if let [a, b, c, d, ..] = *data {
                        flags = Some(u32::from_ne_bytes([a, b, c, d]));
                    }
                }
                _ => {}
            }
        }

        let flags = flags.unwrap_or(msg.ifa_flags as u32);
        if msg.ifa_family == AF_INET6 && flags & ifa_flags::TENTATIVE != 0 {
            debug!(index = msg.ifa_index, "skipping tentative IPv6 address");
            return None;
        }

        let Some(addr) = addr else {
            debug!(
                index = msg.ifa_index,
                family = msg.ifa_family,
                "skipping address record without usable address"
            );
            return None;
        };

        let Some(ifname) = label.or_else(|| self.resolver.index_to_name(msg.ifa_index)) else {
            debug!(index = msg.ifa_index, "skipping address record for unknown interface");
            return None;
        };

        Some(if header.nlmsg_type == NlMsgType::RTM_NEWADDR {
            InterfaceEvent::AddressAdded { ifname, addr }
        } else {
            InterfaceEvent::AddressRemoved { ifname, addr }
        })
    }

    fn decode_link(&self, header: &NlMsgHdr, payload: &[u8]) -> Option<InterfaceEvent> {
        let msg = match IfInfoMsg::from_prefix(payload) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, "skipping short link record");
                return None;
            }
        };

        if msg.ifi_change == 0 || msg.ifi_change == IFI_CHANGE_ALL {
            trace!(
                index = msg.ifi_index,
                change = msg.ifi_change,
                "skipping link record without a state transition"
            );
            return None;
        }

        if msg.ifi_change & (iff::UP | iff::RUNNING) == 0 {
            trace!(
                index = msg.ifi_index,
                change = msg.ifi_change,
                "skipping link record for unrelated flags"
            );
            return None;
        }

        let Some(ifname) = self.link_name(&msg) else {
            debug!(index = msg.ifi_index, "skipping link record for unknown interface");
            return None;
        };

        let up = msg.ifi_flags & iff::UP != 0 && msg.ifi_flags & iff::RUNNING != 0;
        debug!(
            msg_type = header.nlmsg_type,
            ifname = %ifname,
            up,
            "link transition"
        );
        Some(if up {
            InterfaceEvent::LinkUp { ifname }
        } else {
            InterfaceEvent::LinkDown { ifname }
        })
    }

    fn link_name(&self, msg: &IfInfoMsg) -> Option<String> {
        let index = u32::try_from(msg.ifi_index).ok()?;
        self.resolver.index_to_name(index)
    }
}

impl<R: IndexResolver> Decoder for NetlinkDecoder<R> {
    fn decode(&self, buf: &[u8]) -> Result<Vec<InterfaceEvent>> {
        Ok(self.events(buf).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::netlink::fixtures::*;
    use crate::netlink::types::ifla;

    fn decoder() -> NetlinkDecoder<HashMap<u32, String>> {
        NetlinkDecoder::with_resolver(HashMap::from([
            (2, "eth0".to_string()),
            (3, "wlan0".to_string()),
        ]))
    }

    #[test]
    fn test_ipv4_address_added() {
        let buf = new_addr_v4(2, [192, 168, 1, 10], None);
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(
            events,
            vec![InterfaceEvent::AddressAdded {
                ifname: "eth0".into(),
                addr: Address::V4([192, 168, 1, 10]),
            }]
        );
    }

    #[test]
    fn test_label_overrides_index_name() {
        let buf = new_addr_v4(2, [10, 0, 0, 5], Some("eth0:1"));
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(events[0].ifname(), "eth0:1");
    }

    #[test]
    fn test_label_without_resolvable_index() {
        let buf = new_addr_v4(42, [10, 0, 0, 5], Some("tun7"));
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(events[0].ifname(), "tun7");
    }

    #[test]
    fn test_unresolvable_address_record_skipped() {
        let buf = new_addr_v4(42, [10, 0, 0, 5], None);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_missing_address_skipped() {
        let mut payload = ifaddrmsg(AF_INET, 0, 2);
        payload.extend(attr(ifa::LABEL, b"eth0\0"));
        let buf = record(NlMsgType::RTM_NEWADDR, &payload);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_ipv6_address_removed_host_order() {
        let buf = addr_v6(NlMsgType::RTM_DELADDR, 3, 0, &DOC_V6);
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(
            events,
            vec![InterfaceEvent::AddressRemoved {
                ifname: "wlan0".into(),
                addr: Address::V6([0x2001, 0x0db8, 0, 0, 0, 0, 0, 1]),
            }]
        );
    }

    #[test]
    fn test_tentative_ipv6_skipped() {
        let buf = addr_v6(NlMsgType::RTM_NEWADDR, 3, ifa_flags::TENTATIVE as u8, &DOC_V6);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_tentative_from_flags_attribute() {
        let mut payload = ifaddrmsg(AF_INET6, 0, 3);
        payload.extend(attr(ifa::ADDRESS, &DOC_V6));
        payload.extend(attr(ifa::FLAGS, &(ifa_flags::TENTATIVE | 0x100).to_ne_bytes()));
        let buf = record(NlMsgType::RTM_NEWADDR, &payload);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_tentative_flag_ignored_for_ipv4() {
        let mut payload = ifaddrmsg(AF_INET, ifa_flags::TENTATIVE as u8, 2);
        payload.extend(attr(ifa::LOCAL, &[10, 1, 1, 1]));
        let buf = record(NlMsgType::RTM_NEWADDR, &payload);
        assert_eq!(decoder().decode(&buf).unwrap().len(), 1);
    }

    #[test]
    fn test_last_address_attribute_wins() {
        let mut payload = ifaddrmsg(AF_INET, 0, 2);
        payload.extend(attr(ifa::ADDRESS, &[10, 0, 0, 254]));
        payload.extend(attr(ifa::LOCAL, &[10, 0, 0, 1]));
        let buf = record(NlMsgType::RTM_NEWADDR, &payload);
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(events[0].address(), Some(&Address::V4([10, 0, 0, 1])));
    }

    #[test]
    fn test_last_label_wins() {
        let mut payload = ifaddrmsg(AF_INET, 0, 2);
        payload.extend(attr(ifa::LABEL, b"eth0:a\0"));
        payload.extend(attr(ifa::LOCAL, &[10, 0, 0, 7]));
        payload.extend(attr(ifa::LABEL, b"eth0:b\0"));
        let buf = record(NlMsgType::RTM_NEWADDR, &payload);
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ifname(), "eth0:b");
    }

    #[test]
    fn test_short_address_attribute_ignored() {
        let mut payload = ifaddrmsg(AF_INET6, 0, 3);
        payload.extend(attr(ifa::ADDRESS, &[0x20, 0x01, 0x0d, 0xb8]));
        let buf = record(NlMsgType::RTM_NEWADDR, &payload);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_records_in_arrival_order() {
        let mut buf = new_addr_v4(2, [10, 0, 0, 1], None);
        buf.extend(addr_v6(NlMsgType::RTM_DELADDR, 3, 0, &DOC_V6));
        buf.extend(new_addr_v4(3, [10, 0, 0, 3], None));

        let events = decoder().decode(&buf).unwrap();
        let kinds: Vec<_> = events.iter().map(|e| (e.kind(), e.ifname())).collect();
        assert_eq!(
            kinds,
            vec![("new_addr", "eth0"), ("del_addr", "wlan0"), ("new_addr", "wlan0")]
        );
    }

    #[test]
    fn test_link_up() {
        let buf = link(NlMsgType::RTM_NEWLINK, 2, iff::UP | iff::RUNNING, iff::RUNNING);
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(
            events,
            vec![InterfaceEvent::LinkUp {
                ifname: "eth0".into()
            }]
        );
    }

    #[test]
    fn test_link_down_when_carrier_lost() {
        let buf = link(NlMsgType::RTM_NEWLINK, 2, iff::UP, iff::RUNNING);
        let events = decoder().decode(&buf).unwrap();
        assert_eq!(
            events,
            vec![InterfaceEvent::LinkDown {
                ifname: "eth0".into()
            }]
        );
    }

    #[test]
    fn test_link_down_when_admin_down() {
        let buf = link(NlMsgType::RTM_NEWLINK, 3, iff::RUNNING, iff::UP);
        let events = decoder().decode(&buf).unwrap();
        assert!(matches!(events[0], InterfaceEvent::LinkDown { .. }));
    }

    #[test]
    fn test_link_no_change_skipped() {
        let buf = link(NlMsgType::RTM_NEWLINK, 2, iff::UP | iff::RUNNING, 0);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_link_state_dump_skipped() {
        let buf = link(NlMsgType::RTM_NEWLINK, 2, iff::UP | iff::RUNNING, IFI_CHANGE_ALL);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_link_unrelated_flag_skipped() {
        let buf = link(NlMsgType::RTM_NEWLINK, 2, iff::UP | iff::RUNNING, 0x100);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_unresolvable_link_ignores_ifname_attribute() {
        let mut payload = ifinfomsg(9, iff::UP | iff::RUNNING, iff::RUNNING);
        payload.extend(attr(ifla::IFNAME, b"veth9\0"));
        let buf = record(NlMsgType::RTM_NEWLINK, &payload);
        assert!(decoder().decode(&buf).unwrap().is_empty());

        let mut payload = ifinfomsg(9, 0, iff::UP);
        payload.extend(attr(ifla::IFNAME, b"veth9\0"));
        let buf = record(NlMsgType::RTM_DELLINK, &payload);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_unresolvable_link_skipped() {
        let buf = link(NlMsgType::RTM_NEWLINK, 9, iff::UP | iff::RUNNING, iff::UP);
        assert!(decoder().decode(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_short_payloads_skipped() {
        let mut buf = record(NlMsgType::RTM_NEWLINK, &[0u8; 8]);
        buf.extend(record(NlMsgType::RTM_NEWADDR, &[AF_INET, 24]));
        buf.extend(new_addr_v4(2, [10, 0, 0, 1], None));
        assert_eq!(decoder().decode(&buf).unwrap().len(), 1);
    }

    #[test]
    fn test_other_types_ignored() {
        let mut buf = record(NlMsgType::RTM_NEWROUTE, &[0u8; 12]);
        buf.extend(record(NlMsgType::NOOP, &[]));
        buf.extend(link(NlMsgType::RTM_NEWLINK, 2, iff::UP | iff::RUNNING, iff::UP));
        assert_eq!(decoder().decode(&buf).unwrap().len(), 1);
    }

    #[test]
    fn test_done_ends_decoding() {
        let mut buf = new_addr_v4(2, [10, 0, 0, 1], None);
        buf.extend(record(NlMsgType::DONE, &0i32.to_ne_bytes()));
        buf.extend(new_addr_v4(2, [10, 0, 0, 2], None));
        assert_eq!(decoder().decode(&buf).unwrap().len(), 1);
    }

    #[test]
    fn test_loopback_fixture() {
        let buf = record(NlMsgType::RTM_NEWADDR, &addr_loopback_v4());
        let events = NetlinkDecoder::with_resolver(HashMap::new()).decode(&buf).unwrap();
        assert_eq!(
            events,
            vec![InterfaceEvent::AddressAdded {
                ifname: "lo".into(),
                addr: Address::V4([127, 0, 0, 1]),
            }]
        );
    }
}
