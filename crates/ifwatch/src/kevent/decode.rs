//! Darwin network kernel event decoder.

use tracing::trace;

use super::message::KevMessage;
use super::types::{
    KEV_DL_SUBCLASS, KEV_INET_SUBCLASS, KEV_INET6_SUBCLASS, KEV_NETWORK_CLASS, KEV_VENDOR_APPLE,
    KevIn6Data, KevInData, NetEventData, dl, inet, inet6,
};
use crate::Decoder;
use crate::error::{Error, Result};
use crate::event::InterfaceEvent;
use crate::parse::FromWire;

/// Decodes one kernel event message per buffer.
///
/// Unlike netlink, every buffer is exactly one message and decoding is all
/// or nothing: the message yields one event or an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct KevDecoder;

impl KevDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode `buf` into its single event.
    pub fn decode_message(&self, buf: &[u8]) -> Result<InterfaceEvent> {
        let msg = KevMessage::parse(buf)?;
        let header = &msg.header;
        trace!(
            vendor = header.vendor_code,
            class = header.kev_class,
            subclass = header.kev_subclass,
            code = header.event_code,
            id = header.id,
            "kernel event"
        );

        if header.vendor_code != KEV_VENDOR_APPLE || header.kev_class != KEV_NETWORK_CLASS {
            return Err(Error::UnhandledEvent(header.event_code));
        }

        match header.kev_subclass {
            KEV_DL_SUBCLASS => decode_dl(header.event_code, msg.payload),
            KEV_INET_SUBCLASS => decode_inet(header.event_code, msg.payload),
            KEV_INET6_SUBCLASS => decode_inet6(header.event_code, msg.payload),
            _ => Err(Error::UnhandledEvent(header.event_code)),
        }
    }
}

fn decode_dl(code: u32, payload: &[u8]) -> Result<InterfaceEvent> {
    let up = match code {
        dl::LINK_ON => true,
        dl::LINK_OFF => false,
        _ => return Err(Error::UnhandledEvent(code)),
    };

    let ifname = NetEventData::from_prefix(payload)?.ifname();
    Ok(if up {
        InterfaceEvent::LinkUp { ifname }
    } else {
        InterfaceEvent::LinkDown { ifname }
    })
}

fn decode_inet(code: u32, payload: &[u8]) -> Result<InterfaceEvent> {
    let added = match code {
        inet::NEW_ADDR => true,
        inet::ADDR_DELETED => false,
        _ => return Err(Error::UnhandledEvent(code)),
    };

    let data = KevInData::from_prefix(payload)?;
    let ifname = data.link_data.ifname();
    Ok(if added {
        InterfaceEvent::AddressAdded {
            ifname,
            addr: data.addr,
        }
    } else {
        InterfaceEvent::AddressRemoved {
            ifname,
            addr: data.addr,
        }
    })
}

fn decode_inet6(code: u32, payload: &[u8]) -> Result<InterfaceEvent> {
    let added = match code {
        inet6::NEW_USER_ADDR | inet6::NEW_LL_ADDR => true,
        inet6::ADDR_DELETED => false,
        _ => return Err(Error::UnhandledEvent(code)),
    };

    let data = KevIn6Data::from_prefix(payload)?;
    let ifname = data.link_data.ifname();
    Ok(if added {
        InterfaceEvent::AddressAdded {
            ifname,
            addr: data.addr,
        }
    } else {
        InterfaceEvent::AddressRemoved {
            ifname,
            addr: data.addr,
        }
    })
}

impl Decoder for KevDecoder {
    fn decode(&self, buf: &[u8]) -> Result<Vec<InterfaceEvent>> {
        self.decode_message(buf).map(|event| vec![event])
    }
}
