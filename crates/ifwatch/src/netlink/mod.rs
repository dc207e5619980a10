//! Linux rtnetlink transport.
//!
//! A receive buffer from a `NETLINK_ROUTE` socket holds any number of
//! records. [`MessageIter`] frames them, [`AttrIter`] walks the attributes of
//! a record, and [`NetlinkDecoder`] turns link and address records into
//! [`InterfaceEvent`](crate::InterfaceEvent)s.
//!
//! Decoding is pure and available on every platform; binding a socket with
//! [`configure_filter`] is Linux-only.

pub mod attr;
mod decode;
mod filter;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod message;
pub mod types;

pub use attr::{AttrIter, NlAttr};
pub use decode::NetlinkDecoder;
#[cfg(target_os = "linux")]
pub use filter::configure_filter;
pub use filter::{GroupFilter, NetlinkBind, RtnetlinkGroup};
pub use message::{MessageIter, NLMSG_HDRLEN, NetlinkRecord, NlMsgHdr, NlMsgType};
