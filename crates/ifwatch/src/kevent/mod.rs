//! Darwin kernel event transport.
//!
//! A `PF_SYSTEM`/`SYSPROTO_EVENT` socket delivers one [`KevMessage`] per
//! read. [`KevDecoder`] turns data link, IPv4 and IPv6 network events into
//! [`InterfaceEvent`](crate::InterfaceEvent)s and rejects everything else.
//!
//! Decoding is pure and available on every platform; installing a
//! [`KevFilter`] with `configure_filter` is Darwin-only.

mod decode;
mod filter;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod message;
pub mod types;

pub use decode::KevDecoder;
#[cfg(target_vendor = "apple")]
pub use filter::{EventSocketFd, configure_filter};
pub use filter::{KEV_ANY, KevFilter, KevFilterSink, KevRequest, SIOCSKEVFILT};
pub use message::{KEV_MSG_HEADER_SIZE, KernEventHdr, KevMessage};
