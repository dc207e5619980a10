//! Decoder for kernel interface change notifications.
//!
//! Turns the raw buffers read from an OS notification socket into a
//! platform-neutral sequence of [`InterfaceEvent`]s, and primes that socket
//! with a subscription filter before reading starts.
//!
//! - Linux: rtnetlink link and address records ([`netlink`])
//! - Darwin: `PF_SYSTEM` network kernel events ([`kevent`])
//!
//! Both decoders are available on every platform. [`PlatformDecoder`],
//! [`FilterConfig`], [`decode`] and [`configure_filter`] select the host's.
//!
//! # Features
//!
//! - `serde` - Serialize events and addresses
//!
//! # Example
//!
//! ```ignore
//! use ifwatch::netlink::GroupFilter;
//!
//! let filter = GroupFilter::new().link().ipv4_addr().ipv6_addr();
//! ifwatch::configure_filter(fd, &filter)?;
//!
//! loop {
//!     let n = recv(fd, &mut buf)?;
//!     for event in ifwatch::decode(&buf[..n])? {
//!         println!("{}", event);
//!     }
//! }
//! ```

pub mod addr;
pub mod error;
pub mod event;
mod filter;
pub mod ifname;
pub mod kevent;
pub mod netlink;
pub mod parse;

pub use addr::Address;
pub use error::{Error, Result, errno_name};
pub use event::InterfaceEvent;
pub use ifname::{IndexResolver, SystemResolver};

/// Turns one received buffer into events.
///
/// Implementations are pure: no I/O, no shared state, safe to call from
/// several threads on independent buffers.
pub trait Decoder {
    /// Decode every event in `buf`.
    fn decode(&self, buf: &[u8]) -> Result<Vec<InterfaceEvent>>;
}

/// The host platform's decoder.
#[cfg(target_os = "linux")]
pub type PlatformDecoder = netlink::NetlinkDecoder;
/// The host platform's decoder.
#[cfg(target_vendor = "apple")]
pub type PlatformDecoder = kevent::KevDecoder;

/// The host platform's subscription filter.
#[cfg(target_os = "linux")]
pub type FilterConfig = netlink::GroupFilter;
/// The host platform's subscription filter.
#[cfg(target_vendor = "apple")]
pub type FilterConfig = kevent::KevFilter;

/// Decode `buf` with the host platform's decoder.
///
/// On Linux, records that are malformed or carry no interface change are
/// skipped and the result may be empty. On Darwin, the buffer must be exactly
/// one kernel event message that maps to an event.
#[cfg(any(target_os = "linux", target_vendor = "apple"))]
pub fn decode(buf: &[u8]) -> Result<Vec<InterfaceEvent>> {
    PlatformDecoder::default().decode(buf)
}

/// Install `filter` on the caller's open notification socket `fd`.
///
/// Must complete before the caller starts reading from `fd`.
#[cfg(target_os = "linux")]
pub fn configure_filter(fd: std::os::fd::RawFd, filter: &FilterConfig) -> Result<()> {
    netlink::configure_filter(fd, filter)
}

/// Install `filter` on the caller's open notification socket `fd`.
///
/// Must complete before the caller starts reading from `fd`.
#[cfg(target_vendor = "apple")]
pub fn configure_filter(fd: std::os::fd::RawFd, filter: &FilterConfig) -> Result<()> {
    kevent::configure_filter(fd, filter)
}
