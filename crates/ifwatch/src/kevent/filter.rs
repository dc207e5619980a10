//! Kernel event socket filters.

use std::io;
use std::str::FromStr;

use zerocopy::{Immutable, IntoBytes, KnownLayout};

use super::types::{KEV_NETWORK_CLASS, KEV_VENDOR_APPLE};
use crate::error::{Error, Result};
use crate::filter::parse_spec;

/// Wildcard for any of the request fields (KEV_ANY_VENDOR, KEV_ANY_CLASS,
/// KEV_ANY_SUBCLASS).
pub const KEV_ANY: u32 = 0;

/// `_IOW('e', 2, struct kev_request)`.
pub const SIOCSKEVFILT: u64 = 0x800c_6502;

/// Which kernel events a `PF_SYSTEM` event socket delivers.
///
/// Fields left as `None` match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KevFilter {
    pub vendor: Option<u32>,
    pub class: Option<u32>,
    pub subclass: Option<u32>,
}

impl KevFilter {
    /// Create a filter matching every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a vendor code.
    pub fn vendor(mut self, vendor: u32) -> Self {
        self.vendor = Some(vendor);
        self
    }

    /// Restrict to an event class.
    pub fn class(mut self, class: u32) -> Self {
        self.class = Some(class);
        self
    }

    /// Restrict to an event subclass.
    pub fn subclass(mut self, subclass: u32) -> Self {
        self.subclass = Some(subclass);
        self
    }

    /// Apple network events of every subclass.
    pub fn network() -> Self {
        Self::new().vendor(KEV_VENDOR_APPLE).class(KEV_NETWORK_CLASS)
    }

    /// The request structure handed to the kernel.
    pub fn request(&self) -> KevRequest {
        KevRequest::from(self)
    }

    /// Install this filter through `sink`.
    pub fn apply<S: KevFilterSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let req = self.request();
        sink.set_kev_filter(&req).map_err(Error::from_io)?;
        tracing::debug!(
            vendor = req.vendor_code,
            class = req.kev_class,
            subclass = req.kev_subclass,
            "kernel event filter installed"
        );
        Ok(())
    }
}

impl FromStr for KevFilter {
    type Err = Error;

    /// Parse `vendor=<n>,class=<n>,subclass=<n>`; every key is optional.
    fn from_str(s: &str) -> Result<Self> {
        let mut filter = Self::new();
        for entry in parse_spec(s)? {
            let Some(value) = entry.value else {
                continue;
            };
            match entry.key {
                "vendor" => filter.vendor = Some(value),
                "class" => filter.class = Some(value),
                "subclass" => filter.subclass = Some(value),
                _ => {}
            }
        }
        Ok(filter)
    }
}

/// struct kev_request.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IntoBytes, Immutable, KnownLayout)]
pub struct KevRequest {
    pub vendor_code: u32,
    pub kev_class: u32,
    pub kev_subclass: u32,
}

impl From<&KevFilter> for KevRequest {
    fn from(filter: &KevFilter) -> Self {
        Self {
            vendor_code: filter.vendor.unwrap_or(KEV_ANY),
            kev_class: filter.class.unwrap_or(KEV_ANY),
            kev_subclass: filter.subclass.unwrap_or(KEV_ANY),
        }
    }
}

/// The one kernel call a kernel event filter needs.
pub trait KevFilterSink {
    /// Issue `SIOCSKEVFILT` with `req`.
    fn set_kev_filter(&mut self, req: &KevRequest) -> io::Result<()>;
}

/// A borrowed `PF_SYSTEM` event socket descriptor.
#[cfg(target_vendor = "apple")]
#[derive(Debug, Clone, Copy)]
pub struct EventSocketFd(pub std::os::fd::RawFd);

#[cfg(target_vendor = "apple")]
impl KevFilterSink for EventSocketFd {
    fn set_kev_filter(&mut self, req: &KevRequest) -> io::Result<()> {
        let mut raw = *req;
        // SAFETY: raw is a live #[repr(C)] kev_request for the duration of
        // the call, which is what SIOCSKEVFILT reads.
        let ret = unsafe {
            libc::ioctl(
                self.0,
                SIOCSKEVFILT as libc::c_ulong,
                &mut raw as *mut KevRequest,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Install `filter` on the caller's open kernel event socket `fd`.
///
/// The descriptor stays owned by the caller. Calls on the same descriptor
/// must not race each other.
#[cfg(target_vendor = "apple")]
pub fn configure_filter(fd: std::os::fd::RawFd, filter: &KevFilter) -> Result<()> {
    if fd < 0 {
        return Err(Error::InvalidArgument(format!("invalid socket handle {}", fd)));
    }
    filter.apply(&mut EventSocketFd(fd))
}
