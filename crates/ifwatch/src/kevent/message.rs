//! Kernel event message header (struct kern_event_msg).

use crate::error::{Error, Result};
use crate::parse::{FromWire, PResult, parse_u32_ne};

/// Size of the kernel event header, up to the start of `event_data`.
pub const KEV_MSG_HEADER_SIZE: usize = 24;

/// Kernel event message header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernEventHdr {
    /// Size of the whole message, header included.
    pub total_size: u32,
    /// Vendor namespace (KEV_VENDOR_*).
    pub vendor_code: u32,
    /// Event class (KEV_*_CLASS).
    pub kev_class: u32,
    /// Event subclass (KEV_*_SUBCLASS).
    pub kev_subclass: u32,
    /// Monotonic event id assigned by the kernel.
    pub id: u32,
    /// Event code within the subclass.
    pub event_code: u32,
}

impl FromWire for KernEventHdr {
    const SIZE: usize = KEV_MSG_HEADER_SIZE;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            total_size: parse_u32_ne(input)?,
            vendor_code: parse_u32_ne(input)?,
            kev_class: parse_u32_ne(input)?,
            kev_subclass: parse_u32_ne(input)?,
            id: parse_u32_ne(input)?,
            event_code: parse_u32_ne(input)?,
        })
    }
}

/// A validated kernel event message.
#[derive(Debug, Clone, Copy)]
pub struct KevMessage<'a> {
    /// The message header.
    pub header: KernEventHdr,
    /// The subclass-specific `event_data` region.
    pub payload: &'a [u8],
}

impl<'a> KevMessage<'a> {
    /// Validate `buf` as exactly one kernel event message.
    ///
    /// The declared `total_size` must equal the buffer length; partial and
    /// concatenated messages are rejected.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let header = KernEventHdr::from_prefix(buf).map_err(|_| {
            Error::InvalidArgument(format!(
                "kernel event buffer of {} bytes is shorter than its header",
                buf.len()
            ))
        })?;

        if header.total_size as usize != buf.len() {
            return Err(Error::InvalidArgument(format!(
                "kernel event declares {} bytes, buffer holds {}",
                header.total_size,
                buf.len()
            )));
        }

        Ok(Self {
            header,
            payload: &buf[KEV_MSG_HEADER_SIZE..],
        })
    }
}
