//! Netlink message header and record framing.

use crate::parse::{FromWire, PResult, align4, parse_u16_ne, parse_u32_ne};

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = 16;

/// Netlink message header (mirrors struct nlmsghdr).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Additional flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending process port ID.
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// Check if this is a done message.
    pub fn is_done(&self) -> bool {
        self.nlmsg_type == NlMsgType::DONE
    }

    /// Check if this record describes an address change.
    pub fn is_addr(&self) -> bool {
        matches!(self.nlmsg_type, NlMsgType::RTM_NEWADDR | NlMsgType::RTM_DELADDR)
    }

    /// Check if this record describes a link change.
    pub fn is_link(&self) -> bool {
        matches!(self.nlmsg_type, NlMsgType::RTM_NEWLINK | NlMsgType::RTM_DELLINK)
    }
}

impl FromWire for NlMsgHdr {
    const SIZE: usize = NLMSG_HDRLEN;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            nlmsg_len: parse_u32_ne(input)?,
            nlmsg_type: parse_u16_ne(input)?,
            nlmsg_flags: parse_u16_ne(input)?,
            nlmsg_seq: parse_u32_ne(input)?,
            nlmsg_pid: parse_u32_ne(input)?,
        })
    }
}

/// Standard netlink message types.
pub struct NlMsgType;

impl NlMsgType {
    /// No operation, message must be discarded.
    pub const NOOP: u16 = 1;
    /// End of multipart message.
    pub const DONE: u16 = 3;

    // Link messages
    pub const RTM_NEWLINK: u16 = 16;
    pub const RTM_DELLINK: u16 = 17;

    // Address messages
    pub const RTM_NEWADDR: u16 = 20;
    pub const RTM_DELADDR: u16 = 21;

    // Route messages
    pub const RTM_NEWROUTE: u16 = 24;
}

/// One framed netlink record.
#[derive(Debug, Clone, Copy)]
pub struct NetlinkRecord<'a> {
    /// The record header.
    pub header: NlMsgHdr,
    /// Payload bytes, excluding header and trailing alignment padding.
    pub payload: &'a [u8],
}

/// Iterator over netlink records in a receive buffer.
///
/// Stops at the end of the buffer, at the first record whose declared length
/// is shorter than a header or runs past the buffer, and at `NLMSG_DONE`
/// (which is not yielded). Records already yielded stay valid.
pub struct MessageIter<'a> {
    data: &'a [u8],
}

impl<'a> MessageIter<'a> {
    /// Create a new message iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = NetlinkRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = NlMsgHdr::from_prefix(self.data).ok()?;

        let msg_len = header.nlmsg_len as usize;
        if msg_len < NLMSG_HDRLEN || msg_len > self.data.len() {
            tracing::debug!(
                msg_len,
                remaining = self.data.len(),
                "netlink record length out of bounds, stopping"
            );
            self.data = &[];
            return None;
        }

        if header.is_done() {
            self.data = &[];
            return None;
        }

        let payload = &self.data[NLMSG_HDRLEN..msg_len];
        let aligned_len = align4(msg_len);

        // Move to next message
        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        tracing::trace!(
            msg_type = header.nlmsg_type,
            len = msg_len,
            seq = header.nlmsg_seq,
            "framed netlink record"
        );
        Some(NetlinkRecord { header, payload })
    }
}

impl std::iter::FusedIterator for MessageIter<'_> {}
