//! Netlink attribute (rtattr) walking.

use crate::parse::{FromWire, PResult, align4, parse_u16_ne};

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4;

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

/// Netlink attribute header (mirrors struct rtattr).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

impl NlAttr {
    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }
}

impl FromWire for NlAttr {
    const SIZE: usize = NLA_HDRLEN;

    fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            nla_len: parse_u16_ne(input)?,
            nla_type: parse_u16_ne(input)?,
        })
    }
}

/// Iterator over the attributes of a record payload.
///
/// A malformed attribute ends the walk; everything yielded before it stands.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let attr = NlAttr::from_prefix(self.data).ok()?;

        let len = attr.nla_len as usize;
        if len < NLA_HDRLEN || len > self.data.len() {
            tracing::debug!(
                attr_len = len,
                remaining = self.data.len(),
                "malformed attribute, stopping walk"
            );
            self.data = &[];
            return None;
        }

        let payload = &self.data[NLA_HDRLEN..len];
        let aligned_len = align4(len);

        // Move to next attribute
        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        Some((attr.kind(), payload))
    }
}

impl std::iter::FusedIterator for AttrIter<'_> {}
