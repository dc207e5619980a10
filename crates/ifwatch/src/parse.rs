//! Bounds-checked field extraction for kernel wire structures.
//!
//! Kernel records are never reinterpreted in place. Every fixed-size
//! structure implements [`FromWire`] and reads its fields one by one with the
//! winnow combinators below, so a short buffer is an error instead of an
//! out-of-bounds read.

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;

use crate::error::{Error, Result};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Trait for fixed-size structures read from kernel wire format.
pub trait FromWire: Sized {
    /// Size of the structure on the wire.
    const SIZE: usize;

    /// Parse from a mutable byte slice reference.
    /// The slice is advanced past the consumed bytes.
    fn parse(input: &mut &[u8]) -> PResult<Self>;

    /// Parse from the start of `data`, ignoring trailing bytes.
    fn from_prefix(data: &[u8]) -> Result<Self> {
        let mut input = data;
        Self::parse(&mut input).map_err(|_| Error::Truncated {
            expected: Self::SIZE,
            actual: data.len(),
        })
    }
}

/// Build a cut error for structurally invalid input.
pub(crate) fn cut() -> ErrMode<ContextError> {
    ErrMode::Cut(ContextError::new())
}

/// Parse a u8.
pub fn parse_u8(input: &mut &[u8]) -> PResult<u8> {
    winnow::binary::le_u8.parse_next(input)
}

/// Parse a u16 in native endian.
pub fn parse_u16_ne(input: &mut &[u8]) -> PResult<u16> {
    let bytes: &[u8] = take(2usize).parse_next(input)?;
    Ok(u16::from_ne_bytes([bytes[0], bytes[1]]))
}

/// Parse a u32 in native endian.
pub fn parse_u32_ne(input: &mut &[u8]) -> PResult<u32> {
    let bytes: &[u8] = take(4usize).parse_next(input)?;
    Ok(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Parse an i32 in native endian.
pub fn parse_i32_ne(input: &mut &[u8]) -> PResult<i32> {
    let bytes: &[u8] = take(4usize).parse_next(input)?;
    Ok(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Skip `n` bytes.
pub fn skip(input: &mut &[u8], n: usize) -> PResult<()> {
    let _: &[u8] = take(n).parse_next(input)?;
    Ok(())
}

/// Parse a string from a fixed-size buffer (null-terminated).
///
/// Invalid UTF-8 is replaced rather than rejected; interface names are
/// opaque bytes to the kernel.
pub fn parse_string_from_bytes(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Align a length to a 4-byte boundary.
#[inline]
pub const fn align4(len: usize) -> usize {
    (len + 3) & !3
}
