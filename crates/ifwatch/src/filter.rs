//! Subscription filter specs.
//!
//! Filters are written as comma separated `key=value` pairs, e.g.
//! `groups=0x111` or `vendor=1,class=1,subclass=2`. Unknown keys and values
//! that are not non-negative integers are ignored; an entry that is not a
//! `key=value` pair rejects the whole spec.

use crate::error::{Error, Result};

/// One `key=value` entry of a filter spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FilterEntry<'a> {
    pub key: &'a str,
    /// `None` when the value is not a non-negative integer.
    pub value: Option<u32>,
}

/// Split a filter spec into entries.
pub(crate) fn parse_spec(spec: &str) -> Result<Vec<FilterEntry<'_>>> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                Error::InvalidArgument(format!("expected key=value, got '{}'", entry))
            })?;
            Ok(FilterEntry {
                key: key.trim(),
                value: parse_value(value.trim()),
            })
        })
        .collect()
}

fn parse_value(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}
