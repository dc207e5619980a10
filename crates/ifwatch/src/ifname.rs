//! Interface index to name resolution.

use std::collections::HashMap;
use std::ffi::CStr;

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

/// Resolves kernel interface indexes to names.
pub trait IndexResolver {
    /// Look up the name of interface `index`, if it exists.
    fn index_to_name(&self, index: u32) -> Option<String>;
}

/// Resolver backed by the host's `if_indextoname`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl IndexResolver for SystemResolver {
    fn index_to_name(&self, index: u32) -> Option<String> {
        if index == 0 {
            return None;
        }

        let mut buf = [0 as libc::c_char; IFNAMSIZ];
        // SAFETY: buf is IFNAMSIZ bytes, the size if_indextoname requires,
        // and outlives the call.
        let ret = unsafe { libc::if_indextoname(index, buf.as_mut_ptr()) };
        if ret.is_null() {
            return None;
        }

        // SAFETY: on success if_indextoname wrote a NUL-terminated name into buf.
        let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
        Some(name.to_string_lossy().into_owned())
    }
}

impl IndexResolver for HashMap<u32, String> {
    fn index_to_name(&self, index: u32) -> Option<String> {
        self.get(&index).cloned()
    }
}

impl<R: IndexResolver + ?Sized> IndexResolver for &R {
    fn index_to_name(&self, index: u32) -> Option<String> {
        (**self).index_to_name(index)
    }
}
