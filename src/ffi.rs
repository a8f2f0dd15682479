//! C Foreign Function Interface (FFI) for the word tree.
//!
//! Foreign hosts load a dictionary once and then query completions through
//! the same trie the pipeline uses. All functions are `extern "C"` with a
//! stable ABI.
//!
//! # Safety
//!
//! String arguments must be valid NUL-terminated C strings or NULL.
//! Strings returned by [`typeahead_get_autocomplete`] must be released with
//! [`typeahead_free_string`] and nothing else.
//!
//! # Example (C)
//!
//! ```c
//! #include "typeahead.h"
//!
//! int main() {
//!     if (typeahead_set_dictionary("words.txt") != TYPEAHEAD_OK) return 1;
//!
//!     char* words = typeahead_get_autocomplete("hel", 5);
//!     if (words) {
//!         puts(words);  // "hello help held helium helicopter"
//!         typeahead_free_string(words);
//!     }
//!     return 0;
//! }
//! ```

// FFI modules intentionally use unsafe and no_mangle
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use crate::completion::{CompletionEngine, WordTree};
use crate::error::Error;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The dictionary shared by every FFI caller.
static DICTIONARY: Mutex<Option<WordTree>> = Mutex::new(None);

fn dictionary() -> MutexGuard<'static, Option<WordTree>> {
    DICTIONARY.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Result and Error Codes
// =============================================================================

/// Result codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeaheadResult {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer passed.
    NullPointer = 1,
    /// Invalid UTF-8 string.
    InvalidUtf8 = 2,
    /// The dictionary file could not be read.
    IoError = 3,
    /// The dictionary file is malformed or holds no words.
    InvalidDictionary = 4,
}

impl From<&Error> for TypeaheadResult {
    fn from(err: &Error) -> Self {
        match err {
            Error::Io { .. } | Error::System(_) => Self::IoError,
            _ => Self::InvalidDictionary,
        }
    }
}

unsafe fn c_str<'a>(ptr: *const c_char) -> Result<&'a str, TypeaheadResult> {
    if ptr.is_null() {
        return Err(TypeaheadResult::NullPointer);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| TypeaheadResult::InvalidUtf8)
}

// =============================================================================
// Dictionary Functions
// =============================================================================

/// Load the dictionary at `path`, replacing any previous one.
///
/// On failure the previous dictionary stays in place.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typeahead_set_dictionary(path: *const c_char) -> TypeaheadResult {
    let path = match c_str(path) {
        Ok(path) => path,
        Err(code) => return code,
    };

    let mut tree = WordTree::new();
    match tree.set_dictionary(Path::new(path)) {
        Ok(()) => {
            *dictionary() = Some(tree);
            TypeaheadResult::Ok
        }
        Err(err) => {
            tracing::warn!(error = %err, "ffi dictionary load failed");
            TypeaheadResult::from(&err)
        }
    }
}

/// Up to `k` completions of `prefix`, space-separated, best first.
///
/// Returns NULL if no dictionary is loaded or `prefix` is not a valid
/// string. The result must be released with [`typeahead_free_string`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typeahead_get_autocomplete(prefix: *const c_char, k: c_int) -> *mut c_char {
    let Ok(prefix) = c_str(prefix) else {
        return ptr::null_mut();
    };
    let guard = dictionary();
    let Some(tree) = guard.as_ref() else {
        return ptr::null_mut();
    };

    let k = usize::try_from(k).unwrap_or(0);
    CString::new(tree.get_autocomplete(prefix, k)).map_or(ptr::null_mut(), CString::into_raw)
}

/// Release a string returned by [`typeahead_get_autocomplete`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn typeahead_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// =============================================================================
// Version Information
// =============================================================================

/// Get the library version string.
#[unsafe(no_mangle)]
pub extern "C" fn typeahead_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr().cast::<c_char>()
}
