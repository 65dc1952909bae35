//! String helpers for CLAP's fixed-size C string fields.

use std::ffi::c_char;

/// Read a null-terminated `c_char` array into a `String`.
///
/// Stops at the first null or at the end of the array. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn c_char_array_to_string(src: &[c_char]) -> String {
    let bytes: Vec<u8> = src
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Copy a Rust string into a `c_char` array, truncating and null-terminating.
#[cfg(test)]
pub(crate) fn copy_cstring(src: &str, dst: &mut [c_char]) {
    let Some(max_len) = dst.len().checked_sub(1) else {
        return;
    };
    let len = src.len().min(max_len);
    for (dst, &src) in dst.iter_mut().zip(&src.as_bytes()[..len]) {
        *dst = src as c_char;
    }
    dst[len] = 0;
}
