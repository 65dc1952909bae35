//! String conversion utilities for VST3 interfaces.
//!
//! VST3 passes display strings as fixed-size UTF-16 buffers.

use vst3::Steinberg::Vst::TChar;

/// Copy a Rust string into a wide string (UTF-16) buffer.
///
/// Truncates if the string is too long, always null-terminating.
pub fn copy_wstring(src: &str, dst: &mut [TChar]) {
    if dst.is_empty() {
        return;
    }

    let mut len = 0;
    for (src_char, dst_char) in src.encode_utf16().zip(dst.iter_mut()) {
        *dst_char = src_char as TChar;
        len += 1;
    }

    if len < dst.len() {
        dst[len] = 0;
    } else if let Some(last) = dst.last_mut() {
        *last = 0;
    }
}

/// Read a null-terminated wide string buffer back into a `String`.
///
/// Stops at the first null or at the end of the buffer. Returns `None` for
/// invalid UTF-16.
#[cfg(test)]
pub(crate) fn wstring_to_string(src: &[TChar]) -> Option<String> {
    let len = src.iter().position(|&c| c == 0).unwrap_or(src.len());
    let units: Vec<u16> = src[..len].iter().map(|&c| c as u16).collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_and_read_back() {
        let mut buffer = [0 as TChar; 16];
        copy_wstring("Cutoff", &mut buffer);
        assert_eq!(wstring_to_string(&buffer).as_deref(), Some("Cutoff"));
    }

    #[test]
    fn test_truncates_with_terminator() {
        let mut buffer = [0x41 as TChar; 4];
        copy_wstring("Resonance", &mut buffer);
        assert_eq!(buffer[3], 0);
        assert_eq!(wstring_to_string(&buffer).as_deref(), Some("Res"));
    }

    #[test]
    fn test_empty_destination() {
        let mut buffer: [TChar; 0] = [];
        copy_wstring("Gain", &mut buffer);
    }
}
