//! Common types and limits used throughout the adapter.

use std::ffi::c_void;
use std::ptr;

// =============================================================================
// Identifiers and Values
// =============================================================================

/// Target-protocol parameter identifier.
pub type ParameterId = u32;

/// A parameter value. Normalized values live in `[0, 1]`, plain values in the
/// descriptor's `[min, max]` range.
pub type ParameterValue = f64;

/// Fixed-point musical time (see [`crate::transport::BEAT_TIME_SCALE`]).
pub type BeatTime = i64;

/// Fixed-point wall-clock time. Always zero here: the host supplies no
/// seconds-based position.
pub type SecTime = i64;

/// Sentinel for note-scoped fields that do not apply (global scope).
pub const NOT_APPLICABLE: i16 = -1;

/// Sentinel note id meaning "any note".
pub const NOTE_ID_ANY: i32 = -1;

// =============================================================================
// Limits
// =============================================================================
//
// Buffers are sized once in `ProcessAdapter::configure` and never grow on the
// audio thread. These constants bound what a configuration may request.
// =============================================================================

/// Maximum number of audio channels the adapter wires per bus.
pub const MAX_CHANNELS: usize = 32;

/// Maximum number of audio buses a target bridge reserves storage for.
pub const MAX_BUSES: usize = 16;

/// Default capacity of the per-block event buffers.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Upper bound for any per-block event buffer capacity.
pub const MAX_EVENT_CAPACITY: usize = 65536;

// =============================================================================
// Cookie
// =============================================================================

/// Opaque correlation token the target protocol attaches to a parameter.
///
/// The adapter never dereferences it; it is handed back to the target inside
/// every parameter-value event so the plugin can skip its own id lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cookie(*mut c_void);

// SAFETY: the pointer is an opaque token owned by the target plugin. The
// adapter only copies it around and never dereferences it.
unsafe impl Send for Cookie {}
// SAFETY: see above, the token is never dereferenced.
unsafe impl Sync for Cookie {}

impl Cookie {
    /// Wrap a raw token.
    #[inline]
    pub const fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// The empty token.
    #[inline]
    pub const fn null() -> Self {
        Self(ptr::null_mut())
    }

    /// Returns the raw token.
    #[inline]
    pub const fn as_ptr(&self) -> *mut c_void {
        self.0
    }

    /// Returns true if no token was supplied.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl Default for Cookie {
    fn default() -> Self {
        Self::null()
    }
}
