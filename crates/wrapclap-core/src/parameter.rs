//! Parameter descriptors.
//!
//! A [`ParameterDescriptor`] describes one automatable control as the target
//! plugin declared it: its id, its correlation [`Cookie`] and its plain value
//! range. It converts between the host's normalized values and the target's
//! plain values.
//!
//! Descriptors are created once while the target's control list is read and
//! are immutable afterwards. They are owned by a
//! [`ParameterRegistry`](crate::registry::ParameterRegistry), never by the
//! adapter.
//!
//! # Example
//!
//! ```
//! use wrapclap_core::ParameterDescriptor;
//!
//! let cutoff = ParameterDescriptor::new(3, "Cutoff", 20.0..=20000.0).unwrap();
//! assert_eq!(cutoff.to_plain(0.0), 20.0);
//! assert_eq!(cutoff.to_normalized(20000.0), 1.0);
//! ```

use std::ops::RangeInclusive;

use crate::error::{AdapterError, AdapterResult};
use crate::types::{Cookie, ParameterId, ParameterValue};

/// Behavioral flags copied from the target's control description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterFlags {
    /// The host may automate this control.
    pub automatable: bool,
    /// Only integer plain values are meaningful.
    pub stepped: bool,
    /// The control is display only.
    pub read_only: bool,
    /// The control should not be listed by the host.
    pub hidden: bool,
    /// The control is the plugin's bypass switch.
    pub bypass: bool,
    /// The range wraps around (e.g. a phase).
    pub periodic: bool,
}

impl Default for ParameterFlags {
    fn default() -> Self {
        Self {
            automatable: true,
            stepped: false,
            read_only: false,
            hidden: false,
            bypass: false,
            periodic: false,
        }
    }
}

/// One automatable control with its identity and range mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    id: ParameterId,
    cookie: Cookie,
    min: ParameterValue,
    max: ParameterValue,
    default_value: ParameterValue,
    name: String,
    module: String,
    flags: ParameterFlags,
}

impl ParameterDescriptor {
    /// Create a descriptor for the plain range `range`.
    ///
    /// The default value starts at the range minimum. Fails if the range is
    /// not finite or `min >= max`, since the conversions divide by the span.
    pub fn new(
        id: ParameterId,
        name: impl Into<String>,
        range: RangeInclusive<ParameterValue>,
    ) -> AdapterResult<Self> {
        let (min, max) = (*range.start(), *range.end());
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(AdapterError::InvalidRange { id, min, max });
        }
        Ok(Self {
            id,
            cookie: Cookie::null(),
            min,
            max,
            default_value: min,
            name: name.into(),
            module: String::new(),
            flags: ParameterFlags::default(),
        })
    }

    /// Attach the target's correlation token.
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookie = cookie;
        self
    }

    /// Set the default plain value, clamped into the range.
    pub fn with_default(mut self, plain: ParameterValue) -> Self {
        self.default_value = if plain.is_nan() {
            self.min
        } else {
            plain.clamp(self.min, self.max)
        };
        self
    }

    /// Set the module (group path) the control belongs to.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Set the behavioral flags.
    pub fn with_flags(mut self, flags: ParameterFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn id(&self) -> ParameterId {
        self.id
    }

    #[inline]
    pub fn cookie(&self) -> Cookie {
        self.cookie
    }

    #[inline]
    pub fn min(&self) -> ParameterValue {
        self.min
    }

    #[inline]
    pub fn max(&self) -> ParameterValue {
        self.max
    }

    #[inline]
    pub fn default_value(&self) -> ParameterValue {
        self.default_value
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    #[inline]
    pub fn flags(&self) -> ParameterFlags {
        self.flags
    }

    /// Convert a normalized host value into the target's plain units.
    #[inline]
    pub fn to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        normalized * (self.max - self.min) + self.min
    }

    /// Convert a plain target value into the host's normalized form.
    #[inline]
    pub fn to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        (plain - self.min) / (self.max - self.min)
    }

    /// The default value in normalized form.
    #[inline]
    pub fn default_normalized(&self) -> ParameterValue {
        self.to_normalized(self.default_value)
    }

    /// Number of discrete steps, or 0 for a continuous control.
    pub fn step_count(&self) -> i32 {
        if self.flags.stepped {
            (self.max - self.min).round() as i32
        } else {
            0
        }
    }
}
