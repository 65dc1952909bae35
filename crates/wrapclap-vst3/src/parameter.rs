//! VST3 view of a parameter descriptor.
//!
//! [`Vst3Parameter`] exposes a [`ParameterDescriptor`] the way an
//! `IEditController` reports it: a filled `ParameterInfo` and conversions
//! between VST3 normalized values and the target's plain values.

use vst3::Steinberg::Vst::{ParameterInfo, ParameterInfo_};
use vst3::Steinberg::{kInvalidArgument, kResultOk, tresult};

use wrapclap_core::{ParameterDescriptor, ParameterList, ParameterValue};

use crate::util::copy_wstring;

/// Root unit id; wrapped controls are not grouped into VST3 units.
const K_ROOT_UNIT_ID: i32 = 0;

/// Borrowed VST3 adapter over one descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Vst3Parameter<'a> {
    descriptor: &'a ParameterDescriptor,
}

impl<'a> Vst3Parameter<'a> {
    pub fn new(descriptor: &'a ParameterDescriptor) -> Self {
        Self { descriptor }
    }

    #[inline]
    pub fn descriptor(&self) -> &'a ParameterDescriptor {
        self.descriptor
    }

    /// Fill `info` for `IEditController::getParameterInfo`.
    pub fn fill_info(&self, info: &mut ParameterInfo) {
        let descriptor = self.descriptor;
        info.id = descriptor.id();
        copy_wstring(descriptor.name(), &mut info.title);
        copy_wstring(descriptor.name(), &mut info.shortTitle);
        copy_wstring("", &mut info.units);
        info.stepCount = descriptor.step_count();
        info.defaultNormalizedValue = descriptor.default_normalized();
        info.unitId = K_ROOT_UNIT_ID;
        info.flags = {
            let flags = descriptor.flags();
            let mut bits = 0;
            if flags.automatable && !flags.read_only {
                bits |= ParameterInfo_::ParameterFlags_::kCanAutomate;
            }
            if flags.read_only {
                bits |= ParameterInfo_::ParameterFlags_::kIsReadOnly;
            }
            if flags.periodic {
                bits |= ParameterInfo_::ParameterFlags_::kIsWrapAround;
            }
            if flags.stepped {
                bits |= ParameterInfo_::ParameterFlags_::kIsList;
            }
            if flags.hidden {
                bits |= ParameterInfo_::ParameterFlags_::kIsHidden;
            }
            if flags.bypass {
                bits |= ParameterInfo_::ParameterFlags_::kIsBypass;
            }
            bits
        };
    }

    /// `IEditController::normalizedParamToPlain`.
    #[inline]
    pub fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        self.descriptor.to_plain(normalized)
    }

    /// `IEditController::plainParamToNormalized`.
    #[inline]
    pub fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        self.descriptor.to_normalized(plain)
    }
}

/// Body of `IEditController::getParameterInfo` over a parameter list.
///
/// # Safety
/// `info` must be null or point to writable `ParameterInfo` storage.
pub unsafe fn parameter_info(
    parameters: &ParameterList,
    index: i32,
    info: *mut ParameterInfo,
) -> tresult {
    if info.is_null() {
        return kInvalidArgument;
    }
    let descriptor = usize::try_from(index)
        .ok()
        .and_then(|index| parameters.get(index));
    match descriptor {
        Some(descriptor) => {
            Vst3Parameter::new(descriptor).fill_info(&mut *info);
            kResultOk
        }
        None => {
            log::debug!(
                "getParameterInfo: index {} out of range ({} parameters)",
                index,
                parameters.len()
            );
            kInvalidArgument
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::wstring_to_string;
    use assert_approx_eq::assert_approx_eq;
    use wrapclap_core::ParameterFlags;

    fn zeroed_info() -> ParameterInfo {
        // SAFETY: plain C struct
        unsafe { std::mem::zeroed() }
    }

    #[test]
    fn test_fill_info() {
        let descriptor = ParameterDescriptor::new(12, "Cutoff", 20.0..=20020.0)
            .unwrap()
            .with_default(10020.0);
        let mut info = zeroed_info();
        Vst3Parameter::new(&descriptor).fill_info(&mut info);

        assert_eq!(info.id, 12);
        assert_eq!(wstring_to_string(&info.title).as_deref(), Some("Cutoff"));
        assert_eq!(wstring_to_string(&info.units).as_deref(), Some(""));
        assert_eq!(info.stepCount, 0);
        assert_approx_eq!(info.defaultNormalizedValue, 0.5);
        assert_eq!(info.unitId, 0);
        assert_eq!(info.flags, ParameterInfo_::ParameterFlags_::kCanAutomate);
    }

    #[test]
    fn test_stepped_bypass_flags() {
        let flags = ParameterFlags {
            stepped: true,
            bypass: true,
            ..ParameterFlags::default()
        };
        let descriptor = ParameterDescriptor::new(1, "Bypass", 0.0..=1.0)
            .unwrap()
            .with_flags(flags);
        let mut info = zeroed_info();
        Vst3Parameter::new(&descriptor).fill_info(&mut info);

        assert_eq!(info.stepCount, 1);
        assert_ne!(info.flags & ParameterInfo_::ParameterFlags_::kIsBypass, 0);
        assert_ne!(info.flags & ParameterInfo_::ParameterFlags_::kIsList, 0);
        assert_ne!(info.flags & ParameterInfo_::ParameterFlags_::kCanAutomate, 0);
    }

    #[test]
    fn test_read_only_not_automatable() {
        let flags = ParameterFlags {
            read_only: true,
            ..ParameterFlags::default()
        };
        let descriptor = ParameterDescriptor::new(2, "Meter", 0.0..=1.0)
            .unwrap()
            .with_flags(flags);
        let mut info = zeroed_info();
        Vst3Parameter::new(&descriptor).fill_info(&mut info);

        assert_eq!(info.flags, ParameterInfo_::ParameterFlags_::kIsReadOnly);
    }

    #[test]
    fn test_parameter_info_by_index() {
        let list = ParameterList::from_descriptors([
            ParameterDescriptor::new(10, "A", 0.0..=1.0).unwrap(),
            ParameterDescriptor::new(20, "B", 0.0..=1.0).unwrap(),
        ])
        .unwrap();
        let mut info = zeroed_info();

        assert_eq!(unsafe { parameter_info(&list, 1, &mut info) }, kResultOk);
        assert_eq!(info.id, 20);
        assert_eq!(unsafe { parameter_info(&list, 2, &mut info) }, kInvalidArgument);
        assert_eq!(unsafe { parameter_info(&list, -1, &mut info) }, kInvalidArgument);
        assert_eq!(
            unsafe { parameter_info(&list, 0, std::ptr::null_mut()) },
            kInvalidArgument
        );
    }

    #[test]
    fn test_conversions_delegate() {
        let descriptor = ParameterDescriptor::new(3, "Gain", -60.0..=12.0).unwrap();
        let parameter = Vst3Parameter::new(&descriptor);
        assert_approx_eq!(parameter.normalized_to_plain(0.5), -24.0);
        assert_approx_eq!(parameter.plain_to_normalized(12.0), 1.0);
        for x in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert_approx_eq!(parameter.plain_to_normalized(parameter.normalized_to_plain(x)), x);
        }
    }
}
