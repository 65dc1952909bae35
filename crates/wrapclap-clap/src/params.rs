//! Reading a CLAP plugin's controls into parameter descriptors.

use std::mem;

use clap_sys::ext::params::{
    clap_param_info, clap_plugin_params, CLAP_EXT_PARAMS, CLAP_PARAM_IS_AUTOMATABLE,
    CLAP_PARAM_IS_BYPASS, CLAP_PARAM_IS_HIDDEN, CLAP_PARAM_IS_PERIODIC, CLAP_PARAM_IS_READONLY,
    CLAP_PARAM_IS_STEPPED,
};
use clap_sys::plugin::clap_plugin;
use log::{debug, warn};

use wrapclap_core::{
    AdapterError, AdapterResult, Cookie, ParameterDescriptor, ParameterFlags, ParameterList,
};

use crate::util::c_char_array_to_string;

const EXT_PARAMS_NAME: &str = "clap.params";

/// Build a descriptor from a CLAP control description.
///
/// Fails if the declared range is empty, inverted or not finite.
pub fn descriptor_from_clap_info(info: &clap_param_info) -> AdapterResult<ParameterDescriptor> {
    let flags = ParameterFlags {
        automatable: info.flags & CLAP_PARAM_IS_AUTOMATABLE != 0,
        stepped: info.flags & CLAP_PARAM_IS_STEPPED != 0,
        read_only: info.flags & CLAP_PARAM_IS_READONLY != 0,
        hidden: info.flags & CLAP_PARAM_IS_HIDDEN != 0,
        bypass: info.flags & CLAP_PARAM_IS_BYPASS != 0,
        periodic: info.flags & CLAP_PARAM_IS_PERIODIC != 0,
    };

    let descriptor = ParameterDescriptor::new(
        info.id,
        c_char_array_to_string(&info.name),
        info.min_value..=info.max_value,
    )?
    .with_cookie(Cookie::new(info.cookie))
    .with_default(info.default_value)
    .with_module(c_char_array_to_string(&info.module))
    .with_flags(flags);

    Ok(descriptor)
}

/// Read every control `plugin` declares through its params extension.
///
/// Controls whose info cannot be fetched or whose range is invalid are
/// skipped with a warning. A repeated id fails the whole import.
///
/// # Safety
/// `plugin` must point to an initialized `clap_plugin`, and this must be
/// called on the plugin's main thread.
pub unsafe fn read_parameters(plugin: *const clap_plugin) -> AdapterResult<ParameterList> {
    let params = params_extension(plugin).ok_or(AdapterError::MissingExtension(EXT_PARAMS_NAME))?;
    let (Some(count), Some(get_info)) = (params.count, params.get_info) else {
        return Err(AdapterError::MissingExtension(EXT_PARAMS_NAME));
    };

    let mut list = ParameterList::new();
    for index in 0..count(plugin) {
        let mut info: clap_param_info = mem::zeroed();
        if !get_info(plugin, index, &mut info) {
            warn!("Skipping parameter at index {}: get_info failed", index);
            continue;
        }

        match descriptor_from_clap_info(&info) {
            Ok(descriptor) => list.push(descriptor)?,
            Err(err) => warn!("Skipping parameter at index {}: {}", index, err),
        }
    }

    debug!("Imported {} parameters", list.len());
    Ok(list)
}

unsafe fn params_extension<'a>(plugin: *const clap_plugin) -> Option<&'a clap_plugin_params> {
    if plugin.is_null() {
        return None;
    }
    let get_extension = (*plugin).get_extension?;
    let params = get_extension(plugin, CLAP_EXT_PARAMS.as_ptr()) as *const clap_plugin_params;
    params.as_ref()
}
