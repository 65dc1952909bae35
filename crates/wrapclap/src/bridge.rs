//! One CLAP plugin behind one VST3 audio processor.

use std::sync::Arc;

use wrapclap_clap::clap_sys::plugin::clap_plugin;
use wrapclap_clap::{read_parameters, ClapPlugin};
use wrapclap_core::{AdapterConfig, AdapterError, AdapterResult, ParameterList, ProcessAdapter};
use wrapclap_vst3::vst3::Steinberg::tresult;
use wrapclap_vst3::vst3::Steinberg::Vst::{ParameterInfo, ProcessData};

/// Owns the adapter state for one wrapped plugin instance.
///
/// Lifecycle code needs two calls: [`new`](Self::new) while setting up
/// processing and [`process`](Self::process) from
/// `IAudioProcessor::process`.
pub struct Bridge {
    adapter: ProcessAdapter<ParameterList>,
    parameters: Arc<ParameterList>,
    plugin: ClapPlugin,
}

impl Bridge {
    /// Import the plugin's controls and configure the adapter.
    ///
    /// # Safety
    /// `plugin` must be null or point to an initialized, activated
    /// `clap_plugin` that outlives the bridge. Call on the main thread.
    pub unsafe fn new(plugin: *const clap_plugin, config: AdapterConfig) -> AdapterResult<Self> {
        let target = ClapPlugin::new(plugin, &config).ok_or(AdapterError::NullPlugin)?;
        let parameters = Arc::new(read_parameters(plugin)?);

        let mut adapter = ProcessAdapter::new();
        adapter.configure(config, Arc::clone(&parameters))?;

        log::debug!("Bridge ready with {} parameters", parameters.len());
        Ok(Self {
            adapter,
            parameters,
            plugin: target,
        })
    }

    /// Apply a new configuration. Call only while processing is stopped.
    pub fn reconfigure(&mut self, config: AdapterConfig) -> AdapterResult<()> {
        self.adapter.configure(config, Arc::clone(&self.parameters))?;
        self.plugin.reserve(&config);
        Ok(())
    }

    /// Body of `IAudioProcessor::process`.
    ///
    /// # Safety
    /// Same contract as [`wrapclap_vst3::process`].
    pub unsafe fn process(&mut self, data: *mut ProcessData) -> tresult {
        wrapclap_vst3::process(&mut self.adapter, data, &mut self.plugin)
    }

    /// Body of `IEditController::getParameterInfo`.
    ///
    /// # Safety
    /// `info` must be null or point to writable `ParameterInfo` storage.
    pub unsafe fn parameter_info(&self, index: i32, info: *mut ParameterInfo) -> tresult {
        wrapclap_vst3::parameter_info(&self.parameters, index, info)
    }

    #[inline]
    pub fn parameters(&self) -> &ParameterList {
        &self.parameters
    }

    #[inline]
    pub fn adapter(&self) -> &ProcessAdapter<ParameterList> {
        &self.adapter
    }
}
