//! The VST3 `process` entry.
//!
//! Turns a `ProcessData` into a [`HostBlock`] and runs it through the
//! adapter. Only the 32-bit sample path and the main output bus are wired.

use vst3::Steinberg::Vst::{ProcessContext, ProcessData};
use vst3::Steinberg::{kInvalidArgument, kResultOk, tresult};

use wrapclap_core::{
    HostAudioBus, HostBlock, HostTimeline, HostTransportState, ParameterRegistry, ProcessAdapter,
    TargetPlugin,
};

use crate::events::Vst3EventList;
use crate::parameter_changes::Vst3ParameterChanges;

/// Copy the fields of a VST3 `ProcessContext` the adapter translates.
pub fn timeline_from_context(ctx: &ProcessContext) -> HostTimeline {
    HostTimeline {
        state: HostTransportState::from_bits(ctx.state),
        project_time_samples: ctx.projectTimeSamples,
        project_time_music: ctx.projectTimeMusic,
        bar_position_music: ctx.barPositionMusic,
        cycle_start_music: ctx.cycleStartMusic,
        cycle_end_music: ctx.cycleEndMusic,
        tempo: ctx.tempo,
        time_sig_numerator: ctx.timeSigNumerator,
        time_sig_denominator: ctx.timeSigDenominator,
    }
}

/// Run one VST3 processing call through `adapter` into `target`.
///
/// Returns `kInvalidArgument` for a null `data`, otherwise `kResultOk`
/// whatever the target reports.
///
/// # Safety
/// `data` must be null or point to a `ProcessData` whose pointers are valid
/// for the duration of the call, as the host guarantees inside
/// `IAudioProcessor::process`.
pub unsafe fn process<R, T>(
    adapter: &mut ProcessAdapter<R>,
    data: *mut ProcessData,
    target: &mut T,
) -> tresult
where
    R: ParameterRegistry,
    T: TargetPlugin + ?Sized,
{
    if data.is_null() {
        return kInvalidArgument;
    }
    let process_data = &*data;

    let timeline = if process_data.processContext.is_null() {
        None
    } else {
        Some(timeline_from_context(&*process_data.processContext))
    };

    let output = if process_data.numOutputs > 0 && !process_data.outputs.is_null() {
        let bus = &*process_data.outputs;
        let channel_buffers = bus.__field0.channelBuffers32;
        if bus.numChannels > 0 && !channel_buffers.is_null() {
            Some(HostAudioBus {
                channel_buffers,
                channel_count: bus.numChannels as u32,
            })
        } else {
            None
        }
    } else {
        None
    };

    let events = Vst3EventList::from_raw(process_data.inputEvents);
    let parameter_changes = Vst3ParameterChanges::from_raw(process_data.inputParameterChanges);

    let block = HostBlock {
        frames: process_data.numSamples.max(0) as u32,
        timeline: timeline.as_ref(),
        output,
        events: events.as_ref(),
        parameter_changes: parameter_changes.as_ref(),
    };

    // Every target status is a successful call from the host's point of view
    adapter.process(&block, target);
    kResultOk
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;
    use std::sync::Arc;

    use vst3::Steinberg::Vst::AudioBusBuffers;
    use wrapclap_core::{
        beat_time, AdapterConfig, ParameterList, ProcessBlock, ProcessStatus, TransportFlags,
        TransportSnapshot,
    };

    const K_PLAYING: u32 = 1 << 1;
    const K_TEMPO_VALID: u32 = 1 << 10;

    #[derive(Default)]
    struct Probe {
        calls: u32,
        frames: u32,
        steady_time: i64,
        transport: Option<TransportSnapshot>,
        output_channels: Option<u32>,
        status: Option<ProcessStatus>,
    }

    impl TargetPlugin for Probe {
        fn process(&mut self, block: &mut ProcessBlock<'_>) -> ProcessStatus {
            self.calls += 1;
            self.frames = block.frames_count;
            self.steady_time = block.steady_time;
            self.transport = block.transport.copied();
            self.output_channels = block.audio_outputs.first().map(|b| b.channel_count);
            self.status.unwrap_or(ProcessStatus::Continue)
        }
    }

    fn adapter() -> ProcessAdapter {
        let mut adapter = ProcessAdapter::new();
        adapter
            .configure(AdapterConfig::default(), Arc::new(ParameterList::new()))
            .unwrap();
        adapter
    }

    #[test]
    fn test_null_data_rejected() {
        let mut probe = Probe::default();
        let result = unsafe { process(&mut adapter(), ptr::null_mut(), &mut probe) };
        assert_eq!(result, kInvalidArgument);
        assert_eq!(probe.calls, 0);
    }

    #[test]
    fn test_context_and_output_forwarded() {
        let mut left = [0.0f32; 32];
        let mut right = [0.0f32; 32];
        let mut channels = [left.as_mut_ptr(), right.as_mut_ptr()];

        unsafe {
            let mut bus: AudioBusBuffers = std::mem::zeroed();
            bus.numChannels = 2;
            bus.__field0.channelBuffers32 = channels.as_mut_ptr();

            let mut context: ProcessContext = std::mem::zeroed();
            context.state = K_PLAYING | K_TEMPO_VALID;
            context.tempo = 120.0;
            context.projectTimeMusic = 2.0;
            context.projectTimeSamples = 96_000;

            let mut data: ProcessData = std::mem::zeroed();
            data.numSamples = 32;
            data.numOutputs = 1;
            data.outputs = &mut bus;
            data.processContext = &mut context;

            let mut probe = Probe {
                status: Some(ProcessStatus::Sleep),
                ..Probe::default()
            };
            let result = process(&mut adapter(), &mut data, &mut probe);

            assert_eq!(result, kResultOk);
            assert_eq!(probe.calls, 1);
            assert_eq!(probe.frames, 32);
            assert_eq!(probe.steady_time, 96_000);
            assert_eq!(probe.output_channels, Some(2));

            let transport = probe.transport.unwrap();
            assert_eq!(
                transport.flags.bits(),
                TransportFlags::IS_PLAYING.bits() | TransportFlags::HAS_TEMPO.bits()
            );
            assert_eq!(transport.song_pos_beats, beat_time(2.0));
        }
    }

    #[test]
    fn test_bare_process_data() {
        let mut data: ProcessData = unsafe { std::mem::zeroed() };
        data.numSamples = 16;
        let mut probe = Probe::default();
        let result = unsafe { process(&mut adapter(), &mut data, &mut probe) };

        assert_eq!(result, kResultOk);
        assert_eq!(probe.frames, 16);
        assert!(probe.transport.is_none());
        assert_eq!(probe.output_channels, None);
    }

    #[test]
    fn test_timeline_copy() {
        let mut context: ProcessContext = unsafe { std::mem::zeroed() };
        context.state = 1 << 13;
        context.timeSigNumerator = 3;
        context.timeSigDenominator = 4;
        context.cycleStartMusic = 1.0;
        context.cycleEndMusic = 5.0;
        context.barPositionMusic = 4.0;

        let timeline = timeline_from_context(&context);
        assert!(timeline.state.contains(HostTransportState::TIME_SIG_VALID));
        assert_eq!(timeline.time_sig_numerator, 3);
        assert_eq!(timeline.cycle_end_music, 5.0);
        assert_eq!(timeline.bar_position_music, 4.0);
    }
}
