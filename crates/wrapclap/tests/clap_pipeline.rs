//! End-to-end: VST3 `ProcessData` through the bridge into a CLAP plugin.

use std::ffi::{c_char, c_void, CStr};
use std::{mem, ptr};

use wrapclap::clap_impl::clap_sys::events::{
    clap_event_header, clap_event_param_value, CLAP_EVENT_MIDI_SYSEX, CLAP_EVENT_NOTE_ON,
    CLAP_EVENT_PARAM_VALUE, CLAP_TRANSPORT_HAS_TEMPO, CLAP_TRANSPORT_IS_PLAYING,
};
use wrapclap::clap_impl::clap_sys::ext::params::{
    clap_param_info, clap_plugin_params, CLAP_EXT_PARAMS, CLAP_PARAM_IS_AUTOMATABLE,
};
use wrapclap::clap_impl::clap_sys::plugin::clap_plugin;
use wrapclap::clap_impl::clap_sys::process::{
    clap_process, clap_process_status, CLAP_PROCESS_CONTINUE,
};
use wrapclap::prelude::*;
use wrapclap::vst3_impl::vst3::Steinberg::Vst::{
    AudioBusBuffers, Event, IEventList, IEventListTrait, IParamValueQueue, IParamValueQueueTrait,
    IParameterChanges, IParameterChangesTrait, ParamID, ParamValue, ProcessContext, ProcessData,
};
use wrapclap::vst3_impl::vst3::Steinberg::{int32, kInvalidArgument, kResultOk, tresult};
use wrapclap::vst3_impl::vst3::{Class, ComWrapper};

// =============================================================================
// Fake CLAP plugin
// =============================================================================

const CONTROLS: [(u32, &str, f64, f64); 2] = [(1, "Gain", -60.0, 0.0), (2, "Mix", 0.0, 100.0)];

#[derive(Default)]
struct Observed {
    events: Vec<(u32, u16)>,
    param_values: Vec<(u32, f64)>,
    transport_flags: Option<u32>,
    frames: u32,
    calls: u32,
}

struct FakeClap {
    params: clap_plugin_params,
    observed: Observed,
}

unsafe fn fake_state<'a>(plugin: *const clap_plugin) -> &'a mut FakeClap {
    &mut *((*plugin).plugin_data as *mut FakeClap)
}

unsafe extern "C" fn params_count(_plugin: *const clap_plugin) -> u32 {
    CONTROLS.len() as u32
}

unsafe extern "C" fn params_get_info(
    _plugin: *const clap_plugin,
    index: u32,
    info: *mut clap_param_info,
) -> bool {
    let Some(&(id, name, min, max)) = CONTROLS.get(index as usize) else {
        return false;
    };
    let info = &mut *info;
    info.id = id;
    info.flags = CLAP_PARAM_IS_AUTOMATABLE;
    for (dst, src) in info.name.iter_mut().zip(name.bytes()) {
        *dst = src as c_char;
    }
    info.min_value = min;
    info.max_value = max;
    info.default_value = min;
    true
}

unsafe extern "C" fn get_extension(plugin: *const clap_plugin, id: *const c_char) -> *const c_void {
    if CStr::from_ptr(id) == CLAP_EXT_PARAMS {
        &fake_state(plugin).params as *const clap_plugin_params as *const c_void
    } else {
        ptr::null()
    }
}

unsafe extern "C" fn clap_process_fn(
    plugin: *const clap_plugin,
    process: *const clap_process,
) -> clap_process_status {
    let observed = &mut fake_state(plugin).observed;
    let process = &*process;
    observed.calls += 1;
    observed.frames = process.frames_count;
    observed.transport_flags = process.transport.as_ref().map(|t| t.flags);

    let in_events = &*process.in_events;
    for index in 0..in_events.size.unwrap()(in_events) {
        let header: *const clap_event_header = in_events.get.unwrap()(in_events, index);
        observed.events.push(((*header).time, (*header).type_));
        if (*header).type_ == CLAP_EVENT_PARAM_VALUE {
            let param = &*(header as *const clap_event_param_value);
            observed.param_values.push((param.param_id, param.value));
        }
    }

    // Echo the first input event back to the host
    let out_events = &*process.out_events;
    if in_events.size.unwrap()(in_events) > 0 {
        out_events.try_push.unwrap()(out_events, in_events.get.unwrap()(in_events, 0));
    }
    CLAP_PROCESS_CONTINUE
}

fn fake_clap() -> Box<FakeClap> {
    let mut params: clap_plugin_params = unsafe { mem::zeroed() };
    params.count = Some(params_count);
    params.get_info = Some(params_get_info);
    Box::new(FakeClap {
        params,
        observed: Observed::default(),
    })
}

fn clap_instance(state: &mut FakeClap) -> clap_plugin {
    let mut plugin: clap_plugin = unsafe { mem::zeroed() };
    plugin.plugin_data = state as *mut FakeClap as *mut c_void;
    plugin.get_extension = Some(get_extension);
    plugin.process = Some(clap_process_fn);
    plugin
}

// =============================================================================
// Fake VST3 host objects
// =============================================================================

const K_NOTE_ON_EVENT: u16 = 0;
const K_DATA_EVENT: u16 = 2;

struct HostEvents(Vec<Event>);

impl Class for HostEvents {
    type Interfaces = (IEventList,);
}

impl IEventListTrait for HostEvents {
    unsafe fn getEventCount(&self) -> int32 {
        self.0.len() as int32
    }

    unsafe fn getEvent(&self, index: int32, e: *mut Event) -> tresult {
        match self.0.get(index as usize) {
            Some(event) => {
                ptr::write(e, ptr::read(event));
                kResultOk
            }
            None => kInvalidArgument,
        }
    }

    unsafe fn addEvent(&self, _e: *mut Event) -> tresult {
        kInvalidArgument
    }
}

struct HostQueue {
    id: ParamID,
    points: Vec<(int32, ParamValue)>,
}

impl Class for HostQueue {
    type Interfaces = (IParamValueQueue,);
}

impl IParamValueQueueTrait for HostQueue {
    unsafe fn getParameterId(&self) -> ParamID {
        self.id
    }

    unsafe fn getPointCount(&self) -> int32 {
        self.points.len() as int32
    }

    unsafe fn getPoint(
        &self,
        index: int32,
        sample_offset: *mut int32,
        value: *mut ParamValue,
    ) -> tresult {
        match self.points.get(index as usize) {
            Some(&(offset, point)) => {
                *sample_offset = offset;
                *value = point;
                kResultOk
            }
            None => kInvalidArgument,
        }
    }

    unsafe fn addPoint(&self, _offset: int32, _value: ParamValue, _index: *mut int32) -> tresult {
        kInvalidArgument
    }
}

struct HostChanges(Vec<ComWrapper<HostQueue>>);

impl Class for HostChanges {
    type Interfaces = (IParameterChanges,);
}

impl IParameterChangesTrait for HostChanges {
    unsafe fn getParameterCount(&self) -> int32 {
        self.0.len() as int32
    }

    unsafe fn getParameterData(&self, index: int32) -> *mut IParamValueQueue {
        self.0
            .get(index as usize)
            .and_then(|queue| queue.as_com_ref::<IParamValueQueue>())
            .map_or(ptr::null_mut(), |queue| queue.as_ptr())
    }

    unsafe fn addParameterData(&self, _id: *const ParamID, _index: *mut int32) -> *mut IParamValueQueue {
        ptr::null_mut()
    }
}

fn note_on(offset: i32, pitch: i16) -> Event {
    let mut event: Event = unsafe { mem::zeroed() };
    event.r#type = K_NOTE_ON_EVENT;
    event.sampleOffset = offset;
    event.__field0.noteOn.pitch = pitch;
    event.__field0.noteOn.velocity = 0.8;
    event.__field0.noteOn.noteId = -1;
    event
}

fn sysex(offset: i32, bytes: &'static [u8]) -> Event {
    let mut event: Event = unsafe { mem::zeroed() };
    event.r#type = K_DATA_EVENT;
    event.sampleOffset = offset;
    event.__field0.data.r#type = 0;
    event.__field0.data.size = bytes.len() as u32;
    event.__field0.data.bytes = bytes.as_ptr();
    event
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_full_block() {
    static SYSEX: [u8; 3] = [0xF0, 0x01, 0xF7];

    let mut state = fake_clap();
    let plugin = clap_instance(&mut state);
    let mut bridge = unsafe { Bridge::new(&plugin, AdapterConfig::new(0, 2)) }.unwrap();
    assert_eq!(bridge.parameters().len(), 2);

    let mut unknown = note_on(0, 0);
    unknown.r#type = 7;
    let events = ComWrapper::new(HostEvents(vec![
        note_on(30, 64),
        sysex(30, &SYSEX),
        unknown,
        note_on(10, 60),
    ]));
    let changes = ComWrapper::new(HostChanges(vec![
        ComWrapper::new(HostQueue {
            id: 2,
            points: vec![(5, 0.2), (30, 0.5)],
        }),
        ComWrapper::new(HostQueue {
            id: 99,
            points: vec![(0, 1.0)],
        }),
    ]));

    let mut left = [0.0f32; 64];
    let mut right = [0.0f32; 64];
    let mut channels = [left.as_mut_ptr(), right.as_mut_ptr()];

    let status = unsafe {
        let mut bus: AudioBusBuffers = mem::zeroed();
        bus.numChannels = 2;
        bus.__field0.channelBuffers32 = channels.as_mut_ptr();

        let mut context: ProcessContext = mem::zeroed();
        context.state = (1 << 1) | (1 << 10);
        context.tempo = 128.0;

        let mut data: ProcessData = mem::zeroed();
        data.numSamples = 64;
        data.numOutputs = 1;
        data.outputs = &mut bus;
        data.processContext = &mut context;
        data.inputEvents = events.as_com_ref::<IEventList>().unwrap().as_ptr();
        data.inputParameterChanges = changes.as_com_ref::<IParameterChanges>().unwrap().as_ptr();

        bridge.process(&mut data)
    };
    assert_eq!(status, kResultOk);

    let observed = &state.observed;
    assert_eq!(observed.calls, 1);
    assert_eq!(observed.frames, 64);
    assert_eq!(
        observed.events,
        vec![
            (10, CLAP_EVENT_NOTE_ON),
            (30, CLAP_EVENT_NOTE_ON),
            (30, CLAP_EVENT_MIDI_SYSEX),
            (30, CLAP_EVENT_PARAM_VALUE),
        ]
    );
    assert_eq!(observed.param_values.len(), 1);
    assert_eq!(observed.param_values[0].0, 2);
    assert!((observed.param_values[0].1 - 50.0).abs() < 1e-9);
    assert_eq!(
        observed.transport_flags,
        Some(CLAP_TRANSPORT_IS_PLAYING | CLAP_TRANSPORT_HAS_TEMPO)
    );

    assert_eq!(bridge.adapter().input_event_count(), 0);
    assert_eq!(bridge.adapter().accepted_output_events(), 1);
    assert!(!bridge.adapter().overflowed());
}

#[test]
fn test_null_process_data() {
    let mut state = fake_clap();
    let plugin = clap_instance(&mut state);
    let mut bridge = unsafe { Bridge::new(&plugin, AdapterConfig::default()) }.unwrap();

    assert_eq!(unsafe { bridge.process(ptr::null_mut()) }, kInvalidArgument);
    assert_eq!(state.observed.calls, 0);
}

#[test]
fn test_reconfigure_validates() {
    let mut state = fake_clap();
    let plugin = clap_instance(&mut state);
    let mut bridge = unsafe { Bridge::new(&plugin, AdapterConfig::default()) }.unwrap();

    assert!(bridge
        .reconfigure(AdapterConfig::default().with_input_event_capacity(0))
        .is_err());
    assert!(bridge
        .reconfigure(AdapterConfig::new(2, 2).with_input_event_capacity(1024))
        .is_ok());
    assert_eq!(bridge.adapter().config().input_event_capacity, 1024);
}

#[test]
fn test_bridge_setup_errors() {
    let err = unsafe { Bridge::new(ptr::null(), AdapterConfig::default()) }.err();
    assert_eq!(err, Some(AdapterError::NullPlugin));

    let mut state = fake_clap();
    let mut plugin = clap_instance(&mut state);
    plugin.get_extension = None;
    let err = unsafe { Bridge::new(&plugin, AdapterConfig::default()) }.err();
    assert_eq!(err, Some(AdapterError::MissingExtension("clap.params")));
}

#[test]
fn test_parameter_info_exposed() {
    use wrapclap::vst3_impl::vst3::Steinberg::Vst::ParameterInfo;

    let mut state = fake_clap();
    let plugin = clap_instance(&mut state);
    let bridge = unsafe { Bridge::new(&plugin, AdapterConfig::default()) }.unwrap();

    let mut info: ParameterInfo = unsafe { mem::zeroed() };
    assert_eq!(unsafe { bridge.parameter_info(1, &mut info) }, kResultOk);
    assert_eq!(info.id, 2);
    let len = info.title.iter().position(|&c| c == 0).unwrap();
    let title: Vec<u16> = info.title[..len].iter().map(|&c| c as u16).collect();
    assert_eq!(String::from_utf16(&title).unwrap(), "Mix");
}
