//! `clap_event_transport` from a transport snapshot.

use std::mem;

use clap_sys::events::{
    clap_event_header, clap_event_transport, CLAP_CORE_EVENT_SPACE_ID, CLAP_EVENT_TRANSPORT,
    CLAP_TRANSPORT_HAS_BEATS_TIMELINE, CLAP_TRANSPORT_HAS_SECONDS_TIMELINE,
    CLAP_TRANSPORT_HAS_TEMPO, CLAP_TRANSPORT_HAS_TIME_SIGNATURE, CLAP_TRANSPORT_IS_LOOP_ACTIVE,
    CLAP_TRANSPORT_IS_PLAYING, CLAP_TRANSPORT_IS_RECORDING, CLAP_TRANSPORT_IS_WITHIN_PRE_ROLL,
};

use wrapclap_core::{TransportFlags, TransportSnapshot};

const FLAG_MAP: [(TransportFlags, u32); 8] = [
    (TransportFlags::HAS_TEMPO, CLAP_TRANSPORT_HAS_TEMPO),
    (TransportFlags::HAS_BEATS_TIMELINE, CLAP_TRANSPORT_HAS_BEATS_TIMELINE),
    (TransportFlags::HAS_SECONDS_TIMELINE, CLAP_TRANSPORT_HAS_SECONDS_TIMELINE),
    (TransportFlags::HAS_TIME_SIGNATURE, CLAP_TRANSPORT_HAS_TIME_SIGNATURE),
    (TransportFlags::IS_PLAYING, CLAP_TRANSPORT_IS_PLAYING),
    (TransportFlags::IS_RECORDING, CLAP_TRANSPORT_IS_RECORDING),
    (TransportFlags::IS_LOOP_ACTIVE, CLAP_TRANSPORT_IS_LOOP_ACTIVE),
    (TransportFlags::IS_WITHIN_PRE_ROLL, CLAP_TRANSPORT_IS_WITHIN_PRE_ROLL),
];

/// Lay out `snapshot` as the transport event of a `clap_process`.
pub fn transport_event(snapshot: &TransportSnapshot) -> clap_event_transport {
    let mut flags = 0;
    for (flag, clap_flag) in FLAG_MAP {
        if snapshot.flags.contains(flag) {
            flags |= clap_flag;
        }
    }

    clap_event_transport {
        header: clap_event_header {
            size: mem::size_of::<clap_event_transport>() as u32,
            time: 0,
            space_id: CLAP_CORE_EVENT_SPACE_ID,
            type_: CLAP_EVENT_TRANSPORT,
            flags: 0,
        },
        flags,
        song_pos_beats: snapshot.song_pos_beats,
        song_pos_seconds: snapshot.song_pos_seconds,
        tempo: snapshot.tempo,
        tempo_inc: snapshot.tempo_inc,
        loop_start_beats: snapshot.loop_start_beats,
        loop_end_beats: snapshot.loop_end_beats,
        loop_start_seconds: snapshot.loop_start_seconds,
        loop_end_seconds: snapshot.loop_end_seconds,
        bar_start: snapshot.bar_start,
        bar_number: snapshot.bar_number,
        tsig_num: snapshot.time_sig_numerator,
        tsig_denom: snapshot.time_sig_denominator,
    }
}
