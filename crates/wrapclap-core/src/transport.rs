//! Transport conversion.
//!
//! The host describes its timeline with validity bits and real-valued beat
//! positions ([`HostTimeline`]). The target expects fixed-point beat times and
//! its own flag set. [`TransportSnapshot::from_host`] performs that mapping
//! once per block:
//!
//! | host bit | target flag |
//! |---|---|
//! | playing | [`TransportFlags::IS_PLAYING`] |
//! | recording | [`TransportFlags::IS_RECORDING`] |
//! | cycle active | [`TransportFlags::IS_LOOP_ACTIVE`] |
//! | tempo valid | [`TransportFlags::HAS_TEMPO`] |
//! | bar position valid | [`TransportFlags::HAS_BEATS_TIMELINE`] |
//! | time signature valid | [`TransportFlags::HAS_TIME_SIGNATURE`] |
//!
//! The remaining host bits have no target counterpart and are ignored. The
//! host carries no seconds-based position, so every seconds field is zero.

use crate::host::{HostTimeline, HostTransportState};
use crate::types::{BeatTime, SecTime};

/// Fixed-point scale for beat positions (1.0 beat = `BEAT_TIME_SCALE`).
pub const BEAT_TIME_SCALE: i64 = 1 << 31;

/// Convert a real-valued beat position to fixed point.
#[inline]
pub fn beat_time(beats: f64) -> BeatTime {
    (beats * BEAT_TIME_SCALE as f64).round() as BeatTime
}

// =============================================================================
// TransportFlags
// =============================================================================

/// Target transport flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportFlags(u32);

impl TransportFlags {
    pub const HAS_TEMPO: Self = Self(1 << 0);
    pub const HAS_BEATS_TIMELINE: Self = Self(1 << 1);
    pub const HAS_SECONDS_TIMELINE: Self = Self(1 << 2);
    pub const HAS_TIME_SIGNATURE: Self = Self(1 << 3);
    pub const IS_PLAYING: Self = Self(1 << 4);
    pub const IS_RECORDING: Self = Self(1 << 5);
    pub const IS_LOOP_ACTIVE: Self = Self(1 << 6);
    pub const IS_WITHIN_PRE_ROLL: Self = Self(1 << 7);

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

/// Fixed mapping from host state bits to target flags.
const FLAG_MAP: [(HostTransportState, TransportFlags); 6] = [
    (HostTransportState::PLAYING, TransportFlags::IS_PLAYING),
    (HostTransportState::RECORDING, TransportFlags::IS_RECORDING),
    (HostTransportState::CYCLE_ACTIVE, TransportFlags::IS_LOOP_ACTIVE),
    (HostTransportState::TEMPO_VALID, TransportFlags::HAS_TEMPO),
    (
        HostTransportState::BAR_POSITION_VALID,
        TransportFlags::HAS_BEATS_TIMELINE,
    ),
    (
        HostTransportState::TIME_SIG_VALID,
        TransportFlags::HAS_TIME_SIGNATURE,
    ),
];

// =============================================================================
// TransportSnapshot
// =============================================================================

/// Timeline state for one block, in the target's representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSnapshot {
    pub flags: TransportFlags,
    pub song_pos_beats: BeatTime,
    pub song_pos_seconds: SecTime,
    /// Tempo in beats per minute.
    pub tempo: f64,
    /// Tempo increment per sample. The host gives none, always 0.
    pub tempo_inc: f64,
    pub loop_start_beats: BeatTime,
    pub loop_end_beats: BeatTime,
    pub loop_start_seconds: SecTime,
    pub loop_end_seconds: SecTime,
    /// Start of the current bar.
    pub bar_start: BeatTime,
    pub bar_number: i32,
    pub time_sig_numerator: u16,
    pub time_sig_denominator: u16,
}

impl Default for TransportSnapshot {
    fn default() -> Self {
        Self {
            flags: TransportFlags::empty(),
            song_pos_beats: 0,
            song_pos_seconds: 0,
            tempo: 0.0,
            tempo_inc: 0.0,
            loop_start_beats: 0,
            loop_end_beats: 0,
            loop_start_seconds: 0,
            loop_end_seconds: 0,
            bar_start: 0,
            bar_number: 0,
            time_sig_numerator: 4,
            time_sig_denominator: 4,
        }
    }
}

impl TransportSnapshot {
    /// Translate the host timeline for the current block.
    pub fn from_host(timeline: &HostTimeline) -> Self {
        let state = timeline.state;

        let mut flags = TransportFlags::empty();
        for (host_bit, flag) in FLAG_MAP {
            if state.contains(host_bit) {
                flags.insert(flag);
            }
        }

        // 4/4 unless the host vouches for its signature
        let (time_sig_numerator, time_sig_denominator) =
            if state.contains(HostTransportState::TIME_SIG_VALID) {
                (
                    clamp_signature(timeline.time_sig_numerator),
                    clamp_signature(timeline.time_sig_denominator),
                )
            } else {
                (4, 4)
            };

        let bar_start = if state.contains(HostTransportState::BAR_POSITION_VALID) {
            beat_time(timeline.bar_position_music)
        } else {
            0
        };

        Self {
            flags,
            song_pos_beats: beat_time(timeline.project_time_music),
            song_pos_seconds: 0,
            tempo: timeline.tempo,
            tempo_inc: 0.0,
            loop_start_beats: beat_time(timeline.cycle_start_music),
            loop_end_beats: beat_time(timeline.cycle_end_music),
            loop_start_seconds: 0,
            loop_end_seconds: 0,
            bar_start,
            bar_number: 0,
            time_sig_numerator,
            time_sig_denominator,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.flags.contains(TransportFlags::IS_PLAYING)
    }
}

fn clamp_signature(value: i32) -> u16 {
    u16::try_from(value).unwrap_or(if value < 0 { 0 } else { u16::MAX })
}
