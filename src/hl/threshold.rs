//! Threshold profile extraction
//!
//! Each channel stores a 12-stage sensitivity curve in its Px_THR_0..14
//! registers: six bytes of time nibbles (T1..T12), five bytes of packed
//! 5-bit levels (L1..L8) and four full-byte levels (L9..L12).

use crate::ll::{hi_nibble, lo_nibble, ConfigFrame};
use crate::time::{self, nibble_to_us};

use super::Channel;

/// Number of stages in a threshold profile
pub const THRESHOLD_STAGES: usize = 12;

/// One stage of a threshold profile
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage {
    /// Stage number, 1..=12
    pub stage: u8,
    /// Duration of this stage in microseconds
    pub delta_us: u32,
    /// Time-of-flight at the end of this stage in microseconds
    pub cumulative_us: u32,
    /// One-way distance at the end of this stage in centimeters
    pub distance_cm: f64,
    /// Raw threshold level (5-bit for stages 1..=8, 8-bit for 9..=12)
    pub value_raw: u8,
    /// Threshold level as percentage of the stage's full scale
    pub value_pct: f64,
}

/// Per-channel threshold/sensitivity curve
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdProfile {
    /// Channel this profile belongs to
    pub channel: Channel,
    /// The 12 stages, in time order
    pub stages: [Stage; THRESHOLD_STAGES],
}

impl ThresholdProfile {
    /// Decodes the threshold profile of `channel` at the default speed of
    /// sound ([`time::SPEED_OF_SOUND_M_S`])
    pub fn decode(frame: &ConfigFrame, channel: Channel) -> Self {
        Self::decode_with_speed_of_sound(frame, channel, time::SPEED_OF_SOUND_M_S)
    }

    /// Decodes the threshold profile of `channel`, converting distances at
    /// the given speed of sound
    ///
    /// This never fails: every 55-byte frame decodes to a complete profile.
    pub fn decode_with_speed_of_sound(
        frame: &ConfigFrame,
        channel: Channel,
        speed_of_sound_m_s: f64,
    ) -> Self {
        let bytes = frame.as_bytes();
        let base = channel.thr_base();

        // Px_THR_0..5: two time nibbles per byte, high nibble first.
        let mut delta_us = [0u32; THRESHOLD_STAGES];
        for i in 0..6 {
            let byte = bytes[base + i];
            delta_us[i * 2] = nibble_to_us(hi_nibble(byte));
            delta_us[i * 2 + 1] = nibble_to_us(lo_nibble(byte));
        }

        // Px_THR_6..10: L1..L8 as eight 5-bit groups of a 40-bit MSB-first
        // bitstream, most-significant group first.
        let mut packed: u64 = 0;
        for i in 0..5 {
            packed = (packed << 8) | bytes[base + 6 + i] as u64;
        }
        let mut value_raw = [0u8; THRESHOLD_STAGES];
        for i in 0..8 {
            let shift = (40 - 5) - i * 5;
            value_raw[i] = ((packed >> shift) & 0x1f) as u8;
        }

        // Px_THR_11..14: L9..L12 as full bytes.
        for i in 0..4 {
            value_raw[8 + i] = bytes[base + 11 + i];
        }

        let mut stages = [Stage {
            stage: 0,
            delta_us: 0,
            cumulative_us: 0,
            distance_cm: 0.0,
            value_raw: 0,
            value_pct: 0.0,
        }; THRESHOLD_STAGES];

        let mut cumulative_us = 0;
        for i in 0..THRESHOLD_STAGES {
            let stage = (i + 1) as u8;
            cumulative_us += delta_us[i];
            stages[i] = Stage {
                stage,
                delta_us: delta_us[i],
                cumulative_us,
                distance_cm: time::tof_us_to_cm(cumulative_us, speed_of_sound_m_s),
                value_raw: value_raw[i],
                value_pct: time::value_to_pct(stage, value_raw[i]),
            };
        }

        ThresholdProfile { channel, stages }
    }
}
