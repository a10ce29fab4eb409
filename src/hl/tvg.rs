//! Time-varying-gain profile extraction
//!
//! TVGAIN0..2 hold six time nibbles (T0..T5) and TVGAIN3..6 hold five 6-bit
//! gains (G1..G5). G2 and G3 each straddle a register boundary; the
//! reconstruction lives on [`ConfigFrame`] so the split stays explicit.

use crate::ll::ConfigFrame;
use crate::time::{self, nibble_to_us};

/// Number of segments in a TVG profile
pub const TVG_SEGMENTS: usize = 6;

/// Full-scale value of a 6-bit TVG gain
pub const TVG_GAIN_MAX: u8 = 63;

/// One segment of a TVG profile
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Segment number, 1..=6
    pub segment: u8,
    /// Duration of this segment in microseconds
    pub delta_us: u32,
    /// Time-of-flight at the end of this segment in microseconds
    pub cumulative_us: u32,
    /// One-way distance at the end of this segment in centimeters
    pub distance_cm: f64,
    /// Raw 6-bit gain, 0..=63
    pub gain_raw: u8,
    /// Full-scale gain value, always [`TVG_GAIN_MAX`]
    pub gain_max: u8,
    /// Gain as percentage of full scale
    pub gain_pct: f64,
}

/// Flag bits of the TVGAIN6 register
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TvgFlags {
    /// The reserved bit (TVGAIN6 bit 1) is set; unexpected but not an error
    pub reserved: bool,
    /// Frequency shift enable (TVGAIN6 bit 0)
    pub freq_shift: bool,
}

/// Time-varying receiver gain curve
///
/// The curve has six time segments but only five distinct gain plateaus:
/// segment 6 holds the gain of segment 5.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TvgProfile {
    /// The 6 segments, in time order
    pub segments: [Segment; TVG_SEGMENTS],
    /// TVGAIN6 flag bits
    pub flags: TvgFlags,
}

impl TvgProfile {
    /// Decodes the TVG profile at the default speed of sound
    /// ([`time::SPEED_OF_SOUND_M_S`])
    pub fn decode(frame: &ConfigFrame) -> Self {
        Self::decode_with_speed_of_sound(frame, time::SPEED_OF_SOUND_M_S)
    }

    /// Decodes the TVG profile, converting distances at the given speed of
    /// sound
    ///
    /// This never fails: every 55-byte frame decodes to a complete profile.
    pub fn decode_with_speed_of_sound(frame: &ConfigFrame, speed_of_sound_m_s: f64) -> Self {
        let delta_us = [
            nibble_to_us(frame.tvgain0().tvg_t0()),
            nibble_to_us(frame.tvgain0().tvg_t1()),
            nibble_to_us(frame.tvgain1().tvg_t2()),
            nibble_to_us(frame.tvgain1().tvg_t3()),
            nibble_to_us(frame.tvgain2().tvg_t4()),
            nibble_to_us(frame.tvgain2().tvg_t5()),
        ];

        let gains = [
            frame.tvgain3().tvg_g1(),
            frame.tvg_g2(),
            frame.tvg_g3(),
            frame.tvgain5().tvg_g4(),
            frame.tvgain6().tvg_g5(),
        ];

        let mut segments = [Segment {
            segment: 0,
            delta_us: 0,
            cumulative_us: 0,
            distance_cm: 0.0,
            gain_raw: 0,
            gain_max: TVG_GAIN_MAX,
            gain_pct: 0.0,
        }; TVG_SEGMENTS];

        let mut cumulative_us = 0;
        for i in 0..TVG_SEGMENTS {
            cumulative_us += delta_us[i];

            // The last segment holds the final gain plateau.
            let gain_raw = gains[if i < 5 { i } else { 4 }];

            segments[i] = Segment {
                segment: (i + 1) as u8,
                delta_us: delta_us[i],
                cumulative_us,
                distance_cm: time::tof_us_to_cm(cumulative_us, speed_of_sound_m_s),
                gain_raw,
                gain_max: TVG_GAIN_MAX,
                gain_pct: gain_raw as f64 / TVG_GAIN_MAX as f64 * 100.0,
            };
        }

        TvgProfile {
            segments,
            flags: TvgFlags {
                reserved: frame.tvgain6().reserved() != 0,
                freq_shift: frame.tvgain6().freq_shift() != 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ll::FRAME_LEN;

    #[test]
    fn zero_frame_decodes_to_minimum_curve() {
        let frame = ConfigFrame::from([0u8; FRAME_LEN]);
        let profile = TvgProfile::decode(&frame);

        for (i, segment) in profile.segments.iter().enumerate() {
            assert_eq!(segment.segment as usize, i + 1);
            assert_eq!(segment.delta_us, 100);
            assert_eq!(segment.cumulative_us, 100 * (i as u32 + 1));
            assert_eq!(segment.gain_raw, 0);
            assert_eq!(segment.gain_max, TVG_GAIN_MAX);
            assert_eq!(segment.gain_pct, 0.0);
        }
        assert!(!profile.flags.reserved);
        assert!(!profile.flags.freq_shift);
    }

    #[test]
    fn gains_map_to_segments_with_final_hold() {
        // G1 = 1, G2 = 2, G3 = 3, G4 = 4, G5 = 5.
        let mut bytes = [0u8; FRAME_LEN];
        bytes[3] = (1 << 2) | 0b00; // TVGAIN3: G1, G2 upper bits
        bytes[4] = (2 << 4) | 0b0000; // TVGAIN4: G2 lower bits, G3 upper bits
        bytes[5] = (3 << 6) | 4; // TVGAIN5: G3 lower bits, G4
        bytes[6] = 5 << 2; // TVGAIN6: G5
        let frame = ConfigFrame::from(bytes);

        let profile = TvgProfile::decode(&frame);
        let gains: [u8; 6] = core::array::from_fn(|i| profile.segments[i].gain_raw);
        assert_eq!(gains, [1, 2, 3, 4, 5, 5]);
    }

    #[test]
    fn split_gains_reach_full_scale() {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[3] = 0b1111_1111;
        bytes[4] = 0b1111_1111;
        bytes[5] = 0b1100_0000;
        let frame = ConfigFrame::from(bytes);

        let profile = TvgProfile::decode(&frame);
        assert_eq!(profile.segments[0].gain_raw, 63);
        assert_eq!(profile.segments[1].gain_raw, 63);
        assert_eq!(profile.segments[2].gain_raw, 63);
        assert_eq!(profile.segments[1].gain_pct, 100.0);
        assert_eq!(profile.segments[3].gain_raw, 0);
    }

    #[test]
    fn g3_upper_bits_come_from_tvgain4_low_nibble() {
        // With TVGAIN4's low nibble clear, G3 keeps only the two bits
        // contributed by TVGAIN5[7:6].
        let mut bytes = [0u8; FRAME_LEN];
        bytes[3] = 0b1111_1111;
        bytes[4] = 0b1111_0000;
        bytes[5] = 0b1100_0000;
        let frame = ConfigFrame::from(bytes);

        let profile = TvgProfile::decode(&frame);
        assert_eq!(profile.segments[0].gain_raw, 63);
        assert_eq!(profile.segments[1].gain_raw, 63);
        assert_eq!(profile.segments[2].gain_raw, 0b00_0011);
    }

    #[test]
    fn time_nibbles_accumulate_high_nibble_first() {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = 0xf0; // T0 = 8000us, T1 = 100us
        bytes[1] = 0x09; // T2 = 100us, T3 = 2000us
        let frame = ConfigFrame::from(bytes);

        let profile = TvgProfile::decode(&frame);
        assert_eq!(profile.segments[0].delta_us, 8000);
        assert_eq!(profile.segments[1].delta_us, 100);
        assert_eq!(profile.segments[2].delta_us, 100);
        assert_eq!(profile.segments[3].delta_us, 2000);
        assert_eq!(profile.segments[3].cumulative_us, 10200);
    }

    #[test]
    fn flags_reflect_tvgain6_low_bits() {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[6] = 0b0000_0011;
        let frame = ConfigFrame::from(bytes);

        let profile = TvgProfile::decode(&frame);
        assert!(profile.flags.reserved);
        assert!(profile.flags.freq_shift);
        // The flag bits are not part of G5.
        assert_eq!(profile.segments[4].gain_raw, 0);
    }

    #[test]
    fn decoding_twice_is_identical() {
        let mut bytes = [0u8; FRAME_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(53).wrapping_add(7);
        }
        let frame = ConfigFrame::from(bytes);

        assert_eq!(TvgProfile::decode(&frame), TvgProfile::decode(&frame));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn profile_serializes_with_stable_field_names() {
        let frame = ConfigFrame::from([0u8; FRAME_LEN]);
        let profile = TvgProfile::decode(&frame);

        let json = serde_json::to_value(&profile).unwrap();
        let first = &json["segments"][0];
        assert_eq!(first["segment"], 1);
        assert_eq!(first["delta_us"], 100);
        assert_eq!(first["gain_raw"], 0);
        assert_eq!(first["gain_max"], 63);
        assert_eq!(json["flags"]["freq_shift"], false);
    }
}
