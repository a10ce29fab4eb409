//! Time-table lookup and engineering-unit conversions
//!
//! The PGA460 encodes every threshold/TVG segment duration as a 4-bit index
//! into a fixed microsecond table. This module holds that table plus the
//! conversions from echo time-of-flight to distance and from raw threshold
//! levels to percentage of full scale.

/// Default speed of sound in meters per second
///
/// Used by the `decode` convenience constructors. Temperature-compensated
/// deployments can pass their own value to the `*_with_speed_of_sound`
/// variants instead.
pub const SPEED_OF_SOUND_M_S: f64 = 343.0;

/// Segment duration table, indexed by a 4-bit time nibble
///
/// Values are in microseconds and strictly increasing.
pub const TIME_US: [u32; 16] = [
    100, 200, 300, 400, 600, 800, 1000, 1200, 1400, 2000, 2400, 3200, 4000, 5200, 6400, 8000,
];

/// Maps a 4-bit time nibble to its segment duration in microseconds
///
/// Only the low nibble of `n` is meaningful, mirroring the hardware register
/// semantics: larger values are masked, never rejected.
#[inline]
pub const fn nibble_to_us(n: u8) -> u32 {
    TIME_US[(n & 0x0f) as usize]
}

/// Converts an echo time-of-flight to one-way distance in centimeters
///
/// `distance_cm = t_us * (v * 100 / 1e6) / 2`; the division by 2 accounts
/// for the round trip of the echo.
#[inline]
pub fn tof_us_to_cm(t_us: u32, speed_of_sound_m_s: f64) -> f64 {
    t_us as f64 * (speed_of_sound_m_s * 100.0 / 1e6) / 2.0
}

/// Converts a raw threshold level to percentage of full scale
///
/// Stages 1..=8 store 5-bit levels (full scale 31), stages 9..=12 store
/// 8-bit levels (full scale 255). The branch is determined by the stage
/// index alone: the two encodings overlap numerically, so the raw value
/// says nothing about which scale applies.
#[inline]
pub fn value_to_pct(stage: u8, raw: u8) -> f64 {
    if stage <= 8 {
        raw as f64 / 31.0 * 100.0
    } else {
        raw as f64 / 255.0 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_table_is_strictly_increasing() {
        for i in 0..15 {
            assert!(TIME_US[i] < TIME_US[i + 1]);
        }
    }

    #[test]
    fn nibble_lookup_covers_the_table() {
        for n in 0..16u8 {
            assert_eq!(nibble_to_us(n), TIME_US[n as usize]);
        }
    }

    #[test]
    fn nibble_lookup_masks_high_bits() {
        assert_eq!(nibble_to_us(0x1f), nibble_to_us(0x0f));
        assert_eq!(nibble_to_us(0xf0), nibble_to_us(0x00));
        assert_eq!(nibble_to_us(0xa7), nibble_to_us(0x07));
    }

    #[test]
    fn tof_to_distance_at_default_speed() {
        // One second of round trip at 343 m/s is 171.5 m one way.
        let cm = tof_us_to_cm(1_000_000, SPEED_OF_SOUND_M_S);
        assert!((cm - 17150.0).abs() < 1e-9);

        assert_eq!(tof_us_to_cm(0, SPEED_OF_SOUND_M_S), 0.0);
    }

    #[test]
    fn tof_to_distance_with_overridden_speed() {
        // Warmer air, faster sound, longer distance for the same echo time.
        let cold = tof_us_to_cm(1000, 331.0);
        let warm = tof_us_to_cm(1000, 349.0);
        assert!(warm > cold);
        assert!((warm - 17.45).abs() < 1e-9);
    }

    #[test]
    fn value_to_pct_full_scale_per_stage() {
        assert_eq!(value_to_pct(8, 31), 100.0);
        assert_eq!(value_to_pct(9, 255), 100.0);
        assert_eq!(value_to_pct(1, 0), 0.0);
    }

    #[test]
    fn value_to_pct_is_stage_indexed() {
        // raw = 20 is valid in both encodings, with different percentages.
        let five_bit = value_to_pct(8, 20);
        let eight_bit = value_to_pct(9, 20);
        assert!(five_bit > eight_bit);
        assert!((five_bit - 20.0 / 31.0 * 100.0).abs() < 1e-12);
        assert!((eight_bit - 20.0 / 255.0 * 100.0).abs() < 1e-12);
    }
}
