//! Source frequency encodings to destination period values.

use crate::hardware::{NOISE_REFERENCE_HZ, PULSE_REFERENCE_HZ};

const PULSE_MIN_PERIOD: u16 = 8;
const TRIANGLE_MIN_PERIOD: u16 = 2;
const MAX_PERIOD: u16 = 2047;

/// Destination noise periods in CPU cycles, indexed by the 4-bit period field.
pub const HOST_NOISE_PERIODS: [u16; 16] = [
    4, 8, 16, 32, 64, 96, 128, 160, 202, 254, 380, 508, 762, 1016, 2034, 4068,
];

/// Source noise divisors for divisor codes 0..7.
const SOURCE_NOISE_DIVISORS: [u32; 8] = [8, 16, 32, 48, 64, 80, 96, 112];

/// Index bias toward lower noise pitch; the result never moves past 14.
const NOISE_SOFTEN_STEPS: u8 = 2;
const NOISE_SOFTEN_LIMIT: u8 = 14;

// period + 1 = round(clock * (2048 - f) / (16 * 131072))
fn scaled_period(freq: u16, clock_hz: u32, min: u16) -> u16 {
    if freq >= 2048 {
        return 0;
    }
    let divisor = (2048 - freq) as u64;
    let denom = 16 * PULSE_REFERENCE_HZ as u64;
    let rounded = (clock_hz as u64 * divisor + denom / 2) / denom;
    if rounded == 0 {
        return min;
    }
    (rounded - 1).clamp(min as u64, MAX_PERIOD as u64) as u16
}

/// Destination pulse period for a source frequency register. Returns 0 for
/// out-of-range input, otherwise a value in `8..=2047`.
pub fn pulse_period(freq: u16, clock_hz: u32) -> u16 {
    scaled_period(freq, clock_hz, PULSE_MIN_PERIOD)
}

/// Destination triangle period for the wave voice's frequency register.
///
/// Both the wave sample clock and the triangle sequencer run an octave below
/// their pulse counterparts, so the pulse formula applies unchanged.
pub fn triangle_period(freq: u16, clock_hz: u32) -> u16 {
    scaled_period(freq, clock_hz, TRIANGLE_MIN_PERIOD)
}

/// Source noise frequency in Hz for an NR43 value, `None` when it rounds to 0.
pub fn noise_frequency(nr43: u8) -> Option<u32> {
    let shift = (nr43 >> 4) & 0x0F;
    let divisor = SOURCE_NOISE_DIVISORS[(nr43 & 0x07) as usize] << shift;
    match NOISE_REFERENCE_HZ / divisor {
        0 => None,
        hz => Some(hz),
    }
}

/// Destination noise period index for an NR43 value, already biased toward
/// a lower pitch.
pub fn noise_period_index(nr43: u8, clock_hz: u32) -> u8 {
    let Some(source_hz) = noise_frequency(nr43) else {
        return 0x0F;
    };

    let closest = HOST_NOISE_PERIODS
        .iter()
        .enumerate()
        .min_by_key(|&(_, &period)| (clock_hz / period as u32).abs_diff(source_hz))
        .map(|(idx, _)| idx as u8)
        .unwrap_or(0x0F);

    if closest < NOISE_SOFTEN_LIMIT {
        closest + NOISE_SOFTEN_STEPS
    } else {
        closest
    }
}

/// Destination noise mode bit (bit 7 of the period register) for an NR43
/// value. The source's 7-bit width mode maps straight through.
#[inline]
pub fn noise_mode(nr43: u8) -> u8 {
    if nr43 & 0x08 != 0 { 0x80 } else { 0x00 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTSC: u32 = 1_789_773;

    #[test]
    fn a440_maps_to_host_a440() {
        // 131072 / (2048 - 1750) = 439.8 Hz; host A4 period is 253.
        assert_eq!(pulse_period(1750, NTSC), 253);
    }

    #[test]
    fn lowest_source_frequency_fits_in_11_bits() {
        assert_eq!(pulse_period(0, NTSC), 1747);
        assert_eq!(triangle_period(0, NTSC), 1747);
    }

    #[test]
    fn invalid_frequency_returns_zero() {
        assert_eq!(pulse_period(2048, NTSC), 0);
        assert_eq!(triangle_period(0xFFFF, NTSC), 0);
    }

    #[test]
    fn highest_source_frequency_clamps_to_minimum() {
        assert_eq!(pulse_period(2047, NTSC), 8);
        assert_eq!(triangle_period(2047, NTSC), 2);
    }

    #[test]
    fn noise_index_is_softened_by_two() {
        // 262144 / 8 = 32768 Hz is closest to index 4 (1789773 / 64 = 27965).
        assert_eq!(noise_period_index(0x00, NTSC), 6);
    }

    #[test]
    fn slowest_noise_maps_to_last_entry() {
        assert_eq!(noise_period_index(0xF7, NTSC), 0x0F);
    }

    #[test]
    fn width_bit_maps_to_mode_bit() {
        assert_eq!(noise_mode(0x08), 0x80);
        assert_eq!(noise_mode(0xF7), 0x00);
    }
}
