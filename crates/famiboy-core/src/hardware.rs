/// Source-side pulse reference clock (Hz). A frequency register `f` plays at
/// `PULSE_REFERENCE_HZ / (2048 - f)`.
pub const PULSE_REFERENCE_HZ: u32 = 131_072;

/// Source-side noise reference clock (Hz) before the divisor and shift.
pub const NOISE_REFERENCE_HZ: u32 = 262_144;

/// Rate at which the engine is scheduled (one step per displayed frame).
pub const UPDATE_RATE_HZ: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
/// Host console revision.
///
/// The host sound generator derives every period from the CPU clock, which
/// differs between the NTSC and PAL consoles.
pub enum HostRegion {
    #[default]
    Ntsc,
    Pal,
}

impl HostRegion {
    #[inline]
    /// Host CPU clock driving the destination sound generator, in Hz.
    pub const fn cpu_clock_hz(self) -> u32 {
        match self {
            HostRegion::Ntsc => 1_789_773,
            HostRegion::Pal => 1_662_607,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_is_ntsc() {
        assert_eq!(HostRegion::default(), HostRegion::Ntsc);
        assert_eq!(HostRegion::default().cpu_clock_hz(), 1_789_773);
    }

    #[test]
    fn pal_clock_is_slower() {
        assert!(HostRegion::Pal.cpu_clock_hz() < HostRegion::Ntsc.cpu_clock_hz());
    }
}
