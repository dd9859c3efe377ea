use crate::channel::{Channel, VoiceId};
use crate::waveform::WaveType;

/// Physical channels of the host sound generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestChannel {
    Pulse1,
    Pulse2,
    Triangle,
    Noise,
}

impl DestChannel {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Outcome of the per-frame wave pre-allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Allocation {
    /// Wave is silent and held nothing.
    Idle,
    /// Wave went silent and gave its channel back.
    Released(DestChannel),
    /// The second pulse voice wants the channel the wave held; the wave is
    /// silenced for this frame.
    Contended(DestChannel),
    /// A channel was claimed this frame.
    Claimed(DestChannel),
    /// The wave keeps the channel it already owned.
    Held(DestChannel),
}

/// Host channel for the wave voice.
///
/// The classified shape is passed in but not consulted: the wave always
/// plays on the triangle. Picking a pulse channel for pulse-like shapes would
/// hook in here.
pub fn route_wave(_detected: WaveType) -> DestChannel {
    DestChannel::Triangle
}

/// Ownership of the four host channels.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct ArbitrationTable {
    owners: [Option<VoiceId>; 4],
}

impl ArbitrationTable {
    pub fn owner(&self, dest: DestChannel) -> Option<VoiceId> {
        self.owners[dest.index()]
    }

    /// Give `dest` to `voice`. Fails if another voice owns it.
    pub fn claim(&mut self, dest: DestChannel, voice: VoiceId) -> bool {
        match self.owners[dest.index()] {
            Some(owner) if owner != voice => false,
            _ => {
                self.owners[dest.index()] = Some(voice);
                true
            }
        }
    }

    pub fn release(&mut self, dest: DestChannel) {
        self.owners[dest.index()] = None;
    }

    pub fn release_all(&mut self) {
        self.owners = [None; 4];
    }

    /// Decide which host channel the wave voice drives this frame. Must run
    /// before the second pulse voice is emitted.
    pub fn pre_allocate_wave(&mut self, wave: &mut Channel, pulse2_active: bool) -> Allocation {
        if !wave.active || wave.volume == 0 {
            return match wave.owned.take() {
                Some(dest) => {
                    self.release(dest);
                    Allocation::Released(dest)
                }
                None => Allocation::Idle,
            };
        }

        if pulse2_active && wave.owned == Some(DestChannel::Pulse2) {
            self.release(DestChannel::Pulse2);
            wave.owned = None;
            return Allocation::Contended(DestChannel::Pulse2);
        }

        if let Some(dest) = wave.owned {
            return Allocation::Held(dest);
        }

        let dest = route_wave(wave.detected_wave_type().unwrap_or_default());
        if self.claim(dest, VoiceId::Wave) {
            wave.owned = Some(dest);
            Allocation::Claimed(dest)
        } else {
            Allocation::Idle
        }
    }
}
