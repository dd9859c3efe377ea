use crate::arbiter::DestChannel;
use crate::timer::{ENVELOPE_INCREMENT, FIXED_ONE, FixedTimer, SWEEP_INCREMENT};
use crate::waveform::WaveType;

/// The four virtual source voices, in register order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceId {
    Pulse1,
    Pulse2,
    Wave,
    Noise,
}

impl VoiceId {
    pub const ALL: [VoiceId; 4] = [
        VoiceId::Pulse1,
        VoiceId::Pulse2,
        VoiceId::Wave,
        VoiceId::Noise,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Host channel this voice drives when nothing else has been arbitrated.
    pub const fn natural_destination(self) -> DestChannel {
        match self {
            VoiceId::Pulse1 => DestChannel::Pulse1,
            VoiceId::Pulse2 => DestChannel::Pulse2,
            VoiceId::Wave => DestChannel::Triangle,
            VoiceId::Noise => DestChannel::Noise,
        }
    }
}

/// One-shot edge raised during the write phase and drained once by the
/// following emission phase.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingEdge(bool);

impl PendingEdge {
    #[inline]
    pub fn raise(&mut self) {
        self.0 = true;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = false;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.0
    }

    /// Consume the edge, returning whether it was pending.
    #[inline]
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

#[derive(Default, Clone, Copy, Debug)]
pub struct Envelope {
    pub initial: u8,
    pub add: bool,
    /// 0 freezes the volume.
    pub period: u8,
    timer: FixedTimer,
}

impl Envelope {
    /// Reload from an NRx2 value and return the starting volume.
    pub fn reload(&mut self, nrx2: u8) -> u8 {
        self.initial = nrx2 >> 4;
        self.add = nrx2 & 0x08 != 0;
        self.period = nrx2 & 0x07;
        self.timer.reset();
        self.initial
    }

    pub fn counter(&self) -> u16 {
        self.timer.counter()
    }

    /// Advance by one update at the 64 Hz envelope rate.
    pub fn clock(&mut self, volume: &mut u8) {
        if self.period == 0 {
            return;
        }
        self.timer.advance(ENVELOPE_INCREMENT);
        if self.timer.take(self.period as u16 * FIXED_ONE) {
            if self.add {
                if *volume < 15 {
                    *volume += 1;
                }
            } else if *volume > 0 {
                *volume -= 1;
            }
        }
    }
}

/// Voice 1 frequency sweep, clocked at 128 Hz from the 60 Hz update.
#[derive(Default, Clone, Copy, Debug)]
pub struct Sweep {
    pub period: u8,
    pub negate: bool,
    pub shift: u8,
    pub shadow: u16,
    pub divider: u8,
    timer: FixedTimer,
    pub enabled: bool,
    /// True once a subtraction has been calculated since the last trigger.
    pub negate_used: bool,
}

impl Sweep {
    #[inline]
    fn reload_period(&self) -> u8 {
        if self.period == 0 { 8 } else { self.period }
    }

    /// Reload on trigger. Returns `false` when the immediate overflow check
    /// fails and the voice must be disabled.
    pub fn trigger(&mut self, nr10: u8, freq: u16) -> bool {
        self.period = (nr10 >> 4) & 0x07;
        self.negate = nr10 & 0x08 != 0;
        self.shift = nr10 & 0x07;
        self.shadow = freq;
        self.divider = self.reload_period();
        self.timer.reset();
        self.enabled = self.period != 0 || self.shift != 0;
        self.negate_used = false;

        // The trigger-time check never records a subtraction.
        if self.shift > 0 && !self.negate {
            return self.shadow + (self.shadow >> self.shift) <= 2047;
        }
        true
    }

    /// Next frequency from the shadow register, `None` on overflow.
    fn calculate(&mut self) -> Option<u16> {
        let delta = self.shadow >> self.shift;
        if self.negate {
            self.negate_used = true;
            return Some(self.shadow.saturating_sub(delta));
        }
        if self.negate_used {
            return Some(self.shadow);
        }
        let next = self.shadow + delta;
        if next > 2047 { None } else { Some(next) }
    }

    /// Advance by one update. Returns `false` if an overflow disabled the
    /// voice; `frequency` receives every committed sweep step.
    pub fn clock(&mut self, frequency: &mut u16) -> bool {
        self.timer.advance(SWEEP_INCREMENT);
        while self.timer.take(FIXED_ONE) {
            if self.divider > 0 {
                self.divider -= 1;
            }
            if self.divider != 0 {
                continue;
            }
            self.divider = self.reload_period();

            if !self.enabled || self.shift == 0 {
                continue;
            }
            let Some(next) = self.calculate() else {
                return false;
            };
            self.shadow = next;
            // Hardware checks the following step too, without applying it.
            if self.calculate().is_none() {
                return false;
            }
            *frequency = next;
        }
        true
    }
}

/// Behaviour that differs between voices. All voices share [`Channel`]'s
/// envelope, edges and emission cache.
#[derive(Clone, Copy, Debug)]
pub enum Voice {
    PulseSweep(Sweep),
    Pulse,
    Wave { detected: WaveType },
    Noise,
}

#[derive(Clone, Copy, Debug)]
pub struct Channel {
    pub id: VoiceId,
    pub active: bool,
    pub triggered: PendingEdge,
    pub stop_requested: PendingEdge,
    /// 11-bit source frequency register.
    pub frequency: u16,
    pub volume: u8,
    pub duty: u8,
    /// Last host period written; 0 forces a full resync.
    pub last_emitted_period: u16,
    pub envelope: Envelope,
    pub owned: Option<DestChannel>,
    pub voice: Voice,
}

impl Channel {
    pub fn new(id: VoiceId) -> Self {
        let voice = match id {
            VoiceId::Pulse1 => Voice::PulseSweep(Sweep::default()),
            VoiceId::Pulse2 => Voice::Pulse,
            VoiceId::Wave => Voice::Wave {
                detected: WaveType::Unknown,
            },
            VoiceId::Noise => Voice::Noise,
        };
        Self {
            id,
            active: false,
            triggered: PendingEdge::default(),
            stop_requested: PendingEdge::default(),
            frequency: 0,
            volume: 0,
            duty: 0,
            last_emitted_period: 0,
            envelope: Envelope::default(),
            owned: None,
            voice,
        }
    }

    /// Whether the host is currently producing sound for this voice.
    #[inline]
    pub fn audible_on_host(&self) -> bool {
        self.last_emitted_period != 0
    }

    pub fn sweep(&self) -> Option<&Sweep> {
        match &self.voice {
            Voice::PulseSweep(sweep) => Some(sweep),
            _ => None,
        }
    }

    pub fn detected_wave_type(&self) -> Option<WaveType> {
        match self.voice {
            Voice::Wave { detected } => Some(detected),
            _ => None,
        }
    }

    pub fn set_detected_wave_type(&mut self, wave_type: WaveType) {
        if let Voice::Wave { detected } = &mut self.voice {
            *detected = wave_type;
        }
    }

    /// Force the voice silent and drop every pending edge and cache.
    pub fn reset(&mut self) {
        self.active = false;
        self.triggered.clear();
        self.stop_requested.clear();
        self.last_emitted_period = 0;
        self.owned = None;
    }

    pub fn clock_envelope(&mut self) {
        if self.active {
            self.envelope.clock(&mut self.volume);
        }
    }

    pub fn clock_sweep(&mut self) {
        if !self.active {
            return;
        }
        if let Voice::PulseSweep(sweep) = &mut self.voice {
            if !sweep.clock(&mut self.frequency) {
                self.active = false;
            }
        }
    }
}
