use crate::arbiter::{Allocation, ArbitrationTable};
use crate::channel::{Channel, Voice, VoiceId};
use crate::diagnostics::{self, Level, apu_trace};
use crate::emit::{emit_noise, emit_pulse, emit_wave, silence_destination};
use crate::hardware::HostRegion;
use crate::host::HostSink;
use crate::register_bank::{
    BankWrite, NR10, NR11, NR12, NR13, NR14, NR21, NR22, NR23, NR24, NR30, NR32, NR33, NR34,
    NR42, NR43, NR44, RegisterBank, WAVE_RAM_SIZE,
};
use crate::scheduler::{Scheduler, StepPlan, UpdateCadence};
use crate::waveform::classify;

const TRIGGER: u8 = 0x80;
const TARGET: &str = "famiboy::apu";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApuConfig {
    pub cadence: UpdateCadence,
    pub region: HostRegion,
}

/// Source APU register file mapped onto the host sound generator.
///
/// Register writes are applied immediately; host writes are only produced by
/// [`ApuMapper::step`] / [`ApuMapper::end_frame`], which must run after the
/// frame's register writes.
pub struct ApuMapper<S: HostSink> {
    bank: RegisterBank,
    channels: [Channel; 4],
    arbiter: ArbitrationTable,
    scheduler: Scheduler,
    region: HostRegion,
    /// Wave memory as of the last classification.
    wave_snapshot: Option<[u8; WAVE_RAM_SIZE]>,
    sink: S,
}

impl<S: HostSink> ApuMapper<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, ApuConfig::default())
    }

    pub fn with_config(sink: S, config: ApuConfig) -> Self {
        Self {
            bank: RegisterBank::new(),
            channels: VoiceId::ALL.map(Channel::new),
            arbiter: ArbitrationTable::default(),
            scheduler: Scheduler::new(config.cadence),
            region: config.region,
            wave_snapshot: None,
            sink,
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bank.read(addr)
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        let was_enabled = self.bank.enabled();
        match self.bank.write(addr, val) {
            BankWrite::Dropped => {}
            BankWrite::PoweredOff => self.power_off(),
            BankWrite::MasterEnable => {
                if !was_enabled && self.bank.enabled() {
                    diagnostics::emit(Level::Info, TARGET, format_args!("APU powered on"));
                }
            }
            BankWrite::Stored(idx) => self.dispatch(idx, val),
        }
    }

    /// Run one update step under the configured cadence.
    pub fn step(&mut self) {
        let plan = self.scheduler.next_plan();
        if !self.bank.enabled() {
            return;
        }
        self.run(plan);
    }

    /// Run every step belonging to one displayed frame.
    pub fn end_frame(&mut self) {
        for _ in 0..self.scheduler.cadence().steps_per_frame() {
            self.step();
        }
    }

    pub fn enabled(&self) -> bool {
        self.bank.enabled()
    }

    pub fn region(&self) -> HostRegion {
        self.region
    }

    pub fn cadence(&self) -> UpdateCadence {
        self.scheduler.cadence()
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.bank
    }

    pub fn channel(&self, voice: VoiceId) -> &Channel {
        &self.channels[voice.index()]
    }

    pub fn arbitration(&self) -> &ArbitrationTable {
        &self.arbiter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn power_off(&mut self) {
        self.scheduler.reset();
        for ch in &mut self.channels {
            if ch.audible_on_host() {
                let dest = ch.owned.unwrap_or(ch.id.natural_destination());
                silence_destination(dest, &mut self.sink);
            }
            ch.reset();
        }
        self.arbiter.release_all();
        diagnostics::emit(Level::Info, TARGET, format_args!("APU powered off"));
    }

    fn dispatch(&mut self, idx: usize, val: u8) {
        match idx {
            NR14 if val & TRIGGER != 0 => self.trigger_pulse(VoiceId::Pulse1),
            NR24 if val & TRIGGER != 0 => self.trigger_pulse(VoiceId::Pulse2),
            NR34 if val & TRIGGER != 0 => self.trigger_wave(),
            NR44 if val & TRIGGER != 0 => self.trigger_noise(),
            NR10 => {
                // A sweep that has subtracted cannot switch to addition
                // without a fresh trigger.
                let ch = &mut self.channels[VoiceId::Pulse1.index()];
                let locked = ch.sweep().is_some_and(|s| s.negate_used);
                if locked && val & 0x08 == 0 && ch.active {
                    ch.active = false;
                    apu_trace!("P1 disabled: sweep switched to addition after negate");
                }
            }
            NR12 => self.check_dac(VoiceId::Pulse1, val),
            NR22 => self.check_dac(VoiceId::Pulse2, val),
            NR42 => self.check_dac(VoiceId::Noise, val),
            NR30 if val & 0x80 == 0 => self.request_wave_stop(),
            NR32 if (val >> 5) & 0x03 == 0 => self.request_wave_stop(),
            _ => {}
        }
    }

    fn check_dac(&mut self, voice: VoiceId, nrx2: u8) {
        if nrx2 & 0xF8 == 0 {
            self.channels[voice.index()].active = false;
        }
    }

    fn request_wave_stop(&mut self) {
        let ch = &mut self.channels[VoiceId::Wave.index()];
        ch.active = false;
        ch.stop_requested.raise();
    }

    fn trigger_pulse(&mut self, voice: VoiceId) {
        let (nrx1, nrx2, low) = match voice {
            VoiceId::Pulse1 => (NR11, NR12, NR13),
            _ => (NR21, NR22, NR23),
        };
        let duty = self.bank.raw(nrx1) >> 6;
        let frequency = self.bank.frequency(low);
        let envelope = self.bank.raw(nrx2);
        let nr10 = self.bank.raw(NR10);

        let ch = &mut self.channels[voice.index()];
        ch.active = true;
        ch.triggered.raise();
        ch.duty = duty;
        ch.frequency = frequency;
        ch.volume = ch.envelope.reload(envelope);
        if let Voice::PulseSweep(sweep) = &mut ch.voice {
            if !sweep.trigger(nr10, frequency) {
                ch.active = false;
                apu_trace!("P1 disabled: sweep overflow on trigger (f={frequency})");
            }
        }
        apu_trace!(
            "{:?} trigger v={} f={} duty={}",
            voice,
            ch.volume,
            ch.frequency,
            ch.duty
        );
    }

    fn trigger_wave(&mut self) {
        let active = self.bank.raw(NR30) & 0x80 != 0;
        let volume = (self.bank.raw(NR32) >> 5) & 0x03;
        let frequency = self.bank.frequency(NR33);

        let ch = &mut self.channels[VoiceId::Wave.index()];
        ch.active = active;
        ch.volume = volume;
        ch.frequency = frequency;
        ch.triggered.raise();
        apu_trace!("wave trigger dac={active} v={volume} f={frequency}");
    }

    fn trigger_noise(&mut self) {
        let envelope = self.bank.raw(NR42);
        let ch = &mut self.channels[VoiceId::Noise.index()];
        ch.active = true;
        ch.triggered.raise();
        ch.volume = ch.envelope.reload(envelope);
        apu_trace!("noise trigger v={} nr43={:02X}", ch.volume, self.bank.raw(NR43));
    }

    /// Wave audibility follows the DAC and volume cells, not the trigger.
    fn refresh_wave(&mut self) {
        let ch = &mut self.channels[VoiceId::Wave.index()];
        ch.frequency = self.bank.frequency(NR33);
        ch.active = self.bank.raw(NR30) & 0x80 != 0;
        ch.volume = (self.bank.raw(NR32) >> 5) & 0x03;

        let ram = self.bank.wave_ram();
        if self.wave_snapshot == Some(ram) {
            return;
        }
        self.wave_snapshot = Some(ram);
        let shape = classify(&ram);
        if ch.detected_wave_type() != Some(shape) {
            apu_trace!(
                "wave shape {:?} -> {:?}",
                ch.detected_wave_type().unwrap_or_default(),
                shape
            );
            ch.set_detected_wave_type(shape);
        }
    }

    fn run(&mut self, plan: StepPlan) {
        let clock_hz = self.region.cpu_clock_hz();

        if plan.envelopes {
            for voice in [VoiceId::Pulse1, VoiceId::Pulse2, VoiceId::Noise] {
                self.channels[voice.index()].clock_envelope();
            }
        }
        if plan.sweep {
            let ch = &mut self.channels[VoiceId::Pulse1.index()];
            let was_active = ch.active;
            ch.clock_sweep();
            if was_active && !ch.active {
                apu_trace!("P1 disabled: sweep overflow (shadow={:?})", ch.sweep().map(|s| s.shadow));
            }
        }
        if plan.refresh_pulse2 {
            self.channels[VoiceId::Pulse2.index()].frequency = self.bank.frequency(NR23);
        }
        if plan.refresh_wave {
            self.refresh_wave();
        }

        let [pulse1, pulse2, wave, noise] = &mut self.channels;
        if plan.pre_allocate {
            if let Allocation::Contended(dest) = self.arbiter.pre_allocate_wave(wave, pulse2.active)
            {
                if wave.audible_on_host() {
                    silence_destination(dest, &mut self.sink);
                }
                wave.last_emitted_period = 0;
            }
        }

        if plan.emits(VoiceId::Pulse1) {
            emit_pulse(pulse1, clock_hz, &mut self.sink);
        }
        if plan.emits(VoiceId::Pulse2) {
            emit_pulse(pulse2, clock_hz, &mut self.sink);
        }
        if plan.emits(VoiceId::Wave) {
            emit_wave(wave, clock_hz, &mut self.sink);
        }
        if plan.emits(VoiceId::Noise) {
            emit_noise(noise, self.bank.raw(NR43), clock_hz, &mut self.sink);
        }
    }
}

impl<S: HostSink + Default> Default for ApuMapper<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
