//! Per-voice translation of channel state into host register writes.

use crate::arbiter::DestChannel;
use crate::channel::{Channel, VoiceId};
use crate::convert::{noise_mode, noise_period_index, pulse_period, triangle_period};
use crate::host::{
    HostSink, NOISE_CTRL, NOISE_LENGTH, NOISE_PERIOD, PULSE1_CTRL, PULSE1_HI, PULSE1_LO,
    PULSE1_SWEEP, PULSE2_CTRL, PULSE2_HI, PULSE2_LO, PULSE2_SWEEP, STATUS, TRIANGLE_HI,
    TRIANGLE_LINEAR, TRIANGLE_LO,
};

/// Control value with constant volume and the length counter halted.
const CONSTANT_VOLUME: u8 = 0x30;
const DUTY_50: u8 = 0x80;
/// Length index 31 in the upper five bits of a period-high register.
const LENGTH_MAX: u8 = 0xF8;
const LINEAR_MAX: u8 = 0xFF;
const ENABLE_ALL: u8 = 0x0F;
const ENABLE_NO_TRIANGLE: u8 = 0x0B;

struct PulseRegs {
    ctrl: u8,
    sweep: u8,
    lo: u8,
    hi: u8,
    /// Sweep setting that never mutes the channel.
    sweep_value: u8,
}

const PULSE1_REGS: PulseRegs = PulseRegs {
    ctrl: PULSE1_CTRL,
    sweep: PULSE1_SWEEP,
    lo: PULSE1_LO,
    hi: PULSE1_HI,
    sweep_value: 0x0F,
};

const PULSE2_REGS: PulseRegs = PulseRegs {
    ctrl: PULSE2_CTRL,
    sweep: PULSE2_SWEEP,
    lo: PULSE2_LO,
    hi: PULSE2_HI,
    sweep_value: 0x08,
};

/// Host volume for a source envelope volume.
#[inline]
pub fn scale_volume(volume: u8) -> u8 {
    (volume.min(15) * 15) / 16
}

/// Write the explicit silence command for a host channel.
pub fn silence_destination<S: HostSink + ?Sized>(dest: DestChannel, sink: &mut S) {
    match dest {
        DestChannel::Pulse1 => sink.queue_write(PULSE1_CTRL, CONSTANT_VOLUME),
        DestChannel::Pulse2 => sink.queue_write(PULSE2_CTRL, CONSTANT_VOLUME),
        DestChannel::Triangle => sink.queue_write(STATUS, ENABLE_NO_TRIANGLE),
        DestChannel::Noise => sink.queue_write(NOISE_CTRL, CONSTANT_VOLUME),
    }
}

/// Shared inactive path: silence once if the host was still sounding.
/// Returns `true` when the voice has nothing to emit this frame.
fn settle_silent<S: HostSink + ?Sized>(ch: &mut Channel, dest: DestChannel, sink: &mut S) -> bool {
    if ch.active && ch.volume != 0 {
        return false;
    }
    ch.triggered.clear();
    if ch.audible_on_host() {
        silence_destination(dest, sink);
        ch.last_emitted_period = 0;
    }
    true
}

/// Emit one of the two pulse voices. Duty is always 50%; the period-high
/// register restarts the host sequencer, so it is only written on a trigger.
pub fn emit_pulse<S: HostSink + ?Sized>(ch: &mut Channel, clock_hz: u32, sink: &mut S) {
    let (regs, dest) = match ch.id {
        VoiceId::Pulse1 => (&PULSE1_REGS, DestChannel::Pulse1),
        VoiceId::Pulse2 => (&PULSE2_REGS, DestChannel::Pulse2),
        _ => return,
    };
    if settle_silent(ch, dest, sink) {
        return;
    }

    let period = pulse_period(ch.frequency, clock_hz);
    sink.queue_write(regs.ctrl, DUTY_50 | CONSTANT_VOLUME | scale_volume(ch.volume));
    sink.queue_write(regs.lo, (period & 0xFF) as u8);
    if ch.triggered.take() {
        sink.queue_write(regs.sweep, regs.sweep_value);
        sink.queue_write(regs.hi, LENGTH_MAX | ((period >> 8) & 0x07) as u8);
    }
    ch.last_emitted_period = period;
}

/// Emit the wave voice on the triangle channel. A pending stop is flushed
/// before anything else so that off-then-on within one frame still reaches
/// the host as two commands.
pub fn emit_wave<S: HostSink + ?Sized>(ch: &mut Channel, clock_hz: u32, sink: &mut S) {
    if ch.stop_requested.take() {
        silence_destination(DestChannel::Triangle, sink);
        ch.last_emitted_period = 0;
    }
    if settle_silent(ch, DestChannel::Triangle, sink) {
        return;
    }
    if ch.owned != Some(DestChannel::Triangle) {
        // Lost arbitration this frame.
        return;
    }

    let period = triangle_period(ch.frequency, clock_hz);
    let period_high = ((period >> 8) & 0x07) as u8;
    let cached_high = ((ch.last_emitted_period >> 8) & 0x07) as u8;

    sink.queue_write(STATUS, ENABLE_ALL);
    sink.queue_write(TRIANGLE_LINEAR, LINEAR_MAX);
    sink.queue_write(TRIANGLE_LO, (period & 0xFF) as u8);
    let triggered = ch.triggered.take();
    if triggered || !ch.audible_on_host() || cached_high != period_high {
        sink.queue_write(TRIANGLE_HI, LENGTH_MAX | period_high);
    }
    ch.last_emitted_period = period;
}

/// Emit the noise voice. `nr43` is the current noise shape register.
pub fn emit_noise<S: HostSink + ?Sized>(ch: &mut Channel, nr43: u8, clock_hz: u32, sink: &mut S) {
    if settle_silent(ch, DestChannel::Noise, sink) {
        return;
    }

    let index = noise_period_index(nr43, clock_hz) & 0x0F;
    let mode = noise_mode(nr43);
    sink.queue_write(NOISE_CTRL, CONSTANT_VOLUME | scale_volume(ch.volume));
    sink.queue_write(NOISE_PERIOD, mode | index);
    let triggered = ch.triggered.take();
    if triggered || !ch.audible_on_host() {
        sink.queue_write(NOISE_LENGTH, LENGTH_MAX);
    }
    // Never zero: the index is at least 2 after softening, and the mode
    // lands in bit 8.
    ch.last_emitted_period = index as u16 | (mode as u16) << 1;
}
