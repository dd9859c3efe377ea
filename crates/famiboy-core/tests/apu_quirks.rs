mod common;

use common::{apu, frame, start_wave, trigger_noise, trigger_pulse, writes_to};
use famiboy_core::channel::VoiceId;

#[test]
fn sweep_overflow_on_trigger_disables_immediately() {
    let mut apu = apu();
    apu.write(0xFF10, 0x11); // period 1, addition, shift 1
    trigger_pulse(&mut apu, 1, 1500); // 1500 + 750 > 2047
    assert!(!apu.channel(VoiceId::Pulse1).active);
    assert!(writes_to(&frame(&mut apu), 0x00).is_empty());
}

#[test]
fn subtractive_sweep_never_fails_the_trigger_check() {
    let mut apu = apu();
    apu.write(0xFF10, 0x19); // period 1, subtraction, shift 1
    trigger_pulse(&mut apu, 1, 2000);
    assert!(apu.channel(VoiceId::Pulse1).active);
    assert!(!apu.channel(VoiceId::Pulse1).sweep().unwrap().negate_used);
}

#[test]
fn sweep_lookahead_overflow_silences_before_emission() {
    let mut apu = apu();
    apu.write(0xFF10, 0x11);
    trigger_pulse(&mut apu, 1, 1000); // 1500 fits, the next step would not
    assert!(apu.channel(VoiceId::Pulse1).active);
    let out = frame(&mut apu);
    assert!(!apu.channel(VoiceId::Pulse1).active);
    assert!(writes_to(&out, 0x03).is_empty());
    assert_eq!(apu.channel(VoiceId::Pulse1).frequency, 1000);
}

#[test]
fn subtractive_sweep_updates_live_frequency() {
    let mut apu = apu();
    apu.write(0xFF10, 0x1A); // period 1, subtraction, shift 2
    trigger_pulse(&mut apu, 1, 1024);
    frame(&mut apu);
    assert_eq!(apu.channel(VoiceId::Pulse1).frequency, 576);
    assert!(apu.channel(VoiceId::Pulse1).active);
}

#[test]
fn addition_after_negate_disables_on_write() {
    let mut apu = apu();
    apu.write(0xFF10, 0x19);
    trigger_pulse(&mut apu, 1, 1024);
    frame(&mut apu);
    assert!(apu.channel(VoiceId::Pulse1).sweep().unwrap().negate_used);

    apu.write(0xFF10, 0x11); // switch to addition
    assert!(!apu.channel(VoiceId::Pulse1).active);
}

#[test]
fn negate_lockout_requires_a_used_subtraction() {
    let mut apu = apu();
    apu.write(0xFF10, 0x79); // period 7: no sweep clock within one frame
    trigger_pulse(&mut apu, 1, 1024);
    frame(&mut apu);
    apu.write(0xFF10, 0x11);
    assert!(apu.channel(VoiceId::Pulse1).active);
}

#[test]
fn retrigger_clears_negate_lockout() {
    let mut apu = apu();
    apu.write(0xFF10, 0x19);
    trigger_pulse(&mut apu, 1, 1024);
    frame(&mut apu);
    apu.write(0xFF10, 0x00);
    trigger_pulse(&mut apu, 1, 1024);
    apu.write(0xFF10, 0x01);
    assert!(apu.channel(VoiceId::Pulse1).active);
}

#[test]
fn dac_off_envelope_write_disables_voice() {
    let mut apu = apu();
    trigger_pulse(&mut apu, 1, 1750);
    trigger_pulse(&mut apu, 2, 1750);
    trigger_noise(&mut apu, 0x10);

    apu.write(0xFF12, 0x07); // volume 0, decrease: DAC off
    apu.write(0xFF17, 0x08); // volume 0, increase: DAC stays on
    apu.write(0xFF21, 0x00);

    assert!(!apu.channel(VoiceId::Pulse1).active);
    assert!(apu.channel(VoiceId::Pulse2).active);
    assert!(!apu.channel(VoiceId::Noise).active);
}

#[test]
fn trigger_reloads_envelope_and_duty() {
    let mut apu = apu();
    apu.write(0xFF16, 0xC0); // duty 75%
    apu.write(0xFF17, 0x9B); // volume 9, increase, period 3
    apu.write(0xFF18, 0x34);
    apu.write(0xFF19, 0x85);
    let ch = apu.channel(VoiceId::Pulse2);
    assert!(ch.active);
    assert!(ch.triggered.is_pending());
    assert_eq!(ch.duty, 3);
    assert_eq!(ch.volume, 9);
    assert_eq!(ch.frequency, 0x534);
    assert!(ch.envelope.add);
    assert_eq!(ch.envelope.period, 3);
    assert_eq!(ch.envelope.counter(), 0);
}

#[test]
fn wave_trigger_follows_dac_not_trigger_bit() {
    let mut apu = apu();
    apu.write(0xFF1C, 0x20);
    apu.write(0xFF1E, 0x80); // DAC still off from power-on
    assert!(!apu.channel(VoiceId::Wave).active);

    apu.write(0xFF1A, 0x80);
    apu.write(0xFF1E, 0x80);
    assert!(apu.channel(VoiceId::Wave).active);
    assert_eq!(apu.channel(VoiceId::Wave).volume, 1);
}

#[test]
fn wave_dac_off_requests_stop() {
    let mut apu = apu();
    start_wave(&mut apu, 1750);
    apu.write(0xFF1A, 0x00);
    let ch = apu.channel(VoiceId::Wave);
    assert!(!ch.active);
    assert!(ch.stop_requested.is_pending());
}

#[test]
fn wave_volume_zero_requests_stop() {
    let mut apu = apu();
    start_wave(&mut apu, 1750);
    apu.write(0xFF1C, 0x00);
    assert!(apu.channel(VoiceId::Wave).stop_requested.is_pending());
    apu.write(0xFF1C, 0x60); // nonzero volume leaves the request alone
    assert!(apu.channel(VoiceId::Wave).stop_requested.is_pending());
}

#[test]
fn edges_are_drained_by_one_frame() {
    let mut apu = apu();
    trigger_pulse(&mut apu, 1, 1750);
    trigger_pulse(&mut apu, 1, 1750);
    let out = frame(&mut apu);
    assert_eq!(writes_to(&out, 0x03).len(), 1);
    assert!(!apu.channel(VoiceId::Pulse1).triggered.is_pending());
}
