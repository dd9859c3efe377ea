#![allow(dead_code)]

use famiboy_core::ApuMapper;
use famiboy_core::host::HostWrite;

pub type TestApu = ApuMapper<Vec<HostWrite>>;

pub fn apu() -> TestApu {
    ApuMapper::default()
}

/// Run one frame and take everything it sent to the host.
pub fn frame(apu: &mut TestApu) -> Vec<HostWrite> {
    apu.end_frame();
    std::mem::take(apu.sink_mut())
}

pub fn w(reg: u8, value: u8) -> HostWrite {
    HostWrite::new(reg, value)
}

pub fn position(writes: &[HostWrite], reg: u8, value: u8) -> Option<usize> {
    writes.iter().position(|&x| x == w(reg, value))
}

pub fn writes_to(writes: &[HostWrite], reg: u8) -> Vec<u8> {
    writes.iter().filter(|x| x.reg == reg).map(|x| x.value).collect()
}

/// Trigger a pulse voice (1 or 2) at full volume with a static envelope.
pub fn trigger_pulse(apu: &mut TestApu, voice: u8, freq: u16) {
    let base = if voice == 1 { 0xFF10 } else { 0xFF15 };
    apu.write(base + 2, 0xF0); // volume 15, no envelope
    apu.write(base + 3, (freq & 0xFF) as u8);
    apu.write(base + 4, 0x80 | (freq >> 8) as u8); // trigger
}

pub fn start_wave(apu: &mut TestApu, freq: u16) {
    apu.write(0xFF1A, 0x80); // DAC on
    apu.write(0xFF1C, 0x20); // volume 100%
    apu.write(0xFF1D, (freq & 0xFF) as u8);
    apu.write(0xFF1E, 0x80 | (freq >> 8) as u8);
}

pub fn trigger_noise(apu: &mut TestApu, nr43: u8) {
    apu.write(0xFF21, 0xF0);
    apu.write(0xFF22, nr43);
    apu.write(0xFF23, 0x80);
}
