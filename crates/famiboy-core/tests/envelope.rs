mod common;

use common::{apu, frame};
use famiboy_core::channel::VoiceId;

fn volume_steps(nrx2: u8, frames: usize) -> Vec<(usize, u8)> {
    let mut apu = apu();
    apu.write(0xFF12, nrx2);
    apu.write(0xFF13, 0x00);
    apu.write(0xFF14, 0x84);
    let mut last = apu.channel(VoiceId::Pulse1).volume;
    let mut steps = Vec::new();
    for n in 1..=frames {
        frame(&mut apu);
        let volume = apu.channel(VoiceId::Pulse1).volume;
        if volume != last {
            steps.push((n, volume));
            last = volume;
        }
    }
    steps
}

#[test]
fn rising_envelope_tracks_64hz_from_60hz_updates() {
    // initial 0, increase, period 4
    let steps = volume_steps(0x0C, 120);
    assert_eq!(steps.len(), 15);
    for (k, &(frame, volume)) in steps.iter().enumerate() {
        let k = k as u32 + 1;
        assert_eq!(volume as u32, k);
        // Step k lands on the first update where 273 * n >= 1024 * k.
        assert_eq!(frame as u32, (1024 * k).div_ceil(273));
    }
    assert_eq!(steps[0].0, 4);
}

#[test]
fn envelope_steps_are_three_or_four_updates_apart() {
    let steps = volume_steps(0x0C, 120);
    for pair in steps.windows(2) {
        let gap = pair[1].0 - pair[0].0;
        assert!(gap == 3 || gap == 4, "gap {gap}");
    }
}

#[test]
fn envelope_never_exceeds_fifteen() {
    let steps = volume_steps(0xF9, 200);
    assert!(steps.is_empty());
}

#[test]
fn falling_envelope_stops_at_zero() {
    let steps = volume_steps(0x21, 60);
    assert_eq!(steps, vec![(1, 1), (2, 0)]);
}

#[test]
fn period_zero_freezes_volume() {
    let steps = volume_steps(0x70, 120);
    assert!(steps.is_empty());
}

#[test]
fn noise_envelope_runs_like_pulse() {
    let mut apu = apu();
    apu.write(0xFF21, 0x0C);
    apu.write(0xFF23, 0x80);
    for _ in 0..4 {
        frame(&mut apu);
    }
    assert_eq!(apu.channel(VoiceId::Noise).volume, 1);
}
