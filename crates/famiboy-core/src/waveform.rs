use crate::register_bank::WAVE_RAM_SIZE;

const SAMPLE_COUNT: usize = WAVE_RAM_SIZE * 2;
const MIDPOINT: u8 = 8;

/// Coarse shape of the 32-sample wave memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WaveType {
    #[default]
    Unknown,
    Triangle,
    Pulse12,
    Pulse25,
    Pulse50,
    Pulse75,
    Sawtooth,
    NoiseLike,
}

/// Unpack wave memory into 4-bit samples, high nibble first.
pub fn unpack_samples(wave_ram: &[u8; WAVE_RAM_SIZE]) -> [u8; SAMPLE_COUNT] {
    let mut samples = [0u8; SAMPLE_COUNT];
    for (i, byte) in wave_ram.iter().enumerate() {
        samples[i * 2] = byte >> 4;
        samples[i * 2 + 1] = byte & 0x0F;
    }
    samples
}

/// Per-step direction counts over `steps` cyclic sample pairs starting at
/// `start`: (rising, falling, jumps larger than half scale).
fn direction_counts(samples: &[u8; SAMPLE_COUNT], start: usize, steps: usize) -> (u32, u32, u32) {
    let mut rising = 0;
    let mut falling = 0;
    let mut big_jumps = 0;
    for i in 0..steps {
        let a = samples[(start + i) % SAMPLE_COUNT] as i16;
        let b = samples[(start + i + 1) % SAMPLE_COUNT] as i16;
        let diff = b - a;
        if diff > 0 {
            rising += 1;
        } else if diff < 0 {
            falling += 1;
        }
        if diff.abs() > MIDPOINT as i16 {
            big_jumps += 1;
        }
    }
    (rising, falling, big_jumps)
}

fn is_triangle(samples: &[u8; SAMPLE_COUNT]) -> bool {
    let mut peak_idx = 0;
    let mut peak_val = 0;
    for (i, &s) in samples.iter().enumerate() {
        if s > peak_val {
            peak_val = s;
            peak_idx = i;
        }
    }
    let (rising, falling, _) = direction_counts(samples, peak_idx, SAMPLE_COUNT / 2);
    rising >= 12 || falling >= 12
}

fn is_sawtooth(samples: &[u8; SAMPLE_COUNT]) -> bool {
    let (rising, falling, big_jumps) = direction_counts(samples, 0, SAMPLE_COUNT);
    (1..=2).contains(&big_jumps)
        && ((rising >= 20 && falling <= 5) || (falling >= 20 && rising <= 5))
}

fn duty_bucket(high_count: usize) -> WaveType {
    match high_count * 100 / SAMPLE_COUNT {
        5..=20 => WaveType::Pulse12,
        21..=35 => WaveType::Pulse25,
        36..=65 => WaveType::Pulse50,
        66..=85 => WaveType::Pulse75,
        _ => WaveType::Pulse50,
    }
}

/// Classify wave memory into a [`WaveType`].
pub fn classify(wave_ram: &[u8; WAVE_RAM_SIZE]) -> WaveType {
    let samples = unpack_samples(wave_ram);

    let min = samples.iter().copied().min().unwrap_or(0);
    let max = samples.iter().copied().max().unwrap_or(0);
    let high_count = samples.iter().filter(|&&s| s >= MIDPOINT).count();
    let transitions = (0..SAMPLE_COUNT)
        .filter(|&i| {
            (samples[i] >= MIDPOINT) != (samples[(i + 1) % SAMPLE_COUNT] >= MIDPOINT)
        })
        .count();

    // Low-amplitude content still sounds like a square on the host.
    if max - min < 4 {
        return WaveType::Pulse50;
    }
    if transitions >= 12 {
        return WaveType::NoiseLike;
    }
    if transitions <= 6 {
        return duty_bucket(high_count);
    }
    if is_triangle(&samples) {
        return WaveType::Triangle;
    }
    if is_sawtooth(&samples) {
        return WaveType::Sawtooth;
    }
    WaveType::Pulse50
}
