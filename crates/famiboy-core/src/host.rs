use std::collections::VecDeque;

use crate::diagnostics::{self, Level};

// Destination register ids, as offsets from the host APU base ($4000).
pub const PULSE1_CTRL: u8 = 0x00;
pub const PULSE1_SWEEP: u8 = 0x01;
pub const PULSE1_LO: u8 = 0x02;
pub const PULSE1_HI: u8 = 0x03;
pub const PULSE2_CTRL: u8 = 0x04;
pub const PULSE2_SWEEP: u8 = 0x05;
pub const PULSE2_LO: u8 = 0x06;
pub const PULSE2_HI: u8 = 0x07;
pub const TRIANGLE_LINEAR: u8 = 0x08;
pub const TRIANGLE_LO: u8 = 0x0A;
pub const TRIANGLE_HI: u8 = 0x0B;
pub const NOISE_CTRL: u8 = 0x0C;
pub const NOISE_PERIOD: u8 = 0x0E;
pub const NOISE_LENGTH: u8 = 0x0F;
pub const STATUS: u8 = 0x15;

/// Number of queueable register ids; anything at or above is dropped.
pub const HOST_REG_COUNT: usize = 0x18;

pub const HOST_APU_BASE: u16 = 0x4000;

/// Registers whose write restarts a channel phase or length counter. These
/// must reach the host even when the value repeats.
pub const EDGE_REGISTERS: [u8; 4] = [PULSE1_HI, PULSE2_HI, TRIANGLE_HI, NOISE_LENGTH];

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostWrite {
    pub reg: u8,
    pub value: u8,
}

impl HostWrite {
    pub const fn new(reg: u8, value: u8) -> Self {
        Self { reg, value }
    }

    /// Absolute host address of the register.
    pub const fn address(self) -> u16 {
        HOST_APU_BASE + self.reg as u16
    }
}

/// Outbound side of the engine: everything it says to the host goes through
/// here.
pub trait HostSink {
    fn push(&mut self, write: HostWrite);

    /// Queue a destination register write, dropping ids outside the host
    /// register window.
    #[inline]
    fn queue_write(&mut self, reg: u8, value: u8) {
        if (reg as usize) < HOST_REG_COUNT {
            self.push(HostWrite::new(reg, value));
        }
    }
}

impl HostSink for Vec<HostWrite> {
    fn push(&mut self, write: HostWrite) {
        Vec::push(self, write);
    }
}

impl<T: HostSink + ?Sized> HostSink for &mut T {
    fn push(&mut self, write: HostWrite) {
        (**self).push(write);
    }
}

/// Bounded command buffer feeding the host bus.
///
/// This queue is *lossy* when full: new writes are dropped and counted.
#[derive(Clone, Debug)]
pub struct BusQueue {
    pending: VecDeque<HostWrite>,
    capacity: usize,
    latest: [Option<u8>; HOST_REG_COUNT],
    differential: bool,
    dropped: u64,
    overflowed: bool,
}

impl BusQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
            latest: [None; HOST_REG_COUNT],
            differential: false,
            dropped: 0,
            overflowed: false,
        }
    }

    /// Skip writes that repeat the last value sent to a register. Edge
    /// registers always pass.
    pub fn with_differential(mut self, differential: bool) -> Self {
        self.differential = differential;
        self
    }

    pub fn differential(&self) -> bool {
        self.differential
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total writes lost to overflow since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Last value accepted for a register, if any.
    pub fn latest(&self, reg: u8) -> Option<u8> {
        self.latest.get(reg as usize).copied().flatten()
    }

    /// Host register image as `(reg, value)` pairs for every register that
    /// has been written.
    pub fn image(&self) -> impl Iterator<Item = HostWrite> + '_ {
        self.latest
            .iter()
            .enumerate()
            .filter_map(|(reg, value)| value.map(|v| HostWrite::new(reg as u8, v)))
    }

    /// Take every pending write in FIFO order.
    pub fn drain(&mut self) -> Vec<HostWrite> {
        self.overflowed = false;
        self.pending.drain(..).collect()
    }
}

impl Default for BusQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY).with_differential(true)
    }
}

impl HostSink for BusQueue {
    fn push(&mut self, write: HostWrite) {
        let slot = write.reg as usize;
        if self.differential
            && !EDGE_REGISTERS.contains(&write.reg)
            && self.latest[slot] == Some(write.value)
        {
            return;
        }

        if self.pending.len() >= self.capacity {
            self.dropped += 1;
            if !self.overflowed {
                self.overflowed = true;
                diagnostics::emit(
                    Level::Warn,
                    "famiboy::bus",
                    format_args!(
                        "bus queue full ({} writes), dropping ${:04X}={:02X}",
                        self.capacity,
                        write.address(),
                        write.value
                    ),
                );
            }
            return;
        }

        self.latest[slot] = Some(write.value);
        self.pending.push_back(write);
    }
}
