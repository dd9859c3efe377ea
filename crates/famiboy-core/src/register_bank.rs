//! Emulated source-APU register image ($FF10-$FF3F).

pub const APU_REG_START: u16 = 0xFF10;
pub const APU_REG_END: u16 = 0xFF3F;
pub const APU_REG_SIZE: usize = (APU_REG_END - APU_REG_START + 1) as usize;

// Cell offsets from $FF10.
pub const NR10: usize = 0x00;
pub const NR11: usize = 0x01;
pub const NR12: usize = 0x02;
pub const NR13: usize = 0x03;
pub const NR14: usize = 0x04;
pub const NR21: usize = 0x06;
pub const NR22: usize = 0x07;
pub const NR23: usize = 0x08;
pub const NR24: usize = 0x09;
pub const NR30: usize = 0x0A;
pub const NR31: usize = 0x0B;
pub const NR32: usize = 0x0C;
pub const NR33: usize = 0x0D;
pub const NR34: usize = 0x0E;
pub const NR41: usize = 0x10;
pub const NR42: usize = 0x11;
pub const NR43: usize = 0x12;
pub const NR44: usize = 0x13;
pub const NR50: usize = 0x14;
pub const NR51: usize = 0x15;
pub const NR52: usize = 0x16;
pub const WAVE_RAM_START: usize = 0x20;
pub const WAVE_RAM_SIZE: usize = 0x10;

const POWER_ON_REGS: [u8; WAVE_RAM_START] = [
    0x80, 0xBF, 0xF3, 0x00, 0xBF, 0x00, 0x3F, 0x00, 0x00, 0xBF, 0x7F, 0x00, 0x9F, 0x00, 0xBF, 0x00,
    0xFF, 0x00, 0x00, 0xBF, 0x77, 0xF3, 0xF1, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const POWER_ON_WAVE: [u8; WAVE_RAM_SIZE] = [
    0xAC, 0xDD, 0xDA, 0x48, 0x36, 0x02, 0xCF, 0x16, 0x2C, 0x04, 0xE5, 0x2C, 0xAC, 0xDD, 0xDA, 0x48,
];

// Bits that always read back as 1. Unused cells read as 0xFF, wave RAM is
// fully readable.
const READ_MASK: [u8; APU_REG_SIZE] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, // unused
    0x3F, 0x00, 0xFF, 0xBF, // NR21-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, // unused
    0xFF, 0x00, 0x00, 0xBF, // NR41-NR44
    0x00, 0x00, 0x70, // NR50-NR52
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // unused
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Result of a write against the bank, used by the engine to dispatch
/// trigger and quirk handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankWrite {
    /// Address outside the window, or a non-wave cell while powered off.
    Dropped,
    /// Master enable went from 1 to 0; non-wave cells have been zeroed.
    PoweredOff,
    /// Master enable written without a 1 -> 0 transition.
    MasterEnable,
    /// Byte stored verbatim at the given cell offset.
    Stored(usize),
}

pub struct RegisterBank {
    regs: [u8; APU_REG_SIZE],
    enabled: bool,
}

impl RegisterBank {
    pub fn new() -> Self {
        let mut regs = [0u8; APU_REG_SIZE];
        regs[..WAVE_RAM_START].copy_from_slice(&POWER_ON_REGS);
        regs[WAVE_RAM_START..].copy_from_slice(&POWER_ON_WAVE);
        Self {
            enabled: regs[NR52] & 0x80 != 0,
            regs,
        }
    }

    #[inline]
    fn offset(addr: u16) -> Option<usize> {
        if (APU_REG_START..=APU_REG_END).contains(&addr) {
            Some((addr - APU_REG_START) as usize)
        } else {
            None
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn read(&self, addr: u16) -> u8 {
        match Self::offset(addr) {
            Some(idx) => self.regs[idx] | READ_MASK[idx],
            None => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, val: u8) -> BankWrite {
        let Some(idx) = Self::offset(addr) else {
            return BankWrite::Dropped;
        };

        if idx == NR52 {
            let was_enabled = self.enabled;
            self.enabled = val & 0x80 != 0;
            if was_enabled && !self.enabled {
                self.regs[..WAVE_RAM_START].fill(0);
                self.regs[NR52] = 0;
                return BankWrite::PoweredOff;
            }
            self.regs[NR52] = val & 0x80;
            return BankWrite::MasterEnable;
        }

        if !self.enabled && idx < WAVE_RAM_START {
            return BankWrite::Dropped;
        }

        self.regs[idx] = val;
        BankWrite::Stored(idx)
    }

    /// Raw stored byte at a cell offset, without the read mask.
    #[inline]
    pub fn raw(&self, idx: usize) -> u8 {
        self.regs[idx]
    }

    /// 11-bit frequency assembled from a low cell and the following
    /// high/trigger cell.
    #[inline]
    pub fn frequency(&self, low: usize) -> u16 {
        self.regs[low] as u16 | ((self.regs[low + 1] & 0x07) as u16) << 8
    }

    pub fn wave_ram(&self) -> [u8; WAVE_RAM_SIZE] {
        let mut wave = [0u8; WAVE_RAM_SIZE];
        wave.copy_from_slice(&self.regs[WAVE_RAM_START..]);
        wave
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_combines_low_and_high_cells() {
        let mut bank = RegisterBank::new();
        bank.write(0xFF13, 0x34);
        bank.write(0xFF14, 0x86);
        assert_eq!(bank.frequency(NR13), 0x634);
    }

    #[test]
    fn power_off_only_reports_on_falling_edge() {
        let mut bank = RegisterBank::new();
        assert_eq!(bank.write(0xFF26, 0x00), BankWrite::PoweredOff);
        assert_eq!(bank.write(0xFF26, 0x00), BankWrite::MasterEnable);
        assert_eq!(bank.write(0xFF26, 0x80), BankWrite::MasterEnable);
    }

    #[test]
    fn wave_ram_slice_tracks_writes() {
        let mut bank = RegisterBank::new();
        bank.write(0xFF3F, 0x5A);
        assert_eq!(bank.wave_ram()[15], 0x5A);
    }
}
