use famiboy_core::host::HostWrite;
use famiboy_core::{ApuMapper, BusQueue};
use log::debug;

use crate::config::AppConfig;
use crate::trace::Command;

/// Host writes transmitted at the end of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutput {
    /// 0-based frame number.
    pub frame: u64,
    pub writes: Vec<HostWrite>,
}

impl FrameOutput {
    /// `frame N: $4000=BF $4002=FD ...`
    pub fn to_line(&self) -> String {
        let mut line = format!("frame {}:", self.frame);
        for write in &self.writes {
            line.push_str(&format!(" ${:04X}={:02X}", write.address(), write.value));
        }
        line
    }
}

/// Drives an [`ApuMapper`] from a parsed register trace.
pub struct Replay {
    apu: ApuMapper<BusQueue>,
    frame: u64,
}

impl Replay {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            apu: ApuMapper::with_config(config.bus_queue(), config.apu_config()),
            frame: 0,
        }
    }

    pub fn apu(&self) -> &ApuMapper<BusQueue> {
        &self.apu
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Final host register image, in register order.
    pub fn image(&self) -> Vec<HostWrite> {
        self.apu.sink().image().collect()
    }

    /// Apply `commands` in order, stopping once `max_frames` frames have run.
    /// Frames that produced no host writes are left out of the result. Writes
    /// still queued when the trace ends (a trailing power-off, say) are
    /// reported under the next frame number without running that frame.
    pub fn run(&mut self, commands: &[Command], max_frames: Option<u64>) -> Vec<FrameOutput> {
        let mut out = Vec::new();
        for command in commands {
            match *command {
                Command::Write { addr, value } => self.apu.write(addr, value),
                Command::Read { addr } => {
                    debug!("read ${addr:04X} -> {:02X}", self.apu.read(addr));
                }
                Command::Frame { count } => {
                    for _ in 0..count {
                        if max_frames.is_some_and(|max| self.frame >= max) {
                            return out;
                        }
                        if let Some(output) = self.end_frame() {
                            out.push(output);
                        }
                    }
                }
            }
        }
        let writes = self.apu.sink_mut().drain();
        if !writes.is_empty() {
            out.push(FrameOutput {
                frame: self.frame,
                writes,
            });
        }
        out
    }

    fn end_frame(&mut self) -> Option<FrameOutput> {
        self.apu.end_frame();
        let writes = self.apu.sink_mut().drain();
        let frame = self.frame;
        self.frame += 1;
        if writes.is_empty() {
            None
        } else {
            Some(FrameOutput { frame, writes })
        }
    }
}
