use crate::channel::VoiceId;

/// How the per-frame work is spread over update steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UpdateCadence {
    /// One step per frame updating every voice.
    #[default]
    AllChannels,
    /// Four steps per frame, one voice emitted per step.
    QuarterTick,
    /// One step per frame, alternating between the pulse pair and the
    /// wave/noise pair.
    ChannelPair,
    /// One step per frame; pulses every step, wave and noise every third.
    PulsePriority,
}

impl UpdateCadence {
    pub const fn steps_per_frame(self) -> u32 {
        match self {
            UpdateCadence::QuarterTick => 4,
            _ => 1,
        }
    }

    const fn tick_count(self) -> u8 {
        match self {
            UpdateCadence::AllChannels => 1,
            UpdateCadence::QuarterTick => 4,
            UpdateCadence::ChannelPair => 2,
            UpdateCadence::PulsePriority => 3,
        }
    }
}

/// Work to perform in a single update step, in execution order: envelopes,
/// sweep, frequency refresh, wave pre-allocation, then emission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepPlan {
    pub tick: u8,
    pub envelopes: bool,
    pub sweep: bool,
    pub refresh_pulse2: bool,
    pub refresh_wave: bool,
    pub pre_allocate: bool,
    emit: [bool; 4],
}

impl StepPlan {
    #[inline]
    pub fn emits(&self, voice: VoiceId) -> bool {
        self.emit[voice.index()]
    }

    fn full(tick: u8) -> Self {
        Self {
            tick,
            envelopes: true,
            sweep: true,
            refresh_pulse2: true,
            refresh_wave: true,
            pre_allocate: true,
            emit: [true; 4],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    cadence: UpdateCadence,
    tick: u8,
}

impl Scheduler {
    pub fn new(cadence: UpdateCadence) -> Self {
        Self { cadence, tick: 0 }
    }

    pub fn cadence(&self) -> UpdateCadence {
        self.cadence
    }

    /// Tick the next step will run with.
    pub fn tick(&self) -> u8 {
        self.tick
    }

    pub fn reset(&mut self) {
        self.tick = 0;
    }

    /// Plan for the current tick, then advance the rotation.
    pub fn next_plan(&mut self) -> StepPlan {
        let tick = self.tick;
        self.tick = (self.tick + 1) % self.cadence.tick_count();
        plan_for(self.cadence, tick)
    }
}

fn plan_for(cadence: UpdateCadence, tick: u8) -> StepPlan {
    match cadence {
        UpdateCadence::AllChannels => StepPlan::full(tick),
        UpdateCadence::QuarterTick => {
            let mut plan = StepPlan {
                tick,
                ..StepPlan::default()
            };
            match tick {
                0 => {
                    plan.envelopes = true;
                    plan.sweep = true;
                }
                1 => {
                    plan.refresh_wave = true;
                    plan.pre_allocate = true;
                    plan.refresh_pulse2 = true;
                }
                2 => plan.refresh_wave = true,
                _ => {}
            }
            plan.emit[(tick & 3) as usize] = true;
            plan
        }
        UpdateCadence::ChannelPair => {
            let mut plan = StepPlan::full(tick);
            plan.emit = if tick == 0 {
                [true, true, false, false]
            } else {
                [false, false, true, true]
            };
            plan
        }
        UpdateCadence::PulsePriority => {
            let mut plan = StepPlan::full(tick);
            let slow = tick == 0;
            plan.emit = [true, true, slow, slow];
            plan
        }
    }
}
