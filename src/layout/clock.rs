use std::time::Duration;

const MAX_CATCH_UP_TICKS: u32 = 4;

fn interval_for(rate_hz: f32) -> Duration {
    Duration::from_secs_f32(1.0 / rate_hz.clamp(1.0, 240.0))
}

/// Fixed-rate tick source for the physics loop. Each `start` begins a new
/// generation and discards the previous one, so a graph never has two
/// loops driving it.
#[derive(Clone, Debug)]
pub struct PhysicsClock {
    interval: Duration,
    accumulator: Duration,
    generation: u64,
    running: bool,
}

impl PhysicsClock {
    pub fn new(rate_hz: f32) -> Self {
        Self {
            interval: interval_for(rate_hz),
            accumulator: Duration::ZERO,
            generation: 0,
            running: false,
        }
    }

    /// Changes the tick rate without opening a new generation.
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.interval = interval_for(rate_hz);
        self.accumulator = Duration::ZERO;
    }

    pub fn start(&mut self) -> u64 {
        if self.running {
            log::debug!("cancelling physics loop #{}", self.generation);
        }
        self.generation += 1;
        self.accumulator = Duration::ZERO;
        self.running = true;
        self.generation
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks owed for `elapsed` wall time. Long stalls are capped rather
    /// than replayed.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.interval && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        if ticks == MAX_CATCH_UP_TICKS {
            self.accumulator = self.accumulator.min(self.interval);
        }
        ticks
    }
}
