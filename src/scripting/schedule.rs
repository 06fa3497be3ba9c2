//! Scripting domain: delayed sequence start.

use bevy::prelude::*;
use std::time::Duration;

/// One-shot delay before a character's loaded sequence starts. Ticked by the
/// fixed step; removed once it fires.
#[derive(Component, Debug)]
pub struct PendingStart {
    pub timer: Timer,
}

impl PendingStart {
    pub fn new(delay_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(delay_secs.max(0.0), TimerMode::Once),
        }
    }

    pub fn tick(&mut self, delta: Duration) {
        self.timer.tick(delta);
    }

    pub fn is_due(&self) -> bool {
        self.timer.remaining_secs() == 0.0
    }
}
