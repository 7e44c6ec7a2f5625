use serde::{Deserialize, Serialize};

/// Fixed-interval frame playback. The simulation only swaps which
/// animation is current and reads the frame index and completion flag;
/// sprite lookup is the renderer's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    frame_count: usize,
    interval: f32,
    timer: f32,
    frame: usize,
    times_played: u32,
}

impl Animation {
    pub fn new(frame_count: usize, interval: f32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            interval,
            timer: 0.0,
            frame: 0,
            times_played: 0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        // Single-frame animations never advance and never complete.
        if self.frame_count <= 1 {
            return;
        }
        self.timer += dt;
        while self.timer >= self.interval {
            self.timer -= self.interval;
            self.frame += 1;
            if self.frame >= self.frame_count {
                self.frame = 0;
                self.times_played += 1;
            }
        }
    }

    pub fn current_frame(&self) -> usize {
        self.frame
    }

    /// True once a full playthrough has completed.
    pub fn is_done(&self) -> bool {
        self.times_played > 0
    }

    /// Restart playback and clear the play count.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.frame = 0;
        self.times_played = 0;
    }
}
