//! Explicit frame scheduler
//!
//! Replaces a self-rescheduling frame callback: the game stops the
//! scheduler on GameOver and starts it again on restart. The host requests
//! the next display frame only while [`FrameScheduler::is_running`].

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    running: bool,
    /// Frames run since creation
    frames: u64,
    /// Frames run since the last start
    frames_since_start: u64,
}

impl FrameScheduler {
    /// A scheduler that is already running
    pub fn running() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Resume scheduling. Returns true if it was stopped (host must re-arm its callback).
    pub fn start(&mut self) -> bool {
        let was_stopped = !self.running;
        if was_stopped {
            self.running = true;
            self.frames_since_start = 0;
            log::debug!("Frame scheduler started");
        }
        was_stopped
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::debug!(
                "Frame scheduler stopped after {} frames",
                self.frames_since_start
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Count a frame. Returns false (and counts nothing) while stopped.
    pub fn begin_frame(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.frames += 1;
        self.frames_since_start += 1;
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
