//! Window-less display for batch runs and smoke tests

use replay_core::{Display, DisplayStatus, RateCommand, Snapshot, Status};
use std::convert::Infallible;
use std::time::Duration;

/// Presents nothing; closes itself after a fixed number of ticks.
pub struct HeadlessDisplay {
    remaining: u64,
    interval: Duration,
    last: Option<Status>,
}

impl HeadlessDisplay {
    /// `interval` is slept on every pump so virtual time advances at a
    /// realistic pace.
    pub fn new(ticks: u64, interval: Duration) -> Self {
        Self {
            remaining: ticks,
            interval,
            last: None,
        }
    }

    pub fn last_status(&self) -> Option<Status> {
        self.last
    }
}

impl Display for HeadlessDisplay {
    type Error = Infallible;

    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Infallible> {
        tracing::trace!(status = %snapshot.status, marker = ?snapshot.marker, "tick");
        self.last = Some(snapshot.status);
        Ok(())
    }

    fn pump(&mut self, _commands: &mut Vec<RateCommand>) -> DisplayStatus {
        if self.remaining <= 1 {
            if let Some(status) = self.last {
                tracing::info!(%status, "headless run finished");
            }
            return DisplayStatus::Closed;
        }
        self.remaining -= 1;
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
        DisplayStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::{run, EventLayout, Player, SourceConfig};

    fn player() -> Player {
        let layout = EventLayout::default();
        let bytes: Vec<u8> = (0..4u32)
            .flat_map(|i| layout.encode(1, 1, 1, 1, i * 1_000))
            .collect();
        Player::new(SourceConfig::default().decode(&bytes).unwrap())
    }

    #[test]
    fn closes_after_requested_ticks() {
        let mut player = player();
        let mut display = HeadlessDisplay::new(5, Duration::ZERO);
        run(&mut player, &mut display).unwrap();
        let status = display.last_status().unwrap();
        assert_eq!(status.rate, 0.0);
        assert_eq!(status.virtual_time, 0.0);
    }

    #[test]
    fn zero_ticks_still_presents_once() {
        let mut player = player();
        let mut display = HeadlessDisplay::new(0, Duration::ZERO);
        run(&mut player, &mut display).unwrap();
        assert!(display.last_status().is_some());
    }
}
