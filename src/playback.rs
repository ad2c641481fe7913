use std::time::Duration;

/// Delay between replayed frames
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// What a playback tick asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Show the history entry at this index
    Frame(usize),
    /// Every entry has been shown; normal input resumes
    Finished,
}

#[derive(Debug, Clone, Copy)]
struct Run {
    next_frame: usize,
    total_frames: usize,
    elapsed: Duration,
}

/// Replays history entries `0..n` one per interval.
///
/// The driver owns no callback: the host feeds it elapsed time through
/// [`Playback::tick`] and asks [`Playback::time_until_next_frame`] when to
/// wake up next. Cancelling or dropping it leaves nothing scheduled.
#[derive(Debug)]
pub struct Playback {
    interval: Duration,
    run: Option<Run>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Playback {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// Begins replaying `frames` entries. Returns false, changing nothing,
    /// if a run is already active or there is nothing to replay.
    pub fn start(&mut self, frames: usize) -> bool {
        if self.run.is_some() || frames == 0 {
            return false;
        }
        self.run = Some(Run {
            next_frame: 0,
            total_frames: frames,
            elapsed: Duration::ZERO,
        });
        true
    }

    /// Advances the timer by `dt`. Frame `k` is due at `(k + 1) * interval`
    /// and the last frame stays up for one more interval before `Finished`.
    /// A long tick may emit several events.
    pub fn tick(&mut self, dt: Duration) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        let Some(run) = self.run.as_mut() else {
            return events;
        };

        run.elapsed += dt;
        let mut finished = false;
        while !finished && run.elapsed >= self.interval {
            run.elapsed -= self.interval;
            if run.next_frame < run.total_frames {
                events.push(PlaybackEvent::Frame(run.next_frame));
                run.next_frame += 1;
            } else {
                finished = true;
            }
        }
        if finished {
            events.push(PlaybackEvent::Finished);
            self.run = None;
        }
        events
    }

    /// How long until the next frame is due, if a run is active
    pub fn time_until_next_frame(&self) -> Option<Duration> {
        self.run.map(|run| self.interval.saturating_sub(run.elapsed))
    }

    /// Stops an active run without emitting further events.
    /// Returns true if something was running.
    pub fn cancel(&mut self) -> bool {
        self.run.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_start_requires_frames() {
        let mut playback = Playback::default();
        assert!(!playback.start(0));
        assert!(!playback.is_active());
    }

    #[test]
    fn test_restart_while_active_is_rejected() {
        let mut playback = Playback::default();
        assert!(playback.start(3));
        assert!(!playback.start(5));
        assert!(playback.is_active());
    }

    #[test]
    fn test_frames_arrive_at_fixed_spacing() {
        let mut playback = Playback::new(500 * MS);
        playback.start(3);

        assert!(playback.tick(499 * MS).is_empty());
        assert_eq!(playback.tick(MS), vec![PlaybackEvent::Frame(0)]);
        assert_eq!(playback.time_until_next_frame(), Some(500 * MS));
        assert_eq!(playback.tick(500 * MS), vec![PlaybackEvent::Frame(1)]);
        assert_eq!(playback.tick(500 * MS), vec![PlaybackEvent::Frame(2)]);
        assert!(playback.is_active());
        assert_eq!(playback.tick(500 * MS), vec![PlaybackEvent::Finished]);
        assert!(!playback.is_active());
        assert!(playback.tick(500 * MS).is_empty());
    }

    #[test]
    fn test_long_tick_catches_up() {
        let mut playback = Playback::new(100 * MS);
        playback.start(2);
        assert_eq!(
            playback.tick(1000 * MS),
            vec![
                PlaybackEvent::Frame(0),
                PlaybackEvent::Frame(1),
                PlaybackEvent::Finished
            ]
        );
    }

    #[test]
    fn test_cancel_releases_timer() {
        let mut playback = Playback::default();
        playback.start(4);
        assert!(playback.cancel());
        assert!(!playback.is_active());
        assert_eq!(playback.time_until_next_frame(), None);
        assert!(playback.tick(DEFAULT_INTERVAL).is_empty());
        assert!(!playback.cancel());
    }
}
