use std::{
    sync::mpsc::{self, RecvTimeoutError},
    time::Duration,
};

use tracing::trace;

use crate::{
    foundation::error::CasemapResult,
    playback::{
        controller::{PlaybackController, PlaybackState, TickToken},
        ticker::Ticker,
    },
};

/// Controller plus the single timer that drives it while playing.
///
/// All state changes happen on the thread that owns the session; the timer thread only
/// delivers tokens.
pub struct PlaybackSession {
    controller: PlaybackController,
    delay: Duration,
    timer: Option<Ticker>,
    tick_tx: mpsc::Sender<TickToken>,
    tick_rx: mpsc::Receiver<TickToken>,
}

impl PlaybackSession {
    pub fn new(number_of_days: usize, delay: Duration) -> CasemapResult<Self> {
        let (tick_tx, tick_rx) = mpsc::channel();
        Ok(Self {
            controller: PlaybackController::new(number_of_days)?,
            delay,
            timer: None,
            tick_tx,
            tick_rx,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    fn arm(&mut self, token: Option<TickToken>) -> CasemapResult<()> {
        self.disarm();
        if let Some(token) = token {
            self.timer = Some(Ticker::schedule(self.delay, token, self.tick_tx.clone())?);
        }
        Ok(())
    }

    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.disarm();
    }

    pub fn previous(&mut self) {
        self.controller.previous();
        self.disarm();
    }

    pub fn next(&mut self) {
        self.controller.next();
        self.disarm();
    }

    pub fn seek(&mut self, index: usize) -> CasemapResult<()> {
        self.controller.seek(index)?;
        self.disarm();
        Ok(())
    }

    pub fn toggle_play(&mut self) -> CasemapResult<()> {
        let token = self.controller.toggle_play();
        self.arm(token)
    }

    /// Block until the next tick is applied, returning the new day index.
    ///
    /// Returns `None` when not playing or when nothing arrives within `timeout`. Stale ticks
    /// are drained and ignored.
    pub fn wait_tick(&mut self, timeout: Duration) -> CasemapResult<Option<usize>> {
        while self.controller.is_playing() {
            let token = match self.tick_rx.recv_timeout(timeout) {
                Ok(token) => token,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return Ok(None);
                }
            };
            match self.controller.on_tick(token) {
                Some(next) => {
                    self.arm(Some(next))?;
                    return Ok(Some(self.controller.selected_day_index()));
                }
                None => trace!(?token, "ignored stale tick"),
            }
        }
        Ok(None)
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn ticks_advance_while_playing() {
        let mut s = PlaybackSession::new(3, Duration::from_millis(1)).unwrap();
        s.toggle_play().unwrap();
        assert_eq!(s.wait_tick(WAIT).unwrap(), Some(1));
        assert_eq!(s.wait_tick(WAIT).unwrap(), Some(2));
        assert_eq!(s.wait_tick(WAIT).unwrap(), Some(0));
        assert!(s.state().is_playing());
    }

    #[test]
    fn pausing_stops_ticks() {
        let mut s = PlaybackSession::new(3, Duration::from_millis(1)).unwrap();
        s.toggle_play().unwrap();
        assert_eq!(s.wait_tick(WAIT).unwrap(), Some(1));
        s.toggle_play().unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(s.wait_tick(Duration::from_millis(20)).unwrap(), None);
        assert_eq!(s.state().selected_day_index, 1);
    }

    #[test]
    fn stale_tick_after_resume_is_discarded() {
        let mut s = PlaybackSession::new(10, Duration::from_millis(1)).unwrap();
        s.toggle_play().unwrap();
        // Let the first tick land in the channel, then pause and resume.
        std::thread::sleep(Duration::from_millis(30));
        s.toggle_play().unwrap();
        s.toggle_play().unwrap();
        assert_eq!(s.wait_tick(WAIT).unwrap(), Some(1));
        assert_eq!(s.wait_tick(WAIT).unwrap(), Some(2));
    }

    #[test]
    fn seek_pauses() {
        let mut s = PlaybackSession::new(4, Duration::from_millis(1)).unwrap();
        s.toggle_play().unwrap();
        s.seek(3).unwrap();
        assert!(!s.state().is_playing());
        assert!(s.seek(4).is_err());
        assert_eq!(s.wait_tick(Duration::from_millis(10)).unwrap(), None);
    }
}
