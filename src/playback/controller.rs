use crate::foundation::error::{CasemapError, CasemapResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlayState {
    Paused,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlaybackState {
    pub selected_day_index: usize,
    pub state: PlayState,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self.state == PlayState::Playing
    }
}

/// Permission for exactly one deferred tick.
///
/// Only the most recently issued token is honoured, and only while playing. Any transition
/// out of `Playing` invalidates it, so a tick that fires late is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickToken(u64);

/// Day-selection state machine.
///
/// Playback loops: a tick on the last day moves to day 0 and keeps playing. Seeking outside
/// `[0, number_of_days)` is rejected and leaves the state unchanged.
#[derive(Debug)]
pub struct PlaybackController {
    number_of_days: usize,
    index: usize,
    state: PlayState,
    issued: u64,
    outstanding: Option<u64>,
}

impl PlaybackController {
    /// Starts paused on day 0.
    pub fn new(number_of_days: usize) -> CasemapResult<Self> {
        if number_of_days == 0 {
            return Err(CasemapError::validation(
                "playback requires at least one day",
            ));
        }
        Ok(Self {
            number_of_days,
            index: 0,
            state: PlayState::Paused,
            issued: 0,
            outstanding: None,
        })
    }

    pub fn number_of_days(&self) -> usize {
        self.number_of_days
    }

    pub fn selected_day_index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            selected_day_index: self.index,
            state: self.state,
        }
    }

    fn pause(&mut self) {
        self.state = PlayState::Paused;
        self.outstanding = None;
    }

    fn issue(&mut self) -> TickToken {
        self.issued += 1;
        self.outstanding = Some(self.issued);
        TickToken(self.issued)
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.pause();
    }

    pub fn previous(&mut self) {
        self.index = (self.index + self.number_of_days - 1) % self.number_of_days;
        self.pause();
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.number_of_days;
        self.pause();
    }

    pub fn seek(&mut self, index: usize) -> CasemapResult<()> {
        if index >= self.number_of_days {
            return Err(CasemapError::out_of_range(index, self.number_of_days));
        }
        self.index = index;
        self.pause();
        Ok(())
    }

    /// Returns the token for the first tick when this starts playback.
    pub fn toggle_play(&mut self) -> Option<TickToken> {
        match self.state {
            PlayState::Playing => {
                self.pause();
                None
            }
            PlayState::Paused => {
                self.state = PlayState::Playing;
                Some(self.issue())
            }
        }
    }

    /// Apply a fired tick. Returns the token for the next tick, or `None` if the tick was
    /// stale and ignored.
    pub fn on_tick(&mut self, token: TickToken) -> Option<TickToken> {
        if self.state != PlayState::Playing || self.outstanding != Some(token.0) {
            return None;
        }
        // Guard: the transitions above keep `index` in range.
        if self.index >= self.number_of_days {
            self.reset();
            return None;
        }
        self.index = (self.index + 1) % self.number_of_days;
        Some(self.issue())
    }
}
