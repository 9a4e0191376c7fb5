mod support;

use std::time::Duration;

use casemap::{CasemapConfig, CasemapError, Dataset, PlayState, PlaybackController, progress_label};

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn playback_loops_over_the_loaded_days() {
    let (_dir, paths) = support::write_fixture("playback", support::CASES);
    let mut cfg = CasemapConfig::default();
    cfg.playback.tick_delay_ms = 1;
    let dataset = Dataset::load(&paths, &cfg).unwrap();

    let mut session = dataset.playback_session(&cfg).unwrap();
    assert_eq!(session.state().selected_day_index, 0);
    assert_eq!(session.state().state, PlayState::Paused);

    session.toggle_play().unwrap();
    let seen: Vec<_> = (0..7)
        .map(|_| session.wait_tick(WAIT).unwrap().unwrap())
        .collect();
    assert_eq!(seen, [1, 2, 0, 1, 2, 0, 1]);
    assert!(session.state().is_playing());

    session.previous();
    assert_eq!(session.state().selected_day_index, 0);
    assert!(!session.state().is_playing());
    assert_eq!(session.wait_tick(Duration::from_millis(20)).unwrap(), None);

    session.reset();
    assert_eq!(session.state().selected_day_index, 0);
    assert_eq!(progress_label(session.state().selected_day_index, 3), "Day 1 of 3");
}

#[test]
fn ticks_advance_exactly_n_steps_modulo_days() {
    for days in [1usize, 2, 5, 17] {
        for start in 0..days {
            let mut c = PlaybackController::new(days).unwrap();
            c.seek(start).unwrap();
            let mut token = c.toggle_play().unwrap();
            let n = 3 * days + 1;
            for _ in 0..n {
                token = c.on_tick(token).unwrap();
            }
            assert_eq!(c.selected_day_index(), (start + n) % days);
        }
    }
}

#[test]
fn seek_outside_days_is_rejected() {
    let (_dir, paths) = support::write_fixture("playback-seek", support::CASES);
    let cfg = CasemapConfig::default();
    let dataset = Dataset::load(&paths, &cfg).unwrap();
    let mut session = dataset.playback_session(&cfg).unwrap();

    session.seek(2).unwrap();
    assert!(matches!(
        session.seek(3),
        Err(CasemapError::OutOfRange { index: 3, len: 3 })
    ));
    assert_eq!(session.state().selected_day_index, 2);
}
