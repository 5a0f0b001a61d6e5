use super::*;
use crate::config::{Layout, SessionConfig, TrackConfig, Tuning};
use crate::error::FrameError;
use crate::range::parse_ranges;

const DT: f64 = 1.0 / 60.0;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn track_config(frames: &str) -> TrackConfig {
    TrackConfig {
        ranges: parse_ranges(frames),
        scroll_speed: 300.0,
        offset: 0.0,
        color: "#00ff00".to_string(),
        gutter: false,
        gutter_color: "#ffffff".to_string(),
    }
}

fn new_track() -> Track {
    Track::new(0, Rect::new(0.0, 0.0, 500.0, 76.0), Tuning::default())
}

fn started_track(config: TrackConfig) -> Track {
    let mut track = new_track();
    track.set_config(config);
    track.start().unwrap();
    track
}

/// Tick until the track reports completion; returns the number of `Finished` renders seen.
fn run_to_end(track: &mut Track, seconds: f64) -> usize {
    let mut finished = 0;
    let steps = (seconds / DT).ceil() as usize;
    for _ in 0..steps {
        track.update(DT);
        if track.render() == Render::Finished {
            finished += 1;
        }
    }
    finished
}

fn session_config(tracks: &[&str]) -> SessionConfig {
    let mut config = SessionConfig::default();
    for frames in tracks {
        config.push_track(parse_ranges(frames), "#00ff00");
    }
    config
}

#[test]
fn test_note_geometry_single_range() {
    let track = started_track(track_config("60-120"));

    assert_eq!(track.target_x(), 425.0);
    assert_eq!(track.t_max(), 3.0);
    assert_eq!(track.notes().len(), 1);

    let note = &track.notes()[0];
    assert_eq!(note.expiry(), 2.0);
    assert_eq!(note.rect().x, -175.0);
    assert_eq!(note.rect().width, 300.0);
    assert_eq!(note.rect().height, 76.0);
    assert_eq!(note.velocity(), 300.0);
}

#[test]
fn test_note_trailing_edge_meets_target_at_range_end() {
    let mut track = started_track(track_config("60-120"));

    track.update(0.5);
    track.update(0.5);
    // range start: leading edge on the target
    assert_eq!(track.notes()[0].rect().right(), 425.0);

    track.update(0.5);
    track.update(0.5);
    assert_eq!(track.clock(), 2.0);
    assert_eq!(track.notes()[0].rect().x, 425.0);
}

#[test]
fn test_note_culled_after_grace_window() {
    let mut track = started_track(track_config("60-120"));

    for _ in 0..4 {
        track.update(0.5);
    }
    track.update(0.1);
    assert_eq!(track.notes().len(), 1, "still inside the grace window");

    track.update(0.15);
    assert!(track.notes().is_empty());
}

#[test]
fn test_custom_grace_window() {
    let tuning = Tuning {
        grace_window: 0.3,
        ..Tuning::default()
    };
    let mut track = Track::new(0, Rect::new(0.0, 0.0, 500.0, 76.0), tuning);
    track.set_config(track_config("60-120"));
    track.start().unwrap();

    track.update(2.25);
    assert_eq!(track.notes().len(), 1);
    track.update(0.1);
    assert!(track.notes().is_empty());
}

#[test]
fn test_offset_shifts_every_range() {
    let config = TrackConfig {
        offset: 0.5,
        ..track_config("60-120, 180-240")
    };
    let track = started_track(config);

    assert!(approx_eq(track.notes()[0].expiry(), 2.5));
    assert!(approx_eq(track.notes()[1].expiry(), 4.5));
    assert!(approx_eq(track.notes()[0].rect().x, 425.0 - 300.0 * 2.5));
    assert!(approx_eq(track.t_max(), 5.5));
}

#[test]
fn test_negative_offset() {
    let config = TrackConfig {
        offset: -1.5,
        ..track_config("60-120")
    };
    let mut track = started_track(config);
    assert!(approx_eq(track.notes()[0].expiry(), 0.5));
    assert!(approx_eq(track.t_max(), 1.5));
    assert_eq!(run_to_end(&mut track, 2.0), 1);
}

#[test]
fn test_t_max_uses_latest_end_not_last_range() {
    let track = started_track(track_config("300-360, 60-120"));
    assert_eq!(track.t_max(), 7.0);
}

#[test]
fn test_live_notes_non_increasing_then_finish_once() {
    let mut track = started_track(track_config("10-20, 60-90, 40-45, 120-121"));
    assert_eq!(track.notes().len(), 4);
    assert!(track.is_running());

    let mut previous = track.notes().len();
    let mut finished = 0;
    for _ in 0..(5 * 60) {
        track.update(DT);
        let live = track.notes().len();
        assert!(live <= previous);
        previous = live;
        if track.render() == Render::Finished {
            finished += 1;
            assert_eq!(live, 0);
        }
    }

    assert_eq!(finished, 1);
    assert_eq!(track.state(), TrackState::Idle);
    assert_eq!(track.render(), Render::Empty);
}

#[test]
fn test_render_exposes_only_foremost_note() {
    let mut track = started_track(track_config("10-20, 15-25"));
    assert_eq!(track.notes().len(), 2);

    match track.render() {
        Render::Note(view) => assert_eq!(view.id, 0),
        other => panic!("expected a note, got {:?}", other),
    }
}

#[test]
fn test_overlapping_ranges_culled_independently() {
    let mut track = started_track(track_config("10-20, 15-25"));

    let first_gone = 20.0 / 60.0 + 0.2;
    let second_gone = 25.0 / 60.0 + 0.2;

    let mut saw_second_alone = false;
    let mut t = 0.0;
    while t < second_gone + 0.1 {
        track.update(DT);
        t += DT;
        let ids: Vec<usize> = track.notes().iter().map(Note::id).collect();
        if t < first_gone - DT {
            assert_eq!(ids, vec![0, 1]);
        } else if t > first_gone + DT && t < second_gone - DT {
            assert_eq!(ids, vec![1]);
            if let Render::Note(view) = track.render() {
                assert_eq!(view.id, 1);
                saw_second_alone = true;
            }
        } else if t > second_gone + DT {
            assert!(ids.is_empty());
        }
    }

    assert!(saw_second_alone);
}

#[test]
fn test_reversed_range_does_not_break_rendering() {
    let mut track = started_track(track_config("120-60"));
    let note = &track.notes()[0];
    assert_eq!(note.rect().width, -300.0);
    assert_eq!(note.expiry(), 1.0);

    assert!(matches!(track.render(), Render::Note(_)));
    assert_eq!(run_to_end(&mut track, 3.0), 1);
}

#[test]
fn test_start_fails_on_empty_ranges() {
    let mut track = new_track();
    track.set_config(TrackConfig {
        ranges: Vec::new(),
        ..track_config("1-2")
    });

    assert!(matches!(track.start(), Err(FrameError::EmptyRanges { track: 0 })));
    assert_eq!(track.state(), TrackState::Idle);
    assert!(!track.is_visible());
    assert_eq!(track.clock(), 0.0);
    assert_eq!(track.render(), Render::Empty);
}

#[test]
fn test_start_fails_on_empty_string() {
    let mut track = new_track();
    track.set_config(track_config(""));

    match track.start() {
        Err(FrameError::InvalidRange { track, index }) => {
            assert_eq!(track, 0);
            assert_eq!(index, 0);
        }
        other => panic!("expected InvalidRange, got {:?}", other),
    }
    assert!(!track.is_visible());
    assert!(track.notes().is_empty());
}

#[test]
fn test_start_fails_without_config() {
    let mut track = new_track();
    assert!(matches!(track.start(), Err(FrameError::NotConfigured { track: 0 })));
}

#[test]
fn test_failed_restart_keeps_running_state() {
    let mut track = started_track(track_config("60-120, 180-200"));
    track.update(0.5);

    track.set_config(track_config("60-x"));
    assert!(track.start().is_err());
    assert_eq!(track.clock(), 0.5);
    assert_eq!(track.notes().len(), 2);
    assert!(track.is_running());
}

#[test]
fn test_set_config_does_not_touch_live_notes() {
    let mut track = started_track(track_config("60-120"));
    track.set_config(track_config("10-20, 30-40, 50-60"));
    assert_eq!(track.notes().len(), 1);

    track.start().unwrap();
    assert_eq!(track.notes().len(), 3);
}

#[test]
fn test_set_config_twice_is_idempotent() {
    let once = started_track(track_config("10-20, 15-25"));

    let mut twice = new_track();
    twice.set_config(track_config("10-20, 15-25"));
    twice.set_config(track_config("10-20, 15-25"));
    twice.start().unwrap();

    assert_eq!(once.notes(), twice.notes());
    assert_eq!(once.t_max(), twice.t_max());
    assert_eq!(once.frame(), twice.frame());
}

#[test]
fn test_restart_discards_previous_run() {
    let mut track = started_track(track_config("60-120, 130-140"));
    track.update(2.5);
    assert_eq!(track.notes().len(), 1);

    track.start().unwrap();
    assert_eq!(track.clock(), 0.0);
    assert_eq!(track.notes().len(), 2);
    assert_eq!(track.notes()[0].rect().x, -175.0);
}

#[test]
fn test_gutter_controls_drawable_width() {
    let plain = started_track(track_config("60-120"));
    assert_eq!(plain.frame().width, 425.0);
    assert_eq!(plain.target().x, 425.0);
    assert_eq!(plain.cull(1280.0), Rect::new(425.0, 0.0, 855.0, 76.0));

    let gutter = started_track(TrackConfig {
        gutter: true,
        ..track_config("60-120")
    });
    assert_eq!(gutter.frame().width, 500.0);
    assert_eq!(gutter.target().x, 425.0);
    assert_eq!(gutter.cull(1280.0).x, 500.0);
}

#[test]
fn test_restart_does_not_shrink_width() {
    let mut track = started_track(track_config("60-120"));
    track.start().unwrap();
    track.start().unwrap();
    assert_eq!(track.frame().width, 425.0);
    assert_eq!(track.target_x(), 425.0);
}

#[test]
fn test_target_accounts_for_frame_origin() {
    let mut track = Track::new(0, Rect::new(4.0, 90.0, 500.0, 76.0), Tuning::default());
    track.set_config(track_config("60-120"));
    track.start().unwrap();
    assert_eq!(track.target_x(), 429.0);
    assert_eq!(track.notes()[0].rect().x, -171.0);
    assert_eq!(track.notes()[0].rect().y, 90.0);
}

#[test]
fn test_note_off_screen_flag() {
    let track = started_track(track_config("600-660"));
    let view = track.notes()[0].view();
    assert!(view.rect.right() < 0.0);
    assert!(!view.visible);

    let near = started_track(track_config("60-120"));
    assert!(near.notes()[0].view().visible);
}

#[test]
fn test_large_step_still_finishes() {
    let mut track = started_track(track_config("60-120"));
    track.update(10.0);
    assert!(track.notes().is_empty());
    assert_eq!(track.render(), Render::Finished);
}

#[test]
fn test_notes_stop_moving_past_t_max() {
    let tuning = Tuning {
        grace_window: 5.0,
        ..Tuning::default()
    };
    let mut track = Track::new(0, Rect::new(0.0, 0.0, 500.0, 76.0), tuning);
    track.set_config(track_config("60-120"));
    track.start().unwrap();

    track.update(3.0);
    let x = track.notes()[0].rect().x;
    track.update(1.0);
    assert_eq!(track.notes()[0].rect().x, x);
}

#[test]
fn test_note_update_moves_by_velocity() {
    let mut note = Note::new(3, Rect::new(-10.0, 0.0, 20.0, 5.0), 100.0, 1.0);
    note.update(0.25);
    assert_eq!(note.rect().x, 15.0);
    assert_eq!(note.id(), 3);
}

#[test]
fn test_session_lays_out_tracks() {
    let mut session = Session::default();
    session.start_all(&session_config(&["60-120", "60-120", "60-120"])).unwrap();

    let layout = Layout::default();
    for (i, track) in session.tracks().iter().enumerate() {
        assert_eq!(track.id(), i);
        assert_eq!(track.frame().y, layout.origin_y + i as f64 * 86.0);
        assert_eq!(track.frame().x, layout.origin_x);
    }
}

#[test]
fn test_session_signals_end_once_after_last_track() {
    let mut session = Session::default();
    // finishes in order: track 1, track 0, track 2
    session.start_all(&session_config(&["60-120", "30-45", "120-180"])).unwrap();

    let mut finished = Vec::new();
    let mut ended = 0;
    for _ in 0..(6 * 60) {
        let tick = session.tick(DT);
        for event in &tick.events {
            match event {
                SessionEvent::TrackFinished { track, .. } => finished.push(*track),
                SessionEvent::PlaybackEnded => {
                    assert_eq!(finished.len(), 3);
                    ended += 1;
                }
            }
        }
    }

    assert_eq!(finished, vec![1, 0, 2]);
    assert_eq!(ended, 1);
    assert!(session.playback_ended());
    assert_eq!(session.ended_tracks(), 3);
    assert!(session.views().iter().all(|view| !view.visible));
}

#[test]
fn test_session_end_event_arrives_with_last_finish() {
    let mut session = Session::default();
    session.start_all(&session_config(&["60-120", "60-120"])).unwrap();

    let mut last = None;
    for _ in 0..(4 * 60) {
        let tick = session.tick(DT);
        if tick.playback_ended() {
            last = Some(tick);
        }
    }

    let tick = last.unwrap();
    assert_eq!(tick.events.len(), 3);
    assert_eq!(tick.events[2], SessionEvent::PlaybackEnded);
}

#[test]
fn test_session_start_is_all_or_nothing() {
    let mut session = Session::default();
    session.start_all(&session_config(&["60-120"])).unwrap();
    session.tick(0.5);

    let result = session.start_all(&session_config(&["60-120", "", "30-40"]));
    assert!(matches!(result, Err(FrameError::InvalidRange { track: 1, index: 0 })));

    assert_eq!(session.tracks().len(), 1);
    assert_eq!(session.tracks()[0].clock(), 0.5);
    assert!(session.is_running());
}

#[test]
fn test_session_rejects_empty_and_mismatched_configs() {
    let mut session = Session::default();
    assert!(matches!(
        session.start_all(&SessionConfig::default()),
        Err(FrameError::NoTracks)
    ));

    let mut config = session_config(&["60-120"]);
    config.num_tracks = 2;
    assert!(matches!(
        session.start_all(&config),
        Err(FrameError::TrackCountMismatch { expected: 2, found: 1 })
    ));
    assert!(session.tracks().is_empty());
}

#[test]
fn test_session_restart_resets_counter() {
    let mut session = Session::default();
    let config = session_config(&["30-45", "120-180"]);
    session.start_all(&config).unwrap();

    for _ in 0..60 {
        session.tick(DT);
    }
    assert_eq!(session.ended_tracks(), 1);

    session.request_start(&config).unwrap();
    assert_eq!(session.ended_tracks(), 0);
    assert!(session.tracks().iter().all(|track| track.clock() == 0.0));

    let mut ended = 0;
    for _ in 0..(6 * 60) {
        if session.tick(DT).playback_ended() {
            ended += 1;
        }
    }
    assert_eq!(ended, 1);
}

#[test]
fn test_session_stop_never_signals_end() {
    let mut session = Session::default();
    session.start_all(&session_config(&["60-120"])).unwrap();
    session.tick(0.5);
    session.request_stop();

    assert!(session.tracks().is_empty());
    assert!(!session.is_running());
    for _ in 0..(4 * 60) {
        assert!(session.tick(DT).events.is_empty());
    }
}

#[test]
fn test_session_views_expose_geometry() {
    let layout = Layout {
        viewport_width: 1000.0,
        ..Layout::default()
    };
    let mut session = Session::new(layout, Tuning::default());
    let mut config = session_config(&["60-120"]);
    config.colors[0] = "#ff0000".to_string();
    config.gutter_color = "#abcdef".to_string();
    session.start_all(&config).unwrap();

    let views = session.views();
    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert!(view.visible);
    assert_eq!(view.frame, Rect::new(4.0, 4.0, 425.0, 76.0));
    assert_eq!(view.target, Rect::new(429.0, 4.0, 0.0, 76.0));
    assert_eq!(view.cull, Rect::new(429.0, 4.0, 571.0, 76.0));
    assert_eq!(view.color, "#ff0000");
    assert_eq!(view.gutter_color, "#abcdef");
    assert_eq!(view.note.unwrap().rect.x, -171.0);
}

#[test]
fn test_session_persisted_settings() {
    let mut session = Session::default();
    assert!(session.persisted_settings().is_none());

    let mut config = session_config(&["60-120"]);
    config.offset = 0.25;
    config.scroll_speed = 512.0;
    session.start_all(&config).unwrap();

    let settings = session.persisted_settings().unwrap();
    assert_eq!(settings.offset, 0.25);
    assert_eq!(settings.scroll_speed, 512.0);
}
