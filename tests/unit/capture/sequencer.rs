use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::catalog::templates::template_by_id;

fn still() -> EncodedImage {
    EncodedImage::new("image/png", vec![1, 2, 3])
}

fn template(id: &str) -> Template {
    *template_by_id(id).unwrap()
}

fn sequencer() -> Sequencer<StillCameraHandle> {
    Sequencer::new(StillCameraHandle::default(), CaptureTimings::default())
}

#[derive(Default)]
struct StillCameraHandle {
    shots: usize,
    fail_from: Option<usize>,
}

impl CameraSource for StillCameraHandle {
    fn snapshot(&mut self) -> Option<EncodedImage> {
        let n = self.shots;
        self.shots += 1;
        match self.fail_from {
            Some(limit) if n >= limit => None,
            _ => Some(still()),
        }
    }
}

type Outcomes = Rc<RefCell<Vec<CaptureOutcome>>>;

fn recorder() -> (Outcomes, impl FnOnce(CaptureOutcome) + 'static) {
    let out: Outcomes = Rc::default();
    let sink = Rc::clone(&out);
    (out, move |o| sink.borrow_mut().push(o))
}

/// Step in 100ms increments and record when each event kind happened.
fn run_for(seq: &mut Sequencer<StillCameraHandle>, total_ms: u64) -> Vec<(u64, SequencerEvent)> {
    let mut log = Vec::new();
    let mut t = 0;
    while t < total_ms {
        t += 100;
        for e in seq.advance(Duration::from_millis(100)) {
            log.push((t, e));
        }
    }
    log
}

#[test]
fn two_shot_run_captures_and_completes_on_schedule() {
    let mut seq = sequencer();
    let (out, done) = recorder();
    seq.start(&template("strip-2"), done).unwrap();
    assert_eq!(seq.overlay().countdown, Some(3));

    let log = run_for(&mut seq, 10_000);
    let captured: Vec<u64> = log
        .iter()
        .filter(|(_, e)| matches!(e, SequencerEvent::Captured { .. }))
        .map(|(t, _)| *t)
        .collect();
    assert_eq!(captured, vec![3000, 7500]);

    let completed: Vec<u64> = log
        .iter()
        .filter(|(_, e)| matches!(e, SequencerEvent::Completed { .. }))
        .map(|(t, _)| *t)
        .collect();
    assert_eq!(completed, vec![8500]);

    let outcomes = out.borrow();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].photos.len(), 2);
    assert_eq!(outcomes[0].filter_key, "normal");
    assert_eq!(seq.camera().shots, 2);
    assert_eq!(seq.state(), CaptureState::Idle);
    assert_eq!(seq.pending_timers(), 0);
}

#[test]
fn takes_exactly_shot_count_stills() {
    for id in ["strip-4", "grid-6", "strip-3"] {
        let t = template(id);
        let mut seq = sequencer();
        let (out, done) = recorder();
        seq.start(&t, done).unwrap();
        run_for(&mut seq, 60_000);
        assert_eq!(seq.camera().shots, t.shot_count as usize, "{id}");
        assert_eq!(out.borrow().len(), 1, "{id}");
        assert_eq!(out.borrow()[0].photos.len(), t.shot_count as usize, "{id}");
    }
}

#[test]
fn countdown_ticks_down_and_flash_is_short() {
    let mut seq = sequencer();
    let (_out, done) = recorder();
    seq.start(&template("strip-2"), done).unwrap();

    seq.advance(Duration::from_millis(1000));
    assert_eq!(seq.state(), CaptureState::Countdown { remaining: 2 });
    assert_eq!(seq.overlay().countdown, Some(2));

    seq.advance(Duration::from_millis(2000));
    assert_eq!(seq.state(), CaptureState::Settling);
    assert_eq!(seq.overlay(), Overlay { countdown: None, flash: true });

    seq.advance(Duration::from_millis(200));
    assert!(!seq.overlay().flash);

    seq.advance(Duration::from_millis(1300));
    assert_eq!(seq.state(), CaptureState::Countdown { remaining: 3 });
}

#[test]
fn review_strip_fills_in_capture_order() {
    let mut seq = sequencer();
    let (_out, done) = recorder();
    seq.start(&template("strip-3"), done).unwrap();
    assert_eq!(seq.review_slots(), vec![ReviewSlot::Empty; 3]);

    seq.advance(Duration::from_millis(3000));
    let slots = seq.review_slots();
    assert!(matches!(slots[0], ReviewSlot::Captured(_)));
    assert_eq!(&slots[1..], &[ReviewSlot::Empty, ReviewSlot::Empty]);
}

#[test]
fn longer_countdown_moves_first_shot() {
    let mut seq = sequencer();
    seq.set_countdown(CountdownSecs::Five).unwrap();
    let (_out, done) = recorder();
    seq.start(&template("strip-2"), done).unwrap();
    let log = run_for(&mut seq, 5000);
    let first = log
        .iter()
        .find(|(_, e)| matches!(e, SequencerEvent::Captured { .. }))
        .map(|(t, _)| *t);
    assert_eq!(first, Some(5000));
}

#[test]
fn countdown_is_locked_while_running() {
    let mut seq = sequencer();
    let (_out, done) = recorder();
    seq.start(&template("strip-2"), done).unwrap();
    assert!(seq.set_countdown(CountdownSecs::Ten).is_err());
    assert_eq!(seq.countdown(), CountdownSecs::Three);
}

#[test]
fn filter_changes_between_shots_reach_the_outcome() {
    let mut seq = sequencer();
    let (out, done) = recorder();
    seq.start(&template("strip-2"), done).unwrap();
    assert!(seq.set_filter("sepia").is_err());

    seq.advance(Duration::from_millis(3000));
    assert_eq!(seq.state(), CaptureState::Settling);
    seq.set_filter("noir").unwrap();
    assert!(seq.set_filter("does-not-exist").is_err());

    run_for(&mut seq, 10_000);
    assert_eq!(out.borrow()[0].filter_key, "noir");
}

#[test]
fn restart_supersedes_previous_run() {
    let mut seq = sequencer();
    let (first, done_first) = recorder();
    let run_a = seq.start(&template("strip-2"), done_first).unwrap();
    seq.advance(Duration::from_millis(3100));
    assert_eq!(seq.photos().len(), 1);

    let (second, done_second) = recorder();
    let run_b = seq.start(&template("strip-2"), done_second).unwrap();
    assert_ne!(run_a, run_b);
    assert!(seq.photos().is_empty());
    assert_eq!(seq.pending_timers(), 1);

    let log = run_for(&mut seq, 20_000);
    assert!(log.iter().all(|(_, e)| match e {
        SequencerEvent::CountdownStarted { run, .. }
        | SequencerEvent::CountdownTick { run, .. }
        | SequencerEvent::Captured { run, .. }
        | SequencerEvent::FlashEnded { run }
        | SequencerEvent::Completed { run, .. }
        | SequencerEvent::Failed { run, .. } => *run == run_b,
    }));
    assert!(first.borrow().is_empty());
    assert_eq!(second.borrow().len(), 1);
    assert_eq!(seq.camera().shots, 3);
}

#[test]
fn teardown_cancels_everything() {
    let mut seq = sequencer();
    let (out, done) = recorder();
    seq.start(&template("strip-4"), done).unwrap();
    seq.advance(Duration::from_millis(3050));
    assert!(seq.pending_timers() > 0);

    seq.teardown();
    assert_eq!(seq.pending_timers(), 0);
    assert_eq!(seq.state(), CaptureState::Idle);
    assert!(seq.advance(Duration::from_secs(60)).is_empty());
    assert!(out.borrow().is_empty());
}

#[test]
fn camera_failure_aborts_the_run() {
    let mut seq = Sequencer::new(
        StillCameraHandle {
            shots: 0,
            fail_from: Some(1),
        },
        CaptureTimings::default(),
    );
    let (out, done) = recorder();
    seq.start(&template("strip-2"), done).unwrap();

    let log = run_for(&mut seq, 20_000);
    let failed = log
        .iter()
        .find_map(|(t, e)| match e {
            SequencerEvent::Failed { error, .. } => Some((*t, error.to_string())),
            _ => None,
        })
        .unwrap();
    assert_eq!(failed.0, 7500);
    assert!(failed.1.starts_with("capture error:"));
    assert!(out.borrow().is_empty());
    assert_eq!(seq.state(), CaptureState::Idle);
    assert_eq!(seq.pending_timers(), 0);

    let (again, done_again) = recorder();
    seq.start(&template("strip-2"), done_again).unwrap();
    assert!(seq.is_running());
    drop(again);
}

#[test]
fn rejects_templates_without_shots() {
    let mut seq = sequencer();
    let mut t = template("strip-2");
    t.shot_count = 0;
    assert!(seq.start(&t, |_| {}).is_err());
    assert!(!seq.is_running());
}

#[test]
fn countdown_secs_accepts_only_supported_values() {
    assert_eq!(CountdownSecs::try_from(5).unwrap(), CountdownSecs::Five);
    assert!(CountdownSecs::try_from(4).is_err());
    let parsed: CountdownSecs = serde_json::from_str("10").unwrap();
    assert_eq!(parsed, CountdownSecs::Ten);
    assert_eq!(serde_json::to_string(&CountdownSecs::Three).unwrap(), "3");
}
