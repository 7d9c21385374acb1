use super::*;
use crate::capture::camera::EncodedImage;

fn outcome(n: usize) -> CaptureOutcome {
    CaptureOutcome {
        photos: (0..n)
            .map(|i| EncodedImage::new("image/png", vec![i as u8]))
            .collect(),
        filter_key: "sepia".to_string(),
    }
}

#[test]
fn forward_flow_carries_template_and_outcome() {
    let mut pc = PhaseController::new();
    assert_eq!(pc.phase(), &Phase::Template);

    let t = pc.select_template("strip-3").unwrap();
    assert_eq!(t.shot_count, 3);
    assert_eq!(pc.phase().name(), "capture");

    pc.complete_capture(outcome(3)).unwrap();
    match pc.phase() {
        Phase::Edit { template, outcome } => {
            assert_eq!(template.id, "strip-3");
            assert_eq!(outcome.photos.len(), 3);
            assert_eq!(outcome.filter_key, "sepia");
        }
        other => panic!("unexpected phase {other:?}"),
    }
}

#[test]
fn out_of_order_transitions_are_rejected() {
    let mut pc = PhaseController::new();
    assert!(pc.complete_capture(outcome(1)).is_err());
    assert!(pc.select_template("nope").is_err());
    assert_eq!(pc.phase(), &Phase::Template);

    pc.select_template("strip-2").unwrap();
    assert!(pc.select_template("strip-4").is_err());
}

#[test]
fn restart_discards_photos() {
    let mut pc = PhaseController::new();
    pc.select_template("grid-6").unwrap();
    pc.complete_capture(outcome(6)).unwrap();
    pc.restart();
    assert_eq!(pc.phase(), &Phase::Template);
    pc.select_template("strip-4").unwrap();
}
