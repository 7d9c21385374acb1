use super::*;
use crate::catalog::templates::TEMPLATES;

#[test]
fn slots_span_the_template_width_exactly() {
    for t in &TEMPLATES {
        let g = SlotGrid::for_template(t);
        let cols = f64::from(t.cols);
        let total = g.slot_width * cols + (cols - 1.0) * SLOT_PADDING + 2.0 * SLOT_MARGIN;
        assert!((total - f64::from(t.width())).abs() < 1e-9, "{}", t.id);
    }
}

#[test]
fn duo_strip_slot_positions() {
    let t = crate::catalog::templates::template_by_id("strip-2").unwrap();
    let g = SlotGrid::for_template(t);
    // (300 - 80) / 1 = 220 ; (600 - 80 - 20 - 40) / 2 = 230
    assert_eq!(g.slot_width, 220.0);
    assert_eq!(g.slot_height, 230.0);
    assert_eq!(g.slot(0).unwrap(), Rect::new(40.0, 40.0, 260.0, 270.0));
    assert_eq!(g.slot(1).unwrap(), Rect::new(40.0, 290.0, 260.0, 520.0));
    assert!(g.slot(2).is_none());
}

#[test]
fn grid_fills_row_major() {
    let t = crate::catalog::templates::template_by_id("grid-2x2").unwrap();
    let g = SlotGrid::for_template(t);
    let s = g.slots(4);
    assert_eq!(s.len(), 4);
    assert_eq!(s[0].y0, s[1].y0);
    assert!(s[1].x0 > s[0].x0);
    assert_eq!(s[2].x0, s[0].x0);
    assert!(s[2].y0 > s[0].y0);
}

#[test]
fn overflow_and_underflow_are_tolerated() {
    let mut t = *crate::catalog::templates::template_by_id("strip-2").unwrap();
    t.shot_count = 5;
    let g = SlotGrid::for_template(&t);
    assert_eq!(g.slots(5).len(), 2);
    assert_eq!(g.slots(1).len(), 1);
    assert!(g.slots(0).is_empty());
}

#[test]
fn crop_wider_source_keeps_full_height() {
    let c = crop_to_fill(1920.0, 1080.0, 220.0, 230.0);
    assert_eq!(c.height, 1080.0);
    assert_eq!(c.y, 0.0);
    assert!((c.width / c.height - 220.0 / 230.0).abs() < 1e-12);
    assert!((c.x * 2.0 + c.width - 1920.0).abs() < 1e-9);
}

#[test]
fn crop_taller_or_equal_source_keeps_full_width() {
    let c = crop_to_fill(480.0, 1000.0, 220.0, 230.0);
    assert_eq!(c.width, 480.0);
    assert_eq!(c.x, 0.0);
    assert!((c.y * 2.0 + c.height - 1000.0).abs() < 1e-9);

    let same = crop_to_fill(440.0, 460.0, 220.0, 230.0);
    assert_eq!(same.width, 440.0);
    assert_eq!(same.x, 0.0);
}

#[test]
fn display_scale_never_exceeds_one_and_fits() {
    for (win, container) in [(1920.0, 1200.0), (375.0, 360.0), (800.0, 2000.0), (200.0, 200.0)] {
        for t in &TEMPLATES {
            let s = display_scale(win, container, t.width());
            assert!(s <= 1.0);
            let available = f64::min(win, container) - DISPLAY_GUTTER;
            assert!(f64::from(t.width()) * s <= available + 1e-9);
        }
    }
    assert_eq!(display_scale(1920.0, 1920.0, 600), 1.0);
    assert_eq!(display_scale(20.0, 20.0, 600), 0.0);
}

#[test]
fn viewport_maps_back_to_template_space() {
    let t = crate::catalog::templates::template_by_id("grid-2x2").unwrap();
    let v = Viewport::responsive(t, 340.0, 400.0);
    assert_eq!(v.scale, 0.5);
    assert_eq!((v.width, v.height), (300.0, 400.0));
    assert_eq!(v.to_template_space(150.0, 50.0), (300.0, 100.0));
    assert_eq!(Viewport::native(t).scale, 1.0);
}

#[test]
fn short_template_has_no_slot_area() {
    let t = Template {
        id: "tiny",
        name: "Tiny",
        shot_count: 1,
        cols: 1,
        rows: 1,
        canvas: crate::foundation::core::Canvas::new(200, 100).unwrap(),
    };
    assert!(t.validate().is_ok());
    let grid = SlotGrid::for_template(&t);
    assert!(grid.slot_height < 0.0);
    assert!(!grid.has_area());
    assert!(TEMPLATES.iter().all(|t| SlotGrid::for_template(t).has_area()));
}
