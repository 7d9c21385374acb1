use super::*;
use crate::catalog::themes::ThemeId;

const SPEC: ScatterSpec = ScatterSpec {
    count: 12,
    items: &["a", "b", "c"],
    opacity: 0.5,
    scale_min: 0.8,
    scale_max: 1.2,
};

#[test]
fn scatter_is_memoized_per_dimensions_count_and_items() {
    let mut cache = DecorationCache::new(7);
    let a = cache.scatter(300.0, 600.0, &SPEC);
    let b = cache.scatter(300.0, 600.0, &SPEC);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);

    let other = ScatterSpec { count: 5, ..SPEC };
    assert_eq!(cache.scatter(300.0, 600.0, &other).len(), 5);
    cache.scatter(600.0, 800.0, &SPEC);
    assert_eq!(cache.len(), 3);
}

#[test]
fn scatter_stays_inside_bounds_and_tilt_range() {
    let mut cache = DecorationCache::new(1);
    for p in cache.scatter(300.0, 600.0, &SPEC).iter() {
        assert!((0.0..300.0).contains(&p.x));
        assert!((0.0..600.0).contains(&p.y));
        assert!((-30.0..30.0).contains(&p.rotation));
        assert!((0.0..1.0).contains(&p.scale_t));
        assert!(SPEC.items.contains(&p.symbol));
    }
}

#[test]
fn same_seed_reproduces_and_different_seeds_differ() {
    let a = DecorationCache::new(42).scatter(300.0, 600.0, &SPEC);
    let b = DecorationCache::new(42).scatter(300.0, 600.0, &SPEC);
    let c = DecorationCache::new(43).scatter(300.0, 600.0, &SPEC);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn background_starts_with_theme_fill() {
    let canvas = Canvas::new(300, 600).unwrap();
    for id in ThemeId::ALL {
        let theme = id.theme();
        let mut cache = DecorationCache::new(0);
        let nodes = background_nodes(theme, canvas, &mut cache);
        assert_eq!(nodes.len(), 1 + theme.background_layers.len(), "{}", theme.id);
        assert!(matches!(
            &nodes[0],
            Node::Fill { paint: Paint::Solid(c), .. } if *c == theme.background
        ));
    }
}

#[test]
fn kawaii_scatters_both_layers() {
    let canvas = Canvas::new(300, 600).unwrap();
    let mut cache = DecorationCache::new(0);
    let nodes = background_nodes(ThemeId::Kawaii.theme(), canvas, &mut cache);
    assert_eq!(cache.len(), 2);
    let Node::Group { opacity, children, .. } = &nodes[1] else {
        panic!("expected scatter group");
    };
    assert!((*opacity - 0.3).abs() < 1e-6);
    assert_eq!(children.len(), 50);
}

#[test]
fn frame_ornaments_follow_theme_order() {
    let nodes = frame_nodes(ThemeId::Fish.theme(), 220.0, 230.0);
    assert_eq!(nodes.len(), 3);
    assert!(matches!(&nodes[0], Node::Stroke { style, .. } if style.width == 8.0));
    let Node::Text { text, transform, .. } = &nodes[1] else {
        panic!("expected emoji");
    };
    assert_eq!(text, "🐡");
    assert_eq!(transform.translation(), Vec2::new(205.0, 15.0));

    let starry = frame_nodes(ThemeId::Starry.theme(), 100.0, 100.0);
    assert!(matches!(&starry[0], Node::Stroke { style, .. } if style.color.a == GLOW_ALPHA));

    let clouds = frame_nodes(ThemeId::Cloud.theme(), 100.0, 100.0);
    assert_eq!(clouds.len(), 6);
    assert!(matches!(&clouds[2], Node::Group { children, .. } if children.len() == 3));
}
