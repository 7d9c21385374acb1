use super::*;
use crate::foundation::core::Vec2;

fn text(s: &str, transform: Affine) -> Node {
    Node::Text {
        text: s.to_string(),
        transform,
        size: 16.0,
        color: Rgba8::WHITE,
        anchor: TextAnchor::Center,
    }
}

#[test]
fn leaves_inherit_group_transform_and_opacity() {
    let mut scene = Scene::new(Canvas::new(100, 100).unwrap());
    scene.push(Node::rect(Rect::new(0.0, 0.0, 10.0, 10.0), Rgba8::WHITE));
    scene.push(Node::Group {
        transform: Affine::translate(Vec2::new(10.0, 20.0)),
        opacity: 0.5,
        children: vec![Node::group(
            0.5,
            vec![text("a", Affine::translate(Vec2::new(1.0, 2.0)))],
        )],
    });

    let mut seen = Vec::new();
    scene.for_each_leaf(|node, parent, opacity| {
        seen.push((matches!(node, Node::Text { .. }), parent, opacity));
    });
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (false, Affine::IDENTITY, 1.0));
    assert!(seen[1].0);
    assert_eq!(seen[1].1, Affine::translate(Vec2::new(10.0, 20.0)));
    assert!((seen[1].2 - 0.25).abs() < 1e-6);

    let texts = scene.texts();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].0, "a");
    assert_eq!(texts[0].1.translation(), Vec2::new(11.0, 22.0));
}

#[test]
fn counts_images_nested_anywhere() {
    let img = Arc::new(DecodedImage::from_premul(1, 1, vec![255; 4]).unwrap());
    let image = Node::Image {
        image: img,
        transform: Affine::IDENTITY,
        crop: Crop {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        },
        width: 10.0,
        height: 10.0,
        mirror: true,
        clip: kurbo::Shape::to_path(&Rect::new(0.0, 0.0, 10.0, 10.0), 0.1),
    };
    let mut scene = Scene::new(Canvas::new(10, 10).unwrap());
    scene.push(image.clone());
    scene.push(Node::placed(Affine::IDENTITY, vec![image]));
    assert_eq!(scene.image_count(), 2);
}
