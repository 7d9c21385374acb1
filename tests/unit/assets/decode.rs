use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn keys_are_unique_per_decode() {
    let a = DecodedImage::from_premul(1, 1, vec![0, 0, 0, 0]).unwrap();
    let b = DecodedImage::from_premul(1, 1, vec![0, 0, 0, 0]).unwrap();
    assert_ne!(a.key, b.key);
    assert!(DecodedImage::from_premul(2, 1, vec![0; 4]).is_err());
}

#[test]
fn unpremultiply_restores_opaque_and_half_alpha() {
    let mut px = vec![255, 0, 0, 255, 64, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[255, 0, 0, 255]);
    assert_eq!(px[7], 128);
    assert!((i32::from(px[4]) - 128).abs() <= 1);
    assert!((i32::from(px[5]) - 64).abs() <= 1);
}
