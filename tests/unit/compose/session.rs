use super::*;
use crate::assets::color::encode_png;
use crate::catalog::templates::template_by_id;
use crate::export::save::MemorySave;
use crate::render::surface::RecordingSurface;

fn still(w: u32, h: u32) -> EncodedImage {
    let img = DecodedImage::from_premul(w, h, vec![200; (w * h * 4) as usize]).unwrap();
    EncodedImage::new("image/png", encode_png(&img).unwrap())
}

fn session(id: &str, shots: usize) -> EditSession<RecordingSurface> {
    let t = template_by_id(id).unwrap();
    let photos: Vec<_> = (0..shots).map(|_| still(8, 6)).collect();
    let mut opts = EditOptions::with_seed(9);
    opts.caption = Some("2026-10-19".to_string());
    let mut s = EditSession::new(t, &photos, "normal", opts).unwrap();
    s.attach_surface(RecordingSurface::new(Viewport::responsive(t, 240.0, 1000.0)));
    s
}

#[test]
fn unknown_filter_is_rejected() {
    let t = template_by_id("strip-2").unwrap();
    let err = EditSession::<RecordingSurface>::new(t, &[], "vhs", EditOptions::with_seed(0));
    assert!(err.is_err());
}

#[test]
fn undecodable_stills_are_dropped() {
    let t = template_by_id("strip-2").unwrap();
    let photos = [still(4, 4), EncodedImage::new("image/png", vec![1, 2, 3])];
    let s = EditSession::<RecordingSurface>::new(t, &photos, "bw", EditOptions::with_seed(0)).unwrap();
    assert_eq!(s.photos().len(), 1);
    assert_eq!(s.filter().key, "bw");
}

#[test]
fn scene_places_one_image_per_photo_and_caption_before_stickers() {
    let mut s = session("strip-2", 2);
    s.add_sticker("🎀");
    let scene = s.build_scene();
    assert_eq!(scene.image_count(), 2);
    let texts: Vec<_> = scene.texts().into_iter().map(|(t, _)| t).collect();
    let caption = texts.iter().position(|t| t == "2026-10-19").unwrap();
    let sticker = texts.iter().position(|t| t == "🎀").unwrap();
    assert!(caption < sticker);
}

#[test]
fn extra_photos_beyond_cells_are_not_placed() {
    let mut s = session("strip-2", 3);
    assert_eq!(s.build_scene().image_count(), 2);
}

#[test]
fn selection_chrome_only_while_selected() {
    let mut s = session("strip-2", 2);
    let id = s.add_sticker("⭐");
    let base = s.build_scene().nodes.len();
    assert!(s.select_sticker(&id));
    assert_eq!(s.build_scene().nodes.len(), base + 1);
    s.deselect();
    assert_eq!(s.build_scene().nodes.len(), base);
}

#[test]
fn pointer_down_maps_screen_space_through_viewport() {
    let mut s = session("strip-2", 2);
    let id = s.add_sticker("🎀");
    let scale = s.viewport().scale;
    assert!(scale < 1.0);
    let hit = s.pointer_down(160.0 * scale, 160.0 * scale);
    assert_eq!(hit.as_deref(), Some(id.as_str()));
    assert_eq!(s.stickers().selected(), Some(id.as_str()));

    assert_eq!(s.pointer_down(1.0, 1.0), None);
    assert_eq!(s.stickers().selected(), None);
}

#[test]
fn delete_and_backspace_remove_selected_only() {
    let mut s = session("strip-2", 2);
    let a = s.add_sticker("🎀");
    s.add_sticker("⭐");
    assert!(!s.key_down(Key::Delete));
    s.select_sticker(&a);
    assert!(!s.key_down(Key::Other));
    assert!(s.key_down(Key::Backspace));
    assert_eq!(s.stickers().len(), 1);
    assert!(s.stickers().get(&a).is_none());
    assert!(!s.delete_sticker("emoji-999"));
}

#[test]
fn export_waits_for_delay_then_saves_at_native_size_and_restores_viewport() {
    let mut s = session("strip-2", 2);
    let id = s.add_sticker("🎀");
    s.select_sticker(&id);
    let before = s.viewport();
    let mut save = MemorySave::new();

    assert_eq!(s.request_export(), ExportOutcome::Scheduled);
    assert_eq!(s.stickers().selected(), None);
    assert_eq!(s.time_until_export(), Some(Duration::from_millis(200)));
    assert_eq!(s.request_export(), ExportOutcome::Busy);

    assert_eq!(s.advance(Duration::from_millis(199), &mut save).unwrap(), None);
    assert!(save.saved().is_empty());
    let outcome = s.advance(Duration::from_millis(1), &mut save).unwrap();
    assert_eq!(
        outcome,
        Some(ExportOutcome::Saved {
            file_name: "kawaii-booth.png".to_string(),
            width: 600,
            height: 1200,
        })
    );
    assert!(!s.export_pending());
    assert_eq!(save.saved().len(), 1);
    assert!(save.saved()[0].data_uri.starts_with("data:image/png;base64,"));

    let surface = s.surface().unwrap();
    assert_eq!(surface.viewport(), before);
    let call = &surface.calls()[0];
    assert_eq!(call.viewport.scale, 1.0);
    assert_eq!(call.request.pixel_ratio, 2.0);
    assert_eq!(call.images, 2);
}

#[test]
fn jpeg_export_uses_quality_and_extension() {
    let mut s = session("strip-2", 2);
    s.set_export_format(ExportFormat::Jpg);
    let mut save = MemorySave::new();
    let outcome = s.export_now(&mut save).unwrap();
    assert!(matches!(outcome, ExportOutcome::Saved { ref file_name, .. } if file_name == "kawaii-booth.jpg"));
    assert!(save.saved()[0].data_uri.starts_with("data:image/jpeg"));
    assert_eq!(s.surface().unwrap().calls()[0].request.quality, 0.95);
}

#[test]
fn export_without_photos_or_surface_is_skipped() {
    let t = template_by_id("strip-2").unwrap();
    let mut empty = EditSession::<RecordingSurface>::new(t, &[], "normal", EditOptions::with_seed(0)).unwrap();
    empty.attach_surface(RecordingSurface::new(Viewport::native(t)));
    assert!(matches!(empty.request_export(), ExportOutcome::Skipped(_)));

    let mut detached =
        EditSession::<RecordingSurface>::new(t, &[still(4, 4)], "normal", EditOptions::with_seed(0)).unwrap();
    assert!(matches!(detached.request_export(), ExportOutcome::Skipped(_)));
    assert!(!detached.export_pending());
}

#[test]
fn cancelled_export_never_fires() {
    let mut s = session("strip-2", 2);
    let mut save = MemorySave::new();
    s.request_export();
    assert!(s.cancel_export());
    assert_eq!(s.advance(Duration::from_secs(1), &mut save).unwrap(), None);
    assert!(save.saved().is_empty());
}

#[test]
fn decorations_are_stable_across_rebuilds_and_theme_switches() {
    let mut s = session("strip-2", 2);
    s.set_theme(ThemeId::Kawaii);
    let first: Vec<_> = s.build_scene().texts();
    s.set_theme(ThemeId::Simple);
    s.build_scene();
    s.set_theme(ThemeId::Kawaii);
    let second: Vec<_> = s.build_scene().texts();
    assert_eq!(first, second);
}

#[test]
fn resize_display_refits_surface() {
    let mut s = session("strip-2", 2);
    s.resize_display(2000.0, 2000.0);
    assert_eq!(s.viewport().scale, 1.0);
    s.resize_display(190.0, 2000.0);
    assert_eq!(s.viewport().scale, 0.5);
}

#[test]
fn template_too_short_for_slots_still_builds_and_exports() {
    let t = Template {
        id: "tiny",
        name: "Tiny",
        shot_count: 1,
        cols: 1,
        rows: 1,
        canvas: crate::foundation::core::Canvas::new(200, 100).unwrap(),
    };
    assert!(t.validate().is_ok());
    let mut s = EditSession::<RecordingSurface>::new(&t, &[still(8, 6)], "normal", EditOptions::with_seed(2)).unwrap();
    s.attach_surface(RecordingSurface::new(Viewport::native(&t)));
    assert_eq!(s.build_scene().image_count(), 0);
    let mut save = MemorySave::new();
    assert!(matches!(s.export_now(&mut save).unwrap(), ExportOutcome::Saved { .. }));
}

struct FailingSave;

impl FileSave for FailingSave {
    fn save(&mut self, _data_uri: &str, _file_name: &str) -> BoothResult<()> {
        Err(BoothError::export("disk full"))
    }
}

#[test]
fn failed_delayed_export_still_advances_the_clock() {
    let mut s = session("strip-2", 2);
    s.request_export();
    let err = s.advance(Duration::from_millis(500), &mut FailingSave).unwrap_err();
    assert!(err.to_string().starts_with("export error:"));
    assert_eq!(s.timers.now(), Duration::from_millis(500));
    assert!(!s.export_pending());
    assert_eq!(s.request_export(), ExportOutcome::Scheduled);
}

fn solid_still(px: [u8; 4]) -> EncodedImage {
    let img = DecodedImage::from_premul(32, 24, px.repeat(32 * 24)).unwrap();
    EncodedImage::new("image/png", encode_png(&img).unwrap())
}

fn export_slot_pixel(bake: bool) -> ([u8; 3], EditSession<crate::render::cpu::CpuSurface>) {
    let t = template_by_id("strip-2").unwrap();
    let photos = [solid_still([220, 0, 0, 255]), solid_still([220, 0, 0, 255])];
    let mut opts = EditOptions::with_seed(4);
    opts.export.pixel_ratio = 1.0;
    opts.export.bake_filter = bake;
    let mut s = EditSession::new(t, &photos, "bw", opts).unwrap();
    s.attach_surface(crate::render::cpu::CpuSurface::new(Viewport::native(t)));

    let mut save = MemorySave::new();
    s.export_now(&mut save).unwrap();
    let encoded = EncodedImage::from_data_uri(&save.saved()[0].data_uri).unwrap();
    let img = decode_image(encoded.bytes.as_slice()).unwrap();
    let c = SlotGrid::for_template(t).slot(0).unwrap().center();
    let i = ((c.y as usize) * img.width as usize + c.x as usize) * 4;
    let px = &img.rgba8_premul[i..i + 3];
    ([px[0], px[1], px[2]], s)
}

#[test]
fn bake_filter_applies_the_capture_filter_to_exported_photos() {
    let ([r, g, b], _) = export_slot_pixel(false);
    assert!(r > 150 && g < 60 && b < 60, "unbaked should stay red: {r},{g},{b}");

    let ([r, g, b], mut s) = export_slot_pixel(true);
    assert!(r.abs_diff(g) <= 3 && g.abs_diff(b) <= 3, "baked bw should be gray: {r},{g},{b}");
    assert!(r < 150);

    let first = s.baked.clone().unwrap();
    assert_eq!(first.len(), 2);
    let mut save = MemorySave::new();
    s.export_now(&mut save).unwrap();
    let second = s.baked.as_ref().unwrap();
    assert!(first.iter().zip(second).all(|(a, b)| Arc::ptr_eq(a, b)));
}
