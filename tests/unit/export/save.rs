use super::*;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("kawaii-booth-save-{tag}-{}", std::process::id()))
}

#[test]
fn dir_save_writes_decoded_payload() {
    let dir = temp_dir("write");
    let mut save = DirSave::new(&dir);
    save.save("data:image/png;base64,AQID", "kawaii-booth.png").unwrap();

    let path = dir.join("kawaii-booth.png");
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    assert_eq!(save.written(), &[path]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn dir_save_rejects_paths_and_bad_uris() {
    let mut save = DirSave::new(temp_dir("reject"));
    assert!(save.save("data:image/png;base64,AQID", "../x.png").is_err());
    assert!(save.save("not a uri", "x.png").is_err());
    assert!(save.written().is_empty());
}

#[test]
fn memory_save_records_in_order() {
    fn save_through<S: FileSave>(mut target: S, name: &str) {
        target.save("data:a", name).unwrap();
    }

    let mut save = MemorySave::new();
    save_through(&mut save, "a.png");
    save.save("data:b", "b.jpg").unwrap();
    let names: Vec<&str> = save.saved().iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(names, ["a.png", "b.jpg"]);
}
