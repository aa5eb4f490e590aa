mod common;

use tempfile::tempdir;

use catalog_images_core::discovery::collect_candidates;
use catalog_images_core::identity::Identity;
use catalog_images_core::{Config, ImageCollection};
use common::{init_logging, write_file};

#[test]
fn test_copies_on_disk_are_detected_by_content() {
    init_logging();
    let dir = tempdir().unwrap();
    write_file(dir.path(), "front.png", b"front pixels");
    write_file(dir.path(), "front (1).png", b"front pixels");
    write_file(dir.path(), "back.jpg", b"back pixels");
    write_file(dir.path(), "readme.txt", b"not an image");

    let candidates = collect_candidates(&[dir.path()]).unwrap();
    let collection = ImageCollection::new(Config::default());
    let outcome = collection.add_files(candidates).unwrap();

    // Walk order is by name: back.jpg, front (1).png, front.png, readme.txt
    assert_eq!(outcome.added.len(), 2);
    assert_eq!(outcome.report.duplicate_names(), vec!["front.png"]);
    assert_eq!(outcome.report.invalid.len(), 1);
    assert_eq!(outcome.report.notices().len(), 2);

    let entries = collection.entries();
    assert!(entries
        .iter()
        .all(|e| matches!(e.identity, Some(Identity::ContentHash(_)))));
    assert_eq!(entries[0].source_file.as_ref().unwrap().name, "back.jpg");
    assert!(entries[0].is_featured);
}

#[test]
fn test_file_deleted_after_picking_still_validates() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "a.png", b"content");
    let candidates = collect_candidates(&[&path]).unwrap();
    std::fs::remove_file(&path).unwrap();

    let collection = ImageCollection::new(Config::default());
    let outcome = collection.add_files(candidates).unwrap();

    assert_eq!(outcome.added.len(), 1);
    assert!(collection.entries()[0]
        .identity
        .as_ref()
        .unwrap()
        .is_signature());
}
