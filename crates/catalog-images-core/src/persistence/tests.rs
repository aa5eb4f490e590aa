#[allow(clippy::module_inception)]
#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::collection::ImageCollection;
    use crate::config::Config;
    use crate::error::Error;
    use crate::types::{CandidateFile, FileSource, PersistedImage};

    const PRODUCT: &str = "product-42";

    fn png(name: &str) -> CandidateFile {
        CandidateFile::from_bytes(name, "image/png", 1, name.as_bytes().to_vec())
    }

    fn seeded_store() -> MemoryImageStore {
        let store = MemoryImageStore::new();
        let records: Vec<NewImageRecord> = (0..3)
            .map(|order| NewImageRecord {
                product_id: PRODUCT.to_string(),
                url: format!("https://cdn.example.com/{}.png", order),
                display_order: order,
                is_featured: order == 0,
            })
            .collect();
        store.insert_images(&records).unwrap();
        store
    }

    struct FailingUploader;

    impl ObjectUploader for FailingUploader {
        fn upload(&self, _: &CandidateFile, _: &str, _: &str) -> PersistenceResult<String> {
            Err(PersistenceError::Backend("bucket unavailable".to_string()))
        }
    }

    #[test]
    fn test_load_product_seeds_collection() {
        let store = seeded_store();
        let collection = ImageCollection::new(Config::default());

        let ids = load_product(&collection, &store, PRODUCT).unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.featured().unwrap().id, ids[0]);
    }

    #[test]
    fn test_plan_save() {
        let store = seeded_store();
        let collection = ImageCollection::new(Config::default());
        let ids = load_product(&collection, &store, PRODUCT).unwrap();

        collection.remove(&ids[0]);
        collection.replace_content(&ids[2], png("cropped.png"));
        collection.add_files(vec![png("new.png")]).unwrap();

        let plan = plan_save(&collection.entries(), &ids);

        assert_eq!(plan.delete, vec![ids[0].clone(), ids[2].clone()]);
        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0].id, ids[1]);
        assert_eq!(plan.update[0].display_order, 0);
        assert!(plan.update[0].is_featured);
        let uploads: Vec<&str> = plan.upload.iter().map(|u| u.file.name.as_str()).collect();
        assert_eq!(uploads, vec!["cropped.png", "new.png"]);
        assert_eq!(plan.upload[1].display_order, 2);
    }

    #[test]
    fn test_save_product_round_trip() {
        let store = seeded_store();
        let uploader = MemoryUploader::new();
        let collection = ImageCollection::new(Config::default());
        let ids = load_product(&collection, &store, PRODUCT).unwrap();

        collection.remove(&ids[1]);
        let outcome = collection.add_files(vec![png("new.png")]).unwrap();
        collection.set_featured(&outcome.added[0]);

        let saved = save_product(&collection, &store, &uploader, PRODUCT, &ids).unwrap();

        assert_eq!(saved.len(), 3);
        assert_eq!(uploader.uploaded().len(), 1);
        assert!(uploader.uploaded()[0].starts_with("memory://product-42/products/"));
        let featured: Vec<&PersistedImage> = saved.iter().filter(|i| i.is_featured).collect();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].display_order, 2);
        assert!(saved.iter().all(|image| image.id != ids[1]));
    }

    #[test]
    fn test_upload_failure_leaves_store_untouched() {
        let store = seeded_store();
        let collection = ImageCollection::new(Config::default());
        let ids = load_product(&collection, &store, PRODUCT).unwrap();
        collection.remove(&ids[0]);
        let outcome = collection.add_files(vec![png("new.png")]).unwrap();

        let result = save_product(&collection, &store, &FailingUploader, PRODUCT, &ids);

        match result {
            Err(Error::Upload { entry_id, .. }) => assert_eq!(entry_id, outcome.added[0]),
            other => panic!("expected upload error, got {:?}", other),
        }
        assert_eq!(store.load_product_images(PRODUCT).unwrap().len(), 3);
    }

    #[test]
    fn test_unreadable_upload_content() {
        let uploader = MemoryUploader::new();
        let file = CandidateFile::new(
            "gone.png",
            10,
            "image/png",
            0,
            FileSource::Disk("/path/that/does/not/exist.png".into()),
        );

        let result = uploader.upload(&file, PRODUCT, "products");
        assert!(matches!(result, Err(PersistenceError::Content(_))));
    }

    #[test]
    fn test_update_unknown_image() {
        let store = MemoryImageStore::new();
        let missing = PersistedImage {
            id: "img-404".to_string(),
            url: String::new(),
            display_order: 0,
            is_featured: false,
        };
        assert!(matches!(
            store.update_images(&[missing]),
            Err(PersistenceError::NotFound(_))
        ));
    }
}
