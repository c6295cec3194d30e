#![allow(dead_code)]

use img_sweep::{AppConfig, Catalog, ProgressReporter};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

pub const SCHEMA: &str = "CREATE TABLE oc_product (
        product_id INTEGER PRIMARY KEY,
        image TEXT
    );
    CREATE TABLE oc_product_image (
        product_image_id INTEGER PRIMARY KEY,
        product_id INTEGER NOT NULL,
        image TEXT
    );";

/// In-memory catalog with the two image tables. `None` inserts a NULL image.
pub fn catalog_with(products: &[Option<&str>], product_images: &[Option<&str>]) -> Catalog {
    let mut catalog = Catalog::open_in_memory().unwrap();
    catalog.batch_execute(SCHEMA).unwrap();
    for image in products {
        catalog
            .batch_execute(&format!(
                "INSERT INTO oc_product (image) VALUES ({})",
                sql_value(*image)
            ))
            .unwrap();
    }
    for image in product_images {
        catalog
            .batch_execute(&format!(
                "INSERT INTO oc_product_image (product_id, image) VALUES (1, {})",
                sql_value(*image)
            ))
            .unwrap();
    }
    catalog
}

fn sql_value(image: Option<&str>) -> String {
    match image {
        Some(image) => format!("'{}'", image.replace('\'', "''")),
        None => "NULL".to_string(),
    }
}

/// Creates each file (and its parents) under `root`, content = its relative path.
pub fn create_files(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, file.as_bytes()).unwrap();
    }
}

pub fn config_for(root: &Path) -> AppConfig {
    AppConfig::new(root.to_string_lossy().into_owned())
}

/// Records which progress hooks fired.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

impl ProgressReporter for RecordingReporter {
    fn on_references_start(&self) {
        self.push("references_start");
    }
    fn on_references_complete(&self, _count: usize, _duration_secs: f64) {
        self.push("references_complete");
    }
    fn on_scan_start(&self, _dir: &str) {
        self.push("scan_start");
    }
    fn on_scan_complete(&self, _orphans_found: usize, _duration_secs: f64) {
        self.push("scan_complete");
    }
    fn on_delete_start(&self, _total: usize) {
        self.push("delete_start");
    }
    fn on_delete_complete(&self, _deleted: usize, _failed: usize, _duration_secs: f64) {
        self.push("delete_complete");
    }
}
