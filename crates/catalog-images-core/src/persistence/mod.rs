mod error;
mod models;
mod store;
mod sync;

pub use error::{PersistenceError, PersistenceResult};
pub use models::NewImageRecord;
pub use store::{ImageStore, MemoryImageStore, MemoryUploader, ObjectUploader};
pub use sync::{load_product, plan_save, save_product, PendingUpload, SavePlan};

#[cfg(test)]
mod tests;
