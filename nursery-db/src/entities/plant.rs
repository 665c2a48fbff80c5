use nursery_core::{Plant, RecordKey};

use super::Entity;

impl Entity for Plant {
    const COLLECTION: &'static str = "plants";

    fn key(&self) -> &RecordKey {
        &self.id
    }
}
