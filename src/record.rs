// Record trait for anything kept in a flat JSON collection

use serde::{Serialize, de::DeserializeOwned};

/// Core trait that any storable record must implement
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Numeric identifier, unique within the collection
    fn id(&self) -> u64;

    /// Collection name for this record type (e.g., "cart", "item")
    /// Determines the backing filename: {collection}.json
    fn collection_name() -> &'static str
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct TestRecord {
        id: u64,
        name: String,
    }

    impl Record for TestRecord {
        fn id(&self) -> u64 {
            self.id
        }

        fn collection_name() -> &'static str {
            "test"
        }
    }

    #[test]
    fn test_record_trait_implementation() {
        let record = TestRecord {
            id: 4,
            name: "Test".to_string(),
        };

        assert_eq!(record.id(), 4);
        assert_eq!(TestRecord::collection_name(), "test");
    }
}
