//! Macro-generated conformance suite for `DataSource<Value>` implementations.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod harness;
//!
//! use harness::*;
//! use listkit::storage::InMemoryDataSource;
//!
//! data_source_tests!(InMemoryDataSource::<serde_json::Value>::new());
//! ```
//!
//! # Generated Tests
//!
//! - `test_fetch_empty`: a fresh source has no records
//! - `test_create_then_fetch`: created records come back in creation order
//! - `test_create_duplicate_id`: second create with the same id is a conflict
//! - `test_update_existing` / `test_update_nonexistent`
//! - `test_delete_existing` / `test_delete_nonexistent`
//! - `test_concurrent_creates`: parallel creates from spawned tasks

/// Generate a `DataSource<Value>` conformance test suite.
///
/// `$factory` must evaluate to an empty source implementing
/// `DataSource<Value> + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! data_source_tests {
    ($factory:expr) => {
        mod data_source_contract_tests {
            use super::*;
            use listkit::core::SourceError;
            use listkit::core::record::Record;
            use listkit::core::source::DataSource;
            use serde_json::{Value, json};

            fn coupon(id: &str, code: &str) -> Value {
                json!({"id": id, "code": code, "type": "YUZDE", "value": 10})
            }

            #[tokio::test]
            async fn test_fetch_empty() {
                let source = $factory;
                assert!(source.fetch_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_create_then_fetch() {
                let source = $factory;
                for (id, code) in [("b", "BETA"), ("a", "ALPHA"), ("c", "GAMMA")] {
                    let created = source.create(coupon(id, code)).await.unwrap();
                    assert_eq!(created.id().as_deref(), Some(id));
                }

                let ids: Vec<String> = source
                    .fetch_all()
                    .await
                    .unwrap()
                    .iter()
                    .filter_map(|r| r.id())
                    .collect();
                assert_eq!(ids, ["b", "a", "c"]);
            }

            #[tokio::test]
            async fn test_create_duplicate_id() {
                let source = $factory;
                source.create(coupon("x", "FIRST")).await.unwrap();

                let err = source.create(coupon("x", "SECOND")).await.unwrap_err();
                assert_eq!(err, SourceError::Conflict { id: "x".into() });

                let stored = source.fetch_all().await.unwrap();
                assert_eq!(stored.len(), 1);
                assert_eq!(stored[0]["code"], "FIRST");
            }

            #[tokio::test]
            async fn test_update_existing() {
                let source = $factory;
                source.create(coupon("x", "OLD")).await.unwrap();

                let updated = source.update("x", coupon("x", "NEW")).await.unwrap();
                assert_eq!(updated["code"], "NEW");
                assert_eq!(source.fetch_all().await.unwrap()[0]["code"], "NEW");
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let source = $factory;
                let err = source.update("ghost", coupon("ghost", "X")).await.unwrap_err();
                assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let source = $factory;
                source.create(coupon("x", "X")).await.unwrap();
                source.create(coupon("y", "Y")).await.unwrap();

                source.delete("x").await.unwrap();

                let stored = source.fetch_all().await.unwrap();
                assert_eq!(stored.len(), 1);
                assert_eq!(stored[0]["id"], "y");
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let source = $factory;
                let err = source.delete("ghost").await.unwrap_err();
                assert_eq!(err, SourceError::NotFound { id: "ghost".into() });
            }

            #[tokio::test]
            async fn test_concurrent_creates() {
                let source = $factory;

                let handles: Vec<_> = (0..10)
                    .map(|i| {
                        let source = source.clone();
                        tokio::spawn(async move {
                            source.create(coupon(&format!("c{i}"), "BULK")).await
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.await.unwrap().unwrap();
                }
                assert_eq!(source.fetch_all().await.unwrap().len(), 10);
            }
        }
    };
}
