//! Shared fixtures for listkit integration tests
//!
//! Provides record collections for the console's list pages, a typed
//! `Review` record implementing `Record` without going through JSON, and a
//! `FlakySource` whose failures can be switched on and off.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_source_tests;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use listkit::core::field::FieldValue;
use listkit::core::record::Record;
use listkit::core::source::{DataSource, SourceResult};
use listkit::core::SourceError;
use listkit::storage::InMemoryDataSource;

// ---------------------------------------------------------------------------
// JSON fixtures
// ---------------------------------------------------------------------------

const CITIES: [&str; 5] = ["Ankara", "Istanbul", "Bursa", "Antalya", "Eskisehir"];

/// 45 addresses, 7 of them in Izmir (spelled in mixed case)
pub fn addresses() -> Vec<Value> {
    (0..45)
        .map(|i| {
            let city = if i % 6 == 2 && i < 42 {
                if i % 4 == 0 { "IZMIR" } else { "Izmir" }
            } else {
                CITIES[i % CITIES.len()]
            };
            json!({
                "id": format!("a{i}"),
                "title": if i % 2 == 0 { "Home" } else { "Office" },
                "fullName": format!("Customer {i}"),
                "phone": format!("+90 555 000 {i:04}"),
                "city": city,
                "district": format!("District {}", i % 9),
                "isDefault": i % 5 == 0,
                "createdAt": format!("2024-02-{:02}", i % 28 + 1),
            })
        })
        .collect()
}

/// Instant for the product with creation rank `rank` (0 is the newest)
pub fn ranked_instant(rank: usize) -> DateTime<Utc> {
    let newest = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
    newest - Duration::hours(rank as i64 * 7)
}

/// 50 products with distinct creation dates, stored out of date order.
///
/// Product `p{rank}` has creation rank `rank` (0 = newest).
pub fn dated_products() -> Vec<Value> {
    // 17 is coprime with 50, so this visits every rank exactly once
    (0..50)
        .map(|i| (i * 17) % 50)
        .map(|rank| {
            json!({
                "id": format!("p{rank}"),
                "name": format!("Product {rank}"),
                "price": 10 + rank,
                "stock": rank % 4,
                "isActive": rank % 3 != 0,
                "category": {"name": if rank % 2 == 0 { "Shoes" } else { "Bags" }},
                "createdAt": ranked_instant(rank).to_rfc3339(),
            })
        })
        .collect()
}

/// 10 coupons, 4 of which are active percentage coupons
pub fn coupons() -> Vec<Value> {
    let rows = [
        ("SPRING10", "YUZDE", 10, true),
        ("WELCOME50", "SABIT", 50, true),
        ("SUMMER15", "YUZDE", 15, true),
        ("OLD5", "YUZDE", 5, false),
        ("FREESHIP", "SABIT", 30, true),
        ("VIP20", "YUZDE", 20, true),
        ("BLACKFRIDAY", "YUZDE", 40, false),
        ("LOYAL100", "SABIT", 100, false),
        ("STUDENT12", "YUZDE", 12, true),
        ("NEWYEAR25", "SABIT", 25, true),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (code, kind, value, active))| {
            json!({
                "id": format!("c{}", i + 1),
                "code": code,
                "description": format!("{code} campaign"),
                "type": kind,
                "value": value,
                "active": active,
                "usageCount": i * 2,
                "createdAt": format!("2024-03-{:02}T10:00:00Z", i + 1),
            })
        })
        .collect()
}

/// Field values of `key` in order
pub fn column<'a>(records: impl IntoIterator<Item = &'a Value>, key: &str) -> Vec<String> {
    records
        .into_iter()
        .map(|r| match &r[key] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Typed record
// ---------------------------------------------------------------------------

/// A review decoded into a struct instead of kept as JSON
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: u32,
    pub product: String,
    pub author: Option<String>,
    pub comment: String,
    pub rating: i64,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for Review {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" => Some(FieldValue::Integer(self.id.into())),
            "product.name" => Some(self.product.as_str().into()),
            "user.fullName" => self.author.as_deref().map(FieldValue::from),
            "comment" => Some(self.comment.as_str().into()),
            "rating" => Some(self.rating.into()),
            "approved" => Some(self.approved.into()),
            "createdAt" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }
}

pub fn reviews() -> Vec<Review> {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    vec![
        Review {
            id: 1,
            product: "Leather Bag".into(),
            author: Some("Ayse".into()),
            comment: "Great quality".into(),
            rating: 5,
            approved: true,
            created_at: base,
        },
        Review {
            id: 2,
            product: "Running Shoe".into(),
            author: None,
            comment: "Too small".into(),
            rating: 2,
            approved: false,
            created_at: base + Duration::days(2),
        },
        Review {
            id: 3,
            product: "Leather Belt".into(),
            author: Some("Mehmet".into()),
            comment: "ok".into(),
            rating: 5,
            approved: false,
            created_at: base + Duration::days(1),
        },
    ]
}

// ---------------------------------------------------------------------------
// Failing source
// ---------------------------------------------------------------------------

/// In-memory source whose calls fail with a network error while `failing`
#[derive(Clone)]
pub struct FlakySource {
    inner: InMemoryDataSource<Value>,
    failing: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FlakySource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            inner: InMemoryDataSource::with_records(records),
            failing: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Calls received, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> usize {
        self.inner.len()
    }

    fn check(&self) -> SourceResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(SourceError::Network {
                message: "connection refused".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DataSource<Value> for FlakySource {
    async fn fetch_all(&self) -> SourceResult<Vec<Value>> {
        self.check()?;
        self.inner.fetch_all().await
    }

    async fn create(&self, record: Value) -> SourceResult<Value> {
        self.check()?;
        self.inner.create(record).await
    }

    async fn update(&self, id: &str, record: Value) -> SourceResult<Value> {
        self.check()?;
        self.inner.update(id, record).await
    }

    async fn delete(&self, id: &str) -> SourceResult<()> {
        self.check()?;
        self.inner.delete(id).await
    }
}
