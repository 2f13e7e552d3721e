//! List declarations for the admin console's record types
//!
//! One function per list page. Field names follow the REST API's JSON
//! payloads (camelCase); nested values are reached through dotted paths.

use crate::config::ConsoleConfig;
use crate::core::filter::{FieldFilter, Filter};
use crate::core::query::SortSpec;
use crate::core::schema::{FieldDef, ListSchema};
use crate::core::stats::{Measure, StatDef};

/// Coupon type granting a percentage discount
pub const COUPON_PERCENT: &str = "YUZDE";
/// Coupon type granting a fixed amount
pub const COUPON_FIXED: &str = "SABIT";

fn when(field: &str, filter: Filter) -> FieldFilter {
    FieldFilter::new(field, filter)
}

fn count_where(name: &str, conditions: Vec<FieldFilter>) -> StatDef {
    StatDef::new(name, Measure::CountWhere { when: conditions })
}

pub fn products() -> ListSchema {
    ListSchema::new("products")
        .with_field(FieldDef::text("id").labeled("ID").internal())
        .with_field(FieldDef::text("name").labeled("Name").searchable().sortable())
        .with_field(FieldDef::text("sku").labeled("SKU").searchable())
        .with_field(
            FieldDef::text("category")
                .at("category.name")
                .labeled("Category")
                .searchable()
                .filterable()
                .sortable(),
        )
        .with_field(FieldDef::number("price").labeled("Price").filterable().sortable())
        .with_field(FieldDef::number("stock").labeled("Stock").filterable().sortable())
        .with_field(FieldDef::boolean("isActive").labeled("Active").filterable())
        .with_field(FieldDef::date("createdAt").labeled("Created").sortable())
        .with_default_sort(SortSpec::desc("createdAt"))
        .with_stat(StatDef::new("total", Measure::Count))
        .with_stat(count_where(
            "inStock",
            vec![when("stock", Filter::GreaterThan(0i64.into()))],
        ))
        .with_stat(count_where(
            "outOfStock",
            vec![when("stock", Filter::AtMost(0i64.into()))],
        ))
        .with_stat(StatDef::new(
            "stockUnits",
            Measure::Sum {
                field: "stock".into(),
            },
        ))
}

pub fn categories() -> ListSchema {
    ListSchema::new("categories")
        .with_field(FieldDef::text("id").labeled("ID").internal())
        .with_field(FieldDef::text("name").labeled("Name").searchable().sortable())
        .with_field(FieldDef::text("slug").labeled("Slug").searchable())
        .with_field(FieldDef::text("description").labeled("Description").searchable())
        .with_field(
            FieldDef::text("parent")
                .at("parent.name")
                .labeled("Parent")
                .filterable()
                .sortable(),
        )
        .with_field(
            FieldDef::number("productCount")
                .labeled("Products")
                .sortable(),
        )
        .with_field(FieldDef::date("createdAt").labeled("Created").sortable())
        .with_default_sort(SortSpec::asc("name"))
        .with_stat(StatDef::new("total", Measure::Count))
        .with_stat(count_where(
            "subcategories",
            vec![when("parent", Filter::Present)],
        ))
}

pub fn coupons() -> ListSchema {
    ListSchema::new("coupons")
        .with_field(FieldDef::text("id").labeled("ID").internal())
        .with_field(FieldDef::text("code").labeled("Code").searchable().sortable())
        .with_field(FieldDef::text("description").labeled("Description").searchable())
        .with_field(FieldDef::text("type").labeled("Type").filterable().sortable())
        .with_field(FieldDef::number("value").labeled("Value").filterable().sortable())
        .with_field(FieldDef::number("minOrderAmount").labeled("Minimum Order"))
        .with_field(FieldDef::number("usageCount").labeled("Used").sortable())
        .with_field(FieldDef::boolean("active").labeled("Active").filterable().sortable())
        .with_field(FieldDef::date("expiresAt").labeled("Expires").filterable().sortable())
        .with_field(FieldDef::date("createdAt").labeled("Created").sortable())
        .with_default_sort(SortSpec::desc("createdAt"))
        .with_stat(StatDef::new("total", Measure::Count))
        .with_stat(count_where(
            "active",
            vec![when("active", Filter::Equals(true.into()))],
        ))
        .with_stat(count_where(
            "percent",
            vec![when("type", Filter::Equals(COUPON_PERCENT.into()))],
        ))
        .with_stat(count_where(
            "fixed",
            vec![when("type", Filter::Equals(COUPON_FIXED.into()))],
        ))
        .with_stat(StatDef::new(
            "totalUsage",
            Measure::Sum {
                field: "usageCount".into(),
            },
        ))
}

pub fn reviews() -> ListSchema {
    ListSchema::new("reviews")
        .with_field(FieldDef::text("id").labeled("ID").internal())
        .with_field(
            FieldDef::text("product")
                .at("product.name")
                .labeled("Product")
                .searchable()
                .sortable(),
        )
        .with_field(
            FieldDef::text("author")
                .at("user.fullName")
                .labeled("Author")
                .searchable(),
        )
        .with_field(FieldDef::text("comment").labeled("Comment").searchable())
        .with_field(FieldDef::number("rating").labeled("Rating").filterable().sortable())
        .with_field(FieldDef::boolean("approved").labeled("Approved").filterable())
        .with_field(FieldDef::date("createdAt").labeled("Created").sortable())
        .with_default_sort(SortSpec::desc("createdAt"))
        .with_stat(StatDef::new("total", Measure::Count))
        .with_stat(count_where(
            "pending",
            vec![when("approved", Filter::Equals(false.into()))],
        ))
        .with_stat(count_where(
            "fiveStar",
            vec![when("rating", Filter::AtLeast(5i64.into()))],
        ))
        .with_stat(StatDef::new(
            "ratingSum",
            Measure::Sum {
                field: "rating".into(),
            },
        ))
}

pub fn addresses() -> ListSchema {
    ListSchema::new("addresses")
        .with_field(FieldDef::text("id").labeled("ID").internal())
        .with_field(FieldDef::text("title").labeled("Title").searchable())
        .with_field(FieldDef::text("fullName").labeled("Full Name").searchable().sortable())
        .with_field(FieldDef::text("phone").labeled("Phone"))
        .with_field(
            FieldDef::text("city")
                .labeled("City")
                .searchable()
                .filterable()
                .sortable(),
        )
        .with_field(FieldDef::text("district").labeled("District").searchable())
        .with_field(FieldDef::text("addressLine").labeled("Address"))
        .with_field(FieldDef::boolean("isDefault").labeled("Default").filterable())
        .with_field(FieldDef::date("createdAt").labeled("Created").sortable())
        .with_stat(StatDef::new("total", Measure::Count))
        .with_stat(count_where(
            "default",
            vec![when("isDefault", Filter::Equals(true.into()))],
        ))
        .with_stat(StatDef::new(
            "uniqueCities",
            Measure::Distinct {
                field: "city".into(),
            },
        ))
}

pub fn cookie_consents() -> ListSchema {
    ListSchema::new("cookie_consents")
        .with_field(FieldDef::text("id").labeled("ID").internal())
        .with_field(FieldDef::text("sessionId").labeled("Session").searchable())
        .with_field(FieldDef::text("ipAddress").labeled("IP Address").searchable())
        .with_field(
            FieldDef::text("user")
                .at("user.email")
                .labeled("User")
                .searchable(),
        )
        .with_field(FieldDef::boolean("analytics").labeled("Analytics").filterable())
        .with_field(FieldDef::boolean("marketing").labeled("Marketing").filterable())
        .with_field(FieldDef::boolean("functional").labeled("Functional").filterable())
        .with_field(FieldDef::date("createdAt").labeled("Given").sortable())
        .with_default_sort(SortSpec::desc("createdAt"))
        .with_stat(StatDef::new("total", Measure::Count))
        .with_stat(count_where(
            "analytics",
            vec![when("analytics", Filter::Equals(true.into()))],
        ))
        .with_stat(count_where(
            "marketing",
            vec![when("marketing", Filter::Equals(true.into()))],
        ))
        .with_stat(count_where(
            "acceptedAll",
            vec![
                when("analytics", Filter::Equals(true.into())),
                when("marketing", Filter::Equals(true.into())),
                when("functional", Filter::Equals(true.into())),
            ],
        ))
}

pub fn contracts() -> ListSchema {
    ListSchema::new("contracts")
        .with_field(FieldDef::text("id").labeled("ID").internal())
        .with_field(FieldDef::text("title").labeled("Title").searchable().sortable())
        .with_field(FieldDef::text("type").labeled("Type").filterable().sortable())
        .with_field(FieldDef::text("version").labeled("Version").sortable())
        .with_field(FieldDef::boolean("isActive").labeled("Active").filterable())
        .with_field(FieldDef::text("content").searchable().internal())
        .with_field(FieldDef::date("updatedAt").labeled("Updated").sortable())
        .with_default_sort(SortSpec::desc("updatedAt"))
        .with_stat(StatDef::new("total", Measure::Count))
        .with_stat(count_where(
            "active",
            vec![when("isActive", Filter::Equals(true.into()))],
        ))
        .with_stat(StatDef::new(
            "types",
            Measure::Distinct {
                field: "type".into(),
            },
        ))
}

/// Every list of the console, in menu order
pub fn all() -> Vec<ListSchema> {
    vec![
        products(),
        categories(),
        coupons(),
        reviews(),
        addresses(),
        cookie_consents(),
        contracts(),
    ]
}

/// Console configuration with default settings and every catalog list
pub fn console_config() -> ConsoleConfig {
    ConsoleConfig::default_config()
}
