//! Shared fixture data for unit tests: a small catalog snapshot with a
//! component hierarchy, a secured product, and per-user assignments.

use crate::{
    catalog,
    store::{AccessPolicy, Record, RecordId, Store},
    value::Value,
};
use std::collections::{BTreeMap, BTreeSet};
use time::macros::{date, datetime};

pub const OWNER_NEXB: RecordId = 1;
pub const OWNER_ASF: RecordId = 2;
pub const OWNER_LINUS: RecordId = 3;

pub const TAG_NETWORK: RecordId = 5;
pub const TAG_ATTRIBUTION: RecordId = 6;

pub const LICENSE_APACHE: RecordId = 10;
pub const LICENSE_GPL: RecordId = 11;
pub const LICENSE_BSD: RecordId = 12;
pub const LICENSE_PROPRIETARY: RecordId = 13;

pub const COMPONENT_HTTPD: RecordId = 20;
pub const COMPONENT_APR: RecordId = 21;
pub const COMPONENT_EXPAT: RecordId = 22;
pub const COMPONENT_KERNEL: RecordId = 23;

pub const PACKAGE_HTTPD: RecordId = 40;

pub const PRODUCT_STARSHIP: RecordId = 50;

pub const PC_HTTPD: RecordId = 60;
pub const PC_KERNEL: RecordId = 61;

pub const USER_ALICE: &str = "alice";

pub fn store() -> Store {
    catalog::register_catalog();

    let mut store = Store::new();
    store.set_tag_labels(vec!["Approved".to_string(), "Restricted".to_string()]);

    store.add_table("Owner", AccessPolicy::Open);
    store.insert(
        "Owner",
        Record::new(OWNER_NEXB)
            .with("name", Value::text("nexB"))
            .with("type", Value::text("organization")),
    );
    store.insert(
        "Owner",
        Record::new(OWNER_ASF)
            .with("name", Value::text("Apache Software Foundation"))
            .with("type", Value::text("organization")),
    );
    store.insert(
        "Owner",
        Record::new(OWNER_LINUS)
            .with("name", Value::text("Linus Torvalds"))
            .with("type", Value::text("person")),
    );

    store.add_table("LicenseTag", AccessPolicy::Open);
    store.insert(
        "LicenseTag",
        Record::new(TAG_NETWORK).with("label", Value::text("Network Redistribution")),
    );
    store.insert(
        "LicenseTag",
        Record::new(TAG_ATTRIBUTION).with("label", Value::text("Attribution Required")),
    );

    store.add_table("License", AccessPolicy::Open);
    store.insert(
        "License",
        Record::new(LICENSE_APACHE)
            .with("key", Value::text("apache-2.0"))
            .with("name", Value::text("Apache License 2.0"))
            .with("short_name", Value::text("Apache 2.0"))
            .with("is_active", Value::Bool(true))
            .with("category", Value::text("permissive"))
            .with("owner", Value::Ref(OWNER_ASF))
            .with("tags", Value::List(vec![Value::Ref(TAG_ATTRIBUTION)])),
    );
    store.insert(
        "License",
        Record::new(LICENSE_GPL)
            .with("key", Value::text("gpl-2.0"))
            .with("name", Value::text("GNU General Public License 2.0"))
            .with("short_name", Value::text("GPL 2.0"))
            .with("is_active", Value::Bool(true))
            .with("category", Value::text("copyleft"))
            .with("owner", Value::Ref(OWNER_LINUS))
            .with(
                "tags",
                Value::List(vec![Value::Ref(TAG_NETWORK), Value::Ref(TAG_ATTRIBUTION)]),
            ),
    );
    store.insert(
        "License",
        Record::new(LICENSE_BSD)
            .with("key", Value::text("bsd-new"))
            .with("name", Value::text("BSD-3-Clause"))
            .with("short_name", Value::text("BSD-3"))
            .with("is_active", Value::Null)
            .with("category", Value::text("permissive"))
            .with("owner", Value::Ref(OWNER_ASF))
            .with("tags", Value::List(Vec::new())),
    );
    store.insert(
        "License",
        Record::new(LICENSE_PROPRIETARY)
            .with("key", Value::text("proprietary-x"))
            .with("name", Value::text("Proprietary X"))
            .with("short_name", Value::text("Prop-X"))
            .with("is_active", Value::Bool(false))
            .with("category", Value::text(""))
            .with("owner", Value::Ref(OWNER_NEXB))
            .with("tags", Value::List(Vec::new())),
    );

    store.add_table("Component", AccessPolicy::Open);
    store.insert(
        "Component",
        Record::new(COMPONENT_HTTPD)
            .with("name", Value::text("httpd"))
            .with("version", Value::text("2.4"))
            .with("owner", Value::Ref(OWNER_ASF))
            .with("license_expression", Value::text("apache-2.0"))
            .with("release_date", Value::Date(date!(2023 - 01 - 15)))
            .with("created_date", Value::DateTime(datetime!(2023-01-10 09:30 UTC)))
            .with("is_active", Value::Bool(true))
            .with("curation_level", Value::Int(40))
            .with(
                "keywords",
                Value::List(vec![Value::text("web"), Value::text("server")]),
            )
            .with("licenses", Value::List(vec![Value::Ref(LICENSE_APACHE)]))
            .with("packages", Value::List(vec![Value::Ref(PACKAGE_HTTPD)]))
            .with_tag("Approved", Value::Bool(true)),
    );
    store.insert(
        "Component",
        Record::new(COMPONENT_APR)
            .with("name", Value::text("apr"))
            .with("version", Value::text("1.7"))
            .with("owner", Value::Ref(OWNER_ASF))
            .with("license_expression", Value::text("apache-2.0"))
            .with("is_active", Value::Bool(true))
            .with("curation_level", Value::Int(20))
            .with("keywords", Value::text("[]"))
            .with("licenses", Value::List(vec![Value::Ref(LICENSE_APACHE)])),
    );
    store.insert(
        "Component",
        Record::new(COMPONENT_EXPAT)
            .with("name", Value::text("expat"))
            .with("version", Value::text("2.5"))
            .with("owner", Value::Null)
            .with("license_expression", Value::text("bsd-new"))
            .with("is_active", Value::Null)
            .with("curation_level", Value::Int(0))
            .with("keywords", Value::List(Vec::new()))
            .with("licenses", Value::List(vec![Value::Ref(LICENSE_BSD)])),
    );
    store.insert(
        "Component",
        Record::new(COMPONENT_KERNEL)
            .with("name", Value::text("linux-kernel"))
            .with("version", Value::text("6.1"))
            .with("owner", Value::Ref(OWNER_LINUS))
            .with("license_expression", Value::text("gpl-2.0"))
            .with("release_date", Value::Date(date!(2022 - 12 - 11)))
            .with("is_active", Value::Bool(true))
            .with("curation_level", Value::Int(80))
            .with("has_pending_scan", Value::Bool(true))
            .with("licenses", Value::List(vec![Value::Ref(LICENSE_GPL)]))
            .with_tag("Approved", Value::Bool(false)),
    );

    store.add_table("Subcomponent", AccessPolicy::Open);
    store.insert(
        "Subcomponent",
        Record::new(30)
            .with("parent", Value::Ref(COMPONENT_HTTPD))
            .with("child", Value::Ref(COMPONENT_APR)),
    );
    store.insert(
        "Subcomponent",
        Record::new(31)
            .with("parent", Value::Ref(COMPONENT_APR))
            .with("child", Value::Ref(COMPONENT_EXPAT)),
    );

    store.add_table("Package", AccessPolicy::Open);
    store.insert(
        "Package",
        Record::new(PACKAGE_HTTPD)
            .with("filename", Value::text("httpd-2.4.tar.gz"))
            .with("download_url", Value::text("https://archive.apache.org/httpd-2.4.tar.gz"))
            .with("license_expression", Value::text("apache-2.0")),
    );

    let mut product_assignments = BTreeMap::new();
    product_assignments.insert(
        USER_ALICE.to_string(),
        BTreeSet::from([PRODUCT_STARSHIP]),
    );
    store.add_table("Product", AccessPolicy::Secured(product_assignments));
    store.insert(
        "Product",
        Record::new(PRODUCT_STARSHIP)
            .with("name", Value::text("Starship"))
            .with("version", Value::text("1.0")),
    );

    store.add_table(
        "ProductComponent",
        AccessPolicy::ProductSecured {
            via_field: "product",
            product_model: "Product",
        },
    );
    store.insert(
        "ProductComponent",
        Record::new(PC_HTTPD)
            .with("product", Value::Ref(PRODUCT_STARSHIP))
            .with("component", Value::Ref(COMPONENT_HTTPD))
            .with("license_expression", Value::text("apache-2.0")),
    );
    store.insert(
        "ProductComponent",
        Record::new(PC_KERNEL)
            .with("product", Value::Ref(PRODUCT_STARSHIP))
            .with("component", Value::Ref(COMPONENT_KERNEL))
            .with("license_expression", Value::text("gpl-2.0")),
    );

    store
}
