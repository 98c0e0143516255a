//! Tests for generic record operations.

use serde_json::{Value, json};

use crate::odoo::testing::{FakeOdoo, fake_client};
use crate::odoo::{Domain, OdooError, SearchOptions, Values};

fn fake_with_partners(count: i64) -> FakeOdoo {
    let mut fake = FakeOdoo::new().with_fields("res.partner", &["id", "name", "city"]);
    for i in 1..=count {
        fake = fake.with_record(
            "res.partner",
            json!({"id": i, "name": format!("Partner {i:03}"), "city": if i % 2 == 0 { "Ghent" } else { "Lyon" }}),
        );
    }
    fake
}

fn names(records: &[crate::odoo::Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get("name").and_then(Value::as_str).unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn find_without_filter_returns_first_hundred_in_requested_order() {
    let client = fake_client(fake_with_partners(150));

    let records = client
        .find(
            "res.partner",
            &Domain::all(),
            &SearchOptions::new().order("name desc"),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 100);
    assert_eq!(names(&records)[0], "Partner 150");
    assert_eq!(names(&records)[99], "Partner 051");
}

#[tokio::test]
async fn find_filters_projects_and_paginates() {
    let client = fake_client(fake_with_partners(10));

    let records = client
        .find(
            "res.partner",
            &Domain::all().leaf("city", "=", "Ghent"),
            &SearchOptions::new()
                .fields(&["name"])
                .limit(2)
                .offset(1)
                .order("id asc"),
        )
        .await
        .unwrap();

    assert_eq!(names(&records), vec!["Partner 004", "Partner 006"]);
    assert!(records.iter().all(|r| !r.contains_key("city")));
    assert_eq!(client.transport().count("res.partner", "search_read"), 1);
}

#[tokio::test]
async fn create_returns_new_id() {
    let client = fake_client(fake_with_partners(0));

    let id = client
        .create("res.partner", &Values::new().with("name", "Acme"))
        .await
        .unwrap();

    let stored = client.transport().record("res.partner", id).unwrap();
    assert_eq!(stored.get("name"), Some(&json!("Acme")));
}

#[tokio::test]
async fn update_applies_values_to_every_id() {
    let client = fake_client(fake_with_partners(3));

    let ok = client
        .update("res.partner", &[1, 3], &Values::new().with("city", "Oslo"))
        .await
        .unwrap();

    assert!(ok);
    let fake = client.transport();
    assert_eq!(fake.record("res.partner", 1).unwrap()["city"], json!("Oslo"));
    assert_eq!(fake.record("res.partner", 2).unwrap()["city"], json!("Ghent"));
    assert_eq!(fake.record("res.partner", 3).unwrap()["city"], json!("Oslo"));
}

#[tokio::test]
async fn update_with_invalid_id_fails_as_a_whole() {
    let client = fake_client(fake_with_partners(2));

    let err = client
        .update("res.partner", &[1, 99], &Values::new().with("city", "Oslo"))
        .await
        .unwrap_err();

    assert!(matches!(err, OdooError::Remote { .. }));
    assert_eq!(client.transport().count("res.partner", "write"), 1);
}

#[tokio::test]
async fn update_with_no_values_is_rejected_before_any_call() {
    let client = fake_client(fake_with_partners(1));

    let err = client
        .update("res.partner", &[1], &Values::new())
        .await
        .unwrap_err();

    assert!(matches!(err, OdooError::EmptyUpdate));
    assert!(client.transport().calls().is_empty());
}

#[tokio::test]
async fn delete_removes_records() {
    let client = fake_client(fake_with_partners(3));

    assert!(client.delete("res.partner", &[2]).await.unwrap());
    assert!(client.transport().record("res.partner", 2).is_none());
    assert_eq!(client.transport().records("res.partner").len(), 2);
}

#[tokio::test]
async fn read_by_ids_projects_fields() {
    let client = fake_client(fake_with_partners(3));

    let records = client
        .read_by_ids("res.partner", &[3, 1], Some(["name".to_string()].as_slice()))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.contains_key("name") && !r.contains_key("city")));
}

#[tokio::test]
async fn remote_failures_propagate_unchanged() {
    let client = fake_client(fake_with_partners(0));

    let err = client
        .create("res.partner", &Values::new().with("nickname", "x"))
        .await
        .unwrap_err();

    match err {
        OdooError::Remote { message, .. } => {
            assert_eq!(message, "Invalid field 'nickname' on model 'res.partner'")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
