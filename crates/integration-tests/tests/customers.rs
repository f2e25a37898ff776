//! Integration tests for customer CRUD and search.

use tailordesk_core::Measurements;
use tailordesk_integration_tests::seed_tenant;
use tailordesk_shop::customers::{self, CustomerRepository};
use tailordesk_shop::error::{RepositoryError, ValidationError};
use tailordesk_shop::models::{CustomerPatch, NewCustomer};
use tailordesk_shop::store::memory::MemoryStore;

fn new_customer(name: &str, phone: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_owned(),
        phone: phone.to_owned(),
        ..NewCustomer::default()
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_defaults_optional_fields_to_empty_strings() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    let id = repo
        .create(&ctx, new_customer("Ravi", "9876543210"))
        .await
        .expect("create");

    let customer = repo.get(&ctx, &id).await.expect("get");
    assert_eq!(customer.name, "Ravi");
    assert_eq!(customer.address, "");
    assert_eq!(customer.country, "");
    assert_eq!(customer.notes, "");
    assert!(customer.last_measurements.is_empty());
    assert_eq!(customer.shop_id, ctx.shop_id);
}

#[tokio::test]
async fn test_create_requires_name_and_phone() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    let err = repo
        .create(&ctx, new_customer("", "9876543210"))
        .await
        .expect_err("missing name");
    assert!(matches!(
        err,
        RepositoryError::Validation(ValidationError::MissingField("name"))
    ));

    let err = repo
        .create(&ctx, new_customer("Ravi", ""))
        .await
        .expect_err("missing phone");
    assert!(matches!(
        err,
        RepositoryError::Validation(ValidationError::MissingField("phone"))
    ));

    // Nothing was written on either failure.
    assert!(repo.list(&ctx).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_create_rejects_malformed_phone() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    let err = repo
        .create(&ctx, new_customer("Ravi", "call me maybe"))
        .await
        .expect_err("bad phone");
    assert!(matches!(
        err,
        RepositoryError::Validation(ValidationError::Phone(_))
    ));
}

// ============================================================================
// List ordering
// ============================================================================

#[tokio::test]
async fn test_list_is_newest_first() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    for name in ["First", "Second", "Third"] {
        repo.create(&ctx, new_customer(name, "9876543210"))
            .await
            .expect("create");
    }

    let names: Vec<String> = repo
        .list(&ctx)
        .await
        .expect("list")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Third", "Second", "First"]);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_partial_update_touches_only_given_fields() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    let id = repo
        .create(
            &ctx,
            NewCustomer {
                name: "Ravi".to_owned(),
                phone: "9876543210".to_owned(),
                city: "Mumbai".to_owned(),
                notes: "prefers evening fittings".to_owned(),
                ..NewCustomer::default()
            },
        )
        .await
        .expect("create");

    repo.update(
        &ctx,
        &id,
        CustomerPatch {
            city: Some("Pune".to_owned()),
            ..CustomerPatch::default()
        },
    )
    .await
    .expect("update");

    let customer = repo.get(&ctx, &id).await.expect("get");
    assert_eq!(customer.city, "Pune");
    assert_eq!(customer.name, "Ravi");
    assert_eq!(customer.notes, "prefers evening fittings");
    assert_eq!(customer.shop_id, ctx.shop_id);
}

#[tokio::test]
async fn test_measurements_change_only_on_explicit_edit() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    let id = repo
        .create(&ctx, new_customer("Ravi", "9876543210"))
        .await
        .expect("create");

    let taken = Measurements {
        chest: "40".to_owned(),
        waist: "34".to_owned(),
        ..Measurements::default()
    };
    repo.update(
        &ctx,
        &id,
        CustomerPatch {
            last_measurements: Some(taken.clone()),
            ..CustomerPatch::default()
        },
    )
    .await
    .expect("update measurements");

    let customer = repo.get(&ctx, &id).await.expect("get");
    assert_eq!(customer.last_measurements, taken);
}

#[tokio::test]
async fn test_update_missing_customer_is_not_found() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    let err = repo
        .update(
            &ctx,
            &"no-such-customer".into(),
            CustomerPatch {
                name: Some("Ghost".to_owned()),
                ..CustomerPatch::default()
            },
        )
        .await
        .expect_err("missing");
    assert!(matches!(err, RepositoryError::NotFound));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_second_delete_signals_not_found() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    let keep = repo
        .create(&ctx, new_customer("Keeper", "1112223334"))
        .await
        .expect("create keeper");
    let id = repo
        .create(&ctx, new_customer("Ravi", "9876543210"))
        .await
        .expect("create");

    repo.delete(&ctx, &id).await.expect("first delete");
    let err = repo.delete(&ctx, &id).await.expect_err("second delete");
    assert!(matches!(err, RepositoryError::NotFound));

    // Other records are untouched by the double delete.
    assert!(repo.get(&ctx, &keep).await.is_ok());
}

// ============================================================================
// Search (pure, in-memory)
// ============================================================================

#[tokio::test]
async fn test_search_over_fetched_list() {
    let store = MemoryStore::new();
    let ctx = seed_tenant(&store, "Needleworks").await;
    let repo = CustomerRepository::new(&store);

    repo.create(&ctx, new_customer("John Smith", "987650001"))
        .await
        .expect("create");
    repo.create(&ctx, new_customer("Asha Patel", "555000111"))
        .await
        .expect("create");

    let list = repo.list(&ctx).await.expect("list");

    let all = customers::search(&list, "");
    assert_eq!(all.len(), list.len());

    let upper = customers::search(&list, "JOHN");
    let lower = customers::search(&list, "john");
    assert_eq!(upper.len(), 1);
    assert_eq!(
        upper.iter().map(|c| &c.id).collect::<Vec<_>>(),
        lower.iter().map(|c| &c.id).collect::<Vec<_>>()
    );

    let by_phone = customers::search(&list, "000111");
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone.first().map(|c| c.name.as_str()), Some("Asha Patel"));
}
