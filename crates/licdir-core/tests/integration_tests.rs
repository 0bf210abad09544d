//! End-to-end tests for the contractor search stack: file-backed database,
//! migrations, import, smart search, caching.

use licdir_core::api::{SearchRequest, SearchService, SearchType};
use licdir_core::config::Config;
use licdir_core::contractors::{Contractor, ContractorRepository, LicenseStatus};
use licdir_core::storage::{Database, DatabaseConfig};

fn smart(term: &str) -> SearchRequest {
    SearchRequest {
        search_term: term.to_string(),
        search_type: SearchType::Smart,
        city: None,
        state: None,
        page: None,
        limit: None,
    }
}

async fn seed(db: &Database) {
    let repo = ContractorRepository::new(db);
    let records = [
        Contractor::new("996518", "Valley Plumbing")
            .with_city("Fresno")
            .with_classification("C-36", "Plumbing"),
        Contractor::new("123456", "Angel City Plumbing")
            .with_city("Los Angeles")
            .with_classification("C-36", "Plumbing"),
        Contractor::new("234567", "Bright Spark Electric")
            .with_city("Los Angeles")
            .with_classification("C-10", "Electrical"),
        Contractor::new("345678", "Sunset Roofing")
            .with_city("San Diego")
            .with_classification("C-39", "Roofing"),
        Contractor::new("456789", "ABC Plumbing Inc")
            .with_city("Sacramento")
            .with_classification("C-36", "Plumbing"),
        Contractor::new("567890", "Shady Builders")
            .with_city("Fresno")
            .with_classification("B", "General Building")
            .with_status(LicenseStatus::Revoked),
    ];
    for record in &records {
        repo.upsert(record).await.expect("Failed to seed contractor");
    }
}

#[tokio::test]
async fn test_file_backed_database_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("contractors.db");

    {
        let db = Database::new(DatabaseConfig::with_path(&path))
            .await
            .expect("Failed to create database");
        seed(&db).await;
        db.close().await;
    }

    let db = Database::new(DatabaseConfig::with_path(&path))
        .await
        .expect("Failed to reopen database");
    let repo = ContractorRepository::new(&db);
    assert_eq!(repo.count().await.unwrap(), 6);

    let status = db.migration_status().await.unwrap();
    assert!(!status.needs_migration);
}

#[tokio::test]
async fn test_smart_search_trade_and_city_paths() {
    let db = Database::in_memory().await.expect("Failed to create database");
    seed(&db).await;
    let service = SearchService::new(db, &Config::default());

    // Trade keyword alone
    let by_trade = service.search(&smart("plumber")).await.unwrap();
    assert_eq!(by_trade.pagination.total, 3);

    // Prepositional city narrows the same trade
    let in_city = service.search(&smart("plumber in fresno")).await.unwrap();
    assert_eq!(in_city.pagination.total, 1);
    assert_eq!(in_city.contractors[0].license_no, "996518");

    // City-prefix form behaves the same
    let prefixed = service.search(&smart("fresno plumber")).await.unwrap();
    assert_eq!(prefixed.pagination.total, 1);
}

#[tokio::test]
async fn test_smart_search_license_and_business_name_paths() {
    let db = Database::in_memory().await.expect("Failed to create database");
    seed(&db).await;
    let service = SearchService::new(db, &Config::default());

    let by_license = service.search(&smart("996518")).await.unwrap();
    assert_eq!(by_license.pagination.total, 1);
    assert_eq!(by_license.contractors[0].business_name, "Valley Plumbing");

    // Multi-word phrases search business names, not the trade table
    let by_name = service.search(&smart("ABC Plumbing Inc")).await.unwrap();
    assert_eq!(by_name.pagination.total, 1);
    assert_eq!(by_name.contractors[0].license_no, "456789");
}

#[tokio::test]
async fn test_revoked_contractors_never_surface() {
    let db = Database::in_memory().await.expect("Failed to create database");
    seed(&db).await;
    let service = SearchService::new(db, &Config::default());

    let response = service.search(&smart("builder")).await.unwrap();
    assert_eq!(response.pagination.total, 0);

    let direct = service.search(&smart("567890")).await.unwrap();
    assert_eq!(direct.pagination.total, 0);
}

#[tokio::test]
async fn test_import_from_json_records() {
    let db = Database::in_memory().await.expect("Failed to create database");
    let repo = ContractorRepository::new(&db);

    let records: Vec<Contractor> = serde_json::from_str(
        r#"[
            {"license_no": "111111", "business_name": "North Bay Solar",
             "city": "Santa Rosa", "state": "CA", "zip": null, "phone": null,
             "status": "CLEAR", "classification": "C-46",
             "raw_classifications": "C-46", "classification_codes": "C-46",
             "trade": "Solar", "issue_date": null, "expire_date": null},
            {"license_no": "222222", "business_name": "East Bay Fencing",
             "city": "Oakland", "state": "CA", "zip": null, "phone": null,
             "status": "ACTIVE", "classification": "C-13",
             "raw_classifications": "C-13", "classification_codes": "C-13",
             "trade": "Fencing", "issue_date": "2019-04-01", "expire_date": null}
        ]"#,
    )
    .expect("Import records should deserialize");

    for record in &records {
        repo.upsert(record).await.expect("Failed to import");
    }
    assert_eq!(repo.count().await.unwrap(), 2);

    let service = SearchService::new(db, &Config::default());
    let response = service.search(&smart("solar")).await.unwrap();
    assert_eq!(response.pagination.total, 1);
    assert_eq!(response.contractors[0].city.as_deref(), Some("Santa Rosa"));
}

#[tokio::test]
async fn test_cache_and_metrics_accumulate() {
    let db = Database::in_memory().await.expect("Failed to create database");
    seed(&db).await;
    let service = SearchService::new(db, &Config::default());

    service.search(&smart("plumber")).await.unwrap();
    service.search(&smart("plumber")).await.unwrap();
    service.search(&smart("roofer")).await.unwrap();

    let snap = service.metrics().snapshot();
    assert_eq!(snap.searches, 2);
    assert_eq!(snap.cache_hits, 1);
    assert_eq!(snap.errors, 0);
    assert_eq!(service.cache().size(), 2);
}
