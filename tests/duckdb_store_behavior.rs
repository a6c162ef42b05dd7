//! Behavior-driven tests for the DuckDB-backed company store.
//!
//! These tests verify the durable backend honors the same contract as the
//! in-memory store: filter translation, commit atomicity, the UNIQUE
//! symbol index, and id assignment from the sequence.

use tempfile::tempdir;

use esglens_tests::*;

fn open_store(dir: &tempfile::TempDir) -> CompanyStore {
    let mut config = StoreConfig::at(dir.path().join("esglens.duckdb"));
    config.max_pool_size = 2;
    CompanyStore::open(config).expect("store open")
}

#[test]
fn when_user_seeds_a_fresh_database_all_six_companies_commit() {
    // Given: A fresh database file
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(open_store(&temp));

    // When: The starter catalog is seeded
    let report = Seeder::run(store.clone()).expect("seed");

    // Then: The full catalog is queryable
    assert_eq!(report.companies_seeded, 6);
    let repository = CompanyRepository::new(store);
    assert_eq!(repository.total_count().unwrap(), 6);
}

#[test]
fn when_the_database_reopens_data_and_seeding_state_persist() {
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("esglens.duckdb");

    {
        let store = Arc::new(CompanyStore::open(StoreConfig::at(&db_path)).expect("store open"));
        Seeder::run(store).expect("seed");
    }

    // Reopen after the first handle is dropped.
    let store = Arc::new(CompanyStore::open(StoreConfig::at(&db_path)).expect("store reopen"));
    let second = Seeder::run(store.clone()).expect("seed check");

    assert!(second.skipped);
    let repository = CompanyRepository::new(store);
    assert_eq!(repository.total_count().unwrap(), 6);
    assert_eq!(
        repository.by_symbol("nee").unwrap().unwrap().name,
        "NextEra Energy Inc."
    );
}

#[test]
fn when_sql_filters_run_they_match_the_in_memory_semantics() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(open_store(&temp));
    Seeder::run(store.clone()).expect("seed");
    let repository = CompanyRepository::new(store);

    // Case-insensitive equality goes through lower() on the SQL path.
    let technology = repository.by_industry("technology").unwrap();
    let names: Vec<&str> = technology
        .iter()
        .map(|company| company.name.as_str())
        .collect();
    assert_eq!(names, ["Apple Inc.", "Microsoft Corporation"]);

    // Inclusive numeric threshold.
    let strong = repository.with_esg_score_above(85.0).unwrap();
    let scores: Vec<f64> = strong.iter().map(|company| company.esg_score).collect();
    assert_eq!(scores, [92.0, 88.5, 85.0]);

    // Advisory uniqueness check with and without the excluded owner.
    let apple = repository.by_symbol("AAPL").unwrap().unwrap();
    assert!(!repository.is_symbol_unique("aapl", None).unwrap());
    assert!(repository.is_symbol_unique("AAPL", apple.id).unwrap());
}

#[test]
fn when_a_duplicate_symbol_reaches_commit_the_whole_batch_rolls_back() {
    // Given: A seeded database
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(open_store(&temp));
    Seeder::run(store.clone()).expect("seed");
    let mut repository = CompanyRepository::new(store.clone());

    // When: A batch staging one valid company and one duplicate commits
    repository.add(company("Nvidia Corp", "NVDA", 75.0, "Medium"));
    repository.add(company("Apple Clone", "aapl", 50.0, "High"));
    let error = repository.save_changes().expect_err("must conflict");

    // Then: The violation surfaces as a conflict
    assert!(matches!(error, StoreError::Conflict { .. }));

    // And: No partial write happened; the valid NVDA row rolled back too
    let check = CompanyRepository::new(store);
    assert_eq!(check.total_count().unwrap(), 6);
    assert!(check.by_symbol("NVDA").unwrap().is_none());
}

#[test]
fn when_rows_are_deleted_their_ids_are_never_reissued() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(open_store(&temp));
    let mut repository = CompanyRepository::new(store.clone());

    repository.add(company("First Corp", "FST", 70.0, "Low"));
    repository.add(company("Second Corp", "SND", 71.0, "Low"));
    repository.save_changes().unwrap();

    let first = repository.by_symbol("FST").unwrap().unwrap();
    let first_id = first.id.unwrap();
    repository.delete(first);
    repository.save_changes().unwrap();

    repository.add(company("Third Corp", "TRD", 72.0, "Low"));
    repository.save_changes().unwrap();

    let third = repository.by_symbol("TRD").unwrap().unwrap();
    assert!(third.id.unwrap() > first_id, "sequence ids must not rewind");
    assert!(repository.get_by_id(first_id).unwrap().is_none());
}

#[test]
fn when_a_company_updates_created_at_is_untouched() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(open_store(&temp));
    Seeder::run(store.clone()).expect("seed");
    let mut repository = CompanyRepository::new(store);

    let mut tesla = repository.by_symbol("TSLA").unwrap().unwrap();
    let original_created = tesla.created_at;
    tesla.esg_score = 81.0;
    tesla.ai_analysis = Some("Improved battery supply chain reporting".into());

    repository.update(tesla);
    assert_eq!(repository.save_changes().unwrap(), 1);

    let reread = repository.by_symbol("TSLA").unwrap().unwrap();
    assert_eq!(reread.esg_score, 81.0);
    assert_eq!(reread.created_at, original_created);
    assert_eq!(
        reread.ai_analysis.as_deref(),
        Some("Improved battery supply chain reporting")
    );
}

#[test]
fn when_update_targets_an_uncommitted_entity_the_commit_fails_cleanly() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(open_store(&temp));
    let mut repository = CompanyRepository::new(store.clone());

    // Never committed, so it has no identity.
    let ghost = company("Ghost Corp", "GHS", 60.0, "High");
    repository.update(ghost);
    let error = repository.save_changes().expect_err("must fail");

    assert!(matches!(error, StoreError::MissingId));
    assert_eq!(CompanyRepository::new(store).total_count().unwrap(), 0);
}

#[test]
fn when_dataset_is_empty_duckdb_aggregates_are_zero() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(open_store(&temp));
    let repository = CompanyRepository::new(store);

    assert_eq!(repository.total_count().unwrap(), 0);
    assert_eq!(repository.average_esg_score().unwrap(), 0.0);
    assert_eq!(repository.average_market_cap().unwrap(), 0.0);
}
