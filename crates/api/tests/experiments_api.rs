//! Integration tests for experiment content and startup seeding.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;
use vlab_api::seed::{seed_experiments, SeedError};
use vlab_db::models::experiment::UpsertExperiment;
use vlab_db::repositories::ExperimentRepo;

async fn insert_experiment(pool: &PgPool, no: i32, title: &str) {
    let input: UpsertExperiment =
        serde_json::from_value(serde_json::json!({ "no": no, "title": title, "aim": "Learn" }))
            .unwrap();
    ExperimentRepo::upsert(pool, &input).await.unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_existing_experiment(pool: PgPool) {
    insert_experiment(&pool, 1, "Sentiment Analysis").await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/experiments/1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["no"], 1);
    assert_eq!(json["data"]["title"], "Sentiment Analysis");
    assert_eq!(json["data"]["theory"], "");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_experiment_lists_available(pool: PgPool) {
    insert_experiment(&pool, 2, "Topic Modeling").await;
    insert_experiment(&pool, 1, "Sentiment Analysis").await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/experiments/9").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Experiment not found");
    let available = json["available_experiments"].as_array().unwrap();
    assert_eq!(available.len(), 2);
    assert_eq!(available[0]["no"], 1);
    assert_eq!(available[1]["title"], "Topic Modeling");
}

#[tokio::test]
async fn non_numeric_experiment_number_is_bad_request() {
    let app = common::build_test_app(common::lazy_pool());

    for uri in ["/api/v1/experiments/abc", "/api/v1/experiments/0", "/api/v1/experiments/-1"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid experiment number");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn seed_file_upserts_by_number(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("experiments.json");
    std::fs::write(
        &path,
        r#"[{"no": 1, "title": "First"}, {"no": 2, "title": "Second", "references": "Book"}]"#,
    )
    .unwrap();

    assert_eq!(seed_experiments(&pool, &path).await.unwrap(), 2);

    std::fs::write(&path, r#"[{"no": 1, "title": "First (revised)"}]"#).unwrap();
    assert_eq!(seed_experiments(&pool, &path).await.unwrap(), 1);

    let first = ExperimentRepo::find_by_no(&pool, 1).await.unwrap().unwrap();
    assert_eq!(first.title, "First (revised)");
    let second = ExperimentRepo::find_by_no(&pool, 2).await.unwrap().unwrap();
    assert_eq!(second.references, "Book");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn seed_rejects_invalid_numbers(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("experiments.json");
    std::fs::write(&path, r#"[{"no": 1}, {"no": 0}]"#).unwrap();

    let err = seed_experiments(&pool, &path).await.unwrap_err();
    assert!(matches!(err, SeedError::InvalidNumber(0)));
    assert!(ExperimentRepo::list_summaries(&pool).await.unwrap().is_empty());
}
