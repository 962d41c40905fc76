use chrono::{NaiveDate, TimeDelta, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{BookingSettings, CalculationInput, Engine, EngineError, Participant};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn input(total_cost: f64) -> CalculationInput {
    CalculationInput::new(
        vec![
            Participant::new("Andrej", date("2025-10-16"), date("2025-10-29")),
            Participant::new("Jane", date("2025-10-16"), date("2025-10-29")),
        ],
        BookingSettings::new(total_cost, date("2025-10-16"), date("2025-10-28")),
        Vec::new(),
    )
}

async fn expire(db: &DatabaseConnection, id: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE calculations SET expires_at = ? WHERE id = ?",
        vec![(Utc::now() - TimeDelta::hours(1)).into(), id.into()],
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn saved_calculation_loads_back() {
    let (engine, _db) = engine_with_db().await;
    let input = input(1300.0);

    let id = engine.save_calculation(&input, None).await.unwrap();
    assert!(id.starts_with("calc_"));

    let saved = engine.load_calculation(&id).await.unwrap();
    assert_eq!(saved.id, id);
    assert_eq!(saved.input, input);
    assert_eq!(saved.created_at, saved.updated_at);
    let ttl = saved.expires_at - saved.updated_at;
    assert_eq!(ttl, TimeDelta::days(30));
}

#[tokio::test]
async fn saving_with_existing_id_overwrites_and_keeps_creation_time() {
    let (engine, _db) = engine_with_db().await;

    let id = engine.save_calculation(&input(1300.0), None).await.unwrap();
    let first = engine.load_calculation(&id).await.unwrap();

    let same = engine
        .save_calculation(&input(900.0), Some(&id))
        .await
        .unwrap();
    assert_eq!(same, id);

    let second = engine.load_calculation(&id).await.unwrap();
    assert_eq!(second.input.settings.total_cost, 900.0);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert!(second.expires_at >= first.expires_at);
}

#[tokio::test]
async fn unknown_existing_id_is_inserted_under_that_id() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .save_calculation(&input(1300.0), Some("calc_shared"))
        .await
        .unwrap();
    assert_eq!(id, "calc_shared");
    assert!(engine.load_calculation("calc_shared").await.is_ok());
}

#[tokio::test]
async fn missing_calculation_is_key_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.load_calculation("calc_nope").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("calc_nope".to_string()));
}

#[tokio::test]
async fn expired_calculation_is_gone_and_purged() {
    let (engine, db) = engine_with_db().await;
    let stale = engine.save_calculation(&input(1300.0), None).await.unwrap();
    let fresh = engine.save_calculation(&input(800.0), None).await.unwrap();
    expire(&db, &stale).await;

    let err = engine.load_calculation(&stale).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound(stale.clone()));

    assert_eq!(engine.purge_expired().await.unwrap(), 1);
    assert_eq!(engine.purge_expired().await.unwrap(), 0);
    assert!(engine.load_calculation(&fresh).await.is_ok());
}

#[tokio::test]
async fn resaving_an_expired_calculation_revives_it() {
    let (engine, db) = engine_with_db().await;
    let id = engine.save_calculation(&input(1300.0), None).await.unwrap();
    expire(&db, &id).await;

    engine
        .save_calculation(&input(1300.0), Some(&id))
        .await
        .unwrap();
    assert!(engine.load_calculation(&id).await.is_ok());
}

#[tokio::test]
async fn delete_removes_the_row() {
    let (engine, _db) = engine_with_db().await;
    let id = engine.save_calculation(&input(1300.0), None).await.unwrap();

    engine.delete_calculation(&id).await.unwrap();
    assert!(matches!(
        engine.load_calculation(&id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(
        engine.delete_calculation(&id).await.unwrap_err(),
        EngineError::KeyNotFound(id)
    );
}

#[tokio::test]
async fn custom_ttl_is_applied_and_must_be_positive() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let engine = Engine::builder()
        .database(db.clone())
        .ttl(TimeDelta::days(2))
        .build()
        .await
        .unwrap();
    let id = engine.save_calculation(&input(1300.0), None).await.unwrap();
    let saved = engine.load_calculation(&id).await.unwrap();
    assert_eq!(saved.expires_at - saved.updated_at, TimeDelta::days(2));

    let err = Engine::builder()
        .database(db)
        .ttl(TimeDelta::zero())
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}
