use crate::errors::StoreError;
use crate::models::{GlucosePoint, HealthReading, MealEntry};
use axum::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn recent_health(&self, username: &str, limit: i64) -> Result<Vec<HealthReading>, StoreError>;
    async fn glucose_history(&self, username: &str, limit: i64) -> Result<Vec<GlucosePoint>, StoreError>;
    async fn recent_meals(&self, limit: i64) -> Result<Vec<MealEntry>, StoreError>;
    async fn recent_calories(&self, limit: i64) -> Result<Vec<f64>, StoreError>;
    async fn average_glucose(&self, username: &str) -> Result<Option<f64>, StoreError>;
    async fn total_calories(&self) -> Result<Option<f64>, StoreError>;
}

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

#[derive(Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardStore for SqlStore {
    async fn recent_health(&self, username: &str, limit: i64) -> Result<Vec<HealthReading>, StoreError> {
        sqlx::query_as::<_, HealthReading>(
            r#"
            SELECT h.id, h.blood_glucose_level, h.time_of_day, h.activity_type, h.symptom_name
            FROM healthinfo h
            JOIN users u ON h.user_id = u.id
            WHERE u.username = ?
            ORDER BY h.time_of_day DESC
            LIMIT ?
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::new("recent health data", err))
    }

    async fn glucose_history(&self, username: &str, limit: i64) -> Result<Vec<GlucosePoint>, StoreError> {
        sqlx::query_as::<_, GlucosePoint>(
            r#"
            SELECT h.blood_glucose_level, DATE(h.time_of_day) AS day
            FROM healthinfo h
            JOIN users u ON h.user_id = u.id
            WHERE u.username = ?
            ORDER BY h.time_of_day DESC
            LIMIT ?
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::new("glucose trend", err))
    }

    async fn recent_meals(&self, limit: i64) -> Result<Vec<MealEntry>, StoreError> {
        sqlx::query_as::<_, MealEntry>(
            r#"
            SELECT id, meal_type, food_item, portion_size, calories, carbs
            FROM diet
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::new("recent meals", err))
    }

    async fn recent_calories(&self, limit: i64) -> Result<Vec<f64>, StoreError> {
        sqlx::query_scalar::<_, f64>(
            r#"
            SELECT CAST(calories AS REAL)
            FROM diet
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::new("calorie trend", err))
    }

    async fn average_glucose(&self, username: &str) -> Result<Option<f64>, StoreError> {
        sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(h.blood_glucose_level)
            FROM healthinfo h
            JOIN users u ON h.user_id = u.id
            WHERE u.username = ?
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| StoreError::new("glucose summary", err))
    }

    async fn total_calories(&self) -> Result<Option<f64>, StoreError> {
        sqlx::query_scalar::<_, Option<f64>>("SELECT CAST(SUM(calories) AS REAL) FROM diet")
            .fetch_one(&self.pool)
            .await
            .map_err(|err| StoreError::new("calorie summary", err))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::Executor;

    const SCHEMA: &str = include_str!("../tests/fixtures/schema.sql");

    pub(crate) async fn seeded_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        pool.execute(SCHEMA).await.expect("schema");
        pool.execute(
            r#"
            INSERT INTO users (id, username, firstname, lastname) VALUES
                (1, 'ada', 'Ada', 'Lovelace'),
                (2, 'grace', NULL, NULL);
            INSERT INTO healthinfo (user_id, blood_glucose_level, time_of_day, activity_type, symptom_name) VALUES
                (1, 100, '2026-10-01 08:00:00', 'walking', NULL),
                (1, 120, '2026-10-03 08:00:00', NULL, 'fatigue'),
                (1, 110, '2026-10-02 08:00:00', NULL, NULL),
                (2, 180, '2026-10-04 08:00:00', 'running', NULL);
            INSERT INTO diet (meal_type, food_item, portion_size, calories, carbs) VALUES
                ('breakfast', 'Oats', '1 bowl', 300, 54),
                ('lunch', 'Salad', '1 plate', 450, 20),
                ('dinner', 'Rice', '2 cups', 600, 90);
            "#,
        )
        .await
        .expect("seed");
        pool
    }

    #[tokio::test]
    async fn recent_health_is_user_scoped_and_newest_first() {
        let store = SqlStore::new(seeded_pool().await);
        let rows = store.recent_health("ada", 5).await.unwrap();
        let levels: Vec<f64> = rows.iter().map(|r| r.blood_glucose_level).collect();
        assert_eq!(levels, vec![120.0, 110.0, 100.0]);
        assert_eq!(rows[0].symptom_name.as_deref(), Some("fatigue"));
        assert_eq!(rows[2].activity_type.as_deref(), Some("walking"));
    }

    #[tokio::test]
    async fn recent_health_honours_limit() {
        let store = SqlStore::new(seeded_pool().await);
        let rows = store.recent_health("ada", 2).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn glucose_history_reduces_timestamps_to_days() {
        let store = SqlStore::new(seeded_pool().await);
        let points = store.glucose_history("ada", 7).await.unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].day, chrono::NaiveDate::from_ymd_opt(2026, 10, 3).unwrap());
    }

    #[tokio::test]
    async fn average_glucose_is_absent_for_unknown_user() {
        let store = SqlStore::new(seeded_pool().await);
        assert_eq!(store.average_glucose("ada").await.unwrap(), Some(110.0));
        assert_eq!(store.average_glucose("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn meal_queries_read_the_whole_table() {
        let store = SqlStore::new(seeded_pool().await);
        let meals = store.recent_meals(5).await.unwrap();
        let ids: Vec<i64> = meals.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(store.recent_calories(7).await.unwrap(), vec![600.0, 450.0, 300.0]);
        assert_eq!(store.total_calories().await.unwrap(), Some(1350.0));
    }

    #[tokio::test]
    async fn total_calories_is_absent_for_empty_table() {
        let pool = seeded_pool().await;
        pool.execute("DELETE FROM diet").await.unwrap();
        let store = SqlStore::new(pool);
        assert_eq!(store.total_calories().await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_table_surfaces_as_store_error() {
        let pool = seeded_pool().await;
        pool.execute("DROP TABLE diet").await.unwrap();
        let store = SqlStore::new(pool);
        let err = store.recent_meals(5).await.unwrap_err();
        assert_eq!(err.section, "recent meals");
    }
}
