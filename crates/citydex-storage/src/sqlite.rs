use async_trait::async_trait;
use citydex_core::repository::{ReadRepository, Repository, Result};
use citydex_core::{City, CityId, CityUpdate, NewCity, StorageError};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../ddl/sqlite/cities.sql");

/// SQLite implementation of the repository contract.
///
/// A single `cities` table holds every record. Name search is a
/// case-insensitive `LIKE` substring match, which SQLite provides for ASCII.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new SQLite connection pool.
    ///
    /// The database file is created if it does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        info!(database_url, "connected to sqlite database");
        Ok(Self::new(pool))
    }

    /// Creates the `cities` table if it does not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("cities table ready");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_constraint_violation(err: &sqlx::Error) -> bool {
    err.as_database_error().is_some_and(|db| {
        matches!(
            db.kind(),
            ErrorKind::CheckViolation | ErrorKind::NotNullViolation | ErrorKind::UniqueViolation
        )
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    if is_constraint_violation(&err) {
        return StorageError::Constraint(message);
    }

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        sqlx::Error::Configuration(_) => StorageError::Operation(message),
        _ => StorageError::Query(message),
    }
}

/// Escapes `LIKE` wildcards so the pattern matches `name` literally.
fn escape_like(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn parse_rating(id: CityId, raw: Option<i64>) -> Result<Option<u8>> {
    raw.map(|value| {
        u8::try_from(value).map_err(|_| {
            StorageError::InvalidData(format!(
                "invalid tourist_rating {value} for city {id}"
            ))
        })
    })
    .transpose()
}

fn city_from_row(row: &SqliteRow) -> Result<City> {
    let id: CityId = row.try_get("id").map_err(map_sqlx_error)?;
    let rating_raw: Option<i64> = row.try_get("tourist_rating").map_err(map_sqlx_error)?;

    Ok(City {
        id,
        name: row.try_get("name").map_err(map_sqlx_error)?,
        state: row.try_get("state").map_err(map_sqlx_error)?,
        country: row.try_get("country").map_err(map_sqlx_error)?,
        tourist_rating: parse_rating(id, rating_raw)?,
        date_established: row.try_get("date_established").map_err(map_sqlx_error)?,
        estimated_population: row
            .try_get("estimated_population")
            .map_err(map_sqlx_error)?,
    })
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, id: CityId) -> Result<Option<City>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, state, country, tourist_rating, date_established, estimated_population
            FROM cities
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(city_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<City>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, state, country, tourist_rating, date_established, estimated_population
            FROM cities
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(city_from_row).collect()
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<City>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, state, country, tourist_rating, date_established, estimated_population
            FROM cities
            WHERE name LIKE '%' || ? || '%' ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(escape_like(name))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(city_from_row).collect()
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, city: NewCity) -> Result<CityId> {
        let result = sqlx::query(
            r#"
            INSERT INTO cities (name, state, country, tourist_rating, date_established, estimated_population)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(city.name)
        .bind(city.state)
        .bind(city.country)
        .bind(city.tourist_rating.map(i64::from))
        .bind(city.date_established)
        .bind(city.estimated_population)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: CityId, update: CityUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cities
            SET tourist_rating = ?, date_established = ?, estimated_population = ?
            WHERE id = ?
            "#,
        )
        .bind(update.tourist_rating.map(i64::from))
        .bind(update.date_established)
        .bind(update.estimated_population)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: CityId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
