//! PostgreSQL storage adapter implementation

pub mod config;

pub use config::{ConfigError, PoolConfig, PostgresConfig};

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use acara_core::error::{AcaraError, Result};
use acara_core::models::{
    Category, CategoryId, Event, EventDetail, EventId, EventRecord, GeoPoint, NewEvent,
    OrganizerId, PlaceId, Status, SubmissionId, SubmittedEvent,
};
use acara_core::ports::EventStore;

/// PostgreSQL implementation of [`EventStore`].
///
/// The dual writes the port requires to be atomic run inside database
/// transactions; any failure rolls the whole unit back and surfaces as a
/// retryable `Persistence` error.
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Create a new PostgreSQL store with the given configuration
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| AcaraError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| AcaraError::Persistence(format!("Failed to connect to database: {}", e)))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| AcaraError::Persistence(format!("Connection test failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store and run migrations
    pub async fn with_migrations(config: PostgresConfig) -> Result<Self> {
        let store = Self::new(config).await?;
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AcaraError::Persistence(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AcaraError::Persistence(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> AcaraError {
    AcaraError::Persistence(e.to_string())
}

fn status_from_row(row: &PgRow, column: &str) -> Result<Status> {
    let raw: String = row.try_get(column).map_err(db_err)?;
    Status::parse(&raw)
        .ok_or_else(|| AcaraError::Persistence(format!("unknown status '{}' in database", raw)))
}

fn event_from_row(row: &PgRow) -> Result<Event> {
    Ok(Event {
        id: EventId(row.try_get("id").map_err(db_err)?),
        name: row.try_get("name").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        content: row.try_get("content").map_err(db_err)?,
        start_date: row.try_get("start_date").map_err(db_err)?,
        end_date: row.try_get("end_date").map_err(db_err)?,
        location: row.try_get("location").map_err(db_err)?,
        position: GeoPoint {
            lat: row.try_get("lat").map_err(db_err)?,
            lng: row.try_get("lng").map_err(db_err)?,
        },
        photo: row.try_get("photo").map_err(db_err)?,
        link: row.try_get("link").map_err(db_err)?,
        popular_place_id: row
            .try_get::<Option<i64>, _>("popular_place_id")
            .map_err(db_err)?
            .map(PlaceId),
        organizer_id: OrganizerId(row.try_get("organizer_id").map_err(db_err)?),
        category_id: CategoryId(row.try_get("category_id").map_err(db_err)?),
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

const EVENT_COLUMNS: &str = "e.id, e.name, e.description, e.content, e.start_date, e.end_date, \
     e.location, e.lat, e.lng, e.photo, e.link, e.popular_place_id, e.organizer_id, \
     e.category_id, e.created_at";

/// Join fetching each event's most recent submission row.
const CURRENT_STATUS_JOIN: &str = "JOIN LATERAL (\
     SELECT status FROM submitted_events \
     WHERE event_id = e.id \
     ORDER BY created_at DESC, id DESC LIMIT 1\
     ) se ON TRUE";

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn create_event(&self, event: &NewEvent) -> Result<EventId> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events
                (name, description, content, start_date, end_date, location,
                 lat, lng, photo, link, popular_place_id, organizer_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.content)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.location)
        .bind(event.position.lat)
        .bind(event.position.lng)
        .bind(&event.photo)
        .bind(&event.link)
        .bind(event.popular_place_id.map(|p| p.0))
        .bind(event.organizer_id.0)
        .bind(event.category_id.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query("INSERT INTO submitted_events (event_id, status) VALUES ($1, 'waiting')")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(EventId(id))
    }

    async fn get_event(&self, id: EventId) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {} FROM events e WHERE e.id = $1", EVENT_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn get_event_detail(&self, id: EventId) -> Result<Option<EventDetail>> {
        let query = format!(
            "SELECT {}, c.name AS category_name, o.name AS organizer_name, se.status \
             FROM events e \
             JOIN categories c ON c.id = e.category_id \
             JOIN organizers o ON o.id = e.organizer_id \
             {} \
             WHERE e.id = $1",
            EVENT_COLUMNS, CURRENT_STATUS_JOIN
        );

        let row = sqlx::query(&query).bind(id.0).fetch_optional(&self.pool).await.map_err(db_err)?;

        row.as_ref()
            .map(|row| {
                Ok(EventDetail {
                    event: event_from_row(row)?,
                    category_name: row.try_get("category_name").map_err(db_err)?,
                    organizer_name: row.try_get("organizer_name").map_err(db_err)?,
                    status: status_from_row(row, "status")?,
                })
            })
            .transpose()
    }

    async fn list_verified(&self) -> Result<Vec<EventRecord>> {
        let query = format!(
            "SELECT {}, c.name AS category_name, se.status \
             FROM events e \
             JOIN categories c ON c.id = e.category_id \
             {} \
             WHERE se.status = 'verified' \
             ORDER BY e.id",
            EVENT_COLUMNS, CURRENT_STATUS_JOIN
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await.map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(EventRecord {
                    event: event_from_row(row)?,
                    category_name: row.try_get("category_name").map_err(db_err)?,
                    status: status_from_row(row, "status")?,
                })
            })
            .collect()
    }

    async fn list_by_organizer(&self, organizer_id: OrganizerId) -> Result<Vec<EventRecord>> {
        let query = format!(
            "SELECT {}, c.name AS category_name, se.status \
             FROM events e \
             JOIN categories c ON c.id = e.category_id \
             {} \
             WHERE e.organizer_id = $1 \
             ORDER BY e.id",
            EVENT_COLUMNS, CURRENT_STATUS_JOIN
        );

        let rows =
            sqlx::query(&query).bind(organizer_id.0).fetch_all(&self.pool).await.map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(EventRecord {
                    event: event_from_row(row)?,
                    category_name: row.try_get("category_name").map_err(db_err)?,
                    status: status_from_row(row, "status")?,
                })
            })
            .collect()
    }

    async fn append_submission(
        &self,
        event_id: EventId,
        status: Status,
        reason: Option<String>,
    ) -> Result<SubmissionId> {
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO submitted_events (event_id, status, reason) \
             SELECT $1, $2, $3 WHERE EXISTS (SELECT 1 FROM events WHERE id = $1) \
             RETURNING id",
        )
        .bind(event_id.0)
        .bind(status.as_str())
        .bind(&reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        id.map(SubmissionId).ok_or(AcaraError::NotFound { event_id })
    }

    async fn current_status(&self, event_id: EventId) -> Result<Option<Status>> {
        let raw: Option<String> = sqlx::query_scalar(
            "SELECT status FROM submitted_events \
             WHERE event_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(event_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        raw.map(|s| {
            Status::parse(&s).ok_or_else(|| {
                AcaraError::Persistence(format!("unknown status '{}' in database", s))
            })
        })
        .transpose()
    }

    async fn submission_history(&self, event_id: EventId) -> Result<Vec<SubmittedEvent>> {
        let rows = sqlx::query(
            "SELECT id, event_id, status, reason, created_at FROM submitted_events \
             WHERE event_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(event_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(SubmittedEvent {
                    id: SubmissionId(row.try_get("id").map_err(db_err)?),
                    event_id: EventId(row.try_get("event_id").map_err(db_err)?),
                    status: status_from_row(row, "status")?,
                    reason: row.try_get("reason").map_err(db_err)?,
                    created_at: row.try_get("created_at").map_err(db_err)?,
                })
            })
            .collect()
    }

    async fn delete_event(&self, event_id: EventId) -> Result<()> {
        // Submission rows go with the event via ON DELETE CASCADE, so this
        // single statement is the whole atomic unit.
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id.0)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AcaraError::NotFound { event_id });
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(Category {
                    id: CategoryId(row.try_get("id").map_err(db_err)?),
                    name: row.try_get("name").map_err(db_err)?,
                })
            })
            .collect()
    }
}
