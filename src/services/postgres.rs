use crate::models::{MatchResult, MenteeProfile, MentorProfile, MentorStats, MentorSummary, RankedMatch};
use crate::services::store::{ProfileStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

/// Held until commit; keyed on the mentee so unrelated refreshes never wait
const LOCK_MENTEE_MATCHES: &str = "SELECT pg_advisory_xact_lock(hashtext($1::text))";

/// PostgreSQL-backed profile store
///
/// Reads mentee and mentor profiles from the shared `users` table and owns
/// the `matches` table, which holds the advisory match records for each
/// mentee in ranked order.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl ProfileStore for PostgresClient {
    async fn get_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, StoreError> {
        let id = parse_id(mentee_id)?;

        let query = r#"
            SELECT id, industry_focus, startup_stage
            FROM users
            WHERE id = $1 AND role = 'mentee'
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Mentee {} not found", mentee_id)))?;

        Ok(mentee_from_row(&row))
    }

    async fn get_mentor(&self, mentor_id: &str) -> Result<MentorProfile, StoreError> {
        let id = parse_id(mentor_id)?;

        let query = r#"
            SELECT id, email, name, bio, expertise_areas, industry_focus
            FROM users
            WHERE id = $1 AND role = 'mentor'
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Mentor {} not found", mentor_id)))?;

        Ok(mentor_from_row(&row))
    }

    async fn list_active_mentors(&self) -> Result<Vec<MentorProfile>, StoreError> {
        let query = r#"
            SELECT id, email, name, bio, expertise_areas, industry_focus
            FROM users
            WHERE role = 'mentor' AND is_active = TRUE
            ORDER BY created_at ASC, id ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let mentors: Vec<MentorProfile> = rows.iter().map(mentor_from_row).collect();

        tracing::debug!("Loaded {} active mentors", mentors.len());

        Ok(mentors)
    }

    async fn list_active_mentees(&self) -> Result<Vec<MenteeProfile>, StoreError> {
        let query = r#"
            SELECT id, industry_focus, startup_stage
            FROM users
            WHERE role = 'mentee' AND is_active = TRUE
            ORDER BY created_at ASC, id ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(mentee_from_row).collect())
    }

    async fn get_ranked_matches(&self, mentee_id: &str) -> Result<Vec<RankedMatch>, StoreError> {
        let id = parse_id(mentee_id)?;

        let query = r#"
            SELECT
                m.match_score, m.reasoning,
                u.id, u.email, u.name, u.bio, u.expertise_areas, u.industry_focus,
                f.average_rating,
                COALESCE(s.completed_sessions, 0) AS completed_sessions
            FROM matches m
            JOIN users u ON u.id = m.mentor_id
            LEFT JOIN (
                SELECT mentor_id, AVG(rating)::FLOAT8 AS average_rating
                FROM mentor_feedback
                GROUP BY mentor_id
            ) f ON f.mentor_id = m.mentor_id
            LEFT JOIN (
                SELECT mentor_id, COUNT(*) AS completed_sessions
                FROM mentoring_sessions
                WHERE status = 'completed'
                GROUP BY mentor_id
            ) s ON s.mentor_id = m.mentor_id
            WHERE m.mentee_id = $1
            ORDER BY m.match_score DESC, m.rank_position ASC
        "#;

        let rows = sqlx::query(query).bind(id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                let score: i16 = row.get("match_score");
                let match_score = u8::try_from(score).map_err(|_| {
                    StoreError::InvalidInput(format!("Stored match score {} out of range", score))
                })?;

                let mentor = mentor_from_row(row);
                let stats = MentorStats {
                    average_rating: row.get("average_rating"),
                    completed_sessions: row.get("completed_sessions"),
                };

                Ok(RankedMatch {
                    mentor: MentorSummary::from_profile(&mentor, stats),
                    mentor_id: mentor.id,
                    match_score,
                    reasoning: row.get("reasoning"),
                })
            })
            .collect()
    }

    /// Delete and re-insert inside one transaction so readers never observe
    /// a partially refreshed set. A transaction-scoped advisory lock on the
    /// mentee serializes concurrent refreshes.
    async fn replace_matches(&self, mentee_id: &str, matches: &[MatchResult]) -> Result<(), StoreError> {
        let id = parse_id(mentee_id)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(LOCK_MENTEE_MATCHES)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM matches WHERE mentee_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let insert = r#"
            INSERT INTO matches (mentee_id, mentor_id, match_score, reasoning, rank_position, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (mentee_id, mentor_id) DO UPDATE SET
                match_score = EXCLUDED.match_score,
                reasoning = EXCLUDED.reasoning,
                rank_position = EXCLUDED.rank_position,
                generated_at = EXCLUDED.generated_at
        "#;

        for (position, m) in matches.iter().enumerate() {
            sqlx::query(insert)
                .bind(id)
                .bind(parse_id(&m.mentor_id)?)
                .bind(i16::from(m.score))
                .bind(&m.reasoning)
                .bind(position as i32)
                .bind(m.generated_at)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Stored {} matches for mentee {}", matches.len(), mentee_id);

        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidInput(format!("Invalid id: {}", id)))
}

fn mentee_from_row(row: &PgRow) -> MenteeProfile {
    MenteeProfile {
        id: row.get::<Uuid, _>("id").to_string(),
        industry_focus: row
            .get::<Option<Vec<String>>, _>("industry_focus")
            .unwrap_or_default(),
        startup_stage: row.get("startup_stage"),
    }
}

fn mentor_from_row(row: &PgRow) -> MentorProfile {
    MentorProfile {
        id: row.get::<Uuid, _>("id").to_string(),
        expertise_areas: row
            .get::<Option<Vec<String>>, _>("expertise_areas")
            .unwrap_or_default(),
        industry_focus: row
            .get::<Option<Vec<String>>, _>("industry_focus")
            .unwrap_or_default(),
        name: row.get("name"),
        email: row.get("email"),
        bio: row.get("bio"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert!(parse_id("5f8f7a4e-3c1b-4f6e-9a55-0d2c6b7e8f90").is_ok());
        assert!(matches!(parse_id("not-a-uuid"), Err(StoreError::InvalidInput(_))));
    }

    async fn connect() -> PostgresClient {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        PostgresClient::new(&url, 5, 1, Duration::from_secs(5), Duration::from_secs(60))
            .await
            .expect("Failed to connect to PostgreSQL")
    }

    async fn insert_user(client: &PostgresClient, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, role, industry_focus, expertise_areas) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(role)
            .bind(vec!["FinTech".to_string()])
            .bind(vec!["Fundraising".to_string()])
            .execute(&client.pool)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_concurrent_replace_for_same_mentee() {
        let client = connect().await;
        let mentee = insert_user(&client, "mentee").await.to_string();
        let mentor = insert_user(&client, "mentor").await.to_string();

        let matches = vec![MatchResult {
            mentee_id: mentee.clone(),
            mentor_id: mentor.clone(),
            score: 82,
            reasoning: "Strong fit".to_string(),
            generated_at: chrono::Utc::now(),
        }];

        let (first, second) = tokio::join!(
            client.replace_matches(&mentee, &matches),
            client.replace_matches(&mentee, &matches),
        );
        first.unwrap();
        second.unwrap();

        let stored = client.get_ranked_matches(&mentee).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].mentor_id, mentor);
        assert_eq!(stored[0].mentor.total_sessions, 0);
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_lookups_check_role() {
        let client = connect().await;
        let mentee = insert_user(&client, "mentee").await.to_string();
        let mentor = insert_user(&client, "mentor").await.to_string();

        assert!(client.get_mentee(&mentee).await.is_ok());
        assert!(client.get_mentor(&mentor).await.is_ok());
        assert!(matches!(client.get_mentee(&mentor).await, Err(StoreError::NotFound(_))));
        assert!(matches!(client.get_mentor(&mentee).await, Err(StoreError::NotFound(_))));
    }
}
