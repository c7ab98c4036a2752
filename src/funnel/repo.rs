use async_trait::async_trait;

use crate::db::{Database, PersistenceError};
use crate::funnel::repo_types::LevelCounts;

#[async_trait]
pub trait FunnelRepo: Send + Sync {
    /// `None` when no company has this exact name; zero counts when it has no assignments.
    async fn level_counts(&self, company_name: &str)
        -> Result<Option<LevelCounts>, PersistenceError>;
}

pub struct PgFunnelRepo {
    db: Database,
}

impl PgFunnelRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FunnelRepo for PgFunnelRepo {
    async fn level_counts(
        &self,
        company_name: &str,
    ) -> Result<Option<LevelCounts>, PersistenceError> {
        let mut session = self.db.acquire_session().await?;
        let counts = sqlx::query_as::<_, LevelCounts>(
            r#"
            SELECT
                COUNT(jpcl.job_position_id) FILTER (WHERE jp.level = 'C-Suite')  AS c_suite,
                COUNT(jpcl.job_position_id) FILTER (WHERE jp.level = 'VP')       AS vp,
                COUNT(jpcl.job_position_id) FILTER (WHERE jp.level = 'Director') AS director,
                COUNT(jpcl.job_position_id) FILTER (WHERE jp.level = 'Manager')  AS manager,
                COUNT(jpcl.job_position_id) FILTER (WHERE jp.level = 'Other')    AS other
            FROM companies c
            LEFT JOIN job_positions_company_location jpcl ON jpcl.company_id = c.id
            LEFT JOIN job_positions jp ON jp.id = jpcl.job_position_id
            WHERE c.company_name = $1
            GROUP BY c.id
            "#,
        )
        .bind(company_name)
        .fetch_optional(session.conn())
        .await?;
        session.commit().await?;
        Ok(counts)
    }
}
