use async_trait::async_trait;
use chrono::NaiveDate;

use crate::database::manager::DatabaseError;
use crate::database::memory::MemoryRepository;
use crate::database::repository::{PgRepository, Repository};
use crate::entities::HelpRequest;

/// Help request lookups beyond plain CRUD
#[async_trait]
pub trait HelpRequestRepository: Repository<HelpRequest> {
    async fn find_all_by_requester(&self, requester_email: &str) -> Result<Vec<HelpRequest>, DatabaseError>;

    /// Requests whose `request_time` falls on the given calendar day
    async fn find_all_by_date(&self, date: NaiveDate) -> Result<Vec<HelpRequest>, DatabaseError>;
}

#[async_trait]
impl HelpRequestRepository for PgRepository<HelpRequest> {
    async fn find_all_by_requester(&self, requester_email: &str) -> Result<Vec<HelpRequest>, DatabaseError> {
        let sql = format!("{} WHERE requester_email = $1 ORDER BY id", self.select_sql());
        let rows = sqlx::query_as::<_, HelpRequest>(&sql)
            .bind(requester_email)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    async fn find_all_by_date(&self, date: NaiveDate) -> Result<Vec<HelpRequest>, DatabaseError> {
        let sql = format!("{} WHERE request_time::date = $1 ORDER BY id", self.select_sql());
        let rows = sqlx::query_as::<_, HelpRequest>(&sql)
            .bind(date)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl HelpRequestRepository for MemoryRepository<HelpRequest> {
    async fn find_all_by_requester(&self, requester_email: &str) -> Result<Vec<HelpRequest>, DatabaseError> {
        Ok(self.filter(|r| r.requester_email == requester_email).await)
    }

    async fn find_all_by_date(&self, date: NaiveDate) -> Result<Vec<HelpRequest>, DatabaseError> {
        Ok(self.filter(|r| r.request_time.date() == date).await)
    }
}
