use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, Postgres},
    query::QueryAs,
    PgPool,
};
use std::marker::PhantomData;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::entities::Resource;

/// A `query_as` statement bound against Postgres
pub type PgQueryAs<'q, T> = QueryAs<'q, Postgres, T, PgArguments>;

/// Persistence gateway for one entity type
#[async_trait]
pub trait Repository<T: Resource>: Send + Sync {
    /// Every stored record, in the store's own order
    async fn find_all(&self) -> Result<Vec<T>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError>;

    /// Insert when `entity.id()` is 0, otherwise overwrite the stored row.
    /// Returns the record as stored.
    async fn save(&self, entity: T) -> Result<T, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Postgres-backed repository. Statements are generated from the entity's
/// column list; every value is bound as a parameter.
pub struct PgRepository<T> {
    table_name: String,
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T: Resource> PgRepository<T> {
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn table(&self) -> String {
        DatabaseManager::quote_identifier(&self.table_name)
    }

    fn returning() -> String {
        format!("id, {}", T::COLUMNS.join(", "))
    }

    pub(crate) fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", Self::returning(), self.table())
    }

    fn select_by_id_sql(&self) -> String {
        format!("{} WHERE id = $1", self.select_sql())
    }

    fn insert_sql(&self) -> String {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table(),
            T::COLUMNS.join(", "),
            placeholders.join(", "),
            Self::returning()
        )
    }

    fn update_sql(&self) -> String {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            self.table(),
            assignments.join(", "),
            T::COLUMNS.len() + 1,
            Self::returning()
        )
    }

    fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE id = $1", self.table())
    }
}

#[async_trait]
impl<T: Resource> Repository<T> for PgRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("{} ORDER BY id", self.select_sql());
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = self.select_by_id_sql();
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: T) -> Result<T, DatabaseError> {
        let saved = if entity.id() == 0 {
            let sql = self.insert_sql();
            entity
                .bind_columns(sqlx::query_as::<_, T>(&sql))
                .fetch_one(&self.pool)
                .await?
        } else {
            let sql = self.update_sql();
            entity
                .bind_columns(sqlx::query_as::<_, T>(&sql))
                .bind(entity.id())
                .fetch_optional(&self.pool)
                .await?
                .ok_or(DatabaseError::NotFound {
                    entity: T::NAME,
                    id: entity.id(),
                })?
        };
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = self.delete_sql();
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
