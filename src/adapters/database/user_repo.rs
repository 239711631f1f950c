use crate::adapters::database::DbPool;
use crate::adapters::database::records::UserRecord;
use crate::core::user::User;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Returns every user in storage order.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            r"
            SELECT id, name, email, created_at
            FROM users
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Inserts a user and returns the id assigned by the store.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the insert fails, including when `email` is already taken.
    pub async fn create(&self, name: &str, email: &str) -> Result<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO users (name, email)
            VALUES (?, ?)
            ",
        )
        .bind(name)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            SELECT id, name, email, created_at
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Overwrites `name` and `email`. Returns `false` when no row has this id.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the update fails, including when `email` belongs to another user.
    pub async fn update(&self, id: i64, name: &str, email: &str) -> Result<bool> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET name = ?, email = ?
            WHERE id = ?
            ",
        )
        .bind(name)
        .bind(email)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-deletes a user. Returns `false` when no row has this id.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the delete fails.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?").bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::init_store;
    use crate::config::DatabaseConfig;
    use crate::error::AppError;
    use tempfile::TempDir;

    async fn setup() -> (UserRepository, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config =
            DatabaseConfig { path: dir.path().join("users.sqlite"), max_connections: 1, busy_timeout_ms: 1000 };
        let pool = init_store(&config).await.unwrap();
        (UserRepository::new(pool), dir)
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let (repo, _dir) = setup().await;

        let id = repo.create("Ann", "ann@x.com").await.unwrap();
        let user = repo.find_by_id(id).await.unwrap().unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.name.as_deref(), Some("Ann"));
        assert_eq!(user.email.as_deref(), Some("ann@x.com"));
        assert!(user.created_at.is_some());
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let (repo, _dir) = setup().await;

        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_empty_then_populated() {
        let (repo, _dir) = setup().await;
        assert!(repo.list().await.unwrap().is_empty());

        repo.create("Ann", "ann@x.com").await.unwrap();
        repo.create("Bob", "bob@x.com").await.unwrap();
        repo.create("Cid", "cid@x.com").await.unwrap();

        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let (repo, _dir) = setup().await;
        repo.create("Ann", "ann@x.com").await.unwrap();

        let err = repo.create("Other Ann", "ann@x.com").await.unwrap_err();

        match err {
            AppError::Database(sqlx::Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_keeps_created_at() {
        let (repo, _dir) = setup().await;
        let id = repo.create("Ann", "ann@x.com").await.unwrap();
        let before = repo.find_by_id(id).await.unwrap().unwrap();

        assert!(repo.update(id, "Anne", "anne@x.com").await.unwrap());

        let after = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(after.name.as_deref(), Some("Anne"));
        assert_eq!(after.email.as_deref(), Some("anne@x.com"));
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_noops() {
        let (repo, _dir) = setup().await;

        assert!(!repo.update(7, "Nobody", "nobody@x.com").await.unwrap());
        assert!(!repo.delete(7).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (repo, _dir) = setup().await;
        let id = repo.create("Ann", "ann@x.com").await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_values_are_bound_not_interpolated() {
        let (repo, _dir) = setup().await;
        let hostile = "x'); DROP TABLE users; --";

        let id = repo.create(hostile, "evil@x.com").await.unwrap();

        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some(hostile));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_null_columns_decode_as_none() {
        let (repo, _dir) = setup().await;
        let id: i64 = sqlx::query_scalar("INSERT INTO users (name, email) VALUES (NULL, NULL) RETURNING id")
            .fetch_one(&repo.pool)
            .await
            .unwrap();

        let user = repo.find_by_id(id).await.unwrap().unwrap();

        assert_eq!(user.name, None);
        assert_eq!(user.email, None);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
