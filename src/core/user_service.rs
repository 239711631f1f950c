use crate::adapters::database::user_repo::UserRepository;
use crate::core::user::User;
use crate::error::{AppError, Result};
use opentelemetry::{global, metrics::Counter};

#[derive(Clone, Debug)]
struct UserMetrics {
    users_created_total: Counter<u64>,
    users_deleted_total: Counter<u64>,
}

impl UserMetrics {
    fn new() -> Self {
        let meter = global::meter("userdesk-server");
        Self {
            users_created_total: meter
                .u64_counter("users_created_total")
                .with_description("Total number of users created")
                .build(),
            users_deleted_total: meter
                .u64_counter("users_deleted_total")
                .with_description("Total number of users deleted")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserService {
    repo: UserRepository,
    metrics: UserMetrics,
}

impl UserService {
    #[must_use]
    pub fn new(repo: UserRepository) -> Self {
        Self { repo, metrics: UserMetrics::new() }
    }

    /// # Errors
    /// Returns `AppError::Database` if the store cannot be read.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }

    /// Creates a user and returns its id.
    ///
    /// # Errors
    /// Returns `AppError::Conflict` if the email is already registered.
    #[tracing::instrument(skip(self, name, email), fields(user.id = tracing::field::Empty), err(level = "warn"))]
    pub async fn create_user(&self, name: &str, email: &str) -> Result<i64> {
        let id = self.repo.create(name, email).await.map_err(email_conflict)?;

        tracing::Span::current().record("user.id", id);
        tracing::info!("User created");
        self.metrics.users_created_total.add(1, &[]);

        Ok(id)
    }

    /// # Errors
    /// Returns `AppError::Database` if the store cannot be read.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.repo.find_by_id(id).await
    }

    /// Overwrites a user's name and email. Updating an unknown id is a no-op.
    ///
    /// # Errors
    /// Returns `AppError::Conflict` if the new email belongs to another user.
    #[tracing::instrument(skip(self, name, email), err(level = "warn"))]
    pub async fn update_user(&self, id: i64, name: &str, email: &str) -> Result<()> {
        let matched = self.repo.update(id, name, email).await.map_err(email_conflict)?;
        if matched {
            tracing::info!("User updated");
        } else {
            tracing::debug!("Update matched no user");
        }
        Ok(())
    }

    /// Deletes a user. Deleting an unknown id is a no-op.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the delete fails.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        if self.repo.delete(id).await? {
            tracing::info!("User deleted");
            self.metrics.users_deleted_total.add(1, &[]);
        } else {
            tracing::debug!("Delete matched no user");
        }
        Ok(())
    }
}

fn email_conflict(e: AppError) -> AppError {
    if let AppError::Database(sqlx::Error::Database(db_err)) = &e
        && db_err.is_unique_violation()
    {
        return AppError::Conflict("Email already exists".into());
    }
    e
}
