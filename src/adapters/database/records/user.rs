use crate::core::user::User;
use time::PrimitiveDateTime;

/// Row of the `users` table. `name` and `email` are nullable columns; SQLite's `CURRENT_TIMESTAMP`
/// is UTC without an offset.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<PrimitiveDateTime>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            created_at: record.created_at.map(PrimitiveDateTime::assume_utc),
        }
    }
}
