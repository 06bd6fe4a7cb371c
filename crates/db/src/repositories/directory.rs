//! Staff directory lookups for notification routing.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::users;

/// Read-only directory of staff emails used by the notification flows.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    db: DatabaseConnection,
}

impl UserDirectory {
    /// Creates a new directory.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Emails of administrator users.
    pub async fn admin_emails(&self) -> Result<Vec<String>, DbErr> {
        self.emails(users::Column::IsAdmin).await
    }

    /// Emails of the warehouse logistics crew.
    pub async fn logistics_emails(&self) -> Result<Vec<String>, DbErr> {
        self.emails(users::Column::IsLogistics).await
    }

    /// Emails of the national delivery crew.
    pub async fn national_logistics_emails(&self) -> Result<Vec<String>, DbErr> {
        self.emails(users::Column::IsNationalLogistics).await
    }

    /// Email of a single user, if they exist.
    pub async fn email_of(&self, user_id: Uuid) -> Result<Option<String>, DbErr> {
        Ok(users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .map(|user| user.email))
    }

    async fn emails(&self, flag: users::Column) -> Result<Vec<String>, DbErr> {
        Ok(users::Entity::find()
            .filter(flag.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|user| user.email)
            .collect())
    }
}
