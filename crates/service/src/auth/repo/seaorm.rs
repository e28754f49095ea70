use sea_orm::DatabaseConnection;

use crate::auth::domain::{NewUser, UserRecord};
use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl From<models::user::Model> for UserRecord {
    fn from(u: models::user::Model) -> Self {
        UserRecord { id: u.id, name: u.name, email: u.email, password_hash: u.password_hash }
    }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let found = models::user::find_by_email(&self.db, email).await?;
        Ok(found.map(UserRecord::from))
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, AuthError> {
        let created = models::user::create(&self.db, &user.name, &user.email, user.password_hash).await?;
        Ok(created.into())
    }
}
