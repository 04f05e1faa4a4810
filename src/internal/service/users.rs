//! CRUD service for the `users` entity.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Deserialize;

use super::error::{ServiceError, ServiceResult};
use crate::internal::model::user;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: CreateUser) -> ServiceResult<user::Model> {
        let name = input.name.trim();
        let email = input.email.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("user name must not be empty".into()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        self.ensure_email_free(email, None).await?;

        let model = user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<user::Model> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    pub async fn list(&self, limit: Option<u64>) -> ServiceResult<Vec<user::Model>> {
        let mut query = user::Entity::find().order_by_asc(user::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(query.all(&self.db).await?)
    }

    pub async fn update(&self, id: i64, input: UpdateUser) -> ServiceResult<user::Model> {
        let current = self.get(id).await?;
        let mut active: user::ActiveModel = current.clone().into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::Validation("user name must not be empty".into()));
            }
            active.name = Set(name);
        }
        if let Some(email) = input.email {
            let email = email.trim().to_string();
            if email != current.email {
                self.ensure_email_free(&email, Some(id)).await?;
                active.email = Set(email);
            }
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("user", id));
        }
        Ok(())
    }

    /// Duplicate-email guard; `exclude` skips the record being updated.
    async fn ensure_email_free(&self, email: &str, exclude: Option<i64>) -> ServiceResult<()> {
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        match existing {
            Some(found) if Some(found.id) != exclude => {
                Err(ServiceError::DuplicateEmail(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}
