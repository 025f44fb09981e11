//! User database entity for SeaORM.

use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Id, User, UserType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Rehydrate the domain entity from a stored row (no re-validation)
impl From<Model> for User {
    fn from(model: Model) -> Self {
        // Unknown stored values degrade to the least privileged type.
        let user_type = UserType::from_str(&model.user_type).unwrap_or(UserType::Student);

        User::from_persistence(
            Id::from_uuid(model.id),
            &model.email,
            model.password_hash,
            &model.first_name,
            &model.last_name,
            user_type,
            model.avatar_url,
            model.is_active,
            model.created_at,
            model.updated_at,
        )
    }
}

/// Full row for a single insert
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(*user.id().as_uuid()),
            email: Set(user.email().to_string()),
            password_hash: Set(user.password_hash().to_string()),
            first_name: Set(user.first_name().to_string()),
            last_name: Set(user.last_name().to_string()),
            user_type: Set(user.user_type().as_str().to_string()),
            avatar_url: Set(user.avatar_url().map(str::to_string)),
            is_active: Set(user.is_active()),
            created_at: Set(user.created_at()),
            updated_at: Set(user.updated_at()),
        }
    }
}
