use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::StoreError;
use crate::entities::user;
use crate::validation::ValidationErrors;

const MAX_USERNAME_LEN: usize = 150;

/// Create a user account record.
///
/// # Errors
///
/// `Validation` for a blank or overlong username, `Conflict` if it is taken.
pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    name: &str,
    role: &str,
    now: DateTime<Utc>,
) -> Result<user::Model, StoreError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationErrors::single("username", "This field is required.").into());
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationErrors::single(
            "username",
            format!("Ensure this value has at most {MAX_USERNAME_LEN} characters."),
        )
        .into());
    }

    let user = user::ActiveModel {
        username: ActiveValue::Set(username.to_string()),
        name: ActiveValue::Set(name.to_string()),
        role: ActiveValue::Set(role.to_string()),
        created: ActiveValue::Set(now),
        modified: ActiveValue::Set(now),
        ..Default::default()
    };

    Ok(user.insert(db).await?)
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?)
}

/// Remove a user. Their comments stay with the author cleared; their IP records go.
///
/// # Errors
///
/// `NotFound` if no such user exists.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    let result = user::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(StoreError::NotFound("user"));
    }
    Ok(())
}
