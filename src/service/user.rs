use anyhow::Context;
use sqlx::PgPool;

use crate::{
    core::{
        error::{is_unique_violation, AppError},
        file_store::FileStore,
    },
    model::user::{User, UserFields},
    repository,
};

fn map_write_error(err: anyhow::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::email_conflict()
    } else {
        AppError::Internal(err)
    }
}

/// Rejects values wider than their `VARCHAR(limit)` column.
fn check_length(field: &str, value: Option<&str>, limit: usize) -> Result<(), AppError> {
    if value.is_some_and(|x| x.chars().count() > limit) {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, limit
        )));
    }
    Ok(())
}

pub fn validate_user_fields(fields: &UserFields) -> Result<(), AppError> {
    let email = fields.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if fields.first_name.trim().is_empty() {
        return Err(AppError::Validation("First name is required".to_string()));
    }
    if fields.last_name.trim().is_empty() {
        return Err(AppError::Validation("Last name is required".to_string()));
    }
    check_length("email", Some(&fields.email), 255)?;
    check_length("first_name", Some(&fields.first_name), 100)?;
    check_length("last_name", Some(&fields.last_name), 100)?;
    check_length("country", fields.country.as_deref(), 100)?;
    check_length("city", fields.city.as_deref(), 100)?;
    check_length("phone_number", fields.phone_number.as_deref(), 50)?;
    Ok(())
}

pub async fn get_user(db: &PgPool, id: i32) -> Result<User, AppError> {
    repository::user::get_user_by_id(db, id)
        .await
        .context("get_user_by_id")?
        .ok_or_else(AppError::user_not_found)
}

pub async fn create_user(db: &PgPool, fields: &UserFields) -> Result<User, AppError> {
    validate_user_fields(fields)?;
    repository::user::create_user(db, fields)
        .await
        .map_err(map_write_error)
}

pub async fn update_user(db: &PgPool, id: i32, fields: &UserFields) -> Result<User, AppError> {
    validate_user_fields(fields)?;
    repository::user::update_user(db, id, fields)
        .await
        .map_err(map_write_error)?
        .ok_or_else(AppError::user_not_found)
}

/// Deletes the row, then its picture. The file delete is best-effort and
/// never fails the operation.
pub async fn delete_user(
    db: &PgPool,
    file_store: &FileStore,
    id: i32,
) -> Result<Option<String>, AppError> {
    let profile_picture = repository::user::delete_user(db, id)
        .await
        .context("delete_user")?
        .ok_or_else(AppError::user_not_found)?;
    if let Some(path) = &profile_picture {
        file_store.delete(path).await;
    }
    Ok(profile_picture)
}

/// `None` both for a row without picture and for a missing row.
pub async fn get_user_profile_picture(db: &PgPool, id: i32) -> Result<Option<String>, AppError> {
    Ok(repository::user::get_user_profile_picture(db, id)
        .await
        .context("get_user_profile_picture")?)
}

async fn discard_upload(file_store: &FileStore, path: &str) {
    if !file_store.delete(path).await {
        tracing::warn!("could not clean up orphaned upload {}", path);
    }
}

/// Creates a user referencing `new_picture`, a file already written to the
/// store. If the insert fails the file is removed before the error is returned.
pub async fn create_user_with_picture(
    db: &PgPool,
    file_store: &FileStore,
    mut fields: UserFields,
    new_picture: Option<String>,
) -> Result<User, AppError> {
    fields.profile_picture = new_picture.clone();
    let res = create_user(db, &fields).await;
    if res.is_err() {
        if let Some(path) = &new_picture {
            discard_upload(file_store, path).await;
        }
    }
    res
}

/// Updates a user. With `new_picture` the row switches to the new file and
/// the previous file is deleted once the update succeeded; on failure the new
/// file is deleted instead. Without `new_picture` the current picture is kept.
pub async fn update_user_with_picture(
    db: &PgPool,
    file_store: &FileStore,
    id: i32,
    mut fields: UserFields,
    new_picture: Option<String>,
) -> Result<User, AppError> {
    fields.profile_picture = new_picture.clone();
    let res = match validate_user_fields(&fields) {
        Ok(()) => repository::user::update_user_replacing_picture(db, id, &fields)
            .await
            .map_err(map_write_error)
            .and_then(|x| x.ok_or_else(AppError::user_not_found)),
        Err(err) => Err(err),
    };
    let (user, previous_picture) = match res {
        Ok(val) => val,
        Err(err) => {
            if let Some(path) = &new_picture {
                discard_upload(file_store, path).await;
            }
            return Err(err);
        }
    };

    if let (Some(new_path), Some(old_path)) = (&new_picture, &previous_picture) {
        if new_path != old_path && user.profile_picture.as_ref() == Some(new_path) {
            file_store.delete(old_path).await;
        }
    }
    Ok(user)
}
