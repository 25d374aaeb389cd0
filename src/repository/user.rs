use sqlx::{postgres::PgRow, FromRow, PgPool, Row};

use crate::model::user::{User, UserFields, COLUMNS, TABLE_NAME};

pub async fn get_user_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<User>> {
    let user: Option<User> =
        sqlx::query_as(format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, TABLE_NAME).as_str())
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(user)
}

pub async fn create_user(db: &PgPool, fields: &UserFields) -> anyhow::Result<User> {
    let user: User = sqlx::query_as(
        format!(
            r#"
        INSERT INTO {} (email, first_name, last_name, country, city, phone_number, profile_picture)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
            TABLE_NAME, COLUMNS
        )
        .as_str(),
    )
    .bind(&fields.email)
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(&fields.country)
    .bind(&fields.city)
    .bind(&fields.phone_number)
    .bind(&fields.profile_picture)
    .fetch_one(db)
    .await?;
    Ok(user)
}

/// Overwrites every mutable column in one statement. `None` when no row has `id`.
pub async fn update_user(
    db: &PgPool,
    id: i32,
    fields: &UserFields,
) -> anyhow::Result<Option<User>> {
    let user: Option<User> = sqlx::query_as(
        format!(
            r#"UPDATE {}
            SET email = $1, first_name = $2, last_name = $3, country = $4,
                city = $5, phone_number = $6, profile_picture = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {}"#,
            TABLE_NAME, COLUMNS
        )
        .as_str(),
    )
    .bind(&fields.email)
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(&fields.country)
    .bind(&fields.city)
    .bind(&fields.phone_number)
    .bind(&fields.profile_picture)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Like [`update_user`], but a `None` picture keeps the stored one. Also
/// returns the picture the row held before. The row is locked while that
/// value is read, so concurrent updates each see the picture they replaced.
pub async fn update_user_replacing_picture(
    db: &PgPool,
    id: i32,
    fields: &UserFields,
) -> anyhow::Result<Option<(User, Option<String>)>> {
    let returning = COLUMNS
        .split(',')
        .map(|x| format!("u.{}", x.trim()))
        .collect::<Vec<String>>()
        .join(", ");
    let row: Option<PgRow> = sqlx::query(
        format!(
            r#"WITH previous AS (
                SELECT id, profile_picture FROM {} WHERE id = $8 FOR UPDATE
            )
            UPDATE {} AS u
            SET email = $1, first_name = $2, last_name = $3, country = $4,
                city = $5, phone_number = $6,
                profile_picture = COALESCE($7, previous.profile_picture),
                updated_at = NOW()
            FROM previous
            WHERE u.id = previous.id
            RETURNING {}, previous.profile_picture AS previous_picture"#,
            TABLE_NAME, TABLE_NAME, returning
        )
        .as_str(),
    )
    .bind(&fields.email)
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(&fields.country)
    .bind(&fields.city)
    .bind(&fields.phone_number)
    .bind(&fields.profile_picture)
    .bind(id)
    .fetch_optional(db)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let user = User::from_row(&row)?;
    let previous_picture: Option<String> = row.try_get("previous_picture")?;
    Ok(Some((user, previous_picture)))
}

/// Deletes the row and hands back its `profile_picture`.
/// Outer `None` means no row matched.
pub async fn delete_user(db: &PgPool, id: i32) -> anyhow::Result<Option<Option<String>>> {
    let deleted: Option<(Option<String>,)> = sqlx::query_as(
        format!(
            "DELETE FROM {} WHERE id = $1 RETURNING profile_picture",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(deleted.map(|x| x.0))
}

pub async fn get_user_profile_picture(db: &PgPool, id: i32) -> anyhow::Result<Option<String>> {
    let res: Option<(Option<String>,)> = sqlx::query_as(
        format!("SELECT profile_picture FROM {} WHERE id = $1", TABLE_NAME).as_str(),
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(res.and_then(|x| x.0))
}

pub async fn get_all_profile_pictures(db: &PgPool) -> anyhow::Result<Vec<String>> {
    let res: Vec<(String,)> = sqlx::query_as(
        format!(
            "SELECT profile_picture FROM {} WHERE profile_picture IS NOT NULL",
            TABLE_NAME
        )
        .as_str(),
    )
    .fetch_all(db)
    .await?;
    Ok(res.into_iter().map(|x| x.0).collect())
}
