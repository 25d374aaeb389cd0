use sqlx::PgPool;

use crate::{
    model::user::{User, UserFields},
    service,
};

pub async fn create_user(pool: &PgPool, fields: UserFields) -> anyhow::Result<User> {
    let user = service::user::create_user(pool, &fields).await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use crate::{cli::user::create_user, model::user::UserFields};

    #[sqlx::test]
    async fn test_create_user(pool: PgPool) -> anyhow::Result<()> {
        // When
        let fields = UserFields {
            email: "cli@example.com".to_string(),
            first_name: "Cli".to_string(),
            last_name: "User".to_string(),
            ..Default::default()
        };
        create_user(&pool, fields.clone()).await?;

        // Expect
        let db_res: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT email, first_name
            FROM public.users
            WHERE email = $1
            "#,
        )
        .bind(&fields.email)
        .fetch_optional(&pool)
        .await?;
        assert!(db_res.is_some());
        assert_eq!(db_res.unwrap().1, "Cli");

        // duplicate email surfaces as an error
        assert!(create_user(&pool, fields).await.is_err());
        Ok(())
    }
}
