use std::{collections::HashSet, time::Duration};

use sqlx::PgPool;

use crate::{core::file_store::FileStore, repository};

/// A running server stores an upload before inserting the row that
/// references it. Files younger than this may still be waiting for that row.
pub const PRUNE_GRACE_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Deletes every stored upload that no row references and that is at least
/// `min_age` old. Returns how many files were removed.
pub async fn prune_orphans(
    pool: &PgPool,
    file_store: &FileStore,
    min_age: Duration,
) -> anyhow::Result<usize> {
    let pictures = repository::user::get_all_profile_pictures(pool).await?;
    let referenced: HashSet<&str> = pictures
        .iter()
        .filter_map(|x| FileStore::file_name_of(x))
        .collect();

    let mut removed = 0;
    for name in file_store.list().await? {
        if referenced.contains(name.as_str()) {
            continue;
        }
        let old_enough = file_store
            .modified_at(&name)
            .await
            .and_then(|x| x.elapsed().ok())
            .is_some_and(|age| age >= min_age);
        if !old_enough {
            tracing::debug!("keeping recent upload {}", name);
            continue;
        }
        if file_store.delete(&name).await {
            tracing::info!("pruned orphaned upload {}", name);
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use sqlx::PgPool;
    use tempfile::TempDir;

    use super::{prune_orphans, PRUNE_GRACE_PERIOD};
    use crate::{core::file_store::FileStore, factory::user::UserFactory, model::user::UserFields};

    #[sqlx::test]
    async fn test_prune_orphans(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());
        store.save("kept.png", b"kept").await?;
        store.save("orphan-1.png", b"orphan").await?;
        store.save("orphan-2.gif", b"orphan").await?;
        let mut factory = UserFactory::<()>::new();
        factory.modified_one(|data, _| UserFields {
            profile_picture: Some(FileStore::public_path("kept.png")),
            ..data.clone()
        });
        factory.generate_one(&pool, ()).await?;

        // When
        let removed = prune_orphans(&pool, &store, Duration::ZERO).await?;

        // Expect
        assert_eq!(removed, 2);
        assert_eq!(store.list().await?, vec!["kept.png"]);
        Ok(())
    }

    #[sqlx::test]
    async fn test_prune_orphans_empty_store(pool: PgPool) -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path().join("missing"));
        assert_eq!(prune_orphans(&pool, &store, PRUNE_GRACE_PERIOD).await?, 0);
        Ok(())
    }

    #[sqlx::test]
    async fn test_prune_orphans_keeps_recent_uploads(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let dir = TempDir::new()?;
        let store = FileStore::new(dir.path());
        store.save("stale.png", b"stale").await?;
        store.save("fresh.png", b"fresh").await?;
        let stale_path = store.root().join("stale.png");
        std::fs::File::options()
            .write(true)
            .open(stale_path)?
            .set_modified(SystemTime::now() - Duration::from_secs(60 * 60))?;

        // When
        let removed = prune_orphans(&pool, &store, PRUNE_GRACE_PERIOD).await?;

        // Expect
        assert_eq!(removed, 1);
        assert_eq!(store.list().await?, vec!["fresh.png"]);
        Ok(())
    }
}
