//! # Owner Repository
//!
//! The shop profile is a single row (`id = 1`, pinned by a CHECK constraint).
//! Every access first runs an `INSERT OR IGNORE`, so the row exists from the
//! first request on without a separate setup step.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kiosk_core::{OwnerProfile, TaxRate};

/// Partial update of the owner profile. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnerUpdate {
    pub shop_name: Option<String>,
    pub phone: Option<String>,
    pub gst_number: Option<String>,
    pub default_gst_rate: Option<TaxRate>,
    pub upi_vpa: Option<String>,
}

/// Creates the owner row with the given default rate if it is missing.
pub(crate) async fn ensure_owner_row(
    conn: &mut SqliteConnection,
    default_rate: TaxRate,
) -> DbResult<()> {
    sqlx::query("INSERT OR IGNORE INTO owner (id, default_gst_rate_bps) VALUES (1, ?1)")
        .bind(default_rate.bps())
        .execute(conn)
        .await?;
    Ok(())
}

/// Reads the owner profile. The row must exist.
pub(crate) async fn fetch_owner(conn: &mut SqliteConnection) -> DbResult<OwnerProfile> {
    let owner = sqlx::query_as::<_, OwnerProfile>(
        r#"
        SELECT shop_name, phone, gst_number, default_gst_rate_bps, upi_vpa
        FROM owner
        WHERE id = 1
        "#,
    )
    .fetch_one(conn)
    .await?;
    Ok(owner)
}

/// Repository for the owner profile.
#[derive(Debug, Clone)]
pub struct OwnerRepository {
    pool: SqlitePool,
}

impl OwnerRepository {
    /// Creates a new OwnerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OwnerRepository { pool }
    }

    /// Creates the profile row if missing. Safe to call on every startup.
    pub async fn ensure(&self, default_rate: TaxRate) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        ensure_owner_row(&mut conn, default_rate).await
    }

    /// Returns the owner profile, creating it with `default_rate` if needed.
    pub async fn get(&self, default_rate: TaxRate) -> DbResult<OwnerProfile> {
        let mut conn = self.pool.acquire().await?;
        ensure_owner_row(&mut conn, default_rate).await?;
        fetch_owner(&mut conn).await
    }

    /// Overwrites only the supplied fields and returns the updated profile.
    pub async fn update(&self, update: &OwnerUpdate, default_rate: TaxRate) -> DbResult<OwnerProfile> {
        debug!(?update, "Updating owner profile");

        let mut tx = self.pool.begin().await?;
        ensure_owner_row(&mut tx, default_rate).await?;

        sqlx::query(
            r#"
            UPDATE owner SET
                shop_name = COALESCE(?1, shop_name),
                phone = COALESCE(?2, phone),
                gst_number = COALESCE(?3, gst_number),
                default_gst_rate_bps = COALESCE(?4, default_gst_rate_bps),
                upi_vpa = COALESCE(?5, upi_vpa)
            WHERE id = 1
            "#,
        )
        .bind(update.shop_name.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.gst_number.as_deref())
        .bind(update.default_gst_rate.map(|r| r.bps()))
        .bind(update.upi_vpa.as_deref())
        .execute(&mut *tx)
        .await?;

        let owner = fetch_owner(&mut tx).await?;
        tx.commit().await?;

        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    use super::*;

    const DEFAULT_RATE: TaxRate = TaxRate::from_bps(1800);

    #[tokio::test]
    async fn test_get_creates_profile_lazily() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let owner = db.owner().get(DEFAULT_RATE).await.unwrap();

        assert_eq!(owner.shop_name, "My Shop");
        assert_eq!(owner.default_gst_rate(), DEFAULT_RATE);
        assert_eq!(owner.upi_vpa, "");

        // A different configured default does not overwrite the existing row
        let again = db.owner().get(TaxRate::from_bps(500)).await.unwrap();
        assert_eq!(again.default_gst_rate(), DEFAULT_RATE);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.owner().ensure(DEFAULT_RATE).await.unwrap();

        let update = OwnerUpdate {
            shop_name: Some("Sharma Kirana".to_string()),
            upi_vpa: Some("sharma@upi".to_string()),
            ..Default::default()
        };
        let owner = db.owner().update(&update, DEFAULT_RATE).await.unwrap();
        assert_eq!(owner.shop_name, "Sharma Kirana");
        assert_eq!(owner.upi_vpa, "sharma@upi");
        assert_eq!(owner.default_gst_rate(), DEFAULT_RATE);

        let update = OwnerUpdate {
            default_gst_rate: Some(TaxRate::from_bps(1200)),
            ..Default::default()
        };
        let owner = db.owner().update(&update, DEFAULT_RATE).await.unwrap();
        assert_eq!(owner.default_gst_rate_bps, 1200);
        assert_eq!(owner.shop_name, "Sharma Kirana");
    }
}
