//! Low-stock notification service
//!
//! Per product the lifecycle is: no notification -> pending -> accepted or
//! rejected, with a configurable cool-down before the next one. The same
//! idempotent evaluation routine runs after stock-lowering mutations and
//! from the scheduled sweep; a partial unique index (one pending row per
//! product) backstops the race between the two.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::models::notification::{
    should_notify, ExistingNotification, Notification, NotificationStatus,
};

use crate::config::NotificationConfig;
use crate::error::{AppError, AppResult};
use crate::external::EmailClient;

/// Low-stock notification service
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
    settings: NotificationConfig,
    email: EmailClient,
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    product_id: Uuid,
    user_id: Uuid,
    provider_id: Option<Uuid>,
    status: String,
    created_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let status = NotificationStatus::parse(&row.status).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "unknown notification status {:?} for notification {}",
                row.status,
                row.id
            ))
        })?;
        Ok(Notification {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            provider_id: row.provider_id,
            status,
            created_at: row.created_at,
            responded_at: row.responded_at,
        })
    }
}

/// A product that qualifies for evaluation
#[derive(Debug, FromRow)]
struct LowProductRow {
    id: Uuid,
    name: String,
    quantity: i64,
    min_stock: i64,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool, settings: NotificationConfig, email: EmailClient) -> Self {
        Self {
            db,
            settings,
            email,
        }
    }

    fn cooldown(&self) -> Duration {
        Duration::hours(self.settings.cooldown_hours)
    }

    /// Evaluate one product; create a pending notification when its stock
    /// is at or below threshold and nothing suppresses it. Idempotent.
    pub async fn evaluate_product(&self, product_id: Uuid) -> AppResult<Option<Notification>> {
        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, LowProductRow>(
            r#"
            SELECT p.id, p.name, r.quantity, p.min_stock
            FROM products p
            JOIN stock_records r ON r.product_id = p.id
            WHERE p.id = $1 AND r.quantity <= p.min_stock
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let created = self.create_if_unsuppressed(&mut tx, &product).await?;
        tx.commit().await?;

        Ok(created)
    }

    /// Evaluate a batch of products (post-order hook)
    pub async fn evaluate_products(&self, product_ids: &[Uuid]) -> AppResult<u32> {
        let mut created = 0;
        for product_id in product_ids {
            if self.evaluate_product(*product_id).await?.is_some() {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Scheduled safety-net sweep over the whole catalog. Calls the same
    /// evaluation routine as the post-mutation trigger.
    pub async fn sweep(&self) -> AppResult<u32> {
        let low_products = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT p.id
            FROM products p
            JOIN stock_records r ON r.product_id = p.id
            WHERE r.quantity <= p.min_stock
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let created = self.evaluate_products(&low_products).await?;
        tracing::info!(
            candidates = low_products.len(),
            created,
            "low-stock sweep completed"
        );
        Ok(created)
    }

    async fn create_if_unsuppressed(
        &self,
        conn: &mut PgConnection,
        product: &LowProductRow,
    ) -> AppResult<Option<Notification>> {
        // Latest notification for the product decides suppression.
        let existing = sqlx::query_as::<_, (String, Option<DateTime<Utc>>)>(
            r#"
            SELECT status, responded_at
            FROM notifications
            WHERE product_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(product.id)
        .fetch_optional(&mut *conn)
        .await?;

        let existing = match existing {
            Some((status, responded_at)) => {
                let status = NotificationStatus::parse(&status).ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!("unknown notification status {:?}", status))
                })?;
                Some(ExistingNotification {
                    status,
                    responded_at,
                })
            }
            None => None,
        };

        if !should_notify(
            product.quantity,
            product.min_stock,
            existing,
            Utc::now(),
            self.cooldown(),
        ) {
            return Ok(None);
        }

        let Some(recipient_id) = self.resolve_recipient(conn).await? else {
            tracing::warn!(
                product = %product.name,
                "no resolvable recipient for low-stock notification, skipping"
            );
            return Ok(None);
        };

        // Primary-flagged supplier preferred, any linked supplier otherwise.
        let provider_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT provider_id
            FROM product_providers
            WHERE product_id = $1
            ORDER BY is_primary DESC
            LIMIT 1
            "#,
        )
        .bind(product.id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(provider_id) = provider_id else {
            tracing::warn!(
                product = %product.name,
                "product has no linked supplier, skipping low-stock notification"
            );
            return Ok(None);
        };

        // The partial unique index allows one pending row per product; a
        // concurrent sweep/trigger loses the race and sees no returned row.
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (product_id, user_id, provider_id, status)
            VALUES ($1, $2, $3, 'pending')
            ON CONFLICT (product_id) WHERE status = 'pending' DO NOTHING
            RETURNING id, product_id, user_id, provider_id, status, created_at, responded_at
            "#,
        )
        .bind(product.id)
        .bind(recipient_id)
        .bind(provider_id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => {
                tracing::info!(
                    product = %product.name,
                    quantity = product.quantity,
                    min_stock = product.min_stock,
                    "low-stock notification created"
                );
                Ok(Some(row.try_into()?))
            }
            None => Ok(None),
        }
    }

    /// Recipient fallback chain: owner role, admin role, configured default.
    async fn resolve_recipient(&self, conn: &mut PgConnection) -> AppResult<Option<Uuid>> {
        for role in [&self.settings.owner_role, &self.settings.admin_role] {
            let user = sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM users WHERE role = $1 ORDER BY created_at LIMIT 1",
            )
            .bind(role)
            .fetch_optional(&mut *conn)
            .await?;
            if user.is_some() {
                return Ok(user);
            }
        }

        if let Some(email) = &self.settings.fallback_user_email {
            let user = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&mut *conn)
                .await?;
            return Ok(user);
        }

        Ok(None)
    }

    /// Accept a pending notification: requires a supplier with a contact
    /// email, stamps the response, then dispatches the email collaborator.
    /// Dispatch failure is logged and does not undo the recorded response.
    pub async fn accept(&self, notification_id: Uuid) -> AppResult<Notification> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, product_id, user_id, provider_id, status, created_at, responded_at
            FROM notifications
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(notification_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification".to_string()))?;

        if row.status != "pending" {
            return Err(AppError::AlreadyProcessed(format!(
                "Notification is already {}",
                row.status
            )));
        }

        let provider_id = row.provider_id.ok_or_else(|| {
            AppError::MissingSupplier("Notification has no linked supplier".to_string())
        })?;

        let (supplier_name, supplier_email) = sqlx::query_as::<_, (String, Option<String>)>(
            "SELECT name, email FROM providers WHERE id = $1",
        )
        .bind(provider_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Provider".to_string()))?;

        let Some(supplier_email) = supplier_email else {
            return Err(AppError::MissingSupplier(format!(
                "Supplier '{}' has no contact email",
                supplier_name
            )));
        };

        let (product_name, quantity, min_stock) = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT p.name, r.quantity, p.min_stock
            FROM products p
            JOIN stock_records r ON r.product_id = p.id
            WHERE p.id = $1
            "#,
        )
        .bind(row.product_id)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET status = 'accepted', responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, product_id, user_id, provider_id, status, created_at, responded_at
            "#,
        )
        .bind(notification_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        // The response is recorded; delivery is a separate concern.
        if let Err(e) = self
            .email
            .send_low_stock(
                &supplier_email,
                &product_name,
                &supplier_name,
                quantity,
                min_stock,
            )
            .await
        {
            tracing::error!(
                notification = %notification_id,
                product = %product_name,
                "restock email dispatch failed: {}",
                e
            );
        }

        updated.try_into()
    }

    /// Reject a pending notification. No external side effect.
    pub async fn reject(&self, notification_id: Uuid) -> AppResult<Notification> {
        let updated = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET status = 'rejected', responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, product_id, user_id, provider_id, status, created_at, responded_at
            "#,
        )
        .bind(notification_id)
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(row) => row.try_into(),
            None => {
                let status = sqlx::query_scalar::<_, String>(
                    "SELECT status FROM notifications WHERE id = $1",
                )
                .bind(notification_id)
                .fetch_optional(&self.db)
                .await?;

                match status {
                    Some(status) => Err(AppError::AlreadyProcessed(format!(
                        "Notification is already {}",
                        status
                    ))),
                    None => Err(AppError::NotFound("Notification".to_string())),
                }
            }
        }
    }

    /// Notifications addressed to a user, pending first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, product_id, user_id, provider_id, status, created_at, responded_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY (status = 'pending') DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }
}
