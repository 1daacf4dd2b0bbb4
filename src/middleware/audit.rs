use sqlx::PgPool;
use uuid::Uuid;

/// Record an audit event. Called explicitly by admin handlers after a
/// successful mutation; a failed write is logged and never fails the request.
pub async fn log_event(
    pool: &PgPool,
    actor_id: Uuid,
    action: &str,
    resource_type: &str,
    resource_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    if let Err(e) =
        crate::db::audit::log_event(pool, Some(actor_id), action, resource_type, resource_id, details)
            .await
    {
        tracing::error!("Failed to log audit event: {e}");
    }
}
