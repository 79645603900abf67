//! Health check command for frontend monitoring

use crate::context::AppContext;
use crate::utils::health::HealthStatus;

/// Get application health status
///
/// # Example Response
/// ```json
/// {
///   "is_healthy": true,
///   "score": 1.0,
///   "components": [
///     { "name": "database", "is_healthy": true, "message": null },
///     { "name": "identity", "is_healthy": true, "message": null },
///     { "name": "store_sync", "is_healthy": true, "message": null }
///   ],
///   "timestamp": 1792224000
/// }
/// ```
pub async fn get_app_health(ctx: &AppContext) -> HealthStatus {
    ctx.health_check().await
}
