//! Health report for the components held by `AppContext`

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Share of healthy components required for the whole app to count as healthy
pub const HEALTHY_THRESHOLD: f64 = 0.8;

/// Overall health of the application
///
/// # Example
/// ```
/// use skytrack_lib::utils::health::{ComponentHealth, HealthStatus};
///
/// let status = HealthStatus::from_components(vec![
///     ComponentHealth::healthy("document_store"),
///     ComponentHealth::unhealthy("identity", "provider not ready"),
/// ]);
///
/// assert_eq!(status.score, 0.5);
/// assert!(!status.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub is_healthy: bool,

    /// Fraction of healthy components, 1.0 when there are none
    pub score: f64,

    pub components: Vec<ComponentHealth>,

    /// Unix timestamp of the check
    pub timestamp: i64,
}

impl HealthStatus {
    pub fn from_components(components: Vec<ComponentHealth>) -> Self {
        let score = if components.is_empty() {
            1.0
        } else {
            let healthy = components.iter().filter(|c| c.is_healthy).count();
            healthy as f64 / components.len() as f64
        };

        Self {
            is_healthy: score >= HEALTHY_THRESHOLD,
            score,
            components,
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Look up a component by name
    pub fn component(&self, name: &str) -> Option<&ComponentHealth> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Health of a single component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component identifier (e.g. `"document_store"`, `"store_sync"`)
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
