use std::time::{Duration, Instant};
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::state::AppState;
use crate::store::StoreResult;

// ============================================================================
// Health Check
// ============================================================================
//
// Each component reports a status; the overall status is the worst of them.
// Unhealthy answers 503, degraded still answers 200.
//
// ============================================================================

const SERVICE_NAME: &str = "qmanage";
const SLOW_PING: Duration = Duration::from_millis(500);

/// Health status of a component
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, HealthStatus::Unhealthy(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded(_) => "degraded",
            HealthStatus::Unhealthy(_) => "unhealthy",
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            HealthStatus::Healthy => None,
            HealthStatus::Degraded(msg) | HealthStatus::Unhealthy(msg) => Some(msg.as_str()),
        }
    }
}

/// Health information for a component
#[derive(Debug, Clone)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub last_check: DateTime<Utc>,
    pub details: Option<String>,
}

impl ComponentHealth {
    pub fn new(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
            last_check: Utc::now(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "status": self.status.label(),
            "reason": self.status.reason(),
            "details": self.details,
            "lastCheck": self.last_check,
        })
    }
}

pub fn compute_overall_status(components: &[ComponentHealth]) -> HealthStatus {
    let mut has_degraded = false;
    let mut unhealthy_components = Vec::new();

    for health in components {
        match &health.status {
            HealthStatus::Unhealthy(msg) => {
                unhealthy_components.push(format!("{}: {}", health.name, msg));
            }
            HealthStatus::Degraded(_) => {
                has_degraded = true;
            }
            HealthStatus::Healthy => {}
        }
    }

    if !unhealthy_components.is_empty() {
        HealthStatus::Unhealthy(unhealthy_components.join(", "))
    } else if has_degraded {
        HealthStatus::Degraded("Some components degraded".to_string())
    } else {
        HealthStatus::Healthy
    }
}

async fn check_store(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    let result = state.store.ping().await;
    let elapsed = start.elapsed();

    ComponentHealth::new("store", store_status(&result, elapsed))
        .with_details(format!("ping_ms={}", elapsed.as_millis()))
}

/// The error detail goes to the log only, never into the response body.
fn store_status(result: &StoreResult<()>, elapsed: Duration) -> HealthStatus {
    match result {
        Ok(()) if elapsed > SLOW_PING => HealthStatus::Degraded("Slow store ping".to_string()),
        Ok(()) => HealthStatus::Healthy,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            HealthStatus::Unhealthy("Store unreachable".to_string())
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_handler));
}

async fn health_handler(state: web::Data<AppState>) -> impl Responder {
    let components = vec![check_store(&state).await];
    let overall = compute_overall_status(&components);

    let body = json!({
        "status": overall.label(),
        "service": SERVICE_NAME,
        "components": components.iter().map(ComponentHealth::to_json).collect::<Vec<_>>(),
        "checkTime": Utc::now(),
    });

    if overall.is_unhealthy() {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use actix_web::App;
    use crate::metrics::Metrics;
    use crate::store::{MemoryStore, StoreError};

    #[test]
    fn test_overall_status_is_worst_component() {
        let components = vec![
            ComponentHealth::new("store", HealthStatus::Healthy),
            ComponentHealth::new("cache", HealthStatus::Degraded("slow".to_string())),
        ];
        assert_eq!(
            compute_overall_status(&components),
            HealthStatus::Degraded("Some components degraded".to_string())
        );

        let components = vec![
            ComponentHealth::new("store", HealthStatus::Unhealthy("down".to_string())),
            ComponentHealth::new("cache", HealthStatus::Degraded("slow".to_string())),
        ];
        assert_eq!(
            compute_overall_status(&components),
            HealthStatus::Unhealthy("store: down".to_string())
        );
    }

    #[test]
    fn test_no_components_is_healthy() {
        assert_eq!(compute_overall_status(&[]), HealthStatus::Healthy);
    }

    #[test]
    fn test_store_failure_detail_stays_out_of_reason() {
        let failed: StoreResult<()> = Err(StoreError::Corrupt("password=secret host=db.internal".to_string()));
        let status = store_status(&failed, Duration::from_millis(3));

        assert!(status.is_unhealthy());
        assert_eq!(status.reason(), Some("Store unreachable"));

        let slow = store_status(&Ok(()), SLOW_PING + Duration::from_millis(1));
        assert_eq!(slow.label(), "degraded");
        assert_eq!(store_status(&Ok(()), Duration::ZERO), HealthStatus::Healthy);
    }

    #[actix_web::test]
    async fn test_health_endpoint_reports_store() {
        let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(Metrics::new().unwrap()));
        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = actix_web::test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "qmanage");
        assert_eq!(body["components"][0]["name"], "store");
    }
}
