use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Health check shared by the REST server and the CLI `check-config` command.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is up.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "MediNext is alive".into(),
        }
    }
}
