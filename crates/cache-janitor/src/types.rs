//! Response types for the cache janitor

use bounded_dir_cache::CleanupReport;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub size_mb: f64,
    pub max_size_mb: u64,
    pub auto_cleaner: bool,
}

/// Response for a manually triggered cleanup
#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub evicted: bool,
    pub report: CleanupReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            uptime_secs: 3600,
            size_mb: 12.5,
            max_size_mb: 2048,
            auto_cleaner: true,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("3600"));
        assert!(json.contains("12.5"));
        assert!(json.contains("\"auto_cleaner\":true"));
    }
}
