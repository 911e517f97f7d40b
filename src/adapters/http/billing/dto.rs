//! Request and response shapes for billing endpoints.

use serde::Serialize;

use crate::application::handlers::billing::BillingStatus;

/// Shown when no expiry is recorded.
const NO_EXPIRY: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingStatusResponse {
    pub username: String,
    pub plan: String,
    pub premium: bool,
    pub expires_at: String,
}

impl From<BillingStatus> for BillingStatusResponse {
    fn from(status: BillingStatus) -> Self {
        Self {
            username: status.username,
            plan: status.plan.as_str().to_string(),
            premium: status.premium,
            expires_at: status
                .expires_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| NO_EXPIRY.to_string()),
        }
    }
}

/// Hosted page the client should redirect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Plan;

    #[test]
    fn missing_expiry_reads_not_applicable() {
        let response = BillingStatusResponse::from(BillingStatus {
            username: "alice".to_string(),
            plan: Plan::Free,
            premium: false,
            expires_at: None,
        });
        assert_eq!(response.expires_at, "N/A");
        assert_eq!(response.plan, "FREE");
    }
}
