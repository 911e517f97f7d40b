//! User account record.

use crate::domain::foundation::{Timestamp, UserId};

use super::Plan;

/// A registered account.
///
/// Tokens and the password hash are opaque strings produced by the
/// adapters; the record only tracks their lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub plan: Plan,
    pub subscription_expires_at: Option<Timestamp>,
    pub messaging_id: Option<String>,
    pub customer_id: Option<String>,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl User {
    /// The single authority on premium access.
    ///
    /// A PREMIUM plan without an expiry never lapses; one with an expiry
    /// lapses at that instant.
    pub fn is_premium(&self, now: Timestamp) -> bool {
        self.plan == Plan::Premium
            && self
                .subscription_expires_at
                .map_or(true, |expires| expires.is_after(&now))
    }

    /// Marks the email as verified and consumes the token.
    ///
    /// Returns false if the account was already verified.
    pub fn mark_verified(&mut self) -> bool {
        if self.verified {
            return false;
        }
        self.verified = true;
        self.verification_token = None;
        true
    }

    pub fn issue_verification_token(&mut self, token: String) {
        self.verification_token = Some(token);
    }

    pub fn issue_reset_token(&mut self, token: String, expires_at: Timestamp) {
        self.reset_token = Some(token);
        self.reset_token_expires_at = Some(expires_at);
    }

    /// True while the reset token has not passed its expiry.
    pub fn reset_token_usable(&self, now: Timestamp) -> bool {
        self.reset_token.is_some()
            && self
                .reset_token_expires_at
                .map_or(false, |expires| !expires.is_before(&now))
    }

    /// Replaces the password and consumes the reset token.
    pub fn complete_password_reset(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.reset_token = None;
        self.reset_token_expires_at = None;
    }

    pub fn link_messaging_account(&mut self, messaging_id: String) {
        self.messaging_id = Some(messaging_id);
    }

    /// Applies a plan transition.
    ///
    /// PREMIUM always resets the expiry to one calendar month after `now`,
    /// so repeated applications never stack. Any other plan clears it.
    /// An empty customer id leaves the stored one untouched.
    pub fn change_plan(&mut self, plan: Plan, customer_id: Option<&str>, now: Timestamp) {
        self.plan = plan;
        self.subscription_expires_at = match plan {
            Plan::Premium => Some(now.plus_months(1)),
            Plan::Free => None,
        };
        if let Some(customer) = customer_id.filter(|c| !c.is_empty()) {
            self.customer_id = Some(customer.to_string());
        }
    }
}

/// Data for inserting a fresh registration.
///
/// New accounts always start FREE and unverified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verification_token: String,
    pub created_at: Timestamp,
}

impl NewUser {
    /// Materializes the stored record once an id has been assigned.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            plan: Plan::Free,
            subscription_expires_at: None,
            messaging_id: None,
            customer_id: None,
            verified: false,
            verification_token: Some(self.verification_token),
            reset_token: None,
            reset_token_expires_at: None,
            created_at: self.created_at,
        }
    }
}
