//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use secrecy::SecretString;

use crate::application::handlers::auth::{
    ForgotPasswordHandler, LoginHandler, RegisterHandler, ResendVerificationHandler,
    ResetPasswordHandler, VerifyEmailHandler,
};
use crate::application::handlers::billing::{
    CheckoutUrls, CreateCheckoutSessionHandler, CreatePortalSessionHandler,
    GetBillingStatusHandler, HandlePaymentWebhookHandler,
};
use crate::application::handlers::books::{
    CheckFavoriteHandler, GetHistoryHandler, GetRankingHandler, ListAuthorsHandler,
    ListFavoritesHandler, ListGenresHandler, SearchWorksHandler, SuggestWorksHandler,
    ToggleFavoriteHandler, ViewWorkHandler,
};
use crate::application::handlers::line::{LinkAccountHandler, ReadWorkHandler};
use crate::config::{AppConfig, LimitsConfig, ValidationError};
use crate::domain::billing::{
    BillingWebhookDispatcher, IdempotentWebhookProcessor, StripeWebhookVerifier,
    SubscriptionBridge,
};
use crate::domain::entitlement::EntitlementEngine;
use crate::domain::favorites::FavoritesStore;
use crate::domain::history::ViewHistoryLedger;
use crate::domain::identity::UserContextResolver;
use crate::ports::{
    Clock, EmailSender, FavoriteRepository, PasswordHasher, PaymentProvider, TokenService,
    UserRepository, ViewHistoryRepository, WebhookEventRepository, WorkRepository,
};

/// Adapters chosen at startup.
#[derive(Clone)]
pub struct AppPorts {
    pub users: Arc<dyn UserRepository>,
    pub works: Arc<dyn WorkRepository>,
    pub views: Arc<dyn ViewHistoryRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordHasher>,
    pub email: Arc<dyn EmailSender>,
    pub payments: Arc<dyn PaymentProvider>,
    pub clock: Arc<dyn Clock>,
}

/// Tunables the HTTP layer needs, resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub daily_free_views: u64,
    pub dedup_window: chrono::Duration,
    pub day_boundary: FixedOffset,
    pub recent_history: usize,
    pub ranking_size: usize,
    pub search_page: usize,
    pub suggest_limit: usize,
    pub top_authors: usize,
    pub top_genres: usize,
    pub upsell_url: String,
    pub premium_price_id: String,
    pub frontend_url: String,
    pub reset_token_ttl: Duration,
    pub webhook_secret: SecretString,
    /// Allowed browser origins. Empty allows any.
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl AppSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ValidationError> {
        let limits = &config.limits;
        Ok(Self {
            daily_free_views: limits.daily_free_views,
            dedup_window: limits.dedup_window()?,
            day_boundary: limits.day_boundary()?,
            recent_history: limits.recent_history,
            ranking_size: limits.ranking_size,
            search_page: limits.search_page,
            suggest_limit: limits.suggest,
            top_authors: limits.top_authors,
            top_genres: limits.top_genres,
            upsell_url: limits.upsell_url.clone(),
            premium_price_id: config.payment.premium_price_id.clone(),
            frontend_url: config.payment.frontend_base().to_string(),
            reset_token_ttl: config.auth.reset_token_ttl(),
            webhook_secret: config.payment.stripe_webhook_secret.clone(),
            cors_origins: config.server.cors_origins_list(),
            request_timeout: config.server.request_timeout(),
        })
    }
}

impl Default for AppSettings {
    /// Limit defaults with placeholder billing values.
    fn default() -> Self {
        let limits = LimitsConfig::default();
        Self {
            daily_free_views: limits.daily_free_views,
            dedup_window: limits
                .dedup_window()
                .unwrap_or_else(|_| chrono::Duration::minutes(1)),
            day_boundary: limits.day_boundary().unwrap_or_else(|_| Utc.fix()),
            recent_history: limits.recent_history,
            ranking_size: limits.ranking_size,
            search_page: limits.search_page,
            suggest_limit: limits.suggest,
            top_authors: limits.top_authors,
            top_genres: limits.top_genres,
            upsell_url: limits.upsell_url,
            premium_price_id: "price_premium".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            reset_token_ttl: Duration::from_secs(3600),
            webhook_secret: SecretString::new("whsec_test".to_string()),
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Everything a request handler can reach.
///
/// Cloned per request; all fields are reference counted. Domain services
/// are built once here and shared, while application handlers are cheap
/// and created on demand.
#[derive(Clone)]
pub struct AppState {
    pub ports: AppPorts,
    pub settings: Arc<AppSettings>,
    pub resolver: Arc<UserContextResolver>,
    pub ledger: Arc<ViewHistoryLedger>,
    pub entitlement: Arc<EntitlementEngine>,
    pub favorites: Arc<FavoritesStore>,
    pub webhook_verifier: Arc<StripeWebhookVerifier>,
    pub webhook_processor: Arc<IdempotentWebhookProcessor>,
}

impl AppState {
    pub fn new(ports: AppPorts, settings: AppSettings) -> Self {
        let resolver = Arc::new(UserContextResolver::new(
            ports.tokens.clone(),
            ports.users.clone(),
            ports.clock.clone(),
        ));
        let ledger = Arc::new(ViewHistoryLedger::new(
            ports.views.clone(),
            ports.clock.clone(),
            settings.dedup_window,
            settings.day_boundary,
        ));
        let entitlement = Arc::new(EntitlementEngine::new(
            ports.works.clone(),
            ledger.clone(),
            settings.daily_free_views,
        ));
        let favorites = Arc::new(FavoritesStore::new(
            ports.favorites.clone(),
            ports.works.clone(),
            ports.clock.clone(),
        ));
        let bridge = Arc::new(SubscriptionBridge::new(ports.users.clone(), ports.clock.clone()));
        let webhook_processor = Arc::new(IdempotentWebhookProcessor::new(
            ports.webhook_events.clone(),
            Arc::new(BillingWebhookDispatcher::standard(ports.users.clone(), bridge)),
            ports.clock.clone(),
        ));
        let webhook_verifier = Arc::new(StripeWebhookVerifier::new(settings.webhook_secret.clone()));

        Self {
            ports,
            settings: Arc::new(settings),
            resolver,
            ledger,
            entitlement,
            favorites,
            webhook_verifier,
            webhook_processor,
        }
    }

    // ─── Books ───────────────────────────────────────────────────────

    pub fn view_work_handler(&self) -> ViewWorkHandler {
        ViewWorkHandler::new(self.entitlement.clone(), self.ledger.clone())
    }

    pub fn ranking_handler(&self) -> GetRankingHandler {
        GetRankingHandler::new(
            self.ledger.clone(),
            self.ports.works.clone(),
            self.settings.ranking_size,
        )
    }

    pub fn history_handler(&self) -> GetHistoryHandler {
        GetHistoryHandler::new(
            self.ledger.clone(),
            self.ports.works.clone(),
            self.settings.recent_history,
        )
    }

    pub fn check_favorite_handler(&self) -> CheckFavoriteHandler {
        CheckFavoriteHandler::new(self.favorites.clone())
    }

    pub fn toggle_favorite_handler(&self) -> ToggleFavoriteHandler {
        ToggleFavoriteHandler::new(self.favorites.clone())
    }

    pub fn list_favorites_handler(&self) -> ListFavoritesHandler {
        ListFavoritesHandler::new(self.favorites.clone())
    }

    pub fn search_handler(&self) -> SearchWorksHandler {
        SearchWorksHandler::new(self.ports.works.clone())
    }

    pub fn suggest_handler(&self) -> SuggestWorksHandler {
        SuggestWorksHandler::new(self.ports.works.clone(), self.settings.suggest_limit)
    }

    pub fn authors_handler(&self) -> ListAuthorsHandler {
        ListAuthorsHandler::new(self.ports.works.clone(), self.settings.top_authors)
    }

    pub fn genres_handler(&self) -> ListGenresHandler {
        ListGenresHandler::new(self.ports.works.clone(), self.settings.top_genres)
    }

    // ─── Billing ─────────────────────────────────────────────────────

    pub fn billing_status_handler(&self) -> GetBillingStatusHandler {
        GetBillingStatusHandler::new(self.ports.users.clone(), self.ports.clock.clone())
    }

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.ports.payments.clone(),
            CheckoutUrls {
                price_id: self.settings.premium_price_id.clone(),
                frontend_url: self.settings.frontend_url.clone(),
            },
        )
    }

    pub fn portal_handler(&self) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(self.ports.payments.clone(), self.settings.frontend_url.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.webhook_processor.clone(),
            self.ports.clock.clone(),
        )
    }

    // ─── Messaging bot ───────────────────────────────────────────────

    pub fn link_account_handler(&self) -> LinkAccountHandler {
        LinkAccountHandler::new(
            self.ports.users.clone(),
            self.ports.passwords.clone(),
            self.ports.clock.clone(),
        )
    }

    pub fn read_work_handler(&self) -> ReadWorkHandler {
        ReadWorkHandler::new(self.resolver.clone(), Arc::new(self.view_work_handler()))
    }

    // ─── Accounts ────────────────────────────────────────────────────

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(
            self.ports.users.clone(),
            self.ports.passwords.clone(),
            self.ports.tokens.clone(),
        )
    }

    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(
            self.ports.users.clone(),
            self.ports.passwords.clone(),
            self.ports.email.clone(),
            self.ports.clock.clone(),
        )
    }

    pub fn verify_email_handler(&self) -> VerifyEmailHandler {
        VerifyEmailHandler::new(self.ports.users.clone())
    }

    pub fn forgot_password_handler(&self) -> ForgotPasswordHandler {
        ForgotPasswordHandler::new(
            self.ports.users.clone(),
            self.ports.email.clone(),
            self.ports.clock.clone(),
            self.settings.reset_token_ttl,
        )
    }

    pub fn reset_password_handler(&self) -> ResetPasswordHandler {
        ResetPasswordHandler::new(
            self.ports.users.clone(),
            self.ports.passwords.clone(),
            self.ports.clock.clone(),
        )
    }

    pub fn resend_verification_handler(&self) -> ResendVerificationHandler {
        ResendVerificationHandler::new(self.ports.users.clone(), self.ports.email.clone())
    }
}
