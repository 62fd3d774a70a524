use std::sync::Arc;

use crate::auth::google::IdentityProvider;
use crate::auth::jwt::TokenIssuer;
use crate::auth::state_cookie::StateSigner;
use crate::config::Config;
use crate::resume::analyzer::ResumeAnalyzer;
use crate::users::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Profile storage. Default: `PgUserStore`.
    pub users: Arc<dyn UserStore>,
    /// Google OAuth client used by the login flow.
    pub identity: Arc<dyn IdentityProvider>,
    /// AI service behind the ATS score endpoint. Default: `LlmResumeAnalyzer`.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    pub tokens: TokenIssuer,
    pub state_signer: StateSigner,
}
