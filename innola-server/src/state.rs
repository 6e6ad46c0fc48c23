//! Application state for the site service

use member_cert::MemberSecret;
use std::sync::Arc;

use crate::auth::PinBook;
use crate::auth::rate_limit::RateLimiter;
use crate::config::{Config, KvBackend};
use crate::email::{LogMailer, Mailer, ResendMailer};
use crate::kv::{
    CLOUDFLARE_API_BASE, CloudflareKvConfig, CloudflareKvStore, Documents, DocumentStore,
    MemoryStore, RedbStore,
};
use crate::seed::Seeds;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Typed access to the key-value documents
    pub docs: Documents,
    /// HMAC key for member QR signatures (unset disables membership endpoints)
    pub member_secret: Option<Arc<MemberSecret>>,
    /// Contact form and ticket notification delivery
    pub mailer: Arc<dyn Mailer>,
    /// Board bio PINs
    pub pins: Arc<PinBook>,
    /// Documents used when a key has never been written
    pub seeds: Arc<Seeds>,
    /// Rate limiter for login routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Assemble state from already-built services
    pub fn with_services(
        config: Config,
        store: Arc<dyn DocumentStore>,
        mailer: Arc<dyn Mailer>,
        seeds: Seeds,
    ) -> Result<Self, BoxError> {
        let member_secret = match &config.member_secret {
            Some(s) => Some(Arc::new(MemberSecret::new(s.as_bytes())?)),
            None => {
                tracing::warn!("MEMBER_SECRET not set, membership endpoints disabled");
                None
            }
        };

        Ok(Self {
            docs: Documents::new(store),
            member_secret,
            mailer,
            pins: Arc::new(PinBook::new(config.board_pins.clone())),
            seeds: Arc::new(seeds),
            rate_limiter: RateLimiter::new(config.login_rate_limit),
            config: Arc::new(config),
        })
    }

    /// Create a new AppState from configuration
    pub fn new(config: Config) -> Result<Self, BoxError> {
        let store: Arc<dyn DocumentStore> = match config.kv_backend {
            KvBackend::Memory => {
                tracing::warn!("Using in-memory KV store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
            KvBackend::Redb => {
                if let Some(parent) = config.kv_path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)?;
                }
                let store = RedbStore::open(&config.kv_path)?;
                tracing::info!(path = %config.kv_path.display(), "redb KV store opened");
                Arc::new(store)
            }
            KvBackend::Cloudflare => {
                let (Some(account_id), Some(api_token)) =
                    (config.cf_account_id.clone(), config.cf_api_token.clone())
                else {
                    return Err("CF_ACCOUNT_ID and CF_API_TOKEN are required".into());
                };
                for binding in crate::kv::Binding::ALL {
                    if !config.kv_namespaces.contains_key(&binding) {
                        tracing::warn!(binding = %binding, "KV namespace not configured, binding unbound");
                    }
                }
                Arc::new(CloudflareKvStore::new(CloudflareKvConfig {
                    account_id,
                    api_token,
                    namespaces: config.kv_namespaces.clone(),
                    api_base: CLOUDFLARE_API_BASE.to_string(),
                })?)
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.resend_api_key {
            Some(key) => Arc::new(ResendMailer::new(key.clone())?),
            None => {
                tracing::warn!("RESEND_API_KEY not set, outbound mail is logged only");
                Arc::new(LogMailer)
            }
        };

        let seeds = Seeds::load(&config)?;
        Self::with_services(config, store, mailer, seeds)
    }

    pub fn member_secret(&self) -> Option<&MemberSecret> {
        self.member_secret.as_deref()
    }
}
