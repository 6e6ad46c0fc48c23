//! Site server configuration

use crate::kv::Binding;
use std::collections::HashMap;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Minimum HMAC key length outside development
pub const MIN_MEMBER_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvBackend {
    Memory,
    Redb,
    Cloudflare,
}

impl KvBackend {
    fn parse(value: &str) -> Result<Self, BoxError> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redb" => Ok(Self::Redb),
            "cloudflare" => Ok(Self::Cloudflare),
            other => Err(format!("Unknown KV_BACKEND: {other}").into()),
        }
    }
}

/// Admin portal account seeded into `admin_users` on first login
#[derive(Clone)]
pub struct BootstrapUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl std::fmt::Debug for BootstrapUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapUser")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Site server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    pub http_port: u16,
    pub kv_backend: KvBackend,
    /// redb file (KV_BACKEND=redb)
    pub kv_path: PathBuf,
    /// Cloudflare credentials (KV_BACKEND=cloudflare)
    pub cf_account_id: Option<String>,
    pub cf_api_token: Option<String>,
    /// binding -> namespace id; missing entries are unbound
    pub kv_namespaces: HashMap<Binding, String>,
    /// Shared admin password, also handed out as the admin portal API token
    pub admin_password: String,
    /// HMAC key for member QR signatures; `None` disables membership signing
    pub member_secret: Option<String>,
    /// Board bio PINs: username -> PIN
    pub board_pins: HashMap<String, String>,
    pub bootstrap_users: Vec<BootstrapUser>,
    pub resend_api_key: Option<String>,
    pub contact_to_email: String,
    pub contact_from_email: String,
    /// Ticket notification recipient
    pub notify_email: String,
    pub site_dir: Option<PathBuf>,
    pub board_seed_file: Option<PathBuf>,
    pub events_seed_file: Option<PathBuf>,
    pub tasks_seed_file: Option<PathBuf>,
    /// Attach error detail to 500 responses
    pub debug: bool,
    /// Attempts per minute per IP on login routes
    pub login_rate_limit: u32,
}

impl Default for Config {
    /// Development defaults with an in-memory store
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 8788,
            kv_backend: KvBackend::Memory,
            kv_path: PathBuf::from("data/innola.redb"),
            cf_account_id: None,
            cf_api_token: None,
            kv_namespaces: HashMap::new(),
            admin_password: "dev-ADMIN_PASSWORD-not-for-production".into(),
            member_secret: None,
            board_pins: HashMap::new(),
            bootstrap_users: Vec::new(),
            resend_api_key: None,
            contact_to_email: "contact@in-nola.org".into(),
            contact_from_email: "noreply@in-nola.org".into(),
            notify_email: "contact@in-nola.org".into(),
            site_dir: None,
            board_seed_file: None,
            events_seed_file: None,
            tasks_seed_file: None,
            debug: false,
            login_rate_limit: 5,
        }
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn optional_path(name: &str) -> Option<PathBuf> {
    optional(name).map(PathBuf::from)
}

/// `user:pin,user:pin` -> map (usernames lowercased)
pub fn parse_pin_list(raw: &str) -> Result<HashMap<String, String>, BoxError> {
    let mut pins = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (user, pin) = entry
            .split_once(':')
            .ok_or_else(|| format!("BOARD_PINS entry must be user:pin, got {entry:?}"))?;
        let (user, pin) = (user.trim().to_lowercase(), pin.trim().to_string());
        if user.is_empty() || pin.is_empty() {
            return Err(format!("BOARD_PINS entry must be user:pin, got {entry:?}").into());
        }
        pins.insert(user, pin);
    }
    Ok(pins)
}

/// `user:password:role,...` -> bootstrap users
pub fn parse_bootstrap_users(raw: &str) -> Result<Vec<BootstrapUser>, BoxError> {
    let mut users = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        // password may itself contain ':'
        let Some((user, password, role)) = entry
            .split_once(':')
            .and_then(|(user, rest)| rest.rsplit_once(':').map(|(pw, role)| (user, pw, role)))
        else {
            return Err("ADMIN_BOOTSTRAP_USERS entries must be user:password:role".into());
        };
        if user.trim().is_empty() || password.is_empty() {
            return Err("ADMIN_BOOTSTRAP_USERS entries must be user:password:role".into());
        }
        users.push(BootstrapUser {
            username: user.trim().to_lowercase(),
            password: password.to_string(),
            role: role.trim().to_lowercase(),
        });
    }
    Ok(users)
}

impl Config {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Member secret is optional (membership endpoints answer "not configured"
    /// without it) but when present outside development it must be long enough.
    fn member_secret(environment: &str) -> Result<Option<String>, BoxError> {
        let secret = optional("MEMBER_SECRET");
        if let Some(s) = &secret
            && environment != "development"
            && s.len() < MIN_MEMBER_SECRET_LEN
        {
            return Err(format!(
                "MEMBER_SECRET must be at least {MIN_MEMBER_SECRET_LEN} bytes in {environment} environment"
            )
            .into());
        }
        Ok(secret)
    }

    fn namespaces() -> HashMap<Binding, String> {
        Binding::ALL
            .into_iter()
            .filter_map(|b| optional(&format!("{}_ID", b.name())).map(|id| (b, id)))
            .collect()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = Self::default();

        let kv_backend = match optional("KV_BACKEND") {
            Some(v) => KvBackend::parse(&v)?,
            None => KvBackend::Redb,
        };
        let cf_account_id = optional("CF_ACCOUNT_ID");
        let cf_api_token = optional("CF_API_TOKEN");
        if kv_backend == KvBackend::Cloudflare && (cf_account_id.is_none() || cf_api_token.is_none())
        {
            return Err("CF_ACCOUNT_ID and CF_API_TOKEN must be set for KV_BACKEND=cloudflare".into());
        }

        let contact_to_email = optional("CONTACT_TO_EMAIL").unwrap_or(defaults.contact_to_email);

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.http_port),
            kv_backend,
            kv_path: optional_path("KV_PATH").unwrap_or(defaults.kv_path),
            cf_account_id,
            cf_api_token,
            kv_namespaces: Self::namespaces(),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            member_secret: Self::member_secret(&environment)?,
            board_pins: parse_pin_list(&std::env::var("BOARD_PINS").unwrap_or_default())?,
            bootstrap_users: parse_bootstrap_users(
                &std::env::var("ADMIN_BOOTSTRAP_USERS").unwrap_or_default(),
            )?,
            resend_api_key: optional("RESEND_API_KEY"),
            notify_email: optional("NOTIFY_EMAIL").unwrap_or_else(|| contact_to_email.clone()),
            contact_to_email,
            contact_from_email: optional("CONTACT_FROM_EMAIL")
                .unwrap_or(defaults.contact_from_email),
            site_dir: optional_path("SITE_DIR"),
            board_seed_file: optional_path("BOARD_SEED_FILE"),
            events_seed_file: optional_path("EVENTS_SEED_FILE"),
            tasks_seed_file: optional_path("TASKS_SEED_FILE"),
            debug: std::env::var("DEBUG").is_ok_and(|v| v == "true"),
            login_rate_limit: std::env::var("LOGIN_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.login_rate_limit),
            environment,
        })
    }
}
