//! Runtime settings and the HTTP server configuration derived from them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Settings loaded via OrthoConfig from CLI arguments, `HELPDESK_*`
/// environment variables and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HELPDESK")]
pub struct HelpdeskSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Deadline applied to every document store call, in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// File holding the session cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Set the `Secure` attribute on the session cookie.
    pub cookie_secure: Option<bool>,
    /// Fall back to a random session key when the key file is unreadable.
    pub allow_ephemeral_session_key: Option<bool>,
}

impl HelpdeskSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    /// Returns [`std::io::ErrorKind::InvalidInput`] when the address does not
    /// parse.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    /// Return the configured store deadline, falling back to five seconds.
    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms.unwrap_or(DEFAULT_STORE_TIMEOUT_MS))
    }

    /// Return the configured key file path, falling back to the default.
    #[must_use]
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether the session cookie carries `Secure`; on unless disabled.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Whether an unreadable key file may fall back to a random key.
    #[must_use]
    pub fn allow_ephemeral_session_key(&self) -> bool {
        self.allow_ephemeral_session_key.unwrap_or(false)
    }

    /// Load the session signing key.
    ///
    /// # Errors
    /// Fails when the key file cannot be read and ephemeral keys are not
    /// allowed (debug builds always allow them).
    pub fn session_key(&self) -> std::io::Result<Key> {
        let path = self.session_key_file();
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Key::derive_from(&bytes)),
            Err(error) if cfg!(debug_assertions) || self.allow_ephemeral_session_key() => {
                warn!(path = %path.display(), %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            }
            Err(error) => Err(std::io::Error::other(format!(
                "failed to read session key at {}: {error}",
                path.display()
            ))),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store_timeout: Duration,
}

impl ServerConfig {
    /// Construct a server configuration from explicit values.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        }
    }

    /// Derive the server configuration from loaded settings.
    ///
    /// # Errors
    /// Propagates bind address and session key failures.
    pub fn from_settings(settings: &HelpdeskSettings) -> std::io::Result<Self> {
        Ok(Self::new(
            settings.session_key()?,
            settings.cookie_secure(),
            SameSite::Lax,
            settings.bind_addr()?,
        )
        .with_store_timeout(settings.store_timeout()))
    }

    /// Override the document store deadline.
    #[must_use]
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the document store deadline.
    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "HELPDESK_BIND_ADDR",
        "HELPDESK_STORE_TIMEOUT_MS",
        "HELPDESK_SESSION_KEY_FILE",
        "HELPDESK_COOKIE_SECURE",
        "HELPDESK_ALLOW_EPHEMERAL_SESSION_KEY",
    ];

    fn load_from_empty_args() -> HelpdeskSettings {
        HelpdeskSettings::load_from_iter([OsString::from("helpdesk")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.store_timeout(), Duration::from_millis(5000));
        assert_eq!(settings.session_key_file(), PathBuf::from(DEFAULT_SESSION_KEY_FILE));
        assert_eq!(settings.cookie_secure, None);
        assert!(settings.cookie_secure());
        assert!(!settings.allow_ephemeral_session_key());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HELPDESK_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("HELPDESK_STORE_TIMEOUT_MS", Some("250".to_owned())),
            ("HELPDESK_SESSION_KEY_FILE", Some("/tmp/helpdesk_key".to_owned())),
            ("HELPDESK_COOKIE_SECURE", Some("false".to_owned())),
            ("HELPDESK_ALLOW_EPHEMERAL_SESSION_KEY", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.store_timeout(), Duration::from_millis(250));
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/helpdesk_key"));
        assert!(!settings.cookie_secure());
        assert!(settings.allow_ephemeral_session_key());
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let _guard = lock_env([("HELPDESK_BIND_ADDR", Some("not an address".to_owned()))]);

        let settings = load_from_empty_args();
        let err = settings.bind_addr().expect_err("invalid address");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn ephemeral_opt_in_replaces_an_unreadable_key_file() {
        let _guard = lock_env([
            ("HELPDESK_BIND_ADDR", Some("127.0.0.1:0".to_owned())),
            ("HELPDESK_SESSION_KEY_FILE", Some("/nonexistent/helpdesk/session_key".to_owned())),
            ("HELPDESK_COOKIE_SECURE", None),
            ("HELPDESK_ALLOW_EPHEMERAL_SESSION_KEY", Some("true".to_owned())),
        ]);

        let config = ServerConfig::from_settings(&load_from_empty_args())
            .expect("ephemeral key accepted");
        assert!(config.cookie_secure);
    }

    #[rstest]
    fn server_config_carries_store_timeout() {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("literal"),
        )
        .with_store_timeout(Duration::from_millis(750));

        assert_eq!(config.store_timeout(), Duration::from_millis(750));
        assert_eq!(config.bind_addr().port(), 0);
    }
}
