use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// How to reach the cluster. Built once from the config file and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub transport: Transport,
    /// Present only when auth is enabled
    pub credentials: Option<Credentials>,
    /// Per-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Tls(CertVerification),
}

/// Certificate verification material for TLS connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertVerification {
    /// Trust only the certificates in this PEM bundle
    CaBundle(PathBuf),
    /// Trust the built-in root store
    SystemRoots,
    /// Skip verification entirely (INSECURE)
    Disabled,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl ConnectionSettings {
    /// Plaintext, unauthenticated settings
    pub fn plain(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            transport: Transport::Plain,
            credentials: None,
            timeout: None,
        }
    }

    pub fn with_tls(mut self, verification: CertVerification) -> Self {
        self.transport = Transport::Tls(verification);
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_tls(&self) -> bool {
        matches!(self.transport, Transport::Tls(_))
    }

    pub fn scheme(&self) -> &'static str {
        if self.is_tls() {
            "https"
        } else {
            "http"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let settings = ConnectionSettings::plain("es01", 9200).with_credentials("elastic", "hunter2");
        let rendered = format!("{:?}", settings);
        assert!(rendered.contains("elastic"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_scheme() {
        let plain = ConnectionSettings::plain("es01", 9200);
        assert_eq!(plain.scheme(), "http");
        let tls = plain.with_tls(CertVerification::Disabled);
        assert_eq!(tls.scheme(), "https");
        assert!(tls.is_tls());
    }
}
