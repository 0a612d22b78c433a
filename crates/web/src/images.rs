//! Remote image allowlist backing the image proxy.
//!
//! Only images from known hosts may be served through `/img`. The default
//! allowlist covers the primary Supabase project's public storage bucket and
//! Unsplash; deployments can override it with the `IMAGE_ALLOWLIST`
//! environment variable (comma-separated `host/path-prefix` entries).

use thiserror::Error;
use url::Url;

/// Path prefix of publicly readable Supabase storage objects.
const SUPABASE_PUBLIC_STORAGE_PREFIX: &str = "/storage/v1/object/public/";

/// Unsplash image CDN host.
const UNSPLASH_HOST: &str = "images.unsplash.com";

/// Errors raised while building an [`ImageAllowlist`].
#[derive(Debug, Error)]
pub enum AllowlistError {
    #[error("invalid Supabase project URL '{0}': {1}")]
    InvalidProjectUrl(String, url::ParseError),
    #[error("Supabase project URL '{0}' has no host")]
    MissingHost(String),
    #[error("empty allowlist entry")]
    EmptyEntry,
}

/// One allowed remote origin: an exact host plus a path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePattern {
    /// Exact host to match (no wildcard subdomains).
    pub host: String,
    /// Required path prefix; `/` admits the whole host.
    pub path_prefix: String,
}

impl RemotePattern {
    fn matches(&self, url: &Url) -> bool {
        url.host_str() == Some(self.host.as_str()) && url.path().starts_with(&self.path_prefix)
    }
}

/// The set of remote origins the image proxy will serve.
#[derive(Debug, Clone)]
pub struct ImageAllowlist {
    patterns: Vec<RemotePattern>,
}

impl ImageAllowlist {
    /// Build the default allowlist for a Supabase project: the project's
    /// public storage bucket plus Unsplash.
    ///
    /// # Errors
    ///
    /// Returns an error if the project URL cannot be parsed or has no host.
    pub fn defaults_for(supabase_url: &str) -> Result<Self, AllowlistError> {
        let parsed = Url::parse(supabase_url)
            .map_err(|e| AllowlistError::InvalidProjectUrl(supabase_url.to_string(), e))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| AllowlistError::MissingHost(supabase_url.to_string()))?;

        Ok(Self {
            patterns: vec![
                RemotePattern {
                    host: host.to_string(),
                    path_prefix: SUPABASE_PUBLIC_STORAGE_PREFIX.to_string(),
                },
                RemotePattern {
                    host: UNSPLASH_HOST.to_string(),
                    path_prefix: "/".to_string(),
                },
            ],
        })
    }

    /// Build the allowlist from the `IMAGE_ALLOWLIST` environment value,
    /// falling back to [`Self::defaults_for`] when unset.
    ///
    /// Entries are comma-separated `host/path-prefix` pairs; a bare host
    /// admits its whole path space.
    ///
    /// # Errors
    ///
    /// Returns an error on empty entries or an unusable project URL.
    pub fn from_env_value(
        raw: Option<String>,
        supabase_url: &str,
    ) -> Result<Self, AllowlistError> {
        let Some(raw) = raw else {
            return Self::defaults_for(supabase_url);
        };

        let mut patterns = Vec::new();
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(AllowlistError::EmptyEntry);
            }
            let (host, path) = entry.split_once('/').unwrap_or((entry, ""));
            if host.is_empty() {
                return Err(AllowlistError::EmptyEntry);
            }
            patterns.push(RemotePattern {
                host: host.to_string(),
                path_prefix: format!("/{path}"),
            });
        }

        Ok(Self { patterns })
    }

    /// Whether a candidate URL may be served through the proxy.
    ///
    /// Requires `https`, an exactly matching host, and a matching path
    /// prefix. Unparseable URLs are rejected.
    #[must_use]
    pub fn permits(&self, candidate: &str) -> bool {
        let Ok(url) = Url::parse(candidate) else {
            return false;
        };
        if url.scheme() != "https" {
            return false;
        }
        self.patterns.iter().any(|p| p.matches(&url))
    }

    /// The configured patterns.
    #[must_use]
    pub fn patterns(&self) -> &[RemotePattern] {
        &self.patterns
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PROJECT_URL: &str = "https://abcdefgh.supabase.co";

    #[test]
    fn test_defaults_permit_public_storage() {
        let allowlist = ImageAllowlist::defaults_for(PROJECT_URL).unwrap();
        assert!(allowlist.permits(
            "https://abcdefgh.supabase.co/storage/v1/object/public/avatars/cat.png"
        ));
    }

    #[test]
    fn test_defaults_reject_non_public_storage_path() {
        let allowlist = ImageAllowlist::defaults_for(PROJECT_URL).unwrap();
        assert!(!allowlist.permits("https://abcdefgh.supabase.co/storage/v1/object/sign/x.png"));
        assert!(!allowlist.permits("https://abcdefgh.supabase.co/rest/v1/accounts"));
    }

    #[test]
    fn test_defaults_permit_unsplash_anywhere() {
        let allowlist = ImageAllowlist::defaults_for(PROJECT_URL).unwrap();
        assert!(allowlist.permits("https://images.unsplash.com/photo-123?w=800"));
    }

    #[test]
    fn test_rejects_other_hosts() {
        let allowlist = ImageAllowlist::defaults_for(PROJECT_URL).unwrap();
        assert!(!allowlist.permits("https://evil.example.com/storage/v1/object/public/x.png"));
        // Subdomains of allowed hosts are not allowed hosts
        assert!(!allowlist.permits("https://sub.images.unsplash.com/photo-123"));
    }

    #[test]
    fn test_rejects_plain_http() {
        let allowlist = ImageAllowlist::defaults_for(PROJECT_URL).unwrap();
        assert!(!allowlist.permits("http://images.unsplash.com/photo-123"));
    }

    #[test]
    fn test_rejects_garbage() {
        let allowlist = ImageAllowlist::defaults_for(PROJECT_URL).unwrap();
        assert!(!allowlist.permits("not a url"));
        assert!(!allowlist.permits(""));
    }

    #[test]
    fn test_env_value_parsing() {
        let allowlist = ImageAllowlist::from_env_value(
            Some("cdn.example.com/img/, images.unsplash.com".to_string()),
            PROJECT_URL,
        )
        .unwrap();

        assert_eq!(allowlist.patterns().len(), 2);
        assert!(allowlist.permits("https://cdn.example.com/img/banner.jpg"));
        assert!(!allowlist.permits("https://cdn.example.com/js/app.js"));
        assert!(allowlist.permits("https://images.unsplash.com/photo-123"));
        // Overridden allowlist no longer includes the project storage host
        assert!(!allowlist.permits(
            "https://abcdefgh.supabase.co/storage/v1/object/public/avatars/cat.png"
        ));
    }

    #[test]
    fn test_env_value_rejects_empty_entry() {
        let result =
            ImageAllowlist::from_env_value(Some("cdn.example.com/,,".to_string()), PROJECT_URL);
        assert!(matches!(result, Err(AllowlistError::EmptyEntry)));
    }

    #[test]
    fn test_invalid_project_url() {
        let result = ImageAllowlist::defaults_for("not a url");
        assert!(matches!(result, Err(AllowlistError::InvalidProjectUrl(..))));
    }
}
