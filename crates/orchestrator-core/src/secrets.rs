//! Runtime credential resolution.
//!
//! Nothing secret lives in configuration files or source. Every request
//! resolves a fresh [`Credentials`] snapshot from a [`SecretSource`], so a
//! rotated key in the environment is picked up without a restart.

use std::collections::HashMap;
use std::fmt;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const GITHUB_OWNER: &str = "GITHUB_OWNER";
pub const GITHUB_REPO: &str = "GITHUB_REPO";
pub const HF_API_KEY: &str = "HF_API_KEY";
pub const ALT_INFERENCE_API_KEY: &str = "ALT_INFERENCE_API_KEY";

/// Looks up a named secret. Empty values count as absent.
pub trait SecretSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the process environment on every lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// Fixed in-memory secrets, for tests and embedding.
#[derive(Clone, Default)]
pub struct StaticSecrets(HashMap<String, String>);

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }
}

impl SecretSource for StaticSecrets {
    fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

impl fmt::Debug for StaticSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.0.keys().collect();
        names.sort();
        f.debug_tuple("StaticSecrets").field(&names).finish()
    }
}

// ---------------------------------------------------------------------------
// Credentials snapshot
// ---------------------------------------------------------------------------

#[derive(Clone, Default, PartialEq, Eq)]
pub struct GitHubCredentials {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
}

impl GitHubCredentials {
    /// `(token, owner, repo)` when all three are present.
    pub fn complete(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.token.as_deref()?,
            self.owner.as_deref()?,
            self.repo.as_deref()?,
        ))
    }
}

#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub github: GitHubCredentials,
    pub hf_api_key: Option<String>,
    pub alt_inference_api_key: Option<String>,
}

impl Credentials {
    pub fn resolve(source: &dyn SecretSource) -> Self {
        Self {
            openai_api_key: source.get(OPENAI_API_KEY),
            github: GitHubCredentials {
                token: source.get(GITHUB_TOKEN),
                owner: source.get(GITHUB_OWNER),
                repo: source.get(GITHUB_REPO),
            },
            hf_api_key: source.get(HF_API_KEY),
            alt_inference_api_key: source.get(ALT_INFERENCE_API_KEY),
        }
    }

    /// Names of the variables that are not set, in a stable order.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.is_none() {
            missing.push(OPENAI_API_KEY);
        }
        if self.github.token.is_none() {
            missing.push(GITHUB_TOKEN);
        }
        if self.github.owner.is_none() {
            missing.push(GITHUB_OWNER);
        }
        if self.github.repo.is_none() {
            missing.push(GITHUB_REPO);
        }
        if self.hf_api_key.is_none() {
            missing.push(HF_API_KEY);
        }
        missing
    }
}

fn redacted(v: &Option<String>) -> &'static str {
    if v.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for GitHubCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubCredentials")
            .field("token", &redacted(&self.token))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &redacted(&self.openai_api_key))
            .field("github", &self.github)
            .field("hf_api_key", &redacted(&self.hf_api_key))
            .field(
                "alt_inference_api_key",
                &redacted(&self.alt_inference_api_key),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_absent() {
        let secrets = StaticSecrets::new().with(OPENAI_API_KEY, "");
        assert_eq!(secrets.get(OPENAI_API_KEY), None);
    }

    #[test]
    fn github_requires_all_three() {
        let partial = Credentials::resolve(
            &StaticSecrets::new()
                .with(GITHUB_TOKEN, "t")
                .with(GITHUB_OWNER, "o"),
        );
        assert!(partial.github.complete().is_none());

        let full = Credentials::resolve(
            &StaticSecrets::new()
                .with(GITHUB_TOKEN, "t")
                .with(GITHUB_OWNER, "o")
                .with(GITHUB_REPO, "r"),
        );
        assert_eq!(full.github.complete(), Some(("t", "o", "r")));
    }

    #[test]
    fn missing_lists_unset_names() {
        let creds = Credentials::resolve(&StaticSecrets::new().with(HF_API_KEY, "hf"));
        assert_eq!(
            creds.missing(),
            vec![OPENAI_API_KEY, GITHUB_TOKEN, GITHUB_OWNER, GITHUB_REPO]
        );
    }

    #[test]
    fn debug_never_prints_values() {
        let creds = Credentials::resolve(
            &StaticSecrets::new()
                .with(OPENAI_API_KEY, "sk-very-secret")
                .with(GITHUB_TOKEN, "ghp_secret")
                .with(GITHUB_OWNER, "octo"),
        );
        let out = format!("{creds:?}");
        assert!(!out.contains("sk-very-secret"));
        assert!(!out.contains("ghp_secret"));
        assert!(out.contains("octo"));
    }
}
