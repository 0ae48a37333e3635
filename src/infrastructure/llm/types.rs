//! Provider identifiers and the error type shared by every backend.

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

/// LLM provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Gemini,
    #[value(name = "xai")]
    XAI,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::XAI => "xai",
        }
    }

    /// Resolve a provider by its exact lowercase name.
    pub fn from_name(name: &str) -> Result<Self, ProviderError> {
        <Self as ValueEnum>::from_str(name, false)
            .map_err(|_| ProviderError::UnknownProvider(name.to_string()))
    }

    /// Environment variable holding this provider's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::XAI => "XAI_API_KEY",
        }
    }

    /// Base URL used when no endpoint override is configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::XAI => "https://api.x.ai/v1",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to obtain a reply from a provider. Always fatal for the run.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider")]
    UnknownProvider(String),

    #[error("{var} not set")]
    MissingCredential { var: &'static str },

    #[error("[{provider}] HTTP request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("[{provider}] HTTP {status}: {message}")]
    Http {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("[{provider}] failed to parse response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("[{provider}] {detail}")]
    EmptyResponse {
        provider: &'static str,
        detail: &'static str,
    },
}

impl ProviderError {
    pub fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        ProviderError::Transport { provider, source }
    }

    pub fn decode(provider: &'static str, source: serde_json::Error) -> Self {
        ProviderError::Decode { provider, source }
    }

    pub fn empty(provider: &'static str, detail: &'static str) -> Self {
        ProviderError::EmptyResponse { provider, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_name() {
        assert_eq!(ProviderKind::from_str("openai", false), Ok(ProviderKind::OpenAI));
        assert_eq!(ProviderKind::from_str("Anthropic", true), Ok(ProviderKind::Anthropic));
        assert_eq!(ProviderKind::from_str("gemini", false), Ok(ProviderKind::Gemini));
        assert_eq!(ProviderKind::from_str("xai", false), Ok(ProviderKind::XAI));
        assert!(ProviderKind::from_str("groq", false).is_err());
    }

    #[test]
    fn test_unknown_provider_name() {
        assert_eq!(ProviderKind::from_name("gemini").unwrap(), ProviderKind::Gemini);

        let err = ProviderKind::from_name("groq").unwrap_err();
        assert!(matches!(&err, ProviderError::UnknownProvider(name) if name == "groq"));
        assert_eq!(err.to_string(), "unknown provider");
        assert!(ProviderKind::from_name("OpenAI").is_err());
    }

    #[test]
    fn test_clap_names_match_wire_names() {
        for kind in ProviderKind::value_variants() {
            let parsed = ProviderKind::from_str(kind.as_str(), false).unwrap();
            assert_eq!(parsed, *kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_deserialize_from_yaml_name() {
        let kind: ProviderKind = serde_yaml::from_str("xai").unwrap();
        assert_eq!(kind, ProviderKind::XAI);
        let kind: ProviderKind = serde_yaml::from_str("openai").unwrap();
        assert_eq!(kind, ProviderKind::OpenAI);
    }

    #[test]
    fn test_credential_vars() {
        assert_eq!(ProviderKind::OpenAI.credential_var(), "OPENAI_API_KEY");
        assert_eq!(ProviderKind::Anthropic.credential_var(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderKind::Gemini.credential_var(), "GEMINI_API_KEY");
        assert_eq!(ProviderKind::XAI.credential_var(), "XAI_API_KEY");
    }

    #[test]
    fn test_missing_credential_message() {
        let err = ProviderError::MissingCredential {
            var: "OPENAI_API_KEY",
        };
        assert_eq!(err.to_string(), "OPENAI_API_KEY not set");
    }
}
