//! Provider families
//!
//! A family names a provider, the environment variable holding its
//! credential, and the API root its client talks to.

use crate::config::ValidationError;
use crate::config::ValidationErrorKind;
use crate::http::EndpointVariant;
use serde::{Deserialize, Serialize};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Identity and connection defaults of one provider family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFamily {
    /// Display name, e.g. "OpenAI"
    pub name: String,

    /// Environment variable that holds the API key
    pub env_var: String,

    /// API root
    pub base_url: String,

    /// Variant for model names the router does not recognise.
    /// `None` rejects unknown models.
    #[serde(default)]
    pub fallback_variant: Option<EndpointVariant>,
}

impl ProviderFamily {
    /// The OpenAI API, reading `OPENAI_API_KEY`
    pub fn openai() -> Self {
        Self {
            name: "OpenAI".to_string(),
            env_var: "OPENAI_API_KEY".to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            fallback_variant: None,
        }
    }

    /// Any endpoint speaking the OpenAI protocol.
    ///
    /// The credential is read from `<NAME>_API_KEY` and unknown models are
    /// sent to the chat endpoint.
    pub fn openai_compatible(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = name
            .to_uppercase()
            .replace(|c: char| !c.is_ascii_alphanumeric(), "_");
        let env_var = format!("{prefix}_API_KEY");

        Self {
            name,
            env_var,
            base_url: base_url.into(),
            fallback_variant: Some(EndpointVariant::Chat),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = env_var.into();
        self
    }

    pub fn with_fallback_variant(mut self, variant: Option<EndpointVariant>) -> Self {
        self.fallback_variant = variant;
        self
    }

    /// Validate the family settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::required("family.name"));
        }

        if self.env_var.is_empty() {
            return Err(ValidationError::required("family.env_var"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
            Ok(url) => Err(ValidationError::invalid_value(
                "family.base_url",
                "http or https URL",
                url.scheme(),
            )),
            Err(e) => Err(ValidationError::new(
                "family.base_url",
                ValidationErrorKind::InvalidUrl {
                    message: e.to_string(),
                },
            )),
        }
    }
}

impl Default for ProviderFamily {
    fn default() -> Self {
        Self::openai()
    }
}
