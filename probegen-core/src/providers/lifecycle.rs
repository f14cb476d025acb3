//! Client handle lifecycle
//!
//! The network client is a two-state resource: `Unattached` or `Attached`.
//! `acquire` and `release` are the only transitions. The handle is never
//! serialized, so a generator restored from storage starts `Unattached` and
//! reattaches on its next call.

use crate::config::{read_api_key, ConfigError, ConnectionConfig};
use crate::http::client::OpenAIClient;
use crate::http::ProviderClient;
use crate::providers::error::GeneratorError;
use crate::providers::fault::{FaultClassifier, FaultKind};
use crate::providers::family::ProviderFamily;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// State of the client handle
#[derive(Clone, Default)]
pub enum ClientState {
    #[default]
    Unattached,
    Attached(Arc<dyn ProviderClient>),
}

impl fmt::Debug for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientState::Unattached => write!(f, "Unattached"),
            ClientState::Attached(_) => write!(f, "Attached(..)"),
        }
    }
}

/// Owns the client handle of one generator.
///
/// Only the family is persisted. The model name and connection settings
/// belong to the generator and are passed in on every `acquire`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientLifecycle {
    family: ProviderFamily,
    #[serde(skip)]
    state: ClientState,
}

impl ClientLifecycle {
    /// A lifecycle that has not attached yet
    pub fn new(family: ProviderFamily) -> Self {
        Self {
            family,
            state: ClientState::Unattached,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, ClientState::Attached(_))
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn family(&self) -> &ProviderFamily {
        &self.family
    }

    /// Return the client handle, creating it if needed.
    ///
    /// Creation reads the family's credential variable. With an empty `model`,
    /// the provider is asked for its model list and the call fails with
    /// `ConfigError::ModelRequired`; that path makes one request and never
    /// retries.
    pub async fn acquire(
        &mut self,
        model: &str,
        connection: &ConnectionConfig,
    ) -> Result<Arc<dyn ProviderClient>, GeneratorError> {
        if let ClientState::Attached(client) = &self.state {
            return Ok(Arc::clone(client));
        }

        let api_key = read_api_key(&self.family.env_var)?;
        let client = OpenAIClient::new(&self.family.base_url, api_key, connection).map_err(
            |source| GeneratorError::Provider {
                kind: FaultKind::Unclassified,
                source,
            },
        )?;
        let client: Arc<dyn ProviderClient> = Arc::new(client);

        if model.is_empty() {
            return Err(self.discover(client.as_ref()).await);
        }

        debug!("Attached {} client for '{}'", self.family.name, model);
        self.state = ClientState::Attached(Arc::clone(&client));
        Ok(client)
    }

    /// Drop the client handle. The lifecycle stays usable.
    pub fn release(&mut self) {
        if self.is_attached() {
            debug!("Releasing {} client", self.family.name);
        }
        self.state = ClientState::Unattached;
    }

    async fn discover(&self, client: &dyn ProviderClient) -> GeneratorError {
        info!("No model name given for {}, listing available models", self.family.name);

        match client.list_models().await {
            Ok(mut available_models) => {
                available_models.sort();
                ConfigError::ModelRequired {
                    family: self.family.name.clone(),
                    available_models,
                }
                .into()
            }
            Err(source) => GeneratorError::Provider {
                kind: FaultClassifier::kind(&source),
                source,
            },
        }
    }
}
