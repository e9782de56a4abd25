//! Shared HTTP state holding the driving ports handlers call into.

use std::sync::Arc;

use crate::domain::ports::{AccountsService, ArticlesCommand, ArticlesQuery, TokenService};

/// Ports required to build an [`HttpState`].
pub struct HttpStatePorts {
    /// Article read port.
    pub articles_query: Arc<dyn ArticlesQuery>,
    /// Article write port.
    pub articles_command: Arc<dyn ArticlesCommand>,
    /// Registration and login port.
    pub accounts: Arc<dyn AccountsService>,
    /// Bearer credential verification for the auth gate.
    pub tokens: Arc<dyn TokenService>,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    articles_query: Arc<dyn ArticlesQuery>,
    articles_command: Arc<dyn ArticlesCommand>,
    accounts: Arc<dyn AccountsService>,
    tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Build the state from its ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            articles_query,
            articles_command,
            accounts,
            tokens,
        } = ports;
        Self {
            articles_query,
            articles_command,
            accounts,
            tokens,
        }
    }

    /// Article read port.
    pub fn articles_query(&self) -> &Arc<dyn ArticlesQuery> {
        &self.articles_query
    }

    /// Article write port.
    pub fn articles_command(&self) -> &Arc<dyn ArticlesCommand> {
        &self.articles_command
    }

    /// Registration and login port.
    pub fn accounts(&self) -> &Arc<dyn AccountsService> {
        &self.accounts
    }

    /// Bearer credential verification.
    pub fn tokens(&self) -> &Arc<dyn TokenService> {
        &self.tokens
    }
}
