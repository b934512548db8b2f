//! Which client is currently being worked on, and which clients the signed-in
//! user may see. An explicit state container: callers own it and drive every
//! transition, so nothing here is ambient.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::AppResult;
use crate::model::Client;
use crate::repo::ClientRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Advisor,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

/// Source of the client roster.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Every client the caller may access.
    async fn list_clients(&self) -> AppResult<Vec<Client>>;
    async fn get_client(&self, id: &str) -> AppResult<Option<Client>>;
}

#[async_trait]
impl<B: Backend> ClientDirectory for ClientRepository<B> {
    async fn list_clients(&self) -> AppResult<Vec<Client>> {
        self.list_all().await
    }

    async fn get_client(&self, id: &str) -> AppResult<Option<Client>> {
        self.get(id).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    pub clients: Vec<Client>,
    pub current_client_id: Option<String>,
    pub current_client: Option<Client>,
    pub loading: bool,
    pub session: Option<Session>,
}

pub struct ClientStore<D> {
    directory: D,
    state: ClientState,
}

impl<D: ClientDirectory> ClientStore<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            state: ClientState::default(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Record the session and load the roster. A client-role user with
    /// exactly one accessible client gets it selected.
    pub async fn sign_in(&mut self, session: Session) -> AppResult<()> {
        info!(target: "finplan", event = "session_sign_in", user_id = %session.user_id, role = ?session.role);
        self.state.session = Some(session);
        self.load_roster().await
    }

    /// Reload the roster for the current session. Applies the same
    /// auto-select rule as `sign_in`.
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.load_roster().await
    }

    async fn load_roster(&mut self) -> AppResult<()> {
        self.state.loading = true;
        let result = self.directory.list_clients().await;
        self.state.loading = false;

        match result {
            Ok(clients) => {
                let selection_gone = self
                    .state
                    .current_client_id
                    .as_ref()
                    .is_some_and(|id| !clients.iter().any(|c| &c.id == id));
                if selection_gone {
                    self.state.current_client_id = None;
                    self.state.current_client = None;
                }
                self.state.clients = clients;
                self.auto_select();
                Ok(())
            }
            Err(err) => {
                warn!(target: "finplan", event = "client_roster_failed", code = %err.code(), error = %err);
                Err(err)
            }
        }
    }

    fn auto_select(&mut self) {
        let is_client = self
            .state
            .session
            .as_ref()
            .is_some_and(|s| s.role == Role::Client);
        if !is_client || self.state.clients.len() != 1 {
            return;
        }
        let only = self.state.clients[0].clone();
        if self.state.current_client_id.as_deref() != Some(only.id.as_str()) {
            info!(target: "finplan", event = "client_auto_selected", id = %only.id);
        }
        self.state.current_client_id = Some(only.id.clone());
        self.state.current_client = Some(only);
    }

    /// Select a client by id, fetching its full record, or clear the
    /// selection with `None`. A failed fetch leaves the previous selection.
    pub async fn select(&mut self, id: Option<&str>) -> AppResult<()> {
        let Some(id) = id else {
            self.state.current_client_id = None;
            self.state.current_client = None;
            return Ok(());
        };

        match self.directory.get_client(id).await {
            Ok(client) => {
                if client.is_none() {
                    warn!(target: "finplan", event = "client_select_missing", id = %id);
                }
                self.state.current_client_id = Some(id.to_string());
                self.state.current_client = client;
                Ok(())
            }
            Err(err) => {
                warn!(target: "finplan", event = "client_select_failed", id = %id, error = %err);
                Err(err)
            }
        }
    }

    /// Back to the initial state.
    pub fn sign_out(&mut self) {
        info!(target: "finplan", event = "session_sign_out");
        self.state = ClientState::default();
    }
}
