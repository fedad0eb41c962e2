// SPDX-License-Identifier: MPL-2.0

use crate::atproto::types::{RawThreadNode, Session};
use crate::config::{DEFAULT_PDS, THREAD_PARENT_HEIGHT, THREAD_REPLY_DEPTH};
use crate::query::ThreadSource;
use atrium_api::agent::atp_agent::AtpAgent;
use atrium_api::agent::atp_agent::store::MemorySessionStore;
use atrium_api::types::LimitedU16;
use atrium_xrpc_client::reqwest::ReqwestClient;
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("not authenticated")]
    NotAuthenticated,
}

type Agent = AtpAgent<MemorySessionStore, ReqwestClient>;

/// Wraps atrium so the rest of the crate only sees our own types.
pub struct HangarClient {
    agent: RwLock<Option<Agent>>,
    service_url: String,
}

impl HangarClient {
    pub fn new() -> Self {
        Self {
            agent: RwLock::new(None),
            service_url: DEFAULT_PDS.to_string(),
        }
    }

    pub fn with_service(service_url: &str) -> Self {
        Self {
            agent: RwLock::new(None),
            service_url: service_url.to_string(),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub async fn login(&self, handle: &str, password: &str) -> Result<Session, ClientError> {
        let client = ReqwestClient::new(&self.service_url);
        let agent = AtpAgent::new(client, MemorySessionStore::default());

        let result = agent
            .login(handle, password)
            .await
            .map_err(|e| ClientError::Auth(e.to_string()))?;

        let session = Session {
            did: result.data.did.to_string(),
            handle: result.data.handle.to_string(),
            access_jwt: result.data.access_jwt.clone(),
            refresh_jwt: result.data.refresh_jwt.clone(),
        };

        let mut agent_guard = self
            .agent
            .write()
            .map_err(|_| ClientError::Auth("agent lock poisoned".to_string()))?;
        *agent_guard = Some(agent);

        Ok(session)
    }

    pub async fn resume_session(&self, session: &Session) -> Result<(), ClientError> {
        let client = ReqwestClient::new(&self.service_url);
        let agent = AtpAgent::new(client, MemorySessionStore::default());

        let atrium_session = atrium_api::agent::atp_agent::AtpSession::from(
            atrium_api::com::atproto::server::create_session::OutputData {
                access_jwt: session.access_jwt.clone(),
                active: None,
                did: session
                    .did
                    .parse()
                    .map_err(|e| ClientError::Auth(format!("invalid DID: {e}")))?,
                did_doc: None,
                email: None,
                email_auth_factor: None,
                email_confirmed: None,
                handle: session
                    .handle
                    .parse()
                    .map_err(|e| ClientError::Auth(format!("invalid handle: {e}")))?,
                refresh_jwt: session.refresh_jwt.clone(),
                status: None,
            },
        );

        agent
            .resume_session(atrium_session)
            .await
            .map_err(|e| ClientError::Auth(e.to_string()))?;

        let mut agent_guard = self
            .agent
            .write()
            .map_err(|_| ClientError::Auth("agent lock poisoned".to_string()))?;
        *agent_guard = Some(agent);

        Ok(())
    }

    pub fn clear_session(&self) {
        if let Ok(mut agent_guard) = self.agent.write() {
            *agent_guard = None;
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.agent.read().is_ok_and(|guard| guard.is_some())
    }

    /// Fetch a post thread as the server returned it.
    ///
    /// atrium's generated union is re-read through serde into
    /// [`RawThreadNode`] so thread assembly never depends on atrium's types.
    #[allow(clippy::await_holding_lock)]
    pub async fn get_post_thread(&self, post_uri: &str) -> Result<RawThreadNode, ClientError> {
        let agent_guard = self
            .agent
            .read()
            .map_err(|_| ClientError::NotAuthenticated)?;
        let agent = agent_guard.as_ref().ok_or(ClientError::NotAuthenticated)?;

        let params = atrium_api::app::bsky::feed::get_post_thread::ParametersData {
            uri: post_uri
                .parse()
                .map_err(|e| ClientError::InvalidResponse(format!("invalid URI: {e}")))?,
            depth: Some(
                LimitedU16::try_from(THREAD_REPLY_DEPTH)
                    .map_err(|e| ClientError::InvalidResponse(format!("{e:?}")))?,
            ),
            parent_height: Some(
                LimitedU16::try_from(THREAD_PARENT_HEIGHT)
                    .map_err(|e| ClientError::InvalidResponse(format!("{e:?}")))?,
            ),
        };

        let output = agent
            .api
            .app
            .bsky
            .feed
            .get_post_thread(params.into())
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let value = serde_json::to_value(&output.data.thread)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        debug!(uri = post_uri, "fetched post thread");

        serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

impl Default for HangarClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadSource for HangarClient {
    async fn get_post_thread(&self, uri: &str) -> Result<RawThreadNode, ClientError> {
        HangarClient::get_post_thread(self, uri).await
    }
}
