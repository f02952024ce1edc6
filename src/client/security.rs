//! Security API: registered clients and their access control lists.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::auth::PublicKey;
use crate::client::Client;

const CLIENTS_PATH: &str = "/security/clients";

/// A client registered with the data hub.
///
/// Serialized with the server's field names. The public key travels as
/// base64 encoded PEM bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientInfo {
    /// Unique client identifier.
    pub client_id: String,
    /// PEM encoded public key, if the client authenticates with a JWT
    /// assertion.
    #[serde(default, with = "pem_bytes")]
    pub public_key: Option<String>,
    /// Marks the client as removed.
    #[serde(default)]
    pub deleted: bool,
}

impl ClientInfo {
    /// Parses the registered public key.
    ///
    /// # Errors
    ///
    /// Returns a client processing error if the stored PEM is not a valid
    /// RSA public key.
    pub fn parsed_public_key(&self) -> Result<Option<PublicKey>, Error> {
        self.public_key
            .as_deref()
            .map(|pem| {
                PublicKey::from_pem(pem).map_err(|e| {
                    Error::client_processing(format!(
                        "public key of client {} is not valid",
                        self.client_id
                    ))
                    .with_source(e)
                })
            })
            .transpose()
    }
}

/// A single access rule for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessControl {
    /// URL of the resource the rule applies to.
    pub resource: String,
    /// `read` or `write`.
    pub action: String,
    /// Denies rather than allows the action.
    #[serde(default)]
    pub deny: bool,
}

impl AccessControl {
    /// Allows `action` on `resource`.
    pub fn allow(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self { resource: resource.into(), action: action.into(), deny: false }
    }

    /// Denies `action` on `resource`.
    pub fn deny(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self { resource: resource.into(), action: action.into(), deny: true }
    }
}

mod pem_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(pem: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match pem {
            Some(pem) => serializer.serialize_str(&STANDARD.encode(pem.as_bytes())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let Some(encoded) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if encoded.is_empty() {
            return Ok(None);
        }
        let bytes = STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)?;
        String::from_utf8(bytes).map(Some).map_err(D::Error::custom)
    }
}

/// Client for the `/security` endpoints.
///
/// ## Example
///
/// ```rust,ignore
/// use datahub::auth::KeyPair;
///
/// let keys = KeyPair::generate()?;
/// let security = admin.security();
/// security.add_client("sync-job", Some(keys.public())).await?;
/// security
///     .set_client_acl("sync-job", &[AccessControl::allow("/datasets/people*", "read")])
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SecurityClient {
    client: Client,
}

impl SecurityClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lists registered clients keyed by client id.
    ///
    /// # Errors
    ///
    /// Authentication, request or client processing errors.
    pub async fn get_clients(&self) -> Result<HashMap<String, ClientInfo>, Error> {
        self.client.inner().get_json(CLIENTS_PATH, "get clients").await
    }

    /// Registers a client, optionally with the public key it signs
    /// assertions with.
    ///
    /// # Errors
    ///
    /// A parameter error if `client_id` is empty, otherwise authentication
    /// or request errors.
    pub async fn add_client(
        &self,
        client_id: &str,
        public_key: Option<&PublicKey>,
    ) -> Result<(), Error> {
        require_id(client_id)?;
        let public_key = public_key.map(PublicKey::to_pem).transpose()?;
        let info = ClientInfo { client_id: client_id.to_string(), public_key, deleted: false };

        self.client.inner().post_json(CLIENTS_PATH, &info, "add client").await?;
        tracing::debug!(client_id, "client registered");
        Ok(())
    }

    /// Removes a client.
    ///
    /// # Errors
    ///
    /// A parameter error if `client_id` is empty, otherwise authentication
    /// or request errors.
    pub async fn delete_client(&self, client_id: &str) -> Result<(), Error> {
        require_id(client_id)?;
        let info = ClientInfo { client_id: client_id.to_string(), public_key: None, deleted: true };
        self.client.inner().post_json(CLIENTS_PATH, &info, "delete client").await
    }

    /// Returns the access control list of a client.
    ///
    /// # Errors
    ///
    /// A parameter error if `client_id` is empty, otherwise authentication,
    /// request or client processing errors.
    pub async fn get_client_acl(&self, client_id: &str) -> Result<Vec<AccessControl>, Error> {
        require_id(client_id)?;
        self.client.inner().get_json(&acl_path(client_id), "get client access control list").await
    }

    /// Replaces the access control list of a client.
    ///
    /// # Errors
    ///
    /// A parameter error if `client_id` is empty, otherwise authentication
    /// or request errors.
    pub async fn set_client_acl(&self, client_id: &str, acl: &[AccessControl]) -> Result<(), Error> {
        require_id(client_id)?;
        self.client
            .inner()
            .post_json(&acl_path(client_id), acl, "set client access control list")
            .await
    }
}

fn require_id(client_id: &str) -> Result<(), Error> {
    if client_id.is_empty() {
        return Err(Error::parameter("client id cannot be empty"));
    }
    Ok(())
}

fn acl_path(client_id: &str) -> String {
    format!("{}/{}/acl", CLIENTS_PATH, urlencoding::encode(client_id))
}
