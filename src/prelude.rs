//! Prelude module for convenient imports.
//!
//! ```rust
//! use datahub::prelude::*;
//! ```
//!
//! This provides access to:
//! - Core client types
//! - Error types
//! - Authentication types
//! - Common data types

pub use crate::{
    auth::{
        AuthConfig, AuthStrategy, BasicAuth, ClientCredentialsAuth, KeyPair, PrivateKey,
        PublicKey, PublicKeyJwtAuth, Token, TokenSource, UserFlowAuth,
    },
    client::{
        AccessControl, ChangesQuery, Client, ClientBuilder, ClientInfo, DatasetClient,
        EntitiesQuery, Query, SecurityClient,
    },
    config::{HttpConfig, NoExpiryPolicy, TokenConfig},
    error::{Error, ErrorKind, Result},
    stream::{Page, PageFetcher, RecordStream},
    types::{Context, Continuation, Entity, EntityPage, QueryPage, QueryResult},
};
