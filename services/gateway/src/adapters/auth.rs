//! services/gateway/src/adapters/auth.rs
//!
//! This module contains the adapter for the remote auth service.
//! It implements the `AuthService` and `UserDirectory` ports from the core crate.

use async_trait::async_trait;
use gateway_core::{
    AuthService, Credentials, Identity, PortError, PortResult, Registration, Role, Tokens, User,
    UserDirectory,
};
use tonic::transport::Channel;
use tonic::Code;
use tracing::debug;

use crate::adapters::proto::auth::{
    self as pb, auth_client::AuthClient, AuthRequest, FindUserByIdRequest, RefreshRequest,
    SignInRequest, SignOutRequest, SignUpRequest,
};
use crate::adapters::status::{auth_failure, lookup_failure};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the auth ports over the `auth.Auth` gRPC service.
#[derive(Clone)]
pub struct GrpcAuthAdapter {
    client: AuthClient<Channel>,
}

impl GrpcAuthAdapter {
    /// Creates a new `GrpcAuthAdapter` on top of a shared channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            client: AuthClient::new(channel),
        }
    }
}

fn to_proto_role(role: Role) -> pb::Role {
    match role {
        Role::User => pb::Role::User,
        Role::Admin => pb::Role::Admin,
    }
}

fn from_proto_role(role: pb::Role) -> Role {
    match role {
        pb::Role::User => Role::User,
        pb::Role::Admin => Role::Admin,
    }
}

fn tokens(reply: pb::Tokens) -> Tokens {
    Tokens {
        access: reply.access,
        refresh: reply.refresh,
    }
}

//=========================================================================================
// `AuthService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthService for GrpcAuthAdapter {
    async fn sign_in(&self, credentials: &Credentials) -> PortResult<Tokens> {
        let request = SignInRequest {
            phone: credentials.phone.clone(),
            password: credentials.password.clone(),
        };

        let reply = self
            .client
            .clone()
            .sign_in(request)
            .await
            .map_err(auth_failure)?;
        Ok(tokens(reply.into_inner()))
    }

    async fn sign_up(&self, registration: &Registration) -> PortResult<Tokens> {
        let request = SignUpRequest {
            phone: registration.phone.clone(),
            password: registration.password.clone(),
            last_name: registration.last_name.clone(),
            first_name: registration.first_name.clone(),
            middle_name: registration.middle_name.clone(),
        };

        let reply = self
            .client
            .clone()
            .sign_up(request)
            .await
            .map_err(|status| match status.code() {
                Code::AlreadyExists => PortError::InvalidRequest(status.message().to_string()),
                _ => auth_failure(status),
            })?;
        Ok(tokens(reply.into_inner()))
    }

    async fn sign_out(&self, access_token: &str) -> PortResult<()> {
        let request = SignOutRequest {
            access_token: access_token.to_string(),
        };

        self.client
            .clone()
            .sign_out(request)
            .await
            .map_err(auth_failure)?;
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> PortResult<Tokens> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };

        let reply = self
            .client
            .clone()
            .refresh(request)
            .await
            .map_err(auth_failure)?;
        Ok(tokens(reply.into_inner()))
    }

    async fn authenticate(&self, access_token: &str, role: Role) -> PortResult<Identity> {
        let request = AuthRequest {
            access_token: access_token.to_string(),
            role: to_proto_role(role) as i32,
        };

        debug!(role = role.as_str(), "authenticating caller");
        let reply = self
            .client
            .clone()
            .auth(request)
            .await
            .map_err(|status| {
                debug!(code = ?status.code(), message = status.message(), "auth rejected");
                auth_failure(status)
            })?
            .into_inner();

        Ok(Identity {
            role: from_proto_role(reply.role()),
            id: reply.user_id,
        })
    }
}

//=========================================================================================
// `UserDirectory` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserDirectory for GrpcAuthAdapter {
    async fn find_user_by_id(&self, id: &str) -> PortResult<User> {
        debug!(user_id = id, "looking up user");
        let reply = self
            .client
            .clone()
            .find_user_by_id(FindUserByIdRequest { id: id.to_string() })
            .await
            .map_err(lookup_failure)?
            .into_inner();

        Ok(User {
            phone: reply.phone,
            last_name: reply.last_name,
            first_name: reply.first_name,
            middle_name: reply.middle_name,
        })
    }
}
