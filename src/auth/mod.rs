//! Actor identity and capability-based authorization.
//!
//! The upstream identity layer terminates sessions and forwards the resolved
//! actor as trusted headers; this module turns those into an [`Actor`] and
//! answers capability questions through the [`Authorizer`] interface instead
//! of scattering role-string checks through handlers.

pub mod permissions;
pub mod rbac;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::ServiceError;

const ACTOR_ID_HEADER: &str = "x-actor-id";
const ACTOR_ROLE_HEADER: &str = "x-actor-role";
const ACTOR_DEPARTMENT_HEADER: &str = "x-actor-department";

/// Authenticated caller, scoped to one department
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub role: String,
    pub department_id: Uuid,
}

/// Denied capability check
#[derive(Debug, Error)]
#[error("role '{role}' lacks permission '{permission}'")]
pub struct AccessDenied {
    pub role: String,
    pub permission: String,
}

/// Capability check: `authorize(actor, action) -> Allowed | Denied(reason)`
pub trait Authorizer: Send + Sync {
    fn authorize(&self, actor: &Actor, permission: &str) -> Result<(), AccessDenied>;
}

/// Authorizer backed by the static role tables in [`rbac`]
#[derive(Debug, Clone, Default)]
pub struct RbacAuthorizer;

impl Authorizer for RbacAuthorizer {
    fn authorize(&self, actor: &Actor, permission: &str) -> Result<(), AccessDenied> {
        if rbac::role_has_permission(&actor.role, permission) {
            Ok(())
        } else {
            Err(AccessDenied {
                role: actor.role.clone(),
                permission: permission.to_string(),
            })
        }
    }
}

impl From<AccessDenied> for ServiceError {
    fn from(denied: AccessDenied) -> Self {
        ServiceError::Forbidden(denied.to_string())
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ServiceError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::Unauthorized(format!("missing {} header", name)))
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_str(parts, ACTOR_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| ServiceError::Unauthorized("malformed actor id".to_string()))?;
        let role = header_str(parts, ACTOR_ROLE_HEADER)?.to_string();
        let department_id = header_str(parts, ACTOR_DEPARTMENT_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| ServiceError::Unauthorized("malformed department id".to_string()))?;

        Ok(Actor {
            id,
            role,
            department_id,
        })
    }
}
