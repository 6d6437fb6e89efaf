use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use axum::http::HeaderMap;
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{unauthorized_error, Error};

/// The per-request session identity: who is acting, for which organization,
/// with which roles. Built once at the HTTP boundary from the identity
/// headers the fronting auth gateway injects, then passed explicitly to
/// every engine operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub roles: Vec<String>,
}

impl User {
    pub fn member(organization_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            roles: vec![],
        }
    }

    pub fn admin(organization_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            roles: vec!["admin".into()],
        }
    }

    fn has_role(&self, role: String) -> bool {
        self.roles.iter().find(|&x| x == &role).is_some()
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id.clone())
            .add_attribute_getter("organization_id", |recv: &User| {
                recv.organization_id.clone()
            })
            .add_attribute_getter("roles", |recv: &User| recv.roles.clone())
            .add_method("has_role", User::has_role)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for User {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let headers = req.headers();

        let id = header_uuid(headers, "x-user-id")?;
        let organization_id = header_uuid(headers, "x-organization-id")?;

        let roles = headers
            .get("x-user-roles")
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .split(',')
                    .map(|role| role.trim().to_string())
                    .filter(|role| !role.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id,
            organization_id,
            roles,
        })
    }
}

fn header_uuid(headers: &HeaderMap, name: &str) -> Result<Uuid, Error> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or_else(|| unauthorized_error())
}
