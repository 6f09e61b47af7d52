/// Caller identity
///
/// Authentication happens upstream of this service; the gateway forwards the
/// verified user id and admin flag as headers. Handlers that need a caller
/// take an `AuthenticatedUser` argument and get a 401 when it is missing.
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let is_admin = headers
            .get(USER_ADMIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        Ok(Self {
            user_id: user_id.to_string(),
            is_admin,
        })
    }

    /// Owners may read their own history; admins may read anyone's
    pub fn ensure_can_read(&self, owner_id: &str) -> Result<(), AppError> {
        if self.is_admin || self.user_id == owner_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "user {} may not read the history of {}",
                self.user_id, owner_id
            )))
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = Self::from_headers(&parts.headers)?;
        tracing::debug!(user_id = %user.user_id, is_admin = user.is_admin, "Caller identified");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_missing_user_is_unauthorized() {
        let result = AuthenticatedUser::from_headers(&headers(&[]));
        assert!(matches!(result, Err(AppError::Unauthorized)));

        let result = AuthenticatedUser::from_headers(&headers(&[(USER_ID_HEADER, "  ")]));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_admin_flag() {
        let user = AuthenticatedUser::from_headers(&headers(&[
            (USER_ID_HEADER, "ada"),
            (USER_ADMIN_HEADER, "TRUE"),
        ]))
        .unwrap();
        assert!(user.is_admin);

        let user = AuthenticatedUser::from_headers(&headers(&[
            (USER_ID_HEADER, "ada"),
            (USER_ADMIN_HEADER, "yes"),
        ]))
        .unwrap();
        assert!(!user.is_admin);
    }

    #[test]
    fn test_read_permissions() {
        let owner = AuthenticatedUser {
            user_id: "ada".to_string(),
            is_admin: false,
        };
        assert!(owner.ensure_can_read("ada").is_ok());
        assert!(matches!(
            owner.ensure_can_read("bob"),
            Err(AppError::Forbidden(_))
        ));

        let admin = AuthenticatedUser {
            user_id: "root".to_string(),
            is_admin: true,
        };
        assert!(admin.ensure_can_read("bob").is_ok());
    }
}
