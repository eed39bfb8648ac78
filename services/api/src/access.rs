//! Authentication and ownership checks

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    jwt::TokenService,
    models::Role,
    repositories::UserRepository,
};

/// The caller behind an authenticated request
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Resolve a bearer token to an existing user
///
/// The role is read from the stored user, so a role change takes effect on
/// the next request.
pub async fn authenticate(
    tokens: &TokenService,
    users: &dyn UserRepository,
    token: Option<&str>,
) -> ApiResult<Principal> {
    let token = token.ok_or(ApiError::Unauthenticated)?;

    let claims = tokens.verify(token).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::Unauthenticated
    })?;

    let user = users.find_by_id(claims.sub).await?.ok_or_else(|| {
        warn!("Token for unknown user {}", claims.sub);
        ApiError::Unauthenticated
    })?;

    Ok(Principal {
        id: user.id,
        username: user.username,
        role: user.role,
    })
}

/// Allow admins and the owner of a resource
pub fn authorize(principal: &Principal, owner_id: Uuid) -> ApiResult<()> {
    if principal.is_admin() || principal.id == owner_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub fn require_admin(principal: &Principal) -> ApiResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Biometrics, DietaryProfile, NewUser, User},
        repositories::Repositories,
    };

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            username: "someone".into(),
            role,
        }
    }

    fn user(role: Role) -> User {
        User::create(
            NewUser {
                username: "owner".into(),
                name: "Owner".into(),
                password: "Secret1".into(),
                email: "owner@example.com".into(),
                dietary_profile: DietaryProfile::default(),
                biometrics: Biometrics::default(),
            },
            "hash".into(),
            role,
        )
    }

    #[test]
    fn test_authorize() {
        let regular = principal(Role::Regular);
        assert!(authorize(&regular, regular.id).is_ok());
        assert!(matches!(
            authorize(&regular, Uuid::new_v4()),
            Err(ApiError::Forbidden)
        ));
        assert!(authorize(&principal(Role::Admin), Uuid::new_v4()).is_ok());
        assert!(require_admin(&regular).is_err());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let repos = Repositories::in_memory();
        let tokens = TokenService::new("secret", 600);
        let stored = user(Role::Regular);
        repos.users.insert(&stored).await.unwrap();
        let issued = tokens.issue(&stored).unwrap();

        let principal = authenticate(&tokens, repos.users.as_ref(), Some(&issued.token))
            .await
            .unwrap();
        assert_eq!(principal.id, stored.id);
        assert_eq!(principal.role, Role::Regular);

        for token in [None, Some("garbage")] {
            assert!(matches!(
                authenticate(&tokens, repos.users.as_ref(), token).await,
                Err(ApiError::Unauthenticated)
            ));
        }

        repos.users.delete(stored.id).await.unwrap();
        assert!(matches!(
            authenticate(&tokens, repos.users.as_ref(), Some(&issued.token)).await,
            Err(ApiError::Unauthenticated)
        ));
    }
}
