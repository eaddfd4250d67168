//! Session identity
//!
//! A single signed-in operator is kept under the `user` key. There is no
//! password check; the identity is only required to be non-blank.

use crate::error::{AppError, AppResult};
use crate::store::Store;
use shared::{validate_not_blank, Role, User};

/// Session service
#[derive(Clone)]
pub struct SessionService {
    store: Store,
}

impl SessionService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Sign in as `id`, replacing any current session
    pub fn login(&self, id: &str, role: Role) -> AppResult<User> {
        let id = id.trim();
        if validate_not_blank(id).is_err() {
            return Err(AppError::validation("id", "User id is required"));
        }

        let user = User {
            id: id.to_string(),
            role,
        };
        self.store.save_user(&user)?;
        tracing::info!(user_id = %user.id, role = ?user.role, "user signed in");
        Ok(user)
    }

    /// The signed-in user; `None` means the login prompt should be shown
    pub fn current_user(&self) -> AppResult<Option<User>> {
        self.store.load_user()
    }

    pub fn require_user(&self) -> AppResult<User> {
        self.current_user()?.ok_or(AppError::NotAuthenticated)
    }

    pub fn logout(&self) -> AppResult<()> {
        self.store.clear_user()?;
        tracing::info!("user signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_round_trip() {
        let sessions = SessionService::new(Store::in_memory());
        assert!(sessions.current_user().unwrap().is_none());

        let user = sessions.login("  operator-1 ", Role::Admin).unwrap();
        assert_eq!(user.id, "operator-1");
        assert_eq!(sessions.require_user().unwrap(), user);

        sessions.logout().unwrap();
        assert!(matches!(
            sessions.require_user(),
            Err(AppError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_blank_id_rejected() {
        let sessions = SessionService::new(Store::in_memory());
        let err = sessions.login("   ", Role::User).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "id"));
        assert!(sessions.current_user().unwrap().is_none());
    }
}
