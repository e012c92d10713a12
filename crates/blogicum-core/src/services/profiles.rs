use uuid::Uuid;

use super::{BlogService, REQUIRED};
use crate::domain::{ProfileUpdate, User};
use crate::error::{DomainError, FieldErrors};

const USERNAME_MAX_CHARS: usize = 150;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

impl BlogService {
    pub async fn profile(&self, viewer: Uuid) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_id(viewer)
            .await?
            .ok_or_else(|| DomainError::not_found("user", viewer))
    }

    /// Create an account. `password_hash` is already hashed by the caller.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<User, DomainError> {
        let mut errors = FieldErrors::new();
        check_username(&username, &mut errors);
        errors.into_result()?;

        if self.repos.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Duplicate(USERNAME_TAKEN.to_string()));
        }

        let user = User::new(username, email, password_hash);
        Ok(self.repos.users.insert(user).await?)
    }

    /// Change the viewer's own name, username and email.
    pub async fn update_profile(
        &self,
        viewer: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.profile(viewer).await?;

        let mut errors = FieldErrors::new();
        check_username(&update.username, &mut errors);
        if !errors.contains("username") && update.username != user.username {
            if let Some(other) = self.repos.users.find_by_username(&update.username).await? {
                if other.id != user.id {
                    errors.add("username", USERNAME_TAKEN);
                }
            }
        }
        errors.into_result()?;

        user.apply(update);
        Ok(self.repos.users.update(user).await?)
    }
}

/// Letters, digits and `@ . + - _` only.
fn check_username(username: &str, errors: &mut FieldErrors) {
    if username.is_empty() {
        errors.add("username", REQUIRED);
    } else if username.chars().count() > USERNAME_MAX_CHARS {
        errors.add(
            "username",
            format!("Ensure this value has at most {USERNAME_MAX_CHARS} characters."),
        );
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_username() {
        let mut errors = FieldErrors::new();
        check_username("anna.k+blog@home", &mut errors);
        assert!(errors.is_empty());

        check_username("no spaces", &mut errors);
        assert!(errors.contains("username"));

        let mut errors = FieldErrors::new();
        check_username("", &mut errors);
        assert!(errors.contains("username"));
    }
}
