use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - represents a registered author or reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: ProfileUpdate) {
        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.username = update.username;
        self.email = update.email;
        self.updated_at = Utc::now();
    }
}
