//! User domain entity and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::id::{Id, IdError};
use crate::config::{USER_TYPE_ADMIN, USER_TYPE_PROFESSOR, USER_TYPE_STUDENT};
use crate::errors::AppError;

/// Field-level invariant violations of [`User`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("invalid email format")]
    InvalidEmail,

    #[error("first name cannot be empty")]
    EmptyFirstName,

    #[error("last name cannot be empty")]
    EmptyLastName,

    #[error("invalid user type")]
    InvalidUserType,

    #[error("password hash cannot be empty")]
    EmptyPasswordHash,

    #[error("invalid ID: {0}")]
    InvalidId(#[from] IdError),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        AppError::invalid_input_with(err, message)
    }
}

/// Kind of account on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Professor,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => USER_TYPE_STUDENT,
            UserType::Professor => USER_TYPE_PROFESSOR,
            UserType::Admin => USER_TYPE_ADMIN,
        }
    }
}

impl FromStr for UserType {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            USER_TYPE_STUDENT => Ok(UserType::Student),
            USER_TYPE_PROFESSOR => Ok(UserType::Professor),
            USER_TYPE_ADMIN => Ok(UserType::Admin),
            _ => Err(UserError::InvalidUserType),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Local part per RFC 5322 atext plus dots; domain labels 1-63 chars with no
// leading or trailing hyphen, and at least one dot.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email regex is valid")
});

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), UserError> {
    if email.is_empty() || !EMAIL_REGEX.is_match(email) {
        return Err(UserError::InvalidEmail);
    }
    Ok(())
}

/// Check a raw email against the same grammar the entity enforces.
pub fn is_valid_email(email: &str) -> bool {
    validate_email(&normalize_email(email)).is_ok()
}

fn require_name(value: &str, err: UserError) -> Result<String, UserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

/// User aggregate.
///
/// Fields are private: state changes go through the methods below, each of
/// which keeps the invariants and refreshes `updated_at`.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: Id,
    email: String,
    #[serde(skip_serializing)]
    password_hash: String,
    first_name: String,
    last_name: String,
    user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, validated user with a fresh identifier.
    ///
    /// # Errors
    /// Returns the first invariant violation, checked in the order
    /// email, password hash, first name, last name, user type.
    pub fn new(
        email: &str,
        password_hash: String,
        first_name: &str,
        last_name: &str,
        user_type: &str,
        avatar_url: Option<String>,
    ) -> Result<Self, UserError> {
        let email = normalize_email(email);
        validate_email(&email)?;

        if password_hash.is_empty() {
            return Err(UserError::EmptyPasswordHash);
        }

        let first_name = require_name(first_name, UserError::EmptyFirstName)?;
        let last_name = require_name(last_name, UserError::EmptyLastName)?;
        let user_type = UserType::from_str(user_type)?;

        let now = Utc::now();
        Ok(Self {
            id: Id::new(),
            email,
            password_hash,
            first_name,
            last_name,
            user_type,
            avatar_url,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a user from trusted storage without re-validating.
    ///
    /// Email and names are still normalized.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Id,
        email: &str,
        password_hash: String,
        first_name: &str,
        last_name: &str,
        user_type: UserType,
        avatar_url: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: normalize_email(email),
            password_hash,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            user_type,
            avatar_url,
            is_active,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_student(&self) -> bool {
        self.user_type == UserType::Student
    }

    pub fn is_professor(&self) -> bool {
        self.user_type == UserType::Professor
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// Attach the avatar URL while building a new user; timestamps stay as
    /// created.
    pub fn with_avatar_url(mut self, avatar_url: String) -> Self {
        self.avatar_url = Some(avatar_url);
        self
    }

    /// Replace the avatar URL of an existing user.
    pub fn assign_avatar(&mut self, avatar_url: String) {
        self.avatar_url = Some(avatar_url);
        self.updated_at = Utc::now();
    }

    /// Update names and avatar; rejects blank names.
    pub fn update_profile(
        &mut self,
        first_name: &str,
        last_name: &str,
        avatar_url: Option<String>,
    ) -> Result<(), UserError> {
        let first_name = require_name(first_name, UserError::EmptyFirstName)?;
        let last_name = require_name(last_name, UserError::EmptyLastName)?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.avatar_url = avatar_url;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace the password hash; rejects an empty hash.
    pub fn update_password(&mut self, password_hash: String) -> Result<(), UserError> {
        if password_hash.is_empty() {
            return Err(UserError::EmptyPasswordHash);
        }

        self.password_hash = password_hash;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Re-check every invariant. Never mutates.
    pub fn validate(&self) -> Result<(), UserError> {
        self.id.validate()?;
        validate_email(&self.email)?;

        if self.password_hash.is_empty() {
            return Err(UserError::EmptyPasswordHash);
        }
        if self.first_name.trim().is_empty() {
            return Err(UserError::EmptyFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(UserError::EmptyLastName);
        }

        Ok(())
    }
}
