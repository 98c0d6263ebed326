//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidUserRole(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidUserRole(s) => write!(f, "Invalid user role: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// User role
///
/// `Unassigned` is a valid persisted state and is stored as the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    User,
    #[default]
    Unassigned,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Unassigned => "",
        }
    }
}

impl FromStr for UserRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            "" => Ok(UserRole::Unassigned),
            _ => Err(ParseError::InvalidUserRole(s.to_string())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        UserRole::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub project_name: String,
    pub user_id: i64,
    pub created_date: DateTime<Utc>,
    pub priority: String,
    pub created_at: DateTime<Utc>,
}

/// New project (for insertion)
#[derive(Debug, Clone)]
pub struct NewProject {
    pub project_name: String,
    pub user_id: i64,
    pub created_date: DateTime<Utc>,
    pub priority: String,
}

/// Project joined with its owner's name
///
/// The owner fields are `None` when the referenced user no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithOwner {
    pub project: Project,
    pub owner_name: Option<String>,
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub task_name: String,
    pub status: String,
    pub task_details: String,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New task (for insertion)
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: i64,
    pub task_name: String,
    pub status: String,
    pub task_details: String,
    pub remark: String,
}

/// Update task (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub project_id: Option<i64>,
    pub task_name: Option<String>,
    pub status: Option<String>,
    pub task_details: Option<String>,
    pub remark: Option<String>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.task_name.is_none()
            && self.status.is_none()
            && self.task_details.is_none()
            && self.remark.is_none()
    }
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_str: String = row.try_get("role")?;
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: UserRole::from_str(&role_str).unwrap_or_default(),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Project {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.try_get("id")?,
            project_name: row.try_get("project_name")?,
            user_id: row.try_get("user_id")?,
            created_date: parse_datetime_or_now(&row.try_get::<String, _>("created_date")?),
            priority: row.try_get("priority")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for ProjectWithOwner {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(ProjectWithOwner {
            project: Project::try_from(row)?,
            owner_name: row.try_get("owner_name")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Task {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            task_name: row.try_get("task_name")?,
            status: row.try_get("status")?,
            task_details: row.try_get("task_details")?,
            remark: row.try_get("remark")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_parsing() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!("".parse::<UserRole>().unwrap(), UserRole::Unassigned);
        assert!("superuser".parse::<UserRole>().is_err());
        assert!("Admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_role_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&UserRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&UserRole::Unassigned).unwrap(), "\"\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: 1,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());
        let update = UpdateTask {
            status: Some("done".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
