//! Project operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewProject, Project, ProjectWithOwner};
use crate::repository::Database;

impl Database {
    // ==================== Project Operations ====================

    /// Insert a new project
    pub async fn insert_project(&self, project: NewProject) -> Result<Project, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO projects (project_name, user_id, created_date, priority, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&project.project_name)
        .bind(project.user_id)
        .bind(project.created_date.to_rfc3339())
        .bind(&project.priority)
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Project {
            id,
            project_name: project.project_name,
            user_id: project.user_id,
            created_date: project.created_date,
            priority: project.priority,
            created_at: now,
        })
    }

    /// List all projects with the owning user's name resolved
    pub async fn list_projects_with_owner(&self) -> Result<Vec<ProjectWithOwner>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.project_name, p.user_id, p.created_date, p.priority, p.created_at,
                   u.name AS owner_name
            FROM projects p
            LEFT JOIN users u ON u.id = p.user_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ProjectWithOwner::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::Database;
    use crate::models::{NewProject, NewUser, UserRole};

    #[tokio::test]
    async fn test_projects_resolve_owner_name() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let owner = db
            .insert_user(NewUser {
                name: "Owner".to_string(),
                email: "owner@x.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();

        let created_date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let project = db
            .insert_project(NewProject {
                project_name: "Launch".to_string(),
                user_id: owner.id,
                created_date,
                priority: "high".to_string(),
            })
            .await
            .unwrap();

        // Dangling owner reference
        db.insert_project(NewProject {
            project_name: "Orphan".to_string(),
            user_id: 9999,
            created_date,
            priority: "low".to_string(),
        })
        .await
        .unwrap();

        let projects = db.list_projects_with_owner().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].project.id, project.id);
        assert_eq!(projects[0].project.created_date, created_date);
        assert_eq!(projects[0].project.project_name, "Launch");
        assert_eq!(projects[0].owner_name.as_deref(), Some("Owner"));
        assert_eq!(projects[1].owner_name, None);
    }
}
