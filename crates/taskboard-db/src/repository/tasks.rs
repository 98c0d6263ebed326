//! Task operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewTask, Task, UpdateTask};
use crate::repository::Database;

impl Database {
    // ==================== Task Operations ====================

    /// Insert a new task
    pub async fn insert_task(&self, task: NewTask) -> Result<Task, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (project_id, task_name, status, task_details, remark, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(task.project_id)
        .bind(&task.task_name)
        .bind(&task.status)
        .bind(&task.task_details)
        .bind(&task.remark)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Task {
            id,
            project_id: task.project_id,
            task_name: task.task_name,
            status: task.status,
            task_details: task.task_details,
            remark: task.remark,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, project_id, task_name, status, task_details, remark, created_at, updated_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Task::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List the tasks of a project
    pub async fn list_tasks_by_project(&self, project_id: i64) -> Result<Vec<Task>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, project_id, task_name, status, task_details, remark, created_at, updated_at
            FROM tasks
            WHERE project_id = ?
            ORDER BY id
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Task::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update a task
    ///
    /// Returns `None` when no task has the given ID.
    pub async fn update_task(&self, id: i64, update: UpdateTask) -> Result<Option<Task>, DbError> {
        if update.is_empty() {
            return self.get_task(id).await;
        }

        let now = Utc::now();

        // Build dynamic update query
        let mut updates = vec!["updated_at = ?"];
        if update.project_id.is_some() {
            updates.push("project_id = ?");
        }
        if update.task_name.is_some() {
            updates.push("task_name = ?");
        }
        if update.status.is_some() {
            updates.push("status = ?");
        }
        if update.task_details.is_some() {
            updates.push("task_details = ?");
        }
        if update.remark.is_some() {
            updates.push("remark = ?");
        }

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", updates.join(", "));
        let mut query = sqlx::query(&sql);

        // Bind in the same order as the SET clauses
        query = query.bind(now.to_rfc3339());
        if let Some(v) = update.project_id {
            query = query.bind(v);
        }
        if let Some(ref v) = update.task_name {
            query = query.bind(v);
        }
        if let Some(ref v) = update.status {
            query = query.bind(v);
        }
        if let Some(ref v) = update.task_details {
            query = query.bind(v);
        }
        if let Some(ref v) = update.remark {
            query = query.bind(v);
        }
        query = query.bind(id);

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_task(id).await
    }

    /// Delete a task
    pub async fn delete_task(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
