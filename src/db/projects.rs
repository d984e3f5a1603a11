//! Finished-project catalog: which disk a project lives on and whether it
//! has been backed up.

use chrono::Utc;
use rusqlite::params;

use super::{DbError, NewProject, ProjectFilter, ProjectRecord, StudioDb};

const PROJECT_COLUMNS: &str = "id, disk_id, project_date, project_name, backup_status,
        notes, project_path, filename, created_at, updated_at";

impl StudioDb {
    /// Helper: map a row to `ProjectRecord`.
    pub(crate) fn map_project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectRecord> {
        Ok(ProjectRecord {
            id: row.get(0)?,
            disk_id: row.get(1)?,
            project_date: row.get(2)?,
            project_name: row.get(3)?,
            backup_status: row.get::<_, i32>(4)? != 0,
            notes: row.get(5)?,
            project_path: row.get(6)?,
            filename: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    /// Insert a catalog row and return its new id.
    pub fn add_project(&self, project: &NewProject) -> Result<i64, DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn_ref().execute(
            "INSERT INTO projects (
                disk_id, project_date, project_name, backup_status,
                notes, project_path, filename, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                project.disk_id,
                project.project_date,
                project.project_name,
                project.backup_status as i32,
                project.notes,
                project.project_path,
                project.filename,
                now,
            ],
        )?;
        Ok(self.conn_ref().last_insert_rowid())
    }

    /// Full-row update. Returns `Ok(false)` when the id is absent.
    pub fn update_project(&self, id: i64, project: &NewProject) -> Result<bool, DbError> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn_ref().execute(
            "UPDATE projects SET
                disk_id = ?1, project_date = ?2, project_name = ?3,
                backup_status = ?4, notes = ?5, project_path = ?6,
                filename = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                project.disk_id,
                project.project_date,
                project.project_name,
                project.backup_status as i32,
                project.notes,
                project.project_path,
                project.filename,
                now,
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Flip just the backup flag.
    pub fn set_backup_status(&self, id: i64, backed_up: bool) -> Result<bool, DbError> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn_ref().execute(
            "UPDATE projects SET backup_status = ?1, updated_at = ?2 WHERE id = ?3",
            params![backed_up as i32, now, id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a catalog row. Returns `Ok(false)` when the id is absent.
    pub fn delete_project(&self, id: i64) -> Result<bool, DbError> {
        let changed = self
            .conn_ref()
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Query the catalog. Every set filter field must match; the free-text
    /// search covers name, notes, path and filename. Ordered by disk then
    /// newest project date first.
    pub fn get_projects(&self, filter: &ProjectFilter) -> Result<Vec<ProjectRecord>, DbError> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(disk_id) = &filter.disk_id {
            clauses.push("disk_id = ?");
            args.push(Box::new(disk_id.clone()));
        }
        if let Some(backed_up) = filter.backup_status {
            clauses.push("backup_status = ?");
            args.push(Box::new(backed_up as i32));
        }
        if let Some(from) = &filter.date_from {
            clauses.push("project_date >= ?");
            args.push(Box::new(from.clone()));
        }
        if let Some(to) = &filter.date_to {
            clauses.push("project_date <= ?");
            args.push(Box::new(to.clone()));
        }
        if let Some(text) = &filter.search_text {
            clauses.push(
                "(project_name LIKE ? OR notes LIKE ? OR project_path LIKE ? OR filename LIKE ?)",
            );
            let pattern = format!("%{}%", text);
            for _ in 0..4 {
                args.push(Box::new(pattern.clone()));
            }
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects{}
             ORDER BY disk_id ASC, project_date DESC",
            where_clause
        );

        let mut stmt = self.conn_ref().prepare(&sql)?;
        let bound: Vec<&dyn rusqlite::types::ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let rows = stmt.query_map(bound.as_slice(), Self::map_project_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct disk ids, sorted. Used to populate the disk filter dropdown.
    pub fn disk_ids(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn_ref()
            .prepare("SELECT DISTINCT disk_id FROM projects ORDER BY disk_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

// =============================================================================
// Tests
// =============================================================================
