//! Folder template tree: CRUD over the `folder_templates` table.
//!
//! Each project type owns an independent tree stored as an adjacency list
//! (`parent_id` self-reference, NULL = root). Sibling names are unique per
//! partition, case-insensitively. Sibling order is `sort_order` assigned at
//! creation time; rows are never renumbered on delete.

use rusqlite::{params, ErrorCode};

use super::{DbError, FolderRow, StudioDb};
use crate::tree::{self, FolderNode};

/// Translate a unique-index violation into the domain error. Anything else
/// stays a storage failure.
fn map_insert_err(err: rusqlite::Error, name: &str) -> DbError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            DbError::DuplicateName(name.to_string())
        }
        _ => DbError::Sqlite(err),
    }
}

impl StudioDb {
    /// Resolve a project type name to its storage id.
    pub fn project_type_id(&self, project_type: &str) -> Result<i64, DbError> {
        let mut stmt = self
            .conn_ref()
            .prepare("SELECT id FROM project_types WHERE name = ?1")?;
        let mut rows = stmt.query_map(params![project_type], |row| row.get(0))?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(DbError::UnknownProjectType(project_type.to_string())),
        }
    }

    /// Create a folder under `parent_id` (or at the root when `None`) and
    /// return its new id.
    ///
    /// Runs inside one immediate transaction so the sort-order read and the
    /// insert cannot interleave with a concurrent create.
    pub fn create_folder(
        &self,
        project_type: &str,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<i64, DbError> {
        self.with_transaction(|db| {
            let conn = db.conn_ref();
            let type_id = db.project_type_id(project_type)?;

            // The parent must exist in the same partition.
            if let Some(pid) = parent_id {
                let parent_type: Option<i64> = conn
                    .query_row(
                        "SELECT project_type_id FROM folder_templates WHERE id = ?1",
                        params![pid],
                        |row| row.get(0),
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(DbError::Sqlite(other)),
                    })?;
                match parent_type {
                    Some(t) if t == type_id => {}
                    _ => return Err(DbError::ParentNotFound(pid)),
                }
            }

            // Explicit sibling check: the unique index alone cannot give a
            // friendly error, and `parent_id IS ?` covers NULL roots.
            let duplicates: i64 = conn.query_row(
                "SELECT COUNT(*) FROM folder_templates
                 WHERE project_type_id = ?1 AND parent_id IS ?2
                   AND name = ?3 COLLATE NOCASE",
                params![type_id, parent_id, name],
                |row| row.get(0),
            )?;
            if duplicates > 0 {
                return Err(DbError::DuplicateName(name.to_string()));
            }

            let sort_order: i64 = conn.query_row(
                "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM folder_templates
                 WHERE project_type_id = ?1 AND parent_id IS ?2",
                params![type_id, parent_id],
                |row| row.get(0),
            )?;

            conn.execute(
                "INSERT INTO folder_templates (project_type_id, parent_id, name, sort_order)
                 VALUES (?1, ?2, ?3, ?4)",
                params![type_id, parent_id, name, sort_order],
            )
            .map_err(|e| map_insert_err(e, name))?;

            Ok(conn.last_insert_rowid())
        })
    }

    /// Rename a folder in place.
    ///
    /// Returns `Ok(false)` when no folder has this id. Fails with
    /// `DuplicateName` when the new name collides with a sibling.
    pub fn rename_folder(&self, folder_id: i64, new_name: &str) -> Result<bool, DbError> {
        let conn = self.conn_ref();

        let placement: Option<(i64, Option<i64>)> = conn
            .query_row(
                "SELECT project_type_id, parent_id FROM folder_templates WHERE id = ?1",
                params![folder_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(DbError::Sqlite(other)),
            })?;
        let Some((type_id, parent_id)) = placement else {
            return Ok(false);
        };

        let duplicates: i64 = conn.query_row(
            "SELECT COUNT(*) FROM folder_templates
             WHERE project_type_id = ?1 AND parent_id IS ?2
               AND name = ?3 COLLATE NOCASE AND id != ?4",
            params![type_id, parent_id, new_name, folder_id],
            |row| row.get(0),
        )?;
        if duplicates > 0 {
            return Err(DbError::DuplicateName(new_name.to_string()));
        }

        let changed = conn
            .execute(
                "UPDATE folder_templates SET name = ?1 WHERE id = ?2",
                params![new_name, folder_id],
            )
            .map_err(|e| map_insert_err(e, new_name))?;

        Ok(changed > 0)
    }

    /// Delete a folder and its entire descendant closure atomically.
    ///
    /// The closure is computed with a recursive CTE; the delete itself
    /// removes the root row and lets `ON DELETE CASCADE` take the subtree
    /// with it. Returns the number of rows removed; 0 means the id did not
    /// exist, which is not an error.
    pub fn delete_folder(&self, folder_id: i64) -> Result<usize, DbError> {
        self.with_transaction(|db| {
            let conn = db.conn_ref();
            let closure: i64 = conn.query_row(
                "WITH RECURSIVE descendants AS (
                    SELECT id FROM folder_templates WHERE id = ?1
                    UNION ALL
                    SELECT f.id
                    FROM folder_templates f
                    INNER JOIN descendants d ON f.parent_id = d.id
                 )
                 SELECT COUNT(*) FROM descendants",
                params![folder_id],
                |row| row.get(0),
            )?;
            if closure == 0 {
                return Ok(0);
            }

            conn.execute(
                "DELETE FROM folder_templates WHERE id = ?1",
                params![folder_id],
            )?;
            Ok(closure as usize)
        })
    }

    /// All folders of a partition, parents before children, siblings by
    /// sort order then name. This ordering is the single source of truth
    /// for sibling order; the tree builder consumes rows as-is.
    pub fn list_folders(&self, project_type: &str) -> Result<Vec<FolderRow>, DbError> {
        let type_id = self.project_type_id(project_type)?;

        let mut stmt = self.conn_ref().prepare(
            "SELECT id, parent_id, name, sort_order
             FROM folder_templates
             WHERE project_type_id = ?1
             ORDER BY parent_id ASC NULLS FIRST, sort_order ASC, name ASC",
        )?;
        let rows = stmt.query_map(params![type_id], |row| {
            Ok(FolderRow {
                id: row.get(0)?,
                parent_id: row.get(1)?,
                name: row.get(2)?,
                sort_order: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// The full template forest for a partition.
    pub fn folder_tree(&self, project_type: &str) -> Result<Vec<FolderNode>, DbError> {
        Ok(tree::build_forest(self.list_folders(project_type)?))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_db;
    use super::*;

    #[test]
    fn test_project_type_id_unknown() {
        let db = test_db();
        let err = db.project_type_id("cinematic").expect_err("unknown type");
        assert!(matches!(err, DbError::UnknownProjectType(ref t) if t == "cinematic"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_create_root_folder_starts_sort_at_one() {
        let db = test_db();
        let id = db.create_folder("simple", "Camera", None).expect("create");
        assert!(id > 0);

        let rows = db.list_folders("simple").expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Camera");
        assert_eq!(rows[0].sort_order, 1);
        assert_eq!(rows[0].parent_id, None);
    }

    #[test]
    fn test_sort_order_is_sequential_per_sibling_group() {
        let db = test_db();
        let root = db.create_folder("simple", "Root", None).expect("root");
        db.create_folder("simple", "Second", None).expect("root 2");
        let a = db.create_folder("simple", "A", Some(root)).expect("a");
        db.create_folder("simple", "B", Some(root)).expect("b");
        db.create_folder("simple", "C", Some(a)).expect("c");

        let rows = db.list_folders("simple").expect("list");
        let order_of = |name: &str| {
            rows.iter()
                .find(|r| r.name == name)
                .map(|r| r.sort_order)
                .unwrap()
        };
        assert_eq!(order_of("Root"), 1);
        assert_eq!(order_of("Second"), 2);
        // Child groups restart at 1 independently of the root group
        assert_eq!(order_of("A"), 1);
        assert_eq!(order_of("B"), 2);
        assert_eq!(order_of("C"), 1);
    }

    #[test]
    fn test_duplicate_root_name_rejected() {
        let db = test_db();
        db.create_folder("simple", "Audio", None).expect("first");
        let err = db
            .create_folder("simple", "Audio", None)
            .expect_err("duplicate root");
        assert!(matches!(err, DbError::DuplicateName(ref n) if n == "Audio"));

        // Exactly one Audio root exists afterward
        let rows = db.list_folders("simple").expect("list");
        assert_eq!(rows.iter().filter(|r| r.name == "Audio").count(), 1);
    }

    #[test]
    fn test_duplicate_name_check_is_case_insensitive() {
        let db = test_db();
        db.create_folder("simple", "Footage", None).expect("first");
        let err = db
            .create_folder("simple", "FOOTAGE", None)
            .expect_err("case-folded duplicate");
        assert!(matches!(err, DbError::DuplicateName(_)));

        let rows = db.list_folders("simple").expect("list");
        assert_eq!(rows.len(), 1, "failed create must not alter stored state");
    }

    #[test]
    fn test_same_name_allowed_under_different_parents() {
        let db = test_db();
        let a = db.create_folder("simple", "A", None).expect("a");
        let b = db.create_folder("simple", "B", None).expect("b");
        db.create_folder("simple", "Raw", Some(a)).expect("raw in a");
        db.create_folder("simple", "Raw", Some(b)).expect("raw in b");
    }

    #[test]
    fn test_same_name_allowed_across_project_types() {
        let db = test_db();
        db.create_folder("simple", "Camera", None).expect("simple");
        db.create_folder("large", "Camera", None).expect("large");
    }

    #[test]
    fn test_create_with_missing_parent() {
        let db = test_db();
        let err = db
            .create_folder("simple", "Child", Some(999))
            .expect_err("missing parent");
        assert!(matches!(err, DbError::ParentNotFound(999)));
    }

    #[test]
    fn test_create_with_parent_from_other_partition() {
        let db = test_db();
        let other = db.create_folder("large", "Root", None).expect("large root");
        let err = db
            .create_folder("simple", "Child", Some(other))
            .expect_err("cross-partition parent");
        assert!(matches!(err, DbError::ParentNotFound(p) if p == other));
    }

    #[test]
    fn test_create_unknown_project_type() {
        let db = test_db();
        let err = db
            .create_folder("cinematic", "Camera", None)
            .expect_err("unknown type");
        assert!(matches!(err, DbError::UnknownProjectType(_)));
    }

    #[test]
    fn test_rename_folder() {
        let db = test_db();
        let id = db.create_folder("simple", "Audoi", None).expect("create");

        assert!(db.rename_folder(id, "Audio").expect("rename"));

        let rows = db.list_folders("simple").expect("list");
        assert_eq!(rows[0].name, "Audio");
    }

    #[test]
    fn test_rename_missing_id_returns_false() {
        let db = test_db();
        let changed = db.rename_folder(12345, "X").expect("no error");
        assert!(!changed);
    }

    #[test]
    fn test_rename_to_sibling_name_rejected() {
        let db = test_db();
        let root = db.create_folder("simple", "Root", None).expect("root");
        db.create_folder("simple", "Camera", Some(root)).expect("camera");
        let audio = db.create_folder("simple", "Audio", Some(root)).expect("audio");

        let err = db
            .rename_folder(audio, "camera")
            .expect_err("sibling collision (case-insensitive)");
        assert!(matches!(err, DbError::DuplicateName(_)));

        // Renaming to its own current name is fine
        assert!(db.rename_folder(audio, "Audio").expect("self rename"));
    }

    #[test]
    fn test_delete_removes_subtree_only() {
        let db = test_db();
        // A -> B -> C, plus unrelated root D
        let a = db.create_folder("simple", "A", None).expect("a");
        let b = db.create_folder("simple", "B", Some(a)).expect("b");
        db.create_folder("simple", "C", Some(b)).expect("c");
        let d = db.create_folder("simple", "D", None).expect("d");

        let removed = db.delete_folder(a).expect("delete");
        assert_eq!(removed, 3, "A, B and C are the closure of A");

        let rows = db.list_folders("simple").expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, d);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let db = test_db();
        db.create_folder("simple", "Keep", None).expect("create");

        let removed = db.delete_folder(999).expect("no error");
        assert_eq!(removed, 0);
        assert_eq!(db.list_folders("simple").expect("list").len(), 1);
    }

    #[test]
    fn test_list_orders_roots_first_then_sort_then_name() {
        let db = test_db();
        let root2 = db.create_folder("simple", "Zulu", None).expect("zulu");
        let root1 = db.create_folder("simple", "Alpha", None).expect("alpha");
        db.create_folder("simple", "Child", Some(root2)).expect("child");

        // Force a sort-order tie between the roots so the name decides
        db.conn_ref()
            .execute(
                "UPDATE folder_templates SET sort_order = 1 WHERE id = ?1",
                params![root1],
            )
            .expect("tie sort order");

        let rows = db.list_folders("simple").expect("list");
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zulu", "Child"]);
    }

    #[test]
    fn test_folder_tree_round_trip() {
        let db = test_db();
        let root = db.create_folder("simple", "Root", None).expect("root");
        db.create_folder("simple", "First", Some(root)).expect("first");
        db.create_folder("simple", "Second", Some(root)).expect("second");

        let forest = db.folder_tree("simple").expect("tree");
        assert_eq!(forest.len(), 1);
        let children: Vec<&str> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["First", "Second"]);

        let flat = crate::tree::flatten_preorder(&forest);
        let mut stored: Vec<i64> = db.list_folders("simple").expect("list").iter().map(|r| r.id).collect();
        let mut flat_sorted = flat.clone();
        flat_sorted.sort_unstable();
        stored.sort_unstable();
        assert_eq!(flat_sorted, stored, "tree contains exactly the stored ids");
    }
}
