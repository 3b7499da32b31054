//! Group and membership storage.
//!
//! A group row holds the name; membership lives in the `group_members`
//! join table so a participant can belong to many groups.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use divvy_core::Group;

use crate::error::{DbError, DbResult};

/// Group storage and membership management.
#[derive(Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a group and its member rows in one transaction.
    ///
    /// Members must already exist in `participants` (FK enforced).
    pub async fn insert(&self, group: &Group) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO friend_groups (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&group.id)
            .bind(&group.name)
            .bind(group.created_at)
            .execute(&mut *tx)
            .await?;

        for member_id in &group.member_ids {
            sqlx::query("INSERT INTO group_members (group_id, participant_id) VALUES (?, ?)")
                .bind(&group.id)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!(id = %group.id, name = %group.name, members = group.member_ids.len(), "Group inserted");
        Ok(())
    }

    /// Fetches a group with its current members.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Group> {
        let row = sqlx::query("SELECT id, name, created_at FROM friend_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Group", id))?;

        let created_at: DateTime<Utc> = row.get("created_at");
        let member_ids = self.member_ids(id).await?;

        Ok(Group {
            id: row.get("id"),
            name: row.get("name"),
            member_ids,
            created_at,
        })
    }

    /// Lists all groups, oldest first, members included.
    pub async fn list(&self) -> DbResult<Vec<Group>> {
        let rows = sqlx::query("SELECT id FROM friend_groups ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            groups.push(self.get_by_id(&id).await?);
        }
        Ok(groups)
    }

    /// Adds a member to an existing group.
    pub async fn add_member(&self, group_id: &str, participant_id: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO group_members (group_id, participant_id) VALUES (?, ?)")
            .bind(group_id)
            .bind(participant_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes a member. Historical ledger entries are unaffected.
    pub async fn remove_member(&self, group_id: &str, participant_id: &str) -> DbResult<()> {
        let result =
            sqlx::query("DELETE FROM group_members WHERE group_id = ? AND participant_id = ?")
                .bind(group_id)
                .bind(participant_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Group member", participant_id));
        }
        Ok(())
    }

    async fn member_ids(&self, group_id: &str) -> DbResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT participant_id FROM group_members WHERE group_id = ? ORDER BY participant_id",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| r.get("participant_id")).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use divvy_core::Participant;

    async fn setup() -> (Database, Participant, Participant) {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
        let a = Participant::new("Aditi");
        let b = Participant::new("Ben");
        db.participants().insert(&a).await.unwrap();
        db.participants().insert(&b).await.unwrap();
        (db, a, b)
    }

    #[tokio::test]
    async fn insert_and_fetch_with_members() {
        let (db, a, b) = setup().await;

        let group = Group::new("Goa Trip", vec![a.id.clone(), b.id.clone()]);
        db.groups().insert(&group).await.unwrap();

        let fetched = db.groups().get_by_id(&group.id).await.unwrap();
        assert_eq!(fetched.name, "Goa Trip");
        assert_eq!(fetched.member_ids.len(), 2);
        assert!(fetched.is_member(&a.id));
    }

    #[tokio::test]
    async fn unknown_member_fails_whole_insert() {
        let (db, a, _) = setup().await;

        let group = Group::new("Bad", vec![a.id.clone(), "ghost".to_string()]);
        let err = db.groups().insert(&group).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // transaction rolled back, the group row must not exist
        let err = db.groups().get_by_id(&group.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn membership_changes() {
        let (db, a, b) = setup().await;

        let group = Group::new("Flat", vec![a.id.clone()]);
        db.groups().insert(&group).await.unwrap();

        db.groups().add_member(&group.id, &b.id).await.unwrap();
        let fetched = db.groups().get_by_id(&group.id).await.unwrap();
        assert_eq!(fetched.member_ids.len(), 2);

        db.groups().remove_member(&group.id, &a.id).await.unwrap();
        let fetched = db.groups().get_by_id(&group.id).await.unwrap();
        assert_eq!(fetched.member_ids, vec![b.id.clone()]);
    }
}
