//! The group directory: which groups exist and who belongs to them.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId};

/// Alias for the integer type used for group IDs.
pub type GroupId = DatabaseId;

/// Code 787 occurs when a FOREIGN KEY constraint failed.
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

/// A set of people who share expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// The ID of the group.
    pub id: GroupId,
    /// The display name of the group.
    pub name: String,
    /// When the group was created.
    pub created_at: OffsetDateTime,
}

/// A person who belongs to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The member's user ID, as issued by the identity provider.
    pub user_id: String,
    /// The member's display name.
    pub name: String,
}

/// Create the tables for groups and group memberships.
pub fn create_group_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense_group (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS group_member (
            group_id INTEGER NOT NULL,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            PRIMARY KEY (group_id, user_id),
            FOREIGN KEY(group_id) REFERENCES expense_group(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_group_member_user_id ON group_member(user_id);",
    )?;

    Ok(())
}

/// Create a group named `name` with `creator` as its first member.
///
/// # Errors
/// Returns [Error::EmptyGroupName] if `name` is blank, [Error::EmptyMemberId]
/// if the creator has no user ID, or [Error::SqlError] if the group could not
/// be saved. The group and the membership are saved together or not at all.
pub fn create_group(name: &str, creator: &Member, connection: &Connection) -> Result<Group, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyGroupName);
    }

    let transaction = connection.unchecked_transaction()?;
    let created_at = OffsetDateTime::now_utc();

    transaction.execute(
        "INSERT INTO expense_group (name, created_at) VALUES (?1, ?2)",
        (name, created_at),
    )?;
    let group = Group {
        id: transaction.last_insert_rowid(),
        name: name.to_owned(),
        created_at,
    };
    add_member(group.id, creator, &transaction)?;

    transaction.commit()?;

    Ok(group)
}

/// Add `member` to a group, or update their display name if they already
/// belong to it.
///
/// # Errors
/// Returns [Error::EmptyMemberId] if the member has no user ID,
/// [Error::NotFound] if the group does not exist, or [Error::SqlError] for any
/// other SQL error.
pub fn add_member(group_id: GroupId, member: &Member, connection: &Connection) -> Result<(), Error> {
    let user_id = member.user_id.trim();

    if user_id.is_empty() {
        return Err(Error::EmptyMemberId);
    }

    let name = match member.name.trim() {
        "" => user_id,
        name => name,
    };

    connection
        .execute(
            "INSERT INTO group_member (group_id, user_id, name) VALUES (?1, ?2, ?3)
            ON CONFLICT(group_id, user_id) DO UPDATE SET name = excluded.name",
            (group_id, user_id, name),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, _)
                if error.extended_code == SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Error::NotFound
            }
            error => error.into(),
        })?;

    Ok(())
}

/// Retrieve a single group by ID.
pub fn get_group(group_id: GroupId, connection: &Connection) -> Result<Group, Error> {
    connection
        .prepare("SELECT id, name, created_at FROM expense_group WHERE id = :id")?
        .query_row(&[(":id", &group_id)], map_row_to_group)
        .map_err(Error::from)
}

/// Retrieve the groups `user_id` belongs to, ordered by name.
pub fn get_groups_for_user(user_id: &str, connection: &Connection) -> Result<Vec<Group>, Error> {
    connection
        .prepare(
            "SELECT g.id, g.name, g.created_at
            FROM expense_group g
            INNER JOIN group_member m ON m.group_id = g.id
            WHERE m.user_id = :user_id
            ORDER BY g.name ASC, g.id ASC",
        )?
        .query_map(&[(":user_id", &user_id)], map_row_to_group)?
        .map(|maybe_group| maybe_group.map_err(Error::from))
        .collect()
}

/// Retrieve the members of a group ordered by display name.
pub fn get_members(group_id: GroupId, connection: &Connection) -> Result<Vec<Member>, Error> {
    connection
        .prepare(
            "SELECT user_id, name FROM group_member
            WHERE group_id = :group_id
            ORDER BY name ASC, user_id ASC",
        )?
        .query_map(&[(":group_id", &group_id)], |row| {
            Ok(Member {
                user_id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .map(|maybe_member| maybe_member.map_err(Error::from))
        .collect()
}

/// Whether `user_id` belongs to the group.
pub fn is_member(group_id: GroupId, user_id: &str, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM group_member WHERE group_id = ?1 AND user_id = ?2)",
            (group_id, user_id),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Check that `user_id` belongs to the group.
///
/// # Errors
/// Returns [Error::NotGroupMember] if they do not, including when the group
/// does not exist.
pub fn require_membership(
    group_id: GroupId,
    user_id: &str,
    connection: &Connection,
) -> Result<(), Error> {
    if is_member(group_id, user_id, connection)? {
        Ok(())
    } else {
        Err(Error::NotGroupMember)
    }
}

/// Delete a group along with its memberships, expenses and splits.
///
/// # Errors
/// Returns [Error::DeleteMissingGroup] if the group does not exist.
pub fn delete_group(group_id: GroupId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense_group WHERE id = ?1", [group_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGroup);
    }

    Ok(())
}

fn map_row_to_group(row: &Row) -> Result<Group, rusqlite::Error> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

#[cfg(test)]
mod group_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        group::core::{
            Member, add_member, create_group, delete_group, get_group, get_groups_for_user,
            get_members, is_member, require_membership,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn member(user_id: &str, name: &str) -> Member {
        Member {
            user_id: user_id.to_owned(),
            name: name.to_owned(),
        }
    }

    #[test]
    fn create_group_adds_creator_as_member() {
        let connection = get_test_connection();

        let group = create_group("Flat", &member("alice", "Alice"), &connection).unwrap();

        assert_eq!(group.name, "Flat");
        assert_eq!(
            get_members(group.id, &connection),
            Ok(vec![member("alice", "Alice")])
        );
        let got = get_group(group.id, &connection).unwrap();
        assert_eq!(got.id, group.id);
        assert_eq!(got.name, group.name);
    }

    #[test]
    fn create_group_fails_on_blank_name() {
        let connection = get_test_connection();

        let result = create_group("  \t", &member("alice", "Alice"), &connection);

        assert_eq!(result, Err(Error::EmptyGroupName));
    }

    #[test]
    fn create_group_rolls_back_on_invalid_creator() {
        let connection = get_test_connection();

        let result = create_group("Flat", &member(" ", "Nobody"), &connection);

        assert_eq!(result, Err(Error::EmptyMemberId));
        let group_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM expense_group", [], |row| row.get(0))
            .unwrap();
        assert_eq!(group_count, 0, "want no group saved without its creator");
    }

    #[test]
    fn add_member_updates_existing_name() {
        let connection = get_test_connection();
        let group = create_group("Trip", &member("alice", "Alice"), &connection).unwrap();

        add_member(group.id, &member("bob", "Bob"), &connection).unwrap();
        add_member(group.id, &member("bob", "Robert"), &connection).unwrap();

        assert_eq!(
            get_members(group.id, &connection),
            Ok(vec![member("alice", "Alice"), member("bob", "Robert")])
        );
    }

    #[test]
    fn add_member_defaults_name_to_user_id() {
        let connection = get_test_connection();
        let group = create_group("Trip", &member("alice", "Alice"), &connection).unwrap();

        add_member(group.id, &member("carol", ""), &connection).unwrap();

        assert!(
            get_members(group.id, &connection)
                .unwrap()
                .contains(&member("carol", "carol"))
        );
    }

    #[test]
    fn add_member_fails_on_missing_group() {
        let connection = get_test_connection();

        let result = add_member(42, &member("bob", "Bob"), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn lists_only_groups_of_user() {
        let connection = get_test_connection();
        let flat = create_group("Flat", &member("alice", "Alice"), &connection).unwrap();
        let trip = create_group("A trip", &member("bob", "Bob"), &connection).unwrap();
        add_member(trip.id, &member("alice", "Alice"), &connection).unwrap();
        create_group("Work", &member("bob", "Bob"), &connection).unwrap();

        let groups = get_groups_for_user("alice", &connection).unwrap();

        let ids: Vec<_> = groups.iter().map(|group| group.id).collect();
        assert_eq!(ids, vec![trip.id, flat.id]);
    }

    #[test]
    fn membership_checks() {
        let connection = get_test_connection();
        let group = create_group("Flat", &member("alice", "Alice"), &connection).unwrap();

        assert_eq!(is_member(group.id, "alice", &connection), Ok(true));
        assert_eq!(is_member(group.id, "mallory", &connection), Ok(false));
        assert_eq!(require_membership(group.id, "alice", &connection), Ok(()));
        assert_eq!(
            require_membership(group.id, "mallory", &connection),
            Err(Error::NotGroupMember)
        );
        assert_eq!(
            require_membership(group.id + 1, "alice", &connection),
            Err(Error::NotGroupMember)
        );
    }

    #[test]
    fn delete_group_removes_members() {
        let connection = get_test_connection();
        let group = create_group("Flat", &member("alice", "Alice"), &connection).unwrap();

        delete_group(group.id, &connection).unwrap();

        assert_eq!(get_group(group.id, &connection), Err(Error::NotFound));
        assert_eq!(get_members(group.id, &connection), Ok(vec![]));
    }

    #[test]
    fn delete_missing_group_fails() {
        let connection = get_test_connection();

        assert_eq!(delete_group(7, &connection), Err(Error::DeleteMissingGroup));
    }
}
