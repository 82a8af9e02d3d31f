use std::path::Path;

use log::info;
use rusqlite::{
    params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    Connection, OptionalExtension, Row, ToSql, Transaction,
};
use tokio::sync::Mutex as TokioMutex;

use crate::error::{Error, Result};
use crate::models::{gender::Gender, user::User, verdict::Verdict};

const USER_COLUMNS: &str = "id, external_id, gender, subscribed, chats_seen, likes, dislikes";

/// Shared handle to the user table.
///
/// Every operation takes the connection, runs inside a single transaction
/// and gives it back, so two operations never interleave.
pub struct Database {
    connection: TokioMutex<Connection>,
}

#[derive(Debug, Default, PartialEq)]
pub struct Stats {
    pub total: u32,
    pub males: u32,
    pub females: u32,
    pub subscribed: u32,
}

impl Database {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(connection: Connection) -> Result<Self> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS users (
                  id INTEGER PRIMARY KEY,
                  external_id INTEGER NOT NULL UNIQUE,
                  gender TEXT,
                  subscribed INTEGER NOT NULL DEFAULT 0,
                  chats_seen INTEGER NOT NULL DEFAULT 0,
                  likes INTEGER NOT NULL DEFAULT 0,
                  dislikes INTEGER NOT NULL DEFAULT 0
                  )",
            [],
        )?;
        Ok(Database {
            connection: TokioMutex::new(connection),
        })
    }

    /// Runs `f` in a transaction. It is committed only if `f` succeeds.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut connection = self.connection.lock().await;
        let tx = connection.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    pub async fn get_or_create_user(&self, external_id: i64) -> Result<User> {
        self.transaction(|tx| get_or_create_user(tx, external_id))
            .await
    }

    pub async fn get_user(&self, external_id: i64) -> Result<Option<User>> {
        self.transaction(|tx| get_user(tx, external_id)).await
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        self.transaction(|tx| {
            let stats = tx.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(gender = 'M'), 0),
                        COALESCE(SUM(gender = 'F'), 0),
                        COALESCE(SUM(subscribed), 0)
                 FROM users",
                [],
                |row| {
                    Ok(Stats {
                        total: row.get(0)?,
                        males: row.get(1)?,
                        females: row.get(2)?,
                        subscribed: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        external_id: row.get(1)?,
        gender: row.get(2)?,
        subscribed: row.get(3)?,
        chats_seen: row.get(4)?,
        likes: row.get(5)?,
        dislikes: row.get(6)?,
    })
}

pub fn get_user(conn: &Connection, external_id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?1"),
            params![external_id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn get_or_create_user(conn: &Connection, external_id: i64) -> Result<User> {
    let created = conn.execute(
        "INSERT INTO users (external_id) VALUES (?1) ON CONFLICT(external_id) DO NOTHING",
        params![external_id],
    )?;
    if created > 0 {
        info!("Registered user {}", external_id);
    }

    let user = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?1"),
        params![external_id],
        user_from_row,
    )?;
    Ok(user)
}

pub fn update_user_gender(conn: &Connection, external_id: i64, gender: Gender) -> Result<()> {
    let updated = conn.execute(
        "UPDATE users SET gender = ?1 WHERE external_id = ?2",
        params![gender, external_id],
    )?;
    if updated == 0 {
        return Err(Error::UserNotFound);
    }
    Ok(())
}

pub fn increase_chats_seen(conn: &Connection, external_id: i64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE users SET chats_seen = chats_seen + 1 WHERE external_id = ?1",
        params![external_id],
    )?;
    if updated == 0 {
        return Err(Error::UserNotFound);
    }
    Ok(())
}

pub fn set_subscribed(conn: &Connection, external_id: i64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE users SET subscribed = 1 WHERE external_id = ?1",
        params![external_id],
    )?;
    if updated == 0 {
        return Err(Error::UserNotFound);
    }
    Ok(())
}

pub fn increase_rating(conn: &Connection, external_id: i64, verdict: Verdict) -> Result<()> {
    let column = verdict.column();
    let updated = conn.execute(
        &format!("UPDATE users SET {column} = {column} + 1 WHERE external_id = ?1"),
        params![external_id],
    )?;
    if updated == 0 {
        return Err(Error::UserNotFound);
    }
    Ok(())
}

/// Picks one user of `gender` other than `exclude`, uniformly at random.
pub fn random_user_of_gender(
    conn: &Connection,
    gender: Gender,
    exclude: i64,
) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE gender = ?1 AND external_id != ?2
                 ORDER BY RANDOM() LIMIT 1"
            ),
            params![gender, exclude],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

impl ToSql for Gender {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Gender {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}
