use anyhow::Result;
use tokio_rusqlite::Connection;

/// Open the sqlite database used for accounts and transcripts,
/// creating the file if needed.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    let db = Connection::open(format!("{}/quill.db", db_path)).await?;
    Ok(db)
}

/// Create the schema. Idempotent so it can run on every startup.
pub fn initialize_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_digest TEXT NOT NULL,
            salt TEXT NOT NULL,
            token TEXT UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS transcript_message (
            account_id TEXT NOT NULL REFERENCES account(id),
            position INTEGER NOT NULL,
            data TEXT NOT NULL,
            PRIMARY KEY (account_id, position)
        );
        ",
    )?;

    Ok(())
}
