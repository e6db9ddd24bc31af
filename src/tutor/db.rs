use anyhow::{Error, Result};
use serde_json::json;
use tokio_rusqlite::Connection;

use crate::tutor::{Message, Transcript};

/// Overwrite the stored transcript for an account. Delete and insert
/// run in one transaction so a reader never sees a half-written
/// snapshot.
pub async fn save_transcript(
    db: &Connection,
    account_id: &str,
    transcript: &Transcript,
) -> Result<(), Error> {
    let account_id = account_id.to_owned();
    let rows: Vec<String> = transcript.iter().map(|m| json!(m).to_string()).collect();

    db.call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM transcript_message WHERE account_id = ?",
            [&account_id],
        )?;
        for (position, data) in rows.iter().enumerate() {
            tx.execute(
                "INSERT INTO transcript_message (account_id, position, data) VALUES (?, ?, ?)",
                rusqlite::params![account_id, position as i64, data],
            )?;
        }
        tx.commit()?;
        Ok(())
    })
    .await?;

    Ok(())
}

/// Load the stored messages for an account in append order. An
/// account with no stored transcript gets an empty list, which the
/// caller treats as a fresh session.
pub async fn load_transcript(db: &Connection, account_id: &str) -> Result<Vec<Message>, Error> {
    let account_id = account_id.to_owned();
    let messages = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT data FROM transcript_message WHERE account_id = ? ORDER BY position",
            )?;
            let rows = stmt
                .query_map([account_id], |row| {
                    let data: String = row.get(0)?;
                    Ok(data)
                })?
                .filter_map(Result::ok)
                .filter_map(|data| serde_json::from_str::<Message>(&data).ok())
                .collect::<Vec<Message>>();
            Ok(rows)
        })
        .await?;

    Ok(messages)
}

pub async fn clear_transcript(db: &Connection, account_id: &str) -> Result<(), Error> {
    let account_id = account_id.to_owned();
    db.call(move |conn| {
        conn.execute(
            "DELETE FROM transcript_message WHERE account_id = ?",
            [&account_id],
        )?;
        Ok(())
    })
    .await?;

    Ok(())
}
