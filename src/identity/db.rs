use anyhow::{Error, Result};
use tokio_rusqlite::Connection;

pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub password_digest: String,
    pub salt: String,
}

pub async fn insert_account(
    db: &Connection,
    id: &str,
    email: &str,
    password_digest: &str,
    salt: &str,
) -> Result<usize, Error> {
    let id = id.to_owned();
    let email = email.to_owned();
    let password_digest = password_digest.to_owned();
    let salt = salt.to_owned();
    let result = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO account (id, email, password_digest, salt) VALUES (?, ?, ?, ?)",
            )?;
            let result = stmt.execute([id, email, password_digest, salt])?;
            Ok(result)
        })
        .await?;

    Ok(result)
}

pub async fn find_account_by_email(
    db: &Connection,
    email: &str,
) -> Result<Option<AccountRow>, Error> {
    let email = email.to_owned();
    let row = db
        .call(move |conn| {
            use rusqlite::OptionalExtension;

            let row = conn
                .query_row(
                    "SELECT id, email, password_digest, salt FROM account WHERE email = ?",
                    [email],
                    |row| {
                        Ok(AccountRow {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            password_digest: row.get(2)?,
                            salt: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await?;

    Ok(row)
}

/// Store the bearer token for an account, replacing any previous one
/// so at most one token is live per account.
pub async fn set_account_token(db: &Connection, id: &str, token: &str) -> Result<(), Error> {
    let id = id.to_owned();
    let token = token.to_owned();
    db.call(move |conn| {
        conn.execute("UPDATE account SET token = ? WHERE id = ?", [token, id])?;
        Ok(())
    })
    .await?;

    Ok(())
}

pub async fn find_account_by_token(
    db: &Connection,
    token: &str,
) -> Result<Option<(String, String)>, Error> {
    let token = token.to_owned();
    let row = db
        .call(move |conn| {
            use rusqlite::OptionalExtension;

            let row = conn
                .query_row(
                    "SELECT id, email FROM account WHERE token = ?",
                    [token],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(row)
        })
        .await?;

    Ok(row)
}
