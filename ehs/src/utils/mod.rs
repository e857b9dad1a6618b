use crate::error::EhsError;
use anyhow::Result;
use std::fmt::Display;
use std::path::Path;

pub trait IntoStoreErr<T> {
    fn store_err(self) -> Result<T>;
}

impl<T, E> IntoStoreErr<T> for std::result::Result<T, E>
where
    E: Display,
{
    fn store_err(self) -> Result<T> {
        self.map_err(|e| EhsError::Store(e.to_string()).into())
    }
}

pub trait IfNotFound<T> {
    fn if_not_found(self, err: EhsError) -> Result<T>;
}

impl<T> IfNotFound<T> for Option<T> {
    fn if_not_found(self, err: EhsError) -> Result<T> {
        match self {
            Some(t) => Ok(t),
            _ => Err(err.into()),
        }
    }
}

/// Turn "0 rows affected" into the not found error of the caller
pub trait EnsureAffected {
    fn ensure_affected(self, err: EhsError) -> Result<()>;
}

impl EnsureAffected for u64 {
    fn ensure_affected(self, err: EhsError) -> Result<()> {
        if self == 0 {
            Err(err.into())
        } else {
            Ok(())
        }
    }
}

/// sqlx does not create a missing sqlite file unless asked to, create it up front.
/// Non sqlite dsn and in-memory databases are left alone.
pub async fn ensure_db_file(dsn: &str) -> Result<()> {
    let path = match dsn.strip_prefix("sqlite://") {
        Some(rest) => rest.split('?').next().unwrap_or_default(),
        None => return Ok(()),
    };
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    if !path.exists() {
        tokio::fs::File::create(path).await?;
    }
    Ok(())
}

pub fn short_msg(msg: &str, len: usize) -> String {
    if msg.chars().count() > len {
        let mut pre_msg: String = msg.chars().take(len).collect();
        pre_msg.push_str("...");
        pre_msg
    } else {
        msg.to_string()
    }
}
