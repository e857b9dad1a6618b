use crate::error::EhsError;
use entity::Role;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Length of the hex digest stored in `users.password`
pub const DIGEST_HEX_LEN: usize = 64;

/// Authenticated identity, everything a session needs to know about its user
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl From<entity::users::Model> for Account {
    fn from(user: entity::users::Model) -> Self {
        Account {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// SHA-256 of the password bytes as lowercase hex
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn check_credentials(username: &str, password: &str) -> Result<(), EhsError> {
    if username.is_empty() {
        return Err(EhsError::invalid("username cannot be empty"));
    }
    if password.is_empty() {
        return Err(EhsError::invalid("password cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let first = hash_password("pw1");
        let second = hash_password("pw1");
        assert_eq!(first, second);
        assert_eq!(first.len(), DIGEST_HEX_LEN);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(first, "pw1");
    }

    #[test]
    fn one_character_changes_digest() {
        assert_ne!(hash_password("pw1"), hash_password("pw2"));
        assert_ne!(hash_password("pw1"), hash_password("pw1 "));
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert!(check_credentials("", "pw").unwrap_err().is_input_error());
        assert!(check_credentials("alice", "").unwrap_err().is_input_error());
        assert!(check_credentials("alice", "pw").is_ok());
    }
}
