use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Status written when a manager assigns a task
pub const STATUS_PENDING: &str = "pending";
/// Status written when a worker report has been recorded
pub const STATUS_COMPLETED: &str = "completed";

/// Role of an account, fixed at registration.
/// Persisted as lowercase text so the table stays readable from the sqlite shell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "worker")]
    Worker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Worker => "worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "worker" => Ok(Role::Worker),
            other => Err(format!("unknown role {}", other)),
        }
    }
}
