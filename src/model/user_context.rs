use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Faculty,
    Student,
}

impl Role {
    /// Only admins and faculty may change catalog or ledger state.
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Admin | Role::Faculty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Faculty => "faculty",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "faculty" => Ok(Role::Faculty),
            "student" => Ok(Role::Student),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// A verified actor performing an action. Credential checks happen upstream;
/// this type only carries the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: &str, role: Role) -> Self {
        Self {
            name: name.to_string(),
            role,
        }
    }

    /// Actor used by the seed loader.
    pub fn system() -> Self {
        Self::new("system", Role::Admin)
    }

    pub fn can_edit(&self) -> bool {
        self.role.can_edit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_edit());
        assert!(Role::Faculty.can_edit());
        assert!(!Role::Student.can_edit());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(" Faculty ".parse::<Role>().unwrap(), Role::Faculty);
        assert!("guest".parse::<Role>().is_err());
    }
}
