use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Students use the mobile app; the console is for staff only.
    pub fn may_use_console(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RouteAccess {
    Allow,
    RedirectToLogin,
    RedirectHome,
}

/// Gate for a role-restricted area of the console.
pub fn route_access(user: Option<&User>, required: Option<Role>) -> RouteAccess {
    match (user, required) {
        (None, _) => RouteAccess::RedirectToLogin,
        (Some(user), Some(role)) if user.role != role => RouteAccess::RedirectHome,
        (Some(_), _) => RouteAccess::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "u1".to_owned(),
            email: "staff@example.com".to_owned(),
            role,
            nickname: None,
        }
    }

    #[test]
    fn roles_use_uppercase_wire_names() {
        let parsed: User = serde_json::from_str(
            r#"{"id":"1","email":"a@b.c","role":"TEACHER","nickname":"T"}"#,
        )
        .unwrap();
        assert_eq!(parsed.role, Role::Teacher);
        assert_eq!(parsed.nickname.as_deref(), Some("T"));
    }

    #[test]
    fn anonymous_visitors_go_to_login() {
        assert_eq!(route_access(None, None), RouteAccess::RedirectToLogin);
        assert_eq!(
            route_access(None, Some(Role::Admin)),
            RouteAccess::RedirectToLogin
        );
    }

    #[test]
    fn role_mismatch_goes_home() {
        let teacher = user(Role::Teacher);
        assert_eq!(
            route_access(Some(&teacher), Some(Role::Admin)),
            RouteAccess::RedirectHome
        );
        assert_eq!(
            route_access(Some(&teacher), Some(Role::Teacher)),
            RouteAccess::Allow
        );
        assert_eq!(route_access(Some(&teacher), None), RouteAccess::Allow);
    }

    #[test]
    fn students_are_kept_out_of_the_console() {
        assert!(Role::Admin.may_use_console());
        assert!(Role::Teacher.may_use_console());
        assert!(!Role::Student.may_use_console());
    }
}
