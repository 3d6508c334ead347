/*!
 * Role-based access control tables.
 *
 * Roles map to permission grants; grants support `resource:*` and bare `*`
 * wildcards. Role lookup is by name, unknown roles hold no grants.
 */

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Role definition with associated permission grants
#[derive(Debug, Clone)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

lazy_static! {
    pub static ref ROLES: HashMap<String, Role> = {
        let mut roles = HashMap::new();

        roles.insert(
            "admin".to_string(),
            Role {
                name: "admin".to_string(),
                description: "Administrator with full access".to_string(),
                permissions: vec![
                    "products:*".to_string(),
                    "categories:*".to_string(),
                    "imports:*".to_string(),
                    "admin:*".to_string(),
                ],
            },
        );

        roles.insert(
            "manager".to_string(),
            Role {
                name: "manager".to_string(),
                description: "Department manager; may extend reference data during imports"
                    .to_string(),
                permissions: vec![
                    super::permissions::PRODUCTS_READ.to_string(),
                    super::permissions::PRODUCTS_IMPORT.to_string(),
                    super::permissions::CATEGORIES_CREATE.to_string(),
                    super::permissions::IMPORTS_READ.to_string(),
                ],
            },
        );

        roles.insert(
            "clerk".to_string(),
            Role {
                name: "clerk".to_string(),
                description: "Back-office clerk; imports against existing reference data"
                    .to_string(),
                permissions: vec![
                    super::permissions::PRODUCTS_READ.to_string(),
                    super::permissions::PRODUCTS_IMPORT.to_string(),
                    super::permissions::IMPORTS_READ.to_string(),
                ],
            },
        );

        roles
    };
}

/// Whether a granted permission string covers the requested one
pub fn permission_matches(granted: &str, requested: &str) -> bool {
    if granted == "*" || granted == requested {
        return true;
    }
    match granted.strip_suffix(":*") {
        Some(resource) => requested.split(':').next() == Some(resource),
        None => false,
    }
}

/// Whether the named role holds the requested permission
pub fn role_has_permission(role: &str, requested: &str) -> bool {
    ROLES
        .get(role)
        .map(|r| {
            r.permissions
                .iter()
                .any(|granted| permission_matches(granted, requested))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions;

    #[test]
    fn wildcard_grants() {
        assert!(permission_matches("*", "products:import"));
        assert!(permission_matches("products:*", "products:import"));
        assert!(!permission_matches("products:*", "categories:create"));
        assert!(!permission_matches("products:import", "products:read"));
    }

    #[test]
    fn clerk_cannot_create_categories() {
        assert!(role_has_permission("clerk", permissions::PRODUCTS_IMPORT));
        assert!(!role_has_permission("clerk", permissions::CATEGORIES_CREATE));
    }

    #[test]
    fn admin_covers_everything() {
        assert!(role_has_permission("admin", permissions::CATEGORIES_CREATE));
        assert!(role_has_permission("admin", permissions::PRODUCTS_IMPORT));
    }

    #[test]
    fn unknown_role_holds_nothing() {
        assert!(!role_has_permission("intern", permissions::PRODUCTS_READ));
    }
}
