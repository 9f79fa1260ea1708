//! Role-to-capability mapping
//!
//! A role maps to a fixed set of resource scopes. The check is a pure
//! function over the two enums: no IO, no panics, no framework coupling.
//! Callers evaluate it once per request and shape their surface accordingly.

use serde::{Deserialize, Serialize};

/// Resource families a caller may be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceScope {
    /// Chart of accounts maintenance
    Accounts,
    /// Recording, approving, and browsing transactions
    Transactions,
    /// Generating and reading financial reports
    Reports,
    /// Customer and supplier records
    Parties,
    /// Print job sheets
    JobSheets,
    /// Role assignment, archival, destructive maintenance
    Administration,
}

impl ResourceScope {
    /// Every scope, for exhaustive iteration
    pub const ALL: [ResourceScope; 6] = [
        ResourceScope::Accounts,
        ResourceScope::Transactions,
        ResourceScope::Reports,
        ResourceScope::Parties,
        ResourceScope::JobSheets,
        ResourceScope::Administration,
    ];
}

/// Staff roles in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Runs the business; unrestricted
    Owner,
    /// Keeps the books: chart, transactions, reports, counterparties
    Accountant,
    /// Takes orders and payments at the counter
    FrontDesk,
    /// Read-only visibility into reports
    Viewer,
}

impl Role {
    /// The enumerated scopes this role is permitted to touch
    pub fn allowed_scopes(self) -> &'static [ResourceScope] {
        match self {
            Role::Owner => &ResourceScope::ALL,
            Role::Accountant => &[
                ResourceScope::Accounts,
                ResourceScope::Transactions,
                ResourceScope::Reports,
                ResourceScope::Parties,
                ResourceScope::JobSheets,
            ],
            Role::FrontDesk => &[
                ResourceScope::Transactions,
                ResourceScope::Parties,
                ResourceScope::JobSheets,
            ],
            Role::Viewer => &[ResourceScope::Reports],
        }
    }

    /// Whether this role may touch the given scope
    pub fn permits(self, scope: ResourceScope) -> bool {
        self.allowed_scopes().contains(&scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_has_every_scope() {
        for scope in ResourceScope::ALL {
            assert!(Role::Owner.permits(scope));
        }
    }

    #[test]
    fn only_the_owner_administers() {
        assert!(Role::Owner.permits(ResourceScope::Administration));
        assert!(!Role::Accountant.permits(ResourceScope::Administration));
        assert!(!Role::FrontDesk.permits(ResourceScope::Administration));
        assert!(!Role::Viewer.permits(ResourceScope::Administration));
    }

    #[test]
    fn front_desk_works_the_counter_not_the_books() {
        assert!(Role::FrontDesk.permits(ResourceScope::JobSheets));
        assert!(Role::FrontDesk.permits(ResourceScope::Parties));
        assert!(Role::FrontDesk.permits(ResourceScope::Transactions));
        assert!(!Role::FrontDesk.permits(ResourceScope::Accounts));
        assert!(!Role::FrontDesk.permits(ResourceScope::Reports));
    }

    #[test]
    fn viewer_sees_reports_only() {
        assert!(Role::Viewer.permits(ResourceScope::Reports));
        for scope in ResourceScope::ALL {
            if scope != ResourceScope::Reports {
                assert!(!Role::Viewer.permits(scope));
            }
        }
    }

    #[test]
    fn permits_agrees_with_allowed_scopes() {
        for role in [Role::Owner, Role::Accountant, Role::FrontDesk, Role::Viewer] {
            for scope in ResourceScope::ALL {
                assert_eq!(
                    role.permits(scope),
                    role.allowed_scopes().contains(&scope)
                );
            }
        }
    }
}
