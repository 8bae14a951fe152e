//! Role labels and the permissions each role grants.

use std::fmt;

/// Display name for a staff `role_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleName {
    Admin,
    Librarian,
    Staff,
    SuperAdmin,
    /// Any id without a fixed label.
    Other(u32),
}

/// Capabilities a host enables after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageCatalog,
    ManageLoans,
    ManageReaders,
    ViewReports,
    ManageStaff,
}

const ADMIN: &[Permission] = &[
    Permission::ManageCatalog,
    Permission::ManageLoans,
    Permission::ManageReaders,
    Permission::ViewReports,
];
const LIBRARIAN: &[Permission] = &[
    Permission::ManageCatalog,
    Permission::ManageLoans,
    Permission::ManageReaders,
];
const STAFF: &[Permission] = &[Permission::ManageLoans, Permission::ManageReaders];
const SUPER_ADMIN: &[Permission] = &[
    Permission::ManageCatalog,
    Permission::ManageLoans,
    Permission::ManageReaders,
    Permission::ViewReports,
    Permission::ManageStaff,
];

impl RoleName {
    pub fn from_id(role_id: u32) -> Self {
        match role_id {
            1 => RoleName::Admin,
            2 => RoleName::Librarian,
            3 => RoleName::Staff,
            5 => RoleName::SuperAdmin,
            other => RoleName::Other(other),
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            RoleName::Admin => ADMIN,
            RoleName::Librarian => LIBRARIAN,
            RoleName::Staff => STAFF,
            RoleName::SuperAdmin => SUPER_ADMIN,
            RoleName::Other(_) => &[],
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleName::Admin => f.write_str("Admin"),
            RoleName::Librarian => f.write_str("Librarian"),
            RoleName::Staff => f.write_str("Staff"),
            RoleName::SuperAdmin => f.write_str("Super Admin"),
            RoleName::Other(id) => write!(f, "Role {id}"),
        }
    }
}

impl Permission {
    pub fn display_name(&self) -> &'static str {
        match self {
            Permission::ManageCatalog => "manage catalog",
            Permission::ManageLoans => "manage loans",
            Permission::ManageReaders => "manage readers",
            Permission::ViewReports => "view reports",
            Permission::ManageStaff => "manage staff",
        }
    }
}
