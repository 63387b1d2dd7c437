use std::fmt;

/// A scoping dimension a row can be isolated by.
///
/// Dimensions are always resolved in the order of [`ScopeDimension::ALL`]:
/// tenant first, then site, then department.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeDimension {
    Tenant,
    Site,
    Dept,
}

impl ScopeDimension {
    /// All dimensions in resolution order.
    pub const ALL: [Self; 3] = [Self::Tenant, Self::Site, Self::Dept];

    /// Conventional column name for this dimension.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Tenant => "tenant_id",
            Self::Site => "site_id",
            Self::Dept => "dept_id",
        }
    }

    /// Human readable label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Site => "site",
            Self::Dept => "department",
        }
    }
}

impl fmt::Display for ScopeDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn resolution_order_is_tenant_site_dept() {
        assert_eq!(
            ScopeDimension::ALL,
            [ScopeDimension::Tenant, ScopeDimension::Site, ScopeDimension::Dept]
        );
    }

    #[test]
    fn column_names_follow_convention() {
        assert_eq!(ScopeDimension::Tenant.column_name(), "tenant_id");
        assert_eq!(ScopeDimension::Site.column_name(), "site_id");
        assert_eq!(ScopeDimension::Dept.column_name(), "dept_id");
        assert_eq!(ScopeDimension::Dept.to_string(), "department");
    }
}
