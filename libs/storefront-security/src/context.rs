use uuid::Uuid;

use crate::scope::ScopeDimension;

/// Permission entry that grants every permission.
pub const PERMISSION_WILDCARD: &str = "*";

/// `RequestContext` carries the identity and scope values of one inbound request.
///
/// Populated by upstream middleware (authentication, site resolution) and passed
/// by reference through every service call. Services only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestContext {
    user_id: Uuid,
    tenant_id: Option<Uuid>,
    site_id: Option<Uuid>,
    current_dept_id: Option<Uuid>,
    role: Option<String>,
    factory_id: Option<Uuid>,
    exporter_id: Option<Uuid>,
    #[serde(default)]
    permissions: Vec<String>,
}

impl RequestContext {
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Context with no identity, no scope and no permissions.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    #[must_use]
    pub fn site_id(&self) -> Option<Uuid> {
        self.site_id
    }

    #[must_use]
    pub fn current_dept_id(&self) -> Option<Uuid> {
        self.current_dept_id
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    #[must_use]
    pub fn factory_id(&self) -> Option<Uuid> {
        self.factory_id
    }

    #[must_use]
    pub fn exporter_id(&self) -> Option<Uuid> {
        self.exporter_id
    }

    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Value carried for a scoping dimension, if any.
    #[must_use]
    pub fn scope_value(&self, dimension: ScopeDimension) -> Option<Uuid> {
        match dimension {
            ScopeDimension::Tenant => self.tenant_id,
            ScopeDimension::Site => self.site_id,
            ScopeDimension::Dept => self.current_dept_id,
        }
    }

    /// Whether the request was granted `permission`, either directly or via
    /// [`PERMISSION_WILDCARD`].
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p == permission || p == PERMISSION_WILDCARD)
    }
}

#[derive(Default)]
pub struct RequestContextBuilder {
    user_id: Option<Uuid>,
    tenant_id: Option<Uuid>,
    site_id: Option<Uuid>,
    current_dept_id: Option<Uuid>,
    role: Option<String>,
    factory_id: Option<Uuid>,
    exporter_id: Option<Uuid>,
    permissions: Vec<String>,
}

impl RequestContextBuilder {
    #[must_use]
    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn tenant_id(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn site_id(mut self, site_id: Uuid) -> Self {
        self.site_id = Some(site_id);
        self
    }

    #[must_use]
    pub fn current_dept_id(mut self, dept_id: Uuid) -> Self {
        self.current_dept_id = Some(dept_id);
        self
    }

    #[must_use]
    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_owned());
        self
    }

    #[must_use]
    pub fn factory_id(mut self, factory_id: Uuid) -> Self {
        self.factory_id = Some(factory_id);
        self
    }

    #[must_use]
    pub fn exporter_id(mut self, exporter_id: Uuid) -> Self {
        self.exporter_id = Some(exporter_id);
        self
    }

    #[must_use]
    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            user_id: self.user_id.unwrap_or_default(),
            tenant_id: self.tenant_id,
            site_id: self.site_id,
            current_dept_id: self.current_dept_id,
            role: self.role,
            factory_id: self.factory_id,
            exporter_id: self.exporter_id,
            permissions: self.permissions,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builder_full() {
        let user = Uuid::new_v4();
        let tenant = Uuid::new_v4();
        let site = Uuid::new_v4();
        let dept = Uuid::new_v4();

        let ctx = RequestContext::builder()
            .user_id(user)
            .tenant_id(tenant)
            .site_id(site)
            .current_dept_id(dept)
            .role("admin")
            .permissions(["PRODUCTS_TABLE_VIEW"])
            .build();

        assert_eq!(ctx.user_id(), user);
        assert_eq!(ctx.scope_value(ScopeDimension::Tenant), Some(tenant));
        assert_eq!(ctx.scope_value(ScopeDimension::Site), Some(site));
        assert_eq!(ctx.scope_value(ScopeDimension::Dept), Some(dept));
        assert_eq!(ctx.role(), Some("admin"));
        assert!(ctx.factory_id().is_none());
        assert!(ctx.exporter_id().is_none());
    }

    #[test]
    fn anonymous_has_nothing() {
        let ctx = RequestContext::anonymous();

        assert_eq!(ctx.user_id(), Uuid::default());
        for dim in ScopeDimension::ALL {
            assert!(ctx.scope_value(dim).is_none());
        }
        assert!(ctx.permissions().is_empty());
        assert!(!ctx.has_permission("PRODUCTS_TABLE_VIEW"));
    }

    #[test]
    fn permission_checks() {
        let ctx = RequestContext::builder()
            .permissions(["PRODUCTS_TABLE_VIEW", "PRODUCTS_TABLE_CREATE"])
            .build();
        assert!(ctx.has_permission("PRODUCTS_TABLE_CREATE"));
        assert!(!ctx.has_permission("PRODUCTS_TABLE_DELETE"));

        let root = RequestContext::builder()
            .permissions([PERMISSION_WILDCARD])
            .build();
        assert!(root.has_permission("ANYTHING_TABLE_DELETE"));
    }

    #[test]
    fn serde_roundtrip_keeps_scope() {
        let ctx = RequestContext::builder()
            .tenant_id(Uuid::new_v4())
            .site_id(Uuid::new_v4())
            .exporter_id(Uuid::new_v4())
            .build();

        let json = serde_json::to_string(&ctx).unwrap();
        let back: RequestContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
