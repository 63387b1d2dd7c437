use sea_orm::{EntityTrait, IdenStatic};
use storefront_security::ScopeDimension;

/// Contract for entities whose rows are isolated by tenant, site or department.
///
/// Every dimension must be declared explicitly as `Some(Column::...)` or `None`;
/// there are no implicit defaults. Use `#[derive(Scopable)]` rather than writing
/// the impl by hand.
///
/// # Example (Using Derive Macro)
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Scopable)]
/// #[sea_orm(table_name = "inquiry")]
/// #[secure(tenant_col = "tenant_id", no_site, dept_col = "dept_id", resource_col = "id")]
/// pub struct Model {
///     #[sea_orm(primary_key, auto_increment = false)]
///     pub id: Uuid,
///     pub tenant_id: Uuid,
///     pub dept_id: Uuid,
///     pub subject: String,
/// }
/// ```
///
/// # Unrestricted Entities
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Scopable)]
/// #[sea_orm(table_name = "currency")]
/// #[secure(unrestricted)]
/// pub struct Model {
///     #[sea_orm(primary_key)]
///     pub code: String,
/// }
/// ```
pub trait ScopableEntity: EntityTrait {
    /// Set via `#[secure(unrestricted)]` for global lookup tables.
    ///
    /// When true every column method returns `None` and no scope is applied.
    const IS_UNRESTRICTED: bool = false;

    /// Column holding the tenant id.
    fn tenant_col() -> Option<Self::Column>;

    /// Column holding the site id.
    fn site_col() -> Option<Self::Column>;

    /// Column holding the department id.
    fn dept_col() -> Option<Self::Column>;

    /// Column holding the row identifier, used by `and_id`.
    fn resource_col() -> Option<Self::Column>;

    /// Column declared for `dimension`, if any.
    #[must_use]
    fn scope_col(dimension: ScopeDimension) -> Option<Self::Column> {
        match dimension {
            ScopeDimension::Tenant => Self::tenant_col(),
            ScopeDimension::Site => Self::site_col(),
            ScopeDimension::Dept => Self::dept_col(),
        }
    }

    /// Whether `col` is one of the declared scoping columns.
    ///
    /// Scoping columns are immutable after insert.
    #[must_use]
    fn is_scope_col(col: Self::Column) -> bool {
        ScopeDimension::ALL
            .into_iter()
            .filter_map(Self::scope_col)
            .any(|scope_col| scope_col.as_str() == col.as_str())
    }
}
