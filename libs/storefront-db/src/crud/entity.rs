use crate::secure::ScopableEntity;

/// An entity served by a generated CRUD service.
pub trait CrudEntity: ScopableEntity {
    /// Resource name used in logs and routes, e.g. `"site-config"`.
    const NAME: &'static str;

    /// Request body accepted by `create`.
    type Create: Send + 'static;

    /// Partial update accepted by `update`. Fields left out stay unchanged.
    type Patch: Send + 'static;

    /// Text column matched by the `search` list parameter.
    fn search_col() -> Option<Self::Column>;

    fn created_at_col() -> Option<Self::Column>;

    fn updated_at_col() -> Option<Self::Column>;

    /// Active model for an insert. Id, scope and timestamps are filled in by
    /// the service and may be left unset.
    fn new_active_model(input: Self::Create) -> Self::ActiveModel;

    /// Active model with only the patched columns set.
    fn patch_active_model(patch: Self::Patch) -> Self::ActiveModel;
}
