use heck::ToUpperCamelCase;
use proc_macro_error2::abort;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, spanned::Spanned};

/// Scope dimensions in the order `ScopableEntity` declares them.
///
/// The first three are scoping dimensions; `resource` names the id column.
const DIMENSIONS: [&str; 4] = ["tenant", "site", "dept", "resource"];

/// Number of leading entries in [`DIMENSIONS`] that narrow queries.
const SCOPING_DIMENSIONS: usize = 3;

/// Explicit decision for one dimension: a column or an opt-out.
#[derive(Default)]
struct DimensionDecision {
    col: Option<(String, Span)>,
    skip: Option<Span>,
}

/// Configuration parsed from `#[secure(...)]` attributes
#[derive(Default)]
struct SecureConfig {
    dims: [DimensionDecision; 4],
    unrestricted: Option<Span>,
}

#[allow(clippy::needless_pass_by_value)] // DeriveInput is consumed by proc-macro pattern
pub fn expand_derive_scopable(input: DeriveInput) -> TokenStream {
    if !matches!(&input.data, Data::Struct(_)) {
        abort!(
            input.span(),
            "#[derive(Scopable)] can only be applied to structs"
        );
    }

    let config = parse_secure_attrs(&input);
    validate_config(&config, &input);

    let entity_ident = syn::Ident::new("Entity", input.ident.span());
    let unrestricted = config.unrestricted.is_some();

    let methods = DIMENSIONS
        .iter()
        .zip(&config.dims)
        .map(|(name, decision)| generate_col_impl(name, decision.col.as_ref(), input.ident.span()));

    quote! {
        impl ::storefront_db::secure::ScopableEntity for #entity_ident {
            const IS_UNRESTRICTED: bool = #unrestricted;

            #(#methods)*
        }
    }
}

/// Generate a `<dimension>_col()` method returning the declared column or `None`.
fn generate_col_impl(
    dimension: &str,
    col: Option<&(String, Span)>,
    default_span: Span,
) -> TokenStream {
    let method_ident = syn::Ident::new(&format!("{dimension}_col"), default_span);

    if let Some((col_name, _)) = col {
        let col_ident = syn::Ident::new(&snake_to_upper_camel(col_name), default_span);
        quote! {
            fn #method_ident() -> ::core::option::Option<Self::Column> {
                ::core::option::Option::Some(Self::Column::#col_ident)
            }
        }
    } else {
        quote! {
            fn #method_ident() -> ::core::option::Option<Self::Column> {
                ::core::option::Option::None
            }
        }
    }
}

fn validate_config(config: &SecureConfig, input: &DeriveInput) {
    if let Some(unrestricted_span) = config.unrestricted {
        if config
            .dims
            .iter()
            .any(|d| d.col.is_some() || d.skip.is_some())
        {
            abort!(
                unrestricted_span,
                "When using 'unrestricted', no other column attributes are allowed"
            );
        }
        return;
    }

    for (name, decision) in DIMENSIONS.iter().zip(&config.dims) {
        if decision.col.is_none() && decision.skip.is_none() {
            let msg = format!(
                "secure: missing explicit decision for {name}:\n  \
                 use `{name}_col = \"column_name\"` or `no_{name}`"
            );
            abort!(input.span(), msg);
        }
    }

    let scoped = config.dims[..SCOPING_DIMENSIONS]
        .iter()
        .any(|d| d.col.is_some());
    if !scoped {
        abort!(
            input.span(),
            "secure: no tenant, site or dept column declared; mark global entities `unrestricted`"
        );
    }
}

fn dimension_index(name: &str) -> Option<usize> {
    DIMENSIONS.iter().position(|d| *d == name)
}

fn record_col(config: &mut SecureConfig, idx: usize, value: String, span: Span) {
    let name = DIMENSIONS[idx];
    if config.unrestricted.is_some() {
        let msg = format!("Cannot use '{name}_col' with 'unrestricted'");
        abort!(span, msg);
    }
    let decision = &mut config.dims[idx];
    if decision.col.is_some() {
        let msg = format!("duplicate attribute '{name}_col'");
        abort!(span, msg);
    }
    if decision.skip.is_some() {
        let msg = format!("secure: specify either `{name}_col` or `no_{name}`, not both");
        abort!(span, msg);
    }
    if value.is_empty() {
        let msg = format!("secure: `{name}_col` must name a column");
        abort!(span, msg);
    }
    decision.col = Some((value, span));
}

fn record_skip(config: &mut SecureConfig, idx: usize, span: Span) {
    let name = DIMENSIONS[idx];
    if config.unrestricted.is_some() {
        let msg = format!("Cannot use 'no_{name}' with 'unrestricted'");
        abort!(span, msg);
    }
    let decision = &mut config.dims[idx];
    if decision.skip.is_some() {
        let msg = format!("duplicate attribute 'no_{name}'");
        abort!(span, msg);
    }
    if decision.col.is_some() {
        let msg = format!("secure: specify either `{name}_col` or `no_{name}`, not both");
        abort!(span, msg);
    }
    decision.skip = Some(span);
}

/// Parse all `#[secure(...)]` attributes with duplicate detection
fn parse_secure_attrs(input: &DeriveInput) -> SecureConfig {
    let mut config = SecureConfig::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("secure") {
            continue;
        }

        let result = attr.parse_nested_meta(|meta| {
            let span = meta.path.span();
            let key = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();

            if key.is_empty() {
                abort!(span, "Expected attribute name");
            }

            if key == "unrestricted" {
                if config.unrestricted.is_some() {
                    abort!(span, "duplicate attribute 'unrestricted'");
                }
                config.unrestricted = Some(span);
                return Ok(());
            }

            if let Some(idx) = key.strip_prefix("no_").and_then(dimension_index) {
                record_skip(&mut config, idx, span);
                return Ok(());
            }

            if let Some(idx) = key.strip_suffix("_col").and_then(dimension_index) {
                let value = match meta.value() {
                    Ok(v) => match v.parse::<syn::LitStr>() {
                        Ok(lit) => lit.value(),
                        Err(_) => abort!(span, "Expected string literal"),
                    },
                    Err(_) => abort!(span, "Expected '=' followed by a string value"),
                };
                record_col(&mut config, idx, value, span);
                return Ok(());
            }

            let msg = format!(
                "Unknown attribute '{key}'. Valid attributes: tenant_col, no_tenant, \
                 site_col, no_site, dept_col, no_dept, resource_col, no_resource, unrestricted"
            );
            abort!(span, msg);
        });

        if let Err(err) = result {
            abort!(err.span(), "{}", err);
        }
    }

    config
}

/// Convert `snake_case` to `UpperCamelCase` for enum variant names
fn snake_to_upper_camel(s: &str) -> String {
    s.to_upper_camel_case()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn squash(ts: &TokenStream) -> String {
        ts.to_string().split_whitespace().collect()
    }

    #[test]
    fn test_snake_to_upper_camel() {
        assert_eq!(snake_to_upper_camel("site_id"), "SiteId");
        assert_eq!(snake_to_upper_camel("id"), "Id");
        assert_eq!(snake_to_upper_camel("current_dept_id"), "CurrentDeptId");
    }

    #[test]
    fn site_scoped_entity_expands_to_site_column() {
        let input: DeriveInput = parse_quote! {
            #[secure(no_tenant, site_col = "site_id", no_dept, resource_col = "id")]
            struct Model;
        };

        let out = squash(&expand_derive_scopable(input));

        assert!(out.contains("::storefront_db::secure::ScopableEntityforEntity"));
        assert!(out.contains("constIS_UNRESTRICTED:bool=false"));
        assert!(out.contains("fnsite_col()->::core::option::Option<Self::Column>{::core::option::Option::Some(Self::Column::SiteId)}"));
        assert!(out.contains("fntenant_col()->::core::option::Option<Self::Column>{::core::option::Option::None}"));
        assert!(out.contains("Self::Column::Id"));
    }

    #[test]
    fn tenant_and_dept_entity_expands_both_columns() {
        let input: DeriveInput = parse_quote! {
            #[secure(tenant_col = "tenant_id", no_site, dept_col = "dept_id", resource_col = "id")]
            struct Model;
        };

        let out = squash(&expand_derive_scopable(input));

        assert!(out.contains("Self::Column::TenantId"));
        assert!(out.contains("Self::Column::DeptId"));
        assert!(out.contains("fnsite_col()->::core::option::Option<Self::Column>{::core::option::Option::None}"));
    }

    #[test]
    fn unrestricted_entity_has_no_columns() {
        let input: DeriveInput = parse_quote! {
            #[secure(unrestricted)]
            struct Model;
        };

        let out = squash(&expand_derive_scopable(input));

        assert!(out.contains("constIS_UNRESTRICTED:bool=true"));
        assert!(!out.contains("Option::Some"));
    }
}
