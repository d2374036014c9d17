//! Compile-time dependency injection macros for prebind.
//!
//! - `#[derive(Context)]` makes each field of a context struct extractable
//! - `#[derive(FromContext)]` builds a struct by resolving each field from a context
//!
//! Generated code references `crate::FromRef`, so the consuming crate must
//! expose the trait at its root.

use proc_macro::TokenStream;

mod context;
mod fields;
mod from_context;

/// Derive macro for a DI context.
///
/// Generates `impl FromRef<Ctx> for FieldType` for every field, cloning the
/// field out of the context. Fields marked `#[context(skip)]` are not exposed.
///
/// # Example
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub config: Arc<Config>,
///     pub settings: Arc<BinderSettings>,
/// }
///
/// // Generated:
/// // impl FromRef<Context> for Arc<Config> { ... }
/// // impl FromRef<Context> for Arc<BinderSettings> { ... }
/// ```
#[proc_macro_derive(Context, attributes(context))]
pub fn derive_context(input: TokenStream) -> TokenStream {
    context::derive_context_impl(input)
}

/// Derive macro for types constructed from a context.
///
/// Each field is resolved with `FromRef::from_ref(ctx)`, except fields marked
/// `#[from_context(default)]`, which use `Default::default()`. The context
/// type defaults to `Context` and can be overridden with
/// `#[from_context(Context = "MyContext")]`.
///
/// # Example
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct Binder {
///     settings: Arc<BinderSettings>,
/// }
///
/// // Generated:
/// // impl FromRef<Context> for Binder {
/// //     fn from_ref(ctx: &Context) -> Self {
/// //         Self { settings: <Arc<BinderSettings> as FromRef<Context>>::from_ref(ctx) }
/// //     }
/// // }
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    from_context::derive_from_context_impl(input)
}
