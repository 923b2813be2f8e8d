mod register;

use register::register_connector_impl;

/// Register a connector type with the process-wide connector registry.
///
/// Apply to the `impl ConstructConnector for T` block of a connector. The
/// type is submitted as a link-time registration and becomes visible to
/// `ConnectorRegistry::discover` in every binary that links the crate.
///
/// ```rust,ignore
/// #[gmfetch_macros::register_connector]
/// impl ConstructConnector for KnetFetcher {
///     const NAME: &'static str = "knet";
///     const PROTOCOL: Protocol = Protocol::EventSearch;
///     fn construct(params: &ConnectorParams) -> Result<Self, GmError> { /* ... */ }
/// }
/// ```
#[proc_macro_attribute]
pub fn register_connector(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    register_connector_impl(attr, item)
}
