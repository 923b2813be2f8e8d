use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::{Attribute, ItemImpl, Path, parse_macro_input};

use proc_macro_crate::{FoundCrate, crate_name};

fn resolve_gmfetch_core_path() -> Path {
    // Connector crates depend on either gmfetch-core or the gmfetch facade
    match crate_name("gmfetch-core") {
        Ok(FoundCrate::Itself) => syn::parse_quote! { ::gmfetch_core },
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            syn::parse_quote! { ::#ident }
        }
        Err(_) => match crate_name("gmfetch") {
            Ok(FoundCrate::Name(name)) => {
                let ident = Ident::new(&name, Span::call_site());
                syn::parse_quote! { ::#ident }
            }
            _ => syn::parse_quote! { ::gmfetch_core },
        },
    }
}

fn implements_construct_connector(item: &ItemImpl) -> bool {
    item.trait_
        .as_ref()
        .and_then(|(_, path, _)| path.segments.last())
        .is_some_and(|seg| seg.ident == "ConstructConnector")
}

pub fn register_connector_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return syn::Error::new_spanned(attr, "#[register_connector] takes no arguments")
            .to_compile_error()
            .into();
    }
    let input_impl = parse_macro_input!(item as ItemImpl);

    if !implements_construct_connector(&input_impl) {
        return syn::Error::new_spanned(
            &input_impl.self_ty,
            "#[register_connector] must be applied to an `impl ConstructConnector for T` block",
        )
        .to_compile_error()
        .into();
    }
    if !input_impl.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input_impl.generics,
            "#[register_connector] cannot register a generic connector",
        )
        .to_compile_error()
        .into();
    }

    // Registration must follow the impl through conditional compilation
    let cfg_attrs: Vec<&Attribute> = input_impl
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("cfg"))
        .collect();

    let core = resolve_gmfetch_core_path();
    let self_ty = &input_impl.self_ty;

    let expanded = quote! {
        #input_impl

        #(#cfg_attrs)*
        #core::inventory::submit! {
            #core::registry::ConnectorRegistration::of::<#self_ty>()
        }
    };

    expanded.into()
}
