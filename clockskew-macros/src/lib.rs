use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod stage_meta;
use stage_meta::{parse_params, parse_stage_info};

/// Registers a pipeline stage with the crate's stage registry.
///
/// The struct must implement `Default` and `ProcessingStage`. Struct level
/// `#[stage_meta(name, category, reads, writes)]` describes the stage and the
/// frame channels it touches; `#[param(default, min, max)]` on a field exposes
/// it in the parameter schema.
#[proc_macro_derive(PipelineStage, attributes(stage_meta, param))]
pub fn derive_pipeline_stage(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let stage_info = match parse_stage_info(&input) {
        Ok(info) => info,
        Err(e) => return e.write_errors().into(),
    };

    let fields = match parse_params(&input) {
        Ok(fields) => fields,
        Err(e) => return e.write_errors().into(),
    };

    let struct_name = &input.ident;
    let stage_id = struct_name.to_string().to_lowercase();
    let stage_name = &stage_info.name;
    let category = &stage_info.category;

    let params = fields.iter().filter_map(|f| {
        let field_name = f.ident.as_ref()?.to_string();

        // Fields without a default stay out of the schema
        let default_val = f.default.as_ref()?.as_str();
        let type_name = extract_type_name(&f.ty);

        let min = match f.min {
            Some(min) => quote! { Some(#min) },
            None => quote! { None },
        };
        let max = match f.max {
            Some(max) => quote! { Some(#max) },
            None => quote! { None },
        };

        Some(quote! {
            crate::registry::ParameterSchema {
                name: #field_name.to_string(),
                param_type: #type_name.to_string(),
                default: ::serde_json::from_str(#default_val)
                    .unwrap_or_else(|_| ::serde_json::Value::String(#default_val.to_string())),
                min: #min,
                max: #max,
            }
        })
    });

    let reads = stage_info.read_channels();
    let writes = stage_info.write_channels();

    let mod_name = syn::Ident::new(
        &format!("__stage_registration_{}", stage_id),
        struct_name.span(),
    );

    let factory_fn_name = syn::Ident::new(
        &format!("create_metadata_{}", stage_id),
        struct_name.span(),
    );

    let expanded = quote! {
        #[doc(hidden)]
        mod #mod_name {
            use super::*;

            fn #factory_fn_name() -> crate::registry::StageMetadata {
                crate::registry::StageMetadata {
                    id: #stage_id.to_string(),
                    name: #stage_name.to_string(),
                    category: #category.to_string(),
                    reads: vec![#(#reads.to_string()),*],
                    writes: vec![#(#writes.to_string()),*],
                    parameters: vec![#(#params),*],
                    factory: || Box::new(#struct_name::default()),
                }
            }

            ::inventory::submit! {
                crate::registry::StageMetadataFactory(#factory_fn_name)
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_type_name(ty: &syn::Type) -> &'static str {
    let ident = match ty {
        syn::Type::Path(path) => path.path.segments.last().map(|seg| seg.ident.to_string()),
        syn::Type::Reference(reference) => return extract_type_name(&reference.elem),
        syn::Type::Group(group) => return extract_type_name(&group.elem),
        syn::Type::Paren(paren) => return extract_type_name(&paren.elem),
        _ => None,
    };

    match ident.as_deref() {
        Some("Option") => "optional",
        Some("f32" | "f64") => "number",
        Some("u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64" | "isize") => {
            "integer"
        }
        Some("String" | "str") => "string",
        Some("bool") => "boolean",
        _ => "enum",
    }
}
