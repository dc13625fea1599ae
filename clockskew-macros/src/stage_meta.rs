use darling::{FromAttributes, FromField};
use syn::{DeriveInput, Fields};

/// Parsed attributes from #[stage_meta(...)]
#[derive(Debug, FromAttributes)]
#[darling(attributes(stage_meta))]
pub struct StageMetaArgs {
    pub name: String,
    pub category: String,

    /// Comma separated channel names consumed by the stage
    #[darling(default)]
    pub reads: Option<String>,

    /// Comma separated channel names produced by the stage
    #[darling(default)]
    pub writes: Option<String>,
}

impl StageMetaArgs {
    pub fn read_channels(&self) -> Vec<String> {
        split_channels(self.reads.as_deref())
    }

    pub fn write_channels(&self) -> Vec<String> {
        split_channels(self.writes.as_deref())
    }
}

fn split_channels(list: Option<&str>) -> Vec<String> {
    list.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parsed attributes from #[param(...)]
#[derive(Debug, FromField)]
#[darling(attributes(param))]
pub struct ParamField {
    pub ident: Option<syn::Ident>,
    pub ty: syn::Type,

    /// JSON literal for the default value
    #[darling(default)]
    pub default: Option<String>,

    #[darling(default)]
    pub min: Option<f64>,

    #[darling(default)]
    pub max: Option<f64>,
}

pub fn parse_stage_info(input: &DeriveInput) -> darling::Result<StageMetaArgs> {
    StageMetaArgs::from_attributes(&input.attrs)
}

pub fn parse_params(input: &DeriveInput) -> darling::Result<Vec<ParamField>> {
    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Ok(Vec::new()),
        },
        _ => {
            return Err(darling::Error::custom("PipelineStage can only be derived for structs")
                .with_span(&input.ident))
        }
    };

    let mut errors = darling::Error::accumulator();
    let params = fields
        .iter()
        .filter(|f| f.attrs.iter().any(|attr| attr.path().is_ident("param")))
        .filter_map(|f| errors.handle(ParamField::from_field(f)))
        .collect();

    errors.finish_with(params)
}
