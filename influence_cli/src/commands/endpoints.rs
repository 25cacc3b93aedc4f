use anyhow::Result;
use clap::Args;
use influence_mapping::Mapping;

use crate::output::{build_endpoint_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct EndpointsArgs {
    /// Only list endpoints whose key starts with this (e.g. politician, top_)
    #[arg(long)]
    pub prefix: Option<String>,
}

pub fn run(args: &EndpointsArgs, mapping: &Mapping, format: OutputFormat) -> Result<()> {
    let registry = mapping.registry();
    match format {
        OutputFormat::Json => {
            let endpoints: Vec<_> = registry
                .iter()
                .filter(|e| args.prefix.as_deref().map_or(true, |p| e.key.starts_with(p)))
                .collect();
            print_json(&endpoints);
        }
        _ => print_rows(&build_endpoint_rows(registry, args.prefix.as_deref()), format)?,
    }
    Ok(())
}
