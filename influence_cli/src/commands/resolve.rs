use anyhow::Result;
use clap::Args;
use influence_mapping::Mapping;

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct ResolveArgs {
    /// Politician, organization, individual or industry name
    pub text: String,
}

pub async fn run(args: &ResolveArgs, mapping: &Mapping, format: OutputFormat) -> Result<()> {
    let id = mapping.resolve_entity(&args.text).await?;
    if id == args.text {
        eprintln!("No entity matched; the input is returned unchanged.");
    }
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "text": args.text, "entity_id": id })),
        _ => println!("{}", id),
    }
    Ok(())
}
