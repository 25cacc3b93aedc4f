use anyhow::Result;
use clap::Args;
use influence_mapping::influence_api::redact_api_key;
use influence_mapping::{Mapping, RawParams};

use crate::output::{build_record_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct CallArgs {
    /// Endpoint key (see `influence endpoints`)
    pub endpoint: String,

    /// Parameter as name=value; repeat for each parameter
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Print the request URL (API key redacted) instead of calling it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

pub async fn run(args: &CallArgs, mapping: &Mapping, format: OutputFormat) -> Result<()> {
    let raw: RawParams = args.params.iter().cloned().collect();

    if args.dry_run {
        let url = mapping.build_request(&args.endpoint, &raw).await?;
        println!("{}", redact_api_key(&url));
        return Ok(());
    }

    let records = mapping.call(&args.endpoint, &raw).await?;
    match format {
        OutputFormat::Json => print_json(&records),
        _ => {
            let endpoint = mapping.endpoint(&args.endpoint)?;
            print_rows(&build_record_rows(endpoint.fields(), &records), format)?;
        }
    }
    Ok(())
}
