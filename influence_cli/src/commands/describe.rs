use anyhow::Result;
use clap::Args;
use influence_mapping::{EndpointDescriptor, Mapping, ParamKind};

use crate::output::{print_json, print_rows, OutputFormat, Rows};

#[derive(Args)]
pub struct DescribeArgs {
    /// Endpoint key (see `influence endpoints`)
    pub endpoint: String,
}

pub fn run(args: &DescribeArgs, mapping: &Mapping, format: OutputFormat) -> Result<()> {
    let endpoint = mapping.endpoint(&args.endpoint)?;
    if format == OutputFormat::Json {
        print_json(endpoint);
        return Ok(());
    }

    println!("{} ({})", endpoint.title, endpoint.key);
    if !endpoint.help_text.is_empty() {
        println!("{}", endpoint.help_text);
    }
    println!("GET {}", endpoint.uri);
    println!();
    print_rows(&parameter_rows(endpoint), format)?;
    println!();
    print_rows(&field_rows(endpoint), format)?;
    Ok(())
}

fn parameter_rows(endpoint: &EndpointDescriptor) -> Rows {
    let mut rows = Rows {
        headers: vec!["Parameter".into(), "Label".into(), "Type".into(), "Default".into(), "Options".into()],
        rows: Vec::new(),
    };
    for param in &endpoint.parameters {
        let kind = match param.kind {
            ParamKind::String => "string",
            ParamKind::Select => "select",
            ParamKind::Integer => "integer",
        };
        let options = if param.options.is_empty() {
            String::new()
        } else {
            param.options.keys().cloned().collect::<Vec<_>>().join(" ")
        };
        rows.rows.push(vec![
            param.name.clone(),
            param.label.clone(),
            kind.to_string(),
            param.default.clone().unwrap_or_default(),
            options,
        ]);
    }
    rows
}

fn field_rows(endpoint: &EndpointDescriptor) -> Rows {
    let mut rows = Rows {
        headers: vec!["Field".into(), "Label".into(), "Format".into()],
        rows: Vec::new(),
    };
    for field in endpoint.fields() {
        let format = serde_json::to_value(field.format)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        rows.rows.push(vec![field.name.clone(), field.label.clone(), format]);
    }
    rows
}
