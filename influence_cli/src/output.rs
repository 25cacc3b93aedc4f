use anyhow::Result;
use influence_mapping::choices::Choices;
use influence_mapping::{FieldSpec, Registry, ResolvedRecord};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::Table;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

/// A header row plus string cells, shared by every tabular output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Rows {
    fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }
}

// -- Row builders --

/// One column per field, labelled as declared, cells rendered per format.
pub fn build_record_rows(fields: &[FieldSpec], records: &[ResolvedRecord]) -> Rows {
    let mut rows = Rows::new(fields.iter().map(|f| f.label.clone()));
    for record in records {
        rows.rows.push(
            fields
                .iter()
                .map(|f| {
                    record
                        .get(&f.name)
                        .map(|v| v.display(f.format))
                        .unwrap_or_default()
                })
                .collect(),
        );
    }
    rows
}

pub fn build_endpoint_rows(registry: &Registry, prefix: Option<&str>) -> Rows {
    let mut rows = Rows::new(["Key", "Title", "Parameters"]);
    for endpoint in registry.iter() {
        if prefix.is_some_and(|p| !endpoint.key.starts_with(p)) {
            continue;
        }
        let params: Vec<&str> = endpoint.parameters.iter().map(|p| p.name.as_str()).collect();
        rows.rows.push(vec![
            endpoint.key.clone(),
            endpoint.title.clone(),
            params.join(", "),
        ]);
    }
    rows
}

pub fn build_choice_rows(choices: &Choices) -> Rows {
    let mut rows = Rows::new(["Value", "Label"]);
    for (value, label) in choices {
        rows.rows.push(vec![value.clone(), label.clone()]);
    }
    rows
}

// -- Rendering --

fn to_table(rows: &Rows) -> Table {
    let mut builder = Builder::default();
    builder.push_record(rows.headers.clone());
    for row in &rows.rows {
        builder.push_record(row.clone());
    }
    builder.build()
}

pub fn render_table(rows: &Rows) -> String {
    to_table(rows).to_string()
}

pub fn render_markdown(rows: &Rows) -> String {
    let mut table = to_table(rows);
    table.with(Style::markdown());
    table.to_string()
}

pub fn render_csv(rows: &Rows) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&rows.headers)?;
    for row in &rows.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Prints `rows` in a tabular format. JSON callers serialize their own data
/// with [`print_json`] instead.
pub fn print_rows(rows: &Rows, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_table(rows)),
        OutputFormat::Markdown => println!("{}", render_markdown(rows)),
        OutputFormat::Csv => print!("{}", render_csv(rows)?),
        OutputFormat::Json => {
            let objects: Vec<serde_json::Map<String, serde_json::Value>> = rows
                .rows
                .iter()
                .map(|row| {
                    rows.headers
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned().map(serde_json::Value::String))
                        .collect()
                })
                .collect();
            print_json(&objects);
        }
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use influence_mapping::value::FieldFormat;
    use influence_mapping::FieldValue;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name").label("Contributor Name"),
            FieldSpec::new("total_count"),
            FieldSpec::new("total_amount").format(FieldFormat::Currency),
        ]
    }

    fn records() -> Vec<ResolvedRecord> {
        let mut first = ResolvedRecord::new();
        first.insert("name", FieldValue::Text("Goldman Sachs".into()));
        first.insert("total_count", FieldValue::Integer(14));
        first.insert("total_amount", FieldValue::Float(35300.0));

        let mut second = ResolvedRecord::new();
        second.insert("name", FieldValue::Text("Gap, Inc".into()));
        second.insert("total_count", FieldValue::Integer(0));
        second.insert("total_amount", FieldValue::Null);
        vec![first, second]
    }

    #[test]
    fn record_rows_use_labels_and_formats() {
        let rows = build_record_rows(&fields(), &records());
        assert_eq!(rows.headers, vec!["Contributor Name", "Total count", "Total amount"]);
        assert_eq!(rows.rows[0], vec!["Goldman Sachs", "14", "$35,300.00"]);
        assert_eq!(rows.rows[1][2], "");
    }

    #[test]
    fn missing_fields_render_empty() {
        let rows = build_record_rows(&fields(), &[ResolvedRecord::new()]);
        assert_eq!(rows.rows[0], vec!["", "", ""]);
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let csv = render_csv(&build_record_rows(&fields(), &records())).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Contributor Name,Total count,Total amount");
        assert_eq!(lines[1], "Goldman Sachs,14,\"$35,300.00\"");
        assert_eq!(lines[2], "\"Gap, Inc\",0,");
    }

    #[test]
    fn markdown_has_header_and_separator() {
        let md = render_markdown(&build_record_rows(&fields(), &records()));
        let lines: Vec<&str> = md.lines().collect();
        assert!(lines[0].contains("Contributor Name"));
        assert!(lines[1].contains("---"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn table_contains_cells() {
        let table = render_table(&build_record_rows(&fields(), &records()));
        assert!(table.contains("Goldman Sachs"));
        assert!(table.contains("$35,300.00"));
    }

    #[test]
    fn endpoint_rows_filter_by_prefix() {
        let registry = Registry::standard_for_year(2012).unwrap();
        let rows = build_endpoint_rows(&registry, Some("top_"));
        assert_eq!(rows.rows.len(), 4);
        assert_eq!(rows.rows[0][0], "top_individuals");
        assert_eq!(rows.rows[0][2], "cycle, limit");

        let all = build_endpoint_rows(&registry, None);
        assert_eq!(all.rows.len(), 32);
    }

    #[test]
    fn choice_rows_keep_order() {
        let rows = build_choice_rows(&influence_mapping::choices::parties());
        assert_eq!(rows.headers, vec!["Value", "Label"]);
        assert_eq!(rows.rows[0], vec!["D", "Democrat"]);
        assert_eq!(rows.rows[2], vec!["I", "Independent"]);
    }
}
