//! Externally published reference tables: CRP industry categories and
//! independent-expenditure transaction types.
//!
//! Each table is fetched at most once per process and shared by every caller.
//! Concurrent first callers wait on the same fetch. A failed fetch is not
//! remembered, so the next caller tries again. There is no refresh; tests
//! start from a clean slate with [`reset_reference_tables`].

use std::sync::{Arc, RwLock};

use influence_api::Fetcher;
use once_cell::sync::Lazy;
use serde::Serialize;
use tokio::sync::OnceCell;
use url::Url;

use crate::choices::Choices;
use crate::error::MappingError;

pub const CRP_CATEGORIES_URL: &str = "http://www.opensecrets.org/downloads/crp/CRP_Categories.txt";
pub const IE_TRANSACTION_TYPES_URL: &str =
    "http://assets.transparencydata.org.s3.amazonaws.com/docs/transaction_types-20100402.csv";

/// One row of the CRP category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrpCategory {
    pub code: String,
    pub name: String,
    pub order: String,
    pub industry: String,
    pub sector: String,
    pub sector_long: String,
}

/// Category code -> category name, in file order.
pub fn crp_category_choices(categories: &[CrpCategory]) -> Choices {
    categories
        .iter()
        .map(|c| (c.code.clone(), c.name.clone()))
        .collect()
}

/// Parses the CRP categories file: a free-text preamble, a blank line, then a
/// tab-delimited table with a header row.
pub fn parse_crp_categories(text: &str) -> Result<Vec<CrpCategory>, MappingError> {
    let normalized = text.replace("\r\n", "\n");
    let table = normalized
        .split("\n\n")
        .nth(1)
        .ok_or_else(|| MappingError::ReferenceTable {
            table: "crp_categories",
            reason: "no table block after the preamble".to_string(),
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(table.as_bytes());

    let mut categories = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| MappingError::ReferenceTable {
            table: "crp_categories",
            reason: e.to_string(),
        })?;
        let col = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        if col(0).is_empty() {
            continue;
        }
        categories.push(CrpCategory {
            code: col(0),
            name: col(1),
            order: col(2),
            industry: col(3),
            sector: col(4),
            sector_long: col(5),
        });
    }
    Ok(categories)
}

/// Parses the transaction type file: `code,label` rows quoted with `|`.
pub fn parse_transaction_types(text: &str) -> Result<Choices, MappingError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote(b'|')
        .from_reader(text.as_bytes());

    let mut types = Choices::new();
    for record in reader.records() {
        let record = record.map_err(|e| MappingError::ReferenceTable {
            table: "ie_transaction_types",
            reason: e.to_string(),
        })?;
        let clean = |i: usize| record.get(i).map(|v| v.replace('|', "").trim().to_string());
        match (clean(0), clean(1)) {
            (Some(code), Some(label)) if !code.is_empty() => {
                types.insert(code, label);
            }
            _ => tracing::debug!("Skipping transaction type row {:?}", record),
        }
    }
    Ok(types)
}

/// Lazily fetched copies of both tables.
#[derive(Default)]
pub struct ReferenceTables {
    crp_categories: OnceCell<Arc<Vec<CrpCategory>>>,
    ie_transaction_types: OnceCell<Arc<Choices>>,
}

impl ReferenceTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn crp_categories(
        &self,
        fetcher: &dyn Fetcher,
    ) -> Result<Arc<Vec<CrpCategory>>, MappingError> {
        self.crp_categories
            .get_or_try_init(|| async {
                let text = fetch_text(fetcher, CRP_CATEGORIES_URL).await?;
                let categories = parse_crp_categories(&text)?;
                tracing::info!("Loaded {} CRP categories", categories.len());
                Ok(Arc::new(categories))
            })
            .await
            .cloned()
    }

    pub async fn ie_transaction_types(
        &self,
        fetcher: &dyn Fetcher,
    ) -> Result<Arc<Choices>, MappingError> {
        self.ie_transaction_types
            .get_or_try_init(|| async {
                let text = fetch_text(fetcher, IE_TRANSACTION_TYPES_URL).await?;
                let types = parse_transaction_types(&text)?;
                tracing::info!("Loaded {} transaction types", types.len());
                Ok(Arc::new(types))
            })
            .await
            .cloned()
    }
}

async fn fetch_text(fetcher: &dyn Fetcher, url: &str) -> Result<String, MappingError> {
    let url = Url::parse(url).map_err(|e| MappingError::Config(format!("{}: {}", url, e)))?;
    Ok(fetcher.fetch_text(&url).await?)
}

static PROCESS_TABLES: Lazy<RwLock<Arc<ReferenceTables>>> =
    Lazy::new(|| RwLock::new(Arc::new(ReferenceTables::new())));

/// The process-wide tables.
pub fn reference_tables() -> Arc<ReferenceTables> {
    PROCESS_TABLES
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Drops the process-wide tables so the next access fetches again.
pub fn reset_reference_tables() {
    *PROCESS_TABLES.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(ReferenceTables::new());
}
