use anyhow::Result;
use clap::{Args, ValueEnum};
use influence_mapping::choices::{
    current_year, election_cycles_since, fec_offices, filing_type_choices, parties, seats,
    top_list_cycles, Choices,
};
use influence_mapping::reference::crp_category_choices;
use influence_mapping::Mapping;

use crate::output::{build_choice_rows, print_json, print_rows, OutputFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Catalog {
    Parties,
    Seats,
    FecOffices,
    FilingTypes,
    Cycles,
    TopCycles,
    CrpCategories,
    IeTransactionTypes,
}

#[derive(Args)]
pub struct ChoicesArgs {
    /// Which catalog to list
    #[arg(value_enum)]
    pub catalog: Catalog,

    /// First cycle for `cycles`
    #[arg(long, default_value = "1990")]
    pub since: i32,
}

pub async fn run(args: &ChoicesArgs, mapping: &Mapping, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json && args.catalog == Catalog::CrpCategories {
        print_json(mapping.crp_categories().await?.as_ref());
        return Ok(());
    }

    let choices: Choices = match args.catalog {
        Catalog::Parties => parties(),
        Catalog::Seats => seats(),
        Catalog::FecOffices => fec_offices(),
        Catalog::FilingTypes => filing_type_choices(),
        Catalog::Cycles => election_cycles_since(args.since),
        Catalog::TopCycles => top_list_cycles(current_year()),
        Catalog::CrpCategories => crp_category_choices(&mapping.crp_categories().await?),
        Catalog::IeTransactionTypes => mapping.ie_transaction_types().await?.as_ref().clone(),
    };

    match format {
        OutputFormat::Json => print_json(&choices),
        _ => print_rows(&build_choice_rows(&choices), format)?,
    }
    Ok(())
}
