//! The Influence Explorer endpoint catalog.
//!
//! Entity endpoints take an `entity_id` (free text resolved to a hex id),
//! usually a `cycle` select and a `limit`. Top lists put the limit in the
//! path (`top_:limit.json`) and accept the `-1` "all cycles" choice.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::choices::{election_cycles_between, top_list_cycles};
use crate::descriptor::{
    DescriptorError, EndpointDescriptor, FieldSpec, ParameterSpec, ResponseSchema, Setter,
};
use crate::getters;
use crate::normalize::{pivot_level_breakdown, pivot_party_breakdown, wrap_in_array};
use crate::value::FieldFormat;

/// First cycle offered by entity endpoints.
pub const ENTITY_CYCLES_START: i32 = 1990;

static ENTITY_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]+$").expect("valid entity id pattern"));

/// Canonical entity ids are lowercase hex.
pub fn is_entity_id(value: &str) -> bool {
    ENTITY_ID.is_match(value)
}

fn entity_param(label: &str) -> ParameterSpec {
    ParameterSpec::string("entity_id", label)
        .setter(Setter::LookupEntity)
        .validate(is_entity_id)
}

fn cycle_param(current_year: i32) -> ParameterSpec {
    ParameterSpec::select(
        "cycle",
        "Election Cycle",
        election_cycles_between(ENTITY_CYCLES_START, current_year),
    )
}

fn top_cycle_param(current_year: i32) -> ParameterSpec {
    ParameterSpec::select("cycle", "Election Cycle", top_list_cycles(current_year))
}

fn limit_param() -> ParameterSpec {
    ParameterSpec::integer("limit", "Number of Results").default_value("10")
}

fn top_limit_param() -> ParameterSpec {
    ParameterSpec::integer("limit", "Number of Results")
}

fn count(key: &str) -> FieldSpec {
    FieldSpec::new(key).getter(getters::count)
}

fn currency(key: &str) -> FieldSpec {
    FieldSpec::new(key)
        .format(FieldFormat::Currency)
        .getter(getters::currency)
}

fn titled(key: &str) -> FieldSpec {
    FieldSpec::new(key).getter(getters::title_case)
}

/// `employee/direct/total` count and amount columns shared by contributor
/// and recipient listings.
fn contribution_columns(schema: ResponseSchema, labelled: bool) -> ResponseSchema {
    let label = |field: FieldSpec, text: &str| if labelled { field.label(text) } else { field };
    schema
        .field(label(count("employee_count"), "Employee Contribution Count"))
        .field(currency("employee_amount"))
        .field(label(count("direct_count"), "Direct Contribution Count"))
        .field(currency("direct_amount"))
        .field(label(count("total_count"), "Total Contribution Count"))
        .field(currency("total_amount"))
}

fn breakdown_schema() -> ResponseSchema {
    ResponseSchema::new()
        .field(FieldSpec::new("party"))
        .field(FieldSpec::new("count").label("Number of contributions"))
        .field(FieldSpec::new("amount").label("Total").format(FieldFormat::Currency))
}

fn records_count() -> FieldSpec {
    count("count").label("Number of Records")
}

fn bills_schema() -> ResponseSchema {
    ResponseSchema::new()
        .field(FieldSpec::new("bill_name").label("Bill Number"))
        .field(FieldSpec::new("title").label("Bill Title"))
        .field(FieldSpec::new("congress_no").label("Congress"))
        .field(FieldSpec::new("count").label("Number of Records"))
}

fn regulations_schema(count_label: &str) -> ResponseSchema {
    ResponseSchema::new()
        .field(FieldSpec::new("agency"))
        .field(FieldSpec::new("docket"))
        .field(FieldSpec::new("title"))
        .field(FieldSpec::new("year"))
        .field(FieldSpec::new("count").label(count_label))
}

fn top_list(
    key: &str,
    title: &str,
    kind: &str,
    help: &str,
    current_year: i32,
) -> Result<EndpointDescriptor, DescriptorError> {
    EndpointDescriptor::get(key, title)
        .uri(&format!("/aggregates/{}/top_:limit.json", kind))
        .help_text(help)
        .param(top_cycle_param(current_year))
        .param(top_limit_param())
        .response(top_list_fields(key))
        .build()
}

fn top_list_fields(key: &str) -> ResponseSchema {
    let name_label = match key {
        "top_individuals" => "Contributor",
        "top_organizations" => "Organization",
        "top_politicians" => "Recipient",
        _ => "Industry",
    };
    let mut schema = ResponseSchema::new().field(titled("name").label(name_label));
    if key == "top_politicians" {
        schema = schema
            .field(FieldSpec::new("state"))
            .field(FieldSpec::new("seat").label("Office Sought").getter(getters::seat))
            .field(FieldSpec::new("party").getter(getters::party_name_or_other));
    }
    schema
        .field(count("count").label("Contribution Count"))
        .field(currency("amount").label("Total"))
}

fn politician(current_year: i32) -> Result<Vec<EndpointDescriptor>, DescriptorError> {
    Ok(vec![
        EndpointDescriptor::get("politician_contributors", "Politician - Contributors")
            .uri("/aggregates/pol/:entity_id/contributors.json")
            .help_text("Top organizations contributing to a politician")
            .param(entity_param("Politician"))
            .param(cycle_param(current_year))
            .param(limit_param())
            .response(contribution_columns(
                ResponseSchema::new()
                    .field(FieldSpec::new("name").label("Contributor Name"))
                    .field(FieldSpec::new("type").label("Contributor Type")),
                false,
            ))
            .build()?,
        EndpointDescriptor::get("politician_industries", "Politician - Industries")
            .uri("/aggregates/pol/:entity_id/contributors/industries.json")
            .help_text("Top industries contributing to a politician")
            .param(entity_param("Politician"))
            .param(cycle_param(current_year))
            .param(limit_param())
            .response(
                ResponseSchema::new()
                    .field(titled("name").label("Industry"))
                    .field(count("count").label("Contribution Count"))
                    .field(currency("amount")),
            )
            .build()?,
        EndpointDescriptor::get("politician_unknown_industries", "Politician - Unknown Industries")
            .uri("/aggregates/pol/:entity_id/contributors/industries_unknown.json")
            .help_text(
                "Contribution count and total for a politician from unknown industries. \
                 The count is reported as a whole number.",
            )
            .param(entity_param("Politician"))
            .param(cycle_param(current_year))
            .response(
                ResponseSchema::new()
                    .before_filter(wrap_in_array)
                    .field(count("count").label("Contribution Count"))
                    .field(currency("amount").label("Contribution Amount")),
            )
            .build()?,
        EndpointDescriptor::get("politician_local_breakdown", "Politician - Local Breakdown")
            .uri("/aggregates/pol/:entity_id/contributors/local_breakdown.json")
            .help_text("In-state vs out-of-state contributions to a politician. Display as table only.")
            .param(entity_param("Politician"))
            .param(cycle_param(current_year))
            .response(
                ResponseSchema::new()
                    .before_filter(wrap_in_array)
                    .field(FieldSpec::new("in-state").getter(getters::contribution_summary))
                    .field(FieldSpec::new("out-of-state").getter(getters::contribution_summary)),
            )
            .build()?,
        EndpointDescriptor::get("politician_type_breakdown", "Politician - Type Breakdown")
            .uri("/aggregates/pol/:entity_id/contributors/type_breakdown.json")
            .help_text("Individual vs organization contributions to a politician. Display as table only.")
            .param(entity_param("Politician"))
            .param(cycle_param(current_year))
            .response(
                ResponseSchema::new()
                    .before_filter(wrap_in_array)
                    .field(FieldSpec::new("Individuals").getter(getters::contribution_summary))
                    .field(
                        FieldSpec::new("PACs")
                            .label("PACs")
                            .getter(getters::contribution_summary),
                    ),
            )
            .build()?,
        EndpointDescriptor::get("politician_fec_summary", "Politician - FEC Summary")
            .uri("/aggregates/pol/:entity_id/fec_summary.json")
            .help_text("The latest figures from the FEC's summary report.")
            .param(entity_param("Politician"))
            .response(
                ResponseSchema::new()
                    .before_filter(wrap_in_array)
                    .field(FieldSpec::new("office").getter(getters::fec_office))
                    .field(currency("total_raised"))
                    .field(currency("contributions_pac").label("PAC Contributions"))
                    .field(currency("contributions_candidate").label("Candidate Contributions"))
                    .field(currency("contributions_indiv").label("Individual Contributions"))
                    .field(currency("contributions_party").label("Party Contributions"))
                    .field(currency("transfers_in"))
                    .field(currency("cash_on_hand"))
                    .field(currency("disbursements"))
                    .field(FieldSpec::new("total_receipts_rank"))
                    .field(FieldSpec::new("total_disbursements_rank"))
                    .field(FieldSpec::new("max_rank").label("Rankings Out Of"))
                    .field(
                        FieldSpec::new("date")
                            .label("Date of report")
                            .format(FieldFormat::Date)
                            .getter(getters::date),
                    ),
            )
            .build()?,
        EndpointDescriptor::get("politician_fec_indexp", "Politician - FEC Independent Expenditures")
            .uri("/aggregates/pol/:entity_id/fec_indexp.json")
            .help_text("Top independent expenditures for and against a politician.")
            .param(entity_param("Politician"))
            .response(
                ResponseSchema::new()
                    .field(titled("committee_name"))
                    .field(currency("amount"))
                    .field(FieldSpec::new("support_oppose").label("Support/Oppose")),
            )
            .build()?,
    ])
}

fn individual(current_year: i32) -> Result<Vec<EndpointDescriptor>, DescriptorError> {
    let listing = |key: &str, title: &str, uri: &str, help: &str, response: ResponseSchema| {
        EndpointDescriptor::get(key, title)
            .uri(uri)
            .help_text(help)
            .param(entity_param("Individual"))
            .param(cycle_param(current_year))
            .param(limit_param())
            .response(response)
            .build()
    };

    Ok(vec![
        listing(
            "individual_org_recipients",
            "Individual - Top Organization Recipients",
            "/aggregates/indiv/:entity_id/recipient_orgs.json",
            "Top organizations receiving contributions from an individual.",
            ResponseSchema::new()
                .field(titled("recipient_name"))
                .field(count("count").label("Number of Contributions"))
                .field(currency("amount")),
        )?,
        listing(
            "individual_pol_recipients",
            "Individual - Top Politician Recipients",
            "/aggregates/indiv/:entity_id/recipient_pols.json",
            "Top politicians receiving contributions from an individual.",
            ResponseSchema::new()
                .field(titled("recipient_name"))
                .field(FieldSpec::new("party"))
                .field(FieldSpec::new("state"))
                .field(count("count").label("Number of Contributions"))
                .field(currency("amount")),
        )?,
        EndpointDescriptor::get("individual_party_breakdown", "Individual - Party Breakdown")
            .uri("/aggregates/indiv/:entity_id/recipients/party_breakdown.json")
            .help_text("Amounts contributed to each party by an individual.")
            .param(entity_param("Individual"))
            .param(cycle_param(current_year))
            .response(breakdown_schema().before_filter(pivot_party_breakdown))
            .build()?,
        listing(
            "individual_registrants",
            "Individual - Lobbying Registrants",
            "/aggregates/indiv/:entity_id/registrants.json",
            "Lobbying firms that employed an individual.",
            ResponseSchema::new()
                .field(FieldSpec::new("registrant_name"))
                .field(records_count()),
        )?,
        listing(
            "individual_clients",
            "Individual - Clients",
            "/aggregates/indiv/:entity_id/clients.json",
            "Clients an individual (lobbyist) was contracted to work for.",
            ResponseSchema::new()
                .field(FieldSpec::new("client_name"))
                .field(records_count()),
        )?,
        listing(
            "individual_issues",
            "Individual - Issues",
            "/aggregates/indiv/:entity_id/issues.json",
            "Issues an individual (lobbyist) has worked on.",
            ResponseSchema::new()
                .field(FieldSpec::new("issue"))
                .field(records_count()),
        )?,
    ])
}

fn organization(current_year: i32) -> Result<Vec<EndpointDescriptor>, DescriptorError> {
    let listing = |key: &str, title: &str, uri: &str, help: &str, response: ResponseSchema| {
        EndpointDescriptor::get(key, title)
            .uri(uri)
            .help_text(help)
            .param(entity_param("Organization"))
            .param(cycle_param(current_year))
            .param(limit_param())
            .response(response)
            .build()
    };
    let breakdown = |key: &str, title: &str, uri: &str, help: &str, response: ResponseSchema| {
        EndpointDescriptor::get(key, title)
            .uri(uri)
            .help_text(help)
            .param(entity_param("Organization"))
            .param(cycle_param(current_year))
            .response(response)
            .build()
    };

    Ok(vec![
        listing(
            "organization_recipients",
            "Organization - Top Recipients",
            "/aggregates/org/:entity_id/recipients.json",
            "Top politicians receiving contributions from an organization.",
            contribution_columns(
                ResponseSchema::new()
                    .field(FieldSpec::new("name").label("Recipient Name"))
                    .field(FieldSpec::new("party").getter(getters::party_name)),
                true,
            ),
        )?,
        listing(
            "organization_pac_recipients",
            "Organization - PAC Recipients",
            "/aggregates/org/:entity_id/recipient_pacs.json",
            "Top PACs receiving contributions from an organization.",
            contribution_columns(
                ResponseSchema::new().field(titled("name").label("Organization Name")),
                true,
            ),
        )?,
        breakdown(
            "organization_party_breakdown",
            "Organization - Party Breakdown",
            "/aggregates/org/:entity_id/recipients/party_breakdown.json",
            "Amounts contributed to each party by an organization.",
            breakdown_schema().before_filter(pivot_party_breakdown),
        )?,
        breakdown(
            "organization_level_breakdown",
            "Organization - Level Breakdown",
            "/aggregates/org/:entity_id/recipients/level_breakdown.json",
            "Amounts contributed to state vs federal levels by an organization.",
            breakdown_schema().before_filter(pivot_level_breakdown),
        )?,
        listing(
            "organization_registrants",
            "Organization - Lobbying Registrants",
            "/aggregates/org/:entity_id/registrants.json",
            "Lobbying firms hired by an organization",
            ResponseSchema::new()
                .field(FieldSpec::new("registrant_name"))
                .field(records_count()),
        )?,
        listing(
            "organization_issues",
            "Organization - Issues",
            "/aggregates/org/:entity_id/issues.json",
            "Issues an organization has hired lobbyists for.",
            ResponseSchema::new()
                .field(FieldSpec::new("issue"))
                .field(records_count()),
        )?,
        listing(
            "organization_bills",
            "Organization - Bills",
            "/aggregates/org/:entity_id/bills.json",
            "Bills an organization has lobbied on.",
            bills_schema(),
        )?,
        listing(
            "organization_lobbyists",
            "Organization - Lobbyists",
            "/aggregates/org/:entity_id/lobbyists.json",
            "Lobbyists hired by an organization.",
            ResponseSchema::new()
                .field(titled("lobbyist_name"))
                .field(FieldSpec::new("count").label("Number of Records")),
        )?,
        breakdown(
            "organization_registrant_clients",
            "Organization - Registrant Clients",
            "/aggregates/org/:entity_id/registrant/clients.json",
            "Clients that hired an organization to lobby, if organization is a lobbying firm.",
            ResponseSchema::new()
                .field(titled("client_name"))
                .field(FieldSpec::new("count").label("Number of Records"))
                .field(currency("amount")),
        )?,
        listing(
            "organization_registrant_issues",
            "Organization - Registrant Issues",
            "/aggregates/org/:entity_id/registrant/issues.json",
            "Issues an organization has lobbied on, if organization is a lobbying firm.",
            ResponseSchema::new()
                .field(FieldSpec::new("issue"))
                .field(records_count()),
        )?,
        listing(
            "organization_registrant_bills",
            "Organization - Registrant Bills",
            "/aggregates/org/:entity_id/registrant/bills.json",
            "Bills an organization has lobbied on, if organization is a lobbying firm.",
            bills_schema(),
        )?,
        listing(
            "organization_registrant_lobbyists",
            "Organization - Registrant Lobbyists",
            "/aggregates/org/:entity_id/registrant/lobbyists.json",
            "Lobbyists employed by an organization.",
            ResponseSchema::new()
                .field(titled("lobbyist_name"))
                .field(FieldSpec::new("count").label("Number of Records")),
        )?,
        listing(
            "organization_regs_matches",
            "Organization - Mentions in Regulations",
            "/aggregates/org/:entity_id/regulations_text.json",
            "Regulatory dockets that most frequently mention an organization.",
            regulations_schema("Mentions"),
        )?,
        listing(
            "organization_regs_submissions",
            "Organization - Regulations Submissions",
            "/aggregates/org/:entity_id/regulations_submitter.json",
            "Regulatory dockets with the most submissions from an organization.",
            regulations_schema("Submissions"),
        )?,
        listing(
            "organization_faca_memberships",
            "Organization - FACA Memberships",
            "/aggregates/org/:entity_id/faca.json",
            "Employee memberships on federal advisory committees for an organization.",
            ResponseSchema::new()
                .field(FieldSpec::new("agency_name"))
                .field(FieldSpec::new("member_count").label("Employees on a Committee"))
                .field(FieldSpec::new("committee_count").label("Committees Served on")),
        )?,
        EndpointDescriptor::get("organization_fec_summary", "Organization - FEC Summary")
            .uri("/aggregates/org/:entity_id/fec_summary.json")
            .help_text("Latest figures for an organization from the FEC's summary report.")
            .param(entity_param("Organization"))
            .response(
                ResponseSchema::new()
                    .before_filter(wrap_in_array)
                    .field(currency("contributions_from_indiv").label("Contributions from Individuals"))
                    .field(currency("contributions_from_pacs").label("Contributions from PACs"))
                    .field(currency("loans_received"))
                    .field(currency("nonfederal_transfers_received"))
                    .field(currency("transfers_from_affiliates"))
                    .field(currency("total_raised"))
                    .field(currency("cash_on_hand"))
                    .field(currency("disbursements"))
                    .field(currency("party_coordinated_expenditures_made"))
                    .field(currency("contributions_to_committees"))
                    .field(currency("independent_expenditures_made"))
                    .field(currency("nonfederal_expenditure_share"))
                    .field(currency("debts")),
            )
            .build()?,
    ])
}

fn industry(current_year: i32) -> Result<Vec<EndpointDescriptor>, DescriptorError> {
    Ok(vec![EndpointDescriptor::get("industry_orgs", "Industry - Top Organizations")
        .uri("/aggregates/industry/:entity_id/orgs.json")
        .help_text("Top organizations in an industry by dollars contributed.")
        .param(entity_param("Industry"))
        .param(cycle_param(current_year))
        .param(limit_param())
        .response(contribution_columns(
            ResponseSchema::new().field(FieldSpec::new("name").label("Organization Name")),
            true,
        ))
        .build()?])
}

fn top_lists(current_year: i32) -> Result<Vec<EndpointDescriptor>, DescriptorError> {
    Ok(vec![
        top_list(
            "top_individuals",
            "Top Individual Contributors",
            "indivs",
            "Top n individual contributors in a cycle, without regard to party",
            current_year,
        )?,
        top_list(
            "top_organizations",
            "Top Organizations by Contributions",
            "orgs",
            "Top n organizations by contribution dollars in a cycle",
            current_year,
        )?,
        top_list(
            "top_politicians",
            "Top Politicians by Contributions Received, All Offices",
            "pols",
            "Top n politicians by contribution dollars received in a cycle",
            current_year,
        )?,
        top_list(
            "top_industries",
            "Top Industries by Amount Contributed",
            "industries",
            "Top n Industries by the amount contributed in a given cycle",
            current_year,
        )?,
    ])
}

/// Every endpoint, in catalog order, with cycle choices computed up to
/// `current_year`.
pub fn all(current_year: i32) -> Result<Vec<EndpointDescriptor>, DescriptorError> {
    let mut endpoints = politician(current_year)?;
    endpoints.extend(individual(current_year)?);
    endpoints.extend(organization(current_year)?);
    endpoints.extend(industry(current_year)?);
    endpoints.extend(top_lists(current_year)?);
    Ok(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParamKind;

    fn find(endpoints: &[EndpointDescriptor], key: &str) -> EndpointDescriptor {
        endpoints
            .iter()
            .find(|e| e.key == key)
            .cloned()
            .unwrap_or_else(|| panic!("missing endpoint {key}"))
    }

    #[test]
    fn catalog_has_every_endpoint_once() {
        let endpoints = all(2012).unwrap();
        assert_eq!(endpoints.len(), 32);
        let mut keys: Vec<_> = endpoints.iter().map(|e| e.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 32);
    }

    #[test]
    fn unknown_industries_count_is_integral() {
        let endpoint = find(&all(2012).unwrap(), "politician_unknown_industries");
        assert!(endpoint.help_text.contains("whole number"));
        let record = crate::normalize(r#"{"count": "14.7", "amount": 35300}"#, &endpoint.response)
            .unwrap()
            .remove(0);
        assert_eq!(record.get("count"), Some(&crate::FieldValue::Integer(14)));
    }

    #[test]
    fn entity_ids_are_lowercase_hex() {
        assert!(is_entity_id("abc123"));
        assert!(is_entity_id("4148b26f6f1c437cb50ea9ca4699417a"));
        assert!(!is_entity_id("ABC123"));
        assert!(!is_entity_id("Nancy Pelosi"));
        assert!(!is_entity_id(""));
    }

    #[test]
    fn entity_endpoints_resolve_and_validate_entity_id() {
        for endpoint in all(2012).unwrap() {
            if endpoint.key.starts_with("top_") {
                assert!(endpoint.parameter("entity_id").is_none());
                continue;
            }
            let param = endpoint.parameter("entity_id").unwrap();
            assert!(matches!(param.setter, Some(Setter::LookupEntity)), "{}", endpoint.key);
            assert!(param.validator.is_some(), "{}", endpoint.key);
            assert!(endpoint.uri.has_placeholder("entity_id"), "{}", endpoint.key);
        }
    }

    #[test]
    fn fec_summaries_have_no_cycle_or_limit() {
        let endpoints = all(2012).unwrap();
        for key in ["politician_fec_summary", "organization_fec_summary", "politician_fec_indexp"] {
            let endpoint = find(&endpoints, key);
            assert!(endpoint.parameter("cycle").is_none(), "{key}");
            assert!(endpoint.parameter("limit").is_none(), "{key}");
        }
    }

    #[test]
    fn entity_cycles_start_in_1990() {
        let endpoint = find(&all(2012).unwrap(), "politician_contributors");
        let cycle = endpoint.parameter("cycle").unwrap();
        assert_eq!(cycle.kind, ParamKind::Select);
        assert_eq!(cycle.options.keys().next().map(String::as_str), Some("1990"));
        assert_eq!(cycle.options.keys().last().map(String::as_str), Some("2012"));
        assert_eq!(
            endpoint.parameter("limit").unwrap().default.as_deref(),
            Some("10")
        );
    }

    #[test]
    fn top_lists_template_the_limit() {
        let endpoint = find(&all(2012).unwrap(), "top_politicians");
        assert_eq!(endpoint.uri.as_str(), "/aggregates/pols/top_:limit.json");
        let limit = endpoint.parameter("limit").unwrap();
        assert_eq!(limit.kind, ParamKind::Integer);
        assert!(limit.default.is_none());

        let cycle = endpoint.parameter("cycle").unwrap();
        assert_eq!(cycle.options.keys().next().map(String::as_str), Some("2000"));
        assert_eq!(cycle.options.get("-1").map(String::as_str), Some("All available"));

        let names: Vec<_> = endpoint.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "state", "seat", "party", "count", "amount"]);
    }

    #[test]
    fn contributor_columns_keep_upstream_labels() {
        let endpoints = all(2012).unwrap();
        let contributors = find(&endpoints, "politician_contributors");
        assert_eq!(contributors.fields()[2].label, "Employee count");
        let recipients = find(&endpoints, "organization_recipients");
        assert_eq!(recipients.fields()[2].label, "Employee Contribution Count");
        assert_eq!(recipients.fields()[3].format, FieldFormat::Currency);
    }
}
