//! Availability commands.

use chrono::NaiveDate;
use courtside_availability::{AvailabilityResolver, TemplateLookup};
use courtside_core::{AvailabilitySlot, FetchAvailabilityParams, next_slots_now};
use courtside_providers::ProviderRegistry;
use serde::Serialize;

use crate::error::{CliError, CliResult};
use crate::output::{print_json, print_result};

/// Answer of `courtside has-templates`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateReport {
    pub facility_id: String,
    pub has_templates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TemplateReport {
    pub fn new(facility_id: &str, lookup: &TemplateLookup) -> Self {
        let error = match lookup {
            TemplateLookup::FetchFailed(message) => Some(message.clone()),
            TemplateLookup::Found | TemplateLookup::NotFound => None,
        };
        Self {
            facility_id: facility_id.to_string(),
            has_templates: lookup.has_templates(),
            error,
        }
    }
}

pub async fn availability(
    resolver: &AvailabilityResolver,
    provider_id: &str,
    params: FetchAvailabilityParams,
    pretty: bool,
) -> CliResult<()> {
    let result = resolver.service().fetch_availability(provider_id, params).await;
    print_result(&result, pretty)
}

pub async fn today(
    resolver: &AvailabilityResolver,
    provider_id: &str,
    facility_external_id: Option<&str>,
    include_tomorrow: bool,
    pretty: bool,
) -> CliResult<()> {
    let result = resolver
        .service()
        .fetch_today_availability(provider_id, facility_external_id, include_tomorrow)
        .await;
    print_result(&result, pretty)
}

pub async fn local(
    resolver: &AvailabilityResolver,
    facility_id: &str,
    dates: &[NaiveDate],
    pretty: bool,
) -> CliResult<()> {
    let result = resolver.local().fetch_local_availability(facility_id, dates).await;
    print_result(&result, pretty)
}

pub async fn has_templates(
    resolver: &AvailabilityResolver,
    facility_id: &str,
    pretty: bool,
) -> CliResult<()> {
    let lookup = resolver.local().check_local_templates(facility_id).await;
    let report = TemplateReport::new(facility_id, &lookup);
    print_json(&report, pretty)?;
    match report.error {
        Some(message) => Err(CliError::Lookup(message)),
        None => Ok(()),
    }
}

pub async fn resolve(
    resolver: &AvailabilityResolver,
    facility_id: &str,
    provider_id: Option<&str>,
    params: FetchAvailabilityParams,
    pretty: bool,
) -> CliResult<()> {
    let result = resolver
        .resolve_availability(facility_id, provider_id, params)
        .await;
    print_result(&result, pretty)
}

/// Resolves availability and prints only the next `count` upcoming slots.
pub async fn next(
    resolver: &AvailabilityResolver,
    facility_id: &str,
    provider_id: Option<&str>,
    params: FetchAvailabilityParams,
    count: usize,
    pretty: bool,
) -> CliResult<()> {
    let result = resolver
        .resolve_availability(facility_id, provider_id, params)
        .await;
    if !result.success {
        return print_result(&result, pretty);
    }

    let upcoming: Vec<AvailabilitySlot> = next_slots_now(&result.slots, count);
    print_json(&upcoming, pretty)
}

/// Lists the provider types this build can talk to.
pub fn providers(pretty: bool) -> CliResult<()> {
    let types: Vec<&str> = ProviderRegistry::with_defaults()
        .registered_types()
        .iter()
        .map(|ty| ty.as_str())
        .collect();
    print_json(&types, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_report_shapes() {
        let found = TemplateReport::new("f1", &TemplateLookup::Found);
        assert!(found.has_templates);
        assert!(found.error.is_none());

        let failed = TemplateReport::new("f1", &TemplateLookup::FetchFailed("backend down".into()));
        assert!(!failed.has_templates);
        insta::assert_json_snapshot!(failed, @r#"
        {
          "facilityId": "f1",
          "hasTemplates": false,
          "error": "backend down"
        }
        "#);
    }
}
