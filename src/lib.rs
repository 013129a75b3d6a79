pub mod comparison;
pub mod core;
pub mod errors;
pub mod input;
pub mod output;

extern crate lazy_static;

pub use crate::comparison::ComparisonResults;
use crate::comparison::Comparison;
use crate::core::grid::NetworkTariffSource;
use crate::errors::{ComparisonError, ElprisError, OutputError};
use crate::input::ingest_comparison_input;
use crate::output::Output;
use csv::WriterBuilder;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::io::Read;

/// Run a full comparison: ingest a JSON request, price and rank the
/// offers, and write the result tables to the output.
///
/// Arguments:
/// * `input` - a comparison request as JSON
/// * `output` - where result files go; a no-op output skips writing
/// * `live_tariffs` - a live network tariff source to consult ahead of
///   the bundled static table, if one is available
pub fn run_comparison(
    input: impl Read,
    output: impl Output,
    live_tariffs: Option<&dyn NetworkTariffSource>,
) -> Result<ComparisonResults, ElprisError> {
    let input = ingest_comparison_input(input)?;

    let comparison = Comparison::from_input(input, live_tariffs)
        .map_err(|err| ElprisError::FailureInComparison(ComparisonError::new(err)))?;

    let results = comparison.run();

    if !output.is_noop() {
        write_comparison_output_files(output, &results)
            .map_err(|err| ElprisError::ErrorInOutput(OutputError::new(err)))?;
    }

    Ok(results)
}

const OFFER_HEADINGS: [&str; 6] = [
    "Provider",
    "Price excl. VAT",
    "Price incl. VAT",
    "Flat fees",
    "Estimated cost",
    "Pinned",
];

lazy_static! {
    pub static ref UNITS_MAP: IndexMap<&'static str, &'static str> = IndexMap::from([
        ("Provider", ""),
        ("Price excl. VAT", "[kr/kWh]"),
        ("Price incl. VAT", "[kr/kWh]"),
        ("Flat fees", "[kr/month]"),
        ("Estimated cost", "[kr/month]"),
        ("Pinned", "[yes/no]")
    ]);
}

fn write_comparison_output_files(
    output: impl Output,
    results: &ComparisonResults,
) -> Result<(), anyhow::Error> {
    write_summary_output_file(&output, results)?;
    write_offers_output_file(&output, results)?;
    Ok(())
}

/// Write the shared figures every offer was composed from, one name,
/// unit and value per row.
fn write_summary_output_file(
    output: &impl Output,
    results: &ComparisonResults,
) -> Result<(), anyhow::Error> {
    println!("writing out to summary");
    let writer = output.writer_for_location_key("summary", "csv")?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record(["Spot price", "[kr/kWh]", &results.spot_price.to_string()])?;
    writer.write_record(["Bidding zone", "", &results.bidding_zone.to_string()])?;
    if let Some(starts_at) = results.period_starts_at {
        writer.write_record(["Period start", "", &starts_at.to_rfc3339()])?;
    }
    writer.write_record(["Grid operator", "", &results.grid_operator.to_string()])?;
    writer.write_record([
        "Network tariff",
        "[kr/kWh]",
        &results.network_tariff.tariff.to_string(),
    ])?;
    writer.write_record([
        "Network tariff origin",
        "",
        &results.network_tariff.origin.to_string(),
    ])?;
    writer.write_record([
        "Annual consumption",
        "[kWh]",
        &results.annual_consumption_kwh.to_string(),
    ])?;
    writer.flush()?;

    Ok(())
}

/// Write the ranked offer table with a headings row and a units row
/// ahead of the data.
fn write_offers_output_file(
    output: &impl Output,
    results: &ComparisonResults,
) -> Result<(), anyhow::Error> {
    println!("writing out to comparison");
    let writer = output.writer_for_location_key("comparison", "csv")?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    let units_row = OFFER_HEADINGS.map(|heading| {
        if UNITS_MAP.contains_key(heading) {
            UNITS_MAP[heading]
        } else {
            "Unit not defined"
        }
    });

    writer.write_record(OFFER_HEADINGS)?;
    writer.write_record(units_row)?;

    for offer in &results.offers {
        let row = vec![
            offer.provider.clone(),
            offer.price_before_vat.to_string(),
            offer.price_incl_vat.to_string(),
            offer.flat_monthly_fees.to_string(),
            offer.monthly_cost.to_string(),
            (if offer.pinned { "yes" } else { "no" }).to_string(),
        ];
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}
