use crate::core::levies::TaxesAndLevies;
use crate::core::units::{KronerPerKwh, OerePerKwh};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use serde_valid::Validate;
use std::io::Read;

/// Read a comparison request from JSON and check it against the validation
/// rules declared on the input types, so that everything downstream can
/// assume a well-formed request.
pub fn ingest_comparison_input(json: impl Read) -> anyhow::Result<ComparisonInput> {
    let input: ComparisonInput = serde_json::from_reader(json)?;
    input
        .validate()
        .map_err(|err| anyhow!("Comparison input was not valid: {err}"))?;
    Ok(input)
}

/// Everything needed to price one settlement period for a household: the
/// wholesale price, where the household is connected, how much it uses,
/// and the providers competing for it.
#[derive(Clone, Debug, Deserialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComparisonInput {
    #[validate]
    pub spot_price: SpotPriceInput,
    /// The household's estimated consumption over a year, in kWh.
    #[validate(minimum = 0.)]
    pub annual_consumption_kwh: f64,
    /// The grid operator whose distribution area the household is in,
    /// which decides the network tariff.
    pub grid_operator: GridOperator,
    /// Overrides for the national taxes and levies. Absent fields keep
    /// the published rates.
    #[serde(default)]
    #[validate]
    pub taxes_and_levies: Option<TaxesAndLevies>,
    #[validate(min_items = 1)]
    #[validate]
    pub providers: Vec<ProviderDetails>,
    /// Name of a provider to list first regardless of cost, e.g. the
    /// portal owner's own brand.
    #[serde(default)]
    pub pinned_provider: Option<String>,
}

/// A day-ahead wholesale price as published by Nord Pool for one Danish
/// bidding zone, before any fee or tax.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpotPriceInput {
    #[validate]
    pub kr_per_kwh: KronerPerKwh,
    pub bidding_zone: BiddingZone,
    /// Start of the settlement period the price applies to, if known.
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for SpotPriceInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self {
            kr_per_kwh: u.arbitrary()?,
            bidding_zone: u.arbitrary()?,
            starts_at: Option::<i32>::arbitrary(u)?
                .and_then(|secs| DateTime::from_timestamp(secs.into(), 0)),
        })
    }
}

/// The two Danish bidding zones on the Nord Pool day-ahead market. The
/// Great Belt divides them; prices routinely differ across it.
#[derive(Clone, Copy, Debug, Deserialize_enum_str, Serialize_enum_str, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum BiddingZone {
    #[serde(rename = "DK1")]
    Dk1,
    #[serde(rename = "DK2")]
    Dk2,
}

/// Danish distribution grid operators. The list covers the companies with
/// the most metering points; anything else arrives as `Other` and is
/// priced with the default network tariff.
#[derive(Clone, Debug, Deserialize_enum_str, Serialize_enum_str, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "kebab-case")]
pub enum GridOperator {
    Radius,
    N1,
    Cerius,
    Trefor,
    Konstant,
    VoresElnet,
    Dinel,
    Elektrus,
    NordEnergiNet,
    Zeanet,
    #[serde(other)]
    Other(String),
}

/// One electricity provider's published pricing for a variable-price
/// product. Per-kWh fees are in øre/kWh as providers advertise them;
/// flat charges are in kroner.
#[derive(Clone, Debug, Deserialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderDetails {
    #[validate(min_length = 1)]
    pub name: String,
    /// Markup on the spot price, in øre/kWh.
    #[serde(default)]
    #[validate]
    pub markup: OerePerKwh,
    /// Fee for green certificates, in øre/kWh.
    #[serde(default, alias = "greenCertificateFee")]
    #[validate]
    pub green_certificates: OerePerKwh,
    /// The provider's trading costs passed on to the customer, in øre/kWh.
    #[serde(default)]
    #[validate]
    pub trading_costs: OerePerKwh,
    /// Flat subscription, in kr/month.
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub monthly_subscription: f64,
    /// Any flat charge billed once a year, in kr/year.
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub annual_charge: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    #[fixture]
    fn request_json() -> serde_json::Value {
        json!({
            "spotPrice": {"krPerKwh": 1.0, "biddingZone": "DK2", "startsAt": "2024-03-01T13:00:00Z"},
            "annualConsumptionKwh": 4000,
            "gridOperator": "radius",
            "providers": [
                {"name": "Strømlinet", "markup": 13.21, "monthlySubscription": 23.2},
                {"name": "Billig Energi", "markup": 4.0, "greenCertificateFee": 1.9}
            ],
            "pinnedProvider": "Strømlinet"
        })
    }

    #[rstest]
    fn ingest_accepts_a_complete_request(request_json: serde_json::Value) {
        let input = ingest_comparison_input(request_json.to_string().as_bytes()).unwrap();
        assert_eq!(input.spot_price.kr_per_kwh, KronerPerKwh::from(1.0));
        assert_eq!(input.grid_operator, GridOperator::Radius);
        assert_eq!(input.providers.len(), 2);
        assert_eq!(input.pinned_provider, Some("Strømlinet".into()));
    }

    #[rstest]
    fn fee_fields_default_to_zero_when_not_given(request_json: serde_json::Value) {
        let input = ingest_comparison_input(request_json.to_string().as_bytes()).unwrap();
        let billig = &input.providers[1];
        assert_eq!(billig.green_certificates, OerePerKwh::from(1.9));
        assert_eq!(billig.trading_costs, OerePerKwh::from(0.));
        assert_eq!(billig.monthly_subscription, 0.);
        assert_eq!(billig.annual_charge, 0.);
    }

    #[rstest]
    fn ingest_rejects_a_request_without_providers(mut request_json: serde_json::Value) {
        request_json["providers"] = json!([]);
        assert!(ingest_comparison_input(request_json.to_string().as_bytes()).is_err());
    }

    #[rstest]
    fn ingest_rejects_negative_fees(mut request_json: serde_json::Value) {
        request_json["providers"][0]["markup"] = json!(-1.0);
        assert!(ingest_comparison_input(request_json.to_string().as_bytes()).is_err());
    }

    #[rstest]
    fn ingest_rejects_negative_consumption(mut request_json: serde_json::Value) {
        request_json["annualConsumptionKwh"] = json!(-100.);
        assert!(ingest_comparison_input(request_json.to_string().as_bytes()).is_err());
    }

    #[rstest]
    fn ingest_rejects_unknown_fields(mut request_json: serde_json::Value) {
        request_json["discountCode"] = json!("SOMMER24");
        assert!(ingest_comparison_input(request_json.to_string().as_bytes()).is_err());
    }

    #[rstest]
    #[case("radius", GridOperator::Radius)]
    #[case("n1", GridOperator::N1)]
    #[case("vores-elnet", GridOperator::VoresElnet)]
    #[case("nord-energi-net", GridOperator::NordEnergiNet)]
    fn grid_operators_parse_from_their_slugs(
        #[case] slug: &str,
        #[case] expected: GridOperator,
    ) {
        assert_eq!(slug.parse::<GridOperator>().unwrap(), expected);
    }

    #[rstest]
    fn an_unlisted_grid_operator_is_kept_as_other() {
        assert_eq!(
            "hurup-elvaerk".parse::<GridOperator>().unwrap(),
            GridOperator::Other("hurup-elvaerk".into())
        );
    }

    #[rstest]
    fn bidding_zones_use_their_market_names() {
        assert_eq!("DK1".parse::<BiddingZone>().unwrap(), BiddingZone::Dk1);
        assert_eq!(BiddingZone::Dk2.to_string(), "DK2");
        assert!("NO2".parse::<BiddingZone>().is_err());
    }
}
