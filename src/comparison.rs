use crate::core::grid::{
    resolve_network_tariff, NetworkTariffSource, ResolvedNetworkTariff, StaticTariffTable,
};
use crate::core::levies::TaxesAndLevies;
use crate::core::pricing::{
    calc_monthly_cost, calc_price_before_vat, calc_price_per_kwh_incl_vat, ProviderFees,
};
use crate::core::ranking::{rank_offers, RankingPolicy};
use crate::core::units::{KronerPerKwh, MONTHS_PER_YEAR};
use crate::input::{BiddingZone, ComparisonInput, GridOperator, ProviderDetails};
use anyhow::bail;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use tracing::info;

/// A comparison ready to run: the input resolved against tariff sources
/// and reshaped so that pricing each offer is a pure calculation.
#[derive(Debug)]
pub struct Comparison {
    spot_price: KronerPerKwh,
    bidding_zone: BiddingZone,
    period_starts_at: Option<DateTime<Utc>>,
    annual_consumption_kwh: f64,
    grid_operator: GridOperator,
    network_tariff: ResolvedNetworkTariff,
    levies: TaxesAndLevies,
    candidates: Vec<CandidateOffer>,
    ranking: RankingPolicy,
}

#[derive(Debug)]
struct CandidateOffer {
    provider: String,
    fees: ProviderFees,
    flat_monthly_fees: f64,
}

impl From<&ProviderDetails> for CandidateOffer {
    fn from(details: &ProviderDetails) -> Self {
        Self {
            provider: details.name.clone(),
            fees: ProviderFees {
                markup: details.markup,
                green_certificates: details.green_certificates,
                trading_costs: details.trading_costs,
            },
            // An annual charge spreads over the year alongside the
            // subscription.
            flat_monthly_fees: details.monthly_subscription
                + details.annual_charge / MONTHS_PER_YEAR as f64,
        }
    }
}

impl Comparison {
    /// Build a comparison from a validated request, resolving the network
    /// tariff against the bundled static table.
    ///
    /// Arguments:
    /// * `input` - the ingested comparison request
    /// * `live_tariffs` - a live tariff source to prefer, if one is up;
    ///   tariff substitution on failure happens here, never inside the
    ///   price calculation
    pub fn from_input(
        input: ComparisonInput,
        live_tariffs: Option<&dyn NetworkTariffSource>,
    ) -> anyhow::Result<Self> {
        Self::from_input_with_fallback(input, live_tariffs, &StaticTariffTable::bundled())
    }

    pub fn from_input_with_fallback(
        input: ComparisonInput,
        live_tariffs: Option<&dyn NetworkTariffSource>,
        fallback: &StaticTariffTable,
    ) -> anyhow::Result<Self> {
        let repeated_names = input
            .providers
            .iter()
            .map(|provider| provider.name.as_str())
            .duplicates()
            .collect_vec();
        if !repeated_names.is_empty() {
            bail!(
                "Provider names in a comparison were expected to be unique, but these were repeated: {}",
                repeated_names.iter().join(", ")
            );
        }

        let network_tariff = resolve_network_tariff(live_tariffs, fallback, &input.grid_operator);

        Ok(Self {
            spot_price: input.spot_price.kr_per_kwh,
            bidding_zone: input.spot_price.bidding_zone,
            period_starts_at: input.spot_price.starts_at,
            annual_consumption_kwh: input.annual_consumption_kwh,
            grid_operator: input.grid_operator,
            network_tariff,
            levies: input.taxes_and_levies.unwrap_or_default(),
            candidates: input.providers.iter().map_into().collect(),
            ranking: RankingPolicy::new(input.pinned_provider),
        })
    }

    /// Price every candidate offer and rank the lot. Each offer composes
    /// from the same spot price, network tariff and levies; only the
    /// provider's own fees differ.
    pub fn run(&self) -> ComparisonResults {
        let offers = self
            .candidates
            .iter()
            .map(|candidate| {
                let price_before_vat = calc_price_before_vat(
                    self.spot_price,
                    &candidate.fees,
                    self.network_tariff.tariff,
                    &self.levies,
                );
                let price_incl_vat = calc_price_per_kwh_incl_vat(
                    self.spot_price,
                    &candidate.fees,
                    self.network_tariff.tariff,
                    &self.levies,
                );
                ProviderCost {
                    provider: candidate.provider.clone(),
                    price_before_vat,
                    price_incl_vat,
                    flat_monthly_fees: candidate.flat_monthly_fees,
                    monthly_cost: calc_monthly_cost(
                        price_incl_vat,
                        self.annual_consumption_kwh,
                        candidate.flat_monthly_fees,
                    ),
                    pinned: self.ranking.is_pinned(&candidate.provider),
                }
            })
            .collect();

        info!(
            "Priced {} offers for {} kWh/yr on the '{}' grid ({} network tariff)",
            self.candidates.len(),
            self.annual_consumption_kwh,
            self.grid_operator,
            self.network_tariff.origin,
        );

        ComparisonResults {
            spot_price: self.spot_price,
            bidding_zone: self.bidding_zone,
            period_starts_at: self.period_starts_at,
            annual_consumption_kwh: self.annual_consumption_kwh,
            grid_operator: self.grid_operator.clone(),
            network_tariff: self.network_tariff,
            offers: rank_offers(offers, &self.ranking),
        }
    }
}

/// The priced and ranked offers for one settlement period, plus the
/// shared figures they were composed from.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResults {
    pub spot_price: KronerPerKwh,
    pub bidding_zone: BiddingZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_starts_at: Option<DateTime<Utc>>,
    pub annual_consumption_kwh: f64,
    pub grid_operator: GridOperator,
    pub network_tariff: ResolvedNetworkTariff,
    pub offers: Vec<ProviderCost>,
}

/// One provider's offer, fully priced.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCost {
    pub provider: String,
    pub price_before_vat: KronerPerKwh,
    pub price_incl_vat: KronerPerKwh,
    pub flat_monthly_fees: f64,
    pub monthly_cost: f64,
    pub pinned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{TariffLookupError, TariffOrigin};
    use crate::input::ingest_comparison_input;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    fn input_from(value: serde_json::Value) -> ComparisonInput {
        ingest_comparison_input(value.to_string().as_bytes()).unwrap()
    }

    #[fixture]
    fn copenhagen_request() -> ComparisonInput {
        input_from(json!({
            "spotPrice": {"krPerKwh": 1.00, "biddingZone": "DK2"},
            "annualConsumptionKwh": 4000,
            "gridOperator": "radius",
            "providers": [
                {"name": "Strømlinet", "markup": 13.21, "monthlySubscription": 23.2},
                {"name": "Billig Energi", "markup": 4.0, "monthlySubscription": 29.0},
            ],
            "pinnedProvider": "Strømlinet"
        }))
    }

    struct CityHallSource;

    impl NetworkTariffSource for CityHallSource {
        fn tariff_for(&self, _: &GridOperator) -> Result<KronerPerKwh, TariffLookupError> {
            Ok(KronerPerKwh::from(0.217))
        }
    }

    #[rstest]
    fn a_comparison_prices_every_provider(copenhagen_request: ComparisonInput) {
        let results = Comparison::from_input(copenhagen_request, Some(&CityHallSource))
            .unwrap()
            .run();

        assert_eq!(results.network_tariff.origin, TariffOrigin::Live);
        assert_eq!(results.offers.len(), 2);

        let stroemlinet = &results.offers[0];
        assert_eq!(stroemlinet.provider, "Strømlinet");
        assert!(stroemlinet.pinned);
        assert_relative_eq!(
            stroemlinet.price_incl_vat.value(),
            3.186375,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            stroemlinet.monthly_cost,
            3.186375 * (4000. / 12.) + 23.2,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn the_pinned_provider_leads_even_when_dearer(copenhagen_request: ComparisonInput) {
        let results = Comparison::from_input(copenhagen_request, None).unwrap().run();

        // Strømlinet's markup prices it above Billig Energi, yet it leads.
        assert_eq!(results.offers[0].provider, "Strømlinet");
        assert_eq!(results.offers[1].provider, "Billig Energi");
        assert!(results.offers[0].monthly_cost > results.offers[1].monthly_cost);
    }

    #[rstest]
    fn without_a_live_source_the_static_table_prices_the_grid(copenhagen_request: ComparisonInput) {
        let results = Comparison::from_input(copenhagen_request, None).unwrap().run();
        assert_eq!(results.network_tariff.origin, TariffOrigin::Static);
        assert_eq!(results.network_tariff.tariff, KronerPerKwh::from(0.2169));
    }

    #[rstest]
    fn levy_overrides_flow_into_every_offer() {
        let results = Comparison::from_input(
            input_from(json!({
                "spotPrice": {"krPerKwh": 1.00, "biddingZone": "DK1"},
                "annualConsumptionKwh": 1000,
                "gridOperator": "n1",
                "taxesAndLevies": {"electricityTax": 0.008},
                "providers": [{"name": "Vindstød"}],
            })),
            None,
        )
        .unwrap()
        .run();

        let expected_before_vat = 1.00 + 0.1801 + 0.19 + 0.008 + 0.11;
        assert_relative_eq!(
            results.offers[0].price_before_vat.value(),
            expected_before_vat,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn a_custom_fallback_table_can_stand_in_for_the_bundled_one() {
        let table = StaticTariffTable::from_csv(
            "grid_operator,kr_per_kwh\nradius,0.25\n".as_bytes(),
            KronerPerKwh::from(0.30),
        )
        .unwrap();
        let results = Comparison::from_input_with_fallback(
            input_from(json!({
                "spotPrice": {"krPerKwh": 1.0, "biddingZone": "DK1"},
                "annualConsumptionKwh": 1000,
                "gridOperator": "konstant",
                "providers": [{"name": "Vindstød"}],
            })),
            None,
            &table,
        )
        .unwrap()
        .run();

        assert_eq!(results.network_tariff.origin, TariffOrigin::Default);
        assert_eq!(results.network_tariff.tariff, KronerPerKwh::from(0.30));
    }

    #[rstest]
    fn repeated_provider_names_are_refused(mut copenhagen_request: ComparisonInput) {
        copenhagen_request.providers[1].name = "Strømlinet".into();
        let error = Comparison::from_input(copenhagen_request, None).unwrap_err();
        assert!(error.to_string().contains("Strømlinet"));
    }

    #[rstest]
    fn annual_charges_spread_over_twelve_months() {
        let results = Comparison::from_input(
            input_from(json!({
                "spotPrice": {"krPerKwh": 0.82, "biddingZone": "DK1"},
                "annualConsumptionKwh": 0,
                "gridOperator": "trefor",
                "providers": [{"name": "Norlys", "annualCharge": 474.0, "monthlySubscription": 10.0}],
            })),
            None,
        )
        .unwrap()
        .run();

        assert_eq!(results.offers[0].flat_monthly_fees, 10.0 + 474.0 / 12.);
        assert_eq!(results.offers[0].monthly_cost, 10.0 + 474.0 / 12.);
    }

    #[rstest]
    fn results_serialize_with_camel_case_keys(copenhagen_request: ComparisonInput) {
        let results = Comparison::from_input(copenhagen_request, None).unwrap().run();
        let json = serde_json::to_value(&results).unwrap();

        assert_eq!(json["biddingZone"], json!("DK2"));
        assert_eq!(json["gridOperator"], json!("radius"));
        assert_eq!(json["networkTariff"]["origin"], json!("static"));
        assert_eq!(json["offers"][0]["provider"], json!("Strømlinet"));
        assert!(json["offers"][0]["priceInclVat"].is_number());
        assert!(json.get("periodStartsAt").is_none());
    }
}
