use crate::core::levies::TaxesAndLevies;
use crate::core::units::{KronerPerKwh, OerePerKwh, MONTHS_PER_YEAR};

/// This module composes the price a Danish household actually pays per
/// kilowatt-hour out of its parts: the wholesale spot price, the
/// provider's per-kWh fees, the grid operator's network tariff, and the
/// national taxes and levies, with VAT on top of everything.

/// A provider's per-kWh fees as advertised, in øre/kWh.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProviderFees {
    pub markup: OerePerKwh,
    pub green_certificates: OerePerKwh,
    pub trading_costs: OerePerKwh,
}

/// Compose the per-kWh price before VAT. Provider fees convert from øre
/// to kroner here; everything else is already in kr/kWh. The summation
/// order is fixed so that a repeated run reproduces the same result bit
/// for bit.
///
/// Arguments:
/// * `spot_price` - wholesale day-ahead price for the bidding zone, in kr/kWh
/// * `fees` - the provider's per-kWh fees
/// * `network_tariff` - the grid operator's distribution tariff, in kr/kWh
/// * `levies` - the national taxes and levies
pub fn calc_price_before_vat(
    spot_price: KronerPerKwh,
    fees: &ProviderFees,
    network_tariff: KronerPerKwh,
    levies: &TaxesAndLevies,
) -> KronerPerKwh {
    spot_price
        + fees.markup.to_kroner()
        + fees.green_certificates.to_kroner()
        + fees.trading_costs.to_kroner()
        + network_tariff
        + levies.system_tariff
        + levies.electricity_tax
        + levies.transmission_tariff
}

/// The consumer-facing per-kWh price. VAT applies to the whole composed
/// price, taxes and levies included.
pub fn calc_price_per_kwh_incl_vat(
    spot_price: KronerPerKwh,
    fees: &ProviderFees,
    network_tariff: KronerPerKwh,
    levies: &TaxesAndLevies,
) -> KronerPerKwh {
    calc_price_before_vat(spot_price, fees, network_tariff, levies) * (1.0 + levies.vat_rate)
}

/// Project a monthly bill from a per-kWh price, assuming consumption
/// spreads evenly over the year.
///
/// Arguments:
/// * `price_per_kwh` - the per-kWh price including VAT
/// * `annual_consumption_kwh` - the household's estimated annual usage
/// * `flat_monthly_fees` - subscription plus any pro-rated annual charges,
///   in kr/month
pub fn calc_monthly_cost(
    price_per_kwh: KronerPerKwh,
    annual_consumption_kwh: f64,
    flat_monthly_fees: f64,
) -> f64 {
    price_per_kwh.value() * (annual_consumption_kwh / MONTHS_PER_YEAR as f64) + flat_monthly_fees
}
