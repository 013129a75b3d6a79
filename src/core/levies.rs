use crate::core::units::KronerPerKwh;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// The nationally uniform taxes and levies that apply to every Danish
/// retail electricity offer, whichever provider or grid operator is
/// involved. Values are the published rates; an input file may override
/// individual fields when the rates change.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TaxesAndLevies {
    /// Energinet's system tariff, in kr/kWh.
    #[validate]
    pub system_tariff: KronerPerKwh,
    /// Energinet's transmission grid tariff, in kr/kWh.
    #[validate]
    pub transmission_tariff: KronerPerKwh,
    /// The state electricity tax (elafgift), in kr/kWh.
    #[validate]
    pub electricity_tax: KronerPerKwh,
    /// VAT as a fraction. Danish moms is 25% and applies on top of the
    /// taxes above, a tax on the taxes.
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub vat_rate: f64,
}

impl Default for TaxesAndLevies {
    fn default() -> Self {
        Self {
            system_tariff: KronerPerKwh::from(0.19),
            transmission_tariff: KronerPerKwh::from(0.11),
            electricity_tax: KronerPerKwh::from(0.90),
            vat_rate: 0.25,
        }
    }
}
