use crate::core::units::KronerPerKwh;
use crate::input::GridOperator;
use anyhow::anyhow;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_enum_str::Serialize_enum_str;
use std::io::Read;
use thiserror::Error;
use tracing::warn;

/// Network tariff applied when a grid operator is absent from every
/// available source, in kr/kWh. Deliberately above the highest listed
/// tariff so an unrecognised operator is never underquoted.
pub const DEFAULT_NETWORK_TARIFF_KR_PER_KWH: f64 = 0.30;

static BUNDLED_NETWORK_TARIFFS: &str = include_str!("network_tariffs.csv");

/// Something that can quote a distribution network tariff for a grid
/// operator, e.g. a live feed of the operators' published price sheets.
pub trait NetworkTariffSource {
    fn tariff_for(&self, operator: &GridOperator) -> Result<KronerPerKwh, TariffLookupError>;
}

#[derive(Debug, Error)]
pub enum TariffLookupError {
    #[error("There was no network tariff available for the grid operator '{0}'")]
    UnknownOperator(GridOperator),
    #[error("The network tariff source could not be read: {0}")]
    SourceUnavailable(#[from] anyhow::Error),
}

#[derive(Clone, Debug, Deserialize)]
struct TariffRow {
    grid_operator: GridOperator,
    kr_per_kwh: f64,
}

/// A fixed table of per-operator network tariffs, read from CSV. The
/// bundled table is a periodically refreshed snapshot of the operators'
/// published consumption tariffs.
#[derive(Clone, Debug)]
pub struct StaticTariffTable {
    tariffs: IndexMap<GridOperator, KronerPerKwh>,
    default_tariff: KronerPerKwh,
}

impl StaticTariffTable {
    /// Arguments:
    /// * `csv` - tariff table with columns grid_operator (slug) and
    ///   kr_per_kwh
    /// * `default_tariff` - the tariff to quote for operators the table
    ///   does not list
    pub fn from_csv(csv: impl Read, default_tariff: KronerPerKwh) -> anyhow::Result<Self> {
        Ok(Self {
            tariffs: csv::Reader::from_reader(csv)
                .deserialize()
                .map(|row| {
                    let TariffRow { grid_operator, kr_per_kwh } = row?;
                    let tariff = KronerPerKwh::new(kr_per_kwh).map_err(|error| {
                        anyhow!("The network tariff for '{grid_operator}' was rejected: {error}")
                    })?;
                    Ok((grid_operator, tariff))
                })
                .collect::<anyhow::Result<_>>()?,
            default_tariff,
        })
    }

    pub fn bundled() -> Self {
        Self::from_csv(
            BUNDLED_NETWORK_TARIFFS.as_bytes(),
            KronerPerKwh::from(DEFAULT_NETWORK_TARIFF_KR_PER_KWH),
        )
        .expect("The bundled network tariff table was expected to parse")
    }

    pub fn lookup(&self, operator: &GridOperator) -> Option<KronerPerKwh> {
        self.tariffs.get(operator).copied()
    }

    pub fn default_tariff(&self) -> KronerPerKwh {
        self.default_tariff
    }
}

impl NetworkTariffSource for StaticTariffTable {
    fn tariff_for(&self, operator: &GridOperator) -> Result<KronerPerKwh, TariffLookupError> {
        self.lookup(operator)
            .ok_or_else(|| TariffLookupError::UnknownOperator(operator.clone()))
    }
}

/// Where a resolved network tariff came from, so results can say how
/// trustworthy the figure is.
#[derive(Clone, Copy, Debug, Serialize_enum_str, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TariffOrigin {
    Live,
    Static,
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNetworkTariff {
    pub tariff: KronerPerKwh,
    pub origin: TariffOrigin,
}

/// Resolve the network tariff for a grid operator, preferring the live
/// source when one is available and falling back to the static table and
/// then the default tariff. A live failure downgrades the answer rather
/// than failing the comparison.
pub fn resolve_network_tariff(
    live: Option<&dyn NetworkTariffSource>,
    fallback: &StaticTariffTable,
    operator: &GridOperator,
) -> ResolvedNetworkTariff {
    if let Some(source) = live {
        match source.tariff_for(operator) {
            Ok(tariff) => {
                return ResolvedNetworkTariff {
                    tariff,
                    origin: TariffOrigin::Live,
                }
            }
            Err(error) => {
                warn!("The live network tariff lookup for '{operator}' failed ({error}), substituting the static table");
            }
        }
    }

    match fallback.lookup(operator) {
        Some(tariff) => ResolvedNetworkTariff {
            tariff,
            origin: TariffOrigin::Static,
        },
        None => {
            warn!(
                "The grid operator '{operator}' is not in the static tariff table, applying the default tariff of {} kr/kWh",
                fallback.default_tariff()
            );
            ResolvedNetworkTariff {
                tariff: fallback.default_tariff(),
                origin: TariffOrigin::Default,
            }
        }
    }
}
