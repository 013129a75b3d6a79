use crate::comparison::ProviderCost;
use itertools::Itertools;
use ordered_float::OrderedFloat;

/// This module decides the order offers are presented in. Ordering is a
/// presentation concern and never feeds back into the computed prices.

/// How to order computed offers. A portal typically pins its own brand
/// to the top and lists everyone else cheapest first.
#[derive(Clone, Debug, Default)]
pub struct RankingPolicy {
    pinned_provider: Option<String>,
}

impl RankingPolicy {
    pub fn new(pinned_provider: Option<String>) -> Self {
        Self { pinned_provider }
    }

    pub fn is_pinned(&self, provider: &str) -> bool {
        self.pinned_provider.as_deref() == Some(provider)
    }
}

/// Order offers pinned-first, then by ascending monthly cost. In the
/// event of two offers having the same monthly cost, the provider name
/// decides the order.
pub fn rank_offers(offers: Vec<ProviderCost>, policy: &RankingPolicy) -> Vec<ProviderCost> {
    offers
        .into_iter()
        .sorted_by_key(|offer| {
            (
                !policy.is_pinned(&offer.provider),
                OrderedFloat(offer.monthly_cost),
                offer.provider.clone(),
            )
        })
        .collect()
}
