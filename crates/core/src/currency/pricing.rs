//! Quotation price sheets.
//!
//! A quotation is priced in parallel in the three settlement currencies; a
//! selector names the authoritative set. The legacy schema spread these over
//! triplicated per-currency columns; here they are one `PriceSet` per
//! currency keyed by `Currency`.

use mobilia_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One currency's resolved monetary figures for a quotation.
///
/// Fields are optional because quotations are built incrementally and the
/// non-authoritative sets are frequently left blank. Callers must treat an
/// absent figure as "not priced", never as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSet {
    /// Sum of product subtotals.
    pub subtotal: Option<Decimal>,
    /// Additional discount amount.
    pub additional_discount: Option<Decimal>,
    /// Additional discount percentage.
    pub percentage_additional_discount: Option<Decimal>,
    /// IVA percentage.
    pub percentage_iva: Option<Decimal>,
    /// IVA amount.
    pub iva: Option<Decimal>,
    /// Grand total.
    pub total: Option<Decimal>,
    /// Advance percentage.
    pub percentage_advance: Option<Decimal>,
    /// Advance required before purchasing may begin.
    pub advance: Option<Decimal>,
    /// Amount the customer has put down, in the currency they paid with.
    pub customer_advance: Option<Decimal>,
    /// Customer advance converted into this set's currency.
    pub converted_advance: Option<Decimal>,
    /// Outstanding balance.
    pub balance: Option<Decimal>,
    /// Parity used to convert the customer advance.
    pub exchange_rate_amount: Option<Decimal>,
}

/// The three parallel price sets of a quotation plus the authoritative
/// selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSheet {
    /// Euro figures.
    pub eur: PriceSet,
    /// US dollar figures.
    pub usd: PriceSet,
    /// Mexican peso figures.
    pub mxn: PriceSet,
    /// Which set is authoritative. Unset on draft quotations.
    pub authoritative: Option<Currency>,
}

impl PriceSheet {
    /// Returns the price set for a currency.
    #[must_use]
    pub const fn get(&self, currency: Currency) -> &PriceSet {
        match currency {
            Currency::Eur => &self.eur,
            Currency::Usd => &self.usd,
            Currency::Mxn => &self.mxn,
        }
    }

    /// Returns a mutable price set for a currency.
    pub const fn get_mut(&mut self, currency: Currency) -> &mut PriceSet {
        match currency {
            Currency::Eur => &mut self.eur,
            Currency::Usd => &mut self.usd,
            Currency::Mxn => &mut self.mxn,
        }
    }

    /// Resolves the authoritative price set.
    ///
    /// Returns `None` when no selector is set; callers must handle the
    /// absence rather than defaulting the figures to zero.
    #[must_use]
    pub const fn resolve(&self) -> Option<&PriceSet> {
        match self.authoritative {
            Some(currency) => Some(self.get(currency)),
            None => None,
        }
    }

    /// The authoritative total, if the quotation is priced.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.resolve().and_then(|set| set.total)
    }

    /// The advance threshold in the given currency.
    #[must_use]
    pub fn advance_for(&self, currency: Currency) -> Option<Decimal> {
        self.get(currency).advance
    }

    /// The total in the given currency.
    #[must_use]
    pub fn total_for(&self, currency: Currency) -> Option<Decimal> {
        self.get(currency).total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sheet_with_eur_total() -> PriceSheet {
        PriceSheet {
            eur: PriceSet {
                subtotal: Some(dec!(8620.69)),
                percentage_iva: Some(dec!(16)),
                iva: Some(dec!(1379.31)),
                total: Some(dec!(10000)),
                advance: Some(dec!(3000)),
                balance: Some(dec!(10000)),
                ..PriceSet::default()
            },
            usd: PriceSet {
                total: Some(dec!(10900)),
                ..PriceSet::default()
            },
            mxn: PriceSet::default(),
            authoritative: Some(Currency::Eur),
        }
    }

    #[test]
    fn test_resolve_picks_the_selected_set() {
        let sheet = sheet_with_eur_total();
        let resolved = sheet.resolve().unwrap();
        assert_eq!(resolved.total, Some(dec!(10000)));
        assert_eq!(resolved.advance, Some(dec!(3000)));
    }

    #[test]
    fn test_resolve_without_selector_is_none() {
        let sheet = PriceSheet {
            authoritative: None,
            ..sheet_with_eur_total()
        };
        assert!(sheet.resolve().is_none());
        assert!(sheet.total().is_none());
    }

    #[test]
    fn test_non_authoritative_sets_remain_reachable() {
        let sheet = sheet_with_eur_total();
        assert_eq!(sheet.total_for(Currency::Usd), Some(dec!(10900)));
        assert_eq!(sheet.total_for(Currency::Mxn), None);
        assert_eq!(sheet.advance_for(Currency::Mxn), None);
    }

    #[test]
    fn test_absent_figures_stay_absent() {
        // An unpriced set resolves to None figures, not zeros.
        let sheet = PriceSheet {
            authoritative: Some(Currency::Mxn),
            ..sheet_with_eur_total()
        };
        let resolved = sheet.resolve().unwrap();
        assert_eq!(resolved.total, None);
        assert_eq!(resolved.advance, None);
    }
}
