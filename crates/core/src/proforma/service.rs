//! Proforma validation and receivable matching.

use mobilia_shared::types::Currency;

use super::error::ProformaError;
use super::types::ReceivableFacts;

/// Stateless proforma rules.
pub struct ProformaService;

impl ProformaService {
    /// Validates a new proforma against the uniqueness and document rules.
    ///
    /// # Errors
    ///
    /// - `DuplicateProviderBrand` when the (project, provider, brand) triple
    ///   is already taken.
    /// - `MissingDocument` when no supporting document accompanies the
    ///   registration.
    pub fn validate_new(
        duplicate_exists: bool,
        has_document: bool,
    ) -> Result<(), ProformaError> {
        if duplicate_exists {
            return Err(ProformaError::DuplicateProviderBrand);
        }
        if !has_document {
            return Err(ProformaError::MissingDocument);
        }
        Ok(())
    }

    /// Validates an update. The uniqueness probe must already exclude the
    /// proforma being updated.
    ///
    /// # Errors
    ///
    /// Same as `validate_new`.
    pub fn validate_update(
        duplicate_exists: bool,
        has_document: bool,
    ) -> Result<(), ProformaError> {
        Self::validate_new(duplicate_exists, has_document)
    }

    /// Picks the receivable whose collections count toward the proforma's
    /// funding check: the only one when the project is consolidated, else
    /// the one matching the linked products' currency.
    #[must_use]
    pub fn select_receivable<'a>(
        receivables: &'a [ReceivableFacts],
        product_currency: Option<Currency>,
    ) -> Option<&'a ReceivableFacts> {
        match receivables {
            [] => None,
            [single] => Some(single),
            many => {
                let currency = product_currency?;
                many.iter().find(|r| r.currency == currency)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilia_shared::types::ReceivableId;
    use rust_decimal_macros::dec;

    fn facts(currency: Currency, total_paid: rust_decimal::Decimal) -> ReceivableFacts {
        ReceivableFacts {
            id: ReceivableId::new(),
            currency,
            total_paid,
        }
    }

    #[test]
    fn test_duplicate_triple_is_a_conflict() {
        assert_eq!(
            ProformaService::validate_new(true, true),
            Err(ProformaError::DuplicateProviderBrand)
        );
    }

    #[test]
    fn test_missing_document_is_rejected() {
        assert_eq!(
            ProformaService::validate_new(false, false),
            Err(ProformaError::MissingDocument)
        );
    }

    #[test]
    fn test_duplicate_reported_before_missing_document() {
        assert_eq!(
            ProformaService::validate_new(true, false),
            Err(ProformaError::DuplicateProviderBrand)
        );
    }

    #[test]
    fn test_valid_proforma_passes() {
        assert!(ProformaService::validate_new(false, true).is_ok());
        assert!(ProformaService::validate_update(false, true).is_ok());
    }

    #[test]
    fn test_single_receivable_selected_regardless_of_currency() {
        let receivables = [facts(Currency::Eur, dec!(3000))];
        let selected =
            ProformaService::select_receivable(&receivables, Some(Currency::Mxn)).unwrap();
        assert_eq!(selected.currency, Currency::Eur);
    }

    #[test]
    fn test_fractionated_receivable_matched_by_product_currency() {
        let receivables = [
            facts(Currency::Eur, dec!(3000)),
            facts(Currency::Usd, dec!(500)),
        ];
        let selected =
            ProformaService::select_receivable(&receivables, Some(Currency::Usd)).unwrap();
        assert_eq!(selected.currency, Currency::Usd);
        assert_eq!(selected.total_paid, dec!(500));
    }

    #[test]
    fn test_fractionated_without_product_currency_selects_nothing() {
        let receivables = [
            facts(Currency::Eur, dec!(3000)),
            facts(Currency::Usd, dec!(500)),
        ];
        assert!(ProformaService::select_receivable(&receivables, None).is_none());
    }

    #[test]
    fn test_no_receivables_selects_nothing() {
        assert!(ProformaService::select_receivable(&[], Some(Currency::Eur)).is_none());
    }
}
