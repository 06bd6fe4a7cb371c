//! Payable repository: payment history entries toward provider payables.
//!
//! Settled entries convert through the fixed factor matrix into the
//! proforma's currency, update the payable's balance, and release
//! production scheduling once the provider's advance condition is met.

use chrono::{NaiveDate, Utc};
use mobilia_core::currency::{ConversionMatrix, CurrencyError, CurrencyService};
use mobilia_core::funding::{FundingError, FundingService, PayableState};
use mobilia_core::schedule::ScheduleService;
use mobilia_shared::types::Currency;
use mobilia_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::entities::{
    account_payable_histories, accounts_payable, brands, documents, proformas, providers,
    purchase_orders,
};
use crate::repositories::DocumentInput;

/// Error types for payable operations.
#[derive(Debug, thiserror::Error)]
pub enum PayableError {
    /// Payable not found.
    #[error("Accounts payable not found: {0}")]
    PayableNotFound(Uuid),

    /// History entry not found.
    #[error("Payable payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// The payable has no proforma to resolve a settlement currency from.
    #[error("Accounts payable {0} is not linked to a proforma")]
    NoProforma(Uuid),

    /// Currency conversion failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Funding rule violation.
    #[error(transparent)]
    Funding(#[from] FundingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PayableError> for AppError {
    fn from(value: PayableError) -> Self {
        match value {
            PayableError::PayableNotFound(_) | PayableError::PaymentNotFound(_) => {
                Self::NotFound(value.to_string())
            }
            PayableError::NoProforma(_)
            | PayableError::Currency(_)
            | PayableError::Funding(_) => Self::Validation(value.to_string()),
            PayableError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for registering a payment toward a payable.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// The payable being paid.
    pub account_payable_id: Uuid,
    /// Amount in the currency the payment was made with.
    pub amount: Decimal,
    /// Currency the payment was made with.
    pub currency: Currency,
    /// Whether the entry arrives already settled.
    pub settled: bool,
    /// When the provider was paid.
    pub payment_date: Option<NaiveDate>,
    /// Supporting documents (transfer receipts).
    pub images: Vec<DocumentInput>,
}

/// Payable repository.
#[derive(Debug, Clone)]
pub struct PayableRepository {
    db: DatabaseConnection,
    matrix: ConversionMatrix,
}

impl PayableRepository {
    /// Creates a new payable repository over the configured factor matrix.
    #[must_use]
    pub const fn new(db: DatabaseConnection, matrix: ConversionMatrix) -> Self {
        Self { db, matrix }
    }

    /// Registers a payment history entry. Entries arriving already settled
    /// update the payable's balance immediately.
    ///
    /// # Errors
    ///
    /// Returns an error when the payable or its proforma is missing, or the
    /// currency pair is not configured.
    pub async fn record_payment(
        &self,
        input: RecordPaymentInput,
    ) -> Result<account_payable_histories::Model, PayableError> {
        let txn = self.db.begin().await?;

        let (payable, proforma) = self.load_payable(&txn, input.account_payable_id).await?;

        let mut converted_amount = None;
        if input.settled {
            let converted = self.convert_for(&proforma, input.amount, input.currency)?;
            converted_amount = Some(converted);
            self.apply_to_payable(&txn, &payable, converted).await?;
        }

        let entry = account_payable_histories::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_payable_id: Set(payable.id),
            provider_id: Set(Some(proforma.provider_id)),
            amount: Set(input.amount),
            currency: Set(input.currency.into()),
            converted_amount: Set(converted_amount),
            payment_date: Set(input.payment_date),
            status: Set(if input.settled {
                PaymentStatus::Pagado
            } else {
                PaymentStatus::Pendiente
            }),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        for image in input.images {
            documents::ActiveModel {
                id: Set(Uuid::now_v7()),
                file_url: Set(image.file_url),
                name: Set(image.name),
                extension: Set(image.extension),
                account_payable_history_id: Set(Some(entry.id)),
                proforma_id: Set(None),
                project_id: Set(None),
                advance_payment_record_id: Set(None),
                container_id: Set(None),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
        }

        if input.settled {
            self.release_production(&txn, &payable, &proforma).await?;
        }

        txn.commit().await?;
        Ok(entry)
    }

    /// Settles a pending history entry: converts the amount, updates the
    /// payable's balance, and evaluates the production release.
    ///
    /// Settled entries are terminal; settling twice is a validation error.
    ///
    /// # Errors
    ///
    /// Returns an error when the entry or payable is missing, the entry was
    /// already settled, or the currency pair is not configured.
    pub async fn settle_payment(&self, entry_id: Uuid) -> Result<PayableState, PayableError> {
        let txn = self.db.begin().await?;

        let entry = account_payable_histories::Entity::find_by_id(entry_id)
            .one(&txn)
            .await?
            .ok_or(PayableError::PaymentNotFound(entry_id))?;
        FundingService::guard_editable(entry.status.into())?;

        let (payable, proforma) = self.load_payable(&txn, entry.account_payable_id).await?;

        let converted = self.convert_for(&proforma, entry.amount, entry.currency.into())?;
        let state = self.apply_to_payable(&txn, &payable, converted).await?;

        let mut entry_update: account_payable_histories::ActiveModel = entry.into();
        entry_update.status = Set(PaymentStatus::Pagado);
        entry_update.converted_amount = Set(Some(converted));
        entry_update.update(&txn).await?;

        self.release_production(&txn, &payable, &proforma).await?;

        txn.commit().await?;

        info!(payable = %payable.id, total_paid = %state.total_paid, "payable payment settled");
        Ok(state)
    }

    async fn load_payable(
        &self,
        txn: &DatabaseTransaction,
        payable_id: Uuid,
    ) -> Result<(accounts_payable::Model, proformas::Model), PayableError> {
        let payable = accounts_payable::Entity::find_by_id(payable_id)
            .one(txn)
            .await?
            .ok_or(PayableError::PayableNotFound(payable_id))?;
        let proforma_id = payable
            .proforma_id
            .ok_or(PayableError::NoProforma(payable.id))?;
        let proforma = proformas::Entity::find_by_id(proforma_id)
            .one(txn)
            .await?
            .ok_or(PayableError::NoProforma(payable.id))?;
        Ok((payable, proforma))
    }

    /// Converts a payment into the proforma's currency through the fixed
    /// factor matrix. An unmapped pair is a hard error, never zero.
    fn convert_for(
        &self,
        proforma: &proformas::Model,
        amount: Decimal,
        currency: Currency,
    ) -> Result<Decimal, PayableError> {
        let converted = self
            .matrix
            .convert(amount, currency, proforma.currency.into())?;
        Ok(CurrencyService::round_money(converted))
    }

    async fn apply_to_payable(
        &self,
        txn: &DatabaseTransaction,
        payable: &accounts_payable::Model,
        converted: Decimal,
    ) -> Result<PayableState, PayableError> {
        let state = FundingService::apply_payment(
            PayableState {
                total: payable.total,
                total_paid: payable.total_paid,
                balance: payable.balance,
            },
            converted,
        )?;

        let mut update: accounts_payable::ActiveModel = payable.clone().into();
        update.total_paid = Set(state.total_paid);
        update.balance = Set(state.balance);
        update.update(txn).await?;
        Ok(state)
    }

    /// Releases production scheduling when the payable crosses the
    /// provider's advance condition: stamps the purchase order's production
    /// end date at today plus the brand's production time in business days.
    async fn release_production(
        &self,
        txn: &DatabaseTransaction,
        payable: &accounts_payable::Model,
        proforma: &proformas::Model,
    ) -> Result<(), PayableError> {
        // Re-read the balance written earlier in this transaction.
        let current = accounts_payable::Entity::find_by_id(payable.id)
            .one(txn)
            .await?
            .ok_or(PayableError::PayableNotFound(payable.id))?;

        let provider = providers::Entity::find_by_id(proforma.provider_id)
            .one(txn)
            .await?;
        let condition = provider.and_then(|p| p.advance_condition_percentage);

        if !FundingService::production_ready(current.total_paid, current.total, condition) {
            return Ok(());
        }

        let Some(order) = purchase_orders::Entity::find()
            .filter(purchase_orders::Column::AccountPayableId.eq(payable.id))
            .one(txn)
            .await?
        else {
            return Ok(());
        };

        let production_time = brands::Entity::find_by_id(proforma.brand_id)
            .one(txn)
            .await?
            .and_then(|brand| brand.production_time_days)
            .unwrap_or(0);
        let production_time = u32::try_from(production_time).unwrap_or(0);

        let end_date =
            ScheduleService::production_end_date(Utc::now().date_naive(), production_time);

        let mut update: purchase_orders::ActiveModel = order.into();
        update.production_end_date = Set(Some(end_date));
        update.update(txn).await?;

        info!(payable = %payable.id, %end_date, "production end date scheduled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_taxonomy_mapping() {
        let not_found: AppError = PayableError::PayableNotFound(Uuid::now_v7()).into();
        assert_eq!(not_found.error_code(), "NOT_FOUND");

        let settled: AppError = PayableError::Funding(FundingError::AlreadySettled).into();
        assert_eq!(settled.error_code(), "VALIDATION_ERROR");

        let missing_pair: AppError = PayableError::Currency(CurrencyError::MissingFactor {
            from: Currency::Usd,
            to: Currency::Eur,
        })
        .into();
        assert_eq!(missing_pair.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_payable_state_arithmetic_matches_engine() {
        let state = FundingService::apply_payment(
            PayableState {
                total: dec!(4000),
                total_paid: dec!(1000),
                balance: dec!(3000),
            },
            dec!(500),
        )
        .unwrap();
        assert_eq!(state.total_paid, dec!(1500));
        assert_eq!(state.balance, dec!(2500));
    }
}
