//! Receivable repository: advance payment records and the funding threshold.
//!
//! Settling a payment record updates the receivable's balance, evaluates the
//! advance threshold, and creates the purchase orders for every eligible
//! proforma, all inside one transaction. The partial unique index on
//! purchase_orders is the backstop against concurrent settlements.

use chrono::{NaiveDate, Utc};
use mobilia_core::currency::CurrencyService;
use mobilia_core::funding::{
    CollectedAudience, FundingError, FundingService, ProductKind, ReceivableState,
};
use mobilia_shared::mail::{MailTemplate, Notification, Notifier};
use mobilia_shared::types::Currency;
use mobilia_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{CurrencyCode, PaymentStatus, ProductKindColumn};
use crate::entities::{
    accounts_payable, accounts_receivable, advance_payment_records, documents, proformas,
    projects, purchase_orders, quotation_products, quotations,
};
use crate::repositories::{decode_price_sheet, DocumentInput};

/// Error types for receivable operations.
#[derive(Debug, thiserror::Error)]
pub enum ReceivableError {
    /// Payment record not found.
    #[error("Payment record not found: {0}")]
    RecordNotFound(Uuid),

    /// Receivable not found.
    #[error("Accounts receivable not found: {0}")]
    ReceivableNotFound(Uuid),

    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    QuotationNotFound(Uuid),

    /// The quotation's price sheet could not be decoded.
    #[error("{0}")]
    MalformedPriceSheet(String),

    /// Parity must be positive when present.
    #[error("Payment parity must be positive")]
    NonPositiveParity,

    /// Funding rule violation.
    #[error(transparent)]
    Funding(#[from] FundingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReceivableError> for AppError {
    fn from(value: ReceivableError) -> Self {
        match value {
            ReceivableError::RecordNotFound(_)
            | ReceivableError::ReceivableNotFound(_)
            | ReceivableError::ProjectNotFound(_)
            | ReceivableError::QuotationNotFound(_) => Self::NotFound(value.to_string()),
            ReceivableError::NonPositiveParity
            | ReceivableError::Funding(_)
            | ReceivableError::MalformedPriceSheet(_) => Self::Validation(value.to_string()),
            ReceivableError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for registering a new advance payment record.
#[derive(Debug, Clone)]
pub struct CreateCollectionInput {
    /// The receivable the payment goes toward.
    pub accounts_receivable_id: Uuid,
    /// Amount in the currency the customer paid with.
    pub amount_paid: Decimal,
    /// Currency the customer paid with.
    pub payment_currency: Currency,
    /// Parity to the receivable's currency; 1 when paying in kind.
    pub parity: Option<Decimal>,
    /// IVA percentage applied on the sale.
    pub percentage_iva: Option<Decimal>,
    /// How the customer paid (transfer, card, ...).
    pub payment_method: Option<String>,
    /// When the customer paid.
    pub payment_date: Option<NaiveDate>,
    /// Payment vouchers.
    pub vouchers: Vec<DocumentInput>,
}

/// Input for settling an advance payment record.
#[derive(Debug, Clone)]
pub struct SettleCollectionInput {
    /// Sales deviation captured alongside the settlement, if any.
    pub sales_deviation: Option<Decimal>,
    /// What kind of product the project carries; routes the fully-collected
    /// notification.
    pub product_kind: ProductKind,
}

/// What a settlement changed.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// The receivable that was paid.
    pub accounts_receivable_id: Uuid,
    /// Its new collected total.
    pub total_paid: Decimal,
    /// Its new balance.
    pub balance: Decimal,
    /// Purchase orders created by this settlement crossing the threshold.
    pub orders_created: Vec<Uuid>,
    /// Whether the receivable is now collected in full.
    pub fully_collected: bool,
    /// Who to notify when fully collected.
    pub audience: Option<CollectedAudience>,
}

/// Receivable repository.
#[derive(Debug, Clone)]
pub struct ReceivableRepository {
    db: DatabaseConnection,
}

impl ReceivableRepository {
    /// Creates a new receivable repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new advance payment record in `PENDIENTE` state.
    ///
    /// The consecutive id continues the receivable's running sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the receivable does not exist or the parity is
    /// invalid.
    pub async fn create_record(
        &self,
        input: CreateCollectionInput,
    ) -> Result<advance_payment_records::Model, ReceivableError> {
        let txn = self.db.begin().await?;

        let receivable = accounts_receivable::Entity::find_by_id(input.accounts_receivable_id)
            .one(&txn)
            .await?
            .ok_or(ReceivableError::ReceivableNotFound(
                input.accounts_receivable_id,
            ))?;

        let last = advance_payment_records::Entity::find()
            .filter(
                advance_payment_records::Column::AccountsReceivableId.eq(receivable.id),
            )
            .order_by_desc(advance_payment_records::Column::ConsecutiveId)
            .one(&txn)
            .await?;
        let consecutive_id = last.map_or(1, |record| record.consecutive_id + 1);

        let figures = collection_figures(
            input.amount_paid,
            input.parity,
            input.percentage_iva,
            receivable.total_sale,
        )
        .ok_or(ReceivableError::NonPositiveParity)?;

        let record = advance_payment_records::ActiveModel {
            id: Set(Uuid::now_v7()),
            accounts_receivable_id: Set(receivable.id),
            project_id: Set(receivable.project_id),
            consecutive_id: Set(consecutive_id),
            payment_date: Set(input.payment_date),
            payment_method: Set(input.payment_method),
            amount_paid: Set(input.amount_paid),
            payment_currency: Set(input.payment_currency.into()),
            parity: Set(input.parity),
            percentage_iva: Set(input.percentage_iva),
            currency_apply: Set(receivable.currency),
            converted_amount: Set(figures.converted),
            subtotal_amount: Set(Some(figures.subtotal)),
            payment_percentage: Set(Some(figures.percentage)),
            sales_deviation: Set(Decimal::ZERO),
            status: Set(PaymentStatus::Pendiente),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        for voucher in input.vouchers {
            documents::ActiveModel {
                id: Set(Uuid::now_v7()),
                file_url: Set(voucher.file_url),
                name: Set(voucher.name),
                extension: Set(voucher.extension),
                advance_payment_record_id: Set(Some(record.id)),
                proforma_id: Set(None),
                project_id: Set(None),
                account_payable_history_id: Set(None),
                container_id: Set(None),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(record)
    }

    /// Settles a payment record: marks it `PAGADO`, applies the converted
    /// amount to the receivable, and creates purchase orders for every
    /// eligible proforma once the advance threshold is crossed.
    ///
    /// Settled records are terminal; settling twice is a validation error.
    ///
    /// # Errors
    ///
    /// Returns an error when the record, receivable, project, or quotation
    /// is missing, or when the record was already settled.
    pub async fn settle_record(
        &self,
        record_id: Uuid,
        input: SettleCollectionInput,
    ) -> Result<SettlementOutcome, ReceivableError> {
        let txn = self.db.begin().await?;

        let record = advance_payment_records::Entity::find_by_id(record_id)
            .one(&txn)
            .await?
            .ok_or(ReceivableError::RecordNotFound(record_id))?;
        FundingService::guard_editable(record.status.into())?;

        let receivable = accounts_receivable::Entity::find_by_id(record.accounts_receivable_id)
            .one(&txn)
            .await?
            .ok_or(ReceivableError::ReceivableNotFound(
                record.accounts_receivable_id,
            ))?;

        let mut state = ReceivableState {
            total_sale: receivable.total_sale,
            total_paid: receivable.total_paid,
            updated_total: receivable.updated_total,
            balance: receivable.balance,
        };

        let mut recorded_deviation = record.sales_deviation;
        if let Some(deviation) = input.sales_deviation {
            if deviation > Decimal::ZERO {
                state = FundingService::record_sales_deviation(state, deviation)?;
                recorded_deviation = deviation;
            }
        }

        state = FundingService::apply_collection(state, record.converted_amount)?;
        let fully_collected = FundingService::is_fully_collected(&state);

        let mut receivable_update: accounts_receivable::ActiveModel = receivable.clone().into();
        receivable_update.total_paid = Set(state.total_paid);
        receivable_update.updated_total = Set(state.updated_total);
        receivable_update.balance = Set(state.balance);
        receivable_update.is_paid = Set(fully_collected);
        receivable_update.update(&txn).await?;

        let mut record_update: advance_payment_records::ActiveModel = record.into();
        record_update.status = Set(PaymentStatus::Pagado);
        record_update.sales_deviation = Set(recorded_deviation);
        record_update.update(&txn).await?;

        let orders_created = self
            .evaluate_threshold(&txn, &receivable, state.total_paid)
            .await?;

        txn.commit().await?;

        info!(
            receivable = %receivable.id,
            total_paid = %state.total_paid,
            orders = orders_created.len(),
            "advance payment settled"
        );

        Ok(SettlementOutcome {
            accounts_receivable_id: receivable.id,
            total_paid: state.total_paid,
            balance: state.balance,
            orders_created,
            fully_collected,
            audience: fully_collected
                .then(|| FundingService::collected_audience(input.product_kind)),
        })
    }

    /// Evaluates the advance threshold and creates purchase orders for the
    /// eligible proformas.
    async fn evaluate_threshold(
        &self,
        txn: &DatabaseTransaction,
        receivable: &accounts_receivable::Model,
        total_paid: Decimal,
    ) -> Result<Vec<Uuid>, ReceivableError> {
        let project = projects::Entity::find_by_id(receivable.project_id)
            .one(txn)
            .await?
            .ok_or(ReceivableError::ProjectNotFound(receivable.project_id))?;
        let quotation = quotations::Entity::find_by_id(project.quotation_id)
            .one(txn)
            .await?
            .ok_or(ReceivableError::QuotationNotFound(project.quotation_id))?;

        let sheet = decode_price_sheet(&quotation).map_err(ReceivableError::MalformedPriceSheet)?;
        let advance = sheet.advance_for(receivable.currency.into());
        if !FundingService::threshold_met(total_paid, advance) {
            return Ok(Vec::new());
        }

        let candidates = proformas::Entity::find()
            .filter(proformas::Column::ProjectId.eq(project.id))
            .all(txn)
            .await?;
        let eligible = eligible_proformas(
            quotation.is_fractionate,
            receivable.currency,
            &candidates
                .iter()
                .map(|p| (p.id, p.currency))
                .collect::<Vec<_>>(),
        );

        let mut created = Vec::new();
        for proforma in candidates
            .iter()
            .filter(|p| eligible.contains(&p.id))
        {
            if let Some(order_id) = self
                .create_order_for_proforma(txn, proforma, receivable, project.id)
                .await?
            {
                created.push(order_id);
            }
        }
        Ok(created)
    }

    /// The check-then-create guard for one proforma. Runs inside the
    /// settlement transaction; the partial unique index on
    /// (account_payable_id, proforma_id) rejects the duplicate if a
    /// concurrent settlement races past the check.
    async fn create_order_for_proforma(
        &self,
        txn: &DatabaseTransaction,
        proforma: &proformas::Model,
        receivable: &accounts_receivable::Model,
        project_id: Uuid,
    ) -> Result<Option<Uuid>, ReceivableError> {
        let payable = accounts_payable::Entity::find()
            .filter(accounts_payable::Column::ProformaId.eq(proforma.id))
            .one(txn)
            .await?;
        let existing = purchase_orders::Entity::find()
            .filter(purchase_orders::Column::ProformaId.eq(proforma.id))
            .one(txn)
            .await?;

        use mobilia_core::funding::OrderDecision;
        let decision = FundingService::decide_order(payable.is_some(), existing.is_some());
        match (decision, payable) {
            (OrderDecision::CreateOrder, Some(payable)) => {
                let order = purchase_orders::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    account_payable_id: Set(Some(payable.id)),
                    proforma_id: Set(Some(proforma.id)),
                    accounts_receivable_id: Set(Some(receivable.id)),
                    project_id: Set(Some(project_id)),
                    provider_id: Set(Some(proforma.provider_id)),
                    status: Set(crate::entities::sea_orm_active_enums::OrderStatus::Nueva),
                    quantity: Set(None),
                    total: Set(None),
                    production_end_date: Set(None),
                    production_real_end_date: Set(None),
                    production_start_date: Set(None),
                    arrival_date: Set(None),
                    collection_id: Set(None),
                    is_paid: Set(false),
                    created_at: Set(Utc::now().into()),
                }
                .insert(txn)
                .await?;

                let products = quotation_products::Entity::find()
                    .filter(quotation_products::Column::ProformaId.eq(proforma.id))
                    .filter(quotation_products::Column::ProviderId.eq(proforma.provider_id))
                    .filter(quotation_products::Column::BrandId.eq(proforma.brand_id))
                    .all(txn)
                    .await?;
                for product in products {
                    let mut update: quotation_products::ActiveModel = product.into();
                    update.purchase_order_id = Set(Some(order.id));
                    update.update(txn).await?;
                }

                Ok(Some(order.id))
            }
            _ => Ok(None),
        }
    }

    /// Dispatches the fully-collected notification: stock projects go to
    /// the logistics crew, special orders to the main project manager.
    /// Best-effort; failures are logged and swallowed.
    pub async fn notify_collected(&self, outcome: &SettlementOutcome, notifier: &dyn Notifier) {
        let Some(audience) = outcome.audience else {
            return;
        };

        let context = self.collected_context(outcome.accounts_receivable_id).await;
        let Some((folio, main_pm_email)) = context else {
            tracing::warn!(
                receivable = %outcome.accounts_receivable_id,
                "collected notification skipped: context unavailable"
            );
            return;
        };

        let directory = crate::repositories::UserDirectory::new(self.db.clone());
        let (template, recipients) = match audience {
            CollectedAudience::Logistics => (
                MailTemplate::StockCollected,
                directory.logistics_emails().await.unwrap_or_default(),
            ),
            CollectedAudience::MainProjectManager => (
                MailTemplate::SpecialOrderCollected,
                main_pm_email.into_iter().collect(),
            ),
        };
        if recipients.is_empty() {
            return;
        }

        notifier
            .send_best_effort(Notification {
                to: recipients,
                template,
                data: serde_json::json!({
                    "projectFolio": folio,
                    "totalPaid": outcome.total_paid.to_string(),
                }),
            })
            .await;
    }

    /// Loads the project folio and the main project manager's email for the
    /// collected notification.
    async fn collected_context(&self, receivable_id: Uuid) -> Option<(String, Option<String>)> {
        let receivable = accounts_receivable::Entity::find_by_id(receivable_id)
            .one(&self.db)
            .await
            .ok()??;
        let project = projects::Entity::find_by_id(receivable.project_id)
            .one(&self.db)
            .await
            .ok()??;
        let quotation = quotations::Entity::find_by_id(project.quotation_id)
            .one(&self.db)
            .await
            .ok()??;

        let main_pm_email = match quotation.main_project_manager_id {
            Some(user_id) => crate::entities::users::Entity::find_by_id(user_id)
                .one(&self.db)
                .await
                .ok()
                .flatten()
                .map(|user| user.email),
            None => None,
        };
        Some((project.folio, main_pm_email))
    }

    /// Routing input for the fully-collected notification: product kind of
    /// the project's quotation products (special order wins over stock when
    /// mixed).
    pub async fn product_kind_of_project(
        &self,
        project_id: Uuid,
    ) -> Result<ProductKind, ReceivableError> {
        let project = projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or(ReceivableError::ProjectNotFound(project_id))?;
        let products = quotation_products::Entity::find()
            .filter(quotation_products::Column::QuotationId.eq(project.quotation_id))
            .all(&self.db)
            .await?;

        let any_special = products
            .iter()
            .any(|p| p.kind == ProductKindColumn::SpecialOrder);
        Ok(if any_special {
            ProductKind::SpecialOrder
        } else {
            ProductKind::Stock
        })
    }
}

// ============================================================================
// Pure decision functions for property testing
// ============================================================================

/// Figures derived for a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CollectionFigures {
    /// Amount converted into the receivable's currency.
    pub converted: Decimal,
    /// Converted amount net of IVA.
    pub subtotal: Decimal,
    /// Share of the sale this payment represents, in percent.
    pub percentage: Decimal,
}

/// Computes the derived figures for a payment: the converted amount
/// (`amount / parity`), its net-of-IVA subtotal, and the share of the sale
/// it represents. Returns `None` for a non-positive parity.
pub(crate) fn collection_figures(
    amount_paid: Decimal,
    parity: Option<Decimal>,
    percentage_iva: Option<Decimal>,
    total_sale: Decimal,
) -> Option<CollectionFigures> {
    let converted = match parity {
        Some(parity) if parity > Decimal::ZERO => amount_paid / parity,
        Some(_) => return None,
        None => amount_paid,
    };
    let converted = CurrencyService::round_money(converted);

    let subtotal = match percentage_iva {
        Some(iva) if iva > Decimal::ZERO => {
            CurrencyService::round_money(converted / (iva / Decimal::ONE_HUNDRED + Decimal::ONE))
        }
        _ => converted,
    };

    let percentage = if total_sale > Decimal::ZERO {
        CurrencyService::round(converted / total_sale * Decimal::ONE_HUNDRED, 4)
    } else {
        Decimal::ZERO
    };

    Some(CollectionFigures {
        converted,
        subtotal,
        percentage,
    })
}

/// Which proformas a threshold crossing may order against: all of the
/// project's proformas on consolidated quotations, only the matching
/// currency's on fractionated ones.
pub(crate) fn eligible_proformas(
    is_fractionate: bool,
    receivable_currency: CurrencyCode,
    proformas: &[(Uuid, CurrencyCode)],
) -> Vec<Uuid> {
    proformas
        .iter()
        .filter(|(_, currency)| !is_fractionate || *currency == receivable_currency)
        .map(|(id, _)| *id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_collection_figures_with_parity_and_iva() {
        // 3,270 USD at parity 1.09 toward a EUR receivable = 3,000 EUR;
        // net of 16% IVA = 2,586.21; 30% of a 10,000 sale.
        let figures =
            collection_figures(dec!(3270), Some(dec!(1.09)), Some(dec!(16)), dec!(10000)).unwrap();
        assert_eq!(figures.converted, dec!(3000.00));
        assert_eq!(figures.subtotal, dec!(2586.21));
        assert_eq!(figures.percentage, dec!(30.0000));
    }

    #[test]
    fn test_collection_figures_without_parity() {
        let figures = collection_figures(dec!(1500), None, None, dec!(3000)).unwrap();
        assert_eq!(figures.converted, dec!(1500));
        assert_eq!(figures.subtotal, dec!(1500));
        assert_eq!(figures.percentage, dec!(50.0000));
    }

    #[test]
    fn test_collection_figures_rejects_zero_parity() {
        assert!(collection_figures(dec!(100), Some(dec!(0)), None, dec!(1000)).is_none());
    }

    #[test]
    fn test_collection_figures_zero_total_sale() {
        let figures = collection_figures(dec!(100), None, None, dec!(0)).unwrap();
        assert_eq!(figures.percentage, dec!(0));
    }

    #[test]
    fn test_eligible_proformas_consolidated_takes_all() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let eligible = eligible_proformas(
            false,
            CurrencyCode::Eur,
            &[(a, CurrencyCode::Usd), (b, CurrencyCode::Mxn)],
        );
        assert_eq!(eligible, vec![a, b]);
    }

    #[test]
    fn test_eligible_proformas_fractionated_matches_currency() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let eligible = eligible_proformas(
            true,
            CurrencyCode::Usd,
            &[(a, CurrencyCode::Usd), (b, CurrencyCode::Mxn)],
        );
        assert_eq!(eligible, vec![a]);
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The converted amount scales inversely with the parity and the
        /// derived percentage matches converted/total.
        #[test]
        fn prop_collection_figures_consistent(
            amount in amount_strategy(),
            parity_cents in 1i64..100_000i64,
            total in amount_strategy(),
        ) {
            let parity = Decimal::new(parity_cents, 3);
            let figures = collection_figures(amount, Some(parity), None, total).unwrap();

            let expected = CurrencyService::round_money(amount / parity);
            prop_assert_eq!(figures.converted, expected);
            prop_assert_eq!(
                figures.percentage,
                CurrencyService::round(expected / total * Decimal::ONE_HUNDRED, 4)
            );
        }

        /// Fractionated eligibility only ever selects matching-currency
        /// proformas; consolidated eligibility selects everything.
        #[test]
        fn prop_eligibility_policy(
            fractionate in any::<bool>(),
            currencies in prop::collection::vec(0u8..3, 0..8),
        ) {
            let all: Vec<(Uuid, CurrencyCode)> = currencies
                .iter()
                .map(|c| {
                    let code = match c {
                        0 => CurrencyCode::Eur,
                        1 => CurrencyCode::Usd,
                        _ => CurrencyCode::Mxn,
                    };
                    (Uuid::now_v7(), code)
                })
                .collect();

            let eligible = eligible_proformas(fractionate, CurrencyCode::Eur, &all);
            if fractionate {
                let expected: Vec<Uuid> = all
                    .iter()
                    .filter(|(_, c)| *c == CurrencyCode::Eur)
                    .map(|(id, _)| *id)
                    .collect();
                prop_assert_eq!(eligible, expected);
            } else {
                prop_assert_eq!(eligible.len(), all.len());
            }
        }
    }
}
