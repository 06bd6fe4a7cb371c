//! Project repository: quotation-to-project conversion.
//!
//! Conversion is one transaction: folio assignment, product status flip,
//! receivables fan-out (per currency when fractionated), advance payment
//! records derived from the quotation's proof payments, payables with their
//! pre-funding order sketches, and the commission fan-out. Rendered
//! paperwork is archived after commit, best-effort.

use chrono::Utc;
use mobilia_core::archive::{ArchiveService, DocumentRenderer};
use mobilia_core::commission::{
    ArchitectCommission, Beneficiary, CommissionCalculator, CommissionError, CommissionInputs,
    PercentageSplit, StakeholderSplits,
};
use mobilia_core::currency::PriceSet;
use mobilia_shared::types::{Currency, UserId};
use mobilia_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{
    CommissionRoleColumn, CurrencyCode, OrderStatus, PaymentStatus, ProductStatus, ProjectStatus,
};
use crate::entities::{
    accounts_payable, accounts_receivable, advance_payment_records, commission_payment_records,
    documents, projects, proof_payments, purchase_orders, quotation_products,
    quotation_stakeholders, quotations, users,
};
use crate::repositories::receivable::collection_figures;
use crate::repositories::decode_price_sheet;

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    QuotationNotFound(Uuid),

    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// A project already exists for the quotation.
    #[error("Quotation {0} was already converted into a project")]
    AlreadyConverted(Uuid),

    /// The quotation has no authoritative currency selected.
    #[error("Quotation {0} has no authoritative currency selected")]
    UnpricedQuotation(Uuid),

    /// The quotation's price sheet could not be decoded.
    #[error("{0}")]
    MalformedPriceSheet(String),

    /// Commission rule violation.
    #[error(transparent)]
    Commission(#[from] CommissionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProjectError> for AppError {
    fn from(value: ProjectError) -> Self {
        match value {
            ProjectError::QuotationNotFound(_) | ProjectError::ProjectNotFound(_) => {
                Self::NotFound(value.to_string())
            }
            ProjectError::AlreadyConverted(_) => Self::Conflict(value.to_string()),
            ProjectError::UnpricedQuotation(_)
            | ProjectError::MalformedPriceSheet(_)
            | ProjectError::Commission(_) => Self::Validation(value.to_string()),
            ProjectError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for converting a quotation into a project.
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    /// The quotation to convert.
    pub quotation_id: Uuid,
}

/// Everything the conversion created.
#[derive(Debug, Clone)]
pub struct ProjectCreation {
    /// The project.
    pub project: projects::Model,
    /// Receivables opened, one per settlement currency when fractionated.
    pub receivable_ids: Vec<Uuid>,
    /// Advance payment records derived from the proof payments.
    pub advance_record_ids: Vec<Uuid>,
    /// Payables opened.
    pub payable_ids: Vec<Uuid>,
    /// Pre-funding purchase-order sketches.
    pub sketched_order_ids: Vec<Uuid>,
    /// Commission payment records written.
    pub commission_record_ids: Vec<Uuid>,
}

/// Project repository.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Converts a quotation into a project.
    ///
    /// All financial writes happen in one transaction; a failure anywhere
    /// rolls everything back. Paperwork rendering is separate
    /// (`archive_paperwork`) and never disturbs the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error when the quotation is missing, was already
    /// converted, or has no authoritative currency.
    pub async fn create_from_quotation(
        &self,
        input: CreateProjectInput,
    ) -> Result<ProjectCreation, ProjectError> {
        let txn = self.db.begin().await?;

        let quotation = quotations::Entity::find_by_id(input.quotation_id)
            .one(&txn)
            .await?
            .ok_or(ProjectError::QuotationNotFound(input.quotation_id))?;

        let existing = projects::Entity::find()
            .filter(projects::Column::QuotationId.eq(quotation.id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ProjectError::AlreadyConverted(quotation.id));
        }

        let sheet =
            decode_price_sheet(&quotation).map_err(ProjectError::MalformedPriceSheet)?;
        let authoritative = sheet
            .authoritative
            .ok_or(ProjectError::UnpricedQuotation(quotation.id))?;

        let project = self.insert_project(&txn, &quotation).await?;

        // The quotation's products are now on order.
        let products = quotation_products::Entity::find()
            .filter(quotation_products::Column::QuotationId.eq(quotation.id))
            .all(&txn)
            .await?;
        for product in &products {
            let mut update: quotation_products::ActiveModel = product.clone().into();
            update.status = Set(ProductStatus::Pedido);
            update.update(&txn).await?;
        }

        let proof = proof_payments::Entity::find()
            .filter(proof_payments::Column::QuotationId.eq(quotation.id))
            .order_by_asc(proof_payments::Column::CreatedAt)
            .all(&txn)
            .await?;

        let currencies: Vec<CurrencyCode> = if quotation.is_fractionate {
            quotation.fractional_currencies()
        } else {
            vec![authoritative.into()]
        };

        let mut receivable_ids = Vec::new();
        let mut advance_record_ids = Vec::new();
        let mut payable_ids = Vec::new();
        let mut sketched_order_ids = Vec::new();

        for currency in currencies {
            let set = sheet.get(currency.into()).clone();
            let total = set.total.unwrap_or(Decimal::ZERO);

            let receivable = self
                .insert_receivable(&txn, &quotation, &project, currency, total)
                .await?;
            receivable_ids.push(receivable.id);

            let relevant: Vec<&proof_payments::Model> = proof
                .iter()
                .filter(|p| !quotation.is_fractionate || p.currency == currency)
                .collect();
            let records = self
                .insert_advance_records(&txn, &quotation, &receivable, &relevant, total)
                .await?;
            advance_record_ids.extend(records);

            let (payable_id, sketches) = self
                .insert_payable_with_sketches(&txn, &quotation, &project, currency, &set, &products)
                .await?;
            payable_ids.push(payable_id);
            sketched_order_ids.extend(sketches);
        }

        let commission_record_ids = self
            .insert_commissions(&txn, &quotation, &project, &sheet.get(authoritative).clone())
            .await?;

        txn.commit().await?;

        info!(
            project = %project.id,
            folio = %project.folio,
            receivables = receivable_ids.len(),
            commissions = commission_record_ids.len(),
            "quotation converted into project"
        );

        Ok(ProjectCreation {
            project,
            receivable_ids,
            advance_record_ids,
            payable_ids,
            sketched_order_ids,
            commission_record_ids,
        })
    }

    async fn insert_project(
        &self,
        txn: &DatabaseTransaction,
        quotation: &quotations::Model,
    ) -> Result<projects::Model, ProjectError> {
        let previous = projects::Entity::find()
            .order_by_desc(projects::Column::Sequence)
            .one(txn)
            .await?;
        let sequence = next_sequence(previous.map(|p| p.sequence));

        let showroom_name = match quotation.showroom_manager_id {
            Some(user_id) => users::Entity::find_by_id(user_id)
                .one(txn)
                .await?
                .map(|user| user.first_name),
            None => None,
        };

        let project = projects::ActiveModel {
            id: Set(Uuid::now_v7()),
            folio: Set(build_folio(sequence, quotation.branch.as_deref())),
            reference: Set(build_reference(sequence, showroom_name.as_deref())),
            sequence: Set(sequence),
            quotation_id: Set(quotation.id),
            customer_id: Set(quotation.customer_id),
            branch: Set(quotation.branch.clone()),
            status: Set(ProjectStatus::EnProceso),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await?;
        Ok(project)
    }

    async fn insert_receivable(
        &self,
        txn: &DatabaseTransaction,
        quotation: &quotations::Model,
        project: &projects::Model,
        currency: CurrencyCode,
        total: Decimal,
    ) -> Result<accounts_receivable::Model, ProjectError> {
        let receivable = accounts_receivable::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(project.id),
            quotation_id: Set(quotation.id),
            customer_id: Set(quotation.customer_id),
            currency: Set(currency),
            total_sale: Set(total),
            total_paid: Set(Decimal::ZERO),
            updated_total: Set(Decimal::ZERO),
            balance: Set(total),
            is_paid: Set(false),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await?;
        Ok(receivable)
    }

    async fn insert_advance_records(
        &self,
        txn: &DatabaseTransaction,
        quotation: &quotations::Model,
        receivable: &accounts_receivable::Model,
        proof: &[&proof_payments::Model],
        total: Decimal,
    ) -> Result<Vec<Uuid>, ProjectError> {
        let mut ids = Vec::with_capacity(proof.len());
        for (index, payment) in proof.iter().enumerate() {
            let base = payment.converted_advance.unwrap_or(payment.amount);
            let Some(figures) =
                collection_figures(base, payment.parity, quotation.percentage_iva, total)
            else {
                warn!(payment = %payment.id, "proof payment with invalid parity skipped");
                continue;
            };

            let record = advance_payment_records::ActiveModel {
                id: Set(Uuid::now_v7()),
                accounts_receivable_id: Set(receivable.id),
                project_id: Set(receivable.project_id),
                consecutive_id: Set(i32::try_from(index).unwrap_or(i32::MAX - 1) + 1),
                payment_date: Set(payment.payment_date),
                payment_method: Set(payment.payment_method.clone()),
                amount_paid: Set(payment.amount),
                payment_currency: Set(payment.currency),
                parity: Set(payment.parity),
                percentage_iva: Set(quotation.percentage_iva),
                currency_apply: Set(receivable.currency),
                converted_amount: Set(figures.converted),
                subtotal_amount: Set(Some(figures.subtotal)),
                payment_percentage: Set(Some(figures.percentage)),
                sales_deviation: Set(Decimal::ZERO),
                status: Set(PaymentStatus::Pendiente),
                created_at: Set(Utc::now().into()),
            }
            .insert(txn)
            .await?;
            ids.push(record.id);
        }
        Ok(ids)
    }

    /// Opens a payable for the currency and, when the converted advance
    /// already covers the required one, sketches a PENDIENTE purchase order
    /// per covered product.
    async fn insert_payable_with_sketches(
        &self,
        txn: &DatabaseTransaction,
        quotation: &quotations::Model,
        project: &projects::Model,
        currency: CurrencyCode,
        set: &PriceSet,
        products: &[quotation_products::Model],
    ) -> Result<(Uuid, Vec<Uuid>), ProjectError> {
        let payable = accounts_payable::ActiveModel {
            id: Set(Uuid::now_v7()),
            proforma_id: Set(None),
            project_id: Set(Some(project.id)),
            currency: Set(currency),
            total: Set(set.total.unwrap_or(Decimal::ZERO)),
            total_paid: Set(Decimal::ZERO),
            balance: Set(set.total.unwrap_or(Decimal::ZERO)),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await?;

        let mut sketches = Vec::new();
        if sketch_threshold_met(set.converted_advance, set.advance) {
            for product in products
                .iter()
                .filter(|p| !quotation.is_fractionate || p.currency == currency)
            {
                let order = purchase_orders::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    account_payable_id: Set(Some(payable.id)),
                    proforma_id: Set(None),
                    accounts_receivable_id: Set(None),
                    project_id: Set(Some(project.id)),
                    provider_id: Set(Some(product.provider_id)),
                    status: Set(OrderStatus::Pendiente),
                    quantity: Set(Some(product.quantity)),
                    total: Set(product.subtotal),
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
                sketches.push(order.id);
            }
        }
        Ok((payable.id, sketches))
    }

    async fn insert_commissions(
        &self,
        txn: &DatabaseTransaction,
        quotation: &quotations::Model,
        project: &projects::Model,
        authoritative_set: &PriceSet,
    ) -> Result<Vec<Uuid>, ProjectError> {
        let Some(total) = authoritative_set.total else {
            // Unpriced quotations fan out no commissions.
            return Ok(Vec::new());
        };

        let stakeholders = quotation_stakeholders::Entity::find()
            .filter(quotation_stakeholders::Column::QuotationId.eq(quotation.id))
            .all(txn)
            .await?;

        let inputs = commission_inputs(quotation, &stakeholders, total);
        let shares = CommissionCalculator::plan(&inputs)?;

        let mut ids = Vec::with_capacity(shares.len());
        for share in shares {
            let (user_id, user_name) = match share.beneficiary {
                Beneficiary::User(user) => (Some(user.into_inner()), None),
                Beneficiary::Named(name) => (None, Some(name)),
            };
            let record = commission_payment_records::ActiveModel {
                id: Set(Uuid::now_v7()),
                project_id: Set(project.id),
                user_id: Set(user_id),
                user_name: Set(user_name),
                role: Set(share.role.into()),
                commission_percentage: Set(share.percentage),
                commission_amount: Set(share.amount),
                project_total: Set(share.project_total),
                created_at: Set(Utc::now().into()),
            }
            .insert(txn)
            .await?;
            ids.push(record.id);
        }
        Ok(ids)
    }

    /// Renders and archives the project's paperwork (client quote, provider
    /// quote, one advance receipt per payment record). Best-effort: every
    /// failure is logged and skipped, never propagated.
    pub async fn archive_paperwork(
        &self,
        project_id: Uuid,
        renderer: &dyn DocumentRenderer,
        archive: &ArchiveService,
    ) {
        let Ok(Some(project)) = projects::Entity::find_by_id(project_id).one(&self.db).await
        else {
            warn!(%project_id, "paperwork skipped: project not found");
            return;
        };

        let stamp = Utc::now().format("%d-%m-%Y");
        self.render_one(
            &project,
            renderer,
            archive,
            "cotizacion_cliente",
            &format!("cotizacion_cliente_{}_{stamp}.pdf", project.folio),
        )
        .await;
        self.render_one(
            &project,
            renderer,
            archive,
            "cotizacion_proveedor",
            &format!("cotizacion_proveedor_{}_{stamp}.pdf", project.folio),
        )
        .await;

        let records = advance_payment_records::Entity::find()
            .filter(advance_payment_records::Column::ProjectId.eq(project.id))
            .all(&self.db)
            .await
            .unwrap_or_default();
        for record in records {
            self.render_one(
                &project,
                renderer,
                archive,
                "recibo_anticipo",
                &format!(
                    "recibo_anticipo_{}_{}_{stamp}.pdf",
                    project.folio, record.consecutive_id
                ),
            )
            .await;
        }
    }

    async fn render_one(
        &self,
        project: &projects::Model,
        renderer: &dyn DocumentRenderer,
        archive: &ArchiveService,
        template: &str,
        filename: &str,
    ) {
        let props = json!({
            "projectFolio": project.folio,
            "reference": project.reference,
        });
        let bytes = match renderer.render(template, &props).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%template, %error, "paperwork rendering failed");
                return;
            }
        };

        let key = ArchiveService::document_key(
            mobilia_shared::types::ProjectId::from_uuid(project.id),
            filename,
        );
        if let Err(error) = archive.store(&key, bytes).await {
            warn!(%key, %error, "paperwork archiving failed");
            return;
        }

        let inserted = documents::ActiveModel {
            id: Set(Uuid::now_v7()),
            file_url: Set(key.clone()),
            name: Set(filename.to_string()),
            extension: Set(Some("pdf".to_string())),
            project_id: Set(Some(project.id)),
            proforma_id: Set(None),
            advance_payment_record_id: Set(None),
            account_payable_history_id: Set(None),
            container_id: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await;
        if let Err(error) = inserted {
            warn!(%key, %error, "paperwork document row failed");
        }
    }
}

// ============================================================================
// Pure helpers for folio and commission assembly
// ============================================================================

/// The next project sequence number.
pub(crate) fn next_sequence(previous: Option<i64>) -> i64 {
    previous.unwrap_or(0) + 1
}

/// Human-facing folio: running number plus the branch initial.
pub(crate) fn build_folio(sequence: i64, branch: Option<&str>) -> String {
    match branch.and_then(|name| name.chars().next()) {
        Some(initial) => format!("{sequence}{}", initial.to_uppercase()),
        None => sequence.to_string(),
    }
}

/// Showroom reference: running number plus the showroom manager's initial.
pub(crate) fn build_reference(sequence: i64, showroom_name: Option<&str>) -> Option<String> {
    showroom_name
        .and_then(|name| name.chars().next())
        .map(|initial| format!("{sequence}{}", initial.to_uppercase()))
}

/// The pre-funding sketch rule: the customer's converted advance already
/// covers the required advance. Absent figures never trigger.
pub(crate) fn sketch_threshold_met(
    converted_advance: Option<Decimal>,
    advance: Option<Decimal>,
) -> bool {
    match (converted_advance, advance) {
        (Some(converted), Some(advance)) if advance > Decimal::ZERO => converted >= advance,
        _ => false,
    }
}

/// Decodes classification splits from a JSON column; malformed data counts
/// as no splits.
pub(crate) fn decode_splits(value: &serde_json::Value) -> Vec<PercentageSplit> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Assembles the commission calculator inputs from a quotation and its
/// stakeholders.
pub(crate) fn commission_inputs(
    quotation: &quotations::Model,
    stakeholders: &[quotation_stakeholders::Model],
    total: Decimal,
) -> CommissionInputs {
    let architect = quotation.is_architect.then(|| ArchitectCommission {
        architect_name: quotation.architect_name.clone().unwrap_or_default(),
        percentage: quotation
            .commission_percentage_architect
            .unwrap_or(Decimal::ZERO),
        main_project_manager: quotation.main_project_manager_id.map(UserId::from_uuid),
        classification_splits: decode_splits(&quotation.main_pm_classification_splits),
    });

    let referenced_customer = (quotation.is_referenced_customer)
        .then_some(quotation.reference_customer_id)
        .flatten()
        .map(|user| {
            (
                UserId::from_uuid(user),
                quotation
                    .commission_percentage_referenced_customer
                    .unwrap_or(Decimal::ZERO),
            )
        });

    let by_role = |role: CommissionRoleColumn| -> Vec<StakeholderSplits> {
        stakeholders
            .iter()
            .filter(|s| s.role == role)
            .map(|s| StakeholderSplits {
                user_id: UserId::from_uuid(s.user_id),
                splits: decode_splits(&s.splits),
            })
            .collect()
    };

    CommissionInputs {
        project_total: total,
        architect,
        referenced_customer,
        project_managers: if quotation.is_project_manager {
            by_role(CommissionRoleColumn::ProjectManager)
        } else {
            Vec::new()
        },
        designers: if quotation.is_designer {
            by_role(CommissionRoleColumn::Designer)
        } else {
            Vec::new()
        },
        showroom_manager: quotation.showroom_manager_id.map(UserId::from_uuid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(None), 1);
        assert_eq!(next_sequence(Some(41)), 42);
    }

    #[rstest::rstest]
    #[case(12, Some("Guadalajara"), "12G")]
    #[case(12, Some("polanco"), "12P")]
    #[case(12, None, "12")]
    fn test_build_folio(#[case] sequence: i64, #[case] branch: Option<&str>, #[case] expected: &str) {
        assert_eq!(build_folio(sequence, branch), expected);
    }

    #[test]
    fn test_build_reference() {
        assert_eq!(build_reference(7, Some("Sofia")), Some("7S".to_string()));
        assert_eq!(build_reference(7, None), None);
        assert_eq!(build_reference(7, Some("")), None);
    }

    #[test]
    fn test_sketch_threshold() {
        assert!(sketch_threshold_met(Some(dec!(3000)), Some(dec!(3000))));
        assert!(sketch_threshold_met(Some(dec!(3500)), Some(dec!(3000))));
        assert!(!sketch_threshold_met(Some(dec!(2999)), Some(dec!(3000))));
        assert!(!sketch_threshold_met(None, Some(dec!(3000))));
        assert!(!sketch_threshold_met(Some(dec!(3000)), None));
        assert!(!sketch_threshold_met(Some(dec!(3000)), Some(dec!(0))));
    }

    #[test]
    fn test_decode_splits_tolerates_malformed_json() {
        assert!(decode_splits(&serde_json::json!("nonsense")).is_empty());
        let splits = decode_splits(&serde_json::json!([
            {"classification": "closing", "percentage": "2.5"},
            {"classification": null, "percentage": "1"}
        ]));
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].percentage, dec!(2.5));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Folios are strictly increasing and keep the branch initial.
        #[test]
        fn prop_folio_sequence_monotone(prev in 0i64..1_000_000) {
            let next = next_sequence(Some(prev));
            prop_assert_eq!(next, prev + 1);
            let folio = build_folio(next, Some("Monterrey"));
            prop_assert!(folio.ends_with('M'));
            prop_assert!(folio.starts_with(&next.to_string()));
        }

        /// The sketch rule is monotone in the converted advance.
        #[test]
        fn prop_sketch_rule_monotone(
            advance_cents in 1i64..10_000_000i64,
            short in 1i64..1_000_000i64,
        ) {
            let advance = Decimal::new(advance_cents, 2);
            let below = advance - Decimal::new(short.min(advance_cents), 2);
            prop_assert!(sketch_threshold_met(Some(advance), Some(advance)));
            if below < advance {
                prop_assert!(!sketch_threshold_met(Some(below), Some(advance)));
            }
        }
    }
}
