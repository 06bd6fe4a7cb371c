//! Proforma repository: provider+brand quote registration.
//!
//! Registration enforces the one-proforma-per-(project, provider, brand)
//! rule inside the insert transaction, with the unique constraint as the
//! backstop, links the matching quotation products, opens the payable, and
//! evaluates the funding threshold immediately in case collections already
//! cover the advance.

use chrono::{NaiveDate, Utc};
use mobilia_core::funding::FundingService;
use mobilia_core::proforma::{ProformaError as ProformaRule, ProformaService, ReceivableFacts};
use mobilia_shared::mail::{MailTemplate, Notification, Notifier};
use mobilia_shared::types::Currency;
use mobilia_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::OrderStatus;
use crate::entities::{
    accounts_payable, accounts_receivable, brands, documents, proformas, projects,
    purchase_orders, quotation_products, quotations,
};
use crate::repositories::{decode_price_sheet, DocumentInput, UserDirectory};

/// Error types for proforma operations.
#[derive(Debug, thiserror::Error)]
pub enum ProformaError {
    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Provider not found.
    #[error("Provider not found: {0}")]
    ProviderNotFound(Uuid),

    /// Brand not found.
    #[error("Brand not found: {0}")]
    BrandNotFound(Uuid),

    /// Proforma not found.
    #[error("Proforma not found: {0}")]
    ProformaNotFound(Uuid),

    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    QuotationNotFound(Uuid),

    /// The quotation's price sheet could not be decoded.
    #[error("{0}")]
    MalformedPriceSheet(String),

    /// Rule violation (duplicate triple, missing document).
    #[error(transparent)]
    Rule(#[from] ProformaRule),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProformaError> for AppError {
    fn from(value: ProformaError) -> Self {
        match value {
            ProformaError::ProjectNotFound(_)
            | ProformaError::ProviderNotFound(_)
            | ProformaError::BrandNotFound(_)
            | ProformaError::QuotationNotFound(_)
            | ProformaError::ProformaNotFound(_) => Self::NotFound(value.to_string()),
            ProformaError::Rule(ProformaRule::DuplicateProviderBrand) => {
                Self::Conflict(value.to_string())
            }
            ProformaError::Rule(_) | ProformaError::MalformedPriceSheet(_) => {
                Self::Validation(value.to_string())
            }
            ProformaError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for registering a proforma.
#[derive(Debug, Clone)]
pub struct RegisterProformaInput {
    /// The project the quote belongs to.
    pub project_id: Uuid,
    /// The quoted provider.
    pub provider_id: Uuid,
    /// The quoted brand.
    pub brand_id: Uuid,
    /// Quoted amount; sizes the payable.
    pub amount: Decimal,
    /// Currency the provider quoted in.
    pub currency: Currency,
    /// Date on the provider's quote.
    pub proforma_date: Option<NaiveDate>,
    /// The provider's quote document. Required.
    pub document: Option<DocumentInput>,
}

/// Proforma repository.
#[derive(Debug, Clone)]
pub struct ProformaRepository {
    db: DatabaseConnection,
}

impl ProformaRepository {
    /// Creates a new proforma repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a proforma, opens its payable, and evaluates the funding
    /// threshold immediately (a proforma added after collections began may
    /// already be fully funded).
    ///
    /// After commit, administrators are notified best-effort.
    ///
    /// # Errors
    ///
    /// - `Conflict` when the (project, provider, brand) triple is taken.
    /// - `Validation` when no document is attached.
    /// - `NotFound` when the project, provider, or brand is missing.
    pub async fn register(
        &self,
        input: RegisterProformaInput,
        notifier: &dyn Notifier,
    ) -> Result<proformas::Model, ProformaError> {
        let txn = self.db.begin().await?;

        let project = projects::Entity::find_by_id(input.project_id)
            .one(&txn)
            .await?
            .ok_or(ProformaError::ProjectNotFound(input.project_id))?;
        self.ensure_catalog(&txn, &input).await?;

        let duplicate = proformas::Entity::find()
            .filter(proformas::Column::ProjectId.eq(input.project_id))
            .filter(proformas::Column::ProviderId.eq(input.provider_id))
            .filter(proformas::Column::BrandId.eq(input.brand_id))
            .one(&txn)
            .await?;
        ProformaService::validate_new(duplicate.is_some(), input.document.is_some())?;

        let proforma = proformas::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(input.project_id),
            provider_id: Set(input.provider_id),
            brand_id: Set(input.brand_id),
            amount: Set(input.amount),
            currency: Set(input.currency.into()),
            proforma_date: Set(input.proforma_date),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        // Claim the quotation products this provider+brand quote covers.
        let claimed = self.claim_products(&txn, &project, &proforma).await?;

        if let Some(document) = input.document {
            documents::ActiveModel {
                id: Set(Uuid::now_v7()),
                file_url: Set(document.file_url),
                name: Set(document.name),
                extension: Set(document.extension),
                proforma_id: Set(Some(proforma.id)),
                project_id: Set(None),
                advance_payment_record_id: Set(None),
                account_payable_history_id: Set(None),
                container_id: Set(None),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
        }

        let payable = accounts_payable::ActiveModel {
            id: Set(Uuid::now_v7()),
            proforma_id: Set(Some(proforma.id)),
            project_id: Set(Some(project.id)),
            currency: Set(proforma.currency),
            total: Set(proforma.amount),
            total_paid: Set(Decimal::ZERO),
            balance: Set(proforma.amount),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        self.evaluate_immediate_funding(&txn, &project, &proforma, &payable, claimed)
            .await?;

        txn.commit().await?;

        info!(proforma = %proforma.id, project = %project.id, "proforma registered");
        self.notify_admins(notifier, &project, &proforma, MailTemplate::NewProforma)
            .await;

        Ok(proforma)
    }

    /// Updates a proforma, re-validating the uniqueness rule (excluding the
    /// proforma itself) and the document requirement. Administrators are
    /// notified of the change best-effort.
    ///
    /// # Errors
    ///
    /// Same taxonomy as `register`.
    pub async fn update(
        &self,
        proforma_id: Uuid,
        input: RegisterProformaInput,
        notifier: &dyn Notifier,
    ) -> Result<(), ProformaError> {
        let txn = self.db.begin().await?;

        let existing = proformas::Entity::find_by_id(proforma_id)
            .one(&txn)
            .await?
            .ok_or(ProformaError::ProformaNotFound(proforma_id))?;
        let project = projects::Entity::find_by_id(input.project_id)
            .one(&txn)
            .await?
            .ok_or(ProformaError::ProjectNotFound(input.project_id))?;
        self.ensure_catalog(&txn, &input).await?;

        let duplicate = proformas::Entity::find()
            .filter(proformas::Column::Id.ne(proforma_id))
            .filter(proformas::Column::ProjectId.eq(input.project_id))
            .filter(proformas::Column::ProviderId.eq(input.provider_id))
            .filter(proformas::Column::BrandId.eq(input.brand_id))
            .one(&txn)
            .await?;
        ProformaService::validate_update(duplicate.is_some(), input.document.is_some())?;

        let mut update: proformas::ActiveModel = existing.into();
        update.provider_id = Set(input.provider_id);
        update.brand_id = Set(input.brand_id);
        update.amount = Set(input.amount);
        update.currency = Set(input.currency.into());
        update.proforma_date = Set(input.proforma_date);
        let updated = update.update(&txn).await?;

        if let Some(document) = input.document {
            documents::ActiveModel {
                id: Set(Uuid::now_v7()),
                file_url: Set(document.file_url),
                name: Set(document.name),
                extension: Set(document.extension),
                proforma_id: Set(Some(proforma_id)),
                project_id: Set(None),
                advance_payment_record_id: Set(None),
                account_payable_history_id: Set(None),
                container_id: Set(None),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.notify_admins(notifier, &project, &updated, MailTemplate::ProformaUpdated)
            .await;
        Ok(())
    }

    async fn ensure_catalog(
        &self,
        txn: &DatabaseTransaction,
        input: &RegisterProformaInput,
    ) -> Result<(), ProformaError> {
        crate::entities::providers::Entity::find_by_id(input.provider_id)
            .one(txn)
            .await?
            .ok_or(ProformaError::ProviderNotFound(input.provider_id))?;
        brands::Entity::find_by_id(input.brand_id)
            .one(txn)
            .await?
            .ok_or(ProformaError::BrandNotFound(input.brand_id))?;
        Ok(())
    }

    /// Links every quotation product matching (quotation of the project,
    /// provider, brand) to the proforma. Returns the claimed products.
    async fn claim_products(
        &self,
        txn: &DatabaseTransaction,
        project: &projects::Model,
        proforma: &proformas::Model,
    ) -> Result<Vec<quotation_products::Model>, ProformaError> {
        let products = quotation_products::Entity::find()
            .filter(quotation_products::Column::QuotationId.eq(project.quotation_id))
            .filter(quotation_products::Column::ProviderId.eq(proforma.provider_id))
            .filter(quotation_products::Column::BrandId.eq(proforma.brand_id))
            .all(txn)
            .await?;

        let mut claimed = Vec::with_capacity(products.len());
        for product in products {
            let mut update: quotation_products::ActiveModel = product.clone().into();
            update.proforma_id = Set(Some(proforma.id));
            claimed.push(update.update(txn).await?);
        }
        Ok(claimed)
    }

    /// Covers proformas registered after payment began: when the matching
    /// receivable has already collected the advance, the purchase order is
    /// created right away.
    async fn evaluate_immediate_funding(
        &self,
        txn: &DatabaseTransaction,
        project: &projects::Model,
        proforma: &proformas::Model,
        payable: &accounts_payable::Model,
        claimed: Vec<quotation_products::Model>,
    ) -> Result<(), ProformaError> {
        let receivables = accounts_receivable::Entity::find()
            .filter(accounts_receivable::Column::ProjectId.eq(project.id))
            .all(txn)
            .await?;
        let facts: Vec<ReceivableFacts> = receivables
            .iter()
            .map(|r| ReceivableFacts {
                id: mobilia_shared::types::ReceivableId::from_uuid(r.id),
                currency: r.currency.into(),
                total_paid: r.total_paid,
            })
            .collect();

        let product_currency = claimed.first().map(|p| Currency::from(p.currency));
        let Some(selected) = ProformaService::select_receivable(&facts, product_currency) else {
            return Ok(());
        };

        let quotation = quotations::Entity::find_by_id(project.quotation_id)
            .one(txn)
            .await?
            .ok_or(ProformaError::QuotationNotFound(project.quotation_id))?;
        let sheet = decode_price_sheet(&quotation).map_err(ProformaError::MalformedPriceSheet)?;
        let advance = sheet.advance_for(selected.currency);

        if !FundingService::threshold_met(selected.total_paid, advance) {
            return Ok(());
        }

        let order = purchase_orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_payable_id: Set(Some(payable.id)),
            proforma_id: Set(Some(proforma.id)),
            accounts_receivable_id: Set(Some(selected.id.into_inner())),
            project_id: Set(Some(project.id)),
            provider_id: Set(Some(proforma.provider_id)),
            status: Set(OrderStatus::Nueva),
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

        for product in claimed {
            let mut update: quotation_products::ActiveModel = product.into();
            update.purchase_order_id = Set(Some(order.id));
            update.update(txn).await?;
        }

        info!(proforma = %proforma.id, order = %order.id, "proforma funded on registration");
        Ok(())
    }

    /// Best-effort admin notification after a proforma change.
    async fn notify_admins(
        &self,
        notifier: &dyn Notifier,
        project: &projects::Model,
        proforma: &proformas::Model,
        template: MailTemplate,
    ) {
        let admins = UserDirectory::new(self.db.clone())
            .admin_emails()
            .await
            .unwrap_or_default();
        if admins.is_empty() {
            return;
        }

        notifier
            .send_best_effort(Notification {
                to: admins,
                template,
                data: json!({
                    "projectFolio": project.folio,
                    "proformaId": proforma.id.to_string(),
                    "amount": proforma.amount.to_string(),
                    "currency": Currency::from(proforma.currency).to_string(),
                }),
            })
            .await;
    }
}
