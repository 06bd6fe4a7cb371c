//! Purchase-order repository: status machine, production dates, and the
//! arrival cascade.

use chrono::NaiveDate;
use mobilia_core::schedule::{ArrivalInputs, PurchaseOrderStatus, ScheduleError, ScheduleService};
use mobilia_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::OrderStatus;
use crate::entities::{
    accounts_payable, brands, collections, containers, proformas, providers, purchase_orders,
};

/// Error types for purchase-order operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseOrderError {
    /// Purchase order not found.
    #[error("Purchase order not found: {0}")]
    OrderNotFound(Uuid),

    /// Collection not found.
    #[error("Collection not found: {0}")]
    CollectionNotFound(Uuid),

    /// Invalid status transition.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PurchaseOrderError> for AppError {
    fn from(value: PurchaseOrderError) -> Self {
        match value {
            PurchaseOrderError::OrderNotFound(_) | PurchaseOrderError::CollectionNotFound(_) => {
                Self::NotFound(value.to_string())
            }
            PurchaseOrderError::Schedule(_) => Self::Validation(value.to_string()),
            PurchaseOrderError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A purchase order awaiting collection, with its provider context.
#[derive(Debug, Clone)]
pub struct PendingCollection {
    /// The order.
    pub order_id: Uuid,
    /// Provider name.
    pub provider: Option<String>,
    /// Brand name.
    pub brand: Option<String>,
    /// Planned production end.
    pub production_end_date: Option<NaiveDate>,
    /// Captured real production end.
    pub production_real_end_date: Option<NaiveDate>,
}

/// Purchase-order repository.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    db: DatabaseConnection,
}

impl PurchaseOrderRepository {
    /// Creates a new purchase-order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Moves an order through its status machine.
    ///
    /// # Errors
    ///
    /// Returns a validation error for transitions outside
    /// Pendiente → Nueva → EnProduccion → EnRecoleccion → EnTransito →
    /// Entregado.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        target: PurchaseOrderStatus,
    ) -> Result<(), PurchaseOrderError> {
        let order = purchase_orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or(PurchaseOrderError::OrderNotFound(order_id))?;

        let current: PurchaseOrderStatus = order.status.into();
        let next = ScheduleService::transition_order(current, target)?;

        let mut update: purchase_orders::ActiveModel = order.into();
        update.status = Set(next.into());
        update.update(&self.db).await?;
        Ok(())
    }

    /// Captures the real production end date and recomputes arrival dates
    /// for every order sharing the collection (or just this order when it
    /// is not collected yet).
    ///
    /// # Errors
    ///
    /// Returns an error when the order is missing.
    pub async fn capture_real_end_date(
        &self,
        order_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), PurchaseOrderError> {
        let txn = self.db.begin().await?;

        let order = purchase_orders::Entity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or(PurchaseOrderError::OrderNotFound(order_id))?;

        let collection_id = order.collection_id;
        let mut update: purchase_orders::ActiveModel = order.into();
        update.production_real_end_date = Set(Some(date));
        update.update(&txn).await?;

        match collection_id {
            Some(collection_id) => {
                self.cascade_collection(&txn, collection_id).await?;
            }
            None => {
                self.cascade_single(&txn, order_id).await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    /// Recomputes arrival dates for every order in a collection, using the
    /// container's voyage dates when the collection is already assigned to
    /// one.
    pub(crate) async fn cascade_collection(
        &self,
        txn: &DatabaseTransaction,
        collection_id: Uuid,
    ) -> Result<(), PurchaseOrderError> {
        let collection = collections::Entity::find_by_id(collection_id)
            .one(txn)
            .await?
            .ok_or(PurchaseOrderError::CollectionNotFound(collection_id))?;

        let container = match collection.container_id {
            Some(container_id) => containers::Entity::find_by_id(container_id).one(txn).await?,
            None => None,
        };
        let (eta, etd) = container
            .as_ref()
            .map_or((None, None), |c| (c.eta_date, c.etd_date));

        // The voyage dates also refresh the container's own warehouse
        // arrival estimate.
        if let Some(container) = container {
            if let Some(warehouse) = ScheduleService::warehouse_arrival(eta, etd) {
                let mut update: containers::ActiveModel = container.into();
                update.arrival_date_warehouse = Set(Some(warehouse));
                update.update(txn).await?;
            }
        }

        let orders = purchase_orders::Entity::find()
            .filter(purchase_orders::Column::CollectionId.eq(collection_id))
            .all(txn)
            .await?;
        for order in orders {
            self.apply_arrival(txn, order, eta, etd).await?;
        }
        Ok(())
    }

    async fn cascade_single(
        &self,
        txn: &DatabaseTransaction,
        order_id: Uuid,
    ) -> Result<(), PurchaseOrderError> {
        let order = purchase_orders::Entity::find_by_id(order_id)
            .one(txn)
            .await?
            .ok_or(PurchaseOrderError::OrderNotFound(order_id))?;
        self.apply_arrival(txn, order, None, None).await
    }

    /// Applies the priority chain (ETA+10 > ETD+31 > real end+53 >
    /// planned end+53) to one order.
    async fn apply_arrival(
        &self,
        txn: &DatabaseTransaction,
        order: purchase_orders::Model,
        eta: Option<NaiveDate>,
        etd: Option<NaiveDate>,
    ) -> Result<(), PurchaseOrderError> {
        let inputs = ArrivalInputs {
            eta,
            etd,
            production_real_end: order.production_real_end_date,
            production_end: order.production_end_date,
        };
        let Some((arrival, _basis)) = ScheduleService::arrival_date(&inputs) else {
            return Ok(());
        };

        let mut update: purchase_orders::ActiveModel = order.into();
        update.arrival_date = Set(Some(arrival));
        update.update(txn).await?;
        Ok(())
    }

    /// Orders ready to be collected but not grouped into a collection yet.
    pub async fn list_pending_collection(
        &self,
    ) -> Result<Vec<PendingCollection>, PurchaseOrderError> {
        let orders = purchase_orders::Entity::find()
            .filter(purchase_orders::Column::Status.eq(OrderStatus::EnRecoleccion))
            .filter(purchase_orders::Column::CollectionId.is_null())
            .all(&self.db)
            .await?;

        let mut pending = Vec::with_capacity(orders.len());
        for order in orders {
            let proforma = match order.proforma_id {
                Some(id) => proformas::Entity::find_by_id(id).one(&self.db).await?,
                None => None,
            };
            let provider = match proforma.as_ref().map(|p| p.provider_id) {
                Some(id) => providers::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .map(|p| p.name),
                None => None,
            };
            let brand = match proforma.as_ref().map(|p| p.brand_id) {
                Some(id) => brands::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .map(|b| b.brand_name),
                None => None,
            };
            pending.push(PendingCollection {
                order_id: order.id,
                provider,
                brand,
                production_end_date: order.production_end_date,
                production_real_end_date: order.production_real_end_date,
            });
        }
        Ok(pending)
    }

    /// Daily sweep: orders in production whose (real, else planned) end has
    /// passed advance to collection once their payable is settled in full.
    /// Returns how many orders moved.
    pub async fn production_sweep(&self, today: NaiveDate) -> Result<u64, PurchaseOrderError> {
        let candidates = purchase_orders::Entity::find()
            .filter(purchase_orders::Column::Status.eq(OrderStatus::EnProduccion))
            .filter(
                Condition::any()
                    .add(purchase_orders::Column::ProductionRealEndDate.lte(today))
                    .add(purchase_orders::Column::ProductionEndDate.lte(today)),
            )
            .all(&self.db)
            .await?;

        let mut moved = 0u64;
        for order in candidates {
            let Some(payable_id) = order.account_payable_id else {
                continue;
            };
            let Some(payable) = accounts_payable::Entity::find_by_id(payable_id)
                .one(&self.db)
                .await?
            else {
                continue;
            };

            if !ScheduleService::ready_for_collection(
                order.status.into(),
                order.production_end_date,
                order.production_real_end_date,
                today,
                payable.total_paid,
                payable.total,
            ) {
                continue;
            }

            let mut update: purchase_orders::ActiveModel = order.into();
            update.status = Set(OrderStatus::EnRecoleccion);
            update.update(&self.db).await?;
            moved += 1;
        }

        if moved > 0 {
            info!(moved, "production sweep advanced orders to collection");
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilia_core::schedule::PurchaseOrderStatus as S;

    #[test]
    fn test_error_taxonomy_mapping() {
        let not_found: AppError = PurchaseOrderError::OrderNotFound(Uuid::now_v7()).into();
        assert_eq!(not_found.error_code(), "NOT_FOUND");

        let invalid: AppError = PurchaseOrderError::Schedule(ScheduleError::InvalidTransition {
            from: S::Nueva,
            to: S::Entregado,
        })
        .into();
        assert_eq!(invalid.error_code(), "VALIDATION_ERROR");
    }
}
