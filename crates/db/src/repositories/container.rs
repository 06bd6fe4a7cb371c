//! Container repository: voyage updates and the downstream arrival cascade.
//!
//! A container update stamps the status-driven dates (in transit → arrival
//! now, delivered → shipping now), refreshes the ETA/ETD-derived warehouse
//! estimate, and recomputes arrival dates for every purchase order
//! reachable through the container's collections. The two date rules write
//! different columns and never overwrite each other.

use chrono::{NaiveDate, Utc};
use mobilia_core::schedule::{ContainerStatus, ScheduleError, ScheduleService};
use mobilia_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{collections, containers, purchase_orders};
use crate::repositories::purchase_order::PurchaseOrderRepository;
use crate::repositories::PurchaseOrderError;

/// Error types for container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Container not found.
    #[error("Container not found: {0}")]
    ContainerNotFound(Uuid),

    /// Invalid status transition.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Cascade failure.
    #[error(transparent)]
    Cascade(#[from] PurchaseOrderError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ContainerError> for AppError {
    fn from(value: ContainerError) -> Self {
        match value {
            ContainerError::ContainerNotFound(_) => Self::NotFound(value.to_string()),
            ContainerError::Schedule(_) => Self::Validation(value.to_string()),
            ContainerError::Cascade(e) => e.into(),
            ContainerError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for updating a container.
#[derive(Debug, Clone, Default)]
pub struct UpdateContainerInput {
    /// New status, when the container moves.
    pub status: Option<ContainerStatus>,
    /// Estimated time of departure.
    pub etd_date: Option<NaiveDate>,
    /// Estimated time of arrival.
    pub eta_date: Option<NaiveDate>,
    /// Customs clearance number.
    pub pedimento: Option<String>,
}

/// Container repository.
#[derive(Debug, Clone)]
pub struct ContainerRepository {
    db: DatabaseConnection,
}

impl ContainerRepository {
    /// Creates a new container repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new container in consolidation.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        container_number: String,
    ) -> Result<containers::Model, ContainerError> {
        let container = containers::ActiveModel {
            id: Set(Uuid::now_v7()),
            container_number: Set(container_number),
            status: Set(crate::entities::sea_orm_active_enums::ContainerStatus::EnConsolidacion),
            pedimento: Set(None),
            etd_date: Set(None),
            eta_date: Set(None),
            arrival_date: Set(None),
            shipping_date: Set(None),
            arrival_date_warehouse: Set(None),
            gross_weight: Set(None),
            number_boxes: Set(None),
            measures: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;
        Ok(container)
    }

    /// Groups purchase orders into a collection bound for this container.
    ///
    /// # Errors
    ///
    /// Returns an error when the container is missing.
    pub async fn create_collection(
        &self,
        container_id: Uuid,
        name: Option<String>,
        order_ids: &[Uuid],
    ) -> Result<collections::Model, ContainerError> {
        let txn = self.db.begin().await?;

        containers::Entity::find_by_id(container_id)
            .one(&txn)
            .await?
            .ok_or(ContainerError::ContainerNotFound(container_id))?;

        let collection = collections::ActiveModel {
            id: Set(Uuid::now_v7()),
            container_id: Set(Some(container_id)),
            name: Set(name),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        for order_id in order_ids {
            if let Some(order) = purchase_orders::Entity::find_by_id(*order_id)
                .one(&txn)
                .await?
            {
                let mut update: purchase_orders::ActiveModel = order.into();
                update.collection_id = Set(Some(collection.id));
                update.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(collection)
    }

    /// Updates a container's voyage data and cascades the schedule:
    ///
    /// - a status change stamps arrival-now / shipping-now,
    /// - ETA/ETD refresh the warehouse-arrival estimate,
    /// - every order reachable through the container's collections gets its
    ///   arrival date re-derived through the priority chain.
    ///
    /// # Errors
    ///
    /// Returns an error when the container is missing or the status
    /// transition is invalid.
    pub async fn update(
        &self,
        container_id: Uuid,
        input: UpdateContainerInput,
    ) -> Result<(), ContainerError> {
        let txn = self.db.begin().await?;

        let container = containers::Entity::find_by_id(container_id)
            .one(&txn)
            .await?
            .ok_or(ContainerError::ContainerNotFound(container_id))?;

        let eta = input.eta_date.or(container.eta_date);
        let etd = input.etd_date.or(container.etd_date);

        let mut update: containers::ActiveModel = container.clone().into();
        if let Some(eta_date) = input.eta_date {
            update.eta_date = Set(Some(eta_date));
        }
        if let Some(etd_date) = input.etd_date {
            update.etd_date = Set(Some(etd_date));
        }
        if let Some(pedimento) = input.pedimento {
            update.pedimento = Set(Some(pedimento));
        }

        if let Some(target) = input.status {
            let current: ContainerStatus = container.status.into();
            let next = ScheduleService::transition_container(current, target)?;
            update.status = Set(next.into());

            let stamps = ScheduleService::status_dates(next, Utc::now());
            if let Some(arrival) = stamps.arrival_date {
                update.arrival_date = Set(Some(arrival.into()));
            }
            if let Some(shipping) = stamps.shipping_date {
                update.shipping_date = Set(Some(shipping.into()));
            }
        }

        if let Some(warehouse) = ScheduleService::warehouse_arrival(eta, etd) {
            update.arrival_date_warehouse = Set(Some(warehouse));
        }
        update.update(&txn).await?;

        // Cascade arrival dates through every collection on this container.
        let cascade = PurchaseOrderRepository::new(self.db.clone());
        let linked = collections::Entity::find()
            .filter(collections::Column::ContainerId.eq(container_id))
            .all(&txn)
            .await?;
        for collection in linked {
            cascade.cascade_collection(&txn, collection.id).await?;
        }

        txn.commit().await?;
        info!(container = %container_id, "container updated and schedule cascaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilia_core::schedule::ContainerStatus as S;

    #[test]
    fn test_error_taxonomy_mapping() {
        let not_found: AppError = ContainerError::ContainerNotFound(Uuid::now_v7()).into();
        assert_eq!(not_found.error_code(), "NOT_FOUND");

        let invalid: AppError =
            ContainerError::Schedule(ScheduleError::InvalidContainerTransition {
                from: S::Entregado,
                to: S::EnTransito,
            })
            .into();
        assert_eq!(invalid.error_code(), "VALIDATION_ERROR");
    }
}
