//! Delivery repository: next-day delivery lookups for the notifier.

use chrono::{Days, NaiveDate};
use mobilia_shared::AppError;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{customers, delivery_requests, projects, quotation_products};

/// Error types for delivery lookups.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DeliveryError> for AppError {
    fn from(value: DeliveryError) -> Self {
        match value {
            DeliveryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A delivery scheduled for tomorrow, with its notification context.
#[derive(Debug, Clone)]
pub struct DeliveryNotice {
    /// The delivery request.
    pub request_id: Uuid,
    /// Project folio for the subject line.
    pub project_folio: String,
    /// Email of the customer on the project, when known.
    pub customer_email: Option<String>,
    /// When the delivery happens.
    pub delivery_day: NaiveDate,
    /// Product lines being delivered.
    pub product_descriptions: Vec<String>,
}

/// Delivery repository.
#[derive(Debug, Clone)]
pub struct DeliveryRepository {
    db: DatabaseConnection,
}

impl DeliveryRepository {
    /// Creates a new delivery repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Delivery requests due tomorrow, with project and product context for
    /// the notification payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the queries fail.
    pub async fn due_tomorrow(&self, today: NaiveDate) -> Result<Vec<DeliveryNotice>, DeliveryError> {
        let tomorrow = today + Days::new(1);
        let requests = delivery_requests::Entity::find()
            .filter(delivery_requests::Column::DeliveryDay.eq(tomorrow))
            .all(&self.db)
            .await?;

        let mut notices = Vec::with_capacity(requests.len());
        for request in requests {
            let Some(project) = projects::Entity::find_by_id(request.project_id)
                .one(&self.db)
                .await?
            else {
                continue;
            };

            let product_descriptions = match request.purchase_order_id {
                Some(order_id) => quotation_products::Entity::find()
                    .filter(quotation_products::Column::PurchaseOrderId.eq(order_id))
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(|p| p.description)
                    .collect(),
                None => Vec::new(),
            };

            let customer_email = match project.customer_id {
                Some(customer_id) => customers::Entity::find_by_id(customer_id)
                    .one(&self.db)
                    .await?
                    .and_then(|customer| customer.email),
                None => None,
            };

            notices.push(DeliveryNotice {
                request_id: request.id,
                project_folio: project.folio,
                customer_email,
                delivery_day: request.delivery_day,
                product_descriptions,
            });
        }
        Ok(notices)
    }
}
