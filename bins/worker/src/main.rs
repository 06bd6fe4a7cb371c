//! Mobilia operations daemon.
//!
//! Runs the two daily jobs outside the request path: the delivery-day
//! notifier (requests due tomorrow go to the national logistics crew and
//! the customer) and the production sweep (orders past their production end
//! with a settled payable advance to collection).

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mobilia_db::{connect, DeliveryRepository, PurchaseOrderRepository, UserDirectory};
use mobilia_shared::mail::{MailTemplate, Mailer, Notification, Notifier};
use mobilia_shared::AppConfig;

const TICK_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24);
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mobilia=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create mail channel
    let mailer = Mailer::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Mail channel configured"
    );

    let deliveries = DeliveryRepository::new(db.clone());
    let directory = UserDirectory::new(db.clone());
    let orders = PurchaseOrderRepository::new(db);

    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    loop {
        ticker.tick().await;

        let today = Utc::now().date_naive();

        let pass = with_retries(RETRY_ATTEMPTS, || {
            notify_deliveries(&deliveries, &directory, &mailer, today)
        })
        .await;
        if let Err(err) = pass {
            error!(%err, "delivery-day notification pass failed");
        }

        match with_retries(RETRY_ATTEMPTS, || orders.production_sweep(today)).await {
            Ok(moved) => info!(moved, "production sweep finished"),
            Err(err) => error!(%err, "production sweep failed"),
        }
    }
}

/// Notifies the national logistics crew about every delivery scheduled for
/// tomorrow. Send failures are logged per notice, never escalated.
async fn notify_deliveries(
    deliveries: &DeliveryRepository,
    directory: &UserDirectory,
    mailer: &Mailer,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let notices = deliveries.due_tomorrow(today).await?;
    if notices.is_empty() {
        return Ok(());
    }

    let crew = directory.national_logistics_emails().await?;
    info!(notices = notices.len(), recipients = crew.len(), "sending delivery notices");

    for notice in notices {
        let data = json!({
            "projectFolio": notice.project_folio,
            "deliveryDay": notice.delivery_day.to_string(),
            "products": notice.product_descriptions,
        });

        if !crew.is_empty() {
            mailer
                .send_best_effort(Notification {
                    to: crew.clone(),
                    template: MailTemplate::DeliveryDayLogistics,
                    data: data.clone(),
                })
                .await;
        }

        // Customer copy, when the project has an email on file.
        if let Some(customer_email) = notice.customer_email {
            mailer
                .send_best_effort(Notification {
                    to: vec![customer_email],
                    template: MailTemplate::DeliveryDayCustomer,
                    data,
                })
                .await;
        }
    }
    Ok(())
}

/// Bounded retry around a datastore pass. Transient failures back off and
/// try again; the last error is returned once the attempts run out.
async fn with_retries<T, E, F, Fut>(attempts: u32, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                warn!(attempt, %err, "pass failed; retrying");
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
            Err(err) => return Err(err),
        }
    }
}
