//! Service entrypoint: load configuration, initialize logging,
//! provision queues, wire the store + publisher + orchestrator +
//! consumer, and run until SIGINT.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use production_service::config::load_config;
use production_service::events::EventPublisher;
use production_service::logging::init_logging;
use production_service::messaging::PgmqQueueClient;
use production_service::orchestration::{LifecycleOrchestrator, OrderConsumer};
use production_service::store::InMemoryProductionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = load_config().context("failed to load configuration")?;
    info!(
        inbound_queue = %config.queues.inbound_queue,
        outbound_queue = %config.queues.outbound_queue,
        "Starting production service"
    );

    let inbound = PgmqQueueClient::new(&config.queues.database_url, &config.queues.inbound_queue)
        .await
        .context("failed to connect inbound queue")?;
    let outbound = PgmqQueueClient::new(&config.queues.database_url, &config.queues.outbound_queue)
        .await
        .context("failed to connect outbound queue")?;
    inbound
        .create_queue()
        .await
        .context("failed to provision inbound queue")?;
    outbound
        .create_queue()
        .await
        .context("failed to provision outbound queue")?;

    // Reference store; production deployments swap in an adapter over
    // the external document store behind the same trait.
    let store = Arc::new(InMemoryProductionStore::new());
    let publisher = EventPublisher::new(Arc::new(outbound));
    let orchestrator = LifecycleOrchestrator::new(store, publisher);
    let consumer = OrderConsumer::new(Arc::new(inbound), orchestrator, config.consumer.clone());

    let loop_consumer = consumer.clone();
    let handle = tokio::spawn(async move { loop_consumer.run().await });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("SIGINT received, shutting down");

    consumer.shutdown();
    handle.await.context("consumer task panicked")?;

    info!("Production service stopped");
    Ok(())
}
