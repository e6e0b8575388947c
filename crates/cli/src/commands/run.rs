// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run command: start the configured jobs and wait them out

use anyhow::Result;
use sb_broker::{LoopbackBroker, TracedConsumerAdapter, TracedProducerAdapter};
use sb_core::Config;
use sb_engine::{ConsumerEngine, ExecutionRegistry, ProducerEngine, Runner};
use sb_workloads::{EntityConsumerPlugin, EntityProducerPlugin};
use std::path::PathBuf;
use std::time::Duration;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to the TOML config file
    #[arg(long)]
    config: PathBuf,

    /// Start only the producer job
    #[arg(long, conflicts_with = "consumer_only")]
    producer_only: bool,

    /// Start only the consumer job
    #[arg(long)]
    consumer_only: bool,
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let broker = LoopbackBroker::new();
    let registry = ExecutionRegistry::new();
    let runner = Runner::new(registry.clone());

    let mut started = 0;

    // The consumer goes first so a zero-delay producer cannot outrun the
    // subscription.
    if !args.producer_only {
        if let Some(job_config) = config.consumer.clone() {
            let broker_config = config.broker.clone().merged(&job_config.broker_overrides);
            let adapter = TracedConsumerAdapter::new(broker.consumer(&broker_config.group));
            let engine = ConsumerEngine::new(
                adapter,
                broker_config,
                EntityConsumerPlugin::new(job_config.clone()),
                job_config.log_batch_size(),
            );
            runner.start(engine).await;
            started += 1;
        }
    }

    if !args.consumer_only {
        if let Some(job_config) = config.producer.clone() {
            let broker_config = config.broker.clone().merged(&job_config.broker_overrides);
            let adapter = TracedProducerAdapter::new(broker.producer(&broker_config.topic));
            let engine = ProducerEngine::new(
                adapter,
                broker_config,
                EntityProducerPlugin::new(job_config.clone()),
                job_config.log_batch_size(),
            );
            runner.start(engine).await;
            started += 1;
        }
    }

    if started == 0 {
        anyhow::bail!("no jobs to start; check the config and the --*-only flags");
    }
    tracing::info!(started, "jobs running");

    tokio::select! {
        _ = drained(&registry) => {
            tracing::info!("all jobs finished");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested, closing jobs");
            for info in registry.snapshot() {
                registry.close(&info.id);
            }
            if tokio::time::timeout(DRAIN_TIMEOUT, drained(&registry))
                .await
                .is_err()
            {
                tracing::warn!("jobs did not wind down in time");
            }
        }
    }

    Ok(())
}

async fn drained(registry: &ExecutionRegistry) {
    while !registry.is_empty() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
