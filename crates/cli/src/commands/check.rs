// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Check command: validate a config file

use anyhow::Result;
use sb_core::Config;
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to the TOML config file
    #[arg(long)]
    config: PathBuf,
}

pub fn handle(args: CheckArgs) -> Result<()> {
    let config = Config::load(&args.config)?;

    let mut errors = Vec::new();

    if config.producer.is_none() && config.consumer.is_none() {
        errors.push("config defines neither a producer nor a consumer job".to_string());
    }

    if let Some(producer) = &config.producer {
        if producer.entity_count == 0 {
            errors.push("producer entity_count must be greater than zero".to_string());
        }
        if producer.attribute_count == 0 {
            errors.push("producer attribute_count must be greater than zero".to_string());
        }
    }

    if let Some(consumer) = &config.consumer {
        // A consumer with no run deadline only stops on ctrl-c.
        if consumer.run_duration.is_zero() {
            println!("warning: consumer job has no run_duration and will run until cancelled");
        }
    }

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("error: {error}");
        }
        anyhow::bail!("config check failed with {} error(s)", errors.len());
    }

    println!("Config OK: {}", args.config.display());
    Ok(())
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
