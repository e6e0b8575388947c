// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record and delivery-report types crossing the adapter boundary

use crate::error::BrokerError;

/// One record read from or written to a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Vec<u8>,
    pub payload: Vec<u8>,
}

impl Record {
    /// Lossy key rendering for log fields
    pub fn key_display(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }
}

/// Outcome of one asynchronous produce, emitted on the delivery channel
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Vec<u8>,
    /// `None` means the record was delivered
    pub error: Option<BrokerError>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// Broker-level event on the generic fallback channel
#[derive(Debug, Clone)]
pub enum BrokerEvent {
    Delivery(DeliveryReport),
    Error(BrokerError),
}

/// Minimal topic metadata for operational visibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMetadata {
    pub topic: String,
    pub partitions: i32,
}
