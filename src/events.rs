use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{ArrangementId, OperationId, OperationType};

/// all events that can be emitted by the ledger service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // arrangement events
    ArrangementCreated {
        arrangement_id: ArrangementId,
        name: String,
        base_rate: Rate,
        timestamp: DateTime<Utc>,
    },
    ArrangementUpdated {
        arrangement_id: ArrangementId,
        timestamp: DateTime<Utc>,
    },
    BaseRateChanged {
        arrangement_id: ArrangementId,
        old_rate: Rate,
        new_rate: Rate,
        timestamp: DateTime<Utc>,
    },
    ArrangementDeleted {
        arrangement_id: ArrangementId,
        operations_removed: usize,
        timestamp: DateTime<Utc>,
    },

    // operation events
    OperationRecorded {
        arrangement_id: ArrangementId,
        operation_id: OperationId,
        kind: OperationType,
        amount: Money,
        date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    OperationUpdated {
        arrangement_id: ArrangementId,
        operation_id: OperationId,
        timestamp: DateTime<Utc>,
    },
    OperationDeleted {
        arrangement_id: ArrangementId,
        operation_id: OperationId,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn arrangement_id(&self) -> &ArrangementId {
        match self {
            Event::ArrangementCreated { arrangement_id, .. }
            | Event::ArrangementUpdated { arrangement_id, .. }
            | Event::BaseRateChanged { arrangement_id, .. }
            | Event::ArrangementDeleted { arrangement_id, .. }
            | Event::OperationRecorded { arrangement_id, .. }
            | Event::OperationUpdated { arrangement_id, .. }
            | Event::OperationDeleted { arrangement_id, .. } => arrangement_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
