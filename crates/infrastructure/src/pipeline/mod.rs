//! NATS side of the routing stage.

mod nats;

pub use nats::{
    connect, NatsStagePublisher, RoutingStage, RoutingWorkers, CORRELATION_ID_HEADER,
    HEALTHCHECK_REPLY, HEALTHCHECK_REPLY_SUBJECT, HEALTHCHECK_SUBJECT,
};
