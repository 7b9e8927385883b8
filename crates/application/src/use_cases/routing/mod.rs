mod process_routing_message;
mod route_invoice;

pub use process_routing_message::{InboundMessage, ProcessRoutingMessageUseCase};
pub use route_invoice::RouteInvoiceUseCase;
