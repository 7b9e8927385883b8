pub mod routing;

pub use routing::{InboundMessage, ProcessRoutingMessageUseCase, RouteInvoiceUseCase};
