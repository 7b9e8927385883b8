mod record_type;

pub use record_type::{RecordClass, RecordType};
