use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Packet too short: {0} bytes, header needs 12")]
    TooShort(usize),

    #[error("Unexpected end of packet while reading {0}")]
    Truncated(&'static str),

    #[error("Compression pointer at offset {at} does not point backwards (target {target})")]
    ForwardPointer { at: usize, target: usize },

    #[error("More than {0} compression pointers in one name")]
    TooManyPointers(usize),

    #[error("Unsupported label type 0x{0:02x}")]
    UnsupportedLabel(u8),

    #[error("Label of {0} bytes exceeds 63")]
    LabelTooLong(usize),

    #[error("Character string of {0} bytes exceeds 255")]
    StringTooLong(usize),

    #[error("Section holds more than 65535 entries")]
    TooManyRecords,

    #[error("Invalid {rtype} rdata: {reason}")]
    InvalidRdata { rtype: &'static str, reason: String },
}
