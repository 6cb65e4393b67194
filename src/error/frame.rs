use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    // protocol
    Fragmented,

    IllegalOpCode(u8),

    UnsupportedOpcode(u8),

    ReservedBits(u8),

    PayloadTooLarge { len: u64, max: u64 },

    // buffer
    NotEnoughData,

    NotEnoughCapacity,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            Fragmented => write!(f, "Fragmented message is not supported"),
            IllegalOpCode(op) => write!(f, "Illegal opcode value: {:#x}", op),
            UnsupportedOpcode(op) => write!(f, "Unsupported opcode: {:#x}", op),
            ReservedBits(bits) => write!(f, "Reserved bits set: {:#05b}", bits),
            PayloadTooLarge { len, max } => {
                write!(f, "Payload length {} exceeds limit {}", len, max)
            }
            NotEnoughData => write!(f, "Not enough data to parse"),
            NotEnoughCapacity => write!(f, "Not enough space to write to"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
