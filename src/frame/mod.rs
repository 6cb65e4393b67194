//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
//! |                     Payload Data continued ...                |
//! +---------------------------------------------------------------+
//! ```
//!

pub mod flag;
pub mod length;
pub mod mask;

pub use flag::{Fin, OpCode};
pub use length::PayloadLen;
pub use mask::Mask;

use crate::bleed::Writer;
use crate::error::FrameError;

/// Longest possible frame head: 2 + 8 + 4.
pub const MAX_FRAME_HEAD_LEN: usize = 14;

/// Websocket frame head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: Fin,
    /// rsv1, rsv2, rsv3, in the low 3 bits
    pub rsv: u8,
    pub opcode: OpCode,
    pub mask: Mask,
    pub length: PayloadLen,
}

impl FrameHead {
    /// Constructor, reserved bits are left empty.
    #[inline]
    pub const fn new(fin: Fin, opcode: OpCode, mask: Mask, length: PayloadLen) -> Self {
        Self {
            fin,
            rsv: 0,
            opcode,
            mask,
            length,
        }
    }

    /// Total length of a frame head, derived from its second byte.
    #[inline]
    pub const fn head_len(b2: u8) -> usize {
        let mask_len = match Mask::from_flag(b2) {
            Mask::None => 0,
            _ => 4,
        };
        2 + PayloadLen::from_flag(b2).extended_len() + mask_len
    }

    /// Encode to provided buffer, returns the count of written bytes.
    /// The caller should ensure the buffer is large enough,
    /// otherwise a [`FrameError::NotEnoughCapacity`] error will be returned.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let mut writer = Writer::new(buf);

        macro_rules! writex {
            ($dst: expr) => {
                writer.write_or_err($dst, || FrameError::NotEnoughCapacity)?
            };
        }

        // fin, rsv, opcode
        let b1 = self.fin as u8 | (self.rsv & 0x07) << 4 | self.opcode as u8;

        // mask, payload length
        let b2 = self.mask.to_flag() | self.length.to_flag();

        writex!(&[b1, b2]);

        // extended payload length
        match &self.length {
            PayloadLen::Standard(_) => 0,
            PayloadLen::Extended1(v) => writex!(&v.to_be_bytes()),
            PayloadLen::Extended2(v) => writex!(&v.to_be_bytes()),
        };

        // mask key
        match &self.mask {
            Mask::Key(k) => writex!(k),
            Mask::Skip => writex!(&[0u8; 4]),
            Mask::None => 0,
        };

        Ok(writer.pos())
    }

    /// Parse from provided buffer, returns [`FrameHead`] and the count of read bytes
    /// if the parse succeeds.
    /// If there is not enough data to parse, a [`FrameError::NotEnoughData`] error
    /// will be returned.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), FrameError> {
        if buf.len() < 2 {
            return Err(FrameError::NotEnoughData);
        }

        // fin, rsv, opcode
        let b1 = buf[0];

        // mask, payload length
        let b2 = buf[1];

        let n = Self::head_len(b2);
        if buf.len() < n {
            return Err(FrameError::NotEnoughData);
        }

        let fin = Fin::from_flag(b1);
        let rsv = (b1 >> 4) & 0x07;
        let opcode = OpCode::from_flag(b1)?;

        let mut offset = 2;

        let length = match PayloadLen::from_flag(b2) {
            PayloadLen::Extended1(_) => {
                offset += 2;
                PayloadLen::from_byte2([buf[2], buf[3]])
            }
            PayloadLen::Extended2(_) => {
                let mut b8 = [0u8; 8];
                b8.copy_from_slice(&buf[2..10]);
                offset += 8;
                PayloadLen::from_byte8(b8)
            }
            standard => standard,
        };

        let mask = match Mask::from_flag(b2) {
            Mask::None => Mask::None,
            _ => {
                let mut key = [0u8; 4];
                key.copy_from_slice(&buf[offset..offset + 4]);
                Mask::from_key(key)
            }
        };

        Ok((
            FrameHead {
                fin,
                rsv,
                opcode,
                mask,
                length,
            },
            n,
        ))
    }
}
