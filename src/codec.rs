//! Whole frame encode and decode.
//!
//! [`encode`] produces a single unfragmented frame, as sent by a server.
//! [`decode`] reads exactly one frame from a transport, accepting only
//! unfragmented `Text` frames; a `Close` frame shuts the transport down.

use std::io::ErrorKind;

use crate::config::Config;
use crate::error::{Error, FrameError, ClosedBy};
use crate::frame::{FrameHead, Fin, OpCode, Mask, PayloadLen, MAX_FRAME_HEAD_LEN};
use crate::frame::mask::apply_mask4;
use crate::transport::Transport;

/// A received frame, payload is already unmasked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub head: FrameHead,
    pub payload: Vec<u8>,
}

/// Encode a single server frame, the payload is not masked.
pub fn encode(opcode: OpCode, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MAX_FRAME_HEAD_LEN + payload.len());
    encode_to(&mut buf, opcode, Mask::None, payload);
    buf
}

/// Append a single frame to the buffer.
///
/// With [`Mask::Key`], the payload copy is masked as a client would do.
pub fn encode_to(buf: &mut Vec<u8>, opcode: OpCode, mask: Mask, payload: &[u8]) {
    let head = FrameHead::new(
        Fin::Y,
        opcode,
        mask,
        PayloadLen::from_num(payload.len() as u64),
    );

    let mut tmp = [0u8; MAX_FRAME_HEAD_LEN];
    // 14 bytes accommodate any kind of frame head
    let head_n = match head.encode(&mut tmp) {
        Ok(n) => n,
        Err(_) => unreachable!(),
    };

    buf.reserve(head_n + payload.len());
    buf.extend_from_slice(&tmp[..head_n]);

    let beg = buf.len();
    buf.extend_from_slice(payload);

    if let Mask::Key(key) = mask {
        apply_mask4(key, &mut buf[beg..]);
    }
}

/// Read exactly one frame.
///
/// Blocks until the whole frame is received, or an error occurs.
/// See [`Config`] for the payload ceiling and reserved bits policy.
pub fn decode<IO: Transport>(io: &mut IO, config: &Config) -> Result<Frame, Error> {
    let mut head_buf = [0u8; MAX_FRAME_HEAD_LEN];

    // EOF between two frames is an orderly end
    match io.read_exact(&mut head_buf[..2]) {
        Ok(()) => {}
        Err(ref e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(Error::Closed(ClosedBy::Eof))
        }
        Err(e) => return Err(e.into()),
    }

    let (b1, b2) = (head_buf[0], head_buf[1]);

    if Fin::from_flag(b1) == Fin::N {
        return Err(FrameError::Fragmented.into());
    }

    match OpCode::from_flag(b1) {
        Ok(OpCode::Text) => {}
        Ok(OpCode::Close) => {
            io.close()?;
            return Err(Error::Closed(ClosedBy::Peer));
        }
        Ok(opcode) => return Err(FrameError::UnsupportedOpcode(opcode as u8).into()),
        Err(_) => return Err(FrameError::UnsupportedOpcode(b1 & 0x0f).into()),
    }

    let rsv = (b1 >> 4) & 0x07;
    if rsv != 0 && config.get_reject_reserved_bits() {
        return Err(FrameError::ReservedBits(rsv).into());
    }

    // extended length, mask key
    let head_n = FrameHead::head_len(b2);
    io.read_exact(&mut head_buf[2..head_n])?;

    let (head, _) = FrameHead::decode(&head_buf[..head_n])?;

    let len = head.length.to_num();
    if let Some(max) = config.get_max_payload_len() {
        if len > max {
            return Err(FrameError::PayloadTooLarge { len, max }.into());
        }
    }
    let len = match usize::try_from(len) {
        Ok(n) => n,
        Err(_) => {
            return Err(FrameError::PayloadTooLarge {
                len,
                max: usize::MAX as u64,
            }
            .into())
        }
    };

    let mut payload = vec![0u8; len];
    io.read_exact(&mut payload)?;

    // unmask if server receives data from client
    // this operation can be skipped if mask key is 0
    if let Mask::Key(key) = head.mask {
        apply_mask4(key, &mut payload);
    }

    Ok(Frame { head, payload })
}
