//! Frame codec: APDUs over a byte stream.
//!
//! Implements the tokio-util `Encoder`/`Decoder` pair used with `Framed`.
//! The decoder is strict: a wrong start byte, a length outside [4, 253] or
//! an unknown U function is a malformed frame, which the link engine
//! treats as fatal. Partial reads leave the buffer untouched until the
//! frame completes.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::asdu::ASDU_SIZE_MAX;
use crate::cs104::apci::{Apci, APCI_FIELD_SIZE, APDU_LENGTH_MAX, APDU_LENGTH_MIN, START_BYTE};
use crate::error::Error;

/// A CS-104 APDU: the control information plus, for I-frames, the raw ASDU
/// octets. The ASDU stays undecoded here; the link engine decodes it with
/// the session [`Params`](crate::asdu::Params).
#[derive(Debug, Clone, PartialEq)]
pub struct Apdu {
    pub apci: Apci,
    /// Raw ASDU octets; only present in I-frames
    pub asdu: Option<Bytes>,
}

impl Apdu {
    /// An I-frame carrying a serialized ASDU.
    pub fn i_frame(send_sn: u16, recv_sn: u16, asdu: Bytes) -> Self {
        Self {
            apci: Apci::I { send_sn, recv_sn },
            asdu: Some(asdu),
        }
    }

    /// A supervisory acknowledge frame.
    pub fn s_frame(recv_sn: u16) -> Self {
        Self {
            apci: Apci::S { recv_sn },
            asdu: None,
        }
    }

    /// An unnumbered control frame.
    pub fn u_frame(function: crate::cs104::apci::UFunction) -> Self {
        Self {
            apci: Apci::U { function },
            asdu: None,
        }
    }
}

impl std::fmt::Display for Apdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.apci)?;
        if let Some(asdu) = &self.asdu {
            write!(f, " asdu={}B", asdu.len())?;
        }
        Ok(())
    }
}

/// CS-104 APDU codec for `tokio_util::codec::Framed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApduCodec;

impl ApduCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for ApduCodec {
    type Item = Apdu;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Apdu>, Error> {
        if src.len() < 2 {
            return Ok(None);
        }

        if src[0] != START_BYTE {
            return Err(Error::frame(format!("bad start byte 0x{:02X}", src[0])));
        }

        let length = usize::from(src[1]);
        if !(APDU_LENGTH_MIN..=APDU_LENGTH_MAX).contains(&length) {
            return Err(Error::frame(format!("APDU length {} out of range", length)));
        }

        let total = 2 + length;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(total);
        frame.advance(2);
        let apci = Apci::parse([frame[0], frame[1], frame[2], frame[3]])?;
        frame.advance(4);

        let asdu = if apci.is_i() {
            Some(frame.freeze())
        } else {
            if !frame.is_empty() {
                return Err(Error::frame_static("S/U frame with trailing octets"));
            }
            None
        };

        Ok(Some(Apdu { apci, asdu }))
    }
}

impl Encoder<Apdu> for ApduCodec {
    type Error = Error;

    fn encode(&mut self, item: Apdu, dst: &mut BytesMut) -> Result<(), Error> {
        let asdu_len = item.asdu.as_ref().map_or(0, |a| a.len());
        if asdu_len > ASDU_SIZE_MAX {
            return Err(Error::LengthOutOfRange);
        }

        dst.reserve(6 + asdu_len);
        dst.put_u8(START_BYTE);
        dst.put_u8((APCI_FIELD_SIZE + asdu_len) as u8);
        dst.put_slice(&item.apci.encode());
        if let Some(asdu) = &item.asdu {
            dst.put_slice(asdu);
        }
        Ok(())
    }
}
