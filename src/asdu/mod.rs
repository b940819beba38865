//! Application Service Data Units (IEC 60870-5-101 application layer).
//!
//! This module carries the data unit identifier codec, the ASDU container
//! with its append/decode cursors, and the typed message builders and
//! parsers for every supported type identification:
//!
//! - [`monitor`] - process information in the monitoring direction (M_*)
//! - [`control`] - process information in the control direction (C_SC..C_BO)
//! - [`system`] - system information in both directions (C_IC..C_TS_TA, M_EI)
//! - [`parameter`] - parameter loading in the control direction (P_*)

mod cot;
mod info;
mod type_id;

pub mod control;
pub mod monitor;
pub mod parameter;
pub mod system;
pub mod time;

pub use cot::{Cause, CauseOfTransmission, OriginAddr};
pub use info::*;
pub use type_id::TypeId;

pub(crate) use cot::{
    AdmittedCauses, BITSTRING_CAUSES, CONTROL_CAUSES, INTEGRATED_CAUSES, MEASURED_CAUSES,
    MEASURED_TIME_CAUSES, PARAMETER_ACT_CAUSES, PARAMETER_CAUSES, PROTECTION_CAUSES,
    STATUS_CAUSES, STATUS_TIME_CAUSES,
};

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::error::{Error, Result};

/// Maximum serialized ASDU size; fits a 255-octet APDU after the 6-octet APCI.
pub const ASDU_SIZE_MAX: usize = 249;

/// Information object address.
///
/// The wire width is controlled by `Params::info_obj_addr_size`:
/// width 1 `<1..255>`, width 2 `<1..65535>`, width 3 `<1..16777215>`.
/// Zero means the address is irrelevant.
pub type InfoObjAddr = u32;

/// Zero information object address: irrelevant.
pub const INFO_OBJ_ADDR_IRRELEVANT: InfoObjAddr = 0;

/// Common (station) address. The wire width is controlled by
/// `Params::common_addr_size`. Zero is unused.
pub type CommonAddr = u16;

/// The invalid common address.
pub const INVALID_COMMON_ADDR: CommonAddr = 0;

/// The broadcast common address. Use is restricted to interrogation,
/// counter interrogation, clock synchronization and reset process commands.
/// In 8-bit mode, 255 is mapped to this value on the fly.
pub const GLOBAL_COMMON_ADDR: CommonAddr = 65535;

/// Transport-level sizing parameters governing the ASDU codec.
///
/// All widths must be valid before any ASDU is encoded or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Cause of transmission width: 1, or 2 to include the originator address
    pub cause_size: u8,
    /// Common address width: 1 or 2
    pub common_addr_size: u8,
    /// Information object address width: 1, 2 or 3
    pub info_obj_addr_size: u8,
    /// Session time zone for CP24/CP56 time tags
    pub time_zone: FixedOffset,
}

impl Params {
    /// The fixed CS-104 sizing: 16-bit cause, 16-bit common address,
    /// 24-bit information object address, UTC time tags.
    pub fn wide() -> Self {
        Self {
            cause_size: 2,
            common_addr_size: 2,
            info_obj_addr_size: 3,
            time_zone: Utc.fix(),
        }
    }

    /// Minimal sizing: one octet for each field.
    pub fn narrow() -> Self {
        Self {
            cause_size: 1,
            common_addr_size: 1,
            info_obj_addr_size: 1,
            time_zone: Utc.fix(),
        }
    }

    /// Validate the configured widths.
    pub fn valid(&self) -> Result<()> {
        if matches!(self.cause_size, 1 | 2)
            && matches!(self.common_addr_size, 1 | 2)
            && matches!(self.info_obj_addr_size, 1..=3)
        {
            Ok(())
        } else {
            Err(Error::Param)
        }
    }

    /// Octets of the data unit identifier: type id, VSQ, cause, common address.
    #[inline]
    pub fn identifier_size(&self) -> usize {
        2 + usize::from(self.cause_size) + usize::from(self.common_addr_size)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::wide()
    }
}

/// Variable structure qualifier: object count in bits 0..6, the sequence
/// flag in bit 7. See companion standard 101, subclass 7.2.2.
///
/// With the sequence flag set, the payload carries one address followed by
/// `number` elements at consecutive addresses; without it, each element
/// carries its own address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariableStruct {
    /// Number of information objects, `<0..127>`
    pub number: u8,
    /// Single-address sequence layout
    pub is_sequence: bool,
}

impl VariableStruct {
    #[inline]
    pub const fn from_u8(b: u8) -> Self {
        Self {
            number: b & 0x7F,
            is_sequence: (b & 0x80) != 0,
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        if self.is_sequence {
            self.number | 0x80
        } else {
            self.number & 0x7F
        }
    }
}

impl std::fmt::Display for VariableStruct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_sequence {
            write!(f, "VSQ<sq,{}>", self.number)
        } else {
            write!(f, "VSQ<{}>", self.number)
        }
    }
}

/// Data unit identifier: the fixed leading part of every ASDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier {
    pub type_id: TypeId,
    pub variable: VariableStruct,
    pub cot: CauseOfTransmission,
    /// Originator address; only on the wire when the cause width is 2
    pub orig_addr: OriginAddr,
    pub common_addr: CommonAddr,
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} OA<{}> CA<{}>",
            self.type_id, self.variable, self.cot, self.orig_addr, self.common_addr
        )
    }
}

/// An application service data unit: identifier plus information object
/// payload.
///
/// Builders drive the append cursor; a decoded ASDU exposes a read cursor
/// that each `decode_*` advances by the size its format dictates. Cursor
/// overruns are malformed-ASDU errors, never panics.
#[derive(Debug, Clone)]
pub struct Asdu {
    pub params: Params,
    pub identifier: Identifier,
    info_obj: Vec<u8>,
    pos: usize,
}

impl Asdu {
    /// Create an empty ASDU for building.
    pub fn new(params: Params, identifier: Identifier) -> Self {
        Self {
            params,
            identifier,
            info_obj: Vec::new(),
            pos: 0,
        }
    }

    /// The information object payload.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.info_obj
    }

    /// Set the object count in the variable structure qualifier.
    ///
    /// Rejects counts above 127 and identifier-plus-payload sizes beyond
    /// [`ASDU_SIZE_MAX`].
    pub fn set_variable_number(&mut self, n: usize) -> Result<()> {
        if n > 127 || self.params.identifier_size() + self.info_obj.len() > ASDU_SIZE_MAX {
            return Err(Error::LengthOutOfRange);
        }
        self.identifier.variable.number = n as u8;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Append cursor
    // ------------------------------------------------------------------

    /// Append raw octets.
    pub fn append_bytes(&mut self, b: &[u8]) -> &mut Self {
        self.info_obj.extend_from_slice(b);
        self
    }

    /// Append an information object address in the configured width.
    pub fn append_info_obj_addr(&mut self, addr: InfoObjAddr) -> Result<&mut Self> {
        match self.params.info_obj_addr_size {
            1 => {
                if addr > 255 {
                    return Err(Error::InfoObjAddrFit);
                }
                self.info_obj.push(addr as u8);
            }
            2 => {
                if addr > 65535 {
                    return Err(Error::InfoObjAddrFit);
                }
                self.info_obj.extend_from_slice(&[addr as u8, (addr >> 8) as u8]);
            }
            3 => {
                if addr > 16_777_215 {
                    return Err(Error::InfoObjAddrFit);
                }
                self.info_obj
                    .extend_from_slice(&[addr as u8, (addr >> 8) as u8, (addr >> 16) as u8]);
            }
            _ => return Err(Error::Param),
        }
        Ok(self)
    }

    /// Append a little-endian u16.
    pub fn append_uint16(&mut self, v: u16) -> &mut Self {
        self.append_bytes(&v.to_le_bytes())
    }

    /// Append a normalized value.
    pub fn append_normalize(&mut self, n: Normalize) -> &mut Self {
        self.append_bytes(&n.0.to_le_bytes())
    }

    /// Append a scaled value.
    pub fn append_scaled(&mut self, v: i16) -> &mut Self {
        self.append_bytes(&v.to_le_bytes())
    }

    /// Append an IEEE 754 short float.
    pub fn append_float32(&mut self, v: f32) -> &mut Self {
        self.append_bytes(&v.to_le_bytes())
    }

    /// Append a 32-bit bit string.
    pub fn append_bits_string32(&mut self, v: u32) -> &mut Self {
        self.append_bytes(&v.to_le_bytes())
    }

    /// Append a step position value.
    pub fn append_step_position(&mut self, sp: StepPosition) -> &mut Self {
        self.append_bytes(&[sp.as_u8()])
    }

    /// Append a binary counter reading (5 octets).
    pub fn append_binary_counter_reading(&mut self, v: BinaryCounterReading) -> &mut Self {
        let mut seq = v.seq_number & 0x1F;
        if v.has_carry {
            seq |= 0x20;
        }
        if v.is_adjusted {
            seq |= 0x40;
        }
        if v.is_invalid {
            seq |= 0x80;
        }
        self.append_bytes(&v.counter_reading.to_le_bytes());
        self.append_bytes(&[seq])
    }

    /// Append status and status change detection (4 octets).
    pub fn append_status_and_scd(&mut self, v: StatusAndScd) -> &mut Self {
        self.append_bytes(&v.0.to_le_bytes())
    }

    /// Append a CP16Time2a time tag.
    pub fn append_cp16time2a(&mut self, msec: u16) -> &mut Self {
        self.append_bytes(&time::cp16time2a(msec))
    }

    /// Append a CP24Time2a time tag in the session zone.
    pub fn append_cp24time2a(&mut self, t: DateTime<Utc>) -> &mut Self {
        let zone = self.params.time_zone;
        self.append_bytes(&time::cp24time2a(t, zone))
    }

    /// Append a CP56Time2a time tag in the session zone.
    pub fn append_cp56time2a(&mut self, t: DateTime<Utc>) -> &mut Self {
        let zone = self.params.time_zone;
        self.append_bytes(&time::cp56time2a(t, zone))
    }

    // ------------------------------------------------------------------
    // Decode cursor
    // ------------------------------------------------------------------

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::asdu_static("cursor overflow"))?;
        if end > self.info_obj.len() {
            return Err(Error::asdu_static("information object too short"));
        }
        let s = &self.info_obj[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    /// Decode one octet.
    pub fn decode_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Decode a little-endian u16.
    pub fn decode_uint16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Decode an information object address in the configured width.
    pub fn decode_info_obj_addr(&mut self) -> Result<InfoObjAddr> {
        match self.params.info_obj_addr_size {
            1 => Ok(InfoObjAddr::from(self.take(1)?[0])),
            2 => {
                let b = self.take(2)?;
                Ok(InfoObjAddr::from(b[0]) | (InfoObjAddr::from(b[1]) << 8))
            }
            3 => {
                let b = self.take(3)?;
                Ok(InfoObjAddr::from(b[0])
                    | (InfoObjAddr::from(b[1]) << 8)
                    | (InfoObjAddr::from(b[2]) << 16))
            }
            _ => Err(Error::Param),
        }
    }

    /// Decode a normalized value.
    pub fn decode_normalize(&mut self) -> Result<Normalize> {
        let b = self.take(2)?;
        Ok(Normalize(i16::from_le_bytes([b[0], b[1]])))
    }

    /// Decode a scaled value.
    pub fn decode_scaled(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    /// Decode an IEEE 754 short float.
    pub fn decode_float32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Decode a 32-bit bit string.
    pub fn decode_bits_string32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Decode a step position value.
    pub fn decode_step_position(&mut self) -> Result<StepPosition> {
        Ok(StepPosition::from_u8(self.take(1)?[0]))
    }

    /// Decode a binary counter reading.
    pub fn decode_binary_counter_reading(&mut self) -> Result<BinaryCounterReading> {
        let b = self.take(5)?;
        Ok(BinaryCounterReading {
            counter_reading: i32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            seq_number: b[4] & 0x1F,
            has_carry: (b[4] & 0x20) != 0,
            is_adjusted: (b[4] & 0x40) != 0,
            is_invalid: (b[4] & 0x80) != 0,
        })
    }

    /// Decode status and status change detection.
    pub fn decode_status_and_scd(&mut self) -> Result<StatusAndScd> {
        let b = self.take(4)?;
        Ok(StatusAndScd(u32::from_le_bytes([b[0], b[1], b[2], b[3]])))
    }

    /// Decode a CP16Time2a time tag.
    pub fn decode_cp16time2a(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(time::parse_cp16time2a(&[b[0], b[1]]))
    }

    /// Decode a CP24Time2a time tag in the session zone.
    pub fn decode_cp24time2a(&mut self) -> Result<Option<DateTime<FixedOffset>>> {
        let zone = self.params.time_zone;
        let b = self.take(3)?;
        Ok(time::parse_cp24time2a(&[b[0], b[1], b[2]], zone))
    }

    /// Decode a CP56Time2a time tag in the session zone.
    pub fn decode_cp56time2a(&mut self) -> Result<Option<DateTime<FixedOffset>>> {
        let zone = self.params.time_zone;
        let b = self.take(7)?;
        Ok(time::parse_cp56time2a(
            &[b[0], b[1], b[2], b[3], b[4], b[5], b[6]],
            zone,
        ))
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize the identifier and payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.params.valid()?;
        let size = self.params.identifier_size() + self.info_obj.len();
        if size > ASDU_SIZE_MAX {
            return Err(Error::LengthOutOfRange);
        }

        let mut raw = Vec::with_capacity(size);
        raw.push(self.identifier.type_id.as_u8());
        raw.push(self.identifier.variable.as_u8());
        raw.push(self.identifier.cot.as_u8());
        if self.params.cause_size == 2 {
            raw.push(self.identifier.orig_addr);
        }
        match self.params.common_addr_size {
            1 => {
                if self.identifier.common_addr == GLOBAL_COMMON_ADDR {
                    raw.push(255);
                } else if self.identifier.common_addr > 254 {
                    return Err(Error::Param);
                } else {
                    raw.push(self.identifier.common_addr as u8);
                }
            }
            _ => raw.extend_from_slice(&self.identifier.common_addr.to_le_bytes()),
        }
        raw.extend_from_slice(&self.info_obj);
        Ok(raw)
    }

    /// Parse an ASDU from raw octets (everything after the APCI).
    pub fn from_bytes(params: Params, raw: &[u8]) -> Result<Self> {
        params.valid()?;
        if raw.len() < params.identifier_size() {
            return Err(Error::asdu_static("ASDU shorter than its identifier"));
        }

        let type_id = TypeId::from_u8(raw[0])?;
        let variable = VariableStruct::from_u8(raw[1]);
        let cot = CauseOfTransmission::from_u8(raw[2]);
        let mut at = 3;

        let orig_addr = if params.cause_size == 2 {
            at += 1;
            raw[3]
        } else {
            0
        };

        let common_addr = match params.common_addr_size {
            1 => {
                let ca = CommonAddr::from(raw[at]);
                at += 1;
                // 8-bit broadcast maps to the 16-bit global address
                if ca == 255 {
                    GLOBAL_COMMON_ADDR
                } else {
                    ca
                }
            }
            _ => {
                let ca = CommonAddr::from(raw[at]) | (CommonAddr::from(raw[at + 1]) << 8);
                at += 2;
                ca
            }
        };

        Ok(Self {
            params,
            identifier: Identifier {
                type_id,
                variable,
                cot,
                orig_addr,
                common_addr,
            },
            info_obj: raw[at..].to_vec(),
            pos: 0,
        })
    }
}

impl std::fmt::Display for Asdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} len={}", self.identifier, self.info_obj.len())
    }
}

/// A sink the typed builders hand finished ASDUs to: the connection surface
/// exposed by the link layer.
pub trait Connect {
    /// The transport sizing in effect for this connection.
    fn params(&self) -> Params;

    /// Enqueue an ASDU for transmission.
    fn send(&self, asdu: Asdu) -> Result<()>;
}

/// Common admission and size validation shared by the typed builders.
pub(crate) fn check_valid(
    params: Params,
    type_id: TypeId,
    is_sequence: bool,
    infos_len: usize,
) -> Result<()> {
    if infos_len == 0 {
        return Err(Error::NotAnyObjInfo);
    }
    let obj_size = type_id.info_obj_size()?;
    params.valid()?;

    let addr_size = usize::from(params.info_obj_addr_size);
    let asdu_len = if is_sequence {
        params.identifier_size() + infos_len * obj_size + addr_size
    } else {
        params.identifier_size() + infos_len * (obj_size + addr_size)
    };

    if asdu_len > ASDU_SIZE_MAX {
        return Err(Error::LengthOutOfRange);
    }
    Ok(())
}

pub(crate) fn check_cause(coa: CauseOfTransmission, admitted: AdmittedCauses) -> Result<()> {
    if admitted.contains(coa.cause) {
        Ok(())
    } else {
        Err(Error::CmdCause)
    }
}
