//! Process information in the monitoring direction.
//!
//! Builders validate the cause of transmission against the per-type
//! admission tables, drive the append cursor and hand the finished ASDU to
//! [`Connect::send`]. The matching `get_*` parsers on [`Asdu`] walk the
//! decode cursor; in sequence layout (SQ = 1) the first address is read
//! once and subsequent objects take consecutive addresses.

use chrono::{DateTime, Utc};

use crate::asdu::time::{CP24TIME2A_INVALID, CP56TIME2A_INVALID};
use crate::asdu::{
    check_cause, check_valid, Asdu, BinaryCounterReading, CauseOfTransmission, CommonAddr, Connect,
    DoublePoint, Identifier, InfoObjAddr, Normalize, OutputCircuitInfo, QualityDescriptor,
    QualityDescriptorProtection, SingleEvent, StartEvent, StatusAndScd, StepPosition, TypeId,
    VariableStruct, BITSTRING_CAUSES, INTEGRATED_CAUSES, MEASURED_CAUSES, MEASURED_TIME_CAUSES,
    PROTECTION_CAUSES, STATUS_CAUSES, STATUS_TIME_CAUSES,
};
use crate::error::{Error, Result};

/// Single-point information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePointInfo {
    pub ioa: InfoObjAddr,
    pub value: bool,
    /// Quality descriptor; `QualityDescriptor::GOOD` means no remarks
    pub qds: QualityDescriptor,
    /// Ignored by types without a time tag
    pub time: Option<DateTime<Utc>>,
}

/// Double-point information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoublePointInfo {
    pub ioa: InfoObjAddr,
    pub value: DoublePoint,
    pub qds: QualityDescriptor,
    pub time: Option<DateTime<Utc>>,
}

/// Step position information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPositionInfo {
    pub ioa: InfoObjAddr,
    pub value: StepPosition,
    pub qds: QualityDescriptor,
    pub time: Option<DateTime<Utc>>,
}

/// 32-bit bit string information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitString32Info {
    pub ioa: InfoObjAddr,
    pub value: u32,
    pub qds: QualityDescriptor,
    pub time: Option<DateTime<Utc>>,
}

/// Normalized measured value information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredValueNormalInfo {
    pub ioa: InfoObjAddr,
    pub value: Normalize,
    pub qds: QualityDescriptor,
    pub time: Option<DateTime<Utc>>,
}

/// Scaled measured value information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredValueScaledInfo {
    pub ioa: InfoObjAddr,
    pub value: i16,
    pub qds: QualityDescriptor,
    pub time: Option<DateTime<Utc>>,
}

/// Short floating point measured value information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredValueFloatInfo {
    pub ioa: InfoObjAddr,
    pub value: f32,
    pub qds: QualityDescriptor,
    pub time: Option<DateTime<Utc>>,
}

/// Integrated totals information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryCounterReadingInfo {
    pub ioa: InfoObjAddr,
    pub value: BinaryCounterReading,
    pub time: Option<DateTime<Utc>>,
}

/// Protection equipment event information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventOfProtectionEquipmentInfo {
    pub ioa: InfoObjAddr,
    pub event: SingleEvent,
    pub qdp: QualityDescriptorProtection,
    /// Elapsed time in milliseconds (CP16Time2a)
    pub msec: u16,
    pub time: Option<DateTime<Utc>>,
}

/// Packed start events of protection equipment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedStartEventsOfProtectionEquipmentInfo {
    pub ioa: InfoObjAddr,
    pub event: StartEvent,
    pub qdp: QualityDescriptorProtection,
    /// Relay duration time in milliseconds (CP16Time2a)
    pub msec: u16,
    pub time: Option<DateTime<Utc>>,
}

/// Packed output circuit information of protection equipment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedOutputCircuitInfo {
    pub ioa: InfoObjAddr,
    pub oci: OutputCircuitInfo,
    pub qdp: QualityDescriptorProtection,
    /// Relay operating time in milliseconds (CP16Time2a)
    pub msec: u16,
    pub time: Option<DateTime<Utc>>,
}

/// Packed single point information with status change detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedSinglePointWithScdInfo {
    pub ioa: InfoObjAddr,
    pub scd: StatusAndScd,
    pub qds: QualityDescriptor,
}

fn new_monitor_asdu(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    number: usize,
) -> Result<Asdu> {
    check_valid(c.params(), type_id, is_sequence, number)?;
    let mut asdu = Asdu::new(
        c.params(),
        Identifier {
            type_id,
            variable: VariableStruct {
                number: 0,
                is_sequence,
            },
            cot: coa,
            orig_addr: 0,
            common_addr: ca,
        },
    );
    asdu.set_variable_number(number)?;
    Ok(asdu)
}

fn append_cp24_opt(asdu: &mut Asdu, t: Option<DateTime<Utc>>) {
    match t {
        Some(t) => {
            asdu.append_cp24time2a(t);
        }
        None => {
            asdu.append_bytes(&CP24TIME2A_INVALID);
        }
    }
}

fn append_cp56_opt(asdu: &mut Asdu, t: Option<DateTime<Utc>>) {
    match t {
        Some(t) => {
            asdu.append_cp56time2a(t);
        }
        None => {
            asdu.append_bytes(&CP56TIME2A_INVALID);
        }
    }
}

fn build_single(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[SinglePointInfo],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_bytes(&[u8::from(v.value) | v.qds.siq_bits()]);
        match type_id {
            TypeId::SinglePoint => {}
            TypeId::SinglePointTime24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::SinglePointTime56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send single-point information, type identification M_SP_NA_1.
///
/// Admitted causes: background scan, spontaneous, request, return
/// information remote/local, and the interrogation group range.
pub fn single(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[SinglePointInfo],
) -> Result<()> {
    check_cause(coa, STATUS_CAUSES)?;
    build_single(c, TypeId::SinglePoint, is_sequence, coa, ca, infos)
}

/// Send single-point information with CP24Time2a, type M_SP_TA_1 (SQ = 0 only).
pub fn single_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[SinglePointInfo],
) -> Result<()> {
    check_cause(coa, STATUS_TIME_CAUSES)?;
    build_single(c, TypeId::SinglePointTime24, false, coa, ca, infos)
}

/// Send single-point information with CP56Time2a, type M_SP_TB_1 (SQ = 0 only).
pub fn single_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[SinglePointInfo],
) -> Result<()> {
    check_cause(coa, STATUS_TIME_CAUSES)?;
    build_single(c, TypeId::SinglePointTime56, false, coa, ca, infos)
}

fn build_double(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[DoublePointInfo],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_bytes(&[v.value.as_u8() | v.qds.siq_bits()]);
        match type_id {
            TypeId::DoublePoint => {}
            TypeId::DoublePointTime24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::DoublePointTime56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send double-point information, type identification M_DP_NA_1.
pub fn double(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[DoublePointInfo],
) -> Result<()> {
    check_cause(coa, STATUS_CAUSES)?;
    build_double(c, TypeId::DoublePoint, is_sequence, coa, ca, infos)
}

/// Send double-point information with CP24Time2a, type M_DP_TA_1 (SQ = 0 only).
pub fn double_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[DoublePointInfo],
) -> Result<()> {
    check_cause(coa, STATUS_TIME_CAUSES)?;
    build_double(c, TypeId::DoublePointTime24, false, coa, ca, infos)
}

/// Send double-point information with CP56Time2a, type M_DP_TB_1 (SQ = 0 only).
pub fn double_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[DoublePointInfo],
) -> Result<()> {
    check_cause(coa, STATUS_TIME_CAUSES)?;
    build_double(c, TypeId::DoublePointTime56, false, coa, ca, infos)
}

fn build_step(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[StepPositionInfo],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_step_position(v.value)
            .append_bytes(&[v.qds.as_u8()]);
        match type_id {
            TypeId::StepPosition => {}
            TypeId::StepPositionTime24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::StepPositionTime56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send step position information, type identification M_ST_NA_1.
pub fn step(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[StepPositionInfo],
) -> Result<()> {
    check_cause(coa, STATUS_CAUSES)?;
    build_step(c, TypeId::StepPosition, is_sequence, coa, ca, infos)
}

/// Send step position information with CP24Time2a, type M_ST_TA_1 (SQ = 0 only).
pub fn step_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[StepPositionInfo],
) -> Result<()> {
    check_cause(coa, STATUS_TIME_CAUSES)?;
    build_step(c, TypeId::StepPositionTime24, false, coa, ca, infos)
}

/// Send step position information with CP56Time2a, type M_ST_TB_1 (SQ = 0 only).
pub fn step_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[StepPositionInfo],
) -> Result<()> {
    check_cause(coa, STATUS_TIME_CAUSES)?;
    build_step(c, TypeId::StepPositionTime56, false, coa, ca, infos)
}

fn build_bit_string32(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BitString32Info],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_bits_string32(v.value)
            .append_bytes(&[v.qds.as_u8()]);
        match type_id {
            TypeId::Bitstring32 => {}
            TypeId::Bitstring32Time24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::Bitstring32Time56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send a 32-bit bit string, type identification M_BO_NA_1.
///
/// Admitted causes: background scan, spontaneous, request, and the
/// interrogation group range.
pub fn bit_string32(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BitString32Info],
) -> Result<()> {
    check_cause(coa, BITSTRING_CAUSES)?;
    build_bit_string32(c, TypeId::Bitstring32, is_sequence, coa, ca, infos)
}

/// Send a 32-bit bit string with CP24Time2a, type M_BO_TA_1 (SQ = 0 only).
pub fn bit_string32_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BitString32Info],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_bit_string32(c, TypeId::Bitstring32Time24, false, coa, ca, infos)
}

/// Send a 32-bit bit string with CP56Time2a, type M_BO_TB_1 (SQ = 0 only).
pub fn bit_string32_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BitString32Info],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_bit_string32(c, TypeId::Bitstring32Time56, false, coa, ca, infos)
}

fn build_measured_normal(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueNormalInfo],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_normalize(v.value);
        match type_id {
            TypeId::MeasuredNormalized => {
                asdu.append_bytes(&[v.qds.as_u8()]);
            }
            TypeId::MeasuredNormalizedTime24 => {
                asdu.append_bytes(&[v.qds.as_u8()]);
                append_cp24_opt(&mut asdu, v.time);
            }
            TypeId::MeasuredNormalizedTime56 => {
                asdu.append_bytes(&[v.qds.as_u8()]);
                append_cp56_opt(&mut asdu, v.time);
            }
            TypeId::MeasuredNormalizedNoQuality => {} // no quality descriptor
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send normalized measured values, type identification M_ME_NA_1.
///
/// Admitted causes: periodic, background scan, spontaneous, request, and
/// the interrogation group range.
pub fn measured_value_normal(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueNormalInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_CAUSES)?;
    build_measured_normal(c, TypeId::MeasuredNormalized, is_sequence, coa, ca, infos)
}

/// Send normalized measured values with CP24Time2a, type M_ME_TA_1 (SQ = 0 only).
pub fn measured_value_normal_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueNormalInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_measured_normal(c, TypeId::MeasuredNormalizedTime24, false, coa, ca, infos)
}

/// Send normalized measured values with CP56Time2a, type M_ME_TD_1 (SQ = 0 only).
pub fn measured_value_normal_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueNormalInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_measured_normal(c, TypeId::MeasuredNormalizedTime56, false, coa, ca, infos)
}

/// Send normalized measured values without quality, type M_ME_ND_1.
pub fn measured_value_normal_no_quality(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueNormalInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_CAUSES)?;
    build_measured_normal(
        c,
        TypeId::MeasuredNormalizedNoQuality,
        is_sequence,
        coa,
        ca,
        infos,
    )
}

fn build_measured_scaled(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueScaledInfo],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_scaled(v.value).append_bytes(&[v.qds.as_u8()]);
        match type_id {
            TypeId::MeasuredScaled => {}
            TypeId::MeasuredScaledTime24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::MeasuredScaledTime56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send scaled measured values, type identification M_ME_NB_1.
pub fn measured_value_scaled(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueScaledInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_CAUSES)?;
    build_measured_scaled(c, TypeId::MeasuredScaled, is_sequence, coa, ca, infos)
}

/// Send scaled measured values with CP24Time2a, type M_ME_TB_1 (SQ = 0 only).
pub fn measured_value_scaled_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueScaledInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_measured_scaled(c, TypeId::MeasuredScaledTime24, false, coa, ca, infos)
}

/// Send scaled measured values with CP56Time2a, type M_ME_TE_1 (SQ = 0 only).
pub fn measured_value_scaled_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueScaledInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_measured_scaled(c, TypeId::MeasuredScaledTime56, false, coa, ca, infos)
}

fn build_measured_float(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueFloatInfo],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_float32(v.value).append_bytes(&[v.qds.as_u8()]);
        match type_id {
            TypeId::MeasuredFloat => {}
            TypeId::MeasuredFloatTime24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::MeasuredFloatTime56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send short floating point measured values, type identification M_ME_NC_1.
pub fn measured_value_float(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueFloatInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_CAUSES)?;
    build_measured_float(c, TypeId::MeasuredFloat, is_sequence, coa, ca, infos)
}

/// Send short floats with CP24Time2a, type M_ME_TC_1 (SQ = 0 only).
pub fn measured_value_float_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueFloatInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_measured_float(c, TypeId::MeasuredFloatTime24, false, coa, ca, infos)
}

/// Send short floats with CP56Time2a, type M_ME_TF_1 (SQ = 0 only).
pub fn measured_value_float_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[MeasuredValueFloatInfo],
) -> Result<()> {
    check_cause(coa, MEASURED_TIME_CAUSES)?;
    build_measured_float(c, TypeId::MeasuredFloatTime56, false, coa, ca, infos)
}

fn build_integrated_totals(
    c: &dyn Connect,
    type_id: TypeId,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BinaryCounterReadingInfo],
) -> Result<()> {
    let mut asdu = new_monitor_asdu(c, type_id, is_sequence, coa, ca, infos.len())?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_binary_counter_reading(v.value);
        match type_id {
            TypeId::IntegratedTotals => {}
            TypeId::IntegratedTotalsTime24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::IntegratedTotalsTime56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send integrated totals, type identification M_IT_NA_1.
///
/// Admitted causes: spontaneous and the counter request range.
pub fn integrated_totals(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BinaryCounterReadingInfo],
) -> Result<()> {
    check_cause(coa, INTEGRATED_CAUSES)?;
    build_integrated_totals(c, TypeId::IntegratedTotals, is_sequence, coa, ca, infos)
}

/// Send integrated totals with CP24Time2a, type M_IT_TA_1 (SQ = 0 only).
pub fn integrated_totals_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BinaryCounterReadingInfo],
) -> Result<()> {
    check_cause(coa, INTEGRATED_CAUSES)?;
    build_integrated_totals(c, TypeId::IntegratedTotalsTime24, false, coa, ca, infos)
}

/// Send integrated totals with CP56Time2a, type M_IT_TB_1 (SQ = 0 only).
pub fn integrated_totals_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[BinaryCounterReadingInfo],
) -> Result<()> {
    check_cause(coa, INTEGRATED_CAUSES)?;
    build_integrated_totals(c, TypeId::IntegratedTotalsTime56, false, coa, ca, infos)
}

fn build_protection_event(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[EventOfProtectionEquipmentInfo],
) -> Result<()> {
    check_cause(coa, PROTECTION_CAUSES)?;
    let mut asdu = new_monitor_asdu(c, type_id, false, coa, ca, infos.len())?;
    for v in infos {
        asdu.append_info_obj_addr(v.ioa)?;
        asdu.append_bytes(&[v.event.as_u8() | v.qdp.as_u8()]);
        asdu.append_cp16time2a(v.msec);
        match type_id {
            TypeId::ProtectionEventTime24 => append_cp24_opt(&mut asdu, v.time),
            TypeId::ProtectionEventTime56 => append_cp56_opt(&mut asdu, v.time),
            _ => return Err(Error::TypeIdNotMatch),
        }
    }
    c.send(asdu)
}

/// Send protection equipment events with CP24Time2a, type M_EP_TA_1.
/// Spontaneous only, SQ = 0 only.
pub fn event_of_protection_equipment_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[EventOfProtectionEquipmentInfo],
) -> Result<()> {
    build_protection_event(c, TypeId::ProtectionEventTime24, coa, ca, infos)
}

/// Send protection equipment events with CP56Time2a, type M_EP_TD_1.
/// Spontaneous only, SQ = 0 only.
pub fn event_of_protection_equipment_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[EventOfProtectionEquipmentInfo],
) -> Result<()> {
    build_protection_event(c, TypeId::ProtectionEventTime56, coa, ca, infos)
}

fn build_packed_start_events(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    info: PackedStartEventsOfProtectionEquipmentInfo,
) -> Result<()> {
    check_cause(coa, PROTECTION_CAUSES)?;
    let mut asdu = new_monitor_asdu(c, type_id, false, coa, ca, 1)?;
    asdu.append_info_obj_addr(info.ioa)?;
    asdu.append_bytes(&[info.event.0, info.qdp.as_u8()]);
    asdu.append_cp16time2a(info.msec);
    match type_id {
        TypeId::ProtectionStartEventsTime24 => append_cp24_opt(&mut asdu, info.time),
        TypeId::ProtectionStartEventsTime56 => append_cp56_opt(&mut asdu, info.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send packed start events of protection equipment with CP24Time2a,
/// type M_EP_TB_1. Spontaneous only, a single object.
pub fn packed_start_events_of_protection_equipment_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    info: PackedStartEventsOfProtectionEquipmentInfo,
) -> Result<()> {
    build_packed_start_events(c, TypeId::ProtectionStartEventsTime24, coa, ca, info)
}

/// Send packed start events of protection equipment with CP56Time2a,
/// type M_EP_TE_1. Spontaneous only, a single object.
pub fn packed_start_events_of_protection_equipment_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    info: PackedStartEventsOfProtectionEquipmentInfo,
) -> Result<()> {
    build_packed_start_events(c, TypeId::ProtectionStartEventsTime56, coa, ca, info)
}

fn build_packed_output_circuit(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    info: PackedOutputCircuitInfo,
) -> Result<()> {
    check_cause(coa, PROTECTION_CAUSES)?;
    let mut asdu = new_monitor_asdu(c, type_id, false, coa, ca, 1)?;
    asdu.append_info_obj_addr(info.ioa)?;
    asdu.append_bytes(&[info.oci.0, info.qdp.as_u8()]);
    asdu.append_cp16time2a(info.msec);
    match type_id {
        TypeId::ProtectionOutputCircuitTime24 => append_cp24_opt(&mut asdu, info.time),
        TypeId::ProtectionOutputCircuitTime56 => append_cp56_opt(&mut asdu, info.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send packed output circuit information with CP24Time2a, type M_EP_TC_1.
/// Spontaneous only, a single object.
pub fn packed_output_circuit_info_cp24time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    info: PackedOutputCircuitInfo,
) -> Result<()> {
    build_packed_output_circuit(c, TypeId::ProtectionOutputCircuitTime24, coa, ca, info)
}

/// Send packed output circuit information with CP56Time2a, type M_EP_TF_1.
/// Spontaneous only, a single object.
pub fn packed_output_circuit_info_cp56time2a(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    info: PackedOutputCircuitInfo,
) -> Result<()> {
    build_packed_output_circuit(c, TypeId::ProtectionOutputCircuitTime56, coa, ca, info)
}

/// Send packed single point information with status change detection,
/// type identification M_PS_NA_1.
pub fn packed_single_point_with_scd(
    c: &dyn Connect,
    is_sequence: bool,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    infos: &[PackedSinglePointWithScdInfo],
) -> Result<()> {
    check_cause(coa, STATUS_CAUSES)?;
    let mut asdu = new_monitor_asdu(
        c,
        TypeId::PackedSinglePointWithScd,
        is_sequence,
        coa,
        ca,
        infos.len(),
    )?;
    let mut once = false;
    for v in infos {
        if !is_sequence || !once {
            once = true;
            asdu.append_info_obj_addr(v.ioa)?;
        }
        asdu.append_status_and_scd(v.scd)
            .append_bytes(&[v.qds.as_u8()]);
    }
    c.send(asdu)
}

impl Asdu {
    fn next_ioa(&mut self, once: &mut bool, prev: InfoObjAddr) -> Result<InfoObjAddr> {
        if !self.identifier.variable.is_sequence || !*once {
            *once = true;
            self.decode_info_obj_addr()
        } else {
            Ok(prev + 1)
        }
    }

    /// Parse M_SP_NA_1, M_SP_TA_1 or M_SP_TB_1 into single-point objects.
    pub fn get_single_point(&mut self) -> Result<Vec<SinglePointInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_byte()?;
            let time = match self.identifier.type_id {
                TypeId::SinglePoint => None,
                TypeId::SinglePointTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::SinglePointTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(SinglePointInfo {
                ioa,
                value: value & 0x01 == 0x01,
                qds: QualityDescriptor::from_u8(value & 0xF0),
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_DP_NA_1, M_DP_TA_1 or M_DP_TB_1 into double-point objects.
    pub fn get_double_point(&mut self) -> Result<Vec<DoublePointInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_byte()?;
            let time = match self.identifier.type_id {
                TypeId::DoublePoint => None,
                TypeId::DoublePointTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::DoublePointTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(DoublePointInfo {
                ioa,
                value: DoublePoint::from_u8(value),
                qds: QualityDescriptor::from_u8(value & 0xF0),
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_ST_NA_1, M_ST_TA_1 or M_ST_TB_1 into step position objects.
    pub fn get_step_position(&mut self) -> Result<Vec<StepPositionInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_step_position()?;
            let qds = QualityDescriptor::from_u8(self.decode_byte()?);
            let time = match self.identifier.type_id {
                TypeId::StepPosition => None,
                TypeId::StepPositionTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::StepPositionTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(StepPositionInfo {
                ioa,
                value,
                qds,
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_BO_NA_1, M_BO_TA_1 or M_BO_TB_1 into bit string objects.
    pub fn get_bit_string32(&mut self) -> Result<Vec<BitString32Info>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_bits_string32()?;
            let qds = QualityDescriptor::from_u8(self.decode_byte()?);
            let time = match self.identifier.type_id {
                TypeId::Bitstring32 => None,
                TypeId::Bitstring32Time24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::Bitstring32Time56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(BitString32Info {
                ioa,
                value,
                qds,
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_ME_NA_1, M_ME_TA_1, M_ME_TD_1 or M_ME_ND_1 into normalized
    /// measured values.
    pub fn get_measured_value_normal(&mut self) -> Result<Vec<MeasuredValueNormalInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_normalize()?;
            let (qds, time) = match self.identifier.type_id {
                TypeId::MeasuredNormalized => {
                    (QualityDescriptor::from_u8(self.decode_byte()?), None)
                }
                TypeId::MeasuredNormalizedTime24 => {
                    let qds = QualityDescriptor::from_u8(self.decode_byte()?);
                    (qds, self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)))
                }
                TypeId::MeasuredNormalizedTime56 => {
                    let qds = QualityDescriptor::from_u8(self.decode_byte()?);
                    (qds, self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)))
                }
                TypeId::MeasuredNormalizedNoQuality => (QualityDescriptor::GOOD, None),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(MeasuredValueNormalInfo {
                ioa,
                value,
                qds,
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_ME_NB_1, M_ME_TB_1 or M_ME_TE_1 into scaled measured values.
    pub fn get_measured_value_scaled(&mut self) -> Result<Vec<MeasuredValueScaledInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_scaled()?;
            let qds = QualityDescriptor::from_u8(self.decode_byte()?);
            let time = match self.identifier.type_id {
                TypeId::MeasuredScaled => None,
                TypeId::MeasuredScaledTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::MeasuredScaledTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(MeasuredValueScaledInfo {
                ioa,
                value,
                qds,
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_ME_NC_1, M_ME_TC_1 or M_ME_TF_1 into short float measured values.
    pub fn get_measured_value_float(&mut self) -> Result<Vec<MeasuredValueFloatInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_float32()?;
            let qds = QualityDescriptor::from_u8(self.decode_byte()?);
            let time = match self.identifier.type_id {
                TypeId::MeasuredFloat => None,
                TypeId::MeasuredFloatTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::MeasuredFloatTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(MeasuredValueFloatInfo {
                ioa,
                value,
                qds,
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_IT_NA_1, M_IT_TA_1 or M_IT_TB_1 into counter readings.
    pub fn get_integrated_totals(&mut self) -> Result<Vec<BinaryCounterReadingInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_binary_counter_reading()?;
            let time = match self.identifier.type_id {
                TypeId::IntegratedTotals => None,
                TypeId::IntegratedTotalsTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::IntegratedTotalsTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(BinaryCounterReadingInfo { ioa, value, time });
        }
        Ok(info)
    }

    /// Parse M_EP_TA_1 or M_EP_TD_1 into protection equipment events.
    pub fn get_event_of_protection_equipment(
        &mut self,
    ) -> Result<Vec<EventOfProtectionEquipmentInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let value = self.decode_byte()?;
            let msec = self.decode_cp16time2a()?;
            let time = match self.identifier.type_id {
                TypeId::ProtectionEventTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
                TypeId::ProtectionEventTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
                _ => return Err(Error::TypeIdNotMatch),
            };
            info.push(EventOfProtectionEquipmentInfo {
                ioa,
                event: SingleEvent::from_u8(value),
                qdp: QualityDescriptorProtection::from_u8(value),
                msec,
                time,
            });
        }
        Ok(info)
    }

    /// Parse M_EP_TB_1 or M_EP_TE_1: packed start events, a single object.
    pub fn get_packed_start_events_of_protection_equipment(
        &mut self,
    ) -> Result<PackedStartEventsOfProtectionEquipmentInfo> {
        if self.identifier.variable.is_sequence || self.identifier.variable.number != 1 {
            return Err(Error::asdu_static(
                "packed start events carry exactly one object",
            ));
        }
        let ioa = self.decode_info_obj_addr()?;
        let event = StartEvent(self.decode_byte()?);
        let qdp = QualityDescriptorProtection::from_u8(self.decode_byte()?);
        let msec = self.decode_cp16time2a()?;
        let time = match self.identifier.type_id {
            TypeId::ProtectionStartEventsTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
            TypeId::ProtectionStartEventsTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(PackedStartEventsOfProtectionEquipmentInfo {
            ioa,
            event,
            qdp,
            msec,
            time,
        })
    }

    /// Parse M_EP_TC_1 or M_EP_TF_1: packed output circuit information,
    /// a single object.
    pub fn get_packed_output_circuit_info(&mut self) -> Result<PackedOutputCircuitInfo> {
        if self.identifier.variable.is_sequence || self.identifier.variable.number != 1 {
            return Err(Error::asdu_static(
                "packed output circuit info carries exactly one object",
            ));
        }
        let ioa = self.decode_info_obj_addr()?;
        let oci = OutputCircuitInfo(self.decode_byte()?);
        let qdp = QualityDescriptorProtection::from_u8(self.decode_byte()?);
        let msec = self.decode_cp16time2a()?;
        let time = match self.identifier.type_id {
            TypeId::ProtectionOutputCircuitTime24 => self.decode_cp24time2a()?.map(|t| t.with_timezone(&Utc)),
            TypeId::ProtectionOutputCircuitTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(PackedOutputCircuitInfo {
            ioa,
            oci,
            qdp,
            msec,
            time,
        })
    }

    /// Parse M_PS_NA_1 into packed single point objects with SCD.
    pub fn get_packed_single_point_with_scd(
        &mut self,
    ) -> Result<Vec<PackedSinglePointWithScdInfo>> {
        let number = usize::from(self.identifier.variable.number);
        let mut info = Vec::with_capacity(number);
        let (mut once, mut ioa) = (false, 0);
        for _ in 0..number {
            ioa = self.next_ioa(&mut once, ioa)?;
            let scd = self.decode_status_and_scd()?;
            let qds = QualityDescriptor::from_u8(self.decode_byte()?);
            info.push(PackedSinglePointWithScdInfo { ioa, scd, qds });
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asdu::testutil::MockConnect;
    use crate::asdu::{Cause, Params};
    use chrono::TimeZone;

    fn spontaneous() -> CauseOfTransmission {
        CauseOfTransmission::new(Cause::SPONTANEOUS)
    }

    #[test]
    fn test_single_sequence_wire_bytes() {
        // two consecutive single points, both ON with good quality
        let c = MockConnect::wide();
        single(
            &c,
            true,
            spontaneous(),
            0x0001,
            &[
                SinglePointInfo {
                    ioa: 100,
                    value: true,
                    qds: QualityDescriptor::GOOD,
                    time: None,
                },
                SinglePointInfo {
                    ioa: 0,
                    value: true,
                    qds: QualityDescriptor::GOOD,
                    time: None,
                },
            ],
        )
        .unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        assert_eq!(
            raw,
            [0x01, 0x82, 0x03, 0x00, 0x01, 0x00, 0x64, 0x00, 0x00, 0x01, 0x01]
        );
    }

    #[test]
    fn test_single_cot_rejection_sends_nothing() {
        let c = MockConnect::wide();
        let err = single(
            &c,
            false,
            CauseOfTransmission::new(Cause::ACTIVATION),
            1,
            &[SinglePointInfo {
                ioa: 1,
                value: false,
                qds: QualityDescriptor::GOOD,
                time: None,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, Error::CmdCause));
        assert!(c.is_empty());
    }

    #[test]
    fn test_single_roundtrip() {
        let c = MockConnect::wide();
        let infos = [
            SinglePointInfo {
                ioa: 1001,
                value: true,
                qds: QualityDescriptor::GOOD,
                time: None,
            },
            SinglePointInfo {
                ioa: 2002,
                value: false,
                qds: QualityDescriptor::INVALID,
                time: None,
            },
        ];
        single(&c, false, spontaneous(), 7, &infos).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_single_point().unwrap(), infos);
    }

    #[test]
    fn test_single_cp56_roundtrip() {
        let c = MockConnect::wide();
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();
        let infos = [SinglePointInfo {
            ioa: 42,
            value: true,
            qds: QualityDescriptor::BLOCKED,
            time: Some(t),
        }];
        single_cp56time2a(&c, spontaneous(), 1, &infos).unwrap();

        let sent = c.take_one();
        assert_eq!(sent.identifier.type_id, TypeId::SinglePointTime56);
        let raw = sent.to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_single_point().unwrap(), infos);
    }

    #[test]
    fn test_double_roundtrip_sequence() {
        let c = MockConnect::wide();
        let infos = [
            DoublePointInfo {
                ioa: 300,
                value: DoublePoint::On,
                qds: QualityDescriptor::GOOD,
                time: None,
            },
            DoublePointInfo {
                ioa: 301,
                value: DoublePoint::Off,
                qds: QualityDescriptor::GOOD,
                time: None,
            },
            DoublePointInfo {
                ioa: 302,
                value: DoublePoint::Indeterminate,
                qds: QualityDescriptor::NOT_TOPICAL,
                time: None,
            },
        ];
        double(&c, true, spontaneous(), 2, &infos).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        // sequence layout reconstructs consecutive addresses
        assert_eq!(asdu.get_double_point().unwrap(), infos);
    }

    #[test]
    fn test_step_cp56_uses_st_tb_1() {
        let c = MockConnect::wide();
        step_cp56time2a(
            &c,
            spontaneous(),
            1,
            &[StepPositionInfo {
                ioa: 5,
                value: StepPosition {
                    val: -3,
                    has_transient: true,
                },
                qds: QualityDescriptor::GOOD,
                time: Some(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap()),
            }],
        )
        .unwrap();

        let sent = c.take_one();
        assert_eq!(sent.identifier.type_id, TypeId::StepPositionTime56);

        let raw = sent.to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        let got = asdu.get_step_position().unwrap();
        assert_eq!(got[0].value.val, -3);
        assert!(got[0].value.has_transient);
        assert!(got[0].time.is_some());
    }

    #[test]
    fn test_bit_string32_roundtrip() {
        let c = MockConnect::wide();
        let infos = [BitString32Info {
            ioa: 9,
            value: 0xA5A5_5A5A,
            qds: QualityDescriptor::OVERFLOW,
            time: None,
        }];
        bit_string32(&c, false, CauseOfTransmission::new(Cause::BACKGROUND), 1, &infos).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_bit_string32().unwrap(), infos);
    }

    #[test]
    fn test_bit_string32_rejects_return_info() {
        let c = MockConnect::wide();
        let err = bit_string32(
            &c,
            false,
            CauseOfTransmission::new(Cause::RETURN_INFO_REMOTE),
            1,
            &[BitString32Info {
                ioa: 9,
                value: 0,
                qds: QualityDescriptor::GOOD,
                time: None,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, Error::CmdCause));
    }

    #[test]
    fn test_measured_normal_periodic_and_roundtrip() {
        let c = MockConnect::wide();
        let infos = [MeasuredValueNormalInfo {
            ioa: 4000,
            value: Normalize(16384),
            qds: QualityDescriptor::GOOD,
            time: None,
        }];
        measured_value_normal(&c, false, CauseOfTransmission::new(Cause::PERIODIC), 1, &infos)
            .unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        let got = asdu.get_measured_value_normal().unwrap();
        assert_eq!(got, infos);
        assert!((got[0].value.float64() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_measured_normal_no_quality_object_size() {
        let c = MockConnect::wide();
        measured_value_normal_no_quality(
            &c,
            false,
            spontaneous(),
            1,
            &[MeasuredValueNormalInfo {
                ioa: 1,
                value: Normalize(-1),
                qds: QualityDescriptor::INVALID, // must not be encoded
                time: None,
            }],
        )
        .unwrap();

        let sent = c.take_one();
        // IOA (3) + NVA (2), no QDS octet
        assert_eq!(sent.payload().len(), 5);

        let raw = sent.to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        let got = asdu.get_measured_value_normal().unwrap();
        assert_eq!(got[0].value, Normalize(-1));
        assert_eq!(got[0].qds, QualityDescriptor::GOOD);
    }

    #[test]
    fn test_measured_scaled_time24_roundtrip_fields() {
        let c = MockConnect::wide();
        let t = Utc::now();
        measured_value_scaled_cp24time2a(
            &c,
            CauseOfTransmission::new(Cause::REQUEST),
            1,
            &[MeasuredValueScaledInfo {
                ioa: 77,
                value: -1234,
                qds: QualityDescriptor::SUBSTITUTED,
                time: Some(t),
            }],
        )
        .unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        let got = asdu.get_measured_value_scaled().unwrap();
        assert_eq!(got[0].value, -1234);
        assert_eq!(got[0].qds, QualityDescriptor::SUBSTITUTED);
        // CP24 carries only minute + milliseconds
        assert!(got[0].time.is_some());
    }

    #[test]
    fn test_measured_float_qds_mask() {
        let c = MockConnect::wide();
        measured_value_float(
            &c,
            false,
            spontaneous(),
            1,
            &[MeasuredValueFloatInfo {
                ioa: 3000,
                value: 23.5,
                qds: QualityDescriptor::from_u8(0xFF),
                time: None,
            }],
        )
        .unwrap();

        let sent = c.take_one();
        // reserved bits 1..3 never reach the wire
        assert_eq!(sent.payload()[7], 0xF1);
    }

    #[test]
    fn test_integrated_totals_causes() {
        let c = MockConnect::wide();
        let infos = [BinaryCounterReadingInfo {
            ioa: 6000,
            value: BinaryCounterReading {
                counter_reading: 123_456,
                seq_number: 5,
                has_carry: false,
                is_adjusted: false,
                is_invalid: false,
            },
            time: None,
        }];
        assert!(matches!(
            integrated_totals(&c, false, CauseOfTransmission::new(Cause::REQUEST), 1, &infos),
            Err(Error::CmdCause)
        ));
        integrated_totals(
            &c,
            false,
            CauseOfTransmission::new(Cause::REQUEST_BY_GENERAL_COUNTER),
            1,
            &infos,
        )
        .unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_integrated_totals().unwrap(), infos);
    }

    #[test]
    fn test_protection_event_spontaneous_only() {
        let c = MockConnect::wide();
        let infos = [EventOfProtectionEquipmentInfo {
            ioa: 11,
            event: SingleEvent::On,
            qdp: QualityDescriptorProtection::GOOD,
            msec: 300,
            time: Some(Utc.with_ymd_and_hms(2022, 9, 9, 9, 9, 9).unwrap()),
        }];
        assert!(matches!(
            event_of_protection_equipment_cp56time2a(
                &c,
                CauseOfTransmission::new(Cause::REQUEST),
                1,
                &infos
            ),
            Err(Error::CmdCause)
        ));

        event_of_protection_equipment_cp56time2a(&c, spontaneous(), 1, &infos).unwrap();
        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_event_of_protection_equipment().unwrap(), infos);
    }

    #[test]
    fn test_packed_start_events_roundtrip() {
        let c = MockConnect::wide();
        let info = PackedStartEventsOfProtectionEquipmentInfo {
            ioa: 21,
            event: StartEvent::GENERAL | StartEvent::L2,
            qdp: QualityDescriptorProtection::BLOCKED,
            msec: 1500,
            time: Some(Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap()),
        };
        packed_start_events_of_protection_equipment_cp56time2a(&c, spontaneous(), 1, info)
            .unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(
            asdu.get_packed_start_events_of_protection_equipment().unwrap(),
            info
        );
    }

    #[test]
    fn test_packed_output_circuit_roundtrip() {
        let c = MockConnect::wide();
        let info = PackedOutputCircuitInfo {
            ioa: 31,
            oci: OutputCircuitInfo::GENERAL | OutputCircuitInfo::L1,
            qdp: QualityDescriptorProtection::GOOD,
            msec: 20,
            time: Some(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()),
        };
        packed_output_circuit_info_cp24time2a(&c, spontaneous(), 1, info).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        let got = asdu.get_packed_output_circuit_info().unwrap();
        assert_eq!(got.ioa, 31);
        assert_eq!(got.oci, OutputCircuitInfo(0x03));
        assert_eq!(got.msec, 20);
    }

    #[test]
    fn test_packed_scd_roundtrip() {
        let c = MockConnect::wide();
        let infos = [PackedSinglePointWithScdInfo {
            ioa: 400,
            scd: StatusAndScd(0x0001_8001),
            qds: QualityDescriptor::GOOD,
        }];
        packed_single_point_with_scd(&c, false, spontaneous(), 3, &infos).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_packed_single_point_with_scd().unwrap(), infos);
    }

    #[test]
    fn test_empty_infos_rejected() {
        let c = MockConnect::wide();
        assert!(matches!(
            single(&c, false, spontaneous(), 1, &[]),
            Err(Error::NotAnyObjInfo)
        ));
    }

    #[test]
    fn test_oversize_rejected() {
        let c = MockConnect::wide();
        let infos: Vec<SinglePointInfo> = (0..127)
            .map(|i| SinglePointInfo {
                ioa: i,
                value: false,
                qds: QualityDescriptor::GOOD,
                time: None,
            })
            .collect();
        // 127 addressed objects exceed 249 octets
        assert!(matches!(
            single(&c, false, spontaneous(), 1, &infos),
            Err(Error::LengthOutOfRange)
        ));
        // the sequence layout fits
        single(&c, true, spontaneous(), 1, &infos).unwrap();
    }

    #[test]
    fn test_truncated_payload_is_malformed() {
        // M_SP_NA_1 claiming 2 objects but carrying bytes for one
        let raw = [0x01, 0x02, 0x03, 0x00, 0x01, 0x00, 0x64, 0x00, 0x00, 0x01];
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert!(matches!(asdu.get_single_point(), Err(Error::Asdu(_))));
    }
}
