//! Process information in the control direction.
//!
//! Commands carry exactly one information object (SQ = 0) and admit only
//! activation or deactivation as cause of transmission. The confirmation
//! mirror (activation confirm, termination, the unknown-* causes) travels
//! back in the monitoring direction with the same layouts.

use chrono::{DateTime, Utc};

use crate::asdu::time::CP56TIME2A_INVALID;
use crate::asdu::{
    check_cause, Asdu, CauseOfTransmission, CommonAddr, Connect, DoubleCommand, Identifier,
    InfoObjAddr, Normalize, QualifierOfCommand, QualifierOfSetpointCmd, StepCommand, TypeId,
    VariableStruct, CONTROL_CAUSES,
};
use crate::error::{Error, Result};

/// Single command information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleCommandInfo {
    pub ioa: InfoObjAddr,
    pub value: bool,
    pub qoc: QualifierOfCommand,
    /// Ignored by C_SC_NA_1
    pub time: Option<DateTime<Utc>>,
}

/// Double command information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleCommandInfo {
    pub ioa: InfoObjAddr,
    pub value: DoubleCommand,
    pub qoc: QualifierOfCommand,
    pub time: Option<DateTime<Utc>>,
}

/// Regulating step command information object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCommandInfo {
    pub ioa: InfoObjAddr,
    pub value: StepCommand,
    pub qoc: QualifierOfCommand,
    pub time: Option<DateTime<Utc>>,
}

/// Set-point command with a normalized value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointCommandNormalInfo {
    pub ioa: InfoObjAddr,
    pub value: Normalize,
    pub qos: QualifierOfSetpointCmd,
    pub time: Option<DateTime<Utc>>,
}

/// Set-point command with a scaled value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointCommandScaledInfo {
    pub ioa: InfoObjAddr,
    pub value: i16,
    pub qos: QualifierOfSetpointCmd,
    pub time: Option<DateTime<Utc>>,
}

/// Set-point command with a short floating point value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointCommandFloatInfo {
    pub ioa: InfoObjAddr,
    pub value: f32,
    pub qos: QualifierOfSetpointCmd,
    pub time: Option<DateTime<Utc>>,
}

/// 32-bit bit string command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitsString32CommandInfo {
    pub ioa: InfoObjAddr,
    pub value: u32,
    pub time: Option<DateTime<Utc>>,
}

fn new_command_asdu(c: &dyn Connect, type_id: TypeId, coa: CauseOfTransmission, ca: CommonAddr) -> Result<Asdu> {
    c.params().valid()?;
    Ok(Asdu::new(
        c.params(),
        Identifier {
            type_id,
            variable: VariableStruct {
                number: 1,
                is_sequence: false,
            },
            cot: coa,
            orig_addr: 0,
            common_addr: ca,
        },
    ))
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

/// Send a single command, type identification C_SC_NA_1 or C_SC_TA_1.
pub fn single_cmd(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    cmd: SingleCommandInfo,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_command_asdu(c, type_id, coa, ca)?;
    asdu.append_info_obj_addr(cmd.ioa)?;
    asdu.append_bytes(&[cmd.qoc.as_u8() | u8::from(cmd.value)]);
    match type_id {
        TypeId::SingleCommand => {}
        TypeId::SingleCommandTime56 => append_cp56_opt(&mut asdu, cmd.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send a double command, type identification C_DC_NA_1 or C_DC_TA_1.
pub fn double_cmd(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    cmd: DoubleCommandInfo,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_command_asdu(c, type_id, coa, ca)?;
    asdu.append_info_obj_addr(cmd.ioa)?;
    asdu.append_bytes(&[cmd.qoc.as_u8() | cmd.value.as_u8()]);
    match type_id {
        TypeId::DoubleCommand => {}
        TypeId::DoubleCommandTime56 => append_cp56_opt(&mut asdu, cmd.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send a regulating step command, type identification C_RC_NA_1 or C_RC_TA_1.
pub fn step_cmd(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    cmd: StepCommandInfo,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_command_asdu(c, type_id, coa, ca)?;
    asdu.append_info_obj_addr(cmd.ioa)?;
    asdu.append_bytes(&[cmd.qoc.as_u8() | cmd.value.as_u8()]);
    match type_id {
        TypeId::RegulatingStep => {}
        TypeId::RegulatingStepTime56 => append_cp56_opt(&mut asdu, cmd.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send a normalized set-point command, type C_SE_NA_1 or C_SE_TA_1.
pub fn setpoint_cmd_normal(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    cmd: SetpointCommandNormalInfo,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_command_asdu(c, type_id, coa, ca)?;
    asdu.append_info_obj_addr(cmd.ioa)?;
    asdu.append_normalize(cmd.value)
        .append_bytes(&[cmd.qos.as_u8()]);
    match type_id {
        TypeId::SetpointNormalized => {}
        TypeId::SetpointNormalizedTime56 => append_cp56_opt(&mut asdu, cmd.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send a scaled set-point command, type C_SE_NB_1 or C_SE_TB_1.
pub fn setpoint_cmd_scaled(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    cmd: SetpointCommandScaledInfo,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_command_asdu(c, type_id, coa, ca)?;
    asdu.append_info_obj_addr(cmd.ioa)?;
    asdu.append_scaled(cmd.value)
        .append_bytes(&[cmd.qos.as_u8()]);
    match type_id {
        TypeId::SetpointScaled => {}
        TypeId::SetpointScaledTime56 => append_cp56_opt(&mut asdu, cmd.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send a short floating point set-point command, type C_SE_NC_1 or C_SE_TC_1.
pub fn setpoint_cmd_float(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    cmd: SetpointCommandFloatInfo,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_command_asdu(c, type_id, coa, ca)?;
    asdu.append_info_obj_addr(cmd.ioa)?;
    asdu.append_float32(cmd.value)
        .append_bytes(&[cmd.qos.as_u8()]);
    match type_id {
        TypeId::SetpointFloat => {}
        TypeId::SetpointFloatTime56 => append_cp56_opt(&mut asdu, cmd.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

/// Send a 32-bit bit string command, type C_BO_NA_1 or C_BO_TA_1.
pub fn bits_string32_cmd(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    cmd: BitsString32CommandInfo,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_command_asdu(c, type_id, coa, ca)?;
    asdu.append_info_obj_addr(cmd.ioa)?;
    asdu.append_bits_string32(cmd.value);
    match type_id {
        TypeId::Bitstring32Command => {}
        TypeId::Bitstring32CommandTime56 => append_cp56_opt(&mut asdu, cmd.time),
        _ => return Err(Error::TypeIdNotMatch),
    }
    c.send(asdu)
}

impl Asdu {
    /// Parse C_SC_NA_1 or C_SC_TA_1 into a single command.
    pub fn get_single_cmd(&mut self) -> Result<SingleCommandInfo> {
        let ioa = self.decode_info_obj_addr()?;
        let value = self.decode_byte()?;
        let time = match self.identifier.type_id {
            TypeId::SingleCommand => None,
            TypeId::SingleCommandTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(SingleCommandInfo {
            ioa,
            value: value & 0x01 == 0x01,
            qoc: QualifierOfCommand::from_u8(value & 0xFE),
            time,
        })
    }

    /// Parse C_DC_NA_1 or C_DC_TA_1 into a double command.
    pub fn get_double_cmd(&mut self) -> Result<DoubleCommandInfo> {
        let ioa = self.decode_info_obj_addr()?;
        let value = self.decode_byte()?;
        let time = match self.identifier.type_id {
            TypeId::DoubleCommand => None,
            TypeId::DoubleCommandTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(DoubleCommandInfo {
            ioa,
            value: DoubleCommand::from_u8(value),
            qoc: QualifierOfCommand::from_u8(value & 0xFC),
            time,
        })
    }

    /// Parse C_RC_NA_1 or C_RC_TA_1 into a regulating step command.
    pub fn get_step_cmd(&mut self) -> Result<StepCommandInfo> {
        let ioa = self.decode_info_obj_addr()?;
        let value = self.decode_byte()?;
        let time = match self.identifier.type_id {
            TypeId::RegulatingStep => None,
            TypeId::RegulatingStepTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(StepCommandInfo {
            ioa,
            value: StepCommand::from_u8(value),
            qoc: QualifierOfCommand::from_u8(value & 0xFC),
            time,
        })
    }

    /// Parse C_SE_NA_1 or C_SE_TA_1 into a normalized set-point command.
    pub fn get_setpoint_normal_cmd(&mut self) -> Result<SetpointCommandNormalInfo> {
        let ioa = self.decode_info_obj_addr()?;
        let value = self.decode_normalize()?;
        let qos = QualifierOfSetpointCmd::from_u8(self.decode_byte()?);
        let time = match self.identifier.type_id {
            TypeId::SetpointNormalized => None,
            TypeId::SetpointNormalizedTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(SetpointCommandNormalInfo {
            ioa,
            value,
            qos,
            time,
        })
    }

    /// Parse C_SE_NB_1 or C_SE_TB_1 into a scaled set-point command.
    pub fn get_setpoint_scaled_cmd(&mut self) -> Result<SetpointCommandScaledInfo> {
        let ioa = self.decode_info_obj_addr()?;
        let value = self.decode_scaled()?;
        let qos = QualifierOfSetpointCmd::from_u8(self.decode_byte()?);
        let time = match self.identifier.type_id {
            TypeId::SetpointScaled => None,
            TypeId::SetpointScaledTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(SetpointCommandScaledInfo {
            ioa,
            value,
            qos,
            time,
        })
    }

    /// Parse C_SE_NC_1 or C_SE_TC_1 into a short float set-point command.
    pub fn get_setpoint_float_cmd(&mut self) -> Result<SetpointCommandFloatInfo> {
        let ioa = self.decode_info_obj_addr()?;
        let value = self.decode_float32()?;
        let qos = QualifierOfSetpointCmd::from_u8(self.decode_byte()?);
        let time = match self.identifier.type_id {
            TypeId::SetpointFloat => None,
            TypeId::SetpointFloatTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(SetpointCommandFloatInfo {
            ioa,
            value,
            qos,
            time,
        })
    }

    /// Parse C_BO_NA_1 or C_BO_TA_1 into a bit string command.
    pub fn get_bits_string32_cmd(&mut self) -> Result<BitsString32CommandInfo> {
        let ioa = self.decode_info_obj_addr()?;
        let value = self.decode_bits_string32()?;
        let time = match self.identifier.type_id {
            TypeId::Bitstring32Command => None,
            TypeId::Bitstring32CommandTime56 => self.decode_cp56time2a()?.map(|t| t.with_timezone(&Utc)),
            _ => return Err(Error::TypeIdNotMatch),
        };
        Ok(BitsString32CommandInfo { ioa, value, time })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asdu::testutil::MockConnect;
    use crate::asdu::{Cause, Params, QocQual};
    use chrono::TimeZone;

    fn activation() -> CauseOfTransmission {
        CauseOfTransmission::new(Cause::ACTIVATION)
    }

    #[test]
    fn test_single_cmd_wire_bytes() {
        let c = MockConnect::wide();
        single_cmd(
            &c,
            TypeId::SingleCommand,
            activation(),
            1,
            SingleCommandInfo {
                ioa: 0x030201,
                value: true,
                qoc: QualifierOfCommand {
                    qual: QocQual::NO_ADDITIONAL,
                    in_select: true,
                },
                time: None,
            },
        )
        .unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        assert_eq!(
            raw,
            [45, 0x01, 0x06, 0x00, 0x01, 0x00, 0x01, 0x02, 0x03, 0x81]
        );
    }

    #[test]
    fn test_single_cmd_roundtrip() {
        let c = MockConnect::wide();
        let cmd = SingleCommandInfo {
            ioa: 500,
            value: false,
            qoc: QualifierOfCommand {
                qual: QocQual::SHORT_PULSE,
                in_select: false,
            },
            time: None,
        };
        single_cmd(&c, TypeId::SingleCommand, activation(), 3, cmd).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_single_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_single_cmd_time56_roundtrip() {
        let c = MockConnect::wide();
        let cmd = SingleCommandInfo {
            ioa: 7,
            value: true,
            qoc: QualifierOfCommand::default(),
            time: Some(Utc.with_ymd_and_hms(2024, 11, 5, 6, 7, 8).unwrap()),
        };
        single_cmd(&c, TypeId::SingleCommandTime56, activation(), 1, cmd).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_single_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_cmd_cause_rejection() {
        let c = MockConnect::wide();
        let err = single_cmd(
            &c,
            TypeId::SingleCommand,
            CauseOfTransmission::new(Cause::SPONTANEOUS),
            1,
            SingleCommandInfo {
                ioa: 1,
                value: true,
                qoc: QualifierOfCommand::default(),
                time: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::CmdCause));
        assert!(c.is_empty());
    }

    #[test]
    fn test_double_cmd_roundtrip() {
        let c = MockConnect::wide();
        let cmd = DoubleCommandInfo {
            ioa: 88,
            value: DoubleCommand::On,
            qoc: QualifierOfCommand {
                qual: QocQual::PERSISTENT,
                in_select: true,
            },
            time: None,
        };
        double_cmd(
            &c,
            TypeId::DoubleCommand,
            CauseOfTransmission::new(Cause::DEACTIVATION),
            1,
            cmd,
        )
        .unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_double_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_step_cmd_roundtrip() {
        let c = MockConnect::wide();
        let cmd = StepCommandInfo {
            ioa: 12,
            value: StepCommand::StepUp,
            qoc: QualifierOfCommand::default(),
            time: None,
        };
        step_cmd(&c, TypeId::RegulatingStep, activation(), 1, cmd).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_step_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_setpoint_normal_roundtrip() {
        let c = MockConnect::wide();
        let cmd = SetpointCommandNormalInfo {
            ioa: 9001,
            value: Normalize(-16384),
            qos: QualifierOfSetpointCmd {
                qual: 0,
                in_select: true,
            },
            time: None,
        };
        setpoint_cmd_normal(&c, TypeId::SetpointNormalized, activation(), 1, cmd).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_setpoint_normal_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_setpoint_scaled_roundtrip() {
        let c = MockConnect::wide();
        let cmd = SetpointCommandScaledInfo {
            ioa: 9002,
            value: -30000,
            qos: QualifierOfSetpointCmd::default(),
            time: None,
        };
        setpoint_cmd_scaled(&c, TypeId::SetpointScaled, activation(), 1, cmd).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_setpoint_scaled_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_setpoint_float_roundtrip() {
        let c = MockConnect::wide();
        let cmd = SetpointCommandFloatInfo {
            ioa: 9003,
            value: 100.5,
            qos: QualifierOfSetpointCmd::default(),
            time: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
        };
        setpoint_cmd_float(&c, TypeId::SetpointFloatTime56, activation(), 1, cmd).unwrap();

        let sent = c.take_one();
        assert_eq!(sent.identifier.type_id, TypeId::SetpointFloatTime56);
        let raw = sent.to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_setpoint_float_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_bits_string32_cmd_roundtrip() {
        let c = MockConnect::wide();
        let cmd = BitsString32CommandInfo {
            ioa: 1,
            value: 0x0102_0304,
            time: None,
        };
        bits_string32_cmd(&c, TypeId::Bitstring32Command, activation(), 1, cmd).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_bits_string32_cmd().unwrap(), cmd);
    }

    #[test]
    fn test_foreign_type_rejected() {
        let c = MockConnect::wide();
        let err = single_cmd(
            &c,
            TypeId::DoubleCommand,
            activation(),
            1,
            SingleCommandInfo {
                ioa: 1,
                value: true,
                qoc: QualifierOfCommand::default(),
                time: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::TypeIdNotMatch));
    }
}
