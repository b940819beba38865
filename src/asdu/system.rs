//! System information in both directions.
//!
//! Control-direction system commands (interrogation, counter interrogation,
//! read, clock synchronization, test, reset process, delay acquisition) and
//! the end-of-initialization message in the monitoring direction. Most of
//! these force the protocol-mandated cause of transmission regardless of
//! the caller; interrogation additionally admits deactivation.

use chrono::{DateTime, FixedOffset, Utc};

use crate::asdu::{
    check_cause, Asdu, Cause, CauseOfInitial, CauseOfTransmission, CommonAddr, Connect,
    Identifier, InfoObjAddr, QualifierCountCall, QualifierOfInterrogation,
    QualifierOfResetProcess, TypeId, VariableStruct, CONTROL_CAUSES, FBP_TEST_WORD,
    INFO_OBJ_ADDR_IRRELEVANT,
};
use crate::error::Result;

fn new_system_asdu(
    c: &dyn Connect,
    type_id: TypeId,
    coa: CauseOfTransmission,
    ca: CommonAddr,
) -> Result<Asdu> {
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

/// Send an interrogation command, type identification C_IC_NA_1.
/// Admitted causes: activation, deactivation.
pub fn interrogation_cmd(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    qoi: QualifierOfInterrogation,
) -> Result<()> {
    check_cause(coa, CONTROL_CAUSES)?;
    let mut asdu = new_system_asdu(c, TypeId::InterrogationCommand, coa, ca)?;
    asdu.append_info_obj_addr(INFO_OBJ_ADDR_IRRELEVANT)?;
    asdu.append_bytes(&[qoi.0]);
    c.send(asdu)
}

/// Send a counter interrogation command, type identification C_CI_NA_1.
/// The cause is forced to activation.
pub fn counter_interrogation_cmd(
    c: &dyn Connect,
    mut coa: CauseOfTransmission,
    ca: CommonAddr,
    qcc: QualifierCountCall,
) -> Result<()> {
    coa.cause = Cause::ACTIVATION;
    let mut asdu = new_system_asdu(c, TypeId::CounterInterrogation, coa, ca)?;
    asdu.append_info_obj_addr(INFO_OBJ_ADDR_IRRELEVANT)?;
    asdu.append_bytes(&[qcc.as_u8()]);
    c.send(asdu)
}

/// Send a read command, type identification C_RD_NA_1.
/// The cause is forced to request.
pub fn read_cmd(
    c: &dyn Connect,
    mut coa: CauseOfTransmission,
    ca: CommonAddr,
    ioa: InfoObjAddr,
) -> Result<()> {
    coa.cause = Cause::REQUEST;
    let mut asdu = new_system_asdu(c, TypeId::ReadCommand, coa, ca)?;
    asdu.append_info_obj_addr(ioa)?;
    c.send(asdu)
}

/// Send a clock synchronization command, type identification C_CS_NA_1.
/// The cause is forced to activation.
pub fn clock_synchronization_cmd(
    c: &dyn Connect,
    mut coa: CauseOfTransmission,
    ca: CommonAddr,
    t: DateTime<Utc>,
) -> Result<()> {
    coa.cause = Cause::ACTIVATION;
    let mut asdu = new_system_asdu(c, TypeId::ClockSync, coa, ca)?;
    asdu.append_info_obj_addr(INFO_OBJ_ADDR_IRRELEVANT)?;
    asdu.append_cp56time2a(t);
    c.send(asdu)
}

/// Send a test command, type identification C_TS_NA_1.
/// The cause is forced to activation; the payload is the fixed test word.
pub fn test_command(c: &dyn Connect, mut coa: CauseOfTransmission, ca: CommonAddr) -> Result<()> {
    coa.cause = Cause::ACTIVATION;
    let mut asdu = new_system_asdu(c, TypeId::TestCommand, coa, ca)?;
    asdu.append_info_obj_addr(INFO_OBJ_ADDR_IRRELEVANT)?;
    asdu.append_uint16(FBP_TEST_WORD);
    c.send(asdu)
}

/// Send a reset process command, type identification C_RP_NA_1.
/// The cause is forced to activation.
pub fn reset_process_cmd(
    c: &dyn Connect,
    mut coa: CauseOfTransmission,
    ca: CommonAddr,
    qrp: QualifierOfResetProcess,
) -> Result<()> {
    coa.cause = Cause::ACTIVATION;
    let mut asdu = new_system_asdu(c, TypeId::ResetProcess, coa, ca)?;
    asdu.append_info_obj_addr(INFO_OBJ_ADDR_IRRELEVANT)?;
    asdu.append_bytes(&[qrp.0]);
    c.send(asdu)
}

/// Send a delay acquisition command, type identification C_CD_NA_1.
/// The cause is forced to activation.
pub fn delay_acquire_cmd(
    c: &dyn Connect,
    mut coa: CauseOfTransmission,
    ca: CommonAddr,
    msec: u16,
) -> Result<()> {
    coa.cause = Cause::ACTIVATION;
    let mut asdu = new_system_asdu(c, TypeId::DelayAcquire, coa, ca)?;
    asdu.append_info_obj_addr(INFO_OBJ_ADDR_IRRELEVANT)?;
    asdu.append_cp16time2a(msec);
    c.send(asdu)
}

/// Send a test command with CP56Time2a, type identification C_TS_TA_1.
/// The cause is forced to activation.
pub fn test_command_cp56time2a(
    c: &dyn Connect,
    mut coa: CauseOfTransmission,
    ca: CommonAddr,
    t: DateTime<Utc>,
) -> Result<()> {
    coa.cause = Cause::ACTIVATION;
    let mut asdu = new_system_asdu(c, TypeId::TestCommandTime56, coa, ca)?;
    asdu.append_info_obj_addr(INFO_OBJ_ADDR_IRRELEVANT)?;
    asdu.append_uint16(FBP_TEST_WORD);
    asdu.append_cp56time2a(t);
    c.send(asdu)
}

/// Send end of initialization, type identification M_EI_NA_1.
/// The cause is forced to initialized.
pub fn end_of_initialization(
    c: &dyn Connect,
    mut coa: CauseOfTransmission,
    ca: CommonAddr,
    ioa: InfoObjAddr,
    coi: CauseOfInitial,
) -> Result<()> {
    coa.cause = Cause::INITIALIZED;
    let mut asdu = new_system_asdu(c, TypeId::EndOfInit, coa, ca)?;
    asdu.append_info_obj_addr(ioa)?;
    asdu.append_bytes(&[coi.as_u8()]);
    c.send(asdu)
}

impl Asdu {
    /// Parse C_IC_NA_1: the information object address and the qualifier
    /// of interrogation.
    pub fn get_interrogation_cmd(&mut self) -> Result<(InfoObjAddr, QualifierOfInterrogation)> {
        let ioa = self.decode_info_obj_addr()?;
        let qoi = QualifierOfInterrogation(self.decode_byte()?);
        Ok((ioa, qoi))
    }

    /// Parse C_CI_NA_1: the information object address and the qualifier
    /// of counter interrogation.
    pub fn get_counter_interrogation_cmd(&mut self) -> Result<(InfoObjAddr, QualifierCountCall)> {
        let ioa = self.decode_info_obj_addr()?;
        let qcc = QualifierCountCall::from_u8(self.decode_byte()?);
        Ok((ioa, qcc))
    }

    /// Parse C_RD_NA_1: the addressed information object.
    pub fn get_read_cmd(&mut self) -> Result<InfoObjAddr> {
        self.decode_info_obj_addr()
    }

    /// Parse C_CS_NA_1: the information object address and the wall clock.
    pub fn get_clock_synchronization_cmd(
        &mut self,
    ) -> Result<(InfoObjAddr, Option<DateTime<FixedOffset>>)> {
        let ioa = self.decode_info_obj_addr()?;
        let t = self.decode_cp56time2a()?;
        Ok((ioa, t))
    }

    /// Parse C_TS_NA_1: the information object address and whether the
    /// payload carried the fixed test word.
    pub fn get_test_command(&mut self) -> Result<(InfoObjAddr, bool)> {
        let ioa = self.decode_info_obj_addr()?;
        let word = self.decode_uint16()?;
        Ok((ioa, word == FBP_TEST_WORD))
    }

    /// Parse C_RP_NA_1: the information object address and the reset
    /// process qualifier.
    pub fn get_reset_process_cmd(&mut self) -> Result<(InfoObjAddr, QualifierOfResetProcess)> {
        let ioa = self.decode_info_obj_addr()?;
        let qrp = QualifierOfResetProcess(self.decode_byte()?);
        Ok((ioa, qrp))
    }

    /// Parse C_CD_NA_1: the information object address and the delay in
    /// milliseconds.
    pub fn get_delay_acquire_cmd(&mut self) -> Result<(InfoObjAddr, u16)> {
        let ioa = self.decode_info_obj_addr()?;
        let msec = self.decode_uint16()?;
        Ok((ioa, msec))
    }

    /// Parse C_TS_TA_1: address, test-word check and time tag.
    pub fn get_test_command_cp56time2a(
        &mut self,
    ) -> Result<(InfoObjAddr, bool, Option<DateTime<FixedOffset>>)> {
        let ioa = self.decode_info_obj_addr()?;
        let word = self.decode_uint16()?;
        let t = self.decode_cp56time2a()?;
        Ok((ioa, word == FBP_TEST_WORD, t))
    }

    /// Parse M_EI_NA_1: the information object address and the cause of
    /// initialization.
    pub fn get_end_of_initialization(&mut self) -> Result<(InfoObjAddr, CauseOfInitial)> {
        let ioa = self.decode_info_obj_addr()?;
        let coi = CauseOfInitial::from_u8(self.decode_byte()?);
        Ok((ioa, coi))
    }
}
