//! Parameter loading in the control direction.
//!
//! Measured value parameters (threshold, smoothing, transmission limits)
//! and parameter activation. All carry a single information object (SQ = 0).

use crate::asdu::{
    check_cause, Asdu, CauseOfTransmission, CommonAddr, Connect, Identifier, InfoObjAddr,
    Normalize, QualifierOfParameterAct, QualifierOfParameterMV, TypeId, VariableStruct,
    PARAMETER_ACT_CAUSES, PARAMETER_CAUSES,
};
use crate::error::Result;

/// Parameter of a normalized measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterNormalInfo {
    pub ioa: InfoObjAddr,
    pub value: Normalize,
    pub qpm: QualifierOfParameterMV,
}

/// Parameter of a scaled measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterScaledInfo {
    pub ioa: InfoObjAddr,
    pub value: i16,
    pub qpm: QualifierOfParameterMV,
}

/// Parameter of a short floating point measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterFloatInfo {
    pub ioa: InfoObjAddr,
    pub value: f32,
    pub qpm: QualifierOfParameterMV,
}

/// Parameter activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterActivationInfo {
    pub ioa: InfoObjAddr,
    pub qpa: QualifierOfParameterAct,
}

fn new_parameter_asdu(
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

/// Send a normalized measured value parameter, type identification P_ME_NA_1.
/// Admitted cause: activation.
pub fn parameter_normal(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    p: ParameterNormalInfo,
) -> Result<()> {
    check_cause(coa, PARAMETER_CAUSES)?;
    let mut asdu = new_parameter_asdu(c, TypeId::ParameterNormalized, coa, ca)?;
    asdu.append_info_obj_addr(p.ioa)?;
    asdu.append_normalize(p.value).append_bytes(&[p.qpm.as_u8()]);
    c.send(asdu)
}

/// Send a scaled measured value parameter, type identification P_ME_NB_1.
/// Admitted cause: activation.
pub fn parameter_scaled(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    p: ParameterScaledInfo,
) -> Result<()> {
    check_cause(coa, PARAMETER_CAUSES)?;
    let mut asdu = new_parameter_asdu(c, TypeId::ParameterScaled, coa, ca)?;
    asdu.append_info_obj_addr(p.ioa)?;
    asdu.append_scaled(p.value).append_bytes(&[p.qpm.as_u8()]);
    c.send(asdu)
}

/// Send a short float measured value parameter, type identification P_ME_NC_1.
/// Admitted cause: activation.
pub fn parameter_float(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    p: ParameterFloatInfo,
) -> Result<()> {
    check_cause(coa, PARAMETER_CAUSES)?;
    let mut asdu = new_parameter_asdu(c, TypeId::ParameterFloat, coa, ca)?;
    asdu.append_info_obj_addr(p.ioa)?;
    asdu.append_float32(p.value).append_bytes(&[p.qpm.as_u8()]);
    c.send(asdu)
}

/// Send a parameter activation, type identification P_AC_NA_1.
/// Admitted causes: activation, deactivation.
pub fn parameter_activation(
    c: &dyn Connect,
    coa: CauseOfTransmission,
    ca: CommonAddr,
    p: ParameterActivationInfo,
) -> Result<()> {
    check_cause(coa, PARAMETER_ACT_CAUSES)?;
    let mut asdu = new_parameter_asdu(c, TypeId::ParameterActivation, coa, ca)?;
    asdu.append_info_obj_addr(p.ioa)?;
    asdu.append_bytes(&[p.qpa.0]);
    c.send(asdu)
}

impl Asdu {
    /// Parse P_ME_NA_1 into a normalized parameter.
    pub fn get_parameter_normal(&mut self) -> Result<ParameterNormalInfo> {
        Ok(ParameterNormalInfo {
            ioa: self.decode_info_obj_addr()?,
            value: self.decode_normalize()?,
            qpm: QualifierOfParameterMV::from_u8(self.decode_byte()?),
        })
    }

    /// Parse P_ME_NB_1 into a scaled parameter.
    pub fn get_parameter_scaled(&mut self) -> Result<ParameterScaledInfo> {
        Ok(ParameterScaledInfo {
            ioa: self.decode_info_obj_addr()?,
            value: self.decode_scaled()?,
            qpm: QualifierOfParameterMV::from_u8(self.decode_byte()?),
        })
    }

    /// Parse P_ME_NC_1 into a short float parameter.
    pub fn get_parameter_float(&mut self) -> Result<ParameterFloatInfo> {
        Ok(ParameterFloatInfo {
            ioa: self.decode_info_obj_addr()?,
            value: self.decode_float32()?,
            qpm: QualifierOfParameterMV::from_u8(self.decode_byte()?),
        })
    }

    /// Parse P_AC_NA_1 into a parameter activation.
    pub fn get_parameter_activation(&mut self) -> Result<ParameterActivationInfo> {
        Ok(ParameterActivationInfo {
            ioa: self.decode_info_obj_addr()?,
            qpa: QualifierOfParameterAct(self.decode_byte()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asdu::testutil::MockConnect;
    use crate::asdu::{Cause, Params, QpmCategory};
    use crate::error::Error;

    fn activation() -> CauseOfTransmission {
        CauseOfTransmission::new(Cause::ACTIVATION)
    }

    #[test]
    fn test_parameter_normal_roundtrip() {
        let c = MockConnect::wide();
        let p = ParameterNormalInfo {
            ioa: 1000,
            value: Normalize(100),
            qpm: QualifierOfParameterMV {
                category: QpmCategory::THRESHOLD,
                is_change: false,
                is_in_operation: false,
            },
        };
        parameter_normal(&c, activation(), 1, p).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_parameter_normal().unwrap(), p);
    }

    #[test]
    fn test_parameter_rejects_deactivation() {
        let c = MockConnect::wide();
        let err = parameter_scaled(
            &c,
            CauseOfTransmission::new(Cause::DEACTIVATION),
            1,
            ParameterScaledInfo {
                ioa: 1,
                value: 0,
                qpm: QualifierOfParameterMV::default(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::CmdCause));
        assert!(c.is_empty());
    }

    #[test]
    fn test_parameter_scaled_roundtrip() {
        let c = MockConnect::wide();
        let p = ParameterScaledInfo {
            ioa: 2000,
            value: -512,
            qpm: QualifierOfParameterMV {
                category: QpmCategory::LOW_LIMIT,
                is_change: true,
                is_in_operation: false,
            },
        };
        parameter_scaled(&c, activation(), 1, p).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_parameter_scaled().unwrap(), p);
    }

    #[test]
    fn test_parameter_float_roundtrip() {
        let c = MockConnect::wide();
        let p = ParameterFloatInfo {
            ioa: 3000,
            value: 0.25,
            qpm: QualifierOfParameterMV::default(),
        };
        parameter_float(&c, activation(), 1, p).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_parameter_float().unwrap(), p);
    }

    #[test]
    fn test_parameter_activation_roundtrip() {
        let c = MockConnect::wide();
        let p = ParameterActivationInfo {
            ioa: 0,
            qpa: QualifierOfParameterAct::PREV_LOADED_PARAMETER,
        };
        parameter_activation(&c, CauseOfTransmission::new(Cause::DEACTIVATION), 1, p).unwrap();

        let raw = c.take_one().to_bytes().unwrap();
        let mut asdu = Asdu::from_bytes(Params::wide(), &raw).unwrap();
        assert_eq!(asdu.get_parameter_activation().unwrap(), p);
    }
}
