//! ASDU type identification.
//!
//! See companion standard 101, subclass 7.2.1. Assigned values cover
//! monitoring (1..41), control (45..64), initialization (70), security
//! (81..95, reserved), system control (100..107), parameter (110..113)
//! and file transfer (120..127).

use crate::error::{Error, Result};

/// ASDU type identification.
///
/// Information objects with or without time tag are distinguished by
/// different type identifications, never by a flag inside the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    // ============================================
    // Process information in monitoring direction
    // ============================================
    /// Single-point information (M_SP_NA_1)
    SinglePoint = 1,
    /// Single-point information with time tag (M_SP_TA_1)
    SinglePointTime24 = 2,
    /// Double-point information (M_DP_NA_1)
    DoublePoint = 3,
    /// Double-point information with time tag (M_DP_TA_1)
    DoublePointTime24 = 4,
    /// Step position information (M_ST_NA_1)
    StepPosition = 5,
    /// Step position information with time tag (M_ST_TA_1)
    StepPositionTime24 = 6,
    /// Bitstring of 32 bit (M_BO_NA_1)
    Bitstring32 = 7,
    /// Bitstring of 32 bit with time tag (M_BO_TA_1)
    Bitstring32Time24 = 8,
    /// Measured value, normalized (M_ME_NA_1)
    MeasuredNormalized = 9,
    /// Measured value, normalized with time tag (M_ME_TA_1)
    MeasuredNormalizedTime24 = 10,
    /// Measured value, scaled (M_ME_NB_1)
    MeasuredScaled = 11,
    /// Measured value, scaled with time tag (M_ME_TB_1)
    MeasuredScaledTime24 = 12,
    /// Measured value, short floating point (M_ME_NC_1)
    MeasuredFloat = 13,
    /// Measured value, short floating point with time tag (M_ME_TC_1)
    MeasuredFloatTime24 = 14,
    /// Integrated totals (M_IT_NA_1)
    IntegratedTotals = 15,
    /// Integrated totals with time tag (M_IT_TA_1)
    IntegratedTotalsTime24 = 16,
    /// Event of protection equipment with time tag (M_EP_TA_1)
    ProtectionEventTime24 = 17,
    /// Packed start events of protection equipment with time tag (M_EP_TB_1)
    ProtectionStartEventsTime24 = 18,
    /// Packed output circuit info of protection equipment with time tag (M_EP_TC_1)
    ProtectionOutputCircuitTime24 = 19,
    /// Packed single-point information with status change detection (M_PS_NA_1)
    PackedSinglePointWithScd = 20,
    /// Measured value, normalized without quality descriptor (M_ME_ND_1)
    MeasuredNormalizedNoQuality = 21,

    /// Single-point information with time tag CP56Time2a (M_SP_TB_1)
    SinglePointTime56 = 30,
    /// Double-point information with time tag CP56Time2a (M_DP_TB_1)
    DoublePointTime56 = 31,
    /// Step position information with time tag CP56Time2a (M_ST_TB_1)
    StepPositionTime56 = 32,
    /// Bitstring of 32 bit with time tag CP56Time2a (M_BO_TB_1)
    Bitstring32Time56 = 33,
    /// Measured value, normalized with time tag CP56Time2a (M_ME_TD_1)
    MeasuredNormalizedTime56 = 34,
    /// Measured value, scaled with time tag CP56Time2a (M_ME_TE_1)
    MeasuredScaledTime56 = 35,
    /// Measured value, short floating point with time tag CP56Time2a (M_ME_TF_1)
    MeasuredFloatTime56 = 36,
    /// Integrated totals with time tag CP56Time2a (M_IT_TB_1)
    IntegratedTotalsTime56 = 37,
    /// Event of protection equipment with time tag CP56Time2a (M_EP_TD_1)
    ProtectionEventTime56 = 38,
    /// Packed start events of protection equipment with CP56Time2a (M_EP_TE_1)
    ProtectionStartEventsTime56 = 39,
    /// Packed output circuit info of protection equipment with CP56Time2a (M_EP_TF_1)
    ProtectionOutputCircuitTime56 = 40,
    /// Integrated totals containing time-tagged security statistics (S_IT_TC_1)
    SecurityIntegratedTotals = 41,

    // ============================================
    // Process information in control direction
    // ============================================
    /// Single command (C_SC_NA_1)
    SingleCommand = 45,
    /// Double command (C_DC_NA_1)
    DoubleCommand = 46,
    /// Regulating step command (C_RC_NA_1)
    RegulatingStep = 47,
    /// Set-point command, normalized (C_SE_NA_1)
    SetpointNormalized = 48,
    /// Set-point command, scaled (C_SE_NB_1)
    SetpointScaled = 49,
    /// Set-point command, short floating point (C_SE_NC_1)
    SetpointFloat = 50,
    /// Bitstring of 32 bit command (C_BO_NA_1)
    Bitstring32Command = 51,
    /// Single command with time tag CP56Time2a (C_SC_TA_1)
    SingleCommandTime56 = 58,
    /// Double command with time tag CP56Time2a (C_DC_TA_1)
    DoubleCommandTime56 = 59,
    /// Regulating step command with time tag CP56Time2a (C_RC_TA_1)
    RegulatingStepTime56 = 60,
    /// Set-point command, normalized, with time tag CP56Time2a (C_SE_TA_1)
    SetpointNormalizedTime56 = 61,
    /// Set-point command, scaled, with time tag CP56Time2a (C_SE_TB_1)
    SetpointScaledTime56 = 62,
    /// Set-point command, short floating point, with time tag CP56Time2a (C_SE_TC_1)
    SetpointFloatTime56 = 63,
    /// Bitstring of 32 bit command with time tag CP56Time2a (C_BO_TA_1)
    Bitstring32CommandTime56 = 64,

    // ============================================
    // System information in monitoring direction
    // ============================================
    /// End of initialization (M_EI_NA_1)
    EndOfInit = 70,

    // ============================================
    // Security (reserved; no processing specified)
    // ============================================
    /// Authentication challenge (S_CH_NA_1)
    AuthChallenge = 81,
    /// Authentication reply (S_RP_NA_1)
    AuthReply = 82,
    /// Aggressive mode authentication request (S_AR_NA_1)
    AuthAggressiveRequest = 83,
    /// Session key status request (S_KR_NA_1)
    SessionKeyStatusRequest = 84,
    /// Session key status (S_KS_NA_1)
    SessionKeyStatus = 85,
    /// Session key change (S_KC_NA_1)
    SessionKeyChange = 86,
    /// Authentication error (S_ER_NA_1)
    AuthError = 87,
    /// User status change (S_US_NA_1)
    UserStatusChange = 90,
    /// Update key change request (S_UQ_NA_1)
    UpdateKeyChangeRequest = 91,
    /// Update key change reply (S_UR_NA_1)
    UpdateKeyChangeReply = 92,
    /// Update key change, symmetric (S_UK_NA_1)
    UpdateKeyChangeSymmetric = 93,
    /// Update key change, asymmetric (S_UA_NA_1)
    UpdateKeyChangeAsymmetric = 94,
    /// Update key change confirmation (S_UC_NA_1)
    UpdateKeyChangeConfirm = 95,

    // ============================================
    // System information in control direction
    // ============================================
    /// Interrogation command (C_IC_NA_1)
    InterrogationCommand = 100,
    /// Counter interrogation command (C_CI_NA_1)
    CounterInterrogation = 101,
    /// Read command (C_RD_NA_1)
    ReadCommand = 102,
    /// Clock synchronization command (C_CS_NA_1)
    ClockSync = 103,
    /// Test command (C_TS_NA_1)
    TestCommand = 104,
    /// Reset process command (C_RP_NA_1)
    ResetProcess = 105,
    /// Delay acquisition command (C_CD_NA_1)
    DelayAcquire = 106,
    /// Test command with time tag CP56Time2a (C_TS_TA_1)
    TestCommandTime56 = 107,

    // ============================================
    // Parameter in control direction
    // ============================================
    /// Parameter of measured value, normalized (P_ME_NA_1)
    ParameterNormalized = 110,
    /// Parameter of measured value, scaled (P_ME_NB_1)
    ParameterScaled = 111,
    /// Parameter of measured value, short floating point (P_ME_NC_1)
    ParameterFloat = 112,
    /// Parameter activation (P_AC_NA_1)
    ParameterActivation = 113,

    // ============================================
    // File transfer (identifiers reserved; payload semantics out of scope)
    // ============================================
    /// File ready (F_FR_NA_1)
    FileReady = 120,
    /// Section ready (F_SR_NA_1)
    SectionReady = 121,
    /// Call directory, select file, call file, call section (F_SC_NA_1)
    CallFile = 122,
    /// Last section, last segment (F_LS_NA_1)
    LastSection = 123,
    /// Ack file, ack section (F_AF_NA_1)
    AckFile = 124,
    /// Segment (F_SG_NA_1); the only variable-size information object
    FileSegment = 125,
    /// Directory (F_DR_TA_1)
    Directory = 126,
    /// Query log, request archive file (F_SC_NB_1)
    QueryLog = 127,
}

impl TypeId {
    /// Create a TypeId from its raw byte value.
    pub fn from_u8(value: u8) -> Result<Self> {
        let id = match value {
            1 => Self::SinglePoint,
            2 => Self::SinglePointTime24,
            3 => Self::DoublePoint,
            4 => Self::DoublePointTime24,
            5 => Self::StepPosition,
            6 => Self::StepPositionTime24,
            7 => Self::Bitstring32,
            8 => Self::Bitstring32Time24,
            9 => Self::MeasuredNormalized,
            10 => Self::MeasuredNormalizedTime24,
            11 => Self::MeasuredScaled,
            12 => Self::MeasuredScaledTime24,
            13 => Self::MeasuredFloat,
            14 => Self::MeasuredFloatTime24,
            15 => Self::IntegratedTotals,
            16 => Self::IntegratedTotalsTime24,
            17 => Self::ProtectionEventTime24,
            18 => Self::ProtectionStartEventsTime24,
            19 => Self::ProtectionOutputCircuitTime24,
            20 => Self::PackedSinglePointWithScd,
            21 => Self::MeasuredNormalizedNoQuality,
            30 => Self::SinglePointTime56,
            31 => Self::DoublePointTime56,
            32 => Self::StepPositionTime56,
            33 => Self::Bitstring32Time56,
            34 => Self::MeasuredNormalizedTime56,
            35 => Self::MeasuredScaledTime56,
            36 => Self::MeasuredFloatTime56,
            37 => Self::IntegratedTotalsTime56,
            38 => Self::ProtectionEventTime56,
            39 => Self::ProtectionStartEventsTime56,
            40 => Self::ProtectionOutputCircuitTime56,
            41 => Self::SecurityIntegratedTotals,
            45 => Self::SingleCommand,
            46 => Self::DoubleCommand,
            47 => Self::RegulatingStep,
            48 => Self::SetpointNormalized,
            49 => Self::SetpointScaled,
            50 => Self::SetpointFloat,
            51 => Self::Bitstring32Command,
            58 => Self::SingleCommandTime56,
            59 => Self::DoubleCommandTime56,
            60 => Self::RegulatingStepTime56,
            61 => Self::SetpointNormalizedTime56,
            62 => Self::SetpointScaledTime56,
            63 => Self::SetpointFloatTime56,
            64 => Self::Bitstring32CommandTime56,
            70 => Self::EndOfInit,
            81 => Self::AuthChallenge,
            82 => Self::AuthReply,
            83 => Self::AuthAggressiveRequest,
            84 => Self::SessionKeyStatusRequest,
            85 => Self::SessionKeyStatus,
            86 => Self::SessionKeyChange,
            87 => Self::AuthError,
            90 => Self::UserStatusChange,
            91 => Self::UpdateKeyChangeRequest,
            92 => Self::UpdateKeyChangeReply,
            93 => Self::UpdateKeyChangeSymmetric,
            94 => Self::UpdateKeyChangeAsymmetric,
            95 => Self::UpdateKeyChangeConfirm,
            100 => Self::InterrogationCommand,
            101 => Self::CounterInterrogation,
            102 => Self::ReadCommand,
            103 => Self::ClockSync,
            104 => Self::TestCommand,
            105 => Self::ResetProcess,
            106 => Self::DelayAcquire,
            107 => Self::TestCommandTime56,
            110 => Self::ParameterNormalized,
            111 => Self::ParameterScaled,
            112 => Self::ParameterFloat,
            113 => Self::ParameterActivation,
            120 => Self::FileReady,
            121 => Self::SectionReady,
            122 => Self::CallFile,
            123 => Self::LastSection,
            124 => Self::AckFile,
            125 => Self::FileSegment,
            126 => Self::Directory,
            127 => Self::QueryLog,
            _ => return Err(Error::TypeIdentifier(value)),
        };
        Ok(id)
    }

    /// Convert to the raw byte value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Serial octet size of one information object of this type, excluding
    /// the information object address.
    ///
    /// Returns an error for types whose object size is not fixed
    /// (F_SG_NA_1) or not defined (security range).
    pub fn info_obj_size(self) -> Result<usize> {
        let size = match self {
            Self::SinglePoint => 1,
            Self::SinglePointTime24 => 4,
            Self::DoublePoint => 1,
            Self::DoublePointTime24 => 4,
            Self::StepPosition => 2,
            Self::StepPositionTime24 => 5,
            Self::Bitstring32 => 5,
            Self::Bitstring32Time24 => 8,
            Self::MeasuredNormalized => 3,
            Self::MeasuredNormalizedTime24 => 6,
            Self::MeasuredScaled => 3,
            Self::MeasuredScaledTime24 => 6,
            Self::MeasuredFloat => 5,
            Self::MeasuredFloatTime24 => 8,
            Self::IntegratedTotals => 5,
            Self::IntegratedTotalsTime24 => 8,
            Self::ProtectionEventTime24 => 6,
            Self::ProtectionStartEventsTime24 => 7,
            Self::ProtectionOutputCircuitTime24 => 7,
            Self::PackedSinglePointWithScd => 5,
            Self::MeasuredNormalizedNoQuality => 2,

            Self::SinglePointTime56 => 8,
            Self::DoublePointTime56 => 8,
            Self::StepPositionTime56 => 9,
            Self::Bitstring32Time56 => 12,
            Self::MeasuredNormalizedTime56 => 10,
            Self::MeasuredScaledTime56 => 10,
            Self::MeasuredFloatTime56 => 12,
            Self::IntegratedTotalsTime56 => 12,
            Self::ProtectionEventTime56 => 11,
            Self::ProtectionStartEventsTime56 => 11,
            Self::ProtectionOutputCircuitTime56 => 11,

            Self::SingleCommand => 1,
            Self::DoubleCommand => 1,
            Self::RegulatingStep => 1,
            Self::SetpointNormalized => 3,
            Self::SetpointScaled => 3,
            Self::SetpointFloat => 5,
            Self::Bitstring32Command => 4,
            Self::SingleCommandTime56 => 8,
            Self::DoubleCommandTime56 => 8,
            Self::RegulatingStepTime56 => 8,
            Self::SetpointNormalizedTime56 => 10,
            Self::SetpointScaledTime56 => 10,
            Self::SetpointFloatTime56 => 12,
            Self::Bitstring32CommandTime56 => 11,

            Self::EndOfInit => 1,

            Self::InterrogationCommand => 1,
            Self::CounterInterrogation => 1,
            Self::ReadCommand => 0,
            Self::ClockSync => 7,
            Self::TestCommand => 2,
            Self::ResetProcess => 1,
            Self::DelayAcquire => 2,
            Self::TestCommandTime56 => 9,

            Self::ParameterNormalized => 3,
            Self::ParameterScaled => 3,
            Self::ParameterFloat => 5,
            Self::ParameterActivation => 1,

            Self::FileReady => 6,
            Self::SectionReady => 7,
            Self::CallFile => 4,
            Self::LastSection => 5,
            Self::AckFile => 4,
            Self::Directory => 13,

            // Variable-size or undefined object layouts
            Self::FileSegment
            | Self::SecurityIntegratedTotals
            | Self::AuthChallenge
            | Self::AuthReply
            | Self::AuthAggressiveRequest
            | Self::SessionKeyStatusRequest
            | Self::SessionKeyStatus
            | Self::SessionKeyChange
            | Self::AuthError
            | Self::UserStatusChange
            | Self::UpdateKeyChangeRequest
            | Self::UpdateKeyChangeReply
            | Self::UpdateKeyChangeSymmetric
            | Self::UpdateKeyChangeAsymmetric
            | Self::UpdateKeyChangeConfirm
            | Self::QueryLog => return Err(Error::TypeIdentifier(self.as_u8())),
        };
        Ok(size)
    }

    /// Check if this type travels in the monitoring direction.
    #[inline]
    pub const fn is_monitoring(self) -> bool {
        matches!(self.as_u8(), 1..=41 | 70)
    }

    /// Check if this type travels in the control direction.
    #[inline]
    pub const fn is_control(self) -> bool {
        matches!(self.as_u8(), 45..=64 | 100..=107 | 110..=113)
    }

    /// The IEC standard name, e.g. "M_SP_NA_1".
    pub const fn standard_name(self) -> &'static str {
        match self {
            Self::SinglePoint => "M_SP_NA_1",
            Self::SinglePointTime24 => "M_SP_TA_1",
            Self::DoublePoint => "M_DP_NA_1",
            Self::DoublePointTime24 => "M_DP_TA_1",
            Self::StepPosition => "M_ST_NA_1",
            Self::StepPositionTime24 => "M_ST_TA_1",
            Self::Bitstring32 => "M_BO_NA_1",
            Self::Bitstring32Time24 => "M_BO_TA_1",
            Self::MeasuredNormalized => "M_ME_NA_1",
            Self::MeasuredNormalizedTime24 => "M_ME_TA_1",
            Self::MeasuredScaled => "M_ME_NB_1",
            Self::MeasuredScaledTime24 => "M_ME_TB_1",
            Self::MeasuredFloat => "M_ME_NC_1",
            Self::MeasuredFloatTime24 => "M_ME_TC_1",
            Self::IntegratedTotals => "M_IT_NA_1",
            Self::IntegratedTotalsTime24 => "M_IT_TA_1",
            Self::ProtectionEventTime24 => "M_EP_TA_1",
            Self::ProtectionStartEventsTime24 => "M_EP_TB_1",
            Self::ProtectionOutputCircuitTime24 => "M_EP_TC_1",
            Self::PackedSinglePointWithScd => "M_PS_NA_1",
            Self::MeasuredNormalizedNoQuality => "M_ME_ND_1",
            Self::SinglePointTime56 => "M_SP_TB_1",
            Self::DoublePointTime56 => "M_DP_TB_1",
            Self::StepPositionTime56 => "M_ST_TB_1",
            Self::Bitstring32Time56 => "M_BO_TB_1",
            Self::MeasuredNormalizedTime56 => "M_ME_TD_1",
            Self::MeasuredScaledTime56 => "M_ME_TE_1",
            Self::MeasuredFloatTime56 => "M_ME_TF_1",
            Self::IntegratedTotalsTime56 => "M_IT_TB_1",
            Self::ProtectionEventTime56 => "M_EP_TD_1",
            Self::ProtectionStartEventsTime56 => "M_EP_TE_1",
            Self::ProtectionOutputCircuitTime56 => "M_EP_TF_1",
            Self::SecurityIntegratedTotals => "S_IT_TC_1",
            Self::SingleCommand => "C_SC_NA_1",
            Self::DoubleCommand => "C_DC_NA_1",
            Self::RegulatingStep => "C_RC_NA_1",
            Self::SetpointNormalized => "C_SE_NA_1",
            Self::SetpointScaled => "C_SE_NB_1",
            Self::SetpointFloat => "C_SE_NC_1",
            Self::Bitstring32Command => "C_BO_NA_1",
            Self::SingleCommandTime56 => "C_SC_TA_1",
            Self::DoubleCommandTime56 => "C_DC_TA_1",
            Self::RegulatingStepTime56 => "C_RC_TA_1",
            Self::SetpointNormalizedTime56 => "C_SE_TA_1",
            Self::SetpointScaledTime56 => "C_SE_TB_1",
            Self::SetpointFloatTime56 => "C_SE_TC_1",
            Self::Bitstring32CommandTime56 => "C_BO_TA_1",
            Self::EndOfInit => "M_EI_NA_1",
            Self::AuthChallenge => "S_CH_NA_1",
            Self::AuthReply => "S_RP_NA_1",
            Self::AuthAggressiveRequest => "S_AR_NA_1",
            Self::SessionKeyStatusRequest => "S_KR_NA_1",
            Self::SessionKeyStatus => "S_KS_NA_1",
            Self::SessionKeyChange => "S_KC_NA_1",
            Self::AuthError => "S_ER_NA_1",
            Self::UserStatusChange => "S_US_NA_1",
            Self::UpdateKeyChangeRequest => "S_UQ_NA_1",
            Self::UpdateKeyChangeReply => "S_UR_NA_1",
            Self::UpdateKeyChangeSymmetric => "S_UK_NA_1",
            Self::UpdateKeyChangeAsymmetric => "S_UA_NA_1",
            Self::UpdateKeyChangeConfirm => "S_UC_NA_1",
            Self::InterrogationCommand => "C_IC_NA_1",
            Self::CounterInterrogation => "C_CI_NA_1",
            Self::ReadCommand => "C_RD_NA_1",
            Self::ClockSync => "C_CS_NA_1",
            Self::TestCommand => "C_TS_NA_1",
            Self::ResetProcess => "C_RP_NA_1",
            Self::DelayAcquire => "C_CD_NA_1",
            Self::TestCommandTime56 => "C_TS_TA_1",
            Self::ParameterNormalized => "P_ME_NA_1",
            Self::ParameterScaled => "P_ME_NB_1",
            Self::ParameterFloat => "P_ME_NC_1",
            Self::ParameterActivation => "P_AC_NA_1",
            Self::FileReady => "F_FR_NA_1",
            Self::SectionReady => "F_SR_NA_1",
            Self::CallFile => "F_SC_NA_1",
            Self::LastSection => "F_LS_NA_1",
            Self::AckFile => "F_AF_NA_1",
            Self::FileSegment => "F_SG_NA_1",
            Self::Directory => "F_DR_TA_1",
            Self::QueryLog => "F_SC_NB_1",
        }
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.standard_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_roundtrip_all_assigned() {
        let assigned: Vec<u8> = (1..=21)
            .chain(30..=41)
            .chain(45..=51)
            .chain(58..=64)
            .chain(std::iter::once(70))
            .chain(81..=87)
            .chain(90..=95)
            .chain(100..=107)
            .chain(110..=113)
            .chain(120..=127)
            .collect();

        for val in assigned {
            let id = TypeId::from_u8(val).unwrap();
            assert_eq!(id.as_u8(), val, "roundtrip failed for {}", val);
        }
    }

    #[test]
    fn test_from_u8_rejects_gaps() {
        for val in [0, 22, 29, 42, 44, 52, 57, 65, 69, 71, 80, 88, 89, 96, 99, 108, 114, 119, 128, 255] {
            assert!(TypeId::from_u8(val).is_err(), "expected error for {}", val);
        }
    }

    #[test]
    fn test_info_obj_sizes() {
        assert_eq!(TypeId::SinglePoint.info_obj_size().unwrap(), 1);
        assert_eq!(TypeId::SinglePointTime24.info_obj_size().unwrap(), 4);
        assert_eq!(TypeId::SinglePointTime56.info_obj_size().unwrap(), 8);
        assert_eq!(TypeId::StepPosition.info_obj_size().unwrap(), 2);
        assert_eq!(TypeId::MeasuredNormalized.info_obj_size().unwrap(), 3);
        assert_eq!(TypeId::MeasuredNormalizedNoQuality.info_obj_size().unwrap(), 2);
        assert_eq!(TypeId::MeasuredFloat.info_obj_size().unwrap(), 5);
        assert_eq!(TypeId::MeasuredFloatTime56.info_obj_size().unwrap(), 12);
        assert_eq!(TypeId::IntegratedTotals.info_obj_size().unwrap(), 5);
        assert_eq!(TypeId::ProtectionEventTime24.info_obj_size().unwrap(), 6);
        assert_eq!(TypeId::ProtectionEventTime56.info_obj_size().unwrap(), 11);
        assert_eq!(TypeId::ReadCommand.info_obj_size().unwrap(), 0);
        assert_eq!(TypeId::ClockSync.info_obj_size().unwrap(), 7);
        assert_eq!(TypeId::Directory.info_obj_size().unwrap(), 13);
    }

    #[test]
    fn test_info_obj_size_undefined() {
        // The segment type is the only assigned type with a variable size
        assert!(TypeId::FileSegment.info_obj_size().is_err());
        // Security range has no defined object layout here
        assert!(TypeId::AuthChallenge.info_obj_size().is_err());
        assert!(TypeId::SecurityIntegratedTotals.info_obj_size().is_err());
    }

    #[test]
    fn test_direction() {
        assert!(TypeId::SinglePoint.is_monitoring());
        assert!(!TypeId::SinglePoint.is_control());
        assert!(TypeId::SingleCommand.is_control());
        assert!(TypeId::InterrogationCommand.is_control());
        assert!(TypeId::ParameterActivation.is_control());
        assert!(TypeId::EndOfInit.is_monitoring());
    }

    #[test]
    fn test_standard_names() {
        assert_eq!(TypeId::SinglePoint.to_string(), "M_SP_NA_1");
        assert_eq!(TypeId::StepPositionTime56.to_string(), "M_ST_TB_1");
        assert_eq!(TypeId::MeasuredFloat.to_string(), "M_ME_NC_1");
        assert_eq!(TypeId::SingleCommand.to_string(), "C_SC_NA_1");
        assert_eq!(TypeId::DelayAcquire.to_string(), "C_CD_NA_1");
        assert_eq!(TypeId::ParameterFloat.to_string(), "P_ME_NC_1");
        assert_eq!(TypeId::FileSegment.to_string(), "F_SG_NA_1");
    }
}
