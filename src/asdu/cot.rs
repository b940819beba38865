//! Cause of transmission.
//!
//! See companion standard 101, subclass 7.2.3. The COT octet carries the
//! cause in bits 0..5, the P/N (negative confirm) flag in bit 6 and the
//! test flag in bit 7. With a cause size of 2 a second octet carries the
//! originator address.

/// Originator address.
///
/// Only present on the wire when `Params::cause_size` is 2.
/// `<0>`: unused, `<1..255>`: source address.
pub type OriginAddr = u8;

/// Cause of transmission, bits 0..5 of the COT octet.
///
/// `<0>` is undefined, `<1..47>` are standard definitions with reserved
/// gaps, `<48..63>` are for special use. Kept as a transparent byte so
/// private-range causes survive a decode/encode cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cause(pub u8);

impl Cause {
    /// Unused (0)
    pub const UNUSED: Cause = Cause(0);
    /// Periodic, cyclic (1)
    pub const PERIODIC: Cause = Cause(1);
    /// Background scan (2)
    pub const BACKGROUND: Cause = Cause(2);
    /// Spontaneous (3)
    pub const SPONTANEOUS: Cause = Cause(3);
    /// Initialized (4)
    pub const INITIALIZED: Cause = Cause(4);
    /// Request or requested (5)
    pub const REQUEST: Cause = Cause(5);
    /// Activation (6)
    pub const ACTIVATION: Cause = Cause(6);
    /// Activation confirmation (7)
    pub const ACTIVATION_CON: Cause = Cause(7);
    /// Deactivation (8)
    pub const DEACTIVATION: Cause = Cause(8);
    /// Deactivation confirmation (9)
    pub const DEACTIVATION_CON: Cause = Cause(9);
    /// Activation termination (10)
    pub const ACTIVATION_TERM: Cause = Cause(10);
    /// Return information caused by a remote command (11)
    pub const RETURN_INFO_REMOTE: Cause = Cause(11);
    /// Return information caused by a local command (12)
    pub const RETURN_INFO_LOCAL: Cause = Cause(12);
    /// File transfer (13)
    pub const FILE_TRANSFER: Cause = Cause(13);
    /// Authentication (14)
    pub const AUTHENTICATION: Cause = Cause(14);
    /// Maintenance of authentication session key (15)
    pub const SESSION_KEY: Cause = Cause(15);
    /// Maintenance of user role and update key (16)
    pub const USER_ROLE_AND_UPDATE_KEY: Cause = Cause(16);
    /// Interrogated by station interrogation (20)
    pub const INTERROGATED_BY_STATION: Cause = Cause(20);
    /// Interrogated by group 1 interrogation (21)
    pub const INTERROGATED_BY_GROUP1: Cause = Cause(21);
    /// Interrogated by group 16 interrogation (36)
    pub const INTERROGATED_BY_GROUP16: Cause = Cause(36);
    /// Requested by general counter request (37)
    pub const REQUEST_BY_GENERAL_COUNTER: Cause = Cause(37);
    /// Requested by group 1 counter request (38)
    pub const REQUEST_BY_GROUP1_COUNTER: Cause = Cause(38);
    /// Requested by group 4 counter request (41)
    pub const REQUEST_BY_GROUP4_COUNTER: Cause = Cause(41);
    /// Unknown type identification (44)
    pub const UNKNOWN_TYPE_ID: Cause = Cause(44);
    /// Unknown cause of transmission (45)
    pub const UNKNOWN_COT: Cause = Cause(45);
    /// Unknown common address of ASDU (46)
    pub const UNKNOWN_CA: Cause = Cause(46);
    /// Unknown information object address (47)
    pub const UNKNOWN_IOA: Cause = Cause(47);

    /// Check whether this cause is a station/group interrogation response.
    #[inline]
    pub const fn is_interrogation_group(self) -> bool {
        self.0 >= Self::INTERROGATED_BY_STATION.0 && self.0 <= Self::INTERROGATED_BY_GROUP16.0
    }

    /// Check whether this cause is a counter request response.
    #[inline]
    pub const fn is_counter_group(self) -> bool {
        self.0 >= Self::REQUEST_BY_GENERAL_COUNTER.0 && self.0 <= Self::REQUEST_BY_GROUP4_COUNTER.0
    }
}

// Semantics for display, indexed by cause value
const CAUSE_SEMANTICS: [&str; 64] = [
    "Unused0",
    "Periodic",
    "Background",
    "Spontaneous",
    "Initialized",
    "Request",
    "Activation",
    "ActivationCon",
    "Deactivation",
    "DeactivationCon",
    "ActivationTerm",
    "ReturnInfoRemote",
    "ReturnInfoLocal",
    "FileTransfer",
    "Authentication",
    "SessionKey",
    "UserRoleAndUpdateKey",
    "Reserved17",
    "Reserved18",
    "Reserved19",
    "InterrogatedByStation",
    "InterrogatedByGroup1",
    "InterrogatedByGroup2",
    "InterrogatedByGroup3",
    "InterrogatedByGroup4",
    "InterrogatedByGroup5",
    "InterrogatedByGroup6",
    "InterrogatedByGroup7",
    "InterrogatedByGroup8",
    "InterrogatedByGroup9",
    "InterrogatedByGroup10",
    "InterrogatedByGroup11",
    "InterrogatedByGroup12",
    "InterrogatedByGroup13",
    "InterrogatedByGroup14",
    "InterrogatedByGroup15",
    "InterrogatedByGroup16",
    "RequestByGeneralCounter",
    "RequestByGroup1Counter",
    "RequestByGroup2Counter",
    "RequestByGroup3Counter",
    "RequestByGroup4Counter",
    "Reserved42",
    "Reserved43",
    "UnknownTypeID",
    "UnknownCOT",
    "UnknownCA",
    "UnknownIOA",
    "Special48",
    "Special49",
    "Special50",
    "Special51",
    "Special52",
    "Special53",
    "Special54",
    "Special55",
    "Special56",
    "Special57",
    "Special58",
    "Special59",
    "Special60",
    "Special61",
    "Special62",
    "Special63",
];

impl std::fmt::Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", CAUSE_SEMANTICS[(self.0 & 0x3F) as usize])
    }
}

/// Cause of transmission with its test and P/N flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CauseOfTransmission {
    /// The cause itself, bits 0..5
    pub cause: Cause,
    /// P/N flag: negative (or positive) confirmation
    pub is_negative: bool,
    /// Test flag
    pub is_test: bool,
}

impl CauseOfTransmission {
    /// Create a cause of transmission without flags.
    #[inline]
    pub const fn new(cause: Cause) -> Self {
        Self {
            cause,
            is_negative: false,
            is_test: false,
        }
    }

    /// Parse the COT octet.
    #[inline]
    pub const fn from_u8(b: u8) -> Self {
        Self {
            cause: Cause(b & 0x3F),
            is_negative: (b & 0x40) != 0,
            is_test: (b & 0x80) != 0,
        }
    }

    /// Encode to the COT octet.
    #[inline]
    pub const fn as_u8(&self) -> u8 {
        let mut v = self.cause.0 & 0x3F;
        if self.is_negative {
            v |= 0x40;
        }
        if self.is_test {
            v |= 0x80;
        }
        v
    }
}

impl From<Cause> for CauseOfTransmission {
    fn from(cause: Cause) -> Self {
        Self::new(cause)
    }
}

impl std::fmt::Display for CauseOfTransmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "COT<{}", self.cause)?;
        match (self.is_negative, self.is_test) {
            (true, true) => write!(f, ",neg,test")?,
            (true, false) => write!(f, ",neg")?,
            (false, true) => write!(f, ",test")?,
            (false, false) => {}
        }
        write!(f, ">")
    }
}

/// A set of causes a build routine admits: discrete values plus inclusive
/// ranges. The admission rules per type family live here as const data
/// rather than scattered conditionals.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AdmittedCauses {
    causes: &'static [Cause],
    ranges: &'static [(Cause, Cause)],
}

impl AdmittedCauses {
    pub(crate) fn contains(&self, cause: Cause) -> bool {
        self.causes.contains(&cause)
            || self
                .ranges
                .iter()
                .any(|&(lo, hi)| cause.0 >= lo.0 && cause.0 <= hi.0)
    }
}

/// Status-style monitored information without time tag: background scan,
/// spontaneous, requested, command return information, interrogation groups.
pub(crate) const STATUS_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[
        Cause::BACKGROUND,
        Cause::SPONTANEOUS,
        Cause::REQUEST,
        Cause::RETURN_INFO_REMOTE,
        Cause::RETURN_INFO_LOCAL,
    ],
    ranges: &[(Cause::INTERROGATED_BY_STATION, Cause::INTERROGATED_BY_GROUP16)],
};

/// Status-style monitored information with a time tag drops the background
/// scan and interrogation causes.
pub(crate) const STATUS_TIME_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[
        Cause::SPONTANEOUS,
        Cause::REQUEST,
        Cause::RETURN_INFO_REMOTE,
        Cause::RETURN_INFO_LOCAL,
    ],
    ranges: &[],
};

/// Bit strings carry no command return information.
pub(crate) const BITSTRING_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[Cause::BACKGROUND, Cause::SPONTANEOUS, Cause::REQUEST],
    ranges: &[(Cause::INTERROGATED_BY_STATION, Cause::INTERROGATED_BY_GROUP16)],
};

/// Cyclic measurands additionally admit periodic transmission.
pub(crate) const MEASURED_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[
        Cause::PERIODIC,
        Cause::BACKGROUND,
        Cause::SPONTANEOUS,
        Cause::REQUEST,
    ],
    ranges: &[(Cause::INTERROGATED_BY_STATION, Cause::INTERROGATED_BY_GROUP16)],
};

/// Time-tagged measurands and bit strings.
pub(crate) const MEASURED_TIME_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[Cause::SPONTANEOUS, Cause::REQUEST],
    ranges: &[],
};

/// Integrated totals respond to counter requests only.
pub(crate) const INTEGRATED_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[Cause::SPONTANEOUS],
    ranges: &[(Cause::REQUEST_BY_GENERAL_COUNTER, Cause::REQUEST_BY_GROUP4_COUNTER)],
};

/// Protection equipment events are spontaneous only.
pub(crate) const PROTECTION_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[Cause::SPONTANEOUS],
    ranges: &[],
};

/// Commands in the control direction.
pub(crate) const CONTROL_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[Cause::ACTIVATION, Cause::DEACTIVATION],
    ranges: &[],
};

/// Measured value parameters admit activation only.
pub(crate) const PARAMETER_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[Cause::ACTIVATION],
    ranges: &[],
};

/// Parameter activation also admits deactivation.
pub(crate) const PARAMETER_ACT_CAUSES: AdmittedCauses = AdmittedCauses {
    causes: &[Cause::ACTIVATION, Cause::DEACTIVATION],
    ranges: &[],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cot_octet_roundtrip() {
        for raw in 0..=255u8 {
            let cot = CauseOfTransmission::from_u8(raw);
            assert_eq!(cot.as_u8(), raw, "roundtrip failed for {:#04x}", raw);
        }
    }

    #[test]
    fn test_cot_flags() {
        let cot = CauseOfTransmission::from_u8(0x43);
        assert_eq!(cot.cause, Cause::SPONTANEOUS);
        assert!(cot.is_negative);
        assert!(!cot.is_test);

        let cot = CauseOfTransmission::from_u8(0x86);
        assert_eq!(cot.cause, Cause::ACTIVATION);
        assert!(!cot.is_negative);
        assert!(cot.is_test);
    }

    #[test]
    fn test_cause_groups() {
        assert!(Cause::INTERROGATED_BY_STATION.is_interrogation_group());
        assert!(Cause(28).is_interrogation_group());
        assert!(Cause::INTERROGATED_BY_GROUP16.is_interrogation_group());
        assert!(!Cause::SPONTANEOUS.is_interrogation_group());
        assert!(!Cause::REQUEST_BY_GENERAL_COUNTER.is_interrogation_group());

        assert!(Cause::REQUEST_BY_GENERAL_COUNTER.is_counter_group());
        assert!(Cause::REQUEST_BY_GROUP4_COUNTER.is_counter_group());
        assert!(!Cause(42).is_counter_group());
    }

    #[test]
    fn test_cot_display() {
        assert_eq!(
            CauseOfTransmission::new(Cause::SPONTANEOUS).to_string(),
            "COT<Spontaneous>"
        );
        let mut cot = CauseOfTransmission::new(Cause::ACTIVATION_CON);
        cot.is_negative = true;
        assert_eq!(cot.to_string(), "COT<ActivationCon,neg>");
        cot.is_test = true;
        assert_eq!(cot.to_string(), "COT<ActivationCon,neg,test>");
        assert_eq!(Cause(50).to_string(), "Special50");
        assert_eq!(Cause(17).to_string(), "Reserved17");
    }

    #[test]
    fn test_admitted_sets() {
        assert!(STATUS_CAUSES.contains(Cause::BACKGROUND));
        assert!(STATUS_CAUSES.contains(Cause(25)));
        assert!(!STATUS_CAUSES.contains(Cause::PERIODIC));
        assert!(!STATUS_CAUSES.contains(Cause::ACTIVATION));

        assert!(STATUS_TIME_CAUSES.contains(Cause::SPONTANEOUS));
        assert!(!STATUS_TIME_CAUSES.contains(Cause::BACKGROUND));
        assert!(!STATUS_TIME_CAUSES.contains(Cause::INTERROGATED_BY_STATION));

        assert!(MEASURED_CAUSES.contains(Cause::PERIODIC));
        assert!(BITSTRING_CAUSES.contains(Cause::BACKGROUND));
        assert!(!BITSTRING_CAUSES.contains(Cause::RETURN_INFO_REMOTE));

        assert!(INTEGRATED_CAUSES.contains(Cause::SPONTANEOUS));
        assert!(INTEGRATED_CAUSES.contains(Cause::REQUEST_BY_GROUP4_COUNTER));
        assert!(!INTEGRATED_CAUSES.contains(Cause::REQUEST));

        assert!(PROTECTION_CAUSES.contains(Cause::SPONTANEOUS));
        assert!(!PROTECTION_CAUSES.contains(Cause::REQUEST));

        assert!(CONTROL_CAUSES.contains(Cause::ACTIVATION));
        assert!(CONTROL_CAUSES.contains(Cause::DEACTIVATION));
        assert!(!CONTROL_CAUSES.contains(Cause::SPONTANEOUS));

        assert!(PARAMETER_CAUSES.contains(Cause::ACTIVATION));
        assert!(!PARAMETER_CAUSES.contains(Cause::DEACTIVATION));
        assert!(PARAMETER_ACT_CAUSES.contains(Cause::DEACTIVATION));
    }
}
