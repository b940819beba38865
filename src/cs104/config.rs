//! CS-104 tuning parameters.
//!
//! The k/w windows and the t0..t3 timers with their IEC 60870-5-104
//! ranges. Defaults follow the standard: t0 30s, k 12, t1 15s, w 8,
//! t2 10s, t3 20s.

use std::time::Duration;

use crate::error::{Error, Result};

/// IANA registered port for unsecured CS-104.
pub const PORT: u16 = 2404;

/// IANA registered port for secured CS-104.
pub const PORT_SECURE: u16 = 19998;

/// "t0" range [1, 255]s.
pub const CONNECT_TIMEOUT0_MIN: Duration = Duration::from_secs(1);
pub const CONNECT_TIMEOUT0_MAX: Duration = Duration::from_secs(255);

/// "t1" range [1, 255]s. See IEC 60870-5-104, figure 18.
pub const SEND_UNACK_TIMEOUT1_MIN: Duration = Duration::from_secs(1);
pub const SEND_UNACK_TIMEOUT1_MAX: Duration = Duration::from_secs(255);

/// "t2" range [1, 255]s. See IEC 60870-5-104, figure 10.
pub const RECV_UNACK_TIMEOUT2_MIN: Duration = Duration::from_secs(1);
pub const RECV_UNACK_TIMEOUT2_MAX: Duration = Duration::from_secs(255);

/// "t3" range [1 second, 48 hours]. See IEC 60870-5-104, subclass 5.2.
pub const IDLE_TIMEOUT3_MIN: Duration = Duration::from_secs(1);
pub const IDLE_TIMEOUT3_MAX: Duration = Duration::from_secs(48 * 3600);

/// "k" and "w" range [1, 32767]. See IEC 60870-5-104, subclass 5.5.
pub const SEQ_WINDOW_MIN: u16 = 1;
pub const SEQ_WINDOW_MAX: u16 = 32767;

/// CS-104 connection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// "t0": bound on TCP connection establishment, range [1, 255]s.
    pub connect_timeout0: Duration,

    /// "k": upper limit of sent I-frames awaiting acknowledgment; once
    /// reached, transmission stops. Range [1, 32767].
    pub send_unack_limit_k: u16,

    /// "t1": bound on frame acknowledgment; on expiry the connection
    /// closes. Range [1, 255]s.
    pub send_unack_timeout1: Duration,

    /// "w": latest after this many received I-frames an acknowledgment is
    /// issued. Should not exceed two thirds of k. Range [1, 32767].
    pub recv_unack_limit_w: u16,

    /// "t2" (< t1): bound on sending a receipt confirmation. Range [1, 255]s.
    pub recv_unack_timeout2: Duration,

    /// "t3": idle time that triggers a TESTFR keepalive,
    /// range [1 second, 48 hours].
    pub idle_timeout3: Duration,

    /// Whether an ASDU that fails to decode on receive closes the
    /// connection. When false the frame is logged and dropped.
    pub close_on_asdu_error: bool,
}

impl Config {
    /// Check every field against its IEC range.
    pub fn valid(&self) -> Result<()> {
        let in_range = |d: Duration, lo: Duration, hi: Duration| d >= lo && d <= hi;

        if !in_range(self.connect_timeout0, CONNECT_TIMEOUT0_MIN, CONNECT_TIMEOUT0_MAX)
            || !in_range(
                self.send_unack_timeout1,
                SEND_UNACK_TIMEOUT1_MIN,
                SEND_UNACK_TIMEOUT1_MAX,
            )
            || !in_range(
                self.recv_unack_timeout2,
                RECV_UNACK_TIMEOUT2_MIN,
                RECV_UNACK_TIMEOUT2_MAX,
            )
            || !in_range(self.idle_timeout3, IDLE_TIMEOUT3_MIN, IDLE_TIMEOUT3_MAX)
        {
            return Err(Error::Param);
        }

        if !(SEQ_WINDOW_MIN..=SEQ_WINDOW_MAX).contains(&self.send_unack_limit_k)
            || !(SEQ_WINDOW_MIN..=SEQ_WINDOW_MAX).contains(&self.recv_unack_limit_w)
        {
            return Err(Error::Param);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout0: Duration::from_secs(30),
            send_unack_limit_k: 12,
            send_unack_timeout1: Duration::from_secs(15),
            recv_unack_limit_w: 8,
            recv_unack_timeout2: Duration::from_secs(10),
            idle_timeout3: Duration::from_secs(20),
            close_on_asdu_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = Config::default();
        assert!(cfg.valid().is_ok());
        assert_eq!(cfg.connect_timeout0, Duration::from_secs(30));
        assert_eq!(cfg.send_unack_limit_k, 12);
        assert_eq!(cfg.send_unack_timeout1, Duration::from_secs(15));
        assert_eq!(cfg.recv_unack_limit_w, 8);
        assert_eq!(cfg.recv_unack_timeout2, Duration::from_secs(10));
        assert_eq!(cfg.idle_timeout3, Duration::from_secs(20));
    }

    #[test]
    fn test_timer_ranges() {
        let mut cfg = Config::default();
        cfg.send_unack_timeout1 = Duration::from_secs(256);
        assert!(cfg.valid().is_err());

        cfg = Config::default();
        cfg.connect_timeout0 = Duration::ZERO;
        assert!(cfg.valid().is_err());

        cfg = Config::default();
        cfg.idle_timeout3 = Duration::from_secs(49 * 3600);
        assert!(cfg.valid().is_err());

        cfg = Config::default();
        cfg.idle_timeout3 = Duration::from_secs(48 * 3600);
        assert!(cfg.valid().is_ok());
    }

    #[test]
    fn test_window_ranges() {
        let mut cfg = Config::default();
        cfg.send_unack_limit_k = 0;
        assert!(cfg.valid().is_err());

        cfg = Config::default();
        cfg.recv_unack_limit_w = 32768;
        assert!(cfg.valid().is_err());

        cfg = Config::default();
        cfg.send_unack_limit_k = 32767;
        cfg.recv_unack_limit_w = 1;
        assert!(cfg.valid().is_ok());
    }
}
