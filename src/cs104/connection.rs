//! The CS-104 link engine.
//!
//! One engine instance drives one TCP connection as three cooperative
//! tasks: a reader (drains the transport, updates sequence state, delivers
//! ASDUs), a writer (drains the outbound queue) and a timer driver (checks
//! the t1/t2/t3 deadlines held in the link state). Every state-mutating
//! path - receive, submit, timer - serializes on one per-connection mutex,
//! and the mutex is never held across an await point.
//!
//! A client enters PendingStart right after the TCP connect by sending
//! STARTDT act; a server starts in Stopped and answers the peer's U
//! requests. Only I-frames are gated on the Started state, S- and U-frames
//! are legal in any state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, timeout, Instant};
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::asdu::{Asdu, Connect, Params};
use crate::cs104::apci::{Apci, UFunction};
use crate::cs104::codec::{Apdu, ApduCodec};
use crate::cs104::config::Config;
use crate::error::{Error, Result};

/// Outbound queue depth shared by application submits and the engine's own
/// S/U traffic.
const SEND_QUEUE_DEPTH: usize = 64;

/// Event queue depth towards the application.
const EVENT_QUEUE_DEPTH: usize = 64;

/// Timer driver resolution.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Difference of two 15-bit sequence numbers, `(a - b) mod 2^15`.
#[inline]
pub(crate) fn seq_diff(a: u16, b: u16) -> u16 {
    a.wrapping_sub(b) & 0x7FFF
}

/// Which end of the connection this engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Controlling station (master): connects and activates data transfer.
    Client,
    /// Controlled station (slave): answers activation requests.
    Server,
}

/// Data-transfer activation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtState {
    Stopped,
    PendingStart,
    Started,
    PendingStop,
}

/// Why a connection closed. Surfaced once through [`Event::Closed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// An I-frame arrived with an unexpected send sequence number, or an
    /// acknowledgment outside the send window
    SeqError,
    /// t1 expired on an outstanding I-frame or U activation
    AckTimeout,
    /// The frame layer saw bytes it could not parse
    MalformedFrame,
    /// A received ASDU failed to decode and the configuration treats that
    /// as fatal
    AsduError,
    /// The transport failed
    Io(String),
    /// The peer shut the transport down
    PeerClosed,
    /// The application asked for the close
    LocalClose,
}

/// Events delivered to the application.
#[derive(Debug, Clone)]
pub enum Event {
    /// Data transfer activated (STARTDT handshake completed)
    DataTransferStarted,
    /// Data transfer deactivated
    DataTransferStopped,
    /// A decoded ASDU arrived
    Asdu {
        received_at: DateTime<Utc>,
        asdu: Asdu,
    },
    /// The connection is gone; no further events follow
    Closed(CloseReason),
}

/// Observability snapshot of the sequence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatus {
    pub dt_state: DtState,
    pub send_sn: u16,
    pub ack_sn: u16,
    pub recv_sn: u16,
    pub ack_recv_sn: u16,
    /// Sent I-frames not yet acknowledged by the peer
    pub pending: usize,
}

struct SeqPending {
    sn: u16,
    sent_at: Instant,
}

struct LinkState {
    dt_state: DtState,
    send_sn: u16,
    ack_sn: u16,
    recv_sn: u16,
    ack_recv_sn: u16,
    pending: VecDeque<SeqPending>,
    /// Armed while received I-frames await our acknowledgment
    t2_since: Option<Instant>,
    /// Outstanding U activations awaiting their confirmation (t1 applies)
    start_pending: Option<Instant>,
    stop_pending: Option<Instant>,
    test_pending: Option<Instant>,
    /// Last time any frame arrived (t3 basis)
    last_frame_at: Instant,
    closed: bool,
}

impl LinkState {
    fn new() -> Self {
        Self {
            dt_state: DtState::Stopped,
            send_sn: 0,
            ack_sn: 0,
            recv_sn: 0,
            ack_recv_sn: 0,
            pending: VecDeque::new(),
            t2_since: None,
            start_pending: None,
            stop_pending: None,
            test_pending: None,
            last_frame_at: Instant::now(),
            closed: false,
        }
    }
}

struct Shared {
    role: Role,
    cfg: Config,
    params: Params,
    state: Mutex<LinkState>,
    out_tx: mpsc::Sender<Apdu>,
    event_tx: mpsc::Sender<Event>,
    shutdown_tx: watch::Sender<bool>,
}

/// A running CS-104 connection.
///
/// Implements [`Connect`], so the typed builders in [`crate::asdu`] submit
/// straight to it. Events arrive on the receiver returned by
/// [`Connection::subscribe`].
pub struct Connection {
    shared: Arc<Shared>,
    event_rx: Option<mpsc::Receiver<Event>>,
}

impl Connection {
    /// Connect to a server and activate data transfer.
    ///
    /// The TCP establishment is bounded by t0; on expiry the attempt fails
    /// with [`Error::ConnectTimeout`]. STARTDT act goes out immediately
    /// after the connect and the engine enters PendingStart.
    pub async fn connect<A: ToSocketAddrs>(addr: A, cfg: Config, params: Params) -> Result<Self> {
        cfg.valid()?;
        params.valid()?;
        let stream = timeout(cfg.connect_timeout0, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::ConnectTimeout)??;
        stream.set_nodelay(true).ok();
        Self::attach(stream, Role::Client, cfg, params)
    }

    /// Run the engine over an accepted stream in the server role.
    pub fn accept<T>(stream: T, cfg: Config, params: Params) -> Result<Self>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        Self::attach(stream, Role::Server, cfg, params)
    }

    /// Run the engine over an arbitrary byte-stream transport.
    ///
    /// The transport becomes engine-owned; it is closed when the
    /// connection closes.
    pub fn attach<T>(stream: T, role: Role, cfg: Config, params: Params) -> Result<Self>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        cfg.valid()?;
        params.valid()?;

        let (sink, source) = Framed::new(stream, ApduCodec::new()).split();
        let (out_tx, out_rx) = mpsc::channel(SEND_QUEUE_DEPTH);
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (shutdown_tx, _) = watch::channel(false);

        let mut state = LinkState::new();
        if role == Role::Client {
            state.dt_state = DtState::PendingStart;
            state.start_pending = Some(Instant::now());
            out_tx
                .try_send(Apdu::u_frame(UFunction::StartDtAct))
                .map_err(|_| Error::SendBusy)?;
        }

        let shared = Arc::new(Shared {
            role,
            cfg,
            params,
            state: Mutex::new(state),
            out_tx,
            event_tx,
            shutdown_tx,
        });

        tokio::spawn(writer_task(shared.clone(), sink, out_rx));
        tokio::spawn(reader_task(shared.clone(), source));
        tokio::spawn(timer_task(shared.clone()));

        Ok(Self {
            shared,
            event_rx: Some(event_rx),
        })
    }

    /// Take the event receiver. Returns `None` on the second call.
    pub fn subscribe(&mut self) -> Option<mpsc::Receiver<Event>> {
        self.event_rx.take()
    }

    /// Request data transfer activation (client role).
    pub fn start_dt(&self) -> Result<()> {
        if self.shared.role != Role::Client {
            return Err(Error::Param);
        }
        let mut st = self.shared.state.lock().expect("link state poisoned");
        if st.closed {
            return Err(Error::ConnectionClosed);
        }
        st.dt_state = DtState::PendingStart;
        st.start_pending = Some(Instant::now());
        drop(st);
        self.shared
            .out_tx
            .try_send(Apdu::u_frame(UFunction::StartDtAct))
            .map_err(|_| Error::SendBusy)
    }

    /// Request data transfer deactivation (client role).
    pub fn stop_dt(&self) -> Result<()> {
        if self.shared.role != Role::Client {
            return Err(Error::Param);
        }
        let mut st = self.shared.state.lock().expect("link state poisoned");
        if st.closed {
            return Err(Error::ConnectionClosed);
        }
        st.dt_state = DtState::PendingStop;
        st.stop_pending = Some(Instant::now());
        drop(st);
        self.shared
            .out_tx
            .try_send(Apdu::u_frame(UFunction::StopDtAct))
            .map_err(|_| Error::SendBusy)
    }

    /// Snapshot of the sequence windows and activation state.
    pub fn link_status(&self) -> LinkStatus {
        let st = self.shared.state.lock().expect("link state poisoned");
        LinkStatus {
            dt_state: st.dt_state,
            send_sn: st.send_sn,
            ack_sn: st.ack_sn,
            recv_sn: st.recv_sn,
            ack_recv_sn: st.ack_recv_sn,
            pending: st.pending.len(),
        }
    }

    /// Whether the connection is gone.
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().expect("link state poisoned").closed
    }

    /// Close the connection locally. Idempotent.
    pub async fn close(&self) {
        self.shared.close(CloseReason::LocalClose).await;
    }
}

impl Connect for Connection {
    fn params(&self) -> Params {
        self.shared.params
    }

    /// Allocate a send sequence number and queue an I-frame.
    ///
    /// Backpressure: fails with [`Error::SendBusy`] while data transfer is
    /// not active, while k sent frames await acknowledgment, or while the
    /// outbound queue is full. Sending an I-frame also acknowledges
    /// everything received so far (the piggyback in the receive field).
    fn send(&self, asdu: Asdu) -> Result<()> {
        let raw = asdu.to_bytes()?;

        let mut st = self.shared.state.lock().expect("link state poisoned");
        if st.closed {
            return Err(Error::ConnectionClosed);
        }
        if st.dt_state != DtState::Started {
            return Err(Error::SendBusy);
        }
        if seq_diff(st.send_sn, st.ack_sn) >= self.shared.cfg.send_unack_limit_k {
            return Err(Error::SendBusy);
        }

        let apdu = Apdu::i_frame(st.send_sn, st.recv_sn, raw.into());
        self.shared
            .out_tx
            .try_send(apdu)
            .map_err(|_| Error::SendBusy)?;

        let sn = st.send_sn;
        st.pending.push_back(SeqPending {
            sn,
            sent_at: Instant::now(),
        });
        st.send_sn = (st.send_sn + 1) & 0x7FFF;
        st.ack_recv_sn = st.recv_sn;
        st.t2_since = None;
        Ok(())
    }
}

impl Shared {
    async fn close(&self, reason: CloseReason) {
        {
            let mut st = self.state.lock().expect("link state poisoned");
            if st.closed {
                return;
            }
            st.closed = true;
            st.dt_state = DtState::Stopped;
        }
        debug!(?reason, "closing connection");
        let _ = self.shutdown_tx.send(true);
        let _ = self.event_tx.send(Event::Closed(reason)).await;
    }

    /// Sweep the pending list up to the peer's acknowledgment.
    fn ack_sweep(&self, st: &mut LinkState, ack: u16) -> std::result::Result<(), CloseReason> {
        if seq_diff(ack, st.ack_sn) > seq_diff(st.send_sn, st.ack_sn) {
            warn!(ack, send_sn = st.send_sn, ack_sn = st.ack_sn, "ack outside send window");
            return Err(CloseReason::SeqError);
        }
        while let Some(front) = st.pending.front() {
            if seq_diff(ack, front.sn) >= 1 {
                st.pending.pop_front();
            } else {
                break;
            }
        }
        st.ack_sn = ack;
        Ok(())
    }

    /// Process one received frame. Returns the close reason on a fatal
    /// condition.
    async fn handle_apdu(&self, apdu: Apdu) -> std::result::Result<(), CloseReason> {
        let mut to_send: Vec<Apdu> = Vec::new();
        let mut events: Vec<Event> = Vec::new();

        {
            let mut st = self.state.lock().expect("link state poisoned");
            st.last_frame_at = Instant::now();

            match apdu.apci {
                Apci::I { send_sn, recv_sn } => {
                    if send_sn != st.recv_sn {
                        warn!(
                            expected = st.recv_sn,
                            actual = send_sn,
                            "I-frame sequence mismatch"
                        );
                        return Err(CloseReason::SeqError);
                    }
                    st.recv_sn = (st.recv_sn + 1) & 0x7FFF;
                    self.ack_sweep(&mut st, recv_sn)?;

                    if seq_diff(st.recv_sn, st.ack_recv_sn) >= self.cfg.recv_unack_limit_w {
                        to_send.push(Apdu::s_frame(st.recv_sn));
                        st.ack_recv_sn = st.recv_sn;
                        st.t2_since = None;
                    } else if st.t2_since.is_none() {
                        st.t2_since = Some(Instant::now());
                    }

                    let raw = apdu.asdu.unwrap_or_default();
                    match Asdu::from_bytes(self.params, &raw) {
                        Ok(asdu) => events.push(Event::Asdu {
                            received_at: Utc::now(),
                            asdu,
                        }),
                        Err(e) => {
                            warn!(error = %e, "dropping undecodable ASDU");
                            if self.cfg.close_on_asdu_error {
                                return Err(CloseReason::AsduError);
                            }
                        }
                    }
                }

                Apci::S { recv_sn } => {
                    self.ack_sweep(&mut st, recv_sn)?;
                }

                Apci::U { function } => match function {
                    UFunction::StartDtAct => {
                        if self.role == Role::Server {
                            if st.dt_state != DtState::Started {
                                events.push(Event::DataTransferStarted);
                            }
                            st.dt_state = DtState::Started;
                            to_send.push(Apdu::u_frame(UFunction::StartDtCon));
                        }
                    }
                    UFunction::StartDtCon => {
                        if self.role == Role::Client && st.dt_state == DtState::PendingStart {
                            st.dt_state = DtState::Started;
                            st.start_pending = None;
                            events.push(Event::DataTransferStarted);
                        }
                    }
                    UFunction::StopDtAct => {
                        if self.role == Role::Server {
                            if st.dt_state == DtState::Started {
                                events.push(Event::DataTransferStopped);
                            }
                            st.dt_state = DtState::Stopped;
                            to_send.push(Apdu::u_frame(UFunction::StopDtCon));
                        }
                    }
                    UFunction::StopDtCon => {
                        if self.role == Role::Client && st.dt_state == DtState::PendingStop {
                            st.dt_state = DtState::Stopped;
                            st.stop_pending = None;
                            events.push(Event::DataTransferStopped);
                        }
                    }
                    UFunction::TestFrAct => {
                        to_send.push(Apdu::u_frame(UFunction::TestFrCon));
                    }
                    UFunction::TestFrCon => {
                        st.test_pending = None;
                    }
                },
            }
        }

        for apdu in to_send {
            if self.out_tx.try_send(apdu).is_err() {
                return Err(CloseReason::Io("send queue stalled".into()));
            }
        }
        for event in events {
            let _ = self.event_tx.send(event).await;
        }
        Ok(())
    }

    /// One timer tick: fire t1/t2/t3 as due. Returns the close reason when
    /// t1 expired.
    fn on_tick(&self, to_send: &mut Vec<Apdu>) -> std::result::Result<(), CloseReason> {
        let mut st = self.state.lock().expect("link state poisoned");
        if st.closed {
            return Ok(());
        }
        let now = Instant::now();
        let t1 = self.cfg.send_unack_timeout1;

        let t1_expired = |since: Option<Instant>| {
            since.map_or(false, |t| now.duration_since(t) >= t1)
        };
        if t1_expired(st.pending.front().map(|p| p.sent_at))
            || t1_expired(st.start_pending)
            || t1_expired(st.stop_pending)
            || t1_expired(st.test_pending)
        {
            warn!("t1 expired on outstanding acknowledgment");
            return Err(CloseReason::AckTimeout);
        }

        if let Some(since) = st.t2_since {
            if now.duration_since(since) >= self.cfg.recv_unack_timeout2
                && seq_diff(st.recv_sn, st.ack_recv_sn) > 0
            {
                to_send.push(Apdu::s_frame(st.recv_sn));
                st.ack_recv_sn = st.recv_sn;
                st.t2_since = None;
            }
        }

        if st.test_pending.is_none()
            && now.duration_since(st.last_frame_at) >= self.cfg.idle_timeout3
        {
            debug!("t3 idle, sending test frame");
            to_send.push(Apdu::u_frame(UFunction::TestFrAct));
            st.test_pending = Some(now);
        }
        Ok(())
    }
}

async fn reader_task<T>(shared: Arc<Shared>, mut source: SplitStream<Framed<T, ApduCodec>>)
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut shutdown = shared.shutdown_tx.subscribe();
    loop {
        tokio::select! {
            _ = shutdown.changed() => return,
            frame = source.next() => match frame {
                Some(Ok(apdu)) => {
                    if let Err(reason) = shared.handle_apdu(apdu).await {
                        shared.close(reason).await;
                        return;
                    }
                }
                Some(Err(Error::Io(e))) => {
                    shared.close(CloseReason::Io(e.to_string())).await;
                    return;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "frame parse failed");
                    shared.close(CloseReason::MalformedFrame).await;
                    return;
                }
                None => {
                    shared.close(CloseReason::PeerClosed).await;
                    return;
                }
            }
        }
    }
}

async fn writer_task<T>(
    shared: Arc<Shared>,
    mut sink: SplitSink<Framed<T, ApduCodec>, Apdu>,
    mut out_rx: mpsc::Receiver<Apdu>,
) where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut shutdown = shared.shutdown_tx.subscribe();
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            apdu = out_rx.recv() => match apdu {
                Some(apdu) => {
                    if let Err(e) = sink.send(apdu).await {
                        shared.close(CloseReason::Io(e.to_string())).await;
                        break;
                    }
                }
                None => break,
            }
        }
    }
    let _ = sink.close().await;
}

async fn timer_task(shared: Arc<Shared>) {
    let mut shutdown = shared.shutdown_tx.subscribe();
    let mut tick = interval(TICK_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tick.tick() => {}
        }

        let mut to_send = Vec::new();
        if let Err(reason) = shared.on_tick(&mut to_send) {
            shared.close(reason).await;
            return;
        }
        for apdu in to_send {
            if shared.out_tx.try_send(apdu).is_err() {
                shared.close(CloseReason::Io("send queue stalled".into())).await;
                return;
            }
        }
    }
}
