// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Report cycle orchestration and periodic scheduling.
//!
//! A [`Reporter`] is built once from a validated configuration and then
//! driven one cycle at a time: connect, snapshot, encode and write every
//! metric, flush, and always disconnect. Failures are contained at the
//! smallest useful granularity - a bad metric is logged and skipped, a
//! failed connect skips the whole cycle - and nothing ever propagates to
//! the caller. Telemetry loss for one interval is preferable to blocking
//! or duplicating delivery, so there are no retries.
//!
//! # Example
//!
//! ```no_run
//! use metricast::{Reporter, SecurityLevel};
//! # use metricast::{MetricSnapshot, MetricSource};
//! # struct Db;
//! # impl MetricSource for Db {
//! #     fn snapshot(&self) -> MetricSnapshot { MetricSnapshot::default() }
//! # }
//!
//! let reporter = Reporter::builder(Db)
//!     .with_host("app-container-7")
//!     .with_collector_host("collectd.internal")
//!     .with_security_level(SecurityLevel::Sign)
//!     .with_username("user0")
//!     .with_password("secret")
//!     .build()?;
//!
//! // One cycle every 60 seconds until the handle is dropped.
//! let task = reporter.start(60);
//! # task.shutdown();
//! # Ok::<(), metricast::Error>(())
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::{
    DEFAULT_COLLECTOR_PORT, DEFAULT_MAX_PACKET_SIZE, DEFAULT_QUERY_PREFIX, FALLBACK_HOST_NAME,
};
use crate::error::{Error, Result};
use crate::protocol::{encode_value_write, PacketHeader};
use crate::security::{sealer_for, SecurityLevel};
use crate::source::{CountMetric, MetricSource, QueryMetric, TimedMetric};
use crate::transport::DatagramTransport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Periodic collectd reporter for one metric source.
pub struct Reporter<S> {
    source: S,
    host_name: String,
    query_prefix: String,
    clock: Arc<dyn Clock>,
    transport: DatagramTransport,
}

impl<S> std::fmt::Debug for Reporter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("host_name", &self.host_name)
            .field("query_prefix", &self.query_prefix)
            .finish_non_exhaustive()
    }
}

impl<S: MetricSource> Reporter<S> {
    /// Start configuring a reporter for `source`.
    pub fn builder(source: S) -> ReporterBuilder<S> {
        ReporterBuilder::new(source)
    }

    /// Run one report cycle with `period_secs` as the in-packet interval
    /// label.
    ///
    /// Never fails: every error is contained and logged. The caller (the
    /// periodic task, or an external scheduler driving this directly)
    /// must not invoke overlapping cycles on one reporter; `&mut self`
    /// makes that impossible without an external lock.
    pub fn report(&mut self, period_secs: u64) {
        log::debug!("[reporter] reporting metrics");
        let mut header =
            PacketHeader::new(&self.host_name, self.clock.epoch_seconds(), period_secs);

        if !self.transport.is_connected() {
            if let Err(err) = self.transport.connect() {
                log::warn!("[reporter] cannot reach collector, skipping cycle: {}", err);
                self.transport.disconnect();
                return;
            }
        }

        let snapshot = self.source.snapshot();
        for metric in &snapshot.timed {
            self.report_timed(&mut header, metric);
        }
        for metric in &snapshot.queries {
            self.report_query(&mut header, metric);
        }
        for metric in &snapshot.counts {
            self.report_count(&mut header, metric);
        }

        if let Err(err) = self.transport.flush() {
            log::warn!("[reporter] failed to flush trailing datagram: {}", err);
        }
        self.transport.disconnect();
    }

    fn report_timed(&mut self, header: &mut PacketHeader, metric: &TimedMetric) {
        header.set_plugin(&metric.name);
        self.write_gauge(header, "count", metric.count as f64);
        self.write_gauge(header, "max", metric.max);
        self.write_gauge(header, "mean", metric.mean);
        self.write_gauge(header, "total", metric.total);
    }

    fn report_query(&mut self, header: &mut PacketHeader, metric: &QueryMetric) {
        let Some(name) = &metric.name else {
            // No observations this interval; the source left the metric unnamed.
            log::trace!(
                "[reporter] skip query metric type={} count={}",
                metric.type_label,
                metric.count
            );
            return;
        };
        header.set_plugin(&format!("{}{}.{}", self.query_prefix, metric.type_label, name));
        self.write_gauge(header, "count", metric.count as f64);
        self.write_gauge(header, "max", metric.max);
        self.write_gauge(header, "mean", metric.mean);
        self.write_gauge(header, "total", metric.total);
    }

    fn report_count(&mut self, header: &mut PacketHeader, metric: &CountMetric) {
        header.set_plugin(&metric.name);
        self.write_gauge(header, "count", metric.count as f64);
    }

    /// Encode and write one value. A failure is logged with the metric's
    /// name and contained here, so one malformed metric never suppresses
    /// the rest of the cycle.
    fn write_gauge(&mut self, header: &mut PacketHeader, label: &str, value: f64) {
        header.set_type_instance(Some(label));
        let result = encode_value_write(header, &[value])
            .map_err(Error::from)
            .and_then(|blob| self.transport.write(&blob));
        if let Err(err) = result {
            log::warn!(
                "[reporter] failed to send metric '{}' ({}): {}",
                header.plugin(),
                label,
                err
            );
        }
    }
}

impl<S: MetricSource + Send + 'static> Reporter<S> {
    /// Run one cycle every `period_secs` seconds in a background thread,
    /// fixed-delay style: the first cycle fires after one full period.
    ///
    /// The same value is the in-packet interval label and the scheduling
    /// period. The returned handle stops the task on [`ReporterTask::shutdown`]
    /// or on drop; an in-flight cycle always finishes its disconnect step.
    #[must_use]
    pub fn start(self, period_secs: u64) -> ReporterTask {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);
        let handle = thread::spawn(move || report_loop(self, period_secs, &shutdown_clone));
        ReporterTask {
            handle: Some(handle),
            shutdown,
        }
    }
}

/// Main reporting loop (runs in the background thread).
fn report_loop<S: MetricSource>(
    mut reporter: Reporter<S>,
    period_secs: u64,
    shutdown: &AtomicBool,
) {
    let period = Duration::from_secs(period_secs.max(1));
    loop {
        // Sleep in small chunks for responsive shutdown.
        let sleep_end = Instant::now() + period;
        while Instant::now() < sleep_end {
            if shutdown.load(Ordering::Relaxed) {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }
        reporter.report(period_secs);
    }
}

/// Handle for a running periodic reporter thread.
pub struct ReporterTask {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl ReporterTask {
    /// Signal the reporter thread to stop and wait for completion.
    ///
    /// Automatically called on drop; explicit invocation is for callers
    /// that want synchronous shutdown at a known point.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReporterTask {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Fluent configuration collected into an immutable [`Reporter`].
///
/// All validation happens once, at [`ReporterBuilder::build`]; after that
/// the configuration never changes.
pub struct ReporterBuilder<S> {
    source: S,
    collector_host: Option<String>,
    collector_port: u16,
    host_name: Option<String>,
    security_level: SecurityLevel,
    username: String,
    password: String,
    clock: Arc<dyn Clock>,
    query_prefix: String,
    max_packet_size: usize,
}

impl<S: MetricSource> ReporterBuilder<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            collector_host: None,
            collector_port: DEFAULT_COLLECTOR_PORT,
            host_name: None,
            security_level: SecurityLevel::None,
            username: String::new(),
            password: String::new(),
            clock: Arc::new(SystemClock),
            query_prefix: DEFAULT_QUERY_PREFIX.to_string(),
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }

    /// Collector host name to send the datagrams to.
    #[must_use]
    pub fn with_collector_host(mut self, host: &str) -> Self {
        self.collector_host = Some(host.to_string());
        self
    }

    /// Collector port. Defaults to 25826.
    #[must_use]
    pub fn with_collector_port(mut self, port: u16) -> Self {
        self.collector_port = port;
        self
    }

    /// Host name label stamped into every packet (the container or
    /// machine the metrics describe). Defaults to the local host name.
    #[must_use]
    pub fn with_host(mut self, host_name: &str) -> Self {
        self.host_name = Some(host_name.to_string());
        self
    }

    /// Security level for the collector connection. Defaults to `NONE`.
    #[must_use]
    pub fn with_security_level(mut self, level: SecurityLevel) -> Self {
        self.security_level = level;
        self
    }

    /// Username for `SIGN` or `ENCRYPT`.
    #[must_use]
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    /// Password for `SIGN` or `ENCRYPT`.
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    /// Clock for packet timestamps. Defaults to the system clock;
    /// injectable for deterministic tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Prefix for named query metrics. Defaults to `"db.query."`.
    #[must_use]
    pub fn with_query_prefix(mut self, prefix: &str) -> Self {
        self.query_prefix = prefix.to_string();
        self
    }

    /// Maximum datagram size in bytes. Defaults to 1024; keep within the
    /// path MTU.
    #[must_use]
    pub fn with_max_packet_size(mut self, bytes: usize) -> Self {
        self.max_packet_size = bytes;
        self
    }

    /// Validate the configuration and build the reporter.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when credentials are missing for a non-plaintext
    /// security level. This is the single configuration boundary: no
    /// cycle can ever run with an invalid security setup.
    pub fn build(self) -> Result<Reporter<S>> {
        if self.security_level != SecurityLevel::None {
            if self.username.is_empty() {
                return Err(Error::Config(format!(
                    "username is required for security level {}",
                    self.security_level
                )));
            }
            if self.password.is_empty() {
                return Err(Error::Config(format!(
                    "password is required for security level {}",
                    self.security_level
                )));
            }
        }
        let sealer = sealer_for(self.security_level, &self.username, &self.password);
        let transport = DatagramTransport::new(
            self.collector_host,
            self.collector_port,
            self.max_packet_size,
            sealer,
        );
        Ok(Reporter {
            source: self.source,
            host_name: self.host_name.unwrap_or_else(resolve_host_name),
            query_prefix: self.query_prefix,
            clock: self.clock,
            transport,
        })
    }
}

/// Local host name, falling back to `"localhost"` when resolution fails.
#[cfg(unix)]
fn resolve_host_name() -> String {
    let mut buf = [0u8; 256];
    // SAFETY: gethostname FFI with a valid buffer pointer and its true
    // length; the kernel NUL-terminates within bounds on success.
    let ret = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if ret == 0 {
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        if let Ok(name) = std::str::from_utf8(&buf[..end]) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    log::error!(
        "[reporter] failed to resolve local host name, using '{}'",
        FALLBACK_HOST_NAME
    );
    FALLBACK_HOST_NAME.to_string()
}

#[cfg(not(unix))]
fn resolve_host_name() -> String {
    FALLBACK_HOST_NAME.to_string()
}
