//! crates/logging/src/logger.rs
//! The logging facade: threshold, capture, hook veto and dispatch.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;

use crate::capture::{CaptureFrame, CaptureStack, CapturedCall};
use crate::dispatch::Dispatcher;
use crate::hooks::{HOOK_DOMAIN, HOOK_EVENT, HookDispatcher, HookParams, NoHooks};
use crate::host::{ErrorReporting, HostEnvironment};
use crate::levels::{Level, LevelInput, normalize};
use crate::record::{Context, LogRecord};

/// Threshold as reported by [`Logger::get_level`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelValue {
    /// Numeric severity of the threshold.
    Severity(u16),
    /// Canonical name of the threshold.
    Name(&'static str),
    /// Logging is off, or the severity lookup found nothing.
    Off,
}

struct LoggerState {
    threshold: Level,
    capture: CaptureStack,
}

impl LoggerState {
    fn is_loggable(&self, level: Level) -> bool {
        match (self.threshold.severity(), level.severity()) {
            (Some(threshold), Some(severity)) => severity >= threshold,
            _ => false,
        }
    }
}

/// Severity-filtered logger with capture support and a hook veto.
///
/// A call flows through four gates in order:
///
/// 1. the level is normalized ([`normalize`]);
/// 2. while a capture frame is open the call is recorded and reported as
///    handled, without reaching hooks or sinks;
/// 3. calls below the threshold return `false`;
/// 4. the `debug:log` hook may veto the call, otherwise the record is handed
///    to the [`Dispatcher`].
///
/// The boolean result does not say which gate stopped a call.
///
/// State lives behind locks so a logger can be shared through an [`Arc`].
/// No lock is held while hooks run, so hook handlers may log themselves.
///
/// # Examples
///
/// ```
/// use logging::{Dispatcher, Level, Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let mut dispatcher = Dispatcher::new(Logger::CHANNEL);
/// dispatcher.add_sink(sink.clone());
///
/// let logger = Logger::new(dispatcher);
/// logger.set_level(Level::Warning);
///
/// assert!(logger.warning("disk low"));
/// assert!(!logger.info("cache hit"));
/// assert_eq!(sink.records().len(), 1);
/// ```
pub struct Logger {
    state: Mutex<LoggerState>,
    hooks: RwLock<Arc<dyn HookDispatcher>>,
    host: Arc<dyn HostEnvironment>,
    dispatcher: Mutex<Dispatcher>,
}

macro_rules! level_methods {
    ($($name:ident, $with_context:ident => $level:expr;)*) => {
        $(
            #[doc = concat!("Logs `message` at the `", stringify!($name), "` level.")]
            pub fn $name(&self, message: impl Into<Value>) -> bool {
                self.log($level, message, Context::new())
            }

            #[doc = concat!("Logs `message` with `context` at the `", stringify!($name), "` level.")]
            pub fn $with_context(&self, message: impl Into<Value>, context: Context) -> bool {
                self.log($level, message, context)
            }
        )*
    };
}

impl Logger {
    /// Default channel name.
    pub const CHANNEL: &'static str = "ELGG";

    /// Creates a logger whose default threshold derives from a host that
    /// reports every condition (threshold `notice`).
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_host(dispatcher, ErrorReporting::all())
    }

    /// Creates a logger whose default threshold derives from `host`.
    pub fn with_host<H>(dispatcher: Dispatcher, host: H) -> Self
    where
        H: HostEnvironment + 'static,
    {
        let threshold = host.error_reporting().default_level();
        Self {
            state: Mutex::new(LoggerState {
                threshold,
                capture: CaptureStack::new(),
            }),
            hooks: RwLock::new(Arc::new(NoHooks)),
            host: Arc::new(host),
            dispatcher: Mutex::new(dispatcher),
        }
    }

    fn state(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatcher(&self) -> MutexGuard<'_, Dispatcher> {
        self.dispatcher.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the hook dispatcher consulted before emission.
    pub fn set_hooks(&self, hooks: Arc<dyn HookDispatcher>) {
        *self.hooks.write().unwrap_or_else(PoisonError::into_inner) = hooks;
    }

    /// Detaches the hook dispatcher; no veto step runs afterwards.
    pub fn clear_hooks(&self) {
        self.set_hooks(Arc::new(NoHooks));
    }

    fn hooks(&self) -> Arc<dyn HookDispatcher> {
        Arc::clone(&self.hooks.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Sets the threshold.
    ///
    /// An absent level (`None`) derives the threshold from the host's
    /// error-reporting mask; any other input is normalized, so unrecognised
    /// values switch logging off.
    pub fn set_level<'a>(&self, level: impl Into<LevelInput<'a>>) {
        let threshold = match level.into() {
            LevelInput::Absent => self.host.error_reporting().default_level(),
            other => normalize(other),
        };
        self.state().threshold = threshold;
    }

    /// Re-derives the threshold from the host's error-reporting mask.
    pub fn reset_level(&self) {
        self.set_level(LevelInput::Absent);
    }

    /// Current threshold.
    pub fn level(&self) -> Level {
        self.state().threshold
    }

    /// Current threshold as a severity (`severity == true`) or a name.
    pub fn get_level(&self, severity: bool) -> LevelValue {
        let threshold = self.level();
        let value = if severity {
            threshold.severity().map(LevelValue::Severity)
        } else {
            threshold.name().map(LevelValue::Name)
        };
        value.unwrap_or(LevelValue::Off)
    }

    /// Reports whether `level` passes the current threshold.
    ///
    /// Always `false` when the threshold is off or `level` is unrecognised.
    pub fn is_loggable<'a>(&self, level: impl Into<LevelInput<'a>>) -> bool {
        let level = normalize(level);
        self.state().is_loggable(level)
    }

    /// Logs `message` at `level`.
    ///
    /// Returns `true` when the call was captured or a sink wrote the record,
    /// and `false` when it was filtered, vetoed, or no sink accepted it.
    pub fn log<'a>(
        &self,
        level: impl Into<LevelInput<'a>>,
        message: impl Into<Value>,
        context: Context,
    ) -> bool {
        let level = normalize(level);
        let message = message.into();

        {
            let mut state = self.state();
            if state.capture.is_active() {
                return state.capture.record(CapturedCall { message, level });
            }
            if !state.is_loggable(level) {
                return false;
            }
        }

        let params = HookParams {
            level: level.label(),
            msg: &message,
            context: &context,
        };
        if !self.hooks().trigger(HOOK_DOMAIN, HOOK_EVENT, &params, true) {
            return false;
        }

        let mut dispatcher = self.dispatcher();
        let record = LogRecord::new(dispatcher.channel().clone(), level, message, context);
        dispatcher.emit(&record)
    }

    level_methods! {
        emergency, emergency_with => Level::Emergency;
        alert, alert_with => Level::Alert;
        critical, critical_with => Level::Critical;
        error, error_with => Level::Error;
        warning, warning_with => Level::Warning;
        notice, notice_with => Level::Notice;
        info, info_with => Level::Info;
        debug, debug_with => Level::Debug;
    }

    /// Logs `message` at the `warning` level.
    #[deprecated(since = "0.1.0", note = "use `Logger::warning`")]
    pub fn warn(&self, message: impl Into<Value>) -> bool {
        self.warning(message)
    }

    /// Logs arbitrary data at the `error` level.
    ///
    /// The data travels as the record's message payload. Values that fail to
    /// serialize are logged as their error text.
    pub fn dump<T>(&self, data: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(data)
            .unwrap_or_else(|error| Value::String(format!("unserializable dump: {error}")));
        self.log(Level::Error, payload, Context::new())
    }

    /// Suspends dispatch and starts capturing log calls.
    ///
    /// Frames nest: every `disable` needs its own [`enable`](Self::enable).
    pub fn disable(&self) {
        self.state().capture.push();
    }

    /// Closes the most recent capture frame and returns its calls.
    ///
    /// Without a matching [`disable`](Self::disable) this returns an empty
    /// frame and leaves the logger unchanged.
    pub fn enable(&self) -> CaptureFrame {
        self.state().capture.pop()
    }

    /// Reports whether a capture frame is open.
    pub fn is_capturing(&self) -> bool {
        self.state().capture.is_active()
    }

    /// Number of open capture frames.
    pub fn capture_depth(&self) -> usize {
        self.state().capture.depth()
    }

    /// Opens a capture frame that closes when the returned guard drops.
    ///
    /// Guards close frames in LIFO order. Any [`disable`](Self::disable)
    /// made while the guard is alive must be matched by an
    /// [`enable`](Self::enable) before the guard closes; debug builds assert
    /// this.
    pub fn disabled(&self) -> CaptureGuard<'_> {
        self.disable();
        CaptureGuard {
            logger: Some(self),
            depth: self.capture_depth(),
        }
    }

    /// Runs `f` with logging disabled and returns its result with the calls
    /// it made.
    pub fn capture<R>(&self, f: impl FnOnce() -> R) -> (R, CaptureFrame) {
        let guard = self.disabled();
        let result = f();
        (result, guard.finish())
    }

    /// Gives mutable access to the dispatch primitive, e.g. to add a sink.
    ///
    /// `f` runs with the dispatcher lock held. It must not log through this
    /// logger, flush it or format it with `{:?}`; the lock is not reentrant
    /// and any of those deadlocks.
    pub fn with_dispatcher<R>(&self, f: impl FnOnce(&mut Dispatcher) -> R) -> R {
        f(&mut self.dispatcher())
    }

    /// Flushes every sink.
    pub fn flush(&self) -> io::Result<()> {
        self.dispatcher().flush()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Logger")
            .field("threshold", &state.threshold)
            .field("capture_depth", &state.capture.depth())
            .field("dispatcher", &*self.dispatcher())
            .finish_non_exhaustive()
    }
}

/// RAII guard returned by [`Logger::disabled`].
///
/// Dropping the guard closes its capture frame and discards the captured
/// calls; [`finish`](Self::finish) closes it and returns them.
#[must_use = "dropping the guard immediately re-enables logging"]
pub struct CaptureGuard<'a> {
    logger: Option<&'a Logger>,
    depth: usize,
}

impl CaptureGuard<'_> {
    /// Closes the frame and returns the captured calls.
    pub fn finish(mut self) -> CaptureFrame {
        match self.logger.take() {
            Some(logger) => {
                debug_assert_eq!(
                    logger.capture_depth(),
                    self.depth,
                    "capture guard closed over an unmatched disable()"
                );
                logger.enable()
            }
            None => CaptureFrame::new(),
        }
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        if let Some(logger) = self.logger.take() {
            debug_assert!(
                std::thread::panicking() || logger.capture_depth() == self.depth,
                "capture guard closed over an unmatched disable()"
            );
            logger.enable();
        }
    }
}

impl fmt::Debug for CaptureGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureGuard")
            .field("active", &self.logger.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}
