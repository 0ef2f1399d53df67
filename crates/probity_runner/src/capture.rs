//! Scoped evaluation with fault capture.
//!
//! Thunks report faults either by returning `Err(Fault)` or by panicking.
//! [`evaluate`] turns both into an [`Evaluated`] so that "did this side
//! fault" becomes part of the comparison instead of aborting the case.
//!
//! While a guarded call is running on a thread, the process panic hook
//! records the panic site and backtrace for that thread instead of printing.
//! Panics on other threads, or outside a guarded call, go to the previously
//! installed hook.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use probity_engine::Invoker;
use probity_foundation::{Evaluated, Fault, FaultType, Frame, NativeFn, Value};
use tracing::debug;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<Vec<Frame>>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Raises `fault` as a panic.
///
/// Under [`evaluate`] the fault is recovered unchanged, so helpers deep in a call stack can fail with a typed fault.
pub fn raise(fault: Fault) -> ! {
    panic::panic_any(fault)
}

/// Evaluates a thunk, converting a panic into a fault.
pub fn evaluate<F>(thunk: F) -> Evaluated
where
    F: FnOnce() -> Evaluated,
{
    guarded(thunk).and_then(std::convert::identity)
}

/// Runs `body`, converting a panic into a fault.
///
/// No panic raised by `body` propagates to the caller.
pub fn guarded<T, F>(body: F) -> Result<T, Fault>
where
    F: FnOnce() -> T,
{
    install_hook();

    let result = {
        let _guard = CaptureGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(body))
    };

    result.map_err(|payload| {
        let frames = LAST_PANIC.with(|slot| slot.borrow_mut().take()).unwrap_or_default();
        let fault = fault_from_payload(payload, frames);
        debug!(fault = %fault, "captured panic");
        fault
    })
}

/// Invokes predicates with the same panic capture as thunks.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapturingInvoker;

impl Invoker for CapturingInvoker {
    fn invoke(&self, predicate: &NativeFn, argument: &Value) -> Evaluated {
        evaluate(|| predicate.call(std::slice::from_ref(argument)))
    }
}

// =============================================================================
// Panic Hook
// =============================================================================

struct CaptureGuard {
    previous: bool,
}

impl CaptureGuard {
    fn enter() -> Self {
        Self {
            previous: CAPTURING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURING.with(|flag| flag.set(self.previous));
    }
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CAPTURING.with(Cell::get) {
                previous(info);
                return;
            }
            let mut frames = Vec::new();
            if let Some(location) = info.location() {
                frames.push(Frame::at(location.file(), location.line()));
            }
            let backtrace = Backtrace::capture();
            if backtrace.status() == BacktraceStatus::Captured {
                frames.extend(parse_backtrace(&backtrace.to_string()));
            }
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(frames));
        }));
    });
}

fn fault_from_payload(payload: Box<dyn Any + Send>, frames: Vec<Frame>) -> Fault {
    match payload.downcast::<Fault>() {
        Ok(fault) => {
            let mut fault = *fault;
            if fault.frames.is_empty() {
                fault.frames = frames;
            }
            fault
        }
        Err(payload) => {
            let mut fault = Fault::new(FaultType::panic(), panic_message(payload.as_ref()));
            fault.frames = frames;
            fault
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_owned();
    }
    "non-string panic payload".to_owned()
}

// =============================================================================
// Backtrace Parsing
// =============================================================================

/// Parses the text rendering of a [`Backtrace`] into frames.
///
/// Each frame is a `N: symbol` line, optionally followed by an
/// `at file:line:column` line. Symbol hashes (`::h0123...`) are stripped.
#[must_use]
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in text.lines().map(str::trim) {
        if let Some(location) = line.strip_prefix("at ") {
            if let (Some(frame), Some((file, line))) = (frames.last_mut(), parse_location(location))
            {
                if frame.file.is_none() {
                    frame.file = Some(file.to_owned());
                    frame.line = Some(line);
                }
            }
            continue;
        }
        let Some((index, symbol)) = line.split_once(": ") else {
            continue;
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        frames.push(frame_for_symbol(strip_hash(symbol)));
    }
    frames
}

fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) => {
            head
        }
        _ => symbol,
    }
}

fn frame_for_symbol(symbol: &str) -> Frame {
    match symbol.rsplit_once("::") {
        Some((module, function)) => Frame::new(module, function),
        None => Frame::new("", symbol),
    }
}

fn parse_location(location: &str) -> Option<(&str, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let column = parts.next()?;
    let line = parts.next()?;
    let file = parts.next()?;
    if column.parse::<u32>().is_err() {
        return None;
    }
    Some((file, line.parse().ok()?))
}
