//! Call-shape resolution for the two result delivery modes.
//!
//! Every operation can be called four ways:
//!
//! | Shape                        | Delivery | Options        |
//! |------------------------------|----------|----------------|
//! | `op(request)`                | future   | default        |
//! | `op(request, options)`       | future   | `options`      |
//! | `op(request, callback)`      | callback | default        |
//! | `op(request, options, cb)`   | callback | `options`      |
//!
//! [`Invocation`] is the typed form of those shapes. [`Invocation::resolve`]
//! builds one from loosely-typed positional [`Arg`]s.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;

use crate::error::{Result, StsError};
use crate::options::CallOptions;

/// Receives the outcome of a callback-mode call exactly once.
pub struct Callback<T> {
    f: Box<dyn FnOnce(Result<T>) + Send + 'static>,
}

impl<T> Callback<T> {
    pub fn new(f: impl FnOnce(Result<T>) + Send + 'static) -> Self {
        Self { f: Box::new(f) }
    }

    pub(crate) fn call(self, result: Result<T>) {
        (self.f)(result)
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// Owns a callback for a dispatched call.
///
/// If dropped before [`Delivery::deliver`] (the task was cancelled, panicked,
/// or its runtime shut down) the callback receives [`StsError::Transport`].
pub(crate) struct Delivery<T> {
    callback: Option<Callback<T>>,
}

impl<T> Delivery<T> {
    pub(crate) fn new(callback: Callback<T>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub(crate) fn deliver(mut self, result: Result<T>) {
        if let Some(callback) = self.callback.take() {
            callback.call(result);
        }
    }
}

impl<T> Drop for Delivery<T> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback.call(Err(StsError::Transport(
                "call dropped before completion".to_string(),
            )));
        }
    }
}

/// How the caller wants a call executed and its result delivered.
#[derive(Debug)]
pub enum Invocation<T> {
    /// Return a future; default options.
    Deferred,
    /// Return a future; use these options.
    WithOptions(CallOptions),
    /// Deliver to the callback; default options.
    Callback(Callback<T>),
    /// Deliver to the callback; use these options.
    WithOptionsAndCallback(CallOptions, Callback<T>),
}

impl<T> Invocation<T> {
    pub fn callback(f: impl FnOnce(Result<T>) + Send + 'static) -> Self {
        Invocation::Callback(Callback::new(f))
    }

    pub fn with_options_and_callback(
        options: CallOptions,
        f: impl FnOnce(Result<T>) + Send + 'static,
    ) -> Self {
        Invocation::WithOptionsAndCallback(options, Callback::new(f))
    }

    /// Resolves positional trailing arguments into an invocation.
    ///
    /// A callback in `second` wins and `third` is ignored. Otherwise a
    /// callback in `third` selects callback mode with `second` as options.
    /// Without a callback the call is deferred with `second` as options.
    ///
    /// Fails with [`StsError::InvalidArgument`] when `second` is present but
    /// is not an options structure.
    pub fn resolve(second: Option<Arg<T>>, third: Option<Arg<T>>) -> Result<Self> {
        match (second, third) {
            (Some(Arg::Callback(cb)), _) => Ok(Invocation::Callback(cb)),
            (second, Some(Arg::Callback(cb))) => match second {
                None => Ok(Invocation::Callback(cb)),
                Some(arg) => Ok(Invocation::WithOptionsAndCallback(arg.into_options()?, cb)),
            },
            (None, _) => Ok(Invocation::Deferred),
            (Some(arg), _) => Ok(Invocation::WithOptions(arg.into_options()?)),
        }
    }

    /// Splits into the options for the transport and the optional callback.
    pub(crate) fn into_parts(self) -> (CallOptions, Option<Callback<T>>) {
        match self {
            Invocation::Deferred => (CallOptions::default(), None),
            Invocation::WithOptions(options) => (options, None),
            Invocation::Callback(cb) => (CallOptions::default(), Some(cb)),
            Invocation::WithOptionsAndCallback(options, cb) => (options, Some(cb)),
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(
            self,
            Invocation::Callback(_) | Invocation::WithOptionsAndCallback(..)
        )
    }
}

impl<T> From<CallOptions> for Invocation<T> {
    fn from(options: CallOptions) -> Self {
        Invocation::WithOptions(options)
    }
}

impl<T> From<Callback<T>> for Invocation<T> {
    fn from(cb: Callback<T>) -> Self {
        Invocation::Callback(cb)
    }
}

/// One loosely-typed trailing argument.
#[derive(Debug)]
pub enum Arg<T> {
    Options(CallOptions),
    Callback(Callback<T>),
    /// Options as data, e.g. read from JSON configuration.
    Value(Value),
}

impl<T> Arg<T> {
    pub fn callback(f: impl FnOnce(Result<T>) + Send + 'static) -> Self {
        Arg::Callback(Callback::new(f))
    }

    fn into_options(self) -> Result<CallOptions> {
        match self {
            Arg::Options(options) => Ok(options),
            Arg::Value(Value::Null) => Ok(CallOptions::default()),
            Arg::Value(value @ Value::Object(_)) => serde_json::from_value(value)
                .map_err(|e| StsError::InvalidArgument(format!("malformed call options: {}", e))),
            Arg::Value(other) => Err(StsError::InvalidArgument(format!(
                "expected call options but got {}",
                value_kind(&other)
            ))),
            Arg::Callback(_) => Err(StsError::InvalidArgument(
                "expected call options but got a callback".to_string(),
            )),
        }
    }
}

impl<T> From<CallOptions> for Arg<T> {
    fn from(options: CallOptions) -> Self {
        Arg::Options(options)
    }
}

impl<T> From<Value> for Arg<T> {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Future resolving to an operation's result.
///
/// Nothing reaches the transport until it is first polled.
#[must_use = "futures do nothing unless awaited"]
pub struct Deferred<T> {
    inner: Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>,
}

impl<T> Deferred<T> {
    pub(crate) fn new(fut: impl Future<Output = Result<T>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(fut),
        }
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred")
    }
}

/// What a dispatched call hands back to the caller.
#[derive(Debug)]
#[must_use = "a deferred result does nothing unless awaited"]
pub enum Dispatched<T> {
    Deferred(Deferred<T>),
    /// The result will arrive through the callback.
    Callback,
}

impl<T> Dispatched<T> {
    pub fn is_callback(&self) -> bool {
        matches!(self, Dispatched::Callback)
    }

    pub fn into_deferred(self) -> Option<Deferred<T>> {
        match self {
            Dispatched::Deferred(deferred) => Some(deferred),
            Dispatched::Callback => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    type Inv = Invocation<u32>;

    fn noop() -> Arg<u32> {
        Arg::callback(|_| {})
    }

    fn options() -> CallOptions {
        CallOptions::new().with_request_timeout(Duration::from_secs(5))
    }

    #[test]
    fn no_trailing_args_is_deferred() {
        assert!(matches!(Inv::resolve(None, None), Ok(Invocation::Deferred)));
    }

    #[test]
    fn options_only_is_deferred_with_options() {
        match Inv::resolve(Some(options().into()), None) {
            Ok(Invocation::WithOptions(o)) => assert_eq!(o, options()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn callback_in_second_slot_ignores_third() {
        let resolved = Inv::resolve(Some(noop()), Some(Arg::Value(json!("ignored")))).unwrap();
        assert!(matches!(resolved, Invocation::Callback(_)));

        let resolved = Inv::resolve(Some(noop()), Some(noop())).unwrap();
        assert!(matches!(resolved, Invocation::Callback(_)));
    }

    #[test]
    fn options_then_callback() {
        match Inv::resolve(Some(options().into()), Some(noop())) {
            Ok(Invocation::WithOptionsAndCallback(o, _)) => assert_eq!(o, options()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_options_before_callback_uses_defaults() {
        assert!(matches!(
            Inv::resolve(None, Some(noop())),
            Ok(Invocation::Callback(_))
        ));
        match Inv::resolve(Some(Arg::Value(Value::Null)), Some(noop())) {
            Ok(Invocation::WithOptionsAndCallback(o, _)) => assert_eq!(o, CallOptions::default()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn object_value_parses_as_options() {
        let arg = Arg::Value(json!({ "requestTimeout": 5000 }));
        match Inv::resolve(Some(arg), Some(noop())) {
            Ok(Invocation::WithOptionsAndCallback(o, _)) => {
                assert_eq!(o.request_timeout, Some(Duration::from_secs(5)))
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn scalar_before_callback_is_invalid() {
        match Inv::resolve(Some(Arg::Value(json!(42))), Some(noop())) {
            Err(StsError::InvalidArgument(msg)) => assert!(msg.contains("a number")),
            other => panic!("expected InvalidArgument, got: {:?}", other),
        }
    }

    #[test]
    fn scalar_without_callback_is_invalid() {
        assert!(matches!(
            Inv::resolve(Some(Arg::Value(json!("fast"))), None),
            Err(StsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn malformed_object_is_invalid() {
        let arg = Arg::Value(json!({ "requestTimeout": "soon" }));
        match Inv::resolve(Some(arg), Some(noop())) {
            Err(StsError::InvalidArgument(msg)) => assert!(msg.contains("malformed")),
            other => panic!("expected InvalidArgument, got: {:?}", other),
        }
    }

    #[test]
    fn into_parts_defaults() {
        let (o, cb) = Inv::Deferred.into_parts();
        assert_eq!(o, CallOptions::default());
        assert!(cb.is_none());

        let (o, cb) = Inv::with_options_and_callback(options(), |_| {}).into_parts();
        assert_eq!(o, options());
        assert!(cb.is_some());
    }

    #[test]
    fn callback_runs_once_with_result() {
        let (tx, rx) = std::sync::mpsc::channel();
        let cb = Callback::new(move |r: Result<u32>| tx.send(r.unwrap()).unwrap());
        cb.call(Ok(7));
        assert_eq!(rx.recv().unwrap(), 7);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delivery_forwards_result_once() {
        let (tx, rx) = std::sync::mpsc::channel();
        let delivery = Delivery::new(Callback::new(move |r: Result<u32>| tx.send(r).unwrap()));
        delivery.deliver(Ok(3));
        assert_eq!(rx.recv().unwrap().unwrap(), 3);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_delivery_reports_error() {
        let (tx, rx) = std::sync::mpsc::channel();
        let delivery = Delivery::new(Callback::new(move |r: Result<u32>| tx.send(r).unwrap()));
        drop(delivery);
        match rx.recv().unwrap() {
            Err(StsError::Transport(msg)) => assert!(msg.contains("dropped")),
            other => panic!("expected StsError::Transport, got: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
