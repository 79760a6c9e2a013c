//! Form controller: aggregate validity and single-flight submission

use super::field::{FieldSpec, FieldValue, FormField};
use super::registry::{FieldHandle, FieldRegistry, FormValues};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Snapshot of the whole form
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub valid: bool,
    pub submitting: bool,
}

/// Lifecycle of a form instance. Failures return to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
}

#[derive(Debug, Default)]
struct Inner {
    registry: FieldRegistry,
    submitting: bool,
}

type Shared = Arc<Mutex<Inner>>;

fn lock(shared: &Shared) -> MutexGuard<'_, Inner> {
    // Nothing panics while holding the lock, but a poisoned form is still usable.
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Single-use completion token handed to the submit handler.
///
/// The first [`finish`](OnFinish::finish) returns the form to idle; later
/// calls are logged and ignored. Dropping it without finishing leaves the
/// form submitting.
pub struct OnFinish {
    shared: Shared,
    settled: AtomicBool,
}

impl OnFinish {
    fn new(shared: Shared) -> Self {
        Self {
            shared,
            settled: AtomicBool::new(false),
        }
    }

    pub fn finish(&self) {
        if self.settled.swap(true, Ordering::AcqRel) {
            tracing::warn!("submission already finished; ignoring repeated on_finish");
            return;
        }
        lock(&self.shared).submitting = false;
        tracing::debug!("submission finished");
    }

    pub fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }
}

impl fmt::Debug for OnFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnFinish")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// What the submit handler receives: values frozen at `submit()` time
#[derive(Debug)]
pub struct SubmitPayload<T> {
    pub values: T,
    pub valid: bool,
    pub on_finish: OnFinish,
}

impl<T> SubmitPayload<T> {
    /// Shorthand for `payload.on_finish.finish()`
    pub fn finish(&self) {
        self.on_finish.finish();
    }
}

/// Caller-supplied submission pipeline.
///
/// Implementations must call [`SubmitPayload::finish`] exactly once on every
/// path, including failures, or the form stays submitting.
#[async_trait]
pub trait SubmitHandler<T>: Send + Sync {
    /// Called synchronously inside `submit()`, before the handler task is
    /// spawned, to freeze state held outside the form into the values.
    ///
    /// Runs under the form lock and must not call back into the form.
    fn prepare(&self, _values: &mut T) {}

    async fn on_submit(&self, payload: SubmitPayload<T>);
}

/// Owns the field registry of one form instance and drives submission
pub struct FormController<T> {
    shared: Shared,
    handler: Arc<dyn SubmitHandler<T>>,
    _values: PhantomData<fn() -> T>,
}

impl<T> Clone for FormController<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            handler: Arc::clone(&self.handler),
            _values: PhantomData,
        }
    }
}

impl<T> FormController<T>
where
    T: DeserializeOwned + Default + Send + 'static,
{
    pub fn new(handler: Arc<dyn SubmitHandler<T>>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Inner::default())),
            handler,
            _values: PhantomData,
        }
    }

    pub fn register(&self, spec: FieldSpec) -> FieldHandle {
        lock(&self.shared).registry.register(spec)
    }

    pub fn unregister(&self, name: &str) -> bool {
        lock(&self.shared).registry.unregister(name)
    }

    pub fn release(&self, handle: &FieldHandle) -> bool {
        lock(&self.shared).registry.release(handle)
    }

    pub fn set_value(&self, name: &str, value: impl Into<FieldValue>) -> bool {
        lock(&self.shared).registry.set_value(name, value.into())
    }

    pub fn value(&self, name: &str) -> Option<FieldValue> {
        lock(&self.shared).registry.value(name).cloned()
    }

    pub fn field(&self, name: &str) -> Option<FormField> {
        lock(&self.shared).registry.field(name).cloned()
    }

    pub fn is_field_valid(&self, name: &str) -> bool {
        lock(&self.shared).registry.is_valid(name)
    }

    /// Aggregate validity of the current registry, regardless of submission
    pub fn valid(&self) -> bool {
        lock(&self.shared).registry.all_valid()
    }

    pub fn submitting(&self) -> bool {
        lock(&self.shared).submitting
    }

    pub fn status(&self) -> FormStatus {
        if self.submitting() {
            FormStatus::Submitting
        } else {
            FormStatus::Idle
        }
    }

    pub fn state(&self) -> FormState {
        let inner = lock(&self.shared);
        FormState {
            values: inner.registry.values(),
            valid: inner.registry.all_valid(),
            submitting: inner.submitting,
        }
    }

    /// Start a submission on the current tokio runtime.
    ///
    /// Returns `None` without side effects while a submission is in flight.
    pub fn submit(&self) -> Option<JoinHandle<()>> {
        let payload = {
            let mut inner = lock(&self.shared);
            if inner.submitting {
                tracing::debug!("submit ignored: submission already in flight");
                return None;
            }
            inner.submitting = true;
            let mut valid = inner.registry.all_valid();
            let mut values = match serde_json::from_value::<T>(inner.registry.values_json()) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(error = %e, "form values do not fit the submit model");
                    valid = false;
                    T::default()
                }
            };
            self.handler.prepare(&mut values);
            SubmitPayload {
                values,
                valid,
                on_finish: OnFinish::new(Arc::clone(&self.shared)),
            }
        };

        tracing::info!(valid = payload.valid, "submitting form");
        let handler = Arc::clone(&self.handler);
        Some(tokio::spawn(async move {
            handler.on_submit(payload).await;
        }))
    }
}
