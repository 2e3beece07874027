use crate::Value;
use std::{fmt, sync::Arc};

type TransformFn = dyn Fn(Value) -> Option<Value> + Send + Sync;

/// A forward transform with an optional inverse.
///
/// Both functions only ever see non-null values: null passes through
/// unchanged. A function returns `None` for input outside its domain.
#[derive(Clone)]
pub struct ValueTransformer {
    forward: Arc<TransformFn>,
    reverse: Option<Arc<TransformFn>>,
}

impl ValueTransformer {
    pub fn new(forward: impl Fn(Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        Self {
            forward: Arc::new(forward),
            reverse: None,
        }
    }

    pub fn reversible(
        forward: impl Fn(Value) -> Option<Value> + Send + Sync + 'static,
        reverse: impl Fn(Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            forward: Arc::new(forward),
            reverse: Some(Arc::new(reverse)),
        }
    }

    /// Wraps a typed function. Input that does not convert into `T` is
    /// rejected.
    pub fn typed<T, U>(forward: impl Fn(T) -> Option<U> + Send + Sync + 'static) -> Self
    where
        T: TryFrom<Value>,
        U: Into<Value>,
    {
        Self::new(typed(forward))
    }

    pub fn typed_reversible<T, U>(
        forward: impl Fn(T) -> Option<U> + Send + Sync + 'static,
        reverse: impl Fn(U) -> Option<T> + Send + Sync + 'static,
    ) -> Self
    where
        T: TryFrom<Value> + Into<Value>,
        U: TryFrom<Value> + Into<Value>,
    {
        Self::reversible(typed(forward), typed(reverse))
    }

    pub fn allows_reverse(&self) -> bool {
        self.reverse.is_some()
    }

    /// Applies the forward function.
    pub fn transform(&self, value: Value) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }
        (self.forward)(value)
    }

    /// Applies the inverse. The outer `None` means no inverse is registered.
    pub fn reverse_transform(&self, value: Value) -> Option<Option<Value>> {
        let reverse = self.reverse.as_ref()?;
        if value.is_null() {
            return Some(Some(Value::Null));
        }
        Some(reverse(value))
    }
}

fn typed<T, U>(
    f: impl Fn(T) -> Option<U> + Send + Sync + 'static,
) -> impl Fn(Value) -> Option<Value> + Send + Sync + 'static
where
    T: TryFrom<Value>,
    U: Into<Value>,
{
    move |value| T::try_from(value).ok().and_then(&f).map(Into::into)
}

impl fmt::Debug for ValueTransformer {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("ValueTransformer")
            .field("reversible", &self.allows_reverse())
            .finish()
    }
}
