mod adhoc;
mod attribute_type_mismatch;
mod invalid_json_object;
mod invalid_schema;
mod invalid_transform_input;
mod malformed_relationship_payload;
mod missing_identity_value;
mod object_not_found;
mod store;
mod unknown_discriminator_value;
mod unknown_transformer;
mod unsupported_reverse_transform;

use adhoc::AdhocError;
use attribute_type_mismatch::AttributeTypeMismatch;
use invalid_json_object::InvalidJsonObject;
use invalid_schema::InvalidSchema;
use invalid_transform_input::InvalidTransformInput;
use malformed_relationship_payload::MalformedRelationshipPayload;
use missing_identity_value::MissingIdentityValue;
use object_not_found::ObjectNotFound;
use std::sync::Arc;
use store::StoreError;
use unknown_discriminator_value::UnknownDiscriminatorValue;
use unknown_transformer::UnknownTransformer;
use unsupported_reverse_transform::UnsupportedReverseTransform;

/// Returns early with an ad-hoc [`Error`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates an ad-hoc [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while describing, mapping or storing objects.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    /// Returns the innermost error of the context chain.
    pub fn root(&self) -> &Error {
        self.chain().last().unwrap()
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns `true` if any error in the context chain satisfies `f`.
    ///
    /// Mapping errors are usually wrapped in context naming the entity and
    /// element being mapped; use this to test the underlying kind.
    pub fn any(&self, f: impl Fn(&Error) -> bool) -> bool {
        self.chain().any(f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Store(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Store(StoreError),
    UnknownDiscriminatorValue(UnknownDiscriminatorValue),
    MissingIdentityValue(MissingIdentityValue),
    AttributeTypeMismatch(AttributeTypeMismatch),
    MalformedRelationshipPayload(MalformedRelationshipPayload),
    UnsupportedReverseTransform(UnsupportedReverseTransform),
    UnknownTransformer(UnknownTransformer),
    InvalidTransformInput(InvalidTransformInput),
    InvalidSchema(InvalidSchema),
    InvalidJsonObject(InvalidJsonObject),
    ObjectNotFound(ObjectNotFound),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Store(err) => core::fmt::Display::fmt(err, f),
            UnknownDiscriminatorValue(err) => core::fmt::Display::fmt(err, f),
            MissingIdentityValue(err) => core::fmt::Display::fmt(err, f),
            AttributeTypeMismatch(err) => core::fmt::Display::fmt(err, f),
            MalformedRelationshipPayload(err) => core::fmt::Display::fmt(err, f),
            UnsupportedReverseTransform(err) => core::fmt::Display::fmt(err, f),
            UnknownTransformer(err) => core::fmt::Display::fmt(err, f),
            InvalidTransformInput(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            InvalidJsonObject(err) => core::fmt::Display::fmt(err, f),
            ObjectNotFound(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown sapling error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
