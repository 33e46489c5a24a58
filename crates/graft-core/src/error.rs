mod adhoc;
mod entity_type_mismatch;
mod invalid_discriminator;
mod invalid_join;
mod missing_inflater;
mod query_execution_failed;
mod type_conversion;
mod unknown_join_node;

use adhoc::AdhocError;
use entity_type_mismatch::EntityTypeMismatch;
use invalid_discriminator::InvalidDiscriminator;
use invalid_join::InvalidJoin;
use missing_inflater::MissingInflater;
use query_execution_failed::QueryExecutionFailed;
use std::sync::Arc;
use type_conversion::TypeConversionError;
use unknown_join_node::UnknownJoinNode;

/// Return early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Build an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while building join trees, loading entity graphs
/// or reconciling collections.
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
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root
    /// cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    /// Creates an ad-hoc error from format arguments. Prefer the [`err!`] and
    /// [`bail!`] macros.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args.to_string())))
    }

    /// Returns the innermost error of the context chain.
    pub fn root(&self) -> &Error {
        // `chain` always yields at least `self`.
        self.chain().last().unwrap_or(self)
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

    /// Returns `true` if this error, or any error in its context chain, was
    /// raised while building a join tree.
    pub fn is_configuration(&self) -> bool {
        self.chain().any(|err| {
            matches!(
                err.kind(),
                ErrorKind::UnknownJoinNode(_)
                    | ErrorKind::MissingInflater(_)
                    | ErrorKind::InvalidJoin(_)
            )
        })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::QueryExecutionFailed(err) => Some(err),
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
    UnknownJoinNode(UnknownJoinNode),
    MissingInflater(MissingInflater),
    InvalidJoin(InvalidJoin),
    QueryExecutionFailed(QueryExecutionFailed),
    EntityTypeMismatch(EntityTypeMismatch),
    TypeConversion(TypeConversionError),
    InvalidDiscriminator(InvalidDiscriminator),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            UnknownJoinNode(err) => core::fmt::Display::fmt(err, f),
            MissingInflater(err) => core::fmt::Display::fmt(err, f),
            InvalidJoin(err) => core::fmt::Display::fmt(err, f),
            QueryExecutionFailed(err) => core::fmt::Display::fmt(err, f),
            EntityTypeMismatch(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            InvalidDiscriminator(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown graft error"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::Value;

    #[test]
    fn error_size() {
        assert_eq!(
            std::mem::size_of::<Error>(),
            std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn adhoc_error() {
        let err = err!("something went wrong: {}", 42);
        assert_eq!(err.to_string(), "something went wrong: 42");
    }

    #[test]
    fn chain_display() {
        let err = err!("root cause")
            .context(err!("middle context"))
            .context(err!("top context"));

        assert_eq!(
            err.to_string(),
            "top context: middle context: root cause"
        );
        assert_eq!(err.root().to_string(), "root cause");
    }

    #[test]
    fn anyhow_bridge() {
        let err: Error = anyhow::anyhow!("something failed").into();
        assert_eq!(err.to_string(), "something failed");
    }

    #[test]
    fn unknown_join_node_is_configuration() {
        let err = Error::unknown_join_node("Tata_7");
        assert!(err.is_unknown_join_node());
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "unknown join node: Tata_7");
    }

    #[test]
    fn configuration_is_found_through_context() {
        let err = Error::missing_inflater("join_2").context(err!("while grafting Car"));
        assert!(err.is_configuration());
        assert!(!err.is_missing_inflater());
        assert!(err.root().is_missing_inflater());
    }

    #[test]
    fn invalid_join_is_configuration() {
        let err = Error::invalid_join("column `tata_id` is not reachable from `Tata_1`");
        assert!(err.is_invalid_join());
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "invalid join: column `tata_id` is not reachable from `Tata_1`"
        );
    }

    #[test]
    fn query_execution_failed_reports_sql_and_params() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "disk I/O error");
        let err = Error::query_execution_failed(
            "SELECT 1 WHERE a = ?1",
            &[Value::from(7_i64)],
            cause,
        );

        assert!(err.is_query_execution_failed());
        assert!(!err.is_configuration());
        assert_eq!(
            err.to_string(),
            "query execution failed: disk I/O error; sql=`SELECT 1 WHERE a = ?1` params=[I64(7)]"
        );
    }

    #[test]
    fn type_conversion_error() {
        let err = Error::type_conversion(Value::from("abc"), "i64");
        assert_eq!(err.to_string(), "cannot convert String to i64");
    }

    #[test]
    fn invalid_discriminator_error() {
        let err = Error::invalid_discriminator(Value::from("TRUCK"));
        assert!(err.is_invalid_discriminator());
        assert_eq!(
            err.to_string(),
            "no target selector for discriminator String(\"TRUCK\")"
        );
    }
}
