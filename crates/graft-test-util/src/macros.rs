/// Unwraps an `Ok`, panicking with the actual value otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(value) => value,
            actual => panic!("expected `Ok`, got {:?}", actual),
        }
    };
}

/// Unwraps an `Err`, panicking with the actual value otherwise. Extra
/// arguments format a message appended to the panic.
#[macro_export]
macro_rules! assert_err {
    ($e:expr) => {
        match $e {
            Err(err) => err,
            actual => panic!("expected `Err`, got {:?}", actual),
        }
    };
    ($e:expr, $($msg:tt)+) => {
        match $e {
            Err(err) => err,
            actual => panic!("expected `Err`, got {:?}: {}", actual, format_args!($($msg)+)),
        }
    };
}

#[macro_export]
macro_rules! assert_none {
    ($e:expr) => {
        match $e {
            None => {}
            actual => panic!("expected `None`, got {:?}", actual),
        }
    };
}
