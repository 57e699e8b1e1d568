//! Internal logging macros.
//!
//! With the `defmt-03` feature enabled these forward to `defmt`; otherwise
//! they expand to nothing (arguments are still type-checked so that
//! variables only used for logging do not trigger warnings).

#[cfg(feature = "defmt-03")]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::defmt::trace!($($arg)*)
    };
}

#[cfg(not(feature = "defmt-03"))]
macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

#[cfg(feature = "defmt-03")]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::defmt::debug!($($arg)*)
    };
}

#[cfg(not(feature = "defmt-03"))]
macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

pub(crate) use debug;
pub(crate) use trace;
