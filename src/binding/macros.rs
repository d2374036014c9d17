//! Macro for building call arguments.

/// Builds [`Args`](crate::binding::Args) from expressions, wrapping each in a
/// [`Value`](crate::binding::Value).
///
/// # Usage
///
/// ```ignore
/// use prebind::args;
///
/// // No arguments
/// greeter.call("greet", args![])?;
///
/// // Positional arguments
/// calc.call("add", args![1_i64, 2_i64])?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::binding::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::binding::Args::from(vec![$($crate::binding::Value::new($value)),+])
    };
}
