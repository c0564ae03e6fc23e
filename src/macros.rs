
/// Helper macros for creating native functions
#[doc(hidden)]
#[macro_export]
macro_rules! __count {
    () => (0usize);
    ( $x:tt $($xs:tt)* ) => (1usize + $crate::__count!($($xs)*));
}

/// Create a `NativeFunction`.
///
/// Each name in `params(...)` is bound to a `&Value` inside the body.
/// The body must evaluate to an `ExecResult<Value>`.
///
/// ```ignore
/// let str = native_function!(str, params(value) => {
///     Ok(Value::from(value.to_string()))
/// });
/// ```
#[macro_export]
macro_rules! native_function {
    ( $func_name:tt, params( $( $param:ident ),* ) => $body:expr ) => {
        {
            fn body(
                _interpreter: &mut $crate::interpreter::Interpreter,
                args: &[$crate::runtime::Value],
            ) -> $crate::runtime::errors::ExecResult<$crate::runtime::Value> {
                let _rest = args;
                $( let ($param, _rest) = _rest.split_first().expect("argument count checked by caller"); )*

                $body
            }

            $crate::runtime::NativeFunction::new(
                $crate::runtime::Symbol::intern(stringify!($func_name)),
                $crate::__count!( $( $param )* ),
                body,
            )
        }
    };
}

/// Define native functions into an environment under their own names
#[macro_export]
macro_rules! define_natives {
    ( $env:expr, { $( $func:expr ; )* } ) => {
        $(
            let func = $func;
            $env.define(func.name(), $crate::runtime::Value::from(func));
        )*
    };
}
