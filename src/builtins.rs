use std::rc::Rc;
use std::time::Instant;
use once_cell::sync::Lazy;

use crate::language::FloatType;
use crate::runtime::{Value, Environment};
use crate::runtime::errors::RuntimeError;


// reference point for clock()
static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);


/// Define the core builtins into the global environment
pub fn define_builtins(env: &Rc<Environment>) {
    Lazy::force(&EPOCH);

    let clock = native_function!(clock, params() => {
        Ok(Value::Number(EPOCH.elapsed().as_secs_f64()))
    });

    let str = native_function!(str, params(value) => {
        Ok(Value::from(value.to_string()))
    });

    let type_name = native_function!(type, params(value) => {
        Ok(Value::from(value.type_name()))
    });

    let num = native_function!(num, params(value) => {
        match value {
            Value::Number(..) => Ok(value.clone()),

            Value::String(string) => string.trim().parse::<FloatType>()
                .map(Value::Number)
                .map_err(|error| RuntimeError::invalid_value(
                    format!("could not convert \"{}\" to a number", string)
                ).caused_by(error)),

            _ => Err(RuntimeError::invalid_value(
                format!("can't convert type '{}' to a number", value.type_name())
            )),
        }
    });

    define_natives!(env, {
        clock;
        str;
        type_name;
        num;
    });
}
