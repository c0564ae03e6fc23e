#![cfg(test)]

use std::rc::Rc;
use test_log::test;

use crate::runtime::{Value, Symbol, Environment};
use crate::runtime::strings::static_symbol;
use crate::runtime::errors::ErrorKind;


#[test]
fn symbols_intern_equal_strings_once() {
    let a = Symbol::intern("name");
    let b = Symbol::from("name");
    let c = Symbol::intern("other");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(static_symbol!("name"), a);
    assert_eq!(a.to_string(), "name");
}

#[test]
fn environment_define_shadows_enclosing_binding() {
    let name = Symbol::intern("x");

    let global = Environment::new_global();
    global.define(name, Value::from(1.0));

    let local = Environment::new_local(&global);
    local.define(name, Value::from(2.0));

    assert_eq!(local.get(&name).unwrap(), Value::from(2.0));
    assert_eq!(global.get(&name).unwrap(), Value::from(1.0));

    // redefinition overwrites in place
    local.define(name, Value::from(3.0));
    assert_eq!(local.get(&name).unwrap(), Value::from(3.0));
}

#[test]
fn environment_assign_updates_innermost_existing_binding() {
    let name = Symbol::intern("x");

    let global = Environment::new_global();
    global.define(name, Value::Nil);

    let local = Environment::new_local(&global);
    local.assign(&name, Value::from("assigned")).unwrap();

    // no binding was created in the local frame
    assert!(!local.has_name(&name));
    assert_eq!(global.get(&name).unwrap(), Value::from("assigned"));
}

#[test]
fn environment_missing_names_are_errors() {
    let name = Symbol::intern("missing");
    let env = Environment::new_local(&Environment::new_global());

    let error = env.get(&name).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UndefinedVariable);

    let error = env.assign(&name, Value::Nil).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UndefinedVariable);
    assert!(!env.has_name(&name));
}

#[test]
fn environment_depth_access() {
    let name = Symbol::intern("x");

    let global = Environment::new_global();
    let outer = Environment::new_local(&global);
    outer.define(name, Value::from("outer"));
    let inner = Environment::new_local(&outer);
    inner.define(name, Value::from("inner"));
    let innermost = Environment::new_local(&inner);

    assert_eq!(innermost.get_at(1, &name), Value::from("inner"));
    assert_eq!(innermost.get_at(2, &name), Value::from("outer"));

    innermost.assign_at(2, name, Value::from("changed"));
    assert_eq!(outer.get(&name).unwrap(), Value::from("changed"));
    assert_eq!(inner.get(&name).unwrap(), Value::from("inner"));
}

#[test]
fn environment_frames_are_shared() {
    let name = Symbol::intern("counter");

    let global = Environment::new_global();
    let frame = Environment::new_local(&global);
    frame.define(name, Value::from(0.0));

    // a closure holding the same frame sees later writes
    let captured = Rc::clone(&frame);
    frame.assign(&name, Value::from(1.0)).unwrap();
    assert_eq!(captured.get(&name).unwrap(), Value::from(1.0));
}

#[test]
fn value_truthiness() {
    assert!(!Value::Nil.truth_value());
    assert!(!Value::Bool(false).truth_value());
    assert!(Value::Bool(true).truth_value());
    assert!(Value::from(0.0).truth_value());
    assert!(Value::from("").truth_value());
}

#[test]
fn value_equality_never_crosses_types() {
    assert_eq!(Value::Nil, Value::Nil);
    assert_eq!(Value::from("a"), Value::from(String::from("a")));
    assert_ne!(Value::from(1.0), Value::from("1"));
    assert_ne!(Value::Nil, Value::Bool(false));
    assert_ne!(Value::from(0.0), Value::Bool(false));
}

#[test]
fn value_display() {
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::from(3.0).to_string(), "3");
    assert_eq!(Value::from(2.5).to_string(), "2.5");
    assert_eq!(Value::from("text").to_string(), "text");
}
