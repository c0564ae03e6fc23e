use std::rc::Rc;

use crate::parser::operator::{UnaryOp, BinaryOp};
use crate::language::FloatType;
use crate::runtime::Value;
use crate::runtime::errors::{ExecResult, RuntimeError};


// Unary Operators

pub fn eval_unary(op: UnaryOp, operand: &Value) -> ExecResult<Value> {
    match op {
        UnaryOp::Neg => eval_neg(operand),
        UnaryOp::Not => Ok(eval_not(operand)),
    }
}

pub fn eval_neg(operand: &Value) -> ExecResult<Value> {
    match operand {
        Value::Number(value) => Ok(Value::Number(-value)),
        _ => Err(RuntimeError::invalid_unary_operand(&UnaryOp::Neg, operand)),
    }
}

pub fn eval_not(operand: &Value) -> Value {
    Value::Bool(!operand.truth_value())
}


// Binary Operators

pub fn eval_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> ExecResult<Value> {
    let result = match op {
        BinaryOp::Mul => eval_mul(lhs, rhs),
        BinaryOp::Div => eval_div(lhs, rhs),
        BinaryOp::Add => eval_add(lhs, rhs),
        BinaryOp::Sub => eval_sub(lhs, rhs),
        BinaryOp::LT  => eval_lt(lhs, rhs),
        BinaryOp::GT  => eval_gt(lhs, rhs),
        BinaryOp::LE  => eval_le(lhs, rhs),
        BinaryOp::GE  => eval_ge(lhs, rhs),
        BinaryOp::EQ  => Some(eval_eq(lhs, rhs)),
        BinaryOp::NE  => Some(eval_ne(lhs, rhs)),
    };

    result.ok_or_else(|| RuntimeError::invalid_binary_operands(&op, lhs, rhs))
}

// None means the operand types are not supported

fn eval_add(lhs: &Value, rhs: &Value) -> Option<Value> {
    match (lhs, rhs) {
        (Value::Number(lhs), Value::Number(rhs)) => Some(Value::Number(lhs + rhs)),
        (Value::String(lhs), Value::String(rhs)) => {
            let mut buf = String::with_capacity(lhs.len() + rhs.len());
            buf.push_str(lhs);
            buf.push_str(rhs);
            Some(Value::String(Rc::from(buf)))
        },
        _ => None,
    }
}

fn eval_sub(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (lhs, rhs) = numeric_operands(lhs, rhs)?;
    Some(Value::Number(lhs - rhs))
}

fn eval_mul(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (lhs, rhs) = numeric_operands(lhs, rhs)?;
    Some(Value::Number(lhs * rhs))
}

// division by zero gives an infinity or NaN
fn eval_div(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (lhs, rhs) = numeric_operands(lhs, rhs)?;
    Some(Value::Number(lhs / rhs))
}

fn eval_lt(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (lhs, rhs) = numeric_operands(lhs, rhs)?;
    Some(Value::Bool(lhs < rhs))
}

fn eval_gt(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (lhs, rhs) = numeric_operands(lhs, rhs)?;
    Some(Value::Bool(lhs > rhs))
}

fn eval_le(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (lhs, rhs) = numeric_operands(lhs, rhs)?;
    Some(Value::Bool(lhs <= rhs))
}

fn eval_ge(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (lhs, rhs) = numeric_operands(lhs, rhs)?;
    Some(Value::Bool(lhs >= rhs))
}

fn eval_eq(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(lhs == rhs)
}

fn eval_ne(lhs: &Value, rhs: &Value) -> Value {
    Value::Bool(lhs != rhs)
}

fn numeric_operands(lhs: &Value, rhs: &Value) -> Option<(FloatType, FloatType)> {
    Some((lhs.as_number()?, rhs.as_number()?))
}
