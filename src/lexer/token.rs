use core::fmt;
use std::rc::Rc;

use crate::language::FloatType;
use crate::runtime::Symbol;
use crate::debug::DebugSymbol;

// Token Types

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    // Delimiters, Separators, punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Dot,
    Semicolon,

    // Operator Symbols
    OpAdd, OpSub, OpMul, OpDiv,
    OpNot,
    OpLT, OpLE, OpGT, OpGE, OpEQ, OpNE,
    OpAssign,

    // Keywords
    And, Or,
    True, False, Nil,
    Var, If, Else, While, For,
    Fun, Return, Class, This, Super,
    Print,

    // Literals
    Identifier(Symbol),
    StringLiteral(Rc<str>),
    Number(FloatType),

    EOF,
}

impl fmt::Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::OpenBrace => "{",
            Self::CloseBrace => "}",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",

            Self::OpAdd => "+",
            Self::OpSub => "-",
            Self::OpMul => "*",
            Self::OpDiv => "/",
            Self::OpNot => "!",
            Self::OpLT => "<",
            Self::OpLE => "<=",
            Self::OpGT => ">",
            Self::OpGE => ">=",
            Self::OpEQ => "==",
            Self::OpNE => "!=",
            Self::OpAssign => "=",

            Self::And => "and",
            Self::Or => "or",
            Self::True => "true",
            Self::False => "false",
            Self::Nil => "nil",
            Self::Var => "var",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Fun => "fun",
            Self::Return => "return",
            Self::Class => "class",
            Self::This => "this",
            Self::Super => "super",
            Self::Print => "print",

            Self::Identifier(name) => return write!(fmt, "{}", name),
            Self::StringLiteral(string) => return write!(fmt, "\"{}\"", string),
            Self::Number(value) => return write!(fmt, "{}", value),

            Self::EOF => "end of input",
        };
        fmt.write_str(text)
    }
}


/// Token Output
#[derive(Clone, Debug)]
pub struct TokenMeta {
    pub token: Token,
    pub symbol: DebugSymbol,
    pub lineno: usize,  // line on which the token starts, counting from 1
}
