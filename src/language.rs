use crate::lexer::Token;


pub type FloatType = f64;  // internal representation for numbers


pub static COMMENT_START: &str = "//";

/// Maximum number of arguments in a call, or parameters in a function declaration
pub const MAX_ARGS: usize = 255;

/// Default number of nested function or class invocations before the running program is aborted.
/// The native stack grows on demand, so this only bounds the memory a runaway recursion can take.
pub const MAX_CALL_DEPTH: usize = 100_000;

// names with special meaning to the resolver and interpreter
pub static THIS_NAME: &str = "this";
pub static SUPER_NAME: &str = "super";
pub static INIT_NAME: &str = "init";


pub fn keyword(ident: &str) -> Option<Token> {
    let token = match ident {
        "and"    => Token::And,
        "class"  => Token::Class,
        "else"   => Token::Else,
        "false"  => Token::False,
        "for"    => Token::For,
        "fun"    => Token::Fun,
        "if"     => Token::If,
        "nil"    => Token::Nil,
        "or"     => Token::Or,
        "print"  => Token::Print,
        "return" => Token::Return,
        "super"  => Token::Super,
        "this"   => Token::This,
        "true"   => Token::True,
        "var"    => Token::Var,
        "while"  => Token::While,
        _ => return None,
    };
    Some(token)
}
