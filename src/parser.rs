mod errors;

pub mod expr;
pub mod stmt;
pub mod operator;

pub use errors::{ParserError, ParserErrorKind, ContextTag};

use std::rc::Rc;
use std::collections::VecDeque;

use crate::language;
use crate::stack;
use crate::runtime::Symbol;
use crate::lexer::{TokenMeta, Token, LexerError};
use crate::debug::DebugSymbol;

use expr::{ExprMeta, Expr, ExprIdGen, Literal};
use stmt::{StmtMeta, Stmt, FunctionDecl, Param, ClassDecl};
use operator::{UnaryOp, BinaryOp, LogicalOp, Precedence, PRECEDENCE_START, PRECEDENCE_END};
use errors::{ErrorPrototype, ErrorKind, ErrorContext};


// Recursive descent parser

/// Produces one top-level statement (or error) at a time.
///
/// After an error the parser discards tokens up to the next statement boundary and carries on,
/// so a single pass reports every syntax error in the input.
pub struct Parser<'g, T> where T: Iterator<Item=Result<TokenMeta, LexerError>> {
    ids: &'g mut ExprIdGen,
    tokens: T,
    next: Option<Result<TokenMeta, LexerError>>,
    last_symbol: DebugSymbol,  // used to fabricate an EOF if the token stream is cut short
    pending: VecDeque<ParserError>,  // errors found while synchronizing
}

type InternalResult<T> = Result<T, ErrorPrototype>;

impl<'g, T> Iterator for Parser<'g, T> where T: Iterator<Item=Result<TokenMeta, LexerError>> {
    type Item = Result<StmtMeta, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.pop_front() {
            return Some(Err(error));
        }

        let mut ctx = ErrorContext::new(ContextTag::TopLevel);

        // lexer errors between statements do not need synchronization
        match self.peek() {
            Err(error) => return Some(Err(ParserError::from_prototype(error, &ctx))),
            Ok(next) if matches!(next.token, Token::EOF) => return None,
            Ok(..) => { },
        }

        match self.parse_declaration(&mut ctx) {
            Ok(stmt) => Some(Ok(stmt)),
            Err(error) => {
                let error = ParserError::from_prototype(error, &ctx);
                log::debug!("{}", error);
                self.synchronize();
                Some(Err(error))
            }
        }
    }
}

impl<'g, T> Parser<'g, T> where T: Iterator<Item=Result<TokenMeta, LexerError>> {

    pub fn new(ids: &'g mut ExprIdGen, tokens: T) -> Self {
        Parser {
            ids,
            tokens,
            next: None,
            last_symbol: DebugSymbol::new(0, 0),
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Result<TokenMeta, LexerError> {
        // should never run out of tokens as we should always get EOF first
        match self.tokens.next() {
            Some(result) => result,
            None => {
                let end = self.last_symbol.end();
                Ok(TokenMeta { token: Token::EOF, symbol: DebugSymbol::new(end, end), lineno: 0 })
            },
        }
    }

    fn advance(&mut self) -> InternalResult<TokenMeta> {
        let next = match self.next.take() {
            Some(next) => next,
            None => self.next_token(),
        };

        match next {
            Ok(token) => {
                self.last_symbol = token.symbol;
                Ok(token)
            },
            Err(error) => Err(ErrorPrototype::from_lexer_error(error)),
        }
    }

    fn peek(&mut self) -> InternalResult<&TokenMeta> {
        if self.next.is_none() {
            self.next = Some(self.next_token());
        }

        // a lexer error has to be taken out of the lookahead before it can be returned
        match self.next.take() {
            Some(Err(error)) => return Err(ErrorPrototype::from_lexer_error(error)),
            next => self.next = next,
        }

        let next = self.next.as_ref()
            .and_then(|next| next.as_ref().ok())
            .expect("lookahead token was just filled");
        Ok(next)
    }

    fn check(&mut self, expected: &Token) -> InternalResult<bool> {
        Ok(self.peek()?.token == *expected)
    }

    fn advance_if(&mut self, expected: &Token) -> InternalResult<Option<TokenMeta>> {
        if self.check(expected)? {
            return Ok(Some(self.advance()?));
        }
        Ok(None)
    }

    fn expect(&mut self, expected: Token) -> InternalResult<TokenMeta> {
        let next = self.peek()?;
        if next.token != expected {
            return Err(ErrorPrototype::new(ErrorKind::ExpectedToken(expected), &next.symbol));
        }
        self.advance()
    }

    fn expect_identifier(&mut self) -> InternalResult<(Symbol, DebugSymbol)> {
        let next = self.peek()?;
        match next.token {
            Token::Identifier(name) => {
                let symbol = next.symbol;
                self.advance()?;
                Ok((name, symbol))
            },
            _ => Err(ErrorPrototype::new(ErrorKind::ExpectedIdentifier, &next.symbol)),
        }
    }

    fn new_expr(&mut self, variant: Expr, symbol: DebugSymbol) -> ExprMeta {
        ExprMeta::new(self.ids.next_id(), variant, symbol)
    }

    // Discards tokens until we reach a statement boundary
    fn synchronize(&mut self) {
        loop {
            let next = match self.advance() {
                Ok(next) => next,
                Err(error) => {
                    let ctx = ErrorContext::new(ContextTag::TopLevel);
                    self.pending.push_back(ParserError::from_prototype(error, &ctx));
                    continue;
                },
            };

            match next.token {
                Token::EOF => {
                    // leave the EOF for the next call to see
                    self.next = Some(Ok(next));
                    return;
                },
                Token::Semicolon => return,
                _ => { },
            }

            let at_boundary = match self.peek() {
                Ok(next) => matches!(next.token,
                    Token::Class | Token::Fun | Token::Var | Token::For
                    | Token::If | Token::While | Token::Print | Token::Return
                ),
                Err(error) => {
                    let ctx = ErrorContext::new(ContextTag::TopLevel);
                    self.pending.push_back(ParserError::from_prototype(error, &ctx));
                    false
                },
            };

            if at_boundary {
                return;
            }
        }
    }

    /*** Statement Parsing ***/

    /*
        declaration ::= class-decl | fun-decl | var-decl | statement ;
    */
    fn parse_declaration(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        stack::ensure_sufficient_stack(|| {
            match self.peek()?.token {
                Token::Class => self.parse_class_decl(ctx),

                Token::Fun => {
                    let start = self.advance()?.symbol;
                    let decl = self.parse_function(ctx)?;
                    let symbol = start.join(&self.last_symbol);
                    Ok(StmtMeta::new(Stmt::Function(decl), symbol))
                },

                Token::Var => self.parse_var_decl(ctx),

                _ => self.parse_statement(ctx),
            }
        })
    }

    /*
        class-decl ::= "class" IDENTIFIER ( "<" IDENTIFIER )? "{" function* "}" ;
    */
    fn parse_class_decl(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::ClassDecl);

        let start = self.expect(Token::Class)?.symbol;
        let (name, name_symbol) = self.expect_identifier()?;

        let mut superclass = None;
        if self.advance_if(&Token::OpLT)?.is_some() {
            let (super_name, super_symbol) = self.expect_identifier()?;
            superclass.replace(self.new_expr(Expr::Variable(super_name), super_symbol));
        }

        self.expect(Token::OpenBrace)?;

        let mut methods = Vec::new();
        while !self.check(&Token::CloseBrace)? && !self.check(&Token::EOF)? {
            methods.push(self.parse_function(ctx)?);
        }

        let end = self.expect(Token::CloseBrace)?.symbol;

        ctx.pop();
        let decl = ClassDecl::new(name, superclass, methods, name_symbol);
        Ok(StmtMeta::new(Stmt::Class(decl), start.join(&end)))
    }

    /*
        function ::= IDENTIFIER "(" parameters? ")" block ;
        parameters ::= IDENTIFIER ( "," IDENTIFIER )* ;
    */
    fn parse_function(&mut self, ctx: &mut ErrorContext) -> InternalResult<Rc<FunctionDecl>> {
        ctx.push(ContextTag::FunDecl);

        let (name, name_symbol) = self.expect_identifier()?;

        self.expect(Token::OpenParen)?;

        let mut params = Vec::new();
        if !self.check(&Token::CloseParen)? {
            loop {
                let (param, param_symbol) = self.expect_identifier()?;
                if params.len() >= language::MAX_ARGS {
                    return Err(ErrorPrototype::new(ErrorKind::TooManyParameters, &param_symbol));
                }
                params.push(Param::new(param, param_symbol));

                if self.advance_if(&Token::Comma)?.is_none() {
                    break;
                }
            }
        }

        self.expect(Token::CloseParen)?;

        let body = self.parse_block(ctx)?;

        ctx.pop();
        Ok(Rc::new(FunctionDecl::new(name, params, body, name_symbol)))
    }

    /*
        var-decl ::= "var" IDENTIFIER ( "=" expression )? ";" ;
    */
    fn parse_var_decl(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::VarDecl);

        let start = self.expect(Token::Var)?.symbol;
        let (name, _) = self.expect_identifier()?;

        let mut init = None;
        if self.advance_if(&Token::OpAssign)?.is_some() {
            init.replace(self.parse_expr(ctx)?);
        }

        let end = self.expect(Token::Semicolon)?.symbol;

        ctx.pop();
        Ok(StmtMeta::new(Stmt::Var { name, init }, start.join(&end)))
    }

    /*
        statement ::= expr-stmt | for-stmt | if-stmt | print-stmt | return-stmt | while-stmt | block ;
    */
    fn parse_statement(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        stack::ensure_sufficient_stack(|| {
            match self.peek()?.token {
                Token::For => self.parse_for_stmt(ctx),
                Token::If => self.parse_if_stmt(ctx),
                Token::Print => self.parse_print_stmt(ctx),
                Token::Return => self.parse_return_stmt(ctx),
                Token::While => self.parse_while_stmt(ctx),

                Token::OpenBrace => {
                    let start = self.peek()?.symbol;
                    let body = self.parse_block(ctx)?;
                    let symbol = start.join(&self.last_symbol);
                    Ok(StmtMeta::new(Stmt::Block(body.into_boxed_slice()), symbol))
                },

                _ => self.parse_expr_stmt(ctx),
            }
        })
    }

    /*
        block ::= "{" declaration* "}" ;
    */
    fn parse_block(&mut self, ctx: &mut ErrorContext) -> InternalResult<Vec<StmtMeta>> {
        ctx.push(ContextTag::Block);

        self.expect(Token::OpenBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&Token::CloseBrace)? && !self.check(&Token::EOF)? {
            stmts.push(self.parse_declaration(ctx)?);
        }

        self.expect(Token::CloseBrace)?;

        ctx.pop();
        Ok(stmts)
    }

    fn parse_expr_stmt(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::ExprStmt);

        let expr = self.parse_expr(ctx)?;
        let end = self.expect(Token::Semicolon)?.symbol;

        ctx.pop();
        let symbol = expr.debug_symbol().join(&end);
        Ok(StmtMeta::new(Stmt::Expression(expr), symbol))
    }

    fn parse_print_stmt(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::PrintStmt);

        let start = self.expect(Token::Print)?.symbol;
        let expr = self.parse_expr(ctx)?;
        let end = self.expect(Token::Semicolon)?.symbol;

        ctx.pop();
        Ok(StmtMeta::new(Stmt::Print(expr), start.join(&end)))
    }

    fn parse_return_stmt(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::ReturnStmt);

        let start = self.expect(Token::Return)?.symbol;

        let mut value = None;
        if !self.check(&Token::Semicolon)? {
            value.replace(self.parse_expr(ctx)?);
        }

        let end = self.expect(Token::Semicolon)?.symbol;

        ctx.pop();
        Ok(StmtMeta::new(Stmt::Return(value), start.join(&end)))
    }

    /*
        if-stmt ::= "if" "(" expression ")" statement ( "else" statement )? ;
    */
    fn parse_if_stmt(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::IfStmt);

        let start = self.expect(Token::If)?.symbol;
        self.expect(Token::OpenParen)?;
        let condition = self.parse_expr(ctx)?;
        self.expect(Token::CloseParen)?;

        let then_branch = Box::new(self.parse_statement(ctx)?);

        let mut else_branch = None;
        if self.advance_if(&Token::Else)?.is_some() {
            else_branch.replace(Box::new(self.parse_statement(ctx)?));
        }

        ctx.pop();
        let symbol = start.join(&self.last_symbol);
        Ok(StmtMeta::new(Stmt::If { condition, then_branch, else_branch }, symbol))
    }

    /*
        while-stmt ::= "while" "(" expression ")" statement ;
    */
    fn parse_while_stmt(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::WhileStmt);

        let start = self.expect(Token::While)?.symbol;
        self.expect(Token::OpenParen)?;
        let condition = self.parse_expr(ctx)?;
        self.expect(Token::CloseParen)?;

        let body = Box::new(self.parse_statement(ctx)?);

        ctx.pop();
        let symbol = start.join(&self.last_symbol);
        Ok(StmtMeta::new(Stmt::While { condition, body }, symbol))
    }

    /*
        for-stmt ::= "for" "(" ( var-decl | expr-stmt | ";" ) expression? ";" expression? ")" statement ;

        There is no loop node for this, the result is built out of a block and a while statement:
        { init; while (condition) { body; increment; } }
    */
    fn parse_for_stmt(&mut self, ctx: &mut ErrorContext) -> InternalResult<StmtMeta> {
        ctx.push(ContextTag::ForStmt);

        let start = self.expect(Token::For)?.symbol;
        self.expect(Token::OpenParen)?;

        let init = match self.peek()?.token {
            Token::Semicolon => {
                self.advance()?;
                None
            },
            Token::Var => Some(self.parse_var_decl(ctx)?),
            _ => Some(self.parse_expr_stmt(ctx)?),
        };

        let mut condition = None;
        if !self.check(&Token::Semicolon)? {
            condition.replace(self.parse_expr(ctx)?);
        }
        let cond_end = self.expect(Token::Semicolon)?.symbol;

        let mut increment = None;
        if !self.check(&Token::CloseParen)? {
            increment.replace(self.parse_expr(ctx)?);
        }
        self.expect(Token::CloseParen)?;

        let mut body = self.parse_statement(ctx)?;

        ctx.pop();
        let symbol = start.join(&self.last_symbol);

        if let Some(increment) = increment {
            let incr_symbol = *increment.debug_symbol();
            let body_symbol = *body.debug_symbol();
            body = StmtMeta::new(
                Stmt::Block(vec![ body, StmtMeta::new(Stmt::Expression(increment), incr_symbol) ].into_boxed_slice()),
                body_symbol,
            );
        }

        let condition = match condition {
            Some(condition) => condition,
            None => self.new_expr(Expr::Literal(Literal::Bool(true)), cond_end),
        };

        let mut stmt = StmtMeta::new(Stmt::While { condition, body: Box::new(body) }, symbol);

        if let Some(init) = init {
            stmt = StmtMeta::new(Stmt::Block(vec![ init, stmt ].into_boxed_slice()), symbol);
        }

        Ok(stmt)
    }

    /*** Expression Parsing ***/

    fn parse_expr(&mut self, ctx: &mut ErrorContext) -> InternalResult<ExprMeta> {
        stack::ensure_sufficient_stack(|| {
            ctx.push(ContextTag::Expr);
            let expr = self.parse_assignment_expr(ctx)?;
            ctx.pop();
            Ok(expr)
        })
    }

    /*
        assignment ::= ( call "." )? IDENTIFIER "=" assignment | logic-or ;
    */
    fn parse_assignment_expr(&mut self, ctx: &mut ErrorContext) -> InternalResult<ExprMeta> {
        stack::ensure_sufficient_stack(|| {
            // descend recursively
            let expr = self.parse_logical_or(ctx)?;

            if let Some(assign) = self.advance_if(&Token::OpAssign)? {
                ctx.push(ContextTag::AssignmentExpr);

                let value = Box::new(self.parse_assignment_expr(ctx)?);
                let symbol = expr.debug_symbol().join(value.debug_symbol());

                // LHS of assignment has to be a variable or a property
                let variant = match expr.take_variant() {
                    Expr::Variable(name) => Expr::Assign { name, value },
                    Expr::Get { object, name } => Expr::Set { object, name, value },
                    _ => return Err(ErrorPrototype::new(ErrorKind::InvalidAssignmentTarget, &assign.symbol)),
                };

                ctx.pop();
                return Ok(self.new_expr(variant, symbol));
            }

            Ok(expr)
        })
    }

    fn parse_logical_or(&mut self, ctx: &mut ErrorContext) -> InternalResult<ExprMeta> {
        let mut expr = self.parse_logical_and(ctx)?;

        while self.advance_if(&Token::Or)?.is_some() {
            let rhs = self.parse_logical_and(ctx)?;
            expr = self.logical_expr(LogicalOp::Or, expr, rhs);
        }

        Ok(expr)
    }

    fn parse_logical_and(&mut self, ctx: &mut ErrorContext) -> InternalResult<ExprMeta> {
        let mut expr = self.parse_binop_expr(ctx, PRECEDENCE_START)?;

        while self.advance_if(&Token::And)?.is_some() {
            let rhs = self.parse_binop_expr(ctx, PRECEDENCE_START)?;
            expr = self.logical_expr(LogicalOp::And, expr, rhs);
        }

        Ok(expr)
    }

    fn logical_expr(&mut self, op: LogicalOp, lhs: ExprMeta, rhs: ExprMeta) -> ExprMeta {
        let symbol = lhs.debug_symbol().join(rhs.debug_symbol());
        let variant = Expr::Logical { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        self.new_expr(variant, symbol)
    }

    /*
        Binary operator syntax:

        operand[0] ::= unary ;
        operand[N] ::= operand[N-1] ( OPERATOR[N] operand[N-1] )* ;
    */
    fn parse_binop_expr(&mut self, ctx: &mut ErrorContext, level: Precedence) -> InternalResult<ExprMeta> {
        if level == PRECEDENCE_END {
            return self.parse_unary_expr(ctx);  // exit binop precedence recursion
        }

        let mut expr = self.parse_binop_expr(ctx, level - 1)?;

        loop {
            let binary_op = match Self::which_binary_op(&self.peek()?.token) {
                Some(op) if op.precedence_level() == level => op,
                _ => break,
            };

            self.advance()?; // consume binary_op token

            let rhs = self.parse_binop_expr(ctx, level - 1)?;

            let symbol = expr.debug_symbol().join(rhs.debug_symbol());
            let variant = Expr::Binary { op: binary_op, lhs: Box::new(expr), rhs: Box::new(rhs) };
            expr = self.new_expr(variant, symbol);
        }

        Ok(expr)
    }

    /*
        Unary operator syntax:

        unary ::= ( "-" | "!" ) unary | call ;
    */
    fn parse_unary_expr(&mut self, ctx: &mut ErrorContext) -> InternalResult<ExprMeta> {
        stack::ensure_sufficient_stack(|| {
            if let Some(unary_op) = Self::which_unary_op(&self.peek()?.token) {
                let start = self.advance()?.symbol; // consume unary_op token

                let operand = self.parse_unary_expr(ctx)?;

                let symbol = start.join(operand.debug_symbol());
                let variant = Expr::Unary { op: unary_op, operand: Box::new(operand) };
                return Ok(self.new_expr(variant, symbol));
            }

            self.parse_call_expr(ctx)
        })
    }

    /*
        call ::= primary ( "(" arguments? ")" | "." IDENTIFIER )* ;
        arguments ::= expression ( "," expression )* ;
    */
    fn parse_call_expr(&mut self, ctx: &mut ErrorContext) -> InternalResult<ExprMeta> {
        let mut expr = self.parse_primary(ctx)?;

        loop {
            match self.peek()?.token {

                Token::OpenParen => {
                    ctx.push(ContextTag::CallExpr);
                    self.advance()?;

                    let mut args = Vec::new();
                    if !self.check(&Token::CloseParen)? {
                        loop {
                            let arg = self.parse_expr(ctx)?;
                            if args.len() >= language::MAX_ARGS {
                                return Err(ErrorPrototype::new(ErrorKind::TooManyArguments, arg.debug_symbol()));
                            }
                            args.push(arg);

                            if self.advance_if(&Token::Comma)?.is_none() {
                                break;
                            }
                        }
                    }

                    let end = self.expect(Token::CloseParen)?.symbol;

                    ctx.pop();
                    let symbol = expr.debug_symbol().join(&end);
                    let variant = Expr::Call { callee: Box::new(expr), args: args.into_boxed_slice() };
                    expr = self.new_expr(variant, symbol);
                },

                Token::Dot => {
                    ctx.push(ContextTag::MemberAccess);
                    self.advance()?;

                    let (name, end) = self.expect_identifier()?;

                    ctx.pop();
                    let symbol = expr.debug_symbol().join(&end);
                    let variant = Expr::Get { object: Box::new(expr), name };
                    expr = self.new_expr(variant, symbol);
                },

                _ => break,
            }
        }

        Ok(expr)
    }

    /*
        primary ::= "true" | "false" | "nil" | "this" | NUMBER | STRING | IDENTIFIER
                  | "(" expression ")" | "super" "." IDENTIFIER ;
    */
    fn parse_primary(&mut self, ctx: &mut ErrorContext) -> InternalResult<ExprMeta> {
        let next = self.advance()?;
        let symbol = next.symbol;

        let variant = match next.token {
            Token::Nil => Expr::Literal(Literal::Nil),
            Token::True => Expr::Literal(Literal::Bool(true)),
            Token::False => Expr::Literal(Literal::Bool(false)),
            Token::Number(value) => Expr::Literal(Literal::Number(value)),
            Token::StringLiteral(value) => Expr::Literal(Literal::String(value)),

            Token::Identifier(name) => Expr::Variable(name),

            Token::This => Expr::This,

            Token::Super => {
                ctx.push(ContextTag::SuperAccess);
                self.expect(Token::Dot)?;
                let (method, end) = self.expect_identifier()?;
                ctx.pop();

                return Ok(self.new_expr(Expr::Super { method }, symbol.join(&end)));
            },

            // "(" expression ")"
            Token::OpenParen => {
                ctx.push(ContextTag::Group);
                let inner = self.parse_expr(ctx)?;
                let end = self.expect(Token::CloseParen)?.symbol;
                ctx.pop();

                return Ok(self.new_expr(Expr::Group(Box::new(inner)), symbol.join(&end)));
            },

            _ => {
                // leave the offending token for synchronization
                self.next = Some(Ok(next));
                return Err(ErrorPrototype::new(ErrorKind::ExpectedStartOfExpr, &symbol));
            },
        };

        Ok(self.new_expr(variant, symbol))
    }

    fn which_unary_op(token: &Token) -> Option<UnaryOp> {
        let op = match token {
            Token::OpSub => UnaryOp::Neg,
            Token::OpNot => UnaryOp::Not,

            _ => return None,
        };

        Some(op)
    }

    fn which_binary_op(token: &Token) -> Option<BinaryOp> {
        let op = match token {
            Token::OpMul => BinaryOp::Mul,
            Token::OpDiv => BinaryOp::Div,
            Token::OpAdd => BinaryOp::Add,
            Token::OpSub => BinaryOp::Sub,
            Token::OpLT => BinaryOp::LT,
            Token::OpGT => BinaryOp::GT,
            Token::OpLE => BinaryOp::LE,
            Token::OpGE => BinaryOp::GE,
            Token::OpEQ => BinaryOp::EQ,
            Token::OpNE => BinaryOp::NE,

            _ => return None,
        };

        Some(op)
    }
}
