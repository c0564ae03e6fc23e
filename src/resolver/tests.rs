#![cfg(test)]

use std::error::Error;
use test_log::test;

use crate::source::{ModuleSource, SourceType, ParseContext};
use crate::parser::expr::{Expr, ExprMeta};
use crate::parser::stmt::{StmtMeta, Stmt};
use crate::resolver::{Resolver, ResolvedAst, ResolverError, ResolverErrorKind};


fn resolve(source: &str) -> Result<ResolvedAst, Vec<ResolverError>> {
    let module = ModuleSource::new("<test>", SourceType::String(source.to_string()));
    let stmts = ParseContext::new()
        .parse_ast(module.source_text().unwrap())
        .expect("syntax error");

    Resolver::new().resolve_ast(stmts)
}

fn resolve_ok(source: &str) -> ResolvedAst {
    match resolve(source) {
        Ok(ast) => ast,
        Err(errors) => panic!("unexpected errors: {:?}", errors),
    }
}

fn error_kinds(source: &str) -> Vec<ResolverErrorKind> {
    match resolve(source) {
        Ok(..) => panic!("expected errors"),
        Err(errors) => errors.iter().map(|error| *error.kind()).collect(),
    }
}

// find the expression of every `print` statement, in order
fn printed_exprs(stmts: &[StmtMeta]) -> Vec<&ExprMeta> {
    let mut exprs = Vec::new();
    for stmt in stmts.iter() {
        match stmt.variant() {
            Stmt::Print(expr) => exprs.push(expr),
            Stmt::Block(inner) => exprs.extend(printed_exprs(inner)),
            Stmt::Function(decl) => exprs.extend(printed_exprs(decl.body())),
            Stmt::Class(decl) => for method in decl.methods().iter() {
                exprs.extend(printed_exprs(method.body()));
            },
            _ => { },
        }
    }
    exprs
}


#[test]
fn resolver_leaves_globals_unresolved() {
    let ast = resolve_ok("var a = 1; print a;");
    let exprs = printed_exprs(ast.stmts());
    assert!(ast.resolutions().get(&exprs[0].id()).is_none());
}

#[test]
fn resolver_computes_depth_of_shadowed_names() {
    let ast = resolve_ok("
        {
            var a = 1;
            {
                print a;
                var a = 2;
                {
                    print a;
                }
            }
        }
    ");

    let exprs = printed_exprs(ast.stmts());
    assert_eq!(ast.resolutions().get(&exprs[0].id()), Some(&1));
    assert_eq!(ast.resolutions().get(&exprs[1].id()), Some(&1));
}

#[test]
fn resolver_places_params_in_the_body_scope() {
    let ast = resolve_ok("
        fun f(x) {
            print x;
            {
                print x;
            }
        }
    ");

    let exprs = printed_exprs(ast.stmts());
    assert_eq!(ast.resolutions().get(&exprs[0].id()), Some(&0));
    assert_eq!(ast.resolutions().get(&exprs[1].id()), Some(&1));
}

#[test]
fn resolver_resolves_this_and_super_through_class_scopes() {
    let ast = resolve_ok("
        class A { m() { } }
        class B < A {
            m() {
                print this;
                print super.m;
            }
        }
    ");

    let exprs = printed_exprs(ast.stmts());
    assert!(matches!(exprs[0].variant(), Expr::This));
    assert_eq!(ast.resolutions().get(&exprs[0].id()), Some(&1));

    // `super` sits one scope further out than `this`
    assert!(matches!(exprs[1].variant(), Expr::Super { .. }));
    assert_eq!(ast.resolutions().get(&exprs[1].id()), Some(&2));
}

#[test]
fn resolver_allows_global_redeclaration() {
    resolve_ok("var a = 1; var a = 2; var a = a;");
}

#[test]
fn resolver_rejects_duplicate_locals() {
    let kinds = error_kinds("{ var a = 1; var a = 2; }");
    assert!(matches!(kinds.as_slice(), [ResolverErrorKind::DuplicateDeclaration(..)]));

    let kinds = error_kinds("fun f(a, a) { }");
    assert!(matches!(kinds.as_slice(), [ResolverErrorKind::DuplicateDeclaration(..)]));
}

#[test]
fn resolver_rejects_read_in_own_initializer() {
    let kinds = error_kinds("{ var a = 1; { var a = a; } }");
    assert!(matches!(kinds.as_slice(), [ResolverErrorKind::ReadInOwnInitializer(..)]));
}

#[test]
fn resolver_rejects_top_level_return() {
    assert_eq!(error_kinds("return;"), vec![ResolverErrorKind::ReturnFromTopLevel]);
}

#[test]
fn resolver_rejects_return_value_from_init() {
    assert_eq!(
        error_kinds("class A { init() { return 1; } }"),
        vec![ResolverErrorKind::ReturnValueFromInit],
    );

    // a bare return is fine
    resolve_ok("class A { init() { return; } }");
}

#[test]
fn resolver_rejects_this_and_super_outside_classes() {
    assert_eq!(error_kinds("print this;"), vec![ResolverErrorKind::ThisOutsideClass]);
    assert_eq!(error_kinds("fun f() { super.m(); }"), vec![ResolverErrorKind::SuperOutsideClass]);
    assert_eq!(
        error_kinds("class A { m() { super.m(); } }"),
        vec![ResolverErrorKind::SuperWithoutSuperclass],
    );
}

#[test]
fn resolver_rejects_self_inheritance() {
    assert_eq!(error_kinds("class A < A { }"), vec![ResolverErrorKind::SelfInheritance]);
}

#[test]
fn resolver_collects_every_error() {
    let kinds = error_kinds("
        return 1;
        print this;
        { var x = 1; var x = 2; }
        class A < A { init() { return 2; } }
    ");

    assert_eq!(kinds.len(), 5);
}

#[test]
fn resolver_errors_have_no_underlying_cause() {
    let errors = match resolve("{ var a = a; }") {
        Ok(..) => panic!("expected errors"),
        Err(errors) => errors,
    };

    assert_eq!(errors.len(), 1);
    assert!(errors[0].source().is_none());
    assert!(errors[0].to_string().contains("own initializer"));
}
