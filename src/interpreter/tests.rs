#![cfg(test)]

use test_log::test;

use crate::utils::SharedBuffer;
use crate::source::{ModuleSource, SourceType, ParseContext};
use crate::debug::SourceError;
use crate::interpreter::Interpreter;
use crate::runtime::Symbol;
use crate::runtime::errors::{ExecResult, ErrorKind};


// one interpreter session, like a REPL
struct Session {
    parse_ctx: ParseContext,
    interpreter: Interpreter,
    output: SharedBuffer,
}

impl Session {
    fn new() -> Self {
        let output = SharedBuffer::new();
        Self {
            parse_ctx: ParseContext::new(),
            interpreter: Interpreter::new(Box::new(output.clone())),
            output,
        }
    }

    fn run(&mut self, source: &str) -> ExecResult<()> {
        let module = ModuleSource::new("<test>", SourceType::String(source.to_string()));
        let ast = crate::build_module(&mut self.parse_ctx, &module)
            .expect("build failed");
        self.interpreter.execute(ast)
    }

    fn run_ok(&mut self, source: &str) -> Vec<String> {
        self.output.clear();
        if let Err(error) = self.run(source) {
            panic!("{}", error);
        }
        self.lines()
    }

    fn run_err(&mut self, source: &str) -> ErrorKind {
        match self.run(source) {
            Ok(..) => panic!("expected a runtime error"),
            Err(error) => error.kind(),
        }
    }

    fn lines(&self) -> Vec<String> {
        self.output.contents().lines().map(String::from).collect()
    }
}

fn run(source: &str) -> Vec<String> {
    Session::new().run_ok(source)
}

fn run_err(source: &str) -> ErrorKind {
    Session::new().run_err(source)
}


#[test]
fn interpreter_prints_values() {
    let lines = run(r#"
        print nil;
        print true;
        print 3;
        print 1.5;
        print "text";
        print clock;
        fun f() { }
        print f;
        class A { }
        print A;
        print A();
    "#);

    assert_eq!(lines, [
        "nil", "true", "3", "1.5", "text",
        "<fn clock>", "<fn f>", "A", "A instance",
    ]);
}

#[test]
fn interpreter_block_shadowing() {
    let lines = run(r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
    "#);

    assert_eq!(lines, ["inner", "outer"]);
}

#[test]
fn interpreter_closures_capture_by_reference() {
    let lines = run(r#"
        fun make() {
            var n = 0;
            fun inc() {
                n = n + 1;
                return n;
            }
            return inc;
        }
        var c = make();
        print c();
        print c();

        var x = 1;
        fun get() { return x; }
        x = 2;
        print get();
    "#);

    assert_eq!(lines, ["1", "2", "2"]);
}

#[test]
fn interpreter_closures_bind_statically() {
    // the later declaration in the block must not change what `show` sees
    let lines = run(r#"
        var a = "global";
        {
            fun show() {
                print a;
            }
            show();
            var a = "block";
            show();
        }
    "#);

    assert_eq!(lines, ["global", "global"]);
}

#[test]
fn interpreter_control_flow() {
    let lines = run(r#"
        var sum = 0;
        for (var i = 1; i <= 4; i = i + 1) {
            sum = sum + i;
        }
        print sum;

        var n = 0;
        while (n < 3) n = n + 1;
        print n;

        if (n == 3) print "then"; else print "else";
        if (n != 3) print "then"; else print "else";

        fun find() {
            var i = 0;
            while (true) {
                if (i == 5) return i;
                i = i + 1;
            }
        }
        print find();

        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
    "#);

    assert_eq!(lines, ["10", "3", "then", "else", "5", "55"]);
}

#[test]
fn interpreter_truthiness() {
    let lines = run(r#"
        if (0) print "zero";
        if ("") print "empty";
        if (nil) print "nil"; else print "not nil";
        if (false) print "false"; else print "not false";
        print !nil;
        print !0;
    "#);

    assert_eq!(lines, ["zero", "empty", "not nil", "not false", "true", "false"]);
}

#[test]
fn interpreter_logical_ops_short_circuit() {
    let lines = run(r#"
        print nil or "right";
        print "left" or undefined;
        print false and undefined;
        print 1 and 2;
    "#);

    assert_eq!(lines, ["right", "left", "false", "2"]);
}

#[test]
fn interpreter_arithmetic_and_equality() {
    let lines = run(r#"
        print 1 + 1;
        print "a" + "b";
        print 2 * 3 - 4 / 2;
        print -(1 + 2);
        print 1 / 0;
        print 1 == "1";
        print nil == nil;
        print "a" == "a";
        print 2 >= 2;
    "#);

    assert_eq!(lines, ["2", "ab", "4", "-3", "inf", "false", "true", "true", "true"]);
}

#[test]
fn interpreter_type_mismatch() {
    assert_eq!(run_err(r#" "a" + 1; "#), ErrorKind::TypeMismatch);
    assert_eq!(run_err("1 < nil;"), ErrorKind::TypeMismatch);
    assert_eq!(run_err(r#" -"a"; "#), ErrorKind::TypeMismatch);
    assert_eq!(run_err("var x = 1; x.field;"), ErrorKind::TypeMismatch);
    assert_eq!(run_err("var x = 1; x.field = 2;"), ErrorKind::TypeMismatch);
}

#[test]
fn interpreter_undefined_names() {
    assert_eq!(run_err("print missing;"), ErrorKind::UndefinedVariable);

    // assignment never creates a global
    assert_eq!(run_err("missing = 1;"), ErrorKind::UndefinedVariable);

    assert_eq!(run_err("class A { } A().missing;"), ErrorKind::UndefinedProperty);
}

#[test]
fn interpreter_instance_fields_are_not_scoped() {
    // a field table never falls back to globals or to the surrounding scope
    assert_eq!(run_err("var x = 1; class A { } A().x;"), ErrorKind::UndefinedProperty);
    assert_eq!(run_err("class A { } { var y = 2; A().y; }"), ErrorKind::UndefinedProperty);

    let lines = run("var x = 1; class A { } var a = A(); a.x = 2; print a.x; print x;");
    assert_eq!(lines, ["2", "1"]);
}

#[test]
fn interpreter_call_errors() {
    assert_eq!(run_err(r#" "text"(); "#), ErrorKind::NotCallable);
    assert_eq!(run_err("fun f(a) { } f(1, 2);"), ErrorKind::ArityMismatch);
    assert_eq!(run_err("fun f(a, b) { } f(1);"), ErrorKind::ArityMismatch);
    assert_eq!(run_err("class A { init(x) { } } A();"), ErrorKind::ArityMismatch);
    assert_eq!(run_err("class A { } A(1);"), ErrorKind::ArityMismatch);
    assert_eq!(run_err("clock(1);"), ErrorKind::ArityMismatch);
}

#[test]
fn interpreter_runtime_errors_carry_location() {
    let mut session = Session::new();
    let error = session.run("var a = 1;\nprint a + nil;").unwrap_err();
    let symbol = error.debug_symbol().expect("no location");

    // the binary expression `a + nil`
    assert_eq!((symbol.start(), symbol.end()), (17, 24));
}

#[test]
fn interpreter_instances_and_methods() {
    let lines = run(r#"
        class Counter {
            init(start) {
                this.count = start;
            }
            incr() {
                this.count = this.count + 1;
                return this;
            }
        }

        var c = Counter(5);
        c.incr().incr();
        print c.count;

        // methods stay bound when taken off the instance
        var incr = c.incr;
        incr();
        print c.count;

        // fields shadow methods
        c.incr = "field";
        print c.incr;
    "#);

    assert_eq!(lines, ["7", "8", "field"]);
}

#[test]
fn interpreter_initializer_returns_this() {
    let lines = run(r#"
        class P {
            init(x) {
                this.x = x;
                return;
            }
        }
        var p = P(3);
        print p.x;
        print p.init(4) == p;
        print p.x;
    "#);

    assert_eq!(lines, ["3", "true", "4"]);
}

#[test]
fn interpreter_super_dispatch() {
    let lines = run(r#"
        class A {
            greet() { return "A"; }
        }
        class B < A {
            greet() { return super.greet() + "B"; }
        }
        print B().greet();
    "#);

    assert_eq!(lines, ["AB"]);
}

#[test]
fn interpreter_super_binds_current_this() {
    let lines = run(r#"
        class A {
            init(name) { this.name = name; }
            describe() { return "A:" + this.name; }
        }
        class B < A {
            init() { super.init("b"); }
            describe() { return "B/" + super.describe(); }
        }
        class C < B { }

        print C().describe();

        var inherited = B();
        print inherited.name;
    "#);

    assert_eq!(lines, ["B/A:b", "b"]);
}

#[test]
fn interpreter_superclass_must_be_a_class() {
    assert_eq!(run_err("var NotClass = 1; class B < NotClass { }"), ErrorKind::TypeMismatch);
}

#[test]
fn interpreter_builtins() {
    let lines = run(r#"
        print type(nil);
        print type(1);
        print type("s");
        print type(clock);
        print str(1.5) + "!";
        print num("42") + 1;
        print num(7);
        print clock() >= 0;
    "#);

    assert_eq!(lines, ["nil", "number", "string", "function", "1.5!", "43", "7", "true"]);

    assert_eq!(run_err(r#" num("forty-two"); "#), ErrorKind::InvalidValue);
    assert_eq!(run_err("num(nil);"), ErrorKind::InvalidValue);
}

#[test]
fn interpreter_continues_after_runtime_error() {
    let mut session = Session::new();

    session.run_ok("var a = 1;");
    assert_eq!(session.run_err("a = 2; fun f() { var local = 0; missing(); } f();"), ErrorKind::UndefinedVariable);

    // assignments made before the error are kept, and the failed call left no frame behind
    assert_eq!(session.run_ok("var b = a + 1; print b;"), ["3"]);

    let b = Symbol::intern("b");
    assert!(session.interpreter.globals().has_name(&b));
}

#[test]
fn interpreter_session_shares_globals_across_inputs() {
    let mut session = Session::new();
    session.run_ok("fun make() { var n = 10; fun get() { return n; } return get; }");
    session.run_ok("var get = make();");
    assert_eq!(session.run_ok("print get();"), ["10"]);
}

#[test]
fn interpreter_limits_recursion_depth() {
    let mut session = Session::new();
    session.interpreter.set_max_call_depth(5_000);

    let kind = session.run_err("fun forever(n) { return forever(n + 1); } forever(0);");
    assert_eq!(kind, ErrorKind::StackOverflow);

    // the session is still usable afterwards
    assert_eq!(session.run_ok("print forever;"), ["<fn forever>"]);
}

#[test]
fn interpreter_deep_recursion_fits_on_a_default_thread() {
    let lines = run("
        fun count(n) {
            if (n == 0) return 0;
            return 1 + count(n - 1);
        }
        print count(20000);
    ");
    assert_eq!(lines, ["20000"]);
}

#[test]
fn interpreter_deeply_nested_source() {
    let depth = 20_000;

    let groups = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(run(&groups), ["1"]);

    let negations = format!("print {}true;", "!".repeat(depth));
    assert_eq!(run(&negations), ["true"]);

    let blocks = format!("{}var a = 1; print a;{}", "{".repeat(depth), "}".repeat(depth));
    assert_eq!(run(&blocks), ["1"]);

    let chained = format!("var a; {}1; print a;", "a = ".repeat(depth));
    assert_eq!(run(&chained), ["1"]);
}
