use std::fs;
use std::path::{Path, PathBuf};

use loxwalk::utils::SharedBuffer;
use loxwalk::source::{ModuleSource, SourceType, ParseContext};
use loxwalk::interpreter::Interpreter;


const EXPECT_OUTPUT: &str = "// expect: ";
const EXPECT_RUNTIME_ERROR: &str = "// expect runtime error: ";
const EXPECT_ERROR: &str = "// expect error";

// expectations are written into each script as comments
#[derive(Debug, Default)]
struct Expected {
    output: Vec<String>,
    runtime_error: Option<String>,
    build_error: bool,
}

impl Expected {
    fn read_script(path: &Path) -> Self {
        let text = fs::read_to_string(path).expect("could not read script");

        let mut expected = Self::default();
        for line in text.lines() {
            if let Some(idx) = line.find(EXPECT_OUTPUT) {
                expected.output.push(line[idx + EXPECT_OUTPUT.len()..].to_string());
            } else if let Some(idx) = line.find(EXPECT_RUNTIME_ERROR) {
                expected.runtime_error = Some(line[idx + EXPECT_RUNTIME_ERROR.len()..].to_string());
            } else if line.contains(EXPECT_ERROR) {
                expected.build_error = true;
            }
        }
        expected
    }
}

fn run_test_script(path: PathBuf) {
    let expected = Expected::read_script(&path);
    let source = ModuleSource::new(path.display(), SourceType::File(path.clone()));

    let mut parse_ctx = ParseContext::new();
    let ast = match loxwalk::build_module(&mut parse_ctx, &source) {
        Ok(ast) => ast,

        Err(errors) => {
            loxwalk::print_build_errors(&errors, source.name(), &source);
            assert!(expected.build_error, "build failed");
            return;
        }
    };
    assert!(!expected.build_error, "expected a build error");

    let output = SharedBuffer::new();
    let mut interpreter = Interpreter::new(Box::new(output.clone()));
    let result = interpreter.execute(ast);

    let contents = output.contents();
    let lines = contents.lines().collect::<Vec<&str>>();
    assert_eq!(lines, expected.output);

    match (result, expected.runtime_error) {
        (Ok(()), None) => { },
        (Ok(()), Some(message)) => panic!("expected runtime error: {}", message),
        (Err(error), None) => panic!("{}", error),
        (Err(error), Some(message)) => assert_eq!(error.message(), message),
    }
}

macro_rules! test_script {
    ( $name:tt, $path:expr ) => {
        #[test]
        fn $name() {
            run_test_script(PathBuf::from($path))
        }
    };
}



test_script!(empty_file, "tests/scripts/empty_file.lox");
test_script!(precedence, "tests/scripts/precedence.lox");
test_script!(print_values, "tests/scripts/print_values.lox");

mod assignment_tests {
    use super::*;

    test_script!(associativity, "tests/scripts/assignment/associativity.lox");
    test_script!(global, "tests/scripts/assignment/global.lox");
    test_script!(local, "tests/scripts/assignment/local.lox");
    test_script!(undefined, "tests/scripts/assignment/undefined.lox");
    test_script!(invalid_target, "tests/scripts/assignment/invalid_target.lox");
}

mod block_tests {
    use super::*;

    test_script!(scope, "tests/scripts/block/scope.lox");
}

mod variable_tests {
    use super::*;

    test_script!(undefined, "tests/scripts/variable/undefined.lox");
    test_script!(redeclare_global, "tests/scripts/variable/redeclare_global.lox");
    test_script!(duplicate_local, "tests/scripts/variable/duplicate_local.lox");
    test_script!(own_initializer, "tests/scripts/variable/own_initializer.lox");
    test_script!(early_bound, "tests/scripts/variable/early_bound.lox");
}

mod if_tests {
    use super::*;

    test_script!(else_, "tests/scripts/if/else.lox");
    test_script!(truth, "tests/scripts/if/truth.lox");
}

mod logical_tests {
    use super::*;

    test_script!(and, "tests/scripts/logical/and.lox");
    test_script!(or, "tests/scripts/logical/or.lox");
}

mod loop_tests {
    use super::*;

    test_script!(while_, "tests/scripts/loop/while.lox");
    test_script!(for_, "tests/scripts/loop/for.lox");
}

mod operator_tests {
    use super::*;

    test_script!(arithmetic, "tests/scripts/operator/arithmetic.lox");
    test_script!(equality, "tests/scripts/operator/equality.lox");
    test_script!(add_mismatch, "tests/scripts/operator/add_mismatch.lox");
    test_script!(compare_mismatch, "tests/scripts/operator/compare_mismatch.lox");
    test_script!(divide_by_zero, "tests/scripts/operator/divide_by_zero.lox");
}

mod function_tests {
    use super::*;

    test_script!(recursion, "tests/scripts/function/recursion.lox");
    test_script!(implicit_nil, "tests/scripts/function/implicit_nil.lox");
    test_script!(too_many_args, "tests/scripts/function/too_many_args.lox");
    test_script!(too_few_args, "tests/scripts/function/too_few_args.lox");
    test_script!(not_callable, "tests/scripts/function/not_callable.lox");
}

mod return_tests {
    use super::*;

    test_script!(top_level, "tests/scripts/return/top_level.lox");
    test_script!(from_loop, "tests/scripts/return/from_loop.lox");
}

mod closure_tests {
    use super::*;

    test_script!(counter, "tests/scripts/closure/counter.lox");
    test_script!(shared_state, "tests/scripts/closure/shared_state.lox");
    test_script!(nested_closure, "tests/scripts/closure/nested_closure.lox");
}

mod class_tests {
    use super::*;

    test_script!(fields, "tests/scripts/class/fields.lox");
    test_script!(methods, "tests/scripts/class/methods.lox");
    test_script!(bound_method, "tests/scripts/class/bound_method.lox");
    test_script!(undefined_property, "tests/scripts/class/undefined_property.lox");
    test_script!(init, "tests/scripts/class/init.lox");
    test_script!(init_return_value, "tests/scripts/class/init_return_value.lox");
    test_script!(this_outside_class, "tests/scripts/class/this_outside_class.lox");
}

mod inheritance_tests {
    use super::*;

    test_script!(super_call, "tests/scripts/inheritance/super_call.lox");
    test_script!(inherited_init, "tests/scripts/inheritance/inherited_init.lox");
    test_script!(super_binds_this, "tests/scripts/inheritance/super_binds_this.lox");
    test_script!(inherit_self, "tests/scripts/inheritance/inherit_self.lox");
    test_script!(inherit_non_class, "tests/scripts/inheritance/inherit_non_class.lox");
    test_script!(super_without_superclass, "tests/scripts/inheritance/super_without_superclass.lox");
}

mod builtin_tests {
    use super::*;

    test_script!(conversions, "tests/scripts/builtins/conversions.lox");
    test_script!(clock, "tests/scripts/builtins/clock.lox");
}

mod limit_tests {
    use super::*;

    test_script!(stack_overflow, "tests/scripts/limit/stack_overflow.lox");
    test_script!(deep_recursion, "tests/scripts/limit/deep_recursion.lox");
    test_script!(deep_nesting, "tests/scripts/limit/deep_nesting.lox");
}
