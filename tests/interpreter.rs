mod common;

#[cfg(test)]
mod interpreter_tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use yaupl::config::InterpreterConfig;
    use yaupl::reporter::BufferedReporter;
    use yaupl::runner::{Runner, PROMPT};

    use crate::common::{run, run_with, Outcome, SharedBuffer};

    fn assert_output(source: &str, expected: &[&str]) {
        let outcome: Outcome = run(source);

        assert_eq!(outcome.errors, Vec::<String>::new());
        assert_eq!(outcome.lines(), expected);
        assert_eq!(outcome.exit_code, 0);
    }

    fn assert_runtime_error(source: &str, message: &str) {
        let outcome: Outcome = run(source);

        assert_eq!(outcome.errors, vec![message.to_string()]);
        assert_eq!(outcome.exit_code, 70);
    }

    // ───────────────────────── expressions ────────────────────────

    #[test]
    fn test_arithmetic() {
        assert_output(
            "print 1 + 2; print 7 / 2; print 2 ^ 10; print 7 % 3; print -7 % 3; \
             print 1 << 4; print 256 >> 2; print 1 / 0; print -1 / 0; print 0.1 + 0.2;",
            &[
                "3",
                "3.5",
                "1024",
                "1",
                "-1",
                "16",
                "64",
                "Infinity",
                "-Infinity",
                "0.30000000000000004",
            ],
        );
    }

    #[test]
    fn test_modulo_and_shift_truncate_operands() {
        assert_output("print 7.9 % 3.2; print 5.7 << 1;", &["1", "10"]);
    }

    #[test]
    fn test_plus_concatenates_non_numbers() {
        assert_output(
            "print \"a\" + 1; print 1 + \"a\"; print \"x\" + null; print true + \"!\";",
            &["a1", "1a", "xnull", "true!"],
        );
    }

    #[test]
    fn test_equality() {
        assert_output(
            "print null == null; print null == 0; print \"a\" == \"a\"; print 1 != 2; print true == 1;",
            &["true", "false", "true", "true", "false"],
        );
    }

    #[test]
    fn test_truthiness() {
        assert_output(
            "if (0) print \"zero\"; else print \"no zero\"; \
             if (\"\") print \"empty string\"; \
             if (null) print \"null\"; else print \"no null\"; \
             print !0; print !2;",
            &["no zero", "empty string", "no null", "true", "false"],
        );
    }

    #[test]
    fn test_logical_connectives() {
        assert_output(
            "print 1 xor 0; print true xor true; print false nor false; print true nor false; \
             print true nand true; print false nand true; print null or \"d\"; print 0 and undefinedName;",
            &["true", "false", "true", "false", "false", "true", "d", "0"],
        );
    }

    #[test]
    fn test_operand_type_errors() {
        assert_runtime_error("print 1 < \"a\";", "Operands must be numbers.");
        assert_runtime_error("print \"a\" - 1;", "Operands must be numbers.");
        assert_runtime_error("print -\"a\";", "Operand must be a number.");
        assert_runtime_error("print 1 % 0;", "Modulo by zero.");
    }

    // ───────────────────────── variables ──────────────────────────

    #[test]
    fn test_block_shadowing() {
        assert_output(
            "let a = 1; { let a = 2; print a; } print a;",
            &["2", "1"],
        );
    }

    #[test]
    fn test_variable_errors() {
        assert_runtime_error("let x; print x;", "Variable x used before initialization.");
        assert_runtime_error("print y;", "Undefined variable y.");
        assert_runtime_error("const k = 1; k = 2;", "Cannot reassign constant k.");
        assert_runtime_error(
            "let x = 1; x = \"s\";",
            "Cannot assign a value of type String to variable x of type Number.",
        );
        assert_runtime_error("let a = 1; let a = 2;", "Cannot redeclare variable a.");
    }

    #[test]
    fn test_assignment_yields_value() {
        assert_output("let a; let b; a = b = 3; print a + b;", &["6"]);
    }

    #[test]
    fn test_runtime_error_stops_execution() {
        let outcome = run("print 1; print missing; print 2;");

        assert_eq!(outcome.lines(), vec!["1"]);
        assert_eq!(outcome.exit_code, 70);
    }

    #[test]
    fn test_static_errors_prevent_running() {
        let outcome = run("print 1; print ;");

        assert_eq!(outcome.output, "");
        assert_eq!(outcome.exit_code, 65);
    }

    // ───────────────────────── control flow ───────────────────────

    #[test]
    fn test_for_with_continue_and_break() {
        assert_output(
            "for (let i = 0; i < 5; i = i + 1) { if (i == 1) continue; if (i == 3) break; print i; }",
            &["0", "2"],
        );
    }

    #[test]
    fn test_while_and_do_while() {
        assert_output(
            "let i = 0; while (i < 3) { print i; i = i + 1; } \
             let n = 3; do { print n; n = n - 1; } while (n > 0); \
             do print \"once\"; while (false);",
            &["0", "1", "2", "3", "2", "1", "once"],
        );
    }

    #[test]
    fn test_break_leaves_only_innermost_loop() {
        assert_output(
            "for (let i = 0; i < 2; i = i + 1) { \
                 for (let j = 0; j < 5; j = j + 1) { if (j == 1) break; print i + j * 10; } \
             }",
            &["0", "1"],
        );
    }

    #[test]
    fn test_loop_control_outside_loop() {
        assert_runtime_error("break;", "Cannot use 'break' outside of a loop.");
        assert_runtime_error("continue;", "Cannot use 'continue' outside of a loop.");
        assert_runtime_error(
            "fun f() { break; } while (true) { f(); }",
            "Cannot use 'break' outside of a loop.",
        );
    }

    #[test]
    fn test_return_from_inside_loop() {
        assert_output(
            "fun first(limit) { for (let i = 0; i < 10; i = i + 1) { if (i == limit) return i; } return -1; } \
             print first(4); print first(20);",
            &["4", "-1"],
        );
    }

    // ───────────────────────── functions ──────────────────────────

    #[test]
    fn test_functions_and_return_values() {
        assert_output(
            "fun add(a, b) { return a + b; } print add(1, 2); print add; \
             fun noop() {} print noop();",
            &["3", "<fun add>", "null"],
        );
    }

    #[test]
    fn test_recursion() {
        assert_output(
            "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(15);",
            &["610"],
        );
    }

    #[test]
    fn test_closures_capture_by_reference() {
        assert_output(
            "fun makeCounter() { let i = 0; fun count() { i = i + 1; return i; } return count; } \
             let c = makeCounter(); print c(); print c(); \
             let d = makeCounter(); print d();",
            &["1", "2", "1"],
        );
    }

    #[test]
    fn test_closures_are_lexically_scoped() {
        assert_output(
            "let a = \"global\"; { fun show() { print a; } show(); let a = \"block\"; show(); }",
            &["global", "global"],
        );
    }

    #[test]
    fn test_call_errors() {
        assert_runtime_error("fun f(a) {} f(1, 2);", "Expected 1 arguments but got 2.");
        assert_runtime_error("\"a\"();", "Can only call functions and classes.");
        assert_runtime_error("Clock(1);", "Expected 0 arguments but got 1.");
    }

    #[test]
    fn test_stack_overflow_is_a_runtime_error() {
        let config = InterpreterConfig::default().with_max_call_depth(20);
        let outcome = run_with(config, "fun r() { return r(); } r();");

        assert_eq!(outcome.errors, vec!["Stack overflow."]);
        assert_eq!(outcome.exit_code, 70);
    }

    #[test]
    fn test_deep_recursion_through_nested_statements() {
        let source = "fun f(n) { if (n == 0) return 0; \
                      for (let i = 0; i < 1; i = i + 1) { { if (true) { while (true) { return f(n - 1) + 1; } } } } } \
                      print f(250);";

        assert_output(source, &["250"]);
    }

    #[test]
    fn test_runaway_recursion_through_nested_statements() {
        let source = "fun f(n) { if (n == 0) return 0; \
                      for (let i = 0; i < 1; i = i + 1) { { if (true) { return f(n - 1) + 1; } } } } \
                      print f(10000);";

        assert_runtime_error(source, "Stack overflow.");
    }

    #[test]
    fn test_optional_argument_arity() {
        assert_output("print String() + String(1);", &["1"]);
        assert_runtime_error("String(1, 2);", "Expected 0 or 1 arguments but got 2.");
    }

    // ───────────────────────── classes ────────────────────────────

    #[test]
    fn test_class_fields_and_methods() {
        assert_output(
            "class Point { init(x, y) { this.x = x; this.y = y; } sum() { return this.x + this.y; } } \
             let p = Point(1, 2); print p.sum(); print p; print Point; print p.sum; \
             p.x = 10; print p.sum();",
            &["3", "Point instance", "Point", "<fun sum>", "12"],
        );
    }

    #[test]
    fn test_inherited_init_and_super() {
        assert_output(
            "class A { init() { this.v = 1; } hello() { return \"A\" + this.v; } } \
             class B : A { hello() { return \"B\" + super.hello(); } } \
             let b = B(); print b.v; print b.hello();",
            &["1", "BA1"],
        );
    }

    #[test]
    fn test_super_reaches_grandparent_methods() {
        assert_output(
            "class A { name() { return \"A\"; } } class B : A {} \
             class C : B { name() { return \"C\" + super.name(); } } print C().name();",
            &["CA"],
        );
    }

    #[test]
    fn test_initializer_always_yields_instance() {
        assert_output(
            "class C { init() { this.a = 1; return; this.a = 2; } } \
             let c = C(); print c.a; print c.init();",
            &["1", "C instance"],
        );
    }

    #[test]
    fn test_initializer_returning_value_is_rejected() {
        let outcome = run("class C { init() { return 5; } } print C();");

        assert_eq!(outcome.errors, vec!["Cannot return a value from an initializer."]);
        assert_eq!(outcome.exit_code, 65);
    }

    #[test]
    fn test_bound_methods_keep_their_instance() {
        assert_output(
            "class Box { init(v) { this.v = v; } get() { return this.v; } } \
             let a = Box(1); let g = a.get; let b = Box(2); print g(); print b.get();",
            &["1", "2"],
        );
    }

    #[test]
    fn test_static_methods() {
        assert_output(
            "class M { static twice(x) { return x * 2; } } class N : M {} \
             print M.twice(4); print N.twice(1);",
            &["8", "2"],
        );
    }

    #[test]
    fn test_property_errors() {
        assert_runtime_error("class M {} print M.missing;", "Undefined static method missing.");
        assert_runtime_error("class E {} print E().nope;", "Undefined property nope.");
        assert_runtime_error("let n = 1; print n.x;", "Only instances have properties.");
        assert_runtime_error("let n = 1; n.x = 2;", "Only class instances have fields.");
        assert_runtime_error("class M {} M.x = 1;", "Cannot set properties on a class.");
        assert_runtime_error(
            "let NotClass = 1; class D : NotClass {}",
            "Superclass must be a class.",
        );
    }

    // ───────────────────────── natives ────────────────────────────

    #[test]
    fn test_type_names() {
        assert_output(
            "class K {} fun f() {} \
             print Type(1); print Type(\"s\"); print Type(null); print Type(true); \
             print Type([1]); print Type(List()); print Type(Set()); print Type(File(\"x\")); \
             print Type(f); print Type(K); print Type(K()); print Type(Clock); print Type(Clock());",
            &[
                "Number",
                "String",
                "Null",
                "Boolean",
                "Array",
                "List",
                "Set",
                "File",
                "Function",
                "Class",
                "Instance",
                "NativeFunction",
                "Number",
            ],
        );
    }

    #[test]
    fn test_string_constructor() {
        assert_output(
            "print String() == \"\"; print String(12) + \"!\"; print String([1, 2]);",
            &["true", "12!", "Array [1, 2]"],
        );
    }

    // ───────────────────────── REPL mode ──────────────────────────

    #[test]
    fn test_repl_mode_echoes_expression_statements() {
        let outcome = run_with(InterpreterConfig::repl(), "1 + 2; let a = 3; a; print a;");

        assert_eq!(outcome.lines(), vec!["3", "3", "3"]);
    }

    #[test]
    fn test_prompt_keeps_state_between_lines() {
        let out = SharedBuffer::new();
        let reporter = Rc::new(BufferedReporter::new());
        let mut runner = Runner::new(
            InterpreterConfig::default(),
            reporter.clone(),
            Box::new(out.clone()),
        );

        let input = "let a = 1;\na + 1;\n/* open\nstill */ print a;\nprint missing;\nprint a;\n";
        let mut prompts: Vec<u8> = Vec::new();

        runner.run_prompt(input.as_bytes(), &mut prompts).unwrap();

        assert_eq!(out.contents(), "2\n1\n1\n");
        assert_eq!(reporter.messages(), vec!["Undefined variable missing."]);
        assert_eq!(
            String::from_utf8(prompts).unwrap(),
            format!("{}\n", PROMPT.repeat(7))
        );
        assert!(!runner.had_runtime_error());
    }
}
