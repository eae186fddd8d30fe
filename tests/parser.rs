#[cfg(test)]
mod parser_tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use yaupl as ypl;

    use ypl::ast::{Expr, LiteralValue, Stmt};
    use ypl::ast_printer::AstPrinter;
    use ypl::parser::Parser;
    use ypl::reporter::{BufferedReporter, Diagnostic};
    use ypl::scanner::Scanner;

    struct Parsed {
        statements: Vec<Stmt>,
        diagnostics: Vec<Diagnostic>,
        had_error: bool,
    }

    fn parse(source: &str) -> Parsed {
        let reporter = Rc::new(BufferedReporter::new());
        let scanned = Scanner::new(source).scan_tokens(reporter.as_ref());

        let mut parser = Parser::new(&scanned.tokens, reporter.clone());
        let statements = parser.parse();

        Parsed {
            statements,
            diagnostics: reporter.diagnostics(),
            had_error: parser.had_error(),
        }
    }

    fn printed(source: &str) -> Vec<String> {
        let parsed = parse(source);

        assert!(
            !parsed.had_error,
            "unexpected parse errors: {:?}",
            parsed.diagnostics
        );

        parsed.statements.iter().map(AstPrinter::print_stmt).collect()
    }

    fn assert_prints(source: &str, expected: &str) {
        assert_eq!(printed(source), vec![expected.to_string()]);
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_prints("print 1 + 2 * 3 ^ 2;", "(print (+ 1.0 (* 2.0 (^ 3.0 2.0))))");
        assert_prints("8 - 4 - 2;", "(- (- 8.0 4.0) 2.0)");
        assert_prints("7 % 3 / 2;", "(/ (% 7.0 3.0) 2.0)");
    }

    #[test]
    fn test_shift_binds_tighter_than_comparison() {
        assert_prints("1 << 2 < 3 == true;", "(== (< (<< 1.0 2.0) 3.0) true)");
    }

    #[test]
    fn test_logical_tiers() {
        assert_prints(
            "a or b and c xor d nor e nand f;",
            "(or a (and b (xor c (nor d (nand e f)))))",
        );
    }

    #[test]
    fn test_unary_and_grouping() {
        assert_prints("-(1 - 2);", "(- (group (- 1.0 2.0)))");
        assert_prints("!!true;", "(! (! true))");
        assert_prints("-2.5;", "(- 2.5)");
    }

    #[test]
    fn test_calls_properties_and_set() {
        assert_prints(
            "a.b(1)(2).c = 3;",
            "(= (. (call (call (. a b) 1.0) 2.0) c) 3.0)",
        );
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_prints("a = b = 1;", "(= a (= b 1.0))");
    }

    #[test]
    fn test_array_literal() {
        assert_prints(
            "let xs = [1, \"two\", null, []];",
            "(let xs Array [1.0, two, null, Array []])",
        );
    }

    #[test]
    fn test_declarations() {
        assert_eq!(
            printed("let a; const k = 1; import \"lib.ypl\";"),
            vec!["(let a)", "(const k 1.0)", "(import \"lib.ypl\")"]
        );
    }

    #[test]
    fn test_function_declaration() {
        assert_prints(
            "fun add(a, b) { return a + b; }",
            "(fun add (a b) { (return (+ a b)) })",
        );
        assert_prints("fun nothing() {}", "(fun nothing () {})");
    }

    #[test]
    fn test_class_declaration() {
        assert_prints(
            "class B : A { static make() { return B(); } init(x) { this.x = x; } get() { return super.get(); } }",
            "(class B : A (static make) init get)",
        );
    }

    #[test]
    fn test_super_and_this_expressions() {
        let parsed = parse("class A : B { m() { return super.m() + this.n; } }");
        assert!(!parsed.had_error);

        match &parsed.statements[0] {
            Stmt::Class { methods, .. } => {
                let body: Vec<String> = methods[0].body.iter().map(AstPrinter::print_stmt).collect();
                assert_eq!(body, vec!["(return (+ (call (super m)) (. this n)))"]);
            }
            other => panic!("Expected a class, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else() {
        assert_prints(
            "if (a) print 1; else print 2;",
            "(if a (print 1.0) (print 2.0))",
        );
    }

    #[test]
    fn test_for_desugars_to_while_in_block() {
        assert_prints(
            "for (let i = 0; i < 3; i = i + 1) print i;",
            "{ (let i 0.0) (while (< i 3.0) (print i) (= i (+ i 1.0))) }",
        );
    }

    #[test]
    fn test_for_without_clauses() {
        assert_prints("for (;;) break;", "(while true (break))");
    }

    #[test]
    fn test_do_while_and_loop_control() {
        assert_prints(
            "do { x = x - 1; continue; } while (x > 0);",
            "(do { (= x (- x 1.0)) (continue) } (> x 0.0))",
        );
    }

    #[test]
    fn test_recovers_after_error() {
        let parsed = parse("let = 1; print 2;");

        assert!(parsed.had_error);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].message, "Expected variable name");
        assert_eq!(parsed.diagnostics[0].location, "at '='");

        let rest: Vec<String> = parsed.statements.iter().map(AstPrinter::print_stmt).collect();
        assert_eq!(rest, vec!["(print 2.0)"]);
    }

    #[test]
    fn test_reports_several_errors_in_one_pass() {
        let parsed = parse("print ;\nlet x = ;\nprint 3;");

        let lines: Vec<Option<usize>> = parsed.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![Some(0), Some(1)]);
        assert_eq!(parsed.statements.len(), 1);
    }

    #[test]
    fn test_missing_semicolon_at_end() {
        let parsed = parse("print 1");

        assert_eq!(
            parsed.diagnostics[0].to_string(),
            "[line 1] Error at end: Expected ';' after value"
        );
    }

    #[test]
    fn test_invalid_assignment_target_does_not_unwind() {
        let parsed = parse("1 = 2; print 3;");

        assert!(parsed.had_error);
        assert_eq!(parsed.diagnostics[0].message, "Invalid assignment target");
        assert_eq!(parsed.statements.len(), 2);
    }

    #[test]
    fn test_too_many_arguments_is_reported() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let parsed = parse(&source);

        assert!(parsed.had_error);
        assert_eq!(
            parsed.diagnostics[0].message,
            "Can't have more than 255 arguments"
        );
        // reported, not fatal: the call itself still parses
        assert_eq!(parsed.statements.len(), 1);
    }

    fn literal_of(source: &str) -> LiteralValue {
        let parsed = parse(source);
        assert!(!parsed.had_error, "parse errors: {:?}", parsed.diagnostics);

        match parsed.statements.as_slice() {
            [Stmt::Expression(Expr::Literal(lit))] => lit.clone(),
            other => panic!("Expected a single literal statement, got {:?}", other),
        }
    }

    #[test]
    fn test_printed_literals_parse_back_to_the_same_value() {
        for source in ["0", "42", "2.5", "0.1", "1234567.125", "true", "false", "null"] {
            let original = literal_of(&format!("{};", source));

            let printed = AstPrinter::print(&Expr::Literal(original.clone()));
            let reparsed = literal_of(&format!("{};", printed));

            assert_eq!(reparsed, original, "round trip through {:?}", printed);
        }
    }
}
