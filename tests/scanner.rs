#[cfg(test)]
mod scanner_tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use yaupl::reporter::BufferedReporter;
    use yaupl as ypl;

    use ypl::error::YauplError;
    use ypl::scanner::*;
    use ypl::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn assert_token_matches(result: &Result<Token, YauplError>, expected_type: TokenType, lexeme: &str) {
        match result {
            Ok(token) => {
                assert_eq!(token.token_type, expected_type);
                assert_eq!(token.lexeme, lexeme);
            }
            Err(e) => panic!("Expected token {:?}, got error: {}", expected_type, e),
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})[]",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACKET, "["),
                (TokenType::RIGHT_BRACKET, "]"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_operators() {
        assert_token_sequence(
            "! != = == < <= << > >= >> % ^ : - /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::LSHIFT, "<<"),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::RSHIFT, ">>"),
                (TokenType::MODULO, "%"),
                (TokenType::EXPONENT, "^"),
                (TokenType::COLON, ":"),
                (TokenType::MINUS, "-"),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "let const fun class static import xor nor nand do break continue null _name x1",
            &[
                (TokenType::LET, "let"),
                (TokenType::CONST, "const"),
                (TokenType::FUN, "fun"),
                (TokenType::CLASS, "class"),
                (TokenType::STATIC, "static"),
                (TokenType::IMPORT, "import"),
                (TokenType::XOR, "xor"),
                (TokenType::NOR, "nor"),
                (TokenType::NAND, "nand"),
                (TokenType::DO, "do"),
                (TokenType::BREAK, "break"),
                (TokenType::CONTINUE, "continue"),
                (TokenType::NULL, "null"),
                (TokenType::IDENTIFIER, "_name"),
                (TokenType::IDENTIFIER, "x1"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_numbers() {
        let tokens: Vec<Token> = Scanner::new("123 3.14 7.")
            .filter_map(Result::ok)
            .collect();

        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            rendered,
            vec![
                "NUMBER 123 123.0",
                "NUMBER 3.14 3.14",
                "NUMBER 7 7.0",
                "DOT . null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_05_strings() {
        let tokens: Vec<Token> = Scanner::new("\"hello world\" \"\"")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].to_string(), "STRING \"hello world\" hello world");
        assert_eq!(tokens[1].lexeme, "\"\"");

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "hello world"),
            other => panic!("Expected STRING, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string_is_reported() {
        let results: Vec<_> = Scanner::new("\"abc").collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert_token_matches(&results[1], TokenType::STRING(String::new()), "\"abc");
        assert_token_matches(&results[2], TokenType::EOF, "");

        if let Err(e) = &results[0] {
            assert_eq!(e.message(), "Unterminated string.");
        }
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // 0: COMMA ','
        // 1: DOT '.'
        // 2: Error for '$'
        // 3: LEFT_PAREN '('
        // 4: Error for '#'
        // 5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| e.message())
            .collect();

        assert_eq!(
            errors,
            vec!["Unexpected character: $", "Unexpected character: #"]
        );
    }

    #[test]
    fn test_unexpected_multibyte_char_is_one_error() {
        let results: Vec<_> = Scanner::new("é;").collect();

        assert_eq!(results.len(), 3);
        assert_token_matches(&results[1], TokenType::SEMICOLON, ";");

        if let Err(e) = &results[0] {
            assert_eq!(e.message(), "Unexpected character: é");
        } else {
            panic!("Expected an error first");
        }
    }

    #[test]
    fn test_comments_are_skipped_and_lines_counted() {
        let source = "a // trailing\n/* one\ntwo */ b\nc";
        let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();

        let seen: Vec<(&str, usize)> = tokens
            .iter()
            .map(|t| (t.lexeme.as_str(), t.line))
            .collect();

        assert_eq!(seen, vec![("a", 0), ("b", 2), ("c", 3), ("", 3)]);
    }

    #[test]
    fn test_block_comment_state_carries_over() {
        let reporter = BufferedReporter::new();

        let first = Scanner::new("x /* open").scan_tokens(&reporter);
        assert!(first.in_block_comment);
        assert_eq!(first.tokens.len(), 2);

        let second = Scanner::new("still comment */ y")
            .with_block_comment(first.in_block_comment)
            .scan_tokens(&reporter);

        assert!(!second.in_block_comment);
        assert_eq!(second.tokens[0].lexeme, "y");
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_scan_tokens_reports_errors() {
        let reporter = Rc::new(BufferedReporter::new());

        let output = Scanner::new("let a = 1;\n@").scan_tokens(reporter.as_ref());

        assert!(output.had_error);
        assert_eq!(output.tokens.last().map(|t| t.token_type.clone()), Some(TokenType::EOF));

        let diagnostics = reporter.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(1));
        assert_eq!(diagnostics[0].to_string(), "[line 2] Error: Unexpected character: @");
    }

    #[test]
    fn test_token_literals() {
        let tokens: Vec<Token> = Scanner::new("12.5 \"text\" true false null name")
            .filter_map(Result::ok)
            .collect();

        let literals: Vec<Option<Literal>> = tokens.iter().map(Token::literal).collect();

        assert_eq!(
            literals,
            vec![
                Some(Literal::Number(12.5)),
                Some(Literal::Str("text".to_string())),
                Some(Literal::Bool(true)),
                Some(Literal::Bool(false)),
                None,
                None,
                None,
            ]
        );
    }
}
