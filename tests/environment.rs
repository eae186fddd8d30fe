#[cfg(test)]
mod environment_tests {
    use pretty_assertions::assert_eq;
    use yaupl as ypl;

    use ypl::environment::{EnvRef, Environment};
    use ypl::token::{Token, TokenType};
    use ypl::value::Value;

    fn name(lexeme: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, lexeme, 0)
    }

    fn message_of(result: ypl::error::Result<impl std::fmt::Debug>) -> String {
        match result {
            Ok(v) => panic!("Expected an error, got {:?}", v),
            Err(e) => e.message(),
        }
    }

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define(&name("a"), Value::Number(1.0), false).unwrap();

        assert_eq!(env.get(&name("a")).unwrap(), Value::Number(1.0));
        assert!(env.contains("a"));
    }

    #[test]
    fn test_redeclaration_in_same_frame_fails() {
        let mut env = Environment::new();
        env.define(&name("a"), Value::Number(1.0), false).unwrap();

        assert_eq!(
            message_of(env.define(&name("a"), Value::Number(2.0), false)),
            "Cannot redeclare variable a."
        );
    }

    #[test]
    fn test_shadowing_in_child_frame() {
        let globals: EnvRef = Environment::new_ref();
        globals
            .borrow_mut()
            .define(&name("a"), Value::Number(1.0), false)
            .unwrap();

        let inner: EnvRef = Environment::child(&globals);
        inner
            .borrow_mut()
            .define(&name("a"), Value::Number(2.0), false)
            .unwrap();

        assert_eq!(inner.borrow().get(&name("a")).unwrap(), Value::Number(2.0));
        assert_eq!(globals.borrow().get(&name("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_get_walks_outward_and_reports_undefined() {
        let globals: EnvRef = Environment::new_ref();
        globals
            .borrow_mut()
            .define(&name("outer"), Value::Bool(true), false)
            .unwrap();

        let inner: EnvRef = Environment::child(&globals);

        assert_eq!(inner.borrow().get(&name("outer")).unwrap(), Value::Bool(true));
        assert_eq!(
            message_of(inner.borrow().get(&name("missing"))),
            "Undefined variable missing."
        );
    }

    #[test]
    fn test_uninitialized_read_is_distinct_error() {
        let mut env = Environment::new();
        env.define(&name("x"), Value::Undefined, false).unwrap();

        assert_eq!(
            message_of(env.get(&name("x"))),
            "Variable x used before initialization."
        );

        env.assign(&name("x"), Value::Number(3.0)).unwrap();
        assert_eq!(env.get(&name("x")).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_constants_cannot_be_reassigned() {
        let mut env = Environment::new();
        env.define(&name("k"), Value::Number(1.0), true).unwrap();

        assert_eq!(
            message_of(env.assign(&name("k"), Value::Number(2.0))),
            "Cannot reassign constant k."
        );
    }

    #[test]
    fn test_type_is_frozen_after_first_concrete_value() {
        let mut env = Environment::new();
        env.define(&name("n"), Value::Number(1.0), false).unwrap();

        assert_eq!(
            message_of(env.assign(&name("n"), Value::string("one"))),
            "Cannot assign a value of type String to variable n of type Number."
        );

        // null is exempt and does not reset the recorded type
        env.assign(&name("n"), Value::Nil).unwrap();
        assert!(env.assign(&name("n"), Value::Bool(true)).is_err());
        env.assign(&name("n"), Value::Number(5.0)).unwrap();
    }

    #[test]
    fn test_type_is_recorded_on_first_assignment_after_null() {
        let mut env = Environment::new();
        env.define(&name("v"), Value::Nil, false).unwrap();

        env.assign(&name("v"), Value::string("s")).unwrap();

        assert!(env.assign(&name("v"), Value::Number(1.0)).is_err());
    }

    #[test]
    fn test_assign_undeclared_fails() {
        let globals: EnvRef = Environment::new_ref();
        let inner: EnvRef = Environment::child(&globals);

        assert_eq!(
            message_of(inner.borrow_mut().assign(&name("ghost"), Value::Nil)),
            "Undefined variable ghost."
        );
    }

    #[test]
    fn test_distance_access() {
        let globals: EnvRef = Environment::new_ref();
        globals
            .borrow_mut()
            .define(&name("a"), Value::Number(1.0), false)
            .unwrap();

        let middle: EnvRef = Environment::child(&globals);
        middle
            .borrow_mut()
            .define(&name("a"), Value::Number(2.0), false)
            .unwrap();

        let inner: EnvRef = Environment::child(&middle);

        assert_eq!(
            Environment::get_at(&inner, 1, &name("a")).unwrap(),
            Value::Number(2.0)
        );
        assert_eq!(
            Environment::get_at(&inner, 2, &name("a")).unwrap(),
            Value::Number(1.0)
        );

        Environment::assign_at(&inner, 2, &name("a"), Value::Number(10.0)).unwrap();

        assert_eq!(globals.borrow().get(&name("a")).unwrap(), Value::Number(10.0));
        assert_eq!(middle.borrow().get(&name("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_undef_removes_binding() {
        let mut env = Environment::new();
        env.define(&name("t"), Value::Number(1.0), true).unwrap();

        assert_eq!(env.undef("t"), Some(Value::Number(1.0)));
        assert!(!env.contains("t"));

        // the name is free again, constant flag included
        env.define(&name("t"), Value::string("x"), false).unwrap();
        env.assign(&name("t"), Value::string("y")).unwrap();
    }

    #[test]
    fn test_distance_access_stays_in_target_frame() {
        let globals: EnvRef = Environment::new_ref();
        globals
            .borrow_mut()
            .define(&name("a"), Value::Number(1.0), false)
            .unwrap();

        let middle: EnvRef = Environment::child(&globals);
        let inner: EnvRef = Environment::child(&middle);

        assert_eq!(
            message_of(Environment::get_at(&inner, 1, &name("a"))),
            "Undefined variable a."
        );
        assert_eq!(
            message_of(Environment::assign_at(&inner, 1, &name("a"), Value::Number(2.0))),
            "Undefined variable a."
        );
        assert_eq!(globals.borrow().get(&name("a")).unwrap(), Value::Number(1.0));
    }
}
