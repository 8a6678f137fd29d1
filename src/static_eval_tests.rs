#[cfg(test)]
mod tests {
    use crate::codegen::serialize;
    use crate::error::EvalError;
    use crate::ir::IrNode;
    use crate::parse::ScanningParser;
    use crate::render::render;
    use crate::runtime::{Element, Props, Tag, Value};
    use crate::scope::{Environment, Scope};
    use crate::static_eval::evaluate;
    use crate::syntax::{find_next_markup, MarkupParser};
    use crate::visitor::build_ir;
    use rstest::rstest;

    fn ir_of(source: &str) -> IrNode {
        let tree = ScanningParser::new().parse(source);
        let node = find_next_markup(&tree).expect("markup occurrence");
        build_ir(node, source, "test.pyx").expect("valid markup")
    }

    /// Renders what the compiled code for `source` would produce.
    fn render_compiled(source: &str, scope: &Scope, env: &Environment) -> String {
        let value = evaluate(&serialize(&ir_of(source)), scope).expect("evaluates");
        render(&value, env).expect("renders")
    }

    #[rstest]
    #[case::text("<div className=\"a\">Hi</div>")]
    #[case::list("<ul>\n  <li>one</li>\n  <li class=\"x\">two</li>\n</ul>")]
    #[case::fragment("<>a<b>c</b></>")]
    #[case::attributes_only("<input disabled type=\"text\" />")]
    #[case::quotes("<p title='say \"hi\"'>it's \\ fine</p>")]
    #[case::unicode("<p lang=\"fr\">caf\u{e9}</p>")]
    fn test_static_markup_round_trips(#[case] source: &str) {
        let env = Environment::new();
        let scope = Scope::new();
        let ir = ir_of(source);

        let direct = render(&ir.instantiate(&scope).unwrap(), &env).unwrap();
        let compiled = render_compiled(source, &scope, &env);
        assert_eq!(direct, compiled);
    }

    #[test]
    fn test_round_trip_renders_expected_text() {
        let out = render_compiled(
            "<div className=\"a\">Hi</div>",
            &Scope::new(),
            &Environment::new(),
        );
        assert_eq!(out, r#"<div className="a">Hi</div>"#);
    }

    #[test]
    fn test_fragment_with_splices() {
        let scope = Scope::new().with("a", "X").with("b", "Y");
        let out = render_compiled("<>{a}<span>{b}</span></>", &scope, &Environment::new());
        assert_eq!(out, "X<span>Y</span>");
    }

    #[test]
    fn test_component_with_code_attribute() {
        let env = Environment::new().with_component("Greeting", |props: &Props| {
            let name = props.get("name").cloned().unwrap_or(Value::None);
            Ok(Element::new("p").children(format!("Hi, {}", name)).into())
        });
        let scope = Scope::new().with("x", "Ann");
        assert_eq!(
            render_compiled("<Greeting name={x} />", &scope, &env),
            "<p>Hi, Ann</p>"
        );
    }

    #[test]
    fn test_spread_renders_after_named_attributes() {
        let mut extra = Props::new();
        extra.insert("y".into(), Value::from("2"));
        let scope = Scope::new().with("extra", extra);
        assert_eq!(
            render_compiled("<a {**extra} x=\"1\" />", &scope, &Environment::new()),
            r#"<a x="1" y="2" />"#
        );
    }

    #[test]
    fn test_spread_overrides_named_value_in_place() {
        let mut extra = Props::new();
        extra.insert("x".into(), Value::from("9"));
        let scope = Scope::new().with("extra", extra);
        assert_eq!(
            render_compiled("<a x=\"1\" id=\"i\" {...extra} />", &scope, &Environment::new()),
            r#"<a x="9" id="i" />"#
        );
    }

    #[test]
    fn test_instantiate_spread_of_non_mapping() {
        let scope = Scope::new().with("extra", "oops");
        let err = ir_of("<a {...extra} />").instantiate(&scope).unwrap_err();
        assert_eq!(err, EvalError::NotAMapping("extra".into()));
    }

    #[test]
    fn test_instantiate_splice_value() {
        let scope = Scope::new().with("n", 5);
        let value = ir_of("<a>{n}</a>").instantiate(&scope).unwrap();
        let element = value.as_element().unwrap();
        assert_eq!(element.tag, Tag::from("a"));
        assert_eq!(element.get_children(), Some(&Value::Int(5)));
    }

    #[test]
    fn test_evaluate_literals() {
        let value = evaluate("[1, 2.5, True, False, None, 'x', \"y\\n\"]", &Scope::new()).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Bool(true),
                Value::Bool(false),
                Value::None,
                Value::from("x"),
                Value::from("y\n"),
            ])
        );
    }

    #[test]
    fn test_evaluate_element_with_dict_spread() {
        let value = evaluate(
            r#"Element("p", {"children": "a", **{"id": "b"}})"#,
            &Scope::new(),
        )
        .unwrap();
        let element = value.as_element().unwrap();
        assert_eq!(
            element.props.keys().collect::<Vec<_>>(),
            vec!["children", "id"]
        );
    }

    #[test]
    fn test_evaluate_fragment_marker() {
        let value = evaluate("Element(Fragment, {})", &Scope::new()).unwrap();
        assert_eq!(value.as_element().unwrap().tag, Tag::Fragment);
    }

    #[test]
    fn test_evaluate_tag_from_scope() {
        let scope = Scope::new().with("tag", "section");
        let value = evaluate("Element(tag, {})", &scope).unwrap();
        assert_eq!(value.as_element().unwrap().tag, Tag::from("section"));
    }

    #[rstest]
    #[case::unbound("missing", EvalError::UnboundName("missing".into()))]
    #[case::spread_of_string(
        r#"{"a": 1, **"s"}"#,
        EvalError::NotAMapping("\"s\"".into())
    )]
    fn test_evaluate_errors(#[case] source: &str, #[case] expected: EvalError) {
        assert_eq!(evaluate(source, &Scope::new()).unwrap_err(), expected);
    }

    #[rstest]
    #[case::trailing("1 2")]
    #[case::unterminated("'abc")]
    #[case::call("f(x)")]
    #[case::empty("")]
    fn test_evaluate_rejects_unsupported_input(#[case] source: &str) {
        let scope = Scope::new().with("f", 1);
        assert!(matches!(
            evaluate(source, &scope),
            Err(EvalError::Unexpected { .. })
        ));
    }
}
