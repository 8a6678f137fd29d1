#[cfg(test)]
mod tests {
    use crate::codegen::{quote_string, serialize, Codegen, CodegenRules};
    use crate::ir::{Children, ElementIr, IrNode, PropValue};
    use crate::parse::ScanningParser;
    use crate::runtime::Tag;
    use crate::syntax::{find_next_markup, MarkupParser};
    use crate::visitor::build_ir;
    use rstest::rstest;

    fn ir_of(source: &str) -> IrNode {
        let tree = ScanningParser::new().parse(source);
        let node = find_next_markup(&tree).expect("markup occurrence");
        build_ir(node, source, "test.pyx").expect("valid markup")
    }

    #[rstest]
    #[case::text_child(
        "<div className=\"a\">Hi</div>",
        r#"Element("div", {"className": "a", "children": "Hi"})"#
    )]
    #[case::boolean("<input disabled />", r#"Element("input", {"disabled": True})"#)]
    #[case::no_props("<br/>", r#"Element("br", {})"#)]
    #[case::code_attribute(
        "<Greeting name={x} />",
        r#"Element("Greeting", {"name": x})"#
    )]
    #[case::fragment(
        "<>{a}<span>{b}</span></>",
        r#"Element(Fragment, {"children": [a, Element("span", {"children": b})]})"#
    )]
    #[case::nested_markup_in_splice(
        "<ul>{[<li>{i}</li> for i in items]}</ul>",
        r#"Element("ul", {"children": [<li>{i}</li> for i in items]})"#
    )]
    fn test_serialize(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(serialize(&ir_of(source)), expected);
    }

    #[test]
    fn test_spreads_follow_named_props() {
        let source = "<a {...p} x=\"1\" {**q.r} {...(x or {})} />";
        assert_eq!(
            serialize(&ir_of(source)),
            r#"Element("a", {"x": "1", **p, **q.r, **(x or {})})"#
        );
    }

    #[test]
    fn test_children_come_after_named_props() {
        let source = "<a id=\"i\" {...rest}>body</a>";
        assert_eq!(
            serialize(&ir_of(source)),
            r#"Element("a", {"id": "i", "children": "body", **rest})"#
        );
    }

    #[test]
    fn test_real_children_replace_children_attribute_in_place() {
        let source = "<a children=\"x\" id=\"i\">y</a>";
        assert_eq!(
            serialize(&ir_of(source)),
            r#"Element("a", {"children": "y", "id": "i"})"#
        );
    }

    #[test]
    fn test_children_attribute_kept_without_real_children() {
        let source = "<a children=\"x\" />";
        assert_eq!(
            serialize(&ir_of(source)),
            r#"Element("a", {"children": "x"})"#
        );
    }

    #[rstest]
    #[case("plain", r#""plain""#)]
    #[case("say \"hi\"", r#""say \"hi\"""#)]
    #[case("back\\slash", r#""back\\slash""#)]
    #[case("caf\u{e9}", "\"caf\u{e9}\"")]
    fn test_quote_string(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(quote_string(text), expected);
    }

    #[test]
    fn test_custom_rules() {
        let rules = CodegenRules {
            element_constructor: "h".to_string(),
            fragment_marker: "Frag".to_string(),
            spread_operator: "**".to_string(),
            true_literal: "1".to_string(),
        };
        let mut element = ElementIr::new(Tag::Fragment);
        element.props.insert("hidden".to_string(), PropValue::BooleanTrue);
        element.children = Some(Children::Single(Box::new(IrNode::StringLiteral(
            "x".to_string(),
        ))));

        let out = Codegen::new(&rules).serialize(&IrNode::Element(element));
        assert_eq!(out, r#"h(Frag, {"hidden": 1, "children": "x"})"#);
    }

    #[test]
    fn test_top_level_literals() {
        assert_eq!(serialize(&IrNode::StringLiteral("a\nb".into())), r#""a\nb""#);
        assert_eq!(serialize(&IrNode::CodeSplice("f(x)".into())), "f(x)");
    }

    #[test]
    fn test_ir_json_dump_preserves_prop_order() {
        let ir = ir_of("<a z=\"1\" a=\"2\" m />");
        let json = serde_json::to_string(&ir).unwrap();
        let z = json.find("\"z\"").unwrap();
        let a = json.find("\"a\":").unwrap();
        let m = json.find("\"m\"").unwrap();
        assert!(z < a && a < m, "{json}");
        assert!(json.starts_with(r#"{"type":"element""#));
    }
}
