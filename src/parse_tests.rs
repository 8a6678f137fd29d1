#[cfg(test)]
mod tests {
    use crate::parse::ScanningParser;
    use crate::syntax::{find_next_markup, MarkupParser, NodeKind, SyntaxNode};
    use rstest::rstest;

    fn parse(source: &str) -> SyntaxNode {
        ScanningParser::new().parse(source)
    }

    fn kinds(nodes: &[SyntaxNode]) -> Vec<NodeKind> {
        nodes.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_element_with_string_attribute() {
        let source = "x = <div className=\"a\">Hi</div>\n";
        let tree = parse(source);

        assert_eq!(tree.kind, NodeKind::Module);
        assert_eq!(tree.child_count(), 1);
        let jsx = &tree.children[0];
        assert_eq!(jsx.kind, NodeKind::Jsx);
        assert_eq!(jsx.text(source), "<div className=\"a\">Hi</div>");

        let element = &jsx.children[0];
        assert_eq!(
            kinds(&element.children),
            vec![
                NodeKind::JsxOpeningElement,
                NodeKind::JsxText,
                NodeKind::JsxClosingElement
            ]
        );

        let opening = &element.children[0];
        assert_eq!(
            kinds(&opening.children),
            vec![
                NodeKind::Token,
                NodeKind::Identifier,
                NodeKind::JsxAttribute,
                NodeKind::Token
            ]
        );
        let attribute = &opening.children[2];
        assert_eq!(attribute.children[0].text(source), "className");
        assert_eq!(attribute.children[2].kind, NodeKind::String);
        assert_eq!(attribute.children[2].children[1].text(source), "a");
    }

    #[test]
    fn test_self_closing_boolean_attribute() {
        let source = "field = <input disabled />";
        let tree = parse(source);
        let element = &tree.children[0].children[0];

        assert_eq!(kinds(&element.children), vec![NodeKind::JsxSelfClosingElement]);
        let tag = &element.children[0];
        assert_eq!(tag.children[1].text(source), "input");
        assert_eq!(tag.children[2].kind, NodeKind::JsxAttribute);
        assert_eq!(tag.children[2].child_count(), 1);
        assert_eq!(tag.children[3].text(source), "/>");
    }

    #[rstest]
    #[case::comparison("if a <b: pass\n")]
    #[case::shift_like("y = x < y\n")]
    #[case::double_quoted("s = \"<div>\"\n")]
    #[case::single_quoted("s = '<div/>'\n")]
    #[case::triple_quoted("s = \"\"\"\n<div>\n\"\"\"\n")]
    #[case::prefixed("s = f\"<b>{x}</b>\"\n")]
    #[case::comment("# return <div/>\nx = 1\n")]
    fn test_no_markup(#[case] source: &str) {
        let tree = parse(source);
        assert!(find_next_markup(&tree).is_none(), "found markup in {:?}", source);
    }

    #[rstest]
    #[case::assignment("x = <br />", "<br />")]
    #[case::after_return("def f():\n    return <br />\n", "<br />")]
    #[case::call_argument("render(<p>x</p>)", "<p>x</p>")]
    #[case::list_item("[1, <b/>]", "<b/>")]
    #[case::start_of_file("<i>a</i>\n", "<i>a</i>")]
    fn test_markup_in_expression_position(#[case] source: &str, #[case] expected: &str) {
        let tree = parse(source);
        let jsx = find_next_markup(&tree).expect("markup occurrence");
        assert_eq!(jsx.text(source), expected);
    }

    #[test]
    fn test_sibling_occurrences_in_byte_order() {
        let source = "a = <b/>\nc = <d>e</d>\n";
        let tree = parse(source);
        let texts: Vec<&str> = tree.children.iter().map(|n| n.text(source)).collect();
        assert_eq!(texts, vec!["<b/>", "<d>e</d>"]);
        assert_eq!(find_next_markup(&tree).map(|n| n.start()), Some(4));
    }

    #[test]
    fn test_fragment_shape() {
        let source = "x = <>a<b/></>";
        let tree = parse(source);
        let fragment = &tree.children[0].children[0];

        assert_eq!(fragment.kind, NodeKind::JsxFragment);
        assert_eq!(
            kinds(&fragment.children),
            vec![
                NodeKind::Token,
                NodeKind::JsxText,
                NodeKind::JsxElement,
                NodeKind::Token
            ]
        );
        assert_eq!(fragment.children[0].text(source), "<>");
        assert_eq!(fragment.children[3].text(source), "</>");
    }

    #[test]
    fn test_markup_nested_in_code_splice() {
        let source = "x = <ul>{[<li>{i}</li> for i in items]}</ul>";
        let tree = parse(source);

        // Only the outer occurrence is top-level.
        assert_eq!(tree.child_count(), 1);
        let element = &tree.children[0].children[0];
        let code = &element.children[1];
        assert_eq!(code.kind, NodeKind::JsxCode);

        let expression = &code.children[1];
        assert_eq!(expression.kind, NodeKind::Expression);
        assert_eq!(expression.text(source), "[<li>{i}</li> for i in items]");
        assert_eq!(kinds(&expression.children), vec![NodeKind::Jsx]);
        assert_eq!(expression.children[0].text(source), "<li>{i}</li>");
    }

    #[rstest]
    #[case::ellipsis("<a {...props} />")]
    #[case::double_star("<a {**props} />")]
    fn test_spread_attribute(#[case] source: &str) {
        let tree = parse(source);
        let tag = &tree.children[0].children[0].children[0];
        let spread = &tag.children[2];

        assert_eq!(spread.kind, NodeKind::JsxSpreadAttribute);
        assert_eq!(spread.child_count(), 4);
        assert_eq!(spread.children[2].text(source), "props");
    }

    #[test]
    fn test_interpolated_attribute() {
        let source = "<a href={ url } />";
        let tree = parse(source);
        let attribute = &tree.children[0].children[0].children[0].children[2];
        let value = &attribute.children[2];

        assert_eq!(value.kind, NodeKind::Interpolation);
        assert_eq!(value.children[1].text(source), "url");
    }

    #[test]
    fn test_expression_ends_at_last_host_token() {
        let source = "<a>{ x + 1  # total\n  }</a>";
        let tree = parse(source);
        let code = &tree.children[0].children[0].children[1];

        assert_eq!(code.kind, NodeKind::JsxCode);
        assert_eq!(code.children[1].text(source), "x + 1");
        assert_eq!(code.children[2].text(source), "}");
    }

    #[test]
    fn test_empty_code_splice_has_no_expression() {
        let source = "<a>{ }</a>";
        let tree = parse(source);
        let code = &tree.children[0].children[0].children[1];

        assert_eq!(code.kind, NodeKind::JsxCode);
        assert_eq!(kinds(&code.children), vec![NodeKind::Token, NodeKind::Token]);
    }

    #[test]
    fn test_bare_attribute_value_is_identifier() {
        let source = "<a href=foo />";
        let tree = parse(source);
        let attribute = &tree.children[0].children[0].children[0].children[2];
        assert_eq!(attribute.children[2].kind, NodeKind::Identifier);
    }

    #[test]
    fn test_malformed_markup_yields_error_node() {
        let source = "x = <div";
        let tree = parse(source);
        let jsx = &tree.children[0];

        assert_eq!(jsx.kind, NodeKind::Jsx);
        assert_eq!(kinds(&jsx.children), vec![NodeKind::Error]);
    }

    #[test]
    fn test_unterminated_element_yields_error_node() {
        let source = "x = <p>text\ny = 1\n";
        let tree = parse(source);
        assert_eq!(tree.children[0].children[0].kind, NodeKind::Error);
    }

    #[rstest]
    #[case(NodeKind::Jsx, "jsx")]
    #[case(NodeKind::JsxElement, "jsx_element")]
    #[case(NodeKind::JsxSpreadAttribute, "jsx_spread_attribute")]
    #[case(NodeKind::Interpolation, "interpolation")]
    #[case(NodeKind::Error, "ERROR")]
    fn test_node_kind_tags(#[case] kind: NodeKind, #[case] tag: &str) {
        assert_eq!(kind.as_str(), tag);
        assert_eq!(kind.to_string(), tag);
    }
}
