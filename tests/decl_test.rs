//! Typed declaration tests

#[cfg(test)]
mod tests {
    use cdecl::decl::{parse_source_collect, DeclarationParser};
    use cdecl::{parse_declaration, parse_declarations, parse_source, CType, CdeclError, Initializer};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("float f = 1.5;", CType::Float, Initializer::Number(1.5))]
    #[test_case("int i = 3;", CType::Int, Initializer::Number(3.0))]
    #[test_case("unsigned u = other;", CType::Unsigned, Initializer::Identifier("other".to_string()))]
    #[test_case(r#"char* s = "a\tb";"#, CType::CharPtr, Initializer::Str("a\tb".to_string()))]
    fn test_declaration_kinds(input: &str, ty: CType, value: Initializer) {
        let decl = parse_declaration(input).unwrap();
        assert_eq!(decl.ty, ty);
        assert_eq!(decl.value, value);
    }

    #[test]
    fn test_display_round_trip() {
        let source = r#"char* greeting = "say \"hi\"";"#;
        let decl = parse_declaration(source).unwrap();
        let again = parse_declaration(&decl.to_string()).unwrap();
        assert_eq!(decl.value, again.value);
    }

    #[test]
    fn test_several_declarators() {
        let decls = parse_declarations("double x = 7, y = x;").unwrap();
        let rendered: Vec<_> = decls.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["double x = 7;", "double y = x;"]);
    }

    #[test]
    fn test_string_cannot_initialize_number() {
        assert!(parse_declaration(r#"int x = "7";"#).is_err());
    }

    #[test]
    fn test_bad_number_is_action_error() {
        let err = parse_declaration("double x = 1.2.3;").unwrap_err();
        assert!(matches!(err, CdeclError::Action(_)));
    }

    #[test]
    fn test_number_out_of_range_is_action_error() {
        let source = format!("double x = {};", "9".repeat(400));
        let err = parse_declaration(&source).unwrap_err();
        assert!(matches!(err, CdeclError::Action(_)));
        assert!(err.to_string().ends_with("is out of range (at char 11), (line:1, col:12)"));
    }

    #[test]
    fn test_whole_source() {
        let source = "int width = 80;\n\
                      int height = 24;\n\
                      double ratio = width, scale = 1.5;\n\
                      char* title = \"terminal\";\n";
        let decls = parse_source(source).unwrap();
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["width", "height", "ratio", "scale", "title"]);
        // declarators of one statement share its span
        assert_eq!(decls[2].span, decls[3].span);
    }

    #[test]
    fn test_collect_reports_each_bad_statement() {
        let source = "int a = 1;\nint = 2;\nfloat b = 2;\nchar* c = d;\n";
        let (decls, errors) = parse_source_collect(source);
        assert_eq!(decls.len(), 2);
        assert_eq!(errors.len(), 2);
        let lines: Vec<_> = errors
            .iter()
            .map(|e| match e {
                CdeclError::Parse(p) => p.line,
                other => panic!("Expected parse error, got {:?}", other),
            })
            .collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_parser_iterates_statements() {
        let mut parser = DeclarationParser::new("int a = 1; int b = 2;");
        assert_eq!(parser.next_statement().unwrap().unwrap()[0].name, "a");
        assert_eq!(parser.position(), 10);
        assert_eq!(parser.next_statement().unwrap().unwrap()[0].name, "b");
        assert!(parser.next_statement().is_none());
    }

    #[test]
    fn test_parser_skips_bad_statement() {
        let mut parser = DeclarationParser::new("int = 1; int b = 2;");
        assert!(parser.next_statement().unwrap().is_err());
        assert_eq!(parser.next_statement().unwrap().unwrap()[0].name, "b");
        assert!(parser.next_statement().is_none());
    }
}
