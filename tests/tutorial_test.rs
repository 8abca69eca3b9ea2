//! Tutorial walk-through tests

#[cfg(test)]
mod tests {
    use cdecl::tutorial::{lessons, render, run_all, LessonReport};
    use pretty_assertions::assert_eq;

    fn report(title: &str) -> LessonReport {
        run_all()
            .into_iter()
            .find(|r| r.title == title)
            .unwrap_or_else(|| panic!("no lesson titled '{}'", title))
    }

    #[test]
    fn test_lesson_count_and_order() {
        let reports = run_all();
        assert_eq!(reports.len(), lessons().len());
        assert_eq!(reports[0].title, "Sequencing keywords, identifiers and numbers");
        assert_eq!(reports[11].title, "Anchoring at the end of input");
    }

    #[test]
    fn test_failing_lessons_print_the_error() {
        assert_eq!(
            report("Input that does not fit the grammar").output,
            vec![r#"Expected {"float" | "double" | "int" | "unsigned"} (at char 0), (line:1, col:1)"#]
        );
        assert_eq!(
            report("Valid C the grammar does not cover").output,
            vec![r#"Expected ";" (at char 12), (line:1, col:13)"#]
        );
        assert_eq!(
            report("Anchoring at the end of input").output,
            vec!["Expected end of text (at char 17), (line:1, col:18)"]
        );
    }

    #[test]
    fn test_named_results_lesson() {
        assert_eq!(report("Named results").output, vec!["double", "x", "7"]);
    }

    #[test]
    fn test_quoted_string_lesson() {
        assert_eq!(
            report("Quoted strings with escaped quotes").output,
            vec!["char*", "s", r#"he said "hello friend!""#]
        );
    }

    #[test]
    fn test_parse_action_lesson() {
        assert_eq!(report("Parse actions convert tokens").output, vec!["3.14", "6.28"]);
    }

    #[test]
    fn test_dump_lesson() {
        assert_eq!(
            report("Dumping named results").output,
            vec![
                "['double', 'x', 3.14]",
                "- identifier: 'x'",
                "- number: 3.14",
                "- type: 'double'",
            ]
        );
    }

    #[test]
    fn test_trailing_garbage_lesson() {
        let r = report("Trailing garbage is ignored by default");
        assert!(!r.failed);
        assert_eq!(r.output, vec!["['double', 'x', 3.14]"]);
    }

    #[test]
    fn test_render_separates_lessons() {
        let text = render(&run_all());
        assert!(text.starts_with("1. Sequencing keywords"));
        assert!(text.contains("\n\n13. Several declarators in one statement\n"));
        assert!(text.contains("   ['double', ['x', 7.0], ['y', 9.0]]\n"));
    }
}
