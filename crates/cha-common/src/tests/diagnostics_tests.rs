use super::*;

#[test]
fn test_format_message_fills_placeholders() {
    let template = get_message_template(diagnostic_codes::INCOMPATIBLE_SOLID_BASES).unwrap();
    let message = format_message(template, &["app.Window", "'gui.Widget', 'db.Row'"]);
    assert_eq!(
        message,
        "Class 'app.Window' cannot inherit from incompatible solid bases: 'gui.Widget', 'db.Row'."
    );
}

#[test]
fn test_every_code_has_a_template() {
    for code in [
        diagnostic_codes::INCOMPATIBLE_SOLID_BASES,
        diagnostic_codes::BASE_WITHOUT_SOLID_BASE,
        diagnostic_codes::UNEXPECTED_HIERARCHY_CYCLE,
    ] {
        let message = get_diagnostic_message(code).unwrap();
        assert_eq!(message.code, code);
        assert_eq!(message.category, DiagnosticCategory::Error);
        assert!(message.message.contains("{0}"));
    }
}

#[test]
fn test_with_related_appends() {
    let diag = Diagnostic::error("a.py".to_string(), 10, 5, "boom".to_string(), 7101)
        .with_related("b.py".to_string(), 1, 2, "declared here".to_string())
        .with_related("c.py".to_string(), 3, 4, "and here".to_string());

    assert_eq!(diag.related_information.len(), 2);
    assert_eq!(diag.related_information[0].file, "b.py");
    assert_eq!(
        diag.related_information[1].category,
        DiagnosticCategory::Message
    );
}
