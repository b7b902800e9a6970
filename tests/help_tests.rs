use azure_events::help::render;
use azure_events::schema::schema;

#[test]
fn test_help_lists_every_field_in_declaration_order() {
    let text = render(schema());
    let options = &text[text.find("Options:").unwrap()..];

    let positions: Vec<usize> = schema()
        .iter()
        .map(|d| {
            options.find(&format!("-{} ", d.name))
                .unwrap_or_else(|| panic!("{} missing from help", d.name))
        })
        .collect();

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_help_sections() {
    let text = render(schema());

    assert!(text.starts_with("azure-events  -  "));
    assert!(text.contains("Usage:\n"));
    assert!(text.contains("    azure-events -help\n"));
    assert!(text.contains("Options:\n"));
}

#[test]
fn test_help_rows_are_aligned() {
    let text = render(schema());
    let longest = schema().iter().map(|d| d.name.len()).max().unwrap();
    let requiredness_column = 4 + longest + 5;

    let rows: Vec<&str> = text
        .lines()
        .skip_while(|line| *line != "Options:")
        .skip(1)
        .collect();

    assert_eq!(rows.len(), schema().len());
    for (row, descriptor) in rows.iter().zip(schema()) {
        let expected = if descriptor.required { "Required" } else { "Optional" };
        assert_eq!(
            &row[requiredness_column..requiredness_column + expected.len()],
            expected,
            "misaligned row: {row}"
        );
        assert_eq!(&row[requiredness_column + 10..], descriptor.help);
    }
}

#[test]
fn test_config_file_field_is_marked_optional() {
    let text = render(schema());
    let row = text
        .lines()
        .find(|line| line.trim_start().starts_with("-jsonConfig"))
        .unwrap();
    assert!(row.contains("Optional"));
}
