//! Workflow command rendering (`::name key=value::message`).

/// Escapes command data so it survives on a single stdout line.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a command property value.
#[must_use]
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Renders a workflow command line without the trailing newline.
#[must_use]
pub fn render(command: &str, properties: &[(&str, &str)], message: &str) -> String {
    let rendered_properties = properties
        .iter()
        .map(|(key, value)| format!("{key}={}", escape_property(value)))
        .collect::<Vec<_>>()
        .join(",");
    let separator = if rendered_properties.is_empty() { "" } else { " " };
    format!(
        "::{command}{separator}{rendered_properties}::{}",
        escape_data(message)
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::render;

    #[rstest]
    #[case::plain("debug", &[], "hello", "::debug::hello")]
    #[case::multiline("error", &[], "a\nb: 100%", "::error::a%0Ab: 100%25")]
    #[case::properties(
        "set-output",
        &[("name", "a:b,c")],
        "value",
        "::set-output name=a%3Ab%2Cc::value"
    )]
    fn renders_workflow_commands(
        #[case] command: &str,
        #[case] properties: &[(&str, &str)],
        #[case] message: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(render(command, properties, message), expected);
    }
}
