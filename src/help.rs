//! Usage screen derived from the field schema

use std::fmt::Write;

use crate::cli::PROGRAM_NAME;
use crate::schema::FieldDescriptor;

const NAME_PADDING: usize = 5;
const REQUIREDNESS_WIDTH: usize = 10;

/// Renders the help screen: banner, usage lines, then one row per field in declaration order.
pub fn render(schema: &[FieldDescriptor]) -> String {
    let name_width = schema.iter().map(|d| d.name.len()).max().unwrap_or(0) + NAME_PADDING;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{PROGRAM_NAME}  -  a simplified method of subscribing to Azure health events related to your Azure resources"
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Usage:");
    let _ = writeln!(
        out,
        "    {PROGRAM_NAME} -jsonConfig <file name> -subscriptionId <Guid> -resourceName <Resource Group Name> -password <password>"
    );
    let _ = writeln!(out, "    {PROGRAM_NAME} <required arguments>");
    let _ = writeln!(out, "    {PROGRAM_NAME} -help");
    let _ = writeln!(out);
    let _ = writeln!(out, "Options:");

    for descriptor in schema {
        let requiredness = if descriptor.required { "Required" } else { "Optional" };
        let _ = writeln!(
            out,
            "    {:<name_width$}{:<requiredness_width$}{}",
            format!("-{}", descriptor.name),
            requiredness,
            descriptor.help,
            requiredness_width = REQUIREDNESS_WIDTH,
        );
    }

    out
}
