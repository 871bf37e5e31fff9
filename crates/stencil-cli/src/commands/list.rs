//! Implementation of the `stencil list` command.

use std::path::Path;

use stencil_adapters::LocalFilesystem;
use stencil_core::{
    application::ParameterStore,
    domain::{ParameterDeclaration, Template},
};

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    config::AppConfig,
    error::{CliResult, IntoCli as _},
    output::OutputManager,
    prompt::TerminalPrompter,
};

/// A named template and what it declares.
struct Listed {
    name: String,
    declarations: Vec<ParameterDeclaration>,
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates = installed_templates(&config.templates.dir)?;

    let format = match (args.format, output.format()) {
        (_, OutputFormat::Json) => ListFormat::Json,
        (format, _) => format,
    };

    match format {
        ListFormat::Table => {
            output.header(&format!(
                "Available Templates ({}):",
                config.templates.dir.display()
            ))?;
            for template in &templates {
                output.print(&format!("  {}", template.name))?;
                for declaration in &template.declarations {
                    let default = match declaration.default_value() {
                        "" => "<prompted>",
                        value => value,
                    };
                    output.print(&format!("      {:<28} {}", declaration.key(), default))?;
                }
            }
        }

        ListFormat::Names => {
            for template in &templates {
                output.print(&template.name)?;
            }
        }

        // JSON must stay parseable when piped, so it bypasses quiet mode.
        ListFormat::Json => {
            let object: serde_json::Map<String, serde_json::Value> = templates
                .iter()
                .map(|t| {
                    let defaults: serde_json::Map<String, serde_json::Value> = t
                        .declarations
                        .iter()
                        .map(|d| (d.key().to_string(), d.default_value().into()))
                        .collect();
                    (t.name.clone(), defaults.into())
                })
                .collect();
            println!("{:#}", serde_json::Value::Object(object));
        }
    }

    Ok(())
}

/// Every directory under `dir` that declares parameters, sorted by name.
fn installed_templates(dir: &Path) -> CliResult<Vec<Listed>> {
    let filesystem = LocalFilesystem::new();
    let prompter = TerminalPrompter::line_based();
    let store = ParameterStore::new(&filesystem, &prompter);

    let entries = std::fs::read_dir(dir)
        .with_cli_context(|| format!("Failed to read template directory '{}'", dir.display()))?;

    let mut listed = Vec::new();
    for entry in entries {
        let entry = entry.with_cli_context(|| format!("Failed to read '{}'", dir.display()))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };
        let template = Template::new(name.clone(), path.clone());
        if !path.is_dir() || !template.declaration_path().is_file() {
            continue;
        }
        let declarations = store.declarations(&template)?;
        listed.push(Listed { name, declarations });
    }
    listed.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listed)
}
