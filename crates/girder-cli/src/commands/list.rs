//! Implementation of the `girder list` command.

use girder_pipeline::{BuiltinDocument, builtin_documents};

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let documents = builtin_documents::all();

    match args.format {
        ListFormat::Table => {
            output.header("Built-in documents:")?;
            let width = documents.iter().map(|d| d.name.len()).max().unwrap_or(0);
            for doc in documents {
                output.print(&table_row(doc, width))?;
            }
        }

        // Machine-readable formats bypass OutputManager so they survive --quiet.
        ListFormat::List => {
            for doc in documents {
                println!("{}", doc.name);
            }
        }

        ListFormat::Csv => {
            println!("name,description");
            for doc in documents {
                println!("{}", csv_row(doc));
            }
        }
    }

    Ok(())
}

fn table_row(doc: &BuiltinDocument, width: usize) -> String {
    format!("  {:<width$}  {}", doc.name, doc.description)
}

fn csv_row(doc: &BuiltinDocument) -> String {
    format!("{},\"{}\"", doc.name, doc.description.replace('"', "\"\""))
}
