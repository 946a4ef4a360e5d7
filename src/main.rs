use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use pathsbml::convert::{export_to_file, import_document};
use pathsbml::layout::{ForceDirected, LayoutAlgorithm, LayoutOptions};
use pathsbml::sbml;
use pathsbml::xref::StandardRegistry;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert SBML models to pathway diagrams", long_about = None)]
struct Cli {
    /// SBML file (.sbml or .xml)
    #[arg(value_name = "SBML_FILE")]
    sbml_file: Utf8PathBuf,

    /// Run the force-directed layout before output
    #[arg(long)]
    layout: bool,

    /// Re-export the diagram as SBML to this path instead of printing JSON
    #[arg(long, value_name = "OUT_FILE")]
    export: Option<Utf8PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !sbml::has_sbml_extension(&cli.sbml_file) {
        bail!("{} is not an .sbml or .xml file", cli.sbml_file);
    }
    let doc = sbml::read::parse_file(&cli.sbml_file)
        .with_context(|| format!("Failed to parse {}", cli.sbml_file))?;

    let registry = StandardRegistry;
    let mut diagram = import_document(&doc, &registry);

    if cli.layout {
        let opts = LayoutOptions {
            route_lines: true,
            ..Default::default()
        };
        ForceDirected::default().run(&mut diagram, &opts);
    }

    match cli.export {
        Some(path) => {
            export_to_file(&diagram, &path).with_context(|| format!("Failed to export {path}"))?;
        }
        None => {
            let json = serde_json::to_string_pretty(&diagram)?;
            println!("{}", json);
        }
    }
    Ok(())
}
