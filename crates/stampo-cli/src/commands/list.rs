use std::path::PathBuf;

use console::style;
use miette::Result;

use stampo_core::list_templates;
use stampo_core::template::TemplateBundle;

pub fn run(search_paths: &[PathBuf]) -> Result<()> {
    let bundles = list_templates(search_paths)?;

    if bundles.is_empty() {
        println!(
            "No templates installed. Place template bundles under a search \
             path or pass one with '{}'.",
            style("--search-paths").cyan()
        );
        return Ok(());
    }

    println!(
        "{} ({} template{})\n",
        style("Installed templates").bold(),
        bundles.len(),
        if bundles.len() == 1 { "" } else { "s" }
    );

    for bundle in &bundles {
        print_bundle(bundle);
    }

    Ok(())
}

fn print_bundle(bundle: &TemplateBundle) {
    println!("  {}", style(bundle.identifier()).cyan().bold());
    if bundle.display_name() != bundle.identifier() {
        println!("  {}   {}", style("name:").dim(), bundle.display_name());
    }
    println!("  {} {}", style("author:").dim(), bundle.author());
    println!(
        "  {}   {}",
        style("path:").dim(),
        bundle.root_path().display()
    );
    if !bundle.scripts().is_empty() {
        println!(
            "  {} {}",
            style("runners:").dim(),
            bundle.scripts().len()
        );
    }
    println!();
}
