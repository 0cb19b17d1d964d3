use factoscope_api::models::{FactoryMethodSignature, ProjectId, SignatureKind};
use factoscope_core::CatalogRegistry;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SignatureRow {
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Arg")]
    index: usize,
    #[tabled(rename = "Aliases")]
    aliases: String,
    #[tabled(rename = "Fallback")]
    fallback: String,
    #[tabled(rename = "Declared in")]
    path: String,
}

impl From<&FactoryMethodSignature> for SignatureRow {
    fn from(sig: &FactoryMethodSignature) -> Self {
        let mut aliases: Vec<String> = sig
            .aliases
            .iter()
            .map(|(key, alias)| format!("{} => {}", key, alias))
            .collect();
        aliases.sort();
        Self {
            class: sig.declaring_class.clone(),
            method: sig.method_name.clone(),
            index: sig.discriminator_index,
            aliases: aliases.join("\n"),
            fallback: sig.fallback_alias.clone(),
            path: sig.defining_path.clone(),
        }
    }
}

pub fn run(
    registry: &CatalogRegistry,
    project: &ProjectId,
    method: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = registry.get(project);
    let mut signatures: Vec<FactoryMethodSignature> = match method {
        Some(name) => catalog.find_by_method_name(name, SignatureKind::all()),
        None => catalog.all().to_vec(),
    };

    if signatures.is_empty() {
        println!("No signatures for {}.", project);
        return Ok(());
    }

    signatures.sort_by(|a, b| {
        (&a.declaring_class, &a.method_name, &a.defining_path).cmp(&(
            &b.declaring_class,
            &b.method_name,
            &b.defining_path,
        ))
    });
    let rows: Vec<SignatureRow> = signatures.iter().map(SignatureRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}
