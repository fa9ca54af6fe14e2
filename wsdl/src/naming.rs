use crate::{error::Error, registry::TypeRegistry, types::TypeDescriptor};

/// Canonical schema name of a type: `ArrayOf` + item name for arrays and
/// generic sequences, otherwise the override or the declared name.
pub fn schema_name(registry: &TypeRegistry, descriptor: &TypeDescriptor) -> Result<String, Error> {
    let mut name = String::new();
    let mut current = descriptor;
    let mut depth = 0;

    while let Some(item) = current.kind.item() {
        depth += 1;
        if depth > registry.len() {
            return Err(Error::CyclicCollection(descriptor.name.clone()));
        }

        name.push_str("ArrayOf");
        current = registry.get(item)?;
    }

    name.push_str(declared_name(current));
    Ok(name)
}

fn declared_name(descriptor: &TypeDescriptor) -> &str {
    descriptor
        .schema_name
        .as_deref()
        .unwrap_or(&descriptor.name)
}
