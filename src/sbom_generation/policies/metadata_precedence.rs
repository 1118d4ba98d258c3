use crate::sbom_generation::domain::{Component, ComponentType, PackageMetadata};

/// Partial description of the top-level component.
///
/// Used both for the imported metadata template and for the
/// `setName`/`setVersion`/`setType` overrides; unset fields defer to the
/// next source in line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentFields {
    pub name: Option<String>,
    pub version: Option<String>,
    pub component_type: Option<ComponentType>,
    pub metadata: Option<PackageMetadata>,
}

impl ComponentFields {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// MetadataPrecedence policy for the top-level component
///
/// Priority order, field by field:
/// 1. explicit overrides (`setName`, `setVersion`, `setType`)
/// 2. the imported metadata template
/// 3. what the scan found
pub struct MetadataPrecedence;

impl MetadataPrecedence {
    pub fn resolve(
        scanned: &Component,
        imported: Option<&ComponentFields>,
        overrides: &ComponentFields,
    ) -> Component {
        let imported_name = imported.and_then(|fields| fields.name.as_deref());
        let imported_version = imported.and_then(|fields| fields.version.as_deref());
        let imported_type = imported.and_then(|fields| fields.component_type);

        let name = overrides
            .name
            .as_deref()
            .or(imported_name)
            .unwrap_or(scanned.name());
        let version = overrides
            .version
            .as_deref()
            .or(imported_version)
            .unwrap_or(scanned.version());
        let component_type = overrides
            .component_type
            .or(imported_type)
            .unwrap_or(scanned.component_type());

        let component = scanned.renamed(name, version, component_type);
        match imported.and_then(|fields| fields.metadata.clone()) {
            Some(metadata) => component.with_metadata(metadata),
            None => component,
        }
    }
}
