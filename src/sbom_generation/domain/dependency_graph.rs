/// Node of the BOM dependency graph.
///
/// Every component gets one node whose children reference the bom-refs of
/// its direct dependencies; children carry no grandchildren.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    bom_ref: String,
    dependencies: Vec<Dependency>,
}

impl Dependency {
    pub fn new(bom_ref: String, mut children: Vec<String>) -> Self {
        children.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));
        children.dedup();
        Self {
            bom_ref,
            dependencies: children
                .into_iter()
                .map(|child| Dependency {
                    bom_ref: child,
                    dependencies: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn bom_ref(&self) -> &str {
        &self.bom_ref
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn child_refs(&self) -> Vec<&str> {
        self.dependencies.iter().map(|d| d.bom_ref.as_str()).collect()
    }
}
