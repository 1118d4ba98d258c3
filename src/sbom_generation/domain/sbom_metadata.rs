use super::component::Component;

/// SbomMetadata value object representing BOM-level metadata
#[derive(Debug, Clone)]
pub struct SbomMetadata {
    timestamp: String,
    tool_name: String,
    tool_version: String,
    serial_number: String,
    component: Option<Component>,
}

impl SbomMetadata {
    pub fn new(
        timestamp: String,
        tool_name: String,
        tool_version: String,
        serial_number: String,
    ) -> Self {
        Self {
            timestamp,
            tool_name,
            tool_version,
            serial_number,
            component: None,
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.component = Some(component);
        self
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// The top-level component the BOM describes
    pub fn component(&self) -> Option<&Component> {
        self.component.as_ref()
    }
}

/// The assembled bill of materials handed to a formatter
#[derive(Debug, Clone)]
pub struct Bom {
    pub metadata: SbomMetadata,
    pub components: Vec<Component>,
    pub dependencies: Vec<super::Dependency>,
}
