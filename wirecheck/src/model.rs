//! Schematic Data Model
//!
//! Ports belong to device templates, templates live in a shared library and
//! are referenced by placed device instances, and connections join two
//! (instance, port) endpoints. The engines only ever read these types.
//!
//! Field names serialize in camelCase so snapshots exchanged with the editor
//! keep their spelling (`fromInstanceId`, `exitDirection`, ...).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::connector::ConnectorType;
use crate::core::WireCheckError;
use crate::geometry::Point;

/// Signal flow direction of a port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Input,
    Output,
    #[default]
    Bidirectional,
}

impl std::fmt::Display for FlowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowType::Input => write!(f, "input"),
            FlowType::Output => write!(f, "output"),
            FlowType::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

/// Preferred side a wire leaves the device body from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitDirection {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerKind {
    #[serde(rename = "AC", alias = "ac")]
    Ac,
    #[serde(rename = "DC", alias = "dc")]
    Dc,
}

impl std::fmt::Display for PowerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerKind::Ac => write!(f, "AC"),
            PowerKind::Dc => write!(f, "DC"),
        }
    }
}

/// Position of a port as percentages (0-100) of the template's bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortPosition {
    pub x: f64,
    pub y: f64,
}

/// A connection point on a device template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,

    pub label: String,

    pub position: PortPosition,

    #[serde(default, alias = "type")]
    pub flow_type: FlowType,

    #[serde(default)]
    pub connector_type: ConnectorType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_direction: Option<ExitDirection>,

    #[serde(default)]
    pub is_power: bool,

    #[serde(default)]
    pub is_ground: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_kind: Option<PowerKind>,

    /// Free-form voltage such as "12V" or "3.3 V"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amperage: Option<String>,
}

impl Port {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position: PortPosition::default(),
            flow_type: FlowType::default(),
            connector_type: ConnectorType::default(),
            exit_direction: None,
            is_power: false,
            is_ground: false,
            power_kind: None,
            voltage: None,
            amperage: None,
        }
    }

    pub fn at(mut self, x_percent: f64, y_percent: f64) -> Self {
        self.position = PortPosition { x: x_percent, y: y_percent };
        self
    }

    pub fn with_flow(mut self, flow_type: FlowType) -> Self {
        self.flow_type = flow_type;
        self
    }

    pub fn with_connector(mut self, connector_type: ConnectorType) -> Self {
        self.connector_type = connector_type;
        self
    }

    pub fn with_exit(mut self, direction: ExitDirection) -> Self {
        self.exit_direction = Some(direction);
        self
    }

    /// Mark as a supply port with the given voltage string
    pub fn with_power(mut self, voltage: impl Into<String>) -> Self {
        self.is_power = true;
        self.voltage = Some(voltage.into());
        self
    }

    pub fn with_power_kind(mut self, kind: PowerKind) -> Self {
        self.is_power = true;
        self.power_kind = Some(kind);
        self
    }

    /// Mark as a ground/return port
    pub fn as_ground(mut self) -> Self {
        self.is_power = true;
        self.is_ground = true;
        self
    }

    pub fn with_amperage(mut self, amperage: impl Into<String>) -> Self {
        self.amperage = Some(amperage.into());
        self
    }
}

/// A reusable device symbol in the shared library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTemplate {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Nominal width in canvas units
    pub width: f64,

    /// Nominal height in canvas units
    pub height: f64,

    #[serde(default)]
    pub ports: Vec<Port>,
}

impl DeviceTemplate {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            width,
            height,
            ports: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn port(&self, port_id: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == port_id)
    }
}

/// A placed occurrence of a template on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInstance {
    pub id: String,

    pub template_id: String,

    /// Canvas position of the top-left corner
    pub position: Point,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Degrees. Not applied by the geometry provider.
    #[serde(default)]
    pub rotation: f64,
}

impl DeviceInstance {
    pub fn new(id: impl Into<String>, template_id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            template_id: template_id.into(),
            position: Point::new(x, y),
            width: None,
            height: None,
            rotation: 0.0,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

/// How a wire is drawn between its endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireShape {
    Curved,
    Straight,
    #[default]
    Orthogonal,
}

/// A wire between exactly two (instance, port) endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from_instance_id: String,
    pub from_port_id: String,
    pub to_instance_id: String,
    pub to_port_id: String,

    #[serde(default)]
    pub shape: WireShape,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub control_points: Vec<Point>,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        from: (&str, &str),
        to: (&str, &str),
    ) -> Self {
        Self {
            id: id.into(),
            from_instance_id: from.0.to_string(),
            from_port_id: from.1.to_string(),
            to_instance_id: to.0.to_string(),
            to_port_id: to.1.to_string(),
            shape: WireShape::default(),
            control_points: Vec::new(),
        }
    }

    pub fn with_shape(mut self, shape: WireShape) -> Self {
        self.shape = shape;
        self
    }

    /// True if either endpoint is the given (instance, port)
    pub fn touches(&self, instance_id: &str, port_id: &str) -> bool {
        (self.from_instance_id == instance_id && self.from_port_id == port_id)
            || (self.to_instance_id == instance_id && self.to_port_id == port_id)
    }
}

/// Read-only template lookup keyed by template id
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: HashMap<String, DeviceTemplate>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: DeviceTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, template_id: &str) -> Option<&DeviceTemplate> {
        self.templates.get(template_id)
    }

    /// Template of an instance, if it is still in the library
    pub fn template_for(&self, instance: &DeviceInstance) -> Option<&DeviceTemplate> {
        self.get(&instance.template_id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<DeviceTemplate> for TemplateLibrary {
    fn from_iter<I: IntoIterator<Item = DeviceTemplate>>(iter: I) -> Self {
        let mut library = Self::new();
        for template in iter {
            library.insert(template);
        }
        library
    }
}

/// Placed instances of one page, in placement order, with an id index
#[derive(Debug, Clone, Default)]
pub struct InstanceSet {
    instances: Vec<DeviceInstance>,
    indices: HashMap<String, usize>,
}

impl InstanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance; a repeated id replaces the earlier entry in place
    pub fn insert(&mut self, instance: DeviceInstance) {
        if let Some(&idx) = self.indices.get(&instance.id) {
            self.instances[idx] = instance;
        } else {
            self.indices.insert(instance.id.clone(), self.instances.len());
            self.instances.push(instance);
        }
    }

    pub fn get(&self, instance_id: &str) -> Option<&DeviceInstance> {
        self.indices
            .get(instance_id)
            .and_then(|&idx| self.instances.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Resolve an (instance, port) endpoint to its instance, template and port
    pub fn resolve<'a>(
        &'a self,
        templates: &'a TemplateLibrary,
        instance_id: &str,
        port_id: &str,
    ) -> Option<ResolvedPort<'a>> {
        let instance = self.get(instance_id)?;
        let template = templates.template_for(instance)?;
        let port = template.port(port_id)?;
        Some(ResolvedPort {
            instance,
            template,
            port,
        })
    }
}

impl FromIterator<DeviceInstance> for InstanceSet {
    fn from_iter<I: IntoIterator<Item = DeviceInstance>>(iter: I) -> Self {
        let mut set = Self::new();
        for instance in iter {
            set.insert(instance);
        }
        set
    }
}

/// An endpoint whose instance, template and port all exist
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPort<'a> {
    pub instance: &'a DeviceInstance,
    pub template: &'a DeviceTemplate,
    pub port: &'a Port,
}

/// Serializable bundle of everything the engines read for one page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSnapshot {
    #[serde(default)]
    pub templates: Vec<DeviceTemplate>,

    #[serde(default)]
    pub instances: Vec<DeviceInstance>,

    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl DiagramSnapshot {
    pub fn from_json_str(content: &str) -> Result<Self, WireCheckError> {
        let snapshot: DiagramSnapshot = serde_json::from_str(content)?;
        snapshot.check_ids()?;
        Ok(snapshot)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, WireCheckError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn library(&self) -> TemplateLibrary {
        self.templates.iter().cloned().collect()
    }

    pub fn instance_set(&self) -> InstanceSet {
        self.instances.iter().cloned().collect()
    }

    /// Duplicate ids make every id-keyed lookup ambiguous, so reject them on load.
    /// Dangling references are left alone; the engines skip them.
    fn check_ids(&self) -> Result<(), WireCheckError> {
        let mut seen = std::collections::HashSet::new();
        for template in &self.templates {
            if !seen.insert(template.id.as_str()) {
                return Err(WireCheckError::InvalidSnapshot(format!(
                    "duplicate template id '{}'",
                    template.id
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for instance in &self.instances {
            if !seen.insert(instance.id.as_str()) {
                return Err(WireCheckError::InvalidSnapshot(format!(
                    "duplicate instance id '{}'",
                    instance.id
                )));
            }
        }

        Ok(())
    }
}
