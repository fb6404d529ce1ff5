use serde::{Deserialize, Serialize};

use super::rules::{DrcEngine, PortIssue, Severity};
use crate::model::{Connection, InstanceSet, ResolvedPort, TemplateLibrary};

/// One end of a checked connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    pub instance_id: String,
    pub port_id: String,
    pub label: String,
}

impl PortRef {
    fn from_resolved(resolved: &ResolvedPort<'_>) -> Self {
        Self {
            instance_id: resolved.instance.id.clone(),
            port_id: resolved.port.id.clone(),
            label: resolved.port.label.clone(),
        }
    }
}

/// A rule violation attached to a concrete connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrcIssue {
    pub kind: super::rules::IssueKind,
    pub severity: Severity,
    pub connection_id: String,
    pub from_port: PortRef,
    pub to_port: PortRef,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DrcStats {
    pub errors: usize,
    pub warnings: usize,
    pub connections_checked: usize,
    /// Connections whose endpoints no longer resolve
    pub connections_skipped: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrcReport {
    pub errors: Vec<DrcIssue>,
    pub warnings: Vec<DrcIssue>,
    #[serde(default)]
    pub connections_checked: usize,
    #[serde(default)]
    pub connections_skipped: usize,
}

impl DrcReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Errors first, then warnings
    pub fn issues(&self) -> impl Iterator<Item = &DrcIssue> {
        self.errors.iter().chain(self.warnings.iter())
    }

    pub fn stats(&self) -> DrcStats {
        DrcStats {
            errors: self.errors.len(),
            warnings: self.warnings.len(),
            connections_checked: self.connections_checked,
            connections_skipped: self.connections_skipped,
        }
    }

    fn push(&mut self, issue: DrcIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }
}

impl DrcEngine {
    /// Check every connection of a page.
    ///
    /// Connections whose instance, template or port cannot be found are
    /// skipped and counted, never reported as issues.
    pub fn run(
        &self,
        connections: &[Connection],
        instances: &InstanceSet,
        templates: &TemplateLibrary,
    ) -> DrcReport {
        let mut report = DrcReport::default();

        for connection in connections {
            let from = instances.resolve(templates, &connection.from_instance_id, &connection.from_port_id);
            let to = instances.resolve(templates, &connection.to_instance_id, &connection.to_port_id);
            let (Some(from), Some(to)) = (from, to) else {
                tracing::debug!(
                    "Skipping connection {}: endpoint {}:{} -> {}:{} does not resolve",
                    connection.id,
                    connection.from_instance_id,
                    connection.from_port_id,
                    connection.to_instance_id,
                    connection.to_port_id
                );
                report.connections_skipped += 1;
                continue;
            };

            report.connections_checked += 1;
            let from_ref = PortRef::from_resolved(&from);
            let to_ref = PortRef::from_resolved(&to);

            for PortIssue { kind, message } in self.validate_pair(from.port, to.port) {
                report.push(DrcIssue {
                    kind,
                    severity: kind.severity(),
                    connection_id: connection.id.clone(),
                    from_port: from_ref.clone(),
                    to_port: to_ref.clone(),
                    message,
                });
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::ConnectorType;
    use crate::drc::rules::IssueKind;
    use crate::model::{DeviceInstance, DeviceTemplate, FlowType, Port};

    fn fixture() -> (InstanceSet, TemplateLibrary) {
        let sensor = DeviceTemplate::new("sensor", 60.0, 40.0)
            .with_port(Port::new("out", "OUT").with_flow(FlowType::Output).with_connector(ConnectorType::M12A4Pin))
            .with_port(Port::new("in", "IN").with_flow(FlowType::Input).with_connector(ConnectorType::M12A4Pin));
        let io = DeviceTemplate::new("io", 80.0, 60.0)
            .with_port(Port::new("di", "DI").with_flow(FlowType::Input).with_connector(ConnectorType::M12A4Pin))
            .with_port(Port::new("lan", "LAN").with_flow(FlowType::Bidirectional).with_connector(ConnectorType::Rj45));

        let templates: TemplateLibrary = [sensor, io].into_iter().collect();
        let instances: InstanceSet = vec![
            DeviceInstance::new("s1", "sensor", 0.0, 0.0),
            DeviceInstance::new("io1", "io", 200.0, 0.0),
        ]
        .into_iter()
        .collect();
        (instances, templates)
    }

    #[test]
    fn test_empty_connections() {
        let (instances, templates) = fixture();
        let report = DrcEngine::with_default_rules().run(&[], &instances, &templates);

        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_classifies_errors_and_warnings() {
        let (instances, templates) = fixture();
        let connections = vec![
            Connection::new("ok", ("s1", "out"), ("io1", "di")),
            Connection::new("loop", ("s1", "in"), ("io1", "di")),
            Connection::new("bad", ("s1", "out"), ("io1", "lan")),
        ];

        let report = DrcEngine::with_default_rules().run(&connections, &instances, &templates);

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, IssueKind::InputToInput);
        assert_eq!(report.warnings[0].connection_id, "loop");

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::ConnectorMismatch);
        assert_eq!(report.errors[0].from_port.label, "OUT");
        assert_eq!(report.errors[0].to_port.label, "LAN");
        assert_eq!(report.connections_checked, 3);
    }

    #[test]
    fn test_dangling_connections_are_skipped() {
        let (instances, templates) = fixture();
        let connections = vec![
            Connection::new("gone-instance", ("s9", "out"), ("io1", "di")),
            Connection::new("gone-port", ("s1", "out"), ("io1", "nope")),
        ];

        let report = DrcEngine::with_default_rules().run(&connections, &instances, &templates);

        assert!(report.is_clean());
        assert_eq!(report.stats().connections_skipped, 2);
        assert_eq!(report.stats().connections_checked, 0);
    }
}
