//! Auto-Wire Matcher
//!
//! Proposes wires for a freshly placed device by pairing its free ports with
//! free ports on the rest of the page. Two independent heuristics run:
//!
//! - **label**: both port labels resolve to the same signal group (`SDA`,
//!   `TX`, ...) and the ports are physically and directionally compatible
//! - **power**: an output power port and an input power port share the same
//!   voltage string
//!
//! Scores are fixed per heuristic and never blended. Suggestions touching the
//! same port are all returned; reconciling them is up to the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::MatcherConfig;
use crate::model::{Connection, DeviceInstance, FlowType, InstanceSet, Port, TemplateLibrary, WireShape};

/// Canonical signal groups and their label aliases, already normalized.
///
/// Groups are tried in declaration order and the first hit wins. Aliases that
/// sit inside another group's alias (`SCL` in `SCLK`) make that order matter;
/// see [`ambiguous_aliases`].
pub const SIGNAL_GROUPS: &[(&str, &[&str])] = &[
    ("SDA", &["SDA", "I2CDATA"]),
    ("SCL", &["SCL", "I2CCLK", "I2CCLOCK"]),
    ("MOSI", &["MOSI", "COPI", "SIMO"]),
    ("MISO", &["MISO", "CIPO", "SOMI"]),
    ("SCLK", &["SCLK", "SCK", "SPICLK"]),
    ("CS", &["CS", "NSS", "CHIPSELECT"]),
    ("TX", &["TX", "TXD"]),
    ("RX", &["RX", "RXD"]),
    ("VCC", &["VCC", "VDD", "VBUS", "3V3", "PWR", "POWER"]),
    ("GND", &["GND", "GROUND", "VSS"]),
    ("CANH", &["CANH", "CANHIGH"]),
    ("CANL", &["CANL", "CANLOW"]),
    ("VIDEO_IN", &["VIDEOIN", "VIDIN", "CVBSIN"]),
    ("VIDEO_OUT", &["VIDEOOUT", "VIDOUT", "CVBSOUT"]),
];

fn fold_diacritic(c: char) -> char {
    match c {
        'À'..='Å' | 'à'..='å' | 'Ā' | 'ā' => 'A',
        'Ç' | 'ç' | 'Č' | 'č' => 'C',
        'È'..='Ë' | 'è'..='ë' | 'Ē' | 'ē' | 'Ě' | 'ě' => 'E',
        'Ì'..='Ï' | 'ì'..='ï' => 'I',
        'Ñ' | 'ñ' => 'N',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' => 'O',
        'Ù'..='Ü' | 'ù'..='ü' => 'U',
        'Ý' | 'ý' | 'ÿ' => 'Y',
        'Š' | 'š' => 'S',
        'Ž' | 'ž' => 'Z',
        other => other,
    }
}

/// Upper-case, fold accents, keep ASCII letters and digits only
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .map(fold_diacritic)
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Signal group a port label belongs to, if any
pub fn signal_group(label: &str) -> Option<&'static str> {
    let normalized = normalize_label(label);
    if normalized.is_empty() {
        return None;
    }
    SIGNAL_GROUPS
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| normalized.contains(alias)))
        .map(|(group, _)| *group)
}

/// An alias of one group that also occurs inside an alias of another
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasOverlap {
    pub group: &'static str,
    pub alias: &'static str,
    pub other_group: &'static str,
    pub other_alias: &'static str,
}

/// Every cross-group alias overlap in [`SIGNAL_GROUPS`]. A label containing
/// `other_alias` lands in whichever of the two groups is declared first.
pub fn ambiguous_aliases() -> Vec<AliasOverlap> {
    let mut overlaps = Vec::new();
    for &(group, aliases) in SIGNAL_GROUPS {
        for &(other_group, other_aliases) in SIGNAL_GROUPS {
            if group == other_group {
                continue;
            }
            for &alias in aliases {
                for &other_alias in other_aliases {
                    if other_alias.contains(alias) {
                        overlaps.push(AliasOverlap {
                            group,
                            alias,
                            other_group,
                            other_alias,
                        });
                    }
                }
            }
        }
    }
    overlaps
}

/// Connector families mate and the flow directions are not the same one-way
/// direction on both ends
pub fn are_ports_compatible(a: &Port, b: &Port) -> bool {
    let directions_ok = a.flow_type != b.flow_type || a.flow_type == FlowType::Bidirectional;
    directions_ok && a.connector_type.mates_with(b.connector_type)
}

/// A proposed wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiringSuggestion {
    pub from_instance_id: String,
    pub from_port_id: String,
    pub to_instance_id: String,
    pub to_port_id: String,
    /// 0..=100
    pub confidence: u8,
    pub reason: String,
}

impl WiringSuggestion {
    /// Accept the suggestion as a new wire with a fresh id
    pub fn into_connection(self, shape: WireShape) -> Connection {
        Connection {
            id: uuid::Uuid::new_v4().to_string(),
            from_instance_id: self.from_instance_id,
            from_port_id: self.from_port_id,
            to_instance_id: self.to_instance_id,
            to_port_id: self.to_port_id,
            shape,
            control_points: Vec::new(),
        }
    }
}

/// Ports already used by some wire
struct Occupied<'a> {
    ports: HashSet<(&'a str, &'a str)>,
}

impl<'a> Occupied<'a> {
    fn new(connections: &'a [Connection]) -> Self {
        let ports = connections
            .iter()
            .flat_map(|c| {
                [
                    (c.from_instance_id.as_str(), c.from_port_id.as_str()),
                    (c.to_instance_id.as_str(), c.to_port_id.as_str()),
                ]
            })
            .collect();
        Self { ports }
    }

    fn is_free(&self, instance_id: &str, port_id: &str) -> bool {
        !self.ports.contains(&(instance_id, port_id))
    }
}

/// Free ports of one instance. A missing template yields nothing.
fn free_ports<'a>(
    instance: &'a DeviceInstance,
    templates: &'a TemplateLibrary,
    occupied: &'a Occupied<'a>,
) -> impl Iterator<Item = &'a Port> + 'a {
    templates
        .template_for(instance)
        .into_iter()
        .flat_map(|template| template.ports.iter())
        .filter(move |port| occupied.is_free(&instance.id, &port.id))
}

/// Matcher with configurable confidence scores
#[derive(Debug, Clone, Default)]
pub struct AutoWireMatcher {
    config: MatcherConfig,
}

impl AutoWireMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Both heuristics, highest confidence first
    pub fn suggest(
        &self,
        new_instance_id: &str,
        instances: &InstanceSet,
        templates: &TemplateLibrary,
        existing: &[Connection],
    ) -> Vec<WiringSuggestion> {
        let mut suggestions = self.suggest_by_label(new_instance_id, instances, templates, existing);
        suggestions.extend(self.suggest_power(new_instance_id, instances, templates, existing));
        suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        tracing::debug!(
            "{} wiring suggestions for instance {}",
            suggestions.len(),
            new_instance_id
        );
        suggestions
    }

    pub fn suggest_by_label(
        &self,
        new_instance_id: &str,
        instances: &InstanceSet,
        templates: &TemplateLibrary,
        existing: &[Connection],
    ) -> Vec<WiringSuggestion> {
        let Some(new_instance) = instances.get(new_instance_id) else {
            tracing::debug!("No instance {}; nothing to suggest", new_instance_id);
            return Vec::new();
        };
        let occupied = Occupied::new(existing);
        let mut suggestions = Vec::new();

        for port in free_ports(new_instance, templates, &occupied) {
            let Some(group) = signal_group(&port.label) else {
                continue;
            };

            for other in instances.iter().filter(|i| i.id != new_instance.id) {
                for other_port in free_ports(other, templates, &occupied) {
                    if signal_group(&other_port.label) != Some(group) || !are_ports_compatible(port, other_port) {
                        continue;
                    }

                    let reason = format!(
                        "{} and {} are both {} signals",
                        port.label, other_port.label, group
                    );
                    let suggestion = if port.flow_type == FlowType::Input && other_port.flow_type == FlowType::Output {
                        suggestion((other, other_port), (new_instance, port), self.config.label_confidence, reason)
                    } else {
                        suggestion((new_instance, port), (other, other_port), self.config.label_confidence, reason)
                    };
                    suggestions.push(suggestion);
                }
            }
        }

        suggestions
    }

    pub fn suggest_power(
        &self,
        new_instance_id: &str,
        instances: &InstanceSet,
        templates: &TemplateLibrary,
        existing: &[Connection],
    ) -> Vec<WiringSuggestion> {
        let Some(new_instance) = instances.get(new_instance_id) else {
            return Vec::new();
        };
        let occupied = Occupied::new(existing);
        let mut suggestions = Vec::new();

        for port in free_ports(new_instance, templates, &occupied).filter(|p| p.is_power) {
            for other in instances.iter().filter(|i| i.id != new_instance.id) {
                for other_port in free_ports(other, templates, &occupied).filter(|p| p.is_power) {
                    let Some(voltage) = same_voltage(port, other_port) else {
                        continue;
                    };
                    let reason = format!("Matching {} supply", voltage);

                    match (port.flow_type, other_port.flow_type) {
                        (FlowType::Output, FlowType::Input) => suggestions.push(suggestion(
                            (new_instance, port),
                            (other, other_port),
                            self.config.power_confidence,
                            reason,
                        )),
                        (FlowType::Input, FlowType::Output) => suggestions.push(suggestion(
                            (other, other_port),
                            (new_instance, port),
                            self.config.power_confidence,
                            reason,
                        )),
                        _ => {}
                    }
                }
            }
        }

        suggestions
    }
}

/// The shared voltage string, when both ports declare the identical one
fn same_voltage<'a>(a: &'a Port, b: &Port) -> Option<&'a str> {
    let va = a.voltage.as_deref()?;
    let vb = b.voltage.as_deref()?;
    (!va.is_empty() && va == vb).then_some(va)
}

fn suggestion(
    from: (&DeviceInstance, &Port),
    to: (&DeviceInstance, &Port),
    confidence: u8,
    reason: String,
) -> WiringSuggestion {
    WiringSuggestion {
        from_instance_id: from.0.id.clone(),
        from_port_id: from.1.id.clone(),
        to_instance_id: to.0.id.clone(),
        to_port_id: to.1.id.clone(),
        confidence,
        reason,
    }
}

/// Ranked suggestions for a newly placed instance, default scores
pub fn suggest_connections(
    new_instance_id: &str,
    instances: &InstanceSet,
    templates: &TemplateLibrary,
    existing: &[Connection],
) -> Vec<WiringSuggestion> {
    AutoWireMatcher::default().suggest(new_instance_id, instances, templates, existing)
}

/// Power-only suggestions, default score
pub fn suggest_power_connections(
    new_instance_id: &str,
    instances: &InstanceSet,
    templates: &TemplateLibrary,
    existing: &[Connection],
) -> Vec<WiringSuggestion> {
    AutoWireMatcher::default().suggest_power(new_instance_id, instances, templates, existing)
}
