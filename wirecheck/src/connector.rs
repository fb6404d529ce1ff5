//! Physical Connector Families
//!
//! Closed enumeration of the connector families a port can carry. Every
//! family is declared exactly once in the `connector_types!` table below,
//! which generates the enum together with its stable id (used on the wire
//! in JSON snapshots) and its human-readable label.
//!
//! `Generic` is a wildcard: it is compatible with every other family.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! connector_types {
    ($( $(#[$attr:meta])* $variant:ident => ($id:tt, $label:tt), )+) => {
        /// Physical connector family of a port
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ConnectorType {
            $(
                $(#[$attr])*
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl ConnectorType {
            /// Every connector family, in declaration order
            pub const ALL: &'static [ConnectorType] = &[$(ConnectorType::$variant,)+];

            /// Stable identifier, e.g. `m12-d-coded-4pin`
            pub fn id(self) -> &'static str {
                match self {
                    $(ConnectorType::$variant => $id,)+
                }
            }

            /// Human-readable name shown in issue messages
            pub fn label(self) -> &'static str {
                match self {
                    $(ConnectorType::$variant => $label,)+
                }
            }
        }
    };
}

connector_types! {
    #[default]
    Generic => ("generic", "Generic"),

    // Circular industrial
    M8A3Pin => ("m8-a-coded-3pin", "M8 A-coded 3-pin"),
    M8A4Pin => ("m8-a-coded-4pin", "M8 A-coded 4-pin"),
    M8D4Pin => ("m8-d-coded-4pin", "M8 D-coded 4-pin"),
    M12A4Pin => ("m12-a-coded-4pin", "M12 A-coded 4-pin"),
    M12A5Pin => ("m12-a-coded-5pin", "M12 A-coded 5-pin"),
    M12A8Pin => ("m12-a-coded-8pin", "M12 A-coded 8-pin"),
    M12A12Pin => ("m12-a-coded-12pin", "M12 A-coded 12-pin"),
    M12B5Pin => ("m12-b-coded-5pin", "M12 B-coded 5-pin"),
    M12D4Pin => ("m12-d-coded-4pin", "M12 D-coded 4-pin"),
    M12X8Pin => ("m12-x-coded-8pin", "M12 X-coded 8-pin"),
    M12K5Pin => ("m12-k-coded-5pin", "M12 K-coded 5-pin"),
    M12L5Pin => ("m12-l-coded-5pin", "M12 L-coded 5-pin"),
    M12S4Pin => ("m12-s-coded-4pin", "M12 S-coded 4-pin"),
    M12T4Pin => ("m12-t-coded-4pin", "M12 T-coded 4-pin"),
    M16 => ("m16", "M16 circular"),
    M23Signal => ("m23-signal", "M23 signal"),
    M23Power => ("m23-power", "M23 power"),
    SevenEighths => ("7-8-inch", "7/8\" mini-change"),

    // Heavy duty / rectangular
    HartingHan3A => ("harting-han-3a", "Harting Han 3A"),
    HartingHanE => ("harting-han-e", "Harting Han E"),
    HartingHanQ => ("harting-han-q", "Harting Han Q"),
    HartingPushPull => ("harting-push-pull", "Harting PushPull"),

    // Terminals
    ScrewTerminal => ("screw-terminal", "Screw terminal"),
    SpringTerminal => ("spring-terminal", "Spring-cage terminal"),
    PushInTerminal => ("push-in-terminal", "Push-in terminal"),
    LeverTerminal => ("lever-terminal", "Lever terminal"),
    PluggableTerminal => ("pluggable-terminal", "Pluggable terminal block"),
    FerruleWire => ("ferrule", "Wire ferrule"),
    RingLug => ("ring-lug", "Ring lug"),
    BusBar => ("bus-bar", "Bus bar"),

    // Networking
    Rj45 => ("rj45", "RJ45"),
    Rj11 => ("rj11", "RJ11"),
    Sfp => ("sfp", "SFP"),
    FiberLc => ("fiber-lc", "Fiber LC"),
    FiberSc => ("fiber-sc", "Fiber SC"),
    FiberSt => ("fiber-st", "Fiber ST"),

    // Serial / D-sub
    Db9 => ("db9", "D-sub 9"),
    Db15 => ("db15", "D-sub 15"),
    Db25 => ("db25", "D-sub 25"),
    Db37 => ("db37", "D-sub 37"),

    // USB
    UsbA => ("usb-a", "USB-A"),
    UsbB => ("usb-b", "USB-B"),
    UsbC => ("usb-c", "USB-C"),
    UsbMini => ("usb-mini", "Mini-USB"),
    UsbMicro => ("usb-micro", "Micro-USB"),

    // Video
    Hdmi => ("hdmi", "HDMI"),
    DisplayPort => ("displayport", "DisplayPort"),
    Dvi => ("dvi", "DVI"),
    Vga => ("vga", "VGA"),
    Bnc => ("bnc", "BNC"),
    Sdi => ("sdi", "SDI (BNC 75Ω)"),

    // RF / coax
    Sma => ("sma", "SMA"),
    Tnc => ("tnc", "TNC"),
    NType => ("n-type", "N-type"),
    FType => ("f-type", "F-type"),

    // Audio
    Rca => ("rca", "RCA"),
    Xlr3 => ("xlr-3", "XLR 3-pin"),
    Xlr5 => ("xlr-5", "XLR 5-pin"),
    Trs35 => ("trs-3.5mm", "TRS 3.5 mm"),
    Trs635 => ("trs-6.35mm", "TRS 6.35 mm"),
    Speakon => ("speakon", "Speakon"),

    // Mains and DC power
    IecC13 => ("iec-c13", "IEC C13"),
    IecC14 => ("iec-c14", "IEC C14"),
    IecC19 => ("iec-c19", "IEC C19"),
    IecC20 => ("iec-c20", "IEC C20"),
    PowerCon => ("powercon", "powerCON"),
    Nema515 => ("nema-5-15", "NEMA 5-15"),
    Schuko => ("schuko", "Schuko (CEE 7/4)"),
    Cee16A => ("cee-16a", "CEE 16 A"),
    Barrel5521 => ("barrel-5.5x2.1", "DC barrel 5.5×2.1 mm"),
    Barrel5525 => ("barrel-5.5x2.5", "DC barrel 5.5×2.5 mm"),
    AndersonPowerpole => ("anderson-powerpole", "Anderson Powerpole"),
    Xt30 => ("xt30", "XT30"),
    Xt60 => ("xt60", "XT60"),
    Banana4mm => ("banana-4mm", "Banana 4 mm"),

    // Board-level
    JstPh => ("jst-ph", "JST PH"),
    JstXh => ("jst-xh", "JST XH"),
    JstGh => ("jst-gh", "JST GH"),
    MolexMicroFit => ("molex-micro-fit", "Molex Micro-Fit"),
    MolexMiniFit => ("molex-mini-fit", "Molex Mini-Fit"),
    PinHeader254 => ("pin-header-2.54", "Pin header 2.54 mm"),
    Idc => ("idc", "IDC ribbon"),
}

impl ConnectorType {
    pub fn is_generic(self) -> bool {
        self == ConnectorType::Generic
    }

    /// Two families mate when they are equal or either side is `Generic`
    pub fn mates_with(self, other: ConnectorType) -> bool {
        self == other || self.is_generic() || other.is_generic()
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown connector type: {0}")]
pub struct UnknownConnector(pub String);

impl FromStr for ConnectorType {
    type Err = UnknownConnector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ConnectorType::ALL
            .iter()
            .copied()
            .find(|c| c.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownConnector(s.to_string()))
    }
}
