//! Abstract Syntax Tree types for the definition language.
//!
//! `Display` on these types prints canonical source text: one statement per
//! line, single spaces, `is` for one device name and `are` for several.
//! Parsing that text yields an equal tree.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::lexer::Keyword;
use super::names::Names;

/// Complete AST of a parsed definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DefinitionFile {
    statements: Vec<Statement>,
}

impl DefinitionFile {
    /// Create a definition file from statements in source order.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// All statements, in source order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Device declarations, in source order.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceDecl> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Device(decl) => Some(decl),
            _ => None,
        })
    }

    /// Connections, in source order.
    pub fn connections(&self) -> impl Iterator<Item = &Connect> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Connect(connect) => Some(connect),
            _ => None,
        })
    }

    /// Monitor statements, in source order.
    pub fn monitors(&self) -> impl Iterator<Item = &Monitor> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Monitor(monitor) => Some(monitor),
            _ => None,
        })
    }

    /// Build a name table of every device and pin identifier, in order of
    /// first appearance.
    pub fn names(&self) -> Names {
        let mut names = Names::new();
        for statement in &self.statements {
            match statement {
                Statement::Device(decl) => {
                    names.lookup_all(decl.names.iter().map(String::as_str));
                }
                Statement::Connect(connect) => {
                    for terminal in [&connect.source, &connect.destination] {
                        terminal.intern(&mut names);
                    }
                }
                Statement::Monitor(monitor) => {
                    for terminal in &monitor.terminals {
                        terminal.intern(&mut names);
                    }
                }
            }
        }
        names
    }

    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }
}

impl<'a> IntoIterator for &'a DefinitionFile {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl fmt::Display for DefinitionFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

/// A single parenthesised statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "statement", rename_all = "snake_case"))]
pub enum Statement {
    /// `(DEVICE names is|are type [qualifier])`
    Device(DeviceDecl),
    /// `(CONNECT terminal to terminal)`
    Connect(Connect),
    /// `(MONITOR terminal...)`
    Monitor(Monitor),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(decl) => write!(f, "{}", decl),
            Self::Connect(connect) => write!(f, "{}", connect),
            Self::Monitor(monitor) => write!(f, "{}", monitor),
        }
    }
}

/// Declaration of one or more devices of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DeviceDecl {
    names: Vec<String>,
    /// Device type and qualifier
    pub kind: DeviceKind,
}

impl DeviceDecl {
    /// Declare devices of one kind. Returns `None` if `names` is empty.
    pub fn new(names: Vec<String>, kind: DeviceKind) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        Some(Self { names, kind })
    }

    /// Device names as written (never empty).
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Display for DeviceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let copula = if self.names.len() == 1 {
            Keyword::Is
        } else {
            Keyword::Are
        };
        write!(
            f,
            "({} {} {} {})",
            Keyword::Device,
            self.names.join(" "),
            copula,
            self.kind
        )
    }
}

/// Device types of the definition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DeviceType {
    Clock,
    Switch,
    Rc,
    And,
    Nand,
    Or,
    Nor,
    Dtype,
    Xor,
    Not,
}

impl DeviceType {
    /// Every device type, in declaration order.
    pub const ALL: [DeviceType; 10] = [
        Self::Clock,
        Self::Switch,
        Self::Rc,
        Self::And,
        Self::Nand,
        Self::Or,
        Self::Nor,
        Self::Dtype,
        Self::Xor,
        Self::Not,
    ];

    /// Map a keyword to the device type it names.
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Clock => Some(Self::Clock),
            Keyword::Switch => Some(Self::Switch),
            Keyword::Rc => Some(Self::Rc),
            Keyword::And => Some(Self::And),
            Keyword::Nand => Some(Self::Nand),
            Keyword::Or => Some(Self::Or),
            Keyword::Nor => Some(Self::Nor),
            Keyword::Dtype => Some(Self::Dtype),
            Keyword::Xor => Some(Self::Xor),
            Keyword::Not => Some(Self::Not),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Keyword {
        match self {
            Self::Clock => Keyword::Clock,
            Self::Switch => Keyword::Switch,
            Self::Rc => Keyword::Rc,
            Self::And => Keyword::And,
            Self::Nand => Keyword::Nand,
            Self::Or => Keyword::Or,
            Self::Nor => Keyword::Nor,
            Self::Dtype => Keyword::Dtype,
            Self::Xor => Keyword::Xor,
            Self::Not => Keyword::Not,
        }
    }

    /// Whether a numeric qualifier must follow this type.
    pub fn takes_qualifier(&self) -> bool {
        !matches!(self, Self::Dtype | Self::Xor | Self::Not)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().as_str())
    }
}

/// A device type together with its qualifier.
///
/// Only the qualifier-bearing types carry a number, so a `DeviceKind`
/// always pairs a type with a qualifier exactly when the type takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "qualifier", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum DeviceKind {
    /// Clock; qualifier is the half period in simulation cycles
    Clock(u32),
    /// Switch; qualifier is the initial state
    Switch(u32),
    /// RC pulse; qualifier is the number of cycles held high
    Rc(u32),
    /// AND gate; qualifier is the input count
    And(u32),
    /// NAND gate; qualifier is the input count
    Nand(u32),
    /// OR gate; qualifier is the input count
    Or(u32),
    /// NOR gate; qualifier is the input count
    Nor(u32),
    /// D-type flip-flop
    Dtype,
    /// Two-input XOR gate
    Xor,
    /// Inverter
    Not,
}

/// A qualifier that does not fit its device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierMismatch {
    /// The type requires a qualifier and none was given
    Missing(DeviceType),
    /// The type takes no qualifier and one was given
    Unexpected(DeviceType),
}

impl DeviceKind {
    /// Pair a device type with an optional qualifier.
    pub fn new(device_type: DeviceType, qualifier: Option<u32>) -> Result<Self, QualifierMismatch> {
        let kind = match (device_type, qualifier) {
            (DeviceType::Clock, Some(n)) => Self::Clock(n),
            (DeviceType::Switch, Some(n)) => Self::Switch(n),
            (DeviceType::Rc, Some(n)) => Self::Rc(n),
            (DeviceType::And, Some(n)) => Self::And(n),
            (DeviceType::Nand, Some(n)) => Self::Nand(n),
            (DeviceType::Or, Some(n)) => Self::Or(n),
            (DeviceType::Nor, Some(n)) => Self::Nor(n),
            (DeviceType::Dtype, None) => Self::Dtype,
            (DeviceType::Xor, None) => Self::Xor,
            (DeviceType::Not, None) => Self::Not,
            (ty, None) => return Err(QualifierMismatch::Missing(ty)),
            (ty, Some(_)) => return Err(QualifierMismatch::Unexpected(ty)),
        };
        Ok(kind)
    }

    pub fn device_type(&self) -> DeviceType {
        match self {
            Self::Clock(_) => DeviceType::Clock,
            Self::Switch(_) => DeviceType::Switch,
            Self::Rc(_) => DeviceType::Rc,
            Self::And(_) => DeviceType::And,
            Self::Nand(_) => DeviceType::Nand,
            Self::Or(_) => DeviceType::Or,
            Self::Nor(_) => DeviceType::Nor,
            Self::Dtype => DeviceType::Dtype,
            Self::Xor => DeviceType::Xor,
            Self::Not => DeviceType::Not,
        }
    }

    pub fn qualifier(&self) -> Option<u32> {
        match *self {
            Self::Clock(n)
            | Self::Switch(n)
            | Self::Rc(n)
            | Self::And(n)
            | Self::Nand(n)
            | Self::Or(n)
            | Self::Nor(n) => Some(n),
            Self::Dtype | Self::Xor | Self::Not => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier() {
            Some(n) => write!(f, "{} {}", self.device_type(), n),
            None => write!(f, "{}", self.device_type()),
        }
    }
}

/// A device reference, optionally naming one of its pins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DeviceTerminal {
    pub device: String,
    pub pin: Option<String>,
}

impl DeviceTerminal {
    /// Reference a single-output device.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            pin: None,
        }
    }

    /// Reference a named pin of a device.
    pub fn with_pin(device: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            pin: Some(pin.into()),
        }
    }

    fn intern(&self, names: &mut Names) {
        names.lookup(&self.device);
        if let Some(pin) = &self.pin {
            names.lookup(pin);
        }
    }
}

impl fmt::Display for DeviceTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pin {
            Some(pin) => write!(f, "{}.{}", self.device, pin),
            None => write!(f, "{}", self.device),
        }
    }
}

/// A wire from an output terminal to an input terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Connect {
    pub source: DeviceTerminal,
    pub destination: DeviceTerminal,
}

impl fmt::Display for Connect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} {} {})",
            Keyword::Connect,
            self.source,
            Keyword::To,
            self.destination
        )
    }
}

/// Terminals whose signals should be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Monitor {
    terminals: Vec<DeviceTerminal>,
}

impl Monitor {
    /// Monitor the given terminals. Returns `None` if `terminals` is empty.
    pub fn new(terminals: Vec<DeviceTerminal>) -> Option<Self> {
        if terminals.is_empty() {
            return None;
        }
        Some(Self { terminals })
    }

    /// Monitored terminals (never empty).
    pub fn terminals(&self) -> &[DeviceTerminal] {
        &self.terminals
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", Keyword::Monitor)?;
        for terminal in &self.terminals {
            write!(f, " {}", terminal)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_kind_requires_qualifier() {
        assert_eq!(
            DeviceKind::new(DeviceType::Clock, Some(5)),
            Ok(DeviceKind::Clock(5))
        );
        assert_eq!(
            DeviceKind::new(DeviceType::Nand, None),
            Err(QualifierMismatch::Missing(DeviceType::Nand))
        );
    }

    #[test]
    fn test_device_kind_rejects_qualifier() {
        assert_eq!(DeviceKind::new(DeviceType::Not, None), Ok(DeviceKind::Not));
        assert_eq!(
            DeviceKind::new(DeviceType::Dtype, Some(5)),
            Err(QualifierMismatch::Unexpected(DeviceType::Dtype))
        );
    }

    #[test]
    fn test_qualifier_iff_type_takes_one() {
        for ty in DeviceType::ALL {
            let qualifier = ty.takes_qualifier().then_some(1);
            let kind = DeviceKind::new(ty, qualifier).unwrap();
            assert_eq!(kind.device_type(), ty);
            assert_eq!(kind.qualifier(), qualifier);
        }
    }

    #[test]
    fn test_lists_are_never_empty() {
        assert!(DeviceDecl::new(Vec::new(), DeviceKind::Not).is_none());
        assert!(Monitor::new(Vec::new()).is_none());

        let monitor = Monitor::new(vec![DeviceTerminal::new("a")]).unwrap();
        assert_eq!(monitor.terminals().len(), 1);
        assert_eq!(monitor.to_string(), "(MONITOR a)");
    }

    #[test]
    fn test_display_statements() {
        let file = DefinitionFile::new(vec![
            Statement::Device(DeviceDecl::new(vec!["sw1".into(), "sw2".into()], DeviceKind::Switch(0)).unwrap()),
            Statement::Device(DeviceDecl::new(vec!["ff".into()], DeviceKind::Dtype).unwrap()),
            Statement::Connect(Connect {
                source: DeviceTerminal::new("sw1"),
                destination: DeviceTerminal::with_pin("ff", "DATA"),
            }),
            Statement::Monitor(Monitor::new(vec![DeviceTerminal::with_pin("ff", "Q"), DeviceTerminal::new("sw2")]).unwrap()),
        ]);

        assert_eq!(
            file.to_string(),
            "(DEVICE sw1 sw2 are SWITCH 0)\n\
             (DEVICE ff is DTYPE)\n\
             (CONNECT sw1 to ff.DATA)\n\
             (MONITOR ff.Q sw2)\n"
        );
    }

    #[test]
    fn test_names_in_first_appearance_order() {
        let file = DefinitionFile::new(vec![
            Statement::Device(DeviceDecl::new(vec!["clk".into()], DeviceKind::Clock(1)).unwrap()),
            Statement::Connect(Connect {
                source: DeviceTerminal::new("clk"),
                destination: DeviceTerminal::with_pin("q", "CLK"),
            }),
        ]);

        let names = file.names();
        let all: Vec<&str> = names.iter().map(|(_, name)| name).collect();
        assert_eq!(all, vec!["clk", "q", "CLK"]);
    }

    #[test]
    fn test_filters() {
        let file = DefinitionFile::new(vec![
            Statement::Monitor(Monitor::new(vec![DeviceTerminal::new("a")]).unwrap()),
            Statement::Device(DeviceDecl::new(vec!["a".into()], DeviceKind::Xor).unwrap()),
        ]);
        assert_eq!(file.devices().count(), 1);
        assert_eq!(file.connections().count(), 0);
        assert_eq!(file.monitors().count(), 1);
    }
}

#[cfg(all(test, feature = "serde"))]
mod json_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_json_shape() {
        let decl = DeviceDecl::new(vec!["g1".into()], DeviceKind::Clock(5)).unwrap();
        assert_eq!(
            serde_json::to_value(Statement::Device(decl)).unwrap(),
            json!({
                "statement": "device",
                "names": ["g1"],
                "kind": { "type": "CLOCK", "qualifier": 5 }
            })
        );
        assert_eq!(
            serde_json::to_value(DeviceKind::Dtype).unwrap(),
            json!({ "type": "DTYPE" })
        );
    }

    #[test]
    fn test_connect_json_shape() {
        let connect = Connect {
            source: DeviceTerminal::new("g1"),
            destination: DeviceTerminal::with_pin("sw1", "Q"),
        };
        assert_eq!(
            serde_json::to_value(Statement::Connect(connect)).unwrap(),
            json!({
                "statement": "connect",
                "source": { "device": "g1", "pin": null },
                "destination": { "device": "sw1", "pin": "Q" }
            })
        );
    }
}
