//! Naming schemes, identifying which names a set of classes or a mapping uses.
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use anyhow::{bail, Error, Result};

/// The convention names follow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SchemeKind {
	/// Obfuscated names, like `a` or `bcd`.
	Obf,
	/// Intermediate names, like `field_1234_a`, stable between versions.
	Srg,
	/// Human-readable names.
	Mcp,
}

/// Which distribution of the program the names belong to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
	Universal,
	Client,
	Server,
}

/// Identifies a naming convention together with the side and the version of the program.
///
/// Two collections of classes or mappings can only be used together if their schemes are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamingScheme {
	pub kind: SchemeKind,
	pub side: Side,
	pub version: String,
}

impl NamingScheme {
	pub fn new(kind: SchemeKind, side: Side, version: impl Into<String>) -> NamingScheme {
		NamingScheme { kind, side, version: version.into() }
	}

	/// Creates the scheme with the same side and version, but a different kind of names.
	pub fn with_kind(&self, kind: SchemeKind) -> NamingScheme {
		NamingScheme { kind, side: self.side, version: self.version.clone() }
	}
}

impl Display for NamingScheme {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {} {}", self.kind, self.side, self.version)
	}
}

impl Display for SchemeKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SchemeKind::Obf => "OBF",
			SchemeKind::Srg => "SRG",
			SchemeKind::Mcp => "MCP",
		})
	}
}

impl FromStr for SchemeKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s {
			"OBF" => SchemeKind::Obf,
			"SRG" => SchemeKind::Srg,
			"MCP" => SchemeKind::Mcp,
			s => bail!("unknown kind of names {s:?}, expected one of `OBF`, `SRG` or `MCP`"),
		})
	}
}

impl Display for Side {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Side::Universal => "UNIVERSAL",
			Side::Client => "CLIENT",
			Side::Server => "SERVER",
		})
	}
}

impl FromStr for Side {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s {
			"UNIVERSAL" => Side::Universal,
			"CLIENT" => Side::Client,
			"SERVER" => Side::Server,
			s => bail!("unknown side {s:?}, expected one of `UNIVERSAL`, `CLIENT` or `SERVER`"),
		})
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::scheme::{NamingScheme, SchemeKind, Side};

	#[test]
	fn parse_and_display() -> Result<()> {
		let scheme = NamingScheme::new("SRG".parse()?, "CLIENT".parse()?, "1.7.10");
		assert_eq!(scheme.to_string(), "SRG CLIENT 1.7.10");
		assert_eq!(scheme.with_kind(SchemeKind::Mcp), NamingScheme::new(SchemeKind::Mcp, Side::Client, "1.7.10"));

		assert!("srg".parse::<SchemeKind>().is_err());
		assert!("BOTH".parse::<Side>().is_err());
		Ok(())
	}

	#[test]
	fn equality_needs_everything() {
		let a = NamingScheme::new(SchemeKind::Obf, Side::Universal, "1.6.4");
		assert_eq!(a, a.clone());
		assert!(a != NamingScheme::new(SchemeKind::Obf, Side::Server, "1.6.4"));
		assert!(a != NamingScheme::new(SchemeKind::Obf, Side::Universal, "1.7.2"));
		assert!(a != a.with_kind(SchemeKind::Srg));
	}
}
