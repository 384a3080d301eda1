use std::path::PathBuf;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use dukebox::access::AccessRules;
use quill::mapping::Mapping;
use quill::scheme::{NamingScheme, SchemeKind, Side};

#[derive(Debug, Parser)]
#[command(name = "bon", about = "Remaps and access transforms java classes")]
struct Cli {
	/// Be verbose.
	#[arg(short = 'v', long = "verbose")]
	verbose: bool,

	/// Only print errors.
	#[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
	quiet: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Reads access rule files, or directories with `*_at.cfg` files, and reports how many rules they have
	CheckAt {
		#[arg(required = true)]
		paths: Vec<PathBuf>,
	},
	/// Maps the class names in a descriptor or signature
	Desc {
		descriptor: String,

		/// Renames a single class.
		#[arg(short = 'c', long = "class", value_name = "FROM=TO", value_parser = parse_pair)]
		classes: Vec<(String, String)>,

		/// Replaces the start of class names without their own entry.
		#[arg(long = "prefix", value_name = "FROM=TO", value_parser = parse_pair)]
		prefixes: Vec<(String, String)>,

		/// The package for classes without one, like `net/minecraft/src/`.
		#[arg(long = "default-package", value_name = "PACKAGE")]
		default_package: Option<String>,

		/// Parse a method descriptor.
		#[arg(long = "method")]
		method: bool,

		/// Allow generic signatures.
		#[arg(long = "generic")]
		generic: bool,
	},
}

fn parse_pair(s: &str) -> Result<(String, String)> {
	let (from, to) = s.split_once('=')
		.with_context(|| anyhow!("expected `FROM=TO`, got {s:?}"))?;
	Ok((from.to_owned(), to.to_owned()))
}

fn setup_logging(level: LevelFilter) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn check_access_rules(paths: &[PathBuf]) -> Result<()> {
	let mut failed = 0;
	for path in paths {
		let mut rules = AccessRules::new();
		match rules.read_path(path) {
			Ok(files) => {
				let (classes, fields, methods) = rules.counts();
				info!("{path:?}: {files} files, {classes} class, {fields} field and {methods} method rules");
			},
			Err(e) => {
				error!("{path:?}: {e:#}");
				failed += 1;
			},
		}
	}

	if failed > 0 {
		bail!("{failed} of {} paths have malformed access rules", paths.len());
	}
	Ok(())
}

fn map_descriptor(
	descriptor: &str,
	classes: Vec<(String, String)>,
	prefixes: Vec<(String, String)>,
	default_package: Option<String>,
	method: bool,
	generic: bool,
) -> Result<String> {
	// only class names get mapped, so the schemes are never looked at
	let mut mapping = Mapping::new(
		NamingScheme::new(SchemeKind::Obf, Side::Universal, ""),
		NamingScheme::new(SchemeKind::Mcp, Side::Universal, ""),
	);
	for (from, to) in classes {
		mapping.set_class(from, to);
	}
	for (from, to) in prefixes {
		mapping.add_prefix(from, to);
	}
	if let Some(package) = default_package {
		mapping.set_default_package(package);
	}

	mapping.map_types(descriptor, generic, method)
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose {
		LevelFilter::Debug
	} else if cli.quiet {
		LevelFilter::Error
	} else {
		LevelFilter::Info
	};
	setup_logging(level)?;

	match cli.command {
		Command::CheckAt { paths } => check_access_rules(&paths),
		Command::Desc { descriptor, classes, prefixes, default_package, method, generic } => {
			let mapped = map_descriptor(&descriptor, classes, prefixes, default_package, method, generic)?;
			println!("{mapped}");
			Ok(())
		},
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use clap::CommandFactory;
	use pretty_assertions::assert_eq;
	use crate::{map_descriptor, parse_pair, Cli};

	#[test]
	fn cli() {
		Cli::command().debug_assert();
	}

	#[test]
	fn pairs() -> Result<()> {
		assert_eq!(parse_pair("a=b/C")?, ("a".to_owned(), "b/C".to_owned()));
		assert!(parse_pair("abc").is_err());
		Ok(())
	}

	#[test]
	fn descriptors() -> Result<()> {
		let classes = vec![("a".to_owned(), "net/minecraft/src/Block".to_owned())];
		let mapped = map_descriptor("(La;Lb;I)La;", classes, Vec::new(), Some("net/minecraft/src/".to_owned()), true, false)?;
		assert_eq!(mapped, "(Lnet/minecraft/src/Block;Lnet/minecraft/src/b;I)Lnet/minecraft/src/Block;");

		assert!(map_descriptor("(I)V", Vec::new(), Vec::new(), None, false, false).is_err());
		Ok(())
	}
}
