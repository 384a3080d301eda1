use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use indexmap::map::Entry;
use log::debug;
use walkdir::WalkDir;
use crate::access::{AccessRules, Modifier, RuleError};

/// The ending of the names of files with access rules, when reading a whole directory.
const RULES_FILE_SUFFIX: &str = "_at.cfg";

impl AccessRules {
	/// Reads rules, one per line, adding them to the ones already known.
	///
	/// A line looks like one of these:
	/// ```txt
	/// public net/minecraft/src/Block                    # a class
	/// protected-f net/minecraft/src/Block blockID       # a field
	/// public net/minecraft/src/Block onBlockAdded(III)V # a method
	/// public net/minecraft/src/Block *                  # all fields
	/// public net/minecraft/src/Block *()V               # all methods
	/// ```
	/// Everything after a `#` is ignored, and so are empty lines. The access specification starts with `private`,
	/// `default`, `protected` or `public`, and might end in `+f` or `-f` to set or clear the `final` flag. Class names
	/// may use `.` instead of `/`.
	///
	/// If there's already a rule for the same target, the two are merged, see [`Modifier::merge`].
	pub fn read(&mut self, reader: impl BufRead) -> Result<()> {
		for (number, line) in reader.lines().enumerate() {
			let line = line?;
			self.add_line(&line)
				.with_context(|| anyhow!("in line {}: {line:?}", number + 1))?;
		}
		Ok(())
	}

	pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let file = File::open(path)
			.with_context(|| anyhow!("could not open access rules file {path:?}"))?;
		self.read(BufReader::new(file))
			.with_context(|| anyhow!("failed to read access rules from {path:?}"))
	}

	/// Reads all files ending in `_at.cfg` in a directory and its subdirectories, in order of their path.
	///
	/// Returns the number of files read.
	pub fn read_dir(&mut self, path: impl AsRef<Path>) -> Result<usize> {
		let mut count = 0;
		for entry in WalkDir::new(path.as_ref()).sort_by_file_name() {
			let entry = entry?;
			let is_rules_file = entry.file_type().is_file() &&
				entry.file_name().to_str().is_some_and(|name| name.ends_with(RULES_FILE_SUFFIX));

			if is_rules_file {
				self.read_file(entry.path())?;
				count += 1;
			}
		}
		Ok(count)
	}

	/// Reads either a single file or a directory, see [`AccessRules::read_file`] and [`AccessRules::read_dir`].
	pub fn read_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
		let path = path.as_ref();
		if path.is_dir() {
			self.read_dir(path)
		} else {
			self.read_file(path).map(|()| 1)
		}
	}

	/// Adds the rule a single line describes, see [`AccessRules::read`] for the format.
	pub fn add_line(&mut self, line: &str) -> Result<()> {
		let line = line.split_once('#').map_or(line, |(line, _comment)| line);
		let parts: Vec<&str> = line.split_whitespace().collect();

		let (spec, class, member) = match parts.as_slice() {
			[] => return Ok(()),
			&[spec, class] => (spec, class, None),
			&[spec, class, member] => (spec, class, Some(member)),
			parts => return Err(RuleError::FieldCount(parts.len()).into()),
		};

		let class = class.replace('.', "/");
		let (table, key, name, desc) = match member {
			None => (&mut self.classes, class, "", ""),
			Some(member) => match member.find('(') {
				Some(paren) if paren > 0 => {
					let (name, desc) = member.split_at(paren);
					(&mut self.methods, format!("{class}/{member}"), name, desc)
				},
				_ => (&mut self.fields, format!("{class}/{member}"), member, ""),
			},
		};

		match table.entry(key) {
			Entry::Occupied(mut entry) => entry.get_mut().merge(spec),
			Entry::Vacant(entry) => {
				let modifier = Modifier::parse(spec)?;
				debug!("loaded rule {spec} {name}{desc} for {}", entry.key());
				entry.insert(modifier);
			},
		}
		Ok(())
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::access::{AccessRules, Modifier, RuleError, Visibility};

	#[test]
	fn lines() -> Result<()> {
		let mut rules = AccessRules::new();
		rules.read(
			"# just a comment\n\
			\n\
			public net.minecraft.src.Block\n\
			protected-f net/minecraft/src/Block blockID # trailing comment\n\
			public net/minecraft/src/Block onBlockAdded(III)V\n\
			public+f net/minecraft/src/Block *\n\
			public net/minecraft/src/Block *()V\n".as_bytes()
		)?;

		assert_eq!(rules.counts(), (1, 2, 2));
		assert_eq!(rules.class_rule("net/minecraft/src/Block"), Some(&Modifier { target: Visibility::Public, make_final: None }));
		assert_eq!(
			rules.field_rule("net/minecraft/src/Block", "blockID"),
			Some(&Modifier { target: Visibility::Protected, make_final: Some(false) })
		);
		assert_eq!(
			rules.field_rule("net/minecraft/src/Block", "*"),
			Some(&Modifier { target: Visibility::Public, make_final: Some(true) })
		);
		assert!(rules.method_rule("net/minecraft/src/Block", "onBlockAdded", "(III)V").is_some());
		assert!(rules.method_rule("net/minecraft/src/Block", "*", "()V").is_some());
		Ok(())
	}

	#[test]
	fn repeated_rules_merge() -> Result<()> {
		let mut rules = AccessRules::new();
		rules.add_line("public+f a b")?;
		rules.add_line("private-f a b")?;
		assert_eq!(rules.field_rule("a", "b"), Some(&Modifier { target: Visibility::Public, make_final: Some(false) }));
		Ok(())
	}

	#[test]
	fn malformed_lines() {
		let mut rules = AccessRules::new();

		let error = rules.add_line("public").unwrap_err();
		assert_eq!(error.downcast_ref::<RuleError>(), Some(&RuleError::FieldCount(1)));

		let error = rules.add_line("public a b c").unwrap_err();
		assert_eq!(error.downcast_ref::<RuleError>(), Some(&RuleError::FieldCount(4)));

		let error = rules.add_line("visible a").unwrap_err();
		assert_eq!(error.downcast_ref::<RuleError>(), Some(&RuleError::NoVisibility("visible".to_owned())));

		assert!(rules.is_empty());
	}

	#[test]
	fn error_has_line_number() {
		let mut rules = AccessRules::new();
		let error = rules.read("public a\npublic\n".as_bytes()).unwrap_err();
		assert!(error.to_string().contains("line 2"), "{error}");
	}
}
