//! Widening the access flags of classes, fields and methods according to a set of rules.
//!
//! A rule names a class, a field, a method, or all fields or all methods of a class, and says which visibility
//! it should at least have. Rules never make anything less visible. They can also set or clear the `final` flag.
//!
//! Rules are usually read from text files, see [`AccessRules::read`] for their format.
use anyhow::{anyhow, bail, Context, Result};
use indexmap::{IndexMap, IndexSet};
use log::info;
use thiserror::Error;
use duke::tree::access::{Access, ACC_FINAL, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, VISIBILITY_MASK};
use duke::tree::class::{ClassFile, ClassName};
use crate::collection::ClassCollection;
use crate::inheritance::InheritanceIndex;
use crate::progress::ProgressListener;

mod parse;

/// The member name of a rule for all fields of a class.
pub const FIELD_WILDCARD: &str = "*";
/// The member name and descriptor of a rule for all methods of a class.
pub const METHOD_WILDCARD: &str = "*()V";

/// A line of access rules that can't be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
	#[error("expected 2 or 3 fields separated by spaces, got {0}")]
	FieldCount(usize),
	#[error("access specification {0:?} doesn't start with any of `private`, `default`, `protected` or `public`")]
	NoVisibility(String),
}

/// How visible something is, ordered from least to most visible.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
	Private,
	Default,
	Protected,
	Public,
}

impl Visibility {
	pub fn from_bits(bits: u16) -> Result<Visibility> {
		Ok(match bits & VISIBILITY_MASK {
			0 => Visibility::Default,
			ACC_PRIVATE => Visibility::Private,
			ACC_PROTECTED => Visibility::Protected,
			ACC_PUBLIC => Visibility::Public,
			bits => bail!("access flags {bits:#06x} have more than one of `public`, `private` and `protected` set"),
		})
	}

	pub fn bits(self) -> u16 {
		match self {
			Visibility::Private => ACC_PRIVATE,
			Visibility::Default => 0,
			Visibility::Protected => ACC_PROTECTED,
			Visibility::Public => ACC_PUBLIC,
		}
	}

	/// Parses the visibility keyword an access specification starts with, like `public` in `public-f`.
	fn from_spec(spec: &str) -> Option<Visibility> {
		[
			("private", Visibility::Private),
			("default", Visibility::Default),
			("protected", Visibility::Protected),
			("public", Visibility::Public),
		]
			.into_iter()
			.find(|(keyword, _)| spec.starts_with(keyword))
			.map(|(_, visibility)| visibility)
	}
}

/// The change a rule makes: the visibility to widen to, and optionally setting or clearing `final`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Modifier {
	pub target: Visibility,
	/// `Some(true)` sets the final flag, `Some(false)` clears it.
	pub make_final: Option<bool>,
}

impl Modifier {
	/// Parses an access specification like `public`, `protected-f` or `private+f`.
	pub fn parse(spec: &str) -> Result<Modifier, RuleError> {
		let target = Visibility::from_spec(spec)
			.ok_or_else(|| RuleError::NoVisibility(spec.to_owned()))?;

		let mut modifier = Modifier { target, make_final: None };
		modifier.merge_final(spec);
		Ok(modifier)
	}

	/// Merges another access specification for the same target into this one.
	///
	/// The visibility only ever goes up, and clearing `final` wins over setting it.
	pub fn merge(&mut self, spec: &str) {
		if let Some(target) = Visibility::from_spec(spec) {
			self.target = self.target.max(target);
		}
		self.merge_final(spec);
	}

	fn merge_final(&mut self, spec: &str) {
		if spec.ends_with("-f") {
			self.make_final = Some(false);
		} else if self.make_final.is_none() && spec.ends_with("+f") {
			self.make_final = Some(true);
		}
	}

	/// Applies the rule to raw access flags. Other flags than visibility and `final` are kept as is.
	pub fn apply(&self, bits: u16) -> Result<u16> {
		let visibility = Visibility::from_bits(bits)?.max(self.target);

		let mut bits = (bits & !VISIBILITY_MASK) | visibility.bits();
		match self.make_final {
			Some(true) => bits |= ACC_FINAL,
			Some(false) => bits &= !ACC_FINAL,
			None => {},
		}
		Ok(bits)
	}

	fn apply_to<A: Access>(&self, access: A) -> Result<A> {
		Ok(A::from(self.apply(access.bits())?))
	}
}

/// Sets of rules for classes, fields and methods.
///
/// Class rules are keyed by the class name, field rules by `class/field` and method rules by
/// `class/method(descriptor)`. The rules for all fields or methods of a class use [`FIELD_WILDCARD`] and
/// [`METHOD_WILDCARD`] in place of the member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessRules {
	classes: IndexMap<String, Modifier>,
	fields: IndexMap<String, Modifier>,
	methods: IndexMap<String, Modifier>,
}

impl AccessRules {
	pub fn new() -> AccessRules {
		AccessRules::default()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty() && self.fields.is_empty() && self.methods.is_empty()
	}

	/// Gives the number of class, field and method rules.
	pub fn counts(&self) -> (usize, usize, usize) {
		(self.classes.len(), self.fields.len(), self.methods.len())
	}

	pub fn class_rule(&self, class: &str) -> Option<&Modifier> {
		self.classes.get(class)
	}

	pub fn field_rule(&self, class: &str, field: &str) -> Option<&Modifier> {
		self.fields.get(&format!("{class}/{field}"))
	}

	pub fn method_rule(&self, class: &str, method: &str, desc: &str) -> Option<&Modifier> {
		self.methods.get(&format!("{class}/{method}{desc}"))
	}

	/// Widens the access of the classes in `input`, as these rules say.
	///
	/// The `references` are needed to find the super classes of classes, as a method rule for a class also applies
	/// to methods with the same name and descriptor in all classes extending it. The result is a new collection,
	/// with the same naming scheme.
	pub fn apply(&self, input: &ClassCollection, references: &[ClassCollection], mut progress: impl ProgressListener)
			-> Result<ClassCollection> {
		if self.is_empty() {
			return Ok(input.clone());
		}

		let index = InheritanceIndex::new(input, references);
		let (classes, fields, methods) = self.counts();
		info!("applying {classes} class, {fields} field and {methods} method access rules to {} classes", input.classes().len());

		progress.set_max(input.classes().len());

		let mut output = Vec::with_capacity(input.classes().len());
		for (i, class) in input.classes().iter().enumerate() {
			progress.set(i);

			let transformed = self.apply_to_class(&index, class.clone())
				.with_context(|| anyhow!("while transforming access of class {}", class.name))?;
			output.push(transformed);
		}

		input.replace_classes(input.scheme().clone(), output)
	}

	fn apply_to_class(&self, index: &InheritanceIndex, mut class: ClassFile) -> Result<ClassFile> {
		if let Some(rule) = self.class_rule(class.name.as_str()) {
			class.access = rule.apply_to(class.access)?;
		}

		if let Some(inner_classes) = &mut class.inner_classes {
			for inner_class in inner_classes {
				if let Some(rule) = self.class_rule(inner_class.inner_class.as_str()) {
					inner_class.flags = rule.apply_to(inner_class.flags)?;
				}
			}
		}

		for field in &mut class.fields {
			for rule in [
				self.field_rule(class.name.as_str(), field.name.as_str()),
				self.field_rule(class.name.as_str(), FIELD_WILDCARD),
			].into_iter().flatten() {
				field.access = rule.apply_to(field.access)?;
			}
		}

		for method in &mut class.methods {
			// rules for a super class apply as well, as long as it's known
			let mut seen = IndexSet::new();
			let mut owner = Some(class.name.as_str());
			while let Some(current) = owner.filter(|x| seen.insert(*x)) {
				for rule in [
					self.method_rule(current, method.name.as_str(), method.descriptor.as_str()),
					self.method_rule(current, METHOD_WILDCARD, ""),
				].into_iter().flatten() {
					method.access = rule.apply_to(method.access)?;
				}

				owner = index.super_class(current).map(ClassName::as_str);
			}
		}

		Ok(class)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::tree::access::{ACC_FINAL, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC};
	use crate::access::{Modifier, RuleError, Visibility};

	const ALL: [Visibility; 4] = [Visibility::Private, Visibility::Default, Visibility::Protected, Visibility::Public];

	#[test]
	fn never_narrows() -> Result<()> {
		for current in ALL {
			for target in ALL {
				let modifier = Modifier { target, make_final: None };
				let result = Visibility::from_bits(modifier.apply(current.bits())?)?;
				assert!(result >= current, "{current:?} with rule {target:?} became {result:?}");
				assert!(result >= target, "{current:?} with rule {target:?} became {result:?}");
			}
		}
		Ok(())
	}

	#[test]
	fn transition_table() -> Result<()> {
		let public = Modifier::parse("public")?;
		let protected = Modifier::parse("protected")?;
		let default = Modifier::parse("default")?;
		let private = Modifier::parse("private")?;

		assert_eq!(public.apply(ACC_PRIVATE)?, ACC_PUBLIC);
		assert_eq!(protected.apply(0)?, ACC_PROTECTED);
		assert_eq!(private.apply(0)?, 0);
		assert_eq!(default.apply(ACC_PROTECTED)?, ACC_PROTECTED);
		assert_eq!(default.apply(ACC_PRIVATE)?, 0);
		assert_eq!(private.apply(ACC_PUBLIC)?, ACC_PUBLIC);
		Ok(())
	}

	#[test]
	fn other_bits_kept() -> Result<()> {
		let modifier = Modifier::parse("public")?;
		assert_eq!(modifier.apply(ACC_PRIVATE | ACC_STATIC | ACC_FINAL)?, ACC_PUBLIC | ACC_STATIC | ACC_FINAL);
		assert!(modifier.apply(ACC_PRIVATE | ACC_PUBLIC).is_err());
		Ok(())
	}

	#[test]
	fn final_flag() -> Result<()> {
		assert_eq!(Modifier::parse("public-f")?.apply(ACC_FINAL)?, ACC_PUBLIC);
		assert_eq!(Modifier::parse("private+f")?.apply(ACC_PRIVATE)?, ACC_PRIVATE | ACC_FINAL);

		let mut modifier = Modifier::parse("protected+f")?;
		modifier.merge("protected-f");
		modifier.merge("protected+f");
		assert_eq!(modifier.make_final, Some(false));
		Ok(())
	}

	#[test]
	fn merge_only_widens() -> Result<()> {
		let mut modifier = Modifier::parse("protected")?;
		modifier.merge("private");
		assert_eq!(modifier.target, Visibility::Protected);
		modifier.merge("public");
		assert_eq!(modifier.target, Visibility::Public);
		modifier.merge("nothing");
		assert_eq!(modifier.target, Visibility::Public);
		Ok(())
	}

	#[test]
	fn no_visibility() {
		assert_eq!(Modifier::parse("+f"), Err(RuleError::NoVisibility("+f".to_owned())));
	}
}
