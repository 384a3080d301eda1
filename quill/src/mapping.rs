//! The translation table between two naming schemes.
//!
//! A [`Mapping`] answers "what is the name of X in the target scheme?" for classes, fields and methods. Member
//! lookups are exact: they're keyed by the class that declares the member, and finding that class is up to the
//! caller. Anything that isn't known to the mapping keeps its name.
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use log::debug;
use duke::tree::class::{outer_class_name, ClassName};
use duke::tree::field::{FieldDescriptor, FieldName};
use duke::tree::method::{MethodDescriptor, MethodName};
use crate::descriptor;
use crate::scheme::NamingScheme;

/// A method name together with its descriptor, as stored in a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameDesc(MethodName, MethodDescriptor);

/// Borrowed lookup key for [`NameDesc`], hashing the same way.
#[derive(Debug)]
struct NameDescReq<'a>(&'a str, &'a str);

impl Hash for NameDescReq<'_> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.hash(state);
		self.1.hash(state);
	}
}

impl indexmap::Equivalent<NameDesc> for NameDescReq<'_> {
	fn equivalent(&self, key: &NameDesc) -> bool {
		key.0 == self.0 && key.1 == self.1
	}
}

/// The renamed members of a single class.
#[derive(Debug, Clone, Default)]
struct MemberTable {
	fields: IndexMap<FieldName, FieldName>,
	methods: IndexMap<NameDesc, MethodName>,
	exceptions: IndexMap<NameDesc, Vec<ClassName>>,
}

/// Translates names from the [`from_scheme`][Mapping::from_scheme] to the [`to_scheme`][Mapping::to_scheme] naming scheme.
///
/// Class names are looked up in this order:
/// - array and `L...;` wrapped names are unwrapped, primitive type letters are kept,
/// - an explicit entry,
/// - the longest matching package prefix rule,
/// - names without a package get the default package put in front,
/// - nested classes (`Outer$Inner`, `Outer$1`) take the name of their renamed outer class.
///
/// Names found by the last rule are remembered, so that a later lookup of the same name (or of a class
/// nested inside of it) is a plain table lookup. That cache is the only state that changes on lookups, and is
/// why a mapping can't be shared between threads.
#[derive(Debug, Clone)]
pub struct Mapping {
	from: NamingScheme,
	to: NamingScheme,
	classes: IndexMap<ClassName, ClassName>,
	members: IndexMap<ClassName, MemberTable>,
	prefixes: IndexMap<String, String>,
	default_package: String,
	derived: RefCell<IndexMap<ClassName, ClassName>>,
}

impl Mapping {
	pub fn new(from: NamingScheme, to: NamingScheme) -> Mapping {
		Mapping {
			from,
			to,
			classes: IndexMap::new(),
			members: IndexMap::new(),
			prefixes: IndexMap::new(),
			default_package: String::new(),
			derived: RefCell::new(IndexMap::new()),
		}
	}

	pub fn from_scheme(&self) -> &NamingScheme {
		&self.from
	}

	pub fn to_scheme(&self) -> &NamingScheme {
		&self.to
	}

	pub fn set_class(&mut self, from: impl Into<ClassName>, to: impl Into<ClassName>) {
		self.classes.insert(from.into(), to.into());
		self.derived.get_mut().clear();
	}

	/// Renames the field `name` declared in `owner`. Fields are identified by name only.
	pub fn set_field(&mut self, owner: impl Into<ClassName>, name: impl Into<FieldName>, to: impl Into<FieldName>) {
		self.members.entry(owner.into()).or_default()
			.fields.insert(name.into(), to.into());
	}

	/// Renames the method `name` with descriptor `desc` declared in `owner`. The descriptor is the one in the source
	/// naming scheme.
	pub fn set_method(
		&mut self,
		owner: impl Into<ClassName>,
		name: impl Into<MethodName>,
		desc: impl Into<MethodDescriptor>,
		to: impl Into<MethodName>,
	) {
		self.members.entry(owner.into()).or_default()
			.methods.insert(NameDesc(name.into(), desc.into()), to.into());
	}

	/// Declares the exceptions a method throws, in addition to the ones the class file already declares.
	pub fn set_exceptions(
		&mut self,
		owner: impl Into<ClassName>,
		name: impl Into<MethodName>,
		desc: impl Into<MethodDescriptor>,
		exceptions: Vec<ClassName>,
	) {
		self.members.entry(owner.into()).or_default()
			.exceptions.insert(NameDesc(name.into(), desc.into()), exceptions);
	}

	/// Adds a rule replacing the start `from` of class names with `to`, for class names without an explicit entry.
	///
	/// If multiple rules match a name, the one with the longest `from` wins.
	pub fn add_prefix(&mut self, from: impl Into<String>, to: impl Into<String>) {
		self.prefixes.insert(from.into(), to.into());
		self.derived.get_mut().clear();
	}

	/// Sets the string put in front of class names without a package, like `net/minecraft/src/`.
	pub fn set_default_package(&mut self, package: impl Into<String>) {
		self.default_package = package.into();
		self.derived.get_mut().clear();
	}

	fn class_entry(&self, name: &str) -> Option<ClassName> {
		self.classes.get(name).cloned()
			.or_else(|| self.derived.borrow().get(name).cloned())
	}

	/// Translates a class name. This never fails, names without a translation are given back as is.
	pub fn map_class(&self, class: &ClassName) -> ClassName {
		self.map_class_name(class.as_str()).into()
	}

	/// Same as [`Mapping::map_class`], for the name in any form a class name might appear in: internal names
	/// (`a/b/C`), array names (`[La/b/C;`) or object type descriptors (`La/b/C;`).
	pub fn map_class_name(&self, name: &str) -> String {
		if let Some(element) = name.strip_prefix('[') {
			return format!("[{}", self.map_class_name(element));
		}
		if let Some(inner) = name.strip_prefix('L').and_then(|x| x.strip_suffix(';')) {
			return format!("L{};", self.map_class_name(inner));
		}
		if matches!(name, "D" | "Z" | "B" | "C" | "S" | "I" | "J" | "F") {
			return name.to_owned();
		}

		if let Some(entry) = self.class_entry(name) {
			return entry.into_inner();
		}

		let prefix = self.prefixes.iter()
			.filter(|(from, _)| name.starts_with(from.as_str()))
			.max_by_key(|(from, _)| from.len());
		if let Some((from, to)) = prefix {
			return format!("{to}{}", &name[from.len()..]);
		}

		if !name.contains('/') {
			return format!("{}{name}", self.default_package);
		}

		self.derive_nested(name)
			.unwrap_or_else(|| name.to_owned())
	}

	/// Finds the name of a nested class through its renamed outer class, remembering any result that differs.
	fn derive_nested(&self, name: &str) -> Option<String> {
		if let Some((outer, index)) = anonymous_class_parts(name) {
			if let Some(outer) = self.class_entry(outer) {
				let mapped = format!("{outer}${index}");
				if mapped != name {
					return Some(self.remember(name, mapped));
				}
			}
		}

		if is_nested_class(name) {
			let mut outer = name;
			while let Some(next) = outer_class_name(outer) {
				outer = next;
				if let Some(mapped_outer) = self.class_entry(outer) {
					let mapped = format!("{mapped_outer}{}", &name[outer.len()..]);
					if mapped != name {
						return Some(self.remember(name, mapped));
					}
				}
			}
		}

		None
	}

	fn remember(&self, name: &str, mapped: String) -> String {
		debug!("derived mapping {name} -> {mapped}");
		self.derived.borrow_mut().insert(name.into(), mapped.as_str().into());
		mapped
	}

	fn member_table(&self, owner: &str) -> Option<&MemberTable> {
		self.members.get(owner)
	}

	/// Gives back the explicit new name of a field, if there's one.
	pub fn field_entry(&self, owner: &str, name: &str) -> Option<&FieldName> {
		self.member_table(owner)?.fields.get(name)
	}

	/// Translates the name of the field `name` declared in `owner`, keeping the name if there's no entry for it.
	pub fn map_field_name(&self, owner: &str, name: &str) -> FieldName {
		self.field_entry(owner, name)
			.cloned()
			.unwrap_or_else(|| name.into())
	}

	/// Gives back the explicit new name of a method, if there's one.
	pub fn method_entry(&self, owner: &str, name: &str, desc: &str) -> Option<&MethodName> {
		self.member_table(owner)?.methods.get(&NameDescReq(name, desc))
	}

	/// Translates the name of the method `name` with `desc` declared in `owner`, keeping the name if there's no
	/// entry for it.
	pub fn map_method_name(&self, owner: &str, name: &str, desc: &str) -> MethodName {
		self.method_entry(owner, name, desc)
			.cloned()
			.unwrap_or_else(|| name.into())
	}

	/// Gives back the exceptions declared for a method in the mapping, these are in the source naming scheme.
	pub fn exceptions(&self, owner: &str, name: &str, desc: &str) -> &[ClassName] {
		self.member_table(owner)
			.and_then(|table| table.exceptions.get(&NameDescReq(name, desc)))
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Rewrites the class names in a descriptor or signature.
	///
	/// See [`descriptor::map_types`] for the exact grammar.
	pub fn map_types(&self, desc: &str, generic: bool, method: bool) -> Result<String> {
		descriptor::map_types(desc, generic, method, |name| self.map_class_name(name))
			.map_err(Into::into)
	}

	/// Rewrites a type descriptor, failing on empty and malformed ones.
	pub fn map_type_descriptor(&self, desc: &str) -> Result<String> {
		descriptor::map_type_descriptor(desc, |name| self.map_class_name(name))
			.map_err(Into::into)
	}

	/// Rewrites a method descriptor, failing on anything that doesn't look like `(...)...`.
	pub fn map_method_descriptor(&self, desc: &str) -> Result<String> {
		descriptor::map_method_descriptor(desc, |name| self.map_class_name(name))
			.map_err(Into::into)
	}

	pub fn map_field_desc(&self, desc: &FieldDescriptor) -> Result<FieldDescriptor> {
		self.map_type_descriptor(desc.as_str()).map(Into::into)
	}

	pub fn map_method_desc(&self, desc: &MethodDescriptor) -> Result<MethodDescriptor> {
		self.map_method_descriptor(desc.as_str()).map(Into::into)
	}

	/// Creates the mapping going the other way around, from [`to_scheme`][Mapping::to_scheme] to [`from_scheme`][Mapping::from_scheme].
	///
	/// Explicit class, field and method entries are turned around, with owners and descriptors translated into the
	/// target scheme. Prefix rules, the default package and exceptions only make sense in one direction and are
	/// not carried over.
	pub fn inverse(&self) -> Result<Mapping> {
		let mut inverse = Mapping::new(self.to.clone(), self.from.clone());

		for (from, to) in &self.classes {
			inverse.set_class(to.clone(), from.clone());
		}

		for (owner, table) in &self.members {
			let mapped_owner = self.map_class(owner);

			for (name, to) in &table.fields {
				inverse.set_field(mapped_owner.clone(), to.clone(), name.clone());
			}
			for (NameDesc(name, desc), to) in &table.methods {
				let mapped_desc = self.map_method_desc(desc)
					.with_context(|| anyhow!("while inverting the entry for {owner}.{name}{desc}"))?;
				inverse.set_method(mapped_owner.clone(), to.clone(), mapped_desc, name.clone());
			}
		}

		Ok(inverse)
	}
}

fn is_class_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_' || c == '/'
}

/// Splits `outer$123` into `outer` and `123`, if the name has exactly that form.
fn anonymous_class_parts(name: &str) -> Option<(&str, u32)> {
	let (outer, index) = name.split_once('$')?;
	if outer.is_empty() || !outer.chars().all(is_class_char) {
		return None;
	}
	if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
		return None;
	}
	Some((outer, index.parse().ok()?))
}

/// Checks if a name has the form `outer$a$b...`, with at least one nested part.
fn is_nested_class(name: &str) -> bool {
	let mut parts = name.split('$');
	let outer_ok = parts.next()
		.is_some_and(|outer| !outer.is_empty() && outer.chars().all(is_class_char));

	let mut nested = 0;
	let nested_ok = parts.all(|part| {
		nested += 1;
		!part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric())
	});

	outer_ok && nested_ok && nested > 0
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use duke::tree::class::ClassName;
	use crate::mapping::{anonymous_class_parts, is_nested_class, Mapping};
	use crate::scheme::{NamingScheme, SchemeKind, Side};

	fn mapping() -> Mapping {
		Mapping::new(
			NamingScheme::new(SchemeKind::Obf, Side::Client, "1.7.10"),
			NamingScheme::new(SchemeKind::Srg, Side::Client, "1.7.10"),
		)
	}

	#[test]
	fn name_shapes() {
		assert_eq!(anonymous_class_parts("a$1"), Some(("a", 1)));
		assert_eq!(anonymous_class_parts("a/b$12"), Some(("a/b", 12)));
		assert_eq!(anonymous_class_parts("a$b"), None);
		assert_eq!(anonymous_class_parts("a$1$2"), None);
		assert_eq!(anonymous_class_parts("$1"), None);

		assert!(is_nested_class("a$b"));
		assert!(is_nested_class("a/b$c$1"));
		assert!(!is_nested_class("a/b"));
		assert!(!is_nested_class("a$"));
		assert!(!is_nested_class("a$b/c"));
	}

	#[test]
	fn explicit_and_identity() {
		let mut m = mapping();
		m.set_class("a", "net/minecraft/Foo");
		assert_eq!(m.map_class_name("a"), "net/minecraft/Foo");
		assert_eq!(m.map_class_name("java/lang/String"), "java/lang/String");
		assert_eq!(m.map_class_name("[[La;"), "[[Lnet/minecraft/Foo;");
		assert_eq!(m.map_class_name("La;"), "Lnet/minecraft/Foo;");
		assert_eq!(m.map_class_name("I"), "I");
		assert_eq!(m.map_class_name("[I"), "[I");
	}

	#[test]
	fn prefixes_longest_wins() {
		let mut m = mapping();
		m.add_prefix("a/", "x/");
		m.add_prefix("a/b/", "y/");
		assert_eq!(m.map_class_name("a/b/C"), "y/C");
		assert_eq!(m.map_class_name("a/C"), "x/C");
		assert_eq!(m.map_class_name("c/C"), "c/C");
	}

	#[test]
	fn default_package() {
		let mut m = mapping();
		m.set_default_package("net/minecraft/src/");
		assert_eq!(m.map_class_name("Foo"), "net/minecraft/src/Foo");
		assert_eq!(m.map_class_name("a/Foo"), "a/Foo");
	}

	#[test]
	fn nested_classes_follow_outer() {
		let mut m = mapping();
		m.set_class("a/b", "x/Outer");
		assert_eq!(m.map_class_name("a/b$1"), "x/Outer$1");
		assert_eq!(m.map_class_name("a/b$c"), "x/Outer$c");
		assert_eq!(m.map_class_name("a/b$c$2"), "x/Outer$c$2");

		// an explicit entry for the inner class is used by the classes nested in it
		m.set_class("a/b$c", "x/Outer$Inner");
		assert_eq!(m.map_class_name("a/b$c$2"), "x/Outer$Inner$2");
		assert_eq!(m.map_class_name("a/b$c$d"), "x/Outer$Inner$d");

		// and the derived names are used as well
		assert_eq!(m.map_class_name("a/b$e"), "x/Outer$e");
		assert_eq!(m.map_class_name("a/b$e$f"), "x/Outer$e$f");

		assert_eq!(m.map_class_name("q/r$1"), "q/r$1");
	}

	#[test]
	fn members() {
		let mut m = mapping();
		m.set_field("a", "b", "field_1_b");
		m.set_method("a", "c", "(La;)V", "func_2_c");
		m.set_exceptions("a", "c", "(La;)V", vec!["d".into()]);

		assert_eq!(m.map_field_name("a", "b"), "field_1_b");
		assert_eq!(m.map_field_name("a", "x"), "x");
		assert_eq!(m.map_field_name("z", "b"), "b");
		assert_eq!(m.map_method_name("a", "c", "(La;)V"), "func_2_c");
		assert_eq!(m.map_method_name("a", "c", "()V"), "c");
		assert_eq!(m.exceptions("a", "c", "(La;)V"), [ClassName::from("d")]);
		assert!(m.exceptions("a", "c", "()V").is_empty());
	}

	#[test]
	fn descriptors() -> Result<()> {
		let mut m = mapping();
		m.set_class("a", "com/x/Obj");
		assert_eq!(m.map_method_descriptor("(ILa;)Z")?, "(ILcom/x/Obj;)Z");
		assert_eq!(m.map_type_descriptor("[La;")?, "[Lcom/x/Obj;");
		assert_eq!(m.map_types("Ljava/util/List<La;>;", true, false)?, "Ljava/util/List<Lcom/x/Obj;>;");
		assert!(m.map_method_descriptor("I").is_err());
		assert!(m.map_type_descriptor("").is_err());
		Ok(())
	}

	#[test]
	fn inverse() -> Result<()> {
		let mut m = mapping();
		m.set_class("a", "net/Foo");
		m.set_field("a", "b", "size");
		m.set_method("a", "c", "(La;)La;", "copy");

		let inv = m.inverse()?;
		assert_eq!(inv.from_scheme(), m.to_scheme());
		assert_eq!(inv.to_scheme(), m.from_scheme());
		assert_eq!(inv.map_class_name("net/Foo"), "a");
		assert_eq!(inv.map_field_name("net/Foo", "size"), "b");
		assert_eq!(inv.map_method_name("net/Foo", "copy", "(Lnet/Foo;)Lnet/Foo;"), "c");
		assert_eq!(inv.map_method_descriptor("(Lnet/Foo;)Lnet/Foo;")?, "(La;)La;");
		Ok(())
	}
}
