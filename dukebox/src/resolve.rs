//! Finding the class that actually declares a field or method a reference points to.
//!
//! A reference like `b.x:I` might point to a field declared in a super class or interface of `b`. Only the
//! declaring class has an entry in the [`Mapping`], so the resolver walks the class hierarchy to find it. A member
//! which has an explicit entry in the mapping is trusted to be declared where the mapping says, even if the
//! classes known don't show it.
//!
//! Resolution never fails: anything that can't be found is reported as unresolved, and the caller keeps the
//! reference as it is.
use indexmap::IndexSet;
use log::warn;
use duke::tree::class::{ClassFile, ClassName};
use duke::tree::method::{MethodDescriptor, MethodName};
use quill::mapping::Mapping;
use crate::inheritance::InheritanceIndex;

/// The declaration a method reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMethod {
	/// The class or interface declaring the method.
	pub owner: ClassName,
	/// The descriptor of the method, in the source naming scheme.
	pub desc: MethodDescriptor,
	/// The name the method gets in the target naming scheme.
	pub name: MethodName,
}

impl ResolvedMethod {
	fn new(owner: &str, desc: &str, name: impl Into<MethodName>) -> ResolvedMethod {
		ResolvedMethod {
			owner: owner.into(),
			desc: desc.into(),
			name: name.into(),
		}
	}
}

/// Accepts `result` over `current` if there's no current one, or if they get different names.
fn conflicts(current: Option<&ResolvedMethod>, result: Option<&ResolvedMethod>) -> bool {
	match (current, result) {
		(_, None) => false,
		(None, Some(_)) => true,
		(Some(current), Some(result)) => current.name != result.name,
	}
}

pub struct Resolver<'a> {
	index: &'a InheritanceIndex<'a>,
	mapping: &'a Mapping,
}

impl<'a> Resolver<'a> {
	pub fn new(index: &'a InheritanceIndex<'a>, mapping: &'a Mapping) -> Resolver<'a> {
		Resolver { index, mapping }
	}

	pub fn index(&self) -> &'a InheritanceIndex<'a> {
		self.index
	}

	/// Finds the class declaring the field `name` with `desc`, starting the search at `owner`.
	///
	/// The class itself is checked first, then all its interfaces (and their super interfaces) in declared order,
	/// then the super class.
	pub fn resolve_field(&self, owner: &str, name: &str, desc: &str) -> Option<ClassName> {
		self.resolve_field_inner(owner, name, desc, &mut IndexSet::new())
			.map(ClassName::from)
	}

	fn resolve_field_inner<'s>(&self, owner: &'s str, name: &str, desc: &str, path: &mut IndexSet<&'s str>) -> Option<&'s str>
	where
		'a: 's,
	{
		let class = self.index.get(owner)?;

		// an entry keeping the name doesn't stop the search
		if self.mapping.field_entry(owner, name).is_some_and(|new_name| new_name.as_str() != name) {
			return Some(owner);
		}
		if class.declares_field(name, desc) {
			return Some(owner);
		}

		if !path.insert(owner) {
			warn!("class {owner} extends or implements itself, giving up on resolving field {name}:{desc} there");
			return None;
		}

		let result = class.interfaces.iter()
			.find_map(|interface| self.resolve_field_inner(interface.as_str(), name, desc, path))
			.or_else(|| {
				class.super_class.as_ref()
					.and_then(|super_class| self.resolve_field_inner(super_class.as_str(), name, desc, path))
			});

		path.pop();
		result
	}

	/// Finds the declaration of the method `name` with `desc`, starting the search at `owner`.
	///
	/// If interfaces declare the method under a different new name than the class hierarchy does, the interface
	/// declaration wins, so that implementations keep overriding the interface method after renaming.
	pub fn resolve_method(&self, owner: &str, name: &str, desc: &str) -> Option<ResolvedMethod> {
		self.resolve_method_inner(owner, name, desc, &mut IndexSet::new())
	}

	fn explicit_entry(&self, owner: &str, name: &str, desc: &str) -> Option<ResolvedMethod> {
		self.mapping.method_entry(owner, name, desc)
			.filter(|new_name| *new_name != name)
			.map(|new_name| ResolvedMethod::new(owner, desc, new_name.clone()))
	}

	fn own_declaration(class: &ClassFile, name: &str, desc: &str) -> Option<ResolvedMethod> {
		class.declares_method(name, desc)
			.then(|| ResolvedMethod::new(class.name.as_str(), desc, name))
	}

	fn resolve_method_inner<'s>(&self, owner: &'s str, name: &str, desc: &str, path: &mut IndexSet<&'s str>) -> Option<ResolvedMethod>
	where
		'a: 's,
	{
		let class = self.index.get(owner)?;

		if let Some(resolved) = self.explicit_entry(owner, name, desc) {
			return Some(resolved);
		}

		if !path.insert(owner) {
			warn!("class {owner} extends or implements itself, giving up on resolving method {name}{desc} there");
			return None;
		}

		let result = if class.is_interface() {
			self.resolve_interface_method(class, name, desc, path)
		} else {
			self.resolve_class_method(class, name, desc, path)
		};

		path.pop();
		result
	}

	fn resolve_interface_method<'s>(&self, class: &'a ClassFile, name: &str, desc: &str, path: &mut IndexSet<&'s str>) -> Option<ResolvedMethod>
	where
		'a: 's,
	{
		let current = Self::own_declaration(class, name, desc);
		self.first_conflict(class, current.as_ref(), name, desc, path)
			.or(current)
	}

	/// Resolves the method in each interface of `class`, giving back the first result that [`conflicts`] with
	/// `current`.
	fn first_conflict<'s>(
		&self,
		class: &'a ClassFile,
		current: Option<&ResolvedMethod>,
		name: &str,
		desc: &str,
		path: &mut IndexSet<&'s str>,
	) -> Option<ResolvedMethod>
	where
		'a: 's,
	{
		for interface in &class.interfaces {
			let result = self.resolve_method_inner(interface.as_str(), name, desc, path);
			if conflicts(current, result.as_ref()) {
				return result;
			}
		}
		None
	}

	/// Gives the classes in the super class chain of `class`, starting with itself, as long as they're known.
	fn super_chain(&self, class: &'a ClassFile) -> Vec<&'a ClassFile> {
		let mut chain = vec![class];
		let mut seen = IndexSet::from([class.name.as_str()]);

		let mut current = class;
		while let Some(super_class) = &current.super_class {
			let Some(next) = self.index.get(super_class.as_str()) else {
				break;
			};
			if !seen.insert(next.name.as_str()) {
				warn!("class {} is its own super class", next.name);
				break;
			}
			chain.push(next);
			current = next;
		}

		chain
	}

	fn resolve_class_method<'s>(&self, class: &'a ClassFile, name: &str, desc: &str, path: &mut IndexSet<&'s str>) -> Option<ResolvedMethod>
	where
		'a: 's,
	{
		let chain = self.super_chain(class);

		// an explicit entry anywhere up the chain is taken right away, the first declaration is remembered
		let mut current = None;
		for &level in &chain {
			if let Some(resolved) = self.explicit_entry(level.name.as_str(), name, desc) {
				return Some(resolved);
			}
			if current.is_none() {
				current = Self::own_declaration(level, name, desc);
			}
		}

		for &level in &chain {
			if let Some(result) = self.first_conflict(level, current.as_ref(), name, desc, path) {
				return Some(result);
			}
		}

		// interfaces only implemented by subclasses may still declare the method
		for interface in self.interfaces_of_subclasses(class) {
			let result = self.explicit_entry(interface.name.as_str(), name, desc)
				.or_else(|| Self::own_declaration(interface, name, desc));
			if conflicts(current.as_ref(), result.as_ref()) {
				return result;
			}
		}

		current
	}

	/// Collects all interfaces implemented by any class extending `class`, including the interfaces these extend.
	fn interfaces_of_subclasses(&self, class: &'a ClassFile) -> Vec<&'a ClassFile> {
		let mut subclasses = IndexSet::new();
		self.collect_subclasses(class.name.as_str(), &mut subclasses);

		let mut interfaces = IndexSet::new();
		for subclass in subclasses {
			if let Some(subclass) = self.index.get(subclass) {
				self.collect_interfaces(subclass, &mut interfaces);
			}
		}

		interfaces.into_iter()
			.filter_map(|interface| self.index.get(interface))
			.collect()
	}

	fn collect_subclasses(&self, name: &str, into: &mut IndexSet<&'a str>) {
		for subclass in self.index.direct_subclasses(name) {
			if into.insert(subclass) {
				self.collect_subclasses(subclass, into);
			}
		}
	}

	fn collect_interfaces(&self, class: &'a ClassFile, into: &mut IndexSet<&'a str>) {
		for interface in &class.interfaces {
			if into.insert(interface.as_str()) {
				if let Some(interface) = self.index.get(interface.as_str()) {
					self.collect_interfaces(interface, into);
				}
			}
		}
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use duke::tree::access::ACC_INTERFACE;
	use duke::tree::class::{ClassAccess, ClassFile, ClassName};
	use duke::tree::field::{Field, FieldAccess};
	use duke::tree::method::{Method, MethodAccess};
	use quill::mapping::Mapping;
	use quill::scheme::{NamingScheme, SchemeKind, Side};
	use crate::inheritance::InheritanceIndex;
	use crate::resolve::{ResolvedMethod, Resolver};

	fn mapping() -> Mapping {
		Mapping::new(
			NamingScheme::new(SchemeKind::Srg, Side::Universal, "1.7.10"),
			NamingScheme::new(SchemeKind::Mcp, Side::Universal, "1.7.10"),
		)
	}

	fn class(name: &str, super_class: &str, interfaces: &[&str]) -> ClassFile {
		ClassFile::new(
			ClassAccess::default(),
			name.into(),
			Some(super_class.into()),
			interfaces.iter().map(|&x| x.into()).collect(),
		)
	}

	fn interface(name: &str, interfaces: &[&str]) -> ClassFile {
		let mut class = class(name, "java/lang/Object", interfaces);
		class.access = ClassAccess::from(ACC_INTERFACE);
		class
	}

	fn with_field(mut class: ClassFile, name: &str, desc: &str) -> ClassFile {
		class.fields.push(Field::new(FieldAccess::default(), name.into(), desc.into()));
		class
	}

	fn with_method(mut class: ClassFile, name: &str, desc: &str) -> ClassFile {
		class.methods.push(Method::new(MethodAccess::default(), name.into(), desc.into()));
		class
	}

	#[test]
	fn field_in_super_class() {
		let classes = [
			with_field(class("A", "java/lang/Object", &[]), "x", "I"),
			class("B", "A", &[]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mapping = mapping();
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_field("B", "x", "I"), Some(ClassName::from("A")));
		assert_eq!(resolver.resolve_field("B", "x", "J"), None);
		assert_eq!(resolver.resolve_field("Unknown", "x", "I"), None);
	}

	#[test]
	fn field_in_interface_before_super_class() {
		let classes = [
			with_field(class("A", "java/lang/Object", &[]), "X", "I"),
			with_field(interface("I", &[]), "X", "I"),
			class("B", "A", &["I"]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mapping = mapping();
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_field("B", "X", "I"), Some(ClassName::from("I")));
	}

	#[test]
	fn field_explicit_entry_wins() {
		let classes = [
			with_field(class("A", "java/lang/Object", &[]), "x", "I"),
			class("B", "A", &[]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mut mapping = mapping();
		mapping.set_field("B", "x", "renamed");
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_field("B", "x", "I"), Some(ClassName::from("B")));
	}

	#[test]
	fn field_entry_keeping_the_name_is_passed() {
		let classes = [
			with_field(class("A", "java/lang/Object", &[]), "x", "I"),
			class("B", "A", &[]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mut mapping = mapping();
		mapping.set_field("A", "x", "field_1");
		mapping.set_field("B", "x", "x");
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_field("B", "x", "I"), Some(ClassName::from("A")));
	}

	#[test]
	fn method_in_super_class() {
		let classes = [
			with_method(class("A", "java/lang/Object", &[]), "m", "()V"),
			class("B", "A", &[]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mapping = mapping();
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_method("B", "m", "()V"), Some(ResolvedMethod::new("A", "()V", "m")));
		assert_eq!(resolver.resolve_method("B", "n", "()V"), None);
	}

	#[test]
	fn explicit_entry_up_the_chain() {
		let classes = [
			class("A", "java/lang/Object", &[]),
			with_method(class("B", "A", &[]), "m", "()V"),
			class("C", "B", &[]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mut mapping = mapping();
		mapping.set_method("A", "m", "()V", "func_1_m");
		let resolver = Resolver::new(&index, &mapping);

		// the declaration in B is found first, but the entry for A is still taken
		assert_eq!(resolver.resolve_method("C", "m", "()V"), Some(ResolvedMethod::new("A", "()V", "func_1_m")));
	}

	#[test]
	fn interface_conflicts() {
		let classes = [
			with_method(interface("I1", &[]), "m", "()V"),
			with_method(interface("I2", &[]), "m", "()V"),
			with_method(class("C", "java/lang/Object", &["I1", "I2"]), "m", "()V"),
		];
		let index = InheritanceIndex::from_classes(&classes);

		// nothing renamed: no conflict, the own declaration is kept
		let none = mapping();
		let resolver = Resolver::new(&index, &none);
		assert_eq!(resolver.resolve_method("C", "m", "()V"), Some(ResolvedMethod::new("C", "()V", "m")));

		// I1 keeps the name, so only I2 conflicts
		let mut second = mapping();
		second.set_method("I2", "m", "()V", "tick");
		let resolver = Resolver::new(&index, &second);
		assert_eq!(resolver.resolve_method("C", "m", "()V"), Some(ResolvedMethod::new("I2", "()V", "tick")));

		// both renamed the same way: the first one differing from the own declaration is taken
		let mut both = mapping();
		both.set_method("I1", "m", "()V", "run");
		both.set_method("I2", "m", "()V", "run");
		let resolver = Resolver::new(&index, &both);
		assert_eq!(resolver.resolve_method("C", "m", "()V"), Some(ResolvedMethod::new("I1", "()V", "run")));
	}

	#[test]
	fn interface_without_own_declaration_takes_first_result() {
		let classes = [
			with_method(interface("I1", &[]), "m", "()V"),
			with_method(interface("I2", &[]), "m", "()V"),
			interface("J", &["I1", "I2"]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mut mapping = mapping();
		mapping.set_method("I2", "m", "()V", "tick");
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_method("J", "m", "()V"), Some(ResolvedMethod::new("I1", "()V", "m")));
	}

	#[test]
	fn interface_overrides_own_declaration_with_other_name() {
		let classes = [
			with_method(interface("I", &[]), "m", "()V"),
			with_method(class("C", "java/lang/Object", &["I"]), "m", "()V"),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mut mapping = mapping();
		mapping.set_method("I", "m", "()V", "run");
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_method("C", "m", "()V"), Some(ResolvedMethod::new("I", "()V", "run")));
	}

	#[test]
	fn interface_of_subclass() {
		let classes = [
			class("A", "java/lang/Object", &[]),
			class("B", "A", &["I"]),
			with_method(interface("I", &[]), "m", "()V"),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mut mapping = mapping();
		mapping.set_method("I", "m", "()V", "run");
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_method("A", "m", "()V"), Some(ResolvedMethod::new("I", "()V", "run")));
	}

	#[test]
	fn cycles_are_unresolved() {
		let classes = [
			class("A", "B", &[]),
			class("B", "A", &[]),
			interface("I", &["J"]),
			interface("J", &["I"]),
		];
		let index = InheritanceIndex::from_classes(&classes);
		let mapping = mapping();
		let resolver = Resolver::new(&index, &mapping);

		assert_eq!(resolver.resolve_field("A", "x", "I"), None);
		assert_eq!(resolver.resolve_method("A", "m", "()V"), None);
		assert_eq!(resolver.resolve_method("I", "m", "()V"), None);
	}
}
