//! Knowledge about which class extends or implements which, built for a single operation.
use indexmap::{IndexMap, IndexSet};
use duke::tree::class::{ClassFile, ClassName};
use crate::collection::ClassCollection;

/// All classes an operation may look at, by name, together with the inverse of the "extends" relation.
///
/// The inverse relation records, for each class, the non-interface classes extending it, and for each interface,
/// the interfaces extending it. Classes extending `java/lang/Object` directly are left out, as every class does.
/// A class implementing an interface is not recorded for that interface.
#[derive(Debug)]
pub struct InheritanceIndex<'a> {
	classes: IndexMap<&'a str, &'a ClassFile>,
	subclasses: IndexMap<&'a str, IndexSet<&'a str>>,
}

impl<'a> InheritanceIndex<'a> {
	/// Builds the index from the reference collections and the collection being worked on.
	///
	/// If a class is in multiple collections, the one seen last wins, so that `input` always has priority.
	pub fn new(input: &'a ClassCollection, references: &'a [ClassCollection]) -> InheritanceIndex<'a> {
		InheritanceIndex::from_classes(
			references.iter()
				.chain(std::iter::once(input))
				.flat_map(|collection| collection.classes())
		)
	}

	pub fn from_classes(classes: impl IntoIterator<Item=&'a ClassFile>) -> InheritanceIndex<'a> {
		let classes: IndexMap<&str, &ClassFile> = classes.into_iter()
			.map(|class| (class.name.as_str(), class))
			.collect();

		let mut subclasses: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
		for class in classes.values() {
			if class.is_interface() {
				for super_interface in &class.interfaces {
					subclasses.entry(super_interface.as_str()).or_default()
						.insert(class.name.as_str());
				}
			} else if let Some(super_class) = &class.super_class {
				if !super_class.is_java_lang_object() {
					subclasses.entry(super_class.as_str()).or_default()
						.insert(class.name.as_str());
				}
			}
		}

		InheritanceIndex { classes, subclasses }
	}

	pub fn get(&self, name: &str) -> Option<&'a ClassFile> {
		self.classes.get(name).copied()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.classes.contains_key(name)
	}

	pub fn super_class(&self, name: &str) -> Option<&'a ClassName> {
		self.get(name)?.super_class.as_ref()
	}

	/// Gives the classes (or interfaces for an interface) directly extending the given one.
	pub fn direct_subclasses(&self, name: &str) -> impl Iterator<Item=&'a str> + '_ {
		self.subclasses.get(name)
			.into_iter()
			.flat_map(|set| set.iter().copied())
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}
}
