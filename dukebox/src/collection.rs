use anyhow::{bail, Result};
use indexmap::{IndexMap, IndexSet};
use duke::tree::class::{ClassFile, ClassName};
use quill::scheme::NamingScheme;

/// An ordered set of classes, all with names in the same naming scheme, together with the other files that came
/// with them.
///
/// The manifest and the extra files are never looked at, they're just carried along by every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCollection {
	scheme: NamingScheme,
	classes: Vec<ClassFile>,
	manifest: Option<Vec<u8>>,
	extra_files: IndexMap<String, Vec<u8>>,
}

impl ClassCollection {
	/// Creates a collection, failing if two classes have the same name.
	pub fn new(scheme: NamingScheme, classes: Vec<ClassFile>) -> Result<ClassCollection> {
		let mut names = IndexSet::new();
		for class in &classes {
			if !names.insert(&class.name) {
				bail!("class {} appears twice in a collection using naming scheme {scheme}", class.name);
			}
		}

		Ok(ClassCollection {
			scheme,
			classes,
			manifest: None,
			extra_files: IndexMap::new(),
		})
	}

	pub fn with_manifest(mut self, manifest: Vec<u8>) -> ClassCollection {
		self.manifest = Some(manifest);
		self
	}

	pub fn with_extra_file(mut self, path: impl Into<String>, contents: Vec<u8>) -> ClassCollection {
		self.extra_files.insert(path.into(), contents);
		self
	}

	pub fn scheme(&self) -> &NamingScheme {
		&self.scheme
	}

	pub fn classes(&self) -> &[ClassFile] {
		&self.classes
	}

	pub fn manifest(&self) -> Option<&[u8]> {
		self.manifest.as_deref()
	}

	pub fn extra_files(&self) -> &IndexMap<String, Vec<u8>> {
		&self.extra_files
	}

	pub fn get(&self, name: &str) -> Option<&ClassFile> {
		self.classes.iter().find(|class| class.name == name)
	}

	/// Gives all classes, indexed by their name.
	pub fn class_map(&self) -> IndexMap<&ClassName, &ClassFile> {
		self.classes.iter()
			.map(|class| (&class.name, class))
			.collect()
	}

	/// Creates a copy with all classes of this collection, tagged with another naming scheme.
	pub fn clone_with_scheme(&self, scheme: NamingScheme) -> ClassCollection {
		ClassCollection {
			scheme,
			classes: self.classes.clone(),
			manifest: self.manifest.clone(),
			extra_files: self.extra_files.clone(),
		}
	}

	/// Creates a collection with the manifest and extra files of this one, but other classes.
	///
	/// The classes must have unique names, which holds for anything created by renaming each class of a collection.
	pub(crate) fn replace_classes(&self, scheme: NamingScheme, classes: Vec<ClassFile>) -> Result<ClassCollection> {
		let mut collection = ClassCollection::new(scheme, classes)?;
		collection.manifest = self.manifest.clone();
		collection.extra_files = self.extra_files.clone();
		Ok(collection)
	}
}
