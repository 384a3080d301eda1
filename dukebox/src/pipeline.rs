//! Running everything needed to bring a collection of classes into another naming scheme.
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use quill::mapping::Mapping;
use quill::scheme::NamingScheme;
use crate::access::AccessRules;
use crate::collection::ClassCollection;
use crate::progress::ProgressListener;
use crate::remap::remap;

/// Something giving out the mapping between two naming schemes.
pub trait MappingProvider {
	fn mapping(&mut self, from: &NamingScheme, to: &NamingScheme) -> Result<Mapping>;
}

impl<F> MappingProvider for F where F: FnMut(&NamingScheme, &NamingScheme) -> Result<Mapping> {
	fn mapping(&mut self, from: &NamingScheme, to: &NamingScheme) -> Result<Mapping> {
		self(from, to)
	}
}

/// Gives out a mapping in the list going in the wanted direction, or else the inverse of one going the other way.
impl MappingProvider for Vec<Mapping> {
	fn mapping(&mut self, from: &NamingScheme, to: &NamingScheme) -> Result<Mapping> {
		if let Some(mapping) = self.iter().find(|m| m.from_scheme() == from && m.to_scheme() == to) {
			return Ok(mapping.clone());
		}
		if let Some(mapping) = self.iter().find(|m| m.from_scheme() == to && m.to_scheme() == from) {
			return mapping.inverse();
		}
		bail!("no mapping from {from} to {to} known")
	}
}

/// A single remapping job: what to remap, what else to know about, and where to end up.
#[derive(Debug, Clone)]
pub struct RemapRun {
	pub input: ClassCollection,
	/// Classes that aren't remapped, but are needed to resolve inherited members. These may use any naming scheme.
	pub references: Vec<ClassCollection>,
	/// Rules applied to the input before remapping it.
	pub access_rules: Option<AccessRules>,
	pub target: NamingScheme,
}

impl RemapRun {
	pub fn new(input: ClassCollection, target: NamingScheme) -> RemapRun {
		RemapRun { input, references: Vec::new(), access_rules: None, target }
	}

	pub fn with_reference(mut self, reference: ClassCollection) -> RemapRun {
		self.references.push(reference);
		self
	}

	pub fn with_access_rules(mut self, access_rules: AccessRules) -> RemapRun {
		self.access_rules = Some(access_rules);
		self
	}

	/// Runs the job.
	///
	/// References not in the naming scheme of the input are remapped into it first. Then the access rules are applied
	/// to the input, and the result is remapped into the target naming scheme, unless it's already in it.
	///
	/// Only the last remap reports to `progress`. If that remap is skipped, `progress` is never called.
	pub fn run(&self, provider: &mut impl MappingProvider, progress: impl ProgressListener) -> Result<ClassCollection> {
		let scheme = self.input.scheme();

		let mut references = Vec::with_capacity(self.references.len());
		for reference in &self.references {
			if reference.scheme() == scheme {
				references.push(reference.clone());
			} else {
				let mapping = provider.mapping(reference.scheme(), scheme)?;
				let remapped = remap(reference, &mapping, &[], ())
					.with_context(|| anyhow!("failed to bring reference classes from {} to {scheme}", reference.scheme()))?;
				references.push(remapped);
			}
		}

		let transformed = match &self.access_rules {
			Some(rules) => rules.apply(&self.input, &references, ())
				.context("failed to apply access rules")?,
			None => self.input.clone(),
		};

		if transformed.scheme() == &self.target {
			info!("classes already are in {}, not remapping them", self.target);
			return Ok(transformed);
		}

		let mapping = provider.mapping(transformed.scheme(), &self.target)?;
		remap(&transformed, &mapping, &references, progress)
	}
}
