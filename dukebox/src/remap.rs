//! Renaming every symbol of a collection of classes into another naming scheme.
//!
//! Each reference to a field or method is first resolved to the class declaring it, as only that class has the
//! entry in the [`Mapping`]. Class names are looked up directly.
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexSet;
use log::{info, trace};
use thiserror::Error;
use duke::tree::annotation::Annotation;
use duke::tree::class::{ClassFile, ClassName, ClassSignature, EnclosingMethod, InnerClass};
use duke::tree::field::{Field, FieldDescriptor, FieldRef, FieldSignature};
use duke::tree::method::{Method, MethodDescriptor, MethodName, MethodNameAndDesc, MethodRef, MethodSignature};
use duke::tree::method::code::{Code, Exception, Frame, Handle, Instruction, InvokeDynamic, Loadable, Lv, VerificationType};
use quill::descriptor::return_class;
use quill::mapping::Mapping;
use quill::scheme::NamingScheme;
use crate::collection::ClassCollection;
use crate::inheritance::InheritanceIndex;
use crate::progress::ProgressListener;
use crate::resolve::Resolver;

/// A collection was given to an operation on a mapping for another naming scheme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeMismatch {
	#[error("input classes use naming scheme {found}, but the mapping is from {expected}")]
	Input {
		found: NamingScheme,
		expected: NamingScheme,
	},
	#[error("reference classes use naming scheme {found}, but the mapping is from {expected}")]
	Reference {
		found: NamingScheme,
		expected: NamingScheme,
	},
}

/// Renames all classes, fields and methods of `input` using `mapping`.
///
/// The `references` are used to resolve members inherited from classes that aren't part of `input`. Both `input`
/// and all `references` must be in the naming scheme the mapping is from. The result is a new collection in the
/// naming scheme the mapping goes to.
///
/// Members that can't be resolved are looked up with the class the reference names. Any malformed descriptor fails
/// the whole operation.
pub fn remap(
	input: &ClassCollection,
	mapping: &Mapping,
	references: &[ClassCollection],
	mut progress: impl ProgressListener,
) -> Result<ClassCollection> {
	if input.scheme() != mapping.from_scheme() {
		bail!(SchemeMismatch::Input {
			found: input.scheme().clone(),
			expected: mapping.from_scheme().clone(),
		});
	}
	for reference in references {
		if reference.scheme() != mapping.from_scheme() {
			bail!(SchemeMismatch::Reference {
				found: reference.scheme().clone(),
				expected: mapping.from_scheme().clone(),
			});
		}
	}

	let index = InheritanceIndex::new(input, references);
	info!(
		"remapping {} classes from {} to {}, knowing {} classes",
		input.classes().len(), mapping.from_scheme(), mapping.to_scheme(), index.len()
	);

	let remapper = Remapper {
		mapping,
		resolver: Resolver::new(&index, mapping),
	};

	progress.set_max(input.classes().len());

	let mut classes = Vec::with_capacity(input.classes().len());
	for (i, class) in input.classes().iter().enumerate() {
		progress.set(i);

		let remapped = remapper.remap_class(class.clone())
			.with_context(|| anyhow!("while remapping class {}", class.name))?;
		classes.push(remapped);
	}

	let output = input.replace_classes(mapping.to_scheme().clone(), classes)?;
	info!("remapped {} classes to {}", output.classes().len(), output.scheme());
	Ok(output)
}

struct Remapper<'a> {
	mapping: &'a Mapping,
	resolver: Resolver<'a>,
}

impl Remapper<'_> {
	/// Gives the class declaring a field, or the class of the reference if it can't be found.
	fn field_owner(&self, owner: &str, name: &str, desc: &str) -> ClassName {
		self.resolver.resolve_field(owner, name, desc)
			.unwrap_or_else(|| {
				trace!("unresolved field reference {owner}.{name}:{desc}");
				owner.into()
			})
	}

	/// Gives the new name of a method, together with the descriptor it's declared with.
	fn method_name(&self, owner: &str, name: &str, desc: &str) -> (MethodName, MethodDescriptor) {
		match self.resolver.resolve_method(owner, name, desc) {
			Some(resolved) => (self.mapping.map_method_name(resolved.owner.as_str(), name, resolved.desc.as_str()), resolved.desc),
			None => {
				trace!("unresolved method reference {owner}.{name}{desc}");
				(self.mapping.map_method_name(owner, name, desc), desc.into())
			},
		}
	}

	/// Gives the new name of a dynamic call site.
	///
	/// The name of the call site is the one of the method the returned object implements, so it's renamed like
	/// that method, if the returned class is known and there's a bootstrap argument describing the method.
	///
	/// Known means anywhere in the index, so functional interfaces only present in the references count too,
	/// not just the classes being remapped.
	fn call_site_name(&self, call_site: &InvokeDynamic) -> MethodName {
		let functional_class = return_class(call_site.descriptor.as_str())
			.filter(|class| self.resolver.index().contains(class));
		let functional_desc = call_site.arguments.iter()
			.find_map(|argument| match argument {
				Loadable::MethodType(desc) => Some(desc),
				_ => None,
			});

		match (functional_class, functional_desc) {
			(Some(class), Some(desc)) => self.method_name(class, call_site.name.as_str(), desc.as_str()).0,
			_ => call_site.name.clone(),
		}
	}

	/// Rewrites a generic signature, `method` selects whether parentheses are allowed.
	fn signature<T: From<String> + AsRef<str>>(&self, signature: Option<T>, method: bool) -> Result<Option<T>> {
		signature
			.map(|signature| self.mapping.map_types(signature.as_ref(), true, method).map(T::from))
			.transpose()
	}

	fn remap_class(&self, class: ClassFile) -> Result<ClassFile> {
		// members first, they use the old name of the class for lookups
		let methods = class.methods.into_iter()
			.map(|method| {
				let (name, desc) = (method.name.clone(), method.descriptor.clone());
				self.remap_method(&class.name, method)
					.with_context(|| anyhow!("in method {name}{desc}"))
			})
			.collect::<Result<_>>()?;

		let fields = class.fields.into_iter()
			.map(|field| {
				let (name, desc) = (field.name.clone(), field.descriptor.clone());
				self.remap_field(&class.name, field)
					.with_context(|| anyhow!("in field {name}:{desc}"))
			})
			.collect::<Result<_>>()?;

		Ok(ClassFile {
			access: class.access,
			name: self.mapping.map_class(&class.name),
			super_class: class.super_class.remap(self)?,
			interfaces: class.interfaces.remap(self)?,

			fields,
			methods,

			signature: self.signature::<ClassSignature>(class.signature, false)?,

			runtime_visible_annotations: class.runtime_visible_annotations.remap(self)?,
			runtime_invisible_annotations: class.runtime_invisible_annotations.remap(self)?,

			inner_classes: class.inner_classes.remap(self)?,
			enclosing_method: class.enclosing_method.remap(self)?,
		})
	}

	fn remap_method(&self, owner: &ClassName, method: Method) -> Result<Method> {
		let (name, desc) = self.method_name(owner.as_str(), method.name.as_str(), method.descriptor.as_str());

		// exceptions from the mapping are keyed by the name and descriptor before renaming
		let extra_exceptions = self.mapping.exceptions(owner.as_str(), method.name.as_str(), method.descriptor.as_str());
		let exceptions: IndexSet<ClassName> = method.exceptions.iter()
			.chain(extra_exceptions)
			.map(|exception| self.mapping.map_class(exception))
			.collect();

		Ok(Method {
			access: method.access,
			name,
			descriptor: self.mapping.map_method_desc(&desc)?,

			code: method.code.remap(self)?,
			exceptions,
			signature: self.signature::<MethodSignature>(method.signature, true)?,

			runtime_visible_annotations: method.runtime_visible_annotations.remap(self)?,
			runtime_invisible_annotations: method.runtime_invisible_annotations.remap(self)?,
		})
	}

	fn remap_field(&self, owner: &ClassName, field: Field) -> Result<Field> {
		Ok(Field {
			access: field.access,
			name: self.mapping.map_field_name(owner.as_str(), field.name.as_str()),
			descriptor: field.descriptor.remap(self)?,

			signature: self.signature::<FieldSignature>(field.signature, false)?,

			runtime_visible_annotations: field.runtime_visible_annotations.remap(self)?,
			runtime_invisible_annotations: field.runtime_invisible_annotations.remap(self)?,
		})
	}
}

/// Something that contains symbols to rename.
trait Remap: Sized {
	fn remap(self, remapper: &Remapper) -> Result<Self>;
}

impl<T> Remap for Option<T> where T: Remap {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		self.map(|x| x.remap(remapper)).transpose()
	}
}

impl<T> Remap for Vec<T> where T: Remap {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		self.into_iter()
			.map(|i| i.remap(remapper))
			.collect()
	}
}

impl Remap for ClassName {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(remapper.mapping.map_class(&self))
	}
}

impl Remap for FieldDescriptor {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		remapper.mapping.map_field_desc(&self)
	}
}

impl Remap for MethodDescriptor {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		remapper.mapping.map_method_desc(&self)
	}
}

impl Remap for Annotation {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(Annotation {
			annotation_type: remapper.mapping.map_types(self.annotation_type.as_str(), true, false)?.into(),
			element_value_pairs: self.element_value_pairs,
		})
	}
}

impl Remap for InnerClass {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(InnerClass {
			inner_class: self.inner_class.remap(remapper)?,
			outer_class: self.outer_class.remap(remapper)?,
			inner_name: self.inner_name,
			flags: self.flags,
		})
	}
}

impl Remap for EnclosingMethod {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		let method = match self.method {
			Some(method) => {
				let (name, desc) = remapper.method_name(self.class.as_str(), method.name.as_str(), method.desc.as_str());
				let desc = desc.remap(remapper)?;
				Some(MethodNameAndDesc { name, desc })
			},
			None => None,
		};

		Ok(EnclosingMethod {
			class: self.class.remap(remapper)?,
			method,
		})
	}
}

impl Remap for Code {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(Code {
			instructions: self.instructions.remap(remapper)?,
			exception_table: self.exception_table.remap(remapper)?,
			local_variables: self.local_variables.remap(remapper)?,
		})
	}
}

impl Remap for Exception {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(Exception {
			catch: self.catch.remap(remapper)?,
			..self
		})
	}
}

impl Remap for Lv {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(Lv {
			descriptor: self.descriptor.remap(remapper)?,
			signature: remapper.signature::<FieldSignature>(self.signature, false)?,
			..self
		})
	}
}

impl Remap for FieldRef {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		let owner = remapper.field_owner(self.class.as_str(), self.name.as_str(), self.desc.as_str());

		Ok(FieldRef {
			name: remapper.mapping.map_field_name(owner.as_str(), self.name.as_str()),
			desc: self.desc.remap(remapper)?,
			class: owner.remap(remapper)?,
		})
	}
}

impl Remap for MethodRef {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		let (name, desc) = remapper.method_name(self.class.as_str(), self.name.as_str(), self.desc.as_str());

		Ok(MethodRef {
			name,
			desc: desc.remap(remapper)?,
			// the class of the call stays, even if the method is declared somewhere else
			class: self.class.remap(remapper)?,
		})
	}
}

impl Remap for Handle {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		if self.kind.is_field() {
			let owner = remapper.field_owner(self.owner.as_str(), &self.name, &self.descriptor);

			Ok(Handle {
				kind: self.kind,
				name: remapper.mapping.map_field_name(owner.as_str(), &self.name).into_inner(),
				descriptor: remapper.mapping.map_type_descriptor(&self.descriptor)?,
				owner: owner.remap(remapper)?,
				interface: self.interface,
			})
		} else {
			let (name, desc) = remapper.method_name(self.owner.as_str(), &self.name, &self.descriptor);

			Ok(Handle {
				kind: self.kind,
				name: name.into_inner(),
				descriptor: remapper.mapping.map_method_descriptor(desc.as_str())?,
				owner: self.owner.remap(remapper)?,
				interface: self.interface,
			})
		}
	}
}

impl Remap for Loadable {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(match self {
			Loadable::Class(desc) => Loadable::Class(desc.remap(remapper)?),
			Loadable::MethodType(desc) => Loadable::MethodType(desc.remap(remapper)?),
			Loadable::MethodHandle(handle) => Loadable::MethodHandle(handle.remap(remapper)?),
			x @ (Loadable::Integer(_) | Loadable::Float(_) | Loadable::Long(_) | Loadable::Double(_) | Loadable::String(_)) => x,
		})
	}
}

impl Remap for InvokeDynamic {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		let name = remapper.call_site_name(&self);

		Ok(InvokeDynamic {
			name,
			descriptor: self.descriptor.remap(remapper)?,
			handle: self.handle.remap(remapper)?,
			arguments: self.arguments.remap(remapper)?,
		})
	}
}

impl Remap for VerificationType {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(match self {
			VerificationType::Object(class) => VerificationType::Object(class.remap(remapper)?),
			x => x,
		})
	}
}

impl Remap for Frame {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(Frame {
			locals: self.locals.remap(remapper)?,
			stack: self.stack.remap(remapper)?,
		})
	}
}

impl Remap for Instruction {
	fn remap(self, remapper: &Remapper) -> Result<Self> {
		Ok(match self {
			Instruction::GetStatic(field) => Instruction::GetStatic(field.remap(remapper)?),
			Instruction::PutStatic(field) => Instruction::PutStatic(field.remap(remapper)?),
			Instruction::GetField(field) => Instruction::GetField(field.remap(remapper)?),
			Instruction::PutField(field) => Instruction::PutField(field.remap(remapper)?),

			Instruction::InvokeVirtual(method) => Instruction::InvokeVirtual(method.remap(remapper)?),
			Instruction::InvokeSpecial(method, is_interface) => Instruction::InvokeSpecial(method.remap(remapper)?, is_interface),
			Instruction::InvokeStatic(method, is_interface) => Instruction::InvokeStatic(method.remap(remapper)?, is_interface),
			Instruction::InvokeInterface(method) => Instruction::InvokeInterface(method.remap(remapper)?),
			Instruction::InvokeDynamic(call_site) => Instruction::InvokeDynamic(call_site.remap(remapper)?),

			Instruction::New(class) => Instruction::New(class.remap(remapper)?),
			Instruction::ANewArray(class) => Instruction::ANewArray(class.remap(remapper)?),
			Instruction::CheckCast(class) => Instruction::CheckCast(class.remap(remapper)?),
			Instruction::InstanceOf(class) => Instruction::InstanceOf(class.remap(remapper)?),
			Instruction::MultiANewArray(desc, dimensions) => Instruction::MultiANewArray(desc.remap(remapper)?, dimensions),

			Instruction::Ldc(constant) => Instruction::Ldc(constant.remap(remapper)?),
			Instruction::Frame(frame) => Instruction::Frame(frame.remap(remapper)?),

			x @ (Instruction::Label(_) | Instruction::Opaque { .. }) => x,
		})
	}
}
