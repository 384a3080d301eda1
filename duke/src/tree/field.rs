use crate::macros::{make_access_flags, make_string_like};
use crate::tree::access::{
	ACC_ENUM, ACC_FINAL, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC, ACC_SYNTHETIC, ACC_TRANSIENT, ACC_VOLATILE,
};
use crate::tree::annotation::Annotation;
use crate::tree::class::ClassName;

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	pub access: FieldAccess,
	pub name: FieldName,
	pub descriptor: FieldDescriptor,

	pub signature: Option<FieldSignature>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
}

impl Field {
	pub fn new(access: FieldAccess, name: FieldName, descriptor: FieldDescriptor) -> Field {
		Field {
			access,
			name,
			descriptor,

			signature: None,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
		}
	}
}

make_access_flags!(
	pub FieldAccess {
		is_public = ACC_PUBLIC => "public",
		is_private = ACC_PRIVATE => "private",
		is_protected = ACC_PROTECTED => "protected",
		is_static = ACC_STATIC => "static",
		is_final = ACC_FINAL => "final",
		is_volatile = ACC_VOLATILE => "volatile",
		is_transient = ACC_TRANSIENT => "transient",
		is_synthetic = ACC_SYNTHETIC => "synthetic",
		is_enum = ACC_ENUM => "enum",
	}
);

/// A reference to a field, as used by the `get*` and `put*` instructions.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldRef {
	pub class: ClassName,
	pub name: FieldName,
	pub desc: FieldDescriptor,
}

make_string_like!(
	pub FieldName;
);

make_string_like!(
	/// A field descriptor, or in other words, the descriptor of a single type, like `I` or `[Ljava/lang/String;`.
	///
	/// The type of annotations as well as the class constants are also stored as field descriptors.
	pub FieldDescriptor;
);

make_string_like!(
	pub FieldSignature;
);
