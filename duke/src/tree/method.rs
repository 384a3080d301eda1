pub mod code;

use indexmap::IndexSet;
use crate::macros::{make_access_flags, make_string_like};
use crate::tree::access::{
	ACC_ABSTRACT, ACC_BRIDGE, ACC_FINAL, ACC_NATIVE, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC, ACC_STRICT,
	ACC_SYNCHRONIZED, ACC_SYNTHETIC, ACC_VARARGS,
};
use crate::tree::annotation::Annotation;
use crate::tree::class::ClassName;
use crate::tree::method::code::Code;

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
	pub access: MethodAccess,
	pub name: MethodName,
	pub descriptor: MethodDescriptor,

	/// The code of the method, `None` for `abstract` and `native` methods.
	pub code: Option<Code>,
	/// The checked exceptions the method declares with `throws`.
	///
	/// The order of these has no meaning.
	pub exceptions: IndexSet<ClassName>,
	pub signature: Option<MethodSignature>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
}

impl Method {
	pub fn new(access: MethodAccess, name: MethodName, descriptor: MethodDescriptor) -> Method {
		Method {
			access,
			name,
			descriptor,

			code: None,
			exceptions: IndexSet::new(),
			signature: None,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
		}
	}
}

make_access_flags!(
	pub MethodAccess {
		is_public = ACC_PUBLIC => "public",
		is_private = ACC_PRIVATE => "private",
		is_protected = ACC_PROTECTED => "protected",
		is_static = ACC_STATIC => "static",
		is_final = ACC_FINAL => "final",
		is_synchronized = ACC_SYNCHRONIZED => "synchronized",
		is_bridge = ACC_BRIDGE => "bridge",
		is_varargs = ACC_VARARGS => "varargs",
		is_native = ACC_NATIVE => "native",
		is_abstract = ACC_ABSTRACT => "abstract",
		is_strict = ACC_STRICT => "strict",
		is_synthetic = ACC_SYNTHETIC => "synthetic",
	}
);

/// A reference to a method, as used by the `invoke*` instructions.
///
/// The class is the static type the call is made on, it's not necessarily the class that declares the method.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MethodRef {
	pub class: ClassName,
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MethodNameAndDesc {
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

make_string_like!(
	pub MethodName;
);

make_string_like!(
	/// A method descriptor, like `(ILjava/lang/Object;)V`.
	pub MethodDescriptor;
);

make_string_like!(
	pub MethodSignature;
);
