use crate::macros::{make_access_flags, make_string_like};
use crate::tree::access::{
	ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_FINAL, ACC_INTERFACE, ACC_MODULE, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC,
	ACC_STATIC, ACC_SUPER, ACC_SYNTHETIC,
};
use crate::tree::annotation::Annotation;
use crate::tree::field::Field;
use crate::tree::method::{Method, MethodNameAndDesc};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
	pub access: ClassAccess,
	pub name: ClassName,
	/// The super class, only `None` for `java/lang/Object`.
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,

	pub fields: Vec<Field>,
	pub methods: Vec<Method>,

	pub signature: Option<ClassSignature>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,

	pub inner_classes: Option<Vec<InnerClass>>,
	pub enclosing_method: Option<EnclosingMethod>,
}

impl ClassFile {
	pub fn new(access: ClassAccess, name: ClassName, super_class: Option<ClassName>, interfaces: Vec<ClassName>) -> ClassFile {
		ClassFile {
			access,
			name,
			super_class,
			interfaces,

			fields: Vec::new(),
			methods: Vec::new(),

			signature: None,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),

			inner_classes: None,
			enclosing_method: None,
		}
	}

	pub fn is_interface(&self) -> bool {
		self.access.is_interface
	}

	/// Checks if this class itself declares a field with the given name and descriptor.
	///
	/// Fields declared in super classes or interfaces are not considered.
	pub fn declares_field(&self, name: &str, desc: &str) -> bool {
		self.fields.iter()
			.any(|field| field.name == name && field.descriptor == desc)
	}

	/// Checks if this class itself declares a method with the given name and descriptor.
	pub fn declares_method(&self, name: &str, desc: &str) -> bool {
		self.methods.iter()
			.any(|method| method.name == name && method.descriptor == desc)
	}
}

make_access_flags!(
	/// The access flags a class can have.
	///
	/// Take a look at the [Java Virtual Machine Specification](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.1-200-E.1),
	/// for the meanings of these, and which combinations are legal. Classes can't be `private` or `protected`, only
	/// their [inner class entries][InnerClassFlags] can.
	pub ClassAccess {
		is_public = ACC_PUBLIC => "public",
		is_final = ACC_FINAL => "final",
		is_super = ACC_SUPER => "super",
		is_interface = ACC_INTERFACE => "interface",
		is_abstract = ACC_ABSTRACT => "abstract",
		is_synthetic = ACC_SYNTHETIC => "synthetic",
		is_annotation = ACC_ANNOTATION => "annotation",
		is_enum = ACC_ENUM => "enum",
		is_module = ACC_MODULE => "module",
	}
);

make_string_like!(
	/// Represents a class name.
	///
	/// The class name uses [internal binary names](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.2.1), i.e. with complete path
	/// written out and using slashes, like `java/lang/Thread`.
	///
	/// Operands of instructions like `anewarray` or `checkcast` may also hold array class names, these start with `[`
	/// and are followed by a field descriptor.
	pub ClassName;
);

impl ClassName {
	/// The name of the root of the class hierarchy.
	pub const JAVA_LANG_OBJECT: &'static str = "java/lang/Object";

	pub fn is_java_lang_object(&self) -> bool {
		self.as_str() == Self::JAVA_LANG_OBJECT
	}

	/// Gets the class this class is nested in, judging only by the name.
	///
	/// This is the part before the last `$` of the last (`/`-separated) section, with the package kept.
	///
	/// ```
	/// use duke::tree::class::ClassName;
	///
	/// let name = ClassName::from("org/example/Outer$Inner$1");
	/// assert_eq!(name.outer_class(), Some(ClassName::from("org/example/Outer$Inner")));
	/// assert_eq!(ClassName::from("org/example/Outer").outer_class(), None);
	/// ```
	pub fn outer_class(&self) -> Option<ClassName> {
		outer_class_name(self.as_str()).map(ClassName::from)
	}
}

/// Gets the part of a class name before the last `$` in its last section.
pub fn outer_class_name(name: &str) -> Option<&str> {
	let simple_start = name.rfind('/').map_or(0, |i| i + 1);
	name[simple_start..].rfind('$')
		.map(|dollar| &name[..simple_start + dollar])
}

make_string_like!(
	/// Represents a class signature, from a generic such as `Foo<T extends Bar>`.
	pub ClassSignature;
);

#[derive(Debug, Clone, PartialEq)]
pub struct InnerClass {
	pub inner_class: ClassName,
	pub outer_class: Option<ClassName>,
	pub inner_name: Option<String>,
	pub flags: InnerClassFlags,
}

make_access_flags!(
	/// The flags of an entry in the `InnerClasses` attribute, these are the access flags the class has in the source.
	pub InnerClassFlags {
		is_public = ACC_PUBLIC => "public",
		is_private = ACC_PRIVATE => "private",
		is_protected = ACC_PROTECTED => "protected",
		is_static = ACC_STATIC => "static",
		is_final = ACC_FINAL => "final",
		is_interface = ACC_INTERFACE => "interface",
		is_abstract = ACC_ABSTRACT => "abstract",
		is_synthetic = ACC_SYNTHETIC => "synthetic",
		is_annotation = ACC_ANNOTATION => "annotation",
		is_enum = ACC_ENUM => "enum",
	}
);

/// The class and, for local and anonymous classes declared inside a method, the method a class is enclosed in.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingMethod {
	pub class: ClassName,
	pub method: Option<MethodNameAndDesc>,
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::class::{outer_class_name, ClassName};

	#[test]
	fn outer_class_names() {
		assert_eq!(outer_class_name("a/b/C$D$E"), Some("a/b/C$D"));
		assert_eq!(outer_class_name("a/b/C$D"), Some("a/b/C"));
		assert_eq!(outer_class_name("C$1"), Some("C"));
		assert_eq!(outer_class_name("a/b/C"), None);
		// a `$` in the package doesn't make a nested class
		assert_eq!(outer_class_name("a$b/C"), None);
	}

	#[test]
	fn lookup_by_str() {
		let mut map = indexmap::IndexMap::new();
		map.insert(ClassName::from("java/lang/Object"), 1);
		assert_eq!(map.get("java/lang/Object"), Some(&1));
	}
}
