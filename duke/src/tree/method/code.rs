use crate::macros::make_string_like;
use crate::tree::class::ClassName;
use crate::tree::field::{FieldDescriptor, FieldRef, FieldSignature};
use crate::tree::method::{MethodDescriptor, MethodName, MethodRef};

/// Represents the code of a method.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Code {
	pub instructions: Vec<Instruction>,
	pub exception_table: Vec<Exception>,
	pub local_variables: Vec<Lv>,
}

impl Code {
	pub fn new(instructions: Vec<Instruction>) -> Code {
		Code {
			instructions,
			exception_table: Vec::new(),
			local_variables: Vec::new(),
		}
	}
}

/// Represents a bytecode offset of an opcode using a method-local id.
///
/// The id does **not** correspond to the bytecode offset in any direct way, it just uniquely identifies one inside
/// the code of a method.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
	pub id: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exception {
	pub start: Label,
	pub end: Label,
	pub handler: Label,
	/// The caught class, `None` for a `finally` block.
	pub catch: Option<ClassName>,
}

make_string_like!(
	pub LocalVariableName;
);

/// An entry of the local variable table.
#[derive(Debug, Clone, PartialEq)]
pub struct Lv {
	pub start: Label,
	pub end: Label,
	pub name: LocalVariableName,
	pub descriptor: FieldDescriptor,
	pub signature: Option<FieldSignature>,
	pub index: u16,
}

/// Represents an instruction of the JVM.
///
/// Only the instructions that reference classes, fields or methods are modelled. All other instructions are stored
/// as [`Instruction::Opaque`], and [`Instruction::Label`] and [`Instruction::Frame`] are pseudo instructions
/// marking a position in the code and the stack map frame at that position.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	Label(Label),
	Frame(Frame),
	Ldc(Loadable),
	GetStatic(FieldRef),
	PutStatic(FieldRef),
	GetField(FieldRef),
	PutField(FieldRef),
	InvokeVirtual(MethodRef),
	/// The bool is `true` iff it's on an interface, so if it referenced an `InterfaceMethodRef` constant pool entry.
	InvokeSpecial(MethodRef, bool),
	/// The bool is `true` iff it's on an interface, so if it referenced an `InterfaceMethodRef` constant pool entry.
	InvokeStatic(MethodRef, bool),
	InvokeInterface(MethodRef),
	InvokeDynamic(InvokeDynamic),
	New(ClassName),
	ANewArray(ClassName),
	CheckCast(ClassName),
	InstanceOf(ClassName),
	/// The array type and the number of dimensions to create.
	MultiANewArray(FieldDescriptor, u8),
	/// Any other instruction, with its raw opcode and operand bytes.
	Opaque {
		opcode: u8,
		operands: Vec<u8>,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	/// A class constant, given as descriptor, like `Ljava/lang/String;` or `[I`.
	Class(FieldDescriptor),
	String(String),
	MethodHandle(Handle),
	MethodType(MethodDescriptor),
}

/// The kinds of method handles, see [section 5.4.3.5](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-5.html#jvms-5.4.3.5).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HandleKind {
	GetField,
	GetStatic,
	PutField,
	PutStatic,
	InvokeVirtual,
	InvokeStatic,
	InvokeSpecial,
	NewInvokeSpecial,
	InvokeInterface,
}

impl HandleKind {
	/// Returns `true` iff this handle reads or writes a field, in which case the descriptor is a field descriptor.
	pub fn is_field(self) -> bool {
		matches!(self, HandleKind::GetField | HandleKind::GetStatic | HandleKind::PutField | HandleKind::PutStatic)
	}
}

/// A method handle.
///
/// For field handles the `descriptor` is a field descriptor, for all other ones a method descriptor. This is the
/// reason for it being stored as plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
	pub kind: HandleKind,
	pub owner: ClassName,
	pub name: String,
	pub descriptor: String,
	/// `true` iff the owner is an interface.
	pub interface: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeDynamic {
	pub name: MethodName,
	pub descriptor: MethodDescriptor,
	pub handle: Handle,
	pub arguments: Vec<Loadable>,
}

/// A stack map frame, holding the types of the locals and the stack at some point in the code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
	pub locals: Vec<VerificationType>,
	pub stack: Vec<VerificationType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationType {
	Top,
	Integer,
	Float,
	Long,
	Double,
	Null,
	UninitializedThis,
	Object(ClassName),
	Uninitialized(Label),
}
