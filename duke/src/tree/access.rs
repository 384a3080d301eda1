//! The raw access flag bits shared by classes, fields, methods and inner class entries.
//!
//! Each kind of member has its own struct of booleans (like [`ClassAccess`][crate::tree::class::ClassAccess]). All of
//! them convert from and to the `u16` of the class file, which is what [`Access`] is about: code that wants to
//! change visibility or the final bit works on the raw bits, and doesn't care which kind of member it has.

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
/// Only for classes, for methods it's [`ACC_SYNCHRONIZED`].
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
pub const ACC_VOLATILE: u16 = 0x0040;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_TRANSIENT: u16 = 0x0080;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_STRICT: u16 = 0x0800;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;
pub const ACC_MODULE: u16 = 0x8000;

/// The three bits that make up the visibility of a member.
pub const VISIBILITY_MASK: u16 = ACC_PUBLIC | ACC_PRIVATE | ACC_PROTECTED;

/// Access flags that round trip through their raw `u16` representation.
///
/// Bits that a given kind of flags can't represent are dropped on conversion from `u16`.
pub trait Access: Copy + From<u16> + Into<u16> {
	fn bits(self) -> u16 {
		self.into()
	}
}

impl Access for u16 {}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::access::{Access, ACC_FINAL, ACC_PRIVATE, ACC_PUBLIC};
	use crate::tree::class::ClassAccess;
	use crate::tree::field::FieldAccess;
	use crate::tree::method::MethodAccess;

	#[test]
	fn round_trip_field_access() {
		for bits in [0x0000, 0x0001, 0x0002, 0x0004, 0x0019, 0x40da, 0x1000] {
			assert_eq!(FieldAccess::from(bits).bits(), bits, "bits {bits:#06x}");
		}
	}

	#[test]
	fn round_trip_method_access() {
		for bits in [0x0000, 0x0001, 0x0012, 0x0448, 0x1fff & !0x0200] {
			assert_eq!(MethodAccess::from(bits).bits(), bits, "bits {bits:#06x}");
		}
	}

	#[test]
	fn class_access_drops_member_only_bits() {
		let access = ClassAccess::from(ACC_PUBLIC | ACC_PRIVATE | ACC_FINAL);
		assert!(access.is_public);
		assert!(access.is_final);
		assert_eq!(access.bits(), ACC_PUBLIC | ACC_FINAL);
	}
}
