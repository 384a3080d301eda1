//! The grammar shared by type descriptors, method descriptors and generic signatures.
//!
//! Everything here only rewrites the class names appearing in a descriptor, and keeps every other character
//! as is. Which class name gets replaced by what is decided by the caller.
use thiserror::Error;

/// A descriptor or signature that can't be rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
	#[error("a type descriptor may not be empty")]
	EmptyTypeDescriptor,
	#[error("not a method descriptor: {0:?}")]
	NotAMethodDescriptor(String),
	#[error("unknown character {character:?} at index {index} in descriptor {descriptor:?}")]
	UnexpectedCharacter {
		character: char,
		index: usize,
		descriptor: String,
	},
	#[error("object type starting at index {index} is never closed by a `;` in descriptor {descriptor:?}")]
	UnterminatedObjectType {
		index: usize,
		descriptor: String,
	},
}

/// Rewrites each class name in `descriptor` with `map_class`.
///
/// An object type starts at `L` and ends at the next `;`, or at the next `<` if that comes first. Primitive
/// type letters, `[`, `<` and `>` are copied. Parentheses are only accepted if `method` is set. Any other
/// character is an error, unless `generic` is set, then it's copied as well.
pub fn map_types(
	descriptor: &str,
	generic: bool,
	method: bool,
	mut map_class: impl FnMut(&str) -> String,
) -> Result<String, DescriptorError> {
	let mut out = String::with_capacity(descriptor.len());

	let mut index = 0;
	while let Some(character) = descriptor[index..].chars().next() {
		match character {
			'(' | ')' if method => out.push(character),
			'(' | ')' => return Err(unexpected(descriptor, character, index)),
			'V' | 'Z' | 'B' | 'C' | 'S' | 'I' | 'J' | 'F' | 'D' | '[' | '<' | '>' => out.push(character),
			'L' => {
				let start = index + 1;
				let end = descriptor[start..].find([';', '<'])
					.map(|x| start + x)
					.ok_or_else(|| DescriptorError::UnterminatedObjectType {
						index,
						descriptor: descriptor.to_owned(),
					})?;

				out.push('L');
				out.push_str(&map_class(&descriptor[start..end]));
				// both `;` and `<` are one byte
				out.push_str(&descriptor[end..end + 1]);

				index = end + 1;
				continue;
			},
			_ if generic => out.push(character),
			_ => return Err(unexpected(descriptor, character, index)),
		}
		index += character.len_utf8();
	}

	Ok(out)
}

fn unexpected(descriptor: &str, character: char, index: usize) -> DescriptorError {
	DescriptorError::UnexpectedCharacter { character, index, descriptor: descriptor.to_owned() }
}

/// Rewrites a type descriptor, like `I` or `[Ljava/lang/String;`.
pub fn map_type_descriptor(descriptor: &str, map_class: impl FnMut(&str) -> String) -> Result<String, DescriptorError> {
	if descriptor.is_empty() {
		return Err(DescriptorError::EmptyTypeDescriptor);
	}
	map_types(descriptor, false, false, map_class)
}

/// Rewrites a method descriptor, like `(ILjava/lang/Object;)V`.
///
/// The descriptor must start with `(` and contain a `)` somewhere after it.
pub fn map_method_descriptor(descriptor: &str, map_class: impl FnMut(&str) -> String) -> Result<String, DescriptorError> {
	if !descriptor.starts_with('(') || !descriptor[1..].contains(')') {
		return Err(DescriptorError::NotAMethodDescriptor(descriptor.to_owned()));
	}
	map_types(descriptor, false, true, map_class)
}

/// Checks if `descriptor` declares an object return type, and gives back its class name.
pub fn return_class(descriptor: &str) -> Option<&str> {
	let (_, ret) = descriptor.rsplit_once(')')?;
	ret.strip_prefix('L')?.strip_suffix(';')
}
