use crate::tree::field::FieldDescriptor;

/// An annotation on a class, field or method.
///
/// Only the type of the annotation is modelled, the element value pairs are kept as the raw bytes of the
/// `element_value_pairs` item, and are never looked at.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
	pub annotation_type: FieldDescriptor,
	pub element_value_pairs: Vec<u8>,
}

impl Annotation {
	pub fn new(annotation_type: FieldDescriptor) -> Annotation {
		Annotation {
			annotation_type,
			element_value_pairs: Vec::new(),
		}
	}
}
