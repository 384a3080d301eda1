use anyhow::Result;
use pretty_assertions::assert_eq;
use quill::descriptor::DescriptorError;
use quill::mapping::Mapping;
use quill::scheme::{NamingScheme, SchemeKind, Side};

fn obf_to_srg() -> Mapping {
	Mapping::new(
		NamingScheme::new(SchemeKind::Obf, Side::Universal, "1.6.4"),
		NamingScheme::new(SchemeKind::Srg, Side::Universal, "1.6.4"),
	)
}

#[test]
fn empty_mapping_keeps_descriptors() -> Result<()> {
	let m = obf_to_srg();
	assert_eq!(m.map_type_descriptor("Ljava/lang/String;")?, "Ljava/lang/String;");
	assert_eq!(m.map_method_descriptor("([Ljava/lang/String;)V")?, "([Ljava/lang/String;)V");
	Ok(())
}

#[test]
fn object_in_method_descriptor() -> Result<()> {
	let mut m = obf_to_srg();
	m.set_class("java/lang/Object", "com/x/Obj");
	assert_eq!(m.map_method_descriptor("(ILjava/lang/Object;)Z")?, "(ILcom/x/Obj;)Z");
	Ok(())
}

#[test]
fn malformed_method_descriptor() {
	let error = obf_to_srg().map_method_descriptor("I").unwrap_err();
	assert_eq!(
		error.downcast_ref::<DescriptorError>(),
		Some(&DescriptorError::NotAMethodDescriptor("I".to_owned()))
	);
}

#[test]
fn round_trip_through_inverse() -> Result<()> {
	let mut m = obf_to_srg();
	m.set_class("a", "net/minecraft/Block");
	m.set_class("b", "net/minecraft/World");
	m.add_prefix("c/", "net/minecraft/util/");
	let inverse = m.inverse()?;

	for desc in ["(La;Lb;I)La;", "([[Lb;)V", "()Ljava/lang/Object;"] {
		let there = m.map_method_descriptor(desc)?;
		assert_eq!(inverse.map_method_descriptor(&there)?, desc);
	}
	for signature in ["Ljava/util/List<La;>;", "Ljava/util/Map<Lb;+La;>;"] {
		let there = m.map_types(signature, true, false)?;
		assert_eq!(inverse.map_types(&there, true, false)?, signature);
	}
	Ok(())
}
