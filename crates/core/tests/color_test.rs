//! Tests for color space descriptor resolution.

use std::collections::HashMap;

use opstream_core::model::resolve_color_space;
use opstream_core::{ColorSpace, NoResolve, ObjRef, PdfObject, Resolve};

/// Object resolver backed by a plain map, standing in for the xref table.
struct MapResolve(HashMap<ObjRef, PdfObject>);

impl Resolve for MapResolve {
    fn resolve(&self, r: &ObjRef) -> Option<&PdfObject> {
        self.0.get(r)
    }
}

fn name(s: &str) -> PdfObject {
    PdfObject::Name(s.into())
}

#[test]
fn device_family_names() {
    let resources = HashMap::new();
    for (desc, expected) in [
        ("DeviceGray", ColorSpace::DeviceGray),
        ("G", ColorSpace::DeviceGray),
        ("DeviceRGB", ColorSpace::DeviceRgb),
        ("RGB", ColorSpace::DeviceRgb),
        ("DeviceCMYK", ColorSpace::DeviceCmyk),
        ("CMYK", ColorSpace::DeviceCmyk),
    ] {
        let space = resolve_color_space(&name(desc), &resources, &NoResolve).unwrap();
        assert_eq!(space, expected, "{desc}");
    }
}

#[test]
fn unknown_name_without_resources_is_an_error() {
    let resources = HashMap::new();
    let err = resolve_color_space(&name("CS0"), &resources, &NoResolve).unwrap_err();
    assert!(err.to_string().contains("CS0"));
}

#[test]
fn icc_based_reads_component_count_through_xref() {
    let stream_ref = ObjRef { objid: 7, genno: 0 };
    let mut stream_dict = HashMap::new();
    stream_dict.insert("N".to_string(), PdfObject::Int(4));
    let xref = MapResolve(HashMap::from([(
        stream_ref,
        PdfObject::Dict(stream_dict),
    )]));

    let desc = PdfObject::Array(vec![name("ICCBased"), PdfObject::Ref(stream_ref)]);
    let space = resolve_color_space(&desc, &HashMap::new(), &xref).unwrap();

    assert_eq!(space, ColorSpace::Other {
        name: "ICCBased".into(),
        ncomponents: 4
    });
    // Four components convert like CMYK.
    assert_eq!(space.to_rgb(&[0.0, 0.0, 0.0, 1.0]), [0.0, 0.0, 0.0]);
}

#[test]
fn icc_based_defaults_to_three_components() {
    let desc = PdfObject::Array(vec![name("ICCBased"), PdfObject::Ref(ObjRef {
        objid: 1,
        genno: 0,
    })]);
    let space = resolve_color_space(&desc, &HashMap::new(), &NoResolve).unwrap();
    assert_eq!(space.ncomponents(), 3);
}

#[test]
fn named_space_resolved_through_resource_reference() {
    // /CS0 -> indirect ref -> [/CalRGB << ... >>]
    let target_ref = ObjRef { objid: 3, genno: 0 };
    let xref = MapResolve(HashMap::from([(
        target_ref,
        PdfObject::Array(vec![name("CalRGB"), PdfObject::Dict(HashMap::new())]),
    )]));

    let mut colorspaces = HashMap::new();
    colorspaces.insert("CS0".to_string(), PdfObject::Ref(target_ref));
    let mut resources = HashMap::new();
    resources.insert("ColorSpace".to_string(), PdfObject::Dict(colorspaces));

    let space = resolve_color_space(&name("CS0"), &resources, &xref).unwrap();
    assert_eq!(space, ColorSpace::DeviceRgb);
}

#[test]
fn device_n_counts_its_colorants() {
    let desc = PdfObject::Array(vec![
        name("DeviceN"),
        PdfObject::Array(vec![name("Cyan"), name("Magenta"), name("Spot1")]),
        name("DeviceCMYK"),
    ]);
    let space = resolve_color_space(&desc, &HashMap::new(), &NoResolve).unwrap();
    assert_eq!(space.ncomponents(), 3);
}

#[test]
fn descriptor_cycles_are_detected() {
    // /Loop resolves to itself.
    let mut colorspaces = HashMap::new();
    colorspaces.insert("Loop".to_string(), name("Loop"));
    let mut resources = HashMap::new();
    resources.insert("ColorSpace".to_string(), PdfObject::Dict(colorspaces));

    assert!(resolve_color_space(&name("Loop"), &resources, &NoResolve).is_err());
}
