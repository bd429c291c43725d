//! Color space model and descriptor resolution.
//!
//! The preprocessor only needs enough of the color machinery to keep the
//! fill color of the graphics state current: the device color space
//! singletons, conversion of operand tuples to RGB, and resolution of the
//! color space descriptors the `cs` operator supplies against the page's
//! resource dictionary.

use std::collections::HashMap;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::error::{PdfError, Result};
use crate::model::objects::{ObjRef, PdfObject};

/// Object resolution boundary (cross-reference lookup).
///
/// Implementations are expected to be synchronous and side-effect-free;
/// returning `None` for an unknown reference is always acceptable.
pub trait Resolve {
    fn resolve(&self, r: &ObjRef) -> Option<&PdfObject>;
}

/// Resolver that knows no objects. Suitable whenever the content stream's
/// resources contain no indirect references.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResolve;

impl Resolve for NoResolve {
    fn resolve(&self, _r: &ObjRef) -> Option<&PdfObject> {
        None
    }
}

/// A resolved color space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    /// Resource-defined space (ICCBased, Separation, Indexed, ...).
    ///
    /// Only the component count survives resolution; component tuples are
    /// converted to RGB best-effort.
    Other { name: String, ncomponents: usize },
}

/// Component counts for the predefined color space families.
static PREDEFINED_COLORSPACE: LazyLock<FxHashMap<&'static str, usize>> = LazyLock::new(|| {
    let entries = [
        ("DeviceGray", 1),
        ("CalGray", 1),
        ("DeviceRGB", 3),
        ("CalRGB", 3),
        ("Lab", 3),
        ("DeviceCMYK", 4),
        ("Separation", 1),
        ("Indexed", 1),
        ("Pattern", 1),
    ];
    entries.into_iter().collect()
});

impl ColorSpace {
    /// Number of components a color value in this space carries.
    pub fn ncomponents(&self) -> usize {
        match self {
            Self::DeviceGray => 1,
            Self::DeviceRgb => 3,
            Self::DeviceCmyk => 4,
            Self::Other { ncomponents, .. } => *ncomponents,
        }
    }

    /// Convert a component tuple to an RGB triple, components in 0..=1.
    ///
    /// Undersized or oversized tuples are tolerated: missing components
    /// read as zero, extras are ignored. Resource-defined spaces fall back
    /// to interpreting their components by count (1 as gray, 3 as RGB,
    /// 4 as CMYK), which keeps tint-transform-free callers usable.
    pub fn to_rgb(&self, comps: &[f64]) -> [f64; 3] {
        let at = |i: usize| comps.get(i).copied().unwrap_or(0.0);
        match self {
            Self::DeviceGray => {
                let g = at(0);
                [g, g, g]
            }
            Self::DeviceRgb => [at(0), at(1), at(2)],
            Self::DeviceCmyk => cmyk_to_rgb(at(0), at(1), at(2), at(3)),
            Self::Other { .. } => match comps.len() {
                3 => [at(0), at(1), at(2)],
                4 => cmyk_to_rgb(at(0), at(1), at(2), at(3)),
                _ => {
                    let g = at(0);
                    [g, g, g]
                }
            },
        }
    }
}

fn cmyk_to_rgb(c: f64, m: f64, y: f64, k: f64) -> [f64; 3] {
    [
        (1.0 - (c + k).min(1.0)).max(0.0),
        (1.0 - (m + k).min(1.0)).max(0.0),
        (1.0 - (y + k).min(1.0)).max(0.0),
    ]
}

/// Resolve a color space descriptor against a resource dictionary.
///
/// Descriptors are either a device family name, a name registered in the
/// resources' `ColorSpace` dictionary, or an array whose first element
/// names the family. Indirect references are chased through `xref`.
pub fn resolve_color_space(
    desc: &PdfObject,
    resources: &HashMap<String, PdfObject>,
    xref: &dyn Resolve,
) -> Result<ColorSpace> {
    resolve_inner(desc, resources, xref, 0)
}

// Named spaces can point back into the resource dictionary; the depth
// guard stops descriptor cycles in broken documents.
const MAX_RESOLVE_DEPTH: u32 = 8;

fn resolve_inner(
    desc: &PdfObject,
    resources: &HashMap<String, PdfObject>,
    xref: &dyn Resolve,
    depth: u32,
) -> Result<ColorSpace> {
    if depth > MAX_RESOLVE_DEPTH {
        return Err(PdfError::SyntaxError("color space descriptor cycle".into()));
    }

    let desc = deref(desc, xref);
    match desc {
        PdfObject::Name(name) => match name.as_str() {
            "DeviceGray" | "G" | "CalGray" => Ok(ColorSpace::DeviceGray),
            "DeviceRGB" | "RGB" => Ok(ColorSpace::DeviceRgb),
            "DeviceCMYK" | "CMYK" => Ok(ColorSpace::DeviceCmyk),
            "Pattern" => Ok(ColorSpace::Other {
                name: "Pattern".into(),
                ncomponents: 1,
            }),
            other => {
                // Not a device family: look it up in the resources.
                let entry = resources
                    .get("ColorSpace")
                    .map(|cs| deref(cs, xref))
                    .and_then(|cs| cs.as_dict().ok())
                    .and_then(|d| d.get(other))
                    .ok_or_else(|| PdfError::UnknownColorSpace(other.to_string()))?;
                resolve_inner(entry, resources, xref, depth + 1)
            }
        },
        PdfObject::Array(items) => {
            let family = items
                .first()
                .map(|f| deref(f, xref))
                .ok_or_else(|| PdfError::UnknownColorSpace("empty array".into()))?
                .as_name()?
                .to_string();
            match family.as_str() {
                "DeviceGray" | "CalGray" => Ok(ColorSpace::DeviceGray),
                "DeviceRGB" | "CalRGB" | "Lab" => Ok(ColorSpace::DeviceRgb),
                "DeviceCMYK" => Ok(ColorSpace::DeviceCmyk),
                "ICCBased" => {
                    let n = items
                        .get(1)
                        .map(|s| deref(s, xref))
                        .and_then(|s| s.as_dict().ok())
                        .and_then(|d| d.get("N"))
                        .and_then(|n| n.as_int().ok())
                        .unwrap_or(3);
                    Ok(ColorSpace::Other {
                        name: family,
                        ncomponents: n.max(1) as usize,
                    })
                }
                "DeviceN" => {
                    let n = items
                        .get(1)
                        .map(|s| deref(s, xref))
                        .and_then(|s| s.as_array().ok())
                        .map_or(1, Vec::len);
                    Ok(ColorSpace::Other {
                        name: family,
                        ncomponents: n,
                    })
                }
                other => PREDEFINED_COLORSPACE
                    .get(other)
                    .map(|&n| ColorSpace::Other {
                        name: other.to_string(),
                        ncomponents: n,
                    })
                    .ok_or_else(|| PdfError::UnknownColorSpace(other.to_string())),
            }
        }
        other => Err(PdfError::TypeError {
            expected: "name or array",
            got: other.type_name(),
        }),
    }
}

fn deref<'a>(obj: &'a PdfObject, xref: &'a dyn Resolve) -> &'a PdfObject {
    match obj {
        PdfObject::Ref(r) => xref.resolve(r).unwrap_or(obj),
        _ => obj,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmyk_black() {
        assert_eq!(ColorSpace::DeviceCmyk.to_rgb(&[0.0, 0.0, 0.0, 1.0]), [
            0.0, 0.0, 0.0
        ]);
    }

    #[test]
    fn gray_replicates() {
        assert_eq!(ColorSpace::DeviceGray.to_rgb(&[0.25]), [0.25, 0.25, 0.25]);
    }

    #[test]
    fn short_tuple_reads_zero() {
        assert_eq!(ColorSpace::DeviceRgb.to_rgb(&[1.0]), [1.0, 0.0, 0.0]);
    }
}
