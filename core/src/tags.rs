use crate::error::Result;
use dicom_core::Tag;
use dicom_object::{FileDicomObject, InMemDicomObject, OpenFileOptions};
use std::path::Path;

// Series Identification Tags
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const SEQUENCE_NAME: Tag = Tag(0x0018, 0x0024);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);

// Image Geometry Tags
pub const SLICE_LOCATION: Tag = Tag(0x0020, 0x1041);
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);

// Value Rescaling Tags
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);
pub const IMAGE_COMMENTS: Tag = Tag(0x0020, 0x4000);

// Pixel Data Tags
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get float value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to f64
pub fn get_float_value(dcm: &InMemDicomObject, tag: Tag) -> Option<f64> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_float64().ok())
}

/// Opens a DICOM file without reading its pixel data
///
/// Parsing stops at the PixelData element, which keeps tag sweeps over
/// large series cheap.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed as DICOM
pub fn open_dicom_meta<P: AsRef<Path>>(path: P) -> Result<FileDicomObject<InMemDicomObject>> {
    let dcm = OpenFileOptions::new()
        .read_until(PIXEL_DATA)
        .open_file(path)?;
    Ok(dcm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    #[test]
    fn test_tag_values() {
        // Just ensure tags are correctly defined
        assert_eq!(SERIES_DESCRIPTION, Tag(0x0008, 0x103E));
        assert_eq!(SERIES_NUMBER, Tag(0x0020, 0x0011));
        assert_eq!(SLICE_LOCATION, Tag(0x0020, 0x1041));
        assert_eq!(RESCALE_SLOPE, Tag(0x0028, 0x1053));
        assert_eq!(PIXEL_DATA, Tag(0x7FE0, 0x0010));
    }

    #[test]
    fn test_get_string_value_trims_padding() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from("MRE 60Hz "),
        ));

        assert_eq!(
            get_string_value(&dcm, SERIES_DESCRIPTION),
            Some("MRE 60Hz".to_string())
        );
        assert_eq!(get_string_value(&dcm, MANUFACTURER), None);
    }

    #[test]
    fn test_get_int_value() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_NUMBER,
            VR::IS,
            PrimitiveValue::from("12"),
        ));

        assert_eq!(get_int_value(&dcm, SERIES_NUMBER), Some(12));
        assert_eq!(get_int_value(&dcm, ROWS), None);
    }

    #[test]
    fn test_get_float_value() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SLICE_LOCATION,
            VR::DS,
            PrimitiveValue::from("-12.75"),
        ));

        assert_eq!(get_float_value(&dcm, SLICE_LOCATION), Some(-12.75));
    }

    #[test]
    fn test_get_float_value_zero_is_present() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SLICE_LOCATION,
            VR::DS,
            PrimitiveValue::from("0.0"),
        ));

        assert_eq!(get_float_value(&dcm, SLICE_LOCATION), Some(0.0));
    }
}
