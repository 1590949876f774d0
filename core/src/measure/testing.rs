//! Synthetic DICOM files for pixel-level tests

use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::tags;
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use std::fs::create_dir_all;
use std::path::Path;

/// Writes an uncompressed monochrome DICOM file with 16-bit stored pixels
pub(crate) fn write_pixel_file(path: &Path, pixels: &[u16], rows: u16, cols: u16) {
    write_pixel_file_with(path, pixels, rows, cols, |_| {});
}

/// Same as [`write_pixel_file`], with a hook for extra data elements
pub(crate) fn write_pixel_file_with<F>(path: &Path, pixels: &[u16], rows: u16, cols: u16, extend: F)
where
    F: FnOnce(&mut InMemDicomObject),
{
    assert_eq!(pixels.len(), rows as usize * cols as usize);
    if let Some(parent) = path.parent() {
        create_dir_all(parent).unwrap();
    }

    let mut dcm = InMemDicomObject::new_empty();
    dcm.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows)));
    dcm.put(DataElement::new(
        tags::COLUMNS,
        VR::US,
        PrimitiveValue::from(cols),
    ));
    dcm.put(DataElement::new(
        tags::SAMPLES_PER_PIXEL,
        VR::US,
        PrimitiveValue::from(1_u16),
    ));
    dcm.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    ));
    dcm.put(DataElement::new(
        tags::BITS_ALLOCATED,
        VR::US,
        PrimitiveValue::from(16_u16),
    ));
    dcm.put(DataElement::new(
        tags::BITS_STORED,
        VR::US,
        PrimitiveValue::from(16_u16),
    ));
    dcm.put(DataElement::new(
        tags::HIGH_BIT,
        VR::US,
        PrimitiveValue::from(15_u16),
    ));
    dcm.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(0_u16),
    ));

    let mut bytes = Vec::with_capacity(pixels.len() * 2);
    for pixel in pixels {
        bytes.extend_from_slice(&pixel.to_le_bytes());
    }
    dcm.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::from(bytes),
    ));

    extend(&mut dcm);

    let file_obj = dcm
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax("1.2.840.10008.1.2.1")
                .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
                .media_storage_sop_instance_uid("1.2.3.4"),
        )
        .unwrap();
    file_obj.write_to_file(path).unwrap();
}
