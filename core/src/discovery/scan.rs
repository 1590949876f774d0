use crate::error::Result;
use crate::paths::{sorted_files, sorted_subdirs};
use crate::tags::{
    get_int_value, get_string_value, open_dicom_meta, MANUFACTURER, SEQUENCE_NAME,
    SERIES_DESCRIPTION, SERIES_NUMBER,
};
use crate::types::{DatasetEntry, DatasetScan, Manufacturer, ScanMode};
use dicom_object::{FileDicomObject, InMemDicomObject};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

type MetaObject = FileDicomObject<InMemDicomObject>;

/// Siemens entries still waiting for their complementary half
///
/// Keys are the series number that would complete an entry, values are
/// indices into the entry list. A magnitude series at N pairs with a
/// phase series at N + 1.
#[derive(Default)]
struct PendingPairs {
    awaiting_mag: HashMap<i32, usize>,
    awaiting_phase: HashMap<i32, usize>,
}

impl PendingPairs {
    fn attach_mag(&mut self, entries: &mut Vec<DatasetEntry>, folder: &str, series: i32) {
        if let Some(idx) = self.awaiting_mag.remove(&series) {
            entries[idx].mag = Some(folder.to_string());
            entries[idx].mag_series = Some(series);
        } else {
            entries.push(DatasetEntry::with_mag(folder, series));
            self.awaiting_phase.insert(series + 1, entries.len() - 1);
        }
    }

    fn attach_phase(&mut self, entries: &mut Vec<DatasetEntry>, folder: &str, series: i32) {
        if let Some(idx) = self.awaiting_phase.remove(&series) {
            entries[idx].phase = Some(folder.to_string());
            entries[idx].phase_series = Some(series);
        } else {
            entries.push(DatasetEntry::with_phase(folder, series));
            self.awaiting_mag.insert(series - 1, entries.len() - 1);
        }
    }
}

/// Searches a case directory for 3D MRE datasets
///
/// Each immediate subfolder is treated as one DICOM series, represented
/// by a file parsed from it. Folders are visited in sorted order, so
/// repeated scans of the same tree give identical results. Folders
/// whose representative lacks a SeriesDescription or Manufacturer, or
/// whose SequenceName shows inversion output ("3d-mmdi"), are skipped.
///
/// # Errors
///
/// Returns an error if the case directory cannot be listed
pub fn scan_datasets<P: AsRef<Path>>(top_dir: P, mode: ScanMode) -> Result<DatasetScan> {
    let top_dir = top_dir.as_ref();
    let mut scan = DatasetScan::new(top_dir);
    let mut pending = PendingPairs::default();

    info!("Searching for 3D MRE datasets in {}", top_dir.display());
    for folder in sorted_subdirs(top_dir)? {
        let folder_path = top_dir.join(&folder);
        let (count, representative) = match count_dicom_files(&folder_path, mode) {
            Ok(result) => result,
            Err(e) => {
                warn!("Skipping unreadable folder {}: {}", folder_path.display(), e);
                continue;
            }
        };
        let Some(dcm) = representative else {
            continue;
        };

        let Some(description) = get_string_value(&dcm, SERIES_DESCRIPTION) else {
            continue;
        };
        let Some(vendor) = get_string_value(&dcm, MANUFACTURER) else {
            continue;
        };
        let sequence_name = get_string_value(&dcm, SEQUENCE_NAME).unwrap_or_default();
        if sequence_name.contains("3d-mmdi") {
            // Folder already holds inversion output
            continue;
        }

        let manufacturer = Manufacturer::classify(&vendor);
        if !manufacturer.series_is_valid(&description, count) {
            continue;
        }
        scan.manufacturer = manufacturer;

        let Some(series) = get_int_value(&dcm, SERIES_NUMBER) else {
            warn!("No SeriesNumber in {}, skipping", folder_path.display());
            continue;
        };

        match manufacturer {
            Manufacturer::Ge | Manufacturer::Philips => {
                info!(
                    "Found {} 3D MRE data in {} (series {})",
                    manufacturer, folder, series
                );
                scan.entries.push(DatasetEntry::with_mag(&folder, series));
            }
            Manufacturer::Siemens => {
                let description_lower = description.to_lowercase();
                if description_lower.ends_with("mag") {
                    pending.attach_mag(&mut scan.entries, &folder, series);
                } else if description_lower.ends_with("p_p") {
                    pending.attach_phase(&mut scan.entries, &folder, series);
                } else {
                    warn!(
                        "Siemens-like data found in {} but no mag or phase identified",
                        folder
                    );
                }
            }
            Manufacturer::Unknown => {}
        }
    }

    info!(
        "Found {} 3D MRE dataset(s) in {}",
        scan.entries.len(),
        top_dir.display()
    );
    Ok(scan)
}

/// Counts the DICOM files in a series folder and keeps one parsed object
///
/// In rapid mode the first file stands in for the folder and every file
/// is counted; a folder whose first file does not parse is treated as
/// empty. In careful mode every file is parsed, the last parseable one
/// is kept, and a count mismatch is logged.
fn count_dicom_files(folder: &Path, mode: ScanMode) -> Result<(usize, Option<MetaObject>)> {
    let files = sorted_files(folder)?;
    match mode {
        ScanMode::Rapid => {
            let Some(first) = files.first() else {
                return Ok((0, None));
            };
            match open_dicom_meta(first) {
                Ok(dcm) => Ok((files.len(), Some(dcm))),
                Err(_) => Ok((0, None)),
            }
        }
        ScanMode::Careful => {
            let mut parsed = 0usize;
            let mut representative = None;
            for file in &files {
                if let Ok(dcm) = open_dicom_meta(file) {
                    parsed += 1;
                    representative = Some(dcm);
                }
            }
            if parsed != files.len() {
                warn!(
                    "Parsed {} DICOM files but found {} total files in {}",
                    parsed,
                    files.len(),
                    folder.display()
                );
            }
            Ok((parsed, representative))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use dicom_object::FileMetaTableBuilder;
    use std::fs::{create_dir_all, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_series_file(path: &Path, description: &str, vendor: &str, series: i32) {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from(description),
        ));
        dcm.put(DataElement::new(
            MANUFACTURER,
            VR::LO,
            PrimitiveValue::from(vendor),
        ));
        dcm.put(DataElement::new(
            SERIES_NUMBER,
            VR::IS,
            PrimitiveValue::from(series.to_string()),
        ));

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

    fn fill_series_folder(
        dir: &Path,
        description: &str,
        vendor: &str,
        series: i32,
        n_files: usize,
    ) {
        create_dir_all(dir).unwrap();
        write_series_file(&dir.join("im0.dcm"), description, vendor, series);
        for i in 1..n_files {
            // Padding files only need to exist for rapid counting
            File::create(dir.join(format!("im{}.dcm", i))).unwrap();
        }
    }

    #[test]
    fn test_scan_finds_ge_dataset() {
        let temp_dir = TempDir::new().unwrap();
        fill_series_folder(
            &temp_dir.path().join("4"),
            "MRE liver",
            "GE MEDICAL SYSTEMS",
            5,
            850,
        );

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert_eq!(scan.manufacturer, Manufacturer::Ge);
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.entries[0].mag.as_deref(), Some("4"));
        assert_eq!(scan.entries[0].mag_series, Some(5));
        assert_eq!(scan.entries[0].phase, None);
    }

    #[test]
    fn test_scan_rejects_small_ge_series() {
        let temp_dir = TempDir::new().unwrap();
        fill_series_folder(
            &temp_dir.path().join("4"),
            "MRE something",
            "GE MEDICAL SYSTEMS",
            5,
            700,
        );

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert!(scan.is_empty());
    }

    #[test]
    fn test_scan_pairs_siemens_halves() {
        let temp_dir = TempDir::new().unwrap();
        fill_series_folder(&temp_dir.path().join("a"), "928-3D-mag", "SIEMENS", 12, 3);
        fill_series_folder(&temp_dir.path().join("b"), "928-3D-p_p", "SIEMENS", 13, 3);

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert_eq!(scan.manufacturer, Manufacturer::Siemens);
        assert_eq!(scan.entries.len(), 1);
        let entry = &scan.entries[0];
        assert_eq!(entry.mag.as_deref(), Some("a"));
        assert_eq!(entry.mag_series, Some(12));
        assert_eq!(entry.phase.as_deref(), Some("b"));
        assert_eq!(entry.phase_series, Some(13));
        assert!(entry.is_complete(Manufacturer::Siemens));
    }

    #[test]
    fn test_scan_pairs_siemens_phase_seen_first() {
        let temp_dir = TempDir::new().unwrap();
        // Sorted folder order visits the phase half before the magnitude half
        fill_series_folder(&temp_dir.path().join("a"), "928-3D-p_p", "SIEMENS", 13, 3);
        fill_series_folder(&temp_dir.path().join("b"), "928-3D-mag", "SIEMENS", 12, 3);

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert_eq!(scan.entries.len(), 1);
        let entry = &scan.entries[0];
        assert_eq!(entry.mag.as_deref(), Some("b"));
        assert_eq!(entry.phase.as_deref(), Some("a"));
    }

    #[test]
    fn test_scan_keeps_unpaired_siemens_half() {
        let temp_dir = TempDir::new().unwrap();
        fill_series_folder(&temp_dir.path().join("a"), "928-3D-mag", "SIEMENS", 12, 3);
        // Series 20 does not complete series 12
        fill_series_folder(&temp_dir.path().join("b"), "928-3D-p_p", "SIEMENS", 20, 3);

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert_eq!(scan.entries.len(), 2);
        assert!(!scan.entries[0].is_complete(Manufacturer::Siemens));
        assert!(!scan.entries[1].is_complete(Manufacturer::Siemens));
    }

    #[test]
    fn test_scan_skips_folders_without_required_tags() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("4");
        create_dir_all(&folder).unwrap();

        // Missing Manufacturer
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from("MRE liver"),
        ));
        let file_obj = dcm
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax("1.2.840.10008.1.2.1")
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
                    .media_storage_sop_instance_uid("1.2.3.4"),
            )
            .unwrap();
        file_obj.write_to_file(folder.join("im0.dcm")).unwrap();

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert!(scan.is_empty());
        assert_eq!(scan.manufacturer, Manufacturer::Unknown);
    }

    #[test]
    fn test_scan_skips_inversion_output_folders() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("out");
        create_dir_all(&folder).unwrap();

        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from("MRE liver"),
        ));
        dcm.put(DataElement::new(
            MANUFACTURER,
            VR::LO,
            PrimitiveValue::from("GE MEDICAL SYSTEMS"),
        ));
        dcm.put(DataElement::new(
            SERIES_NUMBER,
            VR::IS,
            PrimitiveValue::from("9"),
        ));
        dcm.put(DataElement::new(
            SEQUENCE_NAME,
            VR::SH,
            PrimitiveValue::from("3d-mmdi"),
        ));
        let file_obj = dcm
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax("1.2.840.10008.1.2.1")
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
                    .media_storage_sop_instance_uid("1.2.3.4"),
            )
            .unwrap();
        file_obj.write_to_file(folder.join("im0.dcm")).unwrap();
        for i in 1..900 {
            File::create(folder.join(format!("im{}.dcm", i))).unwrap();
        }

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert!(scan.is_empty());
    }

    #[test]
    fn test_careful_mode_counts_only_parseable_files() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("4");
        create_dir_all(&folder).unwrap();
        write_series_file(&folder.join("im0.dcm"), "liver study", "Philips", 7);
        write_series_file(&folder.join("im1.dcm"), "liver study", "Philips", 7);
        let mut junk = File::create(folder.join("notes.txt")).unwrap();
        junk.write_all(b"not a dicom").unwrap();

        // 2 parseable files is far below the Philips threshold
        let careful = scan_datasets(temp_dir.path(), ScanMode::Careful).unwrap();
        assert!(careful.is_empty());

        let (count, representative) = count_dicom_files(&folder, ScanMode::Careful).unwrap();
        assert_eq!(count, 2);
        assert!(representative.is_some());
    }

    #[test]
    fn test_rapid_mode_counts_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("4");
        fill_series_folder(&folder, "liver study", "Philips", 7, 300);

        let (count, _) = count_dicom_files(&folder, ScanMode::Rapid).unwrap();
        assert_eq!(count, 300);

        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert_eq!(scan.manufacturer, Manufacturer::Philips);
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.entries[0].mag_series, Some(7));
    }

    #[test]
    fn test_scan_of_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scan = scan_datasets(temp_dir.path(), ScanMode::Rapid).unwrap();
        assert!(scan.is_empty());
    }
}
