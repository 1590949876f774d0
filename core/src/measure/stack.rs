use crate::error::{ElastokitError, Result};
use dicom_object::open_file;
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use log::warn;
use ndarray::{s, Array2};
use std::path::{Path, PathBuf};

/// A stack of equally sized grayscale planes loaded from DICOM files
///
/// The first decodable file fixes the plane dimensions. Files that fail
/// to decode or whose dimensions differ contribute all-zero planes, so
/// the stack always has one plane per input path.
#[derive(Debug, Clone)]
pub struct ImageStack {
    planes: Vec<Array2<f64>>,
    rows: usize,
    cols: usize,
}

impl ImageStack {
    /// Loads one plane per path
    ///
    /// # Errors
    ///
    /// Returns an error if none of the files can be decoded
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut decoded: Vec<Option<Array2<f64>>> = Vec::with_capacity(paths.len());
        for path in paths {
            match decode_plane(path) {
                Ok(plane) => decoded.push(Some(plane)),
                Err(e) => {
                    warn!("Could not decode {}: {}", path.display(), e);
                    decoded.push(None);
                }
            }
        }

        let Some((baseline, first)) = decoded
            .iter()
            .enumerate()
            .find_map(|(i, plane)| plane.as_ref().map(|p| (i, p)))
        else {
            return Err(ElastokitError::NoReadableImages(format!(
                "none of {} image files could be decoded",
                paths.len()
            )));
        };
        let (rows, cols) = (first.nrows(), first.ncols());

        let mut planes = Vec::with_capacity(decoded.len());
        for (i, plane) in decoded.into_iter().enumerate() {
            match plane {
                Some(plane) if plane.nrows() == rows && plane.ncols() == cols => {
                    planes.push(plane);
                }
                Some(_) => {
                    warn!(
                        "DICOM image at {} of different dimensions than baseline at {}, skipping",
                        paths[i].display(),
                        paths[baseline].display()
                    );
                    planes.push(Array2::zeros((rows, cols)));
                }
                None => planes.push(Array2::zeros((rows, cols))),
            }
        }

        Ok(Self { planes, rows, cols })
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn plane(&self, i: usize) -> &Array2<f64> {
        &self.planes[i]
    }

    pub fn plane_mut(&mut self, i: usize) -> &mut Array2<f64> {
        &mut self.planes[i]
    }

    /// Maps every nonzero value to 1 and everything else to 0
    pub fn binarized(mut self) -> Self {
        for plane in &mut self.planes {
            plane.mapv_inplace(|v| if v != 0.0 { 1.0 } else { 0.0 });
        }
        self
    }

    /// Scales every plane up by an integer factor, repeating each pixel
    /// into a zoom x zoom block
    pub fn upsampled(self, zoom: usize) -> Self {
        let rows = self.rows * zoom;
        let cols = self.cols * zoom;
        let planes = self
            .planes
            .into_iter()
            .map(|plane| Array2::from_shape_fn((rows, cols), |(r, c)| plane[[r / zoom, c / zoom]]))
            .collect();
        Self { planes, rows, cols }
    }
}

fn decode_plane(path: &Path) -> Result<Array2<f64>> {
    let obj = open_file(path)?;
    let decoded = obj
        .decode_pixel_data()
        .map_err(|e| ElastokitError::DicomError(format!("{}", e)))?;
    // Raw stored values, rescaling is handled by the callers that need it
    let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
    let array = decoded
        .to_ndarray_with_options::<f64>(&options)
        .map_err(|e| ElastokitError::DicomError(format!("{}", e)))?;
    Ok(array.slice(s![0, .., .., 0]).to_owned())
}
