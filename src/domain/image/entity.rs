//! Photograph metadata entity

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_CAMERA: &str = "Unknown Camera";
pub const UNKNOWN_LENS: &str = "Unknown Lens";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Display-ready photo metadata; every field is either a value or its sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub camera: String,
    pub lens: String,
    pub aperture: String,
    pub shutter_speed: String,
    pub iso: String,
    pub focal_length: String,
    pub date_taken: String,
    pub location: String,
    pub dimensions: String,
}

impl ImageMetadata {
    /// Metadata for an image that carries no readable tags
    pub fn unknown() -> Self {
        ExifFields::default().into()
    }
}

/// Raw tag values pulled from an image, before formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifFields {
    pub make: Option<String>,
    pub model: Option<String>,
    pub lens_model: Option<String>,
    pub lens_make: Option<String>,
    pub f_number: Option<f64>,
    /// Exposure time in seconds
    pub exposure_time: Option<f64>,
    pub iso: Option<u32>,
    /// Focal length in millimetres
    pub focal_length: Option<f64>,
    pub date_time_original: Option<NaiveDateTime>,
    /// Signed decimal degrees
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trim_number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;

    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

fn shutter_speed(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }

    if seconds >= 1.0 {
        Some(format!("{}s", trim_number(seconds)))
    } else {
        Some(format!("1/{}", (1.0 / seconds).round()))
    }
}

impl From<ExifFields> for ImageMetadata {
    fn from(fields: ExifFields) -> Self {
        let camera = match (non_blank(fields.make), non_blank(fields.model)) {
            (Some(make), Some(model)) => format!("{} {}", make, model),
            _ => UNKNOWN_CAMERA.to_string(),
        };

        let lens = non_blank(fields.lens_model)
            .or_else(|| non_blank(fields.lens_make))
            .unwrap_or_else(|| UNKNOWN_LENS.to_string());

        let aperture = fields
            .f_number
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| format!("f/{}", trim_number(f)))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let shutter_speed = fields
            .exposure_time
            .and_then(shutter_speed)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let iso = fields
            .iso
            .filter(|iso| *iso > 0)
            .map(|iso| iso.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let focal_length = fields
            .focal_length
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| format!("{}mm", trim_number(f)))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let date_taken = fields
            .date_time_original
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let location = match (fields.gps_latitude, fields.gps_longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                format!("{:.4}, {:.4}", lat, lon)
            }
            _ => UNKNOWN_LOCATION.to_string(),
        };

        let dimensions = match (fields.width, fields.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => format!("{} × {}", w, h),
            _ => UNKNOWN.to_string(),
        };

        Self {
            camera,
            lens,
            aperture,
            shutter_speed,
            iso,
            focal_length,
            date_taken,
            location,
            dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unknown_has_every_sentinel() {
        let metadata = ImageMetadata::unknown();

        assert_eq!(metadata.camera, UNKNOWN_CAMERA);
        assert_eq!(metadata.lens, UNKNOWN_LENS);
        assert_eq!(metadata.aperture, UNKNOWN);
        assert_eq!(metadata.shutter_speed, UNKNOWN);
        assert_eq!(metadata.iso, UNKNOWN);
        assert_eq!(metadata.focal_length, UNKNOWN);
        assert_eq!(metadata.date_taken, UNKNOWN);
        assert_eq!(metadata.location, UNKNOWN_LOCATION);
        assert_eq!(metadata.dimensions, UNKNOWN);
    }

    #[test]
    fn test_full_fields_formatting() {
        let fields = ExifFields {
            make: Some("FUJIFILM".to_string()),
            model: Some("X-T4".to_string()),
            lens_model: Some("XF23mmF1.4 R".to_string()),
            lens_make: Some("FUJIFILM".to_string()),
            f_number: Some(2.8),
            exposure_time: Some(1.0 / 250.0),
            iso: Some(400),
            focal_length: Some(23.0),
            date_time_original: NaiveDate::from_ymd_opt(2023, 9, 14)
                .and_then(|d| d.and_hms_opt(18, 2, 11)),
            gps_latitude: Some(45.464_211),
            gps_longitude: Some(-9.190_336),
            width: Some(6240),
            height: Some(4160),
        };

        let metadata = ImageMetadata::from(fields);

        assert_eq!(metadata.camera, "FUJIFILM X-T4");
        assert_eq!(metadata.lens, "XF23mmF1.4 R");
        assert_eq!(metadata.aperture, "f/2.8");
        assert_eq!(metadata.shutter_speed, "1/250");
        assert_eq!(metadata.iso, "400");
        assert_eq!(metadata.focal_length, "23mm");
        assert_eq!(metadata.date_taken, "2023-09-14");
        assert_eq!(metadata.location, "45.4642, -9.1903");
        assert_eq!(metadata.dimensions, "6240 × 4160");
    }

    #[test]
    fn test_camera_requires_make_and_model() {
        let fields = ExifFields {
            make: Some("Canon".to_string()),
            ..Default::default()
        };

        assert_eq!(ImageMetadata::from(fields).camera, UNKNOWN_CAMERA);
    }

    #[test]
    fn test_lens_falls_back_to_lens_make() {
        let fields = ExifFields {
            lens_model: Some("   ".to_string()),
            lens_make: Some("Sigma".to_string()),
            ..Default::default()
        };

        assert_eq!(ImageMetadata::from(fields).lens, "Sigma");
    }

    #[test]
    fn test_long_exposure() {
        let fields = ExifFields {
            exposure_time: Some(2.5),
            ..Default::default()
        };

        assert_eq!(ImageMetadata::from(fields).shutter_speed, "2.5s");
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(ImageMetadata::unknown()).unwrap();

        assert_eq!(json["shutterSpeed"], UNKNOWN);
        assert_eq!(json["focalLength"], UNKNOWN);
        assert_eq!(json["dateTaken"], UNKNOWN);
    }
}
