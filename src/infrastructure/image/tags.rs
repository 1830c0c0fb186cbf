//! EXIF tag decoding

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};

use crate::domain::{DomainError, ExifFields};

/// Reads the tags of an image file
///
/// An image without an EXIF block yields empty fields. Any other failure,
/// including unsupported or corrupt files, is an internal error.
pub fn read_exif_fields(path: &Path) -> Result<ExifFields, DomainError> {
    let file = File::open(path)
        .map_err(|e| DomainError::internal(format!("Failed to open image: {}", e)))?;
    let mut reader = BufReader::new(file);

    match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(fields_from(&exif)),
        Err(exif::Error::NotFound(_)) => Ok(ExifFields::default()),
        Err(e) => Err(DomainError::internal(format!("Failed to read EXIF: {}", e))),
    }
}

fn fields_from(exif: &Exif) -> ExifFields {
    ExifFields {
        make: ascii(exif, Tag::Make),
        model: ascii(exif, Tag::Model),
        lens_model: ascii(exif, Tag::LensModel),
        lens_make: ascii(exif, Tag::LensMake),
        f_number: rational(exif, Tag::FNumber),
        exposure_time: rational(exif, Tag::ExposureTime),
        iso: uint(exif, Tag::PhotographicSensitivity),
        focal_length: rational(exif, Tag::FocalLength),
        date_time_original: ascii(exif, Tag::DateTimeOriginal)
            .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y:%m:%d %H:%M:%S").ok()),
        gps_latitude: coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, 'S'),
        gps_longitude: coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, 'W'),
        width: uint(exif, Tag::PixelXDimension).or_else(|| uint(exif, Tag::ImageWidth)),
        height: uint(exif, Tag::PixelYDimension).or_else(|| uint(exif, Tag::ImageLength)),
    }
}

fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;

    match &field.value {
        Value::Ascii(parts) => parts.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => None,
    }
}

fn rational(exif: &Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;

    match &field.value {
        Value::Rational(values) => values
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| r.to_f64()),
        Value::SRational(values) => values
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| r.to_f64()),
        _ => None,
    }
}

fn uint(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)?.value.get_uint(0)
}

/// Degrees/minutes/seconds to signed decimal degrees
fn coordinate(exif: &Exif, tag: Tag, reference: Tag, negative: char) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;

    let dms = match &field.value {
        Value::Rational(values) if values.len() >= 3 && values.iter().all(|r| r.denom != 0) => {
            values
        }
        _ => return None,
    };

    let degrees = dms[0].to_f64() + dms[1].to_f64() / 60.0 + dms[2].to_f64() / 3600.0;

    let is_negative = ascii(exif, reference)
        .and_then(|r| r.chars().next())
        .is_some_and(|c| c.eq_ignore_ascii_case(&negative));

    Some(if is_negative { -degrees } else { degrees })
}
