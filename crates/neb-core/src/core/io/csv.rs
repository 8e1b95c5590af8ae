use super::ExportError;
use crate::core::models::image::Image;
use crate::core::models::point;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one row per image: index, kind, reaction coordinate, coordinates, energy.
///
/// Coordinate columns are named `x0`, `x1`, ... after the dimension of the first image.
pub fn write_band<W: Write>(
    writer: W,
    images: &[Image],
    energies: &[f64],
) -> Result<(), ExportError> {
    if images.len() != energies.len() {
        return Err(ExportError::LengthMismatch {
            images: images.len(),
            energies: energies.len(),
        });
    }

    let dimension = images.first().map_or(0, Image::dimension);
    let mut csv = ::csv::Writer::from_writer(writer);

    let mut header = vec![
        "index".to_string(),
        "kind".to_string(),
        "reaction_coordinate".to_string(),
    ];
    header.extend((0..dimension).map(|i| format!("x{}", i)));
    header.push("energy".to_string());
    csv.write_record(&header)?;

    let positions: Vec<_> = images.iter().map(|image| image.position.clone()).collect();
    let coordinates = point::reaction_coordinates(&positions);

    for (index, ((image, energy), s)) in images.iter().zip(energies).zip(coordinates).enumerate() {
        let mut record = vec![index.to_string(), image.kind.to_string(), s.to_string()];
        record.extend(image.position.iter().map(|c| c.to_string()));
        record.push(energy.to_string());
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_band_to_path(
    path: &Path,
    images: &[Image],
    energies: &[f64],
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_band(BufWriter::new(file), images, energies)
}

/// Serializes a sequence of flat records with a header derived from the first one.
pub fn write_records<W, T>(writer: W, records: &[T]) -> Result<(), ExportError>
where
    W: Write,
    T: Serialize,
{
    let mut csv = ::csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_records_to_path<T: Serialize>(path: &Path, records: &[T]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_records(BufWriter::new(file), records)
}
