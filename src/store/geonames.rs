//! GeoNames dump loader for the in-memory store.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::models::{FeatureClass, GeoPoint, PlaceRecord};

//schema (tab separated, no header)

//0 geonameid  1 name  2 asciiname  3 alternatenames  4 latitude  5 longitude
//6 feature class  7 feature code  8 country code  9 cc2  10 admin1 code
//11 admin2 code  12 admin3 code  13 admin4 code  14 population  15 elevation
//16 dem  17 timezone  18 modification date
const MIN_COLUMNS: usize = 15;

/// Load records from a GeoNames dump (`allCountries.txt`, optionally `.gz`)
pub fn load_geonames(path: &Path) -> Result<Vec<PlaceRecord>> {
    info!("Loading GeoNames records from {}", path.display());

    let file = File::open(path).context("Failed to open GeoNames dump")?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    parse_geonames(reader)
}

/// Parse GeoNames rows from any reader.
///
/// Rows without a known feature class or with unparsable coordinates are
/// skipped and counted.
pub fn parse_geonames<R: Read>(reader: R) -> Result<Vec<PlaceRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in csv_reader.records() {
        let row = result.context("Failed to read GeoNames row")?;
        match parse_row(&row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} GeoNames rows without class or coordinates", skipped);
    }
    info!("Loaded {} GeoNames records", records.len());
    Ok(records)
}

fn parse_row(row: &StringRecord) -> Option<PlaceRecord> {
    if row.len() < MIN_COLUMNS {
        return None;
    }

    let external_id: i64 = row[0].parse().ok()?;
    let lat: f64 = row[4].parse().ok()?;
    let lon: f64 = row[5].parse().ok()?;
    let coordinate = GeoPoint::new(lat, lon);
    if !coordinate.is_valid() {
        return None;
    }
    let feature_class = FeatureClass::from_code(&row[6])?;

    let mut record = PlaceRecord::new(
        external_id,
        &row[1],
        feature_class,
        &row[7],
        &row[8],
        coordinate,
    );
    record.ascii_name = row[2].to_string();
    record.alternate_names = row[3]
        .split(',')
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect();
    record.admin1_code = non_empty(&row[10]);
    record.admin2_code = non_empty(&row[11]);
    record.admin3_code = non_empty(&row[12]);
    record.admin4_code = non_empty(&row[13]);
    record.population = row[14].parse().ok();
    record.elevation = row.get(15).and_then(|v| v.parse().ok());
    record.timezone = row.get(17).and_then(non_empty);
    record.modified = row
        .get(18)
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok());

    Some(record)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const ROWS: &str = "2867714\tMünchen\tMuenchen\tMunich,Monaco di Baviera\t48.13743\t11.57549\tP\tPPLA\tDE\t\t02\t091\t09162\t09162000\t1260391\t\t524\tEurope/Berlin\t2023-10-04\n\
6559171\tLeopoldpark\tLeopoldpark\t\t48.15985\t11.58438\tL\tPRK\tDE\t\t02\t091\t09162\t09162000\t0\t\t519\tEurope/Berlin\t2015-05-01\n\
1\tBroken\tBroken\t\tnot-a-lat\t11.0\tP\tPPL\tDE\t\t\t\t\t\t0\t\t0\t\t\n\
2\tNo class\tNo class\t\t48.0\t11.0\t\t\tDE\t\t\t\t\t\t0\t\t0\t\t\n";

    #[test]
    fn test_parse_rows() {
        let records = parse_geonames(ROWS.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let munich = &records[0];
        assert_eq!(munich.external_id, 2867714);
        assert_eq!(munich.name, "München");
        assert_eq!(munich.ascii_name, "Muenchen");
        assert_eq!(munich.alternate_names, vec!["Munich", "Monaco di Baviera"]);
        assert_eq!(munich.feature_class, FeatureClass::P);
        assert_eq!(munich.feature_code, "PPLA");
        assert_eq!(munich.admin1_code.as_deref(), Some("02"));
        assert_eq!(munich.admin3_code.as_deref(), Some("09162"));
        assert_eq!(munich.population, Some(1260391));
        assert_eq!(munich.elevation, None);
        assert_eq!(munich.timezone.as_deref(), Some("Europe/Berlin"));
        assert_eq!(munich.modified, NaiveDate::from_ymd_opt(2023, 10, 4));
        assert!(munich.distance.is_none());

        assert_eq!(records[1].feature_class, FeatureClass::L);
    }

    #[test]
    fn test_load_gzipped_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DE.txt.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(ROWS.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let records = load_geonames(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_geonames(Path::new("/nonexistent/allCountries.txt")).is_err());
    }
}
