//! Projection of raw API records onto the three flat table shapes.

use serde_json::Value;
use std::collections::HashSet;

use crate::api::ArtifactRecord;

/// One row of `artifact_metadata`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
    pub id: i64,
    pub title: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    pub century: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub classification: Option<String>,
    pub accessionyear: Option<i64>,
    pub accessionmethod: Option<String>,
}

/// One row of `artifact_media`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRow {
    pub objectid: i64,
    pub imagecount: Option<i64>,
    pub mediacount: Option<i64>,
    pub colorcount: i64,
    pub rank: Option<i64>,
    pub datebegin: Option<i64>,
    pub dateend: Option<i64>,
}

/// One row of `artifact_colors`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRow {
    pub objectid: i64,
    pub color: Option<String>,
    pub spectrum: Option<String>,
    pub hue: Option<String>,
    pub percent: Option<f64>,
    pub css3: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FlattenedBatch {
    pub metadata: Vec<MetadataRow>,
    pub media: Vec<MediaRow>,
    pub colors: Vec<ColorRow>,
}

/// The first staged record's three projections, for the preview pane.
pub struct SampleRecord<'a> {
    pub metadata: &'a MetadataRow,
    pub media: Option<&'a MediaRow>,
    pub colors: Vec<&'a ColorRow>,
}

impl FlattenedBatch {
    pub fn sample(&self) -> Option<SampleRecord<'_>> {
        let metadata = self.metadata.first()?;
        let media = self.media.iter().find(|m| m.objectid == metadata.id);
        let colors = self
            .colors
            .iter()
            .filter(|c| c.objectid == metadata.id)
            .collect();
        Some(SampleRecord {
            metadata,
            media,
            colors,
        })
    }
}

/// Flatten raw records into the three table shapes.
///
/// Records without an integer-coercible `id` are skipped. Metadata rows
/// are deduplicated by id within the batch (first occurrence wins);
/// media and color rows are kept as-is.
pub fn flatten_records(records: &[ArtifactRecord], fallback_classification: &str) -> FlattenedBatch {
    let mut batch = FlattenedBatch::default();
    let mut seen_ids: HashSet<i64> = HashSet::new();

    for record in records {
        let Some(oid) = coerce_id(record.id.as_ref()) else {
            continue;
        };

        if seen_ids.insert(oid) {
            batch.metadata.push(MetadataRow {
                id: oid,
                title: record.title.clone(),
                culture: record.culture.clone(),
                period: record.period.clone(),
                century: record.century.clone(),
                medium: record.medium.clone(),
                dimensions: record.dimensions.clone(),
                description: record
                    .description
                    .clone()
                    .or_else(|| record.labeltext.clone())
                    .or_else(|| record.creditline.clone()),
                department: record.department.clone(),
                classification: record
                    .classification
                    .clone()
                    .or_else(|| Some(fallback_classification.to_string())),
                accessionyear: coerce_number(record.accessionyear.as_ref()),
                accessionmethod: record.accessionmethod.clone(),
            });
        }

        let color_entries = record.colors.as_deref().unwrap_or_default();

        batch.media.push(MediaRow {
            objectid: oid,
            imagecount: record.imagecount,
            mediacount: record.mediacount.or(record.imagecount),
            colorcount: color_entries.len() as i64,
            rank: record.rank,
            datebegin: record.datebegin,
            dateend: record.dateend,
        });

        for entry in color_entries {
            batch.colors.push(ColorRow {
                objectid: oid,
                color: entry.color.clone(),
                spectrum: entry.spectrum.clone(),
                hue: entry.hue.clone(),
                percent: entry.percent,
                css3: entry
                    .css3
                    .clone()
                    .or_else(|| entry.closest_palette_color_parent.clone()),
            });
        }
    }

    batch
}

/// Coerce a record id to an integer. Accepts non-negative JSON integers
/// and strings of ASCII digits; everything else is rejected.
fn coerce_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().filter(|v| *v >= 0),
        Value::String(s) => {
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Lenient numeric coercion for fields the API serves as either numbers
/// or strings (accession year). Non-numeric input becomes None.
fn coerce_number(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ColorEntry;
    use serde_json::json;

    fn record(id: Value) -> ArtifactRecord {
        ArtifactRecord {
            id: Some(id),
            ..Default::default()
        }
    }

    #[test]
    fn test_coerce_id() {
        assert_eq!(coerce_id(Some(&json!(1234))), Some(1234));
        assert_eq!(coerce_id(Some(&json!("1234"))), Some(1234));
        assert_eq!(coerce_id(Some(&json!("12a4"))), None);
        assert_eq!(coerce_id(Some(&json!(""))), None);
        assert_eq!(coerce_id(Some(&json!(12.5))), None);
        assert_eq!(coerce_id(Some(&json!(-3))), None);
        assert_eq!(coerce_id(Some(&json!(null))), None);
        assert_eq!(coerce_id(None), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some(&json!(1943))), Some(1943));
        assert_eq!(coerce_number(Some(&json!("1943"))), Some(1943));
        assert_eq!(coerce_number(Some(&json!(1943.0))), Some(1943));
        assert_eq!(coerce_number(Some(&json!("unknown"))), None);
        assert_eq!(coerce_number(None), None);
    }

    #[test]
    fn test_records_without_valid_id_are_skipped() {
        let records = vec![
            record(json!(1)),
            record(json!("not-a-number")),
            ArtifactRecord::default(),
            record(json!("2")),
        ];

        let batch = flatten_records(&records, "Coins");
        let ids: Vec<i64> = batch.metadata.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(batch.media.len(), 2);
    }

    #[test]
    fn test_description_fallback_chain() {
        let mut r = record(json!(1));
        r.labeltext = Some("label".to_string());
        r.creditline = Some("credit".to_string());
        let batch = flatten_records(&[r.clone()], "Coins");
        assert_eq!(batch.metadata[0].description.as_deref(), Some("label"));

        r.labeltext = None;
        let batch = flatten_records(&[r.clone()], "Coins");
        assert_eq!(batch.metadata[0].description.as_deref(), Some("credit"));

        r.description = Some("primary".to_string());
        let batch = flatten_records(&[r], "Coins");
        assert_eq!(batch.metadata[0].description.as_deref(), Some("primary"));
    }

    #[test]
    fn test_classification_falls_back_to_requested() {
        let mut with_own = record(json!(1));
        with_own.classification = Some("Sculpture".to_string());
        let without = record(json!(2));

        let batch = flatten_records(&[with_own, without], "Coins");
        assert_eq!(
            batch.metadata[0].classification.as_deref(),
            Some("Sculpture")
        );
        assert_eq!(batch.metadata[1].classification.as_deref(), Some("Coins"));
    }

    #[test]
    fn test_mediacount_falls_back_to_imagecount() {
        let mut r = record(json!(1));
        r.imagecount = Some(4);
        let batch = flatten_records(&[r], "Coins");
        assert_eq!(batch.media[0].mediacount, Some(4));

        let mut r = record(json!(2));
        r.imagecount = Some(4);
        r.mediacount = Some(7);
        let batch = flatten_records(&[r], "Coins");
        assert_eq!(batch.media[0].mediacount, Some(7));
    }

    #[test]
    fn test_colorcount_and_color_rows() {
        let mut r = record(json!(9));
        r.colors = Some(vec![
            ColorEntry {
                color: Some("#c8c8c8".to_string()),
                hue: Some("Grey".to_string()),
                percent: Some(0.62),
                css3: Some("#c0c0c0".to_string()),
                ..Default::default()
            },
            ColorEntry {
                color: Some("#964b00".to_string()),
                hue: Some("Brown".to_string()),
                percent: Some(0.38),
                closest_palette_color_parent: Some("brown".to_string()),
                ..Default::default()
            },
        ]);

        let batch = flatten_records(&[r], "Coins");
        assert_eq!(batch.media[0].colorcount, 2);
        assert_eq!(batch.colors.len(), 2);
        assert_eq!(batch.colors[0].objectid, 9);
        assert_eq!(batch.colors[0].css3.as_deref(), Some("#c0c0c0"));
        // css3 falls back to the closest palette parent when absent.
        assert_eq!(batch.colors[1].css3.as_deref(), Some("brown"));
    }

    #[test]
    fn test_metadata_deduplicated_media_not() {
        let records = vec![record(json!(5)), record(json!(5))];
        let batch = flatten_records(&records, "Coins");
        assert_eq!(batch.metadata.len(), 1);
        assert_eq!(batch.media.len(), 2);
    }

    #[test]
    fn test_sample_gathers_related_rows() {
        let mut a = record(json!(1));
        a.colors = Some(vec![ColorEntry::default(), ColorEntry::default()]);
        let b = record(json!(2));

        let batch = flatten_records(&[a, b], "Coins");
        let sample = batch.sample().unwrap();
        assert_eq!(sample.metadata.id, 1);
        assert_eq!(sample.media.unwrap().objectid, 1);
        assert_eq!(sample.colors.len(), 2);
    }
}
