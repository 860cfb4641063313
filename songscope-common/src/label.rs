//! Display labels for song fields
//!
//! A [`FieldId`] is the raw column name from a data file header; a
//! [`DisplayLabel`] is what the user sees. [`format_label`] derives the label,
//! and [`LabelIndex`] is the only way back from a label to its field.

use std::collections::HashMap;

use crate::{Error, Result};

/// Raw, machine-oriented column identifier (e.g. `danceability`)
pub type FieldId = String;

/// Human-readable label derived from a [`FieldId`] (e.g. `Danceability`)
pub type DisplayLabel = String;

/// Uppercase the first character of a field identifier, leaving the rest unchanged.
///
/// ```
/// use songscope_common::label::format_label;
///
/// assert_eq!(format_label("duration_ms"), "Duration_ms");
/// assert_eq!(format_label(""), "");
/// ```
pub fn format_label(field_id: &str) -> DisplayLabel {
    let mut chars = field_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Bidirectional FieldId <-> DisplayLabel mapping for one loaded matrix
///
/// Built once at load time and never mutated. Order follows the order the
/// field identifiers were supplied in (the matrix header order).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelIndex {
    field_ids: Vec<FieldId>,
    labels: Vec<DisplayLabel>,
    by_label: HashMap<DisplayLabel, usize>,
    by_field: HashMap<FieldId, usize>,
}

impl LabelIndex {
    /// Build an index from field identifiers in display order
    ///
    /// Fails with [`Error::MalformedMatrix`] if two identifiers format to the
    /// same label or the same identifier appears twice.
    pub fn from_field_ids<I, S>(field_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldId>,
    {
        let mut index = LabelIndex {
            field_ids: Vec::new(),
            labels: Vec::new(),
            by_label: HashMap::new(),
            by_field: HashMap::new(),
        };

        for field_id in field_ids {
            let field_id: FieldId = field_id.into();
            let label = format_label(&field_id);
            let position = index.field_ids.len();

            if index.by_field.contains_key(&field_id) {
                return Err(Error::MalformedMatrix(format!(
                    "duplicate field '{}' in header",
                    field_id
                )));
            }
            if let Some(&existing) = index.by_label.get(&label) {
                return Err(Error::MalformedMatrix(format!(
                    "fields '{}' and '{}' share display label '{}'",
                    index.field_ids[existing], field_id, label
                )));
            }

            index.by_label.insert(label.clone(), position);
            index.by_field.insert(field_id.clone(), position);
            index.field_ids.push(field_id);
            index.labels.push(label);
        }

        Ok(index)
    }

    /// Display labels in header order
    pub fn labels(&self) -> &[DisplayLabel] {
        &self.labels
    }

    /// Field identifiers in header order
    pub fn field_ids(&self) -> &[FieldId] {
        &self.field_ids
    }

    pub fn len(&self) -> usize {
        self.field_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_ids.is_empty()
    }

    /// Resolve a display label back to its field identifier
    pub fn resolve(&self, label: &str) -> Result<&str> {
        self.by_label
            .get(label)
            .map(|&i| self.field_ids[i].as_str())
            .ok_or_else(|| Error::UnresolvableLabel(label.to_string()))
    }

    /// Display label for a loaded field identifier
    pub fn label_for(&self, field_id: &str) -> Option<&str> {
        self.by_field.get(field_id).map(|&i| self.labels[i].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_label_capitalizes_first_letter() {
        assert_eq!(format_label("energy"), "Energy");
        assert_eq!(format_label("tempo"), "Tempo");
        assert_eq!(format_label("Energy"), "Energy");
    }

    #[test]
    fn test_format_label_leaves_remainder_untouched() {
        assert_eq!(format_label("duration_ms"), "Duration_ms");
        assert_eq!(format_label("instrumentalNess"), "InstrumentalNess");
    }

    #[test]
    fn test_format_label_non_ascii() {
        assert_eq!(format_label("ärger"), "Ärger");
        assert_eq!(format_label("1st"), "1st");
    }

    #[test]
    fn test_index_round_trip() {
        let fields = ["popularity", "danceability", "energy", "tempo"];
        let index = LabelIndex::from_field_ids(fields).unwrap();

        for field in fields {
            let label = format_label(field);
            assert_eq!(index.resolve(&label).unwrap(), field);
            assert_eq!(index.label_for(field), Some(label.as_str()));
        }
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_index_preserves_order() {
        let index = LabelIndex::from_field_ids(["tempo", "energy", "valence"]).unwrap();
        assert_eq!(index.labels(), &["Tempo", "Energy", "Valence"]);
        assert_eq!(index.field_ids(), &["tempo", "energy", "valence"]);
    }

    #[test]
    fn test_index_rejects_label_collision() {
        let result = LabelIndex::from_field_ids(["energy", "Energy"]);
        assert!(matches!(result, Err(Error::MalformedMatrix(_))));
    }

    #[test]
    fn test_index_rejects_duplicate_field() {
        let result = LabelIndex::from_field_ids(["tempo", "tempo"]);
        assert!(matches!(result, Err(Error::MalformedMatrix(_))));
    }

    #[test]
    fn test_resolve_unknown_label() {
        let index = LabelIndex::from_field_ids(["energy"]).unwrap();
        match index.resolve("Loudness") {
            Err(Error::UnresolvableLabel(label)) => assert_eq!(label, "Loudness"),
            other => panic!("expected UnresolvableLabel, got {:?}", other),
        }
        // Raw field ids are not labels
        assert!(index.resolve("energy").is_err());
    }

    #[test]
    fn test_empty_index() {
        let index = LabelIndex::from_field_ids(Vec::<String>::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.labels().is_empty());
    }
}
