//! Typed views of the three JSON stores
//!
//! Loading validates every record up front so that a malformed entry fails
//! with the file and index that caused it instead of surfacing later.

use crate::config::VerifiedFallback;
use crate::error::AppError;
use crate::models::QuestionRecord;
use serde::de::Error as _;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

fn parse_record(file: &Path, index: usize, value: Value) -> Result<QuestionRecord, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::InvalidRecord {
        file: file.to_path_buf(),
        index,
        reason: e.to_string(),
    })
}

fn parse_record_list(file: &Path, value: Value) -> Result<Vec<QuestionRecord>, AppError> {
    let Value::Array(items) = value else {
        return Err(AppError::Json {
            file: file.to_path_buf(),
            source: serde_json::Error::custom("expected a JSON array of question records"),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_record(file, index, item))
        .collect()
}

/// German reference questions, read-only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStore {
    records: Vec<QuestionRecord>,
}

impl SourceStore {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(file: &Path, value: Value) -> Result<Self, AppError> {
        parse_record_list(file, value).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    /// Check that `index` addresses a source question
    pub fn check_index(&self, index: usize) -> Result<(), AppError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(AppError::IndexOutOfRange {
                index,
                total: self.records.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<&QuestionRecord, AppError> {
        self.check_index(index)?;
        Ok(&self.records[index])
    }
}

/// Published translations, index-aligned with the source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VerifiedStore {
    records: Vec<QuestionRecord>,
}

impl VerifiedStore {
    /// Parse the verified file, padding it with placeholders up to `source_len`
    pub fn from_json(file: &Path, value: Value, source_len: usize) -> Result<Self, AppError> {
        let mut records = parse_record_list(file, value)?;
        if records.len() < source_len {
            records.resize_with(source_len, QuestionRecord::placeholder);
        }
        Ok(Self { records })
    }

    /// Records to serve while the verified file does not exist
    pub fn fallback(source: &SourceStore, policy: VerifiedFallback) -> Self {
        let records = match policy {
            VerifiedFallback::Placeholder => vec![QuestionRecord::placeholder(); source.len()],
            VerifiedFallback::Source => source.records().to_vec(),
        };
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.records.get(index)
    }

    /// Overwrite the record at `index`, growing with placeholders if needed
    pub fn set(&mut self, index: usize, record: QuestionRecord) {
        if index >= self.records.len() {
            self.records.resize_with(index + 1, QuestionRecord::placeholder);
        }
        self.records[index] = record;
    }
}

/// Pending community proposals keyed by question index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProposalStore {
    entries: BTreeMap<usize, QuestionRecord>,
}

impl ProposalStore {
    /// Parse the proposals object; every key must be a valid source index
    pub fn from_json(file: &Path, value: Value, source_len: usize) -> Result<Self, AppError> {
        let Value::Object(map) = value else {
            return Err(AppError::Json {
                file: file.to_path_buf(),
                source: serde_json::Error::custom("expected a JSON object of proposals"),
            });
        };

        let mut entries = BTreeMap::new();
        for (key, item) in map {
            let index: usize = key.parse().map_err(|_| AppError::InvalidProposalKey {
                file: file.to_path_buf(),
                key: key.clone(),
                reason: "not a decimal question index".to_string(),
            })?;
            // "01" or "+1" would silently collide with "1"
            if index.to_string() != key {
                return Err(AppError::InvalidProposalKey {
                    file: file.to_path_buf(),
                    key,
                    reason: "non-canonical question index".to_string(),
                });
            }
            if index >= source_len {
                return Err(AppError::InvalidProposalKey {
                    file: file.to_path_buf(),
                    key,
                    reason: format!("outside the {} source questions", source_len),
                });
            }
            entries.insert(index, parse_record(file, index, item)?);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.entries.get(&index)
    }

    /// Insert or replace the proposal for `index`
    pub fn insert(&mut self, index: usize, record: QuestionRecord) -> Option<QuestionRecord> {
        self.entries.insert(index, record)
    }

    pub fn remove(&mut self, index: usize) -> Option<QuestionRecord> {
        self.entries.remove(&index)
    }

    /// Indices with a pending proposal, ascending
    pub fn pending_indices(&self) -> Vec<usize> {
        self.entries.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn file() -> &'static Path {
        Path::new("input_data.json")
    }

    fn record_json(q: &str) -> Value {
        json!({ "question": q, "correct": "ja", "incorrect_1": "nein", "incorrect_2": "vielleicht" })
    }

    #[test]
    fn test_source_parses_in_order() {
        let store = SourceStore::from_json(file(), json!([record_json("Eins?"), record_json("Zwei?")])).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().question, "Zwei?");
    }

    #[test]
    fn test_missing_field_reports_index() {
        let broken = json!({ "question": "Drei?", "correct": "ja", "incorrect_1": "nein" });
        let err = SourceStore::from_json(file(), json!([record_json("Eins?"), broken])).unwrap_err();

        match err {
            AppError::InvalidRecord { index, reason, .. } => {
                assert_eq!(index, 1);
                assert!(reason.contains("incorrect_2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let broken = json!({ "question": 42, "correct": "", "incorrect_1": "", "incorrect_2": "" });
        let err = SourceStore::from_json(file(), json!([broken])).unwrap_err();
        assert!(matches!(err, AppError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_source_must_be_an_array() {
        let err = SourceStore::from_json(file(), json!({ "0": record_json("Eins?") })).unwrap_err();
        assert!(matches!(err, AppError::Json { .. }));
    }

    #[test]
    fn test_index_out_of_range() {
        let store = SourceStore::from_json(file(), json!([record_json("Eins?")])).unwrap();
        assert!(store.check_index(0).is_ok());
        assert!(matches!(
            store.get(1),
            Err(AppError::IndexOutOfRange { index: 1, total: 1 })
        ));
    }

    #[test]
    fn test_short_verified_store_is_padded() {
        let store = VerifiedStore::from_json(file(), json!([record_json("Un ?")]), 3).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0).unwrap().question, "Un ?");
        assert_eq!(store.get(2), Some(&QuestionRecord::placeholder()));
    }

    #[test]
    fn test_verified_fallback_policies() {
        let source = SourceStore::from_json(file(), json!([record_json("Eins?"), record_json("Zwei?")])).unwrap();

        let placeholders = VerifiedStore::fallback(&source, VerifiedFallback::Placeholder);
        assert_eq!(placeholders.len(), 2);
        assert_eq!(placeholders.get(1).unwrap().question, "Traduction manquante...");

        let copied = VerifiedStore::fallback(&source, VerifiedFallback::Source);
        assert_eq!(copied.get(1).unwrap().question, "Zwei?");
    }

    #[test]
    fn test_proposal_keys_are_parsed_and_sorted() {
        let store = ProposalStore::from_json(
            file(),
            json!({ "10": record_json("Dix ?"), "2": record_json("Deux ?") }),
            11,
        )
        .unwrap();
        assert_eq!(store.pending_indices(), vec![2, 10]);
    }

    #[test]
    fn test_proposal_key_must_be_numeric() {
        let err = ProposalStore::from_json(file(), json!({ "deux": record_json("Deux ?") }), 3).unwrap_err();
        assert!(matches!(err, AppError::InvalidProposalKey { ref key, .. } if key == "deux"));
    }

    #[test]
    fn test_non_canonical_proposal_keys_are_rejected() {
        for alias in ["01", "+1"] {
            let err = ProposalStore::from_json(
                file(),
                json!({ "1": record_json("Un ?"), alias: record_json("Encore un ?") }),
                3,
            )
            .unwrap_err();
            assert!(
                matches!(err, AppError::InvalidProposalKey { ref key, ref reason, .. } if key == alias && reason.contains("non-canonical")),
                "alias {alias:?} was accepted"
            );
        }
    }

    #[test]
    fn test_proposal_key_must_be_in_range() {
        let err = ProposalStore::from_json(file(), json!({ "3": record_json("Trois ?") }), 3).unwrap_err();
        assert!(matches!(err, AppError::InvalidProposalKey { ref key, .. } if key == "3"));
    }

    #[test]
    fn test_proposals_serialize_with_string_keys() {
        let mut store = ProposalStore::default();
        store.insert(1, QuestionRecord::new("Un ?", "oui", "non", "peut-être"));

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value, json!({
            "1": { "question": "Un ?", "correct": "oui", "incorrect_1": "non", "incorrect_2": "peut-être" }
        }));
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut proposals = ProposalStore::default();
        proposals.insert(0, QuestionRecord::new("Zéro ?", "a", "b", "c"));
        proposals.insert(2, QuestionRecord::new("Deux ?", "", "", ""));
        let reparsed = ProposalStore::from_json(file(), serde_json::to_value(&proposals).unwrap(), 3).unwrap();
        assert_eq!(reparsed, proposals);

        let mut verified = VerifiedStore::fallback(&SourceStore::default(), VerifiedFallback::Placeholder);
        verified.set(1, QuestionRecord::new("Un ?", "oui", "non", "jamais"));
        let reparsed = VerifiedStore::from_json(file(), serde_json::to_value(&verified).unwrap(), 0).unwrap();
        assert_eq!(reparsed, verified);
    }
}
