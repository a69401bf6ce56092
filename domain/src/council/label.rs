//! Anonymous response labels and the label → model mapping.

use crate::core::model::ModelId;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Prefix shared by every label key, as it appears in prompts and rankings.
pub const RESPONSE_PREFIX: &str = "Response ";

/// Largest number of responses that can be labelled with a single letter.
pub const MAX_LABELS: usize = 26;

/// Single uppercase letter assigned to a Stage 1 answer by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(char);

impl Label {
    /// Label for the `index`-th collected response (`0 → A`, `1 → B`, ...).
    pub fn for_index(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|i| (*i as usize) < MAX_LABELS)
            .map(|i| Label((b'A' + i) as char))
    }

    pub fn letter(&self) -> char {
        self.0
    }

    /// The key used in prompts and in the mapping, e.g. `"Response A"`.
    pub fn response_key(&self) -> String {
        format!("{}{}", RESPONSE_PREFIX, self.0)
    }

    /// Parse a key of the form `"Response X"`.
    pub fn from_response_key(key: &str) -> Option<Self> {
        let rest = key.strip_prefix(RESPONSE_PREFIX)?;
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Some(Label(c)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from `"Response <Label>"` to the model that wrote the response.
///
/// Built once from the surviving Stage 1 results and read-only afterwards.
/// Serialized as a JSON object in label order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelToModel {
    entries: Vec<(Label, ModelId)>,
}

impl LabelToModel {
    /// Assign labels `A, B, C, ...` to `models` in the given order.
    ///
    /// Models past [`MAX_LABELS`] receive no label.
    pub fn assign<'a>(models: impl IntoIterator<Item = &'a ModelId>) -> Self {
        let entries = models
            .into_iter()
            .enumerate()
            .filter_map(|(i, model)| Label::for_index(i).map(|label| (label, model.clone())))
            .collect();
        Self { entries }
    }

    /// Look up the model behind a `"Response X"` key.
    pub fn get(&self, response_key: &str) -> Option<&ModelId> {
        let label = Label::from_response_key(response_key)?;
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, model)| model)
    }

    /// Reverse lookup: the label assigned to `model`.
    pub fn label_for(&self, model: &ModelId) -> Option<Label> {
        self.entries
            .iter()
            .find(|(_, m)| m == model)
            .map(|(label, _)| *label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &ModelId)> {
        self.entries.iter().map(|(label, model)| (label, model))
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LabelToModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, model) in &self.entries {
            map.serialize_entry(&label.response_key(), model)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelToModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, ModelId>::deserialize(deserializer)?;
        let mut entries = raw
            .into_iter()
            .map(|(key, model)| {
                Label::from_response_key(&key)
                    .map(|label| (label, model))
                    .ok_or_else(|| D::Error::custom(format!("invalid label key '{}'", key)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|(label, _)| *label);
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(ids: &[&str]) -> Vec<ModelId> {
        ids.iter().map(|s| ModelId::from(*s)).collect()
    }

    #[test]
    fn test_labels_follow_input_order() {
        let ids = models(&["m/one", "m/two", "m/three"]);
        let mapping = LabelToModel::assign(&ids);

        assert_eq!(mapping.len(), 3);
        let letters: Vec<char> = mapping.labels().map(|l| l.letter()).collect();
        assert_eq!(letters, vec!['A', 'B', 'C']);
        assert_eq!(mapping.get("Response A"), Some(&ids[0]));
        assert_eq!(mapping.get("Response C"), Some(&ids[2]));
        assert_eq!(mapping.get("Response D"), None);
    }

    #[test]
    fn test_reverse_lookup() {
        let ids = models(&["m/one", "m/two"]);
        let mapping = LabelToModel::assign(&ids);
        assert_eq!(mapping.label_for(&ids[1]).map(|l| l.letter()), Some('B'));
        assert_eq!(mapping.label_for(&ModelId::from("m/none")), None);
    }

    #[test]
    fn test_label_bounds() {
        assert_eq!(Label::for_index(0).map(|l| l.letter()), Some('A'));
        assert_eq!(Label::for_index(25).map(|l| l.letter()), Some('Z'));
        assert_eq!(Label::for_index(26), None);
    }

    #[test]
    fn test_response_key_parsing() {
        assert_eq!(
            Label::from_response_key("Response B").map(|l| l.letter()),
            Some('B')
        );
        assert_eq!(Label::from_response_key("Response b"), None);
        assert_eq!(Label::from_response_key("Response AB"), None);
        assert_eq!(Label::from_response_key("Answer A"), None);
    }

    #[test]
    fn test_serializes_as_object() {
        let mapping = LabelToModel::assign(&models(&["m/one", "m/two"]));
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Response A": "m/one", "Response B": "m/two"})
        );

        let back: LabelToModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, mapping);
    }
}
