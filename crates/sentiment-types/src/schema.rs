//! Field-to-column binding between wire records and model columns.
//!
//! The mapping is an explicit table constructed at startup; loaded model
//! artifacts are validated against it before any request is served.

use serde::{Deserialize, Serialize};

/// Logical type of a model column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Bool,
    Float,
}

/// What a column is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Feature column read at inference time.
    Feature,
    /// Label column, only meaningful during training.
    Label,
    /// Column produced by scoring.
    Output,
}

/// One row of the mapping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Field name on the wire record.
    pub field: &'static str,
    /// Column name inside the model.
    pub column: &'static str,
    /// Expected column type.
    pub column_type: ColumnType,
    /// Role of the column.
    pub role: ColumnRole,
}

/// Explicit table of field → column bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    bindings: Vec<ColumnBinding>,
}

impl ColumnMapping {
    /// Creates a mapping from an explicit list of bindings.
    pub fn new(bindings: Vec<ColumnBinding>) -> Self {
        Self { bindings }
    }

    /// The binding table for `SentimentInput` / `SentimentOutput`.
    pub fn sentiment() -> Self {
        Self::new(vec![
            ColumnBinding {
                field: "SentimentText",
                column: "SentimentText",
                column_type: ColumnType::Text,
                role: ColumnRole::Feature,
            },
            ColumnBinding {
                field: "Sentiment",
                column: "Label",
                column_type: ColumnType::Bool,
                role: ColumnRole::Label,
            },
            ColumnBinding {
                field: "Prediction",
                column: "PredictedLabel",
                column_type: ColumnType::Bool,
                role: ColumnRole::Output,
            },
            ColumnBinding {
                field: "Probability",
                column: "Probability",
                column_type: ColumnType::Float,
                role: ColumnRole::Output,
            },
            ColumnBinding {
                field: "Score",
                column: "Score",
                column_type: ColumnType::Float,
                role: ColumnRole::Output,
            },
        ])
    }

    /// All bindings in declaration order.
    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    /// Model column bound to a record field.
    pub fn column_for(&self, field: &str) -> Option<&'static str> {
        self.bindings
            .iter()
            .find(|b| b.field == field)
            .map(|b| b.column)
    }

    /// Bindings consumed by the model (features and label).
    pub fn inputs(&self) -> impl Iterator<Item = &ColumnBinding> {
        self.bindings.iter().filter(|b| b.role != ColumnRole::Output)
    }

    /// Bindings produced by the model.
    pub fn outputs(&self) -> impl Iterator<Item = &ColumnBinding> {
        self.bindings.iter().filter(|b| b.role == ColumnRole::Output)
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::sentiment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_field_maps_to_label_column() {
        let m = ColumnMapping::sentiment();
        assert_eq!(m.column_for("Sentiment"), Some("Label"));
        assert_eq!(m.column_for("Prediction"), Some("PredictedLabel"));
        assert_eq!(m.column_for("Missing"), None);
    }

    #[test]
    fn inputs_and_outputs_partition_the_table() {
        let m = ColumnMapping::sentiment();
        assert_eq!(m.inputs().count(), 2);
        assert_eq!(m.outputs().count(), 3);
        assert_eq!(m.inputs().count() + m.outputs().count(), m.bindings().len());
    }

    #[test]
    fn column_type_serializes_snake_case() {
        let json = serde_json::to_string(&ColumnType::Float).expect("serialize");
        assert_eq!(json, "\"float\"");
    }
}
