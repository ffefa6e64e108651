use crate::foundation::error::{CisError, CisResult};

/// Declared type of a variable's value domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VariableKind {
    /// Continuous floating-point domain.
    #[serde(rename = "float")]
    Float,
    /// Integer domain.
    #[serde(rename = "int")]
    Int,
    /// Categorical string domain; `min`/`max` are ignored.
    #[serde(rename = "string")]
    Str,
}

/// A named value domain shared across images.
///
/// Variables are created at store-setup time and never mutated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variable {
    /// Variable name, unique within its store.
    pub name: String,
    /// Domain type.
    #[serde(rename = "type")]
    pub kind: VariableKind,
    /// Domain minimum (numeric kinds only).
    pub min: f64,
    /// Domain maximum (numeric kinds only).
    pub max: f64,
}

impl Variable {
    /// Construct a variable, validating `min <= max` for numeric kinds.
    pub fn new(name: impl Into<String>, kind: VariableKind, min: f64, max: f64) -> CisResult<Self> {
        let var = Self {
            name: name.into(),
            kind,
            min,
            max,
        };
        var.validate()?;
        Ok(var)
    }

    /// Validate domain invariants.
    pub fn validate(&self) -> CisResult<()> {
        if self.name.trim().is_empty() {
            return Err(CisError::validation("variable name must be non-empty"));
        }
        if self.kind != VariableKind::Str && self.min > self.max {
            return Err(CisError::validation(format!(
                "variable '{}' has min {} > max {}",
                self.name, self.min, self.max
            )));
        }
        Ok(())
    }
}
