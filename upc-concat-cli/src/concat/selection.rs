//! Column selection and validation against a table header

use std::fmt;

use super::Table;

/// Role a selected column plays in the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    OfferId,
    Title,
    ItemName,
    Barcode,
}

impl ColumnRole {
    /// Get display label for prompts and errors
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::OfferId => "offer id",
            ColumnRole::Title => "title",
            ColumnRole::ItemName => "item name",
            ColumnRole::Barcode => "barcode",
        }
    }

    pub fn all_variants() -> &'static [ColumnRole] {
        &[
            ColumnRole::OfferId,
            ColumnRole::Title,
            ColumnRole::ItemName,
            ColumnRole::Barcode,
        ]
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Invalid column selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No column name was given for a role
    MissingSelection { role: ColumnRole },
    /// The selected column does not exist in the input
    MissingColumn { role: ColumnRole, column: String },
    /// One column was selected for two roles
    DuplicateSelection {
        column: String,
        first: ColumnRole,
        second: ColumnRole,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingSelection { role } => {
                write!(f, "no column selected for {}", role)
            }
            ValidationError::MissingColumn { role, column } => {
                write!(f, "{} column '{}' not found in input", role, column)
            }
            ValidationError::DuplicateSelection {
                column,
                first,
                second,
            } => write!(
                f,
                "column '{}' selected for both {} and {}",
                column, first, second
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The four caller-supplied column names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSelection {
    pub offer_id: String,
    pub title: String,
    pub item_name: String,
    pub barcode: String,
}

/// Column indices resolved against a specific table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub offer_id: usize,
    pub title: usize,
    pub item_name: usize,
    pub barcode: usize,
}

impl ColumnSelection {
    pub fn new(
        offer_id: impl Into<String>,
        title: impl Into<String>,
        item_name: impl Into<String>,
        barcode: impl Into<String>,
    ) -> Self {
        ColumnSelection {
            offer_id: offer_id.into(),
            title: title.into(),
            item_name: item_name.into(),
            barcode: barcode.into(),
        }
    }

    /// Column name selected for a role
    pub fn get(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::OfferId => &self.offer_id,
            ColumnRole::Title => &self.title,
            ColumnRole::ItemName => &self.item_name,
            ColumnRole::Barcode => &self.barcode,
        }
    }

    pub fn set(&mut self, role: ColumnRole, column: impl Into<String>) {
        let column = column.into();
        match role {
            ColumnRole::OfferId => self.offer_id = column,
            ColumnRole::Title => self.title = column,
            ColumnRole::ItemName => self.item_name = column,
            ColumnRole::Barcode => self.barcode = column,
        }
    }

    /// Resolve every role to a column index of `table`
    ///
    /// Checks roles in a fixed order and reports the first problem found.
    pub fn resolve(&self, table: &Table) -> Result<ResolvedColumns, ValidationError> {
        let roles = ColumnRole::all_variants();

        for role in roles {
            if self.get(*role).trim().is_empty() {
                return Err(ValidationError::MissingSelection { role: *role });
            }
        }

        for (i, first) in roles.iter().enumerate() {
            for second in &roles[i + 1..] {
                if self.get(*first) == self.get(*second) {
                    return Err(ValidationError::DuplicateSelection {
                        column: self.get(*first).to_string(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        let index = |role: ColumnRole| {
            let column = self.get(role);
            table
                .column_index(column)
                .ok_or_else(|| ValidationError::MissingColumn {
                    role,
                    column: column.to_string(),
                })
        };

        Ok(ResolvedColumns {
            offer_id: index(ColumnRole::OfferId)?,
            title: index(ColumnRole::Title)?,
            item_name: index(ColumnRole::ItemName)?,
            barcode: index(ColumnRole::Barcode)?,
        })
    }
}
