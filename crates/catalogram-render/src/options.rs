use catalogram_core::{ForeignKey, Index, PrimaryKey};

use crate::sanitize::{QuotingRule, non_blank};

/// Caller-selected options for one render pass.
///
/// The `no_*` switches hide optional text. Structure (tables, columns, keys
/// and relationships) is always rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: Option<String>,
    pub quoting: QuotingRule,
    /// Leave table and column remarks out.
    pub no_remarks: bool,
    pub no_foreign_key_names: bool,
    pub no_index_names: bool,
    pub no_primary_key_names: bool,
    /// Number columns by their position in the table.
    pub show_ordinal_numbers: bool,
}

impl RenderOptions {
    pub fn new(title: Option<&str>, quoting: QuotingRule) -> Self {
        Self {
            title: title.map(str::to_string),
            quoting,
            ..Self::default()
        }
    }

    /// Hide every key and index name.
    pub fn portable_names(mut self) -> Self {
        self.no_foreign_key_names = true;
        self.no_index_names = true;
        self.no_primary_key_names = true;
        self
    }

    pub(crate) fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    pub(crate) fn remarks<'t>(&self, remarks: Option<&'t str>) -> Option<&'t str> {
        if self.no_remarks {
            None
        } else {
            non_blank(remarks)
        }
    }

    pub(crate) fn foreign_key_name<'k>(&self, foreign_key: &'k ForeignKey) -> Option<&'k str> {
        if self.no_foreign_key_names {
            None
        } else {
            non_blank(foreign_key.name.as_deref())
        }
    }

    pub(crate) fn index_name<'k>(&self, index: &'k Index) -> Option<&'k str> {
        if self.no_index_names {
            None
        } else {
            non_blank(Some(index.name.as_str()))
        }
    }

    pub(crate) fn primary_key_name<'k>(&self, primary_key: &'k PrimaryKey) -> Option<&'k str> {
        if self.no_primary_key_names {
            None
        } else {
            non_blank(primary_key.name.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_names_read_as_absent() {
        let index = Index {
            name: "IDX_ORDERS_USER".to_string(),
            columns: vec!["USER_ID".to_string()],
            unique: false,
        };
        let options = RenderOptions::default();
        assert_eq!(options.index_name(&index), Some("IDX_ORDERS_USER"));

        let options = RenderOptions::default().portable_names();
        assert_eq!(options.index_name(&index), None);
        assert!(options.no_foreign_key_names && options.no_primary_key_names);
        assert!(!options.no_remarks);
    }

    #[test]
    fn blank_remarks_are_absent() {
        let options = RenderOptions::default();
        assert_eq!(options.remarks(Some("  ")), None);
        assert_eq!(options.remarks(Some("kept")), Some("kept"));

        let options = RenderOptions {
            no_remarks: true,
            ..RenderOptions::default()
        };
        assert_eq!(options.remarks(Some("kept")), None);
    }
}
