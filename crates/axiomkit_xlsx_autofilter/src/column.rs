//! `filterColumn`: criteria applied to one column of an AutoFilter range.
//!
//! A column with no criteria has no `filterColumn` at all, so every instance
//! owns exactly one filter.

use crate::filter::{EnumFilter, ToXmlString, create_filter};
use crate::spec::{AutoFilterError, ColumnReference, EnumFilterKind, SpecFilterColumnOptions};
use crate::util::resolve_col_id;

/// Filter criteria of one AutoFilter column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterColumn {
    col_id: usize,
    hidden_button: bool,
    show_button: bool,
    filter: EnumFilter,
}

impl FilterColumn {
    /// Create a column filter at offset `column_ref` within the AutoFilter range.
    ///
    /// `filter_kind` is checked first, then the column reference, then the
    /// options are applied.
    pub fn new<R: ColumnReference>(
        column_ref: R,
        filter_kind: EnumFilterKind,
        options: SpecFilterColumnOptions,
    ) -> Result<Self, AutoFilterError> {
        Self::new_with(column_ref, filter_kind, options, |_| {})
    }

    /// Like [`Self::new`], then hand the fresh filter to `configure` before returning.
    ///
    /// ```
    /// use axiomkit_xlsx_autofilter::{EnumFilterKind, FilterColumn, SpecFilterColumnOptions};
    ///
    /// let column = FilterColumn::new_with(
    ///     0,
    ///     EnumFilterKind::Filters,
    ///     SpecFilterColumnOptions::default(),
    ///     |filter| {
    ///         if let Some(filters) = filter.as_filters_mut() {
    ///             filters.add_values([1, 2]);
    ///         }
    ///     },
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     column.to_xml(),
    ///     "<filterColumn colId='0' hiddenButton='false' showButton='true'>\
    ///      <filters><filter val='1'/><filter val='2'/></filters></filterColumn>"
    /// );
    /// ```
    pub fn new_with<R, F>(
        column_ref: R,
        filter_kind: EnumFilterKind,
        options: SpecFilterColumnOptions,
        configure: F,
    ) -> Result<Self, AutoFilterError>
    where
        R: ColumnReference,
        F: FnOnce(&mut EnumFilter),
    {
        let filter = create_filter(filter_kind)?;
        let mut column = Self::from_filter(column_ref, filter, options)?;
        configure(&mut column.filter);
        Ok(column)
    }

    /// Build around an already created filter, e.g. one from [`create_filter`].
    ///
    /// Only the column reference can fail here.
    pub fn from_filter<R: ColumnReference>(
        column_ref: R,
        filter: EnumFilter,
        options: SpecFilterColumnOptions,
    ) -> Result<Self, AutoFilterError> {
        let col_id = resolve_col_id(&column_ref)?;

        let mut column = Self {
            col_id,
            hidden_button: false,
            show_button: true,
            filter,
        };
        column.apply_options(&options);

        log::trace!(
            "Created filterColumn colId={} kind={}.",
            column.col_id,
            column.filter.kind()
        );
        Ok(column)
    }

    /// Apply every option that is set, leaving the rest untouched.
    pub fn apply_options(&mut self, options: &SpecFilterColumnOptions) {
        if let Some(hidden_button) = options.hidden_button {
            self.set_hidden_button(hidden_button);
        }
        if let Some(show_button) = options.show_button {
            self.set_show_button(show_button);
        }
    }

    /// Zero-based offset of this column within the AutoFilter range.
    pub fn col_id(&self) -> usize {
        self.col_id
    }

    /// Replace the column offset. A cell reference contributes its column.
    ///
    /// On error the stored id is unchanged.
    pub fn set_col_id<R: ColumnReference>(
        &mut self,
        column_ref: R,
    ) -> Result<usize, AutoFilterError> {
        self.col_id = resolve_col_id(&column_ref)?;
        Ok(self.col_id)
    }

    /// Whether the AutoFilter button of this column is hidden (e.g. under a merged cell).
    pub fn hidden_button(&self) -> bool {
        self.hidden_button
    }

    pub fn set_hidden_button(&mut self, hidden_button: bool) -> bool {
        self.hidden_button = hidden_button;
        hidden_button
    }

    /// Whether the AutoFilter button of this column is drawn.
    pub fn show_button(&self) -> bool {
        self.show_button
    }

    pub fn set_show_button(&mut self, show_button: bool) -> bool {
        self.show_button = show_button;
        show_button
    }

    pub fn filter_kind(&self) -> EnumFilterKind {
        self.filter.kind()
    }

    pub fn filter(&self) -> &EnumFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut EnumFilter {
        &mut self.filter
    }

    /// Serialize into a new string.
    pub fn to_xml(&self) -> String {
        let mut buf = String::new();
        self.to_xml_string(&mut buf);
        buf
    }
}

impl ToXmlString for FilterColumn {
    fn to_xml_string<'a>(&self, buf: &'a mut String) -> &'a mut String {
        buf.push_str(&format!(
            "<filterColumn colId='{}' hiddenButton='{}' showButton='{}'>",
            self.col_id, self.hidden_button, self.show_button
        ));
        self.filter.to_xml_string(buf);
        buf.push_str("</filterColumn>");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::TUP_FILTER_KINDS_ALL;
    use crate::filter::is_filter_kind_supported;
    use crate::spec::SpecCellRef;

    fn build(column_ref: impl ColumnReference) -> Result<FilterColumn, AutoFilterError> {
        FilterColumn::new(
            column_ref,
            EnumFilterKind::Filters,
            SpecFilterColumnOptions::default(),
        )
    }

    #[test]
    fn test_new_keeps_non_negative_col_id() {
        for n_col in [0_usize, 1, 5, 255, 16_383, 1_000_000] {
            assert_eq!(build(n_col).unwrap().col_id(), n_col);
        }
    }

    #[test]
    fn test_new_rejects_reserved_filter_kinds() {
        for kind in TUP_FILTER_KINDS_ALL
            .into_iter()
            .filter(|kind| !is_filter_kind_supported(*kind))
        {
            let err = FilterColumn::new(0, kind, SpecFilterColumnOptions::default()).unwrap_err();
            assert!(matches!(err, AutoFilterError::Restriction { .. }), "{kind}");
        }
    }

    #[test]
    fn test_filter_kind_is_checked_before_col_id() {
        let err = FilterColumn::new(
            -1,
            EnumFilterKind::Top10,
            SpecFilterColumnOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AutoFilterError::Restriction { .. }));
    }

    #[test]
    fn test_new_rejects_negative_col_id() {
        for n_col in [-1_i64, -42, i64::MIN] {
            assert_eq!(
                build(n_col).unwrap_err(),
                AutoFilterError::InvalidColumnId(n_col.to_string())
            );
        }
    }

    #[test]
    fn test_set_col_id_failure_keeps_previous_value() {
        let mut column = build(3).unwrap();
        assert!(column.set_col_id(-7).is_err());
        assert_eq!(column.col_id(), 3);
        assert_eq!(column.set_col_id(9_u32), Ok(9));
        assert_eq!(column.col_id(), 9);
    }

    #[test]
    fn test_cell_reference_contributes_its_column() {
        let column = build(SpecCellRef::new(10, 5)).unwrap();
        assert_eq!(column.col_id(), 5);

        let cell: SpecCellRef = "C4".parse().unwrap();
        let mut column = build(0).unwrap();
        assert_eq!(column.set_col_id(&cell), Ok(2));
    }

    #[test]
    fn test_from_filter_keeps_configured_filter() {
        let mut filter = create_filter(EnumFilterKind::Filters).unwrap();
        if let Some(filters) = filter.as_filters_mut() {
            filters.add_value("x");
        }
        let column = FilterColumn::from_filter(
            2,
            filter.clone(),
            SpecFilterColumnOptions {
                hidden_button: Some(true),
                show_button: None,
            },
        )
        .unwrap();
        assert_eq!(column.filter(), &filter);
        assert!(column.hidden_button());
        assert!(column.show_button());

        assert!(FilterColumn::from_filter(-2, filter, SpecFilterColumnOptions::default()).is_err());
    }

    #[test]
    fn test_button_defaults() {
        let column = build(0).unwrap();
        assert!(!column.hidden_button());
        assert!(column.show_button());
        assert_eq!(column.filter_kind(), EnumFilterKind::Filters);
    }

    #[test]
    fn test_options_are_applied() {
        let column = FilterColumn::new(
            1,
            EnumFilterKind::Filters,
            SpecFilterColumnOptions {
                hidden_button: Some(true),
                show_button: Some(false),
            },
        )
        .unwrap();
        assert!(column.hidden_button());
        assert!(!column.show_button());
        assert_eq!(
            column.to_xml(),
            "<filterColumn colId='1' hiddenButton='true' showButton='false'>\
             <filters></filters></filterColumn>"
        );
    }

    #[test]
    fn test_setters_update_flags() {
        let mut column = build(0).unwrap();
        assert!(column.set_hidden_button(true));
        assert!(!column.set_show_button(false));
        assert!(column.hidden_button());
        assert!(!column.show_button());
    }

    #[test]
    fn test_configure_runs_once_before_return() {
        let mut n_calls = 0;
        let column = FilterColumn::new_with(
            0,
            EnumFilterKind::Filters,
            SpecFilterColumnOptions::default(),
            |filter| {
                n_calls += 1;
                if let Some(filters) = filter.as_filters_mut() {
                    filters.add_values([1, 2]);
                }
            },
        )
        .unwrap();

        assert_eq!(n_calls, 1);
        assert_eq!(
            column.to_xml(),
            "<filterColumn colId='0' hiddenButton='false' showButton='true'>\
             <filters><filter val='1'/><filter val='2'/></filters></filterColumn>"
        );
    }

    #[test]
    fn test_configure_is_skipped_on_error() {
        let mut if_called = false;
        let result = FilterColumn::new_with(
            -1,
            EnumFilterKind::Filters,
            SpecFilterColumnOptions::default(),
            |_| if_called = true,
        );
        assert!(result.is_err());
        assert!(!if_called);
    }

    #[test]
    fn test_to_xml_string_is_idempotent_and_chains() {
        let mut column = build(4).unwrap();
        if let Some(filters) = column.filter_mut().as_filters_mut() {
            filters.add_value("Oslo");
        }

        let mut buf_a = String::new();
        let mut buf_b = String::new();
        column.to_xml_string(&mut buf_a);
        column.to_xml_string(&mut buf_b);
        assert_eq!(buf_a, buf_b);

        let sibling = build(5).unwrap();
        let mut buf = String::from("<autoFilter ref='A1:F9'>");
        sibling
            .to_xml_string(column.to_xml_string(&mut buf))
            .push_str("</autoFilter>");
        assert_eq!(
            buf,
            format!("<autoFilter ref='A1:F9'>{buf_a}{}</autoFilter>", sibling.to_xml())
        );
    }
}
