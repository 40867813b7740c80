//! Closed filter-kind registry.
//!
//! Adding a kind means a new [`EnumFilter`] variant plus its `create_filter`
//! arm; `FilterColumn` stays untouched.

use crate::conf::{TUP_FILTER_KINDS_ALLOWED, derive_allowed_text};
use crate::filters::Filters;
use crate::spec::{AutoFilterError, EnumFilterKind};

/// Serialize `self` as a self-contained XML element appended to `buf`.
pub trait ToXmlString {
    /// Append to `buf` and hand the same buffer back for chaining.
    fn to_xml_string<'a>(&self, buf: &'a mut String) -> &'a mut String;
}

/// Concrete filter owned by one `filterColumn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumFilter {
    /// Value-list filter.
    Filters(Filters),
}

impl EnumFilter {
    /// Tag this filter was created from.
    pub fn kind(&self) -> EnumFilterKind {
        match self {
            Self::Filters(_) => EnumFilterKind::Filters,
        }
    }

    pub fn as_filters(&self) -> Option<&Filters> {
        match self {
            Self::Filters(filters) => Some(filters),
        }
    }

    pub fn as_filters_mut(&mut self) -> Option<&mut Filters> {
        match self {
            Self::Filters(filters) => Some(filters),
        }
    }
}

impl ToXmlString for EnumFilter {
    fn to_xml_string<'a>(&self, buf: &'a mut String) -> &'a mut String {
        match self {
            Self::Filters(filters) => filters.to_xml_string(buf),
        }
    }
}

/// Create the empty filter for `kind`; reserved kinds are rejected.
pub fn create_filter(kind: EnumFilterKind) -> Result<EnumFilter, AutoFilterError> {
    match kind {
        EnumFilterKind::Filters => Ok(EnumFilter::Filters(Filters::default())),
        EnumFilterKind::Top10
        | EnumFilterKind::CustomFilters
        | EnumFilterKind::DynamicFilters
        | EnumFilterKind::ColorFilters
        | EnumFilterKind::IconFilters => {
            log::debug!("Rejected unsupported filter kind {kind}.");
            Err(AutoFilterError::Restriction {
                field: "FilterColumn.filter",
                value: kind.to_string(),
                allowed: derive_allowed_text(TUP_FILTER_KINDS_ALLOWED),
            })
        }
    }
}

/// Whether `kind` can be passed to [`create_filter`].
pub fn is_filter_kind_supported(kind: EnumFilterKind) -> bool {
    TUP_FILTER_KINDS_ALLOWED.contains(&kind)
}
