#![forbid(unsafe_code)]

use crate::bitmap::BitVec;
use crate::types::{ElementType, TypeCategory};
use std::sync::Arc;
use thiserror::Error;

/// Contiguous, typed column storage: one `Vec` per physical element type.
///
/// Strings are reference-counted slices so scan outputs can reuse input
/// strings without copying their bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Utf8(Vec<Arc<str>>),
}

macro_rules! for_each_column_data {
    ($self:expr, $values:pat => $body:expr) => {
        match $self {
            ColumnData::Int8($values) => $body,
            ColumnData::Int16($values) => $body,
            ColumnData::Int32($values) => $body,
            ColumnData::Int64($values) => $body,
            ColumnData::UInt8($values) => $body,
            ColumnData::UInt16($values) => $body,
            ColumnData::UInt32($values) => $body,
            ColumnData::UInt64($values) => $body,
            ColumnData::Float32($values) => $body,
            ColumnData::Float64($values) => $body,
            ColumnData::Utf8($values) => $body,
        }
    };
}

impl ColumnData {
    pub fn len(&self) -> usize {
        for_each_column_data!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ColumnData::Int8(_) => ElementType::Int8,
            ColumnData::Int16(_) => ElementType::Int16,
            ColumnData::Int32(_) => ElementType::Int32,
            ColumnData::Int64(_) => ElementType::Int64,
            ColumnData::UInt8(_) => ElementType::UInt8,
            ColumnData::UInt16(_) => ElementType::UInt16,
            ColumnData::UInt32(_) => ElementType::UInt32,
            ColumnData::UInt64(_) => ElementType::UInt64,
            ColumnData::Float32(_) => ElementType::Float32,
            ColumnData::Float64(_) => ElementType::Float64,
            ColumnData::Utf8(_) => ElementType::Utf8,
        }
    }
}

macro_rules! impl_column_data_from {
    ($($elem:ty => $variant:ident),* $(,)?) => {$(
        impl From<Vec<$elem>> for ColumnData {
            fn from(values: Vec<$elem>) -> Self {
                ColumnData::$variant(values)
            }
        }
    )*};
}

impl_column_data_from!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Arc<str> => Utf8,
);

impl From<Vec<&str>> for ColumnData {
    fn from(values: Vec<&str>) -> Self {
        ColumnData::Utf8(values.into_iter().map(Arc::<str>::from).collect())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnError {
    #[error("validity bitmap has {actual} bits but the column has {expected} rows")]
    ValidityLengthMismatch { expected: usize, actual: usize },
}

/// An owned column: typed values plus an optional validity bitmap.
///
/// An absent bitmap means every row is valid. A present bitmap carries
/// exactly one bit per row (1 = valid).
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    data: ColumnData,
    validity: Option<BitVec>,
}

impl Column {
    /// Build a column, asserting the bitmap invariant.
    ///
    /// Panics if a bitmap is supplied whose length differs from the row
    /// count; use [`Column::try_new`] when the bitmap comes from input that
    /// has not been validated yet.
    pub fn new(data: ColumnData, validity: Option<BitVec>) -> Self {
        if let Some(bitmap) = &validity {
            assert_eq!(
                bitmap.len(),
                data.len(),
                "validity bitmap length must match the row count"
            );
        }
        Self { data, validity }
    }

    pub fn try_new(data: ColumnData, validity: Option<BitVec>) -> Result<Self, ColumnError> {
        if let Some(bitmap) = &validity {
            if bitmap.len() != data.len() {
                return Err(ColumnError::ValidityLengthMismatch {
                    expected: data.len(),
                    actual: bitmap.len(),
                });
            }
        }
        Ok(Self { data, validity })
    }

    /// A column with every row valid.
    pub fn from_data(data: impl Into<ColumnData>) -> Self {
        Self {
            data: data.into(),
            validity: None,
        }
    }

    /// A column whose validity is given as one `bool` per row.
    pub fn from_nullable(data: impl Into<ColumnData>, valid: &[bool]) -> Result<Self, ColumnError> {
        Self::try_new(data.into(), Some(BitVec::from_bools(valid)))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn category(&self) -> TypeCategory {
        self.element_type().category()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn validity(&self) -> Option<&BitVec> {
        self.validity.as_ref()
    }

    pub fn null_count(&self) -> usize {
        self.validity.as_ref().map_or(0, BitVec::count_zeros)
    }

    pub fn has_nulls(&self) -> bool {
        self.null_count() > 0
    }

    /// Whether row `index` holds a value (true when no bitmap is present).
    pub fn is_valid(&self, index: usize) -> bool {
        debug_assert!(index < self.len(), "row index out of bounds");
        self.validity.as_ref().map_or(true, |v| v.get(index))
    }
}
