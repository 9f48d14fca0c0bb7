// Node table column layout. Local to one view instance: it never enters
// the store and starts from the defaults every session.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Narrowest a column may be resized to.
pub const MIN_COLUMN_WIDTH: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ColumnKey {
    NodeId,
    Ps,
    Add,
    Port,
    Delay,
    Speed,
    Connectivity,
    Net,
    Tls,
    Subs,
}

impl ColumnKey {
    pub fn default_width(self) -> u32 {
        match self {
            Self::NodeId => 50,
            Self::Ps => 300,
            Self::Add | Self::Subs => 100,
            Self::Port
            | Self::Delay
            | Self::Speed
            | Self::Connectivity
            | Self::Net
            | Self::Tls => 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub width: u32,
}

/// Ordered `{key, width}` sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<Column>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            columns: ColumnKey::iter()
                .map(|key| Column {
                    key,
                    width: key.default_width(),
                })
                .collect(),
        }
    }
}

impl ColumnLayout {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn width(&self, key: ColumnKey) -> Option<u32> {
        self.columns.iter().find(|c| c.key == key).map(|c| c.width)
    }

    /// Set the width of `key`, clamped to [`MIN_COLUMN_WIDTH`]. Returns
    /// the width actually applied.
    pub fn resize(&mut self, key: ColumnKey, width: u32) -> u32 {
        let width = width.max(MIN_COLUMN_WIDTH);
        if let Some(col) = self.columns.iter_mut().find(|c| c.key == key) {
            col.width = width;
        }
        width
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
