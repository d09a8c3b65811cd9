use super::TraitNode;
use crate::nn::LookupParameterId;

/// 查找表（如词向量表）中某一行的副本，形状为[dim, 1]
#[derive(Debug, Clone)]
pub(in crate::nn) struct Lookup {
    table_id: LookupParameterId,
    row: usize,
}

impl Lookup {
    pub(in crate::nn) fn new(table_id: LookupParameterId, row: usize) -> Self {
        Self { table_id, row }
    }

    pub(in crate::nn) fn table_id(&self) -> LookupParameterId {
        self.table_id
    }

    pub(in crate::nn) fn row(&self) -> usize {
        self.row
    }
}

impl TraitNode for Lookup {
    fn name(&self) -> &'static str {
        "Lookup"
    }

    fn is_leaf(&self) -> bool {
        true
    }
}
