//! Node id suppliers.
//!
//! The scene treats ids as opaque; it only insists they are unique. The editor asks
//! an [`IdSupplier`] for a fresh one whenever an object is added.

use rand::Rng;

use super::node::NodeId;

/// Hands out identifiers unique for the lifetime of the process.
pub trait IdSupplier {
    fn next_id(&mut self) -> NodeId;
}

/// Random 128-bit ids laid out like a version 4 UUID.
#[derive(Debug, Default)]
pub struct RandomIdSupplier;

impl IdSupplier for RandomIdSupplier {
    fn next_id(&mut self) -> NodeId {
        let mut bits: u128 = rand::rng().random();
        // version 4, RFC 4122 variant
        bits = (bits & !(0xf_u128 << 76)) | (0x4_u128 << 76);
        bits = (bits & !(0x3_u128 << 62)) | (0x2_u128 << 62);

        let hex = format!("{:032x}", bits);
        NodeId::new(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }
}

/// Predictable ids (`node-1`, `node-2`, ...), handy for tests and scripted scenes.
#[derive(Debug)]
pub struct SequentialIdSupplier {
    prefix: String,
    next: u64,
}

impl SequentialIdSupplier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIdSupplier {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdSupplier for SequentialIdSupplier {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_are_uuid_shaped() {
        let mut supplier = RandomIdSupplier;
        let id = supplier.next_id();
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![8, 4, 4, 4, 12]);
        assert!(parts[2].starts_with('4'));
        assert!(matches!(parts[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }

    #[test]
    fn test_random_ids_unique() {
        let mut supplier = RandomIdSupplier;
        let ids: HashSet<NodeId> = (0..1000).map(|_| supplier.next_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_sequential_ids() {
        let mut supplier = SequentialIdSupplier::new("cube");
        assert_eq!(supplier.next_id().as_str(), "cube-1");
        assert_eq!(supplier.next_id().as_str(), "cube-2");
    }
}
