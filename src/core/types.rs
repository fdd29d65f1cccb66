use serde::{Deserialize, Serialize};

/// An item to be grouped: stable id, display name and embedding vector.
///
/// All items passed to one clustering run must share the same embedding
/// dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub embedding: Vec<f64>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, embedding: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            embedding,
        }
    }

    pub fn member(&self) -> Member {
        Member {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The id/name pair that represents an item inside a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

/// A flat cluster as produced by extraction: indices into the item slice.
///
/// `indices` is ascending and always holds at least `min_cluster_size`
/// entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCluster {
    pub id: usize,
    pub indices: Vec<usize>,
}

impl RawCluster {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A cluster with a human-readable name and its members in order.
///
/// Also used for merged clusters, whose members are the concatenation of
/// every source cluster sharing the normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCluster {
    pub id: usize,
    pub name: String,
    pub members: Vec<Member>,
}

impl NamedCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One output row, consumed verbatim by record writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub group_id: usize,
    pub group_name: String,
    pub members_id: Vec<String>,
    pub members_name: Vec<String>,
}

impl From<&NamedCluster> for ClusterRecord {
    fn from(cluster: &NamedCluster) -> Self {
        Self {
            group_id: cluster.id,
            group_name: cluster.name.clone(),
            members_id: cluster.members.iter().map(|m| m.id.clone()).collect(),
            members_name: cluster.members.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_named_cluster_keeps_member_order() {
        let cluster = NamedCluster {
            id: 2,
            name: "Management".into(),
            members: vec![
                Member {
                    id: "b".into(),
                    name: "Operations Lead".into(),
                },
                Member {
                    id: "a".into(),
                    name: "Admin Officer".into(),
                },
            ],
        };

        let record = ClusterRecord::from(&cluster);
        assert_eq!(record.group_id, 2);
        assert_eq!(record.members_id, vec!["b", "a"]);
        assert_eq!(record.members_name, vec!["Operations Lead", "Admin Officer"]);
    }

    #[test]
    fn test_item_member_projection() {
        let item = Item::new("7", "Clinic Nurse", vec![0.0, 1.0]);
        assert_eq!(
            item.member(),
            Member {
                id: "7".into(),
                name: "Clinic Nurse".into()
            }
        );
    }
}
