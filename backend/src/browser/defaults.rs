use crate::models::node::{Node, NodeType};

const PROCUREMENT_PARTS: usize = 10;

/// Sample lake layout served when no tree source is configured.
pub fn default_tree() -> Vec<Node> {
    let procurement_files = (1..=PROCUREMENT_PARTS)
        .map(|part| {
            Node::new(
                format!("file{part}"),
                format!("finance_africa_data_part{part}.parquet"),
                NodeType::File,
            )
        })
        .collect();

    let finance = Node::new("finance", "Finance", NodeType::Bucket).with_children(vec![
        Node::new("africa", "Africa", NodeType::Region).with_children(vec![
            Node::new("procurement", "Procurement", NodeType::Folder)
                .with_children(procurement_files),
        ]),
        Node::new("sa", "SA", NodeType::Region).with_children(vec![Node::new(
            "reports",
            "Reports",
            NodeType::Folder,
        )]),
    ]);

    vec![
        Node::new("hutchlake", "HutchLake", NodeType::Database).with_children(vec![
            database_pair("sqlserver", "SQL Server", [
                ("northwind", "Northwind"),
                ("adventureworks", "AdventureWorks"),
            ]),
            database_pair("postgres", "PostgreSQL", [
                ("analytics", "Analytics"),
                ("operational", "Operational"),
            ]),
            database_pair("snowflake", "Snowflake", [
                ("datawarehouse", "Data Warehouse"),
                ("datamart", "Data Mart"),
            ]),
            Node::new("s3", "S3", NodeType::Bucket).with_children(vec![
                finance,
                Node::new("sales", "Sales", NodeType::Bucket),
                Node::new("hr", "HR", NodeType::Bucket),
            ]),
            Node::new("adls", "ADLS", NodeType::Bucket),
            Node::new("gcs", "GCS", NodeType::Bucket),
        ]),
    ]
}

fn database_pair(id: &str, name: &str, children: [(&str, &str); 2]) -> Node {
    Node::new(id, name, NodeType::Database).with_children(
        children
            .into_iter()
            .map(|(id, name)| Node::new(id, name, NodeType::Database))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tree_has_a_single_lake_root() {
        let tree = default_tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "HutchLake");
        assert_eq!(tree[0].children.len(), 6);
    }

    #[test]
    fn procurement_folder_holds_ten_parquet_parts() {
        let tree = default_tree();
        let procurement = &tree[0].children[3].children[0].children[0].children[0];
        assert_eq!(procurement.id, "procurement");
        assert_eq!(procurement.children.len(), PROCUREMENT_PARTS);
        assert_eq!(
            procurement.children[9].name,
            "finance_africa_data_part10.parquet"
        );
    }
}
