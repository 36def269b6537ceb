//! The six exported resource categories, in run order.

use super::enumerated::{map_keys, search_hit_ids, EnumeratedExporter};
use super::fixed::FixedExporter;
use super::ResourceExporter;

pub fn templates() -> EnumeratedExporter {
    EnumeratedExporter {
        category: "templates",
        collection_path: "_template",
        collection_file: "templates_all.json",
        list_file: "templates_list.txt",
        item_path: "_template",
        item_prefix: "template",
        member_names: map_keys,
    }
}

pub fn pipelines() -> EnumeratedExporter {
    EnumeratedExporter {
        category: "pipelines",
        collection_path: "_ingest/pipeline",
        collection_file: "pipelines_all.json",
        list_file: "pipelines_list.txt",
        item_path: "_ingest/pipeline",
        item_prefix: "pipeline",
        member_names: map_keys,
    }
}

pub fn security() -> FixedExporter {
    FixedExporter {
        category: "security",
        resources: &[
            ("_security/user", "security_user.json"),
            ("_security/privilege", "security_privilege.json"),
            ("_security/role", "security_role.json"),
            ("_security/api_key", "security_apikey.json"),
        ],
    }
}

pub fn transforms() -> FixedExporter {
    FixedExporter {
        category: "transforms",
        resources: &[("_transform", "transforms.json")],
    }
}

pub fn usage() -> FixedExporter {
    FixedExporter {
        category: "usage",
        resources: &[("_xpack/usage", "xpack_usage.json")],
    }
}

/// Watches are enumerated through a search on the `.watches` index
pub fn watches() -> EnumeratedExporter {
    EnumeratedExporter {
        category: "watches",
        collection_path: ".watches/_search",
        collection_file: "watches_search.json",
        list_file: "watches_list.txt",
        item_path: "_watcher/watch",
        item_prefix: "watch",
        member_names: search_hit_ids,
    }
}

pub fn default_exporters() -> Vec<Box<dyn ResourceExporter>> {
    vec![
        Box::new(templates()),
        Box::new(pipelines()),
        Box::new(security()),
        Box::new(transforms()),
        Box::new(usage()),
        Box::new(watches()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let order: Vec<String> = default_exporters()
            .iter()
            .map(|e| e.category().to_string())
            .collect();
        assert_eq!(
            order,
            vec!["templates", "pipelines", "security", "transforms", "usage", "watches"]
        );
    }
}
