pub fn docs_dir() -> String {
    "../docs".to_string()
}

pub fn static_dir() -> String {
    "static".to_string()
}

pub fn versioned_docs_dir() -> String {
    "versioned_docs".to_string()
}

pub fn versioned_sidebars_dir() -> String {
    "versioned_sidebars".to_string()
}

pub fn version_command() -> String {
    "yarn run version".to_string()
}
