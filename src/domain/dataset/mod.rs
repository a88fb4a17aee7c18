//! Dataset domain - schema documents, paths and the remote registry seam

mod column_type;
mod path;
mod registry;
mod schema;

pub use column_type::ColumnType;
pub use path::DatasetPath;
pub use registry::{BundleFile, DatasetRegistry, PushReceipt, PushRequest};
pub use schema::{
    DATA_FILE_NAME, LOCAL_SOURCE_TYPES, REMOTE_SOURCE_TYPES, SCHEMA_FILE_NAME, SchemaColumn,
    SemanticLayerSchema, Source, column_hash,
};

#[cfg(test)]
pub use registry::mock;
