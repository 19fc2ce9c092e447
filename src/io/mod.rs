//! Grid layer persistence.

mod layer_format;
mod store;

pub use layer_format::{
    LayerMetadata, load_layer, read_layer, read_metadata, save_layer, write_layer, write_metadata,
};
pub use store::{FileGridStore, GridStore, LayerKind, LoadedLayer};
