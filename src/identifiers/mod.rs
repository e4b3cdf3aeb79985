mod identifier_maps;

pub use identifier_maps::IdentifierMaps;
