//! Builds a collapsible file tree from a flat list of paths and keeps its
//! expand and select state consistent when chains of single-child directories
//! are shown as one row.

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
pub mod ext;
pub mod identifiers;
pub mod reconcile;
pub mod session;
pub mod tree;
