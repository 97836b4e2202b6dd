#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

pub use genregex_automata::*;

pub mod patterns;

#[cfg(feature = "dot")]
pub mod render;
