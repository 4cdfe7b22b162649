#![forbid(unsafe_code)]

//! `cld-core` holds the data model of a causal-loop diagram: node ids, nodes, signed edges and
//! the loop/callout/legend annotations drawn around them.
//!
//! Diagrams are assembled with [`DiagramBuilder`] and validated once, before anything is laid
//! out or drawn. Presentation constants live in [`Theme`].

pub mod dataset;
pub mod diagram;
pub mod error;
pub mod geom;
pub mod model;
pub mod theme;

pub use diagram::{Diagram, DiagramBuilder};
pub use error::{Endpoint, Error, Result};
pub use model::{Callout, Edge, Legend, LoopAnnotation, LoopKind, Node, NodeId, Sign};
pub use theme::{Font, FontSlant, FontWeight, Theme};
